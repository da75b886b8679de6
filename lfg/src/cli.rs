use anyhow::{Context, Result};
use clap::Parser;
use common::{Params, Summary};
use dungeon::{ConsoleReporter, RunOptions, DEFAULT_CLEAR_UNIT};
use std::{
    env,
    io::{self, BufRead, Write},
    sync::Arc,
    time::Duration,
};
use tracing::info;

use crate::prompt::Prompter;

/// Milisegundos reales por unidad de clear time.
/// Se puede sobreescribir con la env var CLEAR_TIME_UNIT_MS.
fn clear_time_unit() -> Duration {
    parse_clear_unit(env::var("CLEAR_TIME_UNIT_MS").ok())
}

/// Valor ausente o que no es un entero de milisegundos -> 1 segundo.
fn parse_clear_unit(raw: Option<String>) -> Duration {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_CLEAR_UNIT)
}

#[derive(Parser, Debug)]
#[command(name = "lfg")]
#[command(about = "Simula el reparto de parties en instancias de dungeon")]
pub struct Cli {
    /// (n) máximo de instancias activas a la vez
    #[arg(long)]
    instances: Option<u32>,

    /// (t) tanks en cola
    #[arg(long)]
    tanks: Option<u32>,

    /// (h) healers en cola
    #[arg(long)]
    healers: Option<u32>,

    /// (d) DPS en cola
    #[arg(long)]
    dps: Option<u32>,

    /// (t1) clear time mínimo, en segundos
    #[arg(long, value_name = "T1")]
    min_clear: Option<u32>,

    /// (t2) clear time máximo, en segundos
    #[arg(long, value_name = "T2")]
    max_clear: Option<u32>,

    /// Semilla para que los clear times sean reproducibles
    #[arg(long)]
    seed: Option<u64>,

    /// Imprime además el resumen final como JSON
    #[arg(long)]
    json: bool,
}

/// Completa con prompts interactivos lo que no vino por flags.
fn resolve_params<R: BufRead, W: Write>(
    cli: &Cli,
    prompter: &mut Prompter<R, W>,
) -> Result<Params> {
    let mut ask = |given: Option<u32>, prompt: &str| match given {
        Some(v) => Ok(v),
        None => prompter.whole_number(prompt),
    };

    let instances = ask(
        cli.instances,
        "(n) Enter the maximum number of concurrent instances: ",
    )?;
    let tanks = ask(cli.tanks, "(t) Enter the number of tank players in the queue: ")?;
    let healers = ask(
        cli.healers,
        "(h) Enter the number of healer players in the queue: ",
    )?;
    let dps = ask(cli.dps, "(d) Enter the number of DPS players in the queue: ")?;
    let min_clear = ask(
        cli.min_clear,
        "(t1) Enter the minimum time before an instance is finished: ",
    )?;
    let max_clear = match cli.max_clear {
        Some(v) => v,
        None => prompter.at_least(
            "(t2) Enter the maximum time before an instance is finished: ",
            min_clear,
        )?,
    };

    let params = Params {
        instances,
        tanks,
        healers,
        dps,
        min_clear,
        max_clear,
    };
    params.validate()?;
    Ok(params)
}

fn echo_params(params: &Params) {
    println!("n = {}", params.instances);
    println!("t = {}", params.tanks);
    println!("h = {}", params.healers);
    println!("d = {}", params.dps);
    println!("t1 = {}", params.min_clear);
    println!("t2 = {}", params.max_clear);
    println!();
}

fn summary_json(summary: &Summary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("no se pudo serializar el resumen")
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let params = {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        resolve_params(&cli, &mut prompter).context("entrada inválida")?
    };
    echo_params(&params);

    let options = RunOptions {
        seed: cli.seed,
        clear_unit: clear_time_unit(),
    };
    info!(
        "unidad de clear time = {:?}, seed = {:?}",
        options.clear_unit, options.seed
    );

    let summary = dungeon::run(params, options, Arc::new(ConsoleReporter)).await?;

    if cli.json {
        println!("{}", summary_json(&summary)?);
    }

    Ok(())
}
