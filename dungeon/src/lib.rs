//! Simulación de instancias de dungeon compartidas.
//!
//! Un allocator arma parties (1 tank, 1 healer, 3 DPS) desde tres colas y las
//! mete en `n` instancias; cada instancia tiene su propio worker que la ocupa
//! durante un clear time aleatorio y la libera. Todo se coordina con un único
//! lock más un broadcast.

pub mod allocator;
pub mod reporter;
pub mod state;
pub mod worker;

use anyhow::{Context, Result};
use chrono::Utc;
use common::{Params, Summary};
use std::{sync::Arc, time::Duration};
use tracing::info;

pub use allocator::{Allocator, Step};
pub use reporter::{render_status, render_summary, ConsoleReporter, Reporter};
pub use state::{PoolState, SharedPool};
pub use worker::InstanceWorker;

pub const DEFAULT_CLEAR_UNIT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Semilla para los clear times; `None` usa entropía del sistema.
    pub seed: Option<u64>,
    /// Duración real de una unidad de clear time.
    pub clear_unit: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            seed: None,
            clear_unit: DEFAULT_CLEAR_UNIT,
        }
    }
}

/// Corre la simulación completa y devuelve el resumen final.
///
/// Arranca un worker por instancia, después el allocator, y espera a que el
/// allocator termine (él a su vez espera a todos los workers).
pub async fn run(
    params: Params,
    options: RunOptions,
    reporter: Arc<dyn Reporter>,
) -> Result<Summary> {
    params.validate().context("parámetros inválidos")?;
    // el clear time más largo tiene que caber en un Duration
    options
        .clear_unit
        .checked_mul(params.max_clear)
        .with_context(|| {
            format!(
                "unidad de clear time {:?} demasiado grande para t2 = {}",
                options.clear_unit, params.max_clear
            )
        })?;

    let started_at = Utc::now();
    let capacity = params.instances as usize;
    let pool = SharedPool::new(
        capacity,
        params.queues(),
        reporter.clone(),
        options.clear_unit,
    );

    info!(
        "arrancando {} instancias (tank={}, healer={}, dps={}, clear time {}..={}s)",
        capacity,
        params.tanks,
        params.healers,
        params.dps,
        params.min_clear,
        params.max_clear
    );

    {
        let state = pool.lock();
        pool.report(&state);
    }

    // todos los workers existen antes de la primera asignación
    let mut allocator = Allocator::new(pool.clone());
    for id in 0..capacity {
        let worker = InstanceWorker::new(
            id,
            pool.clone(),
            params.min_clear,
            params.max_clear,
            options.seed,
        );
        allocator.spawn_worker(id, worker.run());
    }

    tokio::spawn(allocator.run())
        .await
        .context("la tarea del allocator falló")??;

    let (instances, leftover) = {
        let state = pool.lock();
        (state.instances.clone(), state.queues)
    };
    let summary = Summary::new(&instances, leftover, started_at, Utc::now());
    reporter.summary(&summary);

    Ok(summary)
}
