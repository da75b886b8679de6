use common::Summary;
use std::fmt::Write;

use crate::state::PoolState;

/// Recibe cada cambio de estado del pool y el resumen final.
pub trait Reporter: Send + Sync {
    /// Se llama con el lock tomado, justo después de cada transición.
    fn transition(&self, state: &PoolState);

    /// Se llama una vez, sin lock, cuando ya salieron todos los workers.
    fn summary(&self, summary: &Summary);
}

/// Imprime los bloques de estado y el resumen por stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn transition(&self, state: &PoolState) {
        print!("{}", render_status(state));
    }

    fn summary(&self, summary: &Summary) {
        print!("{}", render_summary(summary));
    }
}

pub fn render_status(state: &PoolState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "========== Instance Status ==========");
    for (idx, inst) in state.instances.iter().enumerate() {
        let _ = writeln!(
            out,
            "Instance {}: {:<6} | Tank: {} | Healer: {} | DPS: {} | Clear time: {}s",
            idx + 1,
            inst.label(),
            inst.party.tank,
            inst.party.healer,
            inst.party.dps,
            inst.clear_time
        );
    }
    out.push('\n');
    out
}

pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "============== Summary ==============");
    for inst in &summary.instances {
        let _ = writeln!(
            out,
            "Instance {}: Parties served: {} | Total time served: {:.2}s",
            inst.instance, inst.parties_served, inst.total_time_served
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "========== Leftover Players ==========");
    let _ = writeln!(out, "Tank: {}", summary.leftover.tanks);
    let _ = writeln!(out, "Healer: {}", summary.leftover.healers);
    let _ = writeln!(out, "DPS: {}", summary.leftover.dps);
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Run finished in {:.2}s ({} parties served)",
        summary.wall_clock_secs(),
        summary.total_parties_served()
    );
    out
}
