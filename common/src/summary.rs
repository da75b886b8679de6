use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::instance::Instance;
use crate::queue::QueueCounts;

/// Resumen por instancia al terminar la corrida.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSummary {
    /// Número de instancia tal como se muestra (1..n).
    pub instance: usize,
    pub parties_served: u64,
    /// Segundos de clear acumulados.
    pub total_time_served: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub instances: Vec<InstanceSummary>,
    /// Jugadores que nunca pudieron formar una party completa.
    pub leftover: QueueCounts,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl Summary {
    pub fn new(
        instances: &[Instance],
        leftover: QueueCounts,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let instances = instances
            .iter()
            .enumerate()
            .map(|(idx, inst)| InstanceSummary {
                instance: idx + 1,
                parties_served: inst.parties_served,
                total_time_served: inst.total_time_served.as_secs_f64(),
            })
            .collect();

        Self {
            instances,
            leftover,
            started_at,
            finished_at,
        }
    }

    pub fn total_parties_served(&self) -> u64 {
        self.instances.iter().map(|i| i.parties_served).sum()
    }

    /// Duración real (reloj de pared) de la corrida, en segundos.
    pub fn wall_clock_secs(&self) -> f64 {
        (self.finished_at - self.started_at)
            .num_milliseconds()
            .max(0) as f64
            / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::party::Party;
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    #[test]
    fn summary_numera_instancias_desde_uno() {
        let mut served = Instance::default();
        served.admit(Party::FULL);
        served.release(Duration::from_secs(2));

        let now = Utc::now();
        let summary = Summary::new(
            &[served, Instance::default()],
            QueueCounts::new(1, 0, 0),
            now,
            now + ChronoDuration::milliseconds(2500),
        );

        assert_eq!(summary.instances.len(), 2);
        assert_eq!(summary.instances[0].instance, 1);
        assert_eq!(summary.instances[0].parties_served, 1);
        assert_eq!(summary.instances[0].total_time_served, 2.0);
        assert_eq!(summary.instances[1].instance, 2);
        assert_eq!(summary.total_parties_served(), 1);
        assert_eq!(summary.wall_clock_secs(), 2.5);
    }

    #[test]
    fn summary_se_serializa_a_json() {
        let now = Utc::now();
        let summary = Summary::new(&[], QueueCounts::new(0, 0, 2), now, now);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["leftover"]["dps"], 2);
        assert!(json["instances"].as_array().unwrap().is_empty());
    }
}
