use common::InstanceId;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::state::SharedPool;

/// Qué encontró el worker al despertar en `WaitingForParty`.
enum Wakeup {
    /// Entró una party; lleva el clear time sorteado.
    Enter(u32),
    /// Shutdown y la instancia vacía: no va a llegar más trabajo.
    Exit,
}

/// Dueño del ciclo de ocupación de una sola instancia.
pub struct InstanceWorker {
    id: InstanceId,
    pool: SharedPool,
    rng: StdRng,
    min_clear: u32,
    max_clear: u32,
}

impl InstanceWorker {
    /// Con `seed` la secuencia de clear times es reproducible (`seed + id`).
    pub fn new(
        id: InstanceId,
        pool: SharedPool,
        min_clear: u32,
        max_clear: u32,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id as u64)),
            None => StdRng::from_entropy(),
        };

        Self {
            id,
            pool,
            rng,
            min_clear,
            max_clear,
        }
    }

    /// Loop principal:
    /// - espera una party (o el shutdown con la instancia vacía)
    /// - sortea el clear time y reporta, todo bajo lock
    /// - duerme sin lock
    /// - libera la instancia, reporta y avisa a todos
    pub async fn run(mut self) {
        let id = self.id;
        debug!("worker de la instancia {} esperando parties", id + 1);

        loop {
            let wakeup = {
                let Self {
                    pool,
                    rng,
                    min_clear,
                    max_clear,
                    ..
                } = &mut self;

                pool.wait_until(|state| {
                    let inst = &mut state.instances[id];
                    inst.party.assert_well_formed();

                    if inst.party.is_full() {
                        let clear_time = rng.gen_range(*min_clear..=*max_clear);
                        inst.clear_time = clear_time;
                        pool.report(state);
                        return Some(Wakeup::Enter(clear_time));
                    }

                    // una instancia con party nunca llega acá, así que el
                    // shutdown no corta una ocupación en curso
                    state.shutdown.then_some(Wakeup::Exit)
                })
                .await
            };

            let clear_time = match wakeup {
                Wakeup::Enter(clear_time) => clear_time,
                Wakeup::Exit => break,
            };

            debug!(
                "instancia {}: party adentro, clear time = {}s",
                id + 1,
                clear_time
            );

            // único punto de espera con la instancia ocupada; el lock queda libre
            sleep(self.pool.clear_unit().saturating_mul(clear_time)).await;

            {
                let mut state = self.pool.lock();
                state.instances[id].release(Duration::from_secs(u64::from(clear_time)));
                debug!(
                    "instancia {}: party terminó (parties servidas = {})",
                    id + 1,
                    state.instances[id].parties_served
                );
                self.pool.report(&state);
            }

            // la instancia vuelve a estar libre: que el allocator y el resto re-chequeen
            self.pool.broadcast();
        }

        info!("worker de la instancia {} sin más trabajo, saliendo", id + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::tests::RecordingReporter;
    use crate::state::SharedPool;
    use common::{Party, QueueCounts};
    use std::sync::Arc;

    fn pool_with(reporter: Arc<RecordingReporter>, capacity: usize) -> SharedPool {
        SharedPool::new(
            capacity,
            QueueCounts::default(),
            reporter,
            Duration::from_secs(1),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn worker_sale_si_hay_shutdown_y_esta_vacia() {
        let reporter = Arc::new(RecordingReporter::default());
        let pool = pool_with(reporter.clone(), 1);
        pool.lock().shutdown = true;

        InstanceWorker::new(0, pool.clone(), 1, 1, Some(1)).run().await;

        assert!(reporter.snapshots().is_empty());
        assert_eq!(pool.lock().instances[0].parties_served, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_no_corta_una_party_en_curso() {
        let reporter = Arc::new(RecordingReporter::default());
        let pool = pool_with(reporter.clone(), 1);
        {
            let mut state = pool.lock();
            state.instances[0].admit(Party::FULL);
            state.shutdown = true;
        }

        InstanceWorker::new(0, pool.clone(), 3, 3, Some(1)).run().await;

        let state = pool.lock();
        assert!(state.instances[0].is_idle());
        assert_eq!(state.instances[0].parties_served, 1);
        assert_eq!(
            state.instances[0].total_time_served,
            Duration::from_secs(3)
        );

        // entra (Active, 3s) y sale (Empty)
        let snaps = reporter.snapshots();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].instances[0].label(), "Active");
        assert_eq!(snaps[0].instances[0].clear_time, 3);
        assert_eq!(snaps[1].instances[0].label(), "Empty");
    }

    #[tokio::test(start_paused = true)]
    async fn clear_time_queda_dentro_del_rango() {
        let reporter = Arc::new(RecordingReporter::default());
        let pool = pool_with(reporter.clone(), 1);
        {
            let mut state = pool.lock();
            state.instances[0].admit(Party::FULL);
            state.shutdown = true;
        }

        InstanceWorker::new(0, pool.clone(), 2, 6, None).run().await;

        let drawn = reporter.snapshots()[0].instances[0].clear_time;
        assert!((2..=6).contains(&drawn), "clear time fuera de rango: {}", drawn);
    }

    #[tokio::test(start_paused = true)]
    async fn worker_solo_toca_su_instancia() {
        let reporter = Arc::new(RecordingReporter::default());
        let pool = pool_with(reporter.clone(), 2);
        {
            let mut state = pool.lock();
            state.instances[1].admit(Party::FULL);
            state.shutdown = true;
        }

        // el worker 0 sale enseguida aunque la instancia 1 siga ocupada
        InstanceWorker::new(0, pool.clone(), 1, 1, Some(1)).run().await;

        let state = pool.lock();
        assert!(state.instances[1].occupied);
        assert_eq!(state.instances[1].parties_served, 0);
    }
}
