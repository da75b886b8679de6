use anyhow::{Context, Result};
use common::{Instance, InstanceId};
use std::future::Future;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info};

use crate::state::{PoolState, SharedPool};

/// Resultado de examinar la instancia bajo el cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Se metió una party completa en esta instancia.
    Assigned(InstanceId),
    /// La instancia estaba ocupada; el cursor avanzó igual.
    Busy(InstanceId),
    /// Ya no se puede formar ninguna party completa.
    Exhausted,
}

/// Único escritor de las colas y de la transición vacía -> ocupada.
///
/// El cursor round-robin vive acá y no se comparte con los workers.
pub struct Allocator {
    pool: SharedPool,
    capacity: usize,
    cursor: usize,
    // cada tarea devuelve el índice de su instancia al salir
    workers: JoinSet<InstanceId>,
}

impl Allocator {
    /// La cantidad de instancias sale del propio pool.
    pub fn new(pool: SharedPool) -> Self {
        let capacity = pool.lock().capacity();
        Self {
            pool,
            capacity,
            cursor: 0,
            workers: JoinSet::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lanza la tarea del worker de la instancia `id`; el allocator la espera
    /// al final y se entera si muere antes de tiempo.
    pub fn spawn_worker<F>(&mut self, id: InstanceId, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.workers.spawn(async move {
            task.await;
            id
        });
    }

    /// Examina la instancia del cursor y lo avanza, haya asignación o no.
    pub fn step(&mut self, state: &mut PoolState) -> Step {
        if self.capacity == 0 || !state.queues.can_form_party() {
            return Step::Exhausted;
        }

        let idx = self.cursor;
        self.cursor = (self.cursor + 1) % self.capacity;

        if !state.instances[idx].is_idle() {
            return Step::Busy(idx);
        }

        match state.queues.take_party() {
            Some(party) => {
                state.instances[idx].admit(party);
                Step::Assigned(idx)
            }
            None => Step::Exhausted,
        }
    }

    /// Reparte parties hasta que no se pueda formar ninguna más,
    /// levanta el shutdown y espera a que salgan todos los workers.
    ///
    /// Si un worker muere (panic por un invariante roto) se corta enseguida
    /// con error, aunque el allocator esté esperando una instancia libre.
    pub async fn run(mut self) -> Result<()> {
        let pool = self.pool.clone();
        // exámenes seguidos sin asignar nada
        let mut misses = 0usize;

        loop {
            let step = {
                let mut state = pool.lock();
                let step = self.step(&mut state);
                if step == Step::Exhausted {
                    state.shutdown = true;
                }
                step
            };

            match step {
                Step::Assigned(idx) => {
                    debug!("party asignada a la instancia {}", idx + 1);
                    misses = 0;
                    pool.broadcast();
                }
                Step::Busy(_) => {
                    misses += 1;
                    if misses >= self.capacity {
                        // vuelta completa sin lugar: esperar a que alguien libere
                        debug!("todas las instancias ocupadas, esperando");
                        tokio::select! {
                            biased;
                            Some(joined) = self.workers.join_next() => {
                                worker_exited(joined)?;
                            }
                            _ = pool.wait_until(|state| {
                                state.instances.iter().any(Instance::is_idle).then_some(())
                            }) => {}
                        }
                        misses = 0;
                    }
                }
                Step::Exhausted => break,
            }
        }

        let leftover = pool.lock().queues;
        info!(
            "no se pueden formar más parties (quedan tank={}, healer={}, dps={}), shutdown",
            leftover.tanks, leftover.healers, leftover.dps
        );
        pool.broadcast();

        // al devolver error, el JoinSet se descarta y aborta al resto
        while let Some(joined) = self.workers.join_next().await {
            worker_exited(joined)?;
        }

        info!("todos los workers terminaron");
        Ok(())
    }
}

fn worker_exited(joined: Result<InstanceId, JoinError>) -> Result<()> {
    let id = joined.context("un worker de instancia falló")?;
    debug!("worker de la instancia {} terminado", id + 1);
    Ok(())
}
