// dungeon/src/state.rs

use common::{Instance, QueueCounts};
use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio::sync::Notify;

use crate::reporter::Reporter;

/// Todo lo que protege el lock único: colas, instancias y flag de shutdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub instances: Vec<Instance>,
    // jugadores que siguen en cola (sólo los descuenta el allocator)
    pub queues: QueueCounts,
    // false -> true una sola vez, nunca vuelve atrás
    pub shutdown: bool,
}

impl PoolState {
    pub fn new(capacity: usize, queues: QueueCounts) -> Self {
        Self {
            instances: vec![Instance::default(); capacity],
            queues,
            shutdown: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.instances.len()
    }

    pub fn active_count(&self) -> usize {
        self.instances.iter().filter(|i| i.occupied).count()
    }

    /// Una instancia o está vacía con party (0,0,0) o activa con (1,1,3).
    pub fn assert_invariants(&self) {
        for (idx, inst) in self.instances.iter().enumerate() {
            inst.party.assert_well_formed();
            assert_eq!(
                inst.occupied,
                inst.party.is_full(),
                "instancia {} con occupied={} y party {:?}",
                idx + 1,
                inst.occupied,
                inst.party
            );
        }
    }
}

/// Contexto compartido de una corrida: estado bajo lock + señal broadcast.
///
/// Se clona barato (todo va en `Arc`) y se pasa al allocator y a cada worker.
#[derive(Clone)]
pub struct SharedPool {
    state: Arc<Mutex<PoolState>>,
    wakeup: Arc<Notify>,
    reporter: Arc<dyn Reporter>,
    // cuánto dura en tiempo real una unidad de clear time
    clear_unit: Duration,
}

impl SharedPool {
    pub fn new(
        capacity: usize,
        queues: QueueCounts,
        reporter: Arc<dyn Reporter>,
        clear_unit: Duration,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(PoolState::new(capacity, queues))),
            wakeup: Arc::new(Notify::new()),
            reporter,
            clear_unit,
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, PoolState> {
        // sólo se envenena si un worker ya rompió un invariante
        self.state.lock().expect("pool lock poisoned")
    }

    pub fn clear_unit(&self) -> Duration {
        self.clear_unit
    }

    /// Despierta a todos los que esperan; cada uno re-evalúa su predicado.
    pub fn broadcast(&self) {
        self.wakeup.notify_waiters();
    }

    /// Llamar con el lock tomado para que el snapshot sea consistente.
    pub fn report(&self, state: &PoolState) {
        state.assert_invariants();
        self.reporter.transition(state);
    }

    /// Espera hasta que `ready` devuelva `Some`, re-chequeando en cada broadcast.
    ///
    /// `ready` corre con el lock tomado, así que puede además mutar el estado
    /// de forma atómica con el chequeo. El lock nunca se mantiene durante el await.
    pub async fn wait_until<T, F>(&self, mut ready: F) -> T
    where
        F: FnMut(&mut PoolState) -> Option<T>,
    {
        loop {
            let notified = self.wakeup.notified();
            tokio::pin!(notified);
            // registrarse antes de mirar el estado: un notify_waiters que llegue
            // entre el chequeo y el await no se pierde
            notified.as_mut().enable();

            let outcome = {
                let mut state = self.lock();
                ready(&mut state)
            };

            if let Some(value) = outcome {
                return value;
            }

            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::tests::RecordingReporter;
    use common::Party;

    fn pool(capacity: usize) -> SharedPool {
        SharedPool::new(
            capacity,
            QueueCounts::new(1, 1, 3),
            Arc::new(RecordingReporter::default()),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn pool_state_arranca_vacio() {
        let state = PoolState::new(3, QueueCounts::new(1, 2, 3));
        assert_eq!(state.capacity(), 3);
        assert_eq!(state.active_count(), 0);
        assert!(!state.shutdown);
        assert!(state.instances.iter().all(Instance::is_idle));
        state.assert_invariants();
    }

    #[test]
    #[should_panic(expected = "occupied=true")]
    fn ocupada_sin_party_rompe_invariante() {
        let mut state = PoolState::new(1, QueueCounts::default());
        state.instances[0].occupied = true;
        state.assert_invariants();
    }

    #[tokio::test]
    async fn wait_until_devuelve_inmediato_si_ya_esta_listo() {
        let pool = pool(1);
        let got = pool.wait_until(|s| Some(s.capacity())).await;
        assert_eq!(got, 1);
    }

    #[tokio::test]
    async fn wait_until_despierta_con_broadcast() {
        let pool = pool(2);

        let waiter = {
            let pool = pool.clone();
            tokio::spawn(async move {
                pool.wait_until(|s| s.shutdown.then_some(s.active_count()))
                    .await
            })
        };

        // dejamos que el waiter llegue a esperar
        tokio::task::yield_now().await;

        {
            let mut state = pool.lock();
            state.instances[1].admit(Party::FULL);
            state.shutdown = true;
        }
        pool.broadcast();

        assert_eq!(waiter.await.unwrap(), 1);
    }
}
