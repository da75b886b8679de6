use std::time::Duration;

use crate::party::Party;

/// Índice de la instancia dentro del pool (0..n-1).
pub type InstanceId = usize;

/// Registro de una instancia de dungeon.
///
/// Los contadores `parties_served` y `total_time_served` sólo los escribe
/// el worker dueño de la instancia.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instance {
    pub occupied: bool,
    pub party: Party,
    /// Tiempo de clear sorteado para la ocupación actual (en unidades).
    /// Vuelve a 0 cuando la instancia queda vacía.
    pub clear_time: u32,

    // Métricas
    pub parties_served: u64,
    pub total_time_served: Duration,
}

impl Instance {
    pub fn is_idle(&self) -> bool {
        !self.occupied && self.party.is_empty()
    }

    /// Mete una party completa. Sólo lo hace el allocator.
    pub fn admit(&mut self, party: Party) {
        assert!(self.is_idle(), "admit sobre una instancia ocupada");
        assert!(party.is_full(), "sólo se asignan parties completas");
        self.party = party;
        self.occupied = true;
    }

    /// Cierra la ocupación actual: suma métricas y deja la instancia vacía.
    pub fn release(&mut self, served: Duration) {
        assert!(self.occupied && self.party.is_full(), "release sin party");
        self.parties_served += 1;
        self.total_time_served += served;
        self.party = Party::EMPTY;
        self.clear_time = 0;
        self.occupied = false;
    }

    pub fn label(&self) -> &'static str {
        if self.occupied {
            "Active"
        } else {
            "Empty"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instancia_nueva_esta_vacia() {
        let inst = Instance::default();
        assert!(inst.is_idle());
        assert_eq!(inst.label(), "Empty");
        assert_eq!(inst.parties_served, 0);
    }

    #[test]
    fn admit_y_release_actualizan_metricas() {
        let mut inst = Instance::default();
        inst.admit(Party::FULL);
        inst.clear_time = 3;
        assert_eq!(inst.label(), "Active");
        assert!(!inst.is_idle());

        inst.release(Duration::from_secs(3));
        assert!(inst.is_idle());
        assert_eq!(inst.clear_time, 0);
        assert_eq!(inst.parties_served, 1);
        assert_eq!(inst.total_time_served, Duration::from_secs(3));
    }

    #[test]
    #[should_panic(expected = "admit sobre una instancia ocupada")]
    fn doble_admit_es_un_bug() {
        let mut inst = Instance::default();
        inst.admit(Party::FULL);
        inst.admit(Party::FULL);
    }
}
