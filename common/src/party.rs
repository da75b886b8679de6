use serde::{Deserialize, Serialize};

/// Jugadores de cada rol asignados a una instancia.
///
/// Sólo hay dos valores válidos: vacía `(0,0,0)` o completa `(1,1,3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Party {
    pub tank: u32,
    pub healer: u32,
    pub dps: u32,
}

impl Party {
    pub const EMPTY: Party = Party {
        tank: 0,
        healer: 0,
        dps: 0,
    };

    /// 1 tank, 1 healer, 3 DPS.
    pub const FULL: Party = Party {
        tank: 1,
        healer: 1,
        dps: 3,
    };

    pub fn is_empty(&self) -> bool {
        *self == Party::EMPTY
    }

    pub fn is_full(&self) -> bool {
        *self == Party::FULL
    }

    /// Una party parcial nunca debe ser visible: es un bug, no un caso a manejar.
    pub fn assert_well_formed(&self) {
        assert!(
            self.is_empty() || self.is_full(),
            "party inválida {:?}: debe ser (0,0,0) o (1,1,3)",
            self
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_es_party_vacia() {
        assert!(Party::default().is_empty());
        assert!(!Party::default().is_full());
    }

    #[test]
    fn full_es_uno_uno_tres() {
        assert_eq!(
            (Party::FULL.tank, Party::FULL.healer, Party::FULL.dps),
            (1, 1, 3)
        );
        Party::FULL.assert_well_formed();
    }

    #[test]
    #[should_panic(expected = "party inválida")]
    fn party_parcial_dispara_assert() {
        Party {
            tank: 1,
            healer: 0,
            dps: 3,
        }
        .assert_well_formed();
    }
}
