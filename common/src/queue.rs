use serde::{Deserialize, Serialize};

use crate::party::Party;

/// Jugadores que siguen esperando en cada cola de rol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueCounts {
    pub tanks: u32,
    pub healers: u32,
    pub dps: u32,
}

impl QueueCounts {
    pub fn new(tanks: u32, healers: u32, dps: u32) -> Self {
        Self {
            tanks,
            healers,
            dps,
        }
    }

    /// ¿Alcanza para una party completa más?
    pub fn can_form_party(&self) -> bool {
        self.tanks >= Party::FULL.tank
            && self.healers >= Party::FULL.healer
            && self.dps >= Party::FULL.dps
    }

    /// Saca una party completa de las colas.
    /// Devuelve `None` (sin tocar nada) si no alcanza.
    pub fn take_party(&mut self) -> Option<Party> {
        if !self.can_form_party() {
            return None;
        }
        self.tanks -= Party::FULL.tank;
        self.healers -= Party::FULL.healer;
        self.dps -= Party::FULL.dps;
        Some(Party::FULL)
    }
}
