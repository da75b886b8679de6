use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::queue::QueueCounts;

/// Los seis enteros de entrada de una corrida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// n: instancias que pueden estar activas a la vez
    pub instances: u32,
    /// t
    pub tanks: u32,
    /// h
    pub healers: u32,
    /// d
    pub dps: u32,
    /// t1: clear time más rápido (segundos)
    pub min_clear: u32,
    /// t2: clear time más lento (segundos)
    pub max_clear: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("'{0}' is not a whole number")]
    NotWholeNumber(String),

    #[error("invalid clear time range: t1 = {min} is greater than t2 = {max}")]
    InvalidRange { min: u32, max: u32 },

    #[error("unexpected end of input")]
    UnexpectedEof,
}

impl Params {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.min_clear > self.max_clear {
            return Err(ParamsError::InvalidRange {
                min: self.min_clear,
                max: self.max_clear,
            });
        }
        Ok(())
    }

    pub fn queues(&self) -> QueueCounts {
        QueueCounts::new(self.tanks, self.healers, self.dps)
    }
}

/// Acepta sólo una secuencia no vacía de dígitos ASCII que quepa en `u32`.
/// Nada de signos, espacios internos ni decimales.
pub fn parse_whole_number(input: &str) -> Result<u32, ParamsError> {
    let trimmed = input.trim();
    let not_whole = || ParamsError::NotWholeNumber(trimmed.to_string());

    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(not_whole());
    }

    // fuera de rango también cuenta como inválido
    trimmed.parse::<u32>().map_err(|_| not_whole())
}
