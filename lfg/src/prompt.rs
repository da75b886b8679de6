use anyhow::Result;
use common::{parse_whole_number, ParamsError};
use std::io::{BufRead, Write};
use tracing::debug;

pub const INVALID_NUMBER: &str = "[INVALID] Please enter a whole number.";
pub const INVALID_RANGE: &str = "[INVALID] t2 must be greater than or equal to t1.";

/// Pide números por consola hasta que la entrada sea válida.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Repite el prompt hasta leer un entero no negativo.
    pub fn whole_number(&mut self, prompt: &str) -> Result<u32> {
        loop {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(ParamsError::UnexpectedEof.into());
            }

            match parse_whole_number(&line) {
                Ok(value) => {
                    writeln!(self.output)?;
                    return Ok(value);
                }
                Err(e) => {
                    debug!("entrada rechazada: {}", e);
                    writeln!(self.output, "{}\n", INVALID_NUMBER)?;
                }
            }
        }
    }

    /// Como `whole_number`, pero además exige `value >= min`.
    pub fn at_least(&mut self, prompt: &str, min: u32) -> Result<u32> {
        loop {
            let value = self.whole_number(prompt)?;
            if value >= min {
                return Ok(value);
            }
            writeln!(self.output, "{}\n", INVALID_RANGE)?;
        }
    }
}
