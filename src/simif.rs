//! The simulation interface a test scenario drives.
//!
//! A scenario never owns the simulator. It is handed something that can
//! poke inputs, peek outputs, advance the clock and reset the target, and
//! only talks to it through [`SimIf`].

use thiserror::Error;

use crate::params::{mask, CamParams};
use crate::signal::Signal;

/// Cycles the reset line is held high by [`SimIf::target_reset`].
pub const RESET_PULSE_CYCLES: u64 = 5;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("cannot poke output signal {0}")]
    NotAnInput(Signal),
    #[error("value {value:#x} does not fit in {width}-bit signal {signal}")]
    ValueTooWide {
        signal: Signal,
        value: u64,
        width: u32,
    },
    #[error("simulator runtime error: {0}")]
    Runtime(String),
}

pub trait SimIf {
    /// Assert reset, hold it for [`RESET_PULSE_CYCLES`] cycles, then release it.
    fn target_reset(&mut self) -> Result<(), SimError>;

    fn poke(&mut self, signal: Signal, value: u64) -> Result<(), SimError>;

    fn peek(&mut self, signal: Signal) -> Result<u64, SimError>;

    /// Advance `cycles` full clock periods.
    fn step(&mut self, cycles: u64) -> Result<(), SimError>;

    /// Cycles stepped since construction, reset pulses included.
    fn cycle(&self) -> u64;
}

impl<S: SimIf + ?Sized> SimIf for &mut S {
    fn target_reset(&mut self) -> Result<(), SimError> {
        (**self).target_reset()
    }

    fn poke(&mut self, signal: Signal, value: u64) -> Result<(), SimError> {
        (**self).poke(signal, value)
    }

    fn peek(&mut self, signal: Signal) -> Result<u64, SimError> {
        (**self).peek(signal)
    }

    fn step(&mut self, cycles: u64) -> Result<(), SimError> {
        (**self).step(cycles)
    }

    fn cycle(&self) -> u64 {
        (**self).cycle()
    }
}

/// Validate a poke against the signal's direction and width.
pub fn check_poke(params: &CamParams, signal: Signal, value: u64) -> Result<(), SimError> {
    if !signal.is_input() {
        return Err(SimError::NotAnInput(signal));
    }
    let width = signal.width(params);
    if value & !mask(width) != 0 {
        return Err(SimError::ValueTooWide {
            signal,
            value,
            width,
        });
    }
    Ok(())
}
