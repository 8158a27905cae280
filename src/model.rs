//! Cycle-accurate behavioral model of `rtl/cam_rtl.sv`.
//!
//! Implements [`SimIf`] directly, so scenarios can run without a Verilator
//! installation, and doubles as the scoreboard reference when a scenario
//! checks another backend.

use log::trace;

use crate::params::CamParams;
use crate::signal::Signal;
use crate::simif::{check_poke, SimError, SimIf, RESET_PULSE_CYCLES};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Entry {
    valid: bool,
    tag: u64,
    data: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Inputs {
    en: bool,
    tag: u64,
    wr_data: u64,
    wr: bool,
}

#[derive(Debug, Clone)]
pub struct CamModel {
    params: CamParams,
    entries: Vec<Entry>,
    wr_ptr: usize,
    reset: bool,
    inputs: Inputs,
    rd_data: u64,
    hit: bool,
    cycle: u64,
}

impl CamModel {
    pub fn new(params: CamParams) -> Self {
        Self {
            params,
            entries: vec![Entry::default(); params.depth],
            wr_ptr: 0,
            reset: false,
            inputs: Inputs::default(),
            rd_data: 0,
            hit: false,
            cycle: 0,
        }
    }

    /// Index of the lowest valid entry holding `tag`.
    pub fn lookup(&self, tag: u64) -> Option<usize> {
        self.entries.iter().position(|e| e.valid && e.tag == tag)
    }

    /// Number of valid entries.
    pub fn occupancy(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }

    fn rising_edge(&mut self) {
        if self.reset {
            self.entries.iter_mut().for_each(|e| e.valid = false);
            self.wr_ptr = 0;
            self.hit = false;
            self.rd_data = 0;
            return;
        }
        if !self.inputs.en {
            return;
        }

        let Inputs { tag, wr_data, wr, .. } = self.inputs;
        let matched = self.lookup(tag);
        self.hit = matched.is_some();
        self.rd_data = matched.map_or(0, |idx| self.entries[idx].data);

        if wr {
            match matched {
                Some(idx) => self.entries[idx].data = wr_data,
                None if !self.entries.is_empty() => {
                    self.entries[self.wr_ptr] = Entry {
                        valid: true,
                        tag,
                        data: wr_data,
                    };
                    self.wr_ptr = (self.wr_ptr + 1) % self.entries.len();
                }
                None => {}
            }
        }
    }
}

impl SimIf for CamModel {
    fn target_reset(&mut self) -> Result<(), SimError> {
        self.reset = true;
        self.step(RESET_PULSE_CYCLES)?;
        self.reset = false;
        Ok(())
    }

    fn poke(&mut self, signal: Signal, value: u64) -> Result<(), SimError> {
        check_poke(&self.params, signal, value)?;
        match signal {
            Signal::InEn => self.inputs.en = value != 0,
            Signal::InTag => self.inputs.tag = value,
            Signal::InWrData => self.inputs.wr_data = value,
            Signal::InWr => self.inputs.wr = value != 0,
            Signal::OutRdData | Signal::OutHit => unreachable!("rejected by check_poke"),
        }
        Ok(())
    }

    fn peek(&mut self, signal: Signal) -> Result<u64, SimError> {
        Ok(match signal {
            Signal::InEn => self.inputs.en as u64,
            Signal::InTag => self.inputs.tag,
            Signal::InWrData => self.inputs.wr_data,
            Signal::InWr => self.inputs.wr as u64,
            Signal::OutRdData => self.rd_data,
            Signal::OutHit => self.hit as u64,
        })
    }

    fn step(&mut self, cycles: u64) -> Result<(), SimError> {
        for _ in 0..cycles {
            self.rising_edge();
            self.cycle += 1;
        }
        trace!("model stepped {} cycle(s), now at {}", cycles, self.cycle);
        Ok(())
    }

    fn cycle(&self) -> u64 {
        self.cycle
    }
}
