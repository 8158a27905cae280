//! Randomized read/write scenario for the CAM.
//!
//! After a target reset the scenario enables the CAM and, once per cycle,
//! presents a random tag, the cycle index as write data and a random
//! write-enable, steps the clock once and samples the outputs.

use eyre::Result;
use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::CamModel;
use crate::params::CamParams;
use crate::signal::Signal;
use crate::simif::SimIf;

pub const DEFAULT_NUM_CYCLES: u64 = 100;
pub const DEFAULT_SEED: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioConfig {
    pub num_cycles: u64,
    pub seed: u64,
    pub params: CamParams,
    /// Compare every sampled output against a [`CamModel`] shadow.
    pub check: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            num_cycles: DEFAULT_NUM_CYCLES,
            seed: DEFAULT_SEED,
            params: CamParams::default(),
            check: false,
        }
    }
}

impl ScenarioConfig {
    /// Build from a full argument vector (program name first). Only the
    /// first positional argument is consulted, as the cycle count.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cycles = args.into_iter().nth(1);
        Self::with_cycle_arg(cycles.as_ref().map(S::as_ref))
    }

    pub fn with_cycle_arg(arg: Option<&str>) -> Self {
        Self {
            num_cycles: arg.map_or(DEFAULT_NUM_CYCLES, parse_cycle_count),
            ..Self::default()
        }
    }
}

/// Parse a cycle count the way C `atoi` would: skip leading ASCII whitespace,
/// accept one sign, convert the longest digit prefix. Anything unparseable
/// is zero, negative counts clamp to zero and overflow saturates.
pub fn parse_cycle_count(arg: &str) -> u64 {
    let s = arg.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, d| {
            acc.saturating_mul(10).saturating_add(u64::from(d - b'0'))
        });
    if negative {
        0
    } else {
        value
    }
}

/// An output that disagreed with the shadow model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub cycle: u64,
    pub signal: Signal,
    pub expected: u64,
    pub observed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub cycles: u64,
    pub writes: u64,
    pub reads: u64,
    pub hits: u64,
    pub mismatches: Vec<Mismatch>,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

pub struct CamRtlTest {
    config: ScenarioConfig,
}

impl CamRtlTest {
    pub fn new(config: ScenarioConfig) -> Result<Self> {
        let params = &config.params;
        if params.depth == 0 || params.tag_width == 0 {
            eyre::bail!("CAM parameters leave no tags to draw from: {:?}", params);
        }
        if params.tag_width > 64 || params.data_width > 64 {
            eyre::bail!("signal widths above 64 bits are not supported: {:?}", params);
        }
        Ok(Self { config })
    }

    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(ScenarioConfig::from_args(args))
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn num_cycles(&self) -> u64 {
        self.config.num_cycles
    }

    /// Reset the target, enable it and run the configured number of
    /// iterations. Each call replays the same stimulus for the same seed.
    pub fn run<S: SimIf>(&self, sim: &mut S) -> Result<RunReport> {
        debug!(
            "running {} cycle(s) with seed {}{}",
            self.config.num_cycles,
            self.config.seed,
            if self.config.check { ", checking outputs" } else { "" }
        );

        let mut state = RunState {
            params: self.config.params,
            rng: stimulus_rng(self.config.seed),
            shadow: self
                .config
                .check
                .then(|| CamModel::new(self.config.params)),
            report: RunReport::default(),
        };

        state.target_reset(sim)?;
        state.poke(sim, Signal::InEn, 1)?;
        for cycle in 0..self.config.num_cycles {
            state.do_iteration(sim, cycle)?;
        }

        let report = state.report;
        debug!(
            "finished: {} writes, {} reads, {} hits, {} mismatches",
            report.writes,
            report.reads,
            report.hits,
            report.mismatches.len()
        );
        Ok(report)
    }
}

/// ChaCha8 keeps a seed's stimulus stable across `rand` releases.
fn stimulus_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

struct RunState {
    params: CamParams,
    rng: ChaCha8Rng,
    shadow: Option<CamModel>,
    report: RunReport,
}

impl RunState {
    fn do_iteration<S: SimIf>(&mut self, sim: &mut S, cycle: u64) -> Result<()> {
        let rand_tag = self.rng.gen_range(0..self.params.tag_space());
        let write_data = cycle & self.params.data_mask();
        let rand_wr = self.rng.gen_range(0..2u64);

        self.poke(sim, Signal::InTag, rand_tag)?;
        self.poke(sim, Signal::InWrData, write_data)?;
        self.poke(sim, Signal::InWr, rand_wr)?;

        self.step(sim, 1)?;
        if rand_wr == 0 {
            self.report.reads += 1;
            self.peek(sim, Signal::OutRdData, cycle)?;
        } else {
            self.report.writes += 1;
        }
        if self.peek(sim, Signal::OutHit, cycle)? != 0 {
            self.report.hits += 1;
        }

        self.report.cycles += 1;
        Ok(())
    }

    fn target_reset<S: SimIf>(&mut self, sim: &mut S) -> Result<()> {
        sim.target_reset()?;
        if let Some(shadow) = self.shadow.as_mut() {
            shadow.target_reset()?;
        }
        Ok(())
    }

    fn poke<S: SimIf>(&mut self, sim: &mut S, signal: Signal, value: u64) -> Result<()> {
        sim.poke(signal, value)?;
        if let Some(shadow) = self.shadow.as_mut() {
            shadow.poke(signal, value)?;
        }
        Ok(())
    }

    fn step<S: SimIf>(&mut self, sim: &mut S, cycles: u64) -> Result<()> {
        sim.step(cycles)?;
        if let Some(shadow) = self.shadow.as_mut() {
            shadow.step(cycles)?;
        }
        Ok(())
    }

    fn peek<S: SimIf>(&mut self, sim: &mut S, signal: Signal, cycle: u64) -> Result<u64> {
        let observed = sim.peek(signal)?;
        if let Some(shadow) = self.shadow.as_mut() {
            let expected = shadow.peek(signal)?;
            if expected != observed {
                warn!(
                    "cycle {}: {} expected {:#x}, observed {:#x}",
                    cycle, signal, expected, observed
                );
                self.report.mismatches.push(Mismatch {
                    cycle,
                    signal,
                    expected,
                    observed,
                });
            }
        }
        Ok(observed)
    }
}
