//! Recording decorator for any [`SimIf`].

use log::trace;

use crate::signal::Signal;
use crate::simif::{SimError, SimIf};

/// One successful call made through a [`Traced`] interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimOp {
    Reset,
    Poke(Signal, u64),
    Peek(Signal, u64),
    Step(u64),
}

#[derive(Debug)]
pub struct Traced<S> {
    inner: S,
    ops: Vec<SimOp>,
}

impl<S: SimIf> Traced<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[SimOp] {
        &self.ops
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_parts(self) -> (S, Vec<SimOp>) {
        (self.inner, self.ops)
    }

    /// Number of `step` calls, regardless of how many cycles each advanced.
    pub fn step_calls(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SimOp::Step(_)))
            .count()
    }

    pub fn peeks_of(&self, signal: Signal) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SimOp::Peek(s, _) if *s == signal))
            .count()
    }

    pub fn pokes_of(&self, signal: Signal) -> impl Iterator<Item = u64> + '_ {
        self.ops.iter().filter_map(move |op| match op {
            SimOp::Poke(s, v) if *s == signal => Some(*v),
            _ => None,
        })
    }

    fn record(&mut self, op: SimOp) {
        trace!("{:?}", op);
        self.ops.push(op);
    }
}

impl<S: SimIf> SimIf for Traced<S> {
    fn target_reset(&mut self) -> Result<(), SimError> {
        self.inner.target_reset()?;
        self.record(SimOp::Reset);
        Ok(())
    }

    fn poke(&mut self, signal: Signal, value: u64) -> Result<(), SimError> {
        self.inner.poke(signal, value)?;
        self.record(SimOp::Poke(signal, value));
        Ok(())
    }

    fn peek(&mut self, signal: Signal) -> Result<u64, SimError> {
        let value = self.inner.peek(signal)?;
        self.record(SimOp::Peek(signal, value));
        Ok(value)
    }

    fn step(&mut self, cycles: u64) -> Result<(), SimError> {
        self.inner.step(cycles)?;
        self.record(SimOp::Step(cycles));
        Ok(())
    }

    fn cycle(&self) -> u64 {
        self.inner.cycle()
    }
}
