use camino::Utf8Path;
use eyre::Result;
use log::{debug, trace};
use marlin::{
    verilator::{VerilatorRuntime, VerilatorRuntimeOptions},
    verilog::prelude::*,
};

use crate::params::CamParams;
use crate::signal::Signal;
use crate::simif::{check_poke, SimError, SimIf, RESET_PULSE_CYCLES};

// The CAM design under test
#[verilog(src = "rtl/cam_rtl.sv", name = "cam_rtl")]
pub struct CamRtl;

pub fn create_cam_runtime() -> Result<VerilatorRuntime> {
    let include_paths = [Utf8Path::new("rtl")];
    let src_files = [Utf8Path::new("rtl/cam_rtl.sv")];

    VerilatorRuntime::new(
        Utf8Path::new("artifacts"),
        &src_files,
        &include_paths,
        [],
        VerilatorRuntimeOptions::default_logging(),
    )
    .map_err(|e| eyre::eyre!("Failed to create runtime: {}", e))
}

/// Check that a scenario's CAM shape matches `rtl/cam_rtl.sv`, whose port
/// widths and depth are fixed to [`CamParams::default`].
pub fn ensure_rtl_params(params: &CamParams) -> Result<()> {
    let rtl = CamParams::default();
    if *params != rtl {
        eyre::bail!(
            "cam_rtl is built as {:?}, scenario asked for {:?}",
            rtl,
            params
        );
    }
    Ok(())
}

/// [`SimIf`] over a Verilated `cam_rtl`. The RTL is fixed to
/// [`CamParams::default`]; see [`ensure_rtl_params`].
pub struct VerilatedCam<'ctx> {
    dut: CamRtl<'ctx>,
    params: CamParams,
    cycle: u64,
}

impl<'ctx> VerilatedCam<'ctx> {
    pub fn new(runtime: &'ctx VerilatorRuntime) -> Result<Self> {
        let dut = runtime
            .create_model_simple::<CamRtl>()
            .map_err(|e| eyre::eyre!("Failed to create CAM model: {:?}", e))?;
        Ok(Self::from_model(dut))
    }

    /// Wrap an already-built model, driving every input low.
    pub fn from_model(mut dut: CamRtl<'ctx>) -> Self {
        dut.clock = 0;
        dut.reset = 0;
        dut.io_in_en = 0;
        dut.io_in_tag = 0;
        dut.io_in_wr_data = 0;
        dut.io_in_wr = 0;
        dut.eval();
        debug!("Verilated cam_rtl ready");

        Self {
            dut,
            params: CamParams::default(),
            cycle: 0,
        }
    }

    pub fn params(&self) -> &CamParams {
        &self.params
    }

    fn clock_cycle(&mut self) {
        // Rising edge
        self.dut.clock = 1;
        self.dut.eval();

        // Falling edge
        self.dut.clock = 0;
        self.dut.eval();

        self.cycle += 1;
    }
}

impl SimIf for VerilatedCam<'_> {
    fn target_reset(&mut self) -> Result<(), SimError> {
        self.dut.reset = 1;
        self.step(RESET_PULSE_CYCLES)?;
        self.dut.reset = 0;
        self.dut.eval();
        Ok(())
    }

    fn poke(&mut self, signal: Signal, value: u64) -> Result<(), SimError> {
        check_poke(&self.params, signal, value)?;
        match signal {
            Signal::InEn => self.dut.io_in_en = value as u8,
            Signal::InTag => self.dut.io_in_tag = value as u16,
            Signal::InWrData => self.dut.io_in_wr_data = value as u32,
            Signal::InWr => self.dut.io_in_wr = value as u8,
            Signal::OutRdData | Signal::OutHit => unreachable!("rejected by check_poke"),
        }
        Ok(())
    }

    fn peek(&mut self, signal: Signal) -> Result<u64, SimError> {
        Ok(match signal {
            Signal::InEn => self.dut.io_in_en as u64,
            Signal::InTag => self.dut.io_in_tag as u64,
            Signal::InWrData => self.dut.io_in_wr_data as u64,
            Signal::InWr => self.dut.io_in_wr as u64,
            Signal::OutRdData => self.dut.io_out_rd_data as u64,
            Signal::OutHit => self.dut.io_out_hit as u64,
        })
    }

    fn step(&mut self, cycles: u64) -> Result<(), SimError> {
        for _ in 0..cycles {
            self.clock_cycle();
        }
        trace!("cam_rtl stepped {} cycle(s), now at {}", cycles, self.cycle);
        Ok(())
    }

    fn cycle(&self) -> u64 {
        self.cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtl_accepts_default_params() {
        assert!(ensure_rtl_params(&CamParams::default()).is_ok());
    }

    #[test]
    fn test_rtl_rejects_other_shapes() {
        let deeper = CamParams {
            depth: 64,
            ..CamParams::default()
        };
        let narrow = CamParams {
            data_width: 16,
            ..CamParams::default()
        };
        assert!(ensure_rtl_params(&deeper).is_err());
        assert!(ensure_rtl_params(&narrow).is_err());
    }
}
