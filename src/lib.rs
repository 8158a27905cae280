pub mod model;
pub mod params;
pub mod scenario;
pub mod signal;
pub mod simif;
pub mod trace;
pub mod verilated;

pub use model::CamModel;
pub use params::CamParams;
pub use scenario::{CamRtlTest, Mismatch, RunReport, ScenarioConfig};
pub use signal::{Direction, Signal};
pub use simif::{SimError, SimIf, RESET_PULSE_CYCLES};
pub use trace::{SimOp, Traced};
pub use verilated::{create_cam_runtime, ensure_rtl_params, CamRtl, VerilatedCam};
