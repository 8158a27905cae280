use cam_rtl_test::{
    create_cam_runtime, ensure_rtl_params,
    scenario::{ScenarioConfig, DEFAULT_SEED},
    CamModel, CamRtlTest, RunReport, VerilatedCam,
};
use clap::{Parser, ValueEnum};
use eyre::Result;

#[derive(Parser, Debug)]
#[command(
    name = "cam-rtl-test",
    version,
    about = "Randomized read/write test for the CAM RTL"
)]
struct Cli {
    /// Cycles to run. Parsed like C atoi, so junk counts as 0. Defaults to 100.
    #[arg(allow_hyphen_values = true)]
    num_cycles: Option<String>,

    /// Seed for the stimulus generator.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Simulator to drive.
    #[arg(long, value_enum, default_value_t = Backend::Model)]
    backend: Backend,

    /// Compare sampled outputs against the behavioral model.
    #[arg(long)]
    check: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    Model,
    Verilator,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    println!("🚀 CAM RTL test starting...");

    let config = ScenarioConfig {
        seed: cli.seed,
        check: cli.check,
        ..ScenarioConfig::with_cycle_arg(cli.num_cycles.as_deref())
    };
    let test = CamRtlTest::new(config)?;

    let report = match cli.backend {
        Backend::Model => {
            let mut sim = CamModel::new(test.config().params);
            test.run(&mut sim)?
        }
        Backend::Verilator => {
            ensure_rtl_params(&test.config().params)?;
            let runtime = create_cam_runtime()?;
            let mut sim = VerilatedCam::new(&runtime)?;
            println!("✅ CAM model verilated!");
            test.run(&mut sim)?
        }
    };

    print_report(&report);
    if !report.passed() {
        return Err(eyre::eyre!(
            "{} output mismatch(es) against the behavioral model",
            report.mismatches.len()
        ));
    }

    println!("🎉 All cycles completed!");
    Ok(())
}

fn print_report(report: &RunReport) {
    println!(
        "📊 {} cycles: {} writes, {} reads, {} hits",
        report.cycles, report.writes, report.reads, report.hits
    );
    for m in &report.mismatches {
        println!(
            "❌ cycle {}: {} expected {:#x}, observed {:#x}",
            m.cycle, m.signal, m.expected, m.observed
        );
    }
}
