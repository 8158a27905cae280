use proptest::prelude::*;

use cam_rtl_test::{
    scenario::parse_cycle_count, CamModel, CamParams, CamRtlTest, ScenarioConfig, SimIf, Signal,
    Traced,
};

/// Property testing helper functions
struct CamPropertyHelper {
    cam: CamModel,
}

impl CamPropertyHelper {
    fn new(params: CamParams) -> Self {
        let mut cam = CamModel::new(params);
        cam.target_reset().unwrap();
        cam.poke(Signal::InEn, 1).unwrap();
        Self { cam }
    }

    fn write(&mut self, tag: u64, data: u64) {
        self.cam.poke(Signal::InTag, tag).unwrap();
        self.cam.poke(Signal::InWrData, data).unwrap();
        self.cam.poke(Signal::InWr, 1).unwrap();
        self.cam.step(1).unwrap();
    }

    /// Returns `(hit, rd_data)` for a read of `tag`.
    fn read(&mut self, tag: u64) -> (u64, u64) {
        self.cam.poke(Signal::InTag, tag).unwrap();
        self.cam.poke(Signal::InWr, 0).unwrap();
        self.cam.step(1).unwrap();
        (
            self.cam.peek(Signal::OutHit).unwrap(),
            self.cam.peek(Signal::OutRdData).unwrap(),
        )
    }
}

// Property test generators

/// Generate a tag inside the default 32-entry tag space
fn tag() -> impl Strategy<Value = u64> {
    0u64..32
}

/// Generate a 32-bit data word
fn data_value() -> impl Strategy<Value = u64> {
    0u64..=0xFFFF_FFFF
}

/// Generate small CAM shapes
fn cam_params() -> impl Strategy<Value = CamParams> {
    (1usize..64, 1u32..8, 1u32..=32).prop_map(|(depth, tag_width, data_width)| CamParams {
        depth,
        tag_width,
        data_width,
    })
}

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        /// Property: the scenario steps exactly once per configured cycle
        #[test]
        fn prop_one_step_per_cycle(
            num_cycles in 0u64..300,
            seed in any::<u64>()
        ) {
            let config = ScenarioConfig { num_cycles, seed, ..ScenarioConfig::default() };
            let test = CamRtlTest::new(config).unwrap();
            let mut sim = Traced::new(CamModel::new(CamParams::default()));
            let report = test.run(&mut sim).unwrap();

            prop_assert_eq!(sim.step_calls() as u64, num_cycles);
            prop_assert_eq!(report.cycles, num_cycles);
            prop_assert_eq!(report.writes + report.reads, num_cycles);
            prop_assert_eq!(sim.peeks_of(Signal::OutHit) as u64, num_cycles);
            prop_assert_eq!(sim.peeks_of(Signal::OutRdData) as u64, report.reads);
        }

        /// Property: random tags never leave the tag space
        #[test]
        fn prop_tags_within_tag_space(
            params in cam_params(),
            seed in any::<u64>()
        ) {
            let config = ScenarioConfig { num_cycles: 64, seed, params, check: false };
            let test = CamRtlTest::new(config).unwrap();
            let mut sim = Traced::new(CamModel::new(params));
            test.run(&mut sim).unwrap();

            let space = params.tag_space();
            for t in sim.pokes_of(Signal::InTag) {
                prop_assert!(t < space, "tag {} outside space {}", t, space);
            }
        }

        /// Property: a checked run against the model itself never mismatches
        #[test]
        fn prop_model_agrees_with_itself(
            params in cam_params(),
            seed in any::<u64>(),
            num_cycles in 0u64..200
        ) {
            let config = ScenarioConfig { num_cycles, seed, params, check: true };
            let test = CamRtlTest::new(config).unwrap();
            let mut sim = CamModel::new(params);
            let report = test.run(&mut sim).unwrap();
            prop_assert!(report.passed());
        }

        /// Property: reads return the last value written to a tag
        #[test]
        fn prop_last_write_wins(
            t in tag(),
            values in prop::collection::vec(data_value(), 1..8)
        ) {
            let mut helper = CamPropertyHelper::new(CamParams::default());
            for &v in &values {
                helper.write(t, v);
            }
            let (hit, rd_data) = helper.read(t);
            prop_assert_eq!(hit, 1);
            prop_assert_eq!(rd_data, *values.last().unwrap());
            prop_assert_eq!(helper.cam.occupancy(), 1);
        }

        /// Property: reset always empties the CAM
        #[test]
        fn prop_reset_clears_all_entries(
            writes in prop::collection::vec((tag(), data_value()), 0..40)
        ) {
            let mut helper = CamPropertyHelper::new(CamParams::default());
            for &(t, v) in &writes {
                helper.write(t, v);
            }
            helper.cam.target_reset().unwrap();
            prop_assert_eq!(helper.cam.occupancy(), 0);
            for &(t, _) in &writes {
                prop_assert_eq!(helper.read(t), (0, 0));
            }
        }

        /// Property: the CAM never holds more entries than its depth
        #[test]
        fn prop_occupancy_bounded_by_depth(
            depth in 1usize..8,
            tags in prop::collection::vec(0u64..16, 0..64)
        ) {
            let params = CamParams { depth, tag_width: 4, data_width: 8 };
            let mut helper = CamPropertyHelper::new(params);
            for (i, &t) in tags.iter().enumerate() {
                helper.write(t, i as u64 & 0xFF);
                prop_assert!(helper.cam.occupancy() <= depth);
            }
        }

        /// Property: decimal cycle counts parse exactly, trailing junk ignored
        #[test]
        fn prop_cycle_count_parses_decimal_prefix(
            n in any::<u64>(),
            junk in "[a-z ]{0,5}"
        ) {
            prop_assert_eq!(parse_cycle_count(&format!("{}{}", n, junk)), n);
            prop_assert_eq!(parse_cycle_count(&format!("  {}", n)), n);
        }
    }
}
