//! Structural constants of the CAM under test.

/// Shape of the tag store. These only bound the stimulus; the RTL in
/// `rtl/cam_rtl.sv` is built with the default values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CamParams {
    pub depth: usize,
    pub tag_width: u32,
    pub data_width: u32,
}

impl Default for CamParams {
    fn default() -> Self {
        Self {
            depth: 32,
            tag_width: 10,
            data_width: 32,
        }
    }
}

impl CamParams {
    /// Number of distinct tags the stimulus draws from: `min(depth, 2^tag_width)`.
    pub fn tag_space(&self) -> u64 {
        let tags = 1u64.checked_shl(self.tag_width).unwrap_or(u64::MAX);
        tags.min(self.depth as u64)
    }

    pub fn tag_mask(&self) -> u64 {
        mask(self.tag_width)
    }

    pub fn data_mask(&self) -> u64 {
        mask(self.data_width)
    }
}

/// All-ones value of `width` bits.
pub fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}
