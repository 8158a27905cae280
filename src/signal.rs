use std::fmt;

use crate::params::CamParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// Handle for one top-level port of the CAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    InEn,
    InTag,
    InWrData,
    InWr,
    OutRdData,
    OutHit,
}

impl Signal {
    pub const ALL: [Signal; 6] = [
        Signal::InEn,
        Signal::InTag,
        Signal::InWrData,
        Signal::InWr,
        Signal::OutRdData,
        Signal::OutHit,
    ];

    /// Port name in the RTL.
    pub fn port_name(self) -> &'static str {
        match self {
            Signal::InEn => "io_in_en",
            Signal::InTag => "io_in_tag",
            Signal::InWrData => "io_in_wr_data",
            Signal::InWr => "io_in_wr",
            Signal::OutRdData => "io_out_rd_data",
            Signal::OutHit => "io_out_hit",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Signal::OutRdData | Signal::OutHit => Direction::Output,
            _ => Direction::Input,
        }
    }

    pub fn is_input(self) -> bool {
        self.direction() == Direction::Input
    }

    pub fn width(self, params: &CamParams) -> u32 {
        match self {
            Signal::InEn | Signal::InWr | Signal::OutHit => 1,
            Signal::InTag => params.tag_width,
            Signal::InWrData | Signal::OutRdData => params.data_width,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.port_name())
    }
}
