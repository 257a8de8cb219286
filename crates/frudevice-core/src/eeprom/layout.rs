pub const SERIAL_NUMBER_RANGE: std::ops::Range<usize> = 1..17;
pub const PART_NUMBER_RANGE: std::ops::Range<usize> = 109..125;

pub const MAC0_OFFSET: usize = 132;
pub const MAC1_OFFSET: usize = 138;
pub const MAC_ADDRESS_SIZE: usize = 6;

pub const PCA_SERIAL_NUMBER_RANGE: std::ops::Range<usize> = 144..160;
pub const PCA_PART_NUMBER_RANGE: std::ops::Range<usize> = 160..176;

pub const UNKNOWN: &str = "Unknown";
pub const UNKNOWN_MAC: &str = "00:00:00:00:00:00";
