//! Timing and limit settings of the compatibility layer

/// Largest packet length accepted from the FIFO length byte
pub const MAX_PACKET_LENGTH: u8 = 255;

/// Hold time after reconfiguring the packet engine before the next register access
pub const PACKET_MODE_SETTLE_US: u32 = 5_000;

/// Shortest dwell time per scan point; AGC has not settled before this
pub const MIN_DWELL_US: u32 = 500;

/// Longest dwell time per scan point
pub const MAX_DWELL_US: u32 = 50_000;

/// Dwell time used when the caller does not pick one
pub const DEFAULT_DWELL_US: u32 = 3_000;

/// Settings of an [`crate::E07400mm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Packets announcing a longer payload are rejected as malformed
    pub max_packet_length: u8,
    /// Settle delay after [`crate::E07400mm::packet_mode`], in microseconds
    pub packet_mode_settle_us: u32,
    /// Dwell time used by [`crate::E07400mm::scan_rssi_default`], in microseconds
    pub default_dwell_us: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_packet_length: MAX_PACKET_LENGTH,
            packet_mode_settle_us: PACKET_MODE_SETTLE_US,
            default_dwell_us: DEFAULT_DWELL_US,
        }
    }
}

/// Clamps a requested dwell time to the range the AGC needs.
pub fn clamp_dwell_us(dwell_us: u32) -> u32 {
    dwell_us.clamp(MIN_DWELL_US, MAX_DWELL_US)
}
