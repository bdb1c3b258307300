//! RSSI conversion

/// Offset of the CC1101 RSSI reading in dBm
pub const RSSI_OFFSET_DBM: f32 = 74.0;

/// Value recorded for scan points whose frequency could not be set
pub const INVALID_RSSI: f32 = -999.0;

/// Converts a raw RSSI byte to dBm.
///
/// The raw value is a two's complement number in 0.5 dB steps.
pub fn raw_to_dbm(raw: u8) -> f32 {
    if raw >= 128 {
        (raw as f32 - 256.0) / 2.0 - RSSI_OFFSET_DBM
    } else {
        raw as f32 / 2.0 - RSSI_OFFSET_DBM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_table() {
        for raw in 0..=255u8 {
            let r = raw as f32;
            let expected = if raw >= 128 {
                (r - 256.0) / 2.0 - 74.0
            } else {
                r / 2.0 - 74.0
            };
            assert_eq!(raw_to_dbm(raw), expected, "raw = {raw}");
        }
    }

    #[test]
    fn boundaries() {
        assert_eq!(raw_to_dbm(0), -74.0);
        assert_eq!(raw_to_dbm(127), -10.5);
        assert_eq!(raw_to_dbm(128), -138.0);
        assert_eq!(raw_to_dbm(255), -74.5);
    }
}
