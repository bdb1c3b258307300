//! RSSI spectrum scanning
//!
//! A scan tunes the radio to evenly spaced frequencies around a centre,
//! enters RX at each one, waits for the AGC to settle and samples the RSSI
//! register directly. It measures power only: the packet engine and its
//! length cache are not involved, and the radio is back in IDLE with an
//! empty RX FIFO when the scan returns.
//!
//! # Important Notes
//! - Tuning forces the radio to IDLE, so RX is re-entered at every point
//! - The dwell time is clamped to 500..=50000 µs
//! - A point whose frequency cannot be tuned reads [`INVALID_RSSI`] and the
//!   scan continues

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::commands::{Sfrx, Srx};
use crate::config::clamp_dwell_us;
use crate::driver::Transceiver;
use crate::quirks::E07400mm;
use crate::rssi::INVALID_RSSI;
use crate::Error;

/// One sample of a scan
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanPoint {
    /// Frequency in MHz
    pub frequency_mhz: f32,
    /// RSSI in dBm, or [`INVALID_RSSI`]
    pub rssi_dbm: f32,
}

impl ScanPoint {
    /// Whether the frequency could be tuned and the RSSI sampled.
    pub fn is_valid(&self) -> bool {
        self.rssi_dbm != INVALID_RSSI
    }
}

/// Parameters of a scan
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanRequest {
    /// Centre frequency in MHz
    pub center_mhz: f32,
    /// Spacing between points in kHz, must be positive
    pub step_khz: f32,
    /// Requested dwell time per point in µs, clamped before use
    pub dwell_us: u32,
}

impl ScanRequest {
    /// Frequency of point `index` out of `count`.
    ///
    /// Points are in ascending order with point `count / 2` on the centre.
    pub fn frequency_mhz(&self, index: usize, count: usize) -> f32 {
        let offset = index as f32 - (count / 2) as f32;
        self.center_mhz + offset * (self.step_khz / 1000.0)
    }

    fn is_valid(&self) -> bool {
        self.center_mhz.is_finite() && self.step_khz.is_finite() && self.step_khz > 0.0
    }
}

impl<T, D> E07400mm<T, D>
where
    T: Transceiver,
    D: DelayNs,
{
    /// Scans `out.len()` points and stores frequency and RSSI of each.
    ///
    /// # Errors
    /// * `Error::InvalidParameters` - `out` is empty, the centre is not finite
    ///   or the step is not a finite positive value. Nothing is sent to the radio.
    /// * `Error::Bus` - SPI communication failed. The radio is still sent to IDLE.
    pub fn scan(&mut self, out: &mut [ScanPoint], request: ScanRequest) -> Result<(), Error> {
        self.sweep(out.len(), request, |index, frequency_mhz, rssi_dbm| {
            out[index] = ScanPoint {
                frequency_mhz,
                rssi_dbm,
            };
        })
    }

    /// Scans `out.len()` points around `center_mhz` and stores the RSSI of each in dBm.
    ///
    /// See [`scan`](Self::scan).
    pub fn scan_rssi(
        &mut self,
        out: &mut [f32],
        center_mhz: f32,
        step_khz: f32,
        dwell_us: u32,
    ) -> Result<(), Error> {
        let request = ScanRequest {
            center_mhz,
            step_khz,
            dwell_us,
        };
        self.sweep(out.len(), request, |index, _, rssi_dbm| out[index] = rssi_dbm)
    }

    /// [`scan_rssi`](Self::scan_rssi) with [`Settings::default_dwell_us`](crate::Settings::default_dwell_us).
    pub fn scan_rssi_default(
        &mut self,
        out: &mut [f32],
        center_mhz: f32,
        step_khz: f32,
    ) -> Result<(), Error> {
        let dwell_us = self.settings.default_dwell_us;
        self.scan_rssi(out, center_mhz, step_khz, dwell_us)
    }

    fn sweep<F>(&mut self, count: usize, request: ScanRequest, mut record: F) -> Result<(), Error>
    where
        F: FnMut(usize, f32, f32),
    {
        if count == 0 || !request.is_valid() {
            return Err(Error::InvalidParameters);
        }

        let dwell_us = clamp_dwell_us(request.dwell_us);
        debug!(
            "scanning {} points around {} MHz, step {} kHz, dwell {} us",
            count, request.center_mhz, request.step_khz, dwell_us
        );

        let mut result = Ok(());
        for index in 0..count {
            let frequency = request.frequency_mhz(index, count);
            if let Err(err) = self.radio.set_frequency(frequency) {
                warn!("cannot tune {} MHz ({:?}), skipping", frequency, err);
                record(index, frequency, INVALID_RSSI);
                continue;
            }
            match self.sample(dwell_us) {
                Ok(rssi) => record(index, frequency, rssi),
                Err(err) => {
                    result = Err(err);
                    break;
                }
            }
        }

        let finished = self.finish_scan();
        result.and(finished)
    }

    fn sample(&mut self, dwell_us: u32) -> Result<f32, Error> {
        self.radio.send_command(Srx)?;
        self.delay.delay_us(dwell_us);
        self.get_rssi()
    }

    fn finish_scan(&mut self) -> Result<(), Error> {
        self.packet_length = None;
        self.radio.standby()?;
        self.radio.send_command(Sfrx)
    }
}
