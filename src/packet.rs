//! Packet reassembly from the RX FIFO
//!
//! In variable length mode with status appending enabled, the chip stores a
//! received packet in the RX FIFO as:
//!
//! ```text
//! | length | payload (length bytes) | RSSI | CRC_OK:1 LQI:7 |
//! ```
//!
//! Every byte is read through the FIFO in burst mode, in exactly this order.

use embedded_hal::delay::DelayNs;
use log::{debug, warn};
use regiface::FromByteArray;

use crate::address::BurstAddress;
use crate::driver::Transceiver;
use crate::quirks::E07400mm;
use crate::registers::Lqi;
use crate::Error;

const DRAIN_CHUNK: usize = 16;

/// Outcome of one FIFO read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacketRecord {
    /// Payload length announced by the packet
    pub length: u8,
    /// Payload bytes copied to the caller's buffer
    pub written: usize,
    /// RSSI status byte appended by the packet engine
    pub raw_rssi: u8,
    /// Link quality indicator, low 7 bits of the second status byte
    pub raw_lqi: u8,
    /// CRC flag, top bit of the second status byte
    pub crc_ok: bool,
}

impl PacketRecord {
    /// RSSI of the packet in dBm
    pub fn rssi_dbm(&self) -> f32 {
        crate::rssi::raw_to_dbm(self.raw_rssi)
    }
}

impl<T, D> E07400mm<T, D>
where
    T: Transceiver,
    D: DelayNs,
{
    /// Returns the length byte at the head of the RX FIFO.
    ///
    /// With `update == false` a length cached by an earlier call in the same
    /// receive cycle is returned without touching the bus. Otherwise exactly
    /// one burst read of the FIFO is issued and its result cached.
    ///
    /// The returned length is not validated.
    pub fn get_packet_length(&mut self, update: bool) -> Result<u8, Error> {
        if !update {
            if let Some(length) = self.packet_length {
                return Ok(length);
            }
        }

        let mut length = [0u8];
        self.radio.read_register_burst(BurstAddress::FIFO, &mut length)?;
        self.packet_length = Some(length[0]);

        Ok(length[0])
    }

    /// Reads the received packet into `buf` and re-arms the receiver.
    ///
    /// At most `buf.len()` payload bytes are copied; the rest of a longer
    /// payload is discarded so that the status bytes are read from their
    /// place in the FIFO. The receiver is put back into RX on every outcome.
    ///
    /// # Errors
    /// * `Error::InvalidPayload` - The length byte is zero or above
    ///   [`Settings::max_packet_length`](crate::Settings::max_packet_length).
    ///   The RX FIFO is flushed and `buf` is untouched.
    /// * `Error::CrcMismatch` - CRC checking is enabled and the CRC flag is
    ///   clear. The record is still available from [`last_packet`](Self::last_packet).
    /// * `Error::Bus` - SPI communication failed
    pub fn read_data(&mut self, buf: &mut [u8]) -> Result<PacketRecord, Error> {
        self.packet_length = None;
        let length = self.get_packet_length(true)?;

        if length == 0 || length > self.settings.max_packet_length {
            warn!("invalid packet length {}, flushing rx fifo", length);
            self.radio.start_receive()?;
            return Err(Error::InvalidPayload);
        }

        let written = usize::from(length).min(buf.len());
        self.radio
            .read_register_burst(BurstAddress::FIFO, &mut buf[..written])?;
        self.drain_fifo(usize::from(length) - written)?;

        let mut rssi = [0u8];
        self.radio.read_register_burst(BurstAddress::FIFO, &mut rssi)?;
        let mut lqi = [0u8];
        self.radio.read_register_burst(BurstAddress::FIFO, &mut lqi)?;
        let status = Lqi::from_bytes(lqi).unwrap_or_else(|never| match never {});

        let record = PacketRecord {
            length,
            written,
            raw_rssi: rssi[0],
            raw_lqi: status.lqi,
            crc_ok: status.crc_ok,
        };
        self.last_packet = Some(record);

        if !record.crc_ok && self.radio.crc_enabled() {
            warn!("crc mismatch on {} byte packet", length);
            self.radio.start_receive()?;
            return Err(Error::CrcMismatch);
        }

        debug!("received {} byte packet, lqi {}", length, record.raw_lqi);
        self.radio.start_receive()?;

        Ok(record)
    }

    /// Record of the last packet read, including one that failed its CRC check.
    pub fn last_packet(&self) -> Option<&PacketRecord> {
        self.last_packet.as_ref()
    }

    /// Link quality indicator of the last packet.
    pub fn lqi(&self) -> Option<u8> {
        self.last_packet.map(|packet| packet.raw_lqi)
    }

    /// RSSI of the last packet in dBm, as appended by the packet engine.
    pub fn last_packet_rssi(&self) -> Option<f32> {
        self.last_packet.map(|packet| packet.rssi_dbm())
    }

    fn drain_fifo(&mut self, mut remaining: usize) -> Result<(), Error> {
        let mut scratch = [0u8; DRAIN_CHUNK];
        while remaining > 0 {
            let chunk = remaining.min(DRAIN_CHUNK);
            self.radio
                .read_register_burst(BurstAddress::FIFO, &mut scratch[..chunk])?;
            remaining -= chunk;
        }
        Ok(())
    }
}
