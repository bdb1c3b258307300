//! Register definitions for the CC1101 and the E07-400MM clone
//!
//! Only the registers the compatibility layer touches are defined here.
//! Every typed register carries a marker for the access mode the clone
//! requires, and the typed accessors in [`crate::Device`] and
//! [`crate::Transceiver`] only accept registers with the matching marker.

mod modem;
mod packet;
mod status;

pub use modem::*;
pub use packet::*;
pub use status::*;

/// Marker for configuration registers (0x00-0x2E) that accept single-byte access
pub trait SingleAccess {}

/// Marker for status registers (0x30-0x3D) that must be read in burst mode
pub trait BurstOnly {}
