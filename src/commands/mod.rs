//! Command strobes
//!
//! A command strobe is a single header byte in the 0x30-0x3D range sent
//! without the burst bit. It changes the state of the radio's main state
//! machine and carries no parameters.
//!
//! # Important Notes
//! - Changing frequency forces the radio to IDLE; RX must be re-entered
//!   explicitly with [`Srx`]
//! - [`Sfrx`] is only valid in IDLE or RX FIFO overflow state
//! - The same addresses read in burst mode are the status registers

mod strobes;

pub use strobes::*;
