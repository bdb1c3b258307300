//! Main radio control state machine strobes

use crate::{Command, NoParameters};

/// SRES command strobe (0x30)
///
/// Resets the chip. All configuration registers return to their reset values.
#[derive(Debug, Clone)]
pub struct Sres;

impl Command for Sres {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x30
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SRX command strobe (0x34)
///
/// Enables RX. Performs calibration first if coming from IDLE and
/// MCSM0.FS_AUTOCAL is set.
#[derive(Debug, Clone)]
pub struct Srx;

impl Command for Srx {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x34
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SIDLE command strobe (0x36)
///
/// Exits RX/TX and turns off the frequency synthesizer. This is the standby
/// state used for configuration.
#[derive(Debug, Clone)]
pub struct Sidle;

impl Command for Sidle {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x36
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SFRX command strobe (0x3A)
///
/// Flushes the RX FIFO.
///
/// # Important Notes
/// - Only issue in IDLE or RXFIFO_OVERFLOW state
#[derive(Debug, Clone)]
pub struct Sfrx;

impl Command for Sfrx {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x3A
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}
