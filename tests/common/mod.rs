//! Simulated E07-400MM behind an SPI device
//!
//! The simulation decodes CC1101 header bytes, keeps a configuration register
//! file, a RX FIFO and the main state, and records every bus access and delay
//! in one ordered event log. Accesses the clone does not support are counted
//! as violations instead of failing, so tests can assert they never happen.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use e07_400mm::{Cc1101, Device, E07400mm, TransferCounter};
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};

pub const SRES: u8 = 0x30;
pub const SRX: u8 = 0x34;
pub const SIDLE: u8 = 0x36;
pub const SFRX: u8 = 0x3A;

pub const PKTCTRL1: u8 = 0x07;
pub const PKTCTRL0: u8 = 0x08;
pub const FREQ2: u8 = 0x0D;
pub const MDMCFG2: u8 = 0x12;
pub const LQI: u8 = 0x33;
pub const RSSI: u8 = 0x34;
pub const FIFO: u8 = 0x3F;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Rx,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ReadSingle(u8),
    WriteSingle(u8, u8),
    ReadBurst(u8, usize),
    WriteBurst(u8, Vec<u8>),
    Strobe(u8),
    DelayUs(u32),
}

pub struct Chip {
    pub config: [u8; 0x2F],
    pub fifo: VecDeque<u8>,
    pub state: State,
    pub part: u8,
    pub version: u8,
    pub rssi_default: u8,
    pub rssi_by_word: HashMap<u32, u8>,
    pub events: Vec<Event>,
    /// Single-byte reads of status or FIFO addresses
    pub violations: usize,
    /// RSSI reads while not in RX, or in RX entered before the last retune
    pub stale_rssi_reads: usize,
    /// SFRX strobes issued outside IDLE
    pub invalid_flushes: usize,
    pub fail_bus: bool,
    rx_since_tune: bool,
}

impl Chip {
    fn new() -> Self {
        let mut chip = Self {
            config: [0; 0x2F],
            fifo: VecDeque::new(),
            state: State::Idle,
            part: 0x00,
            version: 0x00,
            rssi_default: 0x80,
            rssi_by_word: HashMap::new(),
            events: Vec::new(),
            violations: 0,
            stale_rssi_reads: 0,
            invalid_flushes: 0,
            fail_bus: false,
            rx_since_tune: false,
        };
        chip.reset();
        chip
    }

    fn reset(&mut self) {
        self.config = [0; 0x2F];
        self.config[PKTCTRL1 as usize] = 0x04;
        self.config[PKTCTRL0 as usize] = 0x45;
        self.config[MDMCFG2 as usize] = 0x02;
        self.fifo.clear();
        self.state = State::Idle;
    }

    pub fn frequency_word(&self) -> u32 {
        let base = FREQ2 as usize;
        u32::from(self.config[base]) << 16
            | u32::from(self.config[base + 1]) << 8
            | u32::from(self.config[base + 2])
    }

    /// Appends a packet in the layout of the packet engine.
    pub fn queue_packet(&mut self, payload: &[u8], rssi: u8, lqi_crc: u8) {
        self.fifo.push_back(payload.len() as u8);
        self.fifo.extend(payload.iter().copied());
        self.fifo.push_back(rssi);
        self.fifo.push_back(lqi_crc);
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn strobe(&mut self, command: u8) {
        self.events.push(Event::Strobe(command));
        match command {
            SRES => self.reset(),
            SRX => {
                self.state = State::Rx;
                self.rx_since_tune = true;
            }
            SIDLE => self.state = State::Idle,
            SFRX => {
                if self.state == State::Idle {
                    self.fifo.clear();
                } else {
                    self.invalid_flushes += 1;
                }
            }
            _ => {}
        }
    }

    fn write(&mut self, address: u8, burst: bool, data: &[u8]) {
        if burst {
            self.events.push(Event::WriteBurst(address, data.to_vec()));
        } else {
            self.events.push(Event::WriteSingle(address, data[0]));
        }
        let count = if burst { data.len() } else { 1 };
        for (offset, value) in data.iter().take(count).enumerate() {
            let register = address as usize + offset;
            if register < self.config.len() {
                self.config[register] = *value;
            }
            if (FREQ2 as usize..FREQ2 as usize + 3).contains(&register) {
                self.rx_since_tune = false;
            }
        }
    }

    fn read(&mut self, address: u8, burst: bool, buf: &mut [u8]) {
        if burst {
            self.events.push(Event::ReadBurst(address, buf.len()));
        } else {
            self.events.push(Event::ReadSingle(address));
        }

        match address {
            0x00..=0x2E => {
                let count = if burst { buf.len() } else { 1 };
                for (offset, byte) in buf.iter_mut().take(count).enumerate() {
                    *byte = self
                        .config
                        .get(address as usize + offset)
                        .copied()
                        .unwrap_or(0);
                }
            }
            0x30..=0x3D if !burst => {
                self.violations += 1;
                buf.fill(0);
            }
            0x30..=0x3D => {
                let value = match address {
                    0x30 => self.part,
                    0x31 => self.version,
                    RSSI => {
                        if self.state != State::Rx || !self.rx_since_tune {
                            self.stale_rssi_reads += 1;
                        }
                        let word = self.frequency_word();
                        self.rssi_by_word
                            .get(&word)
                            .copied()
                            .unwrap_or(self.rssi_default)
                    }
                    _ => 0,
                };
                buf.fill(value);
            }
            FIFO if !burst => {
                self.violations += 1;
                buf.fill(0xFF);
            }
            FIFO => {
                for byte in buf.iter_mut() {
                    *byte = self.fifo.pop_front().unwrap_or(0);
                }
            }
            _ => buf.fill(0),
        }
    }
}

pub type Shared = Rc<RefCell<Chip>>;

pub struct SimSpi(pub Shared);

impl ErrorType for SimSpi {
    type Error = ErrorKind;
}

impl SpiDevice for SimSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        if chip.fail_bus {
            return Err(ErrorKind::Other);
        }

        let Some((first, rest)) = operations.split_first_mut() else {
            return Ok(());
        };
        let Operation::Write(head) = first else {
            panic!("transaction must start with a header write");
        };
        let header = head[0];
        let address = header & 0x3F;
        let read = header & 0x80 != 0;
        let burst = header & 0x40 != 0;

        if read {
            for op in rest.iter_mut() {
                if let Operation::Read(buf) = op {
                    chip.read(address, burst, buf);
                }
            }
            return Ok(());
        }

        let mut data = head[1..].to_vec();
        for op in rest.iter() {
            if let Operation::Write(bytes) = op {
                data.extend_from_slice(bytes);
            }
        }

        if data.is_empty() {
            chip.strobe(address);
        } else {
            chip.write(address, burst, &data);
        }
        Ok(())
    }
}

pub struct SimDelay(pub Shared);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().events.push(Event::DelayUs(ns / 1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().events.push(Event::DelayUs(us));
    }
}

pub type Base = Cc1101<SimSpi, TransferCounter>;
pub type Radio = E07400mm<Base, SimDelay>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn chip() -> Shared {
    Rc::new(RefCell::new(Chip::new()))
}

pub fn base(chip: &Shared) -> Base {
    Cc1101::new(Device::with_observer(
        SimSpi(chip.clone()),
        TransferCounter::default(),
    ))
}

pub fn radio() -> (Radio, Shared) {
    init_logging();
    let chip = chip();
    let radio = E07400mm::new(base(&chip), SimDelay(chip.clone()));
    (radio, chip)
}

pub fn transfers(radio: &Radio) -> u32 {
    radio.inner().device().observer().transfers
}
