// src/common/command.rs

//! EZO pH command definitions and encoding.
//!
//! Operations are translated into wire frames through a [`CommandTable`],
//! which pairs each operation with its command code, delay class and the
//! maximum reply length (status byte included).

use arrayvec::ArrayString;
use core::fmt::{self, Write};

use super::error::ValidationError;
use super::timing::DelayClass;

/// Largest ASCII command the driver emits (`Cal,high,10.00` is 14 bytes).
pub const MAX_COMMAND_LEN: usize = 24;

/// Largest reply the chip produces over I²C, status byte included.
pub const MAX_REPLY_LEN: usize = 40;

/// Reply length for commands answered with a bare status byte.
pub const ACK_REPLY_LEN: usize = 1;

/// Reply length for numeric replies such as a reading or a temperature.
pub const NUMERIC_REPLY_LEN: usize = 16;

/// Reply length for free-form text (info, status, slope).
pub const TEXT_REPLY_LEN: usize = MAX_REPLY_LEN;

/// The chip needs no terminator after a command over I²C; the frame ends
/// where the write ends.
pub const COMMAND_TERMINATOR: &[u8] = b"";

/// Lowest and highest valid calibration reference (the pH scale).
pub const PH_SCALE_MIN: f32 = 0.0;
pub const PH_SCALE_MAX: f32 = 14.0;

/// A calibration point of the pH curve.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CalibrationPoint {
    Low,
    Mid,
    High,
    Clear,
    Query,
}

impl CalibrationPoint {
    /// Keyword used after `Cal,` on the wire.
    pub const fn keyword(&self) -> &'static str {
        match self {
            CalibrationPoint::Low => "low",
            CalibrationPoint::Mid => "mid",
            CalibrationPoint::High => "high",
            CalibrationPoint::Clear => "clear",
            CalibrationPoint::Query => "?",
        }
    }

    /// Whether applying this point needs a reference pH value.
    pub const fn requires_reference(&self) -> bool {
        matches!(self, CalibrationPoint::Low | CalibrationPoint::Mid | CalibrationPoint::High)
    }

    /// Buffer value usually used for this point, if it has one.
    pub const fn nominal_reference(&self) -> Option<f32> {
        match self {
            CalibrationPoint::Low => Some(4.00),
            CalibrationPoint::Mid => Some(7.00),
            CalibrationPoint::High => Some(10.00),
            CalibrationPoint::Clear | CalibrationPoint::Query => None,
        }
    }
}

/// A request the driver can make of the chip.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Operation {
    Read,
    Calibrate { point: CalibrationPoint, reference: Option<f32> },
    CalibrationQuery,
    Info,
    Status,
    Slope,
    Find,
    Led { on: bool },
    Sleep,
    Temperature,
    Compensate { celsius: f32 },
}

/// How a command's code is put on the wire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Code {
    /// A single command byte.
    Byte(u8),
    /// An ASCII keyword, possibly followed by `,argument`.
    Keyword(&'static str),
}

/// One row of the command table.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CommandDef {
    pub code: Code,
    pub delay: DelayClass,
    pub reply_len: usize,
}

impl CommandDef {
    const fn new(code: Code, delay: DelayClass, reply_len: usize) -> Self {
        Self { code, delay, reply_len }
    }
}

/// Bytes written to the bus for one command.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Wire {
    Byte(u8),
    Ascii(ArrayString<MAX_COMMAND_LEN>),
}

impl Wire {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Wire::Byte(code) => core::slice::from_ref(code),
            Wire::Ascii(text) => text.as_bytes(),
        }
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wire::Byte(code) => write!(f, "{}", *code as char),
            Wire::Ascii(text) => f.write_str(text),
        }
    }
}

/// A fully encoded command, ready to send.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Command {
    pub wire: Wire,
    pub delay: DelayClass,
    pub reply_len: usize,
}

/// Maps operations to wire codes, delay classes and reply lengths.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CommandTable {
    pub read: CommandDef,
    pub temperature: CommandDef,
    pub info: CommandDef,
    pub calibrate: CommandDef,
    pub calibration_query: CommandDef,
    pub status: CommandDef,
    pub slope: CommandDef,
    pub find: CommandDef,
    pub led: CommandDef,
    pub sleep: CommandDef,
    pub compensate: CommandDef,
}

impl CommandTable {
    pub const fn new() -> Self {
        use DelayClass::{Processing, Settle};
        Self {
            read: CommandDef::new(Code::Byte(b'R'), Processing, NUMERIC_REPLY_LEN),
            temperature: CommandDef::new(Code::Byte(b'T'), Processing, NUMERIC_REPLY_LEN),
            info: CommandDef::new(Code::Byte(b'i'), Settle, TEXT_REPLY_LEN),
            calibrate: CommandDef::new(Code::Keyword("Cal"), Settle, ACK_REPLY_LEN),
            calibration_query: CommandDef::new(Code::Keyword("Cal,?"), Settle, NUMERIC_REPLY_LEN),
            status: CommandDef::new(Code::Keyword("Status"), Settle, TEXT_REPLY_LEN),
            slope: CommandDef::new(Code::Keyword("Slope,?"), Settle, TEXT_REPLY_LEN),
            find: CommandDef::new(Code::Keyword("Find"), Settle, ACK_REPLY_LEN),
            led: CommandDef::new(Code::Keyword("L"), Settle, ACK_REPLY_LEN),
            sleep: CommandDef::new(Code::Keyword("Sleep"), Settle, ACK_REPLY_LEN),
            compensate: CommandDef::new(Code::Keyword("T"), Settle, ACK_REPLY_LEN),
        }
    }

    /// Validates `op` and builds its frame. Nothing here touches the bus.
    pub fn encode(&self, op: &Operation) -> Result<Command, ValidationError> {
        match *op {
            Operation::Read => self.read.bare(),
            Operation::Temperature => self.temperature.bare(),
            Operation::Info => self.info.bare(),
            Operation::CalibrationQuery => self.calibration_query.bare(),
            Operation::Status => self.status.bare(),
            Operation::Slope => self.slope.bare(),
            Operation::Find => self.find.bare(),
            Operation::Sleep => self.sleep.bare(),
            Operation::Led { on } => self.led.with_arg(format_args!("{}", on as u8)),
            Operation::Calibrate { point, reference } => self.encode_calibration(point, reference),
            Operation::Compensate { celsius } => {
                if !celsius.is_finite() {
                    return Err(ValidationError::NonFiniteTemperature(celsius));
                }
                self.compensate.with_arg(format_args!("{:.2}", celsius))
            }
        }
    }

    fn encode_calibration(
        &self,
        point: CalibrationPoint,
        reference: Option<f32>,
    ) -> Result<Command, ValidationError> {
        match (point, reference) {
            (CalibrationPoint::Query, _) => Err(ValidationError::NotApplicable(point)),
            (CalibrationPoint::Clear, Some(_)) => Err(ValidationError::UnexpectedReference(point)),
            (CalibrationPoint::Clear, None) => self.calibrate.with_arg(format_args!("clear")),
            (_, None) => Err(ValidationError::MissingReference(point)),
            (_, Some(value)) => {
                // NaN fails both comparisons.
                if !(value >= PH_SCALE_MIN && value <= PH_SCALE_MAX) {
                    return Err(ValidationError::ReferenceOutOfRange(value));
                }
                self.calibrate
                    .with_arg(format_args!("{},{:.2}", point.keyword(), value))
            }
        }
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDef {
    fn bare(&self) -> Result<Command, ValidationError> {
        let wire = match self.code {
            Code::Byte(code) => Wire::Byte(code),
            Code::Keyword(keyword) => {
                let mut text = ArrayString::new();
                text.try_push_str(keyword)
                    .map_err(|_| ValidationError::CommandTooLong)?;
                Wire::Ascii(text)
            }
        };
        Ok(self.command(wire))
    }

    fn with_arg(&self, arg: fmt::Arguments<'_>) -> Result<Command, ValidationError> {
        let keyword = match self.code {
            Code::Keyword(keyword) => keyword,
            // Byte commands carry no argument payload.
            Code::Byte(_) => return Err(ValidationError::CommandTooLong),
        };
        let mut text = ArrayString::<MAX_COMMAND_LEN>::new();
        write!(text, "{},{}", keyword, arg).map_err(|_| ValidationError::CommandTooLong)?;
        Ok(self.command(Wire::Ascii(text)))
    }

    fn command(&self, wire: Wire) -> Command {
        Command { wire, delay: self.delay, reply_len: self.reply_len }
    }
}
