// src/common/response/code.rs

/// Meaning of the first byte of every reply.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResponseCode {
    /// `1`: command accepted, payload valid.
    Success,
    /// `2`: the chip did not understand the command.
    SyntaxError,
    /// `254`: still processing; the read came too early.
    StillProcessing,
    /// `255`: nothing to send back.
    NoData,
    /// `0`: the reply buffer has not been filled yet.
    NotReady,
    /// Anything else, usually line noise.
    Unknown(u8),
}

impl ResponseCode {
    pub const SUCCESS: u8 = 1;
    pub const SYNTAX_ERROR: u8 = 2;
    pub const STILL_PROCESSING: u8 = 254;
    pub const NO_DATA: u8 = 255;
    pub const NOT_READY: u8 = 0;

    pub fn is_success(&self) -> bool {
        *self == ResponseCode::Success
    }

    /// Whether waiting longer before reading again might help.
    pub fn is_transient(&self) -> bool {
        matches!(self, ResponseCode::StillProcessing | ResponseCode::NotReady)
    }
}

impl From<u8> for ResponseCode {
    fn from(value: u8) -> Self {
        match value {
            Self::SUCCESS => ResponseCode::Success,
            Self::SYNTAX_ERROR => ResponseCode::SyntaxError,
            Self::STILL_PROCESSING => ResponseCode::StillProcessing,
            Self::NO_DATA => ResponseCode::NoData,
            Self::NOT_READY => ResponseCode::NotReady,
            other => ResponseCode::Unknown(other),
        }
    }
}

impl From<ResponseCode> for u8 {
    fn from(value: ResponseCode) -> Self {
        match value {
            ResponseCode::Success => ResponseCode::SUCCESS,
            ResponseCode::SyntaxError => ResponseCode::SYNTAX_ERROR,
            ResponseCode::StillProcessing => ResponseCode::STILL_PROCESSING,
            ResponseCode::NoData => ResponseCode::NO_DATA,
            ResponseCode::NotReady => ResponseCode::NOT_READY,
            ResponseCode::Unknown(raw) => raw,
        }
    }
}
