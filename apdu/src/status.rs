// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Command completion status words
//!

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter};

/// Status word returned on completion of every command.
///
/// This is the only success / failure channel to the host, so distinct
/// failure causes may share a status.
#[derive(Copy, Clone, PartialEq, Debug, Display, EnumIter, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum StatusWord {
    /// Command completed successfully
    Ok = 0x9000,

    /// Frame length inconsistent with the declared payload
    WrongLength = 0x6700,

    /// Security conditions not satisfied (certificate lacks permission)
    NotAuthorized = 0x6982,

    /// Invalid data (malformed payload / signature / missing trust)
    InvalidData = 0x6a80,

    /// Unsupported structure or version
    Unsupported = 0x6a81,

    /// Invalid P1 or P2
    InvalidP1P2 = 0x6b00,

    /// Instruction not supported
    InsNotSupported = 0x6d00,

    /// Class not supported
    ClaNotSupported = 0x6e00,

    /// Internal failure (response encoding)
    Internal = 0x6f00,
}

impl StatusWord {
    /// Check whether the status word indicates success
    pub const fn is_ok(&self) -> bool {
        matches!(self, StatusWord::Ok)
    }

    /// Encode status word to SW1 / SW2 bytes
    pub const fn to_bytes(self) -> [u8; 2] {
        (self as u16).to_be_bytes()
    }

    /// Decode status word from the trailing two bytes of a response
    pub fn from_response(resp: &[u8]) -> Option<Self> {
        if resp.len() < 2 {
            return None;
        }

        let sw = u16::from_be_bytes([resp[resp.len() - 2], resp[resp.len() - 1]]);
        Self::try_from(sw).ok()
    }
}
