// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Command APDU framing
//!
//! ## Encoding:
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |      CLA      |      INS      |      P1       |      P2       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |      LC       |                                               |
//! +-+-+-+-+-+-+-+-+                                               +
//! /                         DATA (LC bytes)                       /
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use encdec::{Decode, Encode};

use super::{ApduError, MAX_APDU_DATA};

/// Length of the command header including the LC byte
pub const APDU_HEADER_LEN: usize = 5;

/// Decoded command APDU, borrowing the payload from the receive buffer
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Command<'a> {
    /// Class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// First parameter
    pub p1: u8,
    /// Second parameter
    pub p2: u8,
    /// Command payload (`LC` bytes)
    pub data: &'a [u8],
}

impl<'a> Command<'a> {
    /// Create a new command APDU
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8, data: &'a [u8]) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data,
        }
    }

    /// Parse a complete frame, the declared `LC` must match the
    /// remaining frame length exactly
    pub fn parse(buff: &'a [u8]) -> Result<Self, ApduError> {
        let (c, n) = Self::decode(buff)?;

        // Reject trailing bytes beyond the declared payload
        if n != buff.len() {
            return Err(ApduError::InvalidLength);
        }

        Ok(c)
    }
}

impl<'a> Encode for Command<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(APDU_HEADER_LEN + self.data.len())
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if self.data.len() > MAX_APDU_DATA {
            return Err(ApduError::InvalidLength);
        }
        if buff.len() < APDU_HEADER_LEN + self.data.len() {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.cla;
        buff[1] = self.ins;
        buff[2] = self.p1;
        buff[3] = self.p2;
        buff[4] = self.data.len() as u8;
        buff[APDU_HEADER_LEN..][..self.data.len()].copy_from_slice(self.data);

        Ok(APDU_HEADER_LEN + self.data.len())
    }
}

impl<'a> Decode<'a> for Command<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        // Check header length
        if buff.len() < APDU_HEADER_LEN {
            return Err(ApduError::InvalidLength);
        }

        // Check declared payload is available
        let lc = buff[4] as usize;
        if buff.len() < APDU_HEADER_LEN + lc {
            return Err(ApduError::InvalidLength);
        }

        Ok((
            Self {
                cla: buff[0],
                ins: buff[1],
                p1: buff[2],
                p2: buff[3],
                data: &buff[APDU_HEADER_LEN..][..lc],
            },
            APDU_HEADER_LEN + lc,
        ))
    }
}
