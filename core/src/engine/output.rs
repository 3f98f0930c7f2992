// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::Encode;

use ledger_proto::ApduError;

use crate::apdu::token::TokenSlot;

/// [`Engine`][super::Engine] outputs (in response to events), encoded to response [APDUs][crate::apdu]
#[derive(Clone, PartialEq, Debug)]
pub enum Output {
    /// Command completed with no response data
    None,

    /// Token descriptor registered
    TokenSlot {
        /// Registry slot holding the descriptor
        index: u8,
    },
}

impl Output {
    /// Encode an [`Output`] object to response APDU data
    /// (excluding the status word)
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        match self {
            Output::None => Ok(0),
            Output::TokenSlot { index } => TokenSlot { index: *index }.encode(buff),
        }
    }
}
