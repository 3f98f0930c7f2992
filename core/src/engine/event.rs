// Copyright (c) 2022-2023 The MobileCoin Foundation

use ledger_eth_meta_apdu::{
    header::Command, is_known_cla, pki::LoadCertificate, token::ProvideTokenInfo, ApduStatic,
    Instruction,
};

use super::Error;

/// [`Engine`][super::Engine] input events, decoded from request [APDUs][crate::apdu]
///
/// Payloads are borrowed and left undecoded so the engine can apply
/// its state checks before any content validation.
#[derive(Clone, PartialEq, Debug)]
pub enum Event<'a> {
    /// Load a PKI certificate
    LoadCertificate {
        /// Expected key usage (P1)
        key_usage: u8,
        /// TLV encoded certificate
        certificate: &'a [u8],
    },

    /// Provide ERC-20 token information
    ProvideTokenInfo {
        /// Token descriptor followed by signature
        payload: &'a [u8],
    },
}

impl<'a> Event<'a> {
    /// Resolve a decoded [`Command`] to an engine event
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn parse(cmd: &Command<'a>) -> Result<Self, Error> {
        let ins = match Instruction::from_header(cmd.cla, cmd.ins) {
            Some(i) => i,
            None if is_known_cla(cmd.cla) => return Err(Error::UnsupportedInstruction),
            None => return Err(Error::UnsupportedClass),
        };

        match ins {
            Instruction::LoadCertificate => {
                debug_assert_eq!(cmd.ins, LoadCertificate::INS);

                // Any key usage is accepted here, usage checks happen at load
                if cmd.p2 != 0x00 {
                    return Err(Error::InvalidParameters);
                }

                Ok(Event::LoadCertificate {
                    key_usage: cmd.p1,
                    certificate: cmd.data,
                })
            }
            Instruction::ProvideErc20TokenInfo => {
                debug_assert_eq!(cmd.ins, ProvideTokenInfo::INS);

                if cmd.p1 != 0x00 || cmd.p2 != 0x00 {
                    return Err(Error::InvalidParameters);
                }

                Ok(Event::ProvideTokenInfo { payload: cmd.data })
            }
        }
    }

    /// Response data length produced on success, checked before
    /// the event is applied
    pub const fn response_len(&self) -> usize {
        match self {
            Event::LoadCertificate { .. } => 0,
            // Registry slot index
            Event::ProvideTokenInfo { .. } => 1,
        }
    }
}
