// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Protocol / APDU definitions for Ethereum token metadata provisioning
//!
//! This module provides the wire definitions for the two-step trusted metadata
//! exchange supported by the Ethereum hardware wallet application:
//!
//! 1. [`LoadCertificate`][pki::LoadCertificate] delivers a PKI certificate
//!    (TLV encoded, see [pki]) signed by a device trust anchor.
//! 2. [`ProvideTokenInfo`][token::ProvideTokenInfo] delivers an ERC-20 token
//!    descriptor signed under the key carried by the loaded certificate.
//!
//! Unlike the transaction protocols these encodings are fixed by the device
//! firmware, so integers are big-endian and the certificate load shares the
//! OS-level PKI class rather than the application class.
//!
//! Every command completes with a single [`StatusWord`][status::StatusWord].

#![no_std]

pub use ledger_proto::{ApduError, ApduStatic};

pub mod header;
pub mod pki;
pub mod prelude;
pub mod status;
pub mod tlv;
pub mod token;

mod helpers;

/// Ethereum application APDU class
pub const ETH_APDU_CLA: u8 = 0xe0;

/// OS-level PKI APDU class, used for certificate loading
pub const PKI_APDU_CLA: u8 = 0xb0;

/// Maximum APDU payload length (single Lc byte)
pub const MAX_APDU_DATA: usize = 255;

/// Provisioning APDU instruction codes
#[derive(Copy, Clone, Debug, PartialEq, strum::Display, strum::EnumIter)]
#[repr(u8)]
pub enum Instruction {
    /// Load a PKI certificate (class [`PKI_APDU_CLA`])
    LoadCertificate = 0x06,

    /// Provide ERC-20 token information (class [`ETH_APDU_CLA`])
    ProvideErc20TokenInfo = 0x0a,
}

impl Instruction {
    /// Resolve a class / instruction pair to a known [`Instruction`]
    pub const fn from_header(cla: u8, ins: u8) -> Option<Self> {
        match (cla, ins) {
            (PKI_APDU_CLA, 0x06) => Some(Instruction::LoadCertificate),
            (ETH_APDU_CLA, 0x0a) => Some(Instruction::ProvideErc20TokenInfo),
            _ => None,
        }
    }

    /// Fetch the class byte for an [`Instruction`]
    pub const fn cla(&self) -> u8 {
        match self {
            Instruction::LoadCertificate => PKI_APDU_CLA,
            Instruction::ProvideErc20TokenInfo => ETH_APDU_CLA,
        }
    }
}

/// Check whether a class byte belongs to the provisioning protocol
pub const fn is_known_cla(cla: u8) -> bool {
    matches!(cla, ETH_APDU_CLA | PKI_APDU_CLA)
}
