// Copyright (c) 2022-2023 The MobileCoin Foundation

//! PKI certificate APDUs and field definitions
//!
//! Certificates are a flat sequence of [TLV][crate::tlv] entries, the
//! issuer signature is computed over every byte preceding the
//! [`CertTag::Signature`] entry, which must be the final entry.
//!
//! ```text
//! STRUCTURE_TYPE | VERSION | ... fields ... | SIGNATURE
//! ```

use encdec::Encode;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter};

use super::{ApduError, ApduStatic, Instruction, PKI_APDU_CLA};

/// Certificate structure type for PKI certificates
pub const CERT_STRUCTURE_TYPE: u8 = 0x01;

/// Supported certificate structure version
pub const CERT_VERSION: u8 = 0x02;

/// Compressed SEC1 public key length
pub const COMPRESSED_KEY_LEN: usize = 33;

/// Maximum trusted name length
pub const MAX_TRUSTED_NAME_LEN: usize = 32;

/// Maximum challenge length
pub const MAX_CHALLENGE_LEN: usize = 32;

/// Certificate TLV tags
#[derive(Copy, Clone, PartialEq, Debug, Display, EnumIter, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum CertTag {
    StructureType = 0x01,
    Version = 0x02,
    Validity = 0x10,
    ValidityIndex = 0x11,
    Challenge = 0x12,
    SignerKeyId = 0x13,
    SignerAlgo = 0x14,
    Signature = 0x15,
    TimeValidity = 0x16,
    TrustedName = 0x20,
    PublicKeyId = 0x30,
    PublicKeyUsage = 0x31,
    PublicKeyCurve = 0x32,
    PublicKey = 0x33,
    PublicKeySignAlgo = 0x34,
    TargetDevice = 0x35,
    Depth = 0x36,
}

impl CertTag {
    /// Tags that must be present in every certificate
    pub const MANDATORY: &'static [CertTag] = &[
        CertTag::StructureType,
        CertTag::Version,
        CertTag::SignerKeyId,
        CertTag::SignerAlgo,
        CertTag::Signature,
        CertTag::TrustedName,
        CertTag::PublicKeyUsage,
        CertTag::PublicKeyCurve,
        CertTag::PublicKey,
        CertTag::PublicKeySignAlgo,
    ];

    /// Bit index for duplicate / presence tracking
    pub const fn bit(&self) -> u32 {
        match self {
            CertTag::StructureType => 0,
            CertTag::Version => 1,
            CertTag::Validity => 2,
            CertTag::ValidityIndex => 3,
            CertTag::Challenge => 4,
            CertTag::SignerKeyId => 5,
            CertTag::SignerAlgo => 6,
            CertTag::Signature => 7,
            CertTag::TimeValidity => 8,
            CertTag::TrustedName => 9,
            CertTag::PublicKeyId => 10,
            CertTag::PublicKeyUsage => 11,
            CertTag::PublicKeyCurve => 12,
            CertTag::PublicKey => 13,
            CertTag::PublicKeySignAlgo => 14,
            CertTag::TargetDevice => 15,
            CertTag::Depth => 16,
        }
    }
}

/// Certificate public key usage, the permission granted to the
/// certified key
#[derive(Copy, Clone, PartialEq, Debug, Display, EnumIter, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum KeyUsage {
    GenuineCheck = 0x01,
    ExchangePayload = 0x02,
    NftMetadata = 0x03,
    TrustedName = 0x04,
    BackupProvider = 0x05,
    RecoverOrchestrator = 0x06,
    PluginMetadata = 0x07,
    /// Coin / token metadata provisioning
    CoinMeta = 0x08,
    SeedIdAuth = 0x09,
}

/// Elliptic curve identifiers
#[derive(Copy, Clone, PartialEq, Debug, Display, EnumIter, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum CurveId {
    Secp256k1 = 0x21,
}

/// Signature algorithm identifiers
#[derive(Copy, Clone, PartialEq, Debug, Display, EnumIter, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum SignAlgo {
    EcdsaSha256 = 0x01,
    EcdsaSha3_256 = 0x02,
    EcdsaKeccak256 = 0x03,
}

/// Load a PKI certificate, `P1` carries the expected [`KeyUsage`]
///
/// ## Encoding:
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                          CERTIFICATE                          /
/// /                    (TLV, variable length)                     /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LoadCertificate<'a> {
    /// Expected certificate key usage
    pub key_usage: u8,
    /// Encoded certificate
    pub certificate: &'a [u8],
}

impl<'a> LoadCertificate<'a> {
    /// Create a new certificate load APDU
    pub const fn new(key_usage: KeyUsage, certificate: &'a [u8]) -> Self {
        Self {
            key_usage: key_usage as u8,
            certificate,
        }
    }
}

impl<'a> ApduStatic for LoadCertificate<'a> {
    const CLA: u8 = PKI_APDU_CLA;
    const INS: u8 = Instruction::LoadCertificate as u8;

    /// `P1` carries the expected key usage
    fn p1(&self) -> u8 {
        self.key_usage
    }
}

impl<'a> Encode for LoadCertificate<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(self.certificate.len())
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let n = self.certificate.len();
        if buff.len() < n {
            return Err(ApduError::InvalidLength);
        }

        buff[..n].copy_from_slice(self.certificate);

        Ok(n)
    }
}
