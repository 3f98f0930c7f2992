// Copyright (c) 2022-2023 The MobileCoin Foundation

use ledger_eth_meta_apdu::{status::StatusWord, ApduError};

/// [Engine][super::Engine] errors
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
#[repr(u8)]
pub enum Error {
    /// Frame shorter than a header or inconsistent with the declared length
    #[cfg_attr(feature = "thiserror", error("Malformed APDU frame"))]
    MalformedFrame = 0x00,

    /// Class byte not supported
    #[cfg_attr(feature = "thiserror", error("Unsupported class"))]
    UnsupportedClass = 0x01,

    /// Instruction not supported for a known class
    #[cfg_attr(feature = "thiserror", error("Unsupported instruction"))]
    UnsupportedInstruction = 0x02,

    /// Unexpected P1 / P2 for a known instruction
    #[cfg_attr(feature = "thiserror", error("Invalid P1 / P2"))]
    InvalidParameters = 0x03,

    /// Certificate TLV structure invalid
    #[cfg_attr(feature = "thiserror", error("malformed certificate"))]
    MalformedCertificate = 0x04,

    /// Certificate structure version not supported
    #[cfg_attr(feature = "thiserror", error("unsupported certificate version"))]
    UnsupportedVersion = 0x05,

    /// Signature malformed, issuer unknown, or verification failed
    #[cfg_attr(feature = "thiserror", error("invalid signature"))]
    InvalidSignature = 0x06,

    /// Metadata provided before any certificate was accepted
    #[cfg_attr(feature = "thiserror", error("no certificate loaded"))]
    NoCertificateLoaded = 0x07,

    /// Token descriptor payload invalid
    #[cfg_attr(feature = "thiserror", error("malformed token descriptor"))]
    MalformedDescriptor = 0x08,

    /// Certificate does not grant the required permission
    #[cfg_attr(feature = "thiserror", error("not authorized"))]
    NotAuthorized = 0x09,

    /// Response encoding failed
    #[cfg_attr(feature = "thiserror", error("message encoding failed"))]
    EncodingFailed = 0x0a,
}

impl Error {
    /// Map an [`Error`] to the [`StatusWord`] reported to the host
    pub const fn status(&self) -> StatusWord {
        use Error::*;

        match self {
            MalformedFrame => StatusWord::WrongLength,
            UnsupportedClass => StatusWord::ClaNotSupported,
            UnsupportedInstruction => StatusWord::InsNotSupported,
            InvalidParameters => StatusWord::InvalidP1P2,
            MalformedCertificate
            | InvalidSignature
            | NoCertificateLoaded
            | MalformedDescriptor => StatusWord::InvalidData,
            UnsupportedVersion => StatusWord::Unsupported,
            NotAuthorized => StatusWord::NotAuthorized,
            EncodingFailed => StatusWord::Internal,
        }
    }
}

impl From<Error> for StatusWord {
    fn from(e: Error) -> Self {
        e.status()
    }
}

/// Codec failures while reading a frame header are framing errors
impl From<ApduError> for Error {
    fn from(_: ApduError) -> Self {
        Error::MalformedFrame
    }
}
