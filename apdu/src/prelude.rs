// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Prelude to simplify downstream use of APDU objects
//!

pub use crate::{
    header::Command,
    pki::{CertTag, CurveId, KeyUsage, LoadCertificate, SignAlgo},
    status::StatusWord,
    tlv::{Tlv, TlvIter},
    token::{ProvideTokenInfo, TokenInfo, TokenSlot},
    Instruction,
};
