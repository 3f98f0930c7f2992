// Copyright (c) 2022-2023 The MobileCoin Foundation

use k256::ecdsa::{signature::hazmat::PrehashVerifier, Signature, VerifyingKey};
use sha2::{Digest, Sha256};
use sha3::{Keccak256, Sha3_256};

use crate::{apdu::pki::SignAlgo, engine::Error};

/// Compute the message digest for the provided signature algorithm
pub fn digest(algo: SignAlgo, msg: &[u8]) -> [u8; 32] {
    match algo {
        SignAlgo::EcdsaSha256 => Sha256::digest(msg).into(),
        SignAlgo::EcdsaSha3_256 => Sha3_256::digest(msg).into(),
        SignAlgo::EcdsaKeccak256 => Keccak256::digest(msg).into(),
    }
}

/// Verify a DER encoded ECDSA signature over `msg`.
///
/// High-S signatures are normalised prior to verification as issuers
/// are not required to produce low-S values.
pub fn verify_der(
    key: &VerifyingKey,
    algo: SignAlgo,
    msg: &[u8],
    signature: &[u8],
) -> Result<(), Error> {
    let sig = Signature::from_der(signature).map_err(|_| Error::InvalidSignature)?;
    let sig = sig.normalize_s().unwrap_or(sig);

    let h = digest(algo, msg);

    key.verify_prehash(&h, &sig).map_err(|_| Error::InvalidSignature)
}
