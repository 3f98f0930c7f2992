// Copyright (c) 2022-2023 The MobileCoin Foundation

//! PKI certificate decoding and verification

use heapless::String;
use k256::ecdsa::VerifyingKey;

use ledger_eth_meta_apdu::{
    pki::{
        CertTag, CurveId, KeyUsage, SignAlgo, CERT_STRUCTURE_TYPE, CERT_VERSION,
        COMPRESSED_KEY_LEN, MAX_CHALLENGE_LEN, MAX_TRUSTED_NAME_LEN,
    },
    tlv::{Tlv, TlvIter},
};

use super::{Driver, Error};
use crate::helpers::verify_der;

/// Decoded certificate, borrowing from the load-certificate payload
#[derive(Clone, PartialEq, Debug)]
pub struct Certificate<'a> {
    pub validity: Option<&'a [u8]>,
    pub validity_index: Option<u32>,
    pub challenge: Option<&'a [u8]>,
    /// Issuer (trust anchor) identifier
    pub signer_key_id: u16,
    /// Algorithm used by the issuer signature
    pub signer_algo: SignAlgo,
    /// Expiry (unix seconds), zero for none
    pub time_validity: Option<u32>,
    pub trusted_name: &'a str,
    pub public_key_id: Option<u16>,
    pub key_usage: KeyUsage,
    pub curve: CurveId,
    pub public_key: [u8; COMPRESSED_KEY_LEN],
    /// Algorithm for signatures made by the certified key
    pub pk_sign_algo: SignAlgo,
    pub target_device: Option<u8>,
    pub depth: Option<u8>,

    /// Certificate bytes covered by the issuer signature
    pub signed: &'a [u8],
    /// DER encoded issuer signature
    pub signature: &'a [u8],
}

/// Key retained from an accepted certificate
#[derive(Clone, PartialEq, Debug)]
pub struct TrustedKey {
    pub name: String<MAX_TRUSTED_NAME_LEN>,
    pub issuer: u16,
    pub key_id: Option<u16>,
    pub usage: KeyUsage,
    pub sign_algo: SignAlgo,
    pub public_key: VerifyingKey,
}

impl TrustedKey {
    /// Verify a DER signature over `msg` using the certified key
    pub fn verify(&self, msg: &[u8], signature: &[u8]) -> Result<(), Error> {
        verify_der(&self.public_key, self.sign_algo, msg, signature)
    }
}

/// Certificate tags accumulated while parsing
#[derive(Default)]
struct Fields<'a> {
    validity: Option<&'a [u8]>,
    validity_index: Option<u32>,
    challenge: Option<&'a [u8]>,
    signer_key_id: Option<u16>,
    signer_algo: Option<SignAlgo>,
    time_validity: Option<u32>,
    trusted_name: Option<&'a str>,
    public_key_id: Option<u16>,
    key_usage: Option<KeyUsage>,
    curve: Option<CurveId>,
    public_key: Option<[u8; COMPRESSED_KEY_LEN]>,
    pk_sign_algo: Option<SignAlgo>,
    target_device: Option<u8>,
    depth: Option<u8>,
    signed: Option<&'a [u8]>,
    signature: Option<&'a [u8]>,
}

impl<'a> Certificate<'a> {
    /// Decode a certificate from TLV entries
    pub fn parse(buff: &'a [u8]) -> Result<Self, Error> {
        let mut seen = 0u32;
        let mut f = Fields::default();

        for (i, e) in TlvIter::new(buff).enumerate() {
            let e = e.map_err(|_| Error::MalformedCertificate)?;

            let tag = CertTag::try_from(e.tag).map_err(|_| Error::MalformedCertificate)?;
            let bit = 1 << tag.bit();

            // Nothing may follow the signature, and no tag may repeat
            if seen & (1 << CertTag::Signature.bit()) != 0 || seen & bit != 0 {
                return Err(Error::MalformedCertificate);
            }
            seen |= bit;

            // Structure type and version are positional
            match (i, tag) {
                (0, CertTag::StructureType) | (1, CertTag::Version) => (),
                (0 | 1, _) | (_, CertTag::StructureType | CertTag::Version) => {
                    return Err(Error::MalformedCertificate)
                }
                _ => (),
            }

            f.apply(tag, &e, buff)?;
        }

        // Check mandatory tags are present
        for t in CertTag::MANDATORY {
            if seen & (1 << t.bit()) == 0 {
                #[cfg(feature = "log")]
                log::debug!("certificate missing tag: {}", t);

                return Err(Error::MalformedCertificate);
            }
        }

        f.build()
    }

    /// Verify the issuer signature against the provided anchor
    pub fn verify(&self, anchor: &TrustAnchor) -> Result<(), Error> {
        let key = VerifyingKey::from_sec1_bytes(&anchor.public_key)
            .map_err(|_| Error::InvalidSignature)?;

        verify_der(&key, self.signer_algo, self.signed, self.signature)
    }

    /// Check certificate constraints against the expected usage and
    /// the platform [`Driver`]
    pub fn authorize<DRV: Driver>(&self, key_usage: u8, drv: &DRV) -> Result<(), Error> {
        if self.key_usage as u8 != key_usage {
            #[cfg(feature = "log")]
            log::debug!(
                "certificate usage {} does not match expected {:#04x}",
                self.key_usage,
                key_usage
            );

            return Err(Error::NotAuthorized);
        }

        if let Some(d) = self.target_device {
            if d != drv.target_device() {
                #[cfg(feature = "log")]
                log::debug!("certificate target device {:#04x} mismatch", d);

                return Err(Error::NotAuthorized);
            }
        }

        if let (Some(expiry), Some(now)) = (self.time_validity, drv.timestamp()) {
            if expiry != 0 && expiry < now {
                #[cfg(feature = "log")]
                log::debug!("certificate expired at {}", expiry);

                return Err(Error::NotAuthorized);
            }
        }

        if let Some(i) = self.validity_index {
            if i < drv.min_validity_index() {
                #[cfg(feature = "log")]
                log::debug!("certificate validity index {} revoked", i);

                return Err(Error::NotAuthorized);
            }
        }

        Ok(())
    }

    /// Derive the [`TrustedKey`] carried by this certificate
    pub fn trusted_key(&self) -> Result<TrustedKey, Error> {
        let public_key = VerifyingKey::from_sec1_bytes(&self.public_key)
            .map_err(|_| Error::MalformedCertificate)?;

        let name = String::try_from(self.trusted_name).map_err(|_| Error::MalformedCertificate)?;

        Ok(TrustedKey {
            name,
            issuer: self.signer_key_id,
            key_id: self.public_key_id,
            usage: self.key_usage,
            sign_algo: self.pk_sign_algo,
            public_key,
        })
    }
}

/// Decode, verify and authorize a certificate, returning the certified key
pub fn load<DRV: Driver>(buff: &[u8], key_usage: u8, drv: &DRV) -> Result<TrustedKey, Error> {
    let c = Certificate::parse(buff)?;

    let anchor = match drv.trust_anchor(c.signer_key_id) {
        Some(a) => a,
        None => {
            #[cfg(feature = "log")]
            log::debug!("no trust anchor for issuer {:#06x}", c.signer_key_id);

            return Err(Error::InvalidSignature);
        }
    };

    c.verify(&anchor)?;

    c.authorize(key_usage, drv)?;

    c.trusted_key()
}

/// Root key registered by the platform for verifying certificates
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TrustAnchor {
    /// Issuer identifier (matches the certificate signer key id)
    pub key_id: u16,
    /// Compressed SEC1 secp256k1 public key
    pub public_key: [u8; COMPRESSED_KEY_LEN],
}

impl TrustAnchor {
    pub const fn new(key_id: u16, public_key: [u8; COMPRESSED_KEY_LEN]) -> Self {
        Self { key_id, public_key }
    }
}

impl<'a> Fields<'a> {
    fn apply(&mut self, tag: CertTag, e: &Tlv<'a>, buff: &'a [u8]) -> Result<(), Error> {
        use CertTag::*;

        let m = |_| Error::MalformedCertificate;

        match tag {
            StructureType => {
                if e.as_u8().map_err(m)? != CERT_STRUCTURE_TYPE {
                    return Err(Error::MalformedCertificate);
                }
            }
            Version => {
                if e.as_u8().map_err(m)? != CERT_VERSION {
                    return Err(Error::UnsupportedVersion);
                }
            }
            Validity => {
                if e.value.len() != 4 {
                    return Err(Error::MalformedCertificate);
                }
                self.validity = Some(e.value);
            }
            ValidityIndex => self.validity_index = Some(e.as_u32().map_err(m)?),
            Challenge => {
                if e.value.len() > MAX_CHALLENGE_LEN {
                    return Err(Error::MalformedCertificate);
                }
                self.challenge = Some(e.value);
            }
            SignerKeyId => self.signer_key_id = Some(e.as_u16().map_err(m)?),
            SignerAlgo => self.signer_algo = Some(sign_algo(e)?),
            Signature => {
                self.signed = Some(&buff[..e.offset]);
                self.signature = Some(e.value);
            }
            TimeValidity => self.time_validity = Some(e.as_u32().map_err(m)?),
            TrustedName => {
                let v = e.value;
                if v.is_empty()
                    || v.len() > MAX_TRUSTED_NAME_LEN
                    || !v.iter().all(|c| (0x20..=0x7e).contains(c))
                {
                    return Err(Error::MalformedCertificate);
                }
                let name = core::str::from_utf8(v).map_err(|_| Error::MalformedCertificate)?;
                self.trusted_name = Some(name);
            }
            PublicKeyId => self.public_key_id = Some(e.as_u16().map_err(m)?),
            PublicKeyUsage => {
                let u = e.as_u8().map_err(m)?;
                let u = KeyUsage::try_from(u).map_err(|_| Error::MalformedCertificate)?;
                self.key_usage = Some(u);
            }
            PublicKeyCurve => {
                let c = e.as_u8().map_err(m)?;
                let c = CurveId::try_from(c).map_err(|_| Error::MalformedCertificate)?;
                self.curve = Some(c);
            }
            PublicKey => {
                let k = e.value.try_into().map_err(|_| Error::MalformedCertificate)?;
                self.public_key = Some(k);
            }
            PublicKeySignAlgo => self.pk_sign_algo = Some(sign_algo(e)?),
            TargetDevice => self.target_device = Some(e.as_u8().map_err(m)?),
            Depth => self.depth = Some(e.as_u8().map_err(m)?),
        }

        Ok(())
    }

    fn build(self) -> Result<Certificate<'a>, Error> {
        let m = Error::MalformedCertificate;

        Ok(Certificate {
            validity: self.validity,
            validity_index: self.validity_index,
            challenge: self.challenge,
            signer_key_id: self.signer_key_id.ok_or(m)?,
            signer_algo: self.signer_algo.ok_or(m)?,
            time_validity: self.time_validity,
            trusted_name: self.trusted_name.ok_or(m)?,
            public_key_id: self.public_key_id,
            key_usage: self.key_usage.ok_or(m)?,
            curve: self.curve.ok_or(m)?,
            public_key: self.public_key.ok_or(m)?,
            pk_sign_algo: self.pk_sign_algo.ok_or(m)?,
            target_device: self.target_device,
            depth: self.depth,
            signed: self.signed.ok_or(m)?,
            signature: self.signature.ok_or(m)?,
        })
    }
}

fn sign_algo(e: &Tlv) -> Result<SignAlgo, Error> {
    let a = e.as_u8().map_err(|_| Error::MalformedCertificate)?;
    SignAlgo::try_from(a).map_err(|_| Error::MalformedCertificate)
}
