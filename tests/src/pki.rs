// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Tests and vectors for certificate loading
//!

use ledger_transport::Exchange;
use log::debug;

use ledger_eth_meta_apdu::{
    pki::{CertTag, KeyUsage},
    status::StatusWord,
};

use crate::{
    certificate::CertificateBuilder,
    erc20::ZRX,
    keys::{ANCHOR_KEY, COIN_META_KEY},
    load_certificate, provide_token,
    token::sign_token,
};

/// Certificate load vector, builds a certificate and the expected status
pub struct Vector {
    pub name: &'static str,
    pub key_usage: KeyUsage,
    pub build: fn() -> Vec<u8>,
    pub status: StatusWord,
}

fn base() -> CertificateBuilder {
    CertificateBuilder::coin_meta(&COIN_META_KEY)
}

pub const VECTORS: &[Vector] = &[
    Vector {
        name: "valid",
        key_usage: KeyUsage::CoinMeta,
        build: || base().sign(&ANCHOR_KEY),
        status: StatusWord::Ok,
    },
    Vector {
        name: "usage mismatch",
        key_usage: KeyUsage::TrustedName,
        build: || base().sign(&ANCHOR_KEY),
        status: StatusWord::NotAuthorized,
    },
    Vector {
        name: "unsupported version",
        key_usage: KeyUsage::CoinMeta,
        build: || base().set(CertTag::Version, &[0x01]).sign(&ANCHOR_KEY),
        status: StatusWord::Unsupported,
    },
    Vector {
        name: "unknown tag",
        key_usage: KeyUsage::CoinMeta,
        build: || base().push(0x7e, &[0x00]).sign(&ANCHOR_KEY),
        status: StatusWord::InvalidData,
    },
    Vector {
        name: "duplicate tag",
        key_usage: KeyUsage::CoinMeta,
        build: || {
            base()
                .push(CertTag::TrustedName as u8, b"Coin_meta")
                .sign(&ANCHOR_KEY)
        },
        status: StatusWord::InvalidData,
    },
    Vector {
        name: "missing public key",
        key_usage: KeyUsage::CoinMeta,
        build: || base().remove(CertTag::PublicKey).sign(&ANCHOR_KEY),
        status: StatusWord::InvalidData,
    },
    Vector {
        name: "self signed",
        key_usage: KeyUsage::CoinMeta,
        build: || base().sign(&COIN_META_KEY),
        status: StatusWord::InvalidData,
    },
    Vector {
        name: "unknown issuer",
        key_usage: KeyUsage::CoinMeta,
        build: || {
            base()
                .set(CertTag::SignerKeyId, &0x00ffu16.to_be_bytes())
                .sign(&ANCHOR_KEY)
        },
        status: StatusWord::InvalidData,
    },
    Vector {
        name: "wrong target device",
        key_usage: KeyUsage::CoinMeta,
        build: || base().set(CertTag::TargetDevice, &[0x7f]).sign(&ANCHOR_KEY),
        status: StatusWord::NotAuthorized,
    },
];

/// Test certificate loading, each rejected certificate must leave
/// the device without a trusted key
pub async fn test<T, E>(t: T, vectors: &[Vector]) -> anyhow::Result<()>
where
    T: Exchange<Error = E>,
    E: std::error::Error + Sync + Send + 'static,
{
    let token = sign_token(&ZRX.info(), &COIN_META_KEY);

    for v in vectors {
        debug!("certificate: {}", v.name);

        // Load a valid certificate first so rejection clears it
        let cert = base().sign(&ANCHOR_KEY);
        let sw = load_certificate(&t, KeyUsage::CoinMeta as u8, &cert).await?;
        assert_eq!(sw, StatusWord::Ok);

        let cert = (v.build)();
        let sw = load_certificate(&t, v.key_usage as u8, &cert).await?;
        assert_eq!(sw, v.status, "certificate '{}' status", v.name);

        // Check trust state follows the load result
        let (sw, _) = provide_token(&t, &token).await?;
        match v.status {
            StatusWord::Ok => assert_eq!(sw, StatusWord::Ok, "'{}' token", v.name),
            _ => assert_eq!(sw, StatusWord::InvalidData, "'{}' token", v.name),
        }
    }

    Ok(())
}

/// Test malformed frames and unsupported instructions
pub async fn frames<T, E>(t: T) -> anyhow::Result<()>
where
    T: Exchange<Error = E>,
    E: std::error::Error + Sync + Send + 'static,
{
    let tests: &[(u8, u8, u8, u8, StatusWord)] = &[
        (0x80, 0x0a, 0x00, 0x00, StatusWord::ClaNotSupported),
        (0xe0, 0x04, 0x00, 0x00, StatusWord::InsNotSupported),
        (0xb0, 0x0a, 0x00, 0x00, StatusWord::InsNotSupported),
        (0xe0, 0x0a, 0x01, 0x00, StatusWord::InvalidP1P2),
        (0xb0, 0x06, 0x08, 0x01, StatusWord::InvalidP1P2),
        (0xb0, 0x06, 0x08, 0x00, StatusWord::InvalidData),
    ];

    for (cla, ins, p1, p2, status) in tests {
        let r = crate::send(&t, *cla, *ins, *p1, *p2, &[]).await?;
        assert_eq!(
            r.status, *status,
            "{cla:02x} {ins:02x} {p1:02x} {p2:02x} status"
        );
        assert!(r.data.is_empty());
    }

    Ok(())
}
