// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Tests and vectors for ERC-20 token information provisioning
//!

use std::future::Future;

use ledger_transport::Exchange;
use log::debug;

use ledger_eth_meta_apdu::{pki::KeyUsage, status::StatusWord, token::TokenInfo};
use ledger_eth_meta_core::engine::MAX_TOKENS;

use crate::{
    certificate::CertificateBuilder,
    keys::{ANCHOR_KEY, COIN_META_KEY},
    load_certificate, provide_token,
    token::{sign_token, with_signature},
};

/// Test vector type for token descriptors
pub struct Vector {
    pub ticker: &'static str,
    pub address: &'static str,
    pub decimals: u8,
    pub chain_id: u32,
}

impl Vector {
    pub fn address_bytes(&self) -> [u8; 20] {
        let mut b = [0u8; 20];
        hex::decode_to_slice(self.address, &mut b[..]).unwrap();
        b
    }

    pub fn info(&self) -> TokenInfo {
        TokenInfo::new(
            self.ticker,
            self.address_bytes(),
            self.decimals,
            self.chain_id,
        )
        .unwrap()
    }
}

pub const ZRX: Vector = Vector {
    ticker: "ZRX",
    address: "e41d2489571d322189246dafa5ebde1f4699f498",
    decimals: 18,
    chain_id: 1,
};

pub const VECTORS: &[Vector] = &[
    ZRX,
    Vector {
        ticker: "USDC",
        address: "a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
        decimals: 6,
        chain_id: 1,
    },
    Vector {
        ticker: "DAI",
        address: "6b175474e89094c44da98b954eedeac495271d0f",
        decimals: 18,
        chain_id: 1,
    },
    Vector {
        ticker: "WETH",
        address: "7ceb23fd6bc0add59e62ac25578270cff1b9f619",
        decimals: 18,
        chain_id: 137,
    },
];

/// Load the test coin metadata certificate
pub async fn load_coin_meta<T, E>(t: &T) -> anyhow::Result<()>
where
    T: Exchange<Error = E>,
    E: std::error::Error + Sync + Send + 'static,
{
    let cert = CertificateBuilder::coin_meta(&COIN_META_KEY).sign(&ANCHOR_KEY);

    let sw = load_certificate(t, KeyUsage::CoinMeta as u8, &cert).await?;
    assert_eq!(sw, StatusWord::Ok, "certificate load failed");

    Ok(())
}

/// Test token provisioning for a set of vectors
pub async fn test<T, E>(t: T, vectors: &[Vector]) -> anyhow::Result<()>
where
    T: Exchange<Error = E>,
    E: std::error::Error + Sync + Send + 'static,
{
    load_coin_meta(&t).await?;

    for v in vectors {
        debug!("provide token: {} ({})", v.ticker, v.chain_id);

        let p = sign_token(&v.info(), &COIN_META_KEY);
        let (sw, slot) = provide_token(&t, &p).await?;

        assert_eq!(sw, StatusWord::Ok, "token {} rejected", v.ticker);

        let slot = slot.ok_or_else(|| anyhow::anyhow!("missing slot"))?;
        assert!((slot as usize) < MAX_TOKENS, "invalid slot {slot}");
    }

    Ok(())
}

/// Test a badly signed descriptor is rejected without a certificate,
/// expects no certificate to have been loaded
pub async fn deadbeef_without_certificate<T, E>(t: T) -> anyhow::Result<()>
where
    T: Exchange<Error = E>,
    E: std::error::Error + Sync + Send + 'static,
{
    let p = with_signature(&ZRX.info(), &[0xde, 0xad, 0xbe, 0xef]);

    let (sw, slot) = provide_token(&t, &p).await?;
    assert_eq!(sw, StatusWord::InvalidData);
    assert_eq!(slot, None);

    Ok(())
}

/// Test a badly signed descriptor is rejected with a valid certificate
pub async fn deadbeef_with_certificate<T, E>(t: T) -> anyhow::Result<()>
where
    T: Exchange<Error = E>,
    E: std::error::Error + Sync + Send + 'static,
{
    load_coin_meta(&t).await?;

    let p = with_signature(&ZRX.info(), &[0xde, 0xad, 0xbe, 0xef]);

    let (sw, slot) = provide_token(&t, &p).await?;
    assert_eq!(sw, StatusWord::InvalidData);
    assert_eq!(slot, None);

    // Descriptor signed by the issuer rather than the certified key
    let p = sign_token(&ZRX.info(), &ANCHOR_KEY);

    let (sw, _) = provide_token(&t, &p).await?;
    assert_eq!(sw, StatusWord::InvalidData);

    Ok(())
}

/// Test registry slot allocation, `reset` must return the device
/// to its initial state
pub async fn eviction<T, F, E>(t: T, reset: impl Fn() -> F) -> anyhow::Result<()>
where
    T: Exchange<Error = E>,
    F: Future<Output = ()>,
    E: std::error::Error + Sync + Send + 'static,
{
    reset().await;

    load_coin_meta(&t).await?;

    let mut expected = 0;
    for v in VECTORS {
        let p = sign_token(&v.info(), &COIN_META_KEY);

        let (sw, slot) = provide_token(&t, &p).await?;
        assert_eq!(sw, StatusWord::Ok);
        assert_eq!(slot, Some(expected), "slot for {}", v.ticker);

        expected = (expected + 1) % MAX_TOKENS as u8;
    }

    // Re-providing a retained token reuses its slot
    let last = &VECTORS[VECTORS.len() - 1];
    let p = sign_token(&last.info(), &COIN_META_KEY);

    let (sw, slot) = provide_token(&t, &p).await?;
    assert_eq!(sw, StatusWord::Ok);
    assert_eq!(slot, Some(((VECTORS.len() - 1) % MAX_TOKENS) as u8));

    // Reset drops trust
    reset().await;

    let (sw, _) = provide_token(&t, &p).await?;
    assert_eq!(sw, StatusWord::InvalidData);

    Ok(())
}
