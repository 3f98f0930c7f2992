// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Ethereum hardware wallet token metadata provisioning core
//!
//! This provides a common [Engine][engine] supporting trusted metadata provisioning
//! for execution on hardware wallets.
//!
//! Interactions with the [Engine][engine] are performed via [Event][engine::Event]s and [Output][engine::Output]s,
//! see [ledger_eth_meta_apdu] for APDU objects and wire encodings. Every command completes
//! with exactly one [`StatusWord`][apdu::status::StatusWord], see [`Engine::exchange`][engine::Engine::exchange].
//!
//! ## Operations
//!
//! ### Loading a certificate
//!
//! A [`LoadCertificate`][ledger_eth_meta_apdu::pki::LoadCertificate] APDU delivers a TLV
//! encoded PKI certificate with the expected key usage in `P1`. The certificate must be
//! signed by a trust anchor known to the platform [`Driver`][engine::Driver], and on success
//! the certified key replaces any previously trusted key. A failed load leaves no trusted key.
//!
//! ### Providing token information
//!
//! Once a [`KeyUsage::CoinMeta`][ledger_eth_meta_apdu::pki::KeyUsage::CoinMeta] certificate
//! is loaded, [`ProvideTokenInfo`][ledger_eth_meta_apdu::token::ProvideTokenInfo] APDUs
//! carrying a descriptor signed by the certified key are verified and stored in the
//! [`TokenRegistry`][engine::TokenRegistry], responding with the slot used.
//!
//! 1. Issue [`LoadCertificate`][ledger_eth_meta_apdu::pki::LoadCertificate] with `P1 = 0x08`
//! 2. Issue [`ProvideTokenInfo`][ledger_eth_meta_apdu::token::ProvideTokenInfo] for each token
//!    (at most [`MAX_TOKENS`][engine::MAX_TOKENS] are retained)
//!
//! [`Engine::reset`][engine::Engine::reset] clears trust and registered tokens on disconnect.
//!

#![cfg_attr(not(feature = "std"), no_std)]

pub use ledger_eth_meta_apdu::{self as apdu};

pub mod engine;

pub mod helpers;
