// Copyright (c) 2022-2023 The MobileCoin Foundation

//! The [Engine] provides trusted metadata provisioning for hardware wallets.
//!
//! This handles [Event] inputs and returns [Output] responses to the caller,
//! see [apdu][crate::apdu] for APDU protocol / encoding specifications.

use encdec::Decode;
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

use ledger_eth_meta_apdu::{
    header::Command, pki::KeyUsage, status::StatusWord, token::ProvideTokenInfo,
};

mod certificate;
pub use certificate::{load as load_certificate, Certificate, TrustAnchor, TrustedKey};

mod event;
pub use event::Event;

mod output;
pub use output::Output;

mod error;
pub use error::Error;

mod registry;
pub use registry::{TokenRegistry, MAX_TOKENS};

/// Engine internal state enumeration
#[derive(Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter)]
pub enum State {
    /// No trusted key, token metadata is rejected
    NoCertificate,
    /// Certificate accepted, trusted key available
    CertificateLoaded,
}

/// [Engine] provides hardware-independent support for metadata provisioning
///
pub struct Engine<DRV: Driver> {
    state: State,
    trusted: Option<TrustedKey>,
    registry: TokenRegistry,
    drv: DRV,
}

/// [`Driver`] trait provides platform support for [`Engine`] instances
pub trait Driver {
    /// Fetch the trust anchor registered for an issuer key id
    fn trust_anchor(&self, key_id: u16) -> Option<TrustAnchor>;

    /// Target device identifier for certificate checks
    fn target_device(&self) -> u8;

    /// Current unix time in seconds, `None` where no clock is available
    fn timestamp(&self) -> Option<u32> {
        None
    }

    /// Minimum accepted certificate validity index
    fn min_validity_index(&self) -> u32 {
        0
    }
}

impl<T: Driver> Driver for &mut T {
    fn trust_anchor(&self, key_id: u16) -> Option<TrustAnchor> {
        T::trust_anchor(self, key_id)
    }

    fn target_device(&self) -> u8 {
        T::target_device(self)
    }

    fn timestamp(&self) -> Option<u32> {
        T::timestamp(self)
    }

    fn min_validity_index(&self) -> u32 {
        T::min_validity_index(self)
    }
}

impl<DRV: Driver> Engine<DRV> {
    /// Create a new engine instance with the provided driver
    pub const fn new(drv: DRV) -> Self {
        Self {
            state: State::NoCertificate,
            trusted: None,
            registry: TokenRegistry::new(),
            drv,
        }
    }

    /// Handle incoming provisioning events
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn update(&mut self, evt: &Event) -> Result<Output, Error> {
        #[cfg(feature = "log")]
        log::debug!("event: {:02x?}", evt);

        match (self.state, evt) {
            // Certificates may be loaded in any state, any failure drops
            // the previously trusted key
            (
                _,
                Event::LoadCertificate {
                    key_usage,
                    certificate,
                },
            ) => {
                self.trusted = None;
                self.state = State::NoCertificate;

                let k = certificate::load(certificate, *key_usage, &self.drv).map_err(|e| {
                    #[cfg(feature = "log")]
                    log::debug!("certificate rejected: {:?}", e);
                    e
                })?;

                #[cfg(feature = "log")]
                log::debug!("trusted key '{}' ({})", k.name, k.usage);

                self.trusted = Some(k);
                self.state = State::CertificateLoaded;

                Ok(Output::None)
            }

            // Token metadata requires a trusted key
            (State::NoCertificate, Event::ProvideTokenInfo { .. }) => {
                #[cfg(feature = "log")]
                log::debug!("token metadata without certificate");

                Err(Error::NoCertificateLoaded)
            }

            (State::CertificateLoaded, Event::ProvideTokenInfo { payload }) => {
                let index = self.provide_token_info(payload).map_err(|e| {
                    #[cfg(feature = "log")]
                    log::debug!("token metadata rejected: {:?}", e);
                    e
                })?;

                Ok(Output::TokenSlot { index })
            }
        }
    }

    /// Decode and handle a raw command APDU
    pub fn handle(&mut self, raw: &[u8]) -> Result<Output, Error> {
        let cmd = Command::parse(raw)?;

        let evt = Event::parse(&cmd)?;

        self.update(&evt)
    }

    /// Execute a raw command APDU, writing response data and status word
    /// to `resp`.
    ///
    /// Returns the status word and the total response length, `resp` must
    /// allow at least two bytes for the status or the command is not executed.
    /// Commands whose response data would not fit are rejected before any
    /// state change.
    pub fn exchange(&mut self, raw: &[u8], resp: &mut [u8]) -> (StatusWord, usize) {
        if resp.len() < 2 {
            return (Error::EncodingFailed.status(), 0);
        }

        let data_len = resp.len() - 2;

        let r = Command::parse(raw)
            .map_err(Error::from)
            .and_then(|cmd| Event::parse(&cmd))
            .and_then(|evt| match evt.response_len() <= data_len {
                true => self.update(&evt),
                false => Err(Error::EncodingFailed),
            });

        let (sw, n) = match r {
            Ok(o) => match o.encode(&mut resp[..data_len]) {
                Ok(n) => (StatusWord::Ok, n),
                Err(_) => (Error::EncodingFailed.status(), 0),
            },
            Err(e) => (e.status(), 0),
        };

        resp[n..][..2].copy_from_slice(&sw.to_bytes());

        (sw, n + 2)
    }

    /// Reset the engine, dropping trusted keys and registered tokens
    pub fn reset(&mut self) {
        #[cfg(feature = "log")]
        log::debug!("engine reset");

        self.trusted = None;
        self.registry.clear();
        self.state = State::NoCertificate;
    }

    /// Fetch the current engine state
    pub fn state(&self) -> State {
        self.state
    }

    /// Fetch the currently trusted key
    pub fn trusted_key(&self) -> Option<&TrustedKey> {
        self.trusted.as_ref()
    }

    /// Fetch the registered tokens
    pub fn tokens(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Fetch the platform driver
    pub fn driver(&self) -> &DRV {
        &self.drv
    }

    /// Fetch a mutable reference to the platform driver
    pub fn driver_mut(&mut self) -> &mut DRV {
        &mut self.drv
    }

    fn provide_token_info(&mut self, payload: &[u8]) -> Result<u8, Error> {
        let key = self.trusted.as_ref().ok_or(Error::NoCertificateLoaded)?;

        let (apdu, _) =
            ProvideTokenInfo::decode(payload).map_err(|_| Error::MalformedDescriptor)?;

        if key.usage != KeyUsage::CoinMeta {
            return Err(Error::NotAuthorized);
        }

        // Signature covers every byte preceding it
        let signed = &payload[..payload.len() - apdu.signature.len()];
        key.verify(signed, apdu.signature)?;

        #[cfg(feature = "log")]
        log::debug!(
            "token '{}' chain {} decimals {}",
            apdu.info.ticker(),
            apdu.info.chain_id,
            apdu.info.decimals
        );

        Ok(self.registry.insert(apdu.info))
    }
}
