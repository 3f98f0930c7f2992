// Copyright (c) 2022-2023 The MobileCoin Foundation

//! ERC-20 token metadata APDUs

use encdec::{Decode, DecodeOwned, Encode};
use heapless::String;

use super::{ApduError, ApduStatic, Instruction, ETH_APDU_CLA};
use crate::helpers::{arr, be, is_printable};

/// Maximum ticker length
pub const MAX_TICKER_LEN: usize = 11;

/// Contract address length
pub const ADDRESS_LEN: usize = 20;

/// Token descriptor, the signed portion of a [`ProvideTokenInfo`] APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  TICKER_LEN   |                                               |
/// +-+-+-+-+-+-+-+-+                                               +
/// /                   TICKER (printable ASCII)                    /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                    ADDRESS (20-byte contract)                 /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       DECIMALS (u32 BE)                       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       CHAIN_ID (u32 BE)                       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct TokenInfo {
    /// Token ticker
    pub ticker: String<MAX_TICKER_LEN>,
    /// Token contract address
    pub address: [u8; ADDRESS_LEN],
    /// Number of decimals for display
    pub decimals: u8,
    /// Chain identifier
    pub chain_id: u32,
}

impl TokenInfo {
    /// Create a new token descriptor, the ticker must be non-empty printable
    /// ASCII no longer than [`MAX_TICKER_LEN`]
    pub fn new(
        ticker: &str,
        address: [u8; ADDRESS_LEN],
        decimals: u8,
        chain_id: u32,
    ) -> Result<Self, ApduError> {
        if ticker.is_empty() {
            return Err(ApduError::InvalidLength);
        }
        if !is_printable(ticker.as_bytes()) {
            return Err(ApduError::InvalidEncoding);
        }

        let ticker = String::try_from(ticker).map_err(|_| ApduError::InvalidLength)?;

        Ok(Self {
            ticker,
            address,
            decimals,
            chain_id,
        })
    }

    /// Fetch the token ticker
    pub fn ticker(&self) -> &str {
        &self.ticker
    }
}

impl Encode for TokenInfo {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(1 + self.ticker.len() + ADDRESS_LEN + 4 + 4)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let mut index = 0;
        let t = self.ticker.as_bytes();

        // Check buffer length is viable
        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        // Write ticker
        buff[index] = t.len() as u8;
        index += 1;

        buff[index..][..t.len()].copy_from_slice(t);
        index += t.len();

        // Write address
        index += arr::enc(&self.address, &mut buff[index..])?;

        // Write decimals and chain id
        index += be::enc_u32(self.decimals as u32, &mut buff[index..])?;
        index += be::enc_u32(self.chain_id, &mut buff[index..])?;

        Ok(index)
    }
}

impl DecodeOwned for TokenInfo {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self, usize), ApduError> {
        let mut index = 0;

        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        // Read and check ticker length
        let ticker_len = buff[index] as usize;
        index += 1;

        if ticker_len == 0 || ticker_len > MAX_TICKER_LEN {
            return Err(ApduError::InvalidLength);
        }

        // Check remaining fixed length fields are available
        if buff.len() < 1 + ticker_len + ADDRESS_LEN + 4 + 4 {
            return Err(ApduError::InvalidLength);
        }

        // Read ticker
        let t = &buff[index..][..ticker_len];
        if !is_printable(t) {
            return Err(ApduError::InvalidEncoding);
        }
        let t = core::str::from_utf8(t).map_err(|_| ApduError::InvalidUtf8)?;
        let ticker = String::try_from(t).map_err(|_| ApduError::InvalidLength)?;
        index += ticker_len;

        // Read address
        let (address, n) = arr::dec::<ADDRESS_LEN>(&buff[index..])?;
        index += n;

        // Read decimals, these must fit a single byte
        let (decimals, n) = be::dec_u32(&buff[index..])?;
        index += n;

        let decimals = u8::try_from(decimals).map_err(|_| ApduError::InvalidEncoding)?;

        // Read chain id
        let (chain_id, n) = be::dec_u32(&buff[index..])?;
        index += n;

        Ok((
            Self {
                ticker,
                address,
                decimals,
                chain_id,
            },
            index,
        ))
    }
}

/// Provide ERC-20 token information, signed under a loaded
/// [`KeyUsage::CoinMeta`][crate::pki::KeyUsage::CoinMeta] certificate.
///
/// ## Encoding:
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                     TOKEN_INFO (see TokenInfo)                /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                 SIGNATURE (DER ECDSA, remaining)              /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct ProvideTokenInfo<'a> {
    /// Token descriptor
    pub info: TokenInfo,
    /// Signature over the encoded descriptor
    pub signature: &'a [u8],
}

impl<'a> ProvideTokenInfo<'a> {
    /// Create a new token information APDU
    pub const fn new(info: TokenInfo, signature: &'a [u8]) -> Self {
        Self { info, signature }
    }
}

impl<'a> ApduStatic for ProvideTokenInfo<'a> {
    const CLA: u8 = ETH_APDU_CLA;
    const INS: u8 = Instruction::ProvideErc20TokenInfo as u8;
}

impl<'a> Encode for ProvideTokenInfo<'a> {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(self.info.encode_len()? + self.signature.len())
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let mut index = self.info.encode(buff)?;

        if buff.len() < index + self.signature.len() {
            return Err(ApduError::InvalidLength);
        }

        buff[index..][..self.signature.len()].copy_from_slice(self.signature);
        index += self.signature.len();

        Ok(index)
    }
}

impl<'a> Decode<'a> for ProvideTokenInfo<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        let (info, n) = TokenInfo::decode_owned(buff)?;

        // Signature occupies the remainder of the payload
        let signature = &buff[n..];

        Ok((Self { info, signature }, buff.len()))
    }
}

/// Token registration response, contains the registry slot
/// the token was stored in.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TokenSlot {
    pub index: u8,
}

impl Encode for TokenSlot {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(1)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.index;

        Ok(1)
    }
}

impl DecodeOwned for TokenSlot {
    type Output = Self;
    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self, usize), ApduError> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        Ok((Self { index: buff[0] }, 1))
    }
}
