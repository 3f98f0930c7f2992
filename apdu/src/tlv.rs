// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Tag-Length-Value codec used by PKI certificates
//!
//! Tags are a single byte, lengths use DER-style encoding:
//! short form for values below `0x80`, `0x81 LL` for values below `0x100`
//! and `0x82 LL LL` (big-endian) otherwise.

use byteorder::{BigEndian, ByteOrder};

use super::ApduError;

/// A single TLV entry borrowed from an encoded buffer
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Tlv<'a> {
    /// Entry tag
    pub tag: u8,
    /// Entry value
    pub value: &'a [u8],
    /// Offset of the tag byte within the parent buffer
    pub offset: usize,
}

impl<'a> Tlv<'a> {
    /// Read a single byte value
    pub fn as_u8(&self) -> Result<u8, ApduError> {
        match self.value {
            [v] => Ok(*v),
            _ => Err(ApduError::InvalidLength),
        }
    }

    /// Read a two byte big-endian value
    pub fn as_u16(&self) -> Result<u16, ApduError> {
        match self.value.len() {
            2 => Ok(BigEndian::read_u16(self.value)),
            _ => Err(ApduError::InvalidLength),
        }
    }

    /// Read a four byte big-endian value
    pub fn as_u32(&self) -> Result<u32, ApduError> {
        match self.value.len() {
            4 => Ok(BigEndian::read_u32(self.value)),
            _ => Err(ApduError::InvalidLength),
        }
    }
}

/// Iterator over the TLV entries in a buffer
#[derive(Clone, Debug)]
pub struct TlvIter<'a> {
    buff: &'a [u8],
    index: usize,
    failed: bool,
}

impl<'a> TlvIter<'a> {
    /// Create a new iterator over the provided buffer
    pub const fn new(buff: &'a [u8]) -> Self {
        Self {
            buff,
            index: 0,
            failed: false,
        }
    }

    fn read(&mut self) -> Result<Tlv<'a>, ApduError> {
        let offset = self.index;
        let b = &self.buff[offset..];

        // Header needs at least tag and first length byte
        if b.len() < 2 {
            return Err(ApduError::InvalidLength);
        }

        let tag = b[0];
        let (len, n) = decode_len(&b[1..])?;

        let hdr = 1 + n;
        if b.len() < hdr + len {
            return Err(ApduError::InvalidLength);
        }

        self.index += hdr + len;

        Ok(Tlv {
            tag,
            value: &b[hdr..][..len],
            offset,
        })
    }
}

impl<'a> Iterator for TlvIter<'a> {
    type Item = Result<Tlv<'a>, ApduError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.index >= self.buff.len() {
            return None;
        }

        let r = self.read();

        // Stop after the first framing error
        if r.is_err() {
            self.failed = true;
        }

        Some(r)
    }
}

/// Decode a DER-style length, returning the length and bytes consumed
pub fn decode_len(buff: &[u8]) -> Result<(usize, usize), ApduError> {
    match buff {
        [l, ..] if *l < 0x80 => Ok((*l as usize, 1)),
        [0x81, l, ..] if *l >= 0x80 => Ok((*l as usize, 2)),
        [0x82, h, l, ..] if *h != 0 => Ok((((*h as usize) << 8) | *l as usize, 3)),
        [0x81 | 0x82, ..] => Err(ApduError::InvalidEncoding),
        [_, ..] => Err(ApduError::InvalidEncoding),
        [] => Err(ApduError::InvalidLength),
    }
}

/// Compute the encoded length of a TLV entry with `len` value bytes
pub const fn encode_len(len: usize) -> usize {
    match len {
        0..=0x7f => 2 + len,
        0x80..=0xff => 3 + len,
        _ => 4 + len,
    }
}

/// Write a TLV entry to the provided buffer, returning the bytes written
pub fn write(tag: u8, value: &[u8], buff: &mut [u8]) -> Result<usize, ApduError> {
    let len = value.len();

    if len > u16::MAX as usize {
        return Err(ApduError::InvalidLength);
    }
    if buff.len() < encode_len(len) {
        return Err(ApduError::InvalidLength);
    }

    buff[0] = tag;

    let hdr = match len {
        0..=0x7f => {
            buff[1] = len as u8;
            2
        }
        0x80..=0xff => {
            buff[1] = 0x81;
            buff[2] = len as u8;
            3
        }
        _ => {
            buff[1] = 0x82;
            BigEndian::write_u16(&mut buff[2..4], len as u16);
            4
        }
    };

    buff[hdr..][..len].copy_from_slice(value);

    Ok(hdr + len)
}
