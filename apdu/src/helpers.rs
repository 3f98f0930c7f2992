// Copyright (c) 2022-2023 The MobileCoin Foundation

/// encdec helper module for fixed length arrays (addresses)
pub(crate) mod arr {
    use ledger_proto::ApduError;

    pub fn enc<const N: usize>(d: &[u8; N], buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < d.len() {
            return Err(ApduError::InvalidLength);
        }

        buff[..d.len()].copy_from_slice(&d[..]);

        Ok(d.len())
    }

    pub fn dec<const N: usize>(buff: &[u8]) -> Result<([u8; N], usize), ApduError> {
        if buff.len() < N {
            return Err(ApduError::InvalidLength);
        }

        let mut d = [0u8; N];
        d.copy_from_slice(&buff[..N]);

        Ok((d, N))
    }
}

/// Big-endian integer helpers, firmware encodings are network order
pub(crate) mod be {
    use byteorder::{BigEndian, ByteOrder};
    use ledger_proto::ApduError;

    pub fn enc_u32(v: u32, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        BigEndian::write_u32(&mut buff[..4], v);

        Ok(4)
    }

    pub fn dec_u32(buff: &[u8]) -> Result<(u32, usize), ApduError> {
        if buff.len() < 4 {
            return Err(ApduError::InvalidLength);
        }

        Ok((BigEndian::read_u32(&buff[..4]), 4))
    }
}

/// Check a byte string is printable ASCII (`0x20..=0x7e`)
pub(crate) fn is_printable(d: &[u8]) -> bool {
    d.iter().all(|b| (0x20..=0x7e).contains(b))
}
