// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Replay of raw APDU transcripts
//!
//! Transcripts contain one frame per line as hex, optionally followed by
//! `expect XXXX` with the expected status word. Blank lines and lines
//! starting with `#` are ignored.
//!
//! ```text
//! # load coin metadata certificate
//! b006080003010101 expect 6a80
//! e00a000000
//! ```

use anyhow::anyhow;
use ledger_transport::Exchange;
use log::{debug, info, warn};

use ledger_eth_meta_apdu::header::Command;

use crate::send;

/// Single transcript step
#[derive(Clone, PartialEq, Debug)]
pub struct Step {
    /// Source line (1-indexed)
    pub line: usize,
    /// Raw command frame
    pub apdu: Vec<u8>,
    /// Expected status word
    pub expect: Option<u16>,
}

/// Parse a transcript into steps
pub fn parse(s: &str) -> anyhow::Result<Vec<Step>> {
    let mut steps = vec![];

    for (i, l) in s.lines().enumerate() {
        let l = l.trim();
        if l.is_empty() || l.starts_with('#') {
            continue;
        }

        let mut parts = l.split_whitespace();

        let apdu = match parts.next() {
            Some(h) => hex::decode(h).map_err(|e| anyhow!("line {}: {}", i + 1, e))?,
            None => continue,
        };

        // Frame must be well formed to be sent via the transport
        if let Err(e) = Command::parse(&apdu) {
            return Err(anyhow!("line {}: invalid frame ({:?})", i + 1, e));
        }

        let expect = match (parts.next(), parts.next()) {
            (None, _) => None,
            (Some("expect"), Some(sw)) => Some(
                u16::from_str_radix(sw, 16)
                    .map_err(|e| anyhow!("line {}: invalid status '{}': {}", i + 1, sw, e))?,
            ),
            (Some(t), _) => return Err(anyhow!("line {}: unexpected token '{}'", i + 1, t)),
        };

        if let Some(t) = parts.next() {
            return Err(anyhow!("line {}: unexpected token '{}'", i + 1, t));
        }

        steps.push(Step {
            line: i + 1,
            apdu,
            expect,
        });
    }

    Ok(steps)
}

/// Execute transcript steps, returning the number of status mismatches
pub async fn run<T, E>(t: &T, steps: &[Step]) -> anyhow::Result<usize>
where
    T: Exchange<Error = E>,
    E: std::error::Error + Sync + Send + 'static,
{
    let mut mismatches = 0;

    for s in steps {
        let c = Command::parse(&s.apdu).map_err(|e| anyhow!("line {}: {:?}", s.line, e))?;

        let r = send(t, c.cla, c.ins, c.p1, c.p2, c.data).await?;
        let sw = u16::from(r.status);

        match s.expect {
            Some(e) if e != sw => {
                warn!("line {}: status {:04x} (expected {:04x})", s.line, sw, e);
                mismatches += 1;
            }
            _ => debug!("line {}: status {:04x} data {:02x?}", s.line, sw, r.data),
        }
    }

    info!("replayed {} steps, {} mismatches", steps.len(), mismatches);

    Ok(mismatches)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_transcript() {
        let t = r"
            # comment
            e00a000000

            b006080002aabb expect 6A80
        ";

        let steps = parse(t).unwrap();

        assert_eq!(
            steps,
            vec![
                Step {
                    line: 3,
                    apdu: vec![0xe0, 0x0a, 0x00, 0x00, 0x00],
                    expect: None,
                },
                Step {
                    line: 5,
                    apdu: vec![0xb0, 0x06, 0x08, 0x00, 0x02, 0xaa, 0xbb],
                    expect: Some(0x6a80),
                },
            ]
        );
    }

    #[test]
    fn parse_rejects_invalid() {
        // Not hex
        assert!(parse("e00a00000z").is_err());
        // LC mismatch
        assert!(parse("e00a000002aa").is_err());
        // Unknown trailing token
        assert!(parse("e00a000000 want 9000").is_err());
        // Missing status
        assert!(parse("e00a000000 expect").is_err());
        // Extra tokens
        assert!(parse("e00a000000 expect 9000 9000").is_err());
    }
}
