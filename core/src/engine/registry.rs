// Copyright (c) 2022-2023 The MobileCoin Foundation

use heapless::Vec;

use ledger_eth_meta_apdu::token::{TokenInfo, ADDRESS_LEN};

/// Maximum number of token descriptors retained
pub const MAX_TOKENS: usize = 2;

/// Fixed capacity store of verified token descriptors.
///
/// Slots are written round-robin once full, a descriptor for an
/// already registered `(address, chain_id)` replaces its existing slot.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TokenRegistry {
    tokens: Vec<TokenInfo, MAX_TOKENS>,
    next: usize,
}

impl TokenRegistry {
    pub const fn new() -> Self {
        Self {
            tokens: Vec::new(),
            next: 0,
        }
    }

    /// Store a verified descriptor, returning the slot index
    pub fn insert(&mut self, info: TokenInfo) -> u8 {
        // Replace existing entries for the same token
        if let Some(i) = self.position(&info.address, info.chain_id) {
            self.tokens[i] = info;
            return i as u8;
        }

        let i = self.next;
        self.next = (self.next + 1) % MAX_TOKENS;

        match self.tokens.get_mut(i) {
            Some(t) => *t = info,
            None => {
                // Slots fill in order so `i == len` until full
                debug_assert_eq!(i, self.tokens.len());

                let pushed = self.tokens.push(info).is_ok();
                debug_assert!(pushed, "registry slot {i} out of order");
            }
        }

        i as u8
    }

    /// Fetch the descriptor in a given slot
    pub fn get(&self, index: u8) -> Option<&TokenInfo> {
        self.tokens.get(index as usize)
    }

    /// Find a descriptor by contract address and chain
    pub fn find(&self, address: &[u8; ADDRESS_LEN], chain_id: u32) -> Option<(u8, &TokenInfo)> {
        self.position(address, chain_id).map(|i| (i as u8, &self.tokens[i]))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenInfo> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Remove all descriptors
    pub fn clear(&mut self) {
        self.tokens.clear();
        self.next = 0;
    }

    fn position(&self, address: &[u8; ADDRESS_LEN], chain_id: u32) -> Option<usize> {
        self.tokens
            .iter()
            .position(|t| &t.address == address && t.chain_id == chain_id)
    }
}
