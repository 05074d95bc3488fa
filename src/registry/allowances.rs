// src/registry/allowances.rs
//! Per (university, certifier) admission allowance.
//!
//! The allowance is set to [`MAX_ALLOWANCE`] when a certifier is admitted
//! and dropped to zero when it is removed. Registration checks it but never
//! consumes it; a consumable quota would decrement here.

use ethers::types::{Address, U256};
use std::collections::BTreeMap;

/// Sentinel for unlimited standing.
pub const MAX_ALLOWANCE: U256 = U256::MAX;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowanceLedger {
    allowances: BTreeMap<(Address, Address), U256>,
}

impl AllowanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero for unknown pairs.
    pub fn allowance(&self, university: Address, certifier: Address) -> U256 {
        self.allowances
            .get(&(university, certifier))
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn set_allowance(&mut self, university: Address, certifier: Address, amount: U256) {
        if amount.is_zero() {
            self.clear_allowance(university, certifier);
        } else {
            self.allowances.insert((university, certifier), amount);
        }
    }

    pub(crate) fn clear_allowance(&mut self, university: Address, certifier: Address) {
        self.allowances.remove(&(university, certifier));
    }

    pub fn iter(&self) -> impl Iterator<Item = (Address, Address, U256)> + '_ {
        self.allowances
            .iter()
            .map(|(&(university, certifier), &amount)| (university, certifier, amount))
    }
}
