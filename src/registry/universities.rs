// src/registry/universities.rs
//! University directory.

use crate::models::university::{Standing, University, UniversityInfo};
use ethers::types::Address;
use std::collections::BTreeMap;

/// Per-university profiles keyed by the university's principal.
///
/// Records are only ever deactivated, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniversityDirectory {
    records: BTreeMap<Address, University>,
}

impl UniversityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, principal: Address) -> Option<&University> {
        self.records.get(&principal)
    }

    pub fn is_active(&self, principal: Address) -> bool {
        self.records.get(&principal).map_or(false, University::is_active)
    }

    /// `{ active: false, uri: "" }` for unknown principals.
    pub fn info(&self, principal: Address) -> UniversityInfo {
        self.records
            .get(&principal)
            .map(University::info)
            .unwrap_or_default()
    }

    pub fn discredit_reason(&self, principal: Address) -> String {
        self.records
            .get(&principal)
            .map(|university| university.discredit_reason().to_string())
            .unwrap_or_default()
    }

    /// Creates the record, or starts a new epoch for an existing one.
    pub(crate) fn activate(&mut self, principal: Address, uri: String) {
        self.records.insert(principal, University::new(uri));
    }

    /// Moves an existing record to `standing`. No-op for unknown principals.
    ///
    /// A plain removal never downgrades a discredit: the reason stays until
    /// [`activate`](Self::activate) starts a new epoch.
    pub(crate) fn deactivate(&mut self, principal: Address, standing: Standing) {
        if let Some(record) = self.records.get_mut(&principal) {
            if matches!(
                (&record.standing, &standing),
                (Standing::Discredited { .. }, Standing::Removed)
            ) {
                return;
            }
            record.standing = standing;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &University)> {
        self.records.iter()
    }

    pub(crate) fn insert(&mut self, principal: Address, university: University) {
        self.records.insert(principal, university);
    }
}
