// src/registry/certificates.rs
//! Certifier links and the certificate ledger.
//!
//! Kept together because a certifier's link decides which university a new
//! certificate is recorded under.

use crate::models::certificate::{
    Certificate, CertificateData, CertificateId, CertificateRecord, Lifecycle,
};
use ethers::types::Address;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateLedger {
    /// certifier -> owning university
    links: BTreeMap<Address, Address>,
    records: BTreeMap<CertificateId, CertificateRecord>,
}

impl CertificateLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn university_of(&self, certifier: Address) -> Option<Address> {
        self.links.get(&certifier).copied()
    }

    /// Null principal when the certifier has no link.
    pub fn university_of_certifier(&self, certifier: Address) -> Address {
        self.university_of(certifier).unwrap_or_else(Address::zero)
    }

    pub(crate) fn link(&mut self, certifier: Address, university: Address) {
        self.links.insert(certifier, university);
    }

    pub(crate) fn unlink(&mut self, certifier: Address) -> Option<Address> {
        self.links.remove(&certifier)
    }

    pub fn record(&self, id: &CertificateId) -> Option<&CertificateRecord> {
        self.records.get(id)
    }

    /// Zero-valued certificate for unregistered ids.
    pub fn certificate(&self, id: &CertificateId) -> Certificate {
        self.records
            .get(id)
            .map(CertificateRecord::view)
            .unwrap_or_default()
    }

    pub fn lifecycle(&self, id: &CertificateId) -> Lifecycle {
        match self.records.get(id) {
            None => Lifecycle::Unregistered,
            Some(record) if record.is_revoked() => Lifecycle::Revoked,
            Some(_) => Lifecycle::Active,
        }
    }

    /// Writes a new record. Callers must have checked the id is unregistered.
    pub(crate) fn insert(&mut self, id: CertificateId, data: CertificateData) {
        self.records.entry(id).or_insert_with(|| CertificateRecord::new(data));
    }

    pub(crate) fn revoke(&mut self, id: &CertificateId, description: String) {
        if let Some(record) = self.records.get_mut(id) {
            record.revoke(description);
        }
    }

    pub fn links(&self) -> impl Iterator<Item = (Address, Address)> + '_ {
        self.links.iter().map(|(&certifier, &university)| (certifier, university))
    }

    pub fn records(&self) -> impl Iterator<Item = (&CertificateId, &CertificateRecord)> {
        self.records.iter()
    }

    pub(crate) fn restore(&mut self, id: CertificateId, record: CertificateRecord) {
        self.records.insert(id, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
