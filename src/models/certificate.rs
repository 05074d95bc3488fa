// src/models/certificate.rs
//! Certificate ledger records.
//!
//! A certificate is keyed by an opaque 32-byte content hash. Its issuance
//! data is written once; only the revocation state may change afterwards,
//! and only from `Active` to `Revoked`.

use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};

/// Content-hash identifier of a certificate.
pub type CertificateId = H256;

/// Immutable issuance data.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateData {
    /// Certifier that registered the certificate.
    pub certifier: Address,
    /// University owning the certifier at registration time.
    pub university: Address,
    /// Epoch milliseconds.
    pub issue_date: u64,
    /// Epoch milliseconds, `0` for no expiry.
    pub expiration_date: u64,
}

impl CertificateData {
    pub fn never_expires(&self) -> bool {
        self.expiration_date == 0
    }
}

/// Revocation state of a registered certificate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CertificateState {
    Active,
    Revoked { description: String },
}

/// A registered certificate as stored in the ledger.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    pub data: CertificateData,
    pub state: CertificateState,
}

impl CertificateRecord {
    pub fn new(data: CertificateData) -> Self {
        CertificateRecord {
            data,
            state: CertificateState::Active,
        }
    }

    pub fn is_revoked(&self) -> bool {
        matches!(self.state, CertificateState::Revoked { .. })
    }

    /// Marks the record revoked. A second revocation replaces the description.
    pub fn revoke(&mut self, description: impl Into<String>) {
        self.state = CertificateState::Revoked {
            description: description.into(),
        };
    }

    /// Public projection in the `{ data, status }` shape.
    pub fn view(&self) -> Certificate {
        let status = match &self.state {
            CertificateState::Active => CertificateStatus::default(),
            CertificateState::Revoked { description } => CertificateStatus {
                revoked: true,
                description: description.clone(),
            },
        };
        Certificate { data: self.data, status }
    }
}

/// Position of an identifier in the certificate lifecycle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Unregistered,
    Active,
    Revoked,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateStatus {
    pub revoked: bool,
    pub description: String,
}

/// Query result for `getCertificate`.
///
/// `Default` is the zero-valued record returned for unregistered ids.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Certificate {
    pub data: CertificateData,
    pub status: CertificateStatus,
}
