// src/registry/events.rs
//! Events emitted by committed registry mutations.

use crate::models::certificate::CertificateId;
use ethers::types::Address;
use serde::{Deserialize, Serialize};

/// Describes one committed state transition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum RegistryEvent {
    OrganizationAdded {
        account: Address,
    },
    OrganizationRemoved {
        account: Address,
    },
    UniversityAdded {
        account: Address,
        uri: String,
    },
    UniversityRemoved {
        account: Address,
    },
    UniversityDiscredited {
        account: Address,
        reason: String,
    },
    CertifierAdded {
        account: Address,
        university: Address,
    },
    CertifierRemoved {
        account: Address,
        university: Address,
    },
    #[serde(rename_all = "camelCase")]
    CertificateRegistered {
        id: CertificateId,
        certifier: Address,
        university: Address,
        issue_date: u64,
        expiration_date: u64,
    },
    CertificateRevoked {
        id: CertificateId,
        revoker: Address,
        description: String,
    },
}
