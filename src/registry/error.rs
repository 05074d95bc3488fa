// src/registry/error.rs
//! Errors raised by registry operations.
//!
//! Every variant carries the principal or value that caused the rejection.
//! A failed operation never leaves partial state behind.

use crate::models::certificate::CertificateId;
use ethers::types::Address;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller lacks `Organization` for an organization or university call.
    #[error("{0:?} is not an organization")]
    InvalidOrganization(Address),

    /// The relevant university is missing, not a university, or inactive.
    #[error("{0:?} is not an active university")]
    InvalidUniversity(Address),

    /// Caller lacks `Certifier`, or the target has no certifier link.
    #[error("{0:?} is not a certifier")]
    InvalidCertifier(Address),

    /// Caller is neither the owning university nor an organization.
    #[error("{0:?} is not a superior of the certifier")]
    InvalidSuperior(Address),

    /// Caller is not the issuing certifier, its university, or an organization.
    #[error("{0:?} may not revoke this certificate")]
    InvalidRevoker(Address),

    /// The identifier is already registered; carries the original issue date.
    #[error("certificate already registered with issue date {0}")]
    ExistentCertificate(u64),

    /// The target is already linked to a university; carries that university.
    #[error("certifier already belongs to university {0:?}")]
    ExistentCertifier(Address),

    #[error("certificate {0:?} is not registered")]
    NonexistentCertificate(CertificateId),
}

impl RegistryError {
    /// Stable variant name, used as the error code on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::InvalidOrganization(_) => "InvalidOrganization",
            RegistryError::InvalidUniversity(_) => "InvalidUniversity",
            RegistryError::InvalidCertifier(_) => "InvalidCertifier",
            RegistryError::InvalidSuperior(_) => "InvalidSuperior",
            RegistryError::InvalidRevoker(_) => "InvalidRevoker",
            RegistryError::ExistentCertificate(_) => "ExistentCertificate",
            RegistryError::ExistentCertifier(_) => "ExistentCertifier",
            RegistryError::NonexistentCertificate(_) => "NonexistentCertificate",
        }
    }

    /// The context value rendered as a string.
    pub fn detail(&self) -> String {
        match self {
            RegistryError::InvalidOrganization(principal)
            | RegistryError::InvalidUniversity(principal)
            | RegistryError::InvalidCertifier(principal)
            | RegistryError::InvalidSuperior(principal)
            | RegistryError::InvalidRevoker(principal)
            | RegistryError::ExistentCertifier(principal) => format!("{:?}", principal),
            RegistryError::ExistentCertificate(issue_date) => issue_date.to_string(),
            RegistryError::NonexistentCertificate(id) => format!("{:?}", id),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
