// src/registry/authorization.rs
//! Authorization predicates.
//!
//! One function per guarded operation. Each returns the authority that
//! allowed the call or the specific rejection. When several authorities
//! could allow a call, the most specific one is checked first.

use super::error::{RegistryError, Result};
use crate::models::certificate::CertificateRecord;
use crate::models::role::Role;
use crate::registry::roles::RoleRegistry;
use crate::registry::universities::UniversityDirectory;
use ethers::types::Address;

/// Who allowed a certifier removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Superior {
    OwningUniversity,
    Organization,
}

/// Who allowed a revocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revoker {
    IssuingCertifier,
    IssuingUniversity,
    Organization,
}

pub fn require_organization(roles: &RoleRegistry, caller: Address) -> Result<()> {
    if roles.is_organization(caller) {
        Ok(())
    } else {
        Err(RegistryError::InvalidOrganization(caller))
    }
}

/// The caller must hold `University` and have an active directory record.
///
/// Holding `Organization` is not enough: an organization only becomes a
/// certifier's superior by joining as a university.
pub fn require_active_university(
    roles: &RoleRegistry,
    directory: &UniversityDirectory,
    caller: Address,
) -> Result<()> {
    if roles.has_role(Role::University, caller) && directory.is_active(caller) {
        Ok(())
    } else {
        Err(RegistryError::InvalidUniversity(caller))
    }
}

pub fn authorize_certifier_removal(
    roles: &RoleRegistry,
    owning_university: Address,
    caller: Address,
) -> Result<Superior> {
    if caller == owning_university {
        Ok(Superior::OwningUniversity)
    } else if roles.is_organization(caller) {
        Ok(Superior::Organization)
    } else {
        Err(RegistryError::InvalidSuperior(caller))
    }
}

pub fn authorize_revocation(
    roles: &RoleRegistry,
    record: &CertificateRecord,
    caller: Address,
) -> Result<Revoker> {
    if caller == record.data.certifier {
        Ok(Revoker::IssuingCertifier)
    } else if caller == record.data.university {
        Ok(Revoker::IssuingUniversity)
    } else if roles.is_organization(caller) {
        Ok(Revoker::Organization)
    } else {
        Err(RegistryError::InvalidRevoker(caller))
    }
}
