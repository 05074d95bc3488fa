// src/registry/mod.rs
//! The certificate registry store.
//!
//! [`Registry`] owns the four components of the trust hierarchy and exposes
//! one method per operation. Mutating methods take the caller explicitly,
//! run every authorization and precondition check first, and only then
//! write. A returned error therefore means nothing changed.
//!
//! ## Components
//! 1. [`RoleRegistry`]: role membership
//! 2. [`UniversityDirectory`]: university profiles and standing
//! 3. [`AllowanceLedger`]: per (university, certifier) admission
//! 4. [`CertificateLedger`]: certifier links and certificate records

pub mod allowances;
pub mod authorization;
pub mod certificates;
pub mod error;
pub mod events;
pub mod roles;
pub mod universities;

pub use allowances::{AllowanceLedger, MAX_ALLOWANCE};
pub use certificates::CertificateLedger;
pub use error::{RegistryError, Result};
pub use events::RegistryEvent;
pub use roles::RoleRegistry;
pub use universities::UniversityDirectory;

use crate::models::certificate::{
    Certificate, CertificateData, CertificateId, CertificateRecord, Lifecycle,
};
use crate::models::role::Role;
use crate::models::university::{Standing, University, UniversityInfo};
use authorization::{
    authorize_certifier_removal, authorize_revocation, require_active_university,
    require_organization,
};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    roles: RoleRegistry,
    universities: UniversityDirectory,
    allowances: AllowanceLedger,
    certificates: CertificateLedger,
}

impl Registry {
    /// Creates a store whose only organization is `seed`.
    pub fn new(seed: Address) -> Self {
        let mut roles = RoleRegistry::new();
        roles.grant_role(Role::Organization, seed);
        Registry {
            roles,
            universities: UniversityDirectory::new(),
            allowances: AllowanceLedger::new(),
            certificates: CertificateLedger::new(),
        }
    }

    // =====================
    // Roles
    // =====================

    pub fn has_role(&self, role: Role, principal: Address) -> bool {
        self.roles.has_role(role, principal)
    }

    pub fn is_organization(&self, principal: Address) -> bool {
        self.roles.is_organization(principal)
    }

    pub fn add_organization(&mut self, caller: Address, account: Address) -> Result<RegistryEvent> {
        require_organization(&self.roles, caller)?;

        self.roles.grant_role(Role::Organization, account);
        Ok(RegistryEvent::OrganizationAdded { account })
    }

    pub fn remove_organization(&mut self, caller: Address, account: Address) -> Result<RegistryEvent> {
        require_organization(&self.roles, caller)?;

        self.roles.revoke_role(Role::Organization, account);
        Ok(RegistryEvent::OrganizationRemoved { account })
    }

    // =====================
    // Universities
    // =====================

    /// Adds a university, or starts a new epoch for a deactivated one.
    pub fn add_university(
        &mut self,
        caller: Address,
        account: Address,
        uri: impl Into<String>,
    ) -> Result<RegistryEvent> {
        require_organization(&self.roles, caller)?;

        let uri = uri.into();
        self.universities.activate(account, uri.clone());
        self.roles.grant_role(Role::University, account);
        Ok(RegistryEvent::UniversityAdded { account, uri })
    }

    pub fn remove_university(&mut self, caller: Address, account: Address) -> Result<RegistryEvent> {
        self.deactivate_university(caller, account, Standing::Removed)?;
        Ok(RegistryEvent::UniversityRemoved { account })
    }

    pub fn discredit_university(
        &mut self,
        caller: Address,
        account: Address,
        reason: impl Into<String>,
    ) -> Result<RegistryEvent> {
        let reason = reason.into();
        self.deactivate_university(
            caller,
            account,
            Standing::Discredited { reason: reason.clone() },
        )?;
        Ok(RegistryEvent::UniversityDiscredited { account, reason })
    }

    /// Certifier links of the university are left in place; registration
    /// re-checks the university's standing instead.
    fn deactivate_university(
        &mut self,
        caller: Address,
        account: Address,
        standing: Standing,
    ) -> Result<()> {
        require_organization(&self.roles, caller)?;
        if self.universities.get(account).is_none() {
            return Err(RegistryError::InvalidUniversity(account));
        }

        self.universities.deactivate(account, standing);
        self.roles.revoke_role(Role::University, account);
        Ok(())
    }

    pub fn get_university(&self, account: Address) -> UniversityInfo {
        self.universities.info(account)
    }

    /// Empty unless the university was discredited in its current epoch.
    pub fn get_university_discredit_reason(&self, account: Address) -> String {
        self.universities.discredit_reason(account)
    }

    // =====================
    // Allowances
    // =====================

    pub fn allowance(&self, university: Address, certifier: Address) -> U256 {
        self.allowances.allowance(university, certifier)
    }

    pub fn max_allowance(&self) -> U256 {
        MAX_ALLOWANCE
    }

    // =====================
    // Certifiers
    // =====================

    /// Admits `account` as a certifier of the calling university.
    pub fn add_certifier(&mut self, caller: Address, account: Address) -> Result<RegistryEvent> {
        require_active_university(&self.roles, &self.universities, caller)?;
        if let Some(owner) = self.certificates.university_of(account) {
            return Err(RegistryError::ExistentCertifier(owner));
        }

        self.certificates.link(account, caller);
        self.roles.grant_role(Role::Certifier, account);
        self.allowances.set_allowance(caller, account, MAX_ALLOWANCE);
        Ok(RegistryEvent::CertifierAdded {
            account,
            university: caller,
        })
    }

    pub fn remove_certifier(&mut self, caller: Address, account: Address) -> Result<RegistryEvent> {
        let university = self
            .certificates
            .university_of(account)
            .ok_or(RegistryError::InvalidCertifier(account))?;
        authorize_certifier_removal(&self.roles, university, caller)?;

        self.certificates.unlink(account);
        self.roles.revoke_role(Role::Certifier, account);
        self.allowances.clear_allowance(university, account);
        Ok(RegistryEvent::CertifierRemoved { account, university })
    }

    pub fn get_university_of_certifier(&self, account: Address) -> Address {
        self.certificates.university_of_certifier(account)
    }

    // =====================
    // Certificates
    // =====================

    pub fn register_certificate(
        &mut self,
        caller: Address,
        id: CertificateId,
        issue_date: u64,
        expiration_date: u64,
    ) -> Result<RegistryEvent> {
        if !self.roles.has_role(Role::Certifier, caller) {
            return Err(RegistryError::InvalidCertifier(caller));
        }
        let university = self
            .certificates
            .university_of(caller)
            .ok_or(RegistryError::InvalidCertifier(caller))?;
        if !self.universities.is_active(university) {
            return Err(RegistryError::InvalidUniversity(university));
        }
        if self.allowances.allowance(university, caller).is_zero() {
            return Err(RegistryError::InvalidCertifier(caller));
        }
        if let Some(existing) = self.certificates.record(&id) {
            return Err(RegistryError::ExistentCertificate(existing.data.issue_date));
        }

        self.certificates.insert(
            id,
            CertificateData {
                certifier: caller,
                university,
                issue_date,
                expiration_date,
            },
        );
        Ok(RegistryEvent::CertificateRegistered {
            id,
            certifier: caller,
            university,
            issue_date,
            expiration_date,
        })
    }

    /// Revokes a certificate. Revoking again succeeds and replaces the
    /// description.
    pub fn revoke_certificate(
        &mut self,
        caller: Address,
        id: CertificateId,
        description: impl Into<String>,
    ) -> Result<RegistryEvent> {
        let record = self
            .certificates
            .record(&id)
            .ok_or(RegistryError::NonexistentCertificate(id))?;
        authorize_revocation(&self.roles, record, caller)?;

        let description = description.into();
        self.certificates.revoke(&id, description.clone());
        Ok(RegistryEvent::CertificateRevoked {
            id,
            revoker: caller,
            description,
        })
    }

    pub fn get_certificate(&self, id: &CertificateId) -> Certificate {
        self.certificates.certificate(id)
    }

    pub fn certificate_state(&self, id: &CertificateId) -> Lifecycle {
        self.certificates.lifecycle(id)
    }

    // =====================
    // Snapshots
    // =====================

    /// Serializable copy of the whole store.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            roles: Role::ALL
                .into_iter()
                .flat_map(move |role| {
                    self.roles
                        .holders(role)
                        .map(move |account| RoleGrant { role, account })
                })
                .collect(),
            universities: self
                .universities
                .iter()
                .map(|(&account, university)| UniversityEntry {
                    account,
                    university: university.clone(),
                })
                .collect(),
            certifiers: self
                .certificates
                .links()
                .map(|(certifier, university)| CertifierLink { certifier, university })
                .collect(),
            allowances: self
                .allowances
                .iter()
                .map(|(university, certifier, amount)| AllowanceEntry {
                    university,
                    certifier,
                    amount,
                })
                .collect(),
            certificates: self
                .certificates
                .records()
                .map(|(&id, record)| CertificateEntry {
                    id,
                    record: record.clone(),
                })
                .collect(),
        }
    }

    /// Rebuilds a store from a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut registry = Registry {
            roles: RoleRegistry::new(),
            universities: UniversityDirectory::new(),
            allowances: AllowanceLedger::new(),
            certificates: CertificateLedger::new(),
        };
        for grant in snapshot.roles {
            registry.roles.grant_role(grant.role, grant.account);
        }
        for entry in snapshot.universities {
            registry.universities.insert(entry.account, entry.university);
        }
        for link in snapshot.certifiers {
            registry.certificates.link(link.certifier, link.university);
        }
        for entry in snapshot.allowances {
            registry
                .allowances
                .set_allowance(entry.university, entry.certifier, entry.amount);
        }
        for entry in snapshot.certificates {
            registry.certificates.restore(entry.id, entry.record);
        }
        registry
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub roles: Vec<RoleGrant>,
    pub universities: Vec<UniversityEntry>,
    pub certifiers: Vec<CertifierLink>,
    pub allowances: Vec<AllowanceEntry>,
    pub certificates: Vec<CertificateEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    pub role: Role,
    pub account: Address,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UniversityEntry {
    pub account: Address,
    pub university: University,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CertifierLink {
    pub certifier: Address,
    pub university: Address,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AllowanceEntry {
    pub university: Address,
    pub certifier: Address,
    pub amount: U256,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CertificateEntry {
    pub id: CertificateId,
    pub record: CertificateRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::H256;

    const ORG: Address = Address::repeat_byte(0x01);
    const UNIVERSITY: Address = Address::repeat_byte(0x02);
    const CERTIFIER: Address = Address::repeat_byte(0x03);
    const OTHER_UNIVERSITY: Address = Address::repeat_byte(0x04);
    const STRANGER: Address = Address::repeat_byte(0x05);

    fn certificate_id(seed: u8) -> CertificateId {
        H256::repeat_byte(seed)
    }

    /// Organization, one university with URI "random" and one certifier.
    fn hierarchy() -> Registry {
        let mut registry = Registry::new(ORG);
        registry.add_university(ORG, UNIVERSITY, "random").unwrap();
        registry.add_certifier(UNIVERSITY, CERTIFIER).unwrap();
        registry
    }

    #[test]
    fn test_seed_is_organization() {
        let registry = Registry::new(ORG);
        assert!(registry.is_organization(ORG));
        assert!(registry.has_role(Role::Organization, ORG));
        assert!(!registry.is_organization(STRANGER));
    }

    #[test]
    fn test_add_and_remove_organization() {
        let mut registry = Registry::new(ORG);

        registry.add_organization(ORG, STRANGER).unwrap();
        assert!(registry.is_organization(STRANGER));

        // the new organization can manage others
        registry.remove_organization(STRANGER, ORG).unwrap();
        assert!(!registry.is_organization(ORG));
        assert_eq!(
            registry.add_organization(ORG, UNIVERSITY),
            Err(RegistryError::InvalidOrganization(ORG))
        );
    }

    #[test]
    fn test_university_management_requires_organization() {
        let mut registry = Registry::new(ORG);
        let before = registry.clone();

        assert_eq!(
            registry.add_university(STRANGER, UNIVERSITY, "uri"),
            Err(RegistryError::InvalidOrganization(STRANGER))
        );
        assert_eq!(
            registry.remove_university(STRANGER, UNIVERSITY),
            Err(RegistryError::InvalidOrganization(STRANGER))
        );
        assert_eq!(
            registry.discredit_university(STRANGER, UNIVERSITY, "fraud"),
            Err(RegistryError::InvalidOrganization(STRANGER))
        );
        assert_eq!(registry, before);
    }

    #[test]
    fn test_add_university_grants_role_and_profile() {
        let mut registry = Registry::new(ORG);
        let event = registry.add_university(ORG, UNIVERSITY, "random").unwrap();

        assert_eq!(
            event,
            RegistryEvent::UniversityAdded { account: UNIVERSITY, uri: "random".into() }
        );
        assert!(registry.has_role(Role::University, UNIVERSITY));
        assert_eq!(
            registry.get_university(UNIVERSITY),
            UniversityInfo { active: true, uri: "random".into() }
        );
        assert_eq!(registry.get_university_discredit_reason(UNIVERSITY), "");
    }

    #[test]
    fn test_remove_university_keeps_history_without_reason() {
        let mut registry = hierarchy();
        registry.remove_university(ORG, UNIVERSITY).unwrap();

        assert!(!registry.has_role(Role::University, UNIVERSITY));
        assert_eq!(
            registry.get_university(UNIVERSITY),
            UniversityInfo { active: false, uri: "random".into() }
        );
        assert_eq!(registry.get_university_discredit_reason(UNIVERSITY), "");
        // links are not cascaded
        assert_eq!(registry.get_university_of_certifier(CERTIFIER), UNIVERSITY);
    }

    #[test]
    fn test_remove_after_discredit_keeps_reason() {
        let mut registry = hierarchy();
        registry.discredit_university(ORG, UNIVERSITY, "fraud").unwrap();
        registry.remove_university(ORG, UNIVERSITY).unwrap();

        assert_eq!(registry.get_university_discredit_reason(UNIVERSITY), "fraud");
        assert_eq!(
            registry.get_university(UNIVERSITY),
            UniversityInfo { active: false, uri: "random".into() }
        );

        // a later discredit replaces the reason
        registry.discredit_university(ORG, UNIVERSITY, "diploma mill").unwrap();
        assert_eq!(registry.get_university_discredit_reason(UNIVERSITY), "diploma mill");
    }

    #[test]
    fn test_deactivating_unknown_university_fails() {
        let mut registry = Registry::new(ORG);
        assert_eq!(
            registry.remove_university(ORG, STRANGER),
            Err(RegistryError::InvalidUniversity(STRANGER))
        );
        assert_eq!(
            registry.discredit_university(ORG, STRANGER, "fraud"),
            Err(RegistryError::InvalidUniversity(STRANGER))
        );
        assert_eq!(registry.get_university(STRANGER), UniversityInfo::default());
    }

    #[test]
    fn test_readding_university_starts_new_epoch() {
        let mut registry = hierarchy();
        registry.discredit_university(ORG, UNIVERSITY, "fraud").unwrap();
        registry.add_university(ORG, UNIVERSITY, "https://reformed.example").unwrap();

        assert_eq!(
            registry.get_university(UNIVERSITY),
            UniversityInfo { active: true, uri: "https://reformed.example".into() }
        );
        assert_eq!(registry.get_university_discredit_reason(UNIVERSITY), "");
        registry
            .register_certificate(CERTIFIER, certificate_id(7), 5, 0)
            .unwrap();
    }

    #[test]
    fn test_add_certifier_sets_link_and_max_allowance() {
        let registry = hierarchy();

        assert!(registry.has_role(Role::Certifier, CERTIFIER));
        assert_eq!(registry.get_university_of_certifier(CERTIFIER), UNIVERSITY);
        assert_eq!(registry.allowance(UNIVERSITY, CERTIFIER), MAX_ALLOWANCE);
        assert_eq!(registry.allowance(UNIVERSITY, CERTIFIER), registry.max_allowance());
    }

    #[test]
    fn test_organization_cannot_add_certifier_without_joining() {
        let mut registry = Registry::new(ORG);
        assert_eq!(
            registry.add_certifier(ORG, CERTIFIER),
            Err(RegistryError::InvalidUniversity(ORG))
        );
        assert_eq!(
            registry.add_certifier(STRANGER, CERTIFIER),
            Err(RegistryError::InvalidUniversity(STRANGER))
        );

        // once the organization joins as a university it may add certifiers
        registry.add_university(ORG, ORG, "self").unwrap();
        registry.add_certifier(ORG, CERTIFIER).unwrap();
        assert_eq!(registry.get_university_of_certifier(CERTIFIER), ORG);
    }

    #[test]
    fn test_discredited_university_cannot_add_certifiers() {
        let mut registry = hierarchy();
        registry.discredit_university(ORG, UNIVERSITY, "fraud").unwrap();
        assert_eq!(
            registry.add_certifier(UNIVERSITY, STRANGER),
            Err(RegistryError::InvalidUniversity(UNIVERSITY))
        );
    }

    #[test]
    fn test_certifier_has_one_university() {
        let mut registry = hierarchy();
        registry.add_university(ORG, OTHER_UNIVERSITY, "other").unwrap();
        let before = registry.clone();

        assert_eq!(
            registry.add_certifier(OTHER_UNIVERSITY, CERTIFIER),
            Err(RegistryError::ExistentCertifier(UNIVERSITY))
        );
        assert_eq!(registry, before);
    }

    #[test]
    fn test_remove_certifier_by_owner() {
        let mut registry = hierarchy();
        let event = registry.remove_certifier(UNIVERSITY, CERTIFIER).unwrap();

        assert_eq!(
            event,
            RegistryEvent::CertifierRemoved { account: CERTIFIER, university: UNIVERSITY }
        );
        assert!(!registry.has_role(Role::Certifier, CERTIFIER));
        assert!(registry.allowance(UNIVERSITY, CERTIFIER).is_zero());
        assert_eq!(registry.get_university_of_certifier(CERTIFIER), Address::zero());
    }

    #[test]
    fn test_remove_certifier_by_other_university_fails() {
        let mut registry = hierarchy();
        registry.add_university(ORG, OTHER_UNIVERSITY, "other").unwrap();

        assert_eq!(
            registry.remove_certifier(OTHER_UNIVERSITY, CERTIFIER),
            Err(RegistryError::InvalidSuperior(OTHER_UNIVERSITY))
        );
        assert_eq!(registry.get_university_of_certifier(CERTIFIER), UNIVERSITY);

        registry.remove_certifier(ORG, CERTIFIER).unwrap();
        assert_eq!(registry.get_university_of_certifier(CERTIFIER), Address::zero());
    }

    #[test]
    fn test_remove_unknown_certifier_fails() {
        let mut registry = hierarchy();
        assert_eq!(
            registry.remove_certifier(ORG, STRANGER),
            Err(RegistryError::InvalidCertifier(STRANGER))
        );
    }

    #[test]
    fn test_register_and_get_certificate() {
        let mut registry = hierarchy();
        let id = certificate_id(0xaa);

        assert_eq!(registry.certificate_state(&id), Lifecycle::Unregistered);
        assert_eq!(registry.get_certificate(&id), Certificate::default());

        registry.register_certificate(CERTIFIER, id, 1000, 0).unwrap();

        let certificate = registry.get_certificate(&id);
        assert_eq!(
            certificate.data,
            CertificateData {
                certifier: CERTIFIER,
                university: UNIVERSITY,
                issue_date: 1000,
                expiration_date: 0,
            }
        );
        assert!(!certificate.status.revoked);
        assert_eq!(certificate.status.description, "");
        assert_eq!(registry.certificate_state(&id), Lifecycle::Active);
    }

    #[test]
    fn test_registration_is_write_once() {
        let mut registry = hierarchy();
        let id = certificate_id(0xaa);
        registry.register_certificate(CERTIFIER, id, 1000, 0).unwrap();
        let first = registry.get_certificate(&id);

        assert_eq!(
            registry.register_certificate(CERTIFIER, id, 2000, 3000),
            Err(RegistryError::ExistentCertificate(1000))
        );
        assert_eq!(registry.get_certificate(&id), first);

        // a revoked certificate is still registered
        registry.revoke_certificate(CERTIFIER, id, "mistake").unwrap();
        assert_eq!(
            registry.register_certificate(CERTIFIER, id, 2000, 0),
            Err(RegistryError::ExistentCertificate(1000))
        );
    }

    #[test]
    fn test_register_requires_certifier() {
        let mut registry = hierarchy();
        assert_eq!(
            registry.register_certificate(STRANGER, certificate_id(1), 1, 0),
            Err(RegistryError::InvalidCertifier(STRANGER))
        );
        assert_eq!(
            registry.register_certificate(UNIVERSITY, certificate_id(1), 1, 0),
            Err(RegistryError::InvalidCertifier(UNIVERSITY))
        );
    }

    #[test]
    fn test_discredited_university_blocks_registration_prospectively() {
        let mut registry = hierarchy();
        let issued = certificate_id(1);
        registry.register_certificate(CERTIFIER, issued, 1000, 0).unwrap();
        let before = registry.get_certificate(&issued);

        registry.discredit_university(ORG, UNIVERSITY, "fraud").unwrap();

        assert_eq!(
            registry.register_certificate(CERTIFIER, certificate_id(2), 1000, 0),
            Err(RegistryError::InvalidUniversity(UNIVERSITY))
        );
        assert_eq!(registry.get_university_discredit_reason(UNIVERSITY), "fraud");
        assert_eq!(registry.get_certificate(&issued), before);
        assert_eq!(registry.certificate_state(&certificate_id(2)), Lifecycle::Unregistered);
    }

    #[test]
    fn test_removed_certifier_cannot_register() {
        let mut registry = hierarchy();
        registry.remove_certifier(UNIVERSITY, CERTIFIER).unwrap();
        assert_eq!(
            registry.register_certificate(CERTIFIER, certificate_id(1), 1, 0),
            Err(RegistryError::InvalidCertifier(CERTIFIER))
        );
    }

    #[test]
    fn test_revocation_authorities() {
        let mut registry = hierarchy();
        let ids = [certificate_id(1), certificate_id(2), certificate_id(3)];
        for id in ids {
            registry.register_certificate(CERTIFIER, id, 1000, 0).unwrap();
        }

        registry.revoke_certificate(CERTIFIER, ids[0], "by certifier").unwrap();
        registry.revoke_certificate(UNIVERSITY, ids[1], "by university").unwrap();
        registry.revoke_certificate(ORG, ids[2], "by organization").unwrap();

        for id in ids {
            assert!(registry.get_certificate(&id).status.revoked);
            assert_eq!(registry.certificate_state(&id), Lifecycle::Revoked);
        }
        assert_eq!(registry.get_certificate(&ids[1]).status.description, "by university");
    }

    #[test]
    fn test_revocation_by_stranger_fails() {
        let mut registry = hierarchy();
        registry.add_university(ORG, OTHER_UNIVERSITY, "other").unwrap();
        let id = certificate_id(1);
        registry.register_certificate(CERTIFIER, id, 1000, 0).unwrap();

        for caller in [STRANGER, OTHER_UNIVERSITY] {
            assert_eq!(
                registry.revoke_certificate(caller, id, "nope"),
                Err(RegistryError::InvalidRevoker(caller))
            );
        }
        assert!(!registry.get_certificate(&id).status.revoked);
    }

    #[test]
    fn test_rerevocation_keeps_last_description() {
        let mut registry = hierarchy();
        let id = certificate_id(1);
        registry.register_certificate(CERTIFIER, id, 1000, 0).unwrap();
        let data = registry.get_certificate(&id).data;

        registry.revoke_certificate(CERTIFIER, id, "first").unwrap();
        registry.revoke_certificate(ORG, id, "second").unwrap();

        let certificate = registry.get_certificate(&id);
        assert!(certificate.status.revoked);
        assert_eq!(certificate.status.description, "second");
        assert_eq!(certificate.data, data);
    }

    #[test]
    fn test_revoking_unregistered_certificate_fails() {
        let mut registry = hierarchy();
        let id = certificate_id(9);
        assert_eq!(
            registry.revoke_certificate(ORG, id, "nothing"),
            Err(RegistryError::NonexistentCertificate(id))
        );
        assert_eq!(registry.certificate_state(&id), Lifecycle::Unregistered);
    }

    #[test]
    fn test_removed_certifier_can_still_revoke_own_certificates() {
        let mut registry = hierarchy();
        let id = certificate_id(1);
        registry.register_certificate(CERTIFIER, id, 1000, 0).unwrap();
        registry.remove_certifier(UNIVERSITY, CERTIFIER).unwrap();

        registry.revoke_certificate(CERTIFIER, id, "withdrawn").unwrap();
        assert!(registry.get_certificate(&id).status.revoked);
    }

    #[test]
    fn test_snapshot_restores_identical_store() {
        let mut registry = hierarchy();
        registry.add_university(ORG, OTHER_UNIVERSITY, "other").unwrap();
        registry.discredit_university(ORG, OTHER_UNIVERSITY, "fraud").unwrap();
        registry.register_certificate(CERTIFIER, certificate_id(1), 1000, 0).unwrap();
        registry.register_certificate(CERTIFIER, certificate_id(2), 1000, 5000).unwrap();
        registry.revoke_certificate(ORG, certificate_id(2), "expired early").unwrap();

        let json = serde_json::to_string(&registry.snapshot()).unwrap();
        let restored = Registry::from_snapshot(serde_json::from_str(&json).unwrap());

        assert_eq!(restored, registry);
    }
}
