// src/services/registry_service.rs
//! Registry Service
//!
//! Shares one [`Registry`] between request handlers. Mutations are applied
//! one at a time under a single lock, each as an all-or-nothing transaction:
//! the core operation, the audit entry and (when configured) the snapshot
//! write all happen before the lock is released.
//!
//! The audit log keeps the most recent [`AUDIT_LOG_CAPACITY`] entries and is
//! stored in the snapshot next to the registry, so it survives restarts.

use crate::models::certificate::{Certificate, CertificateId, Lifecycle};
use crate::models::role::Role;
use crate::models::university::UniversityInfo;
use crate::registry::{Registry, RegistryError, RegistryEvent, Snapshot};
use crate::storage::snapshot::{SnapshotStore, StorageError};
use chrono::{DateTime, Utc};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Audit entries retained; older ones are dropped first.
pub const AUDIT_LOG_CAPACITY: usize = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One committed mutation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub caller: Address,
    #[serde(flatten)]
    pub event: RegistryEvent,
}

/// Snapshot file layout: the registry tables plus the retained audit log.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Persisted<L> {
    #[serde(flatten)]
    registry: Snapshot,
    #[serde(default)]
    audit_log: L,
}

struct State {
    registry: Registry,
    audit_log: VecDeque<AuditEntry>,
}

impl State {
    /// Appends `entry`, returning the oldest entry if it had to make room.
    fn push_audit(&mut self, entry: AuditEntry, capacity: usize) -> Option<AuditEntry> {
        let evicted = if self.audit_log.len() >= capacity {
            self.audit_log.pop_front()
        } else {
            None
        };
        self.audit_log.push_back(entry);
        evicted
    }

    /// Reverts the last [`push_audit`](Self::push_audit).
    fn undo_audit(&mut self, evicted: Option<AuditEntry>) {
        self.audit_log.pop_back();
        if let Some(entry) = evicted {
            self.audit_log.push_front(entry);
        }
    }
}

/// Thread-safe handle to the registry store.
///
/// Cloning shares the same store.
#[derive(Clone)]
pub struct RegistryService {
    state: Arc<Mutex<State>>,
    snapshots: Option<SnapshotStore>,
    audit_capacity: usize,
}

impl RegistryService {
    /// In-memory service seeded with one organization.
    pub fn new(seed_organization: Address) -> Self {
        Self::from_parts(Registry::new(seed_organization), VecDeque::new(), None)
    }

    /// Restores from `snapshots` if the file exists, otherwise seeds a new
    /// store and writes its first snapshot.
    pub fn with_snapshots(
        seed_organization: Address,
        snapshots: SnapshotStore,
    ) -> Result<Self, StorageError> {
        let (registry, audit_log) = match snapshots.load::<Persisted<VecDeque<AuditEntry>>>()? {
            Some(persisted) => {
                log::info!(
                    "restored registry and {} audit entries from {}",
                    persisted.audit_log.len(),
                    snapshots.path().display()
                );
                (Registry::from_snapshot(persisted.registry), persisted.audit_log)
            }
            None => {
                let registry = Registry::new(seed_organization);
                let audit_log = VecDeque::new();
                snapshots.save(&Persisted {
                    registry: registry.snapshot(),
                    audit_log: &audit_log,
                })?;
                log::info!(
                    "created registry at {} seeded with organization 0x{:x}",
                    snapshots.path().display(),
                    seed_organization
                );
                (registry, audit_log)
            }
        };
        Ok(Self::from_parts(registry, audit_log, Some(snapshots)))
    }

    fn from_parts(
        registry: Registry,
        audit_log: VecDeque<AuditEntry>,
        snapshots: Option<SnapshotStore>,
    ) -> Self {
        RegistryService {
            state: Arc::new(Mutex::new(State { registry, audit_log })),
            snapshots,
            audit_capacity: AUDIT_LOG_CAPACITY,
        }
    }

    /// Every operation checks before it writes, so a poisoned lock still
    /// guards a consistent store.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one mutation as a transaction.
    ///
    /// With snapshots enabled the operation runs on a copy that only
    /// replaces the live store once the snapshot is on disk. Each commit
    /// therefore clones the store and rewrites the whole file, so commit
    /// cost grows linearly with the number of stored records.
    fn transact<F>(&self, caller: Address, operation: F) -> Result<RegistryEvent, ServiceError>
    where
        F: FnOnce(&mut Registry) -> Result<RegistryEvent, RegistryError>,
    {
        let mut guard = self.lock();
        let state = &mut *guard;
        let entry = |event: &RegistryEvent| AuditEntry {
            timestamp: Utc::now(),
            caller,
            event: event.clone(),
        };

        let outcome = match &self.snapshots {
            None => match operation(&mut state.registry) {
                Ok(event) => {
                    state.push_audit(entry(&event), self.audit_capacity);
                    Ok(event)
                }
                Err(e) => Err(e.into()),
            },
            Some(store) => {
                let mut next = state.registry.clone();
                match operation(&mut next) {
                    Ok(event) => {
                        let evicted = state.push_audit(entry(&event), self.audit_capacity);
                        let saved = store.save(&Persisted {
                            registry: next.snapshot(),
                            audit_log: &state.audit_log,
                        });
                        match saved {
                            Ok(()) => {
                                state.registry = next;
                                Ok(event)
                            }
                            Err(e) => {
                                log::error!("snapshot write failed, discarding transaction: {}", e);
                                state.undo_audit(evicted);
                                Err(e.into())
                            }
                        }
                    }
                    Err(e) => Err(e.into()),
                }
            }
        };

        match outcome {
            Ok(event) => {
                log::info!("0x{:x} committed {:?}", caller, event);
                Ok(event)
            }
            Err(e) => {
                log::warn!("0x{:x} rejected: {}", caller, e);
                Err(e)
            }
        }
    }

    /// Read-only access to the store.
    fn read<T>(&self, query: impl FnOnce(&Registry) -> T) -> T {
        query(&self.lock().registry)
    }

    // =====================
    // Mutations
    // =====================

    pub fn add_organization(&self, caller: Address, account: Address) -> Result<RegistryEvent, ServiceError> {
        self.transact(caller, |registry| registry.add_organization(caller, account))
    }

    pub fn remove_organization(&self, caller: Address, account: Address) -> Result<RegistryEvent, ServiceError> {
        self.transact(caller, |registry| registry.remove_organization(caller, account))
    }

    pub fn add_university(
        &self,
        caller: Address,
        account: Address,
        uri: String,
    ) -> Result<RegistryEvent, ServiceError> {
        self.transact(caller, |registry| registry.add_university(caller, account, uri))
    }

    pub fn remove_university(&self, caller: Address, account: Address) -> Result<RegistryEvent, ServiceError> {
        self.transact(caller, |registry| registry.remove_university(caller, account))
    }

    pub fn discredit_university(
        &self,
        caller: Address,
        account: Address,
        reason: String,
    ) -> Result<RegistryEvent, ServiceError> {
        self.transact(caller, |registry| registry.discredit_university(caller, account, reason))
    }

    pub fn add_certifier(&self, caller: Address, account: Address) -> Result<RegistryEvent, ServiceError> {
        self.transact(caller, |registry| registry.add_certifier(caller, account))
    }

    pub fn remove_certifier(&self, caller: Address, account: Address) -> Result<RegistryEvent, ServiceError> {
        self.transact(caller, |registry| registry.remove_certifier(caller, account))
    }

    pub fn register_certificate(
        &self,
        caller: Address,
        id: CertificateId,
        issue_date: u64,
        expiration_date: u64,
    ) -> Result<RegistryEvent, ServiceError> {
        self.transact(caller, |registry| {
            registry.register_certificate(caller, id, issue_date, expiration_date)
        })
    }

    pub fn revoke_certificate(
        &self,
        caller: Address,
        id: CertificateId,
        description: String,
    ) -> Result<RegistryEvent, ServiceError> {
        self.transact(caller, |registry| registry.revoke_certificate(caller, id, description))
    }

    // =====================
    // Queries
    // =====================

    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.read(|registry| registry.has_role(role, account))
    }

    pub fn is_organization(&self, account: Address) -> bool {
        self.read(|registry| registry.is_organization(account))
    }

    pub fn get_university(&self, account: Address) -> UniversityInfo {
        self.read(|registry| registry.get_university(account))
    }

    pub fn get_university_discredit_reason(&self, account: Address) -> String {
        self.read(|registry| registry.get_university_discredit_reason(account))
    }

    pub fn allowance(&self, university: Address, certifier: Address) -> U256 {
        self.read(|registry| registry.allowance(university, certifier))
    }

    pub fn max_allowance(&self) -> U256 {
        self.read(Registry::max_allowance)
    }

    pub fn get_university_of_certifier(&self, account: Address) -> Address {
        self.read(|registry| registry.get_university_of_certifier(account))
    }

    pub fn get_certificate(&self, id: &CertificateId) -> Certificate {
        self.read(|registry| registry.get_certificate(id))
    }

    pub fn certificate_state(&self, id: &CertificateId) -> Lifecycle {
        self.read(|registry| registry.certificate_state(id))
    }

    /// Retained audit entries in commit order.
    pub fn audit_log(&self) -> Vec<AuditEntry> {
        self.lock().audit_log.iter().cloned().collect()
    }
}
