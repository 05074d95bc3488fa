// src/models/university.rs
//! University profile held by the directory.
//!
//! A record is never deleted. Deactivation moves its [`Standing`] away from
//! `Active` while the URI and any discredit reason stay readable.

use serde::{Deserialize, Serialize};

/// Lifecycle position of a university within its current epoch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Standing {
    Active,
    /// Deactivated without a recorded reason.
    Removed,
    /// Deactivated with a reason.
    Discredited { reason: String },
}

/// A university's directory entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct University {
    /// Descriptive URI supplied when the university was added.
    pub uri: String,
    pub standing: Standing,
}

impl University {
    /// Creates an active record.
    pub fn new(uri: impl Into<String>) -> Self {
        University {
            uri: uri.into(),
            standing: Standing::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.standing, Standing::Active)
    }

    /// Reason recorded by a discredit, empty otherwise.
    pub fn discredit_reason(&self) -> &str {
        match &self.standing {
            Standing::Discredited { reason } => reason,
            Standing::Active | Standing::Removed => "",
        }
    }

    /// Public projection of the record.
    pub fn info(&self) -> UniversityInfo {
        UniversityInfo {
            active: self.is_active(),
            uri: self.uri.clone(),
        }
    }
}

/// Query result for `getUniversity`.
///
/// Unknown universities are reported as `{ active: false, uri: "" }`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UniversityInfo {
    pub active: bool,
    pub uri: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_active() {
        let university = University::new("https://uni.example");
        assert!(university.is_active());
        assert_eq!(university.discredit_reason(), "");
        assert_eq!(
            university.info(),
            UniversityInfo { active: true, uri: "https://uni.example".into() }
        );
    }

    #[test]
    fn test_discredit_reason_only_for_discredited() {
        let mut university = University::new("random");
        university.standing = Standing::Removed;
        assert!(!university.is_active());
        assert_eq!(university.discredit_reason(), "");

        university.standing = Standing::Discredited { reason: "fraud".into() };
        assert!(!university.is_active());
        assert_eq!(university.discredit_reason(), "fraud");
        assert_eq!(university.info().uri, "random");
    }
}
