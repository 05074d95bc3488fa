// src/models/metadata.rs
//! Certificate identifier derivation.
//!
//! Documents are never stored. A certificate is identified by the Keccak-256
//! hash of a canonical JSON rendering of its document metadata, and its
//! issue date is the metadata's creation timestamp.
//!
//! # Canonical form
//! - compact JSON, camelCase keys in declaration order
//! - absent fields are omitted
//! - `creationDate` as RFC 3339 UTC with millisecond precision
//!   (e.g. `2013-06-10T00:00:00.000Z`)

use crate::models::certificate::CertificateId;
use crate::utils::crypto::hash_data;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("creation date {0} is before the unix epoch")]
    PreEpochCreationDate(DateTime<Utc>),

    #[error("metadata serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Document metadata that identifies a certificate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(
        serialize_with = "serialize_millis",
        deserialize_with = "deserialize_rfc3339"
    )]
    pub creation_date: DateTime<Utc>,
}

impl CertificateMetadata {
    /// Canonical string that is hashed into the identifier.
    pub fn canonical_string(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Keccak-256 of the canonical string.
    pub fn certificate_id(&self) -> Result<CertificateId, MetadataError> {
        let canonical = self.canonical_string()?;
        Ok(CertificateId::from(hash_data(canonical.as_bytes())))
    }

    /// Creation date in epoch milliseconds.
    pub fn issue_date(&self) -> Result<u64, MetadataError> {
        u64::try_from(self.creation_date.timestamp_millis())
            .map_err(|_| MetadataError::PreEpochCreationDate(self.creation_date))
    }
}

fn serialize_millis<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn deserialize_rfc3339<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|date| date.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn diploma() -> CertificateMetadata {
        CertificateMetadata {
            title: Some("Master of Arts".into()),
            author: Some("0x70997970c51812dc3a010c7d01b50e0d17dc79c8".into()),
            subject: Some("Certificate of Jhon Doe. University Example".into()),
            creator: None,
            producer: None,
            creation_date: Utc.with_ymd_and_hms(2013, 6, 10, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_canonical_string_omits_absent_fields() {
        let canonical = diploma().canonical_string().unwrap();
        assert_eq!(
            canonical,
            "{\"title\":\"Master of Arts\",\
             \"author\":\"0x70997970c51812dc3a010c7d01b50e0d17dc79c8\",\
             \"subject\":\"Certificate of Jhon Doe. University Example\",\
             \"creationDate\":\"2013-06-10T00:00:00.000Z\"}"
        );
    }

    #[test]
    fn test_certificate_id_is_keccak_of_canonical_string() {
        let metadata = diploma();
        let expected = hash_data(metadata.canonical_string().unwrap().as_bytes());
        assert_eq!(metadata.certificate_id().unwrap().0, expected);
    }

    #[test]
    fn test_any_field_change_changes_the_id() {
        let original = diploma().certificate_id().unwrap();
        let mut edited = diploma();
        edited.title = Some("Master of Artss".into());
        assert_ne!(edited.certificate_id().unwrap(), original);
    }

    #[test]
    fn test_issue_date_in_milliseconds() {
        assert_eq!(diploma().issue_date().unwrap(), 1_370_822_400_000);

        let mut ancient = diploma();
        ancient.creation_date = Utc.with_ymd_and_hms(1969, 12, 31, 0, 0, 0).unwrap();
        assert!(matches!(
            ancient.issue_date(),
            Err(MetadataError::PreEpochCreationDate(_))
        ));
    }

    #[test]
    fn test_round_trips_through_json() {
        let json = diploma().canonical_string().unwrap();
        let parsed: CertificateMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, diploma());
    }
}
