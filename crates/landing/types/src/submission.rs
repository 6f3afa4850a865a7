//! Submission records before and after persistence

use crate::catalog::{ExperienceLevel, Specialization};
use crate::form::ValidatedContact;
use crate::ids::SubmissionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client address recorded when the request source cannot be determined
pub const UNKNOWN_CLIENT_ADDRESS: &str = "Unknown";

/// A validated application stamped with server-side metadata, ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub contact: ValidatedContact,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

impl NewSubmission {
    pub fn new(
        contact: ValidatedContact,
        ip_address: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            contact,
            ip_address: ip_address.into(),
            created_at,
        }
    }

    /// Attach the identifier storage assigned to this record.
    pub fn into_stored(self, id: SubmissionId) -> StoredSubmission {
        let NewSubmission {
            contact,
            ip_address,
            created_at,
        } = self;

        StoredSubmission {
            id,
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            specialization: contact.specialization.code().to_string(),
            experience_level: contact.experience_level.code().to_string(),
            message: contact.message,
            ip_address: Some(ip_address),
            created_at,
        }
    }
}

/// A persisted row of the `landing_coach` table.
///
/// Enum columns hold their stored codes as text; rows written before a code
/// was retired still list and render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSubmission {
    pub id: SubmissionId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialization: String,
    pub experience_level: String,
    pub message: String,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StoredSubmission {
    pub fn specialization(&self) -> Option<Specialization> {
        Specialization::from_code(&self.specialization)
    }

    pub fn experience_level(&self) -> Option<ExperienceLevel> {
        ExperienceLevel::from_code(&self.experience_level)
    }

    pub fn specialization_label(&self) -> &'static str {
        Specialization::label_for_code(&self.specialization)
    }

    pub fn experience_label(&self) -> &'static str {
        ExperienceLevel::label_for_code(&self.experience_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ContactForm;
    use chrono::TimeZone;

    #[test]
    fn test_into_stored_keeps_every_column() {
        let contact = ContactForm {
            name: Some("Jo".into()),
            email: Some("jo@x.com".into()),
            phone: Some("12345".into()),
            specialization: Some("ml".into()),
            experience_level: Some("advanced".into()),
            message: Some("Hello there!".into()),
        }
        .validate()
        .unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();

        let stored = NewSubmission::new(contact, "10.0.0.1", at).into_stored(SubmissionId::new(7));

        assert_eq!(stored.id.get(), 7);
        assert_eq!(stored.specialization, "ml");
        assert_eq!(stored.experience_level, "advanced");
        assert_eq!(stored.phone.as_deref(), Some("12345"));
        assert_eq!(stored.ip_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(stored.created_at, at);
        assert_eq!(stored.specialization_label(), "Machine Learning");
        assert_eq!(stored.experience_label(), "Продвинутый");
    }

    #[test]
    fn test_legacy_codes_render_with_fallback() {
        let stored = StoredSubmission {
            id: SubmissionId::new(1),
            name: "Old".into(),
            email: "old@example.com".into(),
            phone: None,
            specialization: "frontend".into(),
            experience_level: String::new(),
            message: "legacy row".into(),
            ip_address: None,
            created_at: Utc::now(),
        };
        assert_eq!(stored.specialization(), None);
        assert_eq!(stored.specialization_label(), "Не указана");
        assert_eq!(stored.experience_label(), "Не указан");
    }
}
