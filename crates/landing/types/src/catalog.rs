//! Closed option sets offered by the application form
//!
//! Both sets are stored as their short wire codes (`ml`, `beginner`, ...)
//! and rendered with human labels in notifications.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label used when a stored specialization code is not in the catalog.
pub const UNKNOWN_SPECIALIZATION_LABEL: &str = "Не указана";

/// Label used when a stored experience code is not in the catalog.
pub const UNKNOWN_EXPERIENCE_LABEL: &str = "Не указан";

/// Coaching track the applicant is interested in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialization {
    #[serde(rename = "ml")]
    MachineLearning,
    #[serde(rename = "data")]
    DataEngineering,
    #[serde(rename = "devops")]
    DevOps,
}

impl Specialization {
    pub const ALL: [Specialization; 3] = [
        Specialization::MachineLearning,
        Specialization::DataEngineering,
        Specialization::DevOps,
    ];

    /// Parse a wire code. Matching is exact.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ml" => Some(Specialization::MachineLearning),
            "data" => Some(Specialization::DataEngineering),
            "devops" => Some(Specialization::DevOps),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Specialization::MachineLearning => "ml",
            Specialization::DataEngineering => "data",
            Specialization::DevOps => "devops",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Specialization::MachineLearning => "Machine Learning",
            Specialization::DataEngineering => "Data Engineering",
            Specialization::DevOps => "DevOps",
        }
    }

    /// Render a stored code, falling back for codes outside the catalog.
    pub fn label_for_code(code: &str) -> &'static str {
        Self::from_code(code)
            .map(|s| s.label())
            .unwrap_or(UNKNOWN_SPECIALIZATION_LABEL)
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Self-reported experience of the applicant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "beginner" => Some(ExperienceLevel::Beginner),
            "intermediate" => Some(ExperienceLevel::Intermediate),
            "advanced" => Some(ExperienceLevel::Advanced),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Начинающий",
            ExperienceLevel::Intermediate => "Средний",
            ExperienceLevel::Advanced => "Продвинутый",
        }
    }

    pub fn label_for_code(code: &str) -> &'static str {
        Self::from_code(code)
            .map(|l| l.label())
            .unwrap_or(UNKNOWN_EXPERIENCE_LABEL)
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specialization_codes_round_trip() {
        for s in Specialization::ALL {
            assert_eq!(Specialization::from_code(s.code()), Some(s));
        }
        for l in ExperienceLevel::ALL {
            assert_eq!(ExperienceLevel::from_code(l.code()), Some(l));
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(Specialization::label_for_code("ml"), "Machine Learning");
        assert_eq!(Specialization::label_for_code("data"), "Data Engineering");
        assert_eq!(Specialization::label_for_code("devops"), "DevOps");
        assert_eq!(ExperienceLevel::label_for_code("advanced"), "Продвинутый");
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        assert_eq!(Specialization::label_for_code("frontend"), "Не указана");
        assert_eq!(Specialization::label_for_code(""), "Не указана");
        assert_eq!(ExperienceLevel::label_for_code("expert"), "Не указан");
    }

    #[test]
    fn test_codes_are_case_sensitive() {
        assert_eq!(Specialization::from_code("ML"), None);
        assert_eq!(ExperienceLevel::from_code("Beginner"), None);
    }

    #[test]
    fn test_serde_uses_wire_codes() {
        let json = serde_json::to_string(&Specialization::DevOps).unwrap();
        assert_eq!(json, "\"devops\"");
        let level: ExperienceLevel = serde_json::from_str("\"intermediate\"").unwrap();
        assert_eq!(level, ExperienceLevel::Intermediate);
    }
}
