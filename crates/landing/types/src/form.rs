//! Application form input and its validation
//!
//! Every field is checked independently so a rejected form reports all of
//! its problems at once. Within a single field the first failing rule wins,
//! which keeps the error list at one entry per field.

use crate::catalog::{ExperienceLevel, Specialization};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

const NAME_CHARS: (usize, usize) = (2, 100);
const PHONE_CHARS: (usize, usize) = (5, 20);
const MESSAGE_CHARS: (usize, usize) = (10, 1000);
const EMAIL_MAX_CHARS: usize = 254;
const DOMAIN_LABEL_MAX_CHARS: usize = 63;

const NAME_REQUIRED: &str = "Имя обязательно для заполнения";
const NAME_LENGTH: &str = "Имя должно содержать от 2 до 100 символов";
const EMAIL_REQUIRED: &str = "Email обязателен для заполнения";
const EMAIL_INVALID: &str = "Пожалуйста, введите корректный email";
const PHONE_LENGTH: &str = "Номер телефона должен содержать от 5 до 20 символов";
const SPECIALIZATION_REQUIRED: &str = "Выберите специализацию";
const SPECIALIZATION_INVALID: &str = "Выберите корректную специализацию";
const EXPERIENCE_REQUIRED: &str = "Укажите уровень опыта";
const EXPERIENCE_INVALID: &str = "Выберите корректный уровень опыта";
const MESSAGE_REQUIRED: &str = "Сообщение обязательно для заполнения";
const MESSAGE_LENGTH: &str = "Сообщение должно содержать от 10 до 1000 символов";

// local-part@label(.label)*.tld. Letters are any script so internationalized
// addresses pass; the tld is either letters or a punycode `xn--` label.
// Label length is checked outside the pattern, bounded repeats of Unicode
// classes compile to very large automata.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[\p{L}\p{N}.!#$%&'*+/=?^_`{|}~-]+",
        r"@(?:[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?\.)+",
        r"(?:\p{L}{2,}|xn--[A-Za-z0-9-]+)$",
    ))
    .expect("email pattern is a valid regex")
});

/// Raw application form as posted by the landing page.
///
/// Nothing here is trusted; absent and `null` fields both arrive as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Form fields, in the order errors are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Phone,
    Specialization,
    ExperienceLevel,
    Message,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::Specialization => "specialization",
            FormField::ExperienceLevel => "experience_level",
            FormField::Message => "message",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule violation, tagged with the offending field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    fn new(field: FormField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Every violation found in one form, in field order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("application form rejected: {} invalid field(s)", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_vec(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn fields(&self) -> Vec<FormField> {
        self.errors.iter().map(|e| e.field).collect()
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// Form data that passed every rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedContact {
    pub name: String,
    /// Lower-cased address
    pub email: String,
    pub phone: Option<String>,
    pub specialization: Specialization,
    pub experience_level: ExperienceLevel,
    pub message: String,
}

impl ContactForm {
    /// Check every field, returning the typed form or all violations.
    pub fn validate(&self) -> Result<ValidatedContact, ValidationErrors> {
        let name = check_name(self.name.as_deref());
        let email = check_email(self.email.as_deref());
        let phone = check_phone(self.phone.as_deref());
        let specialization = check_specialization(self.specialization.as_deref());
        let experience_level = check_experience(self.experience_level.as_deref());
        let message = check_message(self.message.as_deref());

        match (name, email, phone, specialization, experience_level, message) {
            (
                Ok(name),
                Ok(email),
                Ok(phone),
                Ok(specialization),
                Ok(experience_level),
                Ok(message),
            ) => Ok(ValidatedContact {
                name,
                email,
                phone,
                specialization,
                experience_level,
                message,
            }),
            (name, email, phone, specialization, experience_level, message) => {
                let errors = [
                    name.err(),
                    email.err(),
                    phone.err(),
                    specialization.err(),
                    experience_level.err(),
                    message.err(),
                ]
                .into_iter()
                .flatten()
                .collect();
                Err(ValidationErrors { errors })
            }
        }
    }
}

/// Trimmed value, or `None` when missing or blank
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

fn chars_within(value: &str, (min, max): (usize, usize)) -> bool {
    let len = value.chars().count();
    (min..=max).contains(&len)
}

fn check_name(raw: Option<&str>) -> Result<String, FieldError> {
    let name = present(raw).ok_or_else(|| FieldError::new(FormField::Name, NAME_REQUIRED))?;
    if !chars_within(name, NAME_CHARS) {
        return Err(FieldError::new(FormField::Name, NAME_LENGTH));
    }
    Ok(name.to_string())
}

fn check_email(raw: Option<&str>) -> Result<String, FieldError> {
    let email = present(raw).ok_or_else(|| FieldError::new(FormField::Email, EMAIL_REQUIRED))?;
    if email.chars().count() > EMAIL_MAX_CHARS
        || !EMAIL_PATTERN.is_match(email)
        || !domain_labels_fit(email)
    {
        return Err(FieldError::new(FormField::Email, EMAIL_INVALID));
    }
    Ok(email.to_lowercase())
}

fn domain_labels_fit(email: &str) -> bool {
    email
        .rsplit_once('@')
        .map(|(_, domain)| {
            domain
                .split('.')
                .all(|label| label.chars().count() <= DOMAIN_LABEL_MAX_CHARS)
        })
        .unwrap_or(false)
}

fn check_phone(raw: Option<&str>) -> Result<Option<String>, FieldError> {
    match present(raw) {
        None => Ok(None),
        Some(phone) if chars_within(phone, PHONE_CHARS) => Ok(Some(phone.to_string())),
        Some(_) => Err(FieldError::new(FormField::Phone, PHONE_LENGTH)),
    }
}

fn check_specialization(raw: Option<&str>) -> Result<Specialization, FieldError> {
    let code = present(raw)
        .ok_or_else(|| FieldError::new(FormField::Specialization, SPECIALIZATION_REQUIRED))?;
    Specialization::from_code(code)
        .ok_or_else(|| FieldError::new(FormField::Specialization, SPECIALIZATION_INVALID))
}

fn check_experience(raw: Option<&str>) -> Result<ExperienceLevel, FieldError> {
    let code = present(raw)
        .ok_or_else(|| FieldError::new(FormField::ExperienceLevel, EXPERIENCE_REQUIRED))?;
    ExperienceLevel::from_code(code)
        .ok_or_else(|| FieldError::new(FormField::ExperienceLevel, EXPERIENCE_INVALID))
}

fn check_message(raw: Option<&str>) -> Result<String, FieldError> {
    let message =
        present(raw).ok_or_else(|| FieldError::new(FormField::Message, MESSAGE_REQUIRED))?;
    if !chars_within(message, MESSAGE_CHARS) {
        return Err(FieldError::new(FormField::Message, MESSAGE_LENGTH));
    }
    Ok(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            name: Some("Jo".into()),
            email: Some("jo@x.com".into()),
            phone: None,
            specialization: Some("data".into()),
            experience_level: Some("beginner".into()),
            message: Some("Hello there!".into()),
        }
    }

    #[test]
    fn test_minimal_valid_form() {
        let contact = valid_form().validate().unwrap();
        assert_eq!(contact.name, "Jo");
        assert_eq!(contact.email, "jo@x.com");
        assert_eq!(contact.phone, None);
        assert_eq!(contact.specialization, Specialization::DataEngineering);
        assert_eq!(contact.experience_level, ExperienceLevel::Beginner);
        assert_eq!(contact.message, "Hello there!");
    }

    #[test]
    fn test_empty_name_and_bad_email_reports_every_field_in_order() {
        let form = ContactForm {
            name: Some(String::new()),
            email: Some("bad".into()),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.fields(),
            vec![
                FormField::Name,
                FormField::Email,
                FormField::Specialization,
                FormField::ExperienceLevel,
                FormField::Message,
            ]
        );
        assert_eq!(errors.errors()[0].message, NAME_REQUIRED);
        assert_eq!(errors.errors()[1].message, EMAIL_INVALID);
    }

    #[test]
    fn test_values_are_trimmed_before_length_checks() {
        let mut form = valid_form();
        form.name = Some("  J  ".into());
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.fields(), vec![FormField::Name]);
        assert_eq!(errors.errors()[0].message, NAME_LENGTH);

        let mut form = valid_form();
        form.name = Some("  Anna Petrova \n".into());
        assert_eq!(form.validate().unwrap().name, "Anna Petrova");
    }

    #[test]
    fn test_length_boundaries() {
        let mut form = valid_form();
        form.name = Some("я".repeat(100));
        form.message = Some("x".repeat(1000));
        assert!(form.validate().is_ok());

        form.name = Some("я".repeat(101));
        form.message = Some("x".repeat(1001));
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.fields(), vec![FormField::Name, FormField::Message]);

        let mut form = valid_form();
        form.message = Some("123456789".into());
        assert!(form.validate().unwrap_err().contains(FormField::Message));
    }

    #[test]
    fn test_phone_is_optional_but_bounded() {
        let mut form = valid_form();
        form.phone = Some("   ".into());
        assert_eq!(form.validate().unwrap().phone, None);

        form.phone = Some(" +7 999 123-45-67 ".into());
        assert_eq!(
            form.validate().unwrap().phone.as_deref(),
            Some("+7 999 123-45-67")
        );

        form.phone = Some("1234".into());
        assert_eq!(form.validate().unwrap_err().fields(), vec![FormField::Phone]);

        form.phone = Some("1".repeat(21));
        assert_eq!(form.validate().unwrap_err().fields(), vec![FormField::Phone]);
    }

    #[test]
    fn test_enum_fields_reject_unknown_codes() {
        let mut form = valid_form();
        form.specialization = Some("frontend".into());
        form.experience_level = Some("guru".into());
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.errors(),
            &[
                FieldError::new(FormField::Specialization, SPECIALIZATION_INVALID),
                FieldError::new(FormField::ExperienceLevel, EXPERIENCE_INVALID),
            ]
        );
    }

    #[test]
    fn test_email_grammar() {
        for good in [
            "a@b.co",
            "first.last+tag@mail.example.org",
            "USER@Example.RU",
            "ivan@example.xn--p1ai",
            "ivan@почта.рф",
            "иван@почта.рф",
            "Иван.Петров@Пример.РФ",
        ] {
            let mut form = valid_form();
            form.email = Some(good.into());
            assert!(form.validate().is_ok(), "{good} should be accepted");
        }
        for bad in [
            "no-at-sign",
            "a@b",
            "a@b.c",
            "@example.com",
            "a@-example.com",
            "a@example..com",
            "a b@example.com",
            "a@example.c0m",
            "a@example.xn--",
            "ivan@почта.р",
            "ivan@-почта.рф",
            "ivan@почта-.рф",
        ] {
            let mut form = valid_form();
            form.email = Some(bad.into());
            let errors = form.validate().unwrap_err();
            assert_eq!(errors.fields(), vec![FormField::Email], "{bad} should be rejected");
        }
    }

    #[test]
    fn test_email_domain_label_limit() {
        let mut form = valid_form();
        form.email = Some(format!("a@{}.ru", "д".repeat(63)));
        assert!(form.validate().is_ok());

        form.email = Some(format!("a@{}.ru", "д".repeat(64)));
        assert_eq!(form.validate().unwrap_err().fields(), vec![FormField::Email]);
    }

    #[test]
    fn test_email_is_normalized() {
        let mut form = valid_form();
        form.email = Some("  Ivan.Petrov@Yandex.RU ".into());
        assert_eq!(form.validate().unwrap().email, "ivan.petrov@yandex.ru");

        form.email = Some("Иван@Почта.РФ".into());
        assert_eq!(form.validate().unwrap().email, "иван@почта.рф");
    }

    #[test]
    fn test_deserializes_null_and_missing_fields() {
        let form: ContactForm =
            serde_json::from_str(r#"{"name":"Jo","phone":null,"extra":"ignored"}"#).unwrap();
        assert_eq!(form.name.as_deref(), Some("Jo"));
        assert_eq!(form.phone, None);
        assert_eq!(form.email, None);
    }

    fn required_fields() -> impl Strategy<Value = FormField> {
        prop_oneof![
            Just(FormField::Name),
            Just(FormField::Email),
            Just(FormField::Specialization),
            Just(FormField::ExperienceLevel),
            Just(FormField::Message),
        ]
    }

    proptest! {
        /// Dropping any required field always yields an error for exactly that field.
        #[test]
        fn missing_required_field_is_reported(field in required_fields(), blank in "[ \t\n]{0,4}") {
            let mut form = valid_form();
            let slot = match field {
                FormField::Name => &mut form.name,
                FormField::Email => &mut form.email,
                FormField::Specialization => &mut form.specialization,
                FormField::ExperienceLevel => &mut form.experience_level,
                FormField::Message => &mut form.message,
                FormField::Phone => unreachable!(),
            };
            *slot = if blank.is_empty() { None } else { Some(blank) };

            let errors = form.validate().unwrap_err();
            prop_assert_eq!(errors.fields(), vec![field]);
        }

        /// Anything without an `@` is never an email.
        #[test]
        fn email_without_at_sign_is_rejected(candidate in "[^@]{1,40}") {
            let mut form = valid_form();
            form.email = Some(candidate);
            let errors = form.validate().unwrap_err();
            prop_assert!(errors.contains(FormField::Email));
        }
    }
}
