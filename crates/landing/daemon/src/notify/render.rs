//! Operator email rendering

use crate::error::NotificationError;
use askama::Template;
use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc};
use landing_types::StoredSubmission;

/// Moscow has observed UTC+3 all year since 2014.
const MOSCOW_UTC_OFFSET_SECS: i32 = 3 * 3600;

const MONTHS_GENITIVE: [&str; 12] = [
    "января", "февраля", "марта", "апреля", "мая", "июня",
    "июля", "августа", "сентября", "октября", "ноября", "декабря",
];

const PHONE_NOT_GIVEN: &str = "Не указан";

#[derive(Template)]
#[template(path = "notification.html")]
struct NotificationTemplate<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    specialization: &'static str,
    experience: &'static str,
    message_lines: Vec<&'a str>,
    ip_address: &'a str,
    sent_at: String,
}

pub fn subject(submission: &StoredSubmission) -> String {
    format!("Новая заявка на обучение: {}", submission.specialization_label())
}

/// HTML body listing every submitted field.
///
/// User-supplied text is escaped by the template; message line breaks
/// become `<br>`.
pub fn html_body(submission: &StoredSubmission) -> Result<String, NotificationError> {
    let template = NotificationTemplate {
        name: &submission.name,
        email: &submission.email,
        phone: submission.phone.as_deref().unwrap_or(PHONE_NOT_GIVEN),
        specialization: submission.specialization_label(),
        experience: submission.experience_label(),
        message_lines: submission
            .message
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect(),
        ip_address: submission
            .ip_address
            .as_deref()
            .unwrap_or(landing_types::UNKNOWN_CLIENT_ADDRESS),
        sent_at: moscow_timestamp(submission.created_at),
    };

    template
        .render()
        .map_err(|e| NotificationError::Compose(format!("notification template: {e}")))
}

fn moscow_offset() -> FixedOffset {
    FixedOffset::east_opt(MOSCOW_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Long Russian date in Moscow time, e.g. `1 марта 2024 г., 12:30:00`
pub fn moscow_timestamp(at: DateTime<Utc>) -> String {
    let local = at.with_timezone(&moscow_offset());
    format!(
        "{} {} {} г., {:02}:{:02}:{:02}",
        local.day(),
        MONTHS_GENITIVE[local.month0() as usize],
        local.year(),
        local.hour(),
        local.minute(),
        local.second()
    )
}
