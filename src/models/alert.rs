use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use super::validate::{Choice, FieldReader, ValidationError};
use super::{Collection, Entity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Choice for Severity {
    const VARIANTS: &'static [Self] = &[Severity::Info, Severity::Warning, Severity::Critical];

    fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

/// Service alert shown on the website.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub active: bool,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
}

impl Entity for Alert {
    const COLLECTION: Collection = Collection::Alert;

    fn validate(raw: &Value) -> Result<Self, ValidationError> {
        let mut fields = FieldReader::new("body", raw)?;

        let title = fields.required_str("title");
        let message = fields.required_str("message");
        let severity = fields.choice_or("severity", Severity::Info);
        let active = fields.bool_or("active", true);
        // No ordering is enforced between the two bounds.
        let start_time = fields.optional_timestamp("start_time");
        let end_time = fields.optional_timestamp("end_time");

        fields.finish()?;

        Ok(Self {
            title: title.unwrap_or_default(),
            message: message.unwrap_or_default(),
            severity,
            active,
            start_time,
            end_time,
        })
    }
}
