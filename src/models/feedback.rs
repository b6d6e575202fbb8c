use serde::Serialize;
use serde_json::Value;

use super::email::Email;
use super::validate::{Choice, FieldReader, ValidationError};
use super::{Collection, Entity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Compliment,
    Suggestion,
    Issue,
    Other,
}

impl Choice for Category {
    const VARIANTS: &'static [Self] = &[
        Category::Compliment,
        Category::Suggestion,
        Category::Issue,
        Category::Other,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Category::Compliment => "compliment",
            Category::Suggestion => "suggestion",
            Category::Issue => "issue",
            Category::Other => "other",
        }
    }
}

/// Passenger feedback and contact submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub name: String,
    pub email: Option<Email>,
    pub subject: String,
    pub message: String,
    pub category: Category,
    pub station: Option<String>,
}

impl Entity for Feedback {
    const COLLECTION: Collection = Collection::Feedback;

    fn validate(raw: &Value) -> Result<Self, ValidationError> {
        let mut fields = FieldReader::new("body", raw)?;

        let name = fields.required_str("name");
        let email = fields.optional_parsed("email", Email::parse);
        let subject = fields.required_str("subject");
        let message = fields.required_str("message");
        let category = fields.choice_or("category", Category::Other);
        let station = fields.optional_str("station");

        fields.finish()?;

        Ok(Self {
            name: name.unwrap_or_default(),
            email,
            subject: subject.unwrap_or_default(),
            message: message.unwrap_or_default(),
            category,
            station,
        })
    }
}
