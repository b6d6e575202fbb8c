pub mod alerts;
pub mod feedback;
pub mod health;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::models::{ValidationError, Violation};

/// Response to a successful write.
#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
    pub status: &'static str,
}

/// Unwraps a JSON body, reporting unreadable input as a validation failure.
pub fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ValidationError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        ValidationError::single(Violation {
            loc: vec!["body".to_string()],
            msg: rejection.body_text(),
            kind: "json_invalid",
        })
    })
}
