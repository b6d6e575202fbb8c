use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::{json_body, Created};
use crate::db::{self, Filter, SharedStore};
use crate::error::AppError;
use crate::models::validate::parse_lax_bool;
use crate::models::{Alert, Entity, ValidationError, Violation};

pub const DEFAULT_LIMIT: i64 = 20;

#[derive(Debug, Default, Deserialize)]
pub struct AlertsQuery {
    pub active: Option<String>,
    pub limit: Option<String>,
}

/// Parsed form of [`AlertsQuery`].
#[derive(Debug, PartialEq)]
pub struct AlertsSelection {
    pub active: Option<bool>,
    /// `None` returns every match.
    pub limit: Option<i64>,
}

impl AlertsQuery {
    pub fn parse(&self) -> Result<AlertsSelection, ValidationError> {
        let mut violations = Vec::new();

        let active = match self.active.as_deref() {
            None => None,
            Some(raw) => match parse_lax_bool(raw) {
                Some(b) => Some(b),
                None => {
                    violations.push(Violation::new(
                        "query",
                        "active",
                        "bool_parsing",
                        "Input should be a valid boolean, unable to interpret input",
                    ));
                    None
                }
            },
        };

        let limit = match self.limit.as_deref().map(|raw| raw.trim().parse::<i64>()) {
            None => Some(DEFAULT_LIMIT),
            Some(Ok(0)) => None,
            Some(Ok(n)) if n > 0 => Some(n),
            Some(Ok(_)) => {
                violations.push(Violation::new(
                    "query",
                    "limit",
                    "greater_than_equal",
                    "Input should be greater than or equal to 0",
                ));
                None
            }
            Some(Err(_)) => {
                violations.push(Violation::new(
                    "query",
                    "limit",
                    "int_parsing",
                    "Input should be a valid integer, unable to parse string as an integer",
                ));
                None
            }
        };

        if violations.is_empty() {
            Ok(AlertsSelection { active, limit })
        } else {
            Err(ValidationError { violations })
        }
    }
}

pub async fn list_alerts(
    State(store): State<SharedStore>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<Vec<Alert>>, AppError> {
    let selection = query.parse()?;

    let mut filter = Filter::new();
    if let Some(active) = selection.active {
        filter.insert("active".to_string(), Value::Bool(active));
    }

    let alerts = db::find_entities::<Alert>(store.as_ref(), filter, selection.limit).await?;
    Ok(Json(alerts))
}

pub async fn create_alert(
    State(store): State<SharedStore>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Created>, AppError> {
    let alert = Alert::validate(&json_body(body)?)?;
    let id = db::insert_entity(store.as_ref(), &alert).await?;

    Ok(Json(Created {
        id,
        status: "created",
    }))
}
