use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::non_empty_var;
use crate::db::{SharedStore, StoreStatus};

const ERROR_PREVIEW_CHARS: usize = 50;

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "KMRL backend running" }))
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DiagnosticReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

impl DiagnosticReport {
    /// Renders a store snapshot. Failures become status text, never errors.
    pub fn build(status: StoreStatus, url_set: bool, name_set: bool) -> Self {
        let (database, connection_status, collections) = if status.connected {
            match status.collections {
                Ok(names) => ("✅ Connected & Working".to_string(), "Connected", names),
                Err(reason) => (
                    format!("⚠️  Connected but Error: {}", preview(&reason)),
                    "Connected",
                    Vec::new(),
                ),
            }
        } else {
            (
                "⚠️  Available but not initialized".to_string(),
                "Not Connected",
                Vec::new(),
            )
        };

        Self {
            backend: "✅ Running".to_string(),
            database,
            database_url: presence(url_set),
            database_name: presence(name_set),
            connection_status: connection_status.to_string(),
            collections,
        }
    }
}

fn presence(set: bool) -> String {
    let label = if set { "✅ Set" } else { "❌ Not Set" };
    label.to_string()
}

fn preview(reason: &str) -> String {
    reason.chars().take(ERROR_PREVIEW_CHARS).collect()
}

pub async fn diagnostics(State(store): State<SharedStore>) -> Json<DiagnosticReport> {
    let status = store.status().await;
    Json(DiagnosticReport::build(
        status,
        non_empty_var("DATABASE_URL").is_some(),
        non_empty_var("DATABASE_NAME").is_some(),
    ))
}
