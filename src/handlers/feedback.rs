use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

use super::{json_body, Created};
use crate::db::{self, SharedStore};
use crate::error::AppError;
use crate::models::{Entity, Feedback};

pub async fn submit_feedback(
    State(store): State<SharedStore>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Created>, AppError> {
    let feedback = Feedback::validate(&json_body(body)?)?;
    let id = db::insert_entity(store.as_ref(), &feedback).await?;

    Ok(Json(Created {
        id,
        status: "received",
    }))
}
