pub mod alert;
pub mod email;
pub mod feedback;
pub mod timestamp;
pub mod validate;

use serde::Serialize;
use serde_json::Value;

pub use alert::Alert;
pub use feedback::Feedback;
pub use validate::{ValidationError, Violation};

/// Named document collections, one per stored entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Alert,
    Feedback,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Alert, Collection::Feedback];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Alert => "alert",
            Collection::Feedback => "feedback",
        }
    }
}

/// A validated record that lives in its own collection.
pub trait Entity: Serialize + Sized {
    const COLLECTION: Collection;

    /// Validates raw JSON input, applying defaults for omitted fields.
    fn validate(raw: &Value) -> Result<Self, ValidationError>;
}
