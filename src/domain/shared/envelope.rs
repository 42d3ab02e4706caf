use serde::{Deserialize, Serialize};

/// `{ "status": "success", "data": ... }`, the success half of the error envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusEnvelope<T> {
    pub status: String,
    pub data: T,
}

impl<T> StatusEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data,
        }
    }
}

/// `{ "success": true, "data": ... }` used by listing endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}
