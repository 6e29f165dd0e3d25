use axum::Json;
use serde_json::{json, Value};

/// GET /api/uploads — upload pipeline placeholder for the intern app.
pub async fn status() -> Json<Value> {
    Json(json!({ "ok": true }))
}
