use axum::Json;
use serde_json::{Value, json};

/// Public health check, no auth required
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "durmah-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_body() {
        let Json(body) = health_check().await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "durmah-gateway");
    }
}
