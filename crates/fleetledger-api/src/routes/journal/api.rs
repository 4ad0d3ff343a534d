//! Journal API endpoints - JSON API

use crate::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;

/// Lines, totals and balance state of the entry being composed
pub async fn api_journal(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let status = state.sessions.read(&session, |ws| ws.journal_status()).await;
    session.respond(Json(status))
}

#[cfg(test)]
mod tests {
    use crate::create_router;
    use crate::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_fresh_journal() {
        let router = create_router(test_state());
        let (status, _, body) = send(&router, get("/api/journal", None)).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["lines"].as_array().unwrap().len(), 2);
        assert_eq!(json["balanced"], false);
        assert_eq!(json["total_debit"], "0");
    }

    #[tokio::test]
    async fn test_journal_reflects_edits() {
        let router = create_router(test_state());
        let (_, cookie, _) = send(
            &router,
            post_form("/accounting/journal/lines/1", None, "field=debit&value=100"),
        )
        .await;
        let cookie = cookie.unwrap();
        send(
            &router,
            post_form("/accounting/journal/lines/2", Some(&cookie), "field=credit&value=99.99"),
        )
        .await;

        let (_, _, body) = send(&router, get("/api/journal", Some(&cookie))).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["balanced"], false);
        assert_eq!(json["difference"], "0.01");
        assert_eq!(json["lines"][0]["debit"], "100");
        assert!(json["lines"][0]["credit"].is_null());
    }
}
