//! Accounts API endpoints - JSON API

use crate::{log_rejection, ApiError, AppState};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use fleetledger_core::{ErrorContext, NewAccount};
use serde_json::json;

/// Nested chart of the caller's session
pub async fn api_accounts(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let tree = state.sessions.read(&session, |ws| ws.chart.to_tree()).await;
    session.respond(Json(tree))
}

/// Append an account under an existing group.
///
/// Answers 201 with the new node, or 400 with error details.
pub async fn api_accounts_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<NewAccount>,
) -> Response {
    let session = state.sessions.resolve(&headers).await;
    let result = state
        .sessions
        .write(&session, |ws| {
            ws.chart
                .insert(&draft)
                .map(|id| ws.chart.subtree(id))
        })
        .await;

    let response = match result {
        Ok(node) => (StatusCode::CREATED, Json(node)).into_response(),
        Err(err) => {
            let context = ErrorContext::new("api.accounts.create")
                .with_data("code", json!(draft.code))
                .with_data("parent", json!(draft.parent_code));
            log_rejection(&err, context, &session);
            ApiError::from(err).into_response()
        }
    };
    session.respond(response)
}

#[cfg(test)]
mod tests {
    use crate::create_router;
    use crate::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_accounts() {
        let router = create_router(test_state());
        let (status, _, body) = send(&router, get("/api/accounts", None)).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 5);
        assert_eq!(json[0]["children"][0]["code"], "1100");
        assert_eq!(json[0]["children"][0]["children"][0]["type"], "account");
    }

    #[tokio::test]
    async fn test_create_account() {
        let router = create_router(test_state());
        let body = r#"{"code":"1140","name":"Petty Cash","type":"account","parent_code":"1100"}"#;
        let (status, cookie, created) =
            send(&router, send_json("POST", "/api/accounts", None, body)).await;
        assert_eq!(status, StatusCode::CREATED);
        let created: serde_json::Value = serde_json::from_str(&created).unwrap();
        assert_eq!(created["code"], "1140");
        assert_eq!(created["balance"], "0");

        let cookie = cookie.unwrap();
        let (_, _, list) = send(&router, get("/api/accounts", Some(&cookie))).await;
        let json: serde_json::Value = serde_json::from_str(&list).unwrap();
        let current = json[0]["children"][0]["children"].as_array().unwrap();
        assert_eq!(current.len(), 4);
        assert_eq!(current[3]["name"], "Petty Cash");
    }

    #[tokio::test]
    async fn test_create_under_leaf_is_rejected() {
        let router = create_router(test_state());
        let body = r#"{"code":"1111","name":"Drawer","parent_code":"1110"}"#;
        let (status, cookie, error) =
            send(&router, send_json("POST", "/api/accounts", None, body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: serde_json::Value = serde_json::from_str(&error).unwrap();
        assert_eq!(error["code"], "INVALID_PARENT");
        assert!(!error["suggestions"].as_array().unwrap().is_empty());

        let (_, _, list) = send(&router, get("/api/accounts", cookie.as_deref())).await;
        let json: serde_json::Value = serde_json::from_str(&list).unwrap();
        assert_eq!(json[0]["children"][0]["children"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_fields_report_details() {
        let router = create_router(test_state());
        let body = r#"{"code":"1140","parent_code":"1100"}"#;
        let (status, _, error) =
            send(&router, send_json("POST", "/api/accounts", None, body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: serde_json::Value = serde_json::from_str(&error).unwrap();
        assert_eq!(error["code"], "MISSING_FIELD");

        let (status, _, _) = send(&router, send_json("POST", "/api/accounts", None, "{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_code_is_rejected() {
        let router = create_router(test_state());
        let body = r#"{"code":"1110","name":"Cash","parent_code":"1100"}"#;
        let (status, _, error) =
            send(&router, send_json("POST", "/api/accounts", None, body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error.contains("DUPLICATE_CODE"));
    }
}
