//! Integration tests for the HTTP adapters against local axum servers

use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use veritas_domain::traits::{CommitLookup, DigestHintSource, DocumentFetcher, EvidenceSource};
use veritas_domain::ProposalId;
use veritas_sources::{
    CommitStatusClient, DashboardClient, GithubCommitClient, HttpDocumentFetcher, HttpSettings,
    RegistryClient, SourceError,
};

const EXISTING_COMMIT: &str = "ac971e7b4c851b89b312bee812f6de542ed907c5";

/// Serve `app` on an ephemeral local port and return its base URL
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn id(value: u64) -> ProposalId {
    ProposalId::new(value).unwrap()
}

async fn registry_proposal(Path(id): Path<u64>) -> impl IntoResponse {
    if id != 134039 {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "unknown proposal"})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "id": 134039,
            "title": ["Upgrade the Governance Canister"],
            "summary": "Wasm module hash: abc",
            "action": ["InstallCode"],
            "repository": [],
            "commit": [EXISTING_COMMIT],
            "wasm_module_hash": [],
            "arg_hash": ["0fee102bd16b053022b69f2c65fd5e2f41d150ce9c214ac8731cfaf496ebda4e"]
        })),
    )
}

#[tokio::test]
async fn test_registry_fetch_unwraps_optional_arrays() {
    let base = serve(Router::new().route("/proposals/:id", get(registry_proposal))).await;
    let registry = RegistryClient::new(base, &HttpSettings::default()).unwrap();

    let record = registry.fetch_proposal(id(134039)).await.unwrap();
    assert_eq!(record.title.as_deref(), Some("Upgrade the Governance Canister"));
    assert_eq!(record.action.as_deref(), Some("InstallCode"));
    assert_eq!(record.repository_hint, None);
    assert_eq!(record.commit_hint.as_deref(), Some(EXISTING_COMMIT));
    assert_eq!(record.expected_digest, None);
    assert!(record.expected_arg_digest.is_some());
}

#[tokio::test]
async fn test_registry_unknown_proposal_is_not_found() {
    let base = serve(Router::new().route("/proposals/:id", get(registry_proposal))).await;
    let registry = RegistryClient::new(base, &HttpSettings::default()).unwrap();

    let result = registry.fetch_proposal(id(1)).await;
    assert!(matches!(result, Err(SourceError::NotFound(_))));
}

#[tokio::test]
async fn test_registry_garbage_body_is_invalid_response() {
    let app = Router::new().route("/proposals/:id", get(|| async { "not json" }));
    let registry = RegistryClient::new(serve(app).await, &HttpSettings::default()).unwrap();

    let result = registry.fetch_proposal(id(5)).await;
    assert!(matches!(result, Err(SourceError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_dashboard_hints() {
    let app = Router::new().route(
        "/api/v3/proposals/:id",
        get(|| async {
            Json(json!({
                "proposal_id": 77,
                "payload": {"wasm_module_hash": "AA".repeat(32), "arg_hash": null}
            }))
        }),
    );
    let dashboard = DashboardClient::new(serve(app).await, &HttpSettings::default()).unwrap();

    let hints = dashboard.fetch_digest_hints(id(77)).await.unwrap();
    assert_eq!(hints.wasm_hash, Some("aa".repeat(32)));
    assert_eq!(hints.arg_hash, None);
}

async fn commit_status(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let exists = params.get("repository").map(String::as_str) == Some("dfinity/ic")
        && params.get("commit").map(String::as_str) == Some(EXISTING_COMMIT);
    let status = if exists { "present on master" } else { "" };
    Json(json!({"exists": exists, "status": status}))
}

#[tokio::test]
async fn test_primary_commit_lookup() {
    let app = Router::new().route("/commits/status", get(commit_status));
    let primary = CommitStatusClient::new(serve(app).await, &HttpSettings::default()).unwrap();

    let found = primary.lookup("dfinity/ic", EXISTING_COMMIT).await.unwrap();
    assert!(found.exists);
    assert_eq!(found.status, "present on master");

    let missing = primary.lookup("dfinity/ic", "abcdef1").await.unwrap();
    assert!(!missing.exists);
    assert_eq!(missing.status, "commit not found");
}

#[tokio::test]
async fn test_primary_commit_lookup_server_error() {
    let app = Router::new().route(
        "/commits/status",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let primary = CommitStatusClient::new(serve(app).await, &HttpSettings::default()).unwrap();

    let result = primary.lookup("dfinity/ic", EXISTING_COMMIT).await;
    assert!(matches!(result, Err(SourceError::NetworkUnavailable(_))));
}

async fn github_commit(
    Path((owner, repo, sha)): Path<(String, String, String)>,
) -> impl IntoResponse {
    if owner == "rate" {
        return (StatusCode::FORBIDDEN, Json(json!({"message": "rate limited"})));
    }
    if owner == "dfinity" && repo == "ic" && sha == EXISTING_COMMIT {
        return (StatusCode::OK, Json(json!({"sha": EXISTING_COMMIT})));
    }
    if owner == "odd" {
        return (StatusCode::OK, Json(json!({"message": "no sha here"})));
    }
    (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"})))
}

#[tokio::test]
async fn test_fallback_commit_lookup() {
    let app = Router::new().route("/repos/:owner/:repo/commits/:sha", get(github_commit));
    let fallback =
        GithubCommitClient::with_base_url(serve(app).await, &HttpSettings::default()).unwrap();

    assert!(fallback.lookup("dfinity/ic", EXISTING_COMMIT).await.unwrap().exists);
    assert!(!fallback.lookup("dfinity/ic", "abcdef1").await.unwrap().exists);
    assert!(!fallback.lookup("odd/repo", EXISTING_COMMIT).await.unwrap().exists);
    assert!(matches!(
        fallback.lookup("rate/limited", EXISTING_COMMIT).await,
        Err(SourceError::NetworkUnavailable(_))
    ));
}

fn document_host() -> Router {
    Router::new()
        .route(
            "/public/audit.pdf",
            get(|| async { ([(header::CONTENT_TYPE, "application/pdf")], b"%PDF-1.7".to_vec()) }),
        )
        .route("/restricted/audit.pdf", get(|| async { StatusCode::FORBIDDEN }))
        .route(
            "/proxy",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                match params.get("url") {
                    Some(url) if url.ends_with("/restricted/audit.pdf") => {
                        (StatusCode::OK, b"proxied".to_vec())
                    }
                    _ => (StatusCode::BAD_GATEWAY, Vec::new()),
                }
            }),
        )
}

#[tokio::test]
async fn test_document_direct_fetch() {
    let base = serve(document_host()).await;
    let fetcher = HttpDocumentFetcher::new(&HttpSettings::default()).unwrap();

    let url = format!("{}/public/audit.pdf", base);
    let doc = fetcher.fetch(&url).await.unwrap();
    assert_eq!(doc.bytes, b"%PDF-1.7");
    assert_eq!(doc.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(doc.final_url, url);
}

#[tokio::test]
async fn test_document_allow_listed_host_reports_direct_failure() {
    let base = serve(document_host()).await;
    let fetcher = HttpDocumentFetcher::new(&HttpSettings::default())
        .unwrap()
        .with_allowed_hosts(["127.0.0.1"])
        .with_proxy(format!("{}/proxy", base));

    let result = fetcher.fetch(&format!("{}/restricted/audit.pdf", base)).await;
    assert!(matches!(result, Err(SourceError::NetworkUnavailable(_))));
}

#[tokio::test]
async fn test_document_proxy_fallback() {
    let base = serve(document_host()).await;
    let fetcher = HttpDocumentFetcher::new(&HttpSettings::default())
        .unwrap()
        .with_proxy(format!("{}/proxy", base));

    let doc = fetcher
        .fetch(&format!("{}/restricted/audit.pdf", base))
        .await
        .unwrap();
    assert_eq!(doc.bytes, b"proxied");
    assert!(doc.final_url.contains("/proxy"));
}

#[tokio::test]
async fn test_document_access_restricted_without_fallback() {
    let base = serve(document_host()).await;
    let fetcher = HttpDocumentFetcher::new(&HttpSettings::default()).unwrap();

    match fetcher.fetch(&format!("{}/restricted/audit.pdf", base)).await {
        Err(SourceError::AccessRestricted { host, guidance }) => {
            assert_eq!(host, "127.0.0.1");
            assert!(guidance.contains("upload"));
        }
        other => panic!("expected AccessRestricted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_document_failed_proxy_is_access_restricted() {
    let base = serve(document_host()).await;
    let fetcher = HttpDocumentFetcher::new(&HttpSettings::default())
        .unwrap()
        .with_proxy(format!("{}/proxy", base));

    let result = fetcher.fetch(&format!("{}/missing.pdf", base)).await;
    assert!(matches!(result, Err(SourceError::AccessRestricted { .. })));
}
