//! Integration tests for the HTTP transport against a wiremock server.
//!
//! Covers the failure classification contract (401/403/404/4xx/network/
//! malformed) and the wire shapes of the mutating endpoints.

use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notelace_client::{ClientConfig, HttpApi, NotebookApi};
use notelace_core::{Error, Permission, SessionContext};

fn api_for(server: &MockServer) -> HttpApi {
    HttpApi::new(
        ClientConfig::default().with_base_url(server.uri()),
        SessionContext::new("alice@example.com", "test-token"),
    )
    .expect("Failed to build HttpApi")
}

fn notebook_body(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "name": name,
        "owner_email": "alice@example.com",
        "created_at": "2026-05-01T10:00:00Z",
        "notes": [],
        "access_list": [],
        "is_public": false,
        "tags": [],
        "likes": []
    })
}

#[tokio::test]
async fn test_bearer_token_sent_on_every_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notebooks"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![notebook_body("n1", "Math")]))
        .expect(1)
        .mount(&server)
        .await;

    let notebooks = api_for(&server).list_notebooks().await.unwrap();
    assert_eq!(notebooks.len(), 1);
    assert_eq!(notebooks[0].name, "Math");
}

#[tokio::test]
async fn test_401_classified_as_session_expired() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notebooks"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"detail": "Could not validate credentials"})),
        )
        .mount(&server)
        .await;

    let err = api_for(&server).list_notebooks().await.unwrap_err();
    assert!(err.is_session_expired());
}

#[tokio::test]
async fn test_403_classified_as_forbidden() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/notebooks/n1"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(serde_json::json!({"detail": "Only the owner can delete."})),
        )
        .mount(&server)
        .await;

    let err = api_for(&server).delete_notebook("n1").await.unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));
}

#[tokio::test]
async fn test_404_classified_as_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notebooks/ghost"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"detail": "Notebook not found."})),
        )
        .mount(&server)
        .await;

    let err = api_for(&server).get_notebook("ghost").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_422_detail_surfaced_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notebooks/n1/share"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"detail": "Cannot share with yourself."})),
        )
        .mount(&server)
        .await;

    let err = api_for(&server)
        .share_notebook("n1", "alice@example.com", Permission::View)
        .await
        .unwrap_err();
    match err {
        Error::Validation(detail) => assert_eq!(detail, "Cannot share with yourself."),
        other => panic!("Expected Validation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_failure_classified_as_network() {
    // A server that was never started: connection refused.
    let api = HttpApi::new(
        ClientConfig::default().with_base_url("http://127.0.0.1:9"),
        SessionContext::new("alice@example.com", "test-token"),
    )
    .unwrap();

    let err = api.list_notebooks().await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}

#[tokio::test]
async fn test_2xx_with_missing_field_is_malformed() {
    let server = MockServer::start().await;

    // Notebook body missing the required "name" field.
    Mock::given(method("GET"))
        .and(path("/notebooks/n1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_id": "n1",
            "owner_email": "alice@example.com",
            "created_at": "2026-05-01T10:00:00Z"
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).get_notebook("n1").await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[tokio::test]
async fn test_visibility_patch_body_shape() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/notebooks/n1/visibility"))
        .and(body_json(serde_json::json!({"is_public": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json({
            let mut body = notebook_body("n1", "Math");
            body["is_public"] = serde_json::json!(true);
            body
        }))
        .expect(1)
        .mount(&server)
        .await;

    let updated = api_for(&server).set_visibility("n1", true).await.unwrap();
    assert!(updated.is_public);
}

#[tokio::test]
async fn test_tags_patch_body_shape() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/notebooks/n1/tags"))
        .and(body_json(serde_json::json!({"tags": ["Work", "ideas"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json({
            let mut body = notebook_body("n1", "Math");
            body["tags"] = serde_json::json!(["Work", "ideas"]);
            body
        }))
        .expect(1)
        .mount(&server)
        .await;

    let updated = api_for(&server)
        .replace_tags("n1", &["Work".to_string(), "ideas".to_string()])
        .await
        .unwrap();
    assert_eq!(updated.tags, vec!["Work", "ideas"]);
}

#[tokio::test]
async fn test_like_with_notebook_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notebooks/n1/like"))
        .respond_with(ResponseTemplate::new(200).set_body_json({
            let mut body = notebook_body("n1", "Math");
            body["likes"] = serde_json::json!(["alice@example.com"]);
            body
        }))
        .mount(&server)
        .await;

    let result = api_for(&server).toggle_like("n1").await.unwrap();
    assert_eq!(result.unwrap().likes, vec!["alice@example.com"]);
}

#[tokio::test]
async fn test_like_with_empty_body_returns_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notebooks/n1/like"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = api_for(&server).toggle_like("n1").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_search_sends_query_param() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notebooks/public/search"))
        .and(query_param("query", "physics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .expect(1)
        .mount(&server)
        .await;

    let results = api_for(&server)
        .search_public_notebooks("physics")
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_summarize_request_and_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/summarize-text/"))
        .and(body_json(serde_json::json!({"text": "raw ocr text"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"summary": "**Title:** Notes"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = api_for(&server).summarize_text("raw ocr text").await.unwrap();
    assert_eq!(response.summary, "**Title:** Notes");
}

#[tokio::test]
async fn test_extract_multipart_upload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload-image/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"filename": "board.png", "extracted_text": "F = ma"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let response = api_for(&server)
        .extract_text(vec![0x89, 0x50, 0x4E, 0x47], "board.png", "image/png")
        .await
        .unwrap();
    assert_eq!(response.extracted_text, "F = ma");
}

#[tokio::test]
async fn test_quiz_payload_parsed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notebooks/n1/quiz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "questions": [
                {"question": "2+2?", "options": ["3", "4"], "correct_answer": "4"}
            ]
        })))
        .mount(&server)
        .await;

    let payload = api_for(&server).generate_quiz("n1").await.unwrap();
    assert_eq!(payload.questions.len(), 1);
}

#[tokio::test]
async fn test_quiz_question_missing_field_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notebooks/n1/quiz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "questions": [{"question": "2+2?", "options": ["3", "4"]}]
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).generate_quiz("n1").await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[tokio::test]
async fn test_note_create_and_delete() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notebooks/n1/notes"))
        .and(body_json(serde_json::json!({"content": "F = ma"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_id": "note1",
            "content": "F = ma",
            "created_at": "2026-05-01T10:05:00Z"
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/notebooks/n1/notes/note1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let note = api.create_note("n1", "F = ma").await.unwrap();
    assert_eq!(note.id, "note1");
    api.delete_note("n1", "note1").await.unwrap();
}

#[tokio::test]
async fn test_export_pdf_returns_raw_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notebooks/n1/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7 fake".to_vec()))
        .mount(&server)
        .await;

    let bytes = api_for(&server).export_pdf("n1").await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
