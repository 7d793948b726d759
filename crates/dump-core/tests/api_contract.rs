//! Wire contract tests for `DumpClient` against a mock backend.

use std::sync::Arc;

use dump_core::auth::{SignedOut, StaticToken, TokenProvider};
use dump_core::models::{
    Category, EditNoteRequest, NoteQuery, SubCategoryRequest, SubscriptionTier, UploadRequest,
};
use dump_core::{ApiError, ClientConfig, DumpClient, MediaApi, NotesApi, UsageApi};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{
    any, bearer_token, body_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_with(server: &MockServer, tokens: Arc<dyn TokenProvider>) -> DumpClient {
    let config = ClientConfig {
        api_base_url: server.uri(),
        ..Default::default()
    };
    DumpClient::new(&config, tokens).expect("client")
}

fn client(server: &MockServer) -> DumpClient {
    client_with(server, Arc::new(StaticToken::new("id-token")))
}

fn note_row(id: &str) -> serde_json::Value {
    json!({
        "organized_note_id": id,
        "title": null,
        "preview": "Buy milk\nand eggs",
        "note_content_modified": "2026-10-01T12:00:00Z",
        "category_name": "Home",
    })
}

#[tokio::test]
async fn counts_are_fetched_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/note_counts"))
        .and(bearer_token("id-token"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "categories": {"Home": 2, "Work": 5},
            "date_groups": {"Today": 1},
            "mime_types": {"image": 3},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let counts = client(&server).fetch_counts().await.unwrap();
    assert_eq!(counts.categories.get("Work"), Some(&5));
    assert_eq!(counts.date_groups.get("Today"), Some(&1));
    assert!(counts.sub_categories.is_empty());
}

#[tokio::test]
async fn pull_notes_sends_only_present_params_and_reads_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pull_notes"))
        .and(query_param("limit", "30"))
        .and(query_param("category_name", "Home"))
        .and(query_param("sub_cat_name", "Groceries"))
        .and(query_param("cursor_time", "2026-10-01T12:00:00Z"))
        .and(query_param("cursor_id", "n9"))
        .and(query_param_is_missing("q"))
        .and(query_param_is_missing("start_time"))
        .and(query_param_is_missing("tz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [note_row("n10"), note_row("n11")],
            "next_cursor_time": "2026-09-30T08:00:00Z",
            "next_cursor_id": "n11",
            "has_more": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = NoteQuery {
        limit: 30,
        cursor_time: Some("2026-10-01T12:00:00Z".to_string()),
        cursor_id: Some("n9".to_string()),
        category_name: Some("Home".to_string()),
        sub_cat_name: Some("Groceries".to_string()),
        q: Some("   ".to_string()),
        ..Default::default()
    };
    let page = client(&server).fetch_notes(&query).await.unwrap();

    assert_eq!(page.notes.len(), 2);
    assert_eq!(page.notes[0].display_title(), "Buy milk");
    let cursor = page.cursor.unwrap();
    assert_eq!(cursor.id.as_deref(), Some("n11"));
    assert!(page.has_more);
}

#[tokio::test]
async fn missing_cursor_ends_the_list_even_when_flagged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pull_notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [note_row("n1")],
            "has_more": true,
        })))
        .mount(&server)
        .await;

    let page = client(&server)
        .fetch_notes(&NoteQuery {
            limit: 1,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.cursor, None);
    assert!(!page.has_more);
}

#[tokio::test]
async fn full_notes_post_the_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/pull_full_notes"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"note_ids": ["n1", "n2"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notes": [{
                "organized_note_id": "n1",
                "title": "Groceries",
                "note_content": "Milk",
                "note_content_modified": "2026-10-01T12:00:00Z",
                "tags": ["errand"],
            }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ids = vec!["n1".to_string(), " ".to_string(), "n2".to_string()];
    let notes = client(&server).fetch_full_notes(&ids).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "Milk");
    assert_eq!(notes[0].tags.as_deref(), Some(&["errand".to_string()][..]));
    assert_eq!(notes[0].category_name, None);
}

#[tokio::test]
async fn edit_body_omits_unset_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/edit_note"))
        .and(body_json(json!({"note_id": "n1", "title": "Renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "note": {
                "organized_note_id": "n1",
                "title": "Renamed",
                "note_content_modified": "2026-10-02T09:00:00Z",
            },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = EditNoteRequest::new("n1");
    request.title = Some("Renamed".to_string());
    let edited = client(&server).edit_note(&request).await.unwrap().unwrap();
    assert_eq!(edited.title.as_deref(), Some("Renamed"));
    assert_eq!(edited.content, None);
}

#[tokio::test]
async fn rejected_edit_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/edit_note"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "error": "Note is locked"})),
        )
        .mount(&server)
        .await;

    let mut request = EditNoteRequest::new("n1");
    request.entries = Some("new body".to_string());
    let error = client(&server).edit_note(&request).await.unwrap_err();
    assert!(matches!(error, ApiError::BadRequest(message) if message == "Note is locked"));
}

#[tokio::test]
async fn invalid_input_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let client = client(&server);

    let error = client.edit_note(&EditNoteRequest::new("n1")).await.unwrap_err();
    assert!(matches!(error, ApiError::BadRequest(message) if message == "Nothing to update"));

    let mut too_many = EditNoteRequest::new("n1");
    too_many.sub_categories = Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
    assert!(matches!(
        client.edit_note(&too_many).await,
        Err(ApiError::BadRequest(_))
    ));

    let duplicate = [Category::named("Work"), Category::named(" work ")];
    let error = client.update_categories(&duplicate).await.unwrap_err();
    assert!(matches!(error, ApiError::BadRequest(message) if message.starts_with("Duplicate")));

    assert!(client.fetch_full_notes(&[" ".to_string()]).await.is_err());
    assert!(client.verify_purchase("  ").await.is_err());
    let oversized = vec![0_u8; dump_core::models::MAX_UPLOAD_BYTES + 1];
    assert!(client
        .upload(&UploadRequest::new("file_1.bin", "application/octet-stream"), oversized)
        .await
        .is_err());
}

#[tokio::test]
async fn categories_and_sub_categories_use_their_wire_shapes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/categories/update"))
        .and(body_json(json!({
            "categories": [
                {"name": "Work", "definition": "Job stuff", "keywords": ["boss"], "source": "onboarding"},
                {"name": "Home"},
            ],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "updated_count": 2,
            "categories": [{"category_id": 1, "name": "Work"}, {"category_id": 2, "name": "Home"}],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/subcategories"))
        .and(body_json(json!({
            "category_name": "Home",
            "sub_cat_name": "Groceries",
            "sub_cat_keywords": "{milk, eggs}",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client(&server);

    let categories = [
        Category {
            name: "Work".to_string(),
            definition: Some("Job stuff".to_string()),
            keywords: Some(vec!["boss".to_string()]),
            source: Some("onboarding".to_string()),
        },
        Category::named("Home"),
    ];
    let response = client.update_categories(&categories).await.unwrap();
    assert_eq!(response.updated_count, Some(2));
    assert_eq!(response.categories.len(), 2);

    let request = SubCategoryRequest::from_input("Home", " Groceries ", Some(" "), Some("milk, eggs"));
    client.create_sub_category(&request).await.unwrap();
}

#[tokio::test]
async fn status_codes_map_to_typed_errors() {
    let server = MockServer::start().await;
    for (code, note_type) in [(400, "a"), (401, "b"), (409, "c"), (503, "d"), (418, "e")] {
        Mock::given(method("GET"))
            .and(path("/api/pull_notes"))
            .and(query_param("note_type", note_type))
            .respond_with(
                ResponseTemplate::new(code).set_body_json(json!({"error": format!("code {code}")})),
            )
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/note_counts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    let client = client(&server);

    let fetch = |note_type: &str| {
        let query = NoteQuery {
            limit: 10,
            note_type: Some(note_type.to_string()),
            ..Default::default()
        };
        let client = client.clone();
        async move { client.fetch_notes(&query).await.unwrap_err() }
    };

    assert!(matches!(fetch("a").await, ApiError::BadRequest(m) if m == "code 400"));
    assert!(matches!(fetch("b").await, ApiError::Unauthorized(m) if m == "code 401"));
    assert!(fetch("c").await.is_conflict());
    assert!(matches!(fetch("d").await, ApiError::ServerError(m) if m == "code 503"));
    assert!(matches!(
        fetch("e").await,
        ApiError::Http { status: 418, message } if message == "code 418"
    ));
    assert!(matches!(
        client.fetch_counts().await.unwrap_err(),
        ApiError::ServerError(m) if m == "Unknown error"
    ));
}

#[tokio::test]
async fn malformed_success_body_is_a_decoding_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/usage-status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let error = client(&server).fetch_usage_status().await.unwrap_err();
    assert!(matches!(error, ApiError::DecodingFailed(_)));
}

#[tokio::test]
async fn signed_out_requests_fail_before_sending() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = client_with(&server, Arc::new(SignedOut))
        .fetch_counts()
        .await
        .unwrap_err();
    assert!(matches!(error, ApiError::NoAuthToken));
}

#[tokio::test]
async fn upload_requests_ticket_then_puts_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mobile/upload_file"))
        .and(body_json(json!({
            "filename": "voice_1.m4a",
            "contentType": "audio/m4a",
            "isQuickNote": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uploadUrl": format!("{}/blob/voice_1.m4a?sig=abc", server.uri()),
            "storagePath": "user-1/voice_1.m4a",
            "originalFilename": "voice_1.m4a",
            "isQuickNote": false,
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/blob/voice_1.m4a"))
        .and(query_param("sig", "abc"))
        .and(header("Content-Type", "audio/m4a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = client(&server)
        .upload(&UploadRequest::new("voice_1.m4a", "audio/m4a"), vec![7; 16])
        .await
        .unwrap();
    assert_eq!(ticket.storage_path, "user-1/voice_1.m4a");

    let requests = server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|request| request.method.as_str() == "PUT")
        .unwrap();
    assert_eq!(put.body, vec![7; 16]);
    assert!(!put.headers.contains_key("authorization"));
}

#[tokio::test]
async fn rejected_blob_put_is_an_upload_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mobile/upload_file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uploadUrl": format!("{}/blob/photo.jpg", server.uri()),
            "storagePath": "user-1/photo.jpg",
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/blob/photo.jpg"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let error = client(&server)
        .upload(&UploadRequest::new("photo.jpg", "image/jpeg"), vec![1, 2, 3])
        .await
        .unwrap_err();
    assert!(matches!(error, ApiError::UploadFailed(403)));
}

#[tokio::test]
async fn usage_status_and_purchase_verification() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/usage-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "subscription_tier": "pre_approved",
            "tokens_used": 1200,
            "monthly_token_limit": 50000,
            "tokens_remaining": 48800,
            "usage_percentage": 2.4,
            "is_blocked": false,
            "trial_ends_at": null,
            "resets_at": "2026-11-01T00:00:00Z",
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/verify-ios-purchase"))
        .and(body_json(json!({"signed_transaction": "header.payload.sig"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "subscription_tier": "paid"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let client = client(&server);

    let status = client.fetch_usage_status().await.unwrap();
    assert_eq!(status.tier, SubscriptionTier::PreApproved);
    assert_eq!(status.token_limit, 50_000);
    assert_eq!(status.trial_ends_at, None);

    let verified = client.verify_purchase(" header.payload.sig ").await.unwrap();
    assert!(verified.success);
    assert_eq!(verified.subscription_tier, SubscriptionTier::Paid);
}
