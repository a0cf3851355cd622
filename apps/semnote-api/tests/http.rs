use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
	response::Response,
};
use serde_json::Value;
use tower::util::ServiceExt;

use semnote_api::{routes, state::AppState};
use semnote_config::EmbeddingProviderConfig;
use semnote_service::{BoxFuture, EmbeddingProvider, NoteService};
use semnote_testkit::MemoryStore;

const VECTOR_DIM: u32 = 2;

/// Notes mentioning "rust" point one way, everything else the other.
struct StubEmbedding;
impl EmbeddingProvider for StubEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, semnote_providers::Result<Vec<f32>>> {
		let vector = if text.to_lowercase().contains("rust") { vec![1.0, 0.1] } else { vec![0.1, 1.0] };

		Box::pin(async move { Ok(vector) })
	}
}

struct FailingEmbedding;
impl EmbeddingProvider for FailingEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		_text: &'a str,
	) -> BoxFuture<'a, semnote_providers::Result<Vec<f32>>> {
		Box::pin(async move { Err(semnote_providers::Error::EmptyEmbedding) })
	}
}

fn app_with(embedding: Arc<dyn EmbeddingProvider>) -> Router {
	let service = NoteService::with_embedding(
		semnote_testkit::test_config(VECTOR_DIM),
		Arc::new(MemoryStore::new(VECTOR_DIM as usize)),
		embedding,
	);

	routes::router(AppState::from_service(service))
}

fn app() -> Router {
	app_with(Arc::new(StubEmbedding))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
	let mut builder = Request::builder().method(method).uri(uri);
	let body = match body {
		Some(json) => {
			builder = builder.header("content-type", "application/json");

			Body::from(json.to_string())
		},
		None => Body::empty(),
	};

	app.clone()
		.oneshot(builder.body(body).expect("Failed to build request."))
		.await
		.expect("Failed to call router.")
}

async fn json_body(response: Response) -> Value {
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&body).expect("Failed to parse response.")
}

async fn create(app: &Router, title: &str, content: &str) -> String {
	let response = send(
		app,
		"POST",
		"/notes/",
		Some(serde_json::json!({ "title": title, "content": content })),
	)
	.await;

	assert_eq!(response.status(), StatusCode::CREATED);

	let json = json_body(response).await;

	assert_eq!(json["message"], "Note created successfully");

	json["note_id"].as_str().expect("Missing note_id.").to_string()
}

#[tokio::test]
async fn root_and_health_report_status() {
	let app = app();
	let response = send(&app, "GET", "/", None).await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["status"], "Server is Running");

	let response = send(&app, "GET", "/health", None).await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn note_lifecycle_over_http() {
	let app = app();
	let note_id = create(&app, "Intro", "Rust ownership").await;
	let response = send(&app, "GET", "/notes", None).await;

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json["message"], "Notes fetched successfully");
	assert_eq!(json["notes"][0]["id"], note_id.as_str());
	assert_eq!(json["notes"][0]["title"], "Intro");
	assert_eq!(json["notes"][0]["created_at"], json["notes"][0]["updated_at"]);
	assert!(json["notes"][0].get("embedding").is_none());

	let response = send(
		&app,
		"PUT",
		&format!("/notes/{note_id}"),
		Some(serde_json::json!({ "title": "Renamed" })),
	)
	.await;

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json["message"], "Note updated successfully");
	assert_eq!(json["note_id"], note_id.as_str());

	let response = send(&app, "GET", &format!("/notes/{note_id}"), None).await;

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json["message"], "Note fetched successfully");
	assert_eq!(json["note"]["title"], "Renamed");
	assert_eq!(json["note"]["content"], "Rust ownership");

	let response = send(&app, "DELETE", &format!("/notes/{note_id}"), None).await;

	assert_eq!(response.status(), StatusCode::NO_CONTENT);

	let response = send(&app, "GET", &format!("/notes/{note_id}"), None).await;

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(json_body(response).await["error_code"], "not_found");
}

#[tokio::test]
async fn unknown_note_is_not_found() {
	let app = app();
	let uri = format!("/notes/{}", uuid::Uuid::new_v4());
	let response =
		send(&app, "PUT", &uri, Some(serde_json::json!({ "content": "rust" }))).await;

	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	let response = send(&app, "DELETE", &uri, None).await;

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_returns_ranked_results() {
	let app = app();
	let rust_id = create(&app, "r", "Rust lifetimes").await;

	create(&app, "g", "Garden tomatoes").await;

	let response = send(&app, "GET", "/notes/search?q=rust&top_k=1", None).await;

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;
	let results = json["results"].as_array().expect("Missing results.");

	assert_eq!(results.len(), 1);
	assert_eq!(results[0]["id"], rust_id.as_str());
	assert_eq!(results[0]["metadata"]["title"], "r");
	assert!(results[0]["score"].is_number());
}

#[tokio::test]
async fn malformed_requests_are_bad_requests() {
	let app = app();
	let cases = [
		send(&app, "GET", "/notes/not-a-uuid", None).await,
		send(&app, "POST", "/notes/", Some(serde_json::json!({ "title": "no content" }))).await,
		send(&app, "GET", "/notes/search", None).await,
		send(&app, "GET", "/notes/search?q=rust&top_k=abc", None).await,
		send(&app, "GET", "/notes/search?q=rust&top_k=0", None).await,
		send(&app, "GET", "/notes/search?q=%20", None).await,
	];

	for response in cases {
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert_eq!(json_body(response).await["error_code"], "invalid_request");
	}
}

#[tokio::test]
async fn validation_errors_name_the_field() {
	let app = app();
	let note_id = create(&app, "t", "rust").await;
	let cases = [
		(send(&app, "POST", "/notes", Some(serde_json::json!({ "content": "" }))).await, "$.content"),
		(
			send(&app, "POST", "/notes/", Some(serde_json::json!({ "title": "no content" }))).await,
			"$.content",
		),
		(
			send(
				&app,
				"PUT",
				&format!("/notes/{note_id}"),
				Some(serde_json::json!({ "title": 5 })),
			)
			.await,
			"$.title",
		),
		(send(&app, "GET", "/notes/search?q=rust&top_k=abc", None).await, "top_k"),
		(send(&app, "GET", "/notes/search?q=rust&top_k=0", None).await, "top_k"),
		(send(&app, "GET", "/notes/search?top_k=3", None).await, "q"),
		(send(&app, "GET", "/notes/not-a-uuid", None).await, "note_id"),
	];

	for (response, field) in cases {
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);

		let json = json_body(response).await;

		assert_eq!(json["error_code"], "invalid_request");
		assert_eq!(json["fields"][0], field, "unexpected fields in {json}");
	}
}

#[tokio::test]
async fn empty_update_is_accepted() {
	let app = app();
	let note_id = create(&app, "t", "rust").await;
	let response =
		send(&app, "PUT", &format!("/notes/{note_id}"), Some(serde_json::json!({}))).await;

	assert_eq!(response.status(), StatusCode::OK);

	let response = send(&app, "GET", &format!("/notes/{note_id}"), None).await;
	let json = json_body(response).await;

	assert_eq!(json["note"]["title"], "t");
	assert_eq!(json["note"]["content"], "rust");

	let uri = format!("/notes/{}", uuid::Uuid::new_v4());
	let response = send(&app, "PUT", &uri, Some(serde_json::json!({}))).await;

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn embedding_failure_is_a_server_error() {
	let app = app_with(Arc::new(FailingEmbedding));
	let response =
		send(&app, "POST", "/notes/", Some(serde_json::json!({ "content": "rust" }))).await;

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json_body(response).await["error_code"], "embedding_unavailable");
}
