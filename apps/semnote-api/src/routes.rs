use axum::{
	Json, Router,
	extract::{
		Path, Query, State,
		rejection::{JsonRejection, PathRejection, QueryRejection},
	},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;
use semnote_domain::NoteUpdate;
use semnote_service::{
	CreateResponse, Error, ListResponse, NoteCreateRequest, NoteDetailResponse, SearchRequest,
	SearchResponse, UpdateResponse,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(root))
		.route("/health", get(health))
		.route("/notes", get(list).post(create))
		.route("/notes/", get(list).post(create))
		.route("/notes/search", get(search))
		.route("/notes/{note_id}", get(get_note).put(update).delete(delete))
		.with_state(state)
}

#[derive(Debug, Serialize)]
struct StatusBody {
	status: &'static str,
}

async fn root() -> Json<StatusBody> {
	Json(StatusBody { status: "Server is Running" })
}

async fn health() -> Json<StatusBody> {
	Json(StatusBody { status: "healthy" })
}

async fn list(State(state): State<AppState>) -> Result<Json<ListResponse>, ApiError> {
	let response = state.service.list().await?;

	Ok(Json(response))
}

async fn create(
	State(state): State<AppState>,
	payload: Result<Json<NoteCreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateResponse>), ApiError> {
	let Json(payload) = payload?;
	let response = state.service.create(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn get_note(
	State(state): State<AppState>,
	note_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<NoteDetailResponse>, ApiError> {
	let Path(note_id) = note_id?;
	let response = state.service.get_note(note_id).await?;

	Ok(Json(response))
}

async fn update(
	State(state): State<AppState>,
	note_id: Result<Path<Uuid>, PathRejection>,
	payload: Result<Json<NoteUpdate>, JsonRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
	let Path(note_id) = note_id?;
	let Json(payload) = payload?;
	let response = state.service.update(note_id, payload).await?;

	Ok(Json(response))
}

async fn delete(
	State(state): State<AppState>,
	note_id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
	let Path(note_id) = note_id?;

	state.service.delete(note_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

/// Raw search parameters. `top_k` is parsed by hand so a bad value can be
/// reported against its field.
#[derive(Debug, Deserialize)]
struct SearchQuery {
	q: Option<String>,
	top_k: Option<String>,
}
impl TryFrom<SearchQuery> for SearchRequest {
	type Error = ApiError;

	fn try_from(query: SearchQuery) -> Result<Self, Self::Error> {
		let Some(q) = query.q else {
			return Err(ApiError::invalid_field("q", "q is required."));
		};
		let top_k = match query.top_k.as_deref().map(str::trim) {
			None | Some("") => None,
			Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
				ApiError::invalid_field("top_k", "top_k must be a non-negative integer.")
			})?),
		};

		Ok(SearchRequest { q, top_k })
	}
}

async fn search(
	State(state): State<AppState>,
	query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Query(query) = query?;
	let response = state.service.search(SearchRequest::try_from(query)?).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}

	fn bad_request(message: impl Into<String>, field: Option<String>) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "invalid_request", message, field.map(|f| vec![f]))
	}

	fn invalid_field(field: &str, message: impl Into<String>) -> Self {
		Self::bad_request(message, Some(field.to_string()))
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message, field } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message, field.map(|f| vec![f])),
			Error::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "not_found", message, None),
			Error::EmbeddingUnavailable { message } => {
				tracing::error!(%message, "Embedding unavailable.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "embedding_unavailable", message, None)
			},
			Error::Provider { message } => {
				tracing::error!(%message, "Embedding provider failed.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "provider_error", message, None)
			},
			Error::Storage { message } => {
				tracing::error!(%message, "Vector store failed.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message, None)
			},
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		let message = rejection.body_text();
		let field = match rejection {
			JsonRejection::JsonDataError(_) =>
				serde_field(&message).map(|path| format!("$.{path}")),
			_ => None,
		};

		Self::bad_request(message, field)
	}
}

impl From<PathRejection> for ApiError {
	fn from(rejection: PathRejection) -> Self {
		// `note_id` is the only path parameter.
		Self::invalid_field("note_id", rejection.body_text())
	}
}

impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		let message = rejection.body_text();
		let field = serde_field(&message);

		Self::bad_request(message, field)
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

/// Field path named by a serde deserialization error, e.g. `content` for
/// "missing field `content`" or `title` for "title: invalid type: ...".
fn serde_field(message: &str) -> Option<String> {
	let detail = message.split_once("type: ").map_or(message, |(_, detail)| detail);

	if let Some((_, rest)) = detail.split_once("missing field `") {
		let field = rest.split('`').next()?;
		let parent = detail.split_once(": missing field").map(|(parent, _)| parent);

		return Some(match parent {
			Some(parent) if !parent.contains(' ') => format!("{parent}.{field}"),
			_ => field.to_string(),
		});
	}

	let (path, _) = detail.split_once(": ")?;

	(!path.is_empty() && !path.contains(' ')).then(|| path.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn serde_field_reads_missing_field() {
		assert_eq!(
			serde_field(
				"Failed to deserialize the JSON body into the target type: missing field \
				 `content` at line 1 column 18"
			),
			Some("content".to_string()),
		);
		assert_eq!(
			serde_field("Failed to deserialize query string: missing field `q`"),
			Some("q".to_string()),
		);
	}

	#[test]
	fn serde_field_reads_path_prefix() {
		assert_eq!(
			serde_field(
				"Failed to deserialize the JSON body into the target type: title: invalid type: \
				 integer `5`, expected a string at line 1 column 11"
			),
			Some("title".to_string()),
		);
	}

	#[test]
	fn serde_field_ignores_messages_without_a_field() {
		assert_eq!(
			serde_field("Failed to deserialize query string: invalid digit found in string"),
			None,
		);
	}
}
