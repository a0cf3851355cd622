use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, NoteService, Result};
use semnote_domain::Note;

pub const CREATED_MESSAGE: &str = "Note created successfully";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteCreateRequest {
	#[serde(default)]
	pub title: Option<String>,
	pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateResponse {
	pub message: String,
	pub note_id: String,
}

impl NoteService {
	pub async fn create(&self, req: NoteCreateRequest) -> Result<CreateResponse> {
		if req.content.trim().is_empty() {
			return Err(Error::invalid_field("$.content", "content must be non-empty."));
		}

		let note_id = Uuid::new_v4();
		let vector = self.embed(&req.content).await?;
		let now = OffsetDateTime::now_utc();
		let note =
			Note::new(note_id.to_string(), req.title.unwrap_or_default(), req.content, vector, now);
		let metadata = note.metadata()?;
		let vector = note.embedding.as_deref().unwrap_or_default();

		self.store.add(note_id, &note.content, vector, &metadata).await?;

		tracing::info!(%note_id, dim = vector.len(), "Note created.");

		Ok(CreateResponse { message: CREATED_MESSAGE.to_string(), note_id: note.id })
	}
}
