use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{NoteService, Result};
use semnote_domain::{NoteUpdate, merge, requires_embedding};

pub const UPDATED_MESSAGE: &str = "Note updated successfully";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateResponse {
	pub message: String,
	pub note_id: String,
}

impl NoteService {
	pub async fn update(&self, note_id: Uuid, update: NoteUpdate) -> Result<UpdateResponse> {
		let existing = self.load_note(note_id).await?;
		let refresh = requires_embedding(&update);
		let new_embedding = match update.content.as_deref() {
			Some(content) if refresh => Some(self.embed(content).await?),
			_ => None,
		};
		let note = merge(existing, update, new_embedding, OffsetDateTime::now_utc());
		let metadata = note.metadata()?;
		let vector = if refresh { note.embedding.as_deref() } else { None };

		self.store.update(note_id, Some(&note.content), vector, Some(&metadata)).await?;

		tracing::info!(%note_id, embedding_refreshed = refresh, "Note updated.");

		Ok(UpdateResponse { message: UPDATED_MESSAGE.to_string(), note_id: note.id })
	}
}
