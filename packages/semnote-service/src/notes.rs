use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{NoteService, Result};
use semnote_domain::Note;

pub const FETCHED_MESSAGE: &str = "Note fetched successfully";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteDetailResponse {
	pub message: String,
	pub note: Note,
}

impl NoteService {
	pub async fn get_note(&self, note_id: Uuid) -> Result<NoteDetailResponse> {
		let note = self.load_note(note_id).await?;

		tracing::debug!(%note_id, "Note fetched.");

		Ok(NoteDetailResponse { message: FETCHED_MESSAGE.to_string(), note })
	}
}
