use serde::{Deserialize, Serialize};

use crate::{NoteService, Result};
use semnote_domain::Note;

pub const LISTED_MESSAGE: &str = "Notes fetched successfully";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListResponse {
	pub message: String,
	pub notes: Vec<Note>,
}

impl NoteService {
	pub async fn list(&self) -> Result<ListResponse> {
		let found = self.store.get(None).await?;

		if found.documents.len() != found.ids.len() || found.metadatas.len() != found.ids.len() {
			tracing::warn!(
				ids = found.ids.len(),
				documents = found.documents.len(),
				metadatas = found.metadatas.len(),
				"Store returned misaligned columns; extra entries are dropped."
			);
		}

		let notes: Vec<Note> = found
			.ids
			.into_iter()
			.zip(found.documents)
			.zip(found.metadatas)
			.map(|((id, content), metadata)| Note::from_stored(id, content, metadata.as_ref()))
			.collect();

		tracing::debug!(count = notes.len(), "Notes listed.");

		Ok(ListResponse { message: LISTED_MESSAGE.to_string(), notes })
	}
}
