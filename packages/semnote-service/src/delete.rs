use uuid::Uuid;

use crate::{NoteService, Result};

impl NoteService {
	pub async fn delete(&self, note_id: Uuid) -> Result<()> {
		self.load_note(note_id).await?;
		self.store.delete(note_id).await?;

		tracing::info!(%note_id, "Note deleted.");

		Ok(())
	}
}
