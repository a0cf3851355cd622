use time::OffsetDateTime;

use crate::note::{Note, NoteUpdate};

/// Whether an update must come with a fresh embedding.
///
/// Only a present, non-blank `content` counts. Whitespace-only content is still
/// stored verbatim by [`merge`], but the previous vector stays. Title changes
/// never refresh the vector.
pub fn requires_embedding(update: &NoteUpdate) -> bool {
	update.content.as_deref().is_some_and(|content| !content.trim().is_empty())
}

/// Applies `update` to `existing`, field by field.
///
/// `new_embedding` must be `Some` exactly when [`requires_embedding`] holds for
/// `update`. `created_at` is carried over and `updated_at` becomes `now`, held
/// back to the previous value if the clock went backwards.
pub fn merge(
	existing: Note,
	update: NoteUpdate,
	new_embedding: Option<Vec<f32>>,
	now: OffsetDateTime,
) -> Note {
	let updated_at = match existing.updated_at {
		Some(previous) if previous > now => previous,
		_ => now,
	};

	Note {
		id: existing.id,
		title: update.title.unwrap_or(existing.title),
		content: update.content.unwrap_or(existing.content),
		created_at: existing.created_at,
		updated_at: Some(updated_at),
		embedding: new_embedding.or(existing.embedding),
	}
}
