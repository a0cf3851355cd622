use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::datetime;

pub const TITLE_KEY: &str = "title";
pub const CREATED_AT_KEY: &str = "created_at";
pub const UPDATED_AT_KEY: &str = "updated_at";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
	pub id: String,
	pub title: String,
	pub content: String,
	#[serde(with = "crate::time_serde::option")]
	pub created_at: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde::option")]
	pub updated_at: Option<OffsetDateTime>,
	/// Vector of the current `content`. `None` when the note was read back without its
	/// vector, in which case writes leave the stored vector alone.
	#[serde(skip)]
	pub embedding: Option<Vec<f32>>,
}
impl Note {
	/// A freshly created note: both timestamps are `now`.
	pub fn new(
		id: impl Into<String>,
		title: String,
		content: String,
		embedding: Vec<f32>,
		now: OffsetDateTime,
	) -> Self {
		Self {
			id: id.into(),
			title,
			content,
			created_at: Some(now),
			updated_at: Some(now),
			embedding: Some(embedding),
		}
	}

	/// Rebuilds a note from a stored record. Missing titles default to empty and
	/// unreadable timestamps become `None`.
	pub fn from_stored(id: String, content: String, metadata: Option<&Map<String, Value>>) -> Self {
		let field = |key: &str| metadata.and_then(|metadata| metadata.get(key));

		Self {
			id,
			title: title_of(field(TITLE_KEY)),
			content,
			created_at: field(CREATED_AT_KEY).and_then(datetime::parse),
			updated_at: field(UPDATED_AT_KEY).and_then(datetime::parse),
			embedding: None,
		}
	}

	/// The metadata map persisted next to the note's content and vector.
	pub fn metadata(&self) -> Result<Map<String, Value>, time::error::Format> {
		let mut metadata = Map::new();

		metadata.insert(TITLE_KEY.to_string(), Value::String(self.title.clone()));

		for (key, value) in [(CREATED_AT_KEY, self.created_at), (UPDATED_AT_KEY, self.updated_at)] {
			if let Some(ts) = value {
				metadata.insert(key.to_string(), Value::String(ts.format(&Rfc3339)?));
			}
		}

		Ok(metadata)
	}
}

/// A partial update. `None` leaves a field unchanged; `Some("")` sets it to empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub content: Option<String>,
}

pub(crate) fn title_of(value: Option<&Value>) -> String {
	match value {
		Some(Value::String(title)) => title.clone(),
		Some(Value::Null) | None => String::new(),
		Some(other) => other.to_string(),
	}
}
