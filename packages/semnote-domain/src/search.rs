use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::{
	datetime,
	note::{self, CREATED_AT_KEY, TITLE_KEY, UPDATED_AT_KEY},
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchMetadata {
	pub title: String,
	#[serde(with = "crate::time_serde::option")]
	pub created_at: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde::option")]
	pub updated_at: Option<OffsetDateTime>,
}
impl SearchMetadata {
	fn from_map(map: &Map<String, Value>) -> Self {
		Self {
			title: note::title_of(map.get(TITLE_KEY)),
			created_at: map.get(CREATED_AT_KEY).and_then(datetime::parse),
			updated_at: map.get(UPDATED_AT_KEY).and_then(datetime::parse),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchResult {
	pub id: String,
	pub content: String,
	/// Passed through from the store; its direction is the store's convention.
	pub score: f32,
	pub metadata: Option<SearchMetadata>,
}

/// Zips the column-wise output of a nearest-neighbor query into typed results.
///
/// The columns are expected to be aligned. If they are not, the extra tail of the
/// longer columns is dropped. Input order is the store's ranking and is kept as is.
pub fn normalize(
	ids: Vec<String>,
	docs: Vec<String>,
	scores: Vec<f32>,
	metas: Vec<Option<Map<String, Value>>>,
) -> Vec<SearchResult> {
	let lens = [ids.len(), docs.len(), scores.len(), metas.len()];
	let len = lens.iter().copied().min().unwrap_or(0);

	if lens.iter().any(|&other| other != len) {
		tracing::warn!(
			ids = lens[0],
			documents = lens[1],
			scores = lens[2],
			metadatas = lens[3],
			kept = len,
			"Search result columns are misaligned; truncating."
		);
	}

	ids.into_iter()
		.zip(docs)
		.zip(scores)
		.zip(metas)
		.map(|(((id, content), score), meta)| SearchResult {
			id,
			content,
			score,
			metadata: meta.as_ref().map(SearchMetadata::from_map),
		})
		.collect()
}
