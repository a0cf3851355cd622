use serde::{Deserialize, Serialize};

use crate::{Error, NoteService, Result};
use semnote_domain::{SearchResult, normalize};

pub const SEARCH_MESSAGE: &str = "Search results fetched successfully";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
	pub q: String,
	#[serde(default)]
	pub top_k: Option<u32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchResponse {
	pub message: String,
	pub results: Vec<SearchResult>,
}

impl NoteService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let query = req.q.trim();

		if query.is_empty() {
			return Err(Error::invalid_field("q", "q must be non-empty."));
		}

		let max_top_k = self.cfg.search.max_top_k;
		let top_k = req.top_k.unwrap_or(self.cfg.search.default_top_k);

		if top_k == 0 || top_k > max_top_k {
			return Err(Error::invalid_field(
				"top_k",
				format!("top_k must be between 1 and {max_top_k}."),
			));
		}

		let vector = self.embed(query).await?;
		let hits = self.store.query(&vector, top_k).await?;
		let results = normalize(hits.ids, hits.documents, hits.distances, hits.metadatas);

		tracing::info!(top_k, count = results.len(), "Search completed.");

		Ok(SearchResponse { message: SEARCH_MESSAGE.to_string(), results })
	}
}
