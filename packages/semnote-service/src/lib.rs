pub mod create;
pub mod delete;
pub mod list;
pub mod notes;
pub mod search;
pub mod update;

mod error;

pub use create::{CreateResponse, NoteCreateRequest};
pub use error::{Error, Result};
pub use list::ListResponse;
pub use notes::NoteDetailResponse;
pub use search::{SearchRequest, SearchResponse};
pub use update::UpdateResponse;

use std::{future::Future, pin::Pin, sync::Arc};

use uuid::Uuid;

use semnote_config::{Config, EmbeddingProviderConfig};
use semnote_domain::Note;
use semnote_providers::embedding;
use semnote_storage::NoteStore;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Turns one text into one vector.
pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, semnote_providers::Result<Vec<f32>>>;
}

struct DefaultEmbedding;
impl EmbeddingProvider for DefaultEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, semnote_providers::Result<Vec<f32>>> {
		Box::pin(embedding::embed(cfg, text))
	}
}

pub struct NoteService {
	pub cfg: Config,
	pub store: Arc<dyn NoteStore>,
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl NoteService {
	pub fn new(cfg: Config, store: Arc<dyn NoteStore>) -> Self {
		Self { cfg, store, embedding: Arc::new(DefaultEmbedding) }
	}

	pub fn with_embedding(
		cfg: Config,
		store: Arc<dyn NoteStore>,
		embedding: Arc<dyn EmbeddingProvider>,
	) -> Self {
		Self { cfg, store, embedding }
	}

	pub(crate) async fn embed(&self, text: &str) -> Result<Vec<f32>> {
		let vector = self.embedding.embed(&self.cfg.providers.embedding, text).await?;

		if vector.len() != self.cfg.storage.qdrant.vector_dim as usize {
			return Err(Error::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}

		Ok(vector)
	}

	pub(crate) async fn load_note(&self, note_id: Uuid) -> Result<Note> {
		let ids = [note_id];
		let found = self.store.get(Some(&ids)).await?;
		let (Some(id), Some(content)) =
			(found.ids.into_iter().next(), found.documents.into_iter().next())
		else {
			return Err(Error::note_not_found());
		};
		let metadata = found.metadatas.into_iter().next().flatten();

		Ok(Note::from_stored(id, content, metadata.as_ref()))
	}
}
