use std::sync::Arc;

use semnote_service::NoteService;
use semnote_storage::qdrant::QdrantStore;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<NoteService>,
}
impl AppState {
	pub async fn new(config: semnote_config::Config) -> color_eyre::Result<Self> {
		let store = QdrantStore::new(&config.storage.qdrant)?;

		store.ensure_collection().await?;

		tracing::info!(
			collection = %config.storage.qdrant.collection,
			vector_dim = config.storage.qdrant.vector_dim,
			"Vector store ready."
		);

		Ok(Self::from_service(NoteService::new(config, Arc::new(store))))
	}

	pub fn from_service(service: NoteService) -> Self {
		Self { service: Arc::new(service) }
	}
}
