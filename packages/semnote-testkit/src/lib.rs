mod error;
mod memory;

pub use error::{Error, Result};
pub use memory::MemoryStore;

use std::{env, thread, time::Duration};

use qdrant_client::Qdrant;
use serde_json::Map;
use tokio::{runtime::Builder, time};
use uuid::Uuid;

pub fn env_qdrant_url() -> Option<String> {
	env::var("SEMNOTE_QDRANT_URL").ok()
}

/// A valid config whose embedding endpoint is unreachable, for tests that stub the
/// provider.
pub fn test_config(vector_dim: u32) -> semnote_config::Config {
	semnote_config::Config {
		service: semnote_config::Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: semnote_config::Storage {
			qdrant: semnote_config::Qdrant {
				url: "http://127.0.0.1:6334".to_string(),
				collection: "semnote_notes".to_string(),
				vector_dim,
			},
		},
		providers: semnote_config::Providers {
			embedding: semnote_config::EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/embeddings".to_string(),
				model: "test".to_string(),
				dimensions: vector_dim,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		search: semnote_config::Search { default_top_k: 5, max_top_k: 20 },
	}
}

/// A uniquely named Qdrant collection that is dropped again after the test.
pub struct TestCollection {
	name: String,
	url: String,
	cleaned: bool,
}
impl TestCollection {
	pub fn new(url: impl Into<String>) -> Self {
		Self {
			name: format!("semnote_test_{}", Uuid::new_v4().simple()),
			url: url.into(),
			cleaned: false,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub async fn cleanup(mut self) -> Result<()> {
		delete_collection(&self.url, &self.name).await?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestCollection {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let name = self.name.clone();
		let url = self.url.clone();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test collection cleanup failed: {err}.");

					return;
				},
			};

			if let Err(err) = runtime.block_on(delete_collection(&url, &name)) {
				eprintln!("Test collection cleanup failed: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}

async fn delete_collection(url: &str, name: &str) -> Result<()> {
	let client = Qdrant::from_url(url)
		.build()
		.map_err(|err| Error::Message(format!("Failed to build Qdrant client: {err}.")))?;
	let exists = time::timeout(Duration::from_secs(10), client.collection_exists(name))
		.await
		.map_err(|_| Error::Message("Qdrant collection_exists timed out.".to_string()))??;

	if !exists {
		return Ok(());
	}

	time::timeout(Duration::from_secs(10), client.delete_collection(name.to_string()))
		.await
		.map_err(|_| Error::Message(format!("Timed out deleting Qdrant collection {name:?}.")))??;

	Ok(())
}
