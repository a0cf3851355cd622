pub mod qdrant;

mod error;

pub use error::Error;

use std::{future::Future, pin::Pin};

use serde_json::{Map, Value};
use uuid::Uuid;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Free-form key/value map stored next to each record.
pub type Metadata = Map<String, Value>;

/// Column-wise records, as returned by [`NoteStore::get`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetResult {
	pub ids: Vec<String>,
	pub documents: Vec<String>,
	pub metadatas: Vec<Option<Metadata>>,
}
impl GetResult {
	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	pub fn push(&mut self, id: String, document: String, metadata: Option<Metadata>) {
		self.ids.push(id);
		self.documents.push(document);
		self.metadatas.push(metadata);
	}
}

/// Column-wise nearest neighbors, ranked by the store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
	pub ids: Vec<String>,
	pub documents: Vec<String>,
	pub distances: Vec<f32>,
	pub metadatas: Vec<Option<Metadata>>,
}

/// An id-addressed collection of text records, each with one vector and a metadata map.
pub trait NoteStore
where
	Self: Send + Sync,
{
	fn add<'a>(
		&'a self,
		id: Uuid,
		content: &'a str,
		vector: &'a [f32],
		metadata: &'a Metadata,
	) -> BoxFuture<'a, Result<()>>;

	/// `None` fetches every record.
	fn get<'a>(&'a self, ids: Option<&'a [Uuid]>) -> BoxFuture<'a, Result<GetResult>>;

	/// Fields left as `None` are not touched. In particular the stored vector only
	/// changes when `vector` is given.
	fn update<'a>(
		&'a self,
		id: Uuid,
		content: Option<&'a str>,
		vector: Option<&'a [f32]>,
		metadata: Option<&'a Metadata>,
	) -> BoxFuture<'a, Result<()>>;

	fn delete<'a>(&'a self, id: Uuid) -> BoxFuture<'a, Result<()>>;

	/// At most `top_k` records closest to `vector`.
	fn query<'a>(&'a self, vector: &'a [f32], top_k: u32) -> BoxFuture<'a, Result<QueryResult>>;
}
