use std::{
	cmp::Ordering,
	sync::{
		Mutex, MutexGuard,
		atomic::{AtomicUsize, Ordering as AtomicOrdering},
	},
};

use uuid::Uuid;

use semnote_storage::{BoxFuture, Error, GetResult, Metadata, NoteStore, QueryResult, Result};

struct Record {
	id: Uuid,
	content: String,
	vector: Vec<f32>,
	metadata: Metadata,
}

/// In-process [`NoteStore`] with Qdrant-like semantics: insertion-ordered listing,
/// cosine similarity scores (higher is closer), partial updates that merge
/// metadata keys, idempotent deletes.
pub struct MemoryStore {
	vector_dim: usize,
	records: Mutex<Vec<Record>>,
	writes: AtomicUsize,
}
impl MemoryStore {
	pub fn new(vector_dim: usize) -> Self {
		Self { vector_dim, records: Mutex::new(Vec::new()), writes: AtomicUsize::new(0) }
	}

	/// The stored vector of `id`, which [`NoteStore::get`] never exposes.
	pub fn vector(&self, id: Uuid) -> Option<Vec<f32>> {
		self.lock().iter().find(|record| record.id == id).map(|record| record.vector.clone())
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Number of successful add/update/delete calls.
	pub fn write_count(&self) -> usize {
		self.writes.load(AtomicOrdering::SeqCst)
	}

	fn lock(&self) -> MutexGuard<'_, Vec<Record>> {
		self.records.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn check_dim(&self, vector: &[f32]) -> Result<()> {
		if vector.len() != self.vector_dim {
			return Err(Error::InvalidArgument(format!(
				"Vector has {} dimensions; collection expects {}.",
				vector.len(),
				self.vector_dim
			)));
		}

		Ok(())
	}

	fn add_record(
		&self,
		id: Uuid,
		content: &str,
		vector: &[f32],
		metadata: &Metadata,
	) -> Result<()> {
		self.check_dim(vector)?;

		let mut records = self.lock();
		let record = Record {
			id,
			content: content.to_string(),
			vector: vector.to_vec(),
			metadata: metadata.clone(),
		};

		match records.iter_mut().find(|existing| existing.id == id) {
			Some(existing) => *existing = record,
			None => records.push(record),
		}

		self.writes.fetch_add(1, AtomicOrdering::SeqCst);

		Ok(())
	}

	fn get_records(&self, ids: Option<&[Uuid]>) -> GetResult {
		let records = self.lock();
		let mut out = GetResult::default();

		for record in records.iter() {
			if ids.is_some_and(|ids| !ids.contains(&record.id)) {
				continue;
			}

			out.push(record.id.to_string(), record.content.clone(), metadata_of(record));
		}

		out
	}

	fn update_record(
		&self,
		id: Uuid,
		content: Option<&str>,
		vector: Option<&[f32]>,
		metadata: Option<&Metadata>,
	) -> Result<()> {
		if let Some(vector) = vector {
			self.check_dim(vector)?;
		}

		let mut records = self.lock();
		let Some(record) = records.iter_mut().find(|record| record.id == id) else {
			return Err(Error::NotFound(format!("No point with id {id}.")));
		};
		let full = content.is_some() && vector.is_some() && metadata.is_some();

		if let Some(content) = content {
			record.content = content.to_string();
		}
		if let Some(vector) = vector {
			record.vector = vector.to_vec();
		}
		if let Some(metadata) = metadata {
			if full {
				record.metadata = metadata.clone();
			} else {
				record.metadata.extend(metadata.clone());
			}
		}

		self.writes.fetch_add(1, AtomicOrdering::SeqCst);

		Ok(())
	}

	fn delete_record(&self, id: Uuid) {
		self.lock().retain(|record| record.id != id);
		self.writes.fetch_add(1, AtomicOrdering::SeqCst);
	}

	fn query_records(&self, vector: &[f32], top_k: u32) -> Result<QueryResult> {
		self.check_dim(vector)?;

		let records = self.lock();
		let mut scored = records
			.iter()
			.map(|record| (cosine(vector, &record.vector), record))
			.collect::<Vec<_>>();

		scored.sort_by(|(left, _), (right, _)| right.partial_cmp(left).unwrap_or(Ordering::Equal));

		let mut out = QueryResult::default();

		for (score, record) in scored.into_iter().take(top_k as usize) {
			out.ids.push(record.id.to_string());
			out.documents.push(record.content.clone());
			out.distances.push(score);
			out.metadatas.push(metadata_of(record));
		}

		Ok(out)
	}
}
impl NoteStore for MemoryStore {
	fn add<'a>(
		&'a self,
		id: Uuid,
		content: &'a str,
		vector: &'a [f32],
		metadata: &'a Metadata,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { self.add_record(id, content, vector, metadata) })
	}

	fn get<'a>(&'a self, ids: Option<&'a [Uuid]>) -> BoxFuture<'a, Result<GetResult>> {
		Box::pin(async move { Ok(self.get_records(ids)) })
	}

	fn update<'a>(
		&'a self,
		id: Uuid,
		content: Option<&'a str>,
		vector: Option<&'a [f32]>,
		metadata: Option<&'a Metadata>,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { self.update_record(id, content, vector, metadata) })
	}

	fn delete<'a>(&'a self, id: Uuid) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.delete_record(id);

			Ok(())
		})
	}

	fn query<'a>(&'a self, vector: &'a [f32], top_k: u32) -> BoxFuture<'a, Result<QueryResult>> {
		Box::pin(async move { self.query_records(vector, top_k) })
	}
}

fn metadata_of(record: &Record) -> Option<Metadata> {
	if record.metadata.is_empty() { None } else { Some(record.metadata.clone()) }
}

fn cosine(left: &[f32], right: &[f32]) -> f32 {
	let dot = left.iter().zip(right).map(|(a, b)| a * b).sum::<f32>();
	let norm = |vec: &[f32]| vec.iter().map(|value| value * value).sum::<f32>().sqrt();
	let denom = norm(left) * norm(right);

	if denom == 0.0 { 0.0 } else { dot / denom }
}
