//! [`NoteStore`] over a Qdrant collection.
//!
//! One point per note: the point id is the note id, the single unnamed vector is
//! the content embedding, and the payload holds the content under
//! [`CONTENT_KEY`] next to the note metadata.

use std::collections::HashMap;

use qdrant_client::{
	client::Payload,
	qdrant::{
		CreateCollectionBuilder, DeletePointsBuilder, Distance, GetPointsBuilder, PointId,
		PointStruct, PointVectors, PointsIdsList, Query, QueryPointsBuilder, RetrievedPoint,
		ScoredPoint, ScrollPointsBuilder, SetPayloadPointsBuilder, UpdatePointVectorsBuilder,
		UpsertPointsBuilder, Value, VectorParamsBuilder, point_id::PointIdOptions, value::Kind,
	},
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::{BoxFuture, GetResult, Metadata, NoteStore, QueryResult, Result};

pub const CONTENT_KEY: &str = "content";

const SCROLL_PAGE_SIZE: u32 = 256;

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &semnote_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Creates the collection with cosine distance unless it already exists.
	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(&self.collection).await? {
			tracing::info!(collection = %self.collection, "Qdrant collection found.");

			return Ok(());
		}

		self.client
			.create_collection(
				CreateCollectionBuilder::new(self.collection.clone()).vectors_config(
					VectorParamsBuilder::new(self.vector_dim as u64, Distance::Cosine),
				),
			)
			.await?;

		tracing::info!(
			collection = %self.collection,
			vector_dim = self.vector_dim,
			"Qdrant collection created."
		);

		Ok(())
	}

	async fn add_point(
		&self,
		id: Uuid,
		content: &str,
		vector: &[f32],
		metadata: &Metadata,
	) -> Result<()> {
		let point = PointStruct::new(
			id.to_string(),
			vector.to_vec(),
			Payload::from(payload_map(Some(content), Some(metadata))),
		);

		self.client
			.upsert_points(UpsertPointsBuilder::new(self.collection.clone(), vec![point]).wait(true))
			.await?;

		Ok(())
	}

	async fn get_points(&self, ids: Option<&[Uuid]>) -> Result<GetResult> {
		let mut out = GetResult::default();

		match ids {
			Some(ids) => {
				let ids = ids.iter().map(point_id).collect::<Vec<_>>();
				let response = self
					.client
					.get_points(
						GetPointsBuilder::new(self.collection.clone(), ids).with_payload(true),
					)
					.await?;

				for point in response.result {
					push_retrieved(&mut out, point);
				}
			},
			None => {
				let mut offset: Option<PointId> = None;

				loop {
					let mut scroll = ScrollPointsBuilder::new(self.collection.clone())
						.limit(SCROLL_PAGE_SIZE)
						.with_payload(true);

					if let Some(offset) = offset.take() {
						scroll = scroll.offset(offset);
					}

					let response = self.client.scroll(scroll).await?;

					for point in response.result {
						push_retrieved(&mut out, point);
					}

					match response.next_page_offset {
						Some(next) => offset = Some(next),
						None => break,
					}
				}
			},
		}

		Ok(out)
	}

	async fn update_point(
		&self,
		id: Uuid,
		content: Option<&str>,
		vector: Option<&[f32]>,
		metadata: Option<&Metadata>,
	) -> Result<()> {
		// A full record goes in as one upsert so content and vector never diverge.
		if let (Some(content), Some(vector), Some(metadata)) = (content, vector, metadata) {
			return self.add_point(id, content, vector, metadata).await;
		}

		if let Some(vector) = vector {
			let points = vec![PointVectors {
				id: Some(point_id(&id)),
				vectors: Some(vector.to_vec().into()),
				..Default::default()
			}];

			self.client
				.update_vectors(
					UpdatePointVectorsBuilder::new(self.collection.clone(), points).wait(true),
				)
				.await?;
		}

		let payload = payload_map(content, metadata);

		if payload.is_empty() {
			return Ok(());
		}

		self.client
			.set_payload(
				SetPayloadPointsBuilder::new(self.collection.clone(), Payload::from(payload))
					.points_selector(PointsIdsList { ids: vec![point_id(&id)] })
					.wait(true),
			)
			.await?;

		Ok(())
	}

	async fn delete_point(&self, id: Uuid) -> Result<()> {
		self.client
			.delete_points(
				DeletePointsBuilder::new(self.collection.clone())
					.points(PointsIdsList { ids: vec![point_id(&id)] })
					.wait(true),
			)
			.await?;

		Ok(())
	}

	async fn query_points(&self, vector: &[f32], top_k: u32) -> Result<QueryResult> {
		let response = self
			.client
			.query(
				QueryPointsBuilder::new(self.collection.clone())
					.query(Query::new_nearest(vector.to_vec()))
					.limit(top_k as u64)
					.with_payload(true),
			)
			.await?;
		let mut out = QueryResult::default();

		for point in response.result {
			push_scored(&mut out, point);
		}

		Ok(out)
	}
}
impl NoteStore for QdrantStore {
	fn add<'a>(
		&'a self,
		id: Uuid,
		content: &'a str,
		vector: &'a [f32],
		metadata: &'a Metadata,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.add_point(id, content, vector, metadata))
	}

	fn get<'a>(&'a self, ids: Option<&'a [Uuid]>) -> BoxFuture<'a, Result<GetResult>> {
		Box::pin(self.get_points(ids))
	}

	fn update<'a>(
		&'a self,
		id: Uuid,
		content: Option<&'a str>,
		vector: Option<&'a [f32]>,
		metadata: Option<&'a Metadata>,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.update_point(id, content, vector, metadata))
	}

	fn delete<'a>(&'a self, id: Uuid) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.delete_point(id))
	}

	fn query<'a>(&'a self, vector: &'a [f32], top_k: u32) -> BoxFuture<'a, Result<QueryResult>> {
		Box::pin(self.query_points(vector, top_k))
	}
}

fn point_id(id: &Uuid) -> PointId {
	PointId::from(id.to_string())
}

fn payload_map(content: Option<&str>, metadata: Option<&Metadata>) -> HashMap<String, Value> {
	let mut payload = HashMap::new();

	if let Some(metadata) = metadata {
		for (key, value) in metadata {
			payload.insert(key.clone(), Value::from(value.clone()));
		}
	}
	if let Some(content) = content {
		payload.insert(CONTENT_KEY.to_string(), Value::from(content.to_string()));
	}

	payload
}

fn push_retrieved(out: &mut GetResult, point: RetrievedPoint) {
	let Some(id) = point.id.as_ref().and_then(point_id_to_string) else {
		tracing::warn!("Retrieved point missing id.");

		return;
	};
	let (document, metadata) = split_payload(point.payload);

	out.push(id, document, metadata);
}

fn push_scored(out: &mut QueryResult, point: ScoredPoint) {
	let Some(id) = point.id.as_ref().and_then(point_id_to_string) else {
		tracing::warn!("Scored point missing id.");

		return;
	};
	let (document, metadata) = split_payload(point.payload);

	out.ids.push(id);
	out.documents.push(document);
	out.distances.push(point.score);
	out.metadatas.push(metadata);
}

fn point_id_to_string(point_id: &PointId) -> Option<String> {
	match point_id.point_id_options.as_ref()? {
		PointIdOptions::Uuid(id) => Some(id.clone()),
		PointIdOptions::Num(id) => Some(id.to_string()),
	}
}

/// Separates the stored content from the metadata map. A record whose payload
/// holds nothing besides its content has no metadata.
fn split_payload(mut payload: HashMap<String, Value>) -> (String, Option<Metadata>) {
	let document = match payload.remove(CONTENT_KEY).and_then(|value| value.kind) {
		Some(Kind::StringValue(content)) => content,
		_ => String::new(),
	};

	if payload.is_empty() {
		return (document, None);
	}

	let metadata =
		payload.into_iter().map(|(key, value)| (key, value_to_json(value))).collect::<Metadata>();

	(document, Some(metadata))
}

fn value_to_json(value: Value) -> JsonValue {
	match value.kind {
		Some(Kind::StringValue(value)) => JsonValue::String(value),
		Some(Kind::IntegerValue(value)) => JsonValue::from(value),
		Some(Kind::DoubleValue(value)) => JsonValue::from(value),
		Some(Kind::BoolValue(value)) => JsonValue::Bool(value),
		Some(Kind::ListValue(list)) =>
			JsonValue::Array(list.values.into_iter().map(value_to_json).collect()),
		Some(Kind::StructValue(object)) => JsonValue::Object(
			object.fields.into_iter().map(|(key, value)| (key, value_to_json(value))).collect(),
		),
		Some(Kind::NullValue(_)) | None => JsonValue::Null,
	}
}
