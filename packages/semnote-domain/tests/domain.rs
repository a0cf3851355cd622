use serde_json::{Map, Value, json};
use time::{Duration, OffsetDateTime, macros::datetime};
use uuid::Uuid;

use semnote_domain::{Note, NoteUpdate, datetime, merge, normalize, requires_embedding};

fn meta(value: Value) -> Option<Map<String, Value>> {
	match value {
		Value::Object(map) => Some(map),
		_ => None,
	}
}

fn created(content: &str, embedding: Vec<f32>) -> Note {
	Note::new(
		Uuid::new_v4().to_string(),
		"T".to_string(),
		content.to_string(),
		embedding,
		datetime!(2024-05-01 9:00 UTC),
	)
}

/// Stand-in for the embedding provider: length-prefixed byte histogram.
fn fake_embed(text: &str) -> Vec<f32> {
	let mut vec = vec![0.0; 4];

	for (i, byte) in text.bytes().enumerate() {
		vec[i % 4] += byte as f32;
	}

	vec
}

fn apply(note: Note, update: NoteUpdate, now: OffsetDateTime) -> Note {
	let embedding = requires_embedding(&update)
		.then(|| fake_embed(update.content.as_deref().unwrap_or_default()));

	merge(note, update, embedding, now)
}

#[test]
fn new_note_has_equal_timestamps() {
	let note = created("hello", fake_embed("hello"));

	assert_eq!(note.title, "T");
	assert_eq!(note.content, "hello");
	assert!(note.created_at.is_some());
	assert_eq!(note.created_at, note.updated_at);
}

#[test]
fn absent_content_keeps_embedding() {
	let note = created("hello", fake_embed("hello"));
	let before = note.embedding.clone();
	let update = NoteUpdate { title: Some("Renamed".to_string()), content: None };
	let merged = apply(note, update, datetime!(2024-05-02 9:00 UTC));

	assert_eq!(merged.embedding, before);
	assert_eq!(merged.content, "hello");
	assert_eq!(merged.title, "Renamed");
}

#[test]
fn new_content_replaces_embedding() {
	let note = created("hello", fake_embed("hello"));
	let update = NoteUpdate { title: None, content: Some("goodbye world".to_string()) };
	let merged = apply(note, update, datetime!(2024-05-02 9:00 UTC));

	assert_eq!(merged.content, "goodbye world");
	assert_eq!(merged.embedding, Some(fake_embed("goodbye world")));
	assert_ne!(merged.embedding, Some(fake_embed("hello")));
	assert_eq!(merged.title, "T");
}

#[test]
fn timestamps_across_update_sequence() {
	let mut note = created("v0", fake_embed("v0"));
	let created_at = note.created_at;
	let mut now = datetime!(2024-05-01 9:00 UTC);

	for (step, update) in [
		NoteUpdate { title: Some("a".to_string()), content: None },
		NoteUpdate { title: None, content: Some("v1".to_string()) },
		NoteUpdate { title: None, content: Some(" ".to_string()) },
		NoteUpdate::default(),
	]
	.into_iter()
	.enumerate()
	{
		let previous = note.updated_at;

		now += Duration::seconds(step as i64);
		note = apply(note, update, now);

		assert_eq!(note.created_at, created_at);
		assert!(note.updated_at >= previous);
	}

	assert_eq!(note.content, " ");
	assert_eq!(note.embedding, Some(fake_embed("v1")));
}

#[test]
fn stored_record_roundtrip_through_metadata() {
	let note = created("hello", fake_embed("hello"));
	let metadata = note.metadata().expect("Failed to build metadata.");
	let restored = Note::from_stored(note.id.clone(), note.content.clone(), Some(&metadata));

	assert_eq!(restored.title, note.title);
	assert_eq!(restored.created_at, note.created_at);
	assert_eq!(restored.updated_at, note.updated_at);
	assert_eq!(restored.embedding, None);
}

#[test]
fn stored_record_tolerates_missing_and_bad_metadata() {
	let bad = meta(json!({ "created_at": "yesterday", "updated_at": 17 }));
	let note = Note::from_stored("id".to_string(), "c".to_string(), bad.as_ref());

	assert_eq!(note.title, "");
	assert_eq!(note.created_at, None);
	assert_eq!(note.updated_at, None);

	let bare = Note::from_stored("id".to_string(), "c".to_string(), None);

	assert_eq!(bare.title, "");
}

#[test]
fn datetime_parse_examples() {
	assert!(datetime::parse(&json!("2024-01-01T00:00:00")).is_some());
	assert!(datetime::parse(&json!("not-a-date")).is_none());
	assert!(datetime::parse(&json!(123)).is_none());
}

#[test]
fn normalize_keeps_input_order() {
	let results = normalize(
		vec!["c".to_string(), "a".to_string(), "b".to_string()],
		vec!["third".to_string(), "first".to_string(), "second".to_string()],
		vec![0.2, 0.9, 0.5],
		vec![
			meta(json!({ "title": "C", "created_at": "2024-01-01T00:00:00" })),
			None,
			meta(json!({ "title": "B", "updated_at": "garbage" })),
		],
	);

	assert_eq!(results.len(), 3);
	assert_eq!(
		results.iter().map(|result| result.id.as_str()).collect::<Vec<_>>(),
		["c", "a", "b"],
	);
	assert_eq!(results.iter().map(|result| result.score).collect::<Vec<_>>(), [0.2, 0.9, 0.5]);
	assert_eq!(results[1].metadata, None);

	let first = results[0].metadata.as_ref().expect("Expected metadata.");

	assert_eq!(first.title, "C");
	assert_eq!(first.created_at, Some(datetime!(2024-01-01 0:00 UTC)));
	assert_eq!(first.updated_at, None);

	let third = results[2].metadata.as_ref().expect("Expected metadata.");

	assert_eq!(third.title, "B");
	assert_eq!(third.updated_at, None);
}

#[test]
fn normalize_truncates_misaligned_columns() {
	let results = normalize(
		vec!["a".to_string(), "b".to_string(), "c".to_string()],
		vec!["x".to_string(), "y".to_string()],
		vec![0.1, 0.2, 0.3],
		vec![None, None, None],
	);

	assert_eq!(results.len(), 2);
	assert_eq!(results[1].id, "b");
	assert_eq!(results[1].content, "y");
}

#[test]
fn normalize_empty_query() {
	assert!(normalize(Vec::new(), Vec::new(), Vec::new(), Vec::new()).is_empty());
}

#[test]
fn search_result_serializes_timestamps_as_rfc3339() {
	let results = normalize(
		vec!["a".to_string()],
		vec!["x".to_string()],
		vec![0.5],
		vec![meta(json!({ "title": "A", "created_at": "2024-01-01T00:00:00" }))],
	);
	let json = serde_json::to_value(&results[0]).expect("Failed to serialize result.");

	assert_eq!(json["metadata"]["created_at"], "2024-01-01T00:00:00Z");
	assert_eq!(json["metadata"]["updated_at"], Value::Null);
	assert!(json.get("embedding").is_none());
}
