pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String, field: Option<String> },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Embedding unavailable: {message}")]
	EmbeddingUnavailable { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub(crate) fn invalid_field(field: &str, message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into(), field: Some(field.to_string()) }
	}

	pub(crate) fn note_not_found() -> Self {
		Self::NotFound { message: "Note not found.".to_string() }
	}
}

impl From<semnote_storage::Error> for Error {
	fn from(err: semnote_storage::Error) -> Self {
		match err {
			semnote_storage::Error::NotFound(message) => Self::NotFound { message },
			semnote_storage::Error::InvalidArgument(message) => Self::Storage { message },
			semnote_storage::Error::Qdrant(inner) => Self::Storage { message: inner.to_string() },
		}
	}
}

impl From<semnote_providers::Error> for Error {
	fn from(err: semnote_providers::Error) -> Self {
		match err {
			semnote_providers::Error::EmptyEmbedding =>
				Self::EmbeddingUnavailable { message: err.to_string() },
			other => Self::Provider { message: other.to_string() },
		}
	}
}

impl From<time::error::Format> for Error {
	fn from(err: time::error::Format) -> Self {
		Self::Storage { message: format!("Failed to format timestamp for storage: {err}.") }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_embedding_maps_to_embedding_unavailable() {
		let err = Error::from(semnote_providers::Error::EmptyEmbedding);

		assert!(matches!(err, Error::EmbeddingUnavailable { .. }));
		assert_eq!(
			err.to_string(),
			"Embedding unavailable: No embedding values returned from model."
		);
	}

	#[test]
	fn other_provider_errors_map_to_provider() {
		let err = Error::from(semnote_providers::Error::InvalidResponse {
			message: "Embedding value must be numeric.".to_string(),
		});

		assert!(matches!(err, Error::Provider { .. }));
	}

	#[test]
	fn timestamp_format_failure_is_not_a_client_error() {
		// `Format::InsufficientTypeInformation` is `#[non_exhaustive]`, so obtain it by formatting a
		// date component from a time-only value.
		let format_err = time::macros::time!(0:00)
			.format(&time::format_description::parse("[year]").unwrap())
			.unwrap_err();
		let err = Error::from(format_err);

		assert!(matches!(err, Error::Storage { .. }));
	}

	#[test]
	fn store_errors_keep_raw_message() {
		let err = Error::from(semnote_storage::Error::InvalidArgument("bad vector".to_string()));

		assert!(matches!(err, Error::Storage { ref message } if message == "bad vector"));

		let err = Error::from(semnote_storage::Error::NotFound("gone".to_string()));

		assert!(matches!(err, Error::NotFound { .. }));
	}
}
