use std::time::Duration;

use reqwest::{Client, header::HeaderMap};
use serde_json::Value;

use crate::{Error, Result};
use semnote_config::EmbeddingProviderConfig;

/// Request/response shape spoken by an embedding endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
	/// `POST /embeddings` with `{ model, input, dimensions }`, answering `data[].embedding`.
	OpenAi,
	/// `POST /models/{model}:embedContent`, answering `embedding.values`.
	Gemini,
}
impl Dialect {
	pub fn for_provider(provider_id: &str) -> Self {
		if provider_id.trim().eq_ignore_ascii_case("gemini") { Self::Gemini } else { Self::OpenAi }
	}
}

/// Embeds a single text. Exactly one upstream request, no retry.
pub async fn embed(cfg: &EmbeddingProviderConfig, text: &str) -> Result<Vec<f32>> {
	let dialect = Dialect::for_provider(&cfg.provider_id);
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let res = client
		.post(url)
		.headers(request_headers(dialect, cfg)?)
		.json(&request_body(dialect, cfg, text))
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;
	let vector = parse_embedding_response(dialect, &json)?;

	tracing::debug!(
		provider_id = %cfg.provider_id,
		model = %cfg.model,
		dimensions = vector.len(),
		"Embedding generated."
	);

	Ok(vector)
}

fn request_headers(dialect: Dialect, cfg: &EmbeddingProviderConfig) -> Result<HeaderMap> {
	match dialect {
		Dialect::OpenAi => crate::auth_headers(&cfg.api_key, &cfg.default_headers),
		Dialect::Gemini => crate::api_key_headers(
			crate::GEMINI_API_KEY_HEADER,
			&cfg.api_key,
			&cfg.default_headers,
		),
	}
}

fn request_body(dialect: Dialect, cfg: &EmbeddingProviderConfig, text: &str) -> Value {
	match dialect {
		Dialect::OpenAi => serde_json::json!({
			"model": cfg.model,
			"input": [text],
			"dimensions": cfg.dimensions,
		}),
		Dialect::Gemini => serde_json::json!({
			"model": cfg.model,
			"content": { "parts": [{ "text": text }] },
			"outputDimensionality": cfg.dimensions,
		}),
	}
}

fn parse_embedding_response(dialect: Dialect, json: &Value) -> Result<Vec<f32>> {
	let values = match dialect {
		Dialect::OpenAi => json
			.get("data")
			.and_then(Value::as_array)
			.and_then(|data| {
				data.iter()
					.find(|item| item.get("index").and_then(Value::as_u64).unwrap_or(0) == 0)
			})
			.and_then(|item| item.get("embedding")),
		Dialect::Gemini => json
			.get("embedding")
			.or_else(|| json.get("embeddings").and_then(|items| items.get(0)))
			.and_then(|embedding| embedding.get("values")),
	};
	let Some(values) = values.and_then(Value::as_array) else {
		return Err(Error::EmptyEmbedding);
	};

	if values.is_empty() {
		return Err(Error::EmptyEmbedding);
	}

	let mut vec = Vec::with_capacity(values.len());

	for value in values {
		let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
			message: "Embedding value must be numeric.".to_string(),
		})?;

		vec.push(number as f32);
	}

	Ok(vec)
}
