use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::compose::choice::DISABLED_TOKEN;
use crate::config::CONFIG;
use crate::enrich::prompt::{compose_keyword_prompt, resolve_instructions, Descriptor};
use crate::utils::http::get_http_client;
use crate::utils::timing::log_llm_timing;

#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("Ollama is unreachable at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("no models are available in Ollama; pull one first (e.g. `ollama pull llama3`)")]
    NoModelsAvailable,
    #[error("unexpected Ollama response: {0}")]
    Unexpected(String),
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// The tag listing lives at /api/tags, a sibling of the generate endpoint.
fn tags_url(generate_url: &str) -> String {
    generate_url.replace("/api/generate", "/api/tags")
}

/// Removes one wrapping pair of double quotes, then one of single quotes.
/// Local models like to quote the prompt they were asked to produce.
pub fn strip_wrapping_quotes(text: &str) -> &str {
    let mut result = text.trim();
    for quote in ['"', '\''] {
        if result.len() >= 2 && result.starts_with(quote) && result.ends_with(quote) {
            result = &result[1..result.len() - 1];
        }
    }
    result
}

/// Installed model names reported by the Ollama instance.
pub async fn list_models(generate_url: &str) -> Result<Vec<String>, EnrichError> {
    let url = tags_url(generate_url);
    let response = get_http_client()
        .get(&url)
        .timeout(Duration::from_secs(CONFIG.ollama_tags_timeout_seconds))
        .send()
        .await
        .map_err(|err| EnrichError::Unreachable {
            url: url.clone(),
            source: err,
        })?;

    if !response.status().is_success() {
        return Err(EnrichError::Unexpected(format!(
            "model listing returned HTTP {}",
            response.status()
        )));
    }

    let tags: TagsResponse = response.json().await.map_err(|err| {
        EnrichError::Unexpected(format!("invalid model listing payload: {err}"))
    })?;
    Ok(tags.models.into_iter().map(|model| model.name).collect())
}

#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub system_instructions: &'a str,
    pub prompt: &'a str,
    pub seed: u64,
}

/// Sends one non-streaming generate call and extracts the completion text.
pub async fn generate_completion(
    generate_url: &str,
    request: &CompletionRequest<'_>,
) -> Result<String, EnrichError> {
    let payload = json!({
        "model": request.model,
        "system": request.system_instructions,
        "prompt": request.prompt,
        "stream": false,
        "options": { "seed": request.seed },
    });

    let response = get_http_client()
        .post(generate_url)
        .timeout(Duration::from_secs(CONFIG.ollama_timeout_seconds))
        .json(&payload)
        .send()
        .await
        .map_err(|err| EnrichError::Unreachable {
            url: generate_url.to_string(),
            source: err,
        })?;

    if !response.status().is_success() {
        return Err(EnrichError::Unexpected(format!(
            "generation returned HTTP {}",
            response.status()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|err| EnrichError::Unexpected(format!("failed to read generation body: {err}")))?;
    let last_line = body
        .trim()
        .lines()
        .last()
        .ok_or_else(|| EnrichError::Unexpected("empty generation response".to_string()))?;
    let parsed: GenerateResponse = serde_json::from_str(last_line)
        .map_err(|err| EnrichError::Unexpected(format!("invalid generation payload: {err}")))?;

    Ok(strip_wrapping_quotes(&parsed.response).to_string())
}

/// One enhancement request as assembled by the caller. An empty model name
/// (or the "disabled" placeholder) means "use the first installed model".
#[derive(Debug, Clone)]
pub struct EnhanceRequest {
    pub keywords: String,
    pub descriptors: Vec<Descriptor>,
    pub style: String,
    pub custom_instructions: Option<String>,
    pub model: String,
    pub seed: u64,
    pub ollama_url: String,
}

/// Full enrichment pipeline: compose the keyword prompt, pick instruction
/// text, resolve the model, and forward to the enhancement service.
pub async fn enhance_prompt(request: &EnhanceRequest) -> Result<String, EnrichError> {
    let keywords = request.keywords.trim();
    if keywords.is_empty() {
        debug!("No keywords provided; skipping enhancement");
        return Ok(String::new());
    }

    let prompt = compose_keyword_prompt(keywords, &request.descriptors);
    let mut rng = StdRng::seed_from_u64(request.seed);
    let instructions = resolve_instructions(
        &CONFIG.data_dir,
        &request.style,
        request.custom_instructions.as_deref(),
        Some(&mut rng),
    );

    let installed = list_models(&request.ollama_url).await?;
    if installed.is_empty() {
        return Err(EnrichError::NoModelsAvailable);
    }

    let requested_model = request.model.trim();
    let model = if requested_model.is_empty() || requested_model.eq_ignore_ascii_case(DISABLED_TOKEN)
    {
        installed[0].clone()
    } else if installed.iter().any(|name| name == requested_model) {
        requested_model.to_string()
    } else {
        warn!(
            "Model '{}' is not installed; using '{}'",
            requested_model, installed[0]
        );
        installed[0].clone()
    };

    log_llm_timing(
        "ollama",
        &model,
        "enhance_prompt",
        Some(json!({ "style": request.style, "seed": request.seed })),
        || async {
            generate_completion(
                &request.ollama_url,
                &CompletionRequest {
                    model: &model,
                    system_instructions: &instructions,
                    prompt: &prompt,
                    seed: request.seed,
                },
            )
            .await
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_url_is_the_sibling_endpoint() {
        assert_eq!(
            tags_url("http://127.0.0.1:11434/api/generate"),
            "http://127.0.0.1:11434/api/tags"
        );
    }

    #[test]
    fn strips_wrapping_quotes_one_layer_per_kind() {
        assert_eq!(strip_wrapping_quotes("\"a prompt\""), "a prompt");
        assert_eq!(strip_wrapping_quotes("'a prompt'"), "a prompt");
        assert_eq!(strip_wrapping_quotes("\"'nested'\""), "nested");
        assert_eq!(strip_wrapping_quotes("plain"), "plain");
        assert_eq!(strip_wrapping_quotes("\"unbalanced"), "\"unbalanced");
        assert_eq!(strip_wrapping_quotes("\""), "\"");
    }

    #[test]
    fn last_line_payloads_parse() {
        let body = "{\"notlast\":true}\n{\"response\":\"  \\\"final prompt\\\" \"}";
        let last = body.trim().lines().last().unwrap();
        let parsed: GenerateResponse = serde_json::from_str(last).unwrap();
        assert_eq!(strip_wrapping_quotes(&parsed.response), "final prompt");
    }
}
