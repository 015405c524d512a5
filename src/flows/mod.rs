//! Advice flows — thin typed wrappers around the LLM provider.
//!
//! Each flow renders its input into a prompt that demands a single JSON
//! object, runs one completion, and parses the reply into a typed output.
//! Models like to wrap JSON in Markdown fences, so the parser tolerates that;
//! anything else unparseable surfaces as [`FlowError::MalformedOutput`],
//! never a panic.

pub mod journal;
pub mod life_coach;
pub mod nutrition;
pub mod recommendations;
pub mod weather;

use serde::de::DeserializeOwned;

use crate::error::FlowError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// How much of a malformed reply to keep in the error.
const SNIPPET_LEN: usize = 200;

/// Run one completion with the flow defaults.
async fn run_completion(
    llm: &dyn LlmProvider,
    system: &str,
    prompt: String,
) -> Result<String, FlowError> {
    let messages = vec![ChatMessage::system(system), ChatMessage::user(prompt)];
    let request = CompletionRequest::new(messages)
        .with_max_tokens(1024)
        .with_temperature(0.2);
    let response = llm.complete(request).await?;
    Ok(response.content)
}

/// Parse a model reply as JSON, tolerating a surrounding Markdown fence.
fn parse_output<T: DeserializeOwned>(raw: &str) -> Result<T, FlowError> {
    let body = strip_code_fence(raw.trim());
    serde_json::from_str(body).map_err(|_| FlowError::MalformedOutput(snippet(raw)))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the fence line (which may carry a language tag) and the closer.
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.trim_end().trim_end_matches("```").trim()
}

fn snippet(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() <= SNIPPET_LEN {
        trimmed.to_string()
    } else {
        let cut = (0..=SNIPPET_LEN)
            .rev()
            .find(|i| trimmed.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}…", &trimmed[..cut])
    }
}
