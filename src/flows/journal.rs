//! Journal-analysis flow.
//!
//! Takes a free-text daily journal entry and extracts the emotions,
//! menopause-related challenges, and foods it mentions.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::flows::{parse_output, run_completion};
use crate::llm::LlmProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalInput {
    /// The user's daily journal entry — food, feelings, challenges.
    pub journal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalAnalysis {
    /// Key emotions expressed in the entry.
    pub emotions: Vec<String>,
    /// Menopause-related difficulties mentioned.
    pub challenges: Vec<String>,
    /// Foods the user said they consumed.
    pub food_eaten: Vec<String>,
}

const SYSTEM: &str = "You are an empathetic assistant helping women navigate menopause by \
listening to their daily experiences. Reply with only a JSON object.";

fn prompt(input: &JournalInput) -> String {
    format!(
        "From the following journal entry, extract:\n\
         1. Emotions — the key feelings the user expressed.\n\
         2. Challenges — menopause-related difficulties they mentioned.\n\
         3. Food eaten — every food item they said they consumed.\n\n\
         Journal Entry:\n{}\n\n\
         Respond with exactly this JSON shape:\n\
         {{\"emotions\": [\"...\"], \"challenges\": [\"...\"], \"food_eaten\": [\"...\"]}}",
        input.journal
    )
}

/// Analyze one journal entry.
pub async fn analyze_journal(
    llm: &dyn LlmProvider,
    input: &JournalInput,
) -> Result<JournalAnalysis, FlowError> {
    let raw = run_completion(llm, SYSTEM, prompt(input)).await?;
    parse_output(&raw)
}
