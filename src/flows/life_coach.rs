//! Life-coach chat flow.
//!
//! The coach never gives direct advice — it answers with one open-ended
//! question that nudges the user toward their own conclusion.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::flows::{parse_output, run_completion};
use crate::llm::LlmProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeCoachInput {
    /// What the user shared about their feelings or situation.
    pub user_statement: String,
    /// Recent conversation, oldest first, pre-rendered as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_history: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeCoachOutput {
    /// The coach's reply — always a question.
    pub coach_response: String,
}

const SYSTEM: &str = "You are a life coach supporting users through the emotional side of \
menopause. You never give direct advice; you respond with one powerful, open-ended question \
that promotes reflection and self-discovery. Reply with only a JSON object.";

fn prompt(input: &LifeCoachInput) -> String {
    let mut prompt = String::new();
    if let Some(history) = input.chat_history.as_deref() {
        prompt.push_str("Recent conversation:\n");
        prompt.push_str(history);
        prompt.push_str("\n\n");
    }
    prompt.push_str(&format!("User says: \"{}\"\n\n", input.user_statement));
    prompt.push_str(
        "Ask one thoughtful, open-ended question that helps them explore their feelings and \
         find their own way forward. Respond with exactly this JSON shape:\n\
         {\"coach_response\": \"your question\"}",
    );
    prompt
}

/// Get one coaching response.
pub async fn get_coaching_response(
    llm: &dyn LlmProvider,
    input: &LifeCoachInput,
) -> Result<LifeCoachOutput, FlowError> {
    let raw = run_completion(llm, SYSTEM, prompt(input)).await?;
    parse_output(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedProvider;

    #[test]
    fn prompt_includes_statement_and_history() {
        let input = LifeCoachInput {
            user_statement: "I snapped at my partner again".to_string(),
            chat_history: Some("User: rough week\nAssistant: what made it rough?".to_string()),
        };
        let rendered = prompt(&input);
        assert!(rendered.contains("snapped at my partner"));
        assert!(rendered.contains("rough week"));
        assert!(rendered.contains("coach_response"));
    }

    #[tokio::test]
    async fn parses_coach_reply() {
        let provider =
            ScriptedProvider::new([r#"{"coach_response": "What was happening just before?"}"#]);
        let input = LifeCoachInput {
            user_statement: "I feel overwhelmed".to_string(),
            chat_history: None,
        };
        let output = get_coaching_response(&provider, &input).await.unwrap();
        assert_eq!(output.coach_response, "What was happening just before?");
    }

    #[tokio::test]
    async fn off_script_reply_is_malformed_output() {
        let provider = ScriptedProvider::new(["Take a deep breath."]);
        let input = LifeCoachInput {
            user_statement: "I feel overwhelmed".to_string(),
            chat_history: None,
        };
        let err = get_coaching_response(&provider, &input).await.unwrap_err();
        assert!(matches!(err, FlowError::MalformedOutput(_)));
    }
}
