//! Personalized recommendations from tracked symptoms.
//!
//! Feeds the daily symptom check-in into the model and gets back article,
//! exercise, and meditation suggestions for the dashboard.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::flows::{parse_output, run_completion};
use crate::llm::LlmProvider;
use crate::profile::SymptomLog;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsInput {
    pub mood: String,
    pub sleep_quality: String,
    pub hot_flashes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_symptoms: Option<String>,
}

impl From<&SymptomLog> for RecommendationsInput {
    fn from(log: &SymptomLog) -> Self {
        Self {
            mood: log.mood.clone(),
            sleep_quality: log.sleep_quality.clone(),
            hot_flashes: log.hot_flashes.clone(),
            other_symptoms: log.other_symptoms.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsOutput {
    pub articles: Vec<String>,
    pub exercises: Vec<String>,
    pub meditations: Vec<String>,
}

const SYSTEM: &str = "You generate personalized wellness recommendations for someone tracking \
menopause symptoms. Reply with only a JSON object.";

fn prompt(input: &RecommendationsInput) -> String {
    format!(
        "Based on the user's tracked symptoms, recommend articles, exercises, and meditations.\n\n\
         Symptoms:\n\
         Mood: {}\n\
         Sleep Quality: {}\n\
         Hot Flashes: {}\n\
         Other Symptoms: {}\n\n\
         Respond with exactly this JSON shape:\n\
         {{\"articles\": [\"...\"], \"exercises\": [\"...\"], \"meditations\": [\"...\"]}}",
        input.mood,
        input.sleep_quality,
        input.hot_flashes,
        input.other_symptoms.as_deref().unwrap_or("none"),
    )
}

/// Generate dashboard recommendations.
pub async fn generate_recommendations(
    llm: &dyn LlmProvider,
    input: &RecommendationsInput,
) -> Result<RecommendationsOutput, FlowError> {
    let raw = run_completion(llm, SYSTEM, prompt(input)).await?;
    parse_output(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedProvider;

    #[test]
    fn input_derives_from_symptom_log() {
        let log = SymptomLog {
            mood: "irritable".into(),
            sleep_quality: "poor".into(),
            hot_flashes: "frequent".into(),
            other_symptoms: None,
        };
        let input = RecommendationsInput::from(&log);
        assert_eq!(input.mood, "irritable");
        assert!(prompt(&input).contains("Other Symptoms: none"));
    }

    #[tokio::test]
    async fn parses_recommendation_lists() {
        let provider = ScriptedProvider::new([
            r#"{"articles": ["Sleep and menopause"], "exercises": ["Evening walk"], "meditations": ["Body scan"]}"#,
        ]);
        let input = RecommendationsInput {
            mood: "low".into(),
            sleep_quality: "poor".into(),
            hot_flashes: "mild".into(),
            other_symptoms: Some("headaches".into()),
        };
        let output = generate_recommendations(&provider, &input).await.unwrap();
        assert_eq!(output.articles, vec!["Sleep and menopause"]);
        assert_eq!(output.exercises.len(), 1);
        assert_eq!(output.meditations.len(), 1);
    }
}
