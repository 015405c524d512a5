//! Nutrition-advice flow — targeted food recommendations for symptoms.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::flows::{parse_output, run_completion};
use crate::llm::LlmProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionInput {
    /// The user's current menopause symptoms, human-readable.
    pub symptoms: Vec<String>,
    /// Dietary preferences or restrictions, e.g. "vegetarian, gluten-free".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodRecommendation {
    pub food: String,
    /// Why this food helps with the given symptoms.
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionOutput {
    pub recommendations: Vec<FoodRecommendation>,
    pub general_advice: String,
}

const SYSTEM: &str = "You are a nutrition expert on alleviating menopause symptoms through \
targeted food choices. Reply with only a JSON object.";

fn prompt(input: &NutritionInput) -> String {
    let mut prompt = String::from("A user is experiencing the following symptoms:\n");
    for symptom in &input.symptoms {
        prompt.push_str(&format!("- {symptom}\n"));
    }
    if let Some(prefs) = input.dietary_preferences.as_deref() {
        prompt.push_str(&format!("\nTheir dietary preferences are: {prefs}\n"));
    }
    prompt.push_str(
        "\nRecommend specific foods for these symptoms, each with a brief reason, plus some \
         general dietary advice. Respond with exactly this JSON shape:\n\
         {\"recommendations\": [{\"food\": \"...\", \"reason\": \"...\"}], \
         \"general_advice\": \"...\"}",
    );
    prompt
}

/// Get nutrition advice for the given symptoms.
pub async fn get_nutrition_advice(
    llm: &dyn LlmProvider,
    input: &NutritionInput,
) -> Result<NutritionOutput, FlowError> {
    let raw = run_completion(llm, SYSTEM, prompt(input)).await?;
    parse_output(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedProvider;

    #[test]
    fn prompt_lists_symptoms_and_preferences() {
        let input = NutritionInput {
            symptoms: vec!["hot flashes".into(), "poor sleep".into()],
            dietary_preferences: Some("vegetarian".into()),
        };
        let rendered = prompt(&input);
        assert!(rendered.contains("- hot flashes"));
        assert!(rendered.contains("- poor sleep"));
        assert!(rendered.contains("vegetarian"));
    }

    #[tokio::test]
    async fn parses_recommendations() {
        let provider = ScriptedProvider::new([
            r#"```json
{
  "recommendations": [
    {"food": "flaxseed", "reason": "phytoestrogens may ease hot flashes"}
  ],
  "general_advice": "Stay hydrated and limit caffeine."
}
```"#,
        ]);
        let input = NutritionInput {
            symptoms: vec!["hot flashes".into()],
            dietary_preferences: None,
        };
        let output = get_nutrition_advice(&provider, &input).await.unwrap();
        assert_eq!(output.recommendations.len(), 1);
        assert_eq!(output.recommendations[0].food, "flaxseed");
        assert!(output.general_advice.contains("hydrated"));
    }
}
