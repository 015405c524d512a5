//! Weather-based advice flow.
//!
//! Unlike the JSON flows, the output here is a short free-text tip for the
//! dashboard weather widget, so the model reply is used as-is.

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::flows::run_completion;
use crate::llm::LlmProvider;

/// Current conditions, as reported by whatever weather source the caller uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Temperature in °C.
    pub temp: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
    /// Wind speed in km/h.
    pub wind_speed: f32,
    pub description: String,
    pub location: String,
}

/// Reply language for the advice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceLanguage {
    #[default]
    En,
    Fr,
    Both,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherUserContext {
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default)]
    pub language: AdviceLanguage,
}

const SYSTEM: &str = "You give short, practical wellness tips for people managing menopause \
symptoms, tailored to today's weather. Two or three sentences, no preamble.";

fn prompt(weather: &WeatherSnapshot, context: &WeatherUserContext) -> String {
    let mut prompt = format!(
        "Current weather in {}: {}, {:.0}°C, {:.0}% humidity, wind {:.0} km/h.\n",
        weather.location, weather.description, weather.temp, weather.humidity, weather.wind_speed,
    );
    if !context.symptoms.is_empty() {
        prompt.push_str(&format!(
            "The user is managing these symptoms: {}.\n",
            context.symptoms.join(", ")
        ));
    }
    if let Some(age) = context.age {
        prompt.push_str(&format!("The user is {age} years old.\n"));
    }
    match context.language {
        AdviceLanguage::En => {}
        AdviceLanguage::Fr => prompt.push_str("Answer in French.\n"),
        AdviceLanguage::Both => prompt.push_str("Answer in English, then in French.\n"),
    }
    prompt.push_str("How should they plan their day around this weather?");
    prompt
}

/// Get a weather-tailored advice snippet.
pub async fn get_weather_advice(
    llm: &dyn LlmProvider,
    weather: &WeatherSnapshot,
    context: &WeatherUserContext,
) -> Result<String, FlowError> {
    let raw = run_completion(llm, SYSTEM, prompt(weather, context)).await?;
    Ok(raw.trim().to_string())
}
