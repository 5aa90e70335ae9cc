use crate::catalog::Catalog;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// Confidence reported by the simulated backend.
pub const SIMULATED_CONFIDENCE: f64 = 0.85;

#[derive(Clone, Debug, PartialEq)]
pub struct TranslationResult {
    pub original_text: String,
    pub translated_text: String,
    pub matching_idiom: String,
    pub confidence: f64,
}

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("please enter some text to translate")]
    EmptyInput,
    #[error("network error occurred, please try again")]
    Network,
    #[error("translation failed: {0}")]
    Api(String),
    #[error("this language combination is not supported")]
    UnsupportedLanguage,
    #[error("on-device translation is not available")]
    DeviceNotSupported,
}

/// Placeholder for a real translation backend. Validates the input, then
/// fabricates a translation and suggests a random catalog idiom. Latency
/// simulation is the caller's business.
pub fn simulate_translation(
    text: &str,
    catalog: &Catalog,
    rng: &mut impl Rng,
) -> Result<TranslationResult, TranslationError> {
    if text.trim().is_empty() {
        return Err(TranslationError::EmptyInput);
    }
    let matching_idiom = catalog
        .idioms()
        .choose(rng)
        .map(|idiom| idiom.title.clone())
        .unwrap_or_default();
    Ok(TranslationResult {
        original_text: text.to_string(),
        translated_text: "This is a simulated English translation of your text.".to_string(),
        matching_idiom,
        confidence: SIMULATED_CONFIDENCE,
    })
}
