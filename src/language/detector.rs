//! `whatlang`-backed classifier

use crate::language::{ClassificationError, LanguageClassifier, LanguageTag};
use whatlang::Detector;

/// Classifier using the trigram models of the `whatlang` crate
pub struct WhatlangClassifier {
    detector: Detector,
}

impl WhatlangClassifier {
    pub fn new() -> Self {
        Self {
            detector: Detector::new(),
        }
    }
}

impl Default for WhatlangClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageClassifier for WhatlangClassifier {
    fn classify(&self, text: &str) -> Result<LanguageTag, ClassificationError> {
        if text.trim().is_empty() {
            return Err(ClassificationError::EmptyText);
        }

        let info = self
            .detector
            .detect(text)
            .ok_or(ClassificationError::Undetermined)?;

        if !info.is_reliable() {
            tracing::trace!(
                "Low confidence ({:.2}) classification as {}",
                info.confidence(),
                info.lang().code()
            );
        }

        Ok(LanguageTag::new(info.lang().code()))
    }
}
