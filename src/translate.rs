// Translation of canonical emotion codes into display labels

use crate::models::Emotion;
use std::collections::HashMap;

/// Maps canonical emotion codes to the strings drawn on the image.
///
/// The table is built once at construction and never mutated. Codes without
/// an entry pass through unchanged, which keeps the translator total if the
/// classifier vocabulary ever drifts.
pub struct LabelTranslator {
    table: HashMap<&'static str, &'static str>,
}

impl LabelTranslator {
    /// The Spanish display table, one entry per canonical code
    pub fn spanish() -> Self {
        let table = HashMap::from([
            ("angry", "Enojado"),
            ("disgust", "Disgusto"),
            ("fear", "Miedo"),
            ("happy", "Feliz"),
            ("sad", "Triste"),
            ("surprise", "Sorprendido"),
            ("neutral", "Neutral"),
        ]);
        Self { table }
    }

    /// Translates a code into its display label, falling back to the code itself
    pub fn translate<'a>(&'a self, code: &'a str) -> &'a str {
        self.table.get(code).copied().unwrap_or(code)
    }

    /// Display label for a canonical emotion
    pub fn label(&self, emotion: Emotion) -> &str {
        self.translate(emotion.code())
    }
}

impl Default for LabelTranslator {
    fn default() -> Self {
        Self::spanish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_canonical_codes_have_spanish_labels() {
        let translator = LabelTranslator::spanish();
        let expected = [
            (Emotion::Angry, "Enojado"),
            (Emotion::Disgust, "Disgusto"),
            (Emotion::Fear, "Miedo"),
            (Emotion::Happy, "Feliz"),
            (Emotion::Sad, "Triste"),
            (Emotion::Surprise, "Sorprendido"),
            (Emotion::Neutral, "Neutral"),
        ];
        for (emotion, label) in expected {
            assert_eq!(translator.label(emotion), label);
            assert_eq!(translator.translate(emotion.code()), label);
        }
    }

    #[test]
    fn unknown_codes_pass_through_unchanged() {
        let translator = LabelTranslator::default();
        assert_eq!(translator.translate("surprised_xyz"), "surprised_xyz");
        assert_eq!(translator.translate(""), "");
    }
}
