//! Language rule and the default script-counting detector.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use super::{Candidate, Rule};
use crate::error::DetectionError;
use crate::models::config::LanguageConfig;

/// Detects the dominant language of a text sample.
pub trait LanguageDetector: Send + Sync {
    /// Returns an ISO 639-1 code such as `en` or `hi`.
    fn detect(&self, text: &str) -> Result<String, DetectionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Devanagari,
    Bengali,
    Gurmukhi,
    Gujarati,
    Oriya,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Cyrillic,
    Arabic,
    Latin,
}

impl Script {
    const ALL: [Script; 12] = [
        Script::Devanagari,
        Script::Bengali,
        Script::Gurmukhi,
        Script::Gujarati,
        Script::Oriya,
        Script::Tamil,
        Script::Telugu,
        Script::Kannada,
        Script::Malayalam,
        Script::Cyrillic,
        Script::Arabic,
        Script::Latin,
    ];

    fn of(c: char) -> Option<Script> {
        if !c.is_alphabetic() {
            return None;
        }
        let script = match c as u32 {
            0x0900..=0x097F => Script::Devanagari,
            0x0980..=0x09FF => Script::Bengali,
            0x0A00..=0x0A7F => Script::Gurmukhi,
            0x0A80..=0x0AFF => Script::Gujarati,
            0x0B00..=0x0B7F => Script::Oriya,
            0x0B80..=0x0BFF => Script::Tamil,
            0x0C00..=0x0C7F => Script::Telugu,
            0x0C80..=0x0CFF => Script::Kannada,
            0x0D00..=0x0D7F => Script::Malayalam,
            0x0400..=0x04FF => Script::Cyrillic,
            0x0600..=0x06FF => Script::Arabic,
            0x0041..=0x005A | 0x0061..=0x007A | 0x00C0..=0x024F => Script::Latin,
            _ => return None,
        };
        Some(script)
    }

    fn code(self) -> &'static str {
        match self {
            Script::Devanagari => "hi",
            Script::Bengali => "bn",
            Script::Gurmukhi => "pa",
            Script::Gujarati => "gu",
            Script::Oriya => "or",
            Script::Tamil => "ta",
            Script::Telugu => "te",
            Script::Kannada => "kn",
            Script::Malayalam => "ml",
            Script::Cyrillic => "ru",
            Script::Arabic => "ar",
            Script::Latin => "en",
        }
    }
}

/// Guesses the language from the script with the most letters.
///
/// Latin text is reported as English and Cyrillic as Russian; the detector
/// does not tell apart languages that share a script.
#[derive(Debug, Clone)]
pub struct ScriptDetector {
    sample_chars: usize,
    min_letters: usize,
}

impl ScriptDetector {
    pub fn new(config: &LanguageConfig) -> Self {
        Self {
            sample_chars: config.sample_chars,
            min_letters: config.min_script_letters,
        }
    }
}

impl Default for ScriptDetector {
    fn default() -> Self {
        Self::new(&LanguageConfig::default())
    }
}

impl LanguageDetector for ScriptDetector {
    fn detect(&self, text: &str) -> Result<String, DetectionError> {
        let mut counts = [0usize; Script::ALL.len()];
        for c in text.chars().take(self.sample_chars) {
            if let Some(script) = Script::of(c) {
                counts[script as usize] += 1;
            }
        }

        // Ties go to the script listed first.
        let (best, letters) = counts
            .iter()
            .enumerate()
            .fold((0, 0), |best, (i, &n)| if n > best.1 { (i, n) } else { best });

        if letters < self.min_letters {
            return Err(DetectionError::InsufficientEvidence(letters));
        }

        Ok(Script::ALL[best].code().to_string())
    }
}

/// Display name for an ISO 639-1 code; unmapped codes are returned as is.
pub fn display_name(code: &str) -> String {
    let name = match code {
        "hi" => "Hindi",
        "bn" => "Bengali",
        "pa" => "Punjabi",
        "gu" => "Gujarati",
        "or" => "Odia",
        "ta" => "Tamil",
        "te" => "Telugu",
        "kn" => "Kannada",
        "ml" => "Malayalam",
        "mr" => "Marathi",
        "ur" => "Urdu",
        "ru" => "Russian",
        "ar" => "Arabic",
        "en" => "English",
        "fr" => "French",
        "de" => "German",
        "es" => "Spanish",
        "it" => "Italian",
        "pt" => "Portuguese",
        other => other,
    };
    name.to_string()
}

/// Resolve the language of the first `config.max_pages` pages.
///
/// Short samples are not sent to the detector. Detector errors and panics
/// both resolve to `None`.
pub fn resolve_language(
    detector: &dyn LanguageDetector,
    config: &LanguageConfig,
    pages: &[String],
) -> Option<Candidate<String>> {
    let sample = pages
        .iter()
        .take(config.max_pages)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    let len = sample.trim().chars().count();
    if len < config.min_text_len {
        debug!("Language sample too short ({} chars), skipping detection", len);
        return None;
    }

    match panic::catch_unwind(AssertUnwindSafe(|| detector.detect(&sample))) {
        Ok(Ok(code)) => Some(Candidate::new(display_name(code.trim()), Rule::DetectedLanguage)),
        Ok(Err(e)) => {
            debug!("Language detection gave no answer: {}", e);
            None
        }
        Err(_) => {
            warn!("Language detector panicked");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingDetector {
        calls: AtomicUsize,
    }

    impl LanguageDetector for CountingDetector {
        fn detect(&self, _text: &str) -> Result<String, DetectionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("fr".to_string())
        }
    }

    struct FailingDetector;

    impl LanguageDetector for FailingDetector {
        fn detect(&self, _text: &str) -> Result<String, DetectionError> {
            Err(DetectionError::Backend("model missing".to_string()))
        }
    }

    struct PanickingDetector;

    impl LanguageDetector for PanickingDetector {
        fn detect(&self, _text: &str) -> Result<String, DetectionError> {
            panic!("detector bug")
        }
    }

    fn pages(text: &str) -> Vec<String> {
        vec![text.to_string()]
    }

    const ENGLISH: &str = "The quick brown fox jumps over the lazy dog near the river bank.";

    #[test]
    fn test_short_text_is_not_detected() {
        let detector = CountingDetector {
            calls: AtomicUsize::new(0),
        };
        let language = resolve_language(&detector, &LanguageConfig::default(), &pages("Three word line"));

        assert!(language.is_none());
        assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_detector_code_is_displayed() {
        let detector = CountingDetector {
            calls: AtomicUsize::new(0),
        };
        let language = resolve_language(&detector, &LanguageConfig::default(), &pages(ENGLISH)).unwrap();

        assert_eq!(language.value, "French");
        assert_eq!(language.rule, Rule::DetectedLanguage);
        assert_eq!(detector.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_detector_failures_are_unknown() {
        let config = LanguageConfig::default();
        assert!(resolve_language(&FailingDetector, &config, &pages(ENGLISH)).is_none());
        assert!(resolve_language(&PanickingDetector, &config, &pages(ENGLISH)).is_none());
    }

    #[test]
    fn test_page_cap() {
        let config = LanguageConfig {
            max_pages: 2,
            ..LanguageConfig::default()
        };
        let mut pages = vec![String::new(), String::new()];
        pages.push(ENGLISH.to_string());

        assert!(resolve_language(&ScriptDetector::default(), &config, &pages).is_none());
    }

    #[test]
    fn test_script_detector() {
        let detector = ScriptDetector::default();

        assert_eq!(detector.detect(ENGLISH).unwrap(), "en");
        assert_eq!(
            detector.detect("भारत का संविधान, भारत का सर्वोच्च विधान है जो संविधान सभा द्वारा पारित हुआ").unwrap(),
            "hi"
        );
        assert_eq!(
            detector.detect("Война и мир, роман-эпопея Льва Николаевича Толстого").unwrap(),
            "ru"
        );
        assert!(matches!(
            detector.detect("12345 67890 !!! ---- abc"),
            Err(DetectionError::InsufficientEvidence(3))
        ));
    }

    #[test]
    fn test_script_detector_end_to_end() {
        let text = "भारत का संविधान, भारत का सर्वोच्च विधान है जो संविधान सभा द्वारा पारित हुआ";
        let language = resolve_language(&ScriptDetector::default(), &LanguageConfig::default(), &pages(text)).unwrap();
        assert_eq!(language.value, "Hindi");
    }

    #[test]
    fn test_display_name_passthrough() {
        assert_eq!(display_name("ta"), "Tamil");
        assert_eq!(display_name("sw"), "sw");
    }
}
