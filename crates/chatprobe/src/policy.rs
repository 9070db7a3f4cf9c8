//! Heuristic policy: the phrase patterns, identifiers, and thresholds the
//! batteries rely on.
//!
//! Everything a page-specific tweak might touch lives here rather than in the
//! traversal code. [`PolicyConfig`] is the serializable form (YAML on disk);
//! [`Policy`] is the compiled form the batteries use.

use std::path::Path;
use std::time::Duration;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::result::{ProbeError, ProbeResult};

/// Viewport widths below this are checked for a stacked single-column layout
pub const DEFAULT_MOBILE_BREAKPOINT: f32 = 768.0;

/// Upper bound on product cards per answer
pub const DEFAULT_MAX_CARDS: usize = 5;

/// Upper bound on description length, in characters
pub const DEFAULT_MAX_DESCRIPTION_CHARS: usize = 120;

/// Description lines shorter than this are only used as a fallback
pub const DEFAULT_MIN_DESCRIPTION_CHARS: usize = 12;

/// Delay between the Enter dispatch and the re-check
pub const DEFAULT_PROBE_DELAY_MS: u64 = 300;

/// Text typed into the input by the Enter probe
pub const DEFAULT_PROBE_TEXT: &str = "QA test";

/// How the desktop layout check counts columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnDetection {
    /// Count grid tracks when the card container is a grid, else distinct
    /// card offsets
    #[default]
    GridThenOffsets,
    /// Always count distinct card offsets
    Offsets,
}

/// Serializable policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Text of the link that opens a product
    pub view_link_pattern: String,
    /// Text of the button that adds a product to the cart
    pub add_button_pattern: String,
    /// Label or text of a send control
    pub send_pattern: String,
    /// Price token: optional currency prefix, then a decimal number
    pub price_pattern: String,
    /// `id` of the chat container
    pub chat_container_id: String,
    /// Class of the floating launcher button
    pub launcher_class: String,
    /// `id` of the floating panel
    pub panel_id: String,
    /// Location path fragment that marks the chat surface
    pub chat_path_indicator: String,
    /// Maximum cards per answer
    pub max_cards: usize,
    /// Maximum description length
    pub max_description_chars: usize,
    /// Preferred minimum description length
    pub min_description_chars: usize,
    /// Mobile/desktop breakpoint in CSS pixels
    pub mobile_breakpoint: f32,
    /// Column counting strategy
    pub column_detection: ColumnDetection,
    /// Text typed by the Enter probe
    pub probe_text: String,
    /// Enter probe re-check delay in milliseconds
    pub probe_delay_ms: u64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            view_link_pattern: "view product".to_string(),
            add_button_pattern: "add to cart".to_string(),
            send_pattern: "send|ask|submit".to_string(),
            price_pattern: r"(?:[$€£¥]\s*)?[0-9]+(?:\.[0-9]+)?".to_string(),
            chat_container_id: "chatbox".to_string(),
            launcher_class: "floating-chatbot__btn".to_string(),
            panel_id: "floating-chatbot-panel".to_string(),
            chat_path_indicator: "/chatbot".to_string(),
            max_cards: DEFAULT_MAX_CARDS,
            max_description_chars: DEFAULT_MAX_DESCRIPTION_CHARS,
            min_description_chars: DEFAULT_MIN_DESCRIPTION_CHARS,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            column_detection: ColumnDetection::default(),
            probe_text: DEFAULT_PROBE_TEXT.to_string(),
            probe_delay_ms: DEFAULT_PROBE_DELAY_MS,
        }
    }
}

impl PolicyConfig {
    /// Parse a YAML policy; missing keys keep their defaults
    pub fn from_yaml(source: &str) -> ProbeResult<Self> {
        Ok(serde_yaml_ng::from_str(source)?)
    }

    /// Load a YAML policy file
    pub fn load(path: &Path) -> ProbeResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml(&source)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> ProbeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Compile the patterns
    pub fn compile(self) -> ProbeResult<Policy> {
        Ok(Policy {
            view_link: phrase("view_link_pattern", &self.view_link_pattern)?,
            add_button: phrase("add_button_pattern", &self.add_button_pattern)?,
            send: phrase("send_pattern", &self.send_pattern)?,
            price: phrase("price_pattern", &self.price_pattern)?,
            config: self,
        })
    }
}

fn phrase(field: &str, pattern: &str) -> ProbeResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ProbeError::invalid_pattern(field, e.to_string()))
}

/// Compiled policy
#[derive(Debug, Clone)]
pub struct Policy {
    /// Matches the view-product link text
    pub view_link: Regex,
    /// Matches the add-to-cart button text
    pub add_button: Regex,
    /// Matches send control labels
    pub send: Regex,
    /// Finds the price token
    pub price: Regex,
    /// Source configuration
    pub config: PolicyConfig,
}

impl Default for Policy {
    fn default() -> Self {
        // The built-in patterns are fixed literals.
        PolicyConfig::default()
            .compile()
            .expect("default policy patterns compile")
    }
}

impl Policy {
    /// Delay before the Enter probe re-checks the input
    #[must_use]
    pub fn probe_delay(&self) -> Duration {
        Duration::from_millis(self.config.probe_delay_ms)
    }

    /// Whether a line names one of the card actions
    #[must_use]
    pub fn is_action_text(&self, text: &str) -> bool {
        self.view_link.is_match(text) || self.add_button.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns_are_case_insensitive() {
        let policy = Policy::default();
        assert!(policy.view_link.is_match("VIEW PRODUCT"));
        assert!(policy.add_button.is_match("Add To Cart"));
        assert!(policy.send.is_match("Ask the assistant"));
        assert!(!policy.send.is_match("Cancel"));
    }

    #[test]
    fn test_price_pattern_matches_currency() {
        let policy = Policy::default();
        let found = policy.price.find("only $ 19.99 today").unwrap();
        assert_eq!(found.as_str(), "$ 19.99");
        assert_eq!(policy.price.find("€5").unwrap().as_str(), "€5");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = PolicyConfig::from_yaml("max_cards: 8\nmobile_breakpoint: 600\n").unwrap();
        assert_eq!(config.max_cards, 8);
        assert!((config.mobile_breakpoint - 600.0).abs() < f32::EPSILON);
        assert_eq!(config.view_link_pattern, "view product");
        assert_eq!(config.probe_delay_ms, DEFAULT_PROBE_DELAY_MS);
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = PolicyConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("chat_container_id: chatbox"));
        assert_eq!(PolicyConfig::from_yaml(&yaml).unwrap(), PolicyConfig::default());
    }

    #[test]
    fn test_column_detection_kebab_case() {
        let config = PolicyConfig::from_yaml("column_detection: offsets\n").unwrap();
        assert_eq!(config.column_detection, ColumnDetection::Offsets);
    }

    #[test]
    fn test_bad_pattern_names_field() {
        let config = PolicyConfig {
            send_pattern: "(send".to_string(),
            ..PolicyConfig::default()
        };
        let err = config.compile().unwrap_err();
        assert!(err.to_string().contains("send_pattern"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("policy.yaml");
        std::fs::write(&path, "panel_id: chat-panel\nprobe_delay_ms: 50\n").unwrap();
        let config = PolicyConfig::load(&path).unwrap();
        assert_eq!(config.panel_id, "chat-panel");
        assert_eq!(config.compile().unwrap().probe_delay(), Duration::from_millis(50));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = PolicyConfig::load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ProbeError::Io(_)));
    }

    #[test]
    fn test_probe_delay() {
        assert_eq!(Policy::default().probe_delay(), Duration::from_millis(300));
    }
}
