use crate::config;
use anyhow::{Context, Result};
use regex::Regex;

pub const UNKNOWN_SCALE: &str = "Unknown";

/// Prioritized regex matcher for declared drawing scales. Patterns are tried
/// in configured order against uppercased page text, so a labeled
/// "SCALE: 1:50" wins over a bare ratio elsewhere on the sheet.
pub struct ScaleDetector {
    patterns: Vec<Regex>,
}

impl ScaleDetector {
    pub fn new(cfg: &config::Scales) -> Result<Self> {
        let patterns = cfg
            .patterns
            .iter()
            .map(|p| Regex::new(p).with_context(|| format!("invalid scale pattern: {p}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Returns the canonical ratio ("1:50") or `UNKNOWN_SCALE`. Whitespace
    /// inside the captured ratio is stripped, so "1 : 50" normalizes to "1:50".
    pub fn detect(&self, text: &str) -> String {
        let upper = text.to_uppercase();
        for re in &self.patterns {
            if let Some(caps) = re.captures(&upper) {
                if let Some(m) = caps.get(1) {
                    return m.as_str().chars().filter(|c| !c.is_whitespace()).collect();
                }
            }
        }
        UNKNOWN_SCALE.to_string()
    }
}

/// True for the sentinel "Unknown" scale, any capitalization.
pub fn is_unknown_scale(scale: &str) -> bool {
    scale.eq_ignore_ascii_case(UNKNOWN_SCALE)
}
