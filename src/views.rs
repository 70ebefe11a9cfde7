use crate::config;
use serde::{Deserialize, Serialize};

/// Semantic category of an engineering-drawing page. The automatic classifier
/// only ever emits Plan, Section, Elevation, or Unknown; the remaining
/// variants exist as manual-correction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ViewType {
    #[serde(rename = "PLAN")]
    Plan,
    #[serde(rename = "SECTION")]
    Section,
    #[serde(rename = "ELEVATION")]
    Elevation,
    #[serde(rename = "DETAIL")]
    Detail,
    #[serde(rename = "COVER_PAGE")]
    CoverPage,
    #[serde(rename = "STRUCTURAL_NOTE_PAGE")]
    StructuralNotePage,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl ViewType {
    /// Upper-case wire name, as it appears in the index and CSV exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Plan => "PLAN",
            ViewType::Section => "SECTION",
            ViewType::Elevation => "ELEVATION",
            ViewType::Detail => "DETAIL",
            ViewType::CoverPage => "COVER_PAGE",
            ViewType::StructuralNotePage => "STRUCTURAL_NOTE_PAGE",
            ViewType::Unknown => "UNKNOWN",
        }
    }

    /// Human title used by the drawing register ("Plan Drawing", ...).
    pub fn label(&self) -> &'static str {
        match self {
            ViewType::Plan => "Plan",
            ViewType::Section => "Section",
            ViewType::Elevation => "Elevation",
            ViewType::Detail => "Detail",
            ViewType::CoverPage => "Cover Page",
            ViewType::StructuralNotePage => "Structural Note Page",
            ViewType::Unknown => "Unknown",
        }
    }

    /// Lower-case file label for split outputs (`plan.pdf`, ...).
    pub fn file_label(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }

    /// Parses engineer-facing spellings: case-insensitive, spaces or
    /// underscores ("COVER PAGE" and "cover_page" both work).
    pub fn parse(raw: &str) -> Option<ViewType> {
        let norm = raw.trim().to_ascii_uppercase().replace(' ', "_");
        match norm.as_str() {
            "PLAN" => Some(ViewType::Plan),
            "SECTION" => Some(ViewType::Section),
            "ELEVATION" => Some(ViewType::Elevation),
            "DETAIL" => Some(ViewType::Detail),
            "COVER_PAGE" => Some(ViewType::CoverPage),
            "STRUCTURAL_NOTE_PAGE" => Some(ViewType::StructuralNotePage),
            "UNKNOWN" => Some(ViewType::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for ViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewClass {
    pub view_type: ViewType,
    pub text_snippet: String,
}

/// Keyword classifier over one page's text. Case-insensitive substring match,
/// plan keywords first, then section, then elevation; no match -> Unknown.
/// Never fails: empty or unreadable text classifies to Unknown.
pub fn classify_text(cfg: &config::Views, text: &str) -> ViewClass {
    let lower = text.to_lowercase();

    let contains = |keywords: &[String]| keywords.iter().any(|k| lower.contains(k.as_str()));

    let view_type = if contains(&cfg.plan_keywords) {
        ViewType::Plan
    } else if contains(&cfg.section_keywords) {
        ViewType::Section
    } else if contains(&cfg.elevation_keywords) {
        ViewType::Elevation
    } else {
        ViewType::Unknown
    };

    let text_snippet: String = lower.chars().take(cfg.snippet_chars).collect();

    ViewClass {
        view_type,
        text_snippet,
    }
}
