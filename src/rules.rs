use crate::index::IndexRow;
use crate::views::ViewType;
use serde::{Deserialize, Serialize};

/// Project-type validation template: which views a set must contain, which
/// scales each view may declare, and the confidence floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleTemplate {
    pub required_views: Vec<ViewType>,
    pub allowed_scales: Vec<(ViewType, Vec<String>)>,
    pub min_confidence: f64,
}

impl RuleTemplate {
    fn allowed_for(&self, vt: ViewType) -> Option<&[String]> {
        self.allowed_scales
            .iter()
            .find(|(v, _)| *v == vt)
            .map(|(_, scales)| scales.as_slice())
    }
}

/// Fixed template table, looked up by upper-cased project type.
pub fn template_for(project_type: &str) -> Option<RuleTemplate> {
    let scales = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    match project_type.to_ascii_uppercase().as_str() {
        "STRUCTURAL" => Some(RuleTemplate {
            required_views: vec![ViewType::Plan, ViewType::Section, ViewType::Elevation],
            allowed_scales: vec![
                (ViewType::Plan, scales(&["1:100", "1:50"])),
                (ViewType::Section, scales(&["1:50", "1:25"])),
                (ViewType::Elevation, scales(&["1:100", "1:50"])),
            ],
            min_confidence: 0.6,
        }),
        "ARCHITECTURAL" => Some(RuleTemplate {
            required_views: vec![ViewType::Plan, ViewType::Elevation],
            allowed_scales: vec![
                (ViewType::Plan, scales(&["1:100"])),
                (ViewType::Elevation, scales(&["1:100"])),
            ],
            min_confidence: 0.5,
        }),
        "FOUNDATION" => Some(RuleTemplate {
            required_views: vec![ViewType::Plan, ViewType::Section],
            allowed_scales: vec![
                (ViewType::Plan, scales(&["1:50", "1:25"])),
                (ViewType::Section, scales(&["1:25", "1:20"])),
            ],
            min_confidence: 0.65,
        }),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleStatus {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
    #[serde(rename = "UNKNOWN_PROJECT_TYPE")]
    UnknownProjectType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleVerdict {
    pub status: RuleStatus,
    pub issues: Vec<String>,
}

/// Validates an index against the named project type's template. An unknown
/// project type is a verdict, not an error. Only rows that carry a confidence
/// are checked against the floor; scoreless rows are the QA aggregator's
/// concern.
pub fn apply_rules(rows: &[IndexRow], project_type: &str) -> RuleVerdict {
    let Some(template) = template_for(project_type) else {
        return RuleVerdict {
            status: RuleStatus::UnknownProjectType,
            issues: vec![format!("No rules defined for {project_type}")],
        };
    };

    let mut issues = Vec::new();

    let present: Vec<ViewType> = rows.iter().map(|r| r.view_type).collect();
    for rv in &template.required_views {
        if !present.contains(rv) {
            issues.push(format!("Missing required view: {rv}"));
        }
    }

    for row in rows {
        let page = fmt_page(row.page);

        if let Some(allowed) = template.allowed_for(row.view_type) {
            if !allowed.iter().any(|s| s == &row.scale) {
                issues.push(format!(
                    "Invalid scale on page {page} for {}: {}",
                    row.view_type, row.scale
                ));
            }
        }

        if let Some(conf) = row.confidence {
            if conf < template.min_confidence {
                issues.push(format!("Low confidence on page {page} ({})", row.view_type));
            }
        }
    }

    RuleVerdict {
        status: if issues.is_empty() {
            RuleStatus::Pass
        } else {
            RuleStatus::Fail
        },
        issues,
    }
}

fn fmt_page(page: Option<u32>) -> String {
    match page {
        Some(p) => p.to_string(),
        None => "?".to_string(),
    }
}
