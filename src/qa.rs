use crate::config;
use crate::index::IndexRow;
use crate::scale::is_unknown_scale;
use crate::views::ViewType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Every drawing set is expected to carry these views, in this reporting order.
pub const REQUIRED_VIEWS: [ViewType; 3] = [ViewType::Plan, ViewType::Section, ViewType::Elevation];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowConfidencePage {
    pub page: Option<u32>,
    pub view_type: ViewType,
    pub confidence: Option<f64>,
}

/// Aggregate findings derived from an index. No identity of its own: always
/// recomputed, never patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaReport {
    pub missing_views: Vec<ViewType>,
    pub scale_issues: Vec<String>,
    pub low_confidence_pages: Vec<LowConfidencePage>,
}

impl QaReport {
    /// Clean means no missing required views and no scale inconsistencies;
    /// low-confidence pages alone don't fail a set.
    pub fn is_clean(&self) -> bool {
        self.missing_views.is_empty() && self.scale_issues.is_empty()
    }
}

pub fn build_qa(cfg: &config::Index, rows: &[IndexRow]) -> QaReport {
    let mut seen_views: BTreeSet<ViewType> = BTreeSet::new();
    // first-seen order of views, each with every scale observed for it
    let mut scales_by_view: Vec<(ViewType, Vec<String>)> = Vec::new();
    let mut low_confidence_pages = Vec::new();

    for row in rows {
        if REQUIRED_VIEWS.contains(&row.view_type) {
            seen_views.insert(row.view_type);
        }

        if row.view_type != ViewType::Unknown {
            match scales_by_view.iter_mut().find(|(vt, _)| *vt == row.view_type) {
                Some((_, scales)) => scales.push(row.scale.clone()),
                None => scales_by_view.push((row.view_type, vec![row.scale.clone()])),
            }
        }

        let low = match row.confidence {
            None => true,
            Some(c) => c < cfg.confidence_threshold,
        };
        if low {
            low_confidence_pages.push(LowConfidencePage {
                page: row.page,
                view_type: row.view_type,
                confidence: row.confidence,
            });
        }
    }

    let missing_views = REQUIRED_VIEWS
        .iter()
        .copied()
        .filter(|v| !seen_views.contains(v))
        .collect();

    let mut scale_issues = Vec::new();
    for (vt, scales) in &scales_by_view {
        let known: BTreeSet<&str> = scales
            .iter()
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty() && !is_unknown_scale(s))
            .collect();

        if known.len() > 1 {
            let joined = known.iter().copied().collect::<Vec<_>>().join(", ");
            scale_issues.push(format!("Multiple scales detected for {vt}: {joined}"));
        } else if known.is_empty() {
            scale_issues.push(format!("No declared scale found for {vt}"));
        }
    }

    QaReport {
        missing_views,
        scale_issues,
        low_confidence_pages,
    }
}
