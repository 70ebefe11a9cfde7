use crate::doctype::DocumentClassification;
use crate::index::{ClassifiedPage, IndexRow};
use crate::qa::QaReport;
use crate::rules::{RuleStatus, RuleVerdict};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sub-stage failure the analyzer recovered from. These are data on the
/// report, not raised errors: downstream stages still ran on what was left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageError {
    pub stage: String,
    pub message: String,
}

impl StageError {
    pub fn new(stage: &str, err: &anyhow::Error) -> Self {
        Self {
            stage: stage.to_string(),
            message: format!("{err:#}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub classification: Option<DocumentClassification>,
    /// Page counts keyed by `"{VIEW} @ {scale}"`.
    pub summary: BTreeMap<String, u32>,
    pub pages: Vec<ClassifiedPage>,
    /// View label -> written subset PDF path.
    pub split_files: BTreeMap<String, String>,
    pub files: Vec<String>,
    pub index: Vec<IndexRow>,
    pub qa: QaReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_csv: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<StageError>,
}

impl AnalysisReport {
    /// The short-circuit report for input that could not be read at all:
    /// every collection empty, the failure carried in `errors`.
    pub fn unreadable(err: &anyhow::Error) -> Self {
        Self {
            classification: None,
            summary: BTreeMap::new(),
            pages: Vec::new(),
            split_files: BTreeMap::new(),
            files: Vec::new(),
            index: Vec::new(),
            qa: QaReport {
                missing_views: Vec::new(),
                scale_issues: Vec::new(),
                low_confidence_pages: Vec::new(),
            },
            index_csv: None,
            errors: vec![StageError::new("probe", err)],
        }
    }
}

/// Reconciles the two pass/fail verdicts: an explicit rule-engine verdict
/// takes precedence; otherwise a clean QA report passes.
pub fn overall_status(qa: &QaReport, rule: Option<&RuleVerdict>) -> &'static str {
    match rule {
        Some(v) => match v.status {
            RuleStatus::Pass => "PASS",
            RuleStatus::Fail => "FAIL",
            RuleStatus::UnknownProjectType => "UNKNOWN_PROJECT_TYPE",
        },
        None => {
            if qa.is_clean() {
                "PASS"
            } else {
                "FAIL"
            }
        }
    }
}
