use crate::config;
use crate::scale::UNKNOWN_SCALE;
use crate::views::ViewType;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One analyzed page: view classification joined with detected scale.
/// The analyzer owns these for the duration of a run; a review session holds
/// the canonical, correction-mutable copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPage {
    pub page: Option<u32>,
    pub view_type: ViewType,
    pub confidence: Option<f64>,
    pub scale: String,
    #[serde(default)]
    pub overridden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "LOW CONF")]
    LowConf,
    #[serde(rename = "REVIEW")]
    Review,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Ok => "OK",
            RowStatus::LowConf => "LOW CONF",
            RowStatus::Review => "REVIEW",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRow {
    pub page: Option<u32>,
    pub view_type: ViewType,
    pub scale: String,
    pub confidence: Option<f64>,
    pub status: RowStatus,
}

/// Builds the stable drawing index: one row per page, normalized and sorted
/// by page number with pageless rows last. Pure; the same pages always yield
/// the same index.
pub fn build_index(cfg: &config::Index, pages: &[ClassifiedPage]) -> Vec<IndexRow> {
    let mut rows: Vec<IndexRow> = pages
        .iter()
        .map(|p| {
            let confidence = p.confidence.filter(|c| c.is_finite());
            let scale = if p.scale.is_empty() {
                UNKNOWN_SCALE.to_string()
            } else {
                p.scale.clone()
            };

            // Precedence: missing/low confidence trumps the unknown-view flag.
            let status = match confidence {
                None => RowStatus::LowConf,
                Some(c) if c < cfg.confidence_threshold => RowStatus::LowConf,
                Some(_) if p.view_type == ViewType::Unknown => RowStatus::Review,
                Some(_) => RowStatus::Ok,
            };

            IndexRow {
                page: p.page,
                view_type: p.view_type,
                scale,
                confidence,
                status,
            }
        })
        .collect();

    rows.sort_by_key(|r| (r.page.is_none(), r.page));
    rows
}

/// CSV rendering of the index: `page,view_type,scale,confidence,status`.
/// A missing page or confidence renders as an empty field; confidence is
/// fixed to two decimals.
pub fn index_to_csv(rows: &[IndexRow]) -> Result<String> {
    use std::fmt::Write;

    let mut out = String::new();
    writeln!(out, "page,view_type,scale,confidence,status")?;
    for r in rows {
        match r.page {
            Some(p) => write!(out, "{p}")?,
            None => {}
        }
        write!(out, ",{},{},", r.view_type, r.scale)?;
        if let Some(c) = r.confidence {
            write!(out, "{c:.2}")?;
        }
        writeln!(out, ",{}", r.status.as_str())?;
    }
    Ok(out)
}
