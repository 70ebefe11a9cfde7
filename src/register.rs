use crate::index::{IndexRow, RowStatus};
use crate::util::today_utc;
use crate::views::ViewType;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterStatus {
    #[serde(rename = "FOR REVIEW")]
    ForReview,
    #[serde(rename = "FOR CONSTRUCTION")]
    ForConstruction,
}

impl RegisterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegisterStatus::ForReview => "FOR REVIEW",
            RegisterStatus::ForConstruction => "FOR CONSTRUCTION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Discipline {
    #[serde(rename = "STRUCTURAL")]
    Structural,
    #[serde(rename = "GENERAL")]
    General,
}

impl Discipline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Discipline::Structural => "STRUCTURAL",
            Discipline::General => "GENERAL",
        }
    }
}

/// One formal deliverable-ledger line, derived one-to-one from an index row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterEntry {
    pub drawing_no: String,
    pub title: String,
    pub sheet_no: Option<u32>,
    pub view_type: ViewType,
    pub scale: String,
    pub revision: String,
    pub status: RegisterStatus,
    pub discipline: Discipline,
    pub confidence: Option<f64>,
    pub source: String,
    pub created_on: String,
}

pub fn infer_discipline(view_type: ViewType) -> Discipline {
    match view_type {
        ViewType::Plan | ViewType::Section | ViewType::Elevation | ViewType::Detail => {
            Discipline::Structural
        }
        _ => Discipline::General,
    }
}

/// Builds the drawing register in index order. Only rows that reached OK are
/// released for construction; everything else stays in review.
pub fn build_register(rows: &[IndexRow], project_code: &str, revision: &str) -> Vec<RegisterEntry> {
    let created_on = today_utc();

    rows.iter()
        .map(|row| {
            let sheet = row.page.unwrap_or(0);
            RegisterEntry {
                drawing_no: format!("{project_code}-S-{sheet:03}"),
                title: format!("{} Drawing", row.view_type.label()),
                sheet_no: row.page,
                view_type: row.view_type,
                scale: row.scale.clone(),
                revision: revision.to_string(),
                status: if row.status == RowStatus::Ok {
                    RegisterStatus::ForConstruction
                } else {
                    RegisterStatus::ForReview
                },
                discipline: infer_discipline(row.view_type),
                confidence: row.confidence,
                source: "AUTO".to_string(),
                created_on: created_on.clone(),
            }
        })
        .collect()
}

pub fn register_to_csv(entries: &[RegisterEntry]) -> Result<String> {
    use std::fmt::Write;

    let mut out = String::new();
    writeln!(
        out,
        "drawing_no,title,sheet_no,view_type,scale,revision,status,discipline,confidence,source,created_on"
    )?;
    for e in entries {
        write!(out, "{},{},", e.drawing_no, e.title)?;
        if let Some(s) = e.sheet_no {
            write!(out, "{s}")?;
        }
        write!(out, ",{},{},{},{},{},", e.view_type, e.scale, e.revision, e.status.as_str(), e.discipline.as_str())?;
        if let Some(c) = e.confidence {
            write!(out, "{c:.2}")?;
        }
        writeln!(out, ",{},{}", e.source, e.created_on)?;
    }
    Ok(out)
}
