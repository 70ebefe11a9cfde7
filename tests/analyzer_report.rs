use anyhow::{anyhow, Result};
use sheet_check::{
    analyzer::Analyzer,
    config::Config,
    doctype::PdfType,
    engine::{Engine, EngineDiag, ExtractOut, PageOut, SubsetDoc, SubsetGroup},
    index::RowStatus,
    views::ViewType,
};
use std::path::{Path, PathBuf};

struct FakeEngine {
    pages: Vec<PageOut>,
    fail_split: bool,
}

impl FakeEngine {
    fn with_texts(texts: &[&str]) -> Self {
        let pages = texts
            .iter()
            .enumerate()
            .map(|(i, t)| PageOut {
                page: i as u32 + 1,
                text: t.to_string(),
                image_count: 0,
            })
            .collect();
        Self {
            pages,
            fail_split: false,
        }
    }
}

impl Engine for FakeEngine {
    fn doctor(&self) -> Result<EngineDiag> {
        Ok(EngineDiag {
            python_exe: "fake".into(),
            python_version: "0.0".into(),
            pymupdf_version: None,
            ok: true,
            error: None,
        })
    }

    fn extract_pages(&self, _input: &Path) -> Result<ExtractOut> {
        Ok(ExtractOut {
            page_count: self.pages.len() as u32,
            pages: self.pages.clone(),
            error: None,
        })
    }

    fn write_subsets(
        &self,
        _input: &Path,
        out_dir: &Path,
        groups: &[SubsetGroup],
    ) -> Result<Vec<SubsetDoc>> {
        if self.fail_split {
            return Err(anyhow!("subset writer unavailable"));
        }
        Ok(groups
            .iter()
            .map(|g| SubsetDoc {
                label: g.label.clone(),
                path: out_dir.join(format!("{}.pdf", g.label)).display().to_string(),
                pages: g.pages.clone(),
            })
            .collect())
    }
}

fn temp_input(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sheet-check-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.4\n").unwrap();
    path
}

fn drawing_texts() -> Vec<&'static str> {
    vec![
        "FLOOR PLAN SCALE: 1:100",
        "SECTION A-A SCALE 1:50",
        "random text",
    ]
}

#[test]
fn analysis_joins_views_and_scales_per_page() {
    let cfg = Config::default();
    let input = temp_input("drawing.pdf");
    let engine = FakeEngine::with_texts(&drawing_texts());
    let report = Analyzer::new(&cfg, engine).analyze(&input, &std::env::temp_dir());

    assert!(report.errors.is_empty());
    assert_eq!(report.pages.len(), 3);

    let views: Vec<ViewType> = report.pages.iter().map(|p| p.view_type).collect();
    assert_eq!(views, vec![ViewType::Plan, ViewType::Section, ViewType::Unknown]);

    let scales: Vec<&str> = report.pages.iter().map(|p| p.scale.as_str()).collect();
    assert_eq!(scales, vec!["1:100", "1:50", "Unknown"]);

    // the classifier yields no confidence, so every row is LOW CONF
    assert!(report
        .index
        .iter()
        .all(|r| r.status == RowStatus::LowConf && r.confidence.is_none()));

    assert_eq!(report.qa.missing_views, vec![ViewType::Elevation]);

    assert_eq!(report.summary.len(), 3);
    assert_eq!(report.summary.get("PLAN @ 1:100"), Some(&1));
    assert_eq!(report.summary.get("SECTION @ 1:50"), Some(&1));
    assert_eq!(report.summary.get("UNKNOWN @ Unknown"), Some(&1));
}

#[test]
fn index_covers_every_extracted_page() {
    let cfg = Config::default();
    let input = temp_input("coverage.pdf");
    let engine = FakeEngine::with_texts(&drawing_texts());
    let report = Analyzer::new(&cfg, engine).analyze(&input, &std::env::temp_dir());
    assert_eq!(report.index.len(), report.pages.len());
}

#[test]
fn split_outputs_grouped_by_view_label() {
    let cfg = Config::default();
    let input = temp_input("split.pdf");
    let engine = FakeEngine::with_texts(&drawing_texts());
    let report = Analyzer::new(&cfg, engine).analyze(&input, &std::env::temp_dir());

    let mut labels: Vec<&String> = report.split_files.keys().collect();
    labels.sort();
    assert_eq!(labels, vec!["plan", "section", "unknown"]);
    assert_eq!(report.files.len(), 3);
}

#[test]
fn split_failure_does_not_suppress_index_or_qa() {
    let cfg = Config::default();
    let input = temp_input("failing-split.pdf");
    let mut engine = FakeEngine::with_texts(&drawing_texts());
    engine.fail_split = true;
    let report = Analyzer::new(&cfg, engine).analyze(&input, &std::env::temp_dir());

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].stage, "split");
    assert!(report.split_files.is_empty());
    // everything else still ran
    assert_eq!(report.index.len(), 3);
    assert_eq!(report.qa.missing_views, vec![ViewType::Elevation]);
    assert!(report.index_csv.is_some());
}

#[test]
fn empty_document_short_circuits_to_error_report() {
    let cfg = Config::default();
    let input = temp_input("empty.pdf");
    let engine = FakeEngine::with_texts(&[]);
    let report = Analyzer::new(&cfg, engine).analyze(&input, &std::env::temp_dir());

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].stage, "probe");
    assert!(report.pages.is_empty());
    assert!(report.index.is_empty());
    assert!(report.classification.is_none());
}

#[test]
fn text_only_document_classifies_as_vector() {
    let cfg = Config::default();
    let input = temp_input("vector.pdf");
    let engine = FakeEngine::with_texts(&drawing_texts());
    let report = Analyzer::new(&cfg, engine).analyze(&input, &std::env::temp_dir());

    let c = report.classification.unwrap();
    assert_eq!(c.pdf_type, PdfType::Vector);
    assert_eq!(c.pages, 3);
    assert!(c.has_text);
    assert!(!c.has_images);
}

#[test]
fn csv_export_matches_index() {
    let cfg = Config::default();
    let input = temp_input("csv.pdf");
    let engine = FakeEngine::with_texts(&drawing_texts());
    let report = Analyzer::new(&cfg, engine).analyze(&input, &std::env::temp_dir());

    let csv = report.index_csv.unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "page,view_type,scale,confidence,status");
    assert_eq!(lines.len(), 1 + report.index.len());
    assert_eq!(lines[1], "1,PLAN,1:100,,LOW CONF");
}
