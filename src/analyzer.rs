use crate::{
    config::Config,
    doctype,
    engine::Engine,
    index::{build_index, index_to_csv, ClassifiedPage},
    probe,
    qa::build_qa,
    report::{AnalysisReport, StageError},
    scale::{ScaleDetector, UNKNOWN_SCALE},
    splitter,
    views::classify_text,
};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

pub struct Analyzer<E: Engine> {
    cfg: Config,
    engine: E,
}

impl<E: Engine> Analyzer<E> {
    pub fn new(cfg: &Config, engine: E) -> Self {
        Self {
            cfg: cfg.clone(),
            engine,
        }
    }

    /// Runs the full analysis. Sub-stage failures are collected into the
    /// report's `errors` list instead of aborting; only an unreadable input
    /// short-circuits, and even that comes back as a report rather than an
    /// error. Subset PDFs are written under `views_dir`.
    pub fn analyze(&self, input: &Path, views_dir: &Path) -> AnalysisReport {
        let mut errors: Vec<StageError> = Vec::new();

        let probe_res = match probe::probe_document(&self.cfg, &self.engine, input) {
            Ok(p) => p,
            Err(err) => {
                warn!("input unreadable: {err:#}");
                return AnalysisReport::unreadable(&err);
            }
        };

        info!(
            "probe page_count={} file_bytes={}",
            probe_res.input.page_count, probe_res.input.file_bytes
        );

        let classification = doctype::classify_document(&probe_res);

        // Scale detection degrades to all-Unknown if a configured pattern
        // fails to compile.
        let detector = match ScaleDetector::new(&self.cfg.scales) {
            Ok(d) => Some(d),
            Err(err) => {
                errors.push(StageError::new("scales", &err));
                None
            }
        };

        let pages: Vec<ClassifiedPage> = probe_res
            .pages
            .iter()
            .map(|p| {
                let view = classify_text(&self.cfg.views, &p.text);
                let scale = detector
                    .as_ref()
                    .map(|d| d.detect(&p.text))
                    .unwrap_or_else(|| UNKNOWN_SCALE.to_string());
                ClassifiedPage {
                    page: Some(p.page),
                    view_type: view.view_type,
                    confidence: None,
                    scale,
                    overridden: false,
                }
            })
            .collect();

        let mut split_files = BTreeMap::new();
        match splitter::split_by_view(
            &self.cfg.views,
            &self.engine,
            input,
            views_dir,
            &probe_res.pages,
        ) {
            Ok(outputs) => {
                for doc in outputs {
                    split_files.insert(doc.label, doc.path);
                }
            }
            Err(err) => {
                warn!("view split failed: {err:#}");
                errors.push(StageError::new("split", &err));
            }
        }

        let mut summary: BTreeMap<String, u32> = BTreeMap::new();
        for p in &pages {
            let key = format!("{} @ {}", p.view_type, p.scale);
            *summary.entry(key).or_insert(0) += 1;
        }

        let index = build_index(&self.cfg.index, &pages);
        let qa = build_qa(&self.cfg.index, &index);

        // CSV rendering is a convenience; its failure never fails analysis.
        let index_csv = index_to_csv(&index).ok();

        let files = split_files.keys().cloned().collect();

        AnalysisReport {
            classification: Some(classification),
            summary,
            pages,
            split_files,
            files,
            index,
            qa,
            index_csv,
            errors,
        }
    }
}
