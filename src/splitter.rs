use crate::config;
use crate::engine::{Engine, SubsetDoc, SubsetGroup};
use crate::probe::PageText;
use crate::views::classify_text;
use anyhow::Result;
use std::path::Path;

/// Groups 0-based page indices by view label, preserving original page order
/// within each group. Pages are reclassified here rather than reusing any
/// earlier analysis state, so the split is a function of the page texts alone.
/// Views with zero pages produce no group.
pub fn split_plan(cfg: &config::Views, pages: &[PageText]) -> Vec<SubsetGroup> {
    let mut groups: Vec<SubsetGroup> = Vec::new();

    for p in pages {
        let label = classify_text(cfg, &p.text).view_type.file_label();
        let page_idx = p.page.saturating_sub(1);
        match groups.iter_mut().find(|g| g.label == label) {
            Some(g) => g.pages.push(page_idx),
            None => groups.push(SubsetGroup {
                label,
                pages: vec![page_idx],
            }),
        }
    }

    groups
}

/// Materializes one sub-PDF per non-empty view group under `out_dir`.
pub fn split_by_view(
    cfg: &config::Views,
    engine: &dyn Engine,
    input: &Path,
    out_dir: &Path,
    pages: &[PageText],
) -> Result<Vec<SubsetDoc>> {
    let plan = split_plan(cfg, pages);
    engine.write_subsets(input, out_dir, &plan)
}
