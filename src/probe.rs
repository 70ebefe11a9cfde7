use crate::{config::Config, engine::Engine};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub input: ProbeInput,
    pub pages: Vec<PageText>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeInput {
    pub path: String,
    pub file_bytes: u64,
    pub page_count: u32,
}

/// Raw per-page material for the classifiers. Ephemeral: produced once per
/// analysis run, consumed, and discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    pub page: u32,
    pub text: String,
    pub image_count: u32,
}

pub fn probe_document(cfg: &Config, engine: &dyn Engine, input: &Path) -> Result<ProbeResult> {
    let meta = std::fs::metadata(input).with_context(|| "stat input")?;
    let file_bytes = meta.len();
    if file_bytes > cfg.limits.max_input_file_bytes {
        anyhow::bail!("input exceeds max_input_file_bytes: {}", file_bytes);
    }

    let out = engine
        .extract_pages(input)
        .with_context(|| "engine extract_pages failed")?;

    if out.page_count > cfg.limits.max_input_pages {
        anyhow::bail!("input exceeds max_input_pages: {}", out.page_count);
    }
    if out.page_count == 0 {
        anyhow::bail!("input has zero pages");
    }

    let pages = out
        .pages
        .into_iter()
        .map(|p| PageText {
            page: p.page,
            // NFKC so ligatures and fullwidth forms don't defeat keyword matching
            text: p.text.nfkc().collect::<String>(),
            image_count: p.image_count,
        })
        .collect();

    Ok(ProbeResult {
        input: ProbeInput {
            path: input.display().to_string(),
            file_bytes,
            page_count: out.page_count,
        },
        pages,
    })
}
