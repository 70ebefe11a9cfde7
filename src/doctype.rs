use crate::probe::ProbeResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfType {
    Scanned,
    Vector,
    Hybrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentClassification {
    pub pdf_type: PdfType,
    pub pages: u32,
    pub has_text: bool,
    pub has_images: bool,
}

/// Coarse whole-document triage from aggregate text length and image count.
/// Images without text reads as a scan, text without images as vector output,
/// everything else (both present, or a document with neither) as hybrid.
pub fn classify_document(probe: &ProbeResult) -> DocumentClassification {
    let text_len: usize = probe.pages.iter().map(|p| p.text.trim().len()).sum();
    let image_count: u32 = probe.pages.iter().map(|p| p.image_count).sum();

    let pdf_type = if image_count > 0 && text_len == 0 {
        PdfType::Scanned
    } else if image_count == 0 && text_len > 0 {
        PdfType::Vector
    } else {
        PdfType::Hybrid
    };

    DocumentClassification {
        pdf_type,
        pages: probe.input.page_count,
        has_text: text_len > 0,
        has_images: image_count > 0,
    }
}
