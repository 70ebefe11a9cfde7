use sheet_check::{
    doctype::{classify_document, PdfType},
    probe::{PageText, ProbeInput, ProbeResult},
};

fn probe(pages: Vec<PageText>) -> ProbeResult {
    ProbeResult {
        input: ProbeInput {
            path: "x.pdf".into(),
            file_bytes: 1,
            page_count: pages.len() as u32,
        },
        pages,
    }
}

fn page(n: u32, text: &str, images: u32) -> PageText {
    PageText {
        page: n,
        text: text.into(),
        image_count: images,
    }
}

#[test]
fn images_without_text_is_scanned() {
    let c = classify_document(&probe(vec![page(1, "", 2), page(2, "  \n ", 1)]));
    assert_eq!(c.pdf_type, PdfType::Scanned);
    assert!(c.has_images);
    assert!(!c.has_text);
}

#[test]
fn text_without_images_is_vector() {
    let c = classify_document(&probe(vec![page(1, "GENERAL NOTES", 0)]));
    assert_eq!(c.pdf_type, PdfType::Vector);
}

#[test]
fn both_present_is_hybrid() {
    let c = classify_document(&probe(vec![page(1, "PLAN", 1)]));
    assert_eq!(c.pdf_type, PdfType::Hybrid);
}

#[test]
fn neither_present_is_hybrid() {
    let c = classify_document(&probe(vec![page(1, "", 0)]));
    assert_eq!(c.pdf_type, PdfType::Hybrid);
    assert!(!c.has_text);
    assert!(!c.has_images);
}
