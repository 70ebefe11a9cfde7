use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineDiag {
    pub python_exe: String,
    pub python_version: String,
    pub pymupdf_version: Option<String>,
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// One extracted page. `page` is 1-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageOut {
    pub page: u32,
    pub text: String,
    pub image_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractOut {
    pub page_count: u32,
    #[serde(default)]
    pub pages: Vec<PageOut>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A requested sub-document: the pages (0-based indices, original order)
/// to copy into one output PDF named after `label`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsetGroup {
    pub label: String,
    pub pages: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsetDoc {
    pub label: String,
    pub path: String,
    pub pages: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsetOut {
    pub ok: bool,
    #[serde(default)]
    pub outputs: Vec<SubsetDoc>,
    #[serde(default)]
    pub error: Option<String>,
}
