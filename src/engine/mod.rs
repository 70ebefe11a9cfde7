pub mod python;
pub mod types;

use anyhow::Result;
use std::path::Path;

pub use types::{EngineDiag, ExtractOut, PageOut, SubsetDoc, SubsetGroup};

/// Boundary to the PDF mechanics this crate does not reimplement: reading
/// per-page text and image counts, and writing page subsets as new PDFs.
pub trait Engine {
    fn doctor(&self) -> Result<EngineDiag>;
    fn extract_pages(&self, input: &Path) -> Result<ExtractOut>;
    fn write_subsets(
        &self,
        input: &Path,
        out_dir: &Path,
        groups: &[SubsetGroup],
    ) -> Result<Vec<SubsetDoc>>;
}
