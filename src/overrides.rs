use crate::index::ClassifiedPage;
use crate::views::ViewType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Engineer-supplied correction for one page. Absent fields leave the
/// automatic value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageCorrection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_type: Option<ViewType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
}

impl PageCorrection {
    /// Field-wise merge: later corrections win where they say something.
    pub fn merge_from(&mut self, other: &PageCorrection) {
        if other.view_type.is_some() {
            self.view_type = other.view_type;
        }
        if other.scale.is_some() {
            self.scale = other.scale.clone();
        }
    }
}

/// Sparse page-number -> correction map, JSON-loadable from a corrections file.
pub type OverrideMap = BTreeMap<u32, PageCorrection>;

/// Applies corrections over canonical pages. Pages with a matching override
/// get the corrected fields and `overridden = true`, all others
/// `overridden = false`. Re-applying the same map is a no-op on the result.
pub fn apply_overrides(pages: &[ClassifiedPage], overrides: &OverrideMap) -> Vec<ClassifiedPage> {
    pages
        .iter()
        .map(|p| {
            let mut out = p.clone();
            let ov = p.page.and_then(|n| overrides.get(&n));
            match ov {
                Some(c) => {
                    if let Some(vt) = c.view_type {
                        out.view_type = vt;
                    }
                    if let Some(scale) = &c.scale {
                        out.scale = scale.clone();
                    }
                    out.overridden = true;
                }
                None => out.overridden = false,
            }
            out
        })
        .collect()
}
