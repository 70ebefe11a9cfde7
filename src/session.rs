use crate::config::Config;
use crate::index::{build_index, ClassifiedPage, IndexRow};
use crate::overrides::{apply_overrides, OverrideMap, PageCorrection};
use crate::qa::{build_qa, QaReport};
use crate::register::{build_register, RegisterEntry};
use serde::{Deserialize, Serialize};

/// Everything a caller re-derives after a correction round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Derived {
    pub index: Vec<IndexRow>,
    pub qa: QaReport,
    pub register: Vec<RegisterEntry>,
}

/// Owns the canonical page list and the override map for one review session.
/// Corrections go through `apply_correction`, which updates the override map
/// and the canonical pages in one step, so a partially applied correction is
/// never observable. Derived artifacts are recomputed, never patched.
pub struct ReviewSession {
    cfg: Config,
    pages: Vec<ClassifiedPage>,
    overrides: OverrideMap,
}

impl ReviewSession {
    pub fn new(cfg: &Config, pages: Vec<ClassifiedPage>) -> Self {
        Self {
            cfg: cfg.clone(),
            pages,
            overrides: OverrideMap::new(),
        }
    }

    pub fn pages(&self) -> &[ClassifiedPage] {
        &self.pages
    }

    pub fn overrides(&self) -> &OverrideMap {
        &self.overrides
    }

    /// Records one correction and reapplies the full override map to the
    /// canonical pages.
    pub fn apply_correction(&mut self, page: u32, correction: PageCorrection) {
        self.overrides
            .entry(page)
            .or_insert_with(PageCorrection::default)
            .merge_from(&correction);
        self.pages = apply_overrides(&self.pages, &self.overrides);
    }

    /// Replaces the whole override map (e.g. from a corrections file) and
    /// applies it.
    pub fn set_overrides(&mut self, overrides: OverrideMap) {
        self.overrides = overrides;
        self.pages = apply_overrides(&self.pages, &self.overrides);
    }

    /// Index, QA, and register recomputed from the current canonical pages.
    pub fn recompute_derived(&self) -> Derived {
        let index = build_index(&self.cfg.index, &self.pages);
        let qa = build_qa(&self.cfg.index, &index);
        let register = build_register(
            &index,
            &self.cfg.register.project_code,
            &self.cfg.register.revision,
        );
        Derived {
            index,
            qa,
            register,
        }
    }
}
