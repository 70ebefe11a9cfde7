use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub hashing: Hashing,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub views: Views,
    #[serde(default)]
    pub scales: Scales,
    #[serde(default)]
    pub index: Index,
    #[serde(default)]
    pub register: Register,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub python: Python,
    #[serde(default)]
    pub security: Security,
    #[serde(default)]
    pub debug: Debug,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }

    /// A stable, normalization-friendly string for hashing.
    pub fn normalized_for_hash(&self) -> String {
        toml::to_string(self).unwrap_or_default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global: Default::default(),
            paths: Default::default(),
            hashing: Default::default(),
            limits: Default::default(),
            views: Default::default(),
            scales: Default::default(),
            index: Default::default(),
            register: Default::default(),
            output: Default::default(),
            logging: Default::default(),
            python: Default::default(),
            security: Default::default(),
            debug: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Global {
    pub resume: bool,
    pub print_summary: bool,
}
impl Default for Global {
    fn default() -> Self {
        Self {
            resume: true,
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    pub out_dir: String,
    pub work_dir: String,
    pub scripts_dir: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            out_dir: "out".into(),
            work_dir: ".sheet-check-work".into(),
            scripts_dir: "scripts".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hashing {
    pub mode: String,
    pub fast_window_bytes: u64,
}
impl Default for Hashing {
    fn default() -> Self {
        Self {
            mode: "fast_2x16mb".into(),
            fast_window_bytes: 16 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    pub max_input_file_bytes: u64,
    pub max_input_pages: u32,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_file_bytes: 2 * 1024 * 1024 * 1024,
            max_input_pages: 20000,
        }
    }
}

/// Keyword sets for the page view classifier, tried in priority order
/// plan -> section -> elevation against lowercased page text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Views {
    pub plan_keywords: Vec<String>,
    pub section_keywords: Vec<String>,
    pub elevation_keywords: Vec<String>,
    pub snippet_chars: usize,
}
impl Default for Views {
    fn default() -> Self {
        Self {
            plan_keywords: vec!["plan".into(), "floor plan".into(), "layout".into()],
            section_keywords: vec!["section".into(), "sec".into(), "s/s".into()],
            elevation_keywords: vec![
                "elevation".into(),
                "front view".into(),
                "side view".into(),
            ],
            snippet_chars: 300,
        }
    }
}

/// Scale patterns are tried in order against uppercased page text; the first
/// match wins. Group 1 must capture the ratio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scales {
    pub patterns: Vec<String>,
}
impl Default for Scales {
    fn default() -> Self {
        Self {
            patterns: vec![
                "SCALE\\s*[:=]?\\s*(1\\s*[:/]\\s*\\d+)".into(),
                "SCALE\\s*\\(?(1\\s*[:/]\\s*\\d+)\\)?".into(),
                "(1\\s*[:/]\\s*\\d+)".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub confidence_threshold: f64,
}
impl Default for Index {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Register {
    pub project_code: String,
    pub revision: String,
}
impl Default for Register {
    fn default() -> Self {
        Self {
            project_code: "PRJ".into(),
            revision: "A".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub write_report_json: bool,
    pub write_index_csv: bool,
    pub write_register_csv: bool,
    pub write_rules_json: bool,
    pub write_index_json: bool,
    pub report_filename: String,
    pub index_filename: String,
    pub register_filename: String,
    pub rules_filename: String,
    pub views_subdir: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            write_report_json: true,
            write_index_csv: true,
            write_register_csv: true,
            write_rules_json: true,
            write_index_json: true,
            report_filename: "report.json".into(),
            index_filename: "index.csv".into(),
            register_filename: "register.csv".into(),
            rules_filename: "rules.json".into(),
            views_subdir: "views".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: true,
            file_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Python {
    pub python_exe: String,
    pub call_timeout_seconds: u64,
    pub doctor_timeout_seconds: u64,
    #[serde(default)]
    pub env: std::collections::BTreeMap<String, String>,
}
impl Default for Python {
    fn default() -> Self {
        Self {
            python_exe: "python3".into(),
            call_timeout_seconds: 300,
            doctor_timeout_seconds: 30,
            env: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Security {
    pub reject_url_inputs: bool,
    pub pin_scripts_dir: bool,
}
impl Default for Security {
    fn default() -> Self {
        Self {
            reject_url_inputs: true,
            pin_scripts_dir: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debug {
    pub keep_python_stderr: bool,
    pub dump_effective_config: bool,
}
impl Default for Debug {
    fn default() -> Self {
        Self {
            keep_python_stderr: true,
            dump_effective_config: true,
        }
    }
}
