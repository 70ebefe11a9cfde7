use crate::{
    analyzer::Analyzer,
    config::Config,
    doctype,
    engine::{python::PythonEngine, Engine},
    index::index_to_csv,
    overrides::OverrideMap,
    probe, register, report, rules,
    session::ReviewSession,
    util::{ensure_dir, hash_file, now_rfc3339, sha256_hex},
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "sheet-check")]
#[command(about = "Deterministic engineering-drawing analyzer (view classification + scale QA + register)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./sheet-check.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Doctor {},
    Classify {
        #[arg(long)]
        input: PathBuf,
    },
    Split {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    Run {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Validate the index against a project-type rule template
        /// (structural/architectural/foundation).
        #[arg(long)]
        project_type: Option<String>,
        /// Drawing-number prefix for the register.
        #[arg(long)]
        project_code: Option<String>,
        /// Revision letter for the register.
        #[arg(long)]
        revision: Option<String>,
        /// JSON corrections file: {"2": {"view_type": "SECTION", "scale": "1:25"}}.
        #[arg(long)]
        corrections: Option<PathBuf>,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg_path = resolve_config_path(args.config.as_deref())?;
    let cfg = Config::load(&cfg_path)?;

    match &args.cmd {
        Command::Doctor {} => {
            let log_path = resolve_log_path(&cfg, None);
            let _guard = init_logging(&args, &cfg, log_path.as_deref())?;
            doctor(&cfg)
        }
        Command::Classify { input } => {
            let log_path = resolve_log_path(&cfg, None);
            let _guard = init_logging(&args, &cfg, log_path.as_deref())?;
            classify(&cfg, input)
        }
        Command::Split { input, out_dir } => {
            let log_path = resolve_log_path(&cfg, None);
            let _guard = init_logging(&args, &cfg, log_path.as_deref())?;
            split(&cfg, input, out_dir.as_deref())
        }
        Command::Run {
            input,
            out_dir,
            project_type,
            project_code,
            revision,
            corrections,
        } => run(
            &args,
            &cfg,
            RunOpts {
                input,
                out_dir: out_dir.as_deref(),
                project_type: project_type.as_deref(),
                project_code: project_code.as_deref(),
                revision: revision.as_deref(),
                corrections: corrections.as_deref(),
            },
        ),
    }
}

struct RunOpts<'a> {
    input: &'a Path,
    out_dir: Option<&'a Path>,
    project_type: Option<&'a str>,
    project_code: Option<&'a str>,
    revision: Option<&'a str>,
    corrections: Option<&'a Path>,
}

fn resolve_config_path(user: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = user {
        return Ok(p.to_path_buf());
    }
    let default = PathBuf::from("sheet-check.toml");
    if default.exists() {
        Ok(default)
    } else {
        Ok(PathBuf::from("sheet-check.example.toml"))
    }
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn doctor(cfg: &Config) -> Result<()> {
    let engine = PythonEngine::new(cfg)?;
    let diag = engine.doctor()?;
    println!("{}", serde_json::to_string_pretty(&diag)?);
    Ok(())
}

fn classify(cfg: &Config, input: &Path) -> Result<()> {
    validate_input(cfg, input)?;
    let engine = PythonEngine::new(cfg)?;
    let probe = probe::probe_document(cfg, &engine, input)?;
    let classification = doctype::classify_document(&probe);

    let detector = crate::scale::ScaleDetector::new(&cfg.scales)?;
    let pages: Vec<serde_json::Value> = probe
        .pages
        .iter()
        .map(|p| {
            let view = crate::views::classify_text(&cfg.views, &p.text);
            serde_json::json!({
                "page": p.page,
                "view_type": view.view_type,
                "scale": detector.detect(&p.text),
            })
        })
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "input": input,
            "classification": classification,
            "pages": pages,
        }))?
    );
    Ok(())
}

fn split(cfg: &Config, input: &Path, out_override: Option<&Path>) -> Result<()> {
    validate_input(cfg, input)?;
    let out_dir = out_override
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.out_dir).join(&cfg.output.views_subdir));
    ensure_dir(&out_dir)?;

    let engine = PythonEngine::new(cfg)?;
    let probe = probe::probe_document(cfg, &engine, input)?;
    let outputs = crate::splitter::split_by_view(&cfg.views, &engine, input, &out_dir, &probe.pages)?;

    let map: std::collections::BTreeMap<&str, &str> = outputs
        .iter()
        .map(|d| (d.label.as_str(), d.path.as_str()))
        .collect();
    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}

fn run(args: &Args, cfg: &Config, opts: RunOpts<'_>) -> Result<()> {
    validate_input(cfg, opts.input)?;

    let cfg_norm = cfg.normalized_for_hash();
    let cfg_hash = sha256_hex(cfg_norm.as_bytes());
    let input_hash = hash_file(cfg, opts.input)
        .with_context(|| format!("hashing input: {}", opts.input.display()))?;
    let job_id = sha256_hex(format!("{}:{}", cfg_hash, input_hash).as_bytes());

    let out_root = opts
        .out_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.out_dir));
    let job_dir = out_root.join(&job_id);

    if job_dir.exists() && !cfg.global.resume {
        return Err(anyhow!(
            "job_dir already exists and resume=false: {}",
            job_dir.display()
        ));
    }

    ensure_dir(&job_dir)?;
    ensure_dir(&job_dir.join("logs"))?;
    let views_dir = job_dir.join(&cfg.output.views_subdir);
    ensure_dir(&views_dir)?;

    let log_path = resolve_log_path(cfg, Some(&job_dir));
    let _guard = init_logging(args, cfg, log_path.as_deref())?;

    info!("job_id={job_id} out={}", job_dir.display());

    if cfg.debug.dump_effective_config {
        let raw = toml::to_string(cfg).unwrap_or_default();
        std::fs::write(job_dir.join("effective-config.toml"), raw)?;
    }

    ensure_dir(Path::new(&cfg.paths.work_dir))?;

    let engine = PythonEngine::new(cfg)?;
    let analyzer = Analyzer::new(cfg, engine);

    let started = now_rfc3339();
    let mut analysis = analyzer.analyze(opts.input, &views_dir);

    // Corrections rewrite the canonical pages; everything derived is then
    // recomputed from them rather than patched in place.
    if let Some(path) = opts.corrections {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading corrections: {}", path.display()))?;
        let overrides: OverrideMap =
            serde_json::from_str(&raw).with_context(|| "parsing corrections JSON")?;
        info!("applying {} correction(s)", overrides.len());

        let mut session = ReviewSession::new(cfg, analysis.pages.clone());
        session.set_overrides(overrides);
        let derived = session.recompute_derived();

        analysis.pages = session.pages().to_vec();
        analysis.index = derived.index;
        analysis.qa = derived.qa;
        analysis.index_csv = index_to_csv(&analysis.index).ok();
    }

    let project_code = opts
        .project_code
        .unwrap_or(cfg.register.project_code.as_str());
    let revision = opts.revision.unwrap_or(cfg.register.revision.as_str());
    let entries = register::build_register(&analysis.index, project_code, revision);

    let verdict = opts
        .project_type
        .map(|t| rules::apply_rules(&analysis.index, t));
    if let Some(v) = &verdict {
        for issue in &v.issues {
            warn!("rule issue: {issue}");
        }
    }
    let status = report::overall_status(&analysis.qa, verdict.as_ref());

    if cfg.output.write_report_json {
        std::fs::write(
            job_dir.join(&cfg.output.report_filename),
            serde_json::to_string_pretty(&analysis)?,
        )?;
    }

    if cfg.output.write_index_csv {
        let csv = match &analysis.index_csv {
            Some(csv) => csv.clone(),
            None => index_to_csv(&analysis.index)?,
        };
        std::fs::write(job_dir.join(&cfg.output.index_filename), csv)?;
    }

    if cfg.output.write_register_csv {
        let csv = register::register_to_csv(&entries)?;
        std::fs::write(job_dir.join(&cfg.output.register_filename), csv)?;
    }

    if cfg.output.write_rules_json {
        if let Some(v) = &verdict {
            std::fs::write(
                job_dir.join(&cfg.output.rules_filename),
                serde_json::to_string_pretty(v)?,
            )?;
        }
    }

    if cfg.output.write_index_json {
        let manifest = serde_json::json!({
            "job_id": job_id,
            "started": started,
            "finished": now_rfc3339(),
            "report": cfg.output.report_filename,
            "index_csv": cfg.output.index_filename,
            "register_csv": cfg.output.register_filename,
            "views": &analysis.files,
        });
        std::fs::write(
            job_dir.join("index.json"),
            serde_json::to_string_pretty(&manifest)?,
        )?;
    }

    if cfg.global.print_summary {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "job_id": job_id,
                "job_dir": job_dir,
                "status": status,
                "pages": analysis.pages.len(),
                "errors": analysis.errors.len(),
            }))?
        );
    }

    Ok(())
}

fn validate_input(cfg: &Config, input: &Path) -> Result<()> {
    let input_str = input.display().to_string();

    if cfg.security.reject_url_inputs && looks_like_url(&input_str) {
        return Err(anyhow!("URL inputs are disabled: {input_str}"));
    }

    if !input.exists() {
        return Err(anyhow!("input does not exist: {}", input.display()));
    }

    if let Some(ext) = input.extension().and_then(|s| s.to_str()) {
        if ext.to_ascii_lowercase() != "pdf" {
            return Err(anyhow!("input is not a PDF: {}", input.display()));
        }
    } else {
        warn!("input has no extension; assuming PDF: {}", input.display());
    }

    Ok(())
}

fn looks_like_url(s: &str) -> bool {
    let s = s.to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("file://")
}

fn resolve_log_path(cfg: &Config, job_dir: Option<&Path>) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    if let Some(job_dir) = job_dir {
        return Some(job_dir.join("logs").join("sheet-check.log"));
    }

    Some(PathBuf::from(&cfg.paths.out_dir).join("sheet-check.log"))
}
