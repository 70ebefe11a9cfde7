use sheet_check::{
    config::Config,
    index::{build_index, ClassifiedPage},
    qa::build_qa,
    report::overall_status,
    rules::{apply_rules, RuleStatus},
    views::ViewType,
};

fn page(n: u32, vt: ViewType, conf: Option<f64>, scale: &str) -> ClassifiedPage {
    ClassifiedPage {
        page: Some(n),
        view_type: vt,
        confidence: conf,
        scale: scale.into(),
        overridden: false,
    }
}

fn structural_ok_pages() -> Vec<ClassifiedPage> {
    vec![
        page(1, ViewType::Plan, Some(0.9), "1:100"),
        page(2, ViewType::Section, Some(0.8), "1:50"),
        page(3, ViewType::Elevation, Some(0.7), "1:50"),
    ]
}

#[test]
fn structural_template_passes_clean_set() {
    let cfg = Config::default();
    let rows = build_index(&cfg.index, &structural_ok_pages());
    let v = apply_rules(&rows, "structural");
    assert_eq!(v.status, RuleStatus::Pass);
    assert!(v.issues.is_empty());
}

#[test]
fn unknown_project_type_is_a_verdict_not_an_error() {
    let cfg = Config::default();
    let rows = build_index(&cfg.index, &structural_ok_pages());
    let v = apply_rules(&rows, "MARINE");
    assert_eq!(v.status, RuleStatus::UnknownProjectType);
    assert_eq!(v.issues, vec!["No rules defined for MARINE".to_string()]);
}

#[test]
fn missing_required_view_fails() {
    let cfg = Config::default();
    let rows = build_index(
        &cfg.index,
        &[
            page(1, ViewType::Plan, Some(0.9), "1:100"),
            page(2, ViewType::Section, Some(0.8), "1:50"),
        ],
    );
    let v = apply_rules(&rows, "STRUCTURAL");
    assert_eq!(v.status, RuleStatus::Fail);
    assert!(v
        .issues
        .contains(&"Missing required view: ELEVATION".to_string()));
}

#[test]
fn disallowed_scale_flagged_per_page() {
    let cfg = Config::default();
    let mut pages = structural_ok_pages();
    pages[0].scale = "1:25".into();
    let rows = build_index(&cfg.index, &pages);
    let v = apply_rules(&rows, "STRUCTURAL");
    assert_eq!(v.status, RuleStatus::Fail);
    assert!(v
        .issues
        .contains(&"Invalid scale on page 1 for PLAN: 1:25".to_string()));
}

#[test]
fn confidence_floor_ignores_scoreless_rows() {
    let cfg = Config::default();
    let rows = build_index(
        &cfg.index,
        &[
            page(1, ViewType::Plan, Some(0.55), "1:100"),
            page(2, ViewType::Section, None, "1:50"),
            page(3, ViewType::Elevation, Some(0.9), "1:50"),
        ],
    );
    let v = apply_rules(&rows, "STRUCTURAL");
    assert!(v
        .issues
        .contains(&"Low confidence on page 1 (PLAN)".to_string()));
    // a row with no confidence at all is not a rule violation
    assert!(!v.issues.iter().any(|i| i.contains("page 2")));
}

#[test]
fn template_thresholds_differ_by_project_type() {
    let cfg = Config::default();
    let rows = build_index(
        &cfg.index,
        &[
            page(1, ViewType::Plan, Some(0.55), "1:100"),
            page(2, ViewType::Elevation, Some(0.55), "1:100"),
        ],
    );
    // architectural floor is 0.5, so 0.55 passes there
    let v = apply_rules(&rows, "ARCHITECTURAL");
    assert_eq!(v.status, RuleStatus::Pass);
    // foundation's floor is 0.65 and its view set differs
    let v = apply_rules(&rows, "FOUNDATION");
    assert_eq!(v.status, RuleStatus::Fail);
}

#[test]
fn rule_verdict_takes_precedence_over_qa() {
    let cfg = Config::default();
    // QA-clean set (all three views, consistent scales)
    let rows = build_index(&cfg.index, &structural_ok_pages());
    let qa = build_qa(&cfg.index, &rows);
    assert!(qa.is_clean());

    let failing = apply_rules(&rows, "FOUNDATION");
    assert_eq!(overall_status(&qa, Some(&failing)), "FAIL");
    assert_eq!(overall_status(&qa, None), "PASS");
}

#[test]
fn qa_fallback_fails_on_findings() {
    let cfg = Config::default();
    let rows = build_index(&cfg.index, &[page(1, ViewType::Plan, Some(0.9), "1:100")]);
    let qa = build_qa(&cfg.index, &rows);
    assert_eq!(overall_status(&qa, None), "FAIL");
}
