use sheet_check::{
    config::Config,
    index::{build_index, ClassifiedPage},
    qa::build_qa,
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

#[test]
fn detects_missing_required_views() {
    let cfg = Config::default();
    let rows = build_index(
        &cfg.index,
        &[
            page(1, ViewType::Plan, Some(0.9), "1:100"),
            page(2, ViewType::Elevation, Some(0.9), "1:100"),
        ],
    );
    let qa = build_qa(&cfg.index, &rows);
    assert_eq!(qa.missing_views, vec![ViewType::Section]);
}

#[test]
fn missing_views_follow_required_order() {
    let cfg = Config::default();
    let rows = build_index(&cfg.index, &[page(1, ViewType::Detail, Some(0.9), "1:20")]);
    let qa = build_qa(&cfg.index, &rows);
    assert_eq!(
        qa.missing_views,
        vec![ViewType::Plan, ViewType::Section, ViewType::Elevation]
    );
}

#[test]
fn multiple_scales_reported_sorted() {
    let cfg = Config::default();
    let rows = build_index(
        &cfg.index,
        &[
            page(1, ViewType::Plan, Some(0.9), "1:50"),
            page(2, ViewType::Plan, Some(0.9), "1:100"),
        ],
    );
    let qa = build_qa(&cfg.index, &rows);
    assert_eq!(
        qa.scale_issues,
        vec!["Multiple scales detected for PLAN: 1:100, 1:50".to_string()]
    );
}

#[test]
fn undeclared_scale_reported_per_view() {
    let cfg = Config::default();
    let rows = build_index(
        &cfg.index,
        &[
            page(1, ViewType::Section, Some(0.9), "Unknown"),
            page(2, ViewType::Section, Some(0.9), ""),
        ],
    );
    let qa = build_qa(&cfg.index, &rows);
    assert_eq!(
        qa.scale_issues,
        vec!["No declared scale found for SECTION".to_string()]
    );
}

#[test]
fn unknown_view_excluded_from_scale_checks() {
    let cfg = Config::default();
    let rows = build_index(&cfg.index, &[page(1, ViewType::Unknown, Some(0.9), "")]);
    let qa = build_qa(&cfg.index, &rows);
    assert!(qa.scale_issues.is_empty());
}

#[test]
fn single_consistent_scale_is_clean() {
    let cfg = Config::default();
    let rows = build_index(
        &cfg.index,
        &[
            page(1, ViewType::Plan, Some(0.9), "1:50"),
            page(2, ViewType::Plan, Some(0.9), "unknown"),
            page(3, ViewType::Section, Some(0.9), "1:25"),
            page(4, ViewType::Elevation, Some(0.9), "1:100"),
        ],
    );
    let qa = build_qa(&cfg.index, &rows);
    assert!(qa.scale_issues.is_empty());
    assert!(qa.missing_views.is_empty());
    assert!(qa.is_clean());
}

#[test]
fn low_confidence_pages_in_index_order() {
    let cfg = Config::default();
    let rows = build_index(
        &cfg.index,
        &[
            page(3, ViewType::Plan, None, "1:50"),
            page(1, ViewType::Section, Some(0.2), "1:25"),
            page(2, ViewType::Elevation, Some(0.9), "1:100"),
        ],
    );
    let qa = build_qa(&cfg.index, &rows);
    let pages: Vec<Option<u32>> = qa.low_confidence_pages.iter().map(|p| p.page).collect();
    assert_eq!(pages, vec![Some(1), Some(3)]);
    assert_eq!(qa.low_confidence_pages[1].confidence, None);
}
