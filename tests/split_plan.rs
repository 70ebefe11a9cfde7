use sheet_check::{config::Config, probe::PageText, splitter::split_plan};

fn page(n: u32, text: &str) -> PageText {
    PageText {
        page: n,
        text: text.into(),
        image_count: 0,
    }
}

#[test]
fn groups_pages_by_view_preserving_order() {
    let cfg = Config::default();
    let pages = vec![
        page(1, "FLOOR PLAN"),
        page(2, "SECTION A-A"),
        page(3, "ROOF PLAN"),
        page(4, "mystery sheet"),
    ];
    let plan = split_plan(&cfg.views, &pages);

    assert_eq!(plan.len(), 3);
    assert_eq!(plan[0].label, "plan");
    assert_eq!(plan[0].pages, vec![0, 2]);
    assert_eq!(plan[1].label, "section");
    assert_eq!(plan[1].pages, vec![1]);
    assert_eq!(plan[2].label, "unknown");
    assert_eq!(plan[2].pages, vec![3]);
}

#[test]
fn absent_views_get_no_group() {
    let cfg = Config::default();
    let plan = split_plan(&cfg.views, &[page(1, "SIDE VIEW")]);
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].label, "elevation");
}

#[test]
fn same_input_same_plan() {
    let cfg = Config::default();
    let pages = vec![page(1, "FLOOR PLAN"), page(2, "SECTION")];
    assert_eq!(
        serde_json::to_string(&split_plan(&cfg.views, &pages)).unwrap(),
        serde_json::to_string(&split_plan(&cfg.views, &pages)).unwrap()
    );
}
