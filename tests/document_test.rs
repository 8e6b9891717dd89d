use chrono::{TimeZone, Utc};
use pagemark::{assemble, Error, FrontMatterField, Node, PageInfo, Settings, SettingsError};

fn page() -> PageInfo {
    PageInfo {
        id: "42".to_string(),
        title: "Deploy".to_string(),
        ancestors: vec!["Home".to_string(), "Ops".to_string()],
        ..PageInfo::default()
    }
}

fn body() -> Node {
    Node::from_html("<p>Run it.</p>")
}

#[test]
fn breadcrumbs_follow_the_front_matter() {
    let settings = Settings {
        include_breadcrumbs: true,
        ..Settings::default()
    };
    let doc = assemble(&body(), &page(), &settings).expect("assemble");

    assert_eq!(
        doc.render(),
        "---\ntitle: \"Deploy\"\nid: \"42\"\n---\nHome > Ops\nRun it.\n"
    );
    let lines: Vec<String> = doc.render().lines().map(str::to_string).collect();
    let closing = lines.iter().rposition(|l| l == "---").expect("closing delimiter");
    assert_eq!(lines[closing + 1], "Home > Ops");
}

#[test]
fn breadcrumbs_are_absent_when_disabled() {
    let doc = assemble(&body(), &page(), &Settings::default()).expect("assemble");
    assert_eq!(doc.breadcrumbs, None);
    assert!(!doc.render().contains("Home"));
    assert_eq!(doc.render(), "---\ntitle: \"Deploy\"\nid: \"42\"\n---\nRun it.\n");
}

#[test]
fn breadcrumb_separator_is_configurable() {
    let settings = Settings {
        include_breadcrumbs: true,
        breadcrumb_separator: " / ".to_string(),
        front_matter: Vec::new(),
        ..Settings::default()
    };
    let doc = assemble(&body(), &page(), &settings).expect("assemble");
    assert_eq!(doc.breadcrumb_line().as_deref(), Some("Home / Ops"));
    assert_eq!(doc.render(), "Home / Ops\nRun it.\n");
}

#[test]
fn optional_fields_are_written_when_present() {
    let page = PageInfo {
        space: Some("OPS".to_string()),
        source: Some("https://wiki.example.com/display/OPS/Deploy".to_string()),
        author: Some("dana".to_string()),
        updated: Utc.with_ymd_and_hms(2023, 11, 2, 8, 0, 0).single(),
        labels: vec!["runbook".to_string(), "say \"hi\"".to_string()],
        ..page()
    };
    let settings = Settings {
        front_matter: vec![
            FrontMatterField::Id,
            FrontMatterField::Space,
            FrontMatterField::Source,
            FrontMatterField::Author,
            FrontMatterField::Updated,
            FrontMatterField::Labels,
        ],
        ..Settings::default()
    };
    let doc = assemble(&body(), &page, &settings).expect("assemble");

    assert_eq!(
        doc.render(),
        "---\n\
         id: \"42\"\n\
         space: \"OPS\"\n\
         source: \"https://wiki.example.com/display/OPS/Deploy\"\n\
         author: \"dana\"\n\
         updated: \"2023-11-02T08:00:00Z\"\n\
         labels: [\"runbook\",\"say \\\"hi\\\"\"]\n\
         ---\n\
         Run it.\n"
    );
}

#[test]
fn missing_id_fails_with_the_field_name() {
    let page = PageInfo {
        id: String::new(),
        ..page()
    };
    let err = assemble(&body(), &page, &Settings::default()).unwrap_err();
    match err {
        Error::MissingField { field, .. } => assert_eq!(field, "id"),
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[test]
fn invalid_source_names_the_page() {
    let page = PageInfo {
        source: Some("not a url".to_string()),
        ..page()
    };
    let settings = Settings {
        front_matter: vec![FrontMatterField::Title, FrontMatterField::Source],
        ..Settings::default()
    };
    let err = assemble(&body(), &page, &settings).unwrap_err();
    assert!(matches!(err, Error::InvalidSource { .. }));
    assert_eq!(err.page_id(), "42");
    assert!(err.to_string().contains("not a url"));
}

#[test]
fn unconfigured_source_is_not_validated() {
    let page = PageInfo {
        source: Some("not a url".to_string()),
        ..page()
    };
    assert!(assemble(&body(), &page, &Settings::default()).is_ok());
}

#[test]
fn title_heading_starts_the_body() {
    let settings = Settings {
        include_title_heading: true,
        ..Settings::default()
    };
    let doc = assemble(&body(), &page(), &settings).expect("assemble");
    assert_eq!(doc.body, "# Deploy\n\nRun it.");
}

#[test]
fn assembly_is_deterministic_and_display_matches_render() {
    let settings = Settings {
        include_breadcrumbs: true,
        ..Settings::default()
    };
    let html = "<table><tr><th>a</th></tr><tr><td><ul><li>x</li><li>y</li></ul></td></tr></table>";
    let root = Node::from_html(html);

    let first = assemble(&root, &page(), &settings).expect("assemble");
    let second = assemble(&root, &page(), &settings).expect("assemble");
    assert_eq!(first, second);
    assert_eq!(first.to_string(), first.render());
    assert!(first.body.ends_with("| - x<br/>- y |"));
}

#[test]
fn page_info_loads_from_json() {
    let json = r#"{"id":"7","title":"T","updated":"2024-01-05T10:00:00Z","labels":["a"]}"#;
    let page: PageInfo = serde_json::from_str(json).expect("valid page json");
    assert_eq!(page.id, "7");
    assert_eq!(page.updated, Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).single());
    assert!(page.ancestors.is_empty());
}

#[test]
fn invalid_settings_carry_the_violated_invariant() {
    let settings = Settings {
        bullet: 'x',
        ..Settings::default()
    };
    match assemble(&body(), &page(), &settings).unwrap_err() {
        Error::InvalidSettings { page_id, source } => {
            assert_eq!(page_id, "42");
            assert_eq!(source, SettingsError::InvalidBullet('x'));
        }
        other => panic!("expected InvalidSettings, got {other:?}"),
    }
}

#[test]
fn breadcrumb_titles_with_line_breaks_stay_on_one_line() {
    let settings = Settings {
        include_breadcrumbs: true,
        front_matter: Vec::new(),
        ..Settings::default()
    };
    let page = PageInfo {
        ancestors: vec!["Space".to_string(), "Parent\nPage".to_string()],
        ..page()
    };
    let doc = assemble(&body(), &page, &settings).expect("assemble");
    assert_eq!(doc.render(), "Space > Parent Page\nRun it.\n");
}
