//! End-to-end tests for the layout pass

use figlay::layout::PixelBox;
use figlay::{Error, FigmaFile, LayoutBuilder, ScreenPolicy};
use serde_json::json;
use std::fs;

fn fixture() -> FigmaFile {
    let data = fs::read_to_string("tests/fixtures/home.json").expect("Failed to read fixture");
    FigmaFile::from_json(&data).expect("Invalid fixture")
}

#[test]
fn test_pages_are_kept_in_order() {
    let layout = figlay::build(&fixture()).unwrap();
    let names: Vec<_> = layout.pages.iter().filter_map(|p| p.page.as_deref()).collect();
    assert_eq!(names, ["Home", "Icons", "Scratch"]);

    // vector-only and empty pages stay, with no screens
    assert!(layout.pages[1].screens.is_empty());
    assert!(layout.pages[2].screens.is_empty());
    assert_eq!(layout.screen_count(), 1);
}

#[test]
fn test_screen_and_text_scenario() {
    let layout = figlay::build(&fixture()).unwrap();
    let screen = &layout.pages[0].screens[0];
    assert_eq!(screen.screen.as_deref(), Some("Screen1"));
    assert_eq!(screen.bounds, PixelBox { x: 100, y: 100, w: 300, h: 200 });

    let title = &screen.tree[0];
    assert_eq!(title.name.as_deref(), Some("Title"));
    assert_eq!(title.bounds, PixelBox { x: 20, y: 10, w: 160, h: 29 });
    assert_eq!(title.text.as_deref(), Some("Hello"));

    let json = serde_json::to_value(title).unwrap();
    assert_eq!(json["type"], "TEXT");
    assert_eq!(json["style"]["color"], "#000000");
    assert_eq!(json["style"]["size"], 24.0);
    assert_eq!(json["style"]["weight"], 700.0);
    assert_eq!(json["style"]["align"], "LEFT");
    assert_eq!(json["style"]["line"], 29.05);
    assert_eq!(json["children"], json!([]));
    assert!(json.get("layout").is_none());
}

#[test]
fn test_auto_layout_container_styles() {
    let layout = figlay::build(&fixture()).unwrap();
    let actions = &layout.pages[0].screens[0].tree[1];
    assert_eq!(actions.bounds, PixelBox { x: 20, y: 50, w: 260, h: 48 });

    let json = serde_json::to_value(actions).unwrap();
    assert_eq!(
        json["layout"],
        json!({
            "dir": "HORIZONTAL",
            "gap": 12.0,
            "padding": {"t": 8.0, "b": 8.0, "l": 16.0, "r": 16.0},
            "align": "SPACE_BETWEEN",
            "cross": "CENTER"
        })
    );
    assert_eq!(
        json["style"],
        json!({
            "border": {"color": "#bfbfbf", "width": 1.0},
            "radius": 8.0,
            "shadow": true
        })
    );
}

#[test]
fn test_nested_child_is_relative_to_its_parent() {
    let layout = figlay::build(&fixture()).unwrap();
    let button = &layout.pages[0].screens[0].tree[1].children[0];
    assert_eq!(button.bounds, PixelBox { x: 16, y: 8, w: 100, h: 32 });
    // last solid fill wins
    assert_eq!(button.style.bg.as_deref(), Some("#007f3f"));
    assert_eq!(button.style.opacity, Some(0.5));
}

#[test]
fn test_components_policy_picks_up_more_screens() {
    let file = FigmaFile::from_value(&json!({
        "document": {"children": [{
            "name": "Library",
            "children": [
                {"type": "COMPONENT", "name": "Button"},
                {"type": "INSTANCE", "name": "Card"},
                {"type": "FRAME", "name": "Page"}
            ]
        }]}
    }))
    .unwrap();

    assert_eq!(figlay::build(&file).unwrap().screen_count(), 1);
    let wide = LayoutBuilder::with_policy(ScreenPolicy::FramesAndComponents)
        .build(&file)
        .unwrap();
    assert_eq!(wide.screen_count(), 3);
}

#[test]
fn test_malformed_documents_fail() {
    for bad in [json!({}), json!({"document": {}}), json!({"document": {"name": "x"}})] {
        let file = FigmaFile::from_value(&bad).unwrap();
        assert!(
            matches!(figlay::build(&file), Err(Error::MalformedInput(_))),
            "expected failure for {}",
            bad
        );
    }
}

#[test]
fn test_empty_page_list_is_not_an_error() {
    let file = FigmaFile::from_value(&json!({"document": {"children": []}})).unwrap();
    let layout = figlay::build(&file).unwrap();
    assert!(layout.pages.is_empty());
    assert!(!layout.has_screens());
}

#[test]
fn test_layout_round_trips_through_json() {
    let layout = figlay::build(&fixture()).unwrap();
    let text = serde_json::to_string(&layout).unwrap();
    let back: figlay::LayoutDocument = serde_json::from_str(&text).unwrap();
    assert_eq!(back, layout);
}

/// Files API text for one screen holding a chain of `depth` nested groups
fn deep_design(depth: usize) -> String {
    let mut json = String::from(
        r#"{"document":{"children":[{"type":"CANVAS","name":"Deep","children":[{"type":"FRAME","name":"Screen","absoluteBoundingBox":{"x":0,"y":0,"width":100,"height":100},"children":["#,
    );
    for i in 0..depth {
        json.push_str(&format!(
            r#"{{"type":"GROUP","name":"g{}","absoluteBoundingBox":{{"x":{},"y":0,"width":10,"height":10}},"children":["#,
            i, i
        ));
    }
    json.push_str(r#"{"type":"TEXT","name":"leaf","characters":"bottom"}"#);
    for _ in 0..depth {
        json.push_str("]}");
    }
    json.push_str("]}]}]}}");
    json
}

#[test]
fn test_deep_document_parses_builds_and_serializes() {
    let depth = 1_000;
    let file = FigmaFile::from_json(&deep_design(depth)).expect("deep document should parse");
    let layout = figlay::build(&file).unwrap();

    let mut node = &layout.pages[0].screens[0].tree[0];
    let mut levels = 1;
    while let Some(child) = node.children.first() {
        // every group sits one pixel right of its parent
        if child.children.first().is_some() {
            assert_eq!(child.bounds.x, 1);
        }
        node = child;
        levels += 1;
    }
    assert_eq!(levels, depth + 1);
    assert_eq!(node.text.as_deref(), Some("bottom"));

    let text = serde_json::to_string(&layout).expect("deep layout should serialize");
    assert_eq!(text.matches(r#""type":"GROUP""#).count(), depth);
    assert!(text.contains(r#""text":"bottom""#));
}
