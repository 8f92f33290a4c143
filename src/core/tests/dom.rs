use super::*;

#[test]
fn create_applies_single_class() {
    let el = create(ElementKind::Button, "left-btn");
    assert_eq!(el.kind, ElementKind::Button);
    assert_eq!(el.classes, vec!["left-btn".to_string()]);
    assert!(el.children.is_empty());
    assert!(!el.disabled);
}

#[test]
fn set_attr_replaces_existing_value() {
    let mut el = Element::new(ElementKind::Input).with_attr("value", "a");
    el.set_attr("value", "b");
    assert_eq!(el.attr("value"), Some("b"));
    assert_eq!(el.attributes.len(), 1);
}

#[test]
fn clear_drops_children_and_text() {
    let mut el = create(ElementKind::Div, "container")
        .with_text("old")
        .with_child(create(ElementKind::P, "not-found"));
    el.clear();
    assert!(el.children.is_empty());
    assert!(el.text.is_none());
}

#[test]
fn find_and_count_walk_the_tree() {
    let tree = create(ElementKind::Div, "container")
        .with_child(create(ElementKind::Div, "repo").with_child(create(ElementKind::A, "repo__link")))
        .with_child(create(ElementKind::Div, "repo"));
    assert_eq!(tree.count_by_class("repo"), 2);
    assert!(tree.find_by_class("repo__link").is_some());
    assert!(tree.find_by_class("missing").is_none());
}

#[test]
fn html_escapes_text_and_attributes() {
    let el = create(ElementKind::A, "repo__link")
        .with_attr("href", "https://github.com/a/b?x=1&y=\"2\"")
        .with_text("<script>");
    let html = el.to_html();
    assert!(html.contains("href=\"https://github.com/a/b?x=1&amp;y=&quot;2&quot;\""), "{html}");
    assert!(html.contains("&lt;script&gt;"), "{html}");
    assert!(!html.contains("<script>"), "{html}");
}

#[test]
fn html_marks_disabled_and_void_elements() {
    let button = create(ElementKind::Button, "right-btn").with_text(">");
    let mut disabled = button.clone();
    disabled.disabled = true;
    assert_eq!(button.to_html(), "<button class=\"right-btn\">&gt;</button>\n");
    assert_eq!(
        disabled.to_html(),
        "<button class=\"right-btn\" disabled>&gt;</button>\n"
    );

    let img = create(ElementKind::Img, "repo__owner-photo").with_attr("src", "x.png");
    assert_eq!(img.to_html(), "<img class=\"repo__owner-photo\" src=\"x.png\"/>\n");
}

#[test]
fn html_includes_inline_background() {
    let mut input = create(ElementKind::Input, "form__input");
    input.background = Some("red".to_string());
    assert!(input.to_html().contains("style=\"background: red\""));
}
