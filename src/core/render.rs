use super::dom::{create, Element, ElementKind};
use super::github_search::RepoItem;
use super::pagination::Pagination;
use super::search_error::SearchFailure;

pub const NOT_FOUND_TEXT: &str = "NOT FOUND";

pub const REPO_CARD_CLASS: &str = "repo";
pub const NOT_FOUND_CLASS: &str = "not-found";
pub const SEARCH_ERROR_CLASS: &str = "search-error";

/// The Previous/Next buttons; they live outside the container and are
/// re-appended after each render because the container is rebuilt.
#[derive(Debug, Clone, PartialEq)]
pub struct PagerControls {
    pub previous: Element,
    pub next: Element,
}

impl PagerControls {
    pub fn new() -> Self {
        Self {
            previous: create(ElementKind::Button, "left-btn").with_text("<"),
            next: create(ElementKind::Button, "right-btn").with_text(">"),
        }
    }

    fn disable_both(&mut self) {
        self.previous.disabled = true;
        self.next.disabled = true;
    }
}

impl Default for PagerControls {
    fn default() -> Self {
        Self::new()
    }
}

pub fn repo_card(item: &RepoItem) -> Element {
    let title = Element::new(ElementKind::H2).with_child(
        create(ElementKind::A, "repo__link")
            .with_attr("href", &item.repo_url())
            .with_attr("target", "_blank")
            .with_text(&item.name),
    );

    let owner = create(ElementKind::Div, "repo__owner")
        .with_child(
            Element::new(ElementKind::A)
                .with_attr("href", &item.owner_url())
                .with_attr("target", "_blank")
                .with_child(
                    create(ElementKind::Img, "repo__owner-photo")
                        .with_attr("src", &item.owner_avatar_url),
                ),
        )
        .with_child(Element::new(ElementKind::H3).with_text(&item.owner_login));

    create(ElementKind::Div, REPO_CARD_CLASS)
        .with_child(title)
        .with_child(owner)
}

pub fn render_not_found(container: &mut Element, controls: &mut PagerControls) {
    container.clear();
    container.append(create(ElementKind::P, NOT_FOUND_CLASS).with_text(NOT_FOUND_TEXT));
    controls.disable_both();
}

pub fn render_failure(
    container: &mut Element,
    controls: &mut PagerControls,
    failure: &SearchFailure,
) {
    container.clear();
    container.append(create(ElementKind::P, SEARCH_ERROR_CLASS).with_text(&failure.message));
    controls.disable_both();
}

/// Renders `items` as cards for the window at `pagination`.
///
/// `fetched_any` is whether the response held any items at all; an empty
/// response means NOT FOUND even when the window itself would be empty.
/// `exhausted` marks a window known to be the last one. Returns the number
/// of cards rendered.
pub fn render_results(
    container: &mut Element,
    controls: &mut PagerControls,
    items: &[RepoItem],
    fetched_any: bool,
    pagination: Pagination,
    exhausted: bool,
) -> usize {
    container.clear();
    if !fetched_any {
        render_not_found(container, controls);
        return 0;
    }

    let shown = items.len().min(pagination.page_size() as usize);
    for item in &items[..shown] {
        container.append(repo_card(item));
    }

    controls.previous.disabled = pagination.is_first();
    controls.next.disabled = (shown as i64) < pagination.page_size() || exhausted;
    container.append(controls.previous.clone());
    container.append(controls.next.clone());
    shown
}

#[cfg(test)]
#[path = "tests/render.rs"]
mod tests;
