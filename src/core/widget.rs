use std::time::{Duration, Instant};

use anyhow::Result;
use serde::Serialize;

use super::dom::{create, Element, ElementKind};
use super::github_search::{SearchOutcome, SearchPage, SearchRequest};
use super::pagination::{slice_page, Pagination, PagingMode};
use super::render::{render_failure, render_not_found, render_results, PagerControls};
use super::search_error::{classify_failure, FailureKind};
use super::validation::{is_blank, InputFlash};

pub const TITLE: &str = "RepoFinder";
pub const INPUT_PLACEHOLDER: &str = "input repository name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WidgetState {
    Idle,
    Loading { request_id: u64 },
    Results { shown: usize },
    NotFound,
    Failed { kind: FailureKind, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Enter,
    Char(char),
    Backspace,
}

/// One dispatched search. The id only grows; see [`SearchWidget::apply_response`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub id: u64,
    pub request: SearchRequest,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDisposition {
    Rendered,
    Stale,
}

/// The search widget: page fixtures plus the request/render state machine.
///
/// No IO happens here. Handlers return a [`RequestTicket`] when a search must
/// be dispatched, and the caller hands the outcome back to `apply_response`.
#[derive(Debug, Clone)]
pub struct SearchWidget {
    title: Element,
    input: Element,
    submit: Element,
    container: Element,
    controls: PagerControls,
    flash: InputFlash,
    paging: PagingMode,
    pagination: Pagination,
    active_query: Option<String>,
    state: WidgetState,
    last_issued: u64,
    pending: Option<RequestTicket>,
}

impl SearchWidget {
    pub fn new(paging: PagingMode, flash: Duration) -> Self {
        let title = create(ElementKind::H1, "header-title").with_text(TITLE);
        let input = create(ElementKind::Input, "form__input")
            .with_attr("type", "text")
            .with_attr("placeholder", INPUT_PLACEHOLDER);
        let submit = create(ElementKind::Button, "form__submit-btn")
            .with_attr("type", "submit")
            .with_text("Find");

        Self {
            title,
            input,
            submit,
            container: create(ElementKind::Div, "container"),
            controls: PagerControls::new(),
            flash: InputFlash::new(flash),
            paging,
            pagination: Pagination::first(),
            active_query: None,
            state: WidgetState::Idle,
            last_issued: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn paging(&self) -> PagingMode {
        self.paging
    }

    pub fn query(&self) -> &str {
        self.input.attr("value").unwrap_or("")
    }

    pub fn input(&self) -> &Element {
        &self.input
    }

    pub fn container(&self) -> &Element {
        &self.container
    }

    pub fn controls(&self) -> &PagerControls {
        &self.controls
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, WidgetState::Loading { .. })
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_active()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.flash.deadline()
    }

    pub fn set_query(&mut self, value: &str) {
        self.input.set_attr("value", value);
    }

    /// Find button / Enter key.
    pub fn submit(&mut self, now: Instant) -> Option<RequestTicket> {
        let query = self.query().to_string();
        if is_blank(&query) {
            log::info!("[widget] empty query; flashing input");
            self.flash.trigger(&mut self.input, now);
            return None;
        }

        let query = query.trim().to_string();
        if self.active_query.as_deref() != Some(query.as_str()) {
            self.pagination = Pagination::first();
            self.active_query = Some(query);
        }
        Some(self.issue())
    }

    pub fn key_press(&mut self, key: KeyPress, now: Instant) -> Option<RequestTicket> {
        match key {
            KeyPress::Enter => self.submit(now),
            KeyPress::Char(ch) => {
                let mut value = self.query().to_string();
                value.push(ch);
                self.set_query(&value);
                None
            }
            KeyPress::Backspace => {
                let mut value = self.query().to_string();
                value.pop();
                self.set_query(&value);
                None
            }
        }
    }

    /// No-op while the control is disabled or before any query was submitted.
    pub fn next_page(&mut self) -> Option<RequestTicket> {
        if self.controls.next.disabled || self.active_query.is_none() {
            return None;
        }
        self.pagination = self.pagination.next();
        Some(self.issue())
    }

    pub fn previous_page(&mut self) -> Option<RequestTicket> {
        if self.controls.previous.disabled || self.active_query.is_none() {
            return None;
        }
        self.pagination = self.pagination.previous();
        Some(self.issue())
    }

    /// Renders `result` if `ticket_id` is the latest issued request; older
    /// responses are dropped.
    pub fn apply_response(
        &mut self,
        ticket_id: u64,
        result: Result<SearchOutcome>,
    ) -> ResponseDisposition {
        let ticket = match &self.pending {
            Some(t) if t.id == ticket_id => t.clone(),
            _ => {
                log::info!(
                    "[widget] dropping stale response #{} (latest #{})",
                    ticket_id,
                    self.last_issued
                );
                return ResponseDisposition::Stale;
            }
        };
        self.pending = None;

        match result {
            Ok(SearchOutcome::Unprocessable) => {
                render_not_found(&mut self.container, &mut self.controls);
                self.state = WidgetState::NotFound;
            }
            Ok(SearchOutcome::Found(page)) => self.render_page(&page, ticket.pagination),
            Err(err) => {
                let failure = classify_failure(&err);
                render_failure(&mut self.container, &mut self.controls, &failure);
                if failure.kind == FailureKind::Fatal {
                    self.active_query = None;
                    self.pagination = Pagination::first();
                }
                self.state = WidgetState::Failed {
                    kind: failure.kind,
                    message: failure.message,
                };
            }
        }
        ResponseDisposition::Rendered
    }

    /// Advances the validation flash. Returns true if the page changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.flash.tick(&mut self.input, now)
    }

    /// The whole page as one element tree.
    pub fn document(&self) -> Element {
        Element::new(ElementKind::Body)
            .with_child(Element::new(ElementKind::Header).with_child(self.title.clone()))
            .with_child(
                create(ElementKind::Form, "form-container")
                    .with_child(self.input.clone())
                    .with_child(self.submit.clone()),
            )
            .with_child(self.container.clone())
    }

    fn issue(&mut self) -> RequestTicket {
        self.last_issued += 1;
        let query = self.active_query.clone().unwrap_or_default();
        let request = match self.paging {
            PagingMode::Server => SearchRequest {
                query,
                page: Some(self.pagination.api_page()),
                per_page: Some(self.pagination.page_size() as u32),
            },
            PagingMode::Client => SearchRequest {
                query,
                page: None,
                per_page: None,
            },
        };
        let ticket = RequestTicket {
            id: self.last_issued,
            request,
            pagination: self.pagination,
        };
        log::info!(
            "[widget] request #{} q={:?} offset={}",
            ticket.id,
            ticket.request.query,
            ticket.pagination.offset()
        );
        self.state = WidgetState::Loading {
            request_id: ticket.id,
        };
        self.pending = Some(ticket.clone());
        ticket
    }

    fn render_page(&mut self, page: &SearchPage, pagination: Pagination) {
        let fetched_any = !page.items.is_empty();
        let (window, exhausted) = match self.paging {
            PagingMode::Server => (
                page.items.as_slice(),
                page.total_count
                    .is_some_and(|total| pagination.reaches_total(total)),
            ),
            PagingMode::Client => {
                let (start, end) = pagination.slice_bounds();
                (slice_page(&page.items, start, end), false)
            }
        };

        let shown = render_results(
            &mut self.container,
            &mut self.controls,
            window,
            fetched_any,
            pagination,
            exhausted,
        );
        self.state = if fetched_any {
            WidgetState::Results { shown }
        } else {
            WidgetState::NotFound
        };
    }
}

#[cfg(test)]
#[path = "tests/widget.rs"]
mod tests;
