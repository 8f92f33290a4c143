use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use crate::core::config::FinderConfig;
use crate::core::dom::Element;
use crate::core::github_search::{SearchBackend, SearchOutcome};
use crate::core::render::{NOT_FOUND_CLASS, REPO_CARD_CLASS, SEARCH_ERROR_CLASS};
use crate::core::validation::ERROR_BACKGROUND;
use crate::core::widget::{
    KeyPress, RequestTicket, ResponseDisposition, SearchWidget, WidgetState, TITLE,
};

pub fn format_error(err: anyhow::Error) -> String {
    // Include the full error chain (causes), not just the top context.
    let full = format!("{:#}", err);
    let lower = full.to_lowercase();

    let hint = if lower.contains("failed to resolve")
        || lower.contains("could not resolve")
        || lower.contains("dns")
    {
        Some("Cannot resolve the GitHub API host (DNS). Check your network/proxy.")
    } else if lower.contains("timed out") || lower.contains("timeout") {
        Some("Connecting to GitHub timed out. Check your network/proxy or raise REPO_FINDER_TIMEOUT_SECS.")
    } else if lower.contains("connection refused") || lower.contains("connection reset") {
        Some("Connection to GitHub was refused or reset. Check REPO_FINDER_API_BASE and your network.")
    } else {
        None
    };

    match hint {
        Some(hint) => format!("{}\n\ndetail: {}", hint, full),
        None => full,
    }
}

/// One line of user input, as typed into the terminal front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Replace the input text and press Enter.
    Search(String),
    /// Click Find with whatever the input holds.
    Find,
    Next,
    Previous,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> UserCommand {
    let trimmed = line.trim();
    match trimmed {
        ">" | ":next" | ":n" => UserCommand::Next,
        "<" | ":prev" | ":p" => UserCommand::Previous,
        ":find" | ":f" => UserCommand::Find,
        ":quit" | ":q" => UserCommand::Quit,
        other if other.starts_with(':') => UserCommand::Unknown(other.to_string()),
        other => UserCommand::Search(other.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ViewFormat {
    #[default]
    Text,
    Json,
    Html,
}

#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub format: ViewFormat,
    /// Rewritten with the full page after every render.
    pub html_snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoCardDto {
    pub name: String,
    pub url: String,
    pub owner: String,
    pub owner_url: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub query: String,
    pub state: WidgetState,
    pub offset: i64,
    pub page: u32,
    pub previous_disabled: bool,
    pub next_disabled: bool,
    pub input_flagged: bool,
    pub cards: Vec<RepoCardDto>,
    pub message: Option<String>,
}

fn card_from_element(card: &Element) -> Option<RepoCardDto> {
    let link = card.find_by_class("repo__link")?;
    let owner = card.find_by_class("repo__owner")?;
    let photo = card.find_by_class("repo__owner-photo")?;
    let owner_link = owner.children.first()?;
    let login = owner.children.get(1)?;
    Some(RepoCardDto {
        name: link.text.clone().unwrap_or_default(),
        url: link.attr("href").unwrap_or_default().to_string(),
        owner: login.text.clone().unwrap_or_default(),
        owner_url: owner_link.attr("href").unwrap_or_default().to_string(),
        avatar_url: photo.attr("src").unwrap_or_default().to_string(),
    })
}

pub fn page_view(widget: &SearchWidget) -> PageView {
    let container = widget.container();
    let cards = container
        .children
        .iter()
        .filter(|c| c.has_class(REPO_CARD_CLASS))
        .filter_map(card_from_element)
        .collect();
    let message = container
        .find_by_class(NOT_FOUND_CLASS)
        .or_else(|| container.find_by_class(SEARCH_ERROR_CLASS))
        .and_then(|p| p.text.clone());
    let pagination = widget.pagination();

    PageView {
        query: widget.query().to_string(),
        state: widget.state().clone(),
        offset: pagination.offset(),
        page: pagination.api_page(),
        previous_disabled: widget.controls().previous.disabled,
        next_disabled: widget.controls().next.disabled,
        input_flagged: widget.input().background.as_deref() == Some(ERROR_BACKGROUND),
        cards,
        message,
    }
}

pub fn page_html(widget: &SearchWidget) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\"/>\n  <title>{}</title>\n</head>\n{}</html>\n",
        TITLE,
        widget.document().to_html()
    )
}

pub fn render_text(view: &PageView) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", style(TITLE).bold()));

    let shown_query = if view.query.is_empty() {
        style(crate::core::widget::INPUT_PLACEHOLDER.to_string()).dim()
    } else {
        style(view.query.clone())
    };
    let input = if view.input_flagged {
        style(format!("[ {} ]", shown_query)).on_red()
    } else {
        style(format!("[ {} ]", shown_query))
    };
    out.push_str(&format!("{} [Find]\n", input));

    match &view.state {
        WidgetState::Idle => {}
        WidgetState::Loading { .. } => out.push_str(&format!("{}\n", style("searching...").dim())),
        WidgetState::NotFound | WidgetState::Failed { .. } => {
            if let Some(message) = &view.message {
                out.push_str(&format!("{}\n", style(message).red()));
            }
        }
        WidgetState::Results { .. } => {
            for (i, card) in view.cards.iter().enumerate() {
                out.push_str(&format!(
                    "{:>3}. {}  {}\n     by {}  {}\n",
                    view.offset + i as i64 + 1,
                    style(&card.name).bold(),
                    style(&card.url).cyan(),
                    card.owner,
                    style(&card.owner_url).dim()
                ));
            }
            let control = |label: &str, disabled: bool| {
                if disabled {
                    style(format!("[{}]", label)).dim().to_string()
                } else {
                    format!("[{}]", label)
                }
            };
            out.push_str(&format!(
                "{} page {} {}\n",
                control("<", view.previous_disabled),
                view.page,
                control(">", view.next_disabled)
            ));
        }
    }
    out
}

pub fn render_view(widget: &SearchWidget, format: ViewFormat) -> Result<String> {
    Ok(match format {
        ViewFormat::Text => render_text(&page_view(widget)),
        ViewFormat::Json => {
            let mut json = serde_json::to_string_pretty(&page_view(widget))
                .context("serialize page view")?;
            json.push('\n');
            json
        }
        ViewFormat::Html => page_html(widget),
    })
}

pub enum SessionEvent {
    Line(String),
    Fetched {
        id: u64,
        result: Result<SearchOutcome>,
    },
    InputClosed,
}

pub enum Wake {
    Event(SessionEvent),
    /// A flash deadline passed and the widget was ticked.
    Ticked,
    Closed,
}

/// Owns the widget and routes user commands and search results into it.
///
/// Searches run on worker threads; their results come back on the same
/// channel as user input so the widget is only touched from one thread.
pub struct FinderSession {
    widget: SearchWidget,
    backend: Arc<dyn SearchBackend>,
    tx: Sender<SessionEvent>,
    rx: Receiver<SessionEvent>,
}

impl FinderSession {
    pub fn new(config: &FinderConfig, backend: Arc<dyn SearchBackend>) -> Self {
        let (tx, rx) = channel();
        Self {
            widget: SearchWidget::new(config.paging, config.flash),
            backend,
            tx,
            rx,
        }
    }

    pub fn widget(&self) -> &SearchWidget {
        &self.widget
    }

    /// For feeding input lines from another thread.
    pub fn sender(&self) -> Sender<SessionEvent> {
        self.tx.clone()
    }

    pub fn handle(&mut self, command: &UserCommand, now: Instant) -> Option<RequestTicket> {
        match command {
            UserCommand::Search(text) => {
                self.widget.set_query(text);
                self.widget.key_press(KeyPress::Enter, now)
            }
            UserCommand::Find => self.widget.submit(now),
            UserCommand::Next => self.widget.next_page(),
            UserCommand::Previous => self.widget.previous_page(),
            UserCommand::Quit | UserCommand::Unknown(_) => None,
        }
    }

    pub fn dispatch(&self, ticket: RequestTicket) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = backend.search(&ticket.request);
            // The session may be gone already; nothing to report to.
            let _ = tx.send(SessionEvent::Fetched {
                id: ticket.id,
                result,
            });
        });
    }

    /// Runs the search on the calling thread and renders it.
    pub fn run_blocking(&mut self, ticket: RequestTicket) -> ResponseDisposition {
        let result = self.backend.search(&ticket.request);
        self.deliver(ticket.id, result)
    }

    pub fn deliver(&mut self, id: u64, result: Result<SearchOutcome>) -> ResponseDisposition {
        self.widget.apply_response(id, result)
    }

    /// Blocks for the next event, waking early for a pending flash deadline.
    pub fn wait(&mut self) -> Wake {
        match self.widget.next_deadline() {
            Some(deadline) => {
                let timeout = deadline.saturating_duration_since(Instant::now());
                match self.rx.recv_timeout(timeout) {
                    Ok(event) => Wake::Event(event),
                    Err(RecvTimeoutError::Timeout) => {
                        self.widget.tick(Instant::now());
                        Wake::Ticked
                    }
                    Err(RecvTimeoutError::Disconnected) => Wake::Closed,
                }
            }
            None => match self.rx.recv() {
                Ok(event) => Wake::Event(event),
                Err(_) => Wake::Closed,
            },
        }
    }

    pub fn emit<W: Write>(&self, out: &mut W, options: &ViewOptions) -> Result<()> {
        out.write_all(render_view(&self.widget, options.format)?.as_bytes())
            .context("write view")?;
        out.flush().context("flush view")?;
        if let Some(path) = &options.html_snapshot {
            std::fs::write(path, page_html(&self.widget))
                .with_context(|| format!("write html snapshot {:?}", path))?;
        }
        Ok(())
    }

    /// Event loop for the interactive front-end. Returns on `:quit`, or once
    /// input is closed and nothing is in flight.
    pub fn run_interactive<W: Write>(&mut self, out: &mut W, options: &ViewOptions) -> Result<()> {
        self.emit(out, options)?;
        let mut input_open = true;
        loop {
            if !input_open && !self.widget.is_loading() && !self.widget.is_flashing() {
                break;
            }
            match self.wait() {
                Wake::Event(SessionEvent::Line(line)) => {
                    let command = parse_command(&line);
                    match &command {
                        UserCommand::Quit => break,
                        UserCommand::Unknown(raw) => {
                            writeln!(out, "unknown command {raw}; try :next, :prev, :find or :quit")
                                .context("write view")?;
                            continue;
                        }
                        _ => {}
                    }
                    if let Some(ticket) = self.handle(&command, Instant::now()) {
                        self.dispatch(ticket);
                    }
                    self.emit(out, options)?;
                }
                Wake::Event(SessionEvent::Fetched { id, result }) => {
                    if self.deliver(id, result) == ResponseDisposition::Rendered {
                        self.emit(out, options)?;
                    }
                }
                Wake::Event(SessionEvent::InputClosed) => input_open = false,
                Wake::Ticked => self.emit(out, options)?,
                Wake::Closed => break,
            }
        }
        Ok(())
    }

    /// One-shot search: submit `query`, then press Next until `page` is reached.
    pub fn search_to_page(&mut self, query: &str, page: u32) -> Result<()> {
        let ticket = self
            .handle(&UserCommand::Search(query.to_string()), Instant::now())
            .context("query is empty")?;
        self.run_blocking(ticket);

        for _ in 1..page.max(1) {
            let Some(ticket) = self.handle(&UserCommand::Next, Instant::now()) else {
                log::warn!(
                    "[commands] no page after offset {}; stopping",
                    self.widget.pagination().offset()
                );
                break;
            };
            self.run_blocking(ticket);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/commands.rs"]
mod tests;
