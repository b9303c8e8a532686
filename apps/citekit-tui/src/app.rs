//! Application state and key handling
//!
//! `App` is synchronous: key presses turn into [`Effect`]s that the event
//! loop in `main.rs` carries out (spawning lookups, writing the clipboard).

use std::time::Instant;

use crossterm::event::{KeyCode, KeyModifiers};

use citekit_core::{
    CitationResult, CitationStyle, ClipboardService, ClipboardWriter, FetchError, FetchState,
    FetchTicket, HistoryStorage, HistoryStore,
};

use crate::focus::Focus;
use crate::keybindings::{self, Action, KeyContext};

/// Where copied text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOrigin {
    Result,
    History,
}

/// Work the event loop must perform after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Quit,
    Fetch {
        ticket: FetchTicket,
        doi: String,
    },
    Copy {
        text: String,
        key: String,
        origin: CopyOrigin,
    },
}

/// Main application state
pub struct App<S: HistoryStorage, C: ClipboardWriter> {
    /// Focused panel
    pub focus: Focus,
    /// DOI input buffer
    pub input: String,
    /// Current lookup state
    pub fetch: FetchState,
    /// Past lookups
    pub history: HistoryStore<S>,
    /// Clipboard with copy acknowledgments
    pub clipboard: ClipboardService<C>,
    /// Format used by copy shortcuts and highlighted in panels
    pub selected_format: CitationStyle,
    /// Highlighted history row
    pub selected_history: usize,
    /// Status message
    pub status_message: Option<String>,
    /// Whether to show the help overlay
    pub show_help: bool,
}

impl<S: HistoryStorage, C: ClipboardWriter> App<S, C> {
    pub fn new(
        history: HistoryStore<S>,
        clipboard: ClipboardService<C>,
        default_style: CitationStyle,
    ) -> Self {
        Self {
            focus: Focus::Input,
            input: String::new(),
            fetch: FetchState::new(),
            history,
            clipboard,
            selected_format: default_style,
            selected_history: 0,
            status_message: None,
            show_help: false,
        }
    }

    fn key_context(&self) -> KeyContext {
        KeyContext {
            focus: self.focus,
            input_blank: self.input.trim().is_empty(),
            loading: self.fetch.is_loading(),
            has_result: self.fetch.result().is_some(),
        }
    }

    /// Handle a key press
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Option<Effect> {
        if self.show_help {
            self.show_help = false;
            return None;
        }
        let action = keybindings::resolve(code, modifiers, self.key_context())?;
        self.handle_action(action)
    }

    pub fn handle_action(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Quit => return Some(Effect::Quit),
            Action::Submit => {
                let ticket = self.fetch.begin();
                self.status_message = Some("Fetching citation...".to_string());
                return Some(Effect::Fetch {
                    ticket,
                    doi: self.input.clone(),
                });
            }
            Action::ClearForm => {
                self.input.clear();
                self.fetch.clear();
                self.status_message = None;
            }
            Action::FocusInput => self.focus = Focus::Input,
            Action::NextPanel => self.focus = self.focus.next(),
            Action::CopySelected => {
                let style = self.selected_format;
                if let Some(citations) = self.fetch.citations() {
                    return Some(Effect::Copy {
                        text: citations.get(style).to_string(),
                        key: format!("shortcut-{}", style.as_str()),
                        origin: CopyOrigin::Result,
                    });
                }
            }
            Action::CopyHistory => {
                let style = self.selected_format;
                if let Some(entry) = self.history.get(self.selected_history) {
                    return Some(Effect::Copy {
                        text: entry.citations.get(style).to_string(),
                        key: history_copy_key(&entry.id, style),
                        origin: CopyOrigin::History,
                    });
                }
            }
            Action::NextFormat => self.selected_format = self.selected_format.next(),
            Action::PrevFormat => self.selected_format = self.selected_format.prev(),
            Action::HistoryUp => {
                self.selected_history = self.selected_history.saturating_sub(1);
            }
            Action::HistoryDown => {
                if self.selected_history + 1 < self.history.len() {
                    self.selected_history += 1;
                }
            }
            Action::ClearHistory => {
                self.selected_history = 0;
                self.status_message = Some(match self.history.clear() {
                    Ok(()) => "History cleared".to_string(),
                    Err(e) => {
                        tracing::warn!(error = %e, "Could not persist cleared history");
                        "History cleared (not saved)".to_string()
                    }
                });
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::Insert(c) => self.input.push(c),
            Action::Backspace => {
                self.input.pop();
            }
        }
        None
    }

    /// Apply a finished lookup; successful, current results go to history.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<CitationResult, FetchError>,
    ) {
        if !self.fetch.apply(ticket, outcome) {
            return;
        }

        self.status_message = self.fetch.error().map(str::to_string);
        if let Some(result) = self.fetch.result() {
            if let Err(e) = self.history.save_result(result) {
                tracing::warn!(error = %e, "Could not persist history");
            }
            self.selected_history = 0;
            self.focus = Focus::Result;
        }
    }

    /// Copy through the clipboard service and report in the status line
    pub async fn copy(&mut self, text: &str, key: &str, origin: CopyOrigin, now: Instant) {
        if self.clipboard.copy(text, key, now).await {
            let suffix = match origin {
                CopyOrigin::Result => "",
                CopyOrigin::History => " from history",
            };
            self.status_message = Some(format!(
                "Copied {} citation{}",
                self.selected_format, suffix
            ));
        }
    }

    /// Periodic housekeeping: expire copy acknowledgments
    pub fn tick(&mut self, now: Instant) {
        self.clipboard.sweep(now);
    }

    pub fn is_copied(&self, key: &str, now: Instant) -> bool {
        self.clipboard.is_copied(key, now)
    }
}

/// Acknowledgment key for a history item's format
pub fn history_copy_key(id: &str, style: CitationStyle) -> String {
    format!("history-{}-{}", id, style.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use citekit_core::config::HistoryConfig;
    use citekit_core::{
        generate_citations, CitationResult, ClipboardError, MemoryStorage,
        NormalizedCitationView, RawMetadataRecord,
    };
    use std::time::Duration;

    struct NullClipboard;

    #[async_trait]
    impl ClipboardWriter for NullClipboard {
        async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
            Ok(())
        }
    }

    fn app() -> App<MemoryStorage, NullClipboard> {
        let history = HistoryStore::open(MemoryStorage::new(), &HistoryConfig::default());
        let clipboard = ClipboardService::new(NullClipboard, Duration::from_millis(3000));
        App::new(history, clipboard, CitationStyle::Apa)
    }

    fn result(doi: &str) -> CitationResult {
        let record = RawMetadataRecord {
            doi: Some(doi.into()),
            title: Some("A title".into()),
            ..Default::default()
        };
        CitationResult {
            doi: doi.to_string(),
            view: NormalizedCitationView::from_record(&record),
            citations: generate_citations(&record),
            record,
        }
    }

    fn type_text(app: &mut App<MemoryStorage, NullClipboard>, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn test_submit_issues_fetch_with_input() {
        let mut app = app();
        type_text(&mut app, "10.1/x");
        let effect = app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        match effect {
            Some(Effect::Fetch { doi, .. }) => assert_eq!(doi, "10.1/x"),
            other => panic!("unexpected effect {:?}", other),
        }
        assert!(app.fetch.is_loading());

        // A second Enter while loading does nothing
        assert_eq!(app.handle_key(KeyCode::Enter, KeyModifiers::NONE), None);
    }

    #[test]
    fn test_result_goes_to_history_once_applied() {
        let mut app = app();
        type_text(&mut app, "10.1/x");
        let Some(Effect::Fetch { ticket, .. }) = app.handle_key(KeyCode::Enter, KeyModifiers::NONE)
        else {
            panic!("expected fetch");
        };

        app.finish_fetch(ticket, Ok(result("10.1/x")));
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.focus, Focus::Result);
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut app = app();
        type_text(&mut app, "10.1/x");
        let first = app.fetch.begin();
        let second = app.fetch.begin();

        app.finish_fetch(second, Err(FetchError::NotFound));
        app.finish_fetch(first, Ok(result("10.1/old")));

        assert!(app.history.is_empty());
        assert_eq!(app.status_message.as_deref(), Some("DOI not found or invalid"));
    }

    #[test]
    fn test_escape_clears_form() {
        let mut app = app();
        type_text(&mut app, "10.1/x");
        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.input.is_empty());
        assert!(app.fetch.result().is_none());
    }

    #[test]
    fn test_shortcut_copy_uses_selected_format() {
        let mut app = app();
        let ticket = app.fetch.begin();
        app.finish_fetch(ticket, Ok(result("10.1/x")));
        app.handle_key(KeyCode::Right, KeyModifiers::NONE);

        let effect = app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let expected = app.fetch.citations().unwrap().ieee.clone();
        assert_eq!(
            effect,
            Some(Effect::Copy {
                text: expected,
                key: "shortcut-ieee".to_string(),
                origin: CopyOrigin::Result,
            })
        );
    }

    #[tokio::test]
    async fn test_history_copy_names_its_origin() {
        let mut app = app();
        let ticket = app.fetch.begin();
        app.finish_fetch(ticket, Ok(result("10.1/x")));
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.focus, Focus::History);

        let Some(Effect::Copy { text, key, origin }) =
            app.handle_key(KeyCode::Char('c'), KeyModifiers::NONE)
        else {
            panic!("expected copy");
        };
        assert_eq!(origin, CopyOrigin::History);
        assert!(key.starts_with("history-"));

        app.copy(&text, &key, origin, Instant::now()).await;
        assert_eq!(
            app.status_message.as_deref(),
            Some("Copied APA citation from history")
        );
    }

    #[tokio::test]
    async fn test_copy_acknowledgment_expires_on_tick() {
        let mut app = app();
        let t0 = Instant::now();
        app.copy("text", "shortcut-apa", CopyOrigin::Result, t0).await;
        assert!(app.is_copied("shortcut-apa", t0));

        app.tick(t0 + Duration::from_millis(3000));
        assert!(!app.is_copied("shortcut-apa", t0 + Duration::from_millis(3000)));
    }

    #[test]
    fn test_history_copy_key_is_scoped() {
        assert_eq!(
            history_copy_key("abc", CitationStyle::Chicago),
            "history-abc-chicago"
        );
    }
}
