//! Clipboard copy with transient acknowledgments
//!
//! Each successful copy marks its key as "copied" until an explicit expiry
//! instant. Callers pass `now` in, so expiry is checked on access or swept,
//! never driven by timers.

use std::collections::HashMap;
use std::io::Write;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use tracing::debug;

use crate::error::ClipboardError;

/// Default acknowledgment window
pub const DEFAULT_ACK_WINDOW: Duration = Duration::from_millis(3000);

/// Something that can put text on the system clipboard.
#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard via the OSC 52 terminal escape sequence.
/// Works in most modern terminals (kitty, WezTerm, iTerm2, foot, tmux with `set-clipboard on`).
#[derive(Debug, Default, Clone, Copy)]
pub struct Osc52Clipboard;

impl Osc52Clipboard {
    /// The escape sequence that sets the clipboard to `text`
    pub fn sequence(text: &str) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
        format!("\x1b]52;c;{}\x07", encoded)
    }
}

#[async_trait]
impl ClipboardWriter for Osc52Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut stdout = std::io::stdout();
        stdout.write_all(Self::sequence(text).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Keys currently showing a "copied" acknowledgment, each with its own expiry.
#[derive(Debug, Clone)]
pub struct CopyAcknowledgments {
    window: Duration,
    expiries: HashMap<String, Instant>,
}

impl Default for CopyAcknowledgments {
    fn default() -> Self {
        Self::new(DEFAULT_ACK_WINDOW)
    }
}

impl CopyAcknowledgments {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            expiries: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Mark `key` copied; restarts the window if already present.
    pub fn acknowledge(&mut self, key: &str, now: Instant) {
        self.expiries.insert(key.to_string(), now + self.window);
    }

    pub fn is_copied(&self, key: &str, now: Instant) -> bool {
        self.expiries.get(key).is_some_and(|expiry| now < *expiry)
    }

    /// Active keys, sorted
    pub fn active_keys(&self, now: Instant) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .expiries
            .iter()
            .filter(|(_, expiry)| now < **expiry)
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Drop expired keys. Returns how many were removed.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let before = self.expiries.len();
        self.expiries.retain(|_, expiry| now < *expiry);
        before - self.expiries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expiries.is_empty()
    }
}

pub struct ClipboardService<C: ClipboardWriter> {
    writer: C,
    acks: CopyAcknowledgments,
}

impl<C: ClipboardWriter> ClipboardService<C> {
    pub fn new(writer: C, window: Duration) -> Self {
        Self {
            writer,
            acks: CopyAcknowledgments::new(window),
        }
    }

    /// Copy `text`; on success acknowledge `key`. Failures are swallowed.
    pub async fn copy(&mut self, text: &str, key: &str, now: Instant) -> bool {
        match self.writer.write_text(text).await {
            Ok(()) => {
                self.acks.acknowledge(key, now);
                debug!(key, "Copied to clipboard");
                true
            }
            Err(e) => {
                debug!(key, error = %e, "Clipboard write failed");
                false
            }
        }
    }

    pub fn is_copied(&self, key: &str, now: Instant) -> bool {
        self.acks.is_copied(key, now)
    }

    pub fn sweep(&mut self, now: Instant) -> usize {
        self.acks.sweep(now)
    }

    pub fn acknowledgments(&self) -> &CopyAcknowledgments {
        &self.acks
    }

    pub fn writer(&self) -> &C {
        &self.writer
    }
}
