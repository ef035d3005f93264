//! Transcript Loading
//!
//! A transcript is JSON Lines: each non-blank line is either an inbound agent
//! message or a turn marker.
//!
//! ```text
//! {"id":"m-1","author":"bot","content":{"role":"model","parts":[{"text":"hi"}]}}
//! {"turn_complete": true}
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use chat_panel_core::{Message, TransportEvent};

/// One transcript line as written on disk
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranscriptLine {
    /// `{"turn_complete": true}`
    TurnMarker { turn_complete: bool },
    /// Any inbound agent message
    Message(Box<Message>),
}

/// Parse transcript text into transport events
///
/// Blank lines are skipped; a `turn_complete: false` marker produces no
/// event.
pub fn parse(text: &str) -> Result<Vec<TransportEvent>> {
    let mut events = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parsed: TranscriptLine = serde_json::from_str(line)
            .with_context(|| format!("Invalid transcript entry on line {}", index + 1))?;

        match parsed {
            TranscriptLine::TurnMarker { turn_complete: true } => {
                events.push(TransportEvent::TurnComplete);
            }
            TranscriptLine::TurnMarker { turn_complete: false } => {}
            TranscriptLine::Message(message) => events.push(TransportEvent::Message(*message)),
        }
    }

    Ok(events)
}

/// Read and parse a transcript file
pub fn load(path: &Path) -> Result<Vec<TransportEvent>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {path:?}"))?;
    parse(&text).with_context(|| format!("Failed to parse transcript: {path:?}"))
}
