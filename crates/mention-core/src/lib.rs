#![warn(missing_docs)]
//! Mention Core - Headless `@`-mention engine
//!
//! # Overview
//!
//! `mention-core` implements everything behind a mention-enabled text field except drawing it:
//! the user types `@`, sees a ranked list of candidate people, picks one, and the text plus a
//! parallel list of mention spans stay consistent while the user keeps editing around them.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  MentionField (one per editable buffer)     │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Render Splitter (segments)                 │  ← Rendering Data
//! ├─────────────────────────────────────────────┤
//! │  Mention Span Model (commit + reconcile)    │  ← Span Tracking
//! ├─────────────────────────────────────────────┤
//! │  Selection Navigator                        │  ← Dropdown State
//! ├─────────────────────────────────────────────┤
//! │  Candidate Matcher / Directory / Lookups    │  ← Candidates
//! ├─────────────────────────────────────────────┤
//! │  Trigger Scanner                            │  ← Input Analysis
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use mention_core::{
//!     Candidate, MentionField, MentionOptions, NavigationKey, Segment, StaticDirectory,
//! };
//! use std::sync::Arc;
//!
//! let directory = StaticDirectory::new(vec![
//!     Candidate::new("u1", "Ana Souza").with_secondary_label("Legal"),
//!     Candidate::new("u2", "Bruno Lima").with_secondary_label("Procurement"),
//! ]);
//! let mut field = MentionField::new(Arc::new(directory), MentionOptions::default());
//!
//! field.insert_text("please review @br");
//! assert_eq!(field.navigator().candidates().len(), 1);
//! field.handle_key(NavigationKey::Enter);
//! field.insert_text("today");
//!
//! assert_eq!(field.text(), "please review @Bruno today");
//! let message = field.to_message();
//! assert_eq!(message.recipients(), vec!["u2"]);
//!
//! let segments = field.segments();
//! assert_eq!(segments[1], Segment::Mention { text: "@Bruno".into(), entity_id: "u2".into() });
//! ```
//!
//! # Module Description
//!
//! - [`scanner`] - detects an active `@` trigger before the caret
//! - [`matcher`] - filters and pages directory results
//! - [`directory`] - the injected candidate source
//! - [`lookup`] - ordering of asynchronous lookups
//! - [`navigator`] - dropdown highlight state machine
//! - [`mentions`] - committed spans and their reconciliation with edits
//! - [`segments`] - render splitting for live and stored text
//! - [`message`] - the persisted `{ text, mentions }` shape
//! - [`field`] - per-field session tying the layers together
//!
//! # Offsets
//!
//! Every offset is a Unicode scalar value (`char`) offset. [`StoredMessage::to_encoding`]
//! converts persisted offsets to UTF-16 code units for hosts that index strings that way.

pub mod candidate;
pub mod delta;
pub mod directory;
pub mod error;
pub mod field;
pub mod lookup;
pub mod matcher;
pub mod mentions;
pub mod message;
pub mod navigator;
pub mod options;
pub mod scanner;
pub mod segments;
mod text;

pub use candidate::{Candidate, LiteralStyle};
pub use delta::TextEdit;
pub use directory::{CandidateDirectory, StaticDirectory};
pub use error::{DirectoryError, MentionError};
pub use field::{
    KeyHandling, MentionField, SharedDirectory, TextChange, TextChangeCallback, TextChangeKind,
};
pub use lookup::{LookupSequencer, LookupTicket, PendingLookup};
pub use matcher::{CandidateMatcher, DEFAULT_PAGE_SIZE, highlight_ranges};
pub use mentions::{Commit, Mention, MentionSet, commit_mention};
pub use message::{OffsetEncoding, StoredMention, StoredMessage};
pub use navigator::{NavigationKey, Navigator, NavigatorCommand, NavigatorState};
pub use options::MentionOptions;
pub use scanner::{ScanOptions, TriggerContext, scan, scan_with};
pub use segments::{MentionSpan, Segment, render_segments, split};
pub use text::{char_len, char_offset_to_utf16, char_slice, utf16_offset_to_char};
