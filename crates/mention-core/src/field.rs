//! One mention-enabled text field.
//!
//! [`MentionField`] owns everything the engine tracks for a single editable buffer: the text
//! (a [`Rope`]), the caret, the current [`TriggerContext`], the dropdown [`Navigator`] and the
//! buffer's [`MentionSet`]. Each on-screen field gets its own instance; nothing is shared
//! between fields except the injected directory.
//!
//! # Data flow
//!
//! 1. Every text change or caret move re-runs the trigger scan.
//! 2. When the trigger query changes, candidates are looked up and the navigator reopens at
//!    row 0 (or closes if nothing matched).
//! 3. Confirming a candidate splices the literal into the text and registers a span.
//! 4. Subscribers are notified after every text change with the text and current mentions.
//!
//! # Example
//!
//! ```rust
//! use mention_core::{Candidate, MentionField, MentionOptions, NavigationKey, StaticDirectory};
//! use std::sync::Arc;
//!
//! let directory = StaticDirectory::new(vec![Candidate::new("u1", "Ana Souza")]);
//! let mut field = MentionField::new(Arc::new(directory), MentionOptions::default());
//!
//! field.insert_text("Hi @A");
//! assert!(field.navigator().is_open());
//!
//! field.handle_key(NavigationKey::Enter);
//! assert_eq!(field.text(), "Hi @Ana ");
//! assert_eq!(field.mentions().len(), 1);
//! ```

use crate::candidate::Candidate;
use crate::delta::TextEdit;
use crate::directory::CandidateDirectory;
use crate::error::{DirectoryError, MentionError};
use crate::lookup::{LookupSequencer, LookupTicket, PendingLookup};
use crate::matcher::CandidateMatcher;
use crate::mentions::{Mention, MentionSet};
use crate::message::StoredMessage;
use crate::navigator::{NavigationKey, Navigator, NavigatorCommand};
use crate::options::MentionOptions;
use crate::scanner::{TriggerContext, scan_with};
use crate::segments::{Segment, split};
use ropey::Rope;
use std::sync::Arc;

/// A shareable directory handle.
pub type SharedDirectory = Arc<dyn CandidateDirectory + Send + Sync>;

/// What produced a [`TextChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextChangeKind {
    /// A keystroke, deletion or host-side replacement.
    Edit,
    /// A confirmed candidate was spliced in.
    Commit,
    /// The whole buffer was replaced by a stored message or cleared.
    Load,
}

/// Notification payload passed to subscribers after every text change.
#[derive(Debug)]
pub struct TextChange<'a> {
    /// What produced the change.
    pub kind: TextChangeKind,
    /// Current text.
    pub text: &'a str,
    /// Current mentions.
    pub mentions: &'a MentionSet,
    /// Caret char offset.
    pub caret: usize,
    /// Field version after the change.
    pub version: u64,
    /// Mentions invalidated by this change.
    pub dropped: &'a [Mention],
}

/// Text change callback type.
pub type TextChangeCallback = Box<dyn FnMut(&TextChange<'_>) + Send>;

/// Whether a key was consumed by the dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyHandling {
    /// The dropdown handled the key; the host must not apply its default behavior.
    Handled,
    /// The dropdown is closed; the host should handle the key itself.
    Ignored,
}

/// Mention engine state for one editable text field.
pub struct MentionField {
    buffer: Rope,
    caret: usize,
    options: MentionOptions,
    matcher: CandidateMatcher,
    directory: Option<SharedDirectory>,
    trigger: TriggerContext,
    navigator: Navigator,
    mentions: MentionSet,
    sequencer: LookupSequencer,
    pending: Option<PendingLookup>,
    version: u64,
    callbacks: Vec<TextChangeCallback>,
}

impl MentionField {
    /// Create an empty field that queries `directory` synchronously on every query change.
    pub fn new(directory: SharedDirectory, options: MentionOptions) -> Self {
        Self::with_directory(Some(directory), options)
    }

    /// Create an empty field whose lookups are run by the host.
    ///
    /// Query changes queue a [`PendingLookup`] (see [`take_pending_lookup`]); the host answers
    /// with [`complete_lookup`]. Responses for superseded queries are discarded.
    ///
    /// [`take_pending_lookup`]: MentionField::take_pending_lookup
    /// [`complete_lookup`]: MentionField::complete_lookup
    pub fn deferred(options: MentionOptions) -> Self {
        Self::with_directory(None, options)
    }

    fn with_directory(directory: Option<SharedDirectory>, options: MentionOptions) -> Self {
        Self {
            buffer: Rope::new(),
            caret: 0,
            matcher: CandidateMatcher::new(options.page_size),
            options,
            directory,
            trigger: TriggerContext::inactive(),
            navigator: Navigator::new(),
            mentions: MentionSet::new(),
            sequencer: LookupSequencer::new(),
            pending: None,
            version: 0,
            callbacks: Vec::new(),
        }
    }

    /// Current text.
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    /// Text length in chars.
    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    /// Caret char offset.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Current trigger context.
    pub fn trigger(&self) -> &TriggerContext {
        &self.trigger
    }

    /// Dropdown state.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Committed mentions.
    pub fn mentions(&self) -> &MentionSet {
        &self.mentions
    }

    /// Field options.
    pub fn options(&self) -> &MentionOptions {
        &self.options
    }

    /// Version number, incremented on every text change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Segments for the live preview.
    pub fn segments(&self) -> Vec<Segment> {
        split(&self.text(), self.mentions.as_slice())
    }

    /// Persisted form of the current text and mentions.
    pub fn to_message(&self) -> StoredMessage {
        StoredMessage::new(self.text(), self.mentions.to_stored())
    }

    /// Subscribe to text changes (`onTextChange`).
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&TextChange<'_>) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Insert `text` at the caret (typing or paste).
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let caret = self.caret;
        self.splice(caret, caret, text);
    }

    /// Delete the char before the caret.
    pub fn delete_backward(&mut self) {
        if self.caret == 0 {
            return;
        }
        let caret = self.caret;
        self.splice(caret - 1, caret, "");
    }

    /// Delete the char after the caret.
    pub fn delete_forward(&mut self) {
        if self.caret >= self.len_chars() {
            return;
        }
        let caret = self.caret;
        self.splice(caret, caret + 1, "");
    }

    /// Replace the char range `start..end` with `text` and put the caret after it.
    pub fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
    ) -> Result<(), MentionError> {
        let len = self.len_chars();
        if start > end || end > len {
            return Err(MentionError::InvalidRange { start, end, len });
        }
        self.splice(start, end, text);
        Ok(())
    }

    /// Replace the whole buffer with `text` (e.g. a host reporting a new field value) and move
    /// the caret to `caret`. Mentions are reconciled against the minimal edit between the old
    /// and new text.
    pub fn set_text(&mut self, text: &str, caret: usize) {
        let old = self.text();
        if old == text {
            self.set_caret(caret);
            return;
        }
        let dropped = self.mentions.reconcile_text(&old, text);
        self.buffer = Rope::from_str(text);
        self.caret = caret.min(self.buffer.len_chars());
        self.after_text_change(TextChangeKind::Edit, text, &dropped);
    }

    /// Load a stored message for editing. Malformed mentions are dropped.
    pub fn load_message(&mut self, message: &StoredMessage) {
        self.mentions = MentionSet::from_stored(&message.text, &message.mentions);
        self.buffer = Rope::from_str(&message.text);
        self.caret = self.buffer.len_chars();
        self.after_text_change(TextChangeKind::Load, &message.text, &[]);
    }

    /// Empty the buffer and forget every mention (e.g. after submitting a comment).
    pub fn clear(&mut self) {
        self.mentions.clear();
        self.buffer = Rope::new();
        self.caret = 0;
        self.after_text_change(TextChangeKind::Load, "", &[]);
    }

    fn splice(&mut self, start: usize, end: usize, text: &str) {
        if start < end {
            self.buffer.remove(start..end);
        }
        if !text.is_empty() {
            self.buffer.insert(start, text);
        }
        let inserted = text.chars().count();
        self.caret = start + inserted;

        let current = self.text();
        let mut dropped = self
            .mentions
            .apply_edit(&TextEdit::replacement(start, end, inserted));
        dropped.extend(self.mentions.validate(&current));
        self.after_text_change(TextChangeKind::Edit, &current, &dropped);
    }

    /// Move the caret (clamped to the text) and re-scan the trigger.
    pub fn set_caret(&mut self, offset: usize) {
        self.caret = offset.min(self.len_chars());
        let text = self.text();
        self.refresh_trigger(&text);
    }

    /// Move the caret one char left.
    pub fn move_caret_left(&mut self) {
        self.set_caret(self.caret.saturating_sub(1));
    }

    /// Move the caret one char right.
    pub fn move_caret_right(&mut self) {
        self.set_caret(self.caret + 1);
    }

    /// Move the caret to the start of the text.
    pub fn move_caret_home(&mut self) {
        self.set_caret(0);
    }

    /// Move the caret to the end of the text.
    pub fn move_caret_end(&mut self) {
        self.set_caret(self.len_chars());
    }

    /// Route a navigation key to the dropdown.
    ///
    /// While the dropdown is open these keys belong to it and [`KeyHandling::Handled`] is
    /// returned; otherwise the host keeps its default handling.
    pub fn handle_key(&mut self, key: NavigationKey) -> KeyHandling {
        if !self.navigator.is_open() {
            return KeyHandling::Ignored;
        }
        match NavigatorCommand::from_key(key) {
            NavigatorCommand::Confirm => {
                self.confirm();
            }
            NavigatorCommand::Cancel => self.cancel(),
            command => {
                self.navigator.apply(command);
            }
        }
        KeyHandling::Handled
    }

    /// Commit the highlighted candidate.
    pub fn confirm(&mut self) -> Option<Mention> {
        let candidate = self.navigator.confirm()?;
        self.commit_candidate(&candidate)
    }

    /// Commit the candidate at `row` (pointer/tap selection).
    pub fn select_candidate(&mut self, row: usize) -> Option<Mention> {
        let candidate = self.navigator.pick(row)?;
        self.commit_candidate(&candidate)
    }

    /// Close the dropdown without committing. It stays closed until the query changes.
    pub fn cancel(&mut self) {
        self.navigator.cancel();
    }

    fn commit_candidate(&mut self, candidate: &Candidate) -> Option<Mention> {
        if !self.trigger.active {
            self.navigator.reset();
            return None;
        }
        let text = self.text();
        let result = self.mentions.commit(
            &text,
            self.trigger.start_offset,
            self.caret,
            candidate,
            self.options.literal_style,
        );
        match result {
            Ok(commit) => {
                self.buffer = Rope::from_str(&commit.text);
                self.caret = commit.caret;
                self.after_text_change(TextChangeKind::Commit, &commit.text, &[]);
                Some(commit.mention)
            }
            Err(err) => {
                tracing::debug!(error = %err, "commit against stale trigger ignored");
                self.navigator.reset();
                self.refresh_trigger(&text);
                None
            }
        }
    }

    /// Take the lookup the host should run (deferred fields only).
    pub fn take_pending_lookup(&mut self) -> Option<PendingLookup> {
        self.pending.take()
    }

    /// Deliver the response for `ticket`.
    ///
    /// Returns `false` (and changes nothing) when the ticket has been superseded by a newer
    /// query, was already answered, or the trigger is no longer active. A failed lookup is
    /// treated as no candidates.
    pub fn complete_lookup(
        &mut self,
        ticket: LookupTicket,
        result: Result<Vec<Candidate>, DirectoryError>,
    ) -> bool {
        if !self.sequencer.is_current(ticket) || !self.trigger.active {
            tracing::debug!(ticket = ticket.sequence(), "discarding stale lookup response");
            return false;
        }
        let list = match result {
            Ok(candidates) => self.matcher.match_candidates(&self.trigger.query, &candidates),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    query = %self.trigger.query,
                    "candidate lookup failed"
                );
                Vec::new()
            }
        };
        // A ticket is answered at most once.
        self.sequencer.invalidate();
        self.navigator.set_candidates(list, true);
        true
    }

    fn after_text_change(&mut self, kind: TextChangeKind, text: &str, dropped: &[Mention]) {
        self.version += 1;
        self.refresh_trigger(text);

        let change = TextChange {
            kind,
            text,
            mentions: &self.mentions,
            caret: self.caret,
            version: self.version,
            dropped,
        };
        for callback in self.callbacks.iter_mut() {
            callback(&change);
        }
    }

    fn refresh_trigger(&mut self, text: &str) {
        let mut context = scan_with(text, self.caret, &self.options.scan);
        // An `@` that already starts a committed mention is not a new trigger.
        if context.active && self.mentions.mention_starting_at(context.start_offset).is_some() {
            context = TriggerContext::inactive();
        }

        if !context.active {
            if self.trigger.active {
                tracing::trace!("trigger closed");
            }
            self.trigger = context;
            self.navigator.reset();
            self.pending = None;
            self.sequencer.invalidate();
            return;
        }

        if context == self.trigger {
            return;
        }
        self.trigger = context;
        self.request_candidates();
    }

    fn request_candidates(&mut self) {
        match &self.directory {
            Some(directory) => {
                let list = self.matcher.lookup(directory.as_ref(), &self.trigger.query);
                self.navigator.set_candidates(list, true);
            }
            None => {
                self.navigator.reset();
                let ticket = self.sequencer.issue();
                self.pending = Some(PendingLookup {
                    ticket,
                    query: self.trigger.query.clone(),
                });
            }
        }
    }
}
