//! Terminal comment composer built on `mention-core`.
//!
//! Type a comment, press `@` and start typing a name to open the candidate dropdown.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p mention-tui -- [directory.json]
//! ```
//!
//! `directory.json` is a JSON array of candidates
//! (`[{ "id": "u1", "displayName": "Ana Souza", "secondaryLabel": "Legal" }]`). Without it a
//! small built-in directory is used.
//!
//! # Environment
//!
//! - `MENTION_TUI_OPTIONS`: field options as JSON, e.g. `{"page_size":5,"literal_style":"full_name"}`
//! - `MENTION_TUI_LOG`: path of a log file; filtered with `RUST_LOG` (nothing is logged to the
//!   terminal)
//!
//! # Keys
//!
//! - Up/Down: move the dropdown highlight
//! - Enter/Tab: insert the highlighted candidate (Enter submits the comment when the dropdown is
//!   closed)
//! - Esc: close the dropdown
//! - Left/Right/Home/End: move the caret
//! - Backspace/Delete: delete characters
//! - Ctrl+Q: quit

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mention_core::{
    Candidate, KeyHandling, MentionField, MentionOptions, NavigationKey, Segment,
    StaticDirectory, StoredMessage, char_slice, highlight_ranges, render_segments,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::{
    env, fs,
    io::{self, stdout},
    process,
    sync::{Arc, Mutex},
    time::Duration,
};
use unicode_width::UnicodeWidthChar;

const OPTIONS_ENV: &str = "MENTION_TUI_OPTIONS";
const LOG_ENV: &str = "MENTION_TUI_LOG";

fn mention_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn sample_directory() -> StaticDirectory {
    StaticDirectory::new(vec![
        Candidate::new("u1", "Ana Souza").with_secondary_label("Legal"),
        Candidate::new("u2", "Bruno Lima").with_secondary_label("Design"),
        Candidate::new("u3", "Anabel Reis").with_secondary_label("Finance"),
        Candidate::new("u4", "Carla Mendes").with_secondary_label("Engineering"),
        Candidate::new("u5", "Diego Alves")
            .with_secondary_label("Engineering")
            .with_searchable_text("diego@example.com"),
        Candidate::new("u6", "Zoë Kim").with_secondary_label("Support"),
    ])
}

fn load_directory(path: Option<&str>) -> io::Result<StaticDirectory> {
    let Some(path) = path else {
        return Ok(sample_directory());
    };
    let json = fs::read_to_string(path)?;
    StaticDirectory::from_json_str(&json)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn load_options() -> io::Result<MentionOptions> {
    match env::var(OPTIONS_ENV) {
        Ok(json) => MentionOptions::from_json_str(&json)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e)),
        Err(_) => Ok(MentionOptions::default()),
    }
}

fn init_logging() -> io::Result<()> {
    let Ok(path) = env::var(LOG_ENV) else {
        return Ok(());
    };
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
    // A second subscriber is only possible in tests; ignore it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

fn width_before(text: &str, char_offset: usize) -> usize {
    text.chars()
        .take(char_offset)
        .map(|c| c.width().unwrap_or(0))
        .sum()
}

struct App {
    /// The comment being composed.
    field: MentionField,
    /// Directory used for lookups and recipient names.
    directory: Arc<StaticDirectory>,
    /// Submitted comments, oldest first.
    history: Vec<StoredMessage>,
    /// Status line text.
    status_message: String,
    should_quit: bool,
}

impl App {
    fn new(directory: StaticDirectory, options: MentionOptions) -> Self {
        let directory = Arc::new(directory);
        let mut field = MentionField::new(directory.clone(), options);
        field.subscribe(|change| {
            tracing::debug!(
                kind = ?change.kind,
                version = change.version,
                caret = change.caret,
                mentions = change.mentions.len(),
                dropped = change.dropped.len(),
                "composer changed"
            );
        });

        Self {
            field,
            directory,
            history: Vec::new(),
            status_message: String::from("Type @ to mention someone"),
            should_quit: false,
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Dropdown keys take priority over the composer's own bindings.
        if let Some(nav) = navigation_key(key.code)
            && self.field.handle_key(nav) == KeyHandling::Handled
        {
            return;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                self.should_quit = true;
            }
            (_, KeyCode::Enter) => self.submit(),
            (_, KeyCode::Esc) => self.status_message.clear(),
            (_, KeyCode::Left) => self.field.move_caret_left(),
            (_, KeyCode::Right) => self.field.move_caret_right(),
            (_, KeyCode::Home) => self.field.move_caret_home(),
            (_, KeyCode::End) => self.field.move_caret_end(),
            (_, KeyCode::Backspace) => self.field.delete_backward(),
            (_, KeyCode::Delete) => self.field.delete_forward(),
            (modifiers, KeyCode::Char(c)) if !modifiers.contains(KeyModifiers::CONTROL) => {
                let mut buf = [0u8; 4];
                self.field.insert_text(c.encode_utf8(&mut buf));
            }
            _ => {}
        }
    }

    fn handle_paste(&mut self, text: String) {
        // The composer is a single line.
        let text = text.replace(['\r', '\n'], " ");
        self.field.insert_text(&text);
    }

    fn submit(&mut self) {
        let message = self.field.to_message();
        if message.text.trim().is_empty() {
            self.status_message = String::from("Nothing to send");
            return;
        }

        let names: Vec<&str> = message
            .recipients()
            .into_iter()
            .map(|id| {
                self.directory
                    .get(id)
                    .map(|c| c.display_name.as_str())
                    .unwrap_or(id)
            })
            .collect();
        self.status_message = if names.is_empty() {
            String::from("Sent")
        } else {
            format!("Sent, notifying {}", names.join(", "))
        };

        match message.to_json() {
            Ok(json) => tracing::info!(message = %json, "comment submitted"),
            Err(err) => tracing::warn!(error = %err, "failed to serialize comment"),
        }

        self.history.push(message);
        self.field.clear();
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_history(frame, chunks[0]);
        let scroll = self.render_composer(frame, chunks[1]);
        self.render_status_line(frame, chunks[2]);
        self.render_shortcuts(frame, chunks[3]);
        self.render_dropdown(frame, chunks[1], scroll);
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        for message in &self.history {
            let spans: Vec<Span> = render_segments(message)
                .into_iter()
                .map(|segment| match segment {
                    Segment::Text(text) => Span::raw(text),
                    Segment::Mention { text, .. } => Span::styled(text, mention_style()),
                })
                .collect();
            lines.push(Line::from(spans));
        }

        // Keep the newest comments visible.
        let inner_height = area.height.saturating_sub(2) as usize;
        let skip = lines.len().saturating_sub(inner_height);
        let lines: Vec<Line> = lines.into_iter().skip(skip).collect();

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Comments "))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    /// Draw the composer and return its horizontal scroll in columns.
    fn render_composer(&self, frame: &mut Frame, area: Rect) -> usize {
        let text = self.field.text();
        let inner_width = area.width.saturating_sub(2) as usize;
        let cursor_col = width_before(&text, self.field.caret());
        let scroll = if inner_width == 0 {
            0
        } else {
            (cursor_col + 1).saturating_sub(inner_width)
        };

        let spans: Vec<Span> = self
            .field
            .segments()
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) => Span::raw(text),
                Segment::Mention { text, .. } => Span::styled(text, mention_style()),
            })
            .collect();

        let title = format!(
            " New comment ({} mention{}) ",
            self.field.mentions().len(),
            if self.field.mentions().len() == 1 { "" } else { "s" }
        );
        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title(title))
            .scroll((0, scroll as u16));
        frame.render_widget(paragraph, area);

        let cursor_x = area.x + 1 + (cursor_col - scroll) as u16;
        frame.set_cursor_position((cursor_x, area.y + 1));
        scroll
    }

    fn render_dropdown(&self, frame: &mut Frame, composer: Rect, scroll: usize) {
        let navigator = self.field.navigator();
        if !navigator.is_open() {
            return;
        }
        let candidates = navigator.candidates();
        let query = &self.field.trigger().query;

        let lines: Vec<Line> = candidates
            .iter()
            .enumerate()
            .map(|(row, candidate)| {
                let selected = navigator.highlighted_index() == Some(row);
                candidate_line(candidate, query, selected)
            })
            .collect();

        let widest = candidates
            .iter()
            .map(|c| display_width(&c.display_name) + display_width(&c.secondary_label) + 3)
            .max()
            .unwrap_or(0);
        let frame_area = frame.area();
        let width = ((widest + 2) as u16).min(frame_area.width);
        let height = (candidates.len() as u16 + 2).min(composer.y);

        // Open above the composer, aligned with the '@'.
        let text = self.field.text();
        let at_col = width_before(&text, self.field.trigger().start_offset).saturating_sub(scroll);
        let x = (composer.x + 1 + at_col as u16).min(frame_area.width.saturating_sub(width));
        let area = Rect {
            x,
            y: composer.y.saturating_sub(height),
            width,
            height,
        };

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
            area,
        );
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let trigger = self.field.trigger();
        let right = if trigger.active {
            format!("@{} ", trigger.query)
        } else {
            String::new()
        };
        let status = format!(
            " {} | caret {} | v{} | {}",
            self.status_message,
            self.field.caret(),
            self.field.version(),
            right
        );
        let status_line = Paragraph::new(status)
            .style(Style::default().bg(Color::DarkGray).fg(Color::White));
        frame.render_widget(status_line, area);
    }

    fn render_shortcuts(&self, frame: &mut Frame, area: Rect) {
        let shortcuts = " ↑/↓ choose  Enter/Tab insert  Esc close  Enter send  Ctrl+Q quit";
        let shortcuts_line =
            Paragraph::new(shortcuts).style(Style::default().fg(Color::Gray));
        frame.render_widget(shortcuts_line, area);
    }
}

fn navigation_key(code: KeyCode) -> Option<NavigationKey> {
    match code {
        KeyCode::Up => Some(NavigationKey::Up),
        KeyCode::Down => Some(NavigationKey::Down),
        KeyCode::Enter => Some(NavigationKey::Enter),
        KeyCode::Tab => Some(NavigationKey::Tab),
        KeyCode::Esc => Some(NavigationKey::Escape),
        _ => None,
    }
}

/// One dropdown row: the display name with the matched part emphasized, then the secondary
/// label.
fn candidate_line(candidate: &Candidate, query: &str, selected: bool) -> Line<'static> {
    let base = if selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    let matched = base.add_modifier(Modifier::BOLD).fg(Color::Yellow);

    let name = candidate.display_name.as_str();
    let name_len = name.chars().count();
    let mut spans = Vec::new();
    let mut cursor = 0;
    for range in highlight_ranges(query, name) {
        if let Some(before) = char_slice(name, cursor, range.start)
            && !before.is_empty()
        {
            spans.push(Span::styled(before.to_string(), base));
        }
        if let Some(hit) = char_slice(name, range.start, range.end) {
            spans.push(Span::styled(hit.to_string(), matched));
        }
        cursor = range.end;
    }
    if let Some(rest) = char_slice(name, cursor, name_len)
        && !rest.is_empty()
    {
        spans.push(Span::styled(rest.to_string(), base));
    }

    if !candidate.secondary_label.is_empty() {
        spans.push(Span::styled(
            format!("  {}", candidate.secondary_label),
            base.fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [directory.json]", args[0]);
        process::exit(1);
    }

    init_logging()?;
    let directory = load_directory(args.get(1).map(String::as_str))?;
    let options = load_options()?;
    tracing::info!(candidates = directory.len(), ?options, "starting composer");

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(directory, options);
    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Paste(text) => app.handle_paste(text),
                _ => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_enter_inserts_mention_then_submits() {
        let mut app = App::new(sample_directory(), MentionOptions::default());
        type_str(&mut app, "thanks @br");
        assert!(app.field.navigator().is_open());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.field.text(), "thanks @Bruno ");
        assert!(app.history.is_empty());

        type_str(&mut app, "!");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].recipients(), vec!["u2"]);
        assert_eq!(app.status_message, "Sent, notifying Bruno Lima");
        assert_eq!(app.field.text(), "");
    }

    #[test]
    fn test_escape_closes_dropdown_without_submitting() {
        let mut app = App::new(sample_directory(), MentionOptions::default());
        type_str(&mut app, "@a");
        press(&mut app, KeyCode::Esc);
        assert!(!app.field.navigator().is_open());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].text, "@a");
    }

    #[test]
    fn test_paste_is_flattened_to_one_line() {
        let mut app = App::new(sample_directory(), MentionOptions::default());
        app.handle_paste(String::from("one\ntwo"));
        assert_eq!(app.field.text(), "one two");
    }

    #[test]
    fn test_candidate_line_emphasizes_match() {
        let candidate = Candidate::new("u3", "Anabel Reis").with_secondary_label("Finance");
        let line = candidate_line(&candidate, "bel", false);
        let texts: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["Ana", "bel", " Reis", "  Finance"]);
    }
}
