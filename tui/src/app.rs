//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, resize)
//! - The embedded Concierge for all session logic
//! - DisplayState for rendering
//!
//! # Architecture
//!
//! The App:
//! 1. Converts terminal events to SurfaceEvents
//! 2. Raises the open signal when the mascot is clicked
//! 3. Receives ConciergeMessages and updates DisplayState
//! 4. Renders based on DisplayState

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, EventStream, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use futures::StreamExt;
use rand::seq::SliceRandom;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use concierge_core::{
    Concierge, ConciergeMessage, NotifyLevel, ResponseProvider, SignalEmitter, SignalSource,
    SurfaceEvent, SurfaceState,
};

use crate::display::{DisplayRole, DisplayState};
use crate::theme::{
    BUBBLE, CONCIERGE_MAGENTA, DIM_GRAY, ERROR_RED, FADE_GRAY, THINKING_BLUE, USER_GREEN,
    WARNING_AMBER,
};

/// Input box height (lines) for text wrapping
const INPUT_HEIGHT: u16 = 4;

/// Width of the mascot column
const MASCOT_WIDTH: u16 = 26;

/// Height of the idle bubble above the mascot
const BUBBLE_HEIGHT: u16 = 5;

/// How often the mascot hint changes
const HINT_INTERVAL: Duration = Duration::from_secs(8);

/// The mascot
const MASCOT_ART: &[&str] = &[
    r"    .-^^^-.",
    r"   /  o o  \",
    r"  |    v    |",
    r"   \ '---' /",
    r"    `-...-'",
    r"     /| |\",
];

/// Hints under the mascot
const MASCOT_HINTS: &[&str] = &[
    "Click me to chat!",
    "Psst... I know things about Arpit.",
    "Ask me about projects!",
    "Ctrl+G works too.",
    "I don't bite. Much.",
    "Curious? Click!",
];

/// Quick goodbye messages (no network needed, instant)
const QUICK_GOODBYES: &[&str] = &[
    "Bye bye!",
    "See ya!",
    "Come back soon!",
    "Later, gator!",
    "Take care!",
    "Don't forget to check out the projects!",
];

/// Screen regions for one frame
#[derive(Clone, Copy, Debug)]
struct AppLayout {
    /// Drawer (None while closed)
    drawer: Option<Rect>,
    /// Idle bubble above the mascot
    bubble: Rect,
    /// Mascot art and hint (click target)
    mascot: Rect,
    /// Bottom status line
    status: Rect,
}

impl AppLayout {
    fn new(area: Rect, open: bool) -> Self {
        let [main, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        let [left, right] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(MASCOT_WIDTH)]).areas(main);
        let [_, bubble, mascot] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(BUBBLE_HEIGHT),
            Constraint::Length(MASCOT_ART.len() as u16 + 2),
        ])
        .areas(right);

        Self {
            drawer: open.then_some(left),
            bubble,
            mascot,
            status,
        }
    }
}

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Goodbye message to show on exit
    goodbye_message: Option<String>,

    // === Concierge Integration ===
    /// The embedded session controller
    concierge: Concierge<Box<dyn ResponseProvider>>,
    /// Messages from the Concierge
    rx: mpsc::Receiver<ConciergeMessage>,
    /// Open-signal emitter held by the mascot
    mascot: SignalEmitter,
    /// Display state derived from ConciergeMessages
    display: DisplayState,

    // === Input State ===
    /// User input buffer
    input_buffer: String,
    /// Scroll offset (lines from bottom, 0 = latest)
    scroll_offset: usize,
    /// Total rendered lines (for scroll bounds)
    total_lines: usize,

    // === Mascot State ===
    /// Current hint under the mascot
    hint: &'static str,
    /// When the hint last changed
    hint_changed: Instant,
    /// Where the mascot was last drawn
    mascot_area: Rect,

    // === Misc State ===
    /// Open the drawer right after the session starts
    open_on_start: bool,
    /// When the app started (typing animation)
    started: Instant,
    /// Terminal size
    size: (u16, u16),
}

impl App {
    /// Create a new App around a ready Concierge
    pub fn new(
        concierge: Concierge<Box<dyn ResponseProvider>>,
        rx: mpsc::Receiver<ConciergeMessage>,
        mascot: SignalEmitter,
    ) -> anyhow::Result<Self> {
        let size = crossterm::terminal::size()?;
        let display = DisplayState::new(concierge.persona().name.clone());
        let now = Instant::now();

        Ok(Self {
            running: true,
            goodbye_message: None,
            concierge,
            rx,
            mascot,
            display,
            input_buffer: String::new(),
            scroll_offset: 0,
            total_lines: 0,
            hint: MASCOT_HINTS[0],
            hint_changed: now,
            mascot_area: Rect::default(),
            open_on_start: false,
            started: now,
            size,
        })
    }

    /// Open the drawer as soon as the session starts
    #[must_use]
    pub fn open_on_start(mut self, open: bool) -> Self {
        self.open_on_start = open;
        self
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // ~30 FPS
        let frame_duration = Duration::from_millis(33);

        let mut event_stream = EventStream::new();

        self.concierge.start().await?;
        if self.open_on_start {
            self.send_event(SurfaceEvent::OpenRequested).await;
        }
        self.process_concierge_messages();
        self.render(terminal)?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => match event {
                            // Only handle Press events (not Release or Repeat)
                            Event::Key(key) if key.kind == KeyEventKind::Press => {
                                self.handle_key(key).await;
                            }
                            Event::Mouse(mouse) => self.handle_mouse(mouse),
                            Event::Resize(w, h) => self.size = (w, h),
                            _ => {}
                        },
                        Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                        None => self.running = false,
                    }
                }

                // Frame tick
                () = tokio::time::sleep(Duration::from_millis(16)) => {}
            }

            self.concierge.tick(Instant::now()).await;
            self.process_concierge_messages();
            self.update();

            if self.display.quit_requested {
                self.running = false;
            }

            self.render(terminal)?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                tokio::time::sleep(frame_duration - elapsed).await;
            }
        }

        Ok(())
    }

    /// Process all pending messages from the Concierge
    fn process_concierge_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            if let ConciergeMessage::TurnAppended { .. } = &msg {
                self.scroll_offset = 0;
            }
            self.display.apply_message(msg);
        }
    }

    /// Forward an event to the Concierge
    async fn send_event(&mut self, event: SurfaceEvent) {
        let kind = event.kind();
        if let Err(e) = self.concierge.handle_event(event).await {
            tracing::warn!(event = kind, error = %e, "Concierge rejected surface event");
        }
    }

    /// Handle keyboard input
    async fn handle_key(&mut self, key: event::KeyEvent) {
        let open = self.concierge.is_open();

        match key.code {
            // Quit
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.generate_goodbye();
                self.send_event(SurfaceEvent::QuitRequested).await;
                self.running = false;
            }

            // Same as clicking the mascot
            KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.mascot.open_from(SignalSource::Mascot);
            }

            // Drawer
            KeyCode::F(2) => {
                let event = if open {
                    SurfaceEvent::CloseRequested
                } else {
                    SurfaceEvent::OpenRequested
                };
                self.send_event(event).await;
            }
            KeyCode::Esc if open => {
                self.send_event(SurfaceEvent::CloseRequested).await;
            }

            // Submit message
            KeyCode::Enter if open => {
                self.send_event(SurfaceEvent::DraftChanged {
                    text: self.input_buffer.clone(),
                })
                .await;
                self.send_event(SurfaceEvent::Submit).await;

                // Accepted submissions clear the draft; a busy or rejected one keeps it
                if self.concierge.draft().is_empty() {
                    self.input_buffer.clear();
                    self.display.clear_notification();
                    self.scroll_offset = 0;
                }
            }

            // Typing
            KeyCode::Char(c) if open => {
                self.input_buffer.push(c);
                self.concierge.set_draft(self.input_buffer.clone());
            }
            KeyCode::Backspace if open => {
                self.input_buffer.pop();
                self.concierge.set_draft(self.input_buffer.clone());
            }

            // Transcript scrolling
            KeyCode::PageUp => {
                let page_size = self.size.1.saturating_sub(INPUT_HEIGHT + 3) / 2;
                let max_scroll = self.total_lines.saturating_sub(1);
                self.scroll_offset = (self.scroll_offset + page_size as usize).min(max_scroll);
            }
            KeyCode::PageDown => {
                let page_size = self.size.1.saturating_sub(INPUT_HEIGHT + 3) / 2;
                self.scroll_offset = self.scroll_offset.saturating_sub(page_size as usize);
            }

            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: event::MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let clicked = self.mascot_area.contains((mouse.column, mouse.row).into());
                if clicked {
                    self.mascot.open_from(SignalSource::Mascot);
                }
            }
            MouseEventKind::ScrollUp => {
                if self.scroll_offset < self.total_lines.saturating_sub(1) {
                    self.scroll_offset += 3;
                }
            }
            MouseEventKind::ScrollDown => {
                self.scroll_offset = self.scroll_offset.saturating_sub(3);
            }
            _ => {}
        }
    }

    /// Rotate the mascot hint
    fn update(&mut self) {
        if self.hint_changed.elapsed() >= HINT_INTERVAL {
            let mut rng = rand::thread_rng();
            self.hint = MASCOT_HINTS.choose(&mut rng).copied().unwrap_or(self.hint);
            self.hint_changed = Instant::now();
        }
    }

    /// Render the UI
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let layout = AppLayout::new(Rect::new(0, 0, self.size.0, self.size.1), self.display.open);
        self.mascot_area = layout.mascot;

        let transcript_lines = layout.drawer.map_or_else(Vec::new, |drawer| {
            let width = drawer.width.saturating_sub(2) as usize;
            self.display.wrapped_lines(width)
        });
        self.total_lines = transcript_lines.len();

        terminal.draw(|frame| {
            if let Some(drawer) = layout.drawer {
                self.render_drawer(frame, drawer, &transcript_lines);
            } else {
                self.render_closed_hint(frame, layout.status);
            }
            self.render_bubble(frame, layout.bubble);
            self.render_mascot(frame, layout.mascot);
            if layout.drawer.is_some() {
                self.render_status(frame, layout.status);
            }
        })?;

        Ok(())
    }

    /// Render the open drawer: transcript, typing indicator and input
    fn render_drawer(&self, frame: &mut Frame, area: Rect, lines: &[(DisplayRole, String)]) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(CONCIERGE_MAGENTA))
            .title(format!(" {} ", self.display.assistant_name));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [transcript, typing, input] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
        ])
        .areas(inner);

        self.render_transcript(frame, transcript, lines);

        if self.display.typing {
            let dots = ".".repeat(1 + (self.started.elapsed().as_millis() / 400 % 3) as usize);
            let text = format!("{} is typing{dots}", self.display.assistant_name);
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(THINKING_BLUE)),
                typing,
            );
        }

        self.render_input(frame, input);
    }

    /// Render the visible window of the transcript
    fn render_transcript(&self, frame: &mut Frame, area: Rect, lines: &[(DisplayRole, String)]) {
        let height = area.height as usize;
        if height == 0 {
            return;
        }

        let max_scroll = lines.len().saturating_sub(height);
        let scroll = self.scroll_offset.min(max_scroll);
        let visible_end = lines.len().saturating_sub(scroll);
        let visible_start = visible_end.saturating_sub(height);

        let has_content_above = visible_start > 0;
        let has_content_below = scroll > 0;

        let rendered: Vec<Line> = lines[visible_start..visible_end]
            .iter()
            .enumerate()
            .map(|(i, (role, text))| {
                let faded = (has_content_above && i == 0)
                    || (has_content_below && i + 1 == visible_end - visible_start);
                let style = if faded {
                    Style::default().fg(FADE_GRAY)
                } else {
                    match role {
                        DisplayRole::User => Style::default().fg(USER_GREEN),
                        DisplayRole::Assistant => Style::default().fg(CONCIERGE_MAGENTA),
                    }
                };
                Line::styled(text.clone(), style)
            })
            .collect();

        frame.render_widget(Paragraph::new(rendered), area);
    }

    /// Render the input box
    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(1) as usize;
        let height = area.height.saturating_sub(1) as usize;
        if width < 5 || height < 1 {
            return;
        }

        let separator = Line::styled("-".repeat(area.width as usize), Style::default().fg(DIM_GRAY));
        let full_input = format!("You: {}_", self.input_buffer);
        let wrapped: Vec<String> = textwrap::wrap(&full_input, width)
            .iter()
            .map(ToString::to_string)
            .collect();
        let skip = wrapped.len().saturating_sub(height);

        let mut rendered = vec![separator];
        rendered.extend(
            wrapped
                .into_iter()
                .skip(skip)
                .map(|line| Line::styled(line, Style::default().fg(USER_GREEN))),
        );

        frame.render_widget(Paragraph::new(rendered), area);
    }

    /// Render the idle bubble (if showing)
    fn render_bubble(&self, frame: &mut Frame, area: Rect) {
        let Some(text) = &self.display.idle_prompt else {
            return;
        };

        let bubble = Paragraph::new(text.as_str())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(BUBBLE))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(BUBBLE)),
            );
        frame.render_widget(bubble, area);
    }

    /// Render the mascot and its hint
    fn render_mascot(&self, frame: &mut Frame, area: Rect) {
        let style = Style::default()
            .fg(CONCIERGE_MAGENTA)
            .add_modifier(Modifier::BOLD);
        let mut lines: Vec<Line> = MASCOT_ART
            .iter()
            .map(|row| Line::styled(*row, style))
            .collect();
        lines.push(Line::styled(self.hint, Style::default().fg(DIM_GRAY)));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }

    /// Render the bottom line while the drawer is closed
    fn render_closed_hint(&self, frame: &mut Frame, area: Rect) {
        let text = " F2 to chat | Ctrl+G or click the mascot | Ctrl+C to quit";
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(DIM_GRAY)),
            area,
        );
    }

    /// Render status bar
    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let state = self.display.surface_state();
        let status_style = match state {
            SurfaceState::AwaitingResponse => Style::default().fg(THINKING_BLUE),
            _ => Style::default().fg(DIM_GRAY),
        };

        let scroll_info = if self.scroll_offset > 0 {
            format!(" [^{} lines - PgDn to scroll]", self.scroll_offset)
        } else {
            String::new()
        };

        let status = format!(
            " {} | {} | Esc to close | PgUp/PgDn scroll{}",
            state.description(),
            self.display.provider,
            scroll_info,
        );

        let mut spans = vec![Span::styled(status, status_style)];
        if let Some(notification) = &self.display.notification {
            let color = match notification.level {
                NotifyLevel::Info => DIM_GRAY,
                NotifyLevel::Warning => WARNING_AMBER,
                NotifyLevel::Error => ERROR_RED,
            };
            spans.push(Span::styled(
                format!(" | {}", notification.message),
                Style::default().fg(color),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Generate a quick goodbye message
    fn generate_goodbye(&mut self) {
        let mut rng = rand::thread_rng();
        self.goodbye_message = QUICK_GOODBYES.choose(&mut rng).map(ToString::to_string);
    }

    /// Get the goodbye message for display after TUI closes
    pub fn goodbye(&self) -> Option<&str> {
        self.goodbye_message
            .as_deref()
            .or(self.display.goodbye.as_deref())
    }

    /// Name shown for assistant turns
    pub fn assistant_name(&self) -> &str {
        &self.display.assistant_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_closed_has_no_drawer() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30), false);
        assert!(layout.drawer.is_none());
        assert_eq!(layout.status.y, 29);
        assert_eq!(layout.mascot.x, 100 - MASCOT_WIDTH);
    }

    #[test]
    fn test_layout_open_drawer_beside_mascot() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30), true);
        let drawer = layout.drawer.unwrap();
        assert_eq!(drawer.x, 0);
        assert_eq!(drawer.width, 100 - MASCOT_WIDTH);
        assert_eq!(drawer.height, 29);
        assert!(layout.bubble.y < layout.mascot.y);
    }

    #[test]
    fn test_mascot_area_is_clickable() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30), false);
        let inside = (layout.mascot.x + 2, layout.mascot.y + 1);
        assert!(layout.mascot.contains(inside.into()));
        assert!(!layout.mascot.contains((0, 0).into()));
    }
}
