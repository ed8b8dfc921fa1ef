//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, resize)
//! - ConductorClient for orchestration
//! - DisplayState for rendering
//! - WhiteboardPanel for the persona whiteboards
//!
//! The App:
//! 1. Converts terminal events to SurfaceEvents
//! 2. Sends events to the embedded Conductor via ConductorClient
//! 3. Polls the Conductor's timeline every frame
//! 4. Receives ConductorMessages and updates DisplayState
//! 5. Renders based on DisplayState

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, EventStream, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use duel_core::{
    Author, ConductorError, ConductorMessage, DebatePhase, DuelConfig, IndicatorSize, NotifyLevel,
    Persona, EXAMPLE_TOPICS,
};

use crate::conductor_client::ConductorClient;
use crate::display::DisplayState;
use crate::indicator::EmotionIndicator;
use crate::theme::{notify_color, persona_color, ACCENT_AMBER, DIM_GRAY, USER_GREEN};
use crate::whiteboard::WhiteboardPanel;

/// Input box height (lines) for text wrapping
const INPUT_HEIGHT: u16 = 4;

/// Lines scrolled per mouse wheel notch
const WHEEL_LINES: usize = 3;

/// Quick goodbye lines printed after the terminal is restored
const QUICK_GOODBYES: &[&str] = &[
    "Until the next dialectic.",
    "The question stays open.",
    "Keep asking what a self is.",
    "Thanks for joining the debate.",
    "Go think something new.",
    "Minds all the way down. See you!",
    "Probabilities collapse; friendships persist.",
];

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Goodbye message to show on exit
    goodbye_message: Option<String>,

    // === Conductor Integration ===
    /// Client for communicating with the embedded Conductor
    conductor: ConductorClient,
    /// Display state derived from ConductorMessages
    display: DisplayState,

    // === UI Components ===
    /// Persona whiteboards
    whiteboard: WhiteboardPanel,

    // === Input State ===
    /// User input buffer (topic or remark)
    input_buffer: String,
    /// Highlighted example topic
    topic_cursor: usize,
    /// Persona card with focus on the topic screen
    focused_persona: Option<Persona>,
    /// Persona card areas from the last frame, for hover focus
    card_areas: [Rect; 2],
    /// Scroll offset (lines from bottom, 0 = latest)
    scroll_offset: usize,
    /// Total rendered lines (for scroll bounds)
    total_lines: usize,
    /// Transcript height from the last frame
    transcript_height: usize,

    // === Misc State ===
    /// Frame interval
    frame_interval: Duration,
}

impl App {
    /// Create a new App instance
    pub fn new(config: &DuelConfig) -> anyhow::Result<Self> {
        Ok(Self {
            running: true,
            goodbye_message: None,
            conductor: ConductorClient::new(config.conductor_config()),
            display: DisplayState::new(),
            whiteboard: WhiteboardPanel::new(&config.whiteboard)?,
            input_buffer: String::new(),
            topic_cursor: 0,
            focused_persona: None,
            card_areas: [Rect::default(); 2],
            scroll_offset: 0,
            total_lines: 0,
            transcript_height: 0,
            frame_interval: config.frame_interval,
        })
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        self.conductor.start().await?;
        self.conductor.connect().await?;
        self.process_conductor_messages();

        // Render initial frame immediately so user sees UI
        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            // Wake for the next frame, or sooner if a cue is due
            let wait = self
                .conductor
                .next_deadline()
                .map_or(self.frame_interval, |due| {
                    due.saturating_duration_since(Instant::now())
                        .min(self.frame_interval)
                });

            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => match event {
                            // Only handle Press events (not Release or Repeat)
                            Event::Key(key) if key.kind == KeyEventKind::Press => {
                                self.handle_key(key).await;
                            }
                            Event::Mouse(mouse) => self.handle_mouse(mouse).await,
                            _ => {}
                        },
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "Terminal event stream error");
                        }
                        None => self.running = false,
                    }
                }

                // Frame tick
                () = tokio::time::sleep(wait) => {}
            }

            // Fire due choreography
            if let Err(e) = self.conductor.poll_timeline().await {
                tracing::warn!(error = %e, "Timeline poll failed");
            }

            // Receive and process messages from Conductor
            self.process_conductor_messages();

            // Expire notifications
            self.display.update(Instant::now());

            // Render
            terminal.draw(|frame| self.draw(frame))?;

            // Check for quit message
            if self.display.quit_requested {
                self.running = false;
            }
        }

        Ok(())
    }

    /// Process all pending messages from the Conductor
    fn process_conductor_messages(&mut self) {
        for msg in self.conductor.recv_all() {
            match &msg {
                ConductorMessage::Quit { message } => {
                    if message.is_some() {
                        self.goodbye_message.clone_from(message);
                    }
                }
                ConductorMessage::RemarkAccepted { .. } | ConductorMessage::SessionReset { .. } => {
                    self.input_buffer.clear();
                    self.scroll_offset = 0;
                }
                _ => {}
            }

            // Apply message to display state
            self.display.apply_message(msg);
        }
    }

    fn report(&self, what: &str, result: Result<(), ConductorError>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, action = what, "Conductor rejected event");
        }
    }

    /// Handle keyboard input
    async fn handle_key(&mut self, key: event::KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            // Quit
            KeyCode::Char('c') if ctrl => {
                self.quit().await;
                return;
            }

            // Whiteboard panel
            KeyCode::F(2) => {
                let shown = self.whiteboard.toggle();
                tracing::debug!(shown, "Whiteboard panel toggled");
                return;
            }
            KeyCode::F(3..=10) if self.whiteboard.is_visible() => {
                self.handle_whiteboard_key(key.code).await;
                return;
            }
            KeyCode::Char('z') if ctrl && self.whiteboard.is_visible() => {
                self.whiteboard.active_board_mut().undo();
                return;
            }
            KeyCode::Char('y') if ctrl && self.whiteboard.is_visible() => {
                self.whiteboard.active_board_mut().redo();
                return;
            }
            _ => {}
        }

        if self.display.on_topic_screen() {
            self.handle_topic_key(key.code).await;
        } else {
            self.handle_duel_key(key.code).await;
        }
    }

    async fn handle_topic_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.quit().await,
            KeyCode::Up => {
                self.topic_cursor = self.topic_cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                self.topic_cursor = (self.topic_cursor + 1).min(EXAMPLE_TOPICS.len() - 1);
            }
            KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
                let persona = self
                    .focused_persona
                    .map_or(Persona::FIRST, Persona::counterpart);
                self.focus_persona(persona).await;
            }
            KeyCode::Enter => {
                let topic = if self.input_buffer.trim().is_empty() {
                    EXAMPLE_TOPICS[self.topic_cursor].to_string()
                } else {
                    self.input_buffer.clone()
                };
                let result = self.conductor.start_duel(topic).await;
                self.report("start_duel", result);
            }
            KeyCode::Char(c) => self.input_buffer.push(c),
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            _ => {}
        }
    }

    async fn handle_duel_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                let result = self.conductor.back_to_topics().await;
                self.report("back_to_topics", result);
                self.focused_persona = None;
            }
            // The input box is read-only until the philosophers invite the user
            KeyCode::Enter if self.display.accepting_input => {
                if !self.input_buffer.trim().is_empty() {
                    let result = self.conductor.submit_remark(self.input_buffer.clone()).await;
                    self.report("submit_remark", result);
                }
            }
            KeyCode::Char(c) if self.display.accepting_input => self.input_buffer.push(c),
            KeyCode::Backspace if self.display.accepting_input => {
                self.input_buffer.pop();
            }
            KeyCode::PageUp => {
                let page = (self.transcript_height / 2).max(1);
                self.scroll_by(page as isize);
            }
            KeyCode::PageDown => {
                let page = (self.transcript_height / 2).max(1);
                self.scroll_by(-(page as isize));
            }
            KeyCode::End => self.scroll_offset = 0,
            _ => {}
        }
    }

    async fn handle_whiteboard_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::F(3) => {
                self.whiteboard.switch();
            }
            KeyCode::F(4) => {
                self.whiteboard.active_board_mut().toggle_erase();
            }
            KeyCode::F(5) => {
                self.whiteboard.cycle_color();
            }
            KeyCode::F(6) => {
                self.whiteboard.active_board_mut().cycle_stroke_width();
            }
            KeyCode::F(7) => {
                self.whiteboard.active_board_mut().undo();
            }
            KeyCode::F(8) => {
                self.whiteboard.active_board_mut().redo();
            }
            KeyCode::F(9) => self.whiteboard.active_board_mut().clear(),
            KeyCode::F(10) => self.export_whiteboard().await,
            _ => {}
        }
    }

    /// Export the active whiteboard; failures come back from the Conductor
    /// as a warning notification
    async fn export_whiteboard(&mut self) {
        match self.whiteboard.export_active().await {
            Ok(path) => {
                self.display
                    .notify(NotifyLevel::Success, format!("Saved {}", path.display()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Whiteboard export failed");
                let result = self
                    .conductor
                    .report_error(format!("Export failed: {e}"), true)
                    .await;
                self.report("report_error", result);
            }
        }
    }

    /// Focus a persona card; the Conductor answers with a greeting
    async fn focus_persona(&mut self, persona: Persona) {
        if self.focused_persona == Some(persona) {
            return;
        }
        self.focused_persona = Some(persona);
        let result = self.conductor.persona_focused(persona).await;
        self.report("persona_focused", result);
    }

    /// Handle mouse input
    async fn handle_mouse(&mut self, mouse: event::MouseEvent) {
        if self.whiteboard.handle_mouse(mouse) {
            return;
        }
        if self.display.on_topic_screen() && mouse.kind == MouseEventKind::Moved {
            let at = Position::new(mouse.column, mouse.row);
            let hovered = Persona::ALL
                .into_iter()
                .zip(self.card_areas)
                .find(|(_, area)| area.contains(at));
            match hovered {
                Some((persona, _)) => self.focus_persona(persona).await,
                None => self.focused_persona = None,
            }
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_by(WHEEL_LINES as isize),
            MouseEventKind::ScrollDown => self.scroll_by(-(WHEEL_LINES as isize)),
            _ => {}
        }
    }

    fn scroll_by(&mut self, lines: isize) {
        let max_scroll = self.total_lines.saturating_sub(self.transcript_height);
        self.scroll_offset = self
            .scroll_offset
            .saturating_add_signed(lines)
            .min(max_scroll);
    }

    async fn quit(&mut self) {
        self.generate_goodbye();
        let result = self.conductor.request_quit().await;
        self.report("request_quit", result);
        self.running = false;
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [main, status] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);

        let content = if self.whiteboard.is_visible() {
            let [left, right] =
                Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .areas(main);
            self.whiteboard.render(frame, right);
            left
        } else {
            main
        };

        if self.display.on_topic_screen() {
            self.render_topic_screen(frame, content);
        } else {
            self.render_duel_screen(frame, content);
        }
        self.render_status(frame, status);
    }

    fn render_topic_screen(&mut self, frame: &mut Frame, area: Rect) {
        let [header, cards, topics, input] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(8),
            Constraint::Length(EXAMPLE_TOPICS.len() as u16 + 2),
            Constraint::Length(3),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "The Philosophical Duel",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Two minds, one question. Pick a topic and watch them debate.",
                    Style::default().fg(DIM_GRAY),
                )),
            ]),
            header,
        );

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(cards);
        self.card_areas = [left, right];
        self.render_persona_card(frame, left, Persona::Levin);
        self.render_persona_card(frame, right, Persona::Barandes);

        let lines: Vec<Line> = EXAMPLE_TOPICS
            .iter()
            .enumerate()
            .map(|(i, topic)| {
                if i == self.topic_cursor {
                    Line::from(Span::styled(
                        format!("> {topic}"),
                        Style::default()
                            .fg(ACCENT_AMBER)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(format!("  {topic}"))
                }
            })
            .collect();
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::TOP)
                    .title(" Example topics "),
            ),
            topics,
        );

        let prompt = format!("Topic: {}_", self.input_buffer);
        frame.render_widget(
            Paragraph::new(prompt)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::TOP)),
            input,
        );
    }

    fn render_persona_card(&self, frame: &mut Frame, area: Rect, persona: Persona) {
        let accent = persona_color(persona);
        let focused = self.focused_persona == Some(persona);
        let border = if focused {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DIM_GRAY)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(
                format!(" {} ", persona.display_name()),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [indicator, text] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(inner);

        let shown = self.display.emotion(persona);
        frame.render_widget(
            EmotionIndicator::new(persona, shown.emotion, shown.elapsed(Instant::now()))
                .size(IndicatorSize::Large),
            indicator,
        );

        let mut lines = vec![
            Line::from(Span::styled(persona.field(), Style::default().fg(accent))),
            Line::from(Span::styled(
                persona.affiliation(),
                Style::default().fg(DIM_GRAY),
            )),
            Line::from(Span::styled(
                persona.tagline(),
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ];
        lines.extend(
            persona
                .key_insights()
                .iter()
                .map(|insight| Line::from(format!("• {insight}"))),
        );
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), text);
    }

    fn render_duel_screen(&mut self, frame: &mut Frame, area: Rect) {
        let [header, transcript, typing, input] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
        ])
        .areas(area);

        self.render_header(frame, header);
        self.render_transcript(frame, transcript);

        if self.display.typing {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "The philosophers are responding…",
                    Style::default().fg(DIM_GRAY).add_modifier(Modifier::ITALIC),
                )),
                typing,
            );
        }

        self.render_input(frame, input);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let topic = self.display.topic.as_deref().unwrap_or_default();
        let [title, faces] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(2)]).areas(area);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Topic: ", Style::default().fg(DIM_GRAY)),
                Span::styled(topic.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            ])),
            title,
        );

        let now = Instant::now();
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(faces);
        for (persona, slot) in [(Persona::Levin, left), (Persona::Barandes, right)] {
            let shown = self.display.emotion(persona);
            frame.render_widget(
                EmotionIndicator::new(persona, shown.emotion, shown.elapsed(now)),
                slot,
            );
        }
    }

    /// Render the transcript, newest at the bottom
    fn render_transcript(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(1) as usize;
        let height = area.height as usize;
        self.transcript_height = height;

        if width < 10 || height < 1 {
            return;
        }

        // Build wrapped lines from display messages
        let mut all_lines: Vec<Line> = Vec::new();
        for msg in &self.display.messages {
            let accent = match msg.author {
                Author::Persona(persona) => persona_color(persona),
                Author::User => USER_GREEN,
            };
            all_lines.push(Line::from(vec![
                Span::styled(
                    msg.prefix(),
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                ),
                Span::styled(msg.timestamp.clone(), Style::default().fg(DIM_GRAY)),
            ]));
            for line in textwrap::wrap(&msg.content, width) {
                all_lines.push(Line::from(line.into_owned()));
            }
            all_lines.push(Line::default());
        }

        self.total_lines = all_lines.len();

        // Clamp scroll offset
        let max_scroll = self.total_lines.saturating_sub(height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        // Calculate visible range
        let visible_end = self.total_lines.saturating_sub(self.scroll_offset);
        let visible_start = visible_end.saturating_sub(height);
        let visible: Vec<Line> = all_lines
            .into_iter()
            .skip(visible_start)
            .take(visible_end - visible_start)
            .collect();

        frame.render_widget(Paragraph::new(visible), area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let (title, style) = if self.display.accepting_input {
            (" Your turn ", Style::default().fg(USER_GREEN))
        } else {
            (" Listening ", Style::default().fg(DIM_GRAY))
        };
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(style)
            .title(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text_width = inner.width.saturating_sub(1) as usize;
        let text_height = inner.height as usize;
        if text_width < 5 || text_height < 1 {
            return;
        }

        let full_input = format!("You: {}_", self.input_buffer);
        let wrapped: Vec<String> = textwrap::wrap(&full_input, text_width)
            .into_iter()
            .map(|s| s.into_owned())
            .collect();
        let skip = wrapped.len().saturating_sub(text_height);
        let lines: Vec<Line> = wrapped
            .into_iter()
            .skip(skip)
            .map(|l| Line::from(Span::styled(l, style)))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Render status bar
    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(notification) = &self.display.notification {
            Line::from(Span::styled(
                format!(" {}", notification.message),
                Style::default().fg(notify_color(notification.level)),
            ))
        } else {
            let state = if self.display.on_topic_screen() {
                "Choose a topic to begin"
            } else {
                self.display.phase.description()
            };
            let state_style = match self.display.phase {
                DebatePhase::WaitingForUser if !self.display.on_topic_screen() => {
                    Style::default().fg(USER_GREEN)
                }
                _ => Style::default().fg(DIM_GRAY),
            };
            let scroll_info = if self.scroll_offset > 0 {
                format!(" [^{} lines]", self.scroll_offset)
            } else {
                String::new()
            };
            let hints = if self.display.on_topic_screen() {
                "Enter start | Tab persona | F2 whiteboard | Esc quit"
            } else {
                "Enter send | Esc topics | F2 whiteboard | Ctrl-C quit"
            };
            Line::from(vec![
                Span::styled(format!(" {state}"), state_style),
                Span::styled(format!(" | {hints}{scroll_info}"), Style::default().fg(DIM_GRAY)),
            ])
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    /// Generate a quick goodbye message
    fn generate_goodbye(&mut self) {
        let idx = rand::random::<usize>() % QUICK_GOODBYES.len();
        self.goodbye_message = Some(QUICK_GOODBYES[idx].to_string());
    }

    /// Get the goodbye message for display after TUI closes
    pub fn goodbye(&self) -> Option<&str> {
        self.goodbye_message.as_deref()
    }

    /// Display state, for inspection
    pub fn display(&self) -> &DisplayState {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use pretty_assertions::assert_eq;

    fn duel_app(accepting_input: bool) -> App {
        let mut app = App::new(&DuelConfig::default()).unwrap();
        app.display.topic = Some("What is a self?".into());
        app.display.accepting_input = accepting_input;
        app
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .await;
        }
    }

    #[tokio::test]
    async fn test_duel_input_ignored_while_philosophers_speak() {
        let mut app = duel_app(false);
        app.input_buffer = "draft".into();

        type_text(&mut app, "hello").await;
        app.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE))
            .await;

        assert_eq!(app.input_buffer, "draft");
    }

    #[tokio::test]
    async fn test_duel_input_accepted_when_invited() {
        let mut app = duel_app(true);

        type_text(&mut app, "hello").await;
        app.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE))
            .await;

        assert_eq!(app.input_buffer, "hell");
    }

    #[tokio::test]
    async fn test_topic_input_always_editable() {
        let mut app = App::new(&DuelConfig::default()).unwrap();
        assert!(!app.display.accepting_input);

        type_text(&mut app, "free will").await;

        assert_eq!(app.input_buffer, "free will");
    }
}
