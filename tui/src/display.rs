//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from ConductorMessages and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the Conductor tells it to.
//! Display state is the bridge between ConductorMessages and rendering.
//!
//! - DisplayMessage: A rendered transcript entry
//! - DisplayEmotion: A persona's indicator plus its animation start
//! - DisplayNotification: The status line message

use std::time::{Duration, Instant};

use duel_core::{
    Author, ConductorMessage, DebatePhase, DuelMessage, Emotion, MessageId, NotifyLevel, Persona,
};

/// How long a notification stays in the status line
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// A rendered transcript entry
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayMessage {
    /// Sequence id
    pub id: MessageId,
    /// Who said it
    pub author: Author,
    /// The message content
    pub content: String,
    /// Wall-clock time, `HH:MM`
    pub timestamp: String,
}

impl From<DuelMessage> for DisplayMessage {
    fn from(message: DuelMessage) -> Self {
        Self {
            id: message.id,
            author: message.author,
            content: message.content,
            timestamp: message.created_at.format("%H:%M").to_string(),
        }
    }
}

impl DisplayMessage {
    /// Header line prefix, e.g. `Michael Levin: `
    pub fn prefix(&self) -> String {
        match self.author {
            Author::Persona(persona) => format!("{}: ", persona.display_name()),
            Author::User => format!("{}: ", self.author.label()),
        }
    }
}

/// A persona's indicator as the surface sees it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayEmotion {
    /// Current emotion (None = nothing shown)
    pub emotion: Option<Emotion>,
    /// When the current emotion appeared; the animation runs from here
    pub since: Instant,
}

impl DisplayEmotion {
    fn new(now: Instant) -> Self {
        Self {
            emotion: None,
            since: now,
        }
    }

    /// Time into the current animation
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.since)
    }
}

/// A notification to display
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayNotification {
    /// Notification level
    pub level: NotifyLevel,
    /// Message content
    pub message: String,
    /// When it was raised
    pub raised_at: Instant,
}

/// Current display state
#[derive(Clone, Debug)]
pub struct DisplayState {
    /// Current topic (None = topic selection screen)
    pub topic: Option<String>,
    /// Transcript
    pub messages: Vec<DisplayMessage>,
    /// Debate phase
    pub phase: DebatePhase,
    /// Whether a remark would be accepted now
    pub accepting_input: bool,
    /// Whether the philosophers are "typing"
    pub typing: bool,
    /// Pending notification (if any)
    pub notification: Option<DisplayNotification>,
    /// Set once the Conductor asked the surface to quit
    pub quit_requested: bool,
    emotions: [DisplayEmotion; 2],
}

impl Default for DisplayState {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            topic: None,
            messages: Vec::new(),
            phase: DebatePhase::default(),
            accepting_input: false,
            typing: false,
            notification: None,
            quit_requested: false,
            emotions: [DisplayEmotion::new(now); 2],
        }
    }
}

fn slot(persona: Persona) -> usize {
    match persona {
        Persona::Levin => 0,
        Persona::Barandes => 1,
    }
}

impl DisplayState {
    /// Create a new display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a ConductorMessage to update display state
    pub fn apply_message(&mut self, msg: ConductorMessage) {
        self.apply_message_at(msg, Instant::now());
    }

    /// Apply a ConductorMessage observed at `now`
    pub fn apply_message_at(&mut self, msg: ConductorMessage, now: Instant) {
        match msg {
            // Session messages
            ConductorMessage::SessionReset { topic } => {
                self.topic = topic;
                self.messages.clear();
                self.phase = DebatePhase::default();
                self.accepting_input = false;
                self.typing = false;
                self.emotions = [DisplayEmotion::new(now); 2];
            }
            ConductorMessage::Message { message }
            | ConductorMessage::RemarkAccepted { message } => {
                self.messages.push(message.into());
            }
            ConductorMessage::Phase {
                phase,
                accepting_input,
            } => {
                self.phase = phase;
                self.accepting_input = accepting_input;
            }
            ConductorMessage::Typing { active } => {
                self.typing = active;
            }

            // Persona directives
            ConductorMessage::Emotion { persona, emotion } => {
                let entry = &mut self.emotions[slot(persona)];
                if entry.emotion != emotion {
                    entry.emotion = emotion;
                    entry.since = now;
                }
            }

            // System messages
            ConductorMessage::Notify { level, message } => {
                self.notify_at(level, message, now);
            }
            ConductorMessage::Quit { message } => {
                // The app will handle quitting
                self.quit_requested = true;
                if let Some(message) = message {
                    self.notify_at(NotifyLevel::Info, message, now);
                }
            }
        }
    }

    /// Raise a surface-local notification
    pub fn notify(&mut self, level: NotifyLevel, message: impl Into<String>) {
        self.notify_at(level, message, Instant::now());
    }

    fn notify_at(&mut self, level: NotifyLevel, message: impl Into<String>, now: Instant) {
        self.notification = Some(DisplayNotification {
            level,
            message: message.into(),
            raised_at: now,
        });
    }

    /// Expire timed state
    pub fn update(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| now.saturating_duration_since(n.raised_at) >= NOTIFICATION_TTL)
        {
            self.notification = None;
        }
    }

    /// A persona's indicator
    pub fn emotion(&self, persona: Persona) -> DisplayEmotion {
        self.emotions[slot(persona)]
    }

    /// Whether the topic selection screen is showing
    pub fn on_topic_screen(&self) -> bool {
        self.topic.is_none()
    }

    /// Clear the notification
    pub fn clear_notification(&mut self) {
        self.notification = None;
    }
}
