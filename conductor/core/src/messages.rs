//! Conductor Messages
//!
//! Messages sent from the Conductor to UI surfaces. A surface holds no duel
//! logic of its own: it mirrors these messages into display state and
//! renders that.

use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;
use crate::persona::Persona;
use crate::session::{DebatePhase, DuelMessage, SessionChange};

/// Messages from Conductor to UI Surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConductorMessage {
    // ============================================
    // Session Messages
    // ============================================
    /// A new session replaced the old one; drop all transcript and emotion state
    SessionReset {
        /// The new topic (None = topic selection)
        topic: Option<String>,
    },

    /// A philosopher's message to display
    Message {
        /// The message
        message: DuelMessage,
    },

    /// The user's remark was accepted; display it and clear the input buffer
    RemarkAccepted {
        /// The accepted remark
        message: DuelMessage,
    },

    /// Debate phase changed
    Phase {
        /// New phase
        phase: DebatePhase,
        /// Whether a remark would be accepted now
        accepting_input: bool,
    },

    /// The philosophers started or stopped "typing"
    Typing {
        /// Whether an exchange is animating
        active: bool,
    },

    // ============================================
    // Persona Directives
    // ============================================
    /// Show (or clear) a persona's emotion indicator
    Emotion {
        /// Whose face
        persona: Persona,
        /// New emotion (None = clear)
        emotion: Option<Emotion>,
    },

    // ============================================
    // System Messages
    // ============================================
    /// System notification
    Notify {
        /// Notification level
        level: NotifyLevel,
        /// Message content
        message: String,
    },

    /// Request surface to quit
    Quit {
        /// Optional goodbye message
        message: Option<String>,
    },
}

impl From<SessionChange> for ConductorMessage {
    fn from(change: SessionChange) -> Self {
        match change {
            SessionChange::Reset { topic } => Self::SessionReset { topic },
            SessionChange::Emotion {
                persona, emotion, ..
            } => Self::Emotion { persona, emotion },
            SessionChange::Typing(active) => Self::Typing { active },
            SessionChange::Phase {
                phase,
                accepting_input,
            } => Self::Phase {
                phase,
                accepting_input,
            },
            SessionChange::Appended(message) => Self::Message { message },
            SessionChange::RemarkAccepted(message) => Self::RemarkAccepted { message },
        }
    }
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Success
    Success,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::Author;
    use crate::session::{EmotionStamp, MessageId};
    use chrono::Local;

    #[test]
    fn test_emotion_change_drops_stamp() {
        let msg: ConductorMessage = SessionChange::Emotion {
            persona: Persona::Barandes,
            emotion: Some(Emotion::Eureka),
            stamp: EmotionStamp(9),
        }
        .into();
        assert_eq!(
            msg,
            ConductorMessage::Emotion {
                persona: Persona::Barandes,
                emotion: Some(Emotion::Eureka),
            }
        );
    }

    #[test]
    fn test_remark_accepted_maps_to_its_own_variant() {
        let message = DuelMessage {
            id: MessageId(3),
            author: Author::User,
            content: "hi".to_string(),
            created_at: Local::now(),
        };
        let msg: ConductorMessage = SessionChange::RemarkAccepted(message.clone()).into();
        assert_eq!(msg, ConductorMessage::RemarkAccepted { message });
    }

    #[test]
    fn test_messages_serialize_to_json() {
        let msg = ConductorMessage::Phase {
            phase: DebatePhase::WaitingForUser,
            accepting_input: true,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("WaitingForUser"));
        let back: ConductorMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
