//! Session Management
//!
//! A session is one duel: the chosen topic, the message history, the
//! current debate phase and each persona's emotion. It lives only in memory
//! and is replaced wholesale whenever a new topic is chosen.
//!
//! # Reducer
//!
//! Nothing outside this module writes session fields. Every mutation goes
//! through [`Session::apply`], which takes a [`SessionAction`] and returns
//! the resulting [`SessionChange`] (or `None` when the action is a no-op).
//! Each action is applied whole, so a surface never observes a
//! half-applied transition.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;
use crate::persona::{Author, Persona};

/// Sequence number of a message within one session (starts at 1)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A message in the duel transcript
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DuelMessage {
    /// Sequence number
    pub id: MessageId,
    /// Who wrote it
    pub author: Author,
    /// Message text
    pub content: String,
    /// When the message was appended
    pub created_at: DateTime<Local>,
}

/// Debate phase, gating whether user input is accepted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DebatePhase {
    /// Opening statements are being prepared
    #[default]
    Opening,
    /// The philosophers are producing messages
    Active,
    /// Declared for external extension; the built-in choreography never enters it
    Paused,
    /// The philosophers wait for the user's remark
    WaitingForUser,
}

impl DebatePhase {
    /// Whether a remark may be submitted in this phase
    #[must_use]
    pub fn accepts_input(self) -> bool {
        matches!(self, Self::WaitingForUser)
    }

    /// Status line text for this phase
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Opening => "Opening statements in progress...",
            Self::Active => "The philosophers are actively debating",
            Self::Paused => "Debate paused",
            Self::WaitingForUser => "Your turn to join the conversation!",
        }
    }
}

/// Identifies one emotion assignment; decays carry the stamp they clear
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct EmotionStamp(pub u64);

/// A persona's current emotion
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmotionState {
    /// Emotion on display, if any
    pub emotion: Option<Emotion>,
    /// Stamp of the assignment that produced `emotion`
    pub stamp: EmotionStamp,
}

/// Transitions the session understands
#[derive(Clone, Debug, PartialEq)]
pub enum SessionAction {
    /// Start over with a new topic (or none, for topic selection)
    Reset {
        /// The new topic
        topic: Option<String>,
    },
    /// Show an emotion on a persona
    SetEmotion {
        /// Whose face
        persona: Persona,
        /// Which emotion
        emotion: Emotion,
    },
    /// Clear a persona's emotion if it is still the one set under `stamp`
    DecayEmotion {
        /// Whose face
        persona: Persona,
        /// The assignment this decay belongs to
        stamp: EmotionStamp,
    },
    /// Toggle the "philosophers are responding" indicator
    SetTyping(bool),
    /// Move to another phase
    EnterPhase(DebatePhase),
    /// Append a philosopher's statement
    AppendStatement {
        /// Speaker
        persona: Persona,
        /// Statement text
        content: String,
        /// Creation time
        at: DateTime<Local>,
    },
    /// The user submits a remark (guarded)
    SubmitRemark {
        /// Raw input; trimmed before use
        content: String,
        /// Creation time
        at: DateTime<Local>,
    },
}

/// What an applied action changed
#[derive(Clone, Debug, PartialEq)]
pub enum SessionChange {
    /// The session was replaced
    Reset {
        /// The new topic
        topic: Option<String>,
    },
    /// A persona's emotion changed
    Emotion {
        /// Whose face
        persona: Persona,
        /// New emotion (None = cleared)
        emotion: Option<Emotion>,
        /// Stamp of the assignment
        stamp: EmotionStamp,
    },
    /// The typing indicator changed
    Typing(bool),
    /// The phase changed
    Phase {
        /// New phase
        phase: DebatePhase,
        /// Whether input is now accepted
        accepting_input: bool,
    },
    /// A philosopher's message was appended
    Appended(DuelMessage),
    /// The user's remark was accepted and appended
    RemarkAccepted(DuelMessage),
}

/// One duel session
#[derive(Clone, Debug)]
pub struct Session {
    topic: Option<String>,
    messages: Vec<DuelMessage>,
    phase: DebatePhase,
    emotions: [EmotionState; 2],
    accepting_input: bool,
    typing: bool,
    next_message_id: u64,
    /// Never reset, so stamps stay unique across sessions
    next_stamp: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an empty session with no topic
    #[must_use]
    pub fn new() -> Self {
        Self {
            topic: None,
            messages: Vec::new(),
            phase: DebatePhase::Opening,
            emotions: [EmotionState::default(); 2],
            accepting_input: false,
            typing: false,
            next_message_id: 1,
            next_stamp: 1,
        }
    }

    /// Current topic
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Transcript in append order
    pub fn messages(&self) -> &[DuelMessage] {
        &self.messages
    }

    /// Current phase
    pub fn phase(&self) -> DebatePhase {
        self.phase
    }

    /// Whether the user may submit a remark right now
    pub fn accepting_input(&self) -> bool {
        self.accepting_input
    }

    /// Whether an exchange is animating
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// A persona's emotion
    pub fn emotion(&self, persona: Persona) -> Option<Emotion> {
        self.emotions[slot(persona)].emotion
    }

    /// A persona's full emotion state
    pub fn emotion_state(&self, persona: Persona) -> EmotionState {
        self.emotions[slot(persona)]
    }

    /// Whether `content` would be accepted as a remark right now
    pub fn can_submit(&self, content: &str) -> bool {
        self.phase.accepts_input()
            && self.accepting_input
            && !self.typing
            && !content.trim().is_empty()
    }

    /// Apply an action; returns what changed, or `None` for a no-op
    pub fn apply(&mut self, action: SessionAction) -> Option<SessionChange> {
        match action {
            SessionAction::Reset { topic } => {
                self.topic = topic.clone();
                self.messages.clear();
                self.phase = DebatePhase::Opening;
                self.emotions = [EmotionState::default(); 2];
                self.accepting_input = false;
                self.typing = false;
                self.next_message_id = 1;
                Some(SessionChange::Reset { topic })
            }

            SessionAction::SetEmotion { persona, emotion } => {
                let stamp = EmotionStamp(self.next_stamp);
                self.next_stamp += 1;
                self.emotions[slot(persona)] = EmotionState {
                    emotion: Some(emotion),
                    stamp,
                };
                Some(SessionChange::Emotion {
                    persona,
                    emotion: Some(emotion),
                    stamp,
                })
            }

            SessionAction::DecayEmotion { persona, stamp } => {
                let state = self.emotions[slot(persona)];
                if state.stamp != stamp || state.emotion.is_none() {
                    return None;
                }
                self.emotions[slot(persona)] = EmotionState {
                    emotion: None,
                    stamp,
                };
                Some(SessionChange::Emotion {
                    persona,
                    emotion: None,
                    stamp,
                })
            }

            SessionAction::SetTyping(typing) => {
                if self.typing == typing {
                    return None;
                }
                self.typing = typing;
                Some(SessionChange::Typing(typing))
            }

            SessionAction::EnterPhase(phase) => {
                let accepting_input = phase.accepts_input();
                if self.phase == phase && self.accepting_input == accepting_input {
                    return None;
                }
                self.phase = phase;
                self.accepting_input = accepting_input;
                Some(SessionChange::Phase {
                    phase,
                    accepting_input,
                })
            }

            SessionAction::AppendStatement {
                persona,
                content,
                at,
            } => {
                let msg = self.push(Author::Persona(persona), content, at);
                Some(SessionChange::Appended(msg))
            }

            SessionAction::SubmitRemark { content, at } => {
                if !self.can_submit(&content) {
                    tracing::debug!(
                        phase = ?self.phase,
                        typing = self.typing,
                        "Remark rejected"
                    );
                    return None;
                }
                let msg = self.push(Author::User, content.trim().to_string(), at);
                self.phase = DebatePhase::Active;
                self.accepting_input = false;
                Some(SessionChange::RemarkAccepted(msg))
            }
        }
    }

    fn push(&mut self, author: Author, content: String, at: DateTime<Local>) -> DuelMessage {
        let msg = DuelMessage {
            id: MessageId(self.next_message_id),
            author,
            content,
            created_at: at,
        };
        self.next_message_id += 1;
        self.messages.push(msg.clone());
        msg
    }
}

fn slot(persona: Persona) -> usize {
    match persona {
        Persona::Levin => 0,
        Persona::Barandes => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn waiting_session() -> Session {
        let mut session = Session::new();
        session.apply(SessionAction::Reset {
            topic: Some("mind".to_string()),
        });
        session.apply(SessionAction::EnterPhase(DebatePhase::WaitingForUser));
        session
    }

    #[test]
    fn test_session_creation() {
        let session = Session::new();
        assert_eq!(session.topic(), None);
        assert!(session.messages().is_empty());
        assert_eq!(session.phase(), DebatePhase::Opening);
        assert!(!session.accepting_input());
        assert_eq!(session.emotion(Persona::Levin), None);
    }

    #[test]
    fn test_submit_rejected_outside_waiting_phase() {
        for phase in [DebatePhase::Opening, DebatePhase::Active, DebatePhase::Paused] {
            let mut session = Session::new();
            session.apply(SessionAction::EnterPhase(phase));
            let change = session.apply(SessionAction::SubmitRemark {
                content: "quantum?".to_string(),
                at: Local::now(),
            });
            assert_eq!(change, None);
            assert!(session.messages().is_empty());
        }
    }

    #[test]
    fn test_submit_rejects_blank_input() {
        let mut session = waiting_session();
        let change = session.apply(SessionAction::SubmitRemark {
            content: " \t\n ".to_string(),
            at: Local::now(),
        });
        assert_eq!(change, None);
        assert_eq!(session.phase(), DebatePhase::WaitingForUser);
    }

    #[test]
    fn test_submit_rejected_while_typing() {
        let mut session = waiting_session();
        session.apply(SessionAction::SetTyping(true));
        assert!(!session.can_submit("hello"));
    }

    #[test]
    fn test_submit_accepts_exactly_once() {
        let mut session = waiting_session();
        let change = session.apply(SessionAction::SubmitRemark {
            content: "  what about data?  ".to_string(),
            at: Local::now(),
        });
        match change {
            Some(SessionChange::RemarkAccepted(msg)) => {
                assert_eq!(msg.author, Author::User);
                assert_eq!(msg.content, "what about data?");
                assert_eq!(msg.id, MessageId(1));
            }
            other => panic!("unexpected change: {other:?}"),
        }
        assert_eq!(session.phase(), DebatePhase::Active);
        assert!(!session.accepting_input());

        let again = session.apply(SessionAction::SubmitRemark {
            content: "second".to_string(),
            at: Local::now(),
        });
        assert_eq!(again, None);
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn test_message_ids_strictly_increase() {
        let mut session = waiting_session();
        for (i, persona) in [Persona::Levin, Persona::Barandes, Persona::Levin]
            .into_iter()
            .enumerate()
        {
            session.apply(SessionAction::AppendStatement {
                persona,
                content: format!("statement {i}"),
                at: Local::now(),
            });
        }
        let ids: Vec<u64> = session.messages().iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_reset_restarts_numbering_and_clears_state() {
        let mut session = waiting_session();
        session.apply(SessionAction::AppendStatement {
            persona: Persona::Levin,
            content: "one".to_string(),
            at: Local::now(),
        });
        session.apply(SessionAction::SetEmotion {
            persona: Persona::Barandes,
            emotion: Emotion::Surprised,
        });

        session.apply(SessionAction::Reset {
            topic: Some("reality".to_string()),
        });
        assert!(session.messages().is_empty());
        assert_eq!(session.phase(), DebatePhase::Opening);
        assert_eq!(session.emotion(Persona::Barandes), None);
        assert_eq!(session.topic(), Some("reality"));

        session.apply(SessionAction::AppendStatement {
            persona: Persona::Barandes,
            content: "fresh".to_string(),
            at: Local::now(),
        });
        assert_eq!(session.messages()[0].id, MessageId(1));
    }

    #[test]
    fn test_decay_clears_matching_stamp() {
        let mut session = Session::new();
        let Some(SessionChange::Emotion { stamp, .. }) = session.apply(SessionAction::SetEmotion {
            persona: Persona::Levin,
            emotion: Emotion::Thinking,
        }) else {
            panic!("expected emotion change");
        };

        let change = session.apply(SessionAction::DecayEmotion {
            persona: Persona::Levin,
            stamp,
        });
        assert!(matches!(
            change,
            Some(SessionChange::Emotion { emotion: None, .. })
        ));
        assert_eq!(session.emotion(Persona::Levin), None);
    }

    #[test]
    fn test_decay_ignores_overwritten_emotion() {
        let mut session = Session::new();
        let Some(SessionChange::Emotion { stamp: old, .. }) =
            session.apply(SessionAction::SetEmotion {
                persona: Persona::Levin,
                emotion: Emotion::Thinking,
            })
        else {
            panic!("expected emotion change");
        };
        session.apply(SessionAction::SetEmotion {
            persona: Persona::Levin,
            emotion: Emotion::Insight,
        });

        let change = session.apply(SessionAction::DecayEmotion {
            persona: Persona::Levin,
            stamp: old,
        });
        assert_eq!(change, None);
        assert_eq!(session.emotion(Persona::Levin), Some(Emotion::Insight));
    }

    #[test]
    fn test_stamps_survive_reset() {
        let mut session = Session::new();
        session.apply(SessionAction::SetEmotion {
            persona: Persona::Levin,
            emotion: Emotion::Excited,
        });
        let before = session.emotion_state(Persona::Levin).stamp;
        session.apply(SessionAction::Reset { topic: None });
        session.apply(SessionAction::SetEmotion {
            persona: Persona::Levin,
            emotion: Emotion::Excited,
        });
        assert!(session.emotion_state(Persona::Levin).stamp > before);
    }

    #[test]
    fn test_redundant_phase_and_typing_are_noops() {
        let mut session = Session::new();
        assert_eq!(
            session.apply(SessionAction::EnterPhase(DebatePhase::Opening)),
            None
        );
        assert_eq!(session.apply(SessionAction::SetTyping(false)), None);
        assert_eq!(
            session.apply(SessionAction::SetTyping(true)),
            Some(SessionChange::Typing(true))
        );
    }
}
