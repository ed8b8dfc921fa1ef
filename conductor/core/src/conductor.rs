//! Conductor - The Orchestration Core
//!
//! The Conductor owns the [`Session`], the [`Sequencer`] and the reaction
//! source. It is UI-agnostic and communicates only through:
//! - `SurfaceEvent`: events received FROM the UI surface
//! - `ConductorMessage`: directives sent TO the UI surface
//!
//! # Driving the timeline
//!
//! The Conductor never sleeps and never spawns. A surface calls
//! [`Conductor::poll_timeline`] once per frame (and may wait until
//! [`Conductor::next_deadline`]). Every due cue is turned into a
//! [`SessionAction`], applied through the session reducer, and the resulting
//! change is forwarded to the surface. The `_at` variants take an explicit
//! instant so tests can drive the clock.

use std::time::Instant;

use chrono::Local;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::choreography::{self, Cue, Step};
use crate::emotion::Emotion;
use crate::events::SurfaceEvent;
use crate::messages::{ConductorMessage, NotifyLevel};
use crate::persona::Persona;
use crate::reactions::{RandomReactions, ReactionSource};
use crate::sequencer::{DueCue, Generation, Sequencer};
use crate::session::{Session, SessionAction, SessionChange};

/// Conductor errors
#[derive(Debug, Error)]
pub enum ConductorError {
    /// The surface dropped its receiver
    #[error("surface disconnected")]
    SurfaceDisconnected,
}

/// Conductor configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ConductorConfig {
    /// Timing scale; every offset and hold is divided by it
    pub speed: f64,
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

/// The Conductor - headless duel orchestration
pub struct Conductor<R: ReactionSource = RandomReactions> {
    /// Configuration
    config: ConductorConfig,
    /// Current session
    session: Session,
    /// Pending choreography
    sequencer: Sequencer,
    /// Listener reaction draws
    reactions: R,
    /// Channel to send messages to UI surface
    tx: mpsc::Sender<ConductorMessage>,
}

impl Conductor<RandomReactions> {
    /// Create a Conductor with random listener reactions
    pub fn new(config: ConductorConfig, tx: mpsc::Sender<ConductorMessage>) -> Self {
        Self::with_reactions(config, RandomReactions::new(), tx)
    }
}

impl<R: ReactionSource> Conductor<R> {
    /// Create a Conductor with an explicit reaction source
    pub fn with_reactions(
        config: ConductorConfig,
        reactions: R,
        tx: mpsc::Sender<ConductorMessage>,
    ) -> Self {
        Self {
            config,
            session: Session::new(),
            sequencer: Sequencer::new(),
            reactions,
            tx,
        }
    }

    /// Current session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current exchange generation
    pub fn generation(&self) -> Generation {
        self.sequencer.generation()
    }

    /// When the next cue comes due, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.sequencer.next_deadline()
    }

    /// Reaction source (for inspection in tests)
    pub fn reactions(&self) -> &R {
        &self.reactions
    }

    /// Start the Conductor
    pub async fn start(&mut self) -> Result<(), ConductorError> {
        tracing::info!(speed = self.config.speed, "Conductor starting");
        self.send(ConductorMessage::SessionReset { topic: None })
            .await
    }

    /// Handle an event from the UI surface
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> Result<(), ConductorError> {
        self.handle_event_at(event, Instant::now()).await
    }

    /// Handle an event as if it arrived at `now`
    pub async fn handle_event_at(
        &mut self,
        event: SurfaceEvent,
        now: Instant,
    ) -> Result<(), ConductorError> {
        tracing::debug!(event = event.kind(), "Surface event");
        match event {
            SurfaceEvent::Connected => {
                self.send(ConductorMessage::SessionReset {
                    topic: self.session.topic().map(str::to_string),
                })
                .await?;
                for message in self.session.messages().to_vec() {
                    self.send(ConductorMessage::Message { message }).await?;
                }
                self.send(ConductorMessage::Phase {
                    phase: self.session.phase(),
                    accepting_input: self.session.accepting_input(),
                })
                .await?;
            }

            SurfaceEvent::StartDuel { topic } => {
                let topic = topic.trim();
                if topic.is_empty() {
                    tracing::debug!("Ignoring empty topic");
                    return Ok(());
                }
                self.begin_session(Some(topic.to_string())).await?;
                self.schedule(now, choreography::opening_exchange(topic));
                self.poll_timeline_at(now).await?;
            }

            SurfaceEvent::SubmitRemark { content } => {
                let change = self.session.apply(SessionAction::SubmitRemark {
                    content,
                    at: Local::now(),
                });
                // Rejected remarks are dropped without a trace on the surface
                let Some(change) = change else {
                    return Ok(());
                };
                let remark = match &change {
                    SessionChange::RemarkAccepted(message) => message.content.clone(),
                    _ => return Ok(()),
                };
                tracing::info!(generation = %self.generation(), "Remark accepted");
                self.send(change.into()).await?;
                self.schedule(now, choreography::response_exchange(&remark));
                self.poll_timeline_at(now).await?;
            }

            SurfaceEvent::PersonaFocused { persona } => {
                if self.session.topic().is_none() {
                    self.schedule(now, choreography::greeting(persona));
                    self.poll_timeline_at(now).await?;
                }
            }

            SurfaceEvent::BackToTopics => {
                self.begin_session(None).await?;
            }

            SurfaceEvent::SurfaceError { error, recoverable } => {
                if recoverable {
                    tracing::warn!("Surface error (recoverable): {}", error);
                    self.notify(NotifyLevel::Warning, &error).await?;
                } else {
                    tracing::error!("Surface error (fatal): {}", error);
                    self.shutdown().await?;
                }
            }

            SurfaceEvent::QuitRequested => {
                self.shutdown().await?;
            }
        }
        Ok(())
    }

    /// Apply every cue that is due now
    ///
    /// Returns whether anything changed.
    pub async fn poll_timeline(&mut self) -> Result<bool, ConductorError> {
        self.poll_timeline_at(Instant::now()).await
    }

    /// Apply every cue due at or before `now`, in due order
    pub async fn poll_timeline_at(&mut self, now: Instant) -> Result<bool, ConductorError> {
        let mut changed = false;
        while let Some(due) = self.sequencer.pop_due(now) {
            changed |= self.apply_cue(due).await?;
        }
        Ok(changed)
    }

    /// Shut down the Conductor
    pub async fn shutdown(&mut self) -> Result<(), ConductorError> {
        self.sequencer.advance_generation();
        tracing::info!("Conductor shutting down");
        self.send(ConductorMessage::Quit { message: None }).await
    }

    async fn begin_session(&mut self, topic: Option<String>) -> Result<(), ConductorError> {
        let generation = self.sequencer.advance_generation();
        tracing::info!(generation = %generation, topic = ?topic, "New session");
        if let Some(change) = self.session.apply(SessionAction::Reset { topic }) {
            self.send(change.into()).await?;
        }
        Ok(())
    }

    fn schedule(&mut self, start: Instant, steps: Vec<Step>) {
        let steps = choreography::scaled(steps, self.config.speed);
        self.sequencer.schedule(start, steps);
    }

    async fn apply_cue(&mut self, due: DueCue) -> Result<bool, ConductorError> {
        let DueCue { due, cue } = due;
        let action = match cue {
            Cue::Emotion {
                persona,
                emotion,
                hold,
            } => return self.show_emotion(persona, emotion, due + hold).await,
            Cue::Reaction { persona, hold } => {
                let emotion = self.reactions.pick(&Emotion::LISTENER_REACTIONS);
                tracing::trace!(persona = ?persona, emotion = ?emotion, "Listener reaction");
                return self.show_emotion(persona, emotion, due + hold).await;
            }
            Cue::Decay { persona, stamp } => SessionAction::DecayEmotion { persona, stamp },
            Cue::Typing(on) => SessionAction::SetTyping(on),
            Cue::Phase(phase) => SessionAction::EnterPhase(phase),
            Cue::Speak { persona, content } => SessionAction::AppendStatement {
                persona,
                content: content.to_string(),
                at: Local::now(),
            },
        };
        self.apply(action).await
    }

    /// Set an emotion and schedule its decay at `decay_at`
    async fn show_emotion(
        &mut self,
        persona: Persona,
        emotion: Emotion,
        decay_at: Instant,
    ) -> Result<bool, ConductorError> {
        let change = self
            .session
            .apply(SessionAction::SetEmotion { persona, emotion });
        if let Some(SessionChange::Emotion { stamp, .. }) = change {
            self.sequencer
                .schedule_at(decay_at, Cue::Decay { persona, stamp });
        }
        self.emit(change).await
    }

    async fn apply(&mut self, action: SessionAction) -> Result<bool, ConductorError> {
        let change = self.session.apply(action);
        self.emit(change).await
    }

    async fn emit(&self, change: Option<SessionChange>) -> Result<bool, ConductorError> {
        match change {
            Some(change) => {
                self.send(change.into()).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Send notification
    async fn notify(&self, level: NotifyLevel, message: &str) -> Result<(), ConductorError> {
        self.send(ConductorMessage::Notify {
            level,
            message: message.to_string(),
        })
        .await
    }

    /// Send a message to the UI surface
    async fn send(&self, msg: ConductorMessage) -> Result<(), ConductorError> {
        self.tx.send(msg).await.map_err(|e| {
            tracing::warn!("Failed to send message to surface: {}", e);
            ConductorError::SurfaceDisconnected
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactions::ScriptedReactions;
    use crate::session::DebatePhase;
    use std::time::Duration;

    fn conductor() -> (
        Conductor<ScriptedReactions>,
        mpsc::Receiver<ConductorMessage>,
    ) {
        let (tx, rx) = mpsc::channel(512);
        let c = Conductor::with_reactions(
            ConductorConfig::default(),
            ScriptedReactions::new([]),
            tx,
        );
        (c, rx)
    }

    fn drain(rx: &mut mpsc::Receiver<ConductorMessage>) -> Vec<ConductorMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    #[tokio::test]
    async fn test_conductor_start_announces_topic_selection() {
        let (mut c, mut rx) = conductor();
        c.start().await.unwrap();
        assert_eq!(
            drain(&mut rx),
            vec![ConductorMessage::SessionReset { topic: None }]
        );
    }

    #[tokio::test]
    async fn test_start_duel_applies_time_zero_steps() {
        let (mut c, mut rx) = conductor();
        let t0 = Instant::now();
        c.handle_event_at(
            SurfaceEvent::StartDuel {
                topic: "  mind  ".to_string(),
            },
            t0,
        )
        .await
        .unwrap();

        assert_eq!(c.session().topic(), Some("mind"));
        assert_eq!(c.session().emotion(Persona::Levin), Some(Emotion::Excited));
        assert_eq!(c.session().emotion(Persona::Barandes), Some(Emotion::Excited));
        let msgs = drain(&mut rx);
        assert_eq!(
            msgs.first(),
            Some(&ConductorMessage::SessionReset {
                topic: Some("mind".to_string())
            })
        );
        assert_eq!(c.next_deadline(), Some(t0 + Duration::from_millis(1000)));
    }

    #[tokio::test]
    async fn test_blank_topic_is_ignored() {
        let (mut c, mut rx) = conductor();
        c.handle_event(SurfaceEvent::StartDuel {
            topic: "   ".to_string(),
        })
        .await
        .unwrap();
        assert!(drain(&mut rx).is_empty());
        assert_eq!(c.session().topic(), None);
    }

    #[tokio::test]
    async fn test_remark_during_opening_is_silently_dropped() {
        let (mut c, mut rx) = conductor();
        let t0 = Instant::now();
        c.handle_event_at(
            SurfaceEvent::StartDuel {
                topic: "reality".to_string(),
            },
            t0,
        )
        .await
        .unwrap();
        drain(&mut rx);

        c.handle_event_at(
            SurfaceEvent::SubmitRemark {
                content: "wait!".to_string(),
            },
            t0 + Duration::from_millis(500),
        )
        .await
        .unwrap();
        assert!(drain(&mut rx).is_empty());
        assert_eq!(c.session().phase(), DebatePhase::Opening);
    }

    #[tokio::test]
    async fn test_greeting_only_on_topic_screen() {
        let (mut c, mut rx) = conductor();
        let t0 = Instant::now();
        c.handle_event_at(
            SurfaceEvent::PersonaFocused {
                persona: Persona::Barandes,
            },
            t0,
        )
        .await
        .unwrap();
        assert_eq!(c.session().emotion(Persona::Barandes), Some(Emotion::Smiling));
        assert_eq!(
            drain(&mut rx),
            vec![ConductorMessage::Emotion {
                persona: Persona::Barandes,
                emotion: Some(Emotion::Smiling)
            }]
        );

        c.poll_timeline_at(t0 + Duration::from_millis(2000))
            .await
            .unwrap();
        assert_eq!(c.session().emotion(Persona::Barandes), None);
    }

    #[tokio::test]
    async fn test_back_to_topics_cancels_pending_steps() {
        let (mut c, mut rx) = conductor();
        let t0 = Instant::now();
        c.handle_event_at(
            SurfaceEvent::StartDuel {
                topic: "data".to_string(),
            },
            t0,
        )
        .await
        .unwrap();
        c.handle_event_at(SurfaceEvent::BackToTopics, t0 + Duration::from_millis(10))
            .await
            .unwrap();
        drain(&mut rx);

        let changed = c
            .poll_timeline_at(t0 + Duration::from_secs(60))
            .await
            .unwrap();
        assert!(!changed);
        assert!(drain(&mut rx).is_empty());
        assert!(c.session().messages().is_empty());
        assert_eq!(c.next_deadline(), None);
    }

    #[tokio::test]
    async fn test_quit_sends_quit() {
        let (mut c, mut rx) = conductor();
        c.handle_event(SurfaceEvent::QuitRequested).await.unwrap();
        assert_eq!(
            drain(&mut rx),
            vec![ConductorMessage::Quit { message: None }]
        );
    }

    #[tokio::test]
    async fn test_recoverable_surface_error_becomes_warning() {
        let (mut c, mut rx) = conductor();
        c.handle_event(SurfaceEvent::SurfaceError {
            error: "export failed".to_string(),
            recoverable: true,
        })
        .await
        .unwrap();
        assert_eq!(
            drain(&mut rx),
            vec![ConductorMessage::Notify {
                level: NotifyLevel::Warning,
                message: "export failed".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_closed_surface_is_an_error() {
        let (mut c, rx) = conductor();
        drop(rx);
        let result = c.start().await;
        assert!(matches!(result, Err(ConductorError::SurfaceDisconnected)));
    }
}
