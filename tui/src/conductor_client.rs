//! Conductor Client
//!
//! Thin wrapper around the Conductor for TUI integration.
//! This client embeds the Conductor directly (no network) and provides
//! a convenient interface for sending events and receiving messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any duel logic.
//! All orchestration happens in the Conductor. The TUI's job is:
//! 1. Convert terminal events to SurfaceEvents
//! 2. Send SurfaceEvents to Conductor
//! 3. Poll the Conductor's timeline once per frame
//! 4. Receive ConductorMessages and render display state from them

use std::time::Instant;

use tokio::sync::mpsc;

use duel_core::{
    Conductor, ConductorConfig, ConductorError, ConductorMessage, Persona, RandomReactions,
    ReactionSource, SurfaceEvent,
};

/// Channel capacity; a full opening exchange emits well under this
const CHANNEL_CAPACITY: usize = 256;

/// Client for communicating with the embedded Conductor
pub struct ConductorClient<R: ReactionSource = RandomReactions> {
    /// The embedded Conductor instance
    conductor: Conductor<R>,
    /// Receiver for messages from Conductor
    rx: mpsc::Receiver<ConductorMessage>,
}

impl ConductorClient<RandomReactions> {
    /// Create a new ConductorClient with embedded Conductor
    pub fn new(config: ConductorConfig) -> Self {
        Self::with_reactions(config, RandomReactions::new())
    }
}

impl<R: ReactionSource> ConductorClient<R> {
    /// Create a client whose listener reactions come from `reactions`
    pub fn with_reactions(config: ConductorConfig, reactions: R) -> Self {
        // Create channel for Conductor -> TUI messages
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let conductor = Conductor::with_reactions(config, reactions, tx);
        Self { conductor, rx }
    }

    /// Start the Conductor
    pub async fn start(&mut self) -> Result<(), ConductorError> {
        self.conductor.start().await
    }

    /// Connect this surface to the Conductor
    pub async fn connect(&mut self) -> Result<(), ConductorError> {
        self.conductor.handle_event(SurfaceEvent::Connected).await
    }

    /// Start a duel on `topic`
    pub async fn start_duel(&mut self, topic: String) -> Result<(), ConductorError> {
        self.conductor
            .handle_event(SurfaceEvent::StartDuel { topic })
            .await
    }

    /// Submit the user's remark
    pub async fn submit_remark(&mut self, content: String) -> Result<(), ConductorError> {
        self.conductor
            .handle_event(SurfaceEvent::SubmitRemark { content })
            .await
    }

    /// A persona card gained focus on the topic screen
    pub async fn persona_focused(&mut self, persona: Persona) -> Result<(), ConductorError> {
        self.conductor
            .handle_event(SurfaceEvent::PersonaFocused { persona })
            .await
    }

    /// Return to topic selection
    pub async fn back_to_topics(&mut self) -> Result<(), ConductorError> {
        self.conductor.handle_event(SurfaceEvent::BackToTopics).await
    }

    /// Report a surface-side failure
    pub async fn report_error(
        &mut self,
        error: String,
        recoverable: bool,
    ) -> Result<(), ConductorError> {
        self.conductor
            .handle_event(SurfaceEvent::SurfaceError { error, recoverable })
            .await
    }

    /// Notify Conductor that user wants to quit
    pub async fn request_quit(&mut self) -> Result<(), ConductorError> {
        self.conductor.handle_event(SurfaceEvent::QuitRequested).await
    }

    /// Fire due choreography steps (must be called regularly)
    pub async fn poll_timeline(&mut self) -> Result<bool, ConductorError> {
        self.conductor.poll_timeline().await
    }

    /// When the next choreography step is due, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.conductor.next_deadline()
    }

    /// Try to receive a message from the Conductor (non-blocking)
    pub fn try_recv(&mut self) -> Option<ConductorMessage> {
        self.rx.try_recv().ok()
    }

    /// Receive all pending messages from the Conductor (non-blocking)
    pub fn recv_all(&mut self) -> Vec<ConductorMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// The embedded Conductor
    pub fn conductor(&self) -> &Conductor<R> {
        &self.conductor
    }
}

impl Default for ConductorClient<RandomReactions> {
    fn default() -> Self {
        Self::new(ConductorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_core::{DebatePhase, Emotion, ScriptedReactions};
    use pretty_assertions::assert_eq;
    use tokio_test::block_on;

    fn client() -> ConductorClient<ScriptedReactions> {
        ConductorClient::with_reactions(
            ConductorConfig::default(),
            ScriptedReactions::new([Emotion::Agreeing]),
        )
    }

    #[test]
    fn test_connect_replays_empty_session() {
        let mut client = client();
        block_on(client.start()).unwrap();
        block_on(client.connect()).unwrap();

        let messages = client.recv_all();
        assert_eq!(
            messages,
            vec![
                ConductorMessage::SessionReset { topic: None },
                ConductorMessage::SessionReset { topic: None },
                ConductorMessage::Phase {
                    phase: DebatePhase::Opening,
                    accepting_input: false,
                },
            ]
        );
        assert!(client.try_recv().is_none());
    }

    #[test]
    fn test_start_duel_schedules_choreography() {
        let mut client = client();
        block_on(client.start_duel("What is a self?".into())).unwrap();

        assert!(client.next_deadline().is_some());
        assert_eq!(client.conductor().session().topic(), Some("What is a self?"));
        assert!(matches!(
            client.try_recv(),
            Some(ConductorMessage::SessionReset { topic: Some(_) })
        ));
    }

    #[test]
    fn test_blank_topic_is_ignored() {
        let mut client = client();
        block_on(client.start_duel("   ".into())).unwrap();
        assert!(client.recv_all().is_empty());
        assert!(client.next_deadline().is_none());
    }
}
