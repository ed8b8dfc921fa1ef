//! Surface Events
//!
//! Events sent from UI surfaces to the Conductor. Surfaces report what the
//! user did; the Conductor decides what it means. A remark submitted at the
//! wrong moment is still forwarded, and the Conductor silently drops it.

use serde::{Deserialize, Serialize};

use crate::persona::Persona;

/// Events from UI Surface to Conductor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    // ============================================
    // Connection Events
    // ============================================
    /// Surface connected; the Conductor replays the current session state
    Connected,

    // ============================================
    // Duel Events
    // ============================================
    /// The user picked or typed a topic
    StartDuel {
        /// Free-text topic (trimmed by the Conductor)
        topic: String,
    },

    /// The user submitted a remark
    SubmitRemark {
        /// Raw input buffer
        content: String,
    },

    /// A persona card gained focus on the topic screen
    PersonaFocused {
        /// Which card
        persona: Persona,
    },

    /// Leave the duel and return to topic selection
    BackToTopics,

    // ============================================
    // System Events
    // ============================================
    /// Surface hit an error it wants reported
    SurfaceError {
        /// Error description
        error: String,
        /// Whether the surface can continue
        recoverable: bool,
    },

    /// User requested quit
    QuitRequested,
}

impl SurfaceEvent {
    /// Short name for log lines
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::StartDuel { .. } => "start_duel",
            Self::SubmitRemark { .. } => "submit_remark",
            Self::PersonaFocused { .. } => "persona_focused",
            Self::BackToTopics => "back_to_topics",
            Self::SurfaceError { .. } => "surface_error",
            Self::QuitRequested => "quit_requested",
        }
    }
}
