//! Duel Core - Headless Dialogue Orchestration for the Philosophical Duel
//!
//! This crate holds everything about the duel except drawing it: the two
//! personas and their canned response tables, the emotion tables, the
//! session reducer, the choreography and its deadline sequencer, and the
//! whiteboard model. It has no terminal dependencies, so it can drive a TUI
//! or run headless under test.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        UI Surface                            │
//! │            (ratatui TUI, or a test harness)                  │
//! │                           │                                  │
//! │                    SurfaceEvent (up)                         │
//! │                  ConductorMessage (down)                     │
//! └───────────────────────────┼─────────────────────────────────┘
//!                             │
//! ┌───────────────────────────┼─────────────────────────────────┐
//! │                       DUEL CORE                              │
//! │  ┌────────────────────────┴──────────────────────────────┐  │
//! │  │                      Conductor                         │  │
//! │  │  ┌──────────┐  ┌────────────┐  ┌───────────────────┐  │  │
//! │  │  │ Session  │  │ Sequencer  │  │ ReactionSource    │  │  │
//! │  │  │ reducer  │  │ (deadlines)│  │ (listener draws)  │  │  │
//! │  │  └──────────┘  └────────────┘  └───────────────────┘  │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! │   responses · choreography · emotion · whiteboard · config   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use duel_core::{Conductor, ConductorConfig, ConductorError, SurfaceEvent};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ConductorError> {
//!     let (tx, mut rx) = mpsc::channel(256);
//!     let mut conductor = Conductor::new(ConductorConfig::default(), tx);
//!     conductor.start().await?;
//!
//!     conductor
//!         .handle_event(SurfaceEvent::StartDuel { topic: "What is mind?".into() })
//!         .await?;
//!
//!     // Sleep until the next cue is due, fire it, render what it produced
//!     while let Some(deadline) = conductor.next_deadline() {
//!         tokio::time::sleep_until(deadline.into()).await;
//!         conductor.poll_timeline().await?;
//!         while let Ok(msg) = rx.try_recv() {
//!             println!("{msg:?}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod choreography;
pub mod conductor;
pub mod config;
pub mod emotion;
pub mod events;
pub mod messages;
pub mod persona;
pub mod reactions;
pub mod responses;
pub mod sequencer;
pub mod session;
pub mod whiteboard;

// Re-exports for convenience
pub use choreography::{Cue, Step};
pub use conductor::{Conductor, ConductorConfig, ConductorError};
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, DuelConfig, WhiteboardSettings,
};
pub use emotion::{
    AvatarOverlay, AvatarScale, Emotion, EmotionAnimation, EmotionColor, IndicatorSize,
};
pub use events::SurfaceEvent;
pub use messages::{ConductorMessage, NotifyLevel};
pub use persona::{Author, Persona};
pub use reactions::{RandomReactions, ReactionSource, ScriptedReactions};
pub use responses::{opening_statement, reply_to, ResponseKind, ResponseTable, EXAMPLE_TOPICS};
pub use sequencer::{Generation, Sequencer};
pub use session::{
    DebatePhase, DuelMessage, EmotionStamp, EmotionState, MessageId, Session, SessionAction,
    SessionChange,
};
pub use whiteboard::{
    Point, SketchCanvas, Stroke, StrokeCanvas, Whiteboard, WhiteboardError, STROKE_WIDTHS,
};
