//! Duel TUI - Terminal interface for the philosophical duel
//!
//! A full-screen terminal surface for the duel core. It owns no duel logic:
//! it forwards key presses to the embedded Conductor and renders whatever
//! the Conductor reports back.
//!
//! # Architecture
//!
//! - **App**: event loop, topic and duel screens, key bindings
//! - **Display**: display state mirrored from ConductorMessages
//! - **Indicator**: emotion glyphs and the persona badge
//! - **Whiteboard**: braille-canvas panel over the persona whiteboards

pub mod app;
pub mod conductor_client;
pub mod display;
pub mod indicator;
pub mod theme;
pub mod whiteboard;

pub use app::App;
pub use conductor_client::ConductorClient;
pub use display::DisplayState;
