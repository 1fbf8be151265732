//! Draw-data composition
//!
//! Builds plain-data [`Scene`]s that an external painter consumes. Nothing here
//! touches a graphics API.

pub mod backdrop;
pub mod scene;

pub use backdrop::{Backdrop, Color, Darkness, Overlay, Sky};
pub use scene::{
    Caption, CaptureOverlay, CurrentBand, Scene, Sprite, compose_current, compose_live, compose_replay,
};
