//! Hero slideshow for a marketing page.
//!
//! The slideshow cycles images on a timer at random, never-repeating screen
//! quadrants, pauses while the hero is scrolled away, and advances on any
//! document click. The core is host-driven: a [`host::Host`] performs DOM
//! mutations and schedules callbacks, and feeds them back through
//! [`controller::SlideshowController`]. [`sim`] provides a deterministic
//! headless host; on `wasm32` the `wasm` module binds the real DOM.

pub mod config;
pub mod constants;
pub mod controller;
pub mod driver;
pub mod error;
pub mod footer;
pub mod host;
pub mod layout;
pub mod mobile_strip;
pub mod sim;
pub mod slide;
pub mod state;
pub mod transition;
pub mod visibility;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use config::{SiteConfig, SlideshowConfig};
pub use controller::SlideshowController;
pub use error::{SlideshowError, SlideshowResult};
pub use host::Host;
pub use layout::{Layout, Position, Quadrant};
pub use slide::{Manifest, Slide};
pub use state::{FrameTask, Mode, Opacity, PlaybackState, TimerId};
pub use visibility::{VisibilityEntry, VisibilityGate};
