use std::time::Duration;

use crate::layout::Position;
use crate::state::{FrameTask, Opacity, TimerId};

/// Everything the slideshow needs from the page it lives on.
///
/// Scheduling methods only register interest: the host must call back into
/// the controller later (`on_timer`, `on_frame`, `on_slide_loaded`,
/// `on_visibility`, `on_click`), never from inside the registering call.
pub trait Host {
    // --- DOM contract ---
    fn has_hero_region(&self) -> bool;
    fn has_slideshow_container(&self) -> bool;
    fn prefers_reduced_motion(&self) -> bool;

    /// Child count of the mobile strip, or `None` when the page has no strip.
    fn mobile_strip_len(&self) -> Option<usize>;
    fn append_strip_item(&mut self, src: &str);

    /// Reduced-motion path: a bare image at a fixed position.
    fn mount_static_image(&mut self, src: &str, position: Position);

    // --- Animated slide ---
    fn preload(&mut self, src: &str);
    fn mount_slide(&mut self);
    fn place_slide(&mut self, position: Position);
    fn set_slide_source(&mut self, src: &str);
    fn set_slide_opacity(&mut self, opacity: Opacity);
    /// True when the current source has finished loading with a non-zero size.
    fn slide_image_ready(&self) -> bool;

    // --- Continuations ---
    /// One-shot: call `on_slide_loaded` once the current slide source finishes
    /// loading. A wait registered for an earlier source must not fire for a
    /// later one.
    fn await_slide_load(&mut self);
    fn request_frame(&mut self, task: FrameTask);
    fn start_interval(&mut self, period: Duration) -> TimerId;
    /// Pending ticks of a cleared timer must never be delivered.
    fn clear_interval(&mut self, timer: TimerId);
    fn observe_hero(&mut self, threshold: f64);
    fn listen_for_clicks(&mut self);
}
