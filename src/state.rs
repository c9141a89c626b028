use serde::Serialize;

use crate::layout::Quadrant;

/// Handle of a running interval, as handed out by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimerId(pub u32);

/// Work queued for the next animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrameTask {
    HideSlide,   // opacity -> 0, then queue RevealSlide
    RevealSlide, // opacity -> 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Opacity {
    Hidden,
    Visible,
}

impl Opacity {
    pub fn css(self) -> &'static str {
        match self {
            Opacity::Hidden => "0",
            Opacity::Visible => "1",
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub enum Mode {
    Inactive, // Hero region or slideshow container missing
    Static,   // Reduced motion: one fixed frame
    Animated, // Timer, observer and click handling live
}

/// Quadrant of the slide currently on screen; `None` before the first slide.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QuadrantState {
    pub last: Option<Quadrant>,
}

/// `timer` is `Some` iff `in_view` holds (the driver only exists outside reduced motion).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    pub current_index: usize,
    pub in_view: bool,
    pub timer: Option<TimerId>,
}
