//! Headless page simulation: a virtual clock that delivers timer ticks,
//! animation frames, image loads, scrolls and clicks to a controller.

pub mod page;
pub mod scheduler;
pub mod session;

pub use page::{PageBuilder, SimulatedPage, SlideChange};
pub use scheduler::{Scheduler, Wake};
pub use session::Session;
