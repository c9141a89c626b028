use std::time::Duration;

use rand::rngs::StdRng;
use tracing::{debug, trace};

use crate::host::Host;
use crate::layout::{Layout, Quadrant};
use crate::slide::Manifest;
use crate::state::{FrameTask, Opacity, PlaybackState, QuadrantState, TimerId};

/// Owns the playback state and turns ticks, clicks and visibility changes
/// into slide changes.
pub struct AdvanceDriver {
    manifest: Manifest,
    layout: Layout,
    interval: Duration,
    playback: PlaybackState,
    quadrants: QuadrantState,
    rng: StdRng,
}

impl AdvanceDriver {
    pub fn new(manifest: Manifest, layout: Layout, interval: Duration, rng: StdRng) -> Self {
        Self {
            manifest,
            layout,
            interval,
            playback: PlaybackState::default(),
            quadrants: QuadrantState::default(),
            rng,
        }
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn last_quadrant(&self) -> Option<Quadrant> {
        self.quadrants.last
    }

    /// Show slide `index` at a fresh position in a different quadrant.
    ///
    /// The fade-in only starts once the image is ready, so a slow image never
    /// flashes at zero size.
    pub fn advance_to<H: Host>(&mut self, host: &mut H, index: usize) {
        let Some(slide) = self.manifest.get(index) else {
            return;
        };
        self.playback.current_index = index;

        let (position, quadrant) = self.layout.next_position(&mut self.rng, self.quadrants.last);
        self.quadrants.last = Some(quadrant);
        debug!(
            index,
            src = slide.src(),
            quadrant = quadrant.name(),
            left = position.left_pct,
            top = position.top_pct,
            "advancing slide"
        );

        host.place_slide(position);
        host.set_slide_source(slide.src());

        if host.slide_image_ready() {
            host.request_frame(FrameTask::HideSlide);
        } else {
            host.await_slide_load();
        }
    }

    fn advance_next<H: Host>(&mut self, host: &mut H) {
        let next = self.manifest.next_index(self.playback.current_index);
        self.advance_to(host, next);
    }

    pub fn on_visibility_change<H: Host>(&mut self, host: &mut H, in_view: bool) {
        self.playback.in_view = in_view;
        if in_view {
            self.start_timer(host);
        } else {
            self.stop_timer(host);
        }
    }

    /// Click anywhere on the document: advance now, then restart the cadence.
    pub fn on_user_advance<H: Host>(&mut self, host: &mut H) {
        self.advance_next(host);
        // Stop before restart so two intervals never coexist
        self.stop_timer(host);
        if self.playback.in_view {
            self.start_timer(host);
        }
    }

    pub fn on_timer<H: Host>(&mut self, host: &mut H, timer: TimerId) {
        if self.playback.timer != Some(timer) {
            trace!(?timer, "ignoring tick from a cleared timer");
            return;
        }
        if !self.playback.in_view {
            trace!("ignoring tick while out of view");
            return;
        }
        self.advance_next(host);
    }

    pub fn on_slide_loaded<H: Host>(&mut self, host: &mut H) {
        host.request_frame(FrameTask::HideSlide);
    }

    pub fn on_frame<H: Host>(&mut self, host: &mut H, task: FrameTask) {
        match task {
            FrameTask::HideSlide => {
                host.set_slide_opacity(Opacity::Hidden);
                host.request_frame(FrameTask::RevealSlide);
            }
            FrameTask::RevealSlide => host.set_slide_opacity(Opacity::Visible),
        }
    }

    fn start_timer<H: Host>(&mut self, host: &mut H) {
        if self.playback.timer.is_some() {
            return;
        }
        let timer = host.start_interval(self.interval);
        debug!(?timer, interval_ms = self.interval.as_millis() as u64, "timer started");
        self.playback.timer = Some(timer);
    }

    fn stop_timer<H: Host>(&mut self, host: &mut H) {
        if let Some(timer) = self.playback.timer.take() {
            host.clear_interval(timer);
            debug!(?timer, "timer stopped");
        }
    }

    #[cfg(test)]
    pub(crate) fn set_last_quadrant(&mut self, quadrant: Quadrant) {
        self.quadrants.last = Some(quadrant);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedPage;
    use rand::SeedableRng;

    fn driver() -> AdvanceDriver {
        AdvanceDriver::new(
            Manifest::default(),
            Layout::default(),
            Duration::from_millis(2000),
            StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn entering_view_twice_keeps_one_timer() {
        let mut page = SimulatedPage::builder().build();
        let mut driver = driver();

        driver.on_visibility_change(&mut page, true);
        driver.on_visibility_change(&mut page, true);

        assert_eq!(page.active_timers(), 1);
        assert!(driver.playback().timer.is_some());
    }

    #[test]
    fn leaving_view_twice_clears_once() {
        let mut page = SimulatedPage::builder().build();
        let mut driver = driver();

        driver.on_visibility_change(&mut page, true);
        driver.on_visibility_change(&mut page, false);
        driver.on_visibility_change(&mut page, false);

        assert_eq!(page.active_timers(), 0);
        assert_eq!(page.cleared_timers(), 1);
        assert!(driver.playback().timer.is_none());
    }

    #[test]
    fn stale_tick_is_ignored() {
        let mut page = SimulatedPage::builder().build();
        let mut driver = driver();

        driver.on_visibility_change(&mut page, true);
        let old = driver.playback().timer.unwrap();
        driver.on_user_advance(&mut page);
        let index = driver.playback().current_index;

        driver.on_timer(&mut page, old);
        assert_eq!(driver.playback().current_index, index);
        assert_ne!(driver.playback().timer, Some(old));
    }

    #[test]
    fn click_out_of_view_advances_without_timer() {
        let mut page = SimulatedPage::builder().build();
        let mut driver = driver();

        driver.on_user_advance(&mut page);

        assert_eq!(driver.playback().current_index, 1);
        assert_eq!(page.active_timers(), 0);
    }

    #[test]
    fn advance_wraps_to_first_slide() {
        let mut page = SimulatedPage::builder().build();
        let mut driver = driver();

        driver.advance_to(&mut page, 4);
        driver.on_user_advance(&mut page);

        assert_eq!(driver.playback().current_index, 0);
    }

    #[test]
    fn next_quadrant_avoids_the_forced_one() {
        let mut page = SimulatedPage::builder().build();
        let mut driver = driver();

        for quadrant in Quadrant::ALL {
            driver.set_last_quadrant(quadrant);
            driver.advance_to(&mut page, 0);
            assert_ne!(driver.last_quadrant(), Some(quadrant));
        }
    }

    #[test]
    fn ready_image_goes_straight_to_the_fade() {
        let mut page = SimulatedPage::builder().build();
        page.mark_loaded("images/space.png");
        let mut driver = driver();

        driver.advance_to(&mut page, 0);

        assert_eq!(page.pending_load_waits(), 0);
        assert_eq!(page.pending_frames(), 1);
    }

    #[test]
    fn frames_fade_out_then_in() {
        let mut page = SimulatedPage::builder().build();
        let mut driver = driver();

        driver.on_frame(&mut page, FrameTask::HideSlide);
        assert_eq!(page.slide_opacity(), Some(Opacity::Hidden));
        driver.on_frame(&mut page, FrameTask::RevealSlide);
        assert_eq!(page.slide_opacity(), Some(Opacity::Visible));
    }
}
