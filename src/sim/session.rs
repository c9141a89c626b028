use std::time::Duration;

use rand::rngs::StdRng;
use tracing::trace;

use crate::config::SlideshowConfig;
use crate::controller::SlideshowController;
use crate::sim::page::SimulatedPage;
use crate::sim::scheduler::Wake;

/// A controller bound to a simulated page, driven by the virtual clock.
pub struct Session {
    controller: SlideshowController,
    page: SimulatedPage,
}

impl Session {
    /// Initialize the slideshow at the page's current time (DOM-ready).
    pub fn start(config: &SlideshowConfig, mut page: SimulatedPage, rng: StdRng) -> Self {
        let controller = SlideshowController::init_with_rng(config, &mut page, rng);
        Self { controller, page }
    }

    pub fn controller(&self) -> &SlideshowController {
        &self.controller
    }

    pub fn page(&self) -> &SimulatedPage {
        &self.page
    }

    pub fn now(&self) -> Duration {
        self.page.now()
    }

    /// Script a document click.
    pub fn click_at(&mut self, at: Duration) {
        self.page.scheduler_mut().schedule(at, Wake::Click);
    }

    /// Script a scroll that leaves `ratio` of the hero visible.
    pub fn scroll_at(&mut self, at: Duration, ratio: f64) {
        self.page.scheduler_mut().schedule(at, Wake::Viewport(ratio));
    }

    /// Deliver everything due up to and including `until`.
    pub fn run_until(&mut self, until: Duration) {
        while let Some((at, wake)) = self.page.scheduler_mut().pop_due(until) {
            trace!(at_ms = at.as_millis() as u64, ?wake, "delivering");
            self.deliver(at, wake);
        }
        self.page.scheduler_mut().settle(until);
    }

    fn deliver(&mut self, at: Duration, wake: Wake) {
        let Self { controller, page } = self;
        match wake {
            Wake::Interval(timer) => {
                // Cleared timers keep no period, so their late ticks stop here
                let Some(period) = page.timer_period(timer) else {
                    return;
                };
                page.scheduler_mut().schedule(at + period, Wake::Interval(timer));
                controller.on_timer(page, timer);
            }
            Wake::Frame(task) => {
                page.take_frame();
                controller.on_frame(page, task);
            }
            Wake::Load(src) => {
                for _ in 0..page.finish_load(&src) {
                    controller.on_slide_loaded(page);
                }
            }
            Wake::ObserverStart => {
                if let Some(entry) = page.initial_entry() {
                    controller.on_visibility(page, &[entry]);
                }
            }
            Wake::Viewport(ratio) => {
                if let Some(entry) = page.scroll_to(ratio) {
                    controller.on_visibility(page, &[entry]);
                }
            }
            Wake::Click => {
                if page.is_listening_for_clicks() {
                    controller.on_click(page);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Opacity;
    use rand::SeedableRng;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_slide_fades_in_over_two_frames() {
        let config = SlideshowConfig::default();
        let page = SimulatedPage::builder().build();
        let mut session = Session::start(&config, page, StdRng::seed_from_u64(1));

        session.run_until(ms(100));

        assert_eq!(
            session.page().opacity_changes(),
            &[(16, Opacity::Hidden), (32, Opacity::Visible)]
        );
    }

    #[test]
    fn slow_image_delays_the_fade() {
        let config = SlideshowConfig::default();
        let page = SimulatedPage::builder().slow_image("images/space.png", ms(500)).build();
        let mut session = Session::start(&config, page, StdRng::seed_from_u64(1));

        session.run_until(ms(400));
        assert!(session.page().opacity_changes().is_empty());

        session.run_until(ms(600));
        assert_eq!(
            session.page().opacity_changes(),
            &[(516, Opacity::Hidden), (532, Opacity::Visible)]
        );
    }

    #[test]
    fn cycling_back_to_a_loading_slide_fades_once() {
        let config = SlideshowConfig::default();
        let page = SimulatedPage::builder().slow_image("images/space.png", ms(500)).build();
        let mut session = Session::start(&config, page, StdRng::seed_from_u64(1));
        // Five clicks wrap back to the first slide while it is still loading
        for at in [100, 110, 120, 130, 140] {
            session.click_at(ms(at));
        }

        session.run_until(ms(1000));

        assert_eq!(session.page().slide_source(), Some("images/space.png"));
        let after_load: Vec<_> = session
            .page()
            .opacity_changes()
            .iter()
            .filter(|(at, _)| *at >= 500)
            .copied()
            .collect();
        assert_eq!(after_load, vec![(516, Opacity::Hidden), (532, Opacity::Visible)]);
        assert_eq!(session.page().pending_load_waits(), 0);
        assert_eq!(session.page().slide_opacity(), Some(Opacity::Visible));
    }

    #[test]
    fn run_until_moves_the_clock() {
        let config = SlideshowConfig::default();
        let page = SimulatedPage::builder().build();
        let mut session = Session::start(&config, page, StdRng::seed_from_u64(1));
        session.run_until(ms(1234));
        assert_eq!(session.now(), ms(1234));
    }
}
