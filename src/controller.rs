use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::config::SlideshowConfig;
use crate::driver::AdvanceDriver;
use crate::host::Host;
use crate::mobile_strip;
use crate::state::{FrameTask, Mode, PlaybackState, TimerId};
use crate::visibility::{VisibilityEntry, VisibilityGate};

/// The hero slideshow, built once at DOM-ready and kept for the page lifetime.
///
/// Every browser callback enters through one of the `on_*` methods. In
/// static and inactive modes they all do nothing.
pub struct SlideshowController {
    mode: Mode,
    gate: VisibilityGate,
    driver: Option<AdvanceDriver>,
}

impl SlideshowController {
    /// Initialize with an OS-seeded random source.
    pub fn init<H: Host>(config: &SlideshowConfig, host: &mut H) -> Self {
        Self::init_with_rng(config, host, StdRng::from_rng(&mut rand::rng()))
    }

    #[tracing::instrument(skip_all, fields(slides = config.slides.len()))]
    pub fn init_with_rng<H: Host>(config: &SlideshowConfig, host: &mut H, rng: StdRng) -> Self {
        let gate = config.gate();

        if let Err(err) = config.validate() {
            warn!(%err, "invalid slideshow config, staying inactive");
            return Self::inactive(gate);
        }

        if !host.has_hero_region() || !host.has_slideshow_container() {
            debug!("hero region or slideshow container missing, staying inactive");
            return Self::inactive(gate);
        }

        mobile_strip::populate(host, &config.slides);

        // Checked once; a preference change mid-session is not picked up
        if host.prefers_reduced_motion() {
            if let Some(first) = config.slides.first() {
                host.mount_static_image(first.src(), config.static_position());
            }
            info!("reduced motion requested, showing a static slide");
            return Self {
                mode: Mode::Static,
                gate,
                driver: None,
            };
        }

        for slide in config.slides.iter() {
            host.preload(slide.src());
        }
        host.mount_slide();

        let mut driver = AdvanceDriver::new(
            config.slides.clone(),
            config.layout(),
            config.interval(),
            rng,
        );
        host.observe_hero(gate.threshold());
        host.listen_for_clicks();
        driver.advance_to(host, 0);

        info!(interval_ms = config.interval_ms, "slideshow running");
        Self {
            mode: Mode::Animated,
            gate,
            driver: Some(driver),
        }
    }

    fn inactive(gate: VisibilityGate) -> Self {
        Self {
            mode: Mode::Inactive,
            gate,
            driver: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn playback(&self) -> Option<&PlaybackState> {
        self.driver.as_ref().map(AdvanceDriver::playback)
    }

    pub fn on_visibility<H: Host>(&mut self, host: &mut H, entries: &[VisibilityEntry]) {
        let Some(driver) = self.driver.as_mut() else {
            return;
        };
        self.gate.dispatch(entries, |in_view| driver.on_visibility_change(host, in_view));
    }

    pub fn on_click<H: Host>(&mut self, host: &mut H) {
        if let Some(driver) = self.driver.as_mut() {
            driver.on_user_advance(host);
        }
    }

    pub fn on_timer<H: Host>(&mut self, host: &mut H, timer: TimerId) {
        if let Some(driver) = self.driver.as_mut() {
            driver.on_timer(host, timer);
        }
    }

    pub fn on_slide_loaded<H: Host>(&mut self, host: &mut H) {
        if let Some(driver) = self.driver.as_mut() {
            driver.on_slide_loaded(host);
        }
    }

    pub fn on_frame<H: Host>(&mut self, host: &mut H, task: FrameTask) {
        if let Some(driver) = self.driver.as_mut() {
            driver.on_frame(host, task);
        }
    }
}
