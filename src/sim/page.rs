use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use serde::Serialize;

use crate::constants::FRAME_INTERVAL;
use crate::host::Host;
use crate::layout::Position;
use crate::sim::scheduler::{Scheduler, Wake};
use crate::state::{FrameTask, Opacity, TimerId};
use crate::visibility::VisibilityEntry;

/// A slide swap as the page saw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideChange {
    pub at_ms: u64,
    pub src: String,
    pub position: Position,
}

/// Headless page with a virtual clock.
///
/// Implements [`Host`] by recording DOM mutations and queueing callbacks on
/// its [`Scheduler`]; [`crate::sim::Session`] drains the queue into the
/// controller.
#[derive(Debug)]
pub struct SimulatedPage {
    scheduler: Scheduler,

    has_hero: bool,
    has_container: bool,
    reduced_motion: bool,

    strip: Option<Vec<String>>,
    static_images: Vec<(String, Position)>,
    preloaded: Vec<String>,

    slide_mounted: bool,
    position: Option<Position>,
    source: Option<String>,
    opacity: Option<Opacity>,
    opacity_changes: Vec<(u64, Opacity)>,
    changes: Vec<SlideChange>,

    // Image loading: `None` latency means the image never loads
    default_latency: Option<Duration>,
    latencies: HashMap<String, Option<Duration>>,
    loaded: HashSet<String>,
    loading: HashSet<String>,
    load_waits: Vec<String>,
    pending_frames: usize,

    timers: BTreeMap<TimerId, Duration>,
    next_timer: u32,
    timers_started: usize,
    timers_cleared: usize,

    observing: Option<f64>,
    viewport_ratio: f64,
    last_in_view: Option<bool>,
    listening_for_clicks: bool,
}

impl SimulatedPage {
    pub fn builder() -> PageBuilder {
        PageBuilder::default()
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub(crate) fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    // --- Inspection ---

    pub fn slide_changes(&self) -> &[SlideChange] {
        &self.changes
    }

    pub fn strip_items(&self) -> Option<&[String]> {
        self.strip.as_deref()
    }

    pub fn static_images(&self) -> &[(String, Position)] {
        &self.static_images
    }

    pub fn preloaded(&self) -> &[String] {
        &self.preloaded
    }

    pub fn slide_mounted(&self) -> bool {
        self.slide_mounted
    }

    pub fn slide_position(&self) -> Option<Position> {
        self.position
    }

    pub fn slide_source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn slide_opacity(&self) -> Option<Opacity> {
        self.opacity
    }

    pub fn opacity_changes(&self) -> &[(u64, Opacity)] {
        &self.opacity_changes
    }

    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn timers_started(&self) -> usize {
        self.timers_started
    }

    pub fn cleared_timers(&self) -> usize {
        self.timers_cleared
    }

    pub fn pending_load_waits(&self) -> usize {
        self.load_waits.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.pending_frames
    }

    pub fn is_observing(&self) -> bool {
        self.observing.is_some()
    }

    pub fn is_listening_for_clicks(&self) -> bool {
        self.listening_for_clicks
    }

    pub fn mark_loaded(&mut self, src: &str) {
        self.loaded.insert(src.to_string());
    }

    // --- Delivery helpers used by the session ---

    pub(crate) fn timer_period(&self, timer: TimerId) -> Option<Duration> {
        self.timers.get(&timer).copied()
    }

    pub(crate) fn take_frame(&mut self) {
        self.pending_frames = self.pending_frames.saturating_sub(1);
    }

    /// Finish loading `src`; returns how many load waiters to wake.
    ///
    /// Only a waiter registered for `src` wakes, and only while it is still
    /// the slide's source. A waiter for an image that never loads stays pending
    /// until the source changes.
    pub(crate) fn finish_load(&mut self, src: &str) -> usize {
        self.loading.remove(src);
        self.loaded.insert(src.to_string());
        let current = self.source.as_deref();
        let woken = if current == Some(src) {
            self.load_waits.iter().filter(|waiting| *waiting == src).count()
        } else {
            0
        };
        self.load_waits
            .retain(|waiting| Some(waiting.as_str()) == current && waiting != src);
        woken
    }

    /// Entry for the observer's first callback.
    pub(crate) fn initial_entry(&mut self) -> Option<VisibilityEntry> {
        let threshold = self.observing?;
        self.last_in_view = Some(self.viewport_ratio >= threshold);
        Some(VisibilityEntry::with_ratio(self.viewport_ratio))
    }

    /// Apply a scroll; yields an entry only when the threshold is crossed.
    pub(crate) fn scroll_to(&mut self, ratio: f64) -> Option<VisibilityEntry> {
        self.viewport_ratio = ratio;
        let threshold = self.observing?;
        let in_view = ratio >= threshold;
        if self.last_in_view == Some(in_view) {
            return None;
        }
        self.last_in_view = Some(in_view);
        Some(VisibilityEntry::with_ratio(ratio))
    }

    fn now_ms(&self) -> u64 {
        self.scheduler.now().as_millis() as u64
    }
}

impl Host for SimulatedPage {
    fn has_hero_region(&self) -> bool {
        self.has_hero
    }

    fn has_slideshow_container(&self) -> bool {
        self.has_container
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn mobile_strip_len(&self) -> Option<usize> {
        self.strip.as_ref().map(Vec::len)
    }

    fn append_strip_item(&mut self, src: &str) {
        if let Some(strip) = self.strip.as_mut() {
            strip.push(src.to_string());
        }
    }

    fn mount_static_image(&mut self, src: &str, position: Position) {
        self.static_images.push((src.to_string(), position));
    }

    fn preload(&mut self, src: &str) {
        self.preloaded.push(src.to_string());
    }

    fn mount_slide(&mut self) {
        self.slide_mounted = true;
    }

    fn place_slide(&mut self, position: Position) {
        self.position = Some(position);
    }

    fn set_slide_source(&mut self, src: &str) {
        // Waits belong to the source they were registered for
        self.load_waits.clear();
        self.source = Some(src.to_string());
        self.changes.push(SlideChange {
            at_ms: self.now_ms(),
            src: src.to_string(),
            position: self.position.unwrap_or(Position::new(0.0, 0.0)),
        });

        if self.loaded.contains(src) || self.loading.contains(src) {
            return;
        }
        let latency = self.latencies.get(src).copied().unwrap_or(self.default_latency);
        if let Some(latency) = latency {
            self.loading.insert(src.to_string());
            self.scheduler.schedule_in(latency, Wake::Load(src.to_string()));
        }
    }

    fn set_slide_opacity(&mut self, opacity: Opacity) {
        self.opacity = Some(opacity);
        let at = self.now_ms();
        self.opacity_changes.push((at, opacity));
    }

    fn slide_image_ready(&self) -> bool {
        self.source.as_ref().is_some_and(|src| self.loaded.contains(src))
    }

    fn await_slide_load(&mut self) {
        let Some(src) = self.source.clone() else {
            return;
        };
        if !self.load_waits.contains(&src) {
            self.load_waits.push(src);
        }
    }

    fn request_frame(&mut self, task: FrameTask) {
        self.pending_frames += 1;
        self.scheduler.schedule_in(FRAME_INTERVAL, Wake::Frame(task));
    }

    fn start_interval(&mut self, period: Duration) -> TimerId {
        self.next_timer += 1;
        let timer = TimerId(self.next_timer);
        self.timers.insert(timer, period);
        self.timers_started += 1;
        self.scheduler.schedule_in(period, Wake::Interval(timer));
        timer
    }

    fn clear_interval(&mut self, timer: TimerId) {
        if self.timers.remove(&timer).is_some() {
            self.timers_cleared += 1;
        }
    }

    fn observe_hero(&mut self, threshold: f64) {
        self.observing = Some(threshold);
        self.scheduler.schedule_in(Duration::ZERO, Wake::ObserverStart);
    }

    fn listen_for_clicks(&mut self) {
        self.listening_for_clicks = true;
    }
}

/// Describes the page before the slideshow initializes.
#[derive(Debug, Clone)]
pub struct PageBuilder {
    has_hero: bool,
    has_container: bool,
    reduced_motion: bool,
    strip: Option<Vec<String>>,
    viewport_ratio: f64,
    default_latency: Option<Duration>,
    latencies: HashMap<String, Option<Duration>>,
}

impl Default for PageBuilder {
    fn default() -> Self {
        Self {
            has_hero: true,
            has_container: true,
            reduced_motion: false,
            strip: Some(Vec::new()),
            viewport_ratio: 1.0,
            default_latency: Some(Duration::ZERO),
            latencies: HashMap::new(),
        }
    }
}

impl PageBuilder {
    pub fn without_hero(mut self) -> Self {
        self.has_hero = false;
        self
    }

    pub fn without_slideshow_container(mut self) -> Self {
        self.has_container = false;
        self
    }

    pub fn reduced_motion(mut self) -> Self {
        self.reduced_motion = true;
        self
    }

    pub fn without_strip(mut self) -> Self {
        self.strip = None;
        self
    }

    /// Fraction of the hero visible when the page loads.
    pub fn viewport_ratio(mut self, ratio: f64) -> Self {
        self.viewport_ratio = ratio;
        self
    }

    pub fn load_latency(mut self, latency: Duration) -> Self {
        self.default_latency = Some(latency);
        self
    }

    pub fn slow_image(mut self, src: &str, latency: Duration) -> Self {
        self.latencies.insert(src.to_string(), Some(latency));
        self
    }

    pub fn broken_image(mut self, src: &str) -> Self {
        self.latencies.insert(src.to_string(), None);
        self
    }

    pub fn build(self) -> SimulatedPage {
        SimulatedPage {
            scheduler: Scheduler::default(),
            has_hero: self.has_hero,
            has_container: self.has_container,
            reduced_motion: self.reduced_motion,
            strip: self.strip,
            static_images: Vec::new(),
            preloaded: Vec::new(),
            slide_mounted: false,
            position: None,
            source: None,
            opacity: None,
            opacity_changes: Vec::new(),
            changes: Vec::new(),
            default_latency: self.default_latency,
            latencies: self.latencies,
            loaded: HashSet::new(),
            loading: HashSet::new(),
            load_waits: Vec::new(),
            pending_frames: 0,
            timers: BTreeMap::new(),
            next_timer: 0,
            timers_started: 0,
            timers_cleared: 0,
            observing: None,
            viewport_ratio: self.viewport_ratio,
            last_in_view: None,
            listening_for_clicks: false,
        }
    }
}
