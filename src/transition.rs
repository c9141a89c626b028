//! Whole-page fade: fade in once the DOM is ready, fade out before
//! same-site navigation.

use std::time::Duration;

use tracing::debug;

use crate::constants::{PAGE_EXIT_CLASS, PAGE_READY_CLASS};

/// What the page knows about a clicked anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkInfo {
    /// Raw `href` attribute as written in the markup.
    pub href_attr: Option<String>,
    /// `target` attribute, e.g. `_blank`.
    pub target: Option<String>,
    /// Fully resolved URL the browser would navigate to.
    pub resolved_href: String,
    /// Origin of `resolved_href`; `None` when it could not be parsed.
    pub origin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Internal,
    PassThrough,
}

/// Classify an anchor. Unparsable targets count as internal so a click
/// never leaves the page half faded.
pub fn classify(link: &LinkInfo, page_origin: &str) -> LinkKind {
    let href = link.href_attr.as_deref().unwrap_or("");
    if href.is_empty() || href == "#" || link.target.as_deref() == Some("_blank") {
        return LinkKind::PassThrough;
    }
    match link.origin.as_deref() {
        Some(origin) if origin != page_origin => LinkKind::PassThrough,
        _ => LinkKind::Internal,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Exiting { href: String },
}

/// Outcome of a link click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDecision {
    PassThrough,
    /// Prevent default and navigate to `href` after `delay`.
    Navigate { href: String, delay: Duration },
}

/// Tracks the body's fade classes.
#[derive(Debug, Clone)]
pub struct PageTransition {
    page_origin: String,
    delay: Duration,
    phase: Phase,
    classes: Vec<&'static str>,
}

impl PageTransition {
    pub fn new(page_origin: impl Into<String>, delay: Duration) -> Self {
        Self {
            page_origin: page_origin.into(),
            delay,
            phase: Phase::Loading,
            classes: Vec::new(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Body classes that should currently be applied.
    pub fn classes(&self) -> &[&'static str] {
        &self.classes
    }

    /// Called on the first animation frame after DOM-ready.
    pub fn on_ready_frame(&mut self) {
        if self.phase == Phase::Loading {
            self.add_class(PAGE_READY_CLASS);
            self.phase = Phase::Ready;
        }
    }

    pub fn on_link_click(&mut self, link: &LinkInfo) -> LinkDecision {
        if classify(link, &self.page_origin) == LinkKind::PassThrough {
            debug!(href = %link.resolved_href, "link passes through");
            return LinkDecision::PassThrough;
        }
        self.classes.retain(|c| *c != PAGE_READY_CLASS);
        self.add_class(PAGE_EXIT_CLASS);
        self.phase = Phase::Exiting {
            href: link.resolved_href.clone(),
        };
        debug!(href = %link.resolved_href, "fading out before navigation");
        LinkDecision::Navigate {
            href: link.resolved_href.clone(),
            delay: self.delay,
        }
    }

    fn add_class(&mut self, class: &'static str) {
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }
}
