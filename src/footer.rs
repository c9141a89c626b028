//! Footer fragment loader: one fetch, splice on success, silent otherwise.

use tracing::{debug, warn};

use crate::error::{SlideshowError, SlideshowResult};

/// The element the fetched markup replaces.
pub trait FooterSlot {
    fn placeholder_exists(&self) -> bool;
    fn replace_placeholder(&mut self, html: &str);
}

/// Raw response of the fragment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentResponse {
    pub status: u16,
    pub body: String,
}

impl FragmentResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body of a successful response, or the status as an error.
    pub fn into_markup(self) -> SlideshowResult<String> {
        if self.ok() {
            Ok(self.body)
        } else {
            Err(SlideshowError::Status(self.status))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterOutcome {
    Replaced,
    NoPlaceholder,
    Kept,
}

/// Apply a finished fetch to the page. Never fails; the placeholder simply
/// stays when anything went wrong.
pub fn splice<S: FooterSlot>(
    slot: &mut S,
    fetched: SlideshowResult<FragmentResponse>,
) -> FooterOutcome {
    if !slot.placeholder_exists() {
        return FooterOutcome::NoPlaceholder;
    }
    match fetched.and_then(FragmentResponse::into_markup) {
        Ok(html) => {
            slot.replace_placeholder(&html);
            debug!(bytes = html.len(), "footer fragment spliced");
            FooterOutcome::Replaced
        }
        Err(err) => {
            warn!(%err, "footer fragment unavailable, keeping placeholder");
            FooterOutcome::Kept
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Page {
        placeholder: Option<String>,
        footer: Option<String>,
    }

    impl FooterSlot for Page {
        fn placeholder_exists(&self) -> bool {
            self.placeholder.is_some()
        }

        fn replace_placeholder(&mut self, html: &str) {
            self.placeholder = None;
            self.footer = Some(html.to_string());
        }
    }

    fn page() -> Page {
        Page {
            placeholder: Some(r#"<div id="footer-placeholder"></div>"#.to_string()),
            footer: None,
        }
    }

    fn response(status: u16, body: &str) -> SlideshowResult<FragmentResponse> {
        Ok(FragmentResponse {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn success_replaces_placeholder() {
        let mut page = page();
        let outcome = splice(&mut page, response(200, "<footer>hi</footer>"));
        assert_eq!(outcome, FooterOutcome::Replaced);
        assert!(page.placeholder.is_none());
        assert_eq!(page.footer.as_deref(), Some("<footer>hi</footer>"));
    }

    #[test]
    fn not_found_keeps_placeholder() {
        let mut page = page();
        let outcome = splice(&mut page, response(404, "Not Found"));
        assert_eq!(outcome, FooterOutcome::Kept);
        assert!(page.placeholder.is_some());
        assert!(page.footer.is_none());
    }

    #[test]
    fn network_error_keeps_placeholder() {
        let mut page = page();
        let outcome = splice(&mut page, Err(SlideshowError::fetch("connection reset")));
        assert_eq!(outcome, FooterOutcome::Kept);
        assert!(page.placeholder.is_some());
    }

    #[test]
    fn missing_placeholder_ignores_the_response() {
        let mut page = Page::default();
        let outcome = splice(&mut page, response(200, "<footer>hi</footer>"));
        assert_eq!(outcome, FooterOutcome::NoPlaceholder);
        assert!(page.footer.is_none());
    }
}
