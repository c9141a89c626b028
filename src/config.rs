use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::constants::*;
use crate::error::{SlideshowError, SlideshowResult};
use crate::layout::{Layout, Position};
use crate::slide::Manifest;
use crate::visibility::VisibilityGate;

/// Hero slideshow settings. Defaults are the compile-time constants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideshowConfig {
    pub slides: Manifest,
    pub interval_ms: u64,
    pub image_size_pct: f64,
    pub visibility_threshold: f64,
    pub static_position_pct: f64,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            slides: Manifest::default(),
            interval_ms: SLIDE_DURATION.as_millis() as u64,
            image_size_pct: IMAGE_SIZE_PCT,
            visibility_threshold: VISIBILITY_THRESHOLD,
            static_position_pct: STATIC_POSITION_PCT,
        }
    }
}

impl SlideshowConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn layout(&self) -> Layout {
        Layout::new(self.image_size_pct)
    }

    pub fn gate(&self) -> VisibilityGate {
        VisibilityGate::new(self.visibility_threshold)
    }

    pub fn static_position(&self) -> Position {
        Position::new(self.static_position_pct, self.static_position_pct)
    }

    pub fn validate(&self) -> SlideshowResult<()> {
        if self.slides.is_empty() {
            return Err(SlideshowError::config("slide list is empty"));
        }
        if self.interval_ms == 0 {
            return Err(SlideshowError::config("interval_ms must be positive"));
        }
        if !(0.0..=100.0).contains(&self.image_size_pct) {
            return Err(SlideshowError::config(format!(
                "image_size_pct {} outside [0, 100]",
                self.image_size_pct
            )));
        }
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            return Err(SlideshowError::config(format!(
                "visibility_threshold {} outside [0, 1]",
                self.visibility_threshold
            )));
        }
        if !(0.0..=100.0).contains(&self.static_position_pct) {
            return Err(SlideshowError::config(format!(
                "static_position_pct {} outside [0, 100]",
                self.static_position_pct
            )));
        }
        Ok(())
    }
}

/// Whole-page settings: the slideshow plus its two collaborators.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub slideshow: SlideshowConfig,
    pub transition_delay_ms: u64,
    pub footer_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            slideshow: SlideshowConfig::default(),
            transition_delay_ms: PAGE_TRANSITION_DELAY.as_millis() as u64,
            footer_path: FOOTER_FRAGMENT_PATH.to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json_str(json: &str) -> SlideshowResult<Self> {
        let config: SiteConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> SlideshowResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    pub fn validate(&self) -> SlideshowResult<()> {
        self.slideshow.validate()?;
        if !self.footer_path.starts_with('/') {
            return Err(SlideshowError::config("footer_path must be absolute"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_constants() {
        let config = SiteConfig::default();
        assert_eq!(config.slideshow.interval(), Duration::from_millis(2000));
        assert_eq!(config.slideshow.image_size_pct, 40.0);
        assert_eq!(config.slideshow.static_position(), Position::new(30.0, 30.0));
        assert_eq!(config.transition_delay(), Duration::from_millis(250));
        assert_eq!(config.footer_path, "/components/footer.html");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = SiteConfig::from_json_str(
            r#"{ "slideshow": { "interval_ms": 500, "slides": ["a.png", "b.png"] } }"#,
        )
        .unwrap();
        assert_eq!(config.slideshow.interval_ms, 500);
        assert_eq!(config.slideshow.slides, Manifest::new(["a.png", "b.png"]));
        assert_eq!(config.slideshow.visibility_threshold, 0.25);
        assert_eq!(config.transition_delay_ms, 250);
    }

    #[test]
    fn rejects_empty_manifest() {
        let err = SiteConfig::from_json_str(r#"{ "slideshow": { "slides": [] } }"#).unwrap_err();
        assert!(err.to_string().contains("slide list is empty"));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = SlideshowConfig::default();
        config.image_size_pct = 120.0;
        assert!(config.validate().is_err());

        let mut config = SlideshowConfig::default();
        config.visibility_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = SlideshowConfig::default();
        config.interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(SiteConfig::from_json_str(r#"{ "speed": 3 }"#).is_err());
    }
}
