use serde::{Deserialize, Serialize};

use crate::constants::SLIDES;

/// One hero image. Slides never change after the manifest is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slide {
    src: String,
}

impl Slide {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }

    pub fn src(&self) -> &str {
        &self.src
    }
}

/// Fixed, ordered slide sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    slides: Vec<Slide>,
}

impl Manifest {
    pub fn new<I, S>(srcs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slides: srcs.into_iter().map(Slide::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn first(&self) -> Option<&Slide> {
        self.slides.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slide> {
        self.slides.iter()
    }

    /// Index after `index`, wrapping back to the first slide.
    pub fn next_index(&self, index: usize) -> usize {
        if self.slides.is_empty() {
            return 0;
        }
        (index + 1) % self.slides.len()
    }

    /// Reverse lookup used when reading traces.
    pub fn index_of(&self, src: &str) -> Option<usize> {
        self.slides.iter().position(|s| s.src == src)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new(SLIDES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_index_wraps() {
        let manifest = Manifest::new(["a", "b", "c"]);
        assert_eq!(manifest.next_index(0), 1);
        assert_eq!(manifest.next_index(2), 0);
    }

    #[test]
    fn default_manifest_is_the_hero_set() {
        let manifest = Manifest::default();
        assert_eq!(manifest.len(), 5);
        assert_eq!(manifest.first().map(Slide::src), Some("images/space.png"));
        assert_eq!(manifest.index_of("images/system.webp"), Some(3));
    }

    #[test]
    fn deserializes_from_plain_list() {
        let manifest: Manifest = serde_json::from_str(r#"["x.png", "y.png"]"#).unwrap();
        assert_eq!(manifest, Manifest::new(["x.png", "y.png"]));
    }
}
