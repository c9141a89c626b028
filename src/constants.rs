use std::time::Duration;

pub const SLIDE_DURATION: Duration = Duration::from_millis(2000); // Time between automatic advances
pub const IMAGE_SIZE_PCT: f64 = 40.0;                             // Max width/height % so the image stays in bounds
pub const VISIBILITY_THRESHOLD: f64 = 0.25;                       // Fraction of the hero that must be on screen
pub const STATIC_POSITION_PCT: f64 = 30.0;                        // left/top of the reduced-motion slide

pub const PAGE_TRANSITION_DELAY: Duration = Duration::from_millis(250); // Fade-out before navigating
pub const FOOTER_FRAGMENT_PATH: &str = "/components/footer.html";

pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);   // Simulated animation frame cadence

// Slide manifest, in display order
pub const SLIDES: [&str; 5] = [
    "images/space.png",
    "images/manifesto.webp",
    "images/diy-water-filter.webp",
    "images/system.webp",
    "images/tushar-sat02.webp",
];

// --- Host DOM contract ---
pub const HERO_SECTION_SELECTOR: &str = ".hero-section";
pub const SLIDESHOW_SELECTOR: &str = ".hero-slideshow";
pub const MOBILE_STRIP_SELECTOR: &str = ".hero-mobile-strip";
pub const FOOTER_PLACEHOLDER_ID: &str = "footer-placeholder";

pub const SLIDE_CLASS: &str = "hero-slideshow-slide";
pub const SLIDE_IMAGE_CLASS: &str = "hero-slideshow-img";
pub const STRIP_ITEM_CLASS: &str = "hero-mobile-strip-item";
pub const STRIP_IMAGE_CLASS: &str = "hero-mobile-strip-img";

pub const PAGE_READY_CLASS: &str = "page-ready";
pub const PAGE_EXIT_CLASS: &str = "page-transition-out";

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
