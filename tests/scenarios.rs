use std::time::Duration;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use hero_slideshow::sim::{Session, SimulatedPage};
use hero_slideshow::{Layout, Manifest, Mode, Opacity, Position, SlideshowConfig};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn session(page: SimulatedPage) -> Session {
    Session::start(&SlideshowConfig::default(), page, StdRng::seed_from_u64(2024))
}

/// (time, slide index) for every change so far.
fn timeline(session: &Session) -> Vec<(u64, usize)> {
    let manifest = Manifest::default();
    session
        .page()
        .slide_changes()
        .iter()
        .map(|c| (c.at_ms, manifest.index_of(&c.src).unwrap()))
        .collect()
}

#[test]
fn click_resets_the_cadence() {
    let mut session = session(SimulatedPage::builder().build());
    session.click_at(ms(3000));

    session.run_until(ms(5500));

    assert_eq!(timeline(&session), vec![(0, 0), (2000, 1), (3000, 2), (5000, 3)]);
    assert_eq!(session.page().active_timers(), 1);
}

#[test]
fn automatic_advances_wrap_around() {
    let mut session = session(SimulatedPage::builder().build());
    session.run_until(ms(12_000));

    let indices: Vec<usize> = timeline(&session).into_iter().map(|(_, i)| i).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 0, 1]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn consecutive_slides_never_share_a_quadrant(
        seed in any::<u64>(),
        size in 0.0f64..=90.0,
        clicks in proptest::collection::vec(0u64..30_000, 0..8),
    ) {
        let config = SlideshowConfig {
            image_size_pct: size,
            ..SlideshowConfig::default()
        };
        let page = SimulatedPage::builder().build();
        let mut session = Session::start(&config, page, StdRng::seed_from_u64(seed));
        for at in clicks {
            session.click_at(ms(at));
        }
        session.run_until(ms(30_000));

        let layout = Layout::new(size);
        let max = 100.0 - size;
        let changes = session.page().slide_changes();
        prop_assert!(changes.len() >= 15);
        for pair in changes.windows(2) {
            prop_assert_ne!(
                layout.quadrant_of(pair[0].position),
                layout.quadrant_of(pair[1].position)
            );
        }
        for change in changes {
            prop_assert!((0.0..=max).contains(&change.position.left_pct));
            prop_assert!((0.0..=max).contains(&change.position.top_pct));
        }
    }
}

#[test]
fn scrolled_away_pauses_without_catching_up() {
    let mut session = session(SimulatedPage::builder().build());
    session.scroll_at(ms(3000), 0.0);
    session.scroll_at(ms(9000), 1.0);

    session.run_until(ms(12_000));

    // Tick at 2000, pause from 3000, fresh interval from 9000
    assert_eq!(timeline(&session), vec![(0, 0), (2000, 1), (11_000, 2)]);
}

#[test]
fn small_scrolls_below_threshold_do_not_pause() {
    let mut session = session(SimulatedPage::builder().build());
    session.scroll_at(ms(1000), 0.6);
    session.scroll_at(ms(1500), 0.3);

    session.run_until(ms(4100));

    assert_eq!(timeline(&session), vec![(0, 0), (2000, 1), (4000, 2)]);
}

#[test]
fn starting_out_of_view_shows_first_slide_only() {
    let mut session = session(SimulatedPage::builder().viewport_ratio(0.0).build());
    session.run_until(ms(10_000));

    assert_eq!(timeline(&session), vec![(0, 0)]);
    assert_eq!(session.page().timers_started(), 0);

    session.scroll_at(ms(10_000), 1.0);
    session.run_until(ms(12_000));
    assert_eq!(timeline(&session), vec![(0, 0), (12_000, 1)]);
}

#[test]
fn click_while_hidden_advances_but_keeps_timer_off() {
    let mut session = session(SimulatedPage::builder().viewport_ratio(0.0).build());
    session.click_at(ms(500));
    session.run_until(ms(5000));

    assert_eq!(timeline(&session), vec![(0, 0), (500, 1)]);
    assert_eq!(session.page().active_timers(), 0);
}

#[test]
fn reduced_motion_is_a_single_static_frame() {
    let mut session = session(SimulatedPage::builder().reduced_motion().build());
    session.click_at(ms(100));
    session.scroll_at(ms(200), 0.0);
    session.scroll_at(ms(300), 1.0);
    session.run_until(ms(10_000));

    assert_eq!(session.controller().mode(), Mode::Static);
    assert_eq!(
        session.page().static_images(),
        &[("images/space.png".to_string(), Position::new(30.0, 30.0))]
    );
    assert!(session.page().slide_changes().is_empty());
    assert_eq!(session.page().timers_started(), 0);
}

#[test]
fn broken_image_leaves_only_its_own_fade_pending() {
    let page = SimulatedPage::builder()
        .broken_image("images/manifesto.webp")
        .build();
    let mut session = session(page);

    session.run_until(ms(2100));
    // Slide 0 faded in; slide 1 never loads, so no new fade
    assert_eq!(
        session.page().opacity_changes(),
        &[(16, Opacity::Hidden), (32, Opacity::Visible)]
    );

    session.run_until(ms(4100));
    assert_eq!(timeline(&session).last(), Some(&(4000, 2)));
    assert_eq!(
        &session.page().opacity_changes()[2..],
        &[(4016, Opacity::Hidden), (4032, Opacity::Visible)]
    );
}

#[test]
fn missing_host_elements_do_nothing() {
    let mut session = session(SimulatedPage::builder().without_hero().build());
    session.click_at(ms(100));
    session.run_until(ms(5000));

    assert_eq!(session.controller().mode(), Mode::Inactive);
    assert!(session.page().slide_changes().is_empty());
    assert!(!session.page().is_listening_for_clicks());
}

#[test]
fn mobile_strip_holds_one_item_per_slide() {
    let mut page = SimulatedPage::builder().build();
    let config = SlideshowConfig::default();
    hero_slideshow::mobile_strip::populate(&mut page, &config.slides);
    let session = Session::start(&config, page, StdRng::seed_from_u64(1));

    assert_eq!(session.page().strip_items().map(<[String]>::len), Some(5));
}
