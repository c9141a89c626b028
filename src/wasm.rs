//! Browser binding. Only compiled on `wasm32`.
//!
//! Wires the slideshow controller, the page transition and the footer
//! loader to the live DOM. Browser callbacks hold weak references to the
//! slideshow, which lives in a thread-local for the page lifetime.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use js_sys::Array;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, HtmlAnchorElement, HtmlElement,
    HtmlImageElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    Response, Window,
};

use crate::config::SiteConfig;
use crate::constants::*;
use crate::controller::SlideshowController;
use crate::error::{SlideshowError, SlideshowResult};
use crate::footer::{self, FooterSlot, FragmentResponse};
use crate::host::Host;
use crate::layout::Position;
use crate::state::{FrameTask, Opacity, TimerId};
use crate::transition::{LinkDecision, LinkInfo, PageTransition};
use crate::visibility::VisibilityEntry;

thread_local! {
    static SLIDESHOW: RefCell<Option<Rc<RefCell<WebSlideshow>>>> = const { RefCell::new(None) };
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            web_sys::console::error_1(&JsValue::from_str(&format!("panic: {info}")));
        }));
    });
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    let config = SiteConfig::default();

    // The footer script runs as soon as it is parsed, not on DOM ready
    wasm_bindgen_futures::spawn_local(load_footer(
        window.clone(),
        document.clone(),
        config.footer_path.clone(),
    ));

    on_dom_ready(&document, move || {
        let Some(document) = window.document() else {
            return;
        };
        init_page_transition(&window, &document, config.transition_delay());
        init_slideshow(&window, &document, &config);
    });
}

fn on_dom_ready(document: &Document, f: impl FnOnce() + 'static) {
    if document.ready_state() != "loading" {
        f();
        return;
    }
    let cb = Closure::once_into_js(f);
    let opts = AddEventListenerOptions::new();
    opts.set_once(true);
    let _ = document.add_event_listener_with_callback_and_add_event_listener_options(
        "DOMContentLoaded",
        cb.unchecked_ref(),
        &opts,
    );
}

// --- Slideshow ---

struct WebSlideshow {
    controller: Option<SlideshowController>,
    host: WebHost,
}

type SharedSlideshow = Weak<RefCell<WebSlideshow>>;

/// Run `f` against the live slideshow, if it is still around and not busy.
fn dispatch(app: &SharedSlideshow, f: impl FnOnce(&mut SlideshowController, &mut WebHost)) {
    let Some(app) = app.upgrade() else {
        return;
    };
    let Ok(mut guard) = app.try_borrow_mut() else {
        warn!("slideshow busy, dropping callback");
        return;
    };
    let WebSlideshow { controller, host } = &mut *guard;
    if let Some(controller) = controller.as_mut() {
        f(controller, host);
    }
}

fn init_slideshow(window: &Window, document: &Document, config: &SiteConfig) {
    let app = Rc::new_cyclic(|weak: &SharedSlideshow| {
        RefCell::new(WebSlideshow {
            controller: None,
            host: WebHost::new(window.clone(), document.clone(), weak.clone()),
        })
    });
    {
        let mut guard = app.borrow_mut();
        let controller = SlideshowController::init(&config.slideshow, &mut guard.host);
        guard.controller = Some(controller);
    }
    SLIDESHOW.with(|cell| *cell.borrow_mut() = Some(app));
}

struct WebHost {
    window: Window,
    document: Document,
    hero: Option<Element>,
    container: Option<Element>,
    strip: Option<Element>,
    wrapper: Option<HtmlElement>,
    image: Option<HtmlImageElement>,
    preloads: Vec<HtmlImageElement>,
    // Bumped on every source change; a load wait only fires for its own
    source_generation: Rc<Cell<u64>>,
    awaited_generation: Option<u64>,
    intervals: HashMap<TimerId, (i32, Closure<dyn FnMut()>)>,
    next_timer: u32,
    observer: Option<IntersectionObserver>,
    app: SharedSlideshow,
}

impl WebHost {
    fn new(window: Window, document: Document, app: SharedSlideshow) -> Self {
        let query = |selector: &str| document.query_selector(selector).ok().flatten();
        Self {
            hero: query(HERO_SECTION_SELECTOR),
            container: query(SLIDESHOW_SELECTOR),
            strip: query(MOBILE_STRIP_SELECTOR),
            window,
            document,
            wrapper: None,
            image: None,
            preloads: Vec::new(),
            source_generation: Rc::new(Cell::new(0)),
            awaited_generation: None,
            intervals: HashMap::new(),
            next_timer: 0,
            observer: None,
            app,
        }
    }

    fn create_image(&self, src: &str, class: &str) -> Option<HtmlImageElement> {
        let img = self
            .document
            .create_element("img")
            .ok()?
            .dyn_into::<HtmlImageElement>()
            .ok()?;
        img.set_src(src);
        img.set_alt("");
        img.set_class_name(class);
        Some(img)
    }
}

fn set_position(element: &HtmlElement, position: Position) {
    let style = element.style();
    let _ = style.set_property("left", &position.css_left());
    let _ = style.set_property("top", &position.css_top());
}

impl Host for WebHost {
    fn has_hero_region(&self) -> bool {
        self.hero.is_some()
    }

    fn has_slideshow_container(&self) -> bool {
        self.container.is_some()
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }

    fn mobile_strip_len(&self) -> Option<usize> {
        self.strip.as_ref().map(|strip| strip.children().length() as usize)
    }

    fn append_strip_item(&mut self, src: &str) {
        let Some(strip) = self.strip.as_ref() else {
            return;
        };
        let Ok(item) = self.document.create_element("div") else {
            return;
        };
        item.set_class_name(STRIP_ITEM_CLASS);
        if let Some(img) = self.create_image(src, STRIP_IMAGE_CLASS) {
            let _ = item.append_child(&img);
        }
        let _ = strip.append_child(&item);
    }

    fn mount_static_image(&mut self, src: &str, position: Position) {
        let Some(container) = self.container.as_ref() else {
            return;
        };
        if let Some(img) = self.create_image(src, SLIDE_IMAGE_CLASS) {
            set_position(&img, position);
            let _ = container.append_child(&img);
        }
    }

    fn preload(&mut self, src: &str) {
        if let Ok(img) = HtmlImageElement::new() {
            img.set_src(src);
            self.preloads.push(img);
        }
    }

    fn mount_slide(&mut self) {
        let Some(container) = self.container.as_ref() else {
            return;
        };
        let Some(wrapper) = self
            .document
            .create_element("div")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        wrapper.set_class_name(SLIDE_CLASS);
        let Some(img) = self
            .document
            .create_element("img")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
        else {
            return;
        };
        img.set_class_name(SLIDE_IMAGE_CLASS);
        img.set_alt("");
        let _ = wrapper.append_child(&img);
        let _ = container.append_child(&wrapper);
        self.wrapper = Some(wrapper);
        self.image = Some(img);
    }

    fn place_slide(&mut self, position: Position) {
        if let Some(wrapper) = self.wrapper.as_ref() {
            set_position(wrapper, position);
        }
    }

    fn set_slide_source(&mut self, src: &str) {
        self.source_generation.set(self.source_generation.get() + 1);
        if let Some(img) = self.image.as_ref() {
            img.set_src(src);
            img.set_alt("");
        }
    }

    fn set_slide_opacity(&mut self, opacity: Opacity) {
        if let Some(img) = self.image.as_ref() {
            let _ = img.style().set_property("opacity", opacity.css());
        }
    }

    fn slide_image_ready(&self) -> bool {
        self.image
            .as_ref()
            .is_some_and(|img| img.complete() && img.natural_width() > 0)
    }

    fn await_slide_load(&mut self) {
        let Some(img) = self.image.as_ref() else {
            return;
        };
        let generation = self.source_generation.get();
        if self.awaited_generation == Some(generation) {
            return;
        }
        self.awaited_generation = Some(generation);
        let app = self.app.clone();
        let current = self.source_generation.clone();
        let cb = Closure::once_into_js(move || {
            // Fired by a later source's load: this slide never loaded
            if current.get() != generation {
                return;
            }
            dispatch(&app, |controller, host| controller.on_slide_loaded(host));
        });
        let opts = AddEventListenerOptions::new();
        opts.set_once(true);
        let _ = img.add_event_listener_with_callback_and_add_event_listener_options(
            "load",
            cb.unchecked_ref(),
            &opts,
        );
    }

    fn request_frame(&mut self, task: FrameTask) {
        let app = self.app.clone();
        let cb = Closure::once_into_js(move |_ts: f64| {
            dispatch(&app, |controller, host| controller.on_frame(host, task));
        });
        let _ = self.window.request_animation_frame(cb.unchecked_ref());
    }

    fn start_interval(&mut self, period: Duration) -> TimerId {
        self.next_timer += 1;
        let timer = TimerId(self.next_timer);
        let app = self.app.clone();
        let tick = Closure::<dyn FnMut()>::new(move || {
            dispatch(&app, |controller, host| controller.on_timer(host, timer));
        });
        match self.window.set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            period.as_millis().min(i32::MAX as u128) as i32,
        ) {
            Ok(handle) => {
                self.intervals.insert(timer, (handle, tick));
            }
            Err(err) => warn!(?err, "setInterval failed"),
        }
        timer
    }

    fn clear_interval(&mut self, timer: TimerId) {
        if let Some((handle, _tick)) = self.intervals.remove(&timer) {
            self.window.clear_interval_with_handle(handle);
        }
    }

    fn observe_hero(&mut self, threshold: f64) {
        let Some(hero) = self.hero.as_ref() else {
            return;
        };
        let app = self.app.clone();
        let cb = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                let entries: Vec<VisibilityEntry> = entries
                    .iter()
                    .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|e| VisibilityEntry {
                        intersection_ratio: e.intersection_ratio(),
                        is_intersecting: e.is_intersecting(),
                    })
                    .collect();
                dispatch(&app, |controller, host| controller.on_visibility(host, &entries));
            },
        );
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        match IntersectionObserver::new_with_options(cb.as_ref().unchecked_ref(), &init) {
            Ok(observer) => {
                observer.observe(hero);
                self.observer = Some(observer);
                cb.forget();
            }
            Err(err) => warn!(?err, "IntersectionObserver unavailable"),
        }
    }

    fn listen_for_clicks(&mut self) {
        let app = self.app.clone();
        let cb = Closure::<dyn FnMut(Event)>::new(move |_e: Event| {
            dispatch(&app, |controller, host| controller.on_click(host));
        });
        let _ = self
            .document
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        cb.forget();
    }
}

// --- Page transition ---

fn init_page_transition(window: &Window, document: &Document, delay: Duration) {
    let origin = window.location().origin().unwrap_or_default();
    let transition = Rc::new(RefCell::new(PageTransition::new(origin, delay)));

    {
        let transition = transition.clone();
        let document = document.clone();
        let cb = Closure::once_into_js(move |_ts: f64| {
            transition.borrow_mut().on_ready_frame();
            sync_body_classes(&document, &transition.borrow());
        });
        let _ = window.request_animation_frame(cb.unchecked_ref());
    }

    let Ok(links) = document.query_selector_all("a[href]") else {
        return;
    };
    for i in 0..links.length() {
        let Some(anchor) = links
            .get(i)
            .and_then(|node| node.dyn_into::<HtmlAnchorElement>().ok())
        else {
            continue;
        };
        let transition = transition.clone();
        let document = document.clone();
        let window = window.clone();
        let link = anchor.clone();
        let cb = Closure::<dyn FnMut(Event)>::new(move |e: Event| {
            let decision = transition.borrow_mut().on_link_click(&link_info(&link));
            let LinkDecision::Navigate { href, delay } = decision else {
                return;
            };
            e.prevent_default();
            sync_body_classes(&document, &transition.borrow());
            let location = window.location();
            let go = Closure::once_into_js(move || {
                let _ = location.set_href(&href);
            });
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                go.unchecked_ref(),
                delay.as_millis().min(i32::MAX as u128) as i32,
            );
        });
        let _ = anchor.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref());
        cb.forget();
    }
}

fn link_info(anchor: &HtmlAnchorElement) -> LinkInfo {
    let resolved_href = anchor.href();
    LinkInfo {
        href_attr: anchor.get_attribute("href"),
        target: Some(anchor.target()).filter(|t| !t.is_empty()),
        origin: web_sys::Url::new(&resolved_href).ok().map(|url| url.origin()),
        resolved_href,
    }
}

fn sync_body_classes(document: &Document, transition: &PageTransition) {
    let Some(body) = document.body() else {
        return;
    };
    let list = body.class_list();
    for class in [PAGE_READY_CLASS, PAGE_EXIT_CLASS] {
        let _ = if transition.classes().contains(&class) {
            list.add_1(class)
        } else {
            list.remove_1(class)
        };
    }
}

// --- Footer ---

struct PlaceholderSlot(Option<Element>);

impl FooterSlot for PlaceholderSlot {
    fn placeholder_exists(&self) -> bool {
        self.0.is_some()
    }

    fn replace_placeholder(&mut self, html: &str) {
        if let Some(el) = self.0.take() {
            el.set_outer_html(html);
        }
    }
}

async fn load_footer(window: Window, document: Document, path: String) {
    let mut slot = PlaceholderSlot(document.get_element_by_id(FOOTER_PLACEHOLDER_ID));
    if !slot.placeholder_exists() {
        return;
    }
    let fetched = fetch_fragment(&window, &path).await;
    footer::splice(&mut slot, fetched);
}

fn js_error(err: JsValue) -> SlideshowError {
    SlideshowError::fetch(format!("{err:?}"))
}

async fn fetch_fragment(window: &Window, path: &str) -> SlideshowResult<FragmentResponse> {
    let response: Response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    let status = response.status();
    let body = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .unwrap_or_default();
    Ok(FragmentResponse { status, body })
}
