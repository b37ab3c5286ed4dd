use js_sys::{Array, Function, Reflect};
use serde_json::json;
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Element, Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, ScrollBehavior, ScrollIntoViewOptions, Storage,
};
use yew::prelude::*;

use crate::content::{
    copyright_line, section_ids, CallToAction, GalleryMedia, Publication, LAB, NAV_LINKS,
};
use crate::logging::{LogLevel, Logger};
use crate::magnet::{MagnetRegistry, Point};
use crate::reveal::{RevealLatch, REVEAL_THRESHOLD};
use crate::scroll::{progress_width, ParallaxRegistry, ScrollMetrics, ScrollState};
use crate::theme::{compute_theme_variables, StorageError, Theme, ThemeStorage, ThemeStore};

// Browsers report the crossing ratio with float noise around the threshold.
const RATIO_TOLERANCE: f64 = 1e-3;

fn logger() -> Logger {
    if cfg!(debug_assertions) {
        Logger::new(LogLevel::Debug)
    } else {
        Logger::new(LogLevel::Warn)
    }
}

pub struct BrowserStorage(Storage);

impl BrowserStorage {
    pub fn open() -> Option<Self> {
        match window()?.local_storage() {
            Ok(Some(storage)) => Some(Self(storage)),
            Ok(None) => None,
            Err(err) => {
                logger().debug(
                    "theme_storage_unavailable",
                    json!({ "stage": "open", "error": js_error_name(&err) }),
                );
                None
            }
        }
    }
}

impl ThemeStorage for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.0
            .get_item(key)
            .map_err(|err| StorageError::Rejected(js_error_name(&err)))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0
            .set_item(key, value)
            .map_err(|err| StorageError::Rejected(js_error_name(&err)))
    }
}

fn js_error_name(err: &JsValue) -> String {
    Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|value| value.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Theme store shared between the mount code and the `App` component.
#[derive(Clone)]
pub struct SharedThemeStore(Rc<RefCell<ThemeStore<BrowserStorage>>>);

impl SharedThemeStore {
    pub fn load() -> Self {
        let storage = BrowserStorage::open();
        let had_storage = storage.is_some();
        let store = ThemeStore::load(storage);

        if had_storage && !store.is_persistent() {
            logger().debug("theme_storage_unavailable", json!({ "stage": "read" }));
        }

        Self(Rc::new(RefCell::new(store)))
    }

    fn theme(&self) -> Theme {
        self.0.borrow().theme()
    }

    fn toggle(&self) -> Theme {
        let mut store = self.0.borrow_mut();
        if let Err(err) = store.toggle() {
            logger().debug(
                "theme_storage_unavailable",
                json!({ "stage": "write", "error": err.to_string() }),
            );
        }
        let next = store.theme();
        logger().debug(
            "theme_changed",
            json!({ "theme": next, "persistent": store.is_persistent() }),
        );
        next
    }
}

impl PartialEq for SharedThemeStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn apply_theme(theme: Theme, seed_hue: f64) {
    let Some(root) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };

    let _ = root.set_attribute("data-theme", theme.as_str());

    let Ok(root) = root.dyn_into::<HtmlElement>() else {
        return;
    };
    let style = root.style();
    for (name, value) in compute_theme_variables(seed_hue, theme) {
        let _ = style.set_property(name, &value);
    }
    let _ = style.set_property("color-scheme", theme.as_str());
}

fn apply_theme_with_transition(theme: Theme, seed_hue: f64) {
    if prefers_reduced_motion() {
        apply_theme(theme, seed_hue);
        return;
    }

    let Some(document) = window().and_then(|w| w.document()) else {
        apply_theme(theme, seed_hue);
        return;
    };

    let document_js: JsValue = document.into();
    let Ok(start_view_transition) =
        Reflect::get(&document_js, &JsValue::from_str("startViewTransition"))
    else {
        apply_theme(theme, seed_hue);
        return;
    };

    let Some(start_view_transition) = start_view_transition.dyn_ref::<Function>() else {
        apply_theme(theme, seed_hue);
        return;
    };

    let callback = Closure::once_into_js(move || apply_theme(theme, seed_hue));

    if start_view_transition.call1(&document_js, &callback).is_err() {
        apply_theme(theme, seed_hue);
    }
}

/// Window event subscription that is removed when dropped.
struct WindowListener {
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl WindowListener {
    fn attach<F>(event: &'static str, handler: F) -> Option<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        window()?
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .ok()?;
        Some(Self { event, callback })
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        if let Some(win) = window() {
            let _ = win.remove_event_listener_with_callback(
                self.event,
                self.callback.as_ref().unchecked_ref(),
            );
        }
    }
}

fn node_refs(count: usize) -> Vec<NodeRef> {
    (0..count).map(|_| NodeRef::default()).collect()
}

fn read_scroll_metrics() -> Option<ScrollMetrics> {
    let win = window()?;
    let scroll_y = win.scroll_y().ok()?;
    let viewport_height = win.inner_height().ok()?.as_f64()?;
    let document_height = f64::from(win.document()?.document_element()?.scroll_height());

    Some(ScrollMetrics {
        scroll_y,
        document_height,
        viewport_height,
    })
}

/// Sets the progress bar width outside the render cycle, so scrolling never
/// re-renders the page.
pub fn write_progress(bar: &HtmlElement, percentage: f64) {
    let _ = bar.style().set_property("width", &progress_width(percentage));
}

fn apply_scroll(parallax: &ParallaxRegistry<HtmlElement>, progress_bar: &NodeRef) {
    let Some(metrics) = read_scroll_metrics() else {
        return;
    };
    let state = ScrollState::from_metrics(metrics);

    for (element, transform) in parallax.transforms(state.raw_offset) {
        let _ = element.style().set_property("transform", &transform);
    }
    if let Some(bar) = progress_bar.cast::<HtmlElement>() {
        write_progress(&bar, state.percentage);
    }
}

/// A call-to-action: the untransformed slot is measured, the button inside
/// it is moved.
struct MagnetNode {
    slot: HtmlElement,
    button: HtmlElement,
}

fn magnet_center(node: &MagnetNode) -> Option<Point> {
    let rect = node.slot.get_bounding_client_rect();
    if rect.width() == 0.0 && rect.height() == 0.0 {
        return None;
    }
    Some(Point::new(
        rect.left() + rect.width() / 2.0,
        rect.top() + rect.height() / 2.0,
    ))
}

fn write_magnet_transforms(registry: &MagnetRegistry<MagnetNode>) {
    for target in registry.targets() {
        let _ = target
            .handle
            .button
            .style()
            .set_property("transform", &target.offset.to_transform());
    }
}

fn scroll_to_section(id: &str) {
    let Some(target) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    else {
        return;
    };

    let options = ScrollIntoViewOptions::new();
    options.set_behavior(if prefers_reduced_motion() {
        ScrollBehavior::Auto
    } else {
        ScrollBehavior::Smooth
    });
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

fn smooth_anchor(id: &'static str) -> Callback<MouseEvent> {
    Callback::from(move |event: MouseEvent| {
        event.prevent_default();
        scroll_to_section(id);
    })
}

#[derive(Clone, PartialEq)]
struct RevealState {
    latch: RevealLatch<&'static str>,
    armed: bool,
}

impl RevealState {
    fn new() -> Self {
        Self {
            latch: RevealLatch::new(section_ids()),
            armed: false,
        }
    }

    fn section_class(&self, id: &str) -> Classes {
        classes!("section", self.latch.is_shown(id).then_some("is-shown"))
    }

    fn shell_class(&self) -> Classes {
        classes!("page-shell", self.armed.then_some("reveal-armed"))
    }
}

fn crossing_ratio(reported: f64) -> f64 {
    reported + RATIO_TOLERANCE
}

enum RevealAction {
    Arm,
    Observe { section: String, ratio: f64 },
}

impl Reducible for RevealState {
    type Action = RevealAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            RevealAction::Arm if !self.armed => {
                let mut next = (*self).clone();
                next.armed = true;
                Rc::new(next)
            }
            RevealAction::Arm => self,
            RevealAction::Observe { section, ratio } => {
                if self.latch.is_shown(section.as_str()) {
                    return self;
                }
                let mut next = (*self).clone();
                if next.latch.observe(section.as_str(), ratio) {
                    Rc::new(next)
                } else {
                    self
                }
            }
        }
    }
}

struct SectionObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Drop for SectionObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

fn observe_sections(
    sections: &[NodeRef],
    dispatcher: UseReducerDispatcher<RevealState>,
) -> Option<SectionObserver> {
    let on_intersect = {
        let dispatcher = dispatcher.clone();
        Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }

                    let ratio = crossing_ratio(entry.intersection_ratio());
                    let target = entry.target();
                    if ratio >= REVEAL_THRESHOLD {
                        observer.unobserve(&target);
                    }
                    dispatcher.dispatch(RevealAction::Observe {
                        section: target.id(),
                        ratio,
                    });
                }
            },
        )
    };

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));

    let observer =
        match IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init) {
            Ok(observer) => observer,
            Err(err) => {
                logger().debug(
                    "intersection_observer_unavailable",
                    json!({ "error": js_error_name(&err) }),
                );
                return None;
            }
        };

    for section in sections {
        if let Some(element) = section.cast::<Element>() {
            observer.observe(&element);
        }
    }

    dispatcher.dispatch(RevealAction::Arm);

    Some(SectionObserver {
        observer,
        _callback: on_intersect,
    })
}

#[derive(Properties, PartialEq)]
pub struct ProgressBarProps {
    /// The bar element; its width is driven by [`write_progress`].
    pub bar_ref: NodeRef,
}

#[function_component(ProgressBar)]
pub fn progress_bar(props: &ProgressBarProps) -> Html {
    html! {
        <div class="scroll-progress" aria-hidden="true">
            <div class="scroll-progress-bar" ref={props.bar_ref.clone()}></div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct MarqueeProps {
    pub items: &'static [&'static str],
}

#[function_component(Marquee)]
pub fn marquee(props: &MarqueeProps) -> Html {
    let run = |hidden: bool| {
        html! {
            <ul class="marquee-run" aria-hidden={hidden.to_string()}>
                { for props.items.iter().map(|item| html! { <li>{*item}</li> }) }
            </ul>
        }
    };

    // the track holds two copies so the loop has no visible seam
    html! {
        <div class="marquee">
            <div class="marquee-track">
                {run(false)}
                {run(true)}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct GalleryTileProps {
    pub media: GalleryMedia,
    pub media_ref: NodeRef,
}

#[function_component(GalleryTile)]
pub fn gallery_tile(props: &GalleryTileProps) -> Html {
    let media = props.media;

    // keep the frame and caption when the image cannot load
    let onerror = Callback::from(|event: Event| {
        if let Some(image) = event.target_dyn_into::<HtmlElement>() {
            let _ = image.style().set_property("visibility", "hidden");
        }
    });

    html! {
        <figure class="gallery-tile">
            <div class="gallery-frame">
                <div class="gallery-media" ref={props.media_ref.clone()}>
                    <img
                        class={classes!(media.ken_burns.then_some("ken-burns"))}
                        src={media.src}
                        alt={media.alt}
                        loading="lazy"
                        onerror={onerror}
                    />
                </div>
            </div>
            <figcaption>{media.caption}</figcaption>
        </figure>
    }
}

#[derive(Properties, PartialEq)]
pub struct PublicationListProps {
    pub entries: &'static [Publication],
}

#[function_component(PublicationList)]
pub fn publication_list(props: &PublicationListProps) -> Html {
    html! {
        <ol class="publication-list">
            { for props.entries.iter().map(|publication| html! {
                <li class="publication">
                    <span class="publication-year">{publication.year.to_string()}</span>
                    <em class="publication-title">{publication.title}</em>
                    <span class="publication-journal">{publication.journal}</span>
                </li>
            }) }
        </ol>
    }
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub seed_hue: f64,
    pub theme_store: SharedThemeStore,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let theme = use_state(|| props.theme_store.theme());
    let progress_bar = use_node_ref();
    let reveal = use_reducer(RevealState::new);

    let section_refs = use_memo((), |_| node_refs(NAV_LINKS.len()));
    let media_refs = use_memo((), |_| node_refs(LAB.gallery.len()));
    let cta_slot_refs = use_memo((), |_| node_refs(LAB.calls_to_action.len()));
    let cta_button_refs = use_memo((), |_| node_refs(LAB.calls_to_action.len()));

    {
        let progress_bar = progress_bar.clone();
        let media_refs = media_refs.clone();
        use_effect_with((), move |_| {
            let mut parallax = ParallaxRegistry::new();
            if !prefers_reduced_motion() {
                for (media_ref, media) in media_refs.iter().zip(LAB.gallery) {
                    if let Some(element) = media_ref.cast::<HtmlElement>() {
                        parallax.register(element, media.depth);
                    }
                }
            }
            let parallax = Rc::new(parallax);

            apply_scroll(&parallax, &progress_bar);

            let on_scroll = {
                let parallax = parallax.clone();
                let progress_bar = progress_bar.clone();
                move |_: Event| apply_scroll(&parallax, &progress_bar)
            };
            let on_resize = move |_: Event| apply_scroll(&parallax, &progress_bar);

            let listeners = [
                WindowListener::attach("scroll", on_scroll),
                WindowListener::attach("resize", on_resize),
            ];

            move || drop(listeners)
        });
    }

    {
        let cta_slot_refs = cta_slot_refs.clone();
        let cta_button_refs = cta_button_refs.clone();
        use_effect_with((), move |_| {
            let mut magnets = MagnetRegistry::new();
            if !prefers_reduced_motion() {
                for (slot, button) in cta_slot_refs.iter().zip(cta_button_refs.iter()) {
                    if let (Some(slot), Some(button)) =
                        (slot.cast::<HtmlElement>(), button.cast::<HtmlElement>())
                    {
                        magnets.register(MagnetNode { slot, button });
                    }
                }
            }
            let magnets = Rc::new(RefCell::new(magnets));

            let on_pointer_move = {
                let magnets = magnets.clone();
                move |event: Event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    let pointer = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
                    let mut magnets = magnets.borrow_mut();
                    magnets.update(pointer, magnet_center);
                    write_magnet_transforms(&magnets);
                }
            };

            let on_pointer_exit = move |event: Event| {
                let left_window = event
                    .dyn_ref::<MouseEvent>()
                    .map(|event| event.related_target().is_none())
                    .unwrap_or(true);
                if left_window {
                    let mut magnets = magnets.borrow_mut();
                    magnets.reset();
                    write_magnet_transforms(&magnets);
                }
            };

            let listeners = [
                WindowListener::attach("pointermove", on_pointer_move),
                WindowListener::attach("mouseout", on_pointer_exit),
            ];

            move || drop(listeners)
        });
    }

    {
        let section_refs = section_refs.clone();
        let dispatcher = reveal.dispatcher();
        use_effect_with((), move |_| {
            let observer = observe_sections(&section_refs, dispatcher);
            move || drop(observer)
        });
    }

    let on_toggle = {
        let theme = theme.clone();
        let theme_store = props.theme_store.clone();
        let seed_hue = props.seed_hue;
        Callback::from(move |_| {
            let next = theme_store.toggle();
            apply_theme_with_transition(next, seed_hue);
            theme.set(next);
        })
    };

    let section_class = |id: &str| reveal.section_class(id);
    let section_ref = |index: usize| section_refs[index].clone();
    let year = js_sys::Date::new_0().get_full_year();

    html! {
        <>
            <a class="skip-link" href="#about">{"Skip to main content"}</a>
            <ProgressBar bar_ref={progress_bar.clone()} />
            <div class={reveal.shell_class()}>
                <header class="site-header">
                    <a class="lab-name" href="#top" onclick={smooth_anchor("top")}>{LAB.lab_name}</a>
                    <nav class="site-nav" aria-label="Sections">
                        { for NAV_LINKS.iter().map(|link| html! {
                            <a href={format!("#{}", link.id)} onclick={smooth_anchor(link.id)}>{link.label}</a>
                        }) }
                    </nav>
                    <button
                        class="theme-toggle"
                        type="button"
                        aria-label={(*theme).toggle_label()}
                        aria-pressed={(*theme).pressed().to_string()}
                        onclick={on_toggle}
                    >
                        <span aria-hidden="true">{(*theme).icon()}</span>
                    </button>
                </header>

                <main>
                    <section id="top" class="hero">
                        <h1>{LAB.hero_title}</h1>
                        <p class="hero-text">{LAB.hero_text}</p>
                        <div class="hero-actions">
                            { for LAB.calls_to_action.iter().enumerate().map(|(index, cta)| {
                                call_to_action(cta, &cta_slot_refs[index], &cta_button_refs[index])
                            }) }
                        </div>
                    </section>

                    <Marquee items={LAB.marquee} />

                    <section id="about" ref={section_ref(0)} class={section_class("about")}>
                        <h2>{"About Us"}</h2>
                        <p>{LAB.about}</p>
                    </section>

                    <section id="research" ref={section_ref(1)} class={section_class("research")}>
                        <h2>{"Research Areas"}</h2>
                        <div class="card-grid">
                            { for LAB.research.iter().map(|area| html! {
                                <article class="card">
                                    <h3>{area.title}</h3>
                                    <p>{area.text}</p>
                                </article>
                            }) }
                        </div>
                    </section>

                    <section id="gallery" ref={section_ref(2)} class={section_class("gallery")}>
                        <h2>{"Gallery"}</h2>
                        <div class="gallery-grid">
                            { for LAB.gallery.iter().zip(media_refs.iter()).map(|(media, media_ref)| html! {
                                <GalleryTile media={*media} media_ref={media_ref.clone()} />
                            }) }
                        </div>
                    </section>

                    <section id="team" ref={section_ref(3)} class={section_class("team")}>
                        <h2>{"Meet the Team"}</h2>
                        <p>{LAB.team_intro}</p>
                        <ul class="team-list">
                            { for LAB.team.iter().map(|member| html! {
                                <li>
                                    <span class="team-name">{member.name}</span>
                                    <span class="muted">{member.role}</span>
                                </li>
                            }) }
                        </ul>
                    </section>

                    <section id="publications" ref={section_ref(4)} class={section_class("publications")}>
                        <h2>{"Selected Publications"}</h2>
                        <PublicationList entries={LAB.publications} />
                    </section>

                    <section id="contact" ref={section_ref(5)} class={section_class("contact")}>
                        <h2>{"Contact"}</h2>
                        <p>
                            {"Email: "}
                            <a href={format!("mailto:{}", LAB.contact.email)}>{LAB.contact.email}</a>
                        </p>
                        <p>
                            {"Twitter: "}
                            <a href={LAB.contact.social_url} target="_blank" rel="noopener noreferrer">
                                {LAB.contact.social_handle}
                            </a>
                        </p>
                        <p class="muted">{LAB.contact.location}</p>
                    </section>
                </main>

                <footer class="site-footer">
                    <p>{copyright_line(year, LAB.lab_name)}</p>
                </footer>
            </div>
        </>
    }
}

fn call_to_action(cta: &CallToAction, slot_ref: &NodeRef, button_ref: &NodeRef) -> Html {
    let onclick = cta
        .href
        .strip_prefix('#')
        .map(smooth_anchor)
        .unwrap_or_default();

    html! {
        <span class="magnet-slot" ref={slot_ref.clone()}>
            <a class="cta" href={cta.href} ref={button_ref.clone()} onclick={onclick}>
                {cta.label}
            </a>
        </span>
    }
}

pub fn run() {
    let seed_hue = js_sys::Math::random() * 360.0;
    let theme_store = SharedThemeStore::load();

    // before the first render so the page never paints in the wrong theme
    apply_theme(theme_store.theme(), seed_hue);

    yew::Renderer::<App>::with_root_and_props(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
        AppProps {
            seed_hue,
            theme_store,
        },
    )
    .render();
}
