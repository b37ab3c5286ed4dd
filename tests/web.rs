#![cfg(target_arch = "wasm32")]

use std::time::Duration;

use lab_site::content::{Publication, LAB};
use lab_site::frontend::{
    write_progress, App, AppProps, Marquee, MarqueeProps, ProgressBar, ProgressBarProps,
    PublicationList, PublicationListProps, SharedThemeStore,
};
use lab_site::scroll::{progress_width, ScrollMetrics, ScrollState};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlElement};
use yew::NodeRef;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_point() -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let root = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&root).unwrap();
    root
}

async fn settle() {
    yew::platform::time::sleep(Duration::from_millis(20)).await;
}

const OUT_OF_ORDER: &[Publication] = &[
    Publication {
        year: 2025,
        title: "Gamma",
        journal: "Neuron",
    },
    Publication {
        year: 2023,
        title: "Alpha",
        journal: "Cell",
    },
    Publication {
        year: 2024,
        title: "Beta",
        journal: "Nature",
    },
];

#[wasm_bindgen_test(async)]
async fn publications_render_in_the_given_order() {
    let root = mount_point();
    yew::Renderer::<PublicationList>::with_root_and_props(
        root.clone(),
        PublicationListProps {
            entries: LAB.publications,
        },
    )
    .render();
    settle().await;

    let html = root.inner_html();
    let first = html.find("2023").unwrap();
    let second = html.find("2024").unwrap();
    let third = html.find("2025").unwrap();
    assert!(first < second && second < third);
}

#[wasm_bindgen_test(async)]
async fn publications_are_never_resorted() {
    let root = mount_point();
    yew::Renderer::<PublicationList>::with_root_and_props(
        root.clone(),
        PublicationListProps {
            entries: OUT_OF_ORDER,
        },
    )
    .render();
    settle().await;

    let html = root.inner_html();
    let gamma = html.find("Gamma").unwrap();
    let alpha = html.find("Alpha").unwrap();
    let beta = html.find("Beta").unwrap();
    assert!(gamma < alpha && alpha < beta);
}

#[wasm_bindgen_test(async)]
async fn progress_bar_width_follows_scroll_percentage() {
    let state = ScrollState::from_metrics(ScrollMetrics {
        scroll_y: 500.0,
        document_height: 2000.0,
        viewport_height: 1000.0,
    });

    let root = mount_point();
    let bar_ref = NodeRef::default();
    yew::Renderer::<ProgressBar>::with_root_and_props(
        root.clone(),
        ProgressBarProps {
            bar_ref: bar_ref.clone(),
        },
    )
    .render();
    settle().await;

    let bar = bar_ref.cast::<HtmlElement>().unwrap();
    write_progress(&bar, state.percentage);

    assert_eq!(bar.style().get_property_value("width").unwrap(), progress_width(50.0));
}

async fn mount_app() -> Element {
    let root = mount_point();
    yew::Renderer::<App>::with_root_and_props(
        root.clone(),
        AppProps {
            seed_hue: 140.0,
            theme_store: SharedThemeStore::load(),
        },
    )
    .render();
    settle().await;
    root
}

#[wasm_bindgen_test(async)]
async fn app_arms_reveal_styling_once_the_observer_exists() {
    let root = mount_app().await;

    let shell = root.query_selector(".page-shell").unwrap().unwrap();
    let classes = shell.get_attribute("class").unwrap();
    assert!(classes.split_whitespace().any(|c| c == "reveal-armed"), "{classes}");
    for id in ["about", "research", "gallery", "team", "publications", "contact"] {
        assert!(root.query_selector(&format!("section#{id}.section")).unwrap().is_some(), "{id}");
    }
}

#[wasm_bindgen_test(async)]
async fn theme_toggle_flips_the_pressed_state() {
    let root = mount_app().await;

    let toggle = root
        .query_selector(".theme-toggle")
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    let before = toggle.get_attribute("aria-pressed").unwrap();

    toggle.click();
    settle().await;

    let after = toggle.get_attribute("aria-pressed").unwrap();
    assert_ne!(before, after);
}

#[wasm_bindgen_test(async)]
async fn marquee_repeats_its_items_once_for_the_loop() {
    let root = mount_point();
    yew::Renderer::<Marquee>::with_root_and_props(
        root.clone(),
        MarqueeProps {
            items: &["Organoids", "Synapses"],
        },
    )
    .render();
    settle().await;

    let html = root.inner_html();
    assert_eq!(html.matches("Organoids").count(), 2);
    assert_eq!(html.matches("aria-hidden=\"true\"").count(), 1);
}
