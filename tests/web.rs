//! Browser tests, run with `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use flappy_flight::engine::debug_ui::DebugUi;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn text_of(id: &str) -> Option<String> {
    document().get_element_by_id(id).unwrap().text_content()
}

fn container() -> web_sys::Element {
    document()
        .query_selector(".debugger-container")
        .unwrap()
        .expect("container is created on first label")
}

#[wasm_bindgen_test]
fn add_label_builds_a_row_in_the_debugger_container() {
    let mut debug = DebugUi::new();
    debug.add_label("row-speed", "Speed").unwrap();

    let value = document().get_element_by_id("row-speed").unwrap();
    let label = value.previous_element_sibling().expect("label span");
    assert_eq!(label.class_name(), "debugger-label");
    assert_eq!(label.text_content().unwrap(), "Speed: ");
    assert_eq!(text_of("row-speed").unwrap_or_default(), "");

    debug.update_value("row-speed", 0.005);
    assert_eq!(text_of("row-speed").unwrap(), "0.005");
}

#[wasm_bindgen_test]
fn labels_share_one_container() {
    let mut debug = DebugUi::new();
    debug.add_label("row-a", "A").unwrap();
    let before = container().child_element_count();
    debug.add_label("row-b", "B").unwrap();

    // label, value and line break per row
    assert_eq!(container().child_element_count(), before + 3);
    let row = document().get_element_by_id("row-a").unwrap();
    assert!(container().contains(Some(&row)));
}

#[wasm_bindgen_test]
fn updating_an_unknown_label_leaves_the_page_alone() {
    let mut debug = DebugUi::new();
    debug.add_label("row-fps", "FPS").unwrap();
    debug.update_value("row-missing", 60);

    assert_eq!(text_of("row-fps").unwrap_or_default(), "");
    assert!(document().get_element_by_id("row-missing").is_none());
}

#[wasm_bindgen_test]
async fn missing_image_rejects_through_the_error_callback() {
    let loaded = flappy_flight::engine::load_image("assets/does-not-exist.png").await;
    assert!(loaded.is_err());
}
