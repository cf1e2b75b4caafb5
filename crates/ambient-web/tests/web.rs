#![cfg(target_arch = "wasm32")]

use ambient_web::{mount_ray_field, mount_warp_field};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn add_container(id: &str, width: u32, height: u32) -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let element = document
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    element.set_id(id);
    let style = element.style();
    style.set_property("width", &format!("{width}px")).unwrap();
    style.set_property("height", &format!("{height}px")).unwrap();
    document.body().unwrap().append_child(&element).unwrap();
    element
}

fn call(handle: &JsValue, method: &str) -> JsValue {
    let function = js_sys::Reflect::get(handle, &JsValue::from_str(method))
        .unwrap()
        .dyn_into::<js_sys::Function>()
        .unwrap();
    function.call0(handle).unwrap()
}

async fn next_frames(count: usize) {
    let window = web_sys::window().unwrap();
    for _ in 0..count {
        let promise = js_sys::Promise::new(&mut |resolve, _| {
            window.request_animation_frame(&resolve).unwrap();
        });
        JsFuture::from(promise).await.unwrap();
    }
}

#[wasm_bindgen_test]
async fn missing_container_resolves_to_undefined() {
    let handle = mount_ray_field("no-such-container".into(), JsValue::UNDEFINED).await;
    assert!(handle.is_undefined());
}

#[wasm_bindgen_test]
async fn mistyped_options_resolve_to_undefined() {
    add_container("bad-options", 64, 64);
    let options = js_sys::JSON::parse(r#"{"raysSpeed": "fast"}"#).unwrap();
    let handle = mount_ray_field("bad-options".into(), options).await;
    assert!(handle.is_undefined());
}

#[wasm_bindgen_test]
async fn stop_removes_the_canvas() {
    let container = add_container("bends-stop", 120, 80);
    let options = js_sys::JSON::parse(r##"{"colors": ["#ff0000"], "transparent": false}"##).unwrap();
    let handle = mount_warp_field("bends-stop".into(), options).await;
    if handle.is_undefined() {
        // No GPU adapter in this browser; the mount failure was logged.
        assert!(container.query_selector("canvas").unwrap().is_none());
        return;
    }

    assert_eq!(call(&handle, "isRunning"), JsValue::TRUE);
    let canvas = container
        .query_selector("canvas")
        .unwrap()
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    assert!(canvas.width() >= 120 && canvas.height() >= 80);

    next_frames(2).await;
    call(&handle, "stop");
    call(&handle, "stop");
    assert_eq!(call(&handle, "isRunning"), JsValue::FALSE);
    assert!(container.query_selector("canvas").unwrap().is_none());
}

#[wasm_bindgen_test]
async fn removed_container_stops_the_loop() {
    let container = add_container("rays-detach", 100, 100);
    let handle = mount_ray_field("rays-detach".into(), JsValue::NULL).await;
    if handle.is_undefined() {
        return;
    }

    next_frames(1).await;
    assert_eq!(call(&handle, "isRunning"), JsValue::TRUE);
    container.remove();
    next_frames(3).await;
    assert_eq!(call(&handle, "isRunning"), JsValue::FALSE);
}
