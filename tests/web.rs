#![cfg(target_arch = "wasm32")]
//! Browser tests for the scheduling wrappers. Run with
//! `wasm-pack test --headless --chrome`.

use std::cell::Cell;
use std::rc::Rc;

use birthday_reveal::page::{FrameLoop, Interval};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

async fn sleep_ms(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let window = web_sys::window().expect("window");
        window
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .expect("setTimeout");
    });
    JsFuture::from(promise).await.expect("timer resolves");
}

#[wasm_bindgen_test]
async fn frame_loop_stops_when_tick_returns_false() {
    let frames = Rc::new(Cell::new(0u32));
    let counter = frames.clone();
    let frame_loop = FrameLoop::start(move |_ts| {
        counter.set(counter.get() + 1);
        counter.get() < 3
    })
    .expect("frame loop");
    sleep_ms(300).await;
    assert_eq!(frames.get(), 3);
    assert!(!frame_loop.is_running());
}

#[wasm_bindgen_test]
async fn dropped_frame_loop_never_ticks_again() {
    let frames = Rc::new(Cell::new(0u32));
    let counter = frames.clone();
    let frame_loop = FrameLoop::start(move |_ts| {
        counter.set(counter.get() + 1);
        true
    })
    .expect("frame loop");
    sleep_ms(100).await;
    drop(frame_loop);
    let seen = frames.get();
    assert!(seen > 0);
    sleep_ms(200).await;
    assert_eq!(frames.get(), seen);
}

#[wasm_bindgen_test]
async fn cancelled_frame_loop_reports_stopped() {
    let frame_loop = FrameLoop::start(|_ts| true).expect("frame loop");
    assert!(frame_loop.is_running());
    frame_loop.cancel();
    assert!(!frame_loop.is_running());
}

#[wasm_bindgen_test]
async fn dropped_interval_is_cleared() {
    let ticks = Rc::new(Cell::new(0u32));
    let counter = ticks.clone();
    let interval = Interval::start(20, move || counter.set(counter.get() + 1)).expect("interval");
    sleep_ms(150).await;
    drop(interval);
    let seen = ticks.get();
    assert!(seen > 0);
    sleep_ms(150).await;
    assert_eq!(ticks.get(), seen);
}

#[wasm_bindgen_test]
fn start_greeting_mounts_once() {
    birthday_reveal::start_greeting().expect("mounts");
    // A second call is ignored rather than mounting a second page.
    birthday_reveal::start_greeting().expect("ignored");
    let document = web_sys::window().and_then(|w| w.document()).expect("document");
    assert!(document.get_element_by_id("br-styles").is_some());
}

#[wasm_bindgen_test]
fn logger_writes_to_console_at_every_level() {
    birthday_reveal::logging::init("trace").expect("logger installs");
    assert_eq!(log::max_level(), log::LevelFilter::Trace);
    log::error!("event=web_test module=tests level=error");
    log::warn!("event=web_test module=tests level=warn");
    log::info!("event=web_test module=tests level=info");
    log::debug!("event=web_test module=tests level=debug");
    log::trace!("event=web_test module=tests level=trace");
    birthday_reveal::logging::init("warn").expect("level adjusts");
    assert_eq!(log::max_level(), log::LevelFilter::Warn);
}
