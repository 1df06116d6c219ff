//! Browser binding for the greeting.
//!
//! Everything here owns host resources (animation frames, intervals, observers,
//! listeners, media) and releases them on drop. Views own what they schedule, so
//! replacing a view cancels all of its callbacks. The pure state machines live
//! in the sibling modules; this layer only feeds them host time and events.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, EventTarget, HtmlCanvasElement, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, Window,
};

use crate::config::GreetingConfig;
use crate::confetti::{ConfettiField, celebration_blast};
use crate::error::RevealError;
use crate::reveal::Orchestrator;
use crate::rng::from_host_entropy;
use crate::surface::{CanvasSurface, Surface};

mod countdown;
mod gallery;
mod music;
mod reveal;
mod tree;

pub use music::{MusicPlayer, play_sound_effect};

// --- Host helpers --------------------------------------------------------------

pub(crate) fn window() -> Result<Window, RevealError> {
    web_sys::window().ok_or(RevealError::NoWindow)
}

pub(crate) fn document() -> Result<Document, RevealError> {
    window()?.document().ok_or(RevealError::NoDocument)
}

pub(crate) fn body() -> Result<HtmlElement, RevealError> {
    document()?.body().ok_or(RevealError::NoBody)
}

/// Monotonic milliseconds on the same timeline as animation-frame timestamps.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Creates `<tag style=...>`.
pub(crate) fn el(doc: &Document, tag: &str, style: &str) -> Result<Element, RevealError> {
    let e = doc.create_element(tag)?;
    e.set_attribute("style", style)?;
    Ok(e)
}

pub(crate) fn text_el(
    doc: &Document,
    tag: &str,
    style: &str,
    text: &str,
) -> Result<Element, RevealError> {
    let e = el(doc, tag, style)?;
    e.set_text_content(Some(text));
    Ok(e)
}

pub(crate) fn html_el(doc: &Document, tag: &str, style: &str) -> Result<HtmlElement, RevealError> {
    el(doc, tag, style)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| RevealError::Dom(format!("<{tag}> is not an HtmlElement")))
}

pub(crate) fn canvas_el(doc: &Document, style: &str) -> Result<HtmlCanvasElement, RevealError> {
    el(doc, "canvas", style)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| RevealError::Dom("<canvas> is not a canvas".into()))
}

/// Inline heart icon.
pub(crate) fn heart_svg(size: u32, color: &str) -> String {
    format!(
        "<svg width=\"{size}\" height=\"{size}\" viewBox=\"0 0 24 24\" fill=\"{color}\" stroke=\"{color}\" \
         stroke-width=\"2\" stroke-linecap=\"round\" stroke-linejoin=\"round\">\
         <path d=\"M19 14c1.49-1.46 3-3.21 3-5.5A5.5 5.5 0 0 0 16.5 3c-1.76 0-3 .5-4.5 2-1.5-1.5-2.74-2-4.5-2A5.5 5.5 0 0 0 2 8.5c0 2.3 1.5 4.05 3 5.5l7 7Z\"/></svg>"
    )
}

// --- Scheduling primitives -------------------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct FrameInner {
    callback: FrameCallback,
    handle: Cell<Option<i32>>,
    cancelled: Cell<bool>,
}

impl FrameInner {
    fn request(&self) {
        let Some(w) = web_sys::window() else {
            return;
        };
        if let Some(cb) = self.callback.borrow().as_ref() {
            match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(id) => self.handle.set(Some(id)),
                Err(err) => log::warn!("event=raf_failed module=page reason={err:?}"),
            }
        }
    }
}

/// A `requestAnimationFrame` loop. The tick returns whether to keep going.
/// Cancelling (or dropping) stops it before the next frame. Must not be dropped
/// from inside its own tick.
pub struct FrameLoop {
    inner: Rc<FrameInner>,
}

impl FrameLoop {
    pub fn start<F>(mut tick: F) -> Result<Self, RevealError>
    where
        F: FnMut(f64) -> bool + 'static,
    {
        window()?;
        let inner = Rc::new(FrameInner {
            callback: Rc::new(RefCell::new(None)),
            handle: Cell::new(None),
            cancelled: Cell::new(false),
        });
        let weak = Rc::downgrade(&inner);
        *inner.callback.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.handle.set(None);
            if inner.cancelled.get() {
                return;
            }
            if tick(ts) && !inner.cancelled.get() {
                inner.request();
            }
        }) as Box<dyn FnMut(f64)>));
        inner.request();
        Ok(Self { inner })
    }

    /// Whether another frame is scheduled.
    pub fn is_running(&self) -> bool {
        !self.inner.cancelled.get() && self.inner.handle.get().is_some()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.set(true);
        if let Some(id) = self.inner.handle.take() {
            if let Some(w) = web_sys::window() {
                let _ = w.cancel_animation_frame(id);
            }
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// `setInterval` wrapper; cleared on drop.
pub struct Interval {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn start<F>(period_ms: i32, tick: F) -> Result<Self, RevealError>
    where
        F: FnMut() + 'static,
    {
        let callback = Closure::wrap(Box::new(tick) as Box<dyn FnMut()>);
        let handle = window()?.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms,
        )?;
        Ok(Self {
            handle,
            _callback: callback,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let Some(w) = web_sys::window() {
            w.clear_interval_with_handle(self.handle);
        }
    }
}

/// Runs a callback once, the first time `target` becomes visible past
/// `threshold`. Disconnects after firing and on drop.
pub struct VisibilityGate {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl VisibilityGate {
    pub fn watch<F>(target: &Element, threshold: f64, on_visible: F) -> Result<Self, RevealError>
    where
        F: FnOnce() + 'static,
    {
        let mut pending = Some(on_visible);
        let callback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let visible = entries.iter().any(|entry| {
                    entry
                        .dyn_into::<IntersectionObserverEntry>()
                        .map(|e| e.is_intersecting())
                        .unwrap_or(false)
                });
                if !visible {
                    return;
                }
                observer.disconnect();
                if let Some(f) = pending.take() {
                    f();
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        observer.observe(target);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for VisibilityGate {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// An event listener removed on drop.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, kind: &'static str, handler: F) -> Result<Self, RevealError>
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

// --- Shared chrome -------------------------------------------------------------

const STYLES: &str = r#"
@keyframes br-float { 0%, 100% { transform: translateY(0) rotate(0deg); } 50% { transform: translateY(-20px) rotate(5deg); } }
@keyframes br-blob { 0%, 100% { transform: translate(0, 0) scale(1); } 33% { transform: translate(30px, -50px) scale(1.1); } 66% { transform: translate(-20px, 20px) scale(0.9); } }
@keyframes br-pulse { 50% { opacity: 0.6; } }
@keyframes br-breathe { from { transform: scale(0.95); } to { transform: scale(1.05); } }
@keyframes br-bounce { 0%, 100% { height: 4px; } 50% { height: 12px; } }
body { margin: 0; min-height: 100vh; background: linear-gradient(135deg, #fce7f3, #f3e8ff, #e0e7ff); font-family: 'Quicksand', sans-serif; overflow: hidden; }
.br-script { font-family: 'Dancing Script', cursive; }
.br-glass { background: rgba(255,255,255,0.4); backdrop-filter: blur(12px); -webkit-backdrop-filter: blur(12px); border: 1px solid rgba(255,255,255,0.6); box-shadow: 0 20px 50px rgba(190,18,60,0.12); }
.br-word { display: inline-block; margin: 0 6px 4px 0; opacity: 0; transform: translateY(15px); filter: blur(5px); transition: opacity 0.6s ease-out, transform 0.6s ease-out, filter 0.6s ease-out; }
.br-shown .br-word { opacity: 1; transform: none; filter: none; }
.br-fade { opacity: 0; transform: var(--br-from, none); transition: opacity 1s ease-out, transform 1s ease-out; }
.br-shown .br-fade, .br-fade.br-shown { opacity: 1; transform: none; }
"#;

fn install_styles(doc: &Document) -> Result<(), RevealError> {
    if doc.get_element_by_id("br-styles").is_some() {
        return Ok(());
    }
    let style = doc.create_element("style")?;
    style.set_id("br-styles");
    style.set_text_content(Some(STYLES));
    doc.head()
        .map(Element::from)
        .or_else(|| doc.body().map(Element::from))
        .ok_or(RevealError::NoBody)?
        .append_child(&style)?;
    Ok(())
}

/// Blurred colour orbs and drifting hearts behind everything. Mounted once.
fn mount_floating_background(doc: &Document, parent: &Element) -> Result<Element, RevealError> {
    let layer = el(
        doc,
        "div",
        "position:fixed; inset:0; pointer-events:none; overflow:hidden; z-index:0;",
    )?;
    let orbs = [
        ("top:-10%; left:-10%;", "#f9a8d4", "0s"),
        ("top:-10%; right:-10%;", "#d8b4fe", "2s"),
        ("bottom:-10%; left:20%;", "#a5b4fc", "4s"),
    ];
    for (pos, color, delay) in orbs {
        let orb = el(
            doc,
            "div",
            &format!(
                "position:absolute; {pos} width:24rem; height:24rem; background:{color}; border-radius:50%; \
                 mix-blend-mode:multiply; filter:blur(64px); opacity:0.3; animation:br-blob 7s infinite; animation-delay:{delay};"
            ),
        )?;
        layer.append_child(&orb)?;
    }
    let hearts = [
        ("top:20%; left:10%;", 48, "#f9a8d4", 0.4, "0s"),
        ("top:60%; right:15%;", 32, "#fda4af", 0.3, "2s"),
        ("bottom:10%; left:25%;", 64, "#d8b4fe", 0.2, "4s"),
    ];
    for (pos, size, color, opacity, delay) in hearts {
        let h = el(
            doc,
            "div",
            &format!(
                "position:absolute; {pos} opacity:{opacity}; animation:br-float 6s ease-in-out infinite; animation-delay:{delay};"
            ),
        )?;
        h.set_inner_html(&heart_svg(size, color));
        layer.append_child(&h)?;
    }
    // Balloons.
    for (pos, w, h, color, opacity, delay) in [
        ("top:15%; right:30%;", 3.0, 4.0, "#fbcfe8", 0.4, "1.5s"),
        ("bottom:30%; right:5%;", 4.0, 5.0, "#c7d2fe", 0.3, "3.5s"),
    ] {
        let b = el(
            doc,
            "div",
            &format!(
                "position:absolute; {pos} width:{w}rem; height:{h}rem; border-radius:50%; background:{color}; \
                 opacity:{opacity}; animation:br-float 6s ease-in-out infinite; animation-delay:{delay};"
            ),
        )?;
        layer.append_child(&b)?;
    }
    parent.append_child(&layer)?;
    Ok(layer)
}

struct ConfettiInner {
    field: ConfettiField,
    surface: CanvasSurface,
    rng: SmallRng,
}

/// Full-screen confetti overlay. The frame loop runs only while pieces or
/// streams are live and restarts on the next burst.
#[derive(Clone)]
pub(crate) struct ConfettiLayer {
    inner: Rc<RefCell<ConfettiInner>>,
    frames: Rc<RefCell<Option<FrameLoop>>>,
}

impl ConfettiLayer {
    fn mount(doc: &Document, parent: &Element) -> Result<Self, RevealError> {
        let canvas = canvas_el(
            doc,
            "position:fixed; inset:0; width:100%; height:100%; pointer-events:none; z-index:100;",
        )?;
        parent.append_child(&canvas)?;
        let surface = CanvasSurface::new(canvas)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(ConfettiInner {
                field: ConfettiField::default(),
                surface,
                rng: from_host_entropy(),
            })),
            frames: Rc::new(RefCell::new(None)),
        })
    }

    /// Side-cannon stream for `duration_ms`.
    pub(crate) fn stream(&self, duration_ms: f64, per_cannon: usize) {
        self.inner
            .borrow_mut()
            .field
            .stream(now_ms() + duration_ms, per_cannon);
        self.kick();
    }

    /// Replaces any running streams, so a countdown stream ends with the countdown.
    pub(crate) fn restream(&self, duration_ms: f64, per_cannon: usize) {
        self.inner.borrow_mut().field.cancel_streams();
        self.stream(duration_ms, per_cannon);
    }

    pub(crate) fn blast(&self) {
        {
            let mut guard = self.inner.borrow_mut();
            let ConfettiInner { field, surface, rng } = &mut *guard;
            fit_to_window(surface);
            let (w, h) = surface.size();
            let fired: usize = celebration_blast()
                .iter()
                .map(|cannon| field.fire(cannon, w, h, &mut *rng))
                .sum();
            log::debug!("event=confetti_blast module=page pieces={fired}");
        }
        self.kick();
    }

    fn kick(&self) {
        if self.frames.borrow().as_ref().is_some_and(FrameLoop::is_running) {
            return;
        }
        let inner = self.inner.clone();
        let started = FrameLoop::start(move |ts| {
            let mut guard = inner.borrow_mut();
            let ConfettiInner { field, surface, rng } = &mut *guard;
            fit_to_window(surface);
            field.frame(ts, surface, rng)
        });
        match started {
            Ok(frames) => *self.frames.borrow_mut() = Some(frames),
            Err(err) => log::warn!("event=confetti_unavailable module=page error={err}"),
        }
    }
}

fn fit_to_window(surface: &CanvasSurface) {
    let Some(w) = web_sys::window() else {
        return;
    };
    let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32;
    let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32;
    let canvas = surface.canvas();
    if width > 0 && (canvas.width() != width || canvas.height() != height) {
        surface.resize(width, height);
    }
}

// --- App state -------------------------------------------------------------------

enum View {
    Countdown(countdown::CountdownView),
    // Held only so the page stays mounted.
    Reveal(#[allow(dead_code)] reveal::RevealView),
}

struct App {
    config: Rc<GreetingConfig>,
    orchestrator: Orchestrator,
    view: View,
    music: MusicPlayer,
    confetti: ConfettiLayer,
    _background: Element,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Mounts the greeting into the document body. A second call is ignored.
pub fn start(config: GreetingConfig) -> Result<(), RevealError> {
    if APP.with(|cell| cell.borrow().is_some()) {
        log::warn!("event=start_ignored module=page reason=already_running");
        return Ok(());
    }
    let doc = document()?;
    let body = body()?;
    install_styles(&doc)?;

    let background = mount_floating_background(&doc, &body)?;
    let confetti = ConfettiLayer::mount(&doc, &body)?;
    let music = MusicPlayer::new(&doc, &body, &config.audio)?;
    let target = config.countdown.target_ms(js_sys::Date::now() as i64);
    let config = Rc::new(config);
    let view = countdown::CountdownView::mount(&doc, &body, &config)?;

    APP.with(|cell| {
        *cell.borrow_mut() = Some(App {
            config,
            orchestrator: Orchestrator::new(target),
            view: View::Countdown(view),
            music,
            confetti,
            _background: background,
        });
    });
    log::info!("event=greeting_started module=page target_ms={target}");
    countdown_tick();
    Ok(())
}

/// One countdown step against the wall clock.
pub(crate) fn countdown_tick() {
    APP.with(|cell| {
        let mut guard = cell.borrow_mut();
        let Some(app) = guard.as_mut() else {
            return;
        };
        let Some(tick) = app.orchestrator.tick(js_sys::Date::now() as i64) else {
            return;
        };
        if let View::Countdown(view) = &app.view {
            view.render(&tick.countdown);
        }
        if tick.just_expired {
            app.confetti.stream(5_000.0, 3);
        }
    });
}

/// Leaves the countdown. Called from a spawned task, never from inside the
/// countdown view's own handlers, because it drops that view.
pub(crate) fn unlock() {
    APP.with(|cell| {
        let mut guard = cell.borrow_mut();
        let Some(app) = guard.as_mut() else {
            return;
        };
        if !app.orchestrator.unlock() {
            return;
        }
        if let Err(err) = app.reveal() {
            log::error!("event=reveal_failed module=page error={err}");
        }
    });
}

impl App {
    fn reveal(&mut self) -> Result<(), RevealError> {
        let doc = document()?;
        let body = body()?;
        let view = reveal::RevealView::mount(&doc, &body, &self.config, self.confetti.clone())?;
        // Dropping the countdown view clears its interval and listeners.
        self.view = View::Reveal(view);
        self.music.start();
        self.confetti.restream(3_000.0, 5);
        Ok(())
    }
}
