//! Love-tree section: time-together clock, captions, and the tree and petal
//! canvases. Nothing animates until the section scrolls into view.
use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::SmallRng;
use web_sys::{Document, Element, HtmlCanvasElement};

use super::{FrameLoop, Interval, Listener, VisibilityGate, canvas_el, el, now_ms, text_el};
use crate::config::GreetingConfig;
use crate::error::RevealError;
use crate::message::caption_delay_s;
use crate::rng::from_host_entropy;
use crate::scene::LoveTreeScene;
use crate::surface::CanvasSurface;
use crate::timing::{CalendarInstant, elapsed_between};

pub const CANVAS_HEIGHT: u32 = 500;
/// Fraction of the section that must be on screen before the tree starts.
pub const VISIBLE_THRESHOLD: f64 = 0.2;

const CLOCK_LABELS: [&str; 6] = ["Years", "Months", "Days", "Hours", "Mins", "Secs"];

/// Current local wall-clock time.
pub fn local_now() -> CalendarInstant {
    let d = js_sys::Date::new_0();
    CalendarInstant::new(
        d.get_full_year() as i32,
        (d.get_month() + 1) as u8,
        d.get_date() as u8,
        d.get_hours() as u8,
        d.get_minutes() as u8,
        d.get_seconds() as u8,
    )
}

struct SceneRuntime {
    scene: LoveTreeScene<SmallRng>,
    tree: CanvasSurface,
    petals: CanvasSurface,
}

pub(crate) struct TreeView {
    scene: Option<Rc<RefCell<SceneRuntime>>>,
    frames: Rc<RefCell<Option<FrameLoop>>>,
    _clock: Interval,
    _gate: VisibilityGate,
    _resize: Option<Listener>,
}

impl TreeView {
    pub(crate) fn mount(
        doc: &Document,
        parent: &Element,
        config: &GreetingConfig,
    ) -> Result<Self, RevealError> {
        let section = el(
            doc,
            "div",
            "position:relative; z-index:10; min-height:100vh; width:100%; display:flex; flex-direction:column; \
             align-items:center; padding:16px 0 40px; overflow:hidden;",
        )?;

        // Time-together clock.
        let clock_wrap = el(
            doc,
            "div",
            "z-index:20; margin-bottom:32px; width:100%; padding:0 16px; box-sizing:border-box; --br-from:translateY(20px);",
        )?;
        clock_wrap.set_class_name("br-fade");
        let clock = el(
            doc,
            "div",
            "padding:16px; border-radius:2rem; display:flex; flex-wrap:wrap; justify-content:center; gap:20px; \
             color:#881337; max-width:56rem; margin:0 auto;",
        )?;
        clock.set_class_name("br-glass");
        let mut values = Vec::with_capacity(CLOCK_LABELS.len());
        for (i, label) in CLOCK_LABELS.iter().enumerate() {
            if i > 0 {
                let sep = text_el(
                    doc,
                    "div",
                    "font-size:1.5rem; font-weight:300; color:#fb7185; opacity:0.6;",
                    ":",
                )?;
                clock.append_child(&sep)?;
            }
            let unit = el(doc, "div", "display:flex; flex-direction:column; align-items:center; min-width:70px;")?;
            let value = text_el(
                doc,
                "span",
                "font-size:1.875rem; font-weight:700; font-family:'Fira Code', monospace; line-height:1;",
                "0",
            )?;
            let caption = text_el(
                doc,
                "span",
                "font-size:0.75rem; text-transform:uppercase; letter-spacing:0.05em; margin-top:4px; opacity:0.8;",
                label,
            )?;
            unit.append_child(&value)?;
            unit.append_child(&caption)?;
            clock.append_child(&unit)?;
            values.push(value);
        }
        clock_wrap.append_child(&clock)?;
        section.append_child(&clock_wrap)?;

        // Captions over the canvases.
        let stage = el(
            doc,
            "div",
            &format!("position:relative; width:100%; max-width:72rem; margin:0 auto; height:{CANVAS_HEIGHT}px;"),
        )?;
        let captions = el(
            doc,
            "div",
            "position:absolute; top:150px; left:96px; z-index:20; padding:0 16px; pointer-events:none;",
        )?;
        for (i, text) in config.tree_captions.iter().enumerate() {
            let line = el(
                doc,
                "div",
                &format!(
                    "margin-bottom:12px; --br-from:translateX(-20px); transition-delay:{:.1}s;",
                    caption_delay_s(i)
                ),
            )?;
            line.set_class_name("br-fade");
            let span = text_el(
                doc,
                "span",
                "font-size:clamp(1.5rem,3.5vw,2.25rem); color:#e11d48; font-weight:500; display:block; line-height:1.5;",
                text,
            )?;
            span.set_class_name("br-script");
            line.append_child(&span)?;
            captions.append_child(&line)?;
        }
        stage.append_child(&captions)?;

        let tree_canvas = canvas_el(
            doc,
            &format!("position:absolute; bottom:0; left:0; width:100%; height:{CANVAS_HEIGHT}px; z-index:10;"),
        )?;
        let petal_canvas = canvas_el(
            doc,
            &format!(
                "position:absolute; bottom:0; left:0; width:100%; height:{CANVAS_HEIGHT}px; z-index:15; pointer-events:none;"
            ),
        )?;
        stage.append_child(&tree_canvas)?;
        stage.append_child(&petal_canvas)?;
        section.append_child(&stage)?;
        parent.append_child(&section)?;

        // The clock runs from mount; only its panel waits for visibility.
        let since = config.together_since;
        let render_clock = move || {
            let e = elapsed_between(since, local_now());
            let parts = [
                e.years as u64,
                e.months as u64,
                e.days as u64,
                e.hours as u64,
                e.minutes as u64,
                e.seconds as u64,
            ];
            for (value, part) in values.iter().zip(parts) {
                value.set_text_content(Some(&part.to_string()));
            }
        };
        render_clock();
        let clock_timer = Interval::start(1_000, render_clock)?;

        let scene = match (
            CanvasSurface::new(tree_canvas.clone()),
            CanvasSurface::new(petal_canvas.clone()),
        ) {
            (Ok(tree), Ok(petals)) => Some(Rc::new(RefCell::new(SceneRuntime {
                scene: LoveTreeScene::new(config.tree.clone(), config.petals.clone(), from_host_entropy()),
                tree,
                petals,
            }))),
            (Err(err), _) | (_, Err(err)) => {
                log::debug!("event=tree_skipped module=page reason={err}");
                None
            }
        };

        let frames: Rc<RefCell<Option<FrameLoop>>> = Rc::new(RefCell::new(None));
        let gate = {
            let scene = scene.clone();
            let frames = frames.clone();
            let section_ref = section.clone();
            VisibilityGate::watch(&section, VISIBLE_THRESHOLD, move || {
                section_ref.set_class_name("br-shown");
                if let Some(runtime) = scene {
                    start_scene(&runtime, &frames);
                }
            })?
        };

        let resize = match scene.as_ref() {
            Some(runtime) => {
                let runtime = runtime.clone();
                let target = super::window()?;
                Some(Listener::new(target.as_ref(), "resize", move |_evt| {
                    // Only the petal layer follows the viewport; the tree keeps
                    // the size it was planted at.
                    if let Ok(rt) = runtime.try_borrow() {
                        let (w, h) = canvas_size(rt.petals.canvas());
                        rt.petals.resize(w, h);
                    }
                })?)
            }
            None => None,
        };

        Ok(Self {
            scene,
            frames,
            _clock: clock_timer,
            _gate: gate,
            _resize: resize,
        })
    }
}

fn canvas_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
    let width = canvas
        .parent_element()
        .map(|p| p.client_width())
        .filter(|w| *w > 0)
        .map(|w| w as u32)
        .or_else(|| {
            web_sys::window()
                .and_then(|w| w.inner_width().ok())
                .and_then(|v| v.as_f64())
                .map(|w| w as u32)
        })
        .unwrap_or(0);
    (width, CANVAS_HEIGHT)
}

fn start_scene(runtime: &Rc<RefCell<SceneRuntime>>, frames: &Rc<RefCell<Option<FrameLoop>>>) {
    {
        let mut guard = runtime.borrow_mut();
        let SceneRuntime { scene, tree, petals } = &mut *guard;
        let (w, h) = canvas_size(tree.canvas());
        tree.resize(w, h);
        petals.resize(w, h);
        scene.start(now_ms(), tree, petals);
    }
    let runtime = runtime.clone();
    let started = FrameLoop::start(move |ts| {
        let mut guard = runtime.borrow_mut();
        let SceneRuntime { scene, tree, petals } = &mut *guard;
        scene.frame(ts, tree, petals)
    });
    match started {
        Ok(frame_loop) => *frames.borrow_mut() = Some(frame_loop),
        Err(err) => log::warn!("event=tree_loop_failed module=page error={err}"),
    }
}

impl Drop for TreeView {
    fn drop(&mut self) {
        if let Some(frame_loop) = self.frames.borrow_mut().take() {
            frame_loop.cancel();
        }
        if let Some(runtime) = &self.scene {
            if let Ok(mut rt) = runtime.try_borrow_mut() {
                rt.scene.teardown();
            }
        }
    }
}
