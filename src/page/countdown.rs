//! Countdown screen: four ticking units, then the unlock button.
use web_sys::{Document, Element, HtmlElement};

use super::{Interval, Listener, el, html_el, text_el};
use crate::config::GreetingConfig;
use crate::error::RevealError;
use crate::timing::{Countdown, pad2};

const UNIT_LABELS: [&str; 4] = ["Days", "Hours", "Minutes", "Seconds"];

pub(crate) struct CountdownView {
    root: Element,
    active: HtmlElement,
    expired: HtmlElement,
    values: [Element; 4],
    _timer: Interval,
    _unlock: Listener,
}

impl CountdownView {
    pub(crate) fn mount(
        doc: &Document,
        parent: &Element,
        config: &GreetingConfig,
    ) -> Result<Self, RevealError> {
        let root = el(
            doc,
            "div",
            "position:fixed; inset:0; display:flex; flex-direction:column; align-items:center; justify-content:center; \
             text-align:center; padding:0 16px; z-index:10;",
        )?;

        // Counting down.
        let active = html_el(doc, "div", "display:flex; flex-direction:column; align-items:center;")?;
        let heading = text_el(
            doc,
            "h2",
            "font-size:clamp(1.9rem,5vw,3rem); color:#881337; margin:0 0 48px; font-weight:300; letter-spacing:0.03em;",
            &config.countdown_headline,
        )?;
        heading.set_class_name("br-script");
        active.append_child(&heading)?;

        let panel = el(
            doc,
            "div",
            "padding:32px 40px; border-radius:24px; display:flex; flex-wrap:wrap; justify-content:center; gap:24px;",
        )?;
        panel.set_class_name("br-glass");
        let mut values = Vec::with_capacity(UNIT_LABELS.len());
        for (i, label) in UNIT_LABELS.iter().enumerate() {
            if i > 0 {
                let sep = text_el(
                    doc,
                    "div",
                    "font-size:3rem; color:#fb7185; font-weight:100; align-self:center; animation:br-pulse 2s infinite;",
                    ":",
                )?;
                panel.append_child(&sep)?;
            }
            let unit = el(doc, "div", "display:flex; flex-direction:column; align-items:center;")?;
            let cell = el(
                doc,
                "div",
                "width:7rem; height:8rem; background:rgba(255,255,255,0.5); border-radius:12px; display:flex; \
                 align-items:center; justify-content:center; box-shadow:inset 0 2px 6px rgba(0,0,0,0.06); \
                 border:1px solid rgba(255,255,255,0.6);",
            )?;
            let value = text_el(
                doc,
                "span",
                "font-size:3.5rem; font-weight:700; color:#e11d48; font-family:'Fira Code', monospace;",
                "00",
            )?;
            cell.append_child(&value)?;
            unit.append_child(&cell)?;
            let caption = text_el(
                doc,
                "span",
                "margin-top:16px; font-size:0.9rem; color:#9f1239; font-weight:500; letter-spacing:0.2em; text-transform:uppercase;",
                label,
            )?;
            unit.append_child(&caption)?;
            panel.append_child(&unit)?;
            values.push(value);
        }
        active.append_child(&panel)?;
        root.append_child(&active)?;

        // Expired: headline and unlock button, hidden until the deadline.
        let expired = html_el(
            doc,
            "div",
            "display:none; flex-direction:column; align-items:center;",
        )?;
        let done = text_el(
            doc,
            "h2",
            "font-size:clamp(2.2rem,6vw,3.75rem); color:#881337; margin:0 0 48px; font-weight:500; \
             animation:br-breathe 1.5s ease-in-out infinite alternate;",
            &config.expired_headline,
        )?;
        done.set_class_name("br-script");
        expired.append_child(&done)?;
        let button = text_el(
            doc,
            "button",
            "padding:24px 48px; background:rgba(255,255,255,0.6); color:#9f1239; font-size:1.5rem; font-weight:600; \
             border-radius:9999px; border:2px solid #fecdd3; box-shadow:0 25px 50px rgba(0,0,0,0.15); cursor:pointer; \
             animation:br-pulse 2s infinite;",
            &format!("{} \u{2192}", config.unlock_label),
        )?;
        expired.append_child(&button)?;
        root.append_child(&expired)?;
        parent.append_child(&root)?;

        let timer = Interval::start(1_000, super::countdown_tick)?;
        let unlock = Listener::new(button.as_ref(), "click", |_evt| {
            // The unlock drops this view (and this listener); leave the handler first.
            wasm_bindgen_futures::spawn_local(async {
                super::unlock();
            });
        })?;

        let values: [Element; 4] = values
            .try_into()
            .map_err(|_| RevealError::Dom("countdown units".into()))?;
        Ok(Self {
            root,
            active,
            expired,
            values,
            _timer: timer,
            _unlock: unlock,
        })
    }

    pub(crate) fn render(&self, countdown: &Countdown) {
        match countdown {
            Countdown::Running(left) => {
                let parts = [
                    left.days,
                    left.hours as u64,
                    left.minutes as u64,
                    left.seconds as u64,
                ];
                for (value, part) in self.values.iter().zip(parts) {
                    value.set_text_content(Some(&pad2(part)));
                }
            }
            Countdown::Expired => {
                let _ = self.active.style().set_property("display", "none");
                let _ = self.expired.style().set_property("display", "flex");
            }
        }
    }
}

impl Drop for CountdownView {
    fn drop(&mut self) {
        self.root.remove();
    }
}
