//! The reveal page: a scroll container holding the parallax layer, header,
//! message card, gallery and love tree.
use std::rc::Rc;

use web_sys::{Document, Element, HtmlElement};

use super::gallery::GalleryView;
use super::tree::TreeView;
use super::{ConfettiLayer, Listener, VisibilityGate, el, heart_svg, html_el, text_el};
use crate::config::GreetingConfig;
use crate::error::RevealError;
use crate::message::{Token, stagger_delay_s, word_sequence};

/// The signature fades in this long after the card becomes visible.
const SIGNATURE_DELAY_S: f64 = 6.0;

/// Parallax layers: position, icon size, colour, opacity, blur, travel over a
/// full scroll (percent of own height), extra transform.
const PARALLAX: [(&str, u32, &str, f64, u32, f64, &str); 4] = [
    ("top:10%; left:5%;", 150, "#fecdd3", 0.4, 2, 30.0, "translateX(-50px)"),
    ("top:35%; right:8%;", 200, "#fbcfe8", 0.3, 1, 50.0, "rotate(15deg)"),
    ("top:60%; left:15%;", 120, "#e9d5ff", 0.3, 3, 20.0, "translateX(50px)"),
    ("top:80%; right:20%;", 100, "#c7d2fe", 0.3, 2, 30.0, "rotate(-10deg)"),
];

/// Scroll position as a fraction of the scrollable range, in `[0, 1]`.
pub fn scroll_progress(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let range = scroll_height - client_height;
    if range <= 0.0 {
        return 0.0;
    }
    (scroll_top / range).clamp(0.0, 1.0)
}

pub(crate) struct RevealView {
    root: Element,
    _gallery: GalleryView,
    _tree: TreeView,
    _listeners: Vec<Listener>,
    _message_gate: VisibilityGate,
}

impl RevealView {
    pub(crate) fn mount(
        doc: &Document,
        parent: &Element,
        config: &Rc<GreetingConfig>,
        confetti: ConfettiLayer,
    ) -> Result<Self, RevealError> {
        let root = html_el(
            doc,
            "div",
            "position:fixed; inset:0; z-index:10; overflow-y:auto; scroll-behavior:smooth; perspective:1000px;",
        )?;

        let (layer, movers) = mount_parallax(doc)?;
        root.append_child(&layer)?;

        let header = el(
            doc,
            "div",
            "min-height:100vh; display:flex; flex-direction:column; align-items:center; justify-content:center; \
             padding:24px; text-align:center; position:relative; z-index:10; box-sizing:border-box;",
        )?;
        let title = el(doc, "div", "margin-bottom:32px;")?;
        let gift = text_el(
            doc,
            "div",
            "display:inline-block; padding:12px; border-radius:9999px; background:rgba(255,255,255,0.3); \
             border:1px solid rgba(255,255,255,0.5); margin-bottom:24px; font-size:40px;",
            "\u{1F381}",
        )?;
        let h1 = text_el(
            doc,
            "h1",
            "font-size:clamp(3.75rem,10vw,6rem); color:#f43f5e; font-weight:700; margin:0 0 8px;",
            "Happy Birthday!",
        )?;
        h1.set_class_name("br-script");
        let h2 = text_el(
            doc,
            "h2",
            "font-size:clamp(3rem,8vw,4.5rem); color:#e11d48; font-weight:500; margin:0 0 24px;",
            &config.recipient,
        )?;
        h2.set_class_name("br-script");
        title.append_child(&gift)?;
        title.append_child(&h1)?;
        title.append_child(&h2)?;
        header.append_child(&title)?;

        let (card, message_gate) = mount_message_card(doc, config)?;
        header.append_child(&card)?;

        let blast = text_el(
            doc,
            "button",
            "margin-top:48px; padding:12px 32px; background:#f43f5e; color:#fff; border:none; border-radius:9999px; \
             font-weight:500; font-size:1rem; box-shadow:0 10px 15px rgba(0,0,0,0.1); cursor:pointer; user-select:none;",
            "Celebration Blast",
        )?;
        header.append_child(&blast)?;
        root.append_child(&header)?;

        let gallery = GalleryView::mount(doc, &root, &config.photos)?;
        let tree = TreeView::mount(doc, &root, config)?;
        parent.append_child(&root)?;

        let mut listeners = Vec::with_capacity(2);
        {
            let config = config.clone();
            listeners.push(Listener::new(blast.as_ref(), "click", move |_evt| {
                if let Err(err) = super::play_sound_effect(&config.audio.pop_url, config.audio.pop_volume) {
                    log::debug!("event=sound_failed module=page error={err}");
                }
                confetti.blast();
            })?);
        }
        {
            let scroller = root.clone();
            listeners.push(Listener::new(root.as_ref(), "scroll", move |_evt| {
                let progress = scroll_progress(
                    scroller.scroll_top() as f64,
                    scroller.scroll_height() as f64,
                    scroller.client_height() as f64,
                );
                for (mover, travel, extra) in &movers {
                    let _ = mover.style().set_property(
                        "transform",
                        &format!("translateY({:.2}%) {extra}", progress * travel),
                    );
                }
            })?);
        }

        Ok(Self {
            root: root.into(),
            _gallery: gallery,
            _tree: tree,
            _listeners: listeners,
            _message_gate: message_gate,
        })
    }
}

impl Drop for RevealView {
    fn drop(&mut self) {
        self.root.remove();
    }
}

type Mover = (HtmlElement, f64, &'static str);

fn mount_parallax(doc: &Document) -> Result<(Element, Vec<Mover>), RevealError> {
    let layer = el(
        doc,
        "div",
        "position:absolute; top:0; left:0; width:100%; height:200vh; z-index:0; pointer-events:none; overflow:hidden;",
    )?;
    let mut movers = Vec::with_capacity(PARALLAX.len() + 2);
    for (pos, size, color, opacity, blur, travel, extra) in PARALLAX {
        let icon = html_el(
            doc,
            "div",
            &format!("position:absolute; {pos} opacity:{opacity}; filter:blur({blur}px); transform:{extra};"),
        )?;
        icon.set_inner_html(&heart_svg(size, color));
        layer.append_child(&icon)?;
        movers.push((icon, travel, extra));
    }
    // Soft gradients.
    for (pos, size, color, travel) in [
        ("top:20%; left:30%;", 16.0, "rgba(249,168,212,0.2)", 50.0),
        ("top:60%; right:30%;", 20.0, "rgba(216,180,254,0.2)", 30.0),
    ] {
        let glow = html_el(
            doc,
            "div",
            &format!(
                "position:absolute; {pos} width:{size}rem; height:{size}rem; background:{color}; border-radius:50%; filter:blur(64px);"
            ),
        )?;
        layer.append_child(&glow)?;
        movers.push((glow, travel, ""));
    }
    Ok((layer, movers))
}

fn mount_message_card(
    doc: &Document,
    config: &GreetingConfig,
) -> Result<(Element, VisibilityGate), RevealError> {
    let wrap = el(
        doc,
        "div",
        "width:100%; max-width:42rem; --br-from:translateY(50px) scale(0.9);",
    )?;
    wrap.set_class_name("br-fade");
    let card = el(
        doc,
        "div",
        "padding:48px; border-radius:2rem; box-sizing:border-box;",
    )?;
    card.set_class_name("br-glass");

    let heart = el(
        doc,
        "div",
        "display:flex; justify-content:center; margin-bottom:24px; animation:br-pulse 2s infinite;",
    )?;
    heart.set_inner_html(&heart_svg(40, "#fecdd3"));
    card.append_child(&heart)?;

    let words = el(
        doc,
        "div",
        "min-height:300px; display:flex; flex-wrap:wrap; font-size:1.2rem; color:#374151; line-height:1.6; \
         font-weight:300; margin-bottom:32px; text-align:left;",
    )?;
    for (i, token) in word_sequence(&config.messages).into_iter().enumerate() {
        let node = match token {
            Token::Word(word) => {
                let span = text_el(
                    doc,
                    "span",
                    &format!("transition-delay:{:.2}s;", stagger_delay_s(i, config.message_delay_s)),
                    word,
                )?;
                span.set_class_name("br-word");
                span
            }
            Token::Break => el(doc, "div", "flex-basis:100%; height:24px;")?,
        };
        words.append_child(&node)?;
    }
    card.append_child(&words)?;

    let signature = el(
        doc,
        "div",
        &format!(
            "text-align:right; color:#9f1239; font-weight:600; font-size:1.875rem; transition-delay:{SIGNATURE_DELAY_S}s;"
        ),
    )?;
    signature.set_class_name("br-fade br-script");
    signature.append_child(&doc.create_text_node("Always yours,"))?;
    let line_break = doc.create_element("br")?;
    signature.append_child(&line_break)?;
    signature.append_child(&doc.create_text_node(&config.signature))?;
    card.append_child(&signature)?;
    wrap.append_child(&card)?;

    let shown = wrap.clone();
    let gate = VisibilityGate::watch(&wrap, 0.1, move || {
        shown.set_class_name("br-fade br-shown");
        log::debug!("event=message_visible module=page");
    })?;
    Ok((wrap, gate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_progress() {
        assert_eq!(scroll_progress(0.0, 2000.0, 1000.0), 0.0);
        assert_eq!(scroll_progress(500.0, 2000.0, 1000.0), 0.5);
        assert_eq!(scroll_progress(1500.0, 2000.0, 1000.0), 1.0);
        // Nothing to scroll.
        assert_eq!(scroll_progress(10.0, 800.0, 800.0), 0.0);
    }

    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen_test::wasm_bindgen_test]
    fn test_reveal_mounts_signature_and_unmounts_on_drop() {
        let doc = super::super::document().expect("document");
        let host = doc.create_element("div").expect("host");
        let confetti = ConfettiLayer::mount(&doc, &host).expect("confetti layer");
        let config = Rc::new(GreetingConfig::default());

        let view = RevealView::mount(&doc, &host, &config, confetti).expect("reveal mounts");
        let html = host.inner_html();
        assert!(html.contains("Always yours,<br>"));
        assert!(html.contains(&config.signature));

        let mounted = host.child_element_count();
        drop(view);
        assert_eq!(host.child_element_count(), mounted - 1);
    }
}
