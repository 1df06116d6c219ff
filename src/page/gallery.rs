//! "Moments": polaroid cards that drop into place and tilt under the pointer.
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

use super::{Listener, VisibilityGate, el, html_el, text_el};
use crate::error::RevealError;
use crate::gallery::{PlacedPhoto, scatter, tilt};
use crate::rng::from_host_entropy;

struct Card {
    element: HtmlElement,
    rest: String,
}

pub(crate) struct GalleryView {
    _listeners: Vec<Listener>,
    _gate: VisibilityGate,
}

impl GalleryView {
    pub(crate) fn mount(
        doc: &Document,
        parent: &Element,
        photos: &[crate::gallery::Photo],
    ) -> Result<Self, RevealError> {
        let section = el(
            doc,
            "div",
            "position:relative; z-index:10; padding-top:80px; margin-bottom:80px;",
        )?;
        let inner = el(doc, "div", "max-width:72rem; margin:0 auto; padding:16px; perspective:1000px;")?;
        let title = text_el(
            doc,
            "h3",
            "font-size:clamp(2.25rem,6vw,3.75rem); color:#881337; text-align:center; margin:0 0 80px; opacity:0.9;",
            "Moments",
        )?;
        title.set_class_name("br-script");
        inner.append_child(&title)?;
        let columns = el(
            doc,
            "div",
            "columns:3 260px; column-gap:32px; padding:0 16px;",
        )?;

        let placed = scatter(photos, &mut from_host_entropy());
        let mut listeners = Vec::with_capacity(placed.len() * 2);
        let mut cards = Vec::with_capacity(placed.len());
        for photo in &placed {
            let slot = el(doc, "div", "break-inside:avoid; margin-bottom:32px; padding-top:16px;")?;
            let card = mount_card(doc, photo)?;
            slot.append_child(&card.element)?;
            columns.append_child(&slot)?;
            listeners.extend(bind_tilt(&card)?);
            cards.push(card);
        }
        inner.append_child(&columns)?;
        section.append_child(&inner)?;
        parent.append_child(&section)?;

        let gate = VisibilityGate::watch(&section, 0.1, move || {
            for (card, photo) in cards.iter().zip(&placed) {
                let style = card.element.style();
                let _ = style.set_property(
                    "transition",
                    &format!(
                        "transform 0.8s cubic-bezier(0.34,1.56,0.64,1) {d}s, opacity 0.8s ease-out {d}s, box-shadow 0.3s",
                        d = photo.delay_s
                    ),
                );
                let _ = style.set_property("opacity", "1");
                let _ = style.set_property("transform", &card.rest);
            }
            log::debug!("event=gallery_visible module=page cards={}", placed.len());
        })?;

        Ok(Self {
            _listeners: listeners,
            _gate: gate,
        })
    }
}

fn mount_card(doc: &Document, placed: &PlacedPhoto) -> Result<Card, RevealError> {
    let element = html_el(
        doc,
        "div",
        "position:relative; cursor:pointer; width:100%; box-sizing:border-box; background:#fff; padding:12px 12px 32px; \
         border-radius:2px; box-shadow:0 4px 6px rgba(0,0,0,0.1); opacity:0; transform:translateY(100px) scale(0.8); \
         transform-style:preserve-3d;",
    )?;
    let frame = el(
        doc,
        "div",
        "width:100%; aspect-ratio:3/4; overflow:hidden; background:#f3f4f6; transform:translateZ(20px);",
    )?;
    let img = el(
        doc,
        "img",
        "width:100%; height:100%; object-fit:cover; user-select:none; display:block;",
    )?;
    img.set_attribute("src", &placed.photo.url)?;
    img.set_attribute("alt", &placed.photo.caption)?;
    img.set_attribute("loading", "lazy")?;
    frame.append_child(&img)?;
    element.append_child(&frame)?;
    let rest = format!(
        "translateY({:.1}px) rotate({:.2}deg)",
        placed.y_offset, placed.rotation_deg
    );
    Ok(Card { element, rest })
}

fn bind_tilt(card: &Card) -> Result<[Listener; 2], RevealError> {
    let target = card.element.clone();
    let moved = Listener::new(card.element.as_ref(), "mousemove", move |evt| {
        let Some(evt) = evt.dyn_ref::<MouseEvent>() else {
            return;
        };
        let rect = target.get_bounding_client_rect();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        let rel_x = (evt.client_x() as f64 - rect.left()) / rect.width() - 0.5;
        let rel_y = (evt.client_y() as f64 - rect.top()) / rect.height() - 0.5;
        let (rx, ry) = tilt(rel_x, rel_y);
        let style = target.style();
        let _ = style.set_property("transition", "transform 0.2s ease-out, box-shadow 0.3s");
        let _ = style.set_property("z-index", "50");
        let _ = style.set_property("box-shadow", "0 25px 50px rgba(254,205,211,0.5)");
        let _ = style.set_property(
            "transform",
            &format!("scale(1.1) rotateX({rx:.2}deg) rotateY({ry:.2}deg)"),
        );
    })?;

    let target = card.element.clone();
    let rest = card.rest.clone();
    let left = Listener::new(card.element.as_ref(), "mouseleave", move |_evt| {
        let style = target.style();
        let _ = style.set_property("z-index", "auto");
        let _ = style.set_property("box-shadow", "0 4px 6px rgba(0,0,0,0.1)");
        let _ = style.set_property("transform", &rest);
    })?;
    Ok([moved, left])
}
