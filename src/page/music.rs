//! Background music and the floating sound toggle.
use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, Element, HtmlAudioElement, HtmlElement};

use super::{Listener, html_el};
use crate::audio::{PlayerCommand, Playback, PlaybackState};
use crate::config::AudioConfig;
use crate::error::RevealError;

const BUTTON_STYLE: &str = "position:fixed; bottom:24px; right:24px; z-index:50; width:56px; height:56px; \
    display:none; align-items:center; justify-content:center; font-size:24px; border-radius:9999px; \
    background:rgba(255,255,255,0.8); backdrop-filter:blur(12px); border:1px solid #fecdd3; \
    box-shadow:0 10px 20px rgba(0,0,0,0.12); cursor:pointer;";

/// Owns the one audio element. Dropping the player pauses it and releases
/// the source.
pub struct MusicPlayer {
    audio: HtmlAudioElement,
    playback: Rc<RefCell<Playback>>,
    button: HtmlElement,
    _toggle: Listener,
    _load_error: Listener,
}

impl MusicPlayer {
    pub fn new(doc: &Document, parent: &Element, config: &AudioConfig) -> Result<Self, RevealError> {
        let audio = HtmlAudioElement::new()?;
        audio.set_cross_origin(Some("anonymous"));
        audio.set_preload("auto");
        audio.set_loop(true);
        audio.set_volume(config.music_volume);
        audio.set_src(&config.music_url);

        let playback = Rc::new(RefCell::new(Playback::new()));
        let button = html_el(doc, "button", BUTTON_STYLE)?;
        render_button(&button, &playback.borrow());
        parent.append_child(&button)?;

        let load_error = {
            let audio_ref = audio.clone();
            let playback = playback.clone();
            let button = button.clone();
            let src = config.music_url.clone();
            Listener::new(audio.as_ref(), "error", move |_evt| {
                let (code, message) = audio_ref
                    .error()
                    .map(|e| (e.code(), e.message()))
                    .unwrap_or((0, String::new()));
                log::error!(
                    "event=audio_load_failed module=music code={code} message={message:?} src={src}"
                );
                playback.borrow_mut().load_failed();
                render_button(&button, &playback.borrow());
            })?
        };

        let toggle = {
            let audio = audio.clone();
            let playback = playback.clone();
            let button_ref = button.clone();
            Listener::new(button.as_ref(), "click", move |_evt| {
                let command = playback.borrow_mut().toggle();
                apply(&audio, &playback, &button_ref, command);
            })?
        };

        Ok(Self {
            audio,
            playback,
            button,
            _toggle: toggle,
            _load_error: load_error,
        })
    }

    /// Shows the toggle and tries to start playback. The host may refuse
    /// (autoplay policy); the toggle then offers a retry.
    pub fn start(&self) {
        let _ = self.button.style().set_property("display", "flex");
        let command = self.playback.borrow_mut().request_start();
        apply(&self.audio, &self.playback, &self.button, command);
    }

    pub fn state(&self) -> PlaybackState {
        self.playback.borrow().state()
    }
}

impl Drop for MusicPlayer {
    fn drop(&mut self) {
        let _ = self.audio.pause();
        self.audio.set_src("");
        self.button.remove();
        log::debug!("event=audio_released module=music");
    }
}

fn apply(
    audio: &HtmlAudioElement,
    playback: &Rc<RefCell<Playback>>,
    button: &HtmlElement,
    command: PlayerCommand,
) {
    match command {
        PlayerCommand::Play => match audio.play() {
            Ok(promise) => {
                let playback = playback.clone();
                let button = button.clone();
                spawn_local(async move {
                    match JsFuture::from(promise).await {
                        Ok(_) => {
                            playback.borrow_mut().play_resolved();
                            log::info!("event=audio_playing module=music");
                        }
                        Err(err) => {
                            playback.borrow_mut().play_rejected();
                            log::warn!("event=autoplay_blocked module=music reason={err:?}");
                        }
                    }
                    render_button(&button, &playback.borrow());
                });
            }
            Err(err) => {
                playback.borrow_mut().play_rejected();
                log::warn!("event=autoplay_blocked module=music reason={err:?}");
            }
        },
        PlayerCommand::Pause => {
            if let Err(err) = audio.pause() {
                log::debug!("event=pause_failed module=music reason={err:?}");
            }
        }
        PlayerCommand::Nothing => {}
    }
    render_button(button, &playback.borrow());
}

fn render_button(button: &HtmlElement, playback: &Playback) {
    let (icon, label) = if playback.is_audible() {
        ("\u{1F50A}", "Mute music")
    } else {
        ("\u{1F507}", "Play music")
    };
    button.set_text_content(Some(icon));
    let _ = button.set_attribute("aria-label", label);
    button.set_title(label);
    let disabled = playback.state() == PlaybackState::Unavailable;
    let _ = button
        .style()
        .set_property("opacity", if disabled { "0.5" } else { "1" });
}

/// Fire-and-forget one-shot sound. A refused play is logged and dropped.
pub fn play_sound_effect(url: &str, volume: f64) -> Result<(), RevealError> {
    let sound = HtmlAudioElement::new_with_src(url)?;
    sound.set_cross_origin(Some("anonymous"));
    sound.set_volume(volume);
    let promise = sound.play()?;
    spawn_local(async move {
        if let Err(err) = JsFuture::from(promise).await {
            log::debug!("event=sound_blocked module=music reason={err:?}");
        }
    });
    Ok(())
}
