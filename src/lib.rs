//! Birthday Reveal core crate.
//!
//! A countdown gates an animated greeting page: a word-by-word message card,
//! a polaroid gallery, and a procedurally grown love tree with falling petals.
//! The calculators, generators and state machines below `page` are plain Rust
//! and tested natively; `page` binds them to the browser. JS calls
//! `start_greeting()` once the module is loaded.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod confetti;
pub mod config;
pub mod error;
pub mod gallery;
pub mod logging;
pub mod message;
pub mod page;
pub mod petals;
pub mod reveal;
pub mod rng;
pub mod scene;
pub mod surface;
pub mod timing;
pub mod tree;

pub use config::{AudioConfig, CountdownConfig, GreetingConfig};
pub use error::RevealError;
pub use timing::{CalendarInstant, Countdown, Elapsed, TimeLeft, countdown, elapsed_between};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Greeting content (defaults for `GreetingConfig`)
// -----------------------------------------------------------------------------

pub const RECIPIENT: &str = "Eliya";
pub const SIGNATURE: &str = "Aashir";

/// Start of the relationship, local time.
pub const TOGETHER_SINCE: CalendarInstant = CalendarInstant::date(2007, 12, 25);

pub const BIRTHDAY_MESSAGES: &[&str] = &[
    "I just wanted to tell you how much you mean to me. I\u{2019}m honestly so grateful to have you in my life. You make everything feel lighter and happier just by being you.",
    "I love you so much, and I truly appreciate every little moment we share. You matter to me more than I can explain, and I feel lucky every day knowing you\u{2019}re mine.",
    "I hope today brings you lots of smiles, love, and happiness \u{2014} because that\u{2019}s exactly what you deserve.",
];

pub const TREE_CAPTIONS: &[&str] = &[
    "My beautiful life \u{1F49E}",
    "Happy Birthday \u{1F388}",
    "May Allah bless you \u{1F340}",
    "And give u many happiness \u{1F495}",
    "I loved you \u{2764}\u{FE0F}",
    "And I will always love u \u{1F97A} \u{2764}\u{FE0F}",
    "Hope u have a great day today \u{2764}\u{FE0F}\u{1F618}",
];

/// (url, caption)
pub const PHOTOS: &[(&str, &str)] = &[
    ("https://i.ibb.co/23HfQsDr/IMG-8260.jpg", "IMG-8260"),
    ("https://i.ibb.co/tTNWjYDb/IMG-8259.jpg", "IMG-8259"),
    ("https://i.ibb.co/Tqh64dDx/IMG-7828.jpg", "IMG-7828"),
    ("https://i.ibb.co/DPKgv2yn/IMG-7831.jpg", "IMG-7831"),
    ("https://i.ibb.co/rK7gs8CF/IMG-8258.jpg", "IMG-8258"),
    ("https://i.ibb.co/nsRCBW4F/IMG-8257.jpg", "IMG-8257"),
];

pub const MUSIC_URL: &str = "https://archive.org/download/HappyBirthdayToYouPianoVersion/Happy%20Birthday%20to%20You%20%28Piano%20Version%29.mp3";
pub const POP_URL: &str = "https://archive.org/download/Pop_201608/Pop.mp3";

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

fn launch(config: GreetingConfig) -> Result<(), RevealError> {
    config.validate()?;
    logging::init(&config.log_level)?;
    page::start(config)
}

/// Mounts the greeting with the built-in content.
#[wasm_bindgen]
pub fn start_greeting() -> Result<(), JsValue> {
    launch(GreetingConfig::default()).map_err(JsValue::from)
}

/// Mounts the greeting with a JSON config; missing fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_greeting_with_config(json: &str) -> Result<(), JsValue> {
    launch(GreetingConfig::from_json(json)?).map_err(JsValue::from)
}
