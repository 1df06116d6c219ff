// Integration tests for the built-in greeting content and config defaults.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use birthday_reveal::message::{Token, word_sequence};
use birthday_reveal::{GreetingConfig, RevealError};

#[test]
fn photo_entries_are_unique_https_jpegs() {
    let mut seen = HashSet::new();
    for (url, caption) in birthday_reveal::PHOTOS {
        assert!(seen.insert(*url), "duplicate photo url '{}'", url);
        assert!(url.starts_with("https://"), "photo '{}' is not served over https", url);
        assert!(url.ends_with(".jpg"), "photo '{}' is not a jpeg", url);
        assert!(
            url.contains(caption),
            "caption '{}' should name the file in '{}'",
            caption,
            url
        );
    }
}

#[test]
fn messages_split_into_words_without_empties() {
    let seq = word_sequence(birthday_reveal::BIRTHDAY_MESSAGES);
    let breaks = seq.iter().filter(|t| matches!(t, Token::Break)).count();
    assert_eq!(breaks, birthday_reveal::BIRTHDAY_MESSAGES.len() - 1);
    assert!(!matches!(seq.last(), Some(Token::Break)));
    for token in &seq {
        if let Token::Word(w) = token {
            assert!(!w.is_empty());
            assert!(!w.contains(' '), "word '{}' contains a space", w);
        }
    }
}

#[test]
fn captions_are_nonempty_and_distinct() {
    let mut seen = HashSet::new();
    for caption in birthday_reveal::TREE_CAPTIONS {
        assert!(!caption.trim().is_empty());
        assert!(seen.insert(*caption), "duplicate caption '{}'", caption);
    }
}

#[test]
fn default_config_mirrors_datasets() {
    let cfg = GreetingConfig::default();
    assert_eq!(cfg.recipient, birthday_reveal::RECIPIENT);
    assert_eq!(cfg.photos.len(), birthday_reveal::PHOTOS.len());
    let ids: Vec<u32> = cfg.photos.iter().map(|p| p.id).collect();
    assert_eq!(ids, (0..birthday_reveal::PHOTOS.len() as u32).collect::<Vec<_>>());
    assert_eq!(cfg.messages.len(), birthday_reveal::BIRTHDAY_MESSAGES.len());
    assert_eq!(cfg.tree_captions.len(), birthday_reveal::TREE_CAPTIONS.len());
    assert_eq!(cfg.countdown.delay_ms, 120_000);
    assert_eq!(cfg.audio.music_volume, 0.5);
    assert_eq!(cfg.audio.pop_volume, 0.8);
    assert!(cfg.together_since.is_valid());
    assert!(cfg.validate().is_ok());
}

#[test]
fn invalid_ranges_are_rejected() {
    let mut cfg = GreetingConfig::default();
    cfg.petals.size_range = (10.0, 5.0);
    assert!(matches!(cfg.validate(), Err(RevealError::InvalidConfig(_))));

    let mut cfg = GreetingConfig::default();
    cfg.tree.termination_length = 0.0;
    assert!(matches!(cfg.validate(), Err(RevealError::InvalidConfig(_))));

    let mut cfg = GreetingConfig::default();
    cfg.tree.bloom_min = 12;
    cfg.tree.bloom_max = 6;
    assert!(matches!(cfg.validate(), Err(RevealError::InvalidConfig(_))));

    let mut cfg = GreetingConfig::default();
    cfg.audio.pop_volume = -0.1;
    assert!(matches!(cfg.validate(), Err(RevealError::InvalidConfig(_))));
}
