//! Greeting configuration. Defaults reproduce the stock page; with the `serde`
//! feature every field can be overridden from JSON and missing fields keep
//! their defaults.

use crate::error::RevealError;
use crate::gallery::Photo;
use crate::petals::PetalParams;
use crate::timing::CalendarInstant;
use crate::tree::TreeParams;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AudioConfig {
    pub music_url: String,
    pub music_volume: f64,
    pub pop_url: String,
    pub pop_volume: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music_url: crate::MUSIC_URL.to_string(),
            music_volume: 0.5,
            pop_url: crate::POP_URL.to_string(),
            pop_volume: 0.8,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CountdownConfig {
    /// Countdown length measured from page load.
    pub delay_ms: i64,
    /// Absolute target (epoch ms); wins over `delay_ms` when set.
    pub target_epoch_ms: Option<i64>,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2 * 60 * 1_000,
            target_epoch_ms: None,
        }
    }
}

impl CountdownConfig {
    pub fn target_ms(&self, load_ms: i64) -> i64 {
        self.target_epoch_ms
            .unwrap_or_else(|| load_ms.saturating_add(self.delay_ms))
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GreetingConfig {
    pub recipient: String,
    pub signature: String,
    pub countdown_headline: String,
    pub expired_headline: String,
    pub unlock_label: String,
    pub messages: Vec<String>,
    /// Delay before the first message word appears (seconds).
    pub message_delay_s: f64,
    pub tree_captions: Vec<String>,
    pub photos: Vec<Photo>,
    pub audio: AudioConfig,
    pub countdown: CountdownConfig,
    pub together_since: CalendarInstant,
    pub tree: TreeParams,
    pub petals: PetalParams,
    pub log_level: String,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            recipient: crate::RECIPIENT.to_string(),
            signature: crate::SIGNATURE.to_string(),
            countdown_headline: "Something magical is coming...".to_string(),
            expired_headline: "The moment is here!".to_string(),
            unlock_label: "Click to open the surprise".to_string(),
            messages: crate::BIRTHDAY_MESSAGES.iter().map(|m| m.to_string()).collect(),
            message_delay_s: 0.5,
            tree_captions: crate::TREE_CAPTIONS.iter().map(|m| m.to_string()).collect(),
            photos: crate::PHOTOS
                .iter()
                .enumerate()
                .map(|(id, (url, caption))| Photo {
                    id: id as u32,
                    url: url.to_string(),
                    caption: caption.to_string(),
                })
                .collect(),
            audio: AudioConfig::default(),
            countdown: CountdownConfig::default(),
            together_since: crate::TOGETHER_SINCE,
            tree: TreeParams::default(),
            petals: PetalParams::default(),
            log_level: crate::logging::default_log_level().to_string(),
        }
    }
}

fn invalid(msg: impl Into<String>) -> RevealError {
    RevealError::InvalidConfig(msg.into())
}

fn check_range(name: &str, (lo, hi): (f64, f64)) -> Result<(), RevealError> {
    if !(lo.is_finite() && hi.is_finite()) || lo > hi {
        return Err(invalid(format!("{name} must be a finite range with min <= max")));
    }
    Ok(())
}

impl GreetingConfig {
    /// Rejects values the animators cannot work with (a tree that never stops
    /// forking, inverted ranges, volumes the media element would refuse).
    pub fn validate(&self) -> Result<(), RevealError> {
        for (name, v) in [
            ("audio.music_volume", self.audio.music_volume),
            ("audio.pop_volume", self.audio.pop_volume),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(invalid(format!("{name} must be within 0..=1, got {v}")));
            }
        }
        if self.countdown.delay_ms < 0 {
            return Err(invalid("countdown.delay_ms must not be negative"));
        }
        if !self.together_since.is_valid() {
            return Err(invalid(format!(
                "together_since is not a calendar date: {:?}",
                self.together_since
            )));
        }

        let t = &self.tree;
        if !(t.termination_length > 0.0) {
            return Err(invalid("tree.termination_length must be positive"));
        }
        if !(t.child_length_min > 0.0 && t.child_length_max < 1.0) {
            return Err(invalid("tree child length factors must lie within (0, 1)"));
        }
        check_range("tree.child_length", (t.child_length_min, t.child_length_max))?;
        check_range("tree.bloom_delay", (t.bloom_delay_min_ms, t.bloom_delay_max_ms))?;
        check_range("tree.heart_size", (t.heart_size_min, t.heart_size_max))?;
        if t.children_min == 0 || t.children_min > t.children_max {
            return Err(invalid("tree children range must be 1 <= min <= max"));
        }
        if t.bloom_min > t.bloom_max {
            return Err(invalid("tree bloom range must have min <= max"));
        }
        if t.grow_delay_ms < 0.0 || t.bloom_delay_min_ms < 0.0 {
            return Err(invalid("tree delays must not be negative"));
        }

        let p = &self.petals;
        if p.max_petals == 0 {
            return Err(invalid("petals.max_petals must be at least 1"));
        }
        if !(0.0..=1.0).contains(&p.spawn_chance) {
            return Err(invalid("petals.spawn_chance must be a probability"));
        }
        check_range("petals.spawn_band", p.spawn_band)?;
        check_range("petals.size_range", p.size_range)?;
        check_range("petals.speed_range", p.speed_range)?;
        check_range("petals.drift_range", p.drift_range)?;
        check_range("petals.opacity_range", p.opacity_range)?;
        check_range("petals.rotation_speed_range", p.rotation_speed_range)?;
        if p.speed_range.0 <= 0.0 {
            return Err(invalid("petals must fall: speed_range min must be positive"));
        }

        crate::logging::parse_level(&self.log_level)?;
        Ok(())
    }

    /// Parses a (possibly partial) JSON config and validates it.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, RevealError> {
        let cfg: GreetingConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        GreetingConfig::default().validate().expect("defaults are valid");
    }

    #[test]
    fn test_rejects_tree_that_never_terminates() {
        let mut cfg = GreetingConfig::default();
        cfg.tree.child_length_max = 1.0;
        assert!(matches!(cfg.validate(), Err(RevealError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_volume_and_cap() {
        let mut cfg = GreetingConfig::default();
        cfg.audio.music_volume = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = GreetingConfig::default();
        cfg.petals.max_petals = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_invalid_start_date() {
        let mut cfg = GreetingConfig::default();
        cfg.together_since = CalendarInstant::date(2007, 2, 30);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_countdown_target() {
        let c = CountdownConfig::default();
        assert_eq!(c.target_ms(1_000), 121_000);
        let fixed = CountdownConfig {
            target_epoch_ms: Some(5),
            ..c
        };
        assert_eq!(fixed.target_ms(1_000), 5);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_from_json_partial_override() {
        let cfg = GreetingConfig::from_json(r#"{"recipient":"Sam","countdown":{"delay_ms":5000}}"#)
            .expect("valid json");
        assert_eq!(cfg.recipient, "Sam");
        assert_eq!(cfg.countdown.delay_ms, 5_000);
        assert_eq!(cfg.photos.len(), crate::PHOTOS.len());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(GreetingConfig::from_json("{"), Err(RevealError::Json(_))));
        assert!(matches!(
            GreetingConfig::from_json(r#"{"log_level":"loud"}"#),
            Err(RevealError::InvalidConfig(_))
        ));
    }
}
