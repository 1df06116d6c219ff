//! Polaroid gallery: scattered card placement and pointer tilt.

use crate::rng::RandomSource;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Photo {
    pub id: u32,
    pub url: String,
    pub caption: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedPhoto {
    pub photo: Photo,
    /// Degrees, in `[-MAX_ROTATION_DEG, MAX_ROTATION_DEG)`.
    pub rotation_deg: f64,
    /// Pixels pushed down from the card's slot.
    pub y_offset: f64,
    pub delay_s: f64,
}

pub const MAX_ROTATION_DEG: f64 = 6.0;
pub const MAX_Y_OFFSET: f64 = 20.0;
pub const CARD_STAGGER_S: f64 = 0.15;
pub const MAX_TILT_DEG: f64 = 15.0;

/// Gives each photo its resting rotation, offset and entrance delay.
pub fn scatter<R: RandomSource + ?Sized>(photos: &[Photo], rng: &mut R) -> Vec<PlacedPhoto> {
    photos
        .iter()
        .enumerate()
        .map(|(i, photo)| PlacedPhoto {
            photo: photo.clone(),
            rotation_deg: rng.range(-MAX_ROTATION_DEG, MAX_ROTATION_DEG),
            y_offset: rng.range(0.0, MAX_Y_OFFSET),
            delay_s: i as f64 * CARD_STAGGER_S,
        })
        .collect()
}

/// 3D tilt for a pointer at `(rel_x, rel_y)` relative to the card centre, where
/// the card spans `-0.5..=0.5` on both axes. Returns `(rotate_x, rotate_y)` in
/// degrees; the card leans toward the pointer.
pub fn tilt(rel_x: f64, rel_y: f64) -> (f64, f64) {
    let x = rel_x.clamp(-0.5, 0.5);
    let y = rel_y.clamp(-0.5, 0.5);
    (-y * 2.0 * MAX_TILT_DEG, x * 2.0 * MAX_TILT_DEG)
}
