//! Coordinate helpers for drawing normalized landmarks onto frames.

use crate::landmarks::Landmark;
use opencv::core::Point;

/// Clamp and convert f32 to i32 for pixel coordinates
#[must_use]
#[allow(clippy::cast_precision_loss)] // Acceptable for clamping bounds
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn f32_to_i32_clamp(value: f32, min: i32, max: i32) -> i32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if !value.is_finite() {
        return min;
    }

    let clamped = value.clamp(min as f32, max as f32);
    (clamped as i32).clamp(min, max)
}

/// Map a normalized landmark to a pixel inside a `width` x `height` frame
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn landmark_to_pixel(landmark: &Landmark, width: i32, height: i32) -> Point {
    let max_x = (width - 1).max(0);
    let max_y = (height - 1).max(0);
    Point::new(
        f32_to_i32_clamp(landmark.x * width as f32, 0, max_x),
        f32_to_i32_clamp(landmark.y * height as f32, 0, max_y),
    )
}
