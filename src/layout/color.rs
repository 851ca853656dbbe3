//! Color conversion from 0..=1 float channels to `#rrggbb`

use crate::source::Color;

/// Format a color as a lowercase `#rrggbb` string.
///
/// Returns `None` when there is no color, or when the color object carries
/// no channels at all. Missing channels count as 0. Each channel is scaled
/// by 255 and truncated; values outside 0..=1 saturate. Alpha is dropped.
pub fn to_hex(color: Option<&Color>) -> Option<String> {
    let c = color.filter(|c| !c.is_empty())?;
    Some(format!(
        "#{:02x}{:02x}{:02x}",
        channel(c.r),
        channel(c.g),
        channel(c.b)
    ))
}

fn channel(v: Option<f64>) -> u8 {
    // float -> int `as` casts truncate toward zero and saturate
    (v.unwrap_or(0.0) * 255.0) as u8
}
