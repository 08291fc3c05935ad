//! Length conversion to the internal unit (1/100 mm).

/// 1/100 mm per unit.
const UNITS: &[(&str, f64)] = &[
    ("cm", 1000.0),
    ("mm", 100.0),
    ("inch", 2540.0),
    ("in", 2540.0),
    ("pt", 2540.0 / 72.0),
    ("pc", 2540.0 / 6.0),
    ("px", 2540.0 / 96.0),
];

/// Parse a markup length (`"2.5cm"`, `"10pt"`, ...) into 1/100 mm.
///
/// Unitless values are taken as already being in 1/100 mm. Results round
/// half away from zero and saturate at the `i32` range.
pub fn parse_measure_mm100(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+')))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    if number.is_empty() {
        return None;
    }
    let value: f64 = number.parse().ok()?;
    let unit = unit.trim();
    let factor = if unit.is_empty() {
        1.0
    } else {
        UNITS
            .iter()
            .find(|(name, _)| unit.eq_ignore_ascii_case(name))
            .map(|(_, factor)| *factor)?
    };
    let scaled = (value * factor).round();
    if !scaled.is_finite() {
        return None;
    }
    Some(scaled.clamp(i32::MIN as f64, i32::MAX as f64) as i32)
}

/// Parse a percentage (`"50%"`) into its integer value.
pub fn parse_percent(raw: &str) -> Option<i32> {
    let value: f64 = raw.trim().strip_suffix('%')?.trim().parse().ok()?;
    Some(value.round() as i32)
}

/// Parse a `#rrggbb` color into a packed `0xRRGGBB` integer.
pub fn parse_color(raw: &str) -> Option<i32> {
    let hex = raw.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    i32::from_str_radix(hex, 16).ok()
}
