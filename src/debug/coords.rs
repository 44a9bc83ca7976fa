use bevy::math::Vec3;

/// `"X: 1.01, Y: -2.30, Z: 0.00"`. Rounds half away from zero on the f32 value; `-0.00` prints
/// as `0.00`.
pub fn format_coordinates(p: Vec3) -> String {
    format!("X: {}, Y: {}, Z: {}", two_decimals(p.x), two_decimals(p.y), two_decimals(p.z))
}

fn two_decimals(v: f32) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let cents = (v * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
