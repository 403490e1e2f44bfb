/// Angular speed of an orbit with the reference period.
pub const BASE_SPEED: f64 = 1.0;

/// One Earth year in days.
pub const REFERENCE_PERIOD_DAYS: f64 = 365.25;

/// Relative angular speed for an orbital period in days.
///
/// Shorter periods spin faster, inversely proportional. Negative periods
/// (retrograde moons such as Triton) give negative speeds. Zero or
/// non-finite periods give no speed. While paused every speed is zero.
pub fn animation_speed(period_days: Option<f64>, paused: bool) -> Option<f64> {
    let period = period_days.filter(|p| p.is_finite() && *p != 0.0)?;
    if paused {
        return Some(0.0);
    }
    Some(BASE_SPEED * REFERENCE_PERIOD_DAYS / period)
}
