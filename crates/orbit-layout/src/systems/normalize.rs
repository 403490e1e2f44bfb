use crate::api::types::CelestialObject;

/// Logarithmic radius range used to squeeze physical radii into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRange {
    pub log_min: f64,
    pub log_range: f64,
}

impl SizeRange {
    /// Scan every object's sanitized radius. The range always spans at least
    /// one decade so a set of equal radii does not collapse to a point.
    pub fn from_objects(objects: &[CelestialObject]) -> Self {
        Self::from_radii(objects.iter().map(|o| o.physical.layout_radius()))
    }

    pub fn from_radii(radii: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = radii
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| (lo.min(r), hi.max(r)));
        if !min.is_finite() || !max.is_finite() {
            // Empty input: any radius maps against [1, 10].
            return Self { log_min: 0.0, log_range: 1.0 };
        }

        let max = if max / min < 10.0 { min * 10.0 } else { max };
        let log_min = min.log10();
        Self {
            log_min,
            log_range: max.log10() - log_min,
        }
    }

    /// Position of `radius` inside the range, clamped to `[0, 1]`.
    pub fn normalize(&self, radius: f64) -> f64 {
        ((radius.log10() - self.log_min) / self.log_range).clamp(0.0, 1.0)
    }
}
