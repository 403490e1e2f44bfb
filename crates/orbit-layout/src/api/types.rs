use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a celestial object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of object kinds the layout engine distinguishes.
///
/// `GasGiant` is a planet in every structural sense and only differs in
/// fixed-size lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Star,
    Planet,
    GasGiant,
    Moon,
    Belt,
    Other,
}

impl Classification {
    pub fn is_star(self) -> bool {
        self == Self::Star
    }

    pub fn is_planet(self) -> bool {
        matches!(self, Self::Planet | Self::GasGiant)
    }

    pub fn is_belt(self) -> bool {
        self == Self::Belt
    }
}

/// Physical attributes. Only `radius` (km) feeds the layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalProperties {
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub mass: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl PhysicalProperties {
    pub fn with_radius(radius: f64) -> Self {
        Self {
            radius: Some(radius),
            ..Self::default()
        }
    }

    /// Radius usable in log/ratio math. Zero, negative, non-finite or
    /// missing radii become `1.0`.
    pub fn layout_radius(&self) -> f64 {
        match self.radius {
            Some(r) if r.is_finite() && r > 0.0 => r,
            _ => 1.0,
        }
    }
}

/// Point orbit around a primary. Distances in AU, period in days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOrbit {
    pub parent_id: ObjectId,
    pub semi_major_axis: f64,
    #[serde(default)]
    pub eccentricity: f64,
    #[serde(default)]
    pub inclination: f64,
    #[serde(default)]
    pub orbital_period: Option<f64>,
}

/// Ring-shaped region around a primary (belts, rings). Radii in AU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnularOrbit {
    pub parent_id: ObjectId,
    pub inner_radius: f64,
    pub outer_radius: f64,
    #[serde(default)]
    pub inclination: f64,
    #[serde(default)]
    pub eccentricity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Orbit {
    Point(PointOrbit),
    Annular(AnnularOrbit),
}

impl Orbit {
    pub fn parent_id(&self) -> &ObjectId {
        match self {
            Orbit::Point(o) => &o.parent_id,
            Orbit::Annular(o) => &o.parent_id,
        }
    }

    /// Source-data distance used to order siblings: semi-major axis for
    /// point orbits, inner radius for annuli.
    pub fn ordering_key(&self) -> f64 {
        match self {
            Orbit::Point(o) => o.semi_major_axis,
            Orbit::Annular(o) => o.inner_radius,
        }
    }

    pub fn eccentricity(&self) -> f64 {
        match self {
            Orbit::Point(o) => o.eccentricity,
            Orbit::Annular(o) => o.eccentricity,
        }
    }
}

/// Immutable input record for one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialObject {
    pub id: ObjectId,
    pub name: String,
    pub classification: Classification,
    #[serde(default)]
    pub physical: PhysicalProperties,
    #[serde(default)]
    pub orbit: Option<Orbit>,
}

impl CelestialObject {
    /// A root object (no orbit).
    pub fn new(id: &str, classification: Classification, radius: f64) -> Self {
        Self {
            id: ObjectId::from(id),
            name: id.to_string(),
            classification,
            physical: PhysicalProperties::with_radius(radius),
            orbit: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Circular point orbit with the given semi-major axis (AU).
    pub fn orbiting(mut self, parent: &str, semi_major_axis: f64) -> Self {
        self.orbit = Some(Orbit::Point(PointOrbit {
            parent_id: ObjectId::from(parent),
            semi_major_axis,
            eccentricity: 0.0,
            inclination: 0.0,
            orbital_period: None,
        }));
        self
    }

    /// Annular orbit between `inner` and `outer` (AU).
    pub fn annulus(mut self, parent: &str, inner: f64, outer: f64) -> Self {
        self.orbit = Some(Orbit::Annular(AnnularOrbit {
            parent_id: ObjectId::from(parent),
            inner_radius: inner,
            outer_radius: outer,
            inclination: 0.0,
            eccentricity: 0.0,
        }));
        self
    }

    /// Set the period (days) of a point orbit. No-op for annuli and roots.
    pub fn with_period(mut self, days: f64) -> Self {
        if let Some(Orbit::Point(ref mut o)) = self.orbit {
            o.orbital_period = Some(days);
        }
        self
    }

    /// Set the eccentricity of the orbit. No-op for roots.
    pub fn with_eccentricity(mut self, e: f64) -> Self {
        match self.orbit {
            Some(Orbit::Point(ref mut o)) => o.eccentricity = e,
            Some(Orbit::Annular(ref mut o)) => o.eccentricity = e,
            None => {}
        }
        self
    }

    pub fn parent_id(&self) -> Option<&ObjectId> {
        self.orbit.as_ref().map(Orbit::parent_id)
    }

    pub fn is_root(&self) -> bool {
        self.orbit.is_none()
    }

    pub fn orbital_period(&self) -> Option<f64> {
        match &self.orbit {
            Some(Orbit::Point(o)) => o.orbital_period,
            _ => None,
        }
    }
}

/// Annulus placement for a belt or ring. `center_radius` is always the
/// midpoint of `inner_radius` and `outer_radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeltGeometry {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub center_radius: f64,
}

impl BeltGeometry {
    pub fn new(inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            inner_radius,
            outer_radius,
            center_radius: (inner_radius + outer_radius) / 2.0,
        }
    }

    pub fn half_width(&self) -> f64 {
        (self.outer_radius - self.inner_radius) / 2.0
    }

    /// Move the whole annulus outward by `delta`.
    pub fn shifted(&self, delta: f64) -> Self {
        Self::new(self.inner_radius + delta, self.outer_radius + delta)
    }
}

/// Engine output for one object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub visual_radius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orbit_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub belt_geometry: Option<BeltGeometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_speed: Option<f64>,
}

/// Full layout keyed by object id.
pub type LayoutMap = HashMap<ObjectId, LayoutResult>;
