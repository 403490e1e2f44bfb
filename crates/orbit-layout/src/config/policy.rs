use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::error::{EngineResult, LayoutError};
use crate::api::types::Classification;

/// Identifier of a view-mode policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyId {
    TrueScale,
    Compressed,
    SchematicFixed,
    Equidistant,
}

impl PolicyId {
    pub const ALL: [PolicyId; 4] = [
        PolicyId::TrueScale,
        PolicyId::Compressed,
        PolicyId::SchematicFixed,
        PolicyId::Equidistant,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PolicyId::TrueScale => "true-scale",
            PolicyId::Compressed => "compressed",
            PolicyId::SchematicFixed => "schematic-fixed",
            PolicyId::Equidistant => "equidistant",
        }
    }

    /// Look up a policy by its kebab-case name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How sibling orbit distances relate to source semi-major axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMode {
    /// Scaled semi-major axis, pushed outward only as far as clearance needs.
    Proportional,
    /// Next free slot outright; source distances only decide the order.
    Equidistant,
}

/// Fixed visual sizes per classification for schematic policies.
/// Missing entries fall back to `other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedSizeTable {
    #[serde(default)]
    pub star: Option<f64>,
    #[serde(default)]
    pub planet: Option<f64>,
    /// Gas giants get `planet * gas_giant_multiplier`.
    #[serde(default = "default_gas_giant_multiplier")]
    pub gas_giant_multiplier: f64,
    #[serde(default)]
    pub moon: Option<f64>,
    #[serde(default)]
    pub belt: Option<f64>,
    #[serde(default = "default_other_size")]
    pub other: f64,
}

fn default_gas_giant_multiplier() -> f64 {
    1.5
}

fn default_other_size() -> f64 {
    0.3
}

impl Default for FixedSizeTable {
    fn default() -> Self {
        Self {
            star: None,
            planet: None,
            gas_giant_multiplier: default_gas_giant_multiplier(),
            moon: None,
            belt: None,
            other: default_other_size(),
        }
    }
}

impl FixedSizeTable {
    pub fn size_for(&self, class: Classification) -> f64 {
        let size = match class {
            Classification::Star => self.star,
            Classification::Planet => self.planet,
            Classification::GasGiant => self.planet.map(|p| p * self.gas_giant_multiplier),
            Classification::Moon => self.moon,
            Classification::Belt => self.belt,
            Classification::Other => None,
        };
        size.unwrap_or(self.other)
    }
}

/// Scaling and sizing constants for one view mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Smallest visual radius any object may get.
    pub min_visual_size: f64,
    /// Largest visual radius for non-star objects.
    pub max_visual_size: f64,
    /// Ceiling for stars during hierarchy correction.
    pub star_max_visual_size: f64,
    /// Exponent applied to the normalized log size. 1.0 is the compressed
    /// mapping; larger values spread small bodies further from large ones.
    pub size_contrast: f64,
    /// Visual units per AU.
    pub orbit_scale: f64,
    /// Minimum clearance between neighbouring edges.
    pub min_distance: f64,
    /// Multiplier on a primary's radius for the first free orbit.
    pub safety_multiplier: f64,
    /// Share of a satellite system's extent counted in sibling spacing.
    pub satellite_extent_factor: f64,
    pub min_belt_width: f64,
    pub max_belt_width: f64,
    pub distance_mode: DistanceMode,
    /// When present, sizes come from this table instead of physical radii.
    pub fixed_sizes: Option<FixedSizeTable>,
    /// Enables the eccentricity-aware collision sweep after placement.
    pub global_collision_pass: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::compressed()
    }
}

impl PolicyConfig {
    pub fn compressed() -> Self {
        Self {
            min_visual_size: 0.5,
            max_visual_size: 12.0,
            star_max_visual_size: 15.0,
            size_contrast: 1.0,
            orbit_scale: 60.0,
            min_distance: 2.0,
            safety_multiplier: 1.5,
            satellite_extent_factor: 1.0,
            min_belt_width: 0.5,
            max_belt_width: 6.0,
            distance_mode: DistanceMode::Proportional,
            fixed_sizes: None,
            global_collision_pass: false,
        }
    }

    pub fn true_scale() -> Self {
        Self {
            min_visual_size: 0.05,
            max_visual_size: 20.0,
            star_max_visual_size: 24.0,
            size_contrast: 1.5,
            orbit_scale: 200.0,
            min_distance: 0.5,
            safety_multiplier: 1.2,
            satellite_extent_factor: 1.0,
            min_belt_width: 0.2,
            max_belt_width: 20.0,
            distance_mode: DistanceMode::Proportional,
            fixed_sizes: None,
            global_collision_pass: false,
        }
    }

    pub fn schematic_fixed() -> Self {
        Self {
            min_visual_size: 0.3,
            max_visual_size: 10.0,
            star_max_visual_size: 10.0,
            size_contrast: 1.0,
            orbit_scale: 40.0,
            min_distance: 3.0,
            safety_multiplier: 2.0,
            satellite_extent_factor: 1.0,
            min_belt_width: 0.5,
            max_belt_width: 3.0,
            distance_mode: DistanceMode::Proportional,
            fixed_sizes: Some(FixedSizeTable {
                star: Some(8.0),
                planet: Some(2.0),
                gas_giant_multiplier: 1.5,
                moon: Some(0.6),
                belt: Some(0.4),
                other: 0.3,
            }),
            global_collision_pass: false,
        }
    }

    pub fn equidistant() -> Self {
        Self {
            min_visual_size: 0.3,
            max_visual_size: 10.0,
            star_max_visual_size: 10.0,
            size_contrast: 1.0,
            orbit_scale: 40.0,
            min_distance: 6.0,
            safety_multiplier: 2.0,
            satellite_extent_factor: 1.0,
            min_belt_width: 0.5,
            max_belt_width: 2.0,
            distance_mode: DistanceMode::Equidistant,
            fixed_sizes: Some(FixedSizeTable {
                star: Some(6.0),
                planet: Some(1.5),
                gas_giant_multiplier: 1.5,
                moon: Some(0.5),
                belt: Some(0.4),
                other: 0.3,
            }),
            global_collision_pass: false,
        }
    }

    pub fn builtin(id: PolicyId) -> Self {
        match id {
            PolicyId::TrueScale => Self::true_scale(),
            PolicyId::Compressed => Self::compressed(),
            PolicyId::SchematicFixed => Self::schematic_fixed(),
            PolicyId::Equidistant => Self::equidistant(),
        }
    }

    pub fn with_collision_pass(mut self, enabled: bool) -> Self {
        self.global_collision_pass = enabled;
        self
    }

    /// Largest radius hierarchy correction may give an object of this class.
    pub fn ceiling_for(&self, class: Classification) -> f64 {
        if class.is_star() {
            self.star_max_visual_size
        } else {
            self.max_visual_size
        }
    }

    /// Satellites keep at least twice the policy's own safety floor apart.
    pub fn satellite_safety(&self) -> f64 {
        self.safety_multiplier.max(2.0)
    }

    /// Check the constants the placement math relies on.
    pub fn validate(&self, id: PolicyId) -> EngineResult<()> {
        let fail = |reason: &str| {
            Err(LayoutError::InvalidPolicy {
                policy: id,
                reason: reason.to_string(),
            })
        };
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(self.min_visual_size) {
            return fail("min_visual_size must be positive");
        }
        if !(self.max_visual_size > self.min_visual_size) {
            return fail("max_visual_size must exceed min_visual_size");
        }
        if !(self.star_max_visual_size >= self.max_visual_size) {
            return fail("star_max_visual_size must be at least max_visual_size");
        }
        if !positive(self.size_contrast) {
            return fail("size_contrast must be positive");
        }
        if !positive(self.orbit_scale) {
            return fail("orbit_scale must be positive");
        }
        if !positive(self.min_distance) {
            return fail("min_distance must be positive");
        }
        if !(self.safety_multiplier >= 1.0) {
            return fail("safety_multiplier must be at least 1");
        }
        if !(self.satellite_extent_factor > 0.0 && self.satellite_extent_factor <= 1.0) {
            return fail("satellite_extent_factor must be in (0, 1]");
        }
        if !positive(self.min_belt_width) || !(self.max_belt_width >= self.min_belt_width) {
            return fail("belt widths must satisfy 0 < min_belt_width <= max_belt_width");
        }
        if let Some(table) = &self.fixed_sizes {
            let sizes = [table.star, table.planet, table.moon, table.belt];
            if !positive(table.other)
                || !positive(table.gas_giant_multiplier)
                || sizes.iter().flatten().any(|&s| !positive(s))
            {
                return fail("fixed sizes must be positive");
            }
        }
        Ok(())
    }
}

/// One entry of a policy override file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PolicyEntry {
    id: PolicyId,
    #[serde(flatten)]
    config: PolicyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PolicyFile {
    #[serde(default)]
    policies: Vec<PolicyEntry>,
}

/// `PolicyId -> PolicyConfig` lookup consumed by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyTable {
    policies: HashMap<PolicyId, PolicyConfig>,
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PolicyTable {
    /// The four built-in view modes.
    pub fn builtin() -> Self {
        let policies = PolicyId::ALL
            .into_iter()
            .map(|id| (id, PolicyConfig::builtin(id)))
            .collect();
        Self { policies }
    }

    /// Parse policy overrides from JSON and layer them over the built-ins.
    ///
    /// ```text
    /// { "policies": [ { "id": "compressed", "min_distance": 4.0 } ] }
    /// ```
    /// Fields an entry leaves out take the compressed defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let file: PolicyFile = serde_json::from_str(json)?;
        let mut table = Self::builtin();
        for entry in file.policies {
            table.insert(entry.id, entry.config)?;
        }
        Ok(table)
    }

    /// Register or replace a policy after validating it.
    pub fn insert(&mut self, id: PolicyId, config: PolicyConfig) -> EngineResult<()> {
        config.validate(id)?;
        self.policies.insert(id, config);
        Ok(())
    }

    pub fn get(&self, id: PolicyId) -> EngineResult<&PolicyConfig> {
        self.policies.get(&id).ok_or(LayoutError::UnknownPolicy(id))
    }
}
