//! Physical input parameters and per-revision constants
//!
//! Everything here is an immutable value built once per run. Derived
//! dimensions live in [`crate::dimensions`]; nothing in this module is ever
//! adjusted after loading.

use crate::error::{DesignError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Millimeters per inch
pub const INCH: f64 = 25.4;

/// Inner diameter of bodies printed from the first revision. Later bodies
/// that match it accept baseplates and covers printed for the old ones.
pub const REPRINT_INNER_DIAMETER: f64 = 90.6;

// ============================================================================
// Revisions
// ============================================================================

/// How the post/bay carrier relates to the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionPolicy {
    /// The carrier is a separate baseplate part whose shape is cut out of
    /// the body floor
    SubtractBaseplate,
    /// Posts and bay are fused into the body cavity; no baseplate is made
    UnionIntoBody,
}

/// Design revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Revision {
    First,
    Second,
    #[default]
    Third,
}

impl Revision {
    pub const ALL: [Revision; 3] = [Revision::First, Revision::Second, Revision::Third];

    pub fn number(self) -> u8 {
        match self {
            Revision::First => 1,
            Revision::Second => 2,
            Revision::Third => 3,
        }
    }

    /// Constants that distinguish this revision
    pub fn constants(self) -> RevisionConstants {
        match self {
            Revision::First => RevisionConstants {
                policy: CompositionPolicy::SubtractBaseplate,
                cover_clearance: 0.1,
                fit_clearance: 0.1,
                embed_allowance: 5.0,
                lip_offset_walls: 0.5,
                lip_allowance: 2.0,
                floor_walls: 0.5,
                shoulders: true,
                battery_cutout: true,
                reprint_inner_diameter: Some(REPRINT_INNER_DIAMETER),
            },
            Revision::Second => RevisionConstants {
                policy: CompositionPolicy::UnionIntoBody,
                cover_clearance: 0.0,
                fit_clearance: 0.1,
                embed_allowance: 5.0,
                lip_offset_walls: -1.0,
                lip_allowance: 2.0,
                floor_walls: 0.5,
                shoulders: true,
                battery_cutout: true,
                reprint_inner_diameter: None,
            },
            Revision::Third => RevisionConstants {
                policy: CompositionPolicy::UnionIntoBody,
                cover_clearance: 0.0,
                fit_clearance: 0.1,
                embed_allowance: 5.0,
                lip_offset_walls: -1.0,
                lip_allowance: 2.0,
                floor_walls: 0.5,
                shoulders: false,
                battery_cutout: false,
                reprint_inner_diameter: None,
            },
        }
    }
}

impl TryFrom<u8> for Revision {
    type Error = DesignError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Revision::First),
            2 => Ok(Revision::Second),
            3 => Ok(Revision::Third),
            other => Err(DesignError::UnknownRevision(other)),
        }
    }
}

impl From<Revision> for u8 {
    fn from(revision: Revision) -> Self {
        revision.number()
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "revision {}", self.number())
    }
}

/// Fixed constants of one revision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevisionConstants {
    pub policy: CompositionPolicy,
    /// Added to the body inner diameter to size the cover step
    pub cover_clearance: f64,
    /// Radial play between the baseplate and the body pocket, on diameter
    pub fit_clearance: f64,
    /// How far each board's posts sink into the board above them
    pub embed_allowance: f64,
    /// Lip base height relative to the hub depth, in wall thicknesses
    pub lip_offset_walls: f64,
    /// Radial overhang of the lip beyond the cap-side outer radius
    pub lip_allowance: f64,
    /// Solid floor left under the pocket, in wall thicknesses
    pub floor_walls: f64,
    /// Feather posts carry a wider collar up to the IMU top
    pub shoulders: bool,
    /// The battery volume is cut out of the corner columns
    pub battery_cutout: bool,
    /// Inner diameter older prints were made with, if compatibility matters
    pub reprint_inner_diameter: Option<f64>,
}

// ============================================================================
// Physical inputs
// ============================================================================

/// The brake-rotor hub the enclosure mounts onto
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hub {
    /// Bore the body slides into
    pub bore_diameter: f64,
    /// Outer diameter of the hub face; the cover matches it
    pub outer_diameter: f64,
    /// Depth of the hub recess
    pub depth: f64,
    /// How much narrower the body's hub end is than the bore
    pub entry_clearance: f64,
}

impl Default for Hub {
    fn default() -> Self {
        // E450 brake rotor hub
        Self {
            bore_diameter: 4.0 * INCH,
            outer_diameter: 110.0,
            depth: 20.0,
            entry_clearance: 5.0,
        }
    }
}

/// A circuit board on four standoffs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardSpec {
    pub width: f64,
    pub depth: f64,
    /// Board plus the components on it, i.e. the height it occupies
    pub thickness: f64,
    /// Mounting hole center spacing along X
    pub spacing_x: f64,
    /// Mounting hole center spacing along Y
    pub spacing_y: f64,
    pub post_diameter: f64,
}

impl BoardSpec {
    /// Adafruit BNO055 IMU breakout
    pub fn imu() -> Self {
        Self {
            width: 1.0 * INCH,
            depth: 0.8 * INCH,
            thickness: 15.0,
            spacing_x: 0.8 * INCH,
            spacing_y: 0.6 * INCH,
            post_diameter: 2.0, // hole dia 2.54
        }
    }

    /// Adafruit Feather
    pub fn feather() -> Self {
        Self {
            width: 2.0 * INCH,
            depth: 0.9 * INCH,
            thickness: 15.0,
            spacing_x: 1.8 * INCH,
            spacing_y: 0.7 * INCH,
            post_diameter: 2.0, // hole dia 2.54
        }
    }

    fn validate(&self, name: &'static str) -> Result<()> {
        positive(name, "width", self.width)?;
        positive(name, "depth", self.depth)?;
        positive(name, "thickness", self.thickness)?;
        positive(name, "spacing_x", self.spacing_x)?;
        positive(name, "spacing_y", self.spacing_y)?;
        positive(name, "post_diameter", self.post_diameter)?;
        if self.spacing_x >= self.width || self.spacing_y >= self.depth {
            return Err(DesignError::invalid(
                name,
                format!(
                    "hole spacing {}x{} must be smaller than the {}x{} footprint",
                    self.spacing_x, self.spacing_y, self.width, self.depth
                ),
            ));
        }
        Ok(())
    }
}

/// The battery pack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatterySpec {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    /// Width of each corner column's relief, measured in from the footprint
    pub corner_relief: f64,
}

impl Default for BatterySpec {
    fn default() -> Self {
        // Adafruit battery 328
        Self {
            width: 62.5,
            depth: 50.5,
            height: 8.1,
            corner_relief: 10.0,
        }
    }
}

impl BatterySpec {
    /// The relief must leave material between the two slots on every side
    pub fn validate(&self) -> Result<()> {
        positive("battery", "width", self.width)?;
        positive("battery", "depth", self.depth)?;
        positive("battery", "height", self.height)?;
        positive("battery", "corner_relief", self.corner_relief)?;
        let limit = self.width.min(self.depth) / 2.0;
        if self.corner_relief >= limit {
            return Err(DesignError::invalid(
                "battery.corner_relief",
                format!(
                    "{} must be less than half the smaller footprint side ({limit})",
                    self.corner_relief
                ),
            ));
        }
        Ok(())
    }
}

/// Every independent input of a design run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignParams {
    pub revision: Revision,
    pub hub: Hub,
    pub wall: f64,
    pub imu: BoardSpec,
    pub feather: BoardSpec,
    pub battery: BatterySpec,
    /// Overrides the revision's cover clearance
    pub cover_clearance: Option<f64>,
}

impl Default for DesignParams {
    fn default() -> Self {
        Self {
            revision: Revision::default(),
            hub: Hub::default(),
            wall: 3.0,
            imu: BoardSpec::imu(),
            feather: BoardSpec::feather(),
            battery: BatterySpec::default(),
            cover_clearance: None,
        }
    }
}

impl DesignParams {
    pub fn for_revision(revision: Revision) -> Self {
        Self {
            revision,
            ..Self::default()
        }
    }

    /// Load parameters from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|source| DesignError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Revision constants with any parameter-level overrides applied
    pub fn constants(&self) -> RevisionConstants {
        let mut constants = self.revision.constants();
        if let Some(clearance) = self.cover_clearance {
            constants.cover_clearance = clearance;
        }
        constants
    }

    /// Check every independent input before anything is derived from it
    pub fn validate(&self) -> Result<()> {
        positive("wall", "thickness", self.wall)?;
        positive("hub", "bore_diameter", self.hub.bore_diameter)?;
        positive("hub", "outer_diameter", self.hub.outer_diameter)?;
        positive("hub", "depth", self.hub.depth)?;
        if !(self.hub.entry_clearance.is_finite() && self.hub.entry_clearance >= 0.0) {
            return Err(DesignError::invalid(
                "hub.entry_clearance",
                "must be non-negative",
            ));
        }
        self.imu.validate("imu")?;
        self.feather.validate("feather")?;
        self.battery.validate()?;
        if self
            .cover_clearance
            .is_some_and(|clearance| !(clearance.is_finite() && clearance >= 0.0))
        {
            return Err(DesignError::invalid("cover_clearance", "must be non-negative"));
        }
        Ok(())
    }
}

fn positive(owner: &'static str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DesignError::invalid(
            owner,
            format!("{field} must be positive, got {value}"),
        ))
    }
}
