//! Generation parameters.
//!
//! Lengths are millimeters, angles degrees. Defaults describe a holder for a
//! 82 mm bottle printed with three 0.4 mm perimeters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GrabberError, Result};

/// Which side of the core body a rib wraps towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Counter-clockwise seen from above (angles increase).
    Left,
    /// Clockwise seen from above (angles decrease).
    Right,
}

impl Side {
    /// Sign of angular travel on this side.
    pub fn sign(self) -> f64 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    /// The other side.
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Angular footprint of the core body the holder is screwed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Footprint in degrees. Overrides `profile_pct` when set.
    pub angle: Option<f64>,
    /// Fraction of the bottle diameter covered by the core profile, in (0, 0.9].
    pub profile_pct: f64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            angle: None,
            profile_pct: 0.75,
        }
    }
}

/// Spiral rib parameters for one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideConfig {
    /// Rib cross-section width along the bottle surface.
    pub width: f64,
    /// Vertical gap between consecutive ribs.
    pub separation: f64,
    /// Deviation of the rib from straight down, in (0, 90).
    pub wrap_angle: f64,
    /// Downward shift of this side's first rib, >= 0.
    pub z_offset: f64,
    /// Upper bound on the number of ribs; `None` fills the available height.
    pub max_count: Option<usize>,
}

impl Default for SideConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            separation: 10.0,
            wrap_angle: 45.0,
            z_offset: 0.0,
            max_count: None,
        }
    }
}

impl SideConfig {
    /// Vertical rise of one rib: `width / tan(wrap_angle)`.
    pub fn vertical_span(&self) -> f64 {
        self.width / self.wrap_angle.to_radians().tan()
    }

    /// Rib pitch: span plus separation.
    pub fn period(&self) -> f64 {
        self.vertical_span() + self.separation
    }
}

/// Which ribs stop partway round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HalfConfig {
    /// Side whose leading ribs are trimmed; `None` disables trimming.
    ///
    /// Written `"left"`, `"right"` or `"none"` in TOML.
    #[serde(with = "half_side_serde")]
    pub side: Option<Side>,
    /// Fraction of that side's ribs (topmost first) to trim, in [0, 1].
    pub pct: f64,
    /// Largest closest-approach distance accepted as a crossing (mm).
    pub trim_threshold: f64,
}

impl Default for HalfConfig {
    fn default() -> Self {
        Self {
            side: Some(Side::Right),
            pct: 0.75,
            trim_threshold: 1.0,
        }
    }
}

mod half_side_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Side;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum SideData {
        Left,
        Right,
        None,
    }

    pub fn serialize<S: Serializer>(
        side: &Option<Side>,
        s: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match side {
            Some(Side::Left) => SideData::Left,
            Some(Side::Right) => SideData::Right,
            None => SideData::None,
        }
        .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Option<Side>, D::Error> {
        Ok(match SideData::deserialize(d)? {
            SideData::Left => Some(Side::Left),
            SideData::Right => Some(Side::Right),
            SideData::None => None,
        })
    }
}

/// Lofted ribs running round the back of the bottle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CradleConfig {
    /// Number of cradle ribs.
    pub count: usize,
    /// Section width where the rib meets the core.
    pub side: f64,
    /// Section width at the peak as a fraction of `side`, in (0, 1].
    pub center_ratio: f64,
    /// Start angle of rib 0 (ends at `360 - min_angle`).
    pub min_angle: f64,
    /// Added to the start angle per rib.
    pub angle_loss: f64,
    /// Peak height of rib 0; defaults to half the bottle height minus half `side`.
    pub max_z: Option<f64>,
    /// Removed from the peak height per rib; defaults to `1.5 * side`.
    pub z_loss: Option<f64>,
    /// Tent exponent for both the height law and section roundness, > 0.
    pub smooth: f64,
    /// Key section intervals per rib; each even, one entry per rib.
    pub section_samples: Vec<usize>,
    /// Path samples per rib.
    pub path_samples: usize,
}

impl Default for CradleConfig {
    fn default() -> Self {
        Self {
            count: 3,
            side: 18.0,
            center_ratio: 0.65,
            min_angle: 90.0,
            angle_loss: 35.0,
            max_z: None,
            z_loss: None,
            smooth: 1.25,
            section_samples: vec![10, 8, 4],
            path_samples: 231,
        }
    }
}

/// Section tessellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Chords per arc.
    pub arc_segments: usize,
    /// Chords per blend curve.
    pub blend_segments: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            arc_segments: 12,
            blend_segments: 6,
        }
    }
}

/// All parameters of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabberConfig {
    /// Bottle body radius.
    pub bottle_radius: f64,
    /// Height of the cylindrical bottle body.
    pub bottle_height: f64,
    /// Gap between bottle and holder.
    pub clearance: f64,
    /// Holder wall thickness.
    pub wall_thickness: f64,
    /// Height of the base fillet below which no spiral rib runs.
    pub base_fillet: f64,
    /// Twin path offset (degrees for angles, mm for heights).
    pub binormal_epsilon: f64,
    /// Path samples per millimeter of descent for spiral ribs.
    pub samples_per_mm: f64,
    /// Sweep independent ribs on the rayon thread pool.
    pub parallel: bool,
    /// Core body footprint.
    pub core: CoreConfig,
    /// Left spiral ribs.
    pub left: SideConfig,
    /// Right spiral ribs.
    pub right: SideConfig,
    /// Trimming of partial ribs.
    pub half: HalfConfig,
    /// Back cradle ribs.
    pub cradle: CradleConfig,
    /// Section tessellation.
    pub mesh: MeshConfig,
}

impl Default for GrabberConfig {
    fn default() -> Self {
        Self {
            bottle_radius: 41.0,
            bottle_height: 215.0,
            clearance: 0.2,
            wall_thickness: 2.4,
            base_fillet: 10.0,
            binormal_epsilon: 1e-4,
            samples_per_mm: 1.0,
            parallel: true,
            core: CoreConfig::default(),
            left: SideConfig::default(),
            right: SideConfig::default(),
            half: HalfConfig::default(),
            cradle: CradleConfig::default(),
            mesh: MeshConfig::default(),
        }
    }
}

/// Angular footprint (degrees) of a core profile covering `pct` of the
/// bottle diameter: `2 * asin(pct)`.
pub fn core_angle_from_profile_pct(pct: f64) -> f64 {
    2.0 * pct.asin().to_degrees()
}

impl GrabberConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    ///
    /// The result is not validated.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Settings for `side`.
    pub fn side(&self, side: Side) -> &SideConfig {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Radius of the inner (bottle-facing) arc.
    pub fn inner_radius(&self) -> f64 {
        self.bottle_radius + self.clearance
    }

    /// Radius of the outer arc.
    pub fn outer_radius(&self) -> f64 {
        self.inner_radius() + self.wall_thickness
    }

    /// Distance of every rib path from the axis: the middle of the wall.
    pub fn radial_offset(&self) -> f64 {
        self.inner_radius() + self.wall_thickness / 2.0
    }

    /// Core footprint in degrees.
    pub fn core_angle(&self) -> f64 {
        self.core
            .angle
            .unwrap_or_else(|| core_angle_from_profile_pct(self.core.profile_pct))
    }

    /// Angular travel left for a rib before it would run into the core.
    pub fn max_travel(&self) -> f64 {
        360.0 - self.core_angle()
    }

    /// Height above the base fillet usable by `side`'s ribs.
    pub fn available_height(&self, side: Side) -> f64 {
        self.bottle_height - self.base_fillet - self.side(side).z_offset
    }

    /// Height descended per spiral path sample.
    pub fn z_per_step(&self) -> f64 {
        1.0 / self.samples_per_mm
    }

    /// Peak height of cradle rib 0.
    pub fn cradle_max_z(&self) -> f64 {
        self.cradle
            .max_z
            .unwrap_or(self.bottle_height / 2.0 - self.cradle.side / 2.0)
    }

    /// Peak height lost per cradle rib.
    pub fn cradle_z_loss(&self) -> f64 {
        self.cradle.z_loss.unwrap_or(1.5 * self.cradle.side)
    }

    /// Check every range constraint.
    pub fn validate(&self) -> Result<()> {
        positive("bottle_radius", self.bottle_radius)?;
        positive("bottle_height", self.bottle_height)?;
        positive("wall_thickness", self.wall_thickness)?;
        positive("samples_per_mm", self.samples_per_mm)?;
        positive("binormal_epsilon", self.binormal_epsilon)?;
        if !(self.clearance >= 0.0) {
            return invalid("clearance must be >= 0");
        }
        if !(self.base_fillet >= 0.0 && self.base_fillet < self.bottle_height) {
            return invalid("base_fillet must be in [0, bottle_height)");
        }
        if self.binormal_epsilon >= 0.1 {
            return invalid("binormal_epsilon must be below 0.1");
        }

        if let Some(angle) = self.core.angle {
            if !(angle > 0.0 && angle < 360.0) {
                return invalid("core.angle must be in (0, 360) degrees");
            }
        } else if !(self.core.profile_pct > 0.0 && self.core.profile_pct <= 0.9) {
            return invalid("core.profile_pct must be in (0, 0.9]");
        }

        for side in [Side::Left, Side::Right] {
            self.validate_side(side)?;
        }

        if !(0.0..=1.0).contains(&self.half.pct) {
            return invalid("half.pct must be in [0, 1]");
        }
        positive("half.trim_threshold", self.half.trim_threshold)?;

        if self.mesh.arc_segments < 2 {
            return invalid("mesh.arc_segments must be >= 2");
        }
        if self.mesh.blend_segments < 1 {
            return invalid("mesh.blend_segments must be >= 1");
        }

        self.validate_cradle()
    }

    fn validate_side(&self, side: Side) -> Result<()> {
        let cfg = self.side(side);
        positive(&format!("{side}.width"), cfg.width)?;
        if !(cfg.wrap_angle > 0.0 && cfg.wrap_angle < 90.0) {
            return invalid(&format!(
                "{side}.wrap_angle must be strictly between 0 and 90 degrees"
            ));
        }
        if !(cfg.separation >= 0.0) {
            return invalid(&format!("{side}.separation must be >= 0"));
        }
        if !(cfg.z_offset >= 0.0 && self.available_height(side) > 0.0) {
            return invalid(&format!(
                "{side}.z_offset must be >= 0 and leave height above the base fillet"
            ));
        }
        if cfg.width >= 2.0 * self.inner_radius() {
            return invalid(&format!(
                "{side}.width must be below the inner diameter"
            ));
        }
        let side_step = self.z_per_step() * cfg.wrap_angle.to_radians().tan();
        if side_step > self.radial_offset() {
            return invalid(&format!(
                "{side}.wrap_angle too steep: {side_step:.2} mm per sample exceeds the radius"
            ));
        }
        Ok(())
    }

    fn validate_cradle(&self) -> Result<()> {
        let c = &self.cradle;
        if c.count == 0 {
            return Ok(());
        }
        positive("cradle.side", c.side)?;
        positive("cradle.smooth", c.smooth)?;
        if c.side >= 2.0 * self.inner_radius() {
            return invalid("cradle.side must be below the inner diameter");
        }
        if !(c.center_ratio > 0.0 && c.center_ratio <= 1.0) {
            return invalid("cradle.center_ratio must be in (0, 1]");
        }
        if c.section_samples.len() != c.count {
            return invalid(&format!(
                "cradle.section_samples has {} entries for {} ribs",
                c.section_samples.len(),
                c.count
            ));
        }
        if let Some(n) = c.section_samples.iter().find(|&&n| n < 2 || n % 2 != 0) {
            return invalid(&format!(
                "cradle.section_samples must be even and >= 2, got {n}"
            ));
        }
        if c.path_samples < 3 {
            return invalid("cradle.path_samples must be >= 3");
        }
        let last = (c.count - 1) as f64;
        let last_min_angle = c.min_angle + c.angle_loss * last;
        if !(c.min_angle >= 0.0 && last_min_angle < 180.0) {
            return invalid("cradle.min_angle must be >= 0 and every rib must start below 180");
        }
        if !(self.cradle_z_loss() >= 0.0) {
            return invalid("cradle.z_loss must be >= 0");
        }
        let last_max_z = self.cradle_max_z() - self.cradle_z_loss() * last;
        if !(last_max_z > 0.0 && self.cradle_max_z() <= self.bottle_height) {
            return invalid("cradle.max_z must fit the bottle and stay positive for every rib");
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        invalid(&format!("{name} must be positive"))
    }
}

fn invalid(message: &str) -> Result<()> {
    Err(GrabberError::InvalidConfig(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn expect_invalid(config: &GrabberConfig, needle: &str) {
        match config.validate() {
            Err(GrabberError::InvalidConfig(msg)) => {
                assert!(msg.contains(needle), "{msg:?} does not mention {needle:?}")
            }
            other => panic!("expected InvalidConfig mentioning {needle}, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_valid() {
        let config = GrabberConfig::default();
        config.validate().unwrap();
        assert_relative_eq!(config.radial_offset(), 42.4, epsilon = 1e-12);
        assert_relative_eq!(config.outer_radius(), 43.6, epsilon = 1e-12);
        assert_relative_eq!(config.cradle_max_z(), 98.5);
        assert_relative_eq!(config.cradle_z_loss(), 27.0);
    }

    #[test]
    fn test_core_angle_from_profile_pct() {
        assert_relative_eq!(core_angle_from_profile_pct(1.0), 180.0, epsilon = 1e-12);
        assert_relative_eq!(core_angle_from_profile_pct(0.5), 60.0, epsilon = 1e-12);
        let config = GrabberConfig::default();
        assert_relative_eq!(config.core_angle(), 97.1807, epsilon = 1e-4);

        let mut fixed = config.clone();
        fixed.core.angle = Some(90.0);
        assert_relative_eq!(fixed.core_angle(), 90.0);
        assert_relative_eq!(fixed.max_travel(), 270.0);
    }

    #[test]
    fn test_span_and_period() {
        let side = SideConfig::default();
        assert_relative_eq!(side.vertical_span(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(side.period(), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_wrap_angle_bounds() {
        for bad in [0.0, -5.0, 90.0, 120.0] {
            let mut config = GrabberConfig::default();
            config.left.wrap_angle = bad;
            expect_invalid(&config, "left.wrap_angle");
        }
    }

    #[test]
    fn test_odd_section_samples_rejected() {
        let mut config = GrabberConfig::default();
        config.cradle.section_samples = vec![10, 7, 4];
        expect_invalid(&config, "even");

        config.cradle.section_samples = vec![10, 8];
        expect_invalid(&config, "entries");

        config.cradle.count = 0;
        config.validate().unwrap();
    }

    #[test]
    fn test_profile_pct_range() {
        let mut config = GrabberConfig::default();
        config.core.profile_pct = 0.95;
        expect_invalid(&config, "profile_pct");
        config.core.angle = Some(100.0);
        config.validate().unwrap();
    }

    #[test]
    fn test_negative_z_offset_rejected() {
        let mut config = GrabberConfig::default();
        config.right.z_offset = -1.0;
        expect_invalid(&config, "right.z_offset");
    }

    #[test]
    fn test_toml_partial_override() {
        let config = GrabberConfig::from_toml_str(
            r#"
            bottle_radius = 35.0
            parallel = false

            [left]
            wrap_angle = 30.0

            [half]
            side = "left"

            [cradle]
            count = 1
            section_samples = [6]
            "#,
        )
        .unwrap();
        assert_relative_eq!(config.bottle_radius, 35.0);
        assert!(!config.parallel);
        assert_relative_eq!(config.left.wrap_angle, 30.0);
        assert_relative_eq!(config.left.width, 20.0);
        assert_eq!(config.half.side, Some(Side::Left));
        assert_eq!(config.cradle.section_samples, vec![6]);
        config.validate().unwrap();
    }

    #[test]
    fn test_toml_half_side_none() {
        let config = GrabberConfig::from_toml_str(
            r#"
            [half]
            side = "none"
            "#,
        )
        .unwrap();
        assert_eq!(config.half.side, None);
        assert_relative_eq!(config.half.pct, 0.75);
        config.validate().unwrap();

        let text = toml::to_string(&config.half).unwrap();
        assert!(text.contains(r#"side = "none""#), "{text}");
        assert!(GrabberConfig::from_toml_str("[half]\nside = \"up\"").is_err());
    }

    #[test]
    fn test_toml_type_error() {
        let err = GrabberConfig::from_toml_str("bottle_radius = \"big\"").unwrap_err();
        assert!(matches!(err, GrabberError::Toml(_)));
    }
}
