//! Configuration for a simulation pass.
//!
//! All lengths are in meters and all angles in degrees.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ensure_positive, Result, StereosimError};
use crate::stereo_pair::StereoPair;
use crate::wireframe::ObjectShape;

/// How each camera's optical axis is oriented relative to the rig center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RigType {
    /// Cameras rotate inward to aim at the crossing point.
    #[default]
    ToeIn,
    /// Cameras rotate outward, mirroring toe-in.
    ToeOut,
    /// All cameras share one optical axis direction.
    Parallel,
    /// Sensors stay parallel to the rig; lenses shift toward the crossing point.
    TiltShift,
}

/// Colors assigned to the two outermost cameras.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorScheme {
    /// Red left, cyan right.
    #[default]
    RedCyan,
    /// Green left, magenta right.
    GreenMagenta,
    /// Amber left, blue right.
    AmberBlue,
}

impl ColorScheme {
    /// Returns the (left, right) RGB colors in `[0, 1]`.
    pub fn colors(self) -> (DVec3, DVec3) {
        match self {
            ColorScheme::RedCyan => (DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 1.0, 1.0)),
            ColorScheme::GreenMagenta => (DVec3::new(0.0, 1.0, 0.0), DVec3::new(1.0, 0.0, 1.0)),
            ColorScheme::AmberBlue => (DVec3::new(1.0, 0.75, 0.0), DVec3::new(0.0, 0.0, 1.0)),
        }
    }

    /// Color of cameras between the outermost two.
    pub fn interior() -> DVec3 {
        DVec3::splat(0.5)
    }
}

/// Configuration of the virtual camera rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    /// Number of cameras (at least 2).
    pub camera_count: usize,
    /// Distance between the outermost cameras.
    pub separation: f64,
    /// Distance of the rig from the origin; cameras sit at `z = -distance`.
    pub distance: f64,
    /// Z coordinate of the point the cameras converge on.
    pub crossing: f64,
    /// Lens focal length.
    pub focal_length: f64,
    /// Half of the sensor width.
    pub sensor_half_width: f64,
    /// Camera height above the scene origin.
    pub height: f64,
    /// Sensor width / height.
    pub sensor_aspect: f64,
    /// Convergence strategy.
    pub rig_type: RigType,
    /// Whether to compensate magnification for the longer toe-in distance.
    pub focal_correction: bool,
    /// Colors for the outermost cameras.
    pub color_scheme: ColorScheme,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            camera_count: 2,
            separation: 0.065,
            distance: 1.0,
            crossing: 0.0,
            focal_length: 0.035,
            sensor_half_width: 0.018,
            height: 0.0,
            sensor_aspect: 1.5,
            rig_type: RigType::ToeIn,
            focal_correction: false,
            color_scheme: ColorScheme::RedCyan,
        }
    }
}

impl RigConfig {
    /// Creates a new rig configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of cameras.
    pub fn with_camera_count(mut self, camera_count: usize) -> Self {
        self.camera_count = camera_count;
        self
    }

    /// Sets the outermost camera separation.
    pub fn with_separation(mut self, separation: f64) -> Self {
        self.separation = separation;
        self
    }

    /// Sets the rig distance from the origin.
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Sets the crossing point Z coordinate.
    pub fn with_crossing(mut self, crossing: f64) -> Self {
        self.crossing = crossing;
        self
    }

    /// Sets the lens focal length.
    pub fn with_focal_length(mut self, focal_length: f64) -> Self {
        self.focal_length = focal_length;
        self
    }

    /// Sets the camera height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Sets the rig type.
    pub fn with_rig_type(mut self, rig_type: RigType) -> Self {
        self.rig_type = rig_type;
        self
    }

    /// Enables or disables focal length correction.
    pub fn with_focal_correction(mut self, focal_correction: bool) -> Self {
        self.focal_correction = focal_correction;
        self
    }

    /// Z coordinate shared by all cameras.
    pub fn camera_z(&self) -> f64 {
        -self.distance
    }

    /// Checks the configuration for values the rig builder cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.camera_count < 2 {
            return Err(StereosimError::TooFewCameras(self.camera_count));
        }
        ensure_finite("separation", self.separation)?;
        ensure_finite("distance", self.distance)?;
        ensure_finite("crossing", self.crossing)?;
        ensure_finite("height", self.height)?;
        ensure_positive("focal_length", self.focal_length)?;
        ensure_positive("sensor_half_width", self.sensor_half_width)?;
        ensure_positive("sensor_aspect", self.sensor_aspect)?;
        Ok(())
    }
}

/// Kind of target display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DisplayKind {
    /// Each eye sees exactly one chosen camera image.
    #[default]
    Stereoscopic,
    /// A lenticular sheet interleaves all camera images.
    Lenticular,
}

/// Physical description of the target display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Display technology.
    pub kind: DisplayKind,
    /// Height of the display center above the origin.
    pub center_height: f64,
    /// Physical width.
    pub width: f64,
    /// Width / height.
    pub aspect: f64,
    /// Horizontal resolution in pixels.
    pub pixels_per_line: f64,
    /// Lens-to-lens spacing of the lenticular sheet (mechanical pitch).
    pub lens_pitch: f64,
    /// Distance from the lens plane to the pixel plane.
    pub lens_depth: f64,
    /// Viewing distance the interleaving is tuned for.
    pub optimal_viewing_distance: f64,
    /// Explicit visual pitch; derived from the lens geometry when unset.
    pub visual_pitch: Option<f64>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            kind: DisplayKind::Stereoscopic,
            center_height: 0.0,
            width: 0.5,
            aspect: 16.0 / 9.0,
            pixels_per_line: 1920.0,
            lens_pitch: 0.0005,
            lens_depth: 0.002,
            optimal_viewing_distance: 0.6,
            visual_pitch: None,
        }
    }
}

impl DisplayConfig {
    /// Creates a new display configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display kind.
    pub fn with_kind(mut self, kind: DisplayKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the physical width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Sets the lenticular lens pitch and depth.
    pub fn with_lens(mut self, lens_pitch: f64, lens_depth: f64) -> Self {
        self.lens_pitch = lens_pitch;
        self.lens_depth = lens_depth;
        self
    }

    /// Sets an explicit visual pitch.
    pub fn with_visual_pitch(mut self, visual_pitch: f64) -> Self {
        self.visual_pitch = Some(visual_pitch);
        self
    }

    /// Cell spacing on the pixel plane as seen from the optimal distance.
    ///
    /// The pixel plane sits `lens_depth` behind the lenses, so its cells are
    /// spread by `(distance + depth) / distance` relative to the lens pitch.
    pub fn visual_pitch(&self) -> f64 {
        self.visual_pitch.unwrap_or_else(|| {
            self.lens_pitch * (self.optimal_viewing_distance + self.lens_depth)
                / self.optimal_viewing_distance
        })
    }

    /// Checks the configuration for values the pipeline cannot use.
    pub fn validate(&self) -> Result<()> {
        ensure_finite("center_height", self.center_height)?;
        ensure_positive("width", self.width)?;
        ensure_positive("aspect", self.aspect)?;
        ensure_positive("pixels_per_line", self.pixels_per_line)?;
        if self.kind == DisplayKind::Lenticular {
            ensure_positive("lens_pitch", self.lens_pitch)?;
            ensure_positive("lens_depth", self.lens_depth)?;
            ensure_positive("optimal_viewing_distance", self.optimal_viewing_distance)?;
            ensure_positive("visual_pitch", self.visual_pitch())?;
        }
        Ok(())
    }
}

/// Position of the viewer's head relative to the display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Interpupillary distance.
    pub eye_separation: f64,
    /// Distance from the eyes to the display plane.
    pub head_distance: f64,
    /// Vertical offset of the eyes from the display center.
    pub head_height: f64,
    /// Lateral offset of the eyes from the display center.
    pub head_offset: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            eye_separation: 0.065,
            head_distance: 0.6,
            head_height: 0.0,
            head_offset: 0.0,
        }
    }
}

impl ViewerConfig {
    /// Creates a new viewer configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the head distance.
    pub fn with_head_distance(mut self, head_distance: f64) -> Self {
        self.head_distance = head_distance;
        self
    }

    /// Sets the lateral head offset.
    pub fn with_head_offset(mut self, head_offset: f64) -> Self {
        self.head_offset = head_offset;
        self
    }

    /// Checks the configuration for values the pipeline cannot use.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("eye_separation", self.eye_separation)?;
        ensure_positive("head_distance", self.head_distance)?;
        ensure_finite("head_height", self.head_height)?;
        ensure_finite("head_offset", self.head_offset)?;
        Ok(())
    }
}

/// Placement of one scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObjectConfig {
    /// Canonical shape the object is built from.
    pub shape: ObjectShape,
    /// World position of the object's center.
    pub position: DVec3,
    /// Rotation in degrees about X, Y and Z (applied Z, then Y, then X).
    pub rotation: DVec3,
    /// Per-axis scale, applied after rotation.
    pub scale: DVec3,
    /// Disabled objects are left out of the scene.
    pub enabled: bool,
}

impl Default for SceneObjectConfig {
    fn default() -> Self {
        Self {
            shape: ObjectShape::Cube,
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::splat(0.1),
            enabled: true,
        }
    }
}

impl SceneObjectConfig {
    /// Creates an object of the given shape with default placement.
    pub fn new(shape: ObjectShape) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }

    /// Sets the position.
    pub fn with_position(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the rotation in degrees.
    pub fn with_rotation(mut self, rotation: DVec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the per-axis scale.
    pub fn with_scale(mut self, scale: DVec3) -> Self {
        self.scale = scale;
        self
    }

    /// Checks the configuration for values the pipeline cannot use.
    pub fn validate(&self) -> Result<()> {
        if !self.position.is_finite() || !self.rotation.is_finite() || !self.scale.is_finite() {
            return Err(StereosimError::InvalidParameter {
                name: "object transform",
                value: f64::NAN,
            });
        }
        self.shape.validate()
    }
}

/// Everything a full simulation pass needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Virtual camera rig.
    pub rig: RigConfig,
    /// Target display.
    pub display: DisplayConfig,
    /// Viewer head position.
    pub viewer: ViewerConfig,
    /// Scene objects.
    pub objects: Vec<SceneObjectConfig>,
    /// Cameras shown to each eye on a stereoscopic display.
    pub stereo_pair: StereoPair,
    /// Viewing comfort level in `[0, 10]`.
    pub comfort: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rig: RigConfig::default(),
            display: DisplayConfig::default(),
            viewer: ViewerConfig::default(),
            objects: vec![SceneObjectConfig::default()],
            stereo_pair: StereoPair::default(),
            comfort: 5.0,
        }
    }
}

impl SimulationConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the rig's camera count and re-clamps the stored stereo pair.
    pub fn with_camera_count(mut self, camera_count: usize) -> Self {
        self.rig.camera_count = camera_count;
        self.stereo_pair.set_camera_count(camera_count);
        self
    }

    /// Checks every section of the configuration.
    ///
    /// The stereo pair must be clamped against the rig's camera count.
    pub fn validate(&self) -> Result<()> {
        self.rig.validate()?;
        if self.stereo_pair.camera_count() != self.rig.camera_count {
            return Err(StereosimError::SizeMismatch {
                expected: self.rig.camera_count,
                actual: self.stereo_pair.camera_count(),
            });
        }
        self.display.validate()?;
        self.viewer.validate()?;
        for object in &self.objects {
            object.validate()?;
        }
        if !(0.0..=10.0).contains(&self.comfort) {
            return Err(StereosimError::InvalidParameter {
                name: "comfort",
                value: self.comfort,
            });
        }
        Ok(())
    }
}
