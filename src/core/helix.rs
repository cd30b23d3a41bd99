//! Two-strand helix layout for project cards in 3D.
//!
//! Static per-index geometry ([`HelixLayout`]) is computed once per item
//! count / viewport class.  Each frame, [`HelixLayout::frame`] combines it
//! with the driving scroll progress to produce world positions, camera
//! distances and fog opacity, sorted back-to-front for painting.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Mobile vs desktop layout class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewportClass {
    Mobile,
    #[default]
    Desktop,
}

impl ViewportClass {
    /// Classify a viewport width (terminal columns) against a breakpoint.
    pub fn from_width(cols: u16, breakpoint: u16) -> Self {
        if cols < breakpoint {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
        }
    }
}

/// Distance-based fade thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogConfig {
    /// Fully opaque closer than this.
    pub near: f64,
    /// Fully transparent beyond this.
    pub far: f64,
    /// Hidden when closer than this (would be oversized / clipped).
    pub min_distance: f64,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            near: 12.0,
            far: 28.0,
            min_distance: 4.0,
        }
    }
}

/// Opacity for an item at `distance` from the camera.
pub fn fog_opacity(distance: f64, fog: &FogConfig) -> f64 {
    if !distance.is_finite() || distance < fog.min_distance {
        return 0.0;
    }
    if distance <= fog.near {
        return 1.0;
    }
    if distance >= fog.far || fog.far <= fog.near {
        return 0.0;
    }
    1.0 - (distance - fog.near) / (fog.far - fog.near)
}

#[derive(Debug, Clone, PartialEq)]
pub struct HelixConfig {
    pub turns: f64,
    pub radius: f64,
    pub spacing: f64,
    /// Radius multiplier applied for [`ViewportClass::Mobile`].
    pub mobile_radius_scale: f64,
    /// Spacing multiplier applied for [`ViewportClass::Mobile`].
    pub mobile_spacing_scale: f64,
    /// Camera sits on the +z axis at this distance, looking at the origin.
    pub camera_distance: f64,
    /// Vertical field of view in radians.
    pub fov_y: f64,
    /// Extra travel so the last item fully leaves the view at progress 1.
    pub exit_buffer: f64,
    pub fog: FogConfig,
}

impl Default for HelixConfig {
    fn default() -> Self {
        Self {
            turns: 2.0,
            radius: 6.0,
            spacing: 2.5,
            mobile_radius_scale: 0.6,
            mobile_spacing_scale: 1.4,
            camera_distance: 16.0,
            fov_y: 50f64.to_radians(),
            exit_buffer: 4.0,
            fog: FogConfig::default(),
        }
    }
}

impl HelixConfig {
    pub fn radius_for(&self, class: ViewportClass) -> f64 {
        match class {
            ViewportClass::Mobile => self.radius * self.mobile_radius_scale,
            ViewportClass::Desktop => self.radius,
        }
    }

    pub fn spacing_for(&self, class: ViewportClass) -> f64 {
        match class {
            ViewportClass::Mobile => self.spacing * self.mobile_spacing_scale,
            ViewportClass::Desktop => self.spacing,
        }
    }

    /// Height of the world slice visible at the helix axis.
    pub fn viewport_height(&self) -> f64 {
        2.0 * self.camera_distance * (self.fov_y / 2.0).tan()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance(self, other: Vec3) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Rotate about the +y axis by `angle` radians.
    pub fn rotate_y(self, angle: f64) -> Vec3 {
        let (s, c) = angle.sin_cos();
        Vec3::new(self.x * c + self.z * s, self.y, -self.x * s + self.z * c)
    }
}

/// Static placement of one item on the helix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelixPlacement {
    pub index: usize,
    pub angle: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
}

impl HelixPlacement {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Placement for item `index` of `count`.
pub fn place(index: usize, count: usize, turns: f64, radius: f64, spacing: f64) -> HelixPlacement {
    let angle_step = if count == 0 {
        0.0
    } else {
        TAU * turns / count as f64
    };
    let strand_offset = (index % 2) as f64 * PI;
    let angle = index as f64 * angle_step + strand_offset;
    HelixPlacement {
        index,
        angle,
        x: radius * angle.cos(),
        y: -(index as f64) * spacing,
        z: radius * angle.sin(),
        // Faces outward; sign chosen so cards don't read mirrored.
        yaw: -angle + FRAC_PI_2,
    }
}

/// Whole-structure transform driven by scroll progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelixMotion {
    pub translate_y: f64,
    pub rotation: f64,
}

/// One item as seen from the camera this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelixItemView {
    pub index: usize,
    pub world: Vec3,
    pub yaw: f64,
    pub distance: f64,
    pub opacity: f64,
}

/// Items closer to the camera plane than this are culled.
pub const NEAR_PLANE: f64 = 0.5;

impl HelixItemView {
    /// Distance in front of the camera along its view axis.
    pub fn depth(&self, camera: Vec3) -> f64 {
        camera.z - self.world.z
    }

    /// In front of the near plane with some fog opacity left.
    pub fn is_visible(&self, camera: Vec3) -> bool {
        self.depth(camera) >= NEAR_PLANE && self.opacity > 0.0
    }
}

/// Precomputed helix geometry for a fixed item set and viewport class.
#[derive(Debug, Clone)]
pub struct HelixLayout {
    placements: Vec<HelixPlacement>,
    class: ViewportClass,
    spacing: f64,
    config: HelixConfig,
}

impl HelixLayout {
    pub fn compute(count: usize, class: ViewportClass, config: &HelixConfig) -> Self {
        let radius = config.radius_for(class);
        let spacing = config.spacing_for(class);
        let placements = (0..count)
            .map(|i| place(i, count, config.turns, radius, spacing))
            .collect();
        Self {
            placements,
            class,
            spacing,
            config: config.clone(),
        }
    }

    /// True when the layout must be recomputed for this item count / class.
    pub fn is_stale(&self, count: usize, class: ViewportClass) -> bool {
        self.placements.len() != count || self.class != class
    }

    pub fn placements(&self) -> &[HelixPlacement] {
        &self.placements
    }

    #[cfg(test)]
    pub fn class(&self) -> ViewportClass {
        self.class
    }

    pub fn config(&self) -> &HelixConfig {
        &self.config
    }

    /// Vertical extent from the first to the last item.
    pub fn total_height(&self) -> f64 {
        self.placements.len().saturating_sub(1) as f64 * self.spacing
    }

    pub fn motion(&self, progress: f64) -> HelixMotion {
        let p = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let travel = self.total_height() + self.config.viewport_height() + self.config.exit_buffer;
        HelixMotion {
            translate_y: p * travel,
            rotation: p * TAU,
        }
    }

    pub fn camera(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.config.camera_distance)
    }

    /// Items for this frame, sorted far-to-near (paint order).
    ///
    /// `spin` is an extra idle rotation added on top of the scroll-driven one.
    pub fn frame(&self, progress: f64, spin: f64) -> Vec<HelixItemView> {
        let motion = self.motion(progress);
        let rotation = motion.rotation + spin;
        let camera = self.camera();

        let mut items: Vec<HelixItemView> = self
            .placements
            .iter()
            .map(|p| {
                let mut world = p.position().rotate_y(rotation);
                world.y += motion.translate_y;
                let distance = world.distance(camera);
                HelixItemView {
                    index: p.index,
                    world,
                    yaw: p.yaw + rotation,
                    distance,
                    opacity: fog_opacity(distance, &self.config.fog),
                }
            })
            .collect();
        items.sort_by(|a, b| b.distance.total_cmp(&a.distance));
        items
    }
}
