//! Surface appearance parameters for actors

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::{Clock, MTime, TimeStamp};

use super::resources::{GraphicsResources, ReleaseError, RenderContext, ResidentContexts};

/// How polygons are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Representation {
    Points,
    Wireframe,
    #[default]
    Surface,
}

/// Shading interpolation across a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    Flat,
    #[default]
    Gouraud,
    Phong,
}

// ============================================================================
// Property Config
// ============================================================================

/// Plain, serializable description of a [`Property`].
///
/// Used for configured defaults and presets; a live [`Property`] is built from
/// it with [`Property::from_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyConfig {
    pub ambient_color: Vec3,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub edge_color: Vec3,
    /// Ambient coefficient (0.0 - 1.0)
    pub ambient: f32,
    /// Diffuse coefficient (0.0 - 1.0)
    pub diffuse: f32,
    /// Specular coefficient (0.0 - 1.0)
    pub specular: f32,
    /// Shininess exponent
    pub specular_power: f32,
    /// 1.0 is fully opaque
    pub opacity: f32,
    pub representation: Representation,
    pub interpolation: Interpolation,
    pub edge_visibility: bool,
    pub backface_culling: bool,
    pub frontface_culling: bool,
    pub lighting: bool,
    pub point_size: f32,
    pub line_width: f32,
}

impl PropertyConfig {
    /// Default parameters with every color set to `color`.
    #[must_use]
    pub fn new(color: Vec3) -> Self {
        Self {
            ambient_color: color,
            diffuse_color: color,
            specular_color: color,
            ..Self::default()
        }
    }

    /// A diffuse material (no specular)
    #[must_use]
    pub fn diffuse(color: Vec3) -> Self {
        Self {
            specular: 0.0,
            specular_power: 1.0,
            ..Self::new(color)
        }
    }

    /// A shiny material
    #[must_use]
    pub fn shiny(color: Vec3) -> Self {
        Self {
            specular: 1.0,
            specular_power: 64.0,
            interpolation: Interpolation::Phong,
            ..Self::new(color)
        }
    }

    /// A see-through material
    #[must_use]
    pub fn translucent(color: Vec3, opacity: f32) -> Self {
        Self {
            opacity: opacity.clamp(0.0, 1.0),
            ..Self::new(color)
        }
    }

    /// Red material
    #[must_use]
    pub fn red() -> Self {
        Self::new(Vec3::new(0.9, 0.2, 0.2))
    }

    /// Green material
    #[must_use]
    pub fn green() -> Self {
        Self::new(Vec3::new(0.2, 0.9, 0.2))
    }

    /// Blue material
    #[must_use]
    pub fn blue() -> Self {
        Self::new(Vec3::new(0.2, 0.2, 0.9))
    }

    /// Gray material
    #[must_use]
    pub fn gray() -> Self {
        Self::new(Vec3::splat(0.5))
    }
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            ambient_color: Vec3::ONE,
            diffuse_color: Vec3::ONE,
            specular_color: Vec3::ONE,
            edge_color: Vec3::ZERO,
            ambient: 0.0,
            diffuse: 1.0,
            specular: 0.0,
            specular_power: 1.0,
            opacity: 1.0,
            representation: Representation::Surface,
            interpolation: Interpolation::Gouraud,
            edge_visibility: false,
            backface_culling: false,
            frontface_culling: false,
            lighting: true,
            point_size: 1.0,
            line_width: 1.0,
        }
    }
}

// ============================================================================
// Property
// ============================================================================

/// Material parameters plus their modification time.
///
/// Every setter bumps the property's mtime when the value actually changes.
#[derive(Debug, Clone)]
pub struct Property {
    params: PropertyConfig,
    mtime: MTime,
    resident: ResidentContexts,
}

impl Property {
    /// Create a property with default parameters.
    #[must_use]
    pub fn new(clock: &Clock) -> Self {
        Self::from_config(clock, PropertyConfig::default())
    }

    /// Create a property from a config.
    #[must_use]
    pub fn from_config(clock: &Clock, mut config: PropertyConfig) -> Self {
        config.opacity = config.opacity.clamp(0.0, 1.0);
        Self {
            params: config,
            mtime: MTime::modified_now(clock),
            resident: ResidentContexts::new(),
        }
    }

    /// Snapshot the current parameters.
    #[must_use]
    pub fn config(&self) -> &PropertyConfig {
        &self.params
    }

    /// Get the modification time.
    #[must_use]
    pub fn mtime(&self) -> TimeStamp {
        self.mtime.get()
    }

    // -------------------------------------------------------------------------
    // Getters
    // -------------------------------------------------------------------------

    /// The diffuse color, which is what "the color" of a surface means.
    #[must_use]
    pub fn color(&self) -> Vec3 {
        self.params.diffuse_color
    }

    #[must_use]
    pub fn ambient_color(&self) -> Vec3 {
        self.params.ambient_color
    }

    #[must_use]
    pub fn diffuse_color(&self) -> Vec3 {
        self.params.diffuse_color
    }

    #[must_use]
    pub fn specular_color(&self) -> Vec3 {
        self.params.specular_color
    }

    #[must_use]
    pub fn edge_color(&self) -> Vec3 {
        self.params.edge_color
    }

    #[must_use]
    pub fn ambient(&self) -> f32 {
        self.params.ambient
    }

    #[must_use]
    pub fn diffuse(&self) -> f32 {
        self.params.diffuse
    }

    #[must_use]
    pub fn specular(&self) -> f32 {
        self.params.specular
    }

    #[must_use]
    pub fn specular_power(&self) -> f32 {
        self.params.specular_power
    }

    /// Opacity in `[0, 1]`.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.params.opacity
    }

    #[must_use]
    pub fn representation(&self) -> Representation {
        self.params.representation
    }

    #[must_use]
    pub fn interpolation(&self) -> Interpolation {
        self.params.interpolation
    }

    #[must_use]
    pub fn edge_visibility(&self) -> bool {
        self.params.edge_visibility
    }

    #[must_use]
    pub fn backface_culling(&self) -> bool {
        self.params.backface_culling
    }

    #[must_use]
    pub fn frontface_culling(&self) -> bool {
        self.params.frontface_culling
    }

    #[must_use]
    pub fn lighting(&self) -> bool {
        self.params.lighting
    }

    #[must_use]
    pub fn point_size(&self) -> f32 {
        self.params.point_size
    }

    #[must_use]
    pub fn line_width(&self) -> f32 {
        self.params.line_width
    }

    // -------------------------------------------------------------------------
    // Setters
    // -------------------------------------------------------------------------

    /// Set ambient, diffuse and specular colors at once.
    pub fn set_color(&mut self, color: Vec3) {
        let p = &mut self.params;
        let changed =
            p.ambient_color != color || p.diffuse_color != color || p.specular_color != color;
        if changed {
            p.ambient_color = color;
            p.diffuse_color = color;
            p.specular_color = color;
            self.mtime.modified();
        }
    }

    pub fn set_ambient_color(&mut self, color: Vec3) {
        self.mtime.update(&mut self.params.ambient_color, color);
    }

    pub fn set_diffuse_color(&mut self, color: Vec3) {
        self.mtime.update(&mut self.params.diffuse_color, color);
    }

    pub fn set_specular_color(&mut self, color: Vec3) {
        self.mtime.update(&mut self.params.specular_color, color);
    }

    pub fn set_edge_color(&mut self, color: Vec3) {
        self.mtime.update(&mut self.params.edge_color, color);
    }

    pub fn set_ambient(&mut self, ambient: f32) {
        self.mtime.update(&mut self.params.ambient, ambient);
    }

    pub fn set_diffuse(&mut self, diffuse: f32) {
        self.mtime.update(&mut self.params.diffuse, diffuse);
    }

    pub fn set_specular(&mut self, specular: f32) {
        self.mtime.update(&mut self.params.specular, specular);
    }

    pub fn set_specular_power(&mut self, power: f32) {
        self.mtime.update(&mut self.params.specular_power, power);
    }

    /// Set opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.mtime
            .update(&mut self.params.opacity, opacity.clamp(0.0, 1.0));
    }

    pub fn set_representation(&mut self, representation: Representation) {
        self.mtime
            .update(&mut self.params.representation, representation);
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.mtime
            .update(&mut self.params.interpolation, interpolation);
    }

    pub fn set_edge_visibility(&mut self, visible: bool) {
        self.mtime.update(&mut self.params.edge_visibility, visible);
    }

    pub fn set_backface_culling(&mut self, cull: bool) {
        self.mtime.update(&mut self.params.backface_culling, cull);
    }

    pub fn set_frontface_culling(&mut self, cull: bool) {
        self.mtime.update(&mut self.params.frontface_culling, cull);
    }

    pub fn set_lighting(&mut self, lighting: bool) {
        self.mtime.update(&mut self.params.lighting, lighting);
    }

    pub fn set_point_size(&mut self, size: f32) {
        self.mtime.update(&mut self.params.point_size, size);
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.mtime.update(&mut self.params.line_width, width);
    }

    // -------------------------------------------------------------------------
    // Graphics resources
    // -------------------------------------------------------------------------

    /// Record that a renderer uploaded this property's state into `context`.
    pub fn mark_resident(&mut self, context: RenderContext) {
        self.resident.insert(context);
    }

    /// Check if the property has uploads in `context`.
    #[must_use]
    pub fn is_resident(&self, context: &RenderContext) -> bool {
        self.resident.contains(context)
    }

    /// Number of release requests this property has received.
    #[must_use]
    pub fn release_requests(&self) -> u32 {
        self.resident.release_requests()
    }
}

impl GraphicsResources for Property {
    fn release_graphics_resources(&mut self, context: &RenderContext) -> Result<(), ReleaseError> {
        if self.resident.release(context) {
            log::trace!("Released property resources in context {}", context.id());
        }
        Ok(())
    }
}
