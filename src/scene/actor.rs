//! Actor: a scene node pairing a mapper with appearance and a transform
//!
//! The renderer asks every actor, every frame, for its world bounds, whether
//! it needs blending, and whether anything it draws changed. Answers are
//! derived from the actor's mapper, property, textures and transform:
//!
//! - **Bounds** are cached. The actor keeps a snapshot of the mapper's last
//!   reported object-space bounds and the time it last transformed them, and
//!   only re-transforms when either the snapshot differs or the actor itself
//!   was modified since.
//! - **Opacity** is recomputed on every call. It depends on override flags
//!   that carry no timestamp of their own, and is cheap.
//! - **Timestamps** come in two flavours: [`Actor::mtime`] (does the rendering
//!   state look different) and [`Actor::redraw_mtime`] (does anything that
//!   feeds the draw, including the upstream pipeline, look different).
//!
//! Mappers and textures are shared (`Rc<RefCell<..>>`) and may be mutated
//! behind the actor's back. There is no notification channel: each actor
//! notices changes on its own through the comparisons above.
//!
//! # Example
//!
//! ```ignore
//! let clock = Clock::new();
//! let mapper: SharedMapper = MeshMapper::with_input(&clock, source).into_shared();
//!
//! let mut actor = Actor::new(&clock);
//! actor.set_mapper(Some(mapper));
//! actor.property().set_opacity(0.5);
//!
//! let changed = actor.redraw_mtime() > last_drawn;
//! let bounds = actor.bounds();
//! let blend = actor.has_translucent_polygonal_geometry();
//! ```

use std::rc::Rc;

use glam::{DMat4, DVec3};

use crate::core::{ActorConfig, Clock, MTime, TimeStamp};
use crate::renderer::{
    GraphicsResources, Property, PropertyConfig, ReleaseError, RenderContext, SharedMapper,
    SharedTexture,
};

use super::bounds::{Bounds, BoundsReport};
use super::prop3d::Prop3d;

/// A renderable scene-graph node.
#[derive(Debug)]
pub struct Actor {
    /// Transform and generic prop state; its mtime is the actor's own mtime
    prop: Prop3d,

    mapper: Option<SharedMapper>,
    /// Created on first read when absent
    property: Option<Property>,
    backface_property: Option<Property>,
    textures: Vec<SharedTexture>,

    force_opaque: bool,
    force_translucent: bool,

    /// World-space bounds as of `bounds_mtime`
    bounds: Bounds,
    /// Mapper bounds the cached `bounds` were derived from
    mapper_bounds: Option<Bounds>,
    bounds_mtime: MTime,

    /// Parameters for lazily created properties
    property_defaults: PropertyConfig,
}

impl Actor {
    /// Create an empty actor: no mapper, no property.
    #[must_use]
    pub fn new(clock: &Clock) -> Self {
        Self::with_config(clock, ActorConfig::default())
    }

    /// Create an empty actor using configured defaults.
    #[must_use]
    pub fn with_config(clock: &Clock, config: ActorConfig) -> Self {
        Self {
            prop: Prop3d::new(clock),
            mapper: None,
            property: None,
            backface_property: None,
            textures: Vec::new(),
            force_opaque: config.force_opaque,
            force_translucent: config.force_translucent,
            bounds: Bounds::EMPTY,
            mapper_bounds: None,
            bounds_mtime: MTime::new(clock),
            property_defaults: config.property,
        }
    }

    /// The actors this node renders as: just itself.
    ///
    /// Composite nodes answer with several actors; a plain actor answers with a
    /// one-element slice so callers can treat both alike.
    #[must_use]
    pub fn actors(&self) -> &[Self] {
        std::slice::from_ref(self)
    }

    // -------------------------------------------------------------------------
    // Positionable base
    // -------------------------------------------------------------------------

    /// The actor's transform and prop flags.
    #[must_use]
    pub fn prop3d(&self) -> &Prop3d {
        &self.prop
    }

    /// Mutable access to the transform. Changes bump the actor's mtime.
    pub fn prop3d_mut(&mut self) -> &mut Prop3d {
        &mut self.prop
    }

    // -------------------------------------------------------------------------
    // Mapper
    // -------------------------------------------------------------------------

    /// Get the mapper, if any.
    #[must_use]
    pub fn mapper(&self) -> Option<&SharedMapper> {
        self.mapper.as_ref()
    }

    /// Attach or detach the mapper.
    pub fn set_mapper(&mut self, mapper: Option<SharedMapper>) {
        let same = match (&self.mapper, &mapper) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if !same {
            self.mapper = mapper;
            self.prop.modified();
        }
    }

    /// Whether the mapper can render selection ids. `false` without a mapper.
    #[must_use]
    pub fn supports_selection(&self) -> bool {
        self.mapper
            .as_ref()
            .is_some_and(|mapper| mapper.borrow().supports_selection())
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    /// Build a property with this actor's defaults.
    #[must_use]
    pub fn make_property(&self) -> Property {
        Property::from_config(self.prop.clock(), self.property_defaults.clone())
    }

    /// Get the property, creating a default one on first access.
    ///
    /// The created property is kept until replaced with
    /// [`Actor::set_property`].
    pub fn property(&mut self) -> &mut Property {
        let clock = self.prop.clock();
        let defaults = &self.property_defaults;
        self.property.get_or_insert_with(|| {
            log::debug!("Creating default property");
            Property::from_config(clock, defaults.clone())
        })
    }

    /// Get the property without creating one.
    #[must_use]
    pub fn existing_property(&self) -> Option<&Property> {
        self.property.as_ref()
    }

    /// Replace the property. The value is stored as given.
    ///
    /// Clearing an already absent property is a no-op.
    pub fn set_property(&mut self, property: Option<Property>) {
        if self.property.is_none() && property.is_none() {
            return;
        }
        self.property = property;
        self.prop.modified();
    }

    /// Get the back-face property, if any.
    #[must_use]
    pub fn backface_property(&self) -> Option<&Property> {
        self.backface_property.as_ref()
    }

    /// Mutable access to the back-face property, if any.
    pub fn backface_property_mut(&mut self) -> Option<&mut Property> {
        self.backface_property.as_mut()
    }

    /// Replace the back-face property.
    pub fn set_backface_property(&mut self, property: Option<Property>) {
        if self.backface_property.is_none() && property.is_none() {
            return;
        }
        self.backface_property = property;
        self.prop.modified();
    }

    // -------------------------------------------------------------------------
    // Textures
    // -------------------------------------------------------------------------

    /// Attached textures.
    #[must_use]
    pub fn textures(&self) -> &[SharedTexture] {
        &self.textures
    }

    /// Attach a texture. Attaching the same texture twice is a no-op.
    pub fn add_texture(&mut self, texture: SharedTexture) {
        if !self.has_texture(&texture) {
            self.textures.push(texture);
            self.prop.modified();
        }
    }

    /// Detach a texture. Returns `true` if it was attached.
    pub fn remove_texture(&mut self, texture: &SharedTexture) -> bool {
        let Some(pos) = self.textures.iter().position(|t| Rc::ptr_eq(t, texture)) else {
            return false;
        };
        self.textures.remove(pos);
        self.prop.modified();
        true
    }

    /// Detach every texture.
    pub fn remove_all_textures(&mut self) {
        if !self.textures.is_empty() {
            self.textures.clear();
            self.prop.modified();
        }
    }

    /// Check if `texture` is attached.
    #[must_use]
    pub fn has_texture(&self, texture: &SharedTexture) -> bool {
        self.textures.iter().any(|t| Rc::ptr_eq(t, texture))
    }

    // -------------------------------------------------------------------------
    // Opacity overrides
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn force_opaque(&self) -> bool {
        self.force_opaque
    }

    /// Treat the actor as opaque regardless of its property, textures and
    /// mapper. Wins over [`Actor::set_force_translucent`].
    pub fn set_force_opaque(&mut self, force: bool) {
        self.prop.update(&mut self.force_opaque, force);
    }

    #[must_use]
    pub fn force_translucent(&self) -> bool {
        self.force_translucent
    }

    /// Treat the actor as translucent unless it is forced opaque.
    pub fn set_force_translucent(&mut self, force: bool) {
        self.prop.update(&mut self.force_translucent, force);
    }

    // -------------------------------------------------------------------------
    // Bounds
    // -------------------------------------------------------------------------

    /// World-space bounds, recomputed only when stale.
    ///
    /// - Without a mapper the cached value is returned as is.
    /// - Mapper bounds that are not a six-number box are passed through.
    /// - Empty mapper bounds reset the cache to [`Bounds::EMPTY`] and are
    ///   returned directly, without touching the transform.
    /// - Otherwise the mapper's box is re-transformed when it differs from the
    ///   last one seen, or when the actor was modified after the cache was
    ///   filled.
    ///
    /// The mapper brings its input up to date before answering.
    ///
    /// # Panics
    ///
    /// Panics if the mapper is already borrowed elsewhere.
    pub fn bounds(&mut self) -> BoundsReport {
        let report = match &self.mapper {
            None => return BoundsReport::Known(self.bounds),
            Some(mapper) => mapper.borrow_mut().bounds(),
        };
        let mapper_bounds = match report {
            BoundsReport::Known(bounds) => bounds,
            unknown @ BoundsReport::Unknown(_) => return unknown,
        };

        if mapper_bounds.is_empty() {
            self.mapper_bounds = Some(mapper_bounds);
            self.bounds = Bounds::EMPTY;
            self.bounds_mtime.modified();
            return BoundsReport::Known(mapper_bounds);
        }

        let stale = self.mapper_bounds != Some(mapper_bounds)
            || self.mtime() > self.bounds_mtime.get();
        if !stale {
            log::trace!("Bounds cache hit");
            return BoundsReport::Known(self.bounds);
        }

        log::debug!("Recomputing bounds...");
        self.mapper_bounds = Some(mapper_bounds);
        let matrix = self.prop.matrix();
        self.bounds = mapper_bounds.transformed(&matrix);
        self.bounds_mtime.modified();
        BoundsReport::Known(self.bounds)
    }

    /// The cached bounds field, without refreshing it.
    #[must_use]
    pub fn cached_bounds(&self) -> Bounds {
        self.bounds
    }

    /// When the cached bounds were last recomputed.
    #[must_use]
    pub fn bounds_mtime(&self) -> TimeStamp {
        self.bounds_mtime.get()
    }

    /// Center of the world bounds, if they are a valid box.
    pub fn center(&mut self) -> Option<DVec3> {
        self.bounds()
            .known()
            .filter(Bounds::is_valid)
            .map(|b| b.center())
    }

    /// Diagonal length of the world bounds, zero when unknown or empty.
    pub fn length(&mut self) -> f64 {
        self.bounds().known().map_or(0.0, |b| b.diagonal_length())
    }

    /// The world matrix, recomputed if the transform changed.
    pub fn matrix(&mut self) -> DMat4 {
        self.prop.matrix()
    }

    // -------------------------------------------------------------------------
    // Opacity
    // -------------------------------------------------------------------------

    /// Whether the actor renders without blending.
    ///
    /// Overrides win. Otherwise the property must be fully opaque (one is
    /// created if missing), no attached texture may be translucent, and the
    /// mapper, if any, must report opaque colors.
    ///
    /// # Panics
    ///
    /// Panics if the mapper is already borrowed elsewhere.
    pub fn is_opaque(&mut self) -> bool {
        if self.force_opaque {
            return true;
        }
        if self.force_translucent {
            return false;
        }

        let mut opaque = self.property().opacity() >= 1.0;
        opaque = opaque && self.textures.iter().all(|t| !t.borrow().is_translucent());
        opaque
            && self
                .mapper
                .as_ref()
                .is_none_or(|mapper| mapper.borrow_mut().is_opaque())
    }

    /// Whether the actor has polygons that need the translucent pass.
    ///
    /// `false` without a mapper. Creates the property if missing.
    pub fn has_translucent_polygonal_geometry(&mut self) -> bool {
        if self.mapper.is_none() {
            return false;
        }
        self.property();
        !self.is_opaque()
    }

    // -------------------------------------------------------------------------
    // Timestamps
    // -------------------------------------------------------------------------

    /// Latest change to the actor's rendering state: its own settings, its
    /// property and its back-face property.
    #[must_use]
    pub fn mtime(&self) -> TimeStamp {
        let mut mt = self.prop.mtime();
        if let Some(property) = &self.property {
            mt = mt.max(property.mtime());
        }
        if let Some(property) = &self.backface_property {
            mt = mt.max(property.mtime());
        }
        mt
    }

    /// Latest change to anything that feeds the draw.
    ///
    /// Takes the actor's own mtime, the mapper's mtime and the mtime of the
    /// mapper's input data. **Side effect:** the mapper's upstream pipeline is
    /// updated first, so the input timestamp read here reflects current data.
    /// Renderers rely on this call to bring the pipeline up to date.
    ///
    /// # Panics
    ///
    /// Panics if the mapper is already borrowed elsewhere.
    #[must_use]
    pub fn redraw_mtime(&self) -> TimeStamp {
        let mut mt = self.prop.mtime();
        if let Some(mapper) = &self.mapper {
            let mut mapper = mapper.borrow_mut();
            mt = mt.max(mapper.mtime());
            if mapper.has_input() {
                mapper.update_input();
                if let Some(input) = mapper.input_mtime() {
                    mt = mt.max(input);
                }
            }
        }
        mt
    }

    // -------------------------------------------------------------------------
    // Graphics resources
    // -------------------------------------------------------------------------

    /// Release everything held in `context` by the mapper, the property, the
    /// back-face property and the textures, in that order.
    ///
    /// Best effort: a failing collaborator is logged and the rest are still
    /// released.
    pub fn release_graphics_resources(&mut self, context: &RenderContext) {
        if let Some(mapper) = &self.mapper {
            let result = mapper
                .try_borrow_mut()
                .map_err(|_| ReleaseError::Busy("mapper"))
                .and_then(|mut mapper| mapper.release_graphics_resources(context));
            log_release_failure("mapper", result);
        }
        if let Some(property) = &mut self.property {
            log_release_failure("property", property.release_graphics_resources(context));
        }
        if let Some(property) = &mut self.backface_property {
            log_release_failure(
                "backface property",
                property.release_graphics_resources(context),
            );
        }
        for texture in &self.textures {
            let result = texture
                .try_borrow_mut()
                .map_err(|_| ReleaseError::Busy("texture"))
                .and_then(|mut texture| texture.release_graphics_resources(context));
            log_release_failure("texture", result);
        }
    }
}

fn log_release_failure(what: &str, result: Result<(), ReleaseError>) {
    if let Err(err) = result {
        log::warn!("Failed to release {what}: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ParametricSource, Shape};
    use crate::renderer::{ImageTexture, Mapper, MeshMapper};
    use std::cell::RefCell;

    /// Mapper with directly settable bounds and an optional fake upstream.
    #[derive(Debug)]
    struct FakeMapper {
        bounds: BoundsReport,
        mtime: MTime,
        opaque: bool,
        input: Option<FakeInput>,
        updates: u32,
        releases: u32,
        fail_release: bool,
    }

    #[derive(Debug)]
    struct FakeInput {
        mtime: MTime,
        stale: bool,
    }

    impl FakeMapper {
        fn new(clock: &Clock, bounds: [f64; 6]) -> Rc<RefCell<Self>> {
            Rc::new(RefCell::new(Self {
                bounds: BoundsReport::Known(Bounds(bounds)),
                mtime: MTime::modified_now(clock),
                opaque: true,
                input: None,
                updates: 0,
                releases: 0,
                fail_release: false,
            }))
        }

        fn set_bounds(&mut self, bounds: BoundsReport) {
            self.bounds = bounds;
            self.mtime.modified();
        }
    }

    impl GraphicsResources for FakeMapper {
        fn release_graphics_resources(
            &mut self,
            context: &RenderContext,
        ) -> Result<(), ReleaseError> {
            self.releases += 1;
            if self.fail_release {
                return Err(ReleaseError::Failed {
                    context: context.id(),
                    reason: "device lost".into(),
                });
            }
            Ok(())
        }
    }

    impl Mapper for FakeMapper {
        fn bounds(&mut self) -> BoundsReport {
            self.bounds.clone()
        }

        fn mtime(&self) -> TimeStamp {
            self.mtime.get()
        }

        fn is_opaque(&mut self) -> bool {
            self.opaque
        }

        fn supports_selection(&self) -> bool {
            true
        }

        fn has_input(&self) -> bool {
            self.input.is_some()
        }

        fn update_input(&mut self) {
            self.updates += 1;
            if let Some(input) = &mut self.input
                && input.stale
            {
                input.mtime.modified();
                input.stale = false;
            }
        }

        fn input_mtime(&self) -> Option<TimeStamp> {
            self.input.as_ref().map(|input| input.mtime.get())
        }
    }

    const UNIT: [f64; 6] = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0];

    fn actor_with(clock: &Clock, bounds: [f64; 6]) -> (Actor, Rc<RefCell<FakeMapper>>) {
        let fake = FakeMapper::new(clock, bounds);
        let shared: SharedMapper = fake.clone();
        let mut actor = Actor::new(clock);
        actor.set_mapper(Some(shared));
        (actor, fake)
    }

    // -------------------------------------------------------------------------
    // Bounds
    // -------------------------------------------------------------------------

    #[test]
    fn test_no_mapper_returns_field() {
        let clock = Clock::new();
        let mut actor = Actor::new(&clock);

        assert_eq!(actor.bounds(), BoundsReport::Known(Bounds::EMPTY));
        assert_eq!(actor.bounds_mtime(), TimeStamp::ZERO);
        assert!(!actor.has_translucent_polygonal_geometry());
        assert!(actor.existing_property().is_none());
    }

    #[test]
    fn test_first_query_computes_bounds() {
        let clock = Clock::new();
        let (mut actor, _fake) = actor_with(&clock, UNIT);

        assert_eq!(actor.bounds(), BoundsReport::Known(Bounds(UNIT)));
        assert_eq!(actor.cached_bounds(), Bounds(UNIT));
        assert!(actor.bounds_mtime() > TimeStamp::ZERO);
    }

    #[test]
    fn test_bounds_idempotent() {
        let clock = Clock::new();
        let (mut actor, _fake) = actor_with(&clock, UNIT);
        actor.prop3d_mut().rotate_z(30.0);

        let first = actor.bounds();
        let stamp = actor.bounds_mtime();
        let second = actor.bounds();

        assert_eq!(first, second);
        let (a, b) = (first.known().unwrap(), second.known().unwrap());
        assert!(a.0.iter().zip(b.0).all(|(x, y)| x.to_bits() == y.to_bits()));
        assert_eq!(actor.bounds_mtime(), stamp);
    }

    #[test]
    fn test_mapper_bounds_change_recomputes() {
        let clock = Clock::new();
        let (mut actor, fake) = actor_with(&clock, UNIT);
        let small = actor.bounds().known().unwrap();
        let stamp = actor.bounds_mtime();

        fake.borrow_mut()
            .set_bounds(Bounds([0.0, 2.0, 0.0, 2.0, 0.0, 2.0]).into());
        let large = actor.bounds().known().unwrap();

        assert!(actor.bounds_mtime() > stamp);
        assert!(large.contains(&small));
        assert!(large.diagonal_length() > small.diagonal_length());
        assert_eq!(large, Bounds([0.0, 2.0, 0.0, 2.0, 0.0, 2.0]));
    }

    #[test]
    fn test_same_mapper_bounds_different_mtime_is_cache_hit() {
        let clock = Clock::new();
        let (mut actor, fake) = actor_with(&clock, UNIT);
        let _ = actor.bounds();
        let stamp = actor.bounds_mtime();

        // Mapper touched but reports the same box
        fake.borrow_mut().set_bounds(Bounds(UNIT).into());
        let _ = actor.bounds();
        assert_eq!(actor.bounds_mtime(), stamp);
    }

    #[test]
    fn test_empty_mapper_bounds_skip_transform() {
        let clock = Clock::new();
        let (mut actor, _fake) = actor_with(&clock, Bounds::EMPTY.0);
        actor.prop3d_mut().set_position(DVec3::new(5.0, 0.0, 0.0));
        let matrix_stamp = actor.prop3d().matrix_mtime();

        assert_eq!(actor.bounds(), BoundsReport::Known(Bounds::EMPTY));
        assert_eq!(actor.cached_bounds(), Bounds::EMPTY);
        assert_eq!(actor.prop3d().matrix_mtime(), matrix_stamp);
        assert!(actor.bounds_mtime() > TimeStamp::ZERO);
    }

    #[test]
    fn test_geometry_becoming_empty_resets_cache() {
        let clock = Clock::new();
        let (mut actor, fake) = actor_with(&clock, UNIT);
        let _ = actor.bounds();
        assert!(actor.cached_bounds().is_valid());

        let raw = Bounds([1.0, -1.0, 0.0, 0.0, 0.0, 0.0]);
        fake.borrow_mut().set_bounds(raw.into());

        // The mapper's raw answer is returned, the cache holds the sentinel
        assert_eq!(actor.bounds(), BoundsReport::Known(raw));
        assert_eq!(actor.cached_bounds(), Bounds::EMPTY);

        // And geometry coming back is recomputed
        fake.borrow_mut().set_bounds(Bounds(UNIT).into());
        assert_eq!(actor.bounds(), BoundsReport::Known(Bounds(UNIT)));
    }

    #[test]
    fn test_transform_change_recomputes() {
        let clock = Clock::new();
        let (mut actor, _fake) = actor_with(&clock, UNIT);
        let _ = actor.bounds();
        let stamp = actor.bounds_mtime();

        actor.prop3d_mut().set_position(DVec3::new(10.0, 0.0, -3.0));
        let moved = actor.bounds().known().unwrap();

        assert!(actor.bounds_mtime() > stamp);
        assert_eq!(moved, Bounds([10.0, 11.0, 0.0, 1.0, -3.0, -2.0]));
    }

    #[test]
    fn test_rotation_and_scale_bounds() {
        let clock = Clock::new();
        let (mut actor, _fake) = actor_with(&clock, [-1.0, 1.0, -1.0, 1.0, -1.0, 1.0]);
        actor.prop3d_mut().set_scale(DVec3::new(2.0, 1.0, 1.0));
        actor.prop3d_mut().rotate_z(90.0);

        // Rotation is applied to the scaled box: x extent 2 turns into y extent
        let b = actor.bounds().known().unwrap();
        assert!((b.0[0] + 1.0).abs() < 1e-9 && (b.0[1] - 1.0).abs() < 1e-9);
        assert!((b.0[2] + 2.0).abs() < 1e-9 && (b.0[3] - 2.0).abs() < 1e-9);
        assert!((actor.length() - (4.0_f64 + 16.0 + 4.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_bounds_pass_through() {
        let clock = Clock::new();
        let (mut actor, fake) = actor_with(&clock, UNIT);
        fake.borrow_mut()
            .set_bounds(BoundsReport::Unknown(vec![0.0, 1.0]));

        assert_eq!(actor.bounds(), BoundsReport::Unknown(vec![0.0, 1.0]));
        assert_eq!(actor.bounds_mtime(), TimeStamp::ZERO);
        assert_eq!(actor.cached_bounds(), Bounds::EMPTY);
        assert_eq!(actor.center(), None);
    }

    #[test]
    fn test_shared_mapper_invalidates_every_actor() {
        let clock = Clock::new();
        let fake = FakeMapper::new(&clock, UNIT);
        let mut left = Actor::new(&clock);
        let mut right = Actor::new(&clock);
        left.set_mapper(Some(fake.clone() as SharedMapper));
        right.set_mapper(Some(fake.clone() as SharedMapper));
        right.prop3d_mut().set_position(DVec3::new(5.0, 0.0, 0.0));

        let _ = left.bounds();
        let _ = right.bounds();

        fake.borrow_mut()
            .set_bounds(Bounds([0.0, 3.0, 0.0, 1.0, 0.0, 1.0]).into());
        assert_eq!(left.bounds().known().unwrap().x_range(), [0.0, 3.0]);
        assert_eq!(right.bounds().known().unwrap().x_range(), [5.0, 8.0]);
    }

    #[test]
    fn test_center() {
        let clock = Clock::new();
        let (mut actor, _fake) = actor_with(&clock, [0.0, 2.0, 0.0, 4.0, 0.0, 6.0]);
        assert_eq!(actor.center(), Some(DVec3::new(1.0, 2.0, 3.0)));
    }

    // -------------------------------------------------------------------------
    // Opacity
    // -------------------------------------------------------------------------

    #[test]
    fn test_opaque_with_full_opacity() {
        let clock = Clock::new();
        let mut actor = Actor::new(&clock);
        actor.property().set_opacity(1.0);
        assert!(actor.is_opaque());
    }

    #[test]
    fn test_half_opacity_is_translucent() {
        let clock = Clock::new();
        let mut actor = Actor::new(&clock);
        actor.property().set_opacity(0.5);
        assert!(!actor.is_opaque());
    }

    #[test]
    fn test_force_opaque_wins() {
        let clock = Clock::new();
        let (mut actor, fake) = actor_with(&clock, UNIT);
        fake.borrow_mut().opaque = false;
        actor.property().set_opacity(0.0);
        actor.add_texture(ImageTexture::solid_color([0, 0, 0, 0]).into_shared());
        actor.set_force_translucent(true);
        actor.set_force_opaque(true);

        assert!(actor.is_opaque());
        assert!(!actor.has_translucent_polygonal_geometry());
    }

    #[test]
    fn test_force_translucent() {
        let clock = Clock::new();
        let mut actor = Actor::new(&clock);
        actor.set_force_translucent(true);
        assert!(!actor.is_opaque());
    }

    #[test]
    fn test_translucent_texture() {
        let clock = Clock::new();
        let mut actor = Actor::new(&clock);
        let texture: SharedTexture = ImageTexture::solid_color([255, 255, 255, 10]).into_shared();

        actor.add_texture(ImageTexture::white().into_shared());
        assert!(actor.is_opaque());

        actor.add_texture(texture.clone());
        assert!(!actor.is_opaque());

        assert!(actor.remove_texture(&texture));
        assert!(actor.is_opaque());
    }

    #[test]
    fn test_translucent_mapper() {
        let clock = Clock::new();
        let (mut actor, fake) = actor_with(&clock, UNIT);
        assert!(actor.is_opaque());
        fake.borrow_mut().opaque = false;
        assert!(!actor.is_opaque());
        assert!(actor.has_translucent_polygonal_geometry());
    }

    #[test]
    fn test_opacity_not_cached() {
        let clock = Clock::new();
        let (mut actor, _fake) = actor_with(&clock, UNIT);
        assert!(!actor.has_translucent_polygonal_geometry());
        actor.property().set_opacity(0.2);
        assert!(actor.has_translucent_polygonal_geometry());
        actor.property().set_opacity(1.0);
        assert!(!actor.has_translucent_polygonal_geometry());
    }

    #[test]
    fn test_translucency_query_creates_property() {
        let clock = Clock::new();
        let (mut actor, _fake) = actor_with(&clock, UNIT);
        assert!(actor.existing_property().is_none());

        assert!(!actor.has_translucent_polygonal_geometry());
        assert!(actor.existing_property().is_some());
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    #[test]
    fn test_property_created_once() {
        let clock = Clock::new();
        let mut actor = Actor::new(&clock);
        let stamp = actor.property().mtime();

        actor.property();
        assert_eq!(actor.property().mtime(), stamp);
    }

    #[test]
    fn test_configured_property_defaults() {
        let clock = Clock::new();
        let config = ActorConfig::default()
            .with_property(PropertyConfig::translucent(glam::Vec3::ONE, 0.25))
            .with_force_opaque(true);
        let mut actor = Actor::with_config(&clock, config);

        assert!(actor.force_opaque());
        assert_eq!(actor.property().opacity(), 0.25);
        assert_eq!(actor.make_property().opacity(), 0.25);
    }

    #[test]
    fn test_set_property_stored_directly() {
        let clock = Clock::new();
        let mut actor = Actor::new(&clock);
        let mut property = Property::new(&clock);
        property.set_opacity(0.75);
        let stamp = property.mtime();

        actor.set_property(Some(property));
        assert_eq!(actor.property().opacity(), 0.75);
        assert_eq!(actor.property().mtime(), stamp);
    }

    // -------------------------------------------------------------------------
    // Timestamps
    // -------------------------------------------------------------------------

    #[test]
    fn test_mtime_includes_properties() {
        let clock = Clock::new();
        let mut actor = Actor::new(&clock);
        let own = actor.mtime();

        actor.property().set_opacity(0.5);
        let with_property = actor.mtime();
        assert!(with_property > own);
        assert_eq!(with_property, actor.property().mtime());

        actor.set_backface_property(Some(Property::new(&clock)));
        let before = actor.mtime();
        if let Some(back) = actor.backface_property_mut() {
            back.set_color(glam::Vec3::X);
        }
        assert!(actor.mtime() > before);
    }

    #[test]
    fn test_setters_bump_only_on_change() {
        let clock = Clock::new();
        let (mut actor, fake) = actor_with(&clock, UNIT);
        let before = actor.mtime();

        actor.set_force_opaque(false);
        actor.set_mapper(Some(fake.clone() as SharedMapper));
        actor.set_property(None);
        actor.set_backface_property(None);
        assert_eq!(actor.mtime(), before);
        assert!(actor.existing_property().is_none());

        actor.set_force_opaque(true);
        assert!(actor.mtime() > before);
    }

    #[test]
    fn test_redraw_mtime_includes_mapper() {
        let clock = Clock::new();
        let (actor, fake) = actor_with(&clock, UNIT);
        let before = actor.redraw_mtime();

        fake.borrow_mut().set_bounds(Bounds(UNIT).into());
        assert!(actor.redraw_mtime() > before);
        assert_eq!(actor.redraw_mtime(), fake.borrow().mtime.get());
        // No input: nothing to update
        assert_eq!(fake.borrow().updates, 0);
    }

    #[test]
    fn test_redraw_mtime_updates_upstream_first() {
        let clock = Clock::new();
        let (actor, fake) = actor_with(&clock, UNIT);
        fake.borrow_mut().input = Some(FakeInput {
            mtime: MTime::new(&clock),
            stale: true,
        });

        let redraw = actor.redraw_mtime();
        let input = fake.borrow().input_mtime().unwrap();
        assert_eq!(fake.borrow().updates, 1);
        assert!(input > fake.borrow().mtime.get());
        assert_eq!(redraw, input);
        assert!(redraw > actor.mtime());
    }

    #[test]
    fn test_redraw_mtime_drives_real_pipeline() {
        let clock = Clock::new();
        let source = ParametricSource::cube(&clock, 2.0).into_shared();
        let mapper: SharedMapper = MeshMapper::with_input(&clock, source.clone()).into_shared();
        let mut actor = Actor::new(&clock);
        actor.set_mapper(Some(mapper));

        let first = actor.redraw_mtime();
        assert_eq!(source.borrow().executions(), 1);
        assert_eq!(
            actor.bounds().known(),
            Some(Bounds::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0))
        );

        // Steady state: no re-execution, same redraw time
        assert_eq!(actor.redraw_mtime(), first);
        assert_eq!(source.borrow().executions(), 1);

        source.borrow_mut().set_shape(Shape::Cube { size: 4.0 });
        assert!(actor.redraw_mtime() > first);
        assert_eq!(actor.bounds().known().unwrap().x_range(), [-2.0, 2.0]);
    }

    #[test]
    fn test_bounds_current_without_redraw() {
        let clock = Clock::new();
        let source = ParametricSource::cube(&clock, 2.0).into_shared();
        let mapper: SharedMapper = MeshMapper::with_input(&clock, source.clone()).into_shared();
        let mut actor = Actor::new(&clock);
        actor.set_mapper(Some(mapper));

        // First query executes the pipeline
        assert_eq!(
            actor.bounds(),
            BoundsReport::Known(Bounds::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0))
        );
        assert_eq!(source.borrow().executions(), 1);

        // Parameter change seen by the next query alone
        source.borrow_mut().set_shape(Shape::Cube { size: 4.0 });
        assert_eq!(actor.bounds().known().unwrap().x_range(), [-2.0, 2.0]);
        assert_eq!(source.borrow().executions(), 2);
    }

    #[test]
    #[should_panic]
    fn test_redraw_mtime_panics_on_borrowed_mapper() {
        let clock = Clock::new();
        let (actor, fake) = actor_with(&clock, UNIT);
        let _guard = fake.borrow_mut();
        let _ = actor.redraw_mtime();
    }

    #[test]
    #[should_panic]
    fn test_bounds_panics_on_borrowed_mapper() {
        let clock = Clock::new();
        let (mut actor, fake) = actor_with(&clock, UNIT);
        let _guard = fake.borrow();
        let _ = actor.bounds();
    }

    // -------------------------------------------------------------------------
    // Misc
    // -------------------------------------------------------------------------

    #[test]
    fn test_actors_is_self() {
        let clock = Clock::new();
        let actor = Actor::new(&clock);
        let actors = actor.actors();
        assert_eq!(actors.len(), 1);
        assert!(std::ptr::eq(&actors[0], &actor));
    }

    #[test]
    fn test_supports_selection() {
        let clock = Clock::new();
        let mut actor = Actor::new(&clock);
        assert!(!actor.supports_selection());

        let (with_mapper, _fake) = actor_with(&clock, UNIT);
        assert!(with_mapper.supports_selection());

        actor.set_mapper(Some(MeshMapper::new(&clock).into_shared()));
        assert!(actor.supports_selection());
    }

    #[test]
    fn test_texture_list() {
        let clock = Clock::new();
        let mut actor = Actor::new(&clock);
        let texture: SharedTexture = ImageTexture::white().into_shared();

        actor.add_texture(texture.clone());
        let stamp = actor.mtime();
        actor.add_texture(texture.clone());
        assert_eq!(actor.textures().len(), 1);
        assert_eq!(actor.mtime(), stamp);
        assert!(actor.has_texture(&texture));

        actor.remove_all_textures();
        assert!(actor.textures().is_empty());
        assert!(!actor.remove_texture(&texture));
    }

    // -------------------------------------------------------------------------
    // Resource release
    // -------------------------------------------------------------------------

    #[test]
    fn test_release_reaches_everyone_despite_failure() {
        let clock = Clock::new();
        let ctx = RenderContext::new(9);
        let (mut actor, fake) = actor_with(&clock, UNIT);
        fake.borrow_mut().fail_release = true;

        let mut front = Property::new(&clock);
        front.mark_resident(ctx);
        let mut back = Property::new(&clock);
        back.mark_resident(ctx);
        actor.set_property(Some(front));
        actor.set_backface_property(Some(back));

        let texture = ImageTexture::white().into_shared();
        texture.borrow_mut().mark_resident(ctx);
        actor.add_texture(texture.clone());

        actor.release_graphics_resources(&ctx);

        assert_eq!(fake.borrow().releases, 1);
        assert_eq!(actor.property().release_requests(), 1);
        assert_eq!(actor.backface_property().unwrap().release_requests(), 1);
        assert_eq!(texture.borrow().release_requests(), 1);
        assert!(!actor.property().is_resident(&ctx));
        assert!(!actor.backface_property().unwrap().is_resident(&ctx));
        assert!(!texture.borrow().is_resident(&ctx));
    }

    #[test]
    fn test_release_twice_reaches_everyone_twice() {
        let clock = Clock::new();
        let ctx = RenderContext::new(2);
        let (mut actor, fake) = actor_with(&clock, UNIT);
        actor.set_property(Some(Property::new(&clock)));
        actor.set_backface_property(Some(Property::new(&clock)));

        actor.release_graphics_resources(&ctx);
        actor.release_graphics_resources(&ctx);

        assert_eq!(fake.borrow().releases, 2);
        assert_eq!(actor.property().release_requests(), 2);
        assert_eq!(actor.backface_property().unwrap().release_requests(), 2);
    }

    #[test]
    fn test_release_busy_mapper_does_not_block_others() {
        let clock = Clock::new();
        let ctx = RenderContext::new(1);
        let (mut actor, fake) = actor_with(&clock, UNIT);
        let mut property = Property::new(&clock);
        property.mark_resident(ctx);
        actor.set_property(Some(property));

        let guard = fake.borrow_mut();
        actor.release_graphics_resources(&ctx);
        drop(guard);

        assert_eq!(fake.borrow().releases, 0);
        assert_eq!(actor.property().release_requests(), 1);
        assert!(!actor.property().is_resident(&ctx));
    }

    #[test]
    fn test_release_without_collaborators() {
        let clock = Clock::new();
        let mut actor = Actor::new(&clock);
        actor.release_graphics_resources(&RenderContext::new(1));
        assert!(actor.existing_property().is_none());
    }
}
