//! Demo driving a few actors through simulated frames

use scene_actor::prelude::*;

/// A drawn actor and the redraw time it was last drawn at
struct Slot {
    name: &'static str,
    actor: Actor,
    drawn_at: TimeStamp,
}

impl Slot {
    fn new(name: &'static str, actor: Actor) -> Self {
        Self {
            name,
            actor,
            drawn_at: TimeStamp::ZERO,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading actor config from {path}");
            ActorConfig::load(&path)?
        }
        None => ActorConfig::default(),
    };

    let clock = Clock::new();

    // One sphere mapper drawn twice
    let sphere = ParametricSource::sphere(&clock, 1.0).into_shared();
    let sphere_mapper: SharedMapper = MeshMapper::with_input(&clock, sphere.clone()).into_shared();

    let mut left = Actor::with_config(&clock, config.clone());
    left.set_mapper(Some(sphere_mapper.clone()));
    left.prop3d_mut().set_position(DVec3::new(-2.0, 0.0, 0.0));

    let mut right = Actor::with_config(&clock, config.clone());
    right.set_mapper(Some(sphere_mapper));
    right.prop3d_mut().set_position(DVec3::new(2.0, 0.0, 0.0));
    right.property().set_color(Vec3::new(0.2, 0.4, 1.0));

    let cube = ParametricSource::cube(&clock, 1.5).into_shared();
    let mut glass = Actor::with_config(&clock, config);
    glass.set_mapper(Some(MeshMapper::with_input(&clock, cube).into_shared()));
    glass.set_property(Some(Property::from_config(
        &clock,
        PropertyConfig::translucent(Vec3::new(0.8, 0.9, 1.0), 0.35),
    )));
    glass.add_texture(ImageTexture::white().into_shared());

    let mut scene = vec![
        Slot::new("left sphere", left),
        Slot::new("right sphere", right),
        Slot::new("glass cube", glass),
    ];

    for frame in 0..4 {
        match frame {
            1 => scene[0].actor.prop3d_mut().add_position(DVec3::new(0.0, 1.0, 0.0)),
            2 => sphere.borrow_mut().set_shape(Shape::Sphere {
                radius: 1.5,
                segments: 24,
                rings: 12,
            }),
            3 => scene[2].actor.prop3d_mut().rotate_y(45.0),
            _ => {}
        }
        render_frame(frame, &mut scene);
    }

    let context = RenderContext::new(0);
    for slot in &mut scene {
        slot.actor.release_graphics_resources(&context);
    }
    log::info!("Released resources in context {}", context.id());

    Ok(())
}

/// Walk the scene the way a renderer would: pipeline first, then bounds and
/// pass selection.
fn render_frame(frame: u32, scene: &mut [Slot]) {
    let mut world = Bounds::EMPTY;
    let mut redrawn = 0;

    for slot in scene.iter_mut() {
        let redraw = slot.actor.redraw_mtime();
        let changed = redraw > slot.drawn_at;
        if changed {
            slot.drawn_at = redraw;
            redrawn += 1;
        }

        let bounds = slot.actor.bounds();
        let pass = if slot.actor.has_translucent_polygonal_geometry() {
            "translucent"
        } else {
            "opaque"
        };
        if let Some(b) = bounds.known() {
            world = world.union(&b);
        }
        log::debug!(
            "frame {frame}: {} bounds={:?} pass={pass} changed={changed}",
            slot.name,
            bounds.as_slice()
        );
    }

    log::info!(
        "frame {frame}: redrew {redrawn}/{} actors, scene extent {:.3}",
        scene.len(),
        world.diagonal_length()
    );
}
