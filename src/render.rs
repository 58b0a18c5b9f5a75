use log::info;

use crate::tuple::Tuple4D;
use crate::ray::Ray4D;
use crate::canvas::Canvas;
use crate::world::World;
use crate::config::RenderConfig;

/// Renders `world` with parallel rays looking down the -Z axis.
///
/// One ray is cast per pixel, from `radius * 3` in front of the origin. Pixel
/// `(x, y)` on the canvas sees world coordinates `(x - inset, y - inset)`, so
/// the origin lands in the center. Pixels whose ray hits nothing stay black.
pub fn render_orthographic(world: &World, config: &RenderConfig) -> Canvas {
    let inset = config.inset().floor() as i64;
    let side = (2 * inset).max(0) as usize;
    let mut canvas = Canvas::new(side, side);

    info!("rendering {}x{} canvas, {} objects", side, side, world.objects.len());

    let direction = Tuple4D::vector(0.0, 0.0, -1.0);
    let mut hits = 0usize;
    for y in -inset..inset {
        for x in -inset..inset {
            let origin = Tuple4D::point(x as f64, y as f64, config.radius * 3.0);
            let r = Ray4D::new(origin, direction);

            if let Some(color) = world.color_at(&r) {
                canvas.write_pixel((x + inset) as usize, (y + inset) as usize, &color);
                hits += 1;
            }
        }
    }

    info!("{} of {} pixels hit", hits, side * side);
    canvas
}

#[cfg(test)]
use crate::color::Color;
#[cfg(test)]
use crate::config::{ LightDescription, Primitive, ShapeDescription, TransformStep };

#[cfg(test)]
fn small_config() -> RenderConfig {
    RenderConfig {
        padding: 2.0,
        radius: 4.0,
        light: LightDescription { intensity: Color::white(), position: [0.0, 0.0, 100.0] },
        shapes: vec![ShapeDescription::Sphere(Primitive {
            transform: vec![TransformStep::Scale { x: 4.0, y: 4.0, z: 4.0 }],
            ..Default::default()
        })],
    }
}

#[test]
fn canvas_is_padded_square() {
    let config = small_config();
    let canvas = render_orthographic(&config.build_world().unwrap(), &config);

    assert_eq!(canvas.width, 12);
    assert_eq!(canvas.height, 12);
}

#[test]
fn sphere_covers_center_not_corners() {
    let config = small_config();
    let canvas = render_orthographic(&config.build_world().unwrap(), &config);

    assert_eq!(canvas.pixel_at(0, 0), Some(Color::black()));
    assert_eq!(canvas.pixel_at(11, 11), Some(Color::black()));

    // Dead center faces the light head-on.
    assert_eq!(canvas.pixel_at(6, 6), Some(Color::rgb(1.9, 1.9, 1.9)));
}

#[test]
fn default_scene_renders() {
    let config = RenderConfig::default();
    let canvas = render_orthographic(&config.build_world().unwrap(), &config);

    assert_eq!(canvas.width, 240);
    assert_ne!(canvas.pixel_at(120, 120), Some(Color::black()));
    assert_eq!(canvas.pixel_at(0, 0), Some(Color::black()));
}
