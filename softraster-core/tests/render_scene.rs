use approx::assert_relative_eq;
use softraster_core::{Color, ColorBuffer, Mesh, RenderConfig, RenderContext, Texture, Vertex};

const CLEAR: Color = Color::new(40, 45, 60);

/// Camera at the origin looking down -z with a 90 degree frustum from 1 to 3,
/// so view depth -2 lands at NDC depth 0.5 and x,y in [-1.2, 1.2] spans
/// pixels 2..8 of a 10x10 target
fn scene_config() -> RenderConfig {
    let mut config = RenderConfig {
        width: 10,
        height: 10,
        background: CLEAR,
        flip_y: false,
        ..RenderConfig::default()
    };
    config.camera.eye = [0.0, 0.0, 0.0];
    config.camera.center = [0.0, 0.0, -1.0];
    config.camera.up = [0.0, 1.0, 0.0];
    config.camera.fov = 90.0;
    config.camera.near = 1.0;
    config.camera.far = 3.0;
    config
}

fn triangle_mesh(triangles: &[(f32, f32)]) -> Mesh {
    // (z, u) per triangle; every vertex of a triangle shares the same UV
    let mut mesh = Mesh::new();
    for &(z, u) in triangles {
        mesh.add_triangle(
            Vertex::new(-1.2, -1.2, z, u, 0.5),
            Vertex::new(1.2, -1.2, z, u, 0.5),
            Vertex::new(-1.2, 1.2, z, u, 0.5),
        );
    }
    mesh
}

#[test]
fn test_single_triangle_end_to_end() {
    let texture = Texture::solid(Color::new(200, 120, 10));
    let mut context = RenderContext::new(scene_config(), triangle_mesh(&[(-2.0, 0.5)]), texture);
    let mut color = ColorBuffer::new(10, 10, Color::BLACK);

    context.begin_frame(&mut color);
    let stats = context.draw(&mut color);
    assert_eq!(stats.triangles, 1);
    assert_eq!(stats.drawn, 1);

    let depth = context.depth_buffer();
    for y in 0..10 {
        for x in 0..10 {
            let in_box = (2..8).contains(&x) && (2..8).contains(&y);
            if in_box && x + y <= 8 {
                assert_eq!(color.get(x, y), Some(Color::new(200, 120, 10)), "({x}, {y})");
                assert_relative_eq!(depth.get(x, y).unwrap(), 0.5, epsilon = 1e-4);
            } else if !in_box || x + y >= 10 {
                assert_eq!(color.get(x, y), Some(CLEAR), "({x}, {y})");
                assert_eq!(depth.get(x, y), Some(f32::INFINITY), "({x}, {y})");
            }
        }
    }

    context.end_frame();
    assert!(context
        .depth_buffer()
        .as_slice()
        .iter()
        .all(|d| *d == f32::INFINITY));
}

#[test]
fn test_nearer_triangle_wins_in_either_order() {
    // Left texel red, right texel blue
    let texture = Texture::new(2, 1, vec![Color::RED, Color::BLUE]).unwrap();
    let near = (-1.5, 0.25);
    let far = (-2.5, 0.75);

    let mut results = Vec::new();
    for order in [[near, far], [far, near]] {
        let mut context =
            RenderContext::new(scene_config(), triangle_mesh(&order), texture.clone());
        let mut color = ColorBuffer::new(10, 10, Color::BLACK);

        let stats = context.render(&mut color);
        assert_eq!(stats.drawn, 2);
        assert_eq!(color.get(3, 3), Some(Color::RED));
        results.push(color);
    }

    assert_eq!(results[0], results[1]);
}

#[test]
fn test_rendering_twice_is_identical() {
    let texture = Texture::checkerboard(4, 4, Color::WHITE, Color::BLACK);
    let mesh = Mesh::cube(1.0);
    let mut config = RenderConfig {
        width: 64,
        height: 48,
        ..RenderConfig::default()
    };
    config.camera.eye = [1.5, 1.2, 2.5];
    config.camera.center = [0.0, 0.0, 0.0];

    let mut context = RenderContext::new(config, mesh, texture);
    let mut first = ColorBuffer::new(64, 48, Color::BLACK);
    let mut second = ColorBuffer::new(64, 48, Color::BLACK);

    let stats = context.render(&mut first);
    context.render(&mut second);

    assert!(stats.pixels > 0);
    assert_eq!(first, second);
}
