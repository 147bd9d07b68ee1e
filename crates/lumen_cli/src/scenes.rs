//! Demo scene catalogue.

use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use lumen_renderer::sampling::{gen_f32, gen_range_f32, random_vector};
use lumen_renderer::{
    Background, Bvh, Camera, CheckerTexture, Color, ConstantMedium, Cuboid, Dielectric,
    DiffuseLight, Hittable, HittableList, ImageTexture, Lambertian, Material, Metal,
    NoiseTexture, Quad, RotateY, Sphere, Translate, Vec3,
};
use rand::RngCore;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneKind {
    /// Grid of small bouncing spheres on a checker floor
    RandomSpheres,
    CheckeredSpheres,
    /// Image-textured globe
    Earth,
    PerlinSpheres,
    Quads,
    SimpleLight,
    CornellBox,
    CornellSmoke,
    /// Everything at once
    Final,
}

/// A world plus the camera that frames it.
pub struct Scene {
    pub world: Box<dyn Hittable>,
    pub camera: Camera,
}

pub fn build(kind: SceneKind, texture: &Path, rng: &mut dyn RngCore) -> Scene {
    log::info!("Building scene {:?}", kind);
    match kind {
        SceneKind::RandomSpheres => random_spheres(rng),
        SceneKind::CheckeredSpheres => checkered_spheres(),
        SceneKind::Earth => earth(texture),
        SceneKind::PerlinSpheres => perlin_spheres(rng),
        SceneKind::Quads => quads(),
        SceneKind::SimpleLight => simple_light(rng),
        SceneKind::CornellBox => cornell_box(),
        SceneKind::CornellSmoke => cornell_smoke(),
        SceneKind::Final => final_scene(texture, rng),
    }
}

fn lambertian(r: f32, g: f32, b: f32) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(Color::new(r, g, b)))
}

fn light(intensity: f32) -> Arc<dyn Material> {
    Arc::new(DiffuseLight::new(Color::splat(intensity)))
}

/// Wide-angle view used by the outdoor scenes.
fn outdoor_camera(look_from: Vec3, look_at: Vec3) -> Camera {
    Camera::new()
        .with_aspect_ratio(400, 16.0 / 9.0)
        .with_quality(100, 50)
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
        .with_background(Background::SkyGradient)
}

fn random_spheres(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();

    let checker = Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::with_texture(checker)),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(a as f32 + 0.9 * gen_f32(rng), 0.2, b as f32 + 0.9 * gen_f32(rng));

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = random_vector(rng, 0.0, 1.0) * random_vector(rng, 0.0, 1.0);
                let center1 = center + Vec3::new(0.0, gen_range_f32(rng, 0.0, 0.5), 0.0);
                world.add(Box::new(Sphere::moving(center, center1, 0.2, Arc::new(Lambertian::new(albedo)))));
            } else if choose_mat < 0.95 {
                let albedo = random_vector(rng, 0.5, 1.0);
                let fuzz = gen_range_f32(rng, 0.0, 0.5);
                world.add(Box::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz)))));
            } else {
                world.add(Box::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))));
            }
        }
    }

    world.add(Box::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5)))));
    world.add(Box::new(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, lambertian(0.4, 0.2, 0.1))));
    world.add(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let camera = outdoor_camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO).with_lens(20.0, 0.6, 10.0);

    Scene {
        world: Box::new(Bvh::new(world, rng)),
        camera,
    }
}

fn checkered_spheres() -> Scene {
    let checker = Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    let material: Arc<dyn Material> = Arc::new(Lambertian::with_texture(checker));

    let mut world = HittableList::new();
    world.add(Box::new(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, material.clone())));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, material)));

    Scene {
        world: Box::new(world),
        camera: outdoor_camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO),
    }
}

fn earth(texture: &Path) -> Scene {
    let surface = Arc::new(Lambertian::with_texture(Arc::new(ImageTexture::open(texture))));
    let globe = Sphere::new(Vec3::ZERO, 2.0, surface);

    Scene {
        world: Box::new(globe),
        camera: outdoor_camera(Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO),
    }
}

fn perlin_spheres(rng: &mut dyn RngCore) -> Scene {
    let noise: Arc<dyn Material> =
        Arc::new(Lambertian::with_texture(Arc::new(NoiseTexture::new(4.0, rng))));

    let mut world = HittableList::new();
    world.add(Box::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, noise.clone())));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, noise)));

    Scene {
        world: Box::new(world),
        camera: outdoor_camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO),
    }
}

fn quads() -> Scene {
    let mut world = HittableList::new();

    let patches = [
        // left red
        (Vec3::new(-3.0, -2.0, 5.0), Vec3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 4.0, 0.0), lambertian(1.0, 0.2, 0.2)),
        // back green
        (Vec3::new(-2.0, -2.0, 0.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 4.0, 0.0), lambertian(0.2, 1.0, 0.2)),
        // right blue
        (Vec3::new(3.0, -2.0, 1.0), Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 4.0, 0.0), lambertian(0.2, 0.2, 1.0)),
        // upper orange
        (Vec3::new(-2.0, 3.0, 1.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 4.0), lambertian(1.0, 0.5, 0.0)),
        // lower teal
        (Vec3::new(-2.0, -3.0, 5.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -4.0), lambertian(0.2, 0.8, 0.8)),
    ];
    for (q, u, v, material) in patches {
        world.add(Box::new(Quad::new(q, u, v, material)));
    }

    let camera = Camera::new()
        .with_resolution(400, 400)
        .with_quality(100, 50)
        .with_position(Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0, 10.0)
        .with_background(Background::SkyGradient);

    Scene {
        world: Box::new(world),
        camera,
    }
}

fn simple_light(rng: &mut dyn RngCore) -> Scene {
    let noise: Arc<dyn Material> =
        Arc::new(Lambertian::with_texture(Arc::new(NoiseTexture::new(4.0, rng))));

    let mut world = HittableList::new();
    world.add(Box::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, noise.clone())));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, noise)));

    world.add(Box::new(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, light(4.0))));
    world.add(Box::new(Quad::new(
        Vec3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        light(4.0),
    )));

    let camera = outdoor_camera(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0))
        .with_background(Background::Solid(Color::ZERO));

    Scene {
        world: Box::new(world),
        camera,
    }
}

/// Five walls of the 555-unit box, without the light.
fn cornell_walls(world: &mut HittableList) {
    let red = lambertian(0.65, 0.05, 0.05);
    let white = lambertian(0.73, 0.73, 0.73);
    let green = lambertian(0.12, 0.45, 0.15);

    let walls = [
        (Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), green),
        (Vec3::ZERO, Vec3::new(0.0, 555.0, 0.0), Vec3::new(0.0, 0.0, 555.0), red),
        (Vec3::ZERO, Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 555.0), white.clone()),
        (Vec3::splat(555.0), Vec3::new(-555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -555.0), white.clone()),
        (Vec3::new(0.0, 0.0, 555.0), Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), white),
    ];
    for (q, u, v, material) in walls {
        world.add(Box::new(Quad::new(q, u, v, material)));
    }
}

/// The two rotated boxes standing in the Cornell box.
fn cornell_blocks() -> [Box<dyn Hittable>; 2] {
    let white = lambertian(0.73, 0.73, 0.73);

    let tall = Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone());
    let tall = Translate::new(Box::new(RotateY::new(Box::new(tall), 15.0)), Vec3::new(265.0, 0.0, 295.0));

    let short = Cuboid::new(Vec3::ZERO, Vec3::splat(165.0), white);
    let short = Translate::new(Box::new(RotateY::new(Box::new(short), -18.0)), Vec3::new(130.0, 0.0, 65.0));

    [Box::new(tall), Box::new(short)]
}

fn cornell_camera() -> Camera {
    Camera::new()
        .with_resolution(600, 600)
        .with_quality(200, 50)
        .with_position(Vec3::new(278.0, 278.0, -800.0), Vec3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0)
        .with_background(Background::Solid(Color::ZERO))
}

fn cornell_box() -> Scene {
    let mut world = HittableList::new();
    cornell_walls(&mut world);
    world.add(Box::new(Quad::new(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light(15.0),
    )));
    for block in cornell_blocks() {
        world.add(block);
    }

    Scene {
        world: Box::new(world),
        camera: cornell_camera(),
    }
}

fn cornell_smoke() -> Scene {
    let mut world = HittableList::new();
    cornell_walls(&mut world);
    world.add(Box::new(Quad::new(
        Vec3::new(113.0, 554.0, 127.0),
        Vec3::new(330.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 305.0),
        light(7.0),
    )));

    let [tall, short] = cornell_blocks();
    world.add(Box::new(ConstantMedium::new(tall, 0.01, Color::ZERO)));
    world.add(Box::new(ConstantMedium::new(short, 0.01, Color::ONE)));

    Scene {
        world: Box::new(world),
        camera: cornell_camera(),
    }
}

fn final_scene(texture: &Path, rng: &mut dyn RngCore) -> Scene {
    let ground = lambertian(0.48, 0.83, 0.53);
    let mut boxes = HittableList::new();
    let boxes_per_side = 20;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = gen_range_f32(rng, 1.0, 101.0);
            boxes.add(Box::new(Cuboid::new(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            )));
        }
    }

    let mut world = HittableList::new();
    world.add(Box::new(Bvh::new(boxes, rng)));

    world.add(Box::new(Quad::new(
        Vec3::new(123.0, 554.0, 147.0),
        Vec3::new(300.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 265.0),
        light(7.0),
    )));

    let center0 = Vec3::new(400.0, 400.0, 200.0);
    let center1 = center0 + Vec3::new(30.0, 0.0, 0.0);
    world.add(Box::new(Sphere::moving(center0, center1, 50.0, lambertian(0.7, 0.3, 0.1))));

    world.add(Box::new(Sphere::new(Vec3::new(260.0, 150.0, 45.0), 50.0, Arc::new(Dielectric::new(1.5)))));
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    )));

    // Glass ball filled with blue haze
    let glass_ball = || Sphere::new(Vec3::new(360.0, 150.0, 145.0), 70.0, Arc::new(Dielectric::new(1.5)));
    world.add(Box::new(glass_ball()));
    world.add(Box::new(ConstantMedium::new(Box::new(glass_ball()), 0.2, Color::new(0.2, 0.4, 0.9))));

    // Thin mist over everything
    let mist_boundary = Sphere::new(Vec3::ZERO, 5000.0, Arc::new(Dielectric::new(1.5)));
    world.add(Box::new(ConstantMedium::new(Box::new(mist_boundary), 0.0001, Color::ONE)));

    let earth_surface = Arc::new(Lambertian::with_texture(Arc::new(ImageTexture::open(texture))));
    world.add(Box::new(Sphere::new(Vec3::new(400.0, 200.0, 400.0), 100.0, earth_surface)));

    let marble = Arc::new(Lambertian::with_texture(Arc::new(NoiseTexture::new(0.2, rng))));
    world.add(Box::new(Sphere::new(Vec3::new(220.0, 280.0, 300.0), 80.0, marble)));

    let white = lambertian(0.73, 0.73, 0.73);
    let mut cluster = HittableList::new();
    for _ in 0..1000 {
        cluster.add(Box::new(Sphere::new(random_vector(rng, 0.0, 165.0), 10.0, white.clone())));
    }
    let cluster = Bvh::new(cluster, rng);
    world.add(Box::new(Translate::new(
        Box::new(RotateY::new(Box::new(cluster), 15.0)),
        Vec3::new(-100.0, 270.0, 395.0),
    )));

    let camera = Camera::new()
        .with_resolution(400, 400)
        .with_quality(250, 4)
        .with_position(Vec3::new(478.0, 278.0, -600.0), Vec3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0)
        .with_background(Background::Solid(Color::ZERO));

    Scene {
        world: Box::new(world),
        camera,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_renderer::{render, CameraState, RenderConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn missing_texture() -> &'static Path {
        Path::new("/nonexistent/earthmap.jpg")
    }

    #[test]
    fn test_every_scene_builds() {
        for kind in SceneKind::value_variants() {
            let mut rng = StdRng::seed_from_u64(0);
            let mut scene = build(*kind, missing_texture(), &mut rng);

            let bbox = scene.world.bounding_box();
            assert!(bbox.x.size() > 0.0, "{kind:?} has an empty world");

            scene.camera.initialize();
            assert_eq!(scene.camera.state(), CameraState::Initialized);
        }
    }

    #[test]
    fn test_scene_generation_is_seeded() {
        let bbox = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            build(SceneKind::RandomSpheres, missing_texture(), &mut rng).world.bounding_box()
        };
        assert_eq!(bbox(4), bbox(4));
    }

    #[test]
    fn test_small_cornell_render() {
        let mut rng = StdRng::seed_from_u64(0);
        let Scene { world, camera } = build(SceneKind::CornellBox, missing_texture(), &mut rng);
        let mut camera = camera.with_resolution(12, 12).with_quality(2, 3);

        let image = render(&mut camera, world.as_ref(), &RenderConfig::default());
        assert_eq!(image.pixels.len(), 144);
        assert!(image.pixels.iter().all(|p| p >> 24 == 0xFF));
    }
}
