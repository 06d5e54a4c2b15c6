use collisions::CollisionGroups;
use common::shapes::Shape;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quadtree::{Config, Entity};
use rand::prelude::*;
use simulation::{Contact, World, WorldConfig};

const BALL: u32 = 1;
const WALL: u32 = 2;

fn bounce(contact: &mut Contact) {
    let normal = contact.normal();
    let (a, b) = contact.entities();
    let inverse_sum = a.inverse_mass() + b.inverse_mass();
    let closing = (b.velocity() - a.velocity()).dot(&normal);
    if inverse_sum == 0.0 || closing >= 0.0 {
        return;
    }
    let impulse = -2.0 * closing / inverse_sum;
    a.set_velocity(a.velocity() - normal * (impulse * a.inverse_mass()));
    b.set_velocity(b.velocity() + normal * (impulse * b.inverse_mass()));
}

/// Balls of radius 2 dropped into a walled box, like the classic stress scene.
fn ball_world(balls: usize) -> World {
    let mut rng = StdRng::seed_from_u64(0);
    let (width, height) = (800.0, 600.0);
    let mut world = World::new(WorldConfig {
        tree: Config {
            center_x: width / 2.0,
            center_y: height / 2.0,
            half_length: 512.0,
            ..Config::default()
        },
        ..WorldConfig::default()
    })
    .unwrap();
    world.set_collision_groups(CollisionGroups::none().with(BALL, BALL).with(BALL, WALL));

    let thickness = 5.0;
    for (x, y, half_width, half_height) in [
        (width / 2.0, -thickness, width / 2.0, thickness),
        (width / 2.0, height + thickness, width / 2.0, thickness),
        (-thickness, height / 2.0, thickness, height / 2.0),
        (width + thickness, height / 2.0, thickness, height / 2.0),
    ] {
        let wall = Entity::new(Shape::aabb(x, y, half_width, half_height).unwrap())
            .with_mass(f64::INFINITY)
            .with_entity_type(WALL);
        world.add_entity(wall).unwrap();
    }

    for _ in 0..balls {
        let x = width / 2.0 + (rng.gen::<f64>() - 0.5) * (width - 50.0);
        let y = height / 2.0 + (rng.gen::<f64>() - 0.5) * (height - 100.0);
        let shape = Shape::circle(x, y, 2.0)
            .unwrap()
            .with_velocity(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0));
        world
            .add_entity(Entity::new(shape).with_entity_type(BALL))
            .unwrap();
    }
    world
}

fn advance_benchmark(c: &mut Criterion) {
    let mut world = ball_world(1000);
    c.bench_function("world_advance_1000_balls", |b| {
        b.iter(|| {
            world.advance(black_box(1.0 / 60.0), &mut bounce).unwrap();
        })
    });
}

fn build_benchmark(c: &mut Criterion) {
    c.bench_function("world_build_1000_balls", |b| {
        b.iter(|| black_box(ball_world(1000)))
    });
}

criterion_group!(simulation_benchmarks, advance_benchmark, build_benchmark);
criterion_main!(simulation_benchmarks);
