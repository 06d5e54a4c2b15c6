use collisions::CollisionGroups;
use common::shapes::Shape;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quadtree::{Entity, PairFilter, QuadTree};
use rand::prelude::*;

fn random_entity(rng: &mut StdRng) -> Entity {
    let shape = Shape::aabb(
        rng.gen_range(-95.0..95.0),
        rng.gen_range(-95.0..95.0),
        2.5,
        2.5,
    )
    .unwrap()
    .with_velocity(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
    Entity::new(shape)
}

fn filled_tree(rng: &mut StdRng, count: usize) -> QuadTree {
    let mut quadtree = QuadTree::new(0.0, 0.0, 100.0).unwrap();
    for _ in 0..count {
        quadtree.add_entity(random_entity(rng)).unwrap();
    }
    quadtree
}

fn insert_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let mut quadtree = QuadTree::new(0.0, 0.0, 100.0).unwrap();

    c.bench_function("quadtree_insert", |b| {
        b.iter(|| {
            quadtree
                .add_entity(black_box(random_entity(&mut rng)))
                .unwrap();
        })
    });
}

fn remove_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let mut quadtree = filled_tree(&mut rng, 1000);

    c.bench_function("quadtree_remove_insert", |b| {
        b.iter(|| {
            let ids: Vec<_> = quadtree.entities().map(|(id, _)| id).take(1).collect();
            let entity = quadtree.remove_entity(black_box(ids[0])).unwrap();
            quadtree.add_entity(entity).unwrap();
        })
    });
}

fn containment_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let mut quadtree = filled_tree(&mut rng, 1000);

    c.bench_function("quadtree_ensure_contained", |b| {
        b.iter(|| {
            quadtree.update_positions(0.01);
            quadtree.ensure_entities_are_contained(black_box(0.01));
        })
    });
}

fn init_collisions_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let mut quadtree = filled_tree(&mut rng, 1000);
    let groups = CollisionGroups::all();
    quadtree.ensure_entities_are_contained(1.0);

    c.bench_function("quadtree_init_calc_collisions", |b| {
        b.iter(|| {
            quadtree.init_calc_collisions(PairFilter::new(&groups), black_box(1.0));
            black_box(quadtree.next_collision());
        })
    });
}

criterion_group!(
    quadtree_benchmarks,
    insert_benchmark,
    remove_benchmark,
    containment_benchmark,
    init_collisions_benchmark
);
criterion_main!(quadtree_benchmarks);
