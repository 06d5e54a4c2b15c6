use collisions::{time_to_collision, CollisionGroups, EntityId};
use common::shapes::Shape;
use common::vec2;
use fxhash::FxHashSet;
use quadtree::{
    pair_key, CheckContext, Config, Entity, InvariantViolation, PairFilter, QuadTree,
    QuadtreeError,
};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn small_tree(half_length: f64, leaf_capacity: usize) -> QuadTree {
    QuadTree::new_with_config(Config {
        half_length,
        leaf_capacity,
        ..Config::default()
    })
    .unwrap()
}

fn random_circle(rng: &mut StdRng, extent: f64, speed: f64) -> Entity {
    let shape = Shape::circle(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(0.5..3.0),
    )
    .unwrap()
    .with_velocity(rng.gen_range(-speed..speed), rng.gen_range(-speed..speed));
    Entity::new(shape)
}

fn random_box(rng: &mut StdRng, extent: f64, speed: f64) -> Entity {
    let shape = Shape::aabb(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(0.5..3.0),
        rng.gen_range(0.5..3.0),
    )
    .unwrap()
    .with_velocity(rng.gen_range(-speed..speed), rng.gen_range(-speed..speed));
    Entity::new(shape)
}

/// Earliest time of impact over every pair, checked without the tree.
fn brute_force_earliest(tree: &QuadTree, time_left: f64) -> Option<f64> {
    let entities: Vec<(EntityId, &Entity)> = tree.entities().collect();
    let mut earliest: Option<f64> = None;
    for (i, (_, a)) in entities.iter().enumerate() {
        for (_, b) in &entities[i + 1..] {
            if let Some(impact) = time_to_collision(a.shape(), b.shape(), time_left) {
                earliest = Some(earliest.map_or(impact.time, |t: f64| t.min(impact.time)));
            }
        }
    }
    earliest
}

fn assert_same_time(tree_time: Option<f64>, brute_time: Option<f64>) {
    match (tree_time, brute_time) {
        (Some(a), Some(b)) => assert!((a - b).abs() < 1e-9, "tree {} vs brute force {}", a, b),
        (None, None) => {}
        other => panic!("tree and brute force disagree: {:?}", other),
    }
}

#[test]
fn test_new_rejects_invalid_config() {
    let result = QuadTree::new_with_config(Config {
        leaf_capacity: 0,
        ..Config::default()
    });
    assert!(matches!(
        result,
        Err(QuadtreeError::InvalidLeafCapacity { capacity: 0 })
    ));

    let result = QuadTree::new(0.0, 0.0, -1.0);
    assert!(matches!(result, Err(QuadtreeError::InvalidRegion { .. })));

    let result = QuadTree::new_with_config(Config {
        min_half_length: 0.0,
        ..Config::default()
    });
    assert!(matches!(
        result,
        Err(QuadtreeError::InvalidMinHalfLength { .. })
    ));
}

#[test]
fn test_add_rejects_non_finite_entity() {
    let mut tree = QuadTree::new(0.0, 0.0, 100.0).unwrap();
    let shape = Shape::circle(0.0, 0.0, 1.0)
        .unwrap()
        .with_velocity(f64::NAN, 0.0);
    assert_eq!(
        tree.add_entity(Entity::new(shape)),
        Err(QuadtreeError::NonFiniteEntity)
    );
    assert!(tree.is_empty());
}

#[test]
fn test_remove_unknown_entity() {
    let mut tree = QuadTree::new(0.0, 0.0, 100.0).unwrap();
    let id = tree
        .add_entity(Entity::new(Shape::circle(0.0, 0.0, 1.0).unwrap()))
        .unwrap();
    assert!(tree.remove_entity(id).is_ok());
    assert!(matches!(
        tree.remove_entity(id),
        Err(QuadtreeError::UnknownEntity { .. })
    ));
}

#[test]
fn test_thousand_entities() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut tree = small_tree(512.0, 4);
    for _ in 0..1000 {
        tree.add_entity(random_circle(&mut rng, 480.0, 0.0)).unwrap();
    }

    assert_eq!(tree.len(), 1000);
    let mut views = Vec::new();
    tree.node_views(&mut views);
    assert_eq!(views[0].id, tree.root());
    assert_eq!(views[0].depth, 0);
    assert_eq!(views[0].entity_count, 1000);
    assert_eq!(views.iter().map(|view| view.bucket_len).sum::<usize>(), 1000);
    assert_eq!(views.len(), tree.node_count());

    tree.check_invariants().unwrap();
    tree.check_tight_placement().unwrap();
    // 512 halves down to the 1.0 floor in nine steps.
    assert!(tree.depth() <= 10, "depth {}", tree.depth());
    assert!(tree.depth() >= 2);
}

#[test]
fn test_root_grows_toward_far_entity() {
    let mut tree = QuadTree::new(0.0, 0.0, 100.0).unwrap();
    tree.add_entity(Entity::new(Shape::circle(10.0, 10.0, 1.0).unwrap()))
        .unwrap();
    let far = tree
        .add_entity(Entity::new(Shape::circle(5000.0, -20.0, 2.0).unwrap()))
        .unwrap();

    let region = tree.root_region();
    assert!(region.half_width() >= 3200.0);
    assert!(region.contains(tree.entity(far).unwrap().shape().bounds()));
    assert!(region.contains_point(10.0, 10.0));
    tree.check_invariants().unwrap();
}

#[test]
fn test_straddler_stays_in_quad() {
    let mut tree = small_tree(100.0, 1);
    tree.add_entity(Entity::new(Shape::circle(50.0, 50.0, 1.0).unwrap()))
        .unwrap();
    tree.add_entity(Entity::new(Shape::circle(-50.0, -50.0, 1.0).unwrap()))
        .unwrap();
    let straddler = tree
        .add_entity(Entity::new(Shape::aabb(0.0, 30.0, 5.0, 5.0).unwrap()))
        .unwrap();

    assert_eq!(tree.entity(straddler).unwrap().node(), Some(tree.root()));
    assert_eq!(tree.bucket(tree.root()), &[straddler]);
    tree.check_invariants().unwrap();
    tree.check_tight_placement().unwrap();
}

#[test]
fn test_remove_then_resize_collapses_tree() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut tree = small_tree(256.0, 2);
    let ids: Vec<EntityId> = (0..200)
        .map(|_| tree.add_entity(random_circle(&mut rng, 240.0, 0.0)).unwrap())
        .collect();
    assert!(tree.node_count() > 1);

    for id in ids {
        tree.remove_entity(id).unwrap();
        tree.check_invariants().unwrap();
    }
    tree.try_resize();
    assert_eq!(tree.node_count(), 1);
    assert!(tree.pool_free_count() > 0);
    tree.check_invariants().unwrap();

    // Released nodes are handed out again before the pool grows.
    let free_before = tree.pool_free_count();
    for _ in 0..20 {
        tree.add_entity(random_circle(&mut rng, 240.0, 0.0)).unwrap();
    }
    assert!(tree.pool_free_count() < free_before);
    tree.check_invariants().unwrap();
}

#[test]
fn test_containment_pass_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut tree = small_tree(200.0, 3);
    let ids: Vec<EntityId> = (0..300)
        .map(|_| tree.add_entity(random_box(&mut rng, 190.0, 20.0)).unwrap())
        .collect();

    for &id in ids.iter().step_by(3) {
        let position = vec2(rng.gen_range(-400.0..400.0), rng.gen_range(-400.0..400.0));
        tree.entity_mut(id).unwrap().set_position(position);
    }
    let moved = tree.ensure_entities_are_contained(1.0);
    assert!(moved > 0);
    tree.check_invariants().unwrap();
    tree.check_tight_placement().unwrap();

    assert_eq!(tree.ensure_entities_are_contained(1.0), 0);
}

#[test]
fn test_random_operations_keep_invariants() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut tree = small_tree(128.0, 4);
    let mut live: Vec<EntityId> = Vec::new();

    for round in 0..400 {
        match rng.gen_range(0..4) {
            0 | 1 => {
                let entity = if rng.gen_bool(0.5) {
                    random_circle(&mut rng, 150.0, 10.0)
                } else {
                    random_box(&mut rng, 150.0, 10.0)
                };
                live.push(tree.add_entity(entity).unwrap());
            }
            2 if !live.is_empty() => {
                let id = live.swap_remove(rng.gen_range(0..live.len()));
                tree.remove_entity(id).unwrap();
            }
            _ => {
                let dt = rng.gen_range(0.0..2.0);
                tree.update_positions(dt);
                tree.ensure_entities_are_contained(dt);
            }
        }
        if round % 50 == 0 {
            tree.try_resize();
        }
        tree.check_invariants().unwrap();
    }
    assert_eq!(tree.len(), live.len());
}

#[test]
fn test_init_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..10 {
        let mut tree = small_tree(100.0, 4);
        for _ in 0..80 {
            let entity = if rng.gen_bool(0.5) {
                random_circle(&mut rng, 90.0, 15.0)
            } else {
                random_box(&mut rng, 90.0, 15.0)
            };
            tree.add_entity(entity).unwrap();
        }
        let elapsed = 1.0;
        let groups = CollisionGroups::all();
        tree.ensure_entities_are_contained(elapsed);
        tree.init_calc_collisions(PairFilter::new(&groups), elapsed);
        tree.check_invariants().unwrap();

        let tree_time = tree.next_collision().map(|collision| collision.time);
        assert_same_time(tree_time, brute_force_earliest(&tree, elapsed));
    }
}

#[test]
fn test_entity_updated_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(77);
    let mut tree = small_tree(100.0, 4);
    let ids: Vec<EntityId> = (0..120)
        .map(|_| tree.add_entity(random_circle(&mut rng, 90.0, 10.0)).unwrap())
        .collect();
    let elapsed = 2.0;
    let groups = CollisionGroups::all();
    tree.ensure_entities_are_contained(elapsed);
    tree.init_calc_collisions(PairFilter::new(&groups), elapsed);

    for _ in 0..60 {
        let id = ids[rng.gen_range(0..ids.len())];
        let velocity = vec2(rng.gen_range(-40.0..40.0), rng.gen_range(-40.0..40.0));
        tree.entity_mut(id).unwrap().set_velocity(velocity);
        let ctx = CheckContext::new(PairFilter::new(&groups), 0.0, elapsed);
        tree.entity_updated(id, &ctx).unwrap();
        tree.check_invariants().unwrap();

        let tree_time = tree.next_collision().map(|collision| collision.time);
        assert_same_time(tree_time, brute_force_earliest(&tree, elapsed));
    }
}

#[test]
fn test_updates_mid_window_use_absolute_times() {
    let mut tree = QuadTree::new(0.0, 0.0, 100.0).unwrap();
    let a = tree
        .add_entity(Entity::new(
            Shape::circle(-10.0, 0.0, 1.0).unwrap().with_velocity(1.0, 0.0),
        ))
        .unwrap();
    tree.add_entity(Entity::new(Shape::circle(10.0, 0.0, 1.0).unwrap()))
        .unwrap();
    let groups = CollisionGroups::all();
    tree.ensure_entities_are_contained(20.0);
    tree.init_calc_collisions(PairFilter::new(&groups), 20.0);
    assert_eq!(tree.next_collision().unwrap().time, 18.0);

    // At t = 4 the first circle doubles its speed: 14 units left to close.
    tree.update_positions(4.0);
    tree.entity_mut(a).unwrap().set_velocity(vec2(2.0, 0.0));
    let ctx = CheckContext::new(PairFilter::new(&groups), 4.0, 16.0);
    tree.entity_updated(a, &ctx).unwrap();

    let collision = tree.next_collision().unwrap();
    assert!((collision.time - 11.0).abs() < 1e-12);
    assert!(collision.involves(a));
    tree.check_invariants().unwrap();

    tree.reset_collisions();
    assert!(tree.next_collision().is_none());
    tree.check_invariants().unwrap();
}

#[test]
fn test_remove_during_collision_recomputes_owner() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut tree = small_tree(100.0, 4);
    for _ in 0..100 {
        tree.add_entity(random_circle(&mut rng, 90.0, 20.0)).unwrap();
    }
    let elapsed = 1.0;
    let groups = CollisionGroups::all();
    tree.ensure_entities_are_contained(elapsed);
    tree.init_calc_collisions(PairFilter::new(&groups), elapsed);

    for _ in 0..10 {
        let Some(collision) = tree.next_collision() else {
            break;
        };
        let (a, _) = collision.participants().unwrap();
        let ctx = CheckContext::new(PairFilter::new(&groups), 0.0, elapsed);
        tree.remove_entity_during_collision(a, &ctx).unwrap();
        assert!(!tree.contains(a));
        tree.check_invariants().unwrap();

        let tree_time = tree.next_collision().map(|collision| collision.time);
        assert_same_time(tree_time, brute_force_earliest(&tree, elapsed));
    }
}

#[test]
fn test_filters_skip_pairs() {
    let mut tree = QuadTree::new(0.0, 0.0, 100.0).unwrap();
    let a = tree
        .add_entity(
            Entity::new(Shape::circle(-5.0, 0.0, 1.0).unwrap().with_velocity(1.0, 0.0))
                .with_entity_type(1),
        )
        .unwrap();
    let b = tree
        .add_entity(Entity::new(Shape::circle(5.0, 0.0, 1.0).unwrap()).with_entity_type(2))
        .unwrap();
    tree.ensure_entities_are_contained(10.0);

    let groups = CollisionGroups::none();
    tree.init_calc_collisions(PairFilter::new(&groups), 10.0);
    assert!(tree.next_collision().is_none());

    let groups = CollisionGroups::none().with(1, 2);
    tree.init_calc_collisions(PairFilter::new(&groups), 10.0);
    assert_eq!(tree.next_collision().unwrap().time, 8.0);

    let mut suppressed = FxHashSet::default();
    suppressed.insert(pair_key(b, a));
    tree.init_calc_collisions(PairFilter::new(&groups).with_suppressed(&suppressed), 10.0);
    assert!(tree.next_collision().is_none());
}

#[test]
fn test_clear_restores_root() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut tree = small_tree(64.0, 2);
    for _ in 0..50 {
        tree.add_entity(random_circle(&mut rng, 200.0, 0.0)).unwrap();
    }
    assert!(tree.root_region().half_width() > 64.0);

    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.root_region().half_width(), 64.0);
    tree.check_invariants().unwrap();
}

#[test]
fn test_invariant_violation_messages() {
    let violation = InvariantViolation::CollisionListUnordered;
    assert_eq!(violation.to_string(), "collision list lost its heap order");
}
