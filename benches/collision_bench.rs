use arcade_collision::{
    collision::Aabb,
    math::vec2::Vec2,
    objects::{CollisionEntity, EntityKind, ObstacleKind, ShapeKind},
    world::CollisionEngine,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// --- Helper for populating a scrolling level ---
fn populate_level(engine: &mut CollisionEngine, num_obstacles: usize) {
    engine
        .add_entity(CollisionEntity::player("player", Aabb::from_rect(100.0, 300.0, 40.0, 60.0)))
        .expect("player registers");

    for i in 0..num_obstacles {
        // Spread obstacles along the track with some vertical jitter
        let x = i as f64 * 37.0;
        let y = 200.0 + ((i * 53) % 200) as f64;
        let kind = match i % 4 {
            0 => ObstacleKind::Spike,
            1 => ObstacleKind::Platform,
            2 => ObstacleKind::MovingAerial,
            _ => ObstacleKind::Wall,
        };
        let obstacle = CollisionEntity::obstacle(format!("obstacle-{i}"), kind, ShapeKind::Rectangle, Aabb::from_rect(x, y, 48.0, 24.0))
            .with_velocity(Vec2::new(-120.0, 0.0));
        engine.add_entity(obstacle).expect("obstacle registers");

        if i % 3 == 0 {
            let coin = CollisionEntity::power_up(format!("coin-{i}"), Aabb::from_rect(x + 10.0, y - 40.0, 20.0, 20.0));
            engine.add_entity(coin).expect("coin registers");
        }
    }
}

fn bench_detect_collisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("Detect Collisions");
    for count in [100, 500, 2000] {
        let mut engine = CollisionEngine::default();
        populate_level(&mut engine, count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(engine.detect_collisions()))
        });
    }
    group.finish();
}

fn bench_swept_collisions(c: &mut Criterion) {
    let mut engine = CollisionEngine::default();
    populate_level(&mut engine, 500);
    let dt = 1.0 / 60.0;
    c.bench_function("Swept Collisions 500", |b| b.iter(|| black_box(engine.detect_swept_collisions(black_box(dt)))));
}

fn bench_bounds_updates(c: &mut Criterion) {
    let mut engine = CollisionEngine::default();
    populate_level(&mut engine, 500);
    let handles: Vec<_> = engine.get_entities_by_type(EntityKind::Obstacle).map(|(handle, _)| handle).collect();

    c.bench_function("Scroll 500 Obstacles", |b| {
        let mut offset = 0.0;
        b.iter(|| {
            offset -= 2.0;
            for (i, &handle) in handles.iter().enumerate() {
                let bounds = Aabb::from_rect(i as f64 * 37.0 + offset, 250.0, 48.0, 24.0);
                engine.update_entity_bounds(handle, bounds).expect("handle is live");
            }
        })
    });
}

fn bench_raycast(c: &mut Criterion) {
    let mut engine = CollisionEngine::default();
    populate_level(&mut engine, 2000);
    c.bench_function("Raycast 2000", |b| {
        b.iter(|| {
            black_box(engine.raycast(
                black_box(Vec2::new(0.0, 310.0)),
                Vec2::new(1.0, 0.0),
                5000.0,
                Some(EntityKind::Obstacle),
            ))
        })
    });
}

criterion_group!(benches, bench_detect_collisions, bench_swept_collisions, bench_bounds_updates, bench_raycast);
criterion_main!(benches);
