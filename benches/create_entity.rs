use archec::{Component, World};
use criterion::*;

#[derive(Component, Clone, Copy)]
#[component(uuid = "9d0b3c2a-1e4f-4a6b-8c7d-5e6f7a8b9c01")]
struct CompA(u64);

#[derive(Component, Clone, Copy)]
#[component(uuid = "9d0b3c2a-1e4f-4a6b-8c7d-5e6f7a8b9c02")]
struct CompB(u64);

#[derive(Component, Clone, Copy)]
#[component(uuid = "9d0b3c2a-1e4f-4a6b-8c7d-5e6f7a8b9c03")]
struct CompC(u64);

#[derive(Component, Clone, Copy)]
#[component(uuid = "9d0b3c2a-1e4f-4a6b-8c7d-5e6f7a8b9c04")]
struct CompD(u64);

fn create_entity(c: &mut Criterion) {
    let mut group = c.benchmark_group("create entity");

    macro_rules! create_entity_batch {
        ($num_comps:literal; $($comps:expr),* $(,)?) => {
            for log_entities in (0..=12).step_by(4) {
                let entities = 1u64 << log_entities;
                group.throughput(Throughput::Elements(entities));
                group.bench_with_input(
                    BenchmarkId::new(
                        format!("{} components", $num_comps),
                        format!("{entities} entities"),
                    ),
                    &entities,
                    |b, &entities| {
                        b.iter_batched(
                            World::new,
                            |mut world| {
                                for _ in 0..entities {
                                    world.spawn(($($comps),*,));
                                }
                            },
                            BatchSize::SmallInput,
                        );
                    },
                );
            }
        }
    }

    create_entity_batch!(1; CompA(1));
    create_entity_batch!(2; CompA(1), CompB(2));
    create_entity_batch!(4; CompA(1), CompB(2), CompC(3), CompD(4));
}

fn create_entity_batched(c: &mut Criterion) {
    let mut group = c.benchmark_group("create entity (spawn_batch)");

    for log_entities in (4..=12).step_by(4) {
        let entities = 1u64 << log_entities;
        group.throughput(Throughput::Elements(entities));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{entities} entities")),
            &entities,
            |b, &entities| {
                b.iter_batched(
                    World::new,
                    |mut world| {
                        world
                            .spawn_batch((0..entities).map(|i| (CompA(i), CompB(i * 2))))
                            .for_each(drop);
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }
}

criterion_group!(benches, create_entity, create_entity_batched);
criterion_main!(benches);
