use bevy_displacement_field::cpu::field::DisplacementField;
use bevy_displacement_field::cpu::pointer::PointerState;
use bevy_displacement_field::params::SimulationParameters;
use criterion::{Criterion, criterion_group, criterion_main};
use glam::Vec2;

fn bench_update(c: &mut Criterion) {
    for resolution in [30, 200] {
        let params = SimulationParameters { resolution, ..Default::default() };
        let mut field = DisplacementField::new(resolution);
        let mut pointer = PointerState::new(Vec2::splat(0.5));

        c.bench_function(&format!("update_{resolution}x{resolution}"), |b| {
            b.iter(|| {
                pointer.vel = Vec2::new(0.01, -0.005); // keep injecting
                field.update(&mut pointer, &params, 9.0 / 16.0);
            })
        });
    }
}

criterion_group!(benches, bench_update);
criterion_main!(benches);
