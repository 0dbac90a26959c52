use bevy_displacement_field::cpu::field::DisplacementField;
use bevy_displacement_field::cpu::pointer::{PointerState, normalize_cursor};
use bevy_displacement_field::gpu::ffi::{GPUTexel, pack_texels, texel_bytes};
use bevy_displacement_field::params::{MAX_RESOLUTION, MIN_RESOLUTION};
use bevy_displacement_field::{DisplacementSimulation, FrameInput, ParamError, SimulationParameters, ViewportState};
use glam::{Vec2, Vec4};

fn calm_sim(resolution: usize) -> DisplacementSimulation {
    let params = SimulationParameters { resolution, relaxation: 1.0, ..Default::default() };
    DisplacementSimulation::from_field(DisplacementField::zeroed(resolution), params)
}

fn input(cursor: Option<Vec2>, params: SimulationParameters) -> FrameInput {
    FrameInput { cursor, viewport: ViewportState::new(640.0, 640.0), params }
}

#[test]
fn default_params_are_valid() {
    let p = SimulationParameters::default();
    assert_eq!(p.resolution, 30);
    assert_eq!(p.validate(), Ok(()));
    assert_eq!(p.clamped(), p);
}

#[test]
fn out_of_range_params_are_reported() {
    let p = SimulationParameters { resolution: 1, ..Default::default() };
    assert_eq!(p.validate(), Err(ParamError::Resolution(1)));

    let p = SimulationParameters { relaxation: 1.5, ..Default::default() };
    assert!(matches!(p.validate(), Err(ParamError::OutOfUnitRange { name: "relaxation", .. })));

    let p = SimulationParameters { strength: f32::NAN, ..Default::default() };
    assert!(matches!(p.validate(), Err(ParamError::OutOfUnitRange { name: "strength", .. })));
}

#[test]
fn clamping_bounds_every_field() {
    let p = SimulationParameters {
        resolution: 10_000,
        mouse_factor: -0.5,
        strength: f32::INFINITY,
        relaxation: 3.0,
    }
    .clamped();

    assert_eq!(p.resolution, MAX_RESOLUTION);
    assert_eq!(p.mouse_factor, 0.0);
    assert_eq!(p.strength, SimulationParameters::default().strength);
    assert_eq!(p.relaxation, 1.0);
    assert_eq!(p.validate(), Ok(()));

    let p = SimulationParameters { resolution: 0, ..Default::default() }.clamped();
    assert_eq!(p.resolution, MIN_RESOLUTION);
}

#[test]
fn viewport_aspect() {
    let v = ViewportState::new(800.0, 400.0);
    assert_eq!(v.aspect(), 2.0);
    assert_eq!(v.aspect_correction(), 0.5);
    assert!(ViewportState::new(0.0, 10.0).is_degenerate());
    assert!(ViewportState::new(f32::NAN, 10.0).is_degenerate());
    assert!(!v.is_degenerate());
}

#[test]
fn cursor_normalization() {
    assert_eq!(normalize_cursor(Vec2::new(200.0, 50.0), Vec2::new(400.0, 100.0)), Some(Vec2::new(0.5, 0.5)));
    assert_eq!(normalize_cursor(Vec2::new(-20.0, 500.0), Vec2::new(400.0, 100.0)), Some(Vec2::new(0.0, 1.0)));
    assert_eq!(normalize_cursor(Vec2::ONE, Vec2::ZERO), None);

    // window cursor is y-down, so the top edge is y = 0
    assert_eq!(normalize_cursor(Vec2::new(400.0, 0.0), Vec2::new(400.0, 100.0)), Some(Vec2::new(1.0, 0.0)));
}

#[test]
fn pointer_ignores_non_finite_moves() {
    let mut pointer = PointerState::new(Vec2::new(0.2, 0.2));
    pointer.move_to(Vec2::new(0.3, 0.1));
    assert!((pointer.vel - Vec2::new(0.1, -0.1)).length() < 1e-6);

    pointer.move_to(Vec2::new(f32::NAN, 0.5));
    assert_eq!(pointer.pos, Vec2::new(0.3, 0.1));

    pointer.move_to(Vec2::new(2.0, -1.0));
    assert_eq!(pointer.pos, Vec2::new(1.0, 0.0));
}

#[test]
fn first_cursor_does_not_kick() {
    let mut sim = calm_sim(8);
    let params = sim.params;
    sim.step(input(Some(Vec2::new(0.9, 0.9)), params));

    assert_eq!(sim.pointer.vel, Vec2::ZERO);
    assert!(sim.field.cells().iter().all(|c| c.x == 0.0 && c.y == 0.0));
}

#[test]
fn moving_cursor_displaces_and_trails() {
    let mut sim = calm_sim(8);
    let params = sim.params;
    sim.step(input(Some(Vec2::new(0.5, 0.5)), params));
    let frame = sim.step(input(Some(Vec2::new(0.6, 0.5)), params));

    assert!(!frame.reallocated);
    assert_eq!(frame.resolution, 8);
    assert_eq!(frame.texels.len(), 64);
    assert!(!sim.field.is_dirty());

    // rightward motion pushes x positive around the pointer, grid (4.8, 4)
    assert!(sim.field.cell(5, 4).x > 0.0);
    let after_move = sim.pointer.vel.x;
    assert!((after_move - 0.1 * 0.9).abs() < 1e-5);

    // no new motion: the kick keeps decaying
    sim.step(input(None, params));
    assert!((sim.pointer.vel.x - after_move * 0.9).abs() < 1e-6);
}

#[test]
fn resolution_change_reallocates() {
    let mut sim = calm_sim(8);
    let params = SimulationParameters { resolution: 12, ..sim.params };
    let frame = sim.step(input(None, params));

    assert!(frame.reallocated);
    assert_eq!(frame.resolution, 12);
    assert_eq!(frame.texels.len(), 144);
    assert_eq!(sim.field.resolution(), 12);

    let frame = sim.step(input(None, params));
    assert!(!frame.reallocated);
}

#[test]
fn invalid_inputs_never_reach_the_field() {
    let mut sim = calm_sim(6);
    let params = SimulationParameters { relaxation: f32::NAN, resolution: 1, ..sim.params };
    let frame = sim.step(FrameInput {
        cursor: Some(Vec2::new(f32::NAN, 0.5)),
        viewport: ViewportState::new(0.0, 0.0),
        params,
    });

    assert_eq!(frame.resolution, MIN_RESOLUTION as u32);
    assert_eq!(frame.viewport, ViewportState::default());
    assert!(sim.field.cells().iter().all(|c| c.is_finite()));
    assert!(sim.params.validate().is_ok());
}

#[test]
fn texels_are_packed_top_row_first() {
    let mut field = DisplacementField::zeroed(3);
    field.set_cell(0, 0, Vec4::new(1.0, 2.0, 3.0, 4.0)); // bottom left
    field.set_cell(2, 2, Vec4::new(5.0, 6.0, 7.0, 8.0)); // top right

    let texels = pack_texels(&field);
    assert_eq!(texels.len(), 9);
    assert_eq!(texels[2], GPUTexel { rgba: [5.0, 6.0, 7.0, 8.0] });
    assert_eq!(texels[6], GPUTexel { rgba: [1.0, 2.0, 3.0, 4.0] });

    let bytes = texel_bytes(&texels);
    assert_eq!(bytes.len(), 9 * 16);
    assert_eq!(&bytes[96..100], &1.0_f32.to_ne_bytes());
}
