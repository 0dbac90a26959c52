use bevy::prelude::*;
use bevy::asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::image::ImageSampler;
use bevy::sprite::Material2dPlugin;
use bevy::window::{CursorMoved, PrimaryWindow};
use glam::Vec2 as GVec2;

use crate::cpu::pointer::normalize_cursor;
use crate::cpu::simulation::{DisplacementSimulation, FrameInput, RenderFrame};
use crate::gpu::ffi::{GPUTexel, pack_texels, texel_bytes};
use crate::gpu::material::{CompositeUniform, DisplacementMaterial, field_sampler};
use crate::params::{SimulationParameters, ViewportState};

// ==================== resources ======================================

/// Source picture, loaded by the host app.
#[derive(Resource, Clone)]
pub struct SourceImageHandle(pub Handle<Image>);

/// Rgba32Float texture mirroring the displacement field.
#[derive(Resource, Clone)]
pub struct FieldTexture {
    pub handle: Handle<Image>,
    pub resolution: u32,
}

// latest normalized cursor since the last step
#[derive(Resource, Default)]
pub struct PointerInput {
    pub cursor: Option<GVec2>,
}

// stepped but not yet uploaded
#[derive(Resource, Default)]
pub struct PendingFrame(pub Option<RenderFrame>);

#[derive(Component)]
pub struct DisplacementPlane;

// =====================================================================

pub fn field_image(texels: &[GPUTexel], resolution: u32) -> Image {
    let mut image = Image::new(
        Extent3d {
            width: resolution,
            height: resolution,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        texel_bytes(texels),
        TextureFormat::Rgba32Float,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::Descriptor(field_sampler());
    image
}

fn window_viewport(window: &Window) -> ViewportState {
    ViewportState::new(window.width(), window.height())
}

// ========================== systems ==================================

// Startup: simulation, texture and the full screen plane

fn setup_displacement(
    mut commands: Commands,
    params: Res<SimulationParameters>,
    source: Option<Res<SourceImageHandle>>,
    mut images: ResMut<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<DisplacementMaterial>>,
) {
    let sim = DisplacementSimulation::new(*params);
    let resolution = sim.field.resolution() as u32;
    let handle = images.add(field_image(&pack_texels(&sim.field), resolution));
    info!("displacement field texture READY ({resolution}x{resolution})");

    commands.insert_resource(sim);
    commands.insert_resource(FieldTexture { handle: handle.clone(), resolution });

    // the cpu demo runs without a source image
    let Some(source) = source else {
        warn!("no SourceImageHandle, skipping the displacement plane");
        return;
    };

    let material = materials.add(DisplacementMaterial {
        uniforms: CompositeUniform::default(),
        image: source.0.clone(),
        field: handle,
    });
    commands.spawn((
        Mesh2d(meshes.add(Rectangle::new(1.0, 1.0))),
        MeshMaterial2d(material),
        Transform::default(),
        DisplacementPlane,
    ));
}

// Update systems that have to run per frame, in this order

pub fn track_cursor(
    mut cursor_moved: EventReader<CursorMoved>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut input: ResMut<PointerInput>,
) {
    let Some(moved) = cursor_moved.read().last() else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };

    let cursor = GVec2::new(moved.position.x, moved.position.y);
    let size = GVec2::new(window.width(), window.height());
    if let Some(n) = normalize_cursor(cursor, size) {
        input.cursor = Some(n);
    }
}

pub fn step_simulation(
    sim: Option<ResMut<DisplacementSimulation>>,
    params: Res<SimulationParameters>,
    mut input: ResMut<PointerInput>,
    mut pending: ResMut<PendingFrame>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Some(mut sim) = sim else {
        return;
    };
    let viewport = match windows.single() {
        Ok(window) => window_viewport(window),
        Err(_) => sim.viewport,
    };

    let frame = sim.step(FrameInput {
        cursor: input.cursor.take(),
        viewport,
        params: *params,
    });
    pending.0 = Some(frame);
}

pub fn upload_field_texture(
    mut pending: ResMut<PendingFrame>,
    texture: Option<ResMut<FieldTexture>>,
    mut images: ResMut<Assets<Image>>,
    mut materials: ResMut<Assets<DisplacementMaterial>>,
    planes: Query<&MeshMaterial2d<DisplacementMaterial>, With<DisplacementPlane>>,
) {
    let (Some(frame), Some(mut texture)) = (pending.0.take(), texture) else {
        return;
    };
    let Some(image) = images.get_mut(&texture.handle) else {
        return;
    };

    if frame.reallocated || frame.resolution != texture.resolution {
        *image = field_image(&frame.texels, frame.resolution);
        texture.resolution = frame.resolution;
        info!("field texture resized to {0}x{0}", frame.resolution);
    } else {
        // writing the packed grid into the whole texture
        image.data = Some(texel_bytes(&frame.texels));
    }

    // touching the material rebuilds its bind group with the new texture view
    for plane in &planes {
        let _ = materials.get_mut(&plane.0);
    }
}

pub fn sync_material(
    windows: Query<&Window, With<PrimaryWindow>>,
    images: Res<Assets<Image>>,
    mut materials: ResMut<Assets<DisplacementMaterial>>,
    mut planes: Query<(&MeshMaterial2d<DisplacementMaterial>, &mut Transform), With<DisplacementPlane>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let resolution = Vec2::new(window.width(), window.height());

    for (plane, mut transform) in &mut planes {
        // plane is a unit quad scaled to the window
        let scale = resolution.extend(1.0);
        if transform.scale != scale {
            transform.scale = scale;
        }

        let Some(current) = materials.get(&plane.0) else {
            continue;
        };
        // keep the previous size until the image finishes loading
        let texture_resolution = images
            .get(&current.image)
            .map(|image| image.size_f32())
            .unwrap_or(current.uniforms.texture_resolution);

        let uniforms = CompositeUniform { texture_resolution, resolution };
        if current.uniforms != uniforms {
            if let Some(material) = materials.get_mut(&plane.0) {
                debug!("composite uniforms {:?}", uniforms);
                material.uniforms = uniforms;
            }
        }
    }
}

// =====================================================================

// Plugin

pub struct DisplacementPlugin;

impl Plugin for DisplacementPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(Material2dPlugin::<DisplacementMaterial>::default())
            .init_resource::<SimulationParameters>()
            .init_resource::<PointerInput>()
            .init_resource::<PendingFrame>()
            .add_systems(Startup, setup_displacement)
            .add_systems(
                Update,
                (track_cursor, step_simulation, upload_field_texture, sync_material).chain(),
            );
    }
}
