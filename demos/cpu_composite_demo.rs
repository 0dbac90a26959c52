use bevy::prelude::*;
use bevy::asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::PrimaryWindow;
use bevy_displacement_field::cpu::composite::{SourceImage, render};
use bevy_displacement_field::gpu::field_texture::step_simulation;
use bevy_displacement_field::{DisplacementPlugin, DisplacementSimulation, ViewportState};
use glam::Vec4 as GVec4;

// cpu output is tiny, the sprite scales it up
const OUT_W: u32 = 192;
const OUT_H: u32 = 120;
const SOURCE_W: usize = 256;
const SOURCE_H: usize = 160;

#[derive(Resource)]
struct CpuSource(SourceImage);

#[derive(Resource)]
struct CpuTarget(Handle<Image>);

#[derive(Component)]
struct CpuOutput;

fn main() {
    let Some(source) = stripes() else {
        return;
    };

    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(DisplacementPlugin)
        .insert_resource(CpuSource(source))
        .add_systems(Startup, setup)
        .add_systems(Update, (render_cpu_frame.after(step_simulation), fit_sprite))
        .run();
}

fn stripes() -> Option<SourceImage> {
    SourceImage::from_fn(SOURCE_W, SOURCE_H, |x, y| {
        let stripe = if (x / 16) % 2 == 0 { 1.0 } else { 0.2 };
        let v = y as f32 / SOURCE_H as f32;
        GVec4::new(stripe, stripe * v, 1.0 - v, 1.0)
    })
}

fn setup(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    commands.spawn(Camera2d::default());

    let image = Image::new_fill(
        Extent3d {
            width: OUT_W,
            height: OUT_H,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    let handle = images.add(image);
    commands.spawn((Sprite::from_image(handle.clone()), CpuOutput));
    commands.insert_resource(CpuTarget(handle));
}

fn render_cpu_frame(
    sim: Option<Res<DisplacementSimulation>>,
    source: Res<CpuSource>,
    target: Res<CpuTarget>,
    mut images: ResMut<Assets<Image>>,
) {
    let Some(sim) = sim else { return };
    let Some(image) = images.get_mut(&target.0) else { return };

    let pixels = render(&sim.field, &source.0, ViewportState::new(OUT_W as f32, OUT_H as f32));

    // cpu rows go bottom to top, texture rows top to bottom
    let mut data = Vec::with_capacity(pixels.len() * 4);
    for row in pixels.chunks(OUT_W as usize).rev() {
        for p in row {
            let c = p.clamp(GVec4::ZERO, GVec4::ONE) * 255.0;
            data.extend_from_slice(&[c.x as u8, c.y as u8, c.z as u8, 255]);
        }
    }
    image.data = Some(data);
}

fn fit_sprite(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut sprites: Query<&mut Sprite, With<CpuOutput>>,
) {
    let Ok(window) = windows.single() else { return };
    let size = Vec2::new(window.width(), window.height());
    for mut sprite in &mut sprites {
        if sprite.custom_size != Some(size) {
            sprite.custom_size = Some(size);
        }
    }
}
