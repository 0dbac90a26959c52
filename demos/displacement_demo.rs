use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::image::{ImageLoaderSettings, ImageSampler};
use bevy::prelude::*;
use bevy::asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy_displacement_field::gpu::material::source_sampler;
use bevy_displacement_field::params::{MAX_RESOLUTION, MIN_RESOLUTION};
use bevy_displacement_field::{DisplacementPlugin, SimulationParameters, SourceImageHandle};

// procedural fallback picture
const PATTERN_W: u32 = 640;
const PATTERN_H: u32 = 400;
const TUNE_STEP: f32 = 0.01;

// usage: cargo run --example displacement_demo -- [path under assets/]
fn main() {
    let source_path = std::env::args().nth(1);

    App::new()
        .add_plugins((DefaultPlugins, FrameTimeDiagnosticsPlugin::default()))
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(SimulationParameters::default())
        .insert_resource(SourcePath(source_path))
        // the source image has to exist before the plugin's startup system
        .add_systems(PreStartup, load_source)
        .add_plugins(DisplacementPlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, (tune_parameters, log_fps))
        .run();
}

#[derive(Resource)]
struct SourcePath(Option<String>);

fn load_source(
    mut commands: Commands,
    path: Res<SourcePath>,
    assets: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
) {
    let handle = match &path.0 {
        Some(path) => {
            info!("loading source image {path}");
            assets.load_with_settings(path.clone(), |s: &mut ImageLoaderSettings| {
                s.sampler = ImageSampler::Descriptor(source_sampler());
            })
        }
        None => images.add(pattern_image()),
    };
    commands.insert_resource(SourceImageHandle(handle));
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d::default());
    info!("keys: R/F grid, E/D mouse factor, W/S strength, Q/A relaxation");
}

// diagonal color bands over a checkerboard
fn pattern_image() -> Image {
    let mut data = Vec::with_capacity((PATTERN_W * PATTERN_H * 4) as usize);
    for y in 0..PATTERN_H {
        for x in 0..PATTERN_W {
            let u = x as f32 / PATTERN_W as f32;
            let v = y as f32 / PATTERN_H as f32;
            let checker = if ((x / 40) + (y / 40)) % 2 == 0 { 1.0 } else { 0.75 };
            let band = ((u + v) * 6.0).fract();
            data.push((255.0 * checker * band) as u8);
            data.push((255.0 * checker * (1.0 - u)) as u8);
            data.push((255.0 * checker * v) as u8);
            data.push(255);
        }
    }

    let mut image = Image::new(
        Extent3d {
            width: PATTERN_W,
            height: PATTERN_H,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    image.sampler = ImageSampler::Descriptor(source_sampler());
    image
}

// stand-in for a slider panel
fn tune_parameters(keys: Res<ButtonInput<KeyCode>>, mut params: ResMut<SimulationParameters>) {
    let mut next = *params;

    if keys.just_pressed(KeyCode::KeyR) {
        next.resolution = (next.resolution + 1).min(MAX_RESOLUTION);
    }
    if keys.just_pressed(KeyCode::KeyF) {
        next.resolution = next.resolution.saturating_sub(1).max(MIN_RESOLUTION);
    }

    let nudge = |value: &mut f32, up: KeyCode, down: KeyCode| {
        if keys.pressed(up) {
            *value = (*value + TUNE_STEP).min(1.0);
        }
        if keys.pressed(down) {
            *value = (*value - TUNE_STEP).max(0.0);
        }
    };
    nudge(&mut next.mouse_factor, KeyCode::KeyE, KeyCode::KeyD);
    nudge(&mut next.strength, KeyCode::KeyW, KeyCode::KeyS);
    nudge(&mut next.relaxation, KeyCode::KeyQ, KeyCode::KeyA);

    if next != *params {
        info!(
            "grid {} | mouse factor {:.2} | strength {:.2} | relaxation {:.2}",
            next.resolution, next.mouse_factor, next.strength, next.relaxation
        );
        *params = next;
    }
}

fn log_fps(diagnostics: Res<DiagnosticsStore>, mut counter: Local<u32>) {
    *counter += 1;
    if *counter >= 120 {
        *counter = 0;

        if let Some(fps_diag) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(avg) = fps_diag.average() {
                info!("==== Average FPS over last ~2 s: {:.1} ====", avg);
            }
        }
    }
}
