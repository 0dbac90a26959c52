use bevy::image::{ImageAddressMode, ImageFilterMode, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::render::render_resource::{AsBindGroup, ShaderRef, ShaderType};
use bevy::sprite::Material2d;

pub const COMPOSITE_SHADER_PATH: &str = "shaders/displacement_composite.wgsl";

#[derive(ShaderType, Debug, Clone, Copy, PartialEq)]
pub struct CompositeUniform {
    pub texture_resolution: Vec2, // source image in px
    pub resolution: Vec2,         // viewport in logical px
}

impl Default for CompositeUniform {
    fn default() -> Self {
        Self { texture_resolution: Vec2::ONE, resolution: Vec2::ONE }
    }
}

// Rgba32Float isn't filterable everywhere, so the field binding is non-filtering
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct DisplacementMaterial {
    #[uniform(0)]
    pub uniforms: CompositeUniform,
    #[texture(1)]
    #[sampler(2)]
    pub image: Handle<Image>,
    #[texture(3, sample_type = "float", filterable = false)]
    #[sampler(4, sampler_type = "non_filtering")]
    pub field: Handle<Image>,
}

impl Material2d for DisplacementMaterial {
    fn fragment_shader() -> ShaderRef {
        COMPOSITE_SHADER_PATH.into()
    }
}

/// Sampler for the source image: clamp to edge, never wrap.
pub fn source_sampler() -> ImageSamplerDescriptor {
    ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::ClampToEdge,
        address_mode_v: ImageAddressMode::ClampToEdge,
        mag_filter: ImageFilterMode::Linear,
        min_filter: ImageFilterMode::Linear,
        ..default()
    }
}

/// Sampler for the displacement texture: one texel per cell.
pub fn field_sampler() -> ImageSamplerDescriptor {
    ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::ClampToEdge,
        address_mode_v: ImageAddressMode::ClampToEdge,
        mag_filter: ImageFilterMode::Nearest,
        min_filter: ImageFilterMode::Nearest,
        mipmap_filter: ImageFilterMode::Nearest,
        ..default()
    }
}
