pub mod error;
pub mod params;

pub mod cpu {
    pub mod composite;
    pub mod field;
    pub mod pointer;
    pub mod simulation;
}

pub mod gpu {
    pub mod ffi;
    pub mod field_texture;
    pub mod material;
}

pub use cpu::simulation::{DisplacementSimulation, FrameInput, RenderFrame};
pub use error::ParamError;
pub use gpu::field_texture::{DisplacementPlugin, SourceImageHandle};
pub use params::{SimulationParameters, ViewportState};
