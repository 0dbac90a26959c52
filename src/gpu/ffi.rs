use bytemuck::{Pod, Zeroable};

use crate::cpu::field::DisplacementField;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GPUTexel {
    // plain array, one Rgba32Float texel
    pub rgba: [f32; 4],
}

/// Packs the field top row first, the order wgpu expects for texture rows.
pub fn pack_texels(field: &DisplacementField) -> Vec<GPUTexel> {
    let n = field.resolution();
    let mut texels = Vec::with_capacity(n * n);
    for row in 0..n {
        let j = n - 1 - row; // field rows count upwards
        for i in 0..n {
            texels.push(GPUTexel { rgba: field.cell(i, j).to_array() });
        }
    }
    texels
}

pub fn texel_bytes(texels: &[GPUTexel]) -> Vec<u8> {
    bytemuck::cast_slice(texels).to_vec()
}
