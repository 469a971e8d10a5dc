//! Parameters of the lit material used by the materials scene.

/// Metal/rough surface description. Both factors live in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandardMaterial {
    metalness: f32,
    roughness: f32,
    pub color: [f32; 3],
}

impl StandardMaterial {
    pub const DEFAULT_METALNESS: f32 = 0.7;
    pub const DEFAULT_ROUGHNESS: f32 = 0.2;

    pub fn new(metalness: f32, roughness: f32) -> Self {
        let mut material = Self {
            metalness: Self::DEFAULT_METALNESS,
            roughness: Self::DEFAULT_ROUGHNESS,
            color: [1.0, 1.0, 1.0],
        };
        material.set_metalness(metalness);
        material.set_roughness(roughness);
        material
    }

    pub fn metalness(&self) -> f32 {
        self.metalness
    }

    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    /// NaN is ignored, everything else is clamped.
    pub fn set_metalness(&mut self, metalness: f32) {
        if !metalness.is_nan() {
            self.metalness = metalness.clamp(0.0, 1.0);
        }
    }

    pub fn set_roughness(&mut self, roughness: f32) {
        if !roughness.is_nan() {
            self.roughness = roughness.clamp(0.0, 1.0);
        }
    }

    pub fn to_uniform(&self) -> StandardMaterialUniform {
        StandardMaterialUniform {
            color: self.color,
            metalness: self.metalness,
            roughness: self.roughness,
            _padding: [0.0; 3],
        }
    }
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self::new(Self::DEFAULT_METALNESS, Self::DEFAULT_ROUGHNESS)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StandardMaterialUniform {
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    // Uniforms require 16 byte (4 float) spacing
    _padding: [f32; 3],
}
