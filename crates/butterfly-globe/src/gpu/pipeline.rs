//! Render pipelines for the three globe shells
//!
//! All three share one shader module, one vertex layout and one pair of
//! bind group layouts; they differ in fragment entry point, culling,
//! blending and depth writes.

use super::context::DEPTH_FORMAT;
use crate::backend::{Lighting, MaterialDesc, MaterialKind};
use crate::mesh::Vertex;
use butterfly_core::{Color, Vec3};
use bytemuck::{Pod, Zeroable};

/// Group 0, written once per frame
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub ambient: [f32; 4],
    pub sun_pos: [f32; 4],
    pub sun_color: [f32; 4],
    pub fill_pos: [f32; 4],
    pub fill_color: [f32; 4],
}

impl SceneUniforms {
    pub fn new(view_proj: [[f32; 4]; 4], camera: Vec3, lighting: &Lighting) -> Self {
        Self {
            view_proj,
            camera_pos: point(camera),
            ambient: scaled(lighting.ambient, lighting.ambient_intensity),
            sun_pos: point(lighting.sun.position),
            sun_color: scaled(lighting.sun.color, lighting.sun.intensity),
            fill_pos: point(lighting.fill.position),
            fill_color: scaled(lighting.fill.color, lighting.fill.intensity),
        }
    }
}

/// Group 1 binding 0, one buffer per material
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MaterialUniforms {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub specular: [f32; 4],
    /// shininess, opacity, normal scale, unused
    pub params: [f32; 4],
}

impl MaterialUniforms {
    pub fn new(desc: &MaterialDesc, model: [[f32; 4]; 4]) -> Self {
        Self {
            model,
            color: desc.color.to_array(),
            specular: desc.specular.to_array(),
            params: [desc.shininess, desc.opacity, desc.normal_scale, 0.0],
        }
    }
}

fn point(v: Vec3) -> [f32; 4] {
    [v.x, v.y, v.z, 1.0]
}

fn scaled(color: Color, intensity: f32) -> [f32; 4] {
    [
        color.r * intensity,
        color.g * intensity,
        color.b * intensity,
        1.0,
    ]
}

pub struct GlobePipelines {
    pub surface: wgpu::RenderPipeline,
    pub clouds: wgpu::RenderPipeline,
    pub atmosphere: wgpu::RenderPipeline,
    pub scene_bind_group_layout: wgpu::BindGroupLayout,
    pub material_bind_group_layout: wgpu::BindGroupLayout,
}

impl GlobePipelines {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Globe Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("globe.wgsl").into()),
        });

        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[uniform_entry(0)],
                label: Some("Globe Scene Bind Group Layout"),
            });

        // Diffuse, normal, specular and alpha maps, then the shared sampler
        let material_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    uniform_entry(0),
                    texture_entry(1),
                    texture_entry(2),
                    texture_entry(3),
                    texture_entry(4),
                    wgpu::BindGroupLayoutEntry {
                        binding: 5,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some("Globe Material Bind Group Layout"),
            });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Globe Pipeline Layout"),
            bind_group_layouts: &[&scene_bind_group_layout, &material_bind_group_layout],
            push_constant_ranges: &[],
        });

        let build = |kind: MaterialKind| {
            let (label, entry_point, cull_mode, blend, depth_write) = match kind {
                MaterialKind::Surface => (
                    "Globe Surface Pipeline",
                    "fs_surface",
                    wgpu::Face::Back,
                    None,
                    true,
                ),
                MaterialKind::Clouds => (
                    "Globe Cloud Pipeline",
                    "fs_clouds",
                    wgpu::Face::Back,
                    Some(wgpu::BlendState::ALPHA_BLENDING),
                    false,
                ),
                MaterialKind::Atmosphere => (
                    "Globe Atmosphere Pipeline",
                    "fs_atmosphere",
                    wgpu::Face::Front,
                    Some(additive_blend()),
                    false,
                ),
            };

            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::desc()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(entry_point),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(cull_mode),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_write,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        Self {
            surface: build(MaterialKind::Surface),
            clouds: build(MaterialKind::Clouds),
            atmosphere: build(MaterialKind::Atmosphere),
            scene_bind_group_layout,
            material_bind_group_layout,
        }
    }

    pub fn for_kind(&self, kind: MaterialKind) -> &wgpu::RenderPipeline {
        match kind {
            MaterialKind::Surface => &self.surface,
            MaterialKind::Clouds => &self.clouds,
            MaterialKind::Atmosphere => &self.atmosphere,
        }
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn additive_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::Zero,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_match_shader_layout() {
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 160);
        assert_eq!(std::mem::size_of::<MaterialUniforms>(), 112);
    }

    #[test]
    fn shader_parses() {
        let module = naga::front::wgsl::parse_str(include_str!("globe.wgsl"))
            .expect("globe shader should parse");
        let entry_points: Vec<&str> = module
            .entry_points
            .iter()
            .map(|ep| ep.name.as_str())
            .collect();
        for name in ["vs_main", "fs_surface", "fs_clouds", "fs_atmosphere"] {
            assert!(entry_points.contains(&name), "missing {}", name);
        }
    }

    #[test]
    fn scene_uniforms_scale_light_colors() {
        let lighting = Lighting::default();
        let uniforms = SceneUniforms::new(
            butterfly_core::mat4_scale_rotation_y(1.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            &lighting,
        );
        assert_eq!(uniforms.camera_pos, [0.0, 0.0, 2.0, 1.0]);
        assert!((uniforms.ambient[0] - 0.2).abs() < 1e-6);
        assert_eq!(uniforms.sun_pos, [5.0, 3.0, 5.0, 1.0]);
        let fill = Color::from_hex(0x3366ff);
        assert!((uniforms.fill_color[2] - fill.b * 0.3).abs() < 1e-6);
    }

    #[test]
    fn material_uniforms_pack_params() {
        let uniforms = MaterialUniforms::new(
            &MaterialDesc::earth(),
            butterfly_core::mat4_scale_rotation_y(1.0, 0.0),
        );
        assert_eq!(uniforms.params, [10.0, 1.0, 0.5, 0.0]);
    }
}
