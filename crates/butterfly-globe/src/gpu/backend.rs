//! [`GraphicsBackend`] on top of wgpu

use super::context::GpuContext;
use super::pipeline::{GlobePipelines, MaterialUniforms, SceneUniforms};
use crate::backend::{
    FrameState, GeometryId, GraphicsBackend, MaterialDesc, MaterialId, TextureId, TextureKind,
};
use crate::mesh::Mesh;
use butterfly_core::{mat4_scale_rotation_y, ButterflyError, Result};
use image::RgbaImage;
use std::collections::HashMap;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct GpuMaterial {
    desc: MaterialDesc,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// 1x1 stand-ins bound wherever a material has no map
struct DefaultMaps {
    white: GpuTexture,
    flat_normal: GpuTexture,
}

struct GpuState {
    context: GpuContext,
    pipelines: GlobePipelines,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    defaults: DefaultMaps,
    geometries: HashMap<GeometryId, GpuGeometry>,
    textures: HashMap<TextureId, GpuTexture>,
    materials: HashMap<MaterialId, GpuMaterial>,
}

pub struct WgpuBackend {
    state: Option<GpuState>,
    next_id: u64,
}

impl WgpuBackend {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let context = GpuContext::new(window).await?;
        let device = &context.device;

        let pipelines = GlobePipelines::new(device, context.format());

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globe Scene Uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globe Scene Bind Group"),
            layout: &pipelines.scene_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        // Wrap around the seam, clamp at the poles
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Globe Map Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let defaults = DefaultMaps {
            white: solid_texture(&context, "Default White", [255, 255, 255, 255]),
            flat_normal: solid_texture(&context, "Default Normal", [128, 128, 255, 255]),
        };

        log::info!(
            "GPU ready: {}x{} {:?}",
            context.config.width,
            context.config.height,
            context.format()
        );

        Ok(Self {
            state: Some(GpuState {
                context,
                pipelines,
                scene_buffer,
                scene_bind_group,
                sampler,
                defaults,
                geometries: HashMap::new(),
                textures: HashMap::new(),
                materials: HashMap::new(),
            }),
            next_id: 0,
        })
    }

    fn state(&mut self) -> Result<&mut GpuState> {
        self.state
            .as_mut()
            .ok_or_else(|| ButterflyError::RenderError("GPU context released".to_string()))
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn live_resources(&self) -> usize {
        self.state
            .as_ref()
            .map(|s| s.geometries.len() + s.textures.len() + s.materials.len())
            .unwrap_or(0)
    }
}

impl GpuState {
    fn map_view<'a>(
        &'a self,
        id: Option<TextureId>,
        fallback: &'a GpuTexture,
    ) -> Result<&'a wgpu::TextureView> {
        match id {
            Some(id) => self
                .textures
                .get(&id)
                .map(|t| &t.view)
                .ok_or_else(|| ButterflyError::RenderError(format!("unknown texture {:?}", id))),
            None => Ok(&fallback.view),
        }
    }

    fn material_bind_group(
        &self,
        label: &str,
        desc: &MaterialDesc,
        uniform_buffer: &wgpu::Buffer,
    ) -> Result<wgpu::BindGroup> {
        let diffuse = self.map_view(desc.maps.diffuse, &self.defaults.white)?;
        let normal = self.map_view(desc.maps.normal, &self.defaults.flat_normal)?;
        let specular = self.map_view(desc.maps.specular, &self.defaults.white)?;
        let alpha = self.map_view(desc.maps.alpha, &self.defaults.white)?;

        Ok(self
            .context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &self.pipelines.material_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(diffuse),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(normal),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(specular),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: wgpu::BindingResource::TextureView(alpha),
                    },
                    wgpu::BindGroupEntry {
                        binding: 5,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            }))
    }
}

impl GraphicsBackend for WgpuBackend {
    fn create_geometry(&mut self, label: &str, mesh: &Mesh) -> Result<GeometryId> {
        let id = GeometryId(self.allocate());
        let state = self.state()?;
        let device = &state.context.device;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertices", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Indices", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        state.geometries.insert(
            id,
            GpuGeometry {
                vertex_buffer,
                index_buffer,
                index_count: mesh.indices.len() as u32,
            },
        );
        Ok(id)
    }

    fn create_texture(
        &mut self,
        label: &str,
        image: &RgbaImage,
        kind: TextureKind,
    ) -> Result<TextureId> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ButterflyError::TextureError(format!(
                "{} has zero size",
                label
            )));
        }

        let id = TextureId(self.allocate());
        let state = self.state()?;
        let format = match kind {
            TextureKind::Color => wgpu::TextureFormat::Rgba8UnormSrgb,
            TextureKind::Data => wgpu::TextureFormat::Rgba8Unorm,
        };
        let texture = upload_rgba(&state.context, label, width, height, format, image.as_raw());
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        state.textures.insert(id, GpuTexture { texture, view });
        Ok(id)
    }

    fn create_material(&mut self, label: &str, desc: &MaterialDesc) -> Result<MaterialId> {
        let id = MaterialId(self.allocate());
        let state = self.state()?;

        let uniforms = MaterialUniforms::new(desc, mat4_scale_rotation_y(1.0, 0.0));
        let uniform_buffer =
            state
                .context
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Material Uniforms", label)),
                    contents: bytemuck::bytes_of(&uniforms),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
        let bind_group = state.material_bind_group(label, desc, &uniform_buffer)?;

        state.materials.insert(
            id,
            GpuMaterial {
                desc: desc.clone(),
                uniform_buffer,
                bind_group,
            },
        );
        Ok(id)
    }

    fn update_material(&mut self, id: MaterialId, desc: &MaterialDesc) -> Result<()> {
        let state = self.state()?;
        let Some(material) = state.materials.get(&id) else {
            return Err(ButterflyError::RenderError(format!(
                "unknown material {:?}",
                id
            )));
        };
        let bind_group =
            state.material_bind_group("Globe Material", desc, &material.uniform_buffer)?;
        if let Some(material) = state.materials.get_mut(&id) {
            material.desc = desc.clone();
            material.bind_group = bind_group;
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(state) = self.state.as_mut() {
            state.context.resize(width, height);
        }
    }

    fn render(&mut self, frame: &FrameState) -> Result<()> {
        let state = self.state()?;

        state.context.queue.write_buffer(
            &state.scene_buffer,
            0,
            bytemuck::bytes_of(&SceneUniforms::new(
                frame.view_proj,
                frame.camera_position,
                &frame.lighting,
            )),
        );
        for draw in &frame.draws {
            if let Some(material) = state.materials.get(&draw.material) {
                state.context.queue.write_buffer(
                    &material.uniform_buffer,
                    0,
                    bytemuck::bytes_of(&MaterialUniforms::new(&material.desc, draw.model)),
                );
            }
        }

        let output = match state.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                state.context.reconfigure();
                return Err(ButterflyError::RenderError(
                    "surface lost, reconfigured".to_string(),
                ));
            }
            Err(e) => return Err(ButterflyError::RenderError(format!("surface: {:?}", e))),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            state
                .context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Globe Frame Encoder"),
                });

        {
            let clear = frame.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Globe Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: clear.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &state.context.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &state.scene_bind_group, &[]);
            for draw in &frame.draws {
                let (Some(geometry), Some(material)) = (
                    state.geometries.get(&draw.geometry),
                    state.materials.get(&draw.material),
                ) else {
                    log::warn!("Skipping draw with released resources: {:?}", draw.geometry);
                    continue;
                };
                pass.set_pipeline(state.pipelines.for_kind(material.desc.kind));
                pass.set_bind_group(1, &material.bind_group, &[]);
                pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..geometry.index_count, 0, 0..1);
            }
        }

        state.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release_geometry(&mut self, id: GeometryId) {
        if let Some(geometry) = self
            .state
            .as_mut()
            .and_then(|s| s.geometries.remove(&id))
        {
            geometry.vertex_buffer.destroy();
            geometry.index_buffer.destroy();
        }
    }

    fn release_texture(&mut self, id: TextureId) {
        if let Some(texture) = self.state.as_mut().and_then(|s| s.textures.remove(&id)) {
            texture.texture.destroy();
        }
    }

    fn release_material(&mut self, id: MaterialId) {
        if let Some(material) = self.state.as_mut().and_then(|s| s.materials.remove(&id)) {
            material.uniform_buffer.destroy();
        }
    }

    fn shutdown(&mut self) {
        if let Some(state) = self.state.take() {
            let leaked = state.geometries.len() + state.textures.len() + state.materials.len();
            if leaked > 0 {
                log::warn!("Releasing GPU context with {} live resources", leaked);
            }
            state.defaults.white.texture.destroy();
            state.defaults.flat_normal.texture.destroy();
            state.scene_buffer.destroy();
            state.context.depth_texture.destroy();
            log::debug!("GPU context released");
        }
    }
}

impl Drop for WgpuBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn solid_texture(context: &GpuContext, label: &str, rgba: [u8; 4]) -> GpuTexture {
    let texture = upload_rgba(
        context,
        label,
        1,
        1,
        wgpu::TextureFormat::Rgba8Unorm,
        &rgba,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture { texture, view }
}

fn upload_rgba(
    context: &GpuContext,
    label: &str,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    data: &[u8],
) -> wgpu::Texture {
    context.device.create_texture_with_data(
        &context.queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        data,
    )
}
