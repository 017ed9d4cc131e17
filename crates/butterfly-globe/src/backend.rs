//! Graphics backend seam
//!
//! The globe never touches the GPU directly. It asks a [`GraphicsBackend`]
//! for geometry, texture and material handles, hands it a [`FrameState`]
//! every frame, and gives every handle back on unmount. [`HeadlessBackend`]
//! records all of that for tests and offscreen runs.

use crate::mesh::Mesh;
use butterfly_core::{ButterflyError, Color, Result, Vec3};
use image::RgbaImage;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u64);

/// How texel values are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    /// sRGB color
    Color,
    /// Linear data (normals, specular intensity)
    Data,
}

/// Which pipeline draws a material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Opaque lit planet surface
    Surface,
    /// Alpha-blended cloud shell
    Clouds,
    /// Additive glow drawn from the inside of a larger shell
    Atmosphere,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterialMaps {
    pub diffuse: Option<TextureId>,
    pub normal: Option<TextureId>,
    pub specular: Option<TextureId>,
    /// Coverage taken from the alpha channel
    pub alpha: Option<TextureId>,
}

impl MaterialMaps {
    pub fn textures(&self) -> impl Iterator<Item = TextureId> {
        [self.diffuse, self.normal, self.specular, self.alpha]
            .into_iter()
            .flatten()
    }
}

/// Phong-style material parameters
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    pub kind: MaterialKind,
    pub color: Color,
    pub opacity: f32,
    pub specular: Color,
    pub shininess: f32,
    pub normal_scale: f32,
    pub maps: MaterialMaps,
}

impl MaterialDesc {
    pub fn earth() -> Self {
        Self {
            kind: MaterialKind::Surface,
            color: Color::WHITE,
            opacity: 1.0,
            specular: Color::from_hex(0x808080),
            shininess: 10.0,
            normal_scale: 0.5,
            maps: MaterialMaps::default(),
        }
    }

    pub fn clouds() -> Self {
        Self {
            kind: MaterialKind::Clouds,
            color: Color::WHITE,
            opacity: 0.8,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
            normal_scale: 1.0,
            maps: MaterialMaps::default(),
        }
    }

    pub fn atmosphere() -> Self {
        Self {
            kind: MaterialKind::Atmosphere,
            color: Color::from_hex(0x4d8cff),
            opacity: 0.35,
            specular: Color::BLACK,
            shininess: 1.0,
            normal_scale: 1.0,
            maps: MaterialMaps::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
}

/// Ambient fill, a directional sun and a blue point light on the far side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: Color,
    pub ambient_intensity: f32,
    pub sun: Light,
    pub fill: Light,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: Color::WHITE,
            ambient_intensity: 0.2,
            sun: Light {
                color: Color::WHITE,
                intensity: 1.0,
                position: Vec3::new(5.0, 3.0, 5.0),
            },
            fill: Light {
                color: Color::from_hex(0x3366ff),
                intensity: 0.3,
                position: Vec3::new(-5.0, -3.0, -5.0),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub geometry: GeometryId,
    pub material: MaterialId,
    /// Model matrix (4x4, column-major)
    pub model: [[f32; 4]; 4],
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: Vec3,
    pub clear_color: Color,
    pub lighting: Lighting,
    /// In draw order
    pub draws: Vec<DrawCall>,
}

pub trait GraphicsBackend {
    fn create_geometry(&mut self, label: &str, mesh: &Mesh) -> Result<GeometryId>;

    fn create_texture(&mut self, label: &str, image: &RgbaImage, kind: TextureKind)
        -> Result<TextureId>;

    fn create_material(&mut self, label: &str, desc: &MaterialDesc) -> Result<MaterialId>;

    /// Replace a material's parameters and maps
    fn update_material(&mut self, id: MaterialId, desc: &MaterialDesc) -> Result<()>;

    fn resize(&mut self, width: u32, height: u32);

    fn render(&mut self, frame: &FrameState) -> Result<()>;

    fn release_geometry(&mut self, id: GeometryId);

    fn release_texture(&mut self, id: TextureId);

    fn release_material(&mut self, id: MaterialId);

    /// Release the context itself; no other call is valid afterwards
    fn shutdown(&mut self);
}

impl<B: GraphicsBackend + ?Sized> GraphicsBackend for &mut B {
    fn create_geometry(&mut self, label: &str, mesh: &Mesh) -> Result<GeometryId> {
        (**self).create_geometry(label, mesh)
    }

    fn create_texture(
        &mut self,
        label: &str,
        image: &RgbaImage,
        kind: TextureKind,
    ) -> Result<TextureId> {
        (**self).create_texture(label, image, kind)
    }

    fn create_material(&mut self, label: &str, desc: &MaterialDesc) -> Result<MaterialId> {
        (**self).create_material(label, desc)
    }

    fn update_material(&mut self, id: MaterialId, desc: &MaterialDesc) -> Result<()> {
        (**self).update_material(id, desc)
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height)
    }

    fn render(&mut self, frame: &FrameState) -> Result<()> {
        (**self).render(frame)
    }

    fn release_geometry(&mut self, id: GeometryId) {
        (**self).release_geometry(id)
    }

    fn release_texture(&mut self, id: TextureId) {
        (**self).release_texture(id)
    }

    fn release_material(&mut self, id: MaterialId) {
        (**self).release_material(id)
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }
}

/// One recorded release, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Release {
    Geometry(String),
    Texture(String),
    Material(String),
    Context,
}

/// Backend that draws nothing and records everything
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    geometries: BTreeMap<GeometryId, String>,
    textures: BTreeMap<TextureId, (String, u32, u32)>,
    materials: BTreeMap<MaterialId, (String, MaterialDesc)>,
    releases: Vec<Release>,
    size: (u32, u32),
    frames: u64,
    last_frame: Option<FrameState>,
    shut_down: bool,
    /// Make every `render` call fail, as a lost device would
    pub fail_renders: bool,
}

impl HeadlessBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Self::default()
        }
    }

    fn allocate(&mut self) -> Result<u64> {
        if self.shut_down {
            return Err(ButterflyError::RenderError("backend is shut down".to_string()));
        }
        self.next_id += 1;
        Ok(self.next_id)
    }

    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    pub fn live_resources(&self) -> usize {
        self.live_geometries() + self.live_textures() + self.live_materials()
    }

    pub fn material(&self, id: MaterialId) -> Option<&MaterialDesc> {
        self.materials.get(&id).map(|(_, desc)| desc)
    }

    pub fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.textures.get(&id).map(|(_, w, h)| (*w, *h))
    }

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&FrameState> {
        self.last_frame.as_ref()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn create_geometry(&mut self, label: &str, _mesh: &Mesh) -> Result<GeometryId> {
        let id = GeometryId(self.allocate()?);
        self.geometries.insert(id, label.to_string());
        Ok(id)
    }

    fn create_texture(
        &mut self,
        label: &str,
        image: &RgbaImage,
        _kind: TextureKind,
    ) -> Result<TextureId> {
        let id = TextureId(self.allocate()?);
        self.textures
            .insert(id, (label.to_string(), image.width(), image.height()));
        Ok(id)
    }

    fn create_material(&mut self, label: &str, desc: &MaterialDesc) -> Result<MaterialId> {
        let id = MaterialId(self.allocate()?);
        self.materials.insert(id, (label.to_string(), desc.clone()));
        Ok(id)
    }

    fn update_material(&mut self, id: MaterialId, desc: &MaterialDesc) -> Result<()> {
        match self.materials.get_mut(&id) {
            Some((_, stored)) => {
                *stored = desc.clone();
                Ok(())
            }
            None => Err(ButterflyError::RenderError(format!(
                "unknown material {:?}",
                id
            ))),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn render(&mut self, frame: &FrameState) -> Result<()> {
        if self.shut_down {
            return Err(ButterflyError::RenderError("backend is shut down".to_string()));
        }
        if self.fail_renders {
            return Err(ButterflyError::RenderError("device lost".to_string()));
        }
        self.frames += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn release_geometry(&mut self, id: GeometryId) {
        if let Some(label) = self.geometries.remove(&id) {
            self.releases.push(Release::Geometry(label));
        }
    }

    fn release_texture(&mut self, id: TextureId) {
        if let Some((label, _, _)) = self.textures.remove(&id) {
            self.releases.push(Release::Texture(label));
        }
    }

    fn release_material(&mut self, id: MaterialId) {
        if let Some((label, _)) = self.materials.remove(&id) {
            self.releases.push(Release::Material(label));
        }
    }

    fn shutdown(&mut self) {
        if !self.shut_down {
            self.shut_down = true;
            self.releases.push(Release::Context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::create_sphere_mesh;

    #[test]
    fn records_allocations_and_releases() {
        let mut backend = HeadlessBackend::new(640, 480);
        let geometry = backend
            .create_geometry("Earth", &create_sphere_mesh(1.0, 8, 8))
            .unwrap();
        let texture = backend
            .create_texture("Diffuse", &RgbaImage::new(4, 2), TextureKind::Color)
            .unwrap();
        let material = backend.create_material("Earth", &MaterialDesc::earth()).unwrap();
        assert_eq!(backend.live_resources(), 3);
        assert_eq!(backend.texture_size(texture), Some((4, 2)));

        backend.release_material(material);
        backend.release_texture(texture);
        backend.release_geometry(geometry);
        backend.release_geometry(geometry);
        backend.shutdown();

        assert_eq!(backend.live_resources(), 0);
        assert_eq!(
            backend.releases(),
            &[
                Release::Material("Earth".into()),
                Release::Texture("Diffuse".into()),
                Release::Geometry("Earth".into()),
                Release::Context,
            ]
        );
    }

    #[test]
    fn nothing_allocates_after_shutdown() {
        let mut backend = HeadlessBackend::new(1, 1);
        backend.shutdown();
        assert!(backend
            .create_material("Late", &MaterialDesc::clouds())
            .is_err());
    }

    #[test]
    fn default_lighting_rig() {
        let lighting = Lighting::default();
        assert_eq!(lighting.ambient_intensity, 0.2);
        assert_eq!(lighting.sun.position, Vec3::new(5.0, 3.0, 5.0));
        assert_eq!(lighting.fill.color.to_hex(), 0x3366ff);
    }
}
