//! Butterfly Globe - the rotating Earth
//!
//! Procedurally generated planet maps (diffuse, normal, specular, clouds)
//! wrapped around a three-shell sphere: the surface, a slightly larger cloud
//! layer spinning a little faster, and a faint atmosphere glow. The scene
//! talks to the GPU through [`GraphicsBackend`], so everything except the
//! wgpu backend and the window runs headless.

pub mod app;
pub mod backend;
mod camera;
mod globe;
pub mod gpu;
pub mod landmass;
mod mesh;
pub mod noise;
mod repaint;
pub mod textures;

pub use app::run_window;
pub use backend::{
    DrawCall, FrameState, GeometryId, GraphicsBackend, HeadlessBackend, Lighting, MaterialDesc,
    MaterialId, MaterialKind, Release, TextureId, TextureKind,
};
pub use camera::{Camera, OrbitControls};
pub use globe::{Globe, GlobeState, CLOUD_SPIN, EARTH_SPIN};
pub use gpu::WgpuBackend;
pub use mesh::{create_sphere_mesh, Mesh, Vertex};
pub use repaint::{RepaintLoop, StopHandle};
pub use textures::{generate_texture_set, PlanetTextureSet, TextureParams};
