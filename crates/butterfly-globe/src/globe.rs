//! The decorative rotating Earth
//!
//! Lifecycle: [`Globe::new`] builds the scene and leaves the globe
//! `Loading`; [`Globe::load_textures`] generates the procedural maps, applies
//! them and starts the repaint loop (`Ready`); [`Globe::unmount`] stops the
//! loop, detaches the controls and hands every graphics resource back to the
//! backend (`Unmounted`). Dropping a globe unmounts it.

use crate::backend::{
    DrawCall, FrameState, GeometryId, GraphicsBackend, Lighting, MaterialDesc, MaterialId,
    MaterialKind, MaterialMaps, TextureId, TextureKind,
};
use crate::camera::{Camera, OrbitControls};
use crate::mesh::create_sphere_mesh;
use crate::repaint::{RepaintLoop, StopHandle};
use crate::textures::{generate_texture_set, PlanetTextureSet, TextureParams};
use butterfly_core::{mat4_scale_rotation_y, Color, Result};
use image::RgbaImage;

/// Radians added to the planet's spin each frame
pub const EARTH_SPIN: f32 = 0.0005;
/// The cloud shell spins a little faster than the planet
pub const CLOUD_SPIN: f32 = 0.0007;

const EARTH_RADIUS: f32 = 1.0;
const CLOUD_RADIUS: f32 = 1.01;
const ATMOSPHERE_RADIUS: f32 = 1.08;
const SPHERE_SEGMENTS: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobeState {
    Loading,
    Ready,
    Unmounted,
}

#[derive(Debug, Clone)]
struct Shell {
    geometry: GeometryId,
    material: MaterialId,
    desc: MaterialDesc,
}

pub struct Globe<B: GraphicsBackend> {
    backend: B,
    state: GlobeState,
    camera: Camera,
    controls: OrbitControls,
    repaint: RepaintLoop,
    lighting: Lighting,
    params: TextureParams,
    size: (u32, u32),
    geometries: Vec<GeometryId>,
    materials: Vec<MaterialId>,
    textures: Vec<TextureId>,
    shells: Vec<Shell>,
    earth_rotation: f32,
    cloud_rotation: f32,
}

impl<B: GraphicsBackend> Globe<B> {
    /// Build the scene graph; the globe stays `Loading` until textures land
    pub fn new(backend: B, params: TextureParams, width: u32, height: u32) -> Result<Self> {
        let mut camera = Camera::default();
        camera.set_viewport(width, height);
        let controls = OrbitControls::attach(&camera);

        let mut globe = Self {
            backend,
            state: GlobeState::Loading,
            camera,
            controls,
            repaint: RepaintLoop::new(),
            lighting: Lighting::default(),
            params,
            size: (width, height),
            geometries: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            shells: Vec::new(),
            earth_rotation: 0.0,
            cloud_rotation: 0.0,
        };
        // On failure the partially built globe is dropped, which releases
        // whatever was already allocated
        globe.build_scene()?;
        Ok(globe)
    }

    /// Build the scene and apply freshly generated textures
    pub fn mount(backend: B, params: TextureParams, width: u32, height: u32) -> Result<Self> {
        let mut globe = Self::new(backend, params, width, height)?;
        globe.load_textures();
        Ok(globe)
    }

    fn build_scene(&mut self) -> Result<()> {
        let shells = [
            ("Earth", EARTH_RADIUS, MaterialDesc::earth()),
            ("Clouds", CLOUD_RADIUS, MaterialDesc::clouds()),
            ("Atmosphere", ATMOSPHERE_RADIUS, MaterialDesc::atmosphere()),
        ];
        for (label, radius, desc) in shells {
            let mesh = create_sphere_mesh(radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS);
            let geometry = self.backend.create_geometry(label, &mesh)?;
            self.geometries.push(geometry);
            let material = self.backend.create_material(label, &desc)?;
            self.materials.push(material);
            self.shells.push(Shell {
                geometry,
                material,
                desc,
            });
        }
        log::debug!(
            "Globe scene built: {} geometries, {} materials",
            self.geometries.len(),
            self.materials.len()
        );
        Ok(())
    }

    /// Generate the four maps and apply them
    pub fn load_textures(&mut self) {
        if self.state != GlobeState::Loading {
            return;
        }
        let set = generate_texture_set(&self.params);
        self.apply_textures(&set);
    }

    /// Apply an already generated texture set and start repainting.
    ///
    /// A set arriving after unmount is discarded. Upload failures are logged
    /// and the affected map is left off the material.
    pub fn apply_textures(&mut self, set: &PlanetTextureSet) {
        match self.state {
            GlobeState::Unmounted => {
                log::debug!("Discarding textures that arrived after unmount");
                return;
            }
            GlobeState::Ready => return,
            GlobeState::Loading => {}
        }

        let diffuse = self.upload("Earth Diffuse", &set.diffuse, TextureKind::Color);
        let normal = self.upload("Earth Normal", &set.normal, TextureKind::Data);
        let specular = self.upload("Earth Specular", &set.specular, TextureKind::Data);
        let clouds = self.upload("Clouds", &set.clouds, TextureKind::Color);

        self.set_maps(
            MaterialKind::Surface,
            MaterialMaps {
                diffuse,
                normal,
                specular,
                alpha: None,
            },
        );
        self.set_maps(
            MaterialKind::Clouds,
            MaterialMaps {
                diffuse: clouds,
                alpha: clouds,
                ..MaterialMaps::default()
            },
        );

        self.state = GlobeState::Ready;
        self.repaint.start();
        log::info!("Globe ready with {} textures", self.textures.len());
    }

    fn upload(
        &mut self,
        label: &str,
        map: &RgbaImage,
        kind: TextureKind,
    ) -> Option<TextureId> {
        match self.backend.create_texture(label, map, kind) {
            Ok(id) => {
                self.textures.push(id);
                Some(id)
            }
            Err(e) => {
                log::warn!("Failed to upload {} texture: {}", label, e);
                None
            }
        }
    }

    fn set_maps(&mut self, kind: MaterialKind, maps: MaterialMaps) {
        let Some(shell) = self.shells.iter_mut().find(|s| s.desc.kind == kind) else {
            return;
        };
        shell.desc.maps = maps;
        if let Err(e) = self.backend.update_material(shell.material, &shell.desc) {
            log::warn!("Failed to apply maps to {:?} material: {}", kind, e);
        }
    }

    /// Advance one repaint tick: spin, ease the controls, draw.
    ///
    /// Returns whether another frame is wanted. A failed draw is logged and
    /// skipped; the loop keeps running.
    pub fn frame(&mut self) -> bool {
        if !self.repaint.tick() {
            return false;
        }
        self.earth_rotation += EARTH_SPIN;
        self.cloud_rotation += CLOUD_SPIN;
        self.controls.update(&mut self.camera);

        let frame = self.frame_state();
        if let Err(e) = self.backend.render(&frame) {
            log::warn!("Skipping globe frame: {}", e);
        }
        true
    }

    /// Snapshot of what the next draw would show
    pub fn frame_state(&self) -> FrameState {
        let draws = self
            .shells
            .iter()
            .map(|shell| {
                let angle = match shell.desc.kind {
                    MaterialKind::Surface => self.earth_rotation,
                    MaterialKind::Clouds => self.cloud_rotation,
                    MaterialKind::Atmosphere => 0.0,
                };
                DrawCall {
                    geometry: shell.geometry,
                    material: shell.material,
                    model: mat4_scale_rotation_y(1.0, angle),
                }
            })
            .collect();

        FrameState {
            view_proj: self.camera.view_projection_matrix(),
            camera_position: self.camera.position,
            clear_color: Color::BLACK,
            lighting: self.lighting,
            draws,
        }
    }

    /// Follow the host container's new size
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.state == GlobeState::Unmounted || width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        self.camera.set_viewport(width, height);
        self.backend.resize(width, height);
        log::debug!("Globe resized to {}x{}", width, height);
    }

    /// Pointer drag in pixels
    pub fn on_drag(&mut self, dx: f32, dy: f32) {
        self.controls.rotate(dx, dy, self.size.1 as f32);
    }

    /// Wheel notches; positive zooms in
    pub fn on_scroll(&mut self, steps: f32) {
        self.controls.zoom(steps);
    }

    /// Stop repainting and release every resource. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        if self.state == GlobeState::Unmounted {
            return;
        }
        self.repaint.stop();
        self.controls.dispose();

        let (materials, textures, geometries) = (
            self.materials.len(),
            self.textures.len(),
            self.geometries.len(),
        );
        for id in self.materials.drain(..).rev() {
            self.backend.release_material(id);
        }
        for id in self.textures.drain(..).rev() {
            self.backend.release_texture(id);
        }
        for id in self.geometries.drain(..).rev() {
            self.backend.release_geometry(id);
        }
        self.shells.clear();
        self.backend.shutdown();
        self.state = GlobeState::Unmounted;

        log::info!(
            "Globe unmounted: released {} materials, {} textures, {} geometries",
            materials,
            textures,
            geometries
        );
    }

    pub fn state(&self) -> GlobeState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.repaint.is_scheduled()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.repaint.stop_handle()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn earth_rotation(&self) -> f32 {
        self.earth_rotation
    }

    pub fn cloud_rotation(&self) -> f32 {
        self.cloud_rotation
    }
}

impl<B: GraphicsBackend> Drop for Globe<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{HeadlessBackend, Release};

    fn params() -> TextureParams {
        TextureParams {
            width: 32,
            height: 16,
            seed: Some(7),
        }
    }

    #[test]
    fn new_globe_is_loading_without_repaint() {
        let globe = Globe::new(HeadlessBackend::new(800, 600), params(), 800, 600).unwrap();
        assert_eq!(globe.state(), GlobeState::Loading);
        assert!(!globe.is_animating());
        assert_eq!(globe.backend().live_geometries(), 3);
        assert_eq!(globe.backend().live_materials(), 3);
        assert_eq!(globe.backend().live_textures(), 0);
    }

    #[test]
    fn mount_applies_maps_and_starts_loop() {
        let globe = Globe::mount(HeadlessBackend::new(800, 600), params(), 800, 600).unwrap();
        assert_eq!(globe.state(), GlobeState::Ready);
        assert!(globe.is_animating());
        assert_eq!(globe.backend().live_textures(), 4);

        let earth = globe.shells[0].material;
        let desc = globe.backend().material(earth).unwrap();
        assert!(desc.maps.diffuse.is_some());
        assert!(desc.maps.normal.is_some());
        assert!(desc.maps.specular.is_some());
        assert_eq!(desc.shininess, 10.0);
    }

    #[test]
    fn frames_spin_clouds_faster_than_earth() {
        let mut globe = Globe::mount(HeadlessBackend::new(800, 600), params(), 800, 600).unwrap();
        for _ in 0..10 {
            assert!(globe.frame());
        }
        assert!((globe.earth_rotation() - 10.0 * EARTH_SPIN).abs() < 1e-6);
        assert!(globe.cloud_rotation() > globe.earth_rotation());
        assert_eq!(globe.backend().frames_rendered(), 10);

        let frame = globe.backend().last_frame().unwrap();
        assert_eq!(frame.draws.len(), 3);
        assert_eq!(frame.clear_color, Color::BLACK);
    }

    #[test]
    fn no_frames_while_loading() {
        let mut globe = Globe::new(HeadlessBackend::new(800, 600), params(), 800, 600).unwrap();
        assert!(!globe.frame());
        assert_eq!(globe.backend().frames_rendered(), 0);
    }

    #[test]
    fn failed_draw_is_skipped() {
        let mut backend = HeadlessBackend::new(800, 600);
        backend.fail_renders = true;
        let mut globe = Globe::mount(backend, params(), 800, 600).unwrap();
        assert!(globe.frame());
        assert!(globe.is_animating());
        assert_eq!(globe.backend().frames_rendered(), 0);
    }

    #[test]
    fn resize_updates_camera_and_backend() {
        let mut globe = Globe::mount(HeadlessBackend::new(800, 600), params(), 800, 600).unwrap();
        globe.resize(1000, 500);
        assert_eq!(globe.camera().aspect, 2.0);
        assert_eq!(globe.backend().size(), (1000, 500));

        globe.resize(0, 500);
        assert_eq!(globe.backend().size(), (1000, 500));
    }

    #[test]
    fn drag_moves_camera_over_frames() {
        let mut globe = Globe::mount(HeadlessBackend::new(800, 600), params(), 800, 600).unwrap();
        globe.on_drag(120.0, 0.0);
        for _ in 0..5 {
            globe.frame();
        }
        assert!(globe.camera().position.x.abs() > 1e-4);

        globe.on_scroll(-50.0);
        globe.frame();
        assert!((globe.camera().position.length() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn unmount_releases_everything_once() {
        let mut backend = HeadlessBackend::new(800, 600);
        {
            let mut globe = Globe::mount(&mut backend, params(), 800, 600).unwrap();
            globe.frame();
            globe.unmount();
            assert_eq!(globe.state(), GlobeState::Unmounted);
            assert!(!globe.is_animating());
            assert!(!globe.frame());
            assert!(!globe.controls().is_enabled());
            globe.unmount();
        }

        assert_eq!(backend.live_resources(), 0);
        assert!(backend.is_shut_down());
        let releases = backend.releases();
        assert_eq!(releases.len(), 3 + 4 + 3 + 1);
        assert_eq!(releases[0], Release::Material("Atmosphere".into()));
        assert_eq!(releases.last(), Some(&Release::Context));
    }

    #[test]
    fn unmount_before_textures_leaves_nothing_scheduled() {
        let mut backend = HeadlessBackend::new(800, 600);
        {
            let mut globe = Globe::new(&mut backend, params(), 800, 600).unwrap();
            let set = generate_texture_set(&params());
            globe.unmount();

            // Generation finishing late must not revive the globe
            globe.apply_textures(&set);
            assert_eq!(globe.state(), GlobeState::Unmounted);
            assert!(!globe.is_animating());
            assert!(!globe.frame());
        }
        assert_eq!(backend.live_resources(), 0);
        assert_eq!(backend.frames_rendered(), 0);
    }

    #[test]
    fn drop_unmounts() {
        let mut backend = HeadlessBackend::new(800, 600);
        {
            let _globe = Globe::mount(&mut backend, params(), 800, 600).unwrap();
        }
        assert_eq!(backend.live_resources(), 0);
        assert!(backend.is_shut_down());
    }
}
