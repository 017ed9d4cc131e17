//! Sphere meshes for the globe, cloud shell and atmosphere

use bytemuck::{Pod, Zeroable};
use std::f32::consts::{PI, TAU};

/// A vertex with position, normal and equirectangular UV
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// A mesh with vertices and indices
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

/// UV sphere centered at the origin.
///
/// `segments` divide longitude, `rings` latitude. Row 0 of the texture maps
/// to the north pole (+Y); u grows eastward. Degenerate triangles at the
/// poles are skipped.
pub fn create_sphere_mesh(radius: f32, segments: u32, rings: u32) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);

    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let theta = v * PI;
        for segment in 0..=segments {
            let u = segment as f32 / segments as f32;
            let phi = u * TAU;

            let normal = [
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            ];
            vertices.push(Vertex {
                position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
                uv: [u, v],
            });
        }
    }

    let stride = segments + 1;
    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * stride + segment + 1;
            let b = ring * stride + segment;
            let c = (ring + 1) * stride + segment;
            let d = (ring + 1) * stride + segment + 1;

            if ring != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if ring != rings - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_counts() {
        let mesh = create_sphere_mesh(1.0, 64, 64);
        assert_eq!(mesh.vertex_count(), 65 * 65);
        // Two triangles per quad, minus one per quad on each polar ring
        assert_eq!(mesh.index_count(), (64 * 64 * 2 - 64 * 2) * 3);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn vertices_lie_on_radius() {
        let mesh = create_sphere_mesh(1.01, 16, 12);
        for v in &mesh.vertices {
            let [x, y, z] = v.position;
            let r = (x * x + y * y + z * z).sqrt();
            assert!((r - 1.01).abs() < 1e-4);
        }
    }

    #[test]
    fn north_pole_at_top_of_texture() {
        let mesh = create_sphere_mesh(1.0, 8, 8);
        assert_eq!(mesh.vertices[0].uv[1], 0.0);
        assert!((mesh.vertices[0].position[1] - 1.0).abs() < 1e-6);
        let last = mesh.vertices.last().unwrap();
        assert_eq!(last.uv[1], 1.0);
        assert!((last.position[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn triangles_face_outward() {
        let mesh = create_sphere_mesh(1.0, 16, 16);
        for tri in mesh.indices.chunks(3) {
            let p = |i: u32| mesh.vertices[i as usize].position;
            let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
            let ab = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let ac = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let n = [
                ab[1] * ac[2] - ab[2] * ac[1],
                ab[2] * ac[0] - ab[0] * ac[2],
                ab[0] * ac[1] - ab[1] * ac[0],
            ];
            let centroid = [
                (a[0] + b[0] + c[0]) / 3.0,
                (a[1] + b[1] + c[1]) / 3.0,
                (a[2] + b[2] + c[2]) / 3.0,
            ];
            let dot = n[0] * centroid[0] + n[1] * centroid[1] + n[2] * centroid[2];
            assert!(dot > 0.0, "inward-facing triangle {:?}", tri);
        }
    }
}
