// Copyright @yucwang 2026

use crate::core::bvh::BVH;
use crate::core::hit::{HitRecord, SurfaceSample};
use crate::core::material::Material;
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::ray::Ray3f;
use crate::math::sampling::face_forward;
use crate::math::transform::Transform;
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
pub enum SceneError {
    EmptyScene,
    EmptyMesh,
    TruncatedIndices(usize),
    VertexIndexOutOfRange { index: u32, vertex_count: usize },
    MeshIndexOutOfRange { index: usize, mesh_count: usize },
    MaterialIndexOutOfRange { index: usize, material_count: usize },
    NoMaterials,
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::EmptyScene =>
                write!(f, "scene has no instances"),
            SceneError::EmptyMesh =>
                write!(f, "mesh has no triangles"),
            SceneError::TruncatedIndices(len) =>
                write!(f, "index count {} is not a multiple of 3", len),
            SceneError::VertexIndexOutOfRange { index, vertex_count } =>
                write!(f, "vertex index {} out of range ({} vertices)", index, vertex_count),
            SceneError::MeshIndexOutOfRange { index, mesh_count } =>
                write!(f, "mesh index {} out of range ({} meshes)", index, mesh_count),
            SceneError::MaterialIndexOutOfRange { index, material_count } =>
                write!(f, "material index {} out of range ({} materials)", index, material_count),
            SceneError::NoMaterials =>
                write!(f, "scene instances reference materials but none are set"),
        }
    }
}

impl std::error::Error for SceneError {}

// Möller-Trumbore without backface culling. Returns the hit distance
// and the barycentric weights of v1 and v2; degenerate triangles are
// reported as misses.
pub(crate) fn intersect_triangle(v0: &Vector3f, v1: &Vector3f, v2: &Vector3f,
                                 ray: &Ray3f) -> Option<(Float, Float, Float)> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let p = ray.dir().cross(&e2);
    let det = e1.dot(&p);
    if det.abs() < 1e-9 {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin() - v0;
    let b1 = s.dot(&p) * inv_det;
    if b1 < 0.0 || b1 > 1.0 {
        return None;
    }

    let q = s.cross(&e1);
    let b2 = ray.dir().dot(&q) * inv_det;
    if b2 < 0.0 || b1 + b2 > 1.0 {
        return None;
    }

    let t = e2.dot(&q) * inv_det;
    if !ray.test_segment(t) {
        return None;
    }

    Some((t, b1, b2))
}

/// Triangle geometry in object space: flat vertex positions plus index
/// triples, with a triangle-level BVH built at construction. Immutable
/// once built.
pub struct TriangleMesh {
    vertices: Vec<Vector3f>,
    indices: Vec<u32>,
    bounds: AABB,
    bvh: BVH,
}

impl TriangleMesh {
    pub fn new(vertices: Vec<Vector3f>, indices: Vec<u32>) -> Result<Self, SceneError> {
        if indices.is_empty() {
            return Err(SceneError::EmptyMesh);
        }
        if indices.len() % 3 != 0 {
            return Err(SceneError::TruncatedIndices(indices.len()));
        }
        for &index in &indices {
            if index as usize >= vertices.len() {
                return Err(SceneError::VertexIndexOutOfRange {
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        let triangle_count = indices.len() / 3;
        let mut prim_bounds = Vec::with_capacity(triangle_count);
        let mut bounds = AABB::default();
        for prim in 0..triangle_count {
            let v0 = vertices[indices[3 * prim] as usize];
            let v1 = vertices[indices[3 * prim + 1] as usize];
            let v2 = vertices[indices[3 * prim + 2] as usize];
            let tri_bounds = AABB::from_points(&[v0, v1, v2]);
            bounds.expand_by_aabb(&tri_bounds);
            prim_bounds.push(tri_bounds);
        }

        let bvh = BVH::build(&prim_bounds);
        Ok(Self { vertices, indices, bounds, bvh })
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounds(&self) -> AABB {
        self.bounds
    }

    pub fn triangle_vertices(&self, prim: usize) -> (Vector3f, Vector3f, Vector3f) {
        let v0 = self.vertices[self.indices[3 * prim] as usize];
        let v1 = self.vertices[self.indices[3 * prim + 1] as usize];
        let v2 = self.vertices[self.indices[3 * prim + 2] as usize];
        (v0, v1, v2)
    }

    /// Closest triangle hit in object space: primitive index plus
    /// `(t, b1, b2)`.
    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<(usize, (Float, Float, Float))> {
        self.bvh.ray_intersection(ray, |prim, ray| {
            let (v0, v1, v2) = self.triangle_vertices(prim);
            intersect_triangle(&v0, &v1, &v2, ray).map(|hit| (hit, hit.0))
        })
    }
}

/// One placement of a mesh in the world, with its material assignment.
pub struct Instance {
    pub mesh_index: usize,
    pub object_to_world: Transform,
    pub material_index: usize,
}

impl Instance {
    pub fn new(mesh_index: usize, object_to_world: Transform, material_index: usize) -> Self {
        Self { mesh_index, object_to_world, material_index }
    }
}

/// Background radiance for rays that leave the scene: a horizon-to-
/// zenith gradient above, a constant ground color below.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sky {
    pub horizon: Vector3f,
    pub zenith: Vector3f,
    pub ground: Vector3f,
}

impl Default for Sky {
    fn default() -> Self {
        Self {
            horizon: Vector3f::new(1.0, 1.0, 1.0),
            zenith: Vector3f::new(0.25, 0.5, 1.0),
            ground: Vector3f::new(0.03, 0.03, 0.03),
        }
    }
}

impl Sky {
    pub fn radiance(&self, direction: &Vector3f) -> Vector3f {
        if direction.y > 0.0 {
            self.horizon * (1.0 - direction.y) + self.zenith * direction.y
        } else {
            self.ground
        }
    }
}

pub struct Scene {
    meshes: Vec<TriangleMesh>,
    instances: Vec<Instance>,
    materials: Vec<Arc<dyn Material>>,
    sky: Sky,
    scene_bounds: AABB,
    bvh: Option<BVH>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            instances: Vec::new(),
            materials: Vec::new(),
            sky: Sky::default(),
            scene_bounds: AABB::default(),
            bvh: None,
        }
    }

    pub fn add_mesh(&mut self, mesh: TriangleMesh) -> usize {
        self.bvh = None;
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn add_instance(&mut self, instance: Instance) {
        self.bvh = None;
        self.instances.push(instance);
    }

    pub fn set_materials(&mut self, materials: Vec<Arc<dyn Material>>) {
        self.materials = materials;
    }

    pub fn set_sky(&mut self, sky: Sky) {
        self.sky = sky;
    }

    pub fn sky(&self) -> &Sky {
        &self.sky
    }

    pub fn meshes(&self) -> &Vec<TriangleMesh> {
        &self.meshes
    }

    pub fn instances(&self) -> &Vec<Instance> {
        &self.instances
    }

    pub fn materials(&self) -> &Vec<Arc<dyn Material>> {
        &self.materials
    }

    pub fn scene_bounds(&self) -> &AABB {
        &self.scene_bounds
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Validates all cross-references and builds the instance-level
    /// acceleration structure. Must succeed before any ray is traced.
    pub fn build(&mut self) -> Result<(), SceneError> {
        if self.instances.is_empty() {
            return Err(SceneError::EmptyScene);
        }
        if self.materials.is_empty() {
            return Err(SceneError::NoMaterials);
        }

        let mut instance_bounds = Vec::with_capacity(self.instances.len());
        let mut scene_bounds = AABB::default();
        for instance in &self.instances {
            if instance.mesh_index >= self.meshes.len() {
                return Err(SceneError::MeshIndexOutOfRange {
                    index: instance.mesh_index,
                    mesh_count: self.meshes.len(),
                });
            }
            if instance.material_index >= self.materials.len() {
                return Err(SceneError::MaterialIndexOutOfRange {
                    index: instance.material_index,
                    material_count: self.materials.len(),
                });
            }

            let mesh_bounds = self.meshes[instance.mesh_index].bounds();
            let bounds = transform_bounds(&instance.object_to_world, &mesh_bounds);
            scene_bounds.expand_by_aabb(&bounds);
            instance_bounds.push(bounds);
        }

        self.bvh = Some(BVH::build(&instance_bounds));
        self.scene_bounds = scene_bounds;
        Ok(())
    }

    /// Closest hit against every instance. The ray is carried into each
    /// instance's object space; the direction length lost to the
    /// transform is folded back into the reported world-space distance.
    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<HitRecord> {
        let bvh = self.bvh.as_ref().expect("Scene::build must succeed before ray_intersection");

        bvh.ray_intersection(ray, |instance_index, world_ray| {
            let instance = &self.instances[instance_index];
            let mesh = &self.meshes[instance.mesh_index];

            let origin = instance.object_to_world.inv_apply_point(world_ray.origin());
            let dir_raw = instance.object_to_world.inv_apply_vector(world_ray.dir());
            let len = dir_raw.norm();
            if len <= 0.0 {
                return None;
            }

            let object_ray = Ray3f::new(origin, dir_raw,
                                        Some(world_ray.min_t * len),
                                        Some(world_ray.max_t * len));
            mesh.ray_intersection(&object_ray).map(|(prim, (t_object, b1, b2))| {
                let t_world = t_object / len;
                ((prim, Vector2f::new(b1, b2), t_world), t_world)
            })
        }).map(|(instance_index, (prim, barycentrics, t))| {
            HitRecord::new(instance_index, prim, barycentrics, t)
        })
    }

    /// Reconstructs the shading-ready surface point for a hit.
    pub fn surface_sample(&self, hit: &HitRecord, incoming: Vector3f) -> SurfaceSample {
        let instance = &self.instances[hit.instance_index];
        let mesh = &self.meshes[instance.mesh_index];
        let (v0, v1, v2) = mesh.triangle_vertices(hit.primitive_index);

        let barycentrics = Vector3f::new(
            1.0 - hit.barycentrics.x - hit.barycentrics.y,
            hit.barycentrics.x,
            hit.barycentrics.y,
        );
        let object_position = v0 * barycentrics.x
            + v1 * barycentrics.y
            + v2 * barycentrics.z;
        let world_position = instance.object_to_world.apply_point(object_position);

        let object_normal = (v1 - v0).cross(&(v2 - v0));
        let world_normal = instance.object_to_world
            .apply_normal(object_normal)
            .normalize();
        let world_normal = face_forward(world_normal, incoming);

        SurfaceSample::new(hit.primitive_index, object_position,
                           world_position, world_normal, incoming)
    }

    pub fn material_for(&self, hit: &HitRecord) -> &dyn Material {
        self.materials[self.instances[hit.instance_index].material_index].as_ref()
    }
}

fn transform_bounds(transform: &Transform, bounds: &AABB) -> AABB {
    let mut corners = [Vector3f::new(0.0, 0.0, 0.0); 8];
    for i in 0..8 {
        let corner = Vector3f::new(
            if i & 1 == 0 { bounds.p_min[0] } else { bounds.p_max[0] },
            if i & 2 == 0 { bounds.p_min[1] } else { bounds.p_max[1] },
            if i & 4 == 0 { bounds.p_min[2] } else { bounds.p_max[2] },
        );
        corners[i] = transform.apply_point(corner);
    }
    AABB::from_points(&corners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::ScatterRecord;
    use crate::core::rng::PathRng;

    struct TestMaterial;

    impl Material for TestMaterial {
        fn scatter(&self, sample: &SurfaceSample, _rng: &mut PathRng) -> ScatterRecord {
            ScatterRecord::new(Vector3f::new(1.0, 1.0, 1.0),
                               sample.world_position,
                               sample.world_normal)
        }
    }

    fn unit_quad_mesh() -> TriangleMesh {
        // Two triangles spanning [0,1]^2 in the z=0 plane.
        let vertices = vec![
            Vector3f::new(0.0, 0.0, 0.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(1.0, 1.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
        ];
        let indices = vec![0, 1, 2, 0, 2, 3];
        TriangleMesh::new(vertices, indices).expect("valid mesh")
    }

    fn quad_scene(object_to_world: Transform) -> Scene {
        let mut scene = Scene::new();
        let mesh = scene.add_mesh(unit_quad_mesh());
        scene.add_instance(Instance::new(mesh, object_to_world, 0));
        scene.set_materials(vec![Arc::new(TestMaterial)]);
        scene.build().expect("valid scene");
        scene
    }

    #[test]
    fn test_intersect_triangle_basic() {
        let v0 = Vector3f::new(0.0, 0.0, 0.0);
        let v1 = Vector3f::new(1.0, 0.0, 0.0);
        let v2 = Vector3f::new(0.0, 1.0, 0.0);

        let ray = Ray3f::new(Vector3f::new(0.25, 0.25, 1.0),
                             Vector3f::new(0.0, 0.0, -1.0), None, None);
        let (t, b1, b2) = intersect_triangle(&v0, &v1, &v2, &ray).expect("hit");
        assert!((t - 1.0).abs() < 1e-6);
        assert!((b1 - 0.25).abs() < 1e-6);
        assert!((b2 - 0.25).abs() < 1e-6);

        // From the back side the triangle is still hit.
        let back = Ray3f::new(Vector3f::new(0.25, 0.25, -1.0),
                              Vector3f::new(0.0, 0.0, 1.0), None, None);
        assert!(intersect_triangle(&v0, &v1, &v2, &back).is_some());

        // Outside the triangle, behind the origin, and degenerate.
        let outside = Ray3f::new(Vector3f::new(2.0, 2.0, 1.0),
                                 Vector3f::new(0.0, 0.0, -1.0), None, None);
        assert!(intersect_triangle(&v0, &v1, &v2, &outside).is_none());

        let behind = Ray3f::new(Vector3f::new(0.25, 0.25, -1.0),
                                Vector3f::new(0.0, 0.0, -1.0), None, None);
        assert!(intersect_triangle(&v0, &v1, &v2, &behind).is_none());

        let degenerate = intersect_triangle(&v0, &v0, &v2, &ray);
        assert!(degenerate.is_none());
    }

    #[test]
    fn test_mesh_validation() {
        let vertices = vec![
            Vector3f::new(0.0, 0.0, 0.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
        ];

        match TriangleMesh::new(vertices.clone(), vec![]) {
            Err(SceneError::EmptyMesh) => {}
            other => panic!("expected EmptyMesh, got {:?}", other.err()),
        }

        match TriangleMesh::new(vertices.clone(), vec![0, 1]) {
            Err(SceneError::TruncatedIndices(2)) => {}
            other => panic!("expected TruncatedIndices, got {:?}", other.err()),
        }

        match TriangleMesh::new(vertices, vec![0, 1, 3]) {
            Err(SceneError::VertexIndexOutOfRange { index: 3, vertex_count: 3 }) => {}
            other => panic!("expected VertexIndexOutOfRange, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_scene_validation() {
        let mut scene = Scene::new();
        scene.set_materials(vec![Arc::new(TestMaterial)]);
        match scene.build() {
            Err(SceneError::EmptyScene) => {}
            other => panic!("expected EmptyScene, got {:?}", other.err()),
        }

        let mut scene = Scene::new();
        let mesh = scene.add_mesh(unit_quad_mesh());
        scene.add_instance(Instance::new(mesh, Transform::default(), 4));
        scene.set_materials(vec![Arc::new(TestMaterial)]);
        match scene.build() {
            Err(SceneError::MaterialIndexOutOfRange { index: 4, material_count: 1 }) => {}
            other => panic!("expected MaterialIndexOutOfRange, got {:?}", other.err()),
        }

        let mut scene = Scene::new();
        scene.add_instance(Instance::new(7, Transform::default(), 0));
        scene.set_materials(vec![Arc::new(TestMaterial)]);
        match scene.build() {
            Err(SceneError::MeshIndexOutOfRange { index: 7, mesh_count: 0 }) => {}
            other => panic!("expected MeshIndexOutOfRange, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_scene_closest_instance_wins() {
        let mut scene = Scene::new();
        let mesh = scene.add_mesh(unit_quad_mesh());
        scene.add_instance(Instance::new(
            mesh, Transform::translate(Vector3f::new(0.0, 0.0, -5.0)), 0));
        scene.add_instance(Instance::new(
            mesh, Transform::translate(Vector3f::new(0.0, 0.0, -2.0)), 0));
        scene.set_materials(vec![Arc::new(TestMaterial)]);
        scene.build().expect("valid scene");

        let ray = Ray3f::new(Vector3f::new(0.5, 0.5, 0.0),
                             Vector3f::new(0.0, 0.0, -1.0), None, None);
        let hit = scene.ray_intersection(&ray).expect("hit");
        assert_eq!(hit.instance_index, 1);
        assert!((hit.t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_scaled_instance_reports_world_distance() {
        // A scaled instance must report t in world units, not object units.
        let scene = quad_scene(Transform::translate(Vector3f::new(0.0, 0.0, -4.0))
            .compose(&Transform::uniform_scale(2.0)));

        let ray = Ray3f::new(Vector3f::new(1.5, 1.5, 0.0),
                             Vector3f::new(0.0, 0.0, -1.0), None, None);
        let hit = scene.ray_intersection(&ray).expect("hit");
        assert!((hit.t - 4.0).abs() < 1e-5);

        let sample = scene.surface_sample(&hit, ray.dir());
        assert!((sample.world_position - Vector3f::new(1.5, 1.5, -4.0)).norm() < 1e-5);
        assert!((sample.object_position - Vector3f::new(0.75, 0.75, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_surface_sample_properties() {
        let scene = quad_scene(Transform::default());
        let ray = Ray3f::new(Vector3f::new(0.3, 0.4, 2.0),
                             Vector3f::new(0.0, 0.0, -1.0), None, None);
        let hit = scene.ray_intersection(&ray).expect("hit");

        // The two reported barycentrics leave room for the implied first.
        let b0 = 1.0 - hit.barycentrics.x - hit.barycentrics.y;
        assert!(b0 >= -1e-6 && b0 <= 1.0 + 1e-6);
        assert!((b0 + hit.barycentrics.x + hit.barycentrics.y - 1.0).abs() < 1e-6);

        let sample = scene.surface_sample(&hit, ray.dir());
        assert!((sample.world_normal.norm() - 1.0).abs() < 1e-5);
        assert!(sample.world_normal.dot(&ray.dir()) <= 0.0);
        assert!((sample.world_position - Vector3f::new(0.3, 0.4, 0.0)).norm() < 1e-5);

        // Approaching from the other side flips the oriented normal.
        let back_ray = Ray3f::new(Vector3f::new(0.3, 0.4, -2.0),
                                  Vector3f::new(0.0, 0.0, 1.0), None, None);
        let back_hit = scene.ray_intersection(&back_ray).expect("hit");
        let back_sample = scene.surface_sample(&back_hit, back_ray.dir());
        assert!(back_sample.world_normal.dot(&back_ray.dir()) <= 0.0);
        assert!((back_sample.world_normal + sample.world_normal).norm() < 1e-5);
    }

    #[test]
    fn test_rotated_instance_normal() {
        // Rotate the quad so its normal tilts; the resolver must
        // transform normals with the inverse transpose and normalize.
        let scene = quad_scene(Transform::rotate(Vector3f::new(1.0, 0.0, 0.0), 0.5));
        let ray = Ray3f::new(Vector3f::new(0.4, 0.2, 3.0),
                             Vector3f::new(0.0, 0.0, -1.0), None, None);
        let hit = scene.ray_intersection(&ray).expect("hit");
        let sample = scene.surface_sample(&hit, ray.dir());

        assert!((sample.world_normal.norm() - 1.0).abs() < 1e-5);
        assert!(sample.world_normal.dot(&ray.dir()) <= 0.0);
        let expected = Vector3f::new(0.0, -(0.5f32.sin()), 0.5f32.cos());
        assert!((sample.world_normal - expected).norm() < 1e-4);
    }

    #[test]
    fn test_sky_radiance() {
        let sky = Sky::default();
        let up = sky.radiance(&Vector3f::new(0.0, 1.0, 0.0));
        assert!((up - Vector3f::new(0.25, 0.5, 1.0)).norm() < 1e-6);

        let down = sky.radiance(&Vector3f::new(0.0, -1.0, 0.0));
        assert_eq!(down, Vector3f::new(0.03, 0.03, 0.03));

        let level = sky.radiance(&Vector3f::new(1.0, 0.0, 0.0));
        assert_eq!(level, Vector3f::new(0.03, 0.03, 0.03));

        let mid = sky.radiance(&Vector3f::new(0.75f32.sqrt(), 0.5, 0.0));
        assert!((mid - Vector3f::new(0.625, 0.75, 1.0)).norm() < 1e-6);
    }
}
