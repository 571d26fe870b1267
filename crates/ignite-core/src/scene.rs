//! Loaded asset model: a node hierarchy of drawable surfaces and materials.
//!
//! The asset is owned by the viewer for its whole lifetime. Its root
//! transform is written once by framing; afterwards only the effect player
//! touches it, and only through material emissive fields and companion
//! node visibility.

use crate::bounds::Aabb;
use fnv::FnvHashMap;
use glam::{Mat4, Vec3, Vec4};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// A drawable surface: one mesh instanced by one node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId {
    pub node: NodeId,
    pub mesh: MeshId,
}

/// Lit material with an emissive channel.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardMaterial {
    pub base_color: Vec4,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            base_color: Vec4::ONE,
            emissive: Vec3::ZERO,
            emissive_intensity: 1.0,
        }
    }
}

/// Emissive handle exposed by materials that support highlighting.
#[derive(Debug)]
pub struct Emissive<'a> {
    pub color: &'a mut Vec3,
    pub intensity: &'a mut f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    Standard(StandardMaterial),
    /// Unlit flat colour.
    Basic { color: Vec4 },
    Other,
}

impl Material {
    /// Capability query: only lit materials can be highlighted.
    pub fn emissive_mut(&mut self) -> Option<Emissive<'_>> {
        match self {
            Material::Standard(m) => Some(Emissive {
                color: &mut m.emissive,
                intensity: &mut m.emissive_intensity,
            }),
            Material::Basic { .. } | Material::Other => None,
        }
    }

    pub fn base_color(&self) -> Vec4 {
        match self {
            Material::Standard(m) => m.base_color,
            Material::Basic { color } => *color,
            Material::Other => Vec4::new(0.8, 0.8, 0.8, 1.0),
        }
    }

    /// Emissive colour already scaled by intensity.
    pub fn emitted(&self) -> Vec3 {
        match self {
            Material::Standard(m) => m.emissive * m.emissive_intensity,
            Material::Basic { .. } | Material::Other => Vec3::ZERO,
        }
    }

    pub fn is_lit(&self) -> bool {
        !matches!(self, Material::Basic { .. })
    }
}

#[derive(Clone, Debug)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Triangle list.
    pub indices: Vec<u32>,
    pub material: Option<MaterialId>,
    pub local_bounds: Aabb,
}

impl Mesh {
    /// Build a triangle mesh, generating smooth normals when none are given.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        indices: Vec<u32>,
        material: Option<MaterialId>,
    ) -> Self {
        let normals = match normals {
            Some(n) if n.len() == positions.len() => n,
            _ => compute_normals(&positions, &indices),
        };
        let local_bounds = Aabb::from_points(positions.iter().copied());
        Self {
            positions,
            normals,
            indices,
            material,
            local_bounds,
        }
    }

    /// Axis-aligned box spanning `min..max`, twelve triangles.
    pub fn cuboid(min: Vec3, max: Vec3, material: Option<MaterialId>) -> Self {
        let positions = Aabb::new(min, max).corners().to_vec();
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -z
            4, 5, 6, 4, 6, 7, // +z
            0, 1, 5, 0, 5, 4, // -y
            3, 6, 2, 3, 7, 6, // +y
            0, 4, 7, 0, 7, 3, // -x
            1, 2, 6, 1, 6, 5, // +x
        ];
        Self::new(positions, None, indices, material)
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|t| {
            Some([
                *self.positions.get(t[0] as usize)?,
                *self.positions.get(t[1] as usize)?,
                *self.positions.get(t[2] as usize)?,
            ])
        })
    }
}

fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for t in indices.chunks_exact(3) {
        let (a, b, c) = (t[0] as usize, t[1] as usize, t[2] as usize);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let n = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: Option<String>,
    pub local: Mat4,
    pub children: Vec<NodeId>,
    pub meshes: Vec<MeshId>,
    pub visible: bool,
}

/// Uniform scale followed by translation, applied above every root node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootTransform {
    pub scale: f32,
    pub translation: Vec3,
}

impl Default for RootTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translation: Vec3::ZERO,
        }
    }
}

impl RootTransform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

#[derive(Clone, Debug, Default)]
pub struct Asset {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    names: FnvHashMap<String, NodeId>,
    transform: RootTransform,
    world: Vec<Mat4>,
}

impl Asset {
    pub fn builder() -> AssetBuilder {
        AssetBuilder::default()
    }

    pub fn transform(&self) -> RootTransform {
        self.transform
    }

    /// Replace the root transform and refresh cached world matrices.
    pub fn set_transform(&mut self, transform: RootTransform) {
        self.transform = transform;
        self.update_world_transforms();
    }

    /// Recompute every node's world matrix from the root transform down.
    pub fn update_world_transforms(&mut self) {
        self.world.clear();
        self.world.resize(self.nodes.len(), Mat4::IDENTITY);
        let root = self.transform.matrix();
        let mut stack: Vec<(NodeId, Mat4)> = self.roots.iter().map(|&r| (r, root)).collect();
        while let Some((id, parent)) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };
            let world = parent * node.local;
            self.world[id.0] = world;
            stack.extend(node.children.iter().map(|&c| (c, world)));
        }
    }

    pub fn world_matrix(&self, node: NodeId) -> Mat4 {
        self.world.get(node.0).copied().unwrap_or(Mat4::IDENTITY)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Exact-name lookup of a node.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Show or hide a node and its whole subtree.
    pub fn set_subtree_visible(&mut self, id: NodeId, visible: bool) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(n.0) {
                node.visible = visible;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Every drawable surface reachable from the roots, depth first.
    pub fn surfaces(&self) -> Vec<SurfaceId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };
            out.extend(node.meshes.iter().map(|&mesh| SurfaceId { node: id, mesh }));
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn is_visible(&self, surface: SurfaceId) -> bool {
        self.nodes.get(surface.node.0).is_some_and(|n| n.visible)
    }

    /// World-space bounds over every drawable surface's vertices.
    pub fn world_bounds(&self) -> Aabb {
        let mut aabb = Aabb::EMPTY;
        for s in self.surfaces() {
            let Some(mesh) = self.mesh(s.mesh) else {
                continue;
            };
            let m = self.world_matrix(s.node);
            for p in &mesh.positions {
                aabb.expand(m.transform_point3(*p));
            }
        }
        aabb
    }

    /// World-space origin of a node.
    pub fn node_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }
}

/// Incremental asset construction used by the glTF decoder and by tests.
#[derive(Default)]
pub struct AssetBuilder {
    nodes: Vec<Node>,
    parents: Vec<Option<NodeId>>,
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
}

impl AssetBuilder {
    pub fn material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn node(
        &mut self,
        name: Option<&str>,
        local: Mat4,
        meshes: Vec<MeshId>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.map(str::to_owned),
            local,
            children: Vec::new(),
            meshes,
            visible: true,
        });
        self.parents.push(parent);
        if let Some(p) = parent {
            if let Some(parent_node) = self.nodes.get_mut(p.0) {
                parent_node.children.push(id);
            }
        }
        id
    }

    pub fn build(self) -> Asset {
        let roots = self
            .parents
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_none())
            .map(|(i, _)| NodeId(i))
            .collect();
        let mut names = FnvHashMap::default();
        for (i, node) in self.nodes.iter().enumerate() {
            if let Some(name) = &node.name {
                // first node wins on duplicate names
                names.entry(name.clone()).or_insert(NodeId(i));
            }
        }
        let mut asset = Asset {
            nodes: self.nodes,
            roots,
            meshes: self.meshes,
            materials: self.materials,
            names,
            transform: RootTransform::default(),
            world: Vec::new(),
        };
        asset.update_world_transforms();
        asset
    }
}
