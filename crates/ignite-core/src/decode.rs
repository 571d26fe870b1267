//! glTF / GLB to [`Asset`] conversion.
//!
//! Only triangle primitives become drawable surfaces. Primitives whose
//! positions cannot be read (e.g. Draco-compressed data) fail the whole
//! decode so the loader can move on to the next candidate.

use crate::error::LoadError;
use crate::scene::{Asset, Material, MaterialId, Mesh, MeshId, NodeId, StandardMaterial};
use fnv::{FnvHashMap, FnvHashSet};
use glam::{Mat4, Vec3, Vec4};

pub fn parse(bytes: &[u8]) -> Result<gltf::Gltf, LoadError> {
    Ok(gltf::Gltf::from_slice(bytes)?)
}

/// `(buffer index, uri)` for every buffer stored outside the file.
pub fn external_buffer_uris(gltf: &gltf::Gltf) -> Vec<(usize, String)> {
    gltf.buffers()
        .filter_map(|buffer| match buffer.source() {
            gltf::buffer::Source::Uri(uri) if !uri.starts_with("data:") => {
                Some((buffer.index(), uri.to_owned()))
            }
            _ => None,
        })
        .collect()
}

/// Build the asset hierarchy of the default scene.
///
/// `external` holds the bytes of buffers listed by [`external_buffer_uris`].
pub fn build_asset(
    gltf: &gltf::Gltf,
    external: &FnvHashMap<usize, Vec<u8>>,
) -> Result<Asset, LoadError> {
    let buffers = collect_buffers(gltf, external)?;
    let mut builder = Asset::builder();

    let mut materials: FnvHashMap<usize, MaterialId> = FnvHashMap::default();
    for material in gltf.materials() {
        if let Some(index) = material.index() {
            materials.insert(index, builder.material(convert_material(&material)));
        }
    }
    let mut default_material = None;

    let mut meshes: FnvHashMap<usize, Vec<MeshId>> = FnvHashMap::default();
    for mesh in gltf.meshes() {
        let mut ids = Vec::new();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!(
                    "[decode] skipping non-triangle primitive {} of mesh {}",
                    primitive.index(),
                    mesh.index()
                );
                continue;
            }
            let reader = primitive.reader(|b| buffers.get(b.index()).map(|d| d.as_slice()));
            let positions: Vec<Vec3> = reader
                .read_positions()
                .ok_or(LoadError::MissingPositions {
                    mesh: mesh.index(),
                    primitive: primitive.index(),
                })?
                .map(Vec3::from)
                .collect();
            let normals = reader
                .read_normals()
                .map(|n| n.map(Vec3::from).collect::<Vec<_>>());
            let indices = match reader.read_indices() {
                Some(i) => i.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            let material = match primitive.material().index() {
                Some(i) => materials.get(&i).copied(),
                None => Some(*default_material.get_or_insert_with(|| {
                    builder.material(Material::Standard(StandardMaterial::default()))
                })),
            };
            ids.push(builder.mesh(Mesh::new(positions, normals, indices, material)));
        }
        meshes.insert(mesh.index(), ids);
    }

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or(LoadError::NoScene)?;
    let mut stack: Vec<(gltf::Node<'_>, Option<NodeId>)> =
        scene.nodes().map(|n| (n, None)).collect();
    stack.reverse();
    let mut visited = FnvHashSet::default();
    while let Some((node, parent)) = stack.pop() {
        if !visited.insert(node.index()) {
            return Err(LoadError::NodeCycle { node: node.index() });
        }
        let local = Mat4::from_cols_array_2d(&node.transform().matrix());
        let node_meshes = node
            .mesh()
            .and_then(|m| meshes.get(&m.index()).cloned())
            .unwrap_or_default();
        let id = builder.node(node.name(), local, node_meshes, parent);
        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev().map(|c| (c, Some(id))));
    }

    Ok(builder.build())
}

fn collect_buffers(
    gltf: &gltf::Gltf,
    external: &FnvHashMap<usize, Vec<u8>>,
) -> Result<Vec<Vec<u8>>, LoadError> {
    gltf.buffers()
        .map(|buffer| match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .clone()
                .ok_or(LoadError::MissingBuffer {
                    index: buffer.index(),
                }),
            gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                Err(LoadError::UnsupportedUri(uri.chars().take(32).collect()))
            }
            gltf::buffer::Source::Uri(_) => {
                external
                    .get(&buffer.index())
                    .cloned()
                    .ok_or(LoadError::MissingBuffer {
                        index: buffer.index(),
                    })
            }
        })
        .collect()
}

fn convert_material(material: &gltf::Material<'_>) -> Material {
    let base_color = Vec4::from(material.pbr_metallic_roughness().base_color_factor());
    if material.unlit() {
        return Material::Basic { color: base_color };
    }
    Material::Standard(StandardMaterial {
        base_color,
        emissive: Vec3::from(material.emissive_factor()),
        emissive_intensity: material.emissive_strength().unwrap_or(1.0),
    })
}
