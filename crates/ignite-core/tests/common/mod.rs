// Shared glTF fixtures: a single cuboid mesh with a "flame" child node,
// serialised either as GLB or as JSON plus an external buffer.

#![allow(dead_code)]

use fnv::FnvHashMap;
use futures::future::{FutureExt, LocalBoxFuture};
use glam::Vec3;
use ignite_core::{AssetSource, LoadError, Mesh};
use serde_json::{json, Value};
use std::cell::RefCell;

const GLB_MAGIC: u32 = 0x4654_6C67;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

/// Little-endian vertex positions followed by u16 indices.
pub fn cuboid_bin(min: Vec3, max: Vec3) -> Vec<u8> {
    let mesh = Mesh::cuboid(min, max, None);
    let mut bin = Vec::new();
    for p in &mesh.positions {
        for c in p.to_array() {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in &mesh.indices {
        bin.extend_from_slice(&(*i as u16).to_le_bytes());
    }
    bin
}

pub fn cuboid_json(min: Vec3, max: Vec3, buffer_uri: Option<&str>) -> Value {
    let positions_len = 8 * 12;
    let indices_len = 36 * 2;
    let mut buffer = json!({ "byteLength": positions_len + indices_len });
    if let Some(uri) = buffer_uri {
        buffer["uri"] = json!(uri);
    }
    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "house", "mesh": 0, "children": [1] },
            { "name": "flame", "translation": [0.0, max.y, 0.0] }
        ],
        "meshes": [{
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 }]
        }],
        "materials": [{
            "pbrMetallicRoughness": { "baseColorFactor": [0.8, 0.6, 0.4, 1.0] },
            "emissiveFactor": [0.0, 0.1, 0.0]
        }],
        "buffers": [buffer],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": positions_len, "target": 34962 },
            { "buffer": 0, "byteOffset": positions_len, "byteLength": indices_len, "target": 34963 }
        ],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 8, "type": "VEC3",
                "min": min.to_array(), "max": max.to_array()
            },
            { "bufferView": 1, "componentType": 5123, "count": 36, "type": "SCALAR" }
        ]
    })
}

/// Pack a JSON document and binary chunk into a GLB container.
pub fn glb(json: &Value, bin: &[u8]) -> Vec<u8> {
    let mut json_bytes = serde_json::to_vec(json).expect("serialize gltf json");
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    let total = 12 + 8 + json_bytes.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&json_bytes);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    out.extend_from_slice(&bin);
    out
}

pub fn cuboid_glb(min: Vec3, max: Vec3) -> Vec<u8> {
    glb(&cuboid_json(min, max, None), &cuboid_bin(min, max))
}

/// URL-keyed in-memory source that records every request.
#[derive(Default)]
pub struct MapSource {
    files: FnvHashMap<String, Vec<u8>>,
    pub requested: RefCell<Vec<String>>,
}

impl MapSource {
    pub fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(url.to_owned(), bytes);
        self
    }
}

impl AssetSource for MapSource {
    fn fetch(&self, url: &str) -> LocalBoxFuture<'_, Result<Vec<u8>, LoadError>> {
        self.requested.borrow_mut().push(url.to_owned());
        let result = self.files.get(url).cloned().ok_or_else(|| LoadError::Fetch {
            url: url.to_owned(),
            reason: String::from("404"),
        });
        async move { result }.boxed_local()
    }
}
