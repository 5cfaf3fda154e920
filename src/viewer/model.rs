//! glTF model loading.
//!
//! The load runs on a one-shot background thread and delivers the parsed
//! model over an `mpsc` channel the viewer drains each frame. Failure
//! never reaches the render loop: the channel simply never resolves and
//! the scene stays modelless (a warning is logged).

use std::sync::mpsc;

use glam::{Mat3, Mat4, Vec3};

use crate::error::GlimmerError;
use crate::viewer::material::MeshMaterial;

/// One flattened mesh primitive in world space (node transforms baked in).
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Name of the source mesh, for logs.
    pub name: String,
    /// World-space vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// World-space vertex normals.
    pub normals: Vec<[f32; 3]>,
    /// Triangle-list indices.
    pub indices: Vec<u32>,
    /// Material attributes (authored values until the override runs).
    pub material: MeshMaterial,
}

/// A fully parsed model: the flattened mesh hierarchy.
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    /// All mesh primitives of the model.
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    /// Replace every mesh's material with the given preset, regardless of
    /// the authored values.
    pub fn apply_override(&mut self, preset: &MeshMaterial) {
        for mesh in &mut self.meshes {
            mesh.material = preset.clone();
        }
    }

    /// Total vertex count across all meshes.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.positions.len()).sum()
    }
}

/// Spawn the one-shot load thread for `source` and return the channel the
/// model arrives on.
///
/// On load failure the sender is dropped without sending; the receiver
/// side just never sees a model.
///
/// # Errors
///
/// Returns [`GlimmerError::ThreadSpawn`] if the thread cannot be created.
pub fn spawn_load(
    source: String,
) -> Result<mpsc::Receiver<ModelData>, GlimmerError> {
    let (tx, rx) = mpsc::channel();
    let _handle = std::thread::Builder::new()
        .name("model-load".to_owned())
        .spawn(move || match load_model(&source) {
            Ok(model) => {
                log::debug!(
                    "loaded {:?}: {} meshes, {} vertices",
                    source,
                    model.meshes.len(),
                    model.vertex_count()
                );
                let _ = tx.send(model);
            }
            Err(e) => {
                log::warn!("model load failed, scene stays empty: {e}");
            }
        })
        .map_err(GlimmerError::ThreadSpawn)?;
    Ok(rx)
}

/// Fetch and parse a model from a URL or filesystem path.
///
/// # Errors
///
/// Returns [`GlimmerError::ModelLoad`] for fetch/parse failures and
/// [`GlimmerError::Io`] for filesystem failures.
pub fn load_model(source: &str) -> Result<ModelData, GlimmerError> {
    let bytes = fetch_bytes(source)?;
    parse_gltf(&bytes)
}

fn fetch_bytes(source: &str) -> Result<Vec<u8>, GlimmerError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        log::debug!("fetching model from {source}");
        let response = ureq::get(source)
            .call()
            .map_err(|e| GlimmerError::ModelLoad(e.to_string()))?;
        response
            .into_body()
            .read_to_vec()
            .map_err(|e| GlimmerError::ModelLoad(e.to_string()))
    } else {
        std::fs::read(source).map_err(GlimmerError::Io)
    }
}

fn parse_gltf(bytes: &[u8]) -> Result<ModelData, GlimmerError> {
    let (document, buffers, _images) = gltf::import_slice(bytes)
        .map_err(|e| GlimmerError::ModelLoad(e.to_string()))?;

    let mut model = ModelData::default();

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| {
            GlimmerError::ModelLoad("asset contains no scene".to_owned())
        })?;

    for node in scene.nodes() {
        flatten_node(&node, Mat4::IDENTITY, &buffers, &mut model);
    }

    if model.meshes.is_empty() {
        return Err(GlimmerError::ModelLoad(
            "asset contains no mesh primitives".to_owned(),
        ));
    }

    Ok(model)
}

/// Walk the node hierarchy, baking each node's world transform into its
/// mesh vertices.
fn flatten_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    model: &mut ModelData,
) {
    let local = Mat4::from_cols_array_2d(&node.transform().matrix());
    let world = parent * local;

    if let Some(mesh) = node.mesh() {
        let name = mesh.name().unwrap_or("mesh").to_owned();
        for primitive in mesh.primitives() {
            match read_primitive(&name, &primitive, world, buffers) {
                Some(data) => model.meshes.push(data),
                None => log::warn!(
                    "skipping primitive of {name:?}: missing positions"
                ),
            }
        }
    }

    for child in node.children() {
        flatten_node(&child, world, buffers, model);
    }
}

fn read_primitive(
    name: &str,
    primitive: &gltf::Primitive<'_>,
    world: Mat4,
    buffers: &[gltf::buffer::Data],
) -> Option<MeshData> {
    let reader = primitive
        .reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();

    let positions: Vec<[f32; 3]> = reader
        .read_positions()?
        .map(|p| world.transform_point3(Vec3::from_array(p)).to_array())
        .collect();

    let indices: Vec<u32> = reader.read_indices().map_or_else(
        || (0..positions.len() as u32).collect(),
        |iter| iter.into_u32().collect(),
    );

    let normals: Vec<[f32; 3]> = reader.read_normals().map_or_else(
        || compute_normals(&positions, &indices),
        |iter| {
            iter.map(|n| {
                (normal_matrix * Vec3::from_array(n))
                    .normalize_or_zero()
                    .to_array()
            })
            .collect()
        },
    );

    Some(MeshData {
        name: name.to_owned(),
        positions,
        normals,
        indices,
        material: convert_material(&primitive.material()),
    })
}

fn convert_material(material: &gltf::Material<'_>) -> MeshMaterial {
    let pbr = material.pbr_metallic_roughness();
    let base = pbr.base_color_factor();
    let emissive = material.emissive_factor();

    let opacity = match material.alpha_mode() {
        gltf::material::AlphaMode::Blend => base[3],
        _ => 1.0,
    };

    MeshMaterial {
        base_color: [base[0], base[1], base[2]],
        opacity,
        metalness: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
        emissive,
        ..Default::default()
    }
}

/// Area-weighted smooth normals for primitives that ship without them.
pub(crate) fn compute_normals(
    positions: &[[f32; 3]],
    indices: &[u32],
) -> Vec<[f32; 3]> {
    let mut accumulated = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let a = Vec3::from_array(positions[tri[0] as usize]);
        let b = Vec3::from_array(positions[tri[1] as usize]);
        let c = Vec3::from_array(positions[tri[2] as usize]);
        let face = (b - a).cross(c - a);
        for &idx in tri {
            accumulated[idx as usize] += face;
        }
    }

    accumulated
        .into_iter()
        .map(|n| n.normalize_or_zero().to_array())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_mesh(material: MeshMaterial) -> MeshData {
        MeshData {
            name: "facet".to_owned(),
            positions: vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 3],
            indices: vec![0, 1, 2],
            material,
        }
    }

    #[test]
    fn override_replaces_every_material() {
        let authored = MeshMaterial {
            base_color: [0.8, 0.1, 0.1],
            opacity: 1.0,
            metalness: 0.0,
            roughness: 0.9,
            ..Default::default()
        };
        let mut model = ModelData {
            meshes: vec![
                synthetic_mesh(authored.clone()),
                synthetic_mesh(MeshMaterial::default()),
                synthetic_mesh(authored),
            ],
        };

        model.apply_override(&MeshMaterial::glass());

        for mesh in &model.meshes {
            assert_eq!(mesh.material.opacity, 0.82);
            assert_eq!(mesh.material.metalness, 1.0);
            assert_eq!(mesh.material.roughness, 0.001);
            assert_eq!(mesh.material.base_color, [1.0, 1.0, 1.0]);
        }
    }

    #[test]
    fn computed_normals_face_out_of_the_triangle_plane() {
        let positions = vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let normals = compute_normals(&positions, &[0, 1, 2]);
        for n in normals {
            assert!((n[2] - 1.0).abs() < 1e-6, "normal {n:?} not +z");
        }
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let result = load_model("definitely/not/here.glb");
        assert!(result.is_err());
    }

    #[test]
    fn vertex_count_sums_meshes() {
        let model = ModelData {
            meshes: vec![
                synthetic_mesh(MeshMaterial::default()),
                synthetic_mesh(MeshMaterial::default()),
            ],
        };
        assert_eq!(model.vertex_count(), 6);
    }
}
