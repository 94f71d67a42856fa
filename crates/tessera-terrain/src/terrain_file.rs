//! Plain-text `.ter` terrain files.
//!
//! Header fields come first, one `Key=value` per line: the four texture
//! files, the shader, the material, the relative-height vector, the mesh
//! count and the per-mesh vertex count. The index and vertex sections
//! follow, each mesh introduced by a `$MESH_<i>` marker. Index lines hold
//! one triangle; every vertex spans three lines (position, normal, texture
//! coordinate). Values are space-separated with a leading space.

use std::fmt::{self, Write as _};
use std::path::Path;

use glam::{Vec2, Vec3};
use tessera_material::{MaterialHeightState, MaterialParams};
use tessera_mesh::{SubMesh, TerrainMesh, Vertex};

use crate::error::TerrainFileError;

pub const TERRAIN_FILE_EXTENSION: &str = "ter";

const TEXTURE_KEYS: [&str; 4] = ["L1Tex", "L2Tex", "L3Tex", "L4Tex"];
const BEGIN_IDXS: &str = "$BEGIN_IDXS";
const END_IDXS: &str = "$END_IDXS";
const BEGIN_VERTS: &str = "$BEGIN_VERTS";
const END_VERTS: &str = "$END_VERTS";

/// Buffers of one exported sub-mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainFileMesh {
    pub indices: Vec<u32>,
    pub vertices: Vec<Vertex>,
}

/// Render-ready contents of a `.ter` file.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainFile {
    pub textures: [String; 4],
    pub shader: String,
    pub material: MaterialParams,
    /// `textures.relativeHeight` uniform value.
    pub relative_height: [f32; 4],
    pub meshes: Vec<TerrainFileMesh>,
}

impl TerrainFile {
    /// Snapshot of a built terrain mesh and its material state.
    pub fn from_mesh(
        mesh: &TerrainMesh,
        material: &MaterialHeightState,
        textures: [String; 4],
        shader: String,
    ) -> Self {
        Self {
            textures,
            shader,
            material: *material.material(),
            relative_height: material.relative_height().shader_vector(),
            meshes: mesh
                .sub_meshes()
                .iter()
                .map(|m| TerrainFileMesh {
                    indices: m.indices.clone(),
                    vertices: m.vertices.clone(),
                })
                .collect(),
        }
    }

    /// Vertices per mesh, taken from the first mesh.
    pub fn vertices_per_mesh(&self) -> usize {
        self.meshes.first().map_or(0, |m| m.vertices.len())
    }

    /// Sub-meshes with centres recovered from their horizontal bounds.
    pub fn into_sub_meshes(self) -> Vec<SubMesh> {
        self.meshes
            .into_iter()
            .map(|m| {
                let (lo, hi) = m.vertices.iter().fold(
                    (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
                    |(lo, hi), v| {
                        let p = Vec2::new(v.position[0], v.position[2]);
                        (lo.min(p), hi.max(p))
                    },
                );
                let center = if m.vertices.is_empty() {
                    Vec2::ZERO
                } else {
                    (lo + hi) / 2.0
                };
                SubMesh {
                    vertices: m.vertices,
                    indices: m.indices,
                    center,
                }
            })
            .collect()
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), TerrainFileError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_string())?;
        tracing::info!(path = %path.display(), meshes = self.meshes.len(), "terrain exported");
        Ok(())
    }

    /// Read and parse `path`.
    pub fn load(path: &Path) -> Result<Self, TerrainFileError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse file contents.
    pub fn parse(contents: &str) -> Result<Self, TerrainFileError> {
        let mut reader = LineReader::new(contents);

        let mut textures: [String; 4] = Default::default();
        for (slot, key) in textures.iter_mut().zip(TEXTURE_KEYS) {
            *slot = reader.field(key)?.1.to_string();
        }
        let shader = reader.field("Shdr")?.1.to_string();

        let (line, ka) = reader.field("mKa")?;
        let ambient = parse_vec3(line, "mKa", ka, ',')?;
        let (line, kd) = reader.field("mKd")?;
        let diffuse = parse_vec3(line, "mKd", kd, ',')?;
        let (line, ks) = reader.field("mKs")?;
        let specular = parse_vec3(line, "mKs", ks, ',')?;
        let (line, sh) = reader.field("mSh")?;
        let shininess = parse_f32(line, "mSh", sh)?;

        let mut relative_height = [0.0; 4];
        for (value, key) in relative_height.iter_mut().zip(["rHx", "rHy", "rHz", "rHw"]) {
            let (line, raw) = reader.field(key)?;
            *value = parse_f32(line, key, raw)?;
        }

        let (line, raw) = reader.field("Nmesh")?;
        let mesh_count = parse_count(line, "Nmesh", raw)?;
        let (line, raw) = reader.field("Nidx")?;
        let vertex_count = parse_count(line, "Nidx", raw)?;

        reader.marker(BEGIN_IDXS)?;
        let mut meshes = Vec::with_capacity(mesh_count.min(1 << 16));
        for i in 0..mesh_count {
            reader.marker(&format!("$MESH_{i}"))?;
            let mut indices = Vec::new();
            for (line, raw) in reader.section_body() {
                let mut parts = raw.split_whitespace();
                let mut triangle = [0u32; 3];
                for slot in triangle.iter_mut() {
                    let part = parts.next().ok_or_else(|| invalid(line, "index", raw))?;
                    *slot = part.parse().map_err(|_| invalid(line, "index", raw))?;
                    if *slot as usize >= vertex_count {
                        return Err(TerrainFileError::IndexOutOfRange {
                            line,
                            index: *slot,
                            vertices: vertex_count,
                        });
                    }
                }
                if parts.next().is_some() {
                    return Err(invalid(line, "index", raw));
                }
                indices.extend_from_slice(&triangle);
            }
            meshes.push(TerrainFileMesh {
                indices,
                vertices: Vec::new(),
            });
        }
        reader.marker(END_IDXS)?;

        let (line, raw) = reader.field("Nvert")?;
        let nvert = parse_count(line, "Nvert", raw)?;
        if nvert != vertex_count {
            return Err(TerrainFileError::CountMismatch {
                line,
                what: "vertex",
                expected: vertex_count,
                found: nvert,
            });
        }
        let lines_per_mesh = nvert.checked_mul(3).ok_or_else(|| invalid(line, "Nvert", raw))?;

        reader.marker(BEGIN_VERTS)?;
        for (i, mesh) in meshes.iter_mut().enumerate() {
            let marker_line = reader.marker(&format!("$MESH_{i}"))?;
            let body = reader.section_body();
            if body.len() != lines_per_mesh {
                return Err(TerrainFileError::CountMismatch {
                    line: marker_line,
                    what: "vertex line",
                    expected: lines_per_mesh,
                    found: body.len(),
                });
            }
            mesh.vertices.reserve_exact(body.len() / 3);
            for chunk in body.chunks_exact(3) {
                let (pl, p) = chunk[0];
                let (nl, n) = chunk[1];
                let (tl, t) = chunk[2];
                mesh.vertices.push(Vertex::new(
                    parse_vec3(pl, "position", p, ' ')?,
                    parse_vec3(nl, "normal", n, ' ')?,
                    parse_vec2(tl, "texture coordinate", t)?,
                ));
            }
        }
        reader.marker(END_VERTS)?;

        Ok(Self {
            textures,
            shader,
            material: MaterialParams {
                ambient,
                diffuse,
                specular,
                shininess,
            },
            relative_height,
            meshes,
        })
    }
}

impl fmt::Display for TerrainFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for (key, texture) in TEXTURE_KEYS.iter().zip(&self.textures) {
            writeln!(out, "{key}={texture}")?;
        }
        writeln!(out, "Shdr={}", self.shader)?;

        let m = &self.material;
        writeln!(out, "mKa={},{},{}", m.ambient.x, m.ambient.y, m.ambient.z)?;
        writeln!(out, "mKd={},{},{}", m.diffuse.x, m.diffuse.y, m.diffuse.z)?;
        writeln!(out, "mKs={},{},{}", m.specular.x, m.specular.y, m.specular.z)?;
        writeln!(out, "mSh={}", m.shininess)?;

        let [x, y, z, w] = self.relative_height;
        writeln!(out, "rHx={x}")?;
        writeln!(out, "rHy={y}")?;
        writeln!(out, "rHz={z}")?;
        writeln!(out, "rHw={w}")?;

        let nvert = self.vertices_per_mesh();
        writeln!(out, "Nmesh={}", self.meshes.len())?;
        writeln!(out, "Nidx={nvert}")?;

        writeln!(out, "{BEGIN_IDXS}")?;
        for (i, mesh) in self.meshes.iter().enumerate() {
            writeln!(out, "$MESH_{i}")?;
            for tri in mesh.indices.chunks_exact(3) {
                writeln!(out, " {} {} {}", tri[0], tri[1], tri[2])?;
            }
        }
        writeln!(out, "{END_IDXS}")?;

        writeln!(out, "Nvert={nvert}")?;
        writeln!(out, "{BEGIN_VERTS}")?;
        for (i, mesh) in self.meshes.iter().enumerate() {
            writeln!(out, "$MESH_{i}")?;
            for v in &mesh.vertices {
                let [px, py, pz] = v.position;
                let [nx, ny, nz] = v.normal;
                let [u, t] = v.tex_coord;
                writeln!(out, " {px} {py} {pz}")?;
                writeln!(out, " {nx} {ny} {nz}")?;
                writeln!(out, " {u} {t}")?;
            }
        }
        writeln!(out, "{END_VERTS}")?;

        f.write_str(&out)
    }
}

/// Line cursor with 1-based line numbers.
struct LineReader<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineReader<'a> {
    fn new(contents: &'a str) -> Self {
        Self {
            lines: contents.lines().map(str::trim_end).collect(),
            pos: 0,
        }
    }

    fn next_line(&mut self, expected: &str) -> Result<(usize, &'a str), TerrainFileError> {
        let line = self
            .lines
            .get(self.pos)
            .copied()
            .ok_or_else(|| TerrainFileError::UnexpectedEof {
                expected: expected.to_string(),
            })?;
        self.pos += 1;
        Ok((self.pos, line))
    }

    /// `key=value`; returns the line number and the value.
    fn field(&mut self, key: &str) -> Result<(usize, &'a str), TerrainFileError> {
        let expected = format!("{key}=");
        let (line, text) = self.next_line(&expected)?;
        let value = text
            .strip_prefix(expected.as_str())
            .ok_or_else(|| TerrainFileError::UnexpectedLine {
                line,
                expected,
                found: text.to_string(),
            })?;
        Ok((line, value))
    }

    fn marker(&mut self, marker: &str) -> Result<usize, TerrainFileError> {
        let (line, text) = self.next_line(marker)?;
        if text != marker {
            return Err(TerrainFileError::UnexpectedLine {
                line,
                expected: marker.to_string(),
                found: text.to_string(),
            });
        }
        Ok(line)
    }

    /// Lines up to (not including) the next `$` marker or the end of file.
    fn section_body(&mut self) -> Vec<(usize, &'a str)> {
        let mut body = Vec::new();
        while let Some(&text) = self.lines.get(self.pos)
            && !text.starts_with('$')
        {
            self.pos += 1;
            body.push((self.pos, text));
        }
        body
    }
}

fn invalid(line: usize, field: &'static str, value: &str) -> TerrainFileError {
    TerrainFileError::InvalidValue {
        line,
        field,
        value: value.to_string(),
    }
}

fn parse_f32(line: usize, field: &'static str, raw: &str) -> Result<f32, TerrainFileError> {
    raw.trim().parse().map_err(|_| invalid(line, field, raw))
}

fn parse_count(line: usize, field: &'static str, raw: &str) -> Result<usize, TerrainFileError> {
    raw.trim().parse().map_err(|_| invalid(line, field, raw))
}

fn parse_floats<const N: usize>(
    line: usize,
    field: &'static str,
    raw: &str,
    separator: char,
) -> Result<[f32; N], TerrainFileError> {
    let mut out = [0.0; N];
    let mut parts = raw.split(separator).filter(|p| !p.is_empty());
    for slot in out.iter_mut() {
        let part = parts.next().ok_or_else(|| invalid(line, field, raw))?;
        *slot = part.trim().parse().map_err(|_| invalid(line, field, raw))?;
    }
    if parts.next().is_some() {
        return Err(invalid(line, field, raw));
    }
    Ok(out)
}

fn parse_vec3(
    line: usize,
    field: &'static str,
    raw: &str,
    separator: char,
) -> Result<Vec3, TerrainFileError> {
    parse_floats::<3>(line, field, raw, separator).map(Vec3::from_array)
}

fn parse_vec2(line: usize, field: &'static str, raw: &str) -> Result<Vec2, TerrainFileError> {
    parse_floats::<2>(line, field, raw, ' ').map(Vec2::from_array)
}
