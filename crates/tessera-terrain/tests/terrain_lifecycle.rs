//! End-to-end: config to generated terrain, pick, edit, export and re-import.

use glam::Vec3;
use tessera_config::Config;
use tessera_log::{MemorySink, NullSink};
use tessera_terrain::{Ray, Terrain, TerrainFile, TerrainSettings};

fn small_config() -> Config {
    let mut config = Config::default();
    config.generation.size = 33;
    config.generation.smooth_passes = 1;
    config.generation.seed = Some(2024);
    config.mesh.subdivision_level = 2;
    config.mesh.size_scale = 2.0;
    config.runtime.worker_threads = 2;
    config
}

#[test]
fn test_same_config_same_terrain() {
    let config = small_config();
    let a = Terrain::generate(TerrainSettings::from_config(&config, 0), &NullSink).unwrap();
    let b = Terrain::generate(TerrainSettings::from_config(&config, 1), &NullSink).unwrap();
    assert_eq!(a.grid(), b.grid(), "config seed must override the fallback seed");
    assert_eq!(a.mesh(), b.mesh());
}

#[test]
fn test_console_lines_in_order() {
    let sink = MemorySink::new();
    Terrain::generate(TerrainSettings::from_config(&small_config(), 0), &sink).unwrap();
    let lines = sink.lines();
    let position = |needle: &str| {
        lines
            .iter()
            .position(|l| l == needle)
            .unwrap_or_else(|| panic!("missing line {needle:?} in {lines:?}"))
    };
    assert!(position("Computing Height Data...") < position("Running Height Map Blur Cycles..."));
    assert!(position("Running Height Map Blur Cycles...") < position("Calculating Verts..."));
    assert!(position("Calculating Normals...") < position("Calculating Indicies..."));
    assert_eq!(lines.last().map(String::as_str), Some(" Terrain Successfully Setup!"));
}

#[test]
fn test_pick_edit_export_import() {
    let mut terrain =
        Terrain::generate(TerrainSettings::from_config(&small_config(), 0), &NullSink).unwrap();

    // Sub-mesh 0 is centred at (-24, -24) with size scale 2.
    let center = terrain.mesh().centers()[0];
    assert_eq!((center.x, center.y), (-24.0, -24.0));
    let ray = Ray::new(Vec3::new(center.x + 0.7, 500.0, center.y - 0.4), Vec3::NEG_Y);
    let hit = terrain.pick(&ray).expect("ray above sub-mesh 0 must hit");
    assert_eq!(hit.sub_mesh, 0);

    let located = terrain.locate(center.x + 0.7, center.y - 0.4).unwrap();
    assert_eq!((located.sub_mesh, located.triangle), (hit.sub_mesh, hit.triangle));

    let edit = terrain.raise(&hit, 50).unwrap();
    assert_eq!(terrain.grid().get(edit.row, edit.col), edit.height);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edited.ter");
    terrain.export(&path).unwrap();

    let loaded = TerrainFile::load(&path).unwrap();
    assert_eq!(loaded, terrain.to_file());
    assert_eq!(loaded.meshes.len(), 16);
    assert_eq!(loaded.vertices_per_mesh(), 81);

    let sub_meshes = loaded.into_sub_meshes();
    assert_eq!(sub_meshes.as_slice(), terrain.mesh().sub_meshes());
}
