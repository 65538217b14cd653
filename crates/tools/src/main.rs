use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use catalog::{CatalogRecord, CatalogStore, DEFAULT_SIMILAR_LIMIT, InMemoryCatalogStore};
use foundation::math::Vec3;
use geodesic::{GeodesicConfig, GraphCache, build_graph};
use measure::{LengthUnits, MarkOutcome, MeasureMode, MeasureSession, format_extents};
use scene::{MeshRegistry, TriangleMesh};
use serde::Serialize;
use tools::{check_point_count, geodesic_config_from_env, parse_point, to_hex};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "graph" => cmd_graph(args),
        "path" => cmd_path(args),
        "catalog" => cmd_catalog(args),
        _ => Err(usage()),
    }
}

struct LoadedMesh {
    mesh: TriangleMesh,
    content_hash: String,
}

fn load_mesh(path: &Path) -> Result<LoadedMesh, String> {
    let bytes = fs::read(path).map_err(|e| format!("read {path:?}: {e}"))?;
    let content_hash = to_hex(blake3::hash(&bytes).as_bytes());
    let src = std::str::from_utf8(&bytes).map_err(|e| format!("utf8: {e}"))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let mesh = formats::load_mesh_str(ext, src).map_err(|e| format!("load {path:?}: {e}"))?;
    info!(path = %path.display(), blake3 = %content_hash, "mesh loaded");
    Ok(LoadedMesh { mesh, content_hash })
}

#[derive(Debug, Serialize)]
struct GraphStats {
    content_hash: String,
    source_vertices: usize,
    graph_vertices: usize,
    triangles: usize,
    edges: usize,
    degenerate_edges: usize,
    welded: bool,
    extents: Option<String>,
}

fn cmd_graph(args: Vec<String>) -> Result<(), String> {
    // relic graph <mesh.obj|mesh.json> [--meters-per-unit N] [--json]
    if args.is_empty() {
        return Err(usage());
    }
    let input = PathBuf::from(&args[0]);
    let mut units = LengthUnits::default();
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--meters-per-unit" => {
                i += 1;
                units = LengthUnits::new(parse_f64(&args, i, "--meters-per-unit")?);
            }
            "--json" => json = true,
            other => return Err(format!("unknown arg: {other}\n\n{}", usage())),
        }
        i += 1;
    }

    let config = geodesic_config_from_env()?;
    let loaded = load_mesh(&input)?;
    let (_, report) = build_graph(&loaded.mesh, &config).map_err(|e| format!("graph: {e}"))?;

    let stats = GraphStats {
        content_hash: loaded.content_hash,
        source_vertices: report.source_vertices,
        graph_vertices: report.graph_vertices,
        triangles: report.triangles,
        edges: report.edges,
        degenerate_edges: report.degenerate_edges,
        welded: report.welded,
        extents: loaded
            .mesh
            .world_bounds()
            .map(|b| format_extents(&b, units)),
    };

    if json {
        let payload = serde_json::to_string_pretty(&stats).map_err(|e| format!("json: {e}"))?;
        println!("{payload}");
        return Ok(());
    }
    println!("blake3:           {}", stats.content_hash);
    println!("source vertices:  {}", stats.source_vertices);
    println!("graph vertices:   {}", stats.graph_vertices);
    println!("triangles:        {}", stats.triangles);
    println!("edges:            {}", stats.edges);
    println!("degenerate edges: {}", stats.degenerate_edges);
    println!("welded:           {}", stats.welded);
    if let Some(extents) = &stats.extents {
        println!("extents:          {extents}");
    }
    Ok(())
}

fn cmd_path(args: Vec<String>) -> Result<(), String> {
    // relic path <mesh> x,y,z [x,y,z ...] [--meters-per-unit N] [--mode MODE] [--view x,y,z] [--json]
    if args.len() < 2 {
        return Err(usage());
    }
    let input = PathBuf::from(&args[0]);
    let mut units = LengthUnits::default();
    let mut mode: Option<MeasureMode> = None;
    let mut json = false;
    let mut view: Option<Vec3> = None;
    let mut points: Vec<Vec3> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--meters-per-unit" => {
                i += 1;
                units = LengthUnits::new(parse_f64(&args, i, "--meters-per-unit")?);
            }
            "--mode" => {
                i += 1;
                let raw = args.get(i).ok_or("--mode requires a value")?;
                mode = Some(raw.parse()?);
            }
            "--view" => {
                i += 1;
                view = Some(parse_point(args.get(i).ok_or("--view requires x,y,z")?)?);
            }
            "--json" => json = true,
            s if s.starts_with("--") => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
            raw => points.push(parse_point(raw)?),
        }
        i += 1;
    }

    let mode = mode.unwrap_or(match points.len() {
        2 => MeasureMode::SurfaceDistance,
        _ => MeasureMode::SurfacePath,
    });
    check_point_count(mode, points.len())?;
    if mode == MeasureMode::Girth && view.is_none() {
        return Err("girth requires --view x,y,z".to_string());
    }

    let config: GeodesicConfig = geodesic_config_from_env()?;
    let loaded = load_mesh(&input)?;
    let mut registry = MeshRegistry::new();
    let id = registry.insert(loaded.mesh);
    let mut cache = GraphCache::new(config);
    let mut session = MeasureSession::new(units);
    session.set_mode(mode);
    session.set_target_mesh(Some(id));

    let mut outcome = MarkOutcome::Pending;
    match (mode, view) {
        (MeasureMode::Girth, Some(view)) => {
            outcome = session
                .add_girth_center(points[0], view, &registry)
                .map_err(|e| format!("measure: {e}"))?;
        }
        _ => {
            for p in points {
                outcome = pollster::block_on(session.add_mark(p, &registry, &mut cache))
                    .map_err(|e| format!("measure: {e}"))?;
            }
        }
    }

    let measurement = match outcome {
        MarkOutcome::Measured(m) => m,
        MarkOutcome::NoSurfacePath => return Err("no surface path between the points".to_string()),
        MarkOutcome::TooFewSamples { hits } => {
            return Err(format!("girth found only {hits} surface samples"));
        }
        MarkOutcome::Pending | MarkOutcome::Missed => {
            return Err(format!("{} did not complete a measurement", mode.as_str()));
        }
    };

    info!(metrics = %cache.metrics(), "path measured");
    let report = measurement.report(session.units());
    if json {
        let payload = serde_json::to_string_pretty(&report).map_err(|e| format!("json: {e}"))?;
        println!("{payload}");
        return Ok(());
    }
    for p in &report.points {
        println!("{},{},{}", p[0], p[1], p[2]);
    }
    println!("length: {} ({} units)", report.display, report.length_units);
    Ok(())
}

fn cmd_catalog(args: Vec<String>) -> Result<(), String> {
    // relic catalog <catalog.json> [--search TERMS] [--similar ID_OR_TEXT] [--limit N] [--show ID]
    if args.is_empty() {
        return Err(usage());
    }
    let input = PathBuf::from(&args[0]);
    let mut search: Option<String> = None;
    let mut similar: Option<String> = None;
    let mut show: Option<String> = None;
    let mut limit = DEFAULT_SIMILAR_LIMIT;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--search" => {
                i += 1;
                search = Some(args.get(i).ok_or("--search requires a value")?.clone());
            }
            "--similar" => {
                i += 1;
                similar = Some(args.get(i).ok_or("--similar requires a value")?.clone());
            }
            "--show" => {
                i += 1;
                show = Some(args.get(i).ok_or("--show requires an id")?.clone());
            }
            "--limit" => {
                i += 1;
                let raw = args.get(i).ok_or("--limit requires a value")?;
                limit = raw.parse().map_err(|e| format!("--limit: {e}"))?;
            }
            other => return Err(format!("unknown arg: {other}\n\n{}", usage())),
        }
        i += 1;
    }

    let payload = fs::read_to_string(&input).map_err(|e| format!("read {input:?}: {e}"))?;
    let records = catalog::parse_catalog(&payload).map_err(|e| e.to_string())?;
    let mut store = InMemoryCatalogStore::new();
    store.seed(records).map_err(|e| e.to_string())?;
    info!(records = store.len(), "catalog loaded");

    if let Some(id) = show {
        let record = store.require(&id).map_err(|e| format!("{id}: {e}"))?;
        let payload = serde_json::to_string_pretty(&record).map_err(|e| format!("json: {e}"))?;
        println!("{payload}");
        return Ok(());
    }

    let listed = match (search, similar) {
        (Some(q), _) => store.search(&q),
        (None, Some(s)) => store.similar_to(&s, limit),
        (None, None) => store.list(),
    }
    .map_err(|e| e.to_string())?;

    for record in &listed {
        print_record(record);
    }
    Ok(())
}

fn print_record(record: &CatalogRecord) {
    let scale = match record.meters_per_unit {
        s if s == 1.0 => String::new(),
        s => format!("\t{s} m/unit"),
    };
    println!("{}\t{}\t{}{}", record.id, record.title, record.model_url, scale);
}

fn parse_f64(args: &[String], i: usize, flag: &str) -> Result<f64, String> {
    let raw = args.get(i).ok_or_else(|| format!("{flag} requires a value"))?;
    raw.parse().map_err(|e| format!("{flag}: {e}"))
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "relic".to_string());
    format!(
        "Usage:\n  {exe} graph <mesh.obj|mesh.json> [--meters-per-unit N] [--json]\n  {exe} path <mesh> x,y,z [x,y,z ...] [--mode MODE] [--view x,y,z] [--meters-per-unit N] [--json]\n  {exe} catalog <catalog.json> [--search TERMS] [--similar ID_OR_TEXT] [--limit N] [--show ID]\n\nModes: distance, polyline, surface-distance (default for 2 points), surface-path,\ngirth (one center point plus --view).\n\nEnvironment:\n- RELIC_WELD_TOLERANCE: weld distance in model units, or `off` (default 1e-4).\n- RELIC_WELD_RELATIVE: weld distance as a fraction of the bounding-box diagonal.\n- RUST_LOG: log filter, e.g. `geodesic=debug`.\n"
    )
}
