use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use js_sys::{Float64Array, Object, Promise, Reflect};
use std::cell::RefCell;
use std::sync::Arc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use catalog::{CatalogRecord, CatalogStore, InMemoryCatalogStore};
use geodesic::{GeodesicConfig, Graph, GraphCache, SurfacePath, WeldTolerance};
use scene::{MeshId, MeshRegistry, TriangleMesh};

mod convert;
use convert::{mesh_from_buffers, mesh_id_from_bits, mesh_id_to_bits, points_from_flat, points_to_flat};

#[derive(Debug, Default)]
pub struct ViewerState {
    pub meshes: MeshRegistry,
    pub graphs: GraphCache,
    pub catalog: InMemoryCatalogStore,
}

thread_local! {
    static STATE: RefCell<ViewerState> = RefCell::new(ViewerState::default());
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn js_err(msg: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&msg.to_string())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Sets the weld tolerance used for graphs built from now on.
///
/// `tolerance <= 0` disables welding. Existing graphs are dropped.
#[wasm_bindgen]
pub fn set_weld_tolerance(tolerance: f64) {
    let weld = if tolerance.is_finite() && tolerance > 0.0 {
        WeldTolerance::Absolute(tolerance)
    } else {
        WeldTolerance::Disabled
    };
    STATE.with(|state| {
        state.borrow_mut().graphs = GraphCache::new(GeodesicConfig::new(weld));
    });
}

/// Registers a mesh and returns its id (a `BigInt` on the JS side).
#[wasm_bindgen]
pub fn register_mesh(
    positions: &[f32],
    indices: Option<Vec<u32>>,
    matrix_world: Option<Vec<f64>>,
) -> Result<u64, JsValue> {
    let mesh = mesh_from_buffers(positions, indices, matrix_world).map_err(js_err)?;
    Ok(insert_mesh(mesh))
}

/// Registers a mesh from a JSON mesh document.
#[wasm_bindgen]
pub fn register_mesh_document(json: &str) -> Result<u64, JsValue> {
    let mesh = formats::load_mesh_json(json).map_err(js_err)?;
    Ok(insert_mesh(mesh))
}

fn insert_mesh(mesh: TriangleMesh) -> u64 {
    let id = STATE.with(|state| state.borrow_mut().meshes.insert(mesh));
    mesh_id_to_bits(id)
}

/// Swaps the geometry behind `id`; the returned id replaces it.
///
/// Graphs built for the old id are dropped.
#[wasm_bindgen]
pub fn replace_mesh(
    id: u64,
    positions: &[f32],
    indices: Option<Vec<u32>>,
    matrix_world: Option<Vec<f64>>,
) -> Result<u64, JsValue> {
    let mesh = mesh_from_buffers(positions, indices, matrix_world).map_err(js_err)?;
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let ViewerState { meshes, graphs, .. } = &mut *s;
        let new_id = meshes
            .replace(mesh_id_from_bits(id), mesh)
            .ok_or_else(|| js_err("unknown or stale mesh id"))?;
        graphs.retain_live(meshes);
        Ok(mesh_id_to_bits(new_id))
    })
}

#[wasm_bindgen]
pub fn discard_mesh(id: u64) -> bool {
    let id = mesh_id_from_bits(id);
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.graphs.forget(id);
        s.meshes.remove(id).is_some()
    })
}

/// Builds (or reuses) the surface graph of `id`.
///
/// Resolves to `{vertices, edges}`.
#[wasm_bindgen]
pub fn ensure_graph(id: u64) -> Promise {
    let id = mesh_id_from_bits(id);
    future_to_promise(async move {
        let graph = graph_for(id).await?;
        let out = Object::new();
        Reflect::set(&out, &"vertices".into(), &(graph.vertex_count() as f64).into())?;
        Reflect::set(&out, &"edges".into(), &(graph.edge_count() as f64).into())?;
        Ok(out.into())
    })
}

/// Resolves to `{points: Float64Array, length}`; `length` is `Infinity` and
/// `points` empty when the two points are not connected on the surface.
#[wasm_bindgen]
pub fn surface_path(id: u64, a: Vec<f64>, b: Vec<f64>) -> Promise {
    let id = mesh_id_from_bits(id);
    future_to_promise(async move {
        let a = single_point(&a)?;
        let b = single_point(&b)?;
        let graph = graph_for(id).await?;
        let path = geodesic::surface_path(&graph, a, b).map_err(js_err)?;
        path_to_js(&path)
    })
}

/// Like [`surface_path`] through every point of a flat `[x, y, z, ...]` buffer.
#[wasm_bindgen]
pub fn surface_polyline(id: u64, points: Vec<f64>) -> Promise {
    let id = mesh_id_from_bits(id);
    future_to_promise(async move {
        let waypoints = points_from_flat(&points).map_err(js_err)?;
        if waypoints.len() < 2 {
            return Err(js_err(geodesic::GeodesicError::TooFewWaypoints {
                count: waypoints.len(),
            }));
        }
        let graph = graph_for(id).await?;
        let path = geodesic::surface_polyline(&graph, &waypoints).map_err(js_err)?;
        path_to_js(&path)
    })
}

// The state borrow is never held across the yield.
async fn graph_for(id: MeshId) -> Result<Arc<Graph>, JsValue> {
    let cached = STATE.with(|state| state.borrow().graphs.get(id));
    if let Some(graph) = cached {
        return Ok(graph);
    }
    runtime::yield_now().await;
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let ViewerState { meshes, graphs, .. } = &mut *s;
        let graph = graphs.ensure_graph_now(meshes, id).map_err(js_err)?;
        log(&format!(
            "surface graph ready: {} vertices, {} edges",
            graph.vertex_count(),
            graph.edge_count()
        ));
        Ok(graph)
    })
}

fn single_point(flat: &[f64]) -> Result<foundation::math::Vec3, JsValue> {
    match points_from_flat(flat).map_err(js_err)?.as_slice() {
        [p] => Ok(*p),
        _ => Err(js_err("expected [x, y, z]")),
    }
}

fn path_to_js(path: &SurfacePath) -> Result<JsValue, JsValue> {
    let out = Object::new();
    let flat = points_to_flat(&path.points);
    Reflect::set(&out, &"points".into(), &Float64Array::from(flat.as_slice()).into())?;
    Reflect::set(&out, &"length".into(), &path.length.into())?;
    Ok(out.into())
}

/// Metric length label (`m`, `cm` or `mm`).
#[wasm_bindgen]
pub fn format_length(meters: f64) -> String {
    measure::format_length(meters)
}

/// World-space size of `id` as `W × H × D`, scaled by `meters_per_unit`.
#[wasm_bindgen]
pub fn mesh_extents(id: u64, meters_per_unit: f64) -> Option<String> {
    let id = mesh_id_from_bits(id);
    STATE.with(|state| {
        let s = state.borrow();
        let bounds = s.meshes.get(id)?.world_bounds()?;
        Some(measure::format_extents(
            &bounds,
            measure::LengthUnits::new(meters_per_unit),
        ))
    })
}

/// Fetches and normalizes a catalog; resolves to the record array.
#[wasm_bindgen]
pub fn load_catalog(url: String) -> Promise {
    future_to_promise(async move {
        let text = fetch_text(&url).await?;
        let records = catalog::parse_catalog(&text).map_err(js_err)?;
        let count = records.len();
        STATE.with(|state| state.borrow_mut().catalog.seed(records.clone()))
            .map_err(js_err)?;
        log(&format!("catalog loaded: {count} records from {url}"));
        records_to_js(&records)
    })
}

#[wasm_bindgen]
pub fn catalog_search(query: &str) -> Result<JsValue, JsValue> {
    let found = STATE.with(|state| state.borrow().catalog.search(query)).map_err(js_err)?;
    records_to_js(&found)
}

#[wasm_bindgen]
pub fn catalog_similar(id_or_text: &str, limit: Option<u32>) -> Result<JsValue, JsValue> {
    let limit = limit.map_or(catalog::DEFAULT_SIMILAR_LIMIT, |l| l as usize);
    let found = STATE
        .with(|state| state.borrow().catalog.similar_to(id_or_text, limit))
        .map_err(js_err)?;
    records_to_js(&found)
}

fn records_to_js(records: &[CatalogRecord]) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(records).map_err(js_err)?;
    js_sys::JSON::parse(&json)
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    if !resp.ok() {
        return Err(js_err(format!(
            "HTTP {} {}",
            resp.status(),
            resp.status_text()
        )));
    }
    resp.text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
