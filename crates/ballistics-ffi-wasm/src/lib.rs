// crates/ballistics-ffi-wasm/src/lib.rs
//
// WASM bindings: single run, parameter sweep, Monte-Carlo.
// Inputs are `RunConfig`-shaped JS objects (same field names as the JSON record).

use wasm_bindgen::prelude::*;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen as swb;

// --- our crates ---
use ballistics_core::BallisticsError;
use ballistics_pointmass::{
    run_monte_carlo, run_sweep, sweep_values, MonteCarloConfig, MonteCarloReport, RunConfig,
    SweepParam, Termination, TrajectorySample, TrajectorySummary,
};

// Better panic messages in browser console
#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
}

/* --------------------------- Shared DTOs (JS) --------------------------- */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsRunResult {
    pub samples: Vec<TrajectorySample>,
    pub termination: Termination,
    pub summary: Option<TrajectorySummary>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JsSweepRequest {
    /// "launch_angle" | "muzzle_velocity" | "wind_speed" | "temperature" | "altitude"
    pub param: SweepParam,
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsSweepRow {
    pub value: f64,
    pub summary: Option<TrajectorySummary>,
    pub samples: Vec<TrajectorySample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsSweepResult {
    pub rows: Vec<JsSweepRow>,
}

fn js_err(e: BallisticsError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/* --------------------------- Native entry points --------------------------- */

pub fn integrate_config(cfg: &RunConfig) -> Result<JsRunResult, BallisticsError> {
    let run = cfg.build()?;
    let traj = run.integrate();
    let summary = run.summarize(&traj);
    let termination = traj.termination();
    Ok(JsRunResult { samples: traj.into_samples(), termination, summary })
}

pub fn sweep_config(cfg: &RunConfig, req: &JsSweepRequest) -> Result<JsSweepResult, BallisticsError> {
    let run = cfg.build()?;
    let values = sweep_values(req.start, req.end, req.step)?;
    let rows = run_sweep(&run.projectile, &run.environment, &run.launch, req.param, &values, &run.opts)?
        .into_iter()
        .map(|r| JsSweepRow { value: r.value, summary: r.summary, samples: r.trajectory.into_samples() })
        .collect();
    Ok(JsSweepResult { rows })
}

pub fn monte_carlo_config(cfg: &RunConfig, mc: &MonteCarloConfig) -> Result<MonteCarloReport, BallisticsError> {
    let run = cfg.build()?;
    run_monte_carlo(&run.projectile, &run.environment, &run.launch, mc, &run.opts)
}

/* ------------------------------- JS exports ------------------------------- */

#[wasm_bindgen]
pub fn integrate_js(config: JsValue) -> Result<JsValue, JsValue> {
    let cfg: RunConfig = swb::from_value(config)?;
    let out = integrate_config(&cfg).map_err(js_err)?;
    swb::to_value(&out).map_err(|e| e.into())
}

#[wasm_bindgen]
pub fn sweep_js(config: JsValue, request: JsValue) -> Result<JsValue, JsValue> {
    let cfg: RunConfig = swb::from_value(config)?;
    let req: JsSweepRequest = swb::from_value(request)?;
    let out = sweep_config(&cfg, &req).map_err(js_err)?;
    swb::to_value(&out).map_err(|e| e.into())
}

#[wasm_bindgen]
pub fn monte_carlo_js(config: JsValue, mc: JsValue) -> Result<JsValue, JsValue> {
    let cfg: RunConfig = swb::from_value(config)?;
    let mc: MonteCarloConfig = swb::from_value(mc)?;
    let out = monte_carlo_config(&cfg, &mc).map_err(js_err)?;
    swb::to_value(&out).map_err(|e| e.into())
}

/// Same as `integrate_js` but takes and returns JSON text.
#[wasm_bindgen]
pub fn integrate_json(config: &str) -> Result<String, JsValue> {
    let cfg = RunConfig::from_json(config).map_err(js_err)?;
    let out = integrate_config(&cfg).map_err(js_err)?;
    serde_json::to_string(&out).map_err(|e| JsValue::from_str(&e.to_string()))
}
