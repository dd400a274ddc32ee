//! Point import and voxel export (JSON)
//!
//! Import is deliberately forgiving: bad coordinates become 0 and bad colors
//! become gray. Only a document that is not JSON, or has no point array, is
//! rejected. Export rounds coordinates to two decimals.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::color::{VoxelColor, parse_color};
use crate::voxel::{SimulationVoxel, VoxelPoint};

#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected an array of points or an object with a \"voxels\" array")]
    NotAnArray,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One exported voxel, `{id, x, y, z, c}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportedVoxel {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// `#RRGGBB`
    pub c: String,
}

fn round2(value: f32) -> f32 {
    ((value as f64 * 100.0).round() / 100.0) as f32
}

/// Number, numeric string, or 0
fn coerce_coordinate(value: Option<&Value>) -> f32 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .map(|v| v as f32)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn coerce_point(value: &Value) -> VoxelPoint {
    let color = value
        .get("c")
        .or_else(|| value.get("color"))
        .map(parse_color)
        .unwrap_or(VoxelColor::DEFAULT_GRAY);

    VoxelPoint::new(
        coerce_coordinate(value.get("x")),
        coerce_coordinate(value.get("y")),
        coerce_coordinate(value.get("z")),
        color,
    )
}

/// Parse a point list from JSON text
///
/// Accepts `[{x, y, z, c}, ...]` or `{"voxels": [...]}`. The color key may be
/// `c` or `color`.
pub fn import_points(json: &str) -> Result<Vec<VoxelPoint>, InterchangeError> {
    let document: Value = serde_json::from_str(json)?;

    let items = match &document {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("voxels") {
            Some(Value::Array(items)) => items,
            _ => return Err(InterchangeError::NotAnArray),
        },
        _ => return Err(InterchangeError::NotAnArray),
    };

    Ok(items.iter().map(coerce_point).collect())
}

/// Export the current voxel state
pub fn export_voxels(voxels: &[SimulationVoxel]) -> Vec<ExportedVoxel> {
    voxels
        .iter()
        .map(|voxel| ExportedVoxel {
            id: voxel.id,
            x: round2(voxel.position.x),
            y: round2(voxel.position.y),
            z: round2(voxel.position.z),
            c: voxel.color.to_hex(),
        })
        .collect()
}

pub fn export_json(voxels: &[SimulationVoxel]) -> Result<String, InterchangeError> {
    Ok(serde_json::to_string_pretty(&export_voxels(voxels))?)
}

pub fn read_points_file(path: impl AsRef<Path>) -> Result<Vec<VoxelPoint>, InterchangeError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| InterchangeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    import_points(&content)
}

pub fn write_export_file(
    path: impl AsRef<Path>,
    voxels: &[SimulationVoxel],
) -> Result<(), InterchangeError> {
    let path = path.as_ref();
    let json = export_json(voxels)?;
    std::fs::write(path, json).map_err(|source| InterchangeError::Io {
        path: path.display().to_string(),
        source,
    })
}
