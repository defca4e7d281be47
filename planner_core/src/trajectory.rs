//! The delivered artifact: an arc-length-parametrized trajectory table.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// One row of the trajectory table: world position, local curvature and
/// heading, cumulative arc length, and the kinematic speed limit.
///
/// Curvature is signed, degrees per centimeter. Heading is degrees in
/// `[0, 360)`. `arc_length` is nondecreasing from sample 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub x: f64,
    pub y: f64,
    pub curvature: f64,
    pub heading: f64,
    pub arc_length: f64,
    pub speed_limit: f64,
}

/// A complete planned trajectory: an ordered, nonempty list of samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trajectory {
    pub samples: Vec<TrajectorySample>,
}

/// A single `f32` row of the n×6 serialized table: `(x, y, curvature,
/// heading, arc_length, speed_limit)`. `Pod`/`Zeroable` let this be written
/// as a flat byte buffer with `bytemuck`, the same binary message layout
/// convention used elsewhere in this workspace.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TrajectoryRow(pub [f32; 6]);

impl Trajectory {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn total_arc_length(&self) -> f64 {
        self.samples.last().map(|s| s.arc_length).unwrap_or(0.0)
    }

    /// Serialize to the n×6 `f32` row-major table.
    pub fn to_f32_table(&self) -> Vec<TrajectoryRow> {
        self.samples
            .iter()
            .map(|s| {
                TrajectoryRow([
                    s.x as f32,
                    s.y as f32,
                    s.curvature as f32,
                    s.heading as f32,
                    s.arc_length as f32,
                    s.speed_limit as f32,
                ])
            })
            .collect()
    }

    /// Flatten [`to_f32_table`] into raw little-endian bytes, suitable for
    /// writing to disk or mapping into a downstream consumer.
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.to_f32_table()).to_vec()
    }
}
