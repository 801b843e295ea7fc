//! Waypoint path construction.
//!
//! Paths are built once per agent at scene creation. Street paths carry
//! vehicles between opposite grid boundaries; sidewalk paths carry
//! pedestrians around building blocks in one of several deterministic
//! shapes.

use city_events::Vec3;

use crate::agents::LoopMode;
use crate::grid::{Cell, GridLayout};
use crate::rng;

/// Sidewalk path shapes, picked per agent from its seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SidewalkShape {
    /// Closed loop around one block.
    FullLoop,
    /// Two adjacent edges of a block, walked back and forth.
    LShape,
    /// A straight run spanning several blocks, walked back and forth.
    LongRun,
    /// Closed loop around a 2x2 super-block.
    MultiBlock,
}

impl SidewalkShape {
    /// Deterministic shape for an agent seed.
    pub fn pick(seed: i64) -> Self {
        match (rng::unit(seed) * 4.0) as u32 {
            0 => SidewalkShape::FullLoop,
            1 => SidewalkShape::LShape,
            2 => SidewalkShape::LongRun,
            _ => SidewalkShape::MultiBlock,
        }
    }
}

/// Street centerline between opposite grid boundaries, at a fixed step
/// size. `lane` indexes the corridor lines from the grid's low edge;
/// `along_rows` runs the path east-west instead of north-south.
///
/// Equal-length segments keep world speed constant for a constant
/// per-segment speed.
pub fn street_path(layout: &GridLayout, lane: usize, along_rows: bool, step: f64) -> Vec<Vec3> {
    let half = layout.half_extent();
    let fixed = (lane as f64 * layout.pitch() - half).clamp(-half, half);
    let length = layout.total_extent();
    let step = step.max(0.1);
    let steps = ((length / step).floor() as usize).max(1);

    let mut points = Vec::with_capacity(steps + 2);
    for i in 0..=steps {
        let along = (-half + i as f64 * step).min(half);
        points.push(street_point(along, fixed, along_rows));
    }
    if let Some(last) = points.last() {
        let last_along = if along_rows { last.x } else { last.z };
        if (last_along - half).abs() > 1e-9 {
            points.push(street_point(half, fixed, along_rows));
        }
    }
    points
}

fn street_point(along: f64, fixed: f64, along_rows: bool) -> Vec3 {
    if along_rows {
        Vec3::new(along, 0.0, fixed)
    } else {
        Vec3::new(fixed, 0.0, along)
    }
}

/// Sidewalk path around `block`, offset inward from the block's tile edge
/// by `margin`. The shape is chosen deterministically from `seed`; the
/// returned mode is `Closed` for loops and `PingPong` for open runs.
pub fn sidewalk_path(
    layout: &GridLayout,
    block: Cell,
    margin: f64,
    min_spacing: f64,
    seed: i64,
) -> (Vec<Vec3>, LoopMode) {
    let shape = SidewalkShape::pick(seed);
    let (cx, cz) = layout.cell_to_world(block);
    let d = layout.pitch() * 0.5 - margin;
    let limit = layout.half_extent() - margin;

    let (corners, mode) = match shape {
        SidewalkShape::FullLoop => (
            vec![
                Vec3::new(cx - d, 0.0, cz - d),
                Vec3::new(cx + d, 0.0, cz - d),
                Vec3::new(cx + d, 0.0, cz + d),
                Vec3::new(cx - d, 0.0, cz + d),
            ],
            LoopMode::Closed,
        ),
        SidewalkShape::LShape => (
            vec![
                Vec3::new(cx - d, 0.0, cz + d),
                Vec3::new(cx - d, 0.0, cz - d),
                Vec3::new(cx + d, 0.0, cz - d),
            ],
            LoopMode::PingPong,
        ),
        SidewalkShape::LongRun => {
            let span = layout.pitch() * 3.0;
            (
                vec![
                    Vec3::new(cx - d, 0.0, cz + d),
                    Vec3::new(cx - d + span, 0.0, cz + d),
                ],
                LoopMode::PingPong,
            )
        }
        SidewalkShape::MultiBlock => {
            let far = layout.pitch() + d;
            (
                vec![
                    Vec3::new(cx - d, 0.0, cz - d),
                    Vec3::new(cx + far, 0.0, cz - d),
                    Vec3::new(cx + far, 0.0, cz + far),
                    Vec3::new(cx - d, 0.0, cz + far),
                ],
                LoopMode::Closed,
            )
        }
    };

    let clamped: Vec<Vec3> = corners
        .into_iter()
        .map(|p| Vec3::new(p.x.clamp(-limit, limit), 0.0, p.z.clamp(-limit, limit)))
        .collect();
    let mut points = collapse_near(clamped, min_spacing);
    if mode == LoopMode::Closed {
        close_loop(&mut points, min_spacing);
    }
    (points, mode)
}

/// Drop consecutive points closer than `min_spacing` to the previous kept
/// point. Clamping at the grid edge can fold corners together; collapsing
/// them keeps segments non-degenerate.
fn collapse_near(points: Vec<Vec3>, min_spacing: f64) -> Vec<Vec3> {
    let mut kept: Vec<Vec3> = Vec::with_capacity(points.len());
    for point in points {
        match kept.last() {
            Some(last) if last.distance(point) < min_spacing => {}
            _ => kept.push(point),
        }
    }
    kept
}

/// Append the first point if the path does not already end near it.
fn close_loop(points: &mut Vec<Vec3>, min_spacing: f64) {
    if points.len() < 3 {
        return;
    }
    let first = points[0];
    if points.last().map_or(false, |last| last.distance(first) >= min_spacing) {
        points.push(first);
    }
}
