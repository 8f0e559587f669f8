//! 3D wireframe geometry for the building and its collection area
//!
//! Produces renderer-agnostic line geometry: the building box centred on the
//! origin and, at ground level, the footprint offset outward by 3H with
//! quarter-circle arcs of radius 3H at each corner.
//!
//! The boundary is drawn for display only. Its arcs are polylines, so the
//! area it encloses is not the analytic A_D used by the evaluator.

use crate::{LengthUnit, StructureDimensions};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Points per quarter-circle arc
pub const ARC_POINTS: usize = 30;

/// Collection boundary offset, in structure heights
const BUFFER_HEIGHTS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn ground(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// Building box: 8 vertices (bottom 0-3, top 4-7) and 12 edges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wireframe {
    pub vertices: Vec<Point3>,
    pub edges: Vec<[usize; 2]>,
}

impl Wireframe {
    /// Edges as vertex pairs, ready for a line renderer
    pub fn segments(&self) -> impl Iterator<Item = (Point3, Point3)> + '_ {
        self.edges
            .iter()
            .map(|[a, b]| (self.vertices[*a], self.vertices[*b]))
    }
}

/// Ground-level collection boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionBoundary {
    /// Offset distance from the footprint (3H)
    pub buffer: f64,
    /// Straight sides: bottom, top, left, right
    pub sides: Vec<[Point3; 2]>,
    /// Corner arcs: bottom-left, bottom-right, top-right, top-left
    pub arcs: Vec<Vec<Point3>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRanges {
    pub x: [f64; 2],
    pub y: [f64; 2],
    pub z: [f64; 2],
}

/// Building and collection area figure in a display unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionFigure {
    pub title: String,
    pub unit: LengthUnit,
    pub axis_titles: [String; 3],
    pub axis_ranges: AxisRanges,
    pub building: Wireframe,
    pub boundary: CollectionBoundary,
}

/// Build the figure for `dimensions`, expressed in `display_unit`
pub fn collection_figure(
    dimensions: &StructureDimensions,
    display_unit: LengthUnit,
) -> CollectionFigure {
    let dims = dimensions.converted(display_unit);
    let (l, w, h) = (dims.length(), dims.width(), dims.height());

    let x0 = -l / 2.0;
    let y0 = -w / 2.0;
    let (x1, y1) = (x0 + l, y0 + w);

    let building = building_wireframe(x0, y0, x1, y1, h);
    let buffer = BUFFER_HEIGHTS * h;
    let boundary = collection_boundary(x0, y0, x1, y1, buffer);

    let axis_ranges = AxisRanges {
        x: [x0 - buffer, x1 + buffer],
        y: [y0 - buffer, y1 + buffer],
        z: [0.0, 2.0 * h],
    };

    let unit = display_unit.symbol();
    CollectionFigure {
        title: "Interactive 3D Model: Building and Collection Area".to_string(),
        unit: display_unit,
        axis_titles: [
            format!("Length ({unit})"),
            format!("Width ({unit})"),
            format!("Height ({unit})"),
        ],
        axis_ranges,
        building,
        boundary,
    }
}

fn building_wireframe(x0: f64, y0: f64, x1: f64, y1: f64, h: f64) -> Wireframe {
    let footprint = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
    let vertices = [0.0, h]
        .iter()
        .flat_map(|z| footprint.iter().map(move |(x, y)| Point3::new(*x, *y, *z)))
        .collect();

    let edges = vec![
        // bottom
        [0, 1],
        [1, 2],
        [2, 3],
        [3, 0],
        // top
        [4, 5],
        [5, 6],
        [6, 7],
        [7, 4],
        // sides
        [0, 4],
        [1, 5],
        [2, 6],
        [3, 7],
    ];

    Wireframe { vertices, edges }
}

fn collection_boundary(x0: f64, y0: f64, x1: f64, y1: f64, buffer: f64) -> CollectionBoundary {
    let sides = vec![
        [Point3::ground(x0, y0 - buffer), Point3::ground(x1, y0 - buffer)],
        [Point3::ground(x0, y1 + buffer), Point3::ground(x1, y1 + buffer)],
        [Point3::ground(x0 - buffer, y0), Point3::ground(x0 - buffer, y1)],
        [Point3::ground(x1 + buffer, y0), Point3::ground(x1 + buffer, y1)],
    ];

    let arcs = vec![
        quarter_arc((x0, y0), buffer, -PI, -PI / 2.0),
        quarter_arc((x1, y0), buffer, -PI / 2.0, 0.0),
        quarter_arc((x1, y1), buffer, 0.0, PI / 2.0),
        quarter_arc((x0, y1), buffer, PI / 2.0, PI),
    ];

    CollectionBoundary { buffer, sides, arcs }
}

/// `ARC_POINTS` evenly spaced points from `start` to `end` (inclusive)
fn quarter_arc(center: (f64, f64), radius: f64, start: f64, end: f64) -> Vec<Point3> {
    let step = (end - start) / (ARC_POINTS - 1) as f64;
    (0..ARC_POINTS)
        .map(|i| {
            let theta = start + step * i as f64;
            Point3::ground(center.0 + radius * theta.cos(), center.1 + radius * theta.sin())
        })
        .collect()
}

impl CollectionBoundary {
    /// Closed counter-clockwise outline, starting at the bottom-right arc
    ///
    /// Consecutive arcs are joined by the straight sides, so the arc points
    /// alone describe the whole outline.
    pub fn outline(&self) -> Vec<(f64, f64)> {
        // bottom-right, top-right, top-left, bottom-left
        [1usize, 2, 3, 0]
            .iter()
            .filter_map(|i| self.arcs.get(*i))
            .flatten()
            .map(|p| (p.x, p.y))
            .collect()
    }

    /// Shoelace area of [`Self::outline`], in display units squared
    pub fn enclosed_area(&self) -> f64 {
        let outline = self.outline();
        if outline.len() < 3 {
            return 0.0;
        }
        let twice: f64 = outline
            .iter()
            .zip(outline.iter().cycle().skip(1))
            .map(|((xa, ya), (xb, yb))| xa * yb - xb * ya)
            .sum();
        twice.abs() / 2.0
    }
}

impl CollectionFigure {
    pub fn boundary_polygon(&self) -> Vec<(f64, f64)> {
        self.boundary.outline()
    }

    pub fn boundary_enclosed_area(&self) -> f64 {
        self.boundary.enclosed_area()
    }
}
