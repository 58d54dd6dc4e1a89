use tracing::{debug, warn};

use crate::geometry::{Path, SegmentWithPrev, ShapeId};
use crate::math::polygon_2d::{signed_area_2d, winding_contribution, winding_number};
use crate::math::{Point2, Vector2, FLATTEN_TOLERANCE, TOLERANCE};

use super::graph::Graph;
use super::hits::{is_usable, Hits};

/// A closed loop recovered from the intersection graph.
#[derive(Debug, Clone)]
pub struct Region {
    /// The loop, clockwise when `is_clockwise` and counter-clockwise otherwise.
    pub segments: Vec<SegmentWithPrev>,
    /// Outlines of disconnected loops nested directly inside the region,
    /// wound opposite to `segments`.
    pub holes: Vec<Vec<SegmentWithPrev>>,
    /// Whether the region lies inside every input shape. `None` when only one
    /// shape is involved or no interior point could be found.
    pub is_internal: Option<bool>,
    pub is_clockwise: bool,
    /// Summed winding number of all input shapes inside the region.
    pub winding: i32,
    /// Shapes with a non-zero winding number inside the region.
    pub containing: Vec<ShapeId>,
}

impl Region {
    /// The outer loop as a path.
    #[must_use]
    pub fn to_path(&self) -> Path {
        Path::from_segments_with_prev(&self.segments, true)
    }

    /// The outer loop followed by one path per hole.
    #[must_use]
    pub fn to_paths(&self) -> Vec<Path> {
        std::iter::once(self.to_path())
            .chain(
                self.holes
                    .iter()
                    .map(|h| Path::from_segments_with_prev(h, true)),
            )
            .collect()
    }
}

/// Regions found in a set of segments, plus the segments no region used.
#[derive(Debug, Clone, Default)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    /// Input segments that bound no region. A non-empty list means the
    /// decomposition may be incomplete.
    pub orphans: Vec<SegmentWithPrev>,
}

/// One traced face of the arrangement.
struct Face {
    geometry: Vec<SegmentWithPrev>,
    ring: Vec<Point2>,
    area: f64,
}

/// Traces the closed regions formed by `segments` split at `hits`.
///
/// Walking always takes the sharpest right turn, so every bounded face of
/// the arrangement comes out once, wound clockwise. The outline of each
/// connected piece comes out counter-clockwise; outlines lying inside a
/// bounded face become holes of the smallest such face. Each region is then
/// classified by the winding numbers of the input shapes at a point inside
/// it and outside its holes.
#[must_use]
pub fn collect_regions(segments: &[SegmentWithPrev], hits: &Hits) -> RegionSet {
    let graph = Graph::build(segments, hits);
    let half_edges = graph.half_edge_count();
    let mut visited = vec![false; half_edges];
    let mut used_edges = vec![false; graph.edges.len()];

    let mut shapes: Vec<ShapeId> = segments
        .iter()
        .filter(|s| is_usable(s))
        .map(|s| s.shape)
        .collect();
    shapes.sort_unstable();
    shapes.dedup();
    let chords = shape_chords(segments);

    let mut bounded: Vec<Face> = Vec::new();
    let mut outlines: Vec<Face> = Vec::new();
    for start in 0..half_edges {
        if visited[start] {
            continue;
        }
        let Some(walk) = trace_face(&graph, start, &mut visited) else {
            warn!(half_edge = start, "face walk did not close");
            continue;
        };
        let geometry: Vec<SegmentWithPrev> = walk.iter().map(|&h| graph.half_edge(h)).collect();
        let ring = flatten(&geometry);
        let area = signed_area_2d(&ring);
        let face = Face {
            geometry,
            ring,
            area,
        };
        if area > TOLERANCE * TOLERANCE {
            for &h in &walk {
                used_edges[h / 2] = true;
            }
            bounded.push(face);
        } else if area < -TOLERANCE * TOLERANCE {
            outlines.push(face);
        }
    }

    let mut holes: Vec<Vec<Face>> = bounded.iter().map(|_| Vec::new()).collect();
    for outline in outlines {
        let Some(outside) = sample_point(&outline.geometry, &outline.ring, |p| {
            winding_number(p, &outline.ring) == 0
        }) else {
            continue;
        };
        let container = bounded
            .iter()
            .enumerate()
            .filter(|(_, f)| winding_number(&outside, &f.ring) != 0)
            .min_by(|a, b| a.1.area.total_cmp(&b.1.area))
            .map(|(i, _)| i);
        if let Some(i) = container {
            holes[i].push(outline);
        }
    }

    let regions: Vec<Region> = bounded
        .into_iter()
        .zip(holes)
        .map(|(face, holes)| classify(face, holes, &shapes, &chords))
        .collect();

    let mut covered = vec![false; segments.len()];
    for (e, edge) in graph.edges.iter().enumerate() {
        if used_edges[e] {
            for &owner in &edge.owners {
                covered[owner] = true;
            }
        }
    }
    let orphans: Vec<SegmentWithPrev> = segments
        .iter()
        .zip(&covered)
        .filter(|(s, c)| is_usable(s) && !**c)
        .map(|(s, _)| *s)
        .collect();
    if !orphans.is_empty() {
        warn!(count = orphans.len(), "segments left outside every region");
    }

    debug!(
        segments = segments.len(),
        nodes = graph.nodes.len(),
        regions = regions.len(),
        holes = regions.iter().map(|r| r.holes.len()).sum::<usize>(),
        orphans = orphans.len(),
        "collected regions"
    );
    RegionSet { regions, orphans }
}

/// Follows `next` from `start` until the walk returns to it.
fn trace_face(graph: &Graph, start: usize, visited: &mut [bool]) -> Option<Vec<usize>> {
    let mut face = Vec::new();
    let mut h = start;
    loop {
        if visited[h] || face.len() > visited.len() {
            return None;
        }
        visited[h] = true;
        face.push(h);
        h = graph.next(h)?;
        if h == start {
            return Some(face);
        }
    }
}

fn flatten(loop_segments: &[SegmentWithPrev]) -> Vec<Point2> {
    loop_segments
        .iter()
        .flat_map(|s| s.points(FLATTEN_TOLERANCE))
        .collect()
}

/// Flattened chords of every usable input segment, tagged with its shape.
fn shape_chords(segments: &[SegmentWithPrev]) -> Vec<(ShapeId, Point2, Point2)> {
    let mut chords = Vec::new();
    for s in segments.iter().filter(|s| is_usable(s)) {
        let mut prev = s.start();
        for p in s.points(FLATTEN_TOLERANCE) {
            chords.push((s.shape, prev, p));
            prev = p;
        }
    }
    chords
}

/// A point accepted by `accept`, found by stepping off the middle of the
/// walk's longest segments toward their right-hand side.
fn sample_point(
    geometry: &[SegmentWithPrev],
    ring: &[Point2],
    accept: impl Fn(&Point2) -> bool,
) -> Option<Point2> {
    let (mut lo, mut hi) = (Point2::new(f64::MAX, f64::MAX), Point2::new(f64::MIN, f64::MIN));
    for p in ring {
        lo = Point2::new(lo.x.min(p.x), lo.y.min(p.y));
        hi = Point2::new(hi.x.max(p.x), hi.y.max(p.y));
    }
    let extent = (hi - lo).norm();

    let mut order: Vec<(f64, usize)> = geometry.iter().map(SegmentWithPrev::length).zip(0..).collect();
    order.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (_, i) in order {
        let s = &geometry[i];
        let d = s.tangent_at(0.5);
        if d.norm() < 0.5 {
            continue;
        }
        let mid = s.point_at(0.5);
        let normal = Vector2::new(-d.y, d.x);
        for step in [extent * 1e-3, extent * 1e-4, 1e-5] {
            let p = mid + normal * step;
            if accept(&p) {
                return Some(p);
            }
        }
    }
    None
}

fn classify(
    face: Face,
    holes: Vec<Face>,
    shapes: &[ShapeId],
    chords: &[(ShapeId, Point2, Point2)],
) -> Region {
    let sample = sample_point(&face.geometry, &face.ring, |p| {
        winding_number(p, &face.ring) > 0 && holes.iter().all(|h| winding_number(p, &h.ring) == 0)
    });
    let holes: Vec<Vec<SegmentWithPrev>> = holes.into_iter().map(|h| h.geometry).collect();
    let Some(sample) = sample else {
        warn!(segments = face.geometry.len(), "no interior point found for region");
        return Region {
            segments: face.geometry,
            holes,
            is_internal: None,
            is_clockwise: true,
            winding: 0,
            containing: Vec::new(),
        };
    };

    let mut winding = 0;
    let mut containing = Vec::new();
    for &shape in shapes {
        let w: i32 = chords
            .iter()
            .filter(|(id, _, _)| *id == shape)
            .map(|(_, a, b)| winding_contribution(&sample, a, b))
            .sum();
        if w != 0 {
            containing.push(shape);
        }
        winding += w;
    }

    let is_clockwise = winding > 0;
    let (segments, holes) = if is_clockwise {
        (face.geometry, holes)
    } else {
        (
            reverse_loop(&face.geometry),
            holes.iter().map(Vec::as_slice).map(reverse_loop).collect(),
        )
    };
    let is_internal = (shapes.len() >= 2).then(|| containing.len() == shapes.len());

    Region {
        segments,
        holes,
        is_internal,
        is_clockwise,
        winding,
        containing,
    }
}

fn reverse_loop(segments: &[SegmentWithPrev]) -> Vec<SegmentWithPrev> {
    segments.iter().rev().map(SegmentWithPrev::reversed).collect()
}
