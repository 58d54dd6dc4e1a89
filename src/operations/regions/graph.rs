//! Planar arrangement of split segments.
//!
//! Every segment is cut at its interior hits. The pieces become edges between
//! nodes (points merged within tolerance); coincident pieces from different
//! segments collapse into one edge that remembers all of its owners. Each
//! edge yields two half-edges, `2k` along the piece and `2k + 1` against it.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::geometry::SegmentWithPrev;
use crate::math::coord::{close_enough, positive_angle};
use crate::math::{CoordKey, Point2, ANGLE_TOLERANCE, TOLERANCE};

use super::hits::{is_usable, Hits};

/// A piece of one or more input segments between two nodes.
#[derive(Debug, Clone)]
pub(super) struct Edge {
    pub geometry: SegmentWithPrev,
    pub from: usize,
    pub to: usize,
    /// Indices of the input segments this piece belongs to.
    pub owners: Vec<usize>,
}

#[derive(Debug, Default)]
pub(super) struct Graph {
    pub nodes: Vec<Point2>,
    pub edges: Vec<Edge>,
    /// Outgoing half-edges per node, sorted by departure angle.
    outgoing: Vec<Vec<usize>>,
    node_index: HashMap<CoordKey, Vec<usize>>,
}

impl Graph {
    /// Builds the arrangement of `segments` split at `hits`.
    pub fn build(segments: &[SegmentWithPrev], hits: &Hits) -> Self {
        let mut graph = Self::default();
        let mut by_ends: HashMap<(usize, usize), Vec<usize>> = HashMap::new();

        for (index, segment) in segments.iter().enumerate() {
            if !is_usable(segment) {
                continue;
            }
            for (t0, t1) in split_params(segment, hits, index) {
                let piece = segment.sub(t0, t1);
                let from = graph.node(piece.start());
                let to = graph.node(piece.end());
                if from == to {
                    continue;
                }
                let piece = piece.with_prev(graph.nodes[from]).with_end(graph.nodes[to]);
                let key = (from.min(to), from.max(to));
                let mid = piece.point_at(0.5);
                let existing = by_ends.get(&key).and_then(|ids| {
                    ids.iter()
                        .copied()
                        .find(|&e| close_enough(&graph.edges[e].geometry.point_at(0.5), &mid))
                });
                if let Some(e) = existing {
                    if !graph.edges[e].owners.contains(&index) {
                        graph.edges[e].owners.push(index);
                    }
                    continue;
                }
                by_ends.entry(key).or_default().push(graph.edges.len());
                graph.edges.push(Edge {
                    geometry: piece,
                    from,
                    to,
                    owners: vec![index],
                });
            }
        }
        graph.sort_outgoing();
        graph
    }

    /// Finds or inserts the node at `p`.
    fn node(&mut self, p: Point2) -> usize {
        let key = CoordKey::of(&p);
        for k in key.neighbors() {
            if let Some(ids) = self.node_index.get(&k) {
                if let Some(&id) = ids.iter().find(|&&id| close_enough(&self.nodes[id], &p)) {
                    return id;
                }
            }
        }
        let id = self.nodes.len();
        self.nodes.push(p);
        self.node_index.entry(key).or_default().push(id);
        id
    }

    pub fn half_edge_count(&self) -> usize {
        self.edges.len() * 2
    }

    /// Geometry of a half-edge in its direction of travel.
    pub fn half_edge(&self, h: usize) -> SegmentWithPrev {
        let g = self.edges[h / 2].geometry;
        if h % 2 == 0 {
            g
        } else {
            g.reversed()
        }
    }

    fn origin(&self, h: usize) -> usize {
        let e = &self.edges[h / 2];
        if h % 2 == 0 {
            e.from
        } else {
            e.to
        }
    }

    fn sort_outgoing(&mut self) {
        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for h in 0..self.half_edge_count() {
            outgoing[self.origin(h)].push(h);
        }
        for list in &mut outgoing {
            let mut keyed: Vec<(f64, f64, usize)> = list
                .iter()
                .map(|&h| {
                    let s = self.half_edge(h);
                    let mut angle = positive_angle(s.tangent_angle_at(0.0));
                    if angle > std::f64::consts::TAU - ANGLE_TOLERANCE {
                        angle = 0.0;
                    }
                    (angle, s.curvature_at(0.0), h)
                })
                .collect();
            keyed.sort_by(|a, b| {
                if (a.0 - b.0).abs() <= ANGLE_TOLERANCE {
                    a.1.total_cmp(&b.1)
                } else {
                    a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal)
                }
            });
            *list = keyed.into_iter().map(|(_, _, h)| h).collect();
        }
        self.outgoing = outgoing;
    }

    /// The half-edge that follows `h` around the face on its right.
    ///
    /// At the node `h` arrives at, this is the outgoing half-edge just before
    /// the reverse of `h` in increasing angle order, i.e. the sharpest right
    /// turn.
    pub fn next(&self, h: usize) -> Option<usize> {
        let twin = h ^ 1;
        let list = &self.outgoing[self.origin(twin)];
        let pos = list.iter().position(|&x| x == twin)?;
        Some(list[(pos + list.len() - 1) % list.len()])
    }
}

/// Parameter intervals a segment is cut into.
///
/// Full circles without interior hits are cut in half so every piece joins
/// two distinct nodes.
fn split_params(segment: &SegmentWithPrev, hits: &Hits, index: usize) -> Vec<(f64, f64)> {
    let length = segment.length().max(TOLERANCE);
    let mut cuts: Vec<f64> = vec![0.0];
    for hit in hits.on(index) {
        let t = hit.along;
        if t * length <= TOLERANCE || (1.0 - t) * length <= TOLERANCE {
            continue;
        }
        if cuts.last().is_some_and(|&last| (t - last) * length <= TOLERANCE) {
            continue;
        }
        cuts.push(t);
    }
    if segment.is_full_circle() && cuts.len() == 1 {
        cuts.push(0.5);
    }
    cuts.push(1.0);
    cuts.windows(2).map(|w| (w[0], w[1])).collect()
}
