use tracing::debug;

use crate::error::Result;
use crate::geometry::{Path, SegmentWithPrev};
use crate::operations::regions::{collect_regions, get_some_hits, Region};
use crate::operations::simplify::simplify_path;

use super::chain::InsetChain;

/// Splits a raw offset chain into its valid loops.
///
/// The chain is cut at its self-intersections and traced into regions.
/// A region is kept when it winds positively (solid material, not an
/// inverted loop left by a concave corner) and its longest segment lies at
/// least `|inset| / 2` from `original`. Kept regions are simplified and
/// returned as their clockwise outline followed by any counter-clockwise
/// holes nested in them.
///
/// # Errors
///
/// Returns an error if the chain has no usable segment.
pub fn clean_up_inset_segments(chain: &InsetChain, original: &Path, inset: f64) -> Result<Vec<Path>> {
    if chain.segments.is_empty() {
        return Ok(Vec::new());
    }
    let hits = get_some_hits(&chain.segments, true)?;
    let set = collect_regions(&chain.segments, &hits);
    let source = original.segments_with_prev(0);
    let threshold = inset.abs() * 0.5;

    let kept: Vec<Path> = set
        .regions
        .iter()
        .filter(|r| r.winding > 0 && r.is_clockwise)
        .filter(|r| far_enough(r, &source, threshold))
        .flat_map(|r| r.to_paths())
        .map(|p| simplify_path(&p))
        .collect();

    debug!(
        regions = set.regions.len(),
        kept = kept.len(),
        inset,
        "cleaned up inset chain"
    );
    Ok(kept)
}

fn far_enough(region: &Region, source: &[SegmentWithPrev], threshold: f64) -> bool {
    let Some(longest) = region
        .segments
        .iter()
        .max_by(|a, b| a.length().total_cmp(&b.length()))
    else {
        return false;
    };
    let mid = longest.point_at(0.5);
    let d = source
        .iter()
        .filter(|s| !s.is_degenerate())
        .map(|s| s.distance_to(&mid))
        .fold(f64::MAX, f64::min);
    d >= threshold
}
