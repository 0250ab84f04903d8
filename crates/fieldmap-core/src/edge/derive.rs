//! Segment decomposition and headland carry-over
//!
//! A ring of N vertices yields N segments, segment i joining vertex i to
//! vertex (i + 1) mod N. When a ring is recomputed, every new segment looks
//! for a previous edge with the same endpoints (either direction, exact
//! coordinates) and inherits its headland count.
//!
//! Matching uses exact coordinate equality, with no tolerance: a vertex
//! moved by any amount breaks the match for both of its segments, which then
//! fall back to the parent's default.

use crate::geometry::{LatLng, Segment};

use super::EdgeEntity;

/// Split a closed ring into its boundary segments
pub fn ring_segments(ring: &[LatLng]) -> Vec<Segment> {
    let n = ring.len();
    (0..n)
        .map(|i| Segment::new(ring[i], ring[(i + 1) % n]))
        .collect()
}

/// First previous edge lying on the same segment, if any
pub fn find_matching_edge<'a>(
    segment: &Segment,
    previous: &'a [EdgeEntity],
) -> Option<&'a EdgeEntity> {
    previous.iter().find(|e| e.segment.same_endpoints(segment))
}

/// A segment of the recomputed ring together with its headland count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedEdge {
    pub segment: Segment,
    pub headland_num: u32,
    /// Whether the headland count was carried over from a previous edge
    pub preserved: bool,
}

/// Plan the edges of a ring, carrying headland counts over from `previous`
///
/// A previous edge may donate its count to more than one new segment when
/// the ring contains the same segment twice.
pub fn plan_edges(ring: &[LatLng], previous: &[EdgeEntity], default_headland: u32) -> Vec<PlannedEdge> {
    ring_segments(ring)
        .into_iter()
        .map(|segment| match find_matching_edge(&segment, previous) {
            Some(old) => PlannedEdge {
                segment,
                headland_num: old.headland_num,
                preserved: true,
            },
            None => PlannedEdge {
                segment,
                headland_num: default_headland,
                preserved: false,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn square() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(1.0, 0.0),
        ]
    }

    fn edges_of(ring: &[LatLng], headland: impl Fn(usize) -> u32) -> Vec<EdgeEntity> {
        let parent = Uuid::new_v4();
        ring_segments(ring)
            .into_iter()
            .enumerate()
            .map(|(i, s)| EdgeEntity::new(parent, s, headland(i)))
            .collect()
    }

    #[test]
    fn test_ring_segments_wrap_around() {
        let ring = square();
        let segments = ring_segments(&ring);
        assert_eq!(segments.len(), 4);
        for (i, s) in segments.iter().enumerate() {
            assert_eq!(s.start, ring[i]);
            assert_eq!(s.end, ring[(i + 1) % 4]);
        }
    }

    #[test]
    fn test_unchanged_ring_preserves_everything() {
        let ring = square();
        let previous = edges_of(&ring, |i| i as u32 + 5);
        let planned = plan_edges(&ring, &previous, 2);

        assert!(planned.iter().all(|p| p.preserved));
        let counts: Vec<u32> = planned.iter().map(|p| p.headland_num).collect();
        assert_eq!(counts, [5, 6, 7, 8]);
    }

    #[test]
    fn test_reversed_ring_matches_undirected() {
        let ring = square();
        let previous = edges_of(&ring, |i| i as u32 + 5);
        let mut reversed = ring.clone();
        reversed.reverse();

        let planned = plan_edges(&reversed, &previous, 2);
        assert!(planned.iter().all(|p| p.preserved));
        // D -> C is old segment 2 walked backwards
        assert_eq!(planned[0].headland_num, 7);
    }

    #[test]
    fn test_moved_vertex_resets_adjacent_segments() {
        let ring = square();
        let previous = edges_of(&ring, |_| 9);
        let mut moved = ring.clone();
        moved[2] = LatLng::new(1.5, 1.5);

        let planned = plan_edges(&moved, &previous, 2);
        let counts: Vec<u32> = planned.iter().map(|p| p.headland_num).collect();
        assert_eq!(counts, [9, 2, 2, 9]);
    }

    #[test]
    fn test_no_previous_edges_uses_default() {
        let planned = plan_edges(&square(), &[], 3);
        assert_eq!(planned.len(), 4);
        assert!(planned.iter().all(|p| !p.preserved && p.headland_num == 3));
    }

    #[test]
    fn test_removed_vertex_drops_segments() {
        let ring = square();
        let previous = edges_of(&ring, |_| 4);
        let triangle = vec![ring[0], ring[1], ring[2]];

        let planned = plan_edges(&triangle, &previous, 1);
        let counts: Vec<u32> = planned.iter().map(|p| p.headland_num).collect();
        assert_eq!(counts, [4, 4, 1]);
    }
}
