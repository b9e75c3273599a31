//! Parses the operand list of `f`, `l`, and `p` lines, and triangulates
//! faces into a fan.
//!
//! Grounded on `tinyobj_obj_parse_face` in the reference header for the
//! overall "collect triplets, then fan out" shape. The reference's own fan
//! loop (tracked via a `last_corner` index) undercounts triangles for N > 4
//! vertices — hand-tracing a hexagon through it yields `triangle_count == 3`
//! where `N - 2 == 4` is required — so the loop below instead implements the
//! plain, textually unambiguous fan: push the first three triplets as-is,
//! then for every remaining triplet push `(first, previous, current)` and
//! advance `previous`.

use crate::model::{Face, Line, PointSet, VertexIndexTriplet, VertexTextureCouple, INVALID_INDEX};
use crate::triplet::parse_triplet;

#[derive(Debug)]
pub enum FaceError {
    TooFewVertices,
}

/// Parses a face operand list (`f v1/vt1/vn1 v2/vt2/vn2 ...`) starting at
/// `pos`. `triangulate` selects fan triangulation; when false the face is
/// stored as a single N-gon with `triangle_count == 1`.
///
/// The vertex-count check happens after the whole line has been scanned,
/// never before — checking early (as the reference's `f->count < 3` probe
/// does, before `count` is assigned) would reject the line based on a stale
/// count.
pub fn parse_face(
    buf: &[u8],
    mut pos: usize,
    end: usize,
    triangulate: bool,
    material_id: i32,
    smoothing_id: u32,
) -> Result<Face, FaceError> {
    let mut triplets = Vec::new();
    while pos < end {
        let (triplet, next) = parse_triplet(buf, pos, end);
        triplets.push(triplet);
        if next == pos {
            break;
        }
        pos = next;
    }

    if triplets.len() < 3 {
        return Err(FaceError::TooFewVertices);
    }

    if !triangulate {
        return Ok(Face {
            triplets,
            triangle_count: 1,
            material_id,
            smoothing_id,
        });
    }

    Ok(Face {
        triangle_count: (triplets.len() - 2) as u32,
        triplets: fan_triangulate(&triplets),
        material_id,
        smoothing_id,
    })
}

/// Fans `[T0, T1, T2, ..., T(n-1)]` into `3*(n-2)` triplets: the untouched
/// first triangle `(T0, T1, T2)`, then one `(T0, T(i-1), Ti)` per remaining
/// vertex.
fn fan_triangulate(triplets: &[VertexIndexTriplet]) -> Vec<VertexIndexTriplet> {
    let anchor = triplets[0];
    let mut out = Vec::with_capacity(3 * (triplets.len() - 2));
    out.push(anchor);
    out.push(triplets[1]);
    out.push(triplets[2]);

    let mut prev = triplets[2];
    for &current in &triplets[3..] {
        out.push(anchor);
        out.push(prev);
        out.push(current);
        prev = current;
    }
    out
}

#[derive(Debug)]
pub enum LineError {
    TooFewVertices,
    NormalNotAllowed,
}

/// Parses a line operand list (`l v1/vt1 v2/vt2 ...`). A couple whose
/// triplet form carries a normal (`vn_idx != INVALID_INDEX`, i.e. the source
/// wrote `v/vt/vn` or `v//vn` on an `l` line) is rejected as malformed.
pub fn parse_line(buf: &[u8], mut pos: usize, end: usize) -> Result<Line, LineError> {
    let mut couples = Vec::new();
    while pos < end {
        let (triplet, next) = parse_triplet(buf, pos, end);
        if triplet.vn_idx != INVALID_INDEX {
            return Err(LineError::NormalNotAllowed);
        }
        couples.push(VertexTextureCouple {
            v_idx: triplet.v_idx,
            vt_idx: triplet.vt_idx,
        });
        if next == pos {
            break;
        }
        pos = next;
    }

    if couples.len() < 2 {
        return Err(LineError::TooFewVertices);
    }

    Ok(Line { couples })
}

#[derive(Debug)]
pub enum PointError {
    Empty,
}

/// Parses a point operand list (`p v1 v2 ...`): plain vertex indices, no
/// texture or normal component.
pub fn parse_point(buf: &[u8], mut pos: usize, end: usize) -> Result<PointSet, PointError> {
    let mut v_idx = Vec::new();
    while pos < end {
        let (triplet, next) = parse_triplet(buf, pos, end);
        v_idx.push(triplet.v_idx);
        if next == pos {
            break;
        }
        pos = next;
    }

    if v_idx.is_empty() {
        return Err(PointError::Empty);
    }

    Ok(PointSet { v_idx })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn triangle_is_untouched_by_triangulation() {
        let face = parse_face(b"1/1/1 2/2/2 3/3/3", 0, 17, true, -1, 0).unwrap();
        assert_eq!(face.triangle_count, 1);
        assert_eq!(face.triplets.len(), 3);
    }

    #[test]
    fn quad_triangulates_into_two_triangles() {
        let buf = b"1/1/1 2/2/2 3/3/3 4/4/4";
        let face = parse_face(buf, 0, buf.len(), true, -1, 0).unwrap();
        assert_eq!(face.triangle_count, 2);
        assert_eq!(face.triplets.len(), 6);
        assert_eq!(face.triplets[0].v_idx, 1);
        assert_eq!(face.triplets[3].v_idx, 1);
        assert_eq!(face.triplets[4].v_idx, 3);
        assert_eq!(face.triplets[5].v_idx, 4);
    }

    #[test]
    fn hexagon_triangulates_into_four_triangles() {
        let buf = b"1 2 3 4 5 6";
        let face = parse_face(buf, 0, buf.len(), true, -1, 0).unwrap();
        assert_eq!(face.triangle_count, 4);
        assert_eq!(face.triplets.len(), 12);
    }

    #[test]
    fn untriangulated_ngon_keeps_all_vertices() {
        let buf = b"1 2 3 4 5";
        let face = parse_face(buf, 0, buf.len(), false, -1, 0).unwrap();
        assert_eq!(face.triangle_count, 1);
        assert_eq!(face.triplets.len(), 5);
    }

    #[test]
    fn face_with_two_vertices_is_rejected() {
        let buf = b"1 2";
        assert!(matches!(
            parse_face(buf, 0, buf.len(), true, -1, 0),
            Err(FaceError::TooFewVertices)
        ));
    }

    #[test]
    fn line_with_normal_is_rejected() {
        let buf = b"1/1/1 2/2/2";
        assert!(matches!(parse_line(buf, 0, buf.len()), Err(LineError::NormalNotAllowed)));
    }

    #[test]
    fn line_parses_couples() {
        let buf = b"1/1 2/2 3/3";
        let line = parse_line(buf, 0, buf.len()).unwrap();
        assert_eq!(line.couples.len(), 3);
        assert_eq!(line.couples[2].v_idx, 3);
    }

    #[test]
    fn point_parses_plain_indices() {
        let buf = b"1 2 3";
        let points = parse_point(buf, 0, buf.len()).unwrap();
        assert_eq!(points.v_idx, vec![1, 2, 3]);
    }
}
