//! Top-level OBJ parsing: line dispatch, index rectification, and shape
//! span construction.
//!
//! The reference implementation parses in two passes — a counting pass
//! that sizes fixed-capacity arrays, then a populating pass — because its
//! arrays are raw `malloc`'d buffers. [`crate::model::Attrib`] instead holds
//! growable `Vec`s, so a single pass suffices: each line is dispatched and
//! pushed immediately, and relative (negative) index operands are resolved
//! against the *running* element count at the point the line is read, which
//! is exactly what "relative to vertices seen so far in the stream" means
//! regardless of whether the count was precomputed or accumulated live.

use log::warn;

use crate::command::{classify, Command};
use crate::face::{parse_face, parse_line, parse_point};
use crate::lexical::{skip_line_terminator, skip_space, until_space};
use crate::model::{
    Attrib, GeometricVertex, ParamSpaceVertex, Shape, VertexIndexTriplet, VertexNormal,
    VertexTexture, VertexTextureCouple, INVALID_INDEX,
};
use crate::numeric::try_parse_float;

#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("face on line {line}: needs at least 3 vertices")]
    FaceTooFewVertices { line: usize },
    #[error("line statement on line {line}: needs at least 2 vertices")]
    LineTooFewVertices { line: usize },
    #[error("line statement on line {line}: normals are not allowed on `l` operands")]
    LineNormalNotAllowed { line: usize },
    #[error("point statement on line {line} has no operands")]
    PointEmpty { line: usize },
    #[error("OBJ input is empty")]
    EmptyInput,
}

/// Rectifies a raw (possibly absolute, zero, negative, or sentinel) index
/// operand into a resolved form. `current_count` is the number of elements
/// of the corresponding attribute array already present when this operand
/// was read.
///
/// - `raw > 0`: absolute 1-based, becomes 0-based (`raw - 1`).
/// - `raw == 0`: illegal in a well-formed file; remapped to `0` rather than
///   underflowing.
/// - `raw == INVALID_INDEX`: the field was absent; stays a sentinel.
/// - `raw < 0`: relative, resolved against `current_count`.
fn fix_index(raw: i64, current_count: i64) -> i64 {
    if raw == INVALID_INDEX {
        INVALID_INDEX
    } else if raw > 0 {
        raw - 1
    } else if raw == 0 {
        0
    } else {
        current_count + raw
    }
}

struct ShapeBuilder {
    shapes: Vec<Shape>,
    current_name: String,
    current_offset: usize,
}

impl ShapeBuilder {
    fn new() -> Self {
        Self {
            shapes: Vec::new(),
            current_name: String::new(),
            current_offset: 0,
        }
    }

    fn begin(&mut self, name: &str, face_count_so_far: usize) {
        self.close(face_count_so_far);
        self.current_name = name.to_string();
        self.current_offset = face_count_so_far;
    }

    fn close(&mut self, face_count_so_far: usize) {
        let length = face_count_so_far - self.current_offset;
        if length > 0 {
            self.shapes.push(Shape {
                name: std::mem::take(&mut self.current_name),
                face_offset: self.current_offset,
                length,
            });
        }
    }

    fn finish(mut self, face_count_so_far: usize) -> Vec<Shape> {
        self.close(face_count_so_far);
        self.shapes
    }
}

/// Parses a complete OBJ buffer. `triangulate` selects fan triangulation
/// for faces with more than 3 vertices (see [`crate::face::parse_face`]).
pub fn parse_obj(buf: &[u8], triangulate: bool) -> Result<Attrib, ObjError> {
    if buf.is_empty() {
        return Err(ObjError::EmptyInput);
    }

    let end = buf.len();
    let mut attrib = Attrib::default();
    let mut shapes = ShapeBuilder::new();
    let material_id: i32 = -1;
    let mut smoothing_id: u32 = 0;

    let mut pos = 0;
    let mut line_no = 0usize;

    while pos < end {
        line_no += 1;
        let line_start = skip_space(buf, pos, end);
        let line_len = crate::lexical::line_length(buf, line_start, end);
        let line_end = line_start + line_len;

        if line_start < line_end {
            match classify(buf, line_start, line_end) {
                Command::GeometricVertex => {
                    let op = skip_operand_keyword(buf, line_start, line_end);
                    let (x, _, n1) = try_parse_float(buf, op, line_end);
                    let (y, y_ok, n2) = try_parse_float(buf, n1, line_end);
                    let (z, z_ok, n3) = try_parse_float(buf, n2, line_end);
                    let (w, w_ok, _) = try_parse_float(buf, n3, line_end);
                    attrib.vertices.push(GeometricVertex {
                        x,
                        y: if y_ok { y } else { 0.0 },
                        z: if z_ok { z } else { 0.0 },
                        weight: if w_ok { w } else { 1.0 },
                    });
                }
                Command::VertexNormal => {
                    let op = skip_operand_keyword(buf, line_start, line_end);
                    let (i, _, n1) = try_parse_float(buf, op, line_end);
                    let (j, j_ok, n2) = try_parse_float(buf, n1, line_end);
                    let (k, k_ok, _) = try_parse_float(buf, n2, line_end);
                    attrib.normals.push(VertexNormal {
                        i,
                        j: if j_ok { j } else { 0.0 },
                        k: if k_ok { k } else { 0.0 },
                    });
                }
                Command::VertexTexture => {
                    let op = skip_operand_keyword(buf, line_start, line_end);
                    let (u, _, n1) = try_parse_float(buf, op, line_end);
                    let (v, v_ok, n2) = try_parse_float(buf, n1, line_end);
                    let (w, w_ok, _) = try_parse_float(buf, n2, line_end);
                    attrib.texcoords.push(VertexTexture {
                        u,
                        v: if v_ok { v } else { 0.0 },
                        w: if w_ok { w } else { 0.0 },
                    });
                }
                Command::ParamSpaceVertex => {
                    let op = skip_operand_keyword(buf, line_start, line_end);
                    let (u, _, n1) = try_parse_float(buf, op, line_end);
                    let (v, v_ok, n2) = try_parse_float(buf, n1, line_end);
                    let (w, w_ok, _) = try_parse_float(buf, n2, line_end);
                    attrib.param_vertices.push(ParamSpaceVertex {
                        u,
                        v: if v_ok { v } else { 0.0 },
                        weight: if w_ok { w } else { 0.0 },
                    });
                }
                Command::Face => {
                    let op = skip_operand_keyword(buf, line_start, line_end);
                    let face = parse_face(buf, op, line_end, triangulate, material_id, smoothing_id)
                        .map_err(|_| ObjError::FaceTooFewVertices { line: line_no })?;
                    let rectified = rectify_face(&attrib, face);
                    attrib.triangle_count_total += rectified.triangle_count;
                    attrib.faces.push(rectified);
                }
                Command::Line => {
                    let op = skip_operand_keyword(buf, line_start, line_end);
                    let line = parse_line(buf, op, line_end).map_err(|e| match e {
                        crate::face::LineError::TooFewVertices => {
                            ObjError::LineTooFewVertices { line: line_no }
                        }
                        crate::face::LineError::NormalNotAllowed => {
                            ObjError::LineNormalNotAllowed { line: line_no }
                        }
                    })?;
                    attrib.lines.push(rectify_line(&attrib, line));
                }
                Command::Point => {
                    let op = skip_operand_keyword(buf, line_start, line_end);
                    let points = parse_point(buf, op, line_end)
                        .map_err(|_| ObjError::PointEmpty { line: line_no })?;
                    let current = attrib.vertices.len() as i64;
                    for v in points.v_idx {
                        attrib.points.v_idx.push(fix_index(v, current));
                    }
                }
                Command::Group(name) => shapes.begin(name, attrib.faces.len()),
                Command::Object(name) => shapes.begin(name, attrib.faces.len()),
                Command::Smoothing(id) => smoothing_id = id,
                Command::UseMtl(_) => {
                    // Resolving a name to a material id needs a table built
                    // from the referenced `.mtl` file, which this pass does
                    // not have; `resolve_materials` patches `material_id` in
                    // on every face once the caller has parsed that file.
                }
                Command::MtlLib(names) => {
                    attrib
                        .material_libs
                        .extend(names.split_whitespace().map(str::to_string));
                }
                Command::Empty => {}
            }
        }

        pos = skip_line_terminator(buf, line_end, end);
        if pos == line_end && pos < end {
            pos = end;
        }
    }

    attrib.shapes = shapes.finish(attrib.faces.len());
    Ok(attrib)
}

fn skip_operand_keyword(buf: &[u8], pos: usize, end: usize) -> usize {
    let tok_len = until_space(buf, pos, end);
    skip_space(buf, pos + tok_len, end)
}

fn rectify_face(attrib: &Attrib, mut face: crate::model::Face) -> crate::model::Face {
    let v_count = attrib.vertices.len() as i64;
    let vt_count = attrib.texcoords.len() as i64;
    let vn_count = attrib.normals.len() as i64;
    for t in &mut face.triplets {
        *t = VertexIndexTriplet {
            v_idx: fix_index(t.v_idx, v_count),
            vt_idx: fix_index(t.vt_idx, vt_count),
            vn_idx: fix_index(t.vn_idx, vn_count),
        };
    }
    face
}

fn rectify_line(attrib: &Attrib, mut line: crate::model::Line) -> crate::model::Line {
    let v_count = attrib.vertices.len() as i64;
    let vt_count = attrib.texcoords.len() as i64;
    for c in &mut line.couples {
        *c = VertexTextureCouple {
            v_idx: fix_index(c.v_idx, v_count),
            vt_idx: fix_index(c.vt_idx, vt_count),
        };
    }
    line
}

/// Resolves every `usemtl` reference in `buf` against `table`, replacing
/// the running `material_id` as each is seen. Kept separate from
/// [`parse_obj`] because material resolution depends on a table built from
/// a *different* buffer (the referenced `.mtl` file), which callers load
/// and parse independently; this performs a second lightweight scan to
/// patch face `material_id`s in place once both are available.
pub fn resolve_materials(buf: &[u8], attrib: &mut Attrib, table: &crate::material_table::MaterialTable) {
    let end = buf.len();
    let mut pos = 0;
    let mut material_id: i32 = -1;
    let mut face_idx = 0usize;

    while pos < end {
        let line_start = skip_space(buf, pos, end);
        let line_len = crate::lexical::line_length(buf, line_start, end);
        let line_end = line_start + line_len;

        if line_start < line_end {
            match classify(buf, line_start, line_end) {
                Command::UseMtl(name) => {
                    material_id = match table.get(name) {
                        Some(id) => id as i32,
                        None => {
                            warn!("usemtl references unknown material `{name}`");
                            -1
                        }
                    };
                }
                Command::Face => {
                    if let Some(f) = attrib.faces.get_mut(face_idx) {
                        f.material_id = material_id;
                    }
                    face_idx += 1;
                }
                _ => {}
            }
        }

        pos = skip_line_terminator(buf, line_end, end);
        if pos == line_end && pos < end {
            pos = end;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CUBE: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
g front
f 1 2 3 4
g back
f 5 6 7 8
";

    #[test]
    fn two_quads_partition_into_two_shapes() {
        let attrib = parse_obj(CUBE.as_bytes(), true).unwrap();
        assert_eq!(attrib.vertices.len(), 8);
        assert_eq!(attrib.faces.len(), 2);
        assert_eq!(attrib.shapes.len(), 2);
        assert_eq!(attrib.shapes[0].name, "front");
        assert_eq!(attrib.shapes[0].face_offset, 0);
        assert_eq!(attrib.shapes[0].length, 1);
        assert_eq!(attrib.shapes[1].name, "back");
        assert_eq!(attrib.shapes[1].face_offset, 1);
        assert_eq!(attrib.shapes[1].length, 1);
    }

    #[test]
    fn triangulated_quad_has_six_triplets_and_two_triangles() {
        let attrib = parse_obj(CUBE.as_bytes(), true).unwrap();
        assert_eq!(attrib.faces[0].triplets.len(), 6);
        assert_eq!(attrib.faces[0].triangle_count, 2);
        assert_eq!(attrib.triangle_count_total, 4);
    }

    #[test]
    fn absolute_indices_resolve_to_zero_based() {
        let attrib = parse_obj(CUBE.as_bytes(), true).unwrap();
        assert_eq!(attrib.faces[0].triplets[0].v_idx, 0);
        assert_eq!(attrib.faces[1].triplets[0].v_idx, 4);
    }

    #[test]
    fn relative_index_resolves_against_running_count() {
        let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nf -3 -2 -1\n";
        let attrib = parse_obj(obj.as_bytes(), true).unwrap();
        assert_eq!(attrib.faces[0].triplets[0].v_idx, 0);
        assert_eq!(attrib.faces[0].triplets[1].v_idx, 1);
        assert_eq!(attrib.faces[0].triplets[2].v_idx, 2);
    }

    #[test]
    fn unknown_directive_is_skipped_without_side_effect() {
        let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nzz something\nf 1 2 3\n";
        let attrib = parse_obj(obj.as_bytes(), true).unwrap();
        assert_eq!(attrib.faces.len(), 1);
    }

    #[test]
    fn no_group_statements_yields_single_default_shape() {
        let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n";
        let attrib = parse_obj(obj.as_bytes(), true).unwrap();
        assert_eq!(attrib.shapes.len(), 1);
        assert_eq!(attrib.shapes[0].name, "");
    }

    #[test]
    fn sum_of_triangle_counts_matches_total() {
        let attrib = parse_obj(CUBE.as_bytes(), true).unwrap();
        let sum: u32 = attrib.faces.iter().map(|f| f.triangle_count).sum();
        assert_eq!(sum, attrib.triangle_count_total);
    }

    #[test]
    fn mtllib_line_with_multiple_names_records_all_of_them() {
        let obj = "mtllib a.mtl b.mtl\nv 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n";
        let attrib = parse_obj(obj.as_bytes(), true).unwrap();
        assert_eq!(attrib.material_libs, vec!["a.mtl", "b.mtl"]);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(parse_obj(b"", true), Err(ObjError::EmptyInput)));
    }
}
