//! The data model: dense attribute arrays, face/line/point topology, and
//! shape spans. Entities here are built only by the parsing stage in
//! [`crate::obj`] and are logically immutable afterward.

use derive_more::Constructor;

/// Sentinel marking an absent index in a [`VertexIndexTriplet`] field, or an
/// absent `material_id` on a [`Face`]. Chosen so it can never collide with a
/// valid absolute (1-based) or resolved (0-based) index.
pub const INVALID_INDEX: i64 = i32::MIN as i64;

/// A geometric vertex: `v x y z [w]`. `w` defaults to `1.0` when absent.
#[derive(Clone, Copy, Constructor, Debug, Default, PartialEq)]
pub struct GeometricVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub weight: f32,
}

/// A vertex normal: `vn i j k`. Not guaranteed to be a unit vector.
#[derive(Clone, Copy, Constructor, Debug, Default, PartialEq)]
pub struct VertexNormal {
    pub i: f32,
    pub j: f32,
    pub k: f32,
}

/// A texture coordinate: `vt u [v] [w]`. `v` and `w` default to `0.0`.
#[derive(Clone, Copy, Constructor, Debug, Default, PartialEq)]
pub struct VertexTexture {
    pub u: f32,
    pub v: f32,
    pub w: f32,
}

/// A parameter-space vertex: `vp u [v] [weight]`. `v` and `weight` default
/// to `0.0`.
#[derive(Clone, Copy, Constructor, Debug, Default, PartialEq)]
pub struct ParamSpaceVertex {
    pub u: f32,
    pub v: f32,
    pub weight: f32,
}

/// A `v/vt/vn` compound reference used inside face and line operands.
/// Before materialization each field holds a raw, signed, 1-based (or
/// negative/relative) operand value, or [`INVALID_INDEX`] if the field was
/// absent from the source line. After materialization every non-sentinel
/// field is a resolved, 0-based index, guaranteed in-bounds for its
/// corresponding attribute array.
#[derive(Clone, Copy, Constructor, Debug, Default, PartialEq)]
pub struct VertexIndexTriplet {
    pub v_idx: i64,
    pub vt_idx: i64,
    pub vn_idx: i64,
}

impl VertexIndexTriplet {
    pub fn invalid() -> Self {
        Self {
            v_idx: INVALID_INDEX,
            vt_idx: INVALID_INDEX,
            vn_idx: INVALID_INDEX,
        }
    }
}

/// A couple `v/vt` used inside line operands. Line operands never carry a
/// normal; a line statement whose triplet form has `vn_idx != INVALID_INDEX`
/// is rejected as malformed (see [`crate::command`]).
#[derive(Clone, Copy, Constructor, Debug, Default, PartialEq)]
pub struct VertexTextureCouple {
    pub v_idx: i64,
    pub vt_idx: i64,
}

/// A face: an ordered sequence of triplets, optionally triangulated into a
/// fan. `material_id` of `-1` means "no material bound"; `smoothing_id` of
/// `0` means "no smoothing group".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Face {
    pub triplets: Vec<VertexIndexTriplet>,
    pub triangle_count: u32,
    pub material_id: i32,
    pub smoothing_id: u32,
}

/// A polyline: an ordered sequence of `v/vt` couples.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Line {
    pub couples: Vec<VertexTextureCouple>,
}

/// A point set: plain vertex indices with no associated texture or normal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointSet {
    pub v_idx: Vec<i64>,
}

/// A contiguous span of faces labeled by its originating `g`/`o` name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    pub name: String,
    pub face_offset: usize,
    pub length: usize,
}

/// The top-level parse result: dense arrays for every vertex-like record,
/// the face/line/point topology, the shapes that partition the face array,
/// and bookkeeping for any `mtllib`/`maplib` references encountered.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attrib {
    pub vertices: Vec<GeometricVertex>,
    pub normals: Vec<VertexNormal>,
    pub texcoords: Vec<VertexTexture>,
    pub param_vertices: Vec<ParamSpaceVertex>,
    pub faces: Vec<Face>,
    pub lines: Vec<Line>,
    pub points: PointSet,
    pub shapes: Vec<Shape>,
    pub triangle_count_total: u32,
    /// Names from every `mtllib` line, in source order. Only the first is
    /// used to resolve `usemtl` references (see `SPEC_FULL.md`); the rest
    /// are exposed for callers that want to merge multiple libraries
    /// themselves.
    pub material_libs: Vec<String>,
}
