//! Dense-array parsing of Wavefront OBJ geometry and MTL materials.
//!
//! [`parse_obj`] reads a complete `.obj` buffer into an [`Attrib`]: flat
//! vertex/normal/texcoord/param-vertex arrays, a face/line/point topology
//! with already-rectified indices, and shape spans recovered from `g`/`o`
//! boundaries. [`parse_mtl`] and [`parse_mtl_file`] do the same for `.mtl`
//! material libraries.
//!
//! ```
//! use wavefront_attrib::{parse_obj, ParseConfig};
//!
//! let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nf 1 2 3\n";
//! let attrib = parse_obj(obj.as_bytes(), ParseConfig::default()).unwrap();
//! assert_eq!(attrib.vertices.len(), 3);
//! assert_eq!(attrib.faces.len(), 1);
//! ```

mod command;
mod face;
mod lexical;
mod material;
mod material_table;
mod model;
mod numeric;
mod obj;
mod triplet;

pub use material::{Material, Rgb};
pub use material_table::MaterialTable;
pub use model::{
    Attrib, Face, GeometricVertex, Line, ParamSpaceVertex, PointSet, Shape, VertexIndexTriplet,
    VertexNormal, VertexTexture, VertexTextureCouple, INVALID_INDEX,
};
pub use obj::ObjError;

/// Bit flags controlling [`parse_obj`]'s behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseConfig {
    pub triangulate: bool,
}

/// The closed set of status codes the parser can report, mirroring the
/// reference implementation's return-code ABI
/// (`TINYOBJ_SUCCESS`/`TINYOBJ_ERROR_*`). Exposed alongside the idiomatic
/// [`Error`] type for callers porting code that branches on these values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    NoCommand = 1,
    Success = 0,
    NotSet = -1,
    Memory = -2,
    Empty = -3,
    FileOperation = -4,
    InvalidParameter = -5,
    UnknownParameter = -6,
    MalformedParameter = -7,
}

/// Top-level error type for every public entry point in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse OBJ data")]
    Obj(#[from] ObjError),
    #[error("failed to read OBJ/MTL file")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Maps this error onto the closed [`ErrorCode`] vocabulary.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Obj(
                ObjError::FaceTooFewVertices { .. }
                | ObjError::LineTooFewVertices { .. }
                | ObjError::LineNormalNotAllowed { .. }
                | ObjError::PointEmpty { .. },
            ) => ErrorCode::MalformedParameter,
            Error::Obj(ObjError::EmptyInput) => ErrorCode::Empty,
            Error::Io(_) => ErrorCode::FileOperation,
        }
    }
}

/// Parses a complete OBJ buffer.
pub fn parse_obj(buf: &[u8], config: ParseConfig) -> Result<Attrib, Error> {
    Ok(obj::parse_obj(buf, config.triangulate)?)
}

/// Resolves `usemtl` references in `obj_buf` against a material table built
/// from a separately parsed `.mtl` buffer, patching each face's
/// `material_id` in place.
pub fn resolve_materials(obj_buf: &[u8], attrib: &mut Attrib, table: &MaterialTable) {
    obj::resolve_materials(obj_buf, attrib, table);
}

/// Parses a complete MTL buffer into a list of materials plus a name→index
/// table suitable for [`resolve_materials`].
pub fn parse_mtl(buf: &[u8]) -> (Vec<Material>, MaterialTable) {
    let mut table = MaterialTable::new();
    let materials = material::parse_mtl(buf, &mut table);
    (materials, table)
}

/// Reads and parses an MTL file from disk.
pub fn parse_mtl_file(path: impl AsRef<std::path::Path>) -> Result<(Vec<Material>, MaterialTable), Error> {
    let buf = std::fs::read(path)?;
    Ok(parse_mtl(&buf))
}
