//! Classifies one OBJ source line into a [`Command`], borrowing name-like
//! operands (`g`/`o`/`usemtl`/`mtllib`) straight out of the input buffer.
//!
//! Grounded on the directive dispatch in `tinyobj_parse_obj` in the
//! reference header, which switches on the first one or two bytes of each
//! line (`v`, `vn`, `vt`, `vp`, `f`, `l`, `p`, `g`, `o`, `s`, `usemtl`,
//! `mtllib`).

use crate::lexical::{name_length, rest_of_line_length, skip_space, until_space};

/// One classified OBJ line. Lifetime `'a` ties borrowed names to the input
/// buffer; numeric operands are parsed eagerly in [`crate::face`] instead,
/// since they don't need to borrow anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    GeometricVertex,
    VertexNormal,
    VertexTexture,
    ParamSpaceVertex,
    Face,
    Line,
    Point,
    Group(&'a str),
    Object(&'a str),
    /// Smoothing group operand, already resolved to its integer id: `off`
    /// and any non-numeric token become `0`, `on` becomes `1`.
    Smoothing(u32),
    UseMtl(&'a str),
    /// The full, unsplit operand of a `mtllib` line — one or more
    /// whitespace-separated material library names. The caller splits this
    /// on whitespace (see [`crate::obj::parse_obj`]) since a single `mtllib`
    /// statement may name several libraries.
    MtlLib(&'a str),
    /// Blank line, comment-only line, or an unrecognized directive.
    Empty,
}

fn borrow_name(buf: &[u8], pos: usize, end: usize) -> &str {
    let start = skip_space(buf, pos, end);
    let len = name_length(buf, start, end);
    std::str::from_utf8(&buf[start..start + len]).unwrap_or_default()
}

fn borrow_rest_of_line(buf: &[u8], pos: usize, end: usize) -> &str {
    let start = skip_space(buf, pos, end);
    let len = rest_of_line_length(buf, start, end);
    std::str::from_utf8(&buf[start..start + len]).unwrap_or_default()
}

fn parse_smoothing_operand(buf: &[u8], pos: usize, end: usize) -> u32 {
    let start = skip_space(buf, pos, end);
    let len = until_space(buf, start, end);
    let token = &buf[start..start + len];
    match token {
        b"off" => 0,
        b"on" => 1,
        _ => {
            if token.first().is_some_and(u8::is_ascii_digit) {
                crate::numeric::parse_int(buf, start, end).0.max(0) as u32
            } else {
                0
            }
        }
    }
}

/// Classifies the line in `buf[pos..end)`. `pos` must already point past any
/// leading whitespace on the line.
pub fn classify<'a>(buf: &'a [u8], pos: usize, end: usize) -> Command<'a> {
    if pos >= end || buf[pos] == b'#' {
        return Command::Empty;
    }

    let tok_len = until_space(buf, pos, end);
    let keyword = &buf[pos..pos + tok_len];
    let rest = pos + tok_len;

    match keyword {
        b"v" => Command::GeometricVertex,
        b"vn" => Command::VertexNormal,
        b"vt" => Command::VertexTexture,
        b"vp" => Command::ParamSpaceVertex,
        b"f" => Command::Face,
        b"l" => Command::Line,
        b"p" => Command::Point,
        b"g" => Command::Group(borrow_name(buf, rest, end)),
        b"o" => Command::Object(borrow_name(buf, rest, end)),
        b"s" => Command::Smoothing(parse_smoothing_operand(buf, rest, end)),
        b"usemtl" => Command::UseMtl(borrow_name(buf, rest, end)),
        b"mtllib" => Command::MtlLib(borrow_rest_of_line(buf, rest, end)),
        _ => Command::Empty,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn classify_str(s: &str) -> Command<'_> {
        let buf = s.as_bytes();
        classify(buf, 0, buf.len())
    }

    #[test]
    fn recognizes_vertex_kinds() {
        assert_eq!(classify_str("v 1 2 3"), Command::GeometricVertex);
        assert_eq!(classify_str("vn 0 0 1"), Command::VertexNormal);
        assert_eq!(classify_str("vt 0.5 0.5"), Command::VertexTexture);
        assert_eq!(classify_str("vp 1 2 3"), Command::ParamSpaceVertex);
    }

    #[test]
    fn recognizes_topology_kinds() {
        assert_eq!(classify_str("f 1 2 3"), Command::Face);
        assert_eq!(classify_str("l 1 2"), Command::Line);
        assert_eq!(classify_str("p 1"), Command::Point);
    }

    #[test]
    fn group_and_object_borrow_name() {
        assert_eq!(classify_str("g Cube"), Command::Group("Cube"));
        assert_eq!(classify_str("o MyObject"), Command::Object("MyObject"));
    }

    #[test]
    fn smoothing_operand_variants() {
        assert_eq!(classify_str("s off"), Command::Smoothing(0));
        assert_eq!(classify_str("s on"), Command::Smoothing(1));
        assert_eq!(classify_str("s 2"), Command::Smoothing(2));
        assert_eq!(classify_str("s foo"), Command::Smoothing(0));
    }

    #[test]
    fn usemtl_and_mtllib_borrow_name() {
        assert_eq!(classify_str("usemtl Red"), Command::UseMtl("Red"));
        assert_eq!(classify_str("mtllib cube.mtl"), Command::MtlLib("cube.mtl"));
    }

    #[test]
    fn mtllib_keeps_multiple_names_unsplit() {
        assert_eq!(
            classify_str("mtllib a.mtl b.mtl"),
            Command::MtlLib("a.mtl b.mtl")
        );
    }

    #[test]
    fn comment_and_blank_lines_are_empty() {
        assert_eq!(classify_str("# a comment"), Command::Empty);
        assert_eq!(classify_str(""), Command::Empty);
    }

    #[test]
    fn unknown_directive_is_empty() {
        assert_eq!(classify_str("xyz 1 2 3"), Command::Empty);
    }
}
