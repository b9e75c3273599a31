//! Material definitions (`Material`) and the MTL line-oriented parser.
//!
//! Grounded on `tinyobj_material_t` and the `TINYOBJ_LOADER_C_IMPLEMENTATION`
//! directive dispatch in the reference header. Texture-map directives
//! (`map_Ka`, `map_Kd`, ..., `bump`, `disp`) there duplicate the *entire*
//! rest of the line verbatim into the texture-name field with no suboption
//! grammar — confirmed by reading the `strdup`-of-rest-of-line calls in the
//! original source — so unlike the teacher's `ColorCorrectedMap` /
//! `NonColorCorrectedMap` / `OptionElement` machinery (which parses bump-map
//! suboptions like `-bm`), this parser stores the raw remainder unparsed.

use log::warn;

use crate::lexical::{name_length, skip_space};
use crate::material_table::MaterialTable;
use crate::numeric::{parse_int, try_parse_float};

/// RGB-ish triple used for ambient/diffuse/specular/transmittance/emission.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// A single `newmtl` block's worth of fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: Rgb,
    pub diffuse: Rgb,
    pub specular: Rgb,
    pub transmittance: Rgb,
    pub emission: Rgb,
    pub shininess: f32,
    pub ior: f32,
    pub dissolve: f32,
    pub illum: i32,
    pub ambient_texname: Option<String>,
    pub diffuse_texname: Option<String>,
    pub specular_texname: Option<String>,
    pub specular_highlight_texname: Option<String>,
    pub bump_texname: Option<String>,
    pub displacement_texname: Option<String>,
    pub alpha_texname: Option<String>,
}

impl Material {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            illum: 0,
            dissolve: 1.0,
            shininess: 1.0,
            ior: 1.0,
            ..Default::default()
        }
    }
}

fn rest_of_line(buf: &[u8], pos: usize, end: usize) -> String {
    let start = skip_space(buf, pos, end);
    let len = name_length(buf, start, end);
    String::from_utf8_lossy(&buf[start..start + len]).into_owned()
}

fn parse_rgb(buf: &[u8], pos: usize, end: usize) -> Rgb {
    let (r, _, next) = try_parse_float(buf, pos, end);
    let (g, g_ok, next2) = try_parse_float(buf, next, end);
    let (b, b_ok, _) = try_parse_float(buf, next2, end);
    Rgb {
        r,
        g: if g_ok { g } else { 0.0 },
        b: if b_ok { b } else { 0.0 },
    }
}

/// Parses an MTL buffer into a list of materials, populating `table` with
/// each material's name mapped to its index. Returns the materials in
/// source order. Unknown directives are logged and skipped, matching the
/// reference's tolerant behavior.
pub fn parse_mtl(buf: &[u8], table: &mut MaterialTable) -> Vec<Material> {
    let end = buf.len();
    let mut materials = Vec::new();
    let mut pos = 0;

    while pos < end {
        let line_start = skip_space(buf, pos, end);
        let line_len = crate::lexical::line_length(buf, line_start, end);
        let line_end = line_start + line_len;

        if line_start < line_end && buf[line_start] != b'#' {
            dispatch_line(buf, line_start, line_end, &mut materials);
        }

        pos = crate::lexical::skip_line_terminator(buf, line_end, end);
        if pos == line_end && pos < end {
            // No terminator found but more input remains (shouldn't happen
            // given `line_length` bounds by `end`); avoid an infinite loop.
            pos = end;
        }
    }

    for (idx, m) in materials.iter().enumerate() {
        table.set(&m.name, idx as i64);
    }

    materials
}

fn dispatch_line(buf: &[u8], pos: usize, end: usize, materials: &mut Vec<Material>) {
    let tok_len = crate::lexical::until_space(buf, pos, end);
    let keyword = &buf[pos..pos + tok_len];
    let rest = skip_space(buf, pos + tok_len, end);

    match keyword {
        b"newmtl" => {
            let name = rest_of_line(buf, rest, end);
            materials.push(Material::new(&name));
        }
        b"Ka" => set_current(materials, |m| m.ambient = parse_rgb(buf, rest, end)),
        b"Kd" => set_current(materials, |m| m.diffuse = parse_rgb(buf, rest, end)),
        b"Ks" => set_current(materials, |m| m.specular = parse_rgb(buf, rest, end)),
        b"Kt" | b"Tf" => set_current(materials, |m| m.transmittance = parse_rgb(buf, rest, end)),
        b"Ke" => set_current(materials, |m| m.emission = parse_rgb(buf, rest, end)),
        b"Ns" => set_current(materials, |m| {
            m.shininess = try_parse_float(buf, rest, end).0
        }),
        b"Ni" => set_current(materials, |m| m.ior = try_parse_float(buf, rest, end).0),
        b"d" => set_current(materials, |m| {
            let (value, ok, _) = try_parse_float(buf, rest, end);
            if ok && (0.0..=1.0).contains(&value) {
                m.dissolve = value;
            } else {
                warn!("malformed `d` dissolve value, keeping previous value");
            }
        }),
        b"Tr" => set_current(materials, |m| {
            let (value, ok, _) = try_parse_float(buf, rest, end);
            if ok && (0.0..=1.0).contains(&value) {
                m.dissolve = 1.0 - value;
            } else {
                warn!("malformed `Tr` transparency value, keeping previous value");
            }
        }),
        b"illum" => set_current(materials, |m| m.illum = parse_int(buf, rest, end).0),
        b"map_Ka" => set_current(materials, |m| m.ambient_texname = Some(rest_of_line(buf, rest, end))),
        b"map_Kd" => set_current(materials, |m| m.diffuse_texname = Some(rest_of_line(buf, rest, end))),
        b"map_Ks" => set_current(materials, |m| m.specular_texname = Some(rest_of_line(buf, rest, end))),
        b"map_Ns" => set_current(materials, |m| {
            m.specular_highlight_texname = Some(rest_of_line(buf, rest, end))
        }),
        b"map_d" => set_current(materials, |m| m.alpha_texname = Some(rest_of_line(buf, rest, end))),
        b"bump" | b"map_bump" | b"map_Bump" => {
            set_current(materials, |m| m.bump_texname = Some(rest_of_line(buf, rest, end)))
        }
        b"disp" => set_current(materials, |m| {
            m.displacement_texname = Some(rest_of_line(buf, rest, end))
        }),
        other => {
            warn!(
                "unknown MTL directive `{}`, skipping",
                String::from_utf8_lossy(other)
            );
        }
    }
}

fn set_current(materials: &mut [Material], f: impl FnOnce(&mut Material)) {
    if let Some(m) = materials.last_mut() {
        f(m);
    } else {
        warn!("directive seen before any `newmtl`, ignoring");
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_single_material() {
        let mtl = b"newmtl CubeMaterial\nKa 0.1 0.1 0.1\nKd 0.8 0.2 0.2\nNs 96.0\nillum 2\n";
        let mut table = MaterialTable::new();
        let materials = parse_mtl(mtl, &mut table);
        assert_eq!(materials.len(), 1);
        let m = &materials[0];
        assert_eq!(m.name, "CubeMaterial");
        assert_eq!(m.ambient, Rgb { r: 0.1, g: 0.1, b: 0.1 });
        assert_eq!(m.diffuse, Rgb { r: 0.8, g: 0.2, b: 0.2 });
        assert!((m.shininess - 96.0).abs() < 1e-4);
        assert_eq!(m.illum, 2);
        assert_eq!(table.get("CubeMaterial"), Some(0));
    }

    #[test]
    fn single_value_color_leaves_other_channels_at_zero() {
        let mtl = b"newmtl M\nKd 0.5\n";
        let mut table = MaterialTable::new();
        let materials = parse_mtl(mtl, &mut table);
        assert_eq!(materials[0].diffuse, Rgb { r: 0.5, g: 0.0, b: 0.0 });
    }

    #[test]
    fn defaults_match_reference() {
        let mtl = b"newmtl Plain\n";
        let mut table = MaterialTable::new();
        let materials = parse_mtl(mtl, &mut table);
        let m = &materials[0];
        assert_eq!(m.illum, 0);
        assert_eq!(m.dissolve, 1.0);
        assert_eq!(m.shininess, 1.0);
        assert_eq!(m.ior, 1.0);
    }

    #[test]
    fn tr_is_inverse_of_dissolve() {
        let mtl = b"newmtl Glass\nTr 0.25\n";
        let mut table = MaterialTable::new();
        let materials = parse_mtl(mtl, &mut table);
        assert!((materials[0].dissolve - 0.75).abs() < 1e-6);
    }

    #[test]
    fn map_directive_captures_whole_rest_of_line() {
        let mtl = b"newmtl Textured\nmap_Kd textures/diffuse color.png\n";
        let mut table = MaterialTable::new();
        let materials = parse_mtl(mtl, &mut table);
        assert_eq!(
            materials[0].diffuse_texname.as_deref(),
            Some("textures/diffuse color.png")
        );
    }

    #[test]
    fn unknown_directive_is_skipped_without_side_effect() {
        let mtl = b"newmtl M\nKd 1 1 1\nFoo bar baz\nNs 10\n";
        let mut table = MaterialTable::new();
        let materials = parse_mtl(mtl, &mut table);
        assert_eq!(materials.len(), 1);
        assert!((materials[0].shininess - 10.0).abs() < 1e-4);
    }

    #[test]
    fn multiple_materials_are_tracked_independently() {
        let mtl = b"newmtl A\nKd 1 0 0\nnewmtl B\nKd 0 1 0\n";
        let mut table = MaterialTable::new();
        let materials = parse_mtl(mtl, &mut table);
        assert_eq!(materials.len(), 2);
        assert_eq!(table.get("A"), Some(0));
        assert_eq!(table.get("B"), Some(1));
    }

    #[test]
    fn crlf_terminated_texname_has_no_trailing_cr() {
        let mtl = b"newmtl M\r\nmap_Kd tex.png\r\n";
        let mut table = MaterialTable::new();
        let materials = parse_mtl(mtl, &mut table);
        assert_eq!(materials[0].diffuse_texname.as_deref(), Some("tex.png"));
    }
}
