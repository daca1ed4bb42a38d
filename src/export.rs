//! Text outputs: SVG frames, Wavefront OBJ meshes and quantised snapshots.
//!
//! Snapshots follow one rule: every float is rounded to a 1e-6 grid and
//! printed with six decimals, `-0` is printed as `0`, and the text always
//! ends with a newline. Two runs that agree to 1e-6 produce identical bytes.

use std::fmt::Write as _;
use std::io::{self, Write};

use thiserror::Error;

use crate::anim::{Frame, RenderOptions};
use crate::geom::{ControlPolygon, Mesh3D, Point2, Point3, ProfileDiagnostics, RevolveDiagnostics};

pub const SNAPSHOT_QUANTIZE: f64 = 1e-6;
pub const SNAPSHOT_DECIMALS: usize = 6;
const SNAPSHOT_HEADER: &str = "# revolve-engine snapshot v1";

/// Decimals used for SVG coordinates.
const SVG_DECIMALS: usize = 3;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("mesh point {index} is not finite")]
    NonFinitePoint { index: usize },
}

// ─────────────────────────────────────────────────────────────────────────────
// Snapshot helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Round to the snapshot grid, folding `-0.0` into `0.0`.
#[must_use]
pub fn quantize_f64(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
    if q == 0.0 { 0.0 } else { q }
}

/// CRLF → LF and exactly one trailing newline.
#[must_use]
pub fn normalize_snapshot_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    if normalized.ends_with('\n') {
        normalized
    } else {
        format!("{normalized}\n")
    }
}

fn write_f64(out: &mut String, value: f64) {
    let value = quantize_f64(value);
    let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
}

fn write_point2_line(out: &mut String, prefix: &str, p: Point2) {
    let _ = write!(out, "{prefix} ");
    write_f64(out, p.x);
    out.push(' ');
    write_f64(out, p.y);
    out.push('\n');
}

fn write_point3_line(out: &mut String, prefix: &str, p: Point3) {
    let _ = write!(out, "{prefix} ");
    write_f64(out, p.x);
    out.push(' ');
    write_f64(out, p.y);
    out.push(' ');
    write_f64(out, p.z);
    out.push('\n');
}

fn snapshot(op: &str, sections: impl FnOnce(&mut String)) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{SNAPSHOT_HEADER}");
    let _ = writeln!(out, "op {op}");
    let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
    sections(&mut out);
    normalize_snapshot_text(&out)
}

#[must_use]
pub fn profile_snapshot(polygon: &ControlPolygon, diagnostics: &ProfileDiagnostics) -> String {
    snapshot("profile", |out| {
        let _ = writeln!(out, "diagnostics {}", diagnostics.summary());
        let _ = writeln!(out, "profile.points {}", polygon.points().len());
        for p in polygon.points() {
            write_point2_line(out, "p", *p);
        }
    })
}

#[must_use]
pub fn mesh_snapshot(mesh: &Mesh3D, diagnostics: &RevolveDiagnostics) -> String {
    snapshot("revolve", |out| {
        let _ = writeln!(out, "diagnostics {}", diagnostics.summary());
        let _ = writeln!(out, "mesh.slices {}", mesh.slices());
        let _ = writeln!(out, "mesh.stations {}", mesh.station_count());
        write_point3_line(out, "mesh.centroid", mesh.centroid());
        let _ = writeln!(out, "mesh.points {}", mesh.points().len());
        for p in mesh.points() {
            write_point3_line(out, "p", *p);
        }
    })
}

#[must_use]
pub fn frame_snapshot(frame: &Frame) -> String {
    snapshot("frame", |out| {
        let _ = writeln!(out, "frame.index {}", frame.index);
        let _ = writeln!(out, "frame.phase {}", frame.phase);
        let _ = write!(out, "frame.progress ");
        write_f64(out, frame.progress);
        out.push('\n');
        let camera = &frame.camera;
        write_point3_line(
            out,
            "camera.angles",
            Point3::new(camera.angle_x, camera.angle_y, camera.angle_z),
        );
        let _ = write!(out, "camera.perspective ");
        write_f64(out, camera.perspective_distance);
        out.push('\n');
        let _ = writeln!(
            out,
            "frame.color {} {}",
            frame.color.rgb().to_hex(),
            frame.color.a
        );
        let _ = writeln!(out, "frame.points {}", frame.points.len());
        for p in &frame.points {
            write_point2_line(out, "p", *p);
        }
        let _ = writeln!(out, "frame.curves {}", frame.curves.len());
        for group in &frame.curves {
            for (i, p) in group.iter().enumerate() {
                write_point2_line(out, if i == 0 { "c" } else { " " }, *p);
            }
        }
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// SVG
// ─────────────────────────────────────────────────────────────────────────────

fn svg_coord(out: &mut String, p: Point2) {
    let x = quantize_f64(p.x);
    let y = quantize_f64(p.y);
    let _ = write!(out, "{x:.SVG_DECIMALS$} {y:.SVG_DECIMALS$}");
}

/// One SVG document per frame: a background rect and one cubic path per group.
#[must_use]
pub fn frame_to_svg(frame: &Frame, options: &RenderOptions) -> String {
    let size = options.size;
    let background = options.background_rgb();
    let color = frame.color;

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    );
    let _ = writeln!(
        out,
        r#"  <rect width="100%" height="100%" fill="{background}"/>"#
    );
    let _ = writeln!(
        out,
        r#"  <g fill="none" stroke="{}" stroke-opacity="{:.3}" stroke-width="{}" stroke-linecap="round">"#,
        color.rgb(),
        color.alpha_fraction(),
        frame.line_width
    );
    for group in &frame.curves {
        out.push_str("    <path d=\"M ");
        svg_coord(&mut out, group[0]);
        out.push_str(" C ");
        svg_coord(&mut out, group[1]);
        out.push_str(", ");
        svg_coord(&mut out, group[2]);
        out.push_str(", ");
        svg_coord(&mut out, group[3]);
        out.push_str("\"/>\n");
    }
    out.push_str("  </g>\n</svg>\n");
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// OBJ
// ─────────────────────────────────────────────────────────────────────────────

/// Quad faces (1-based OBJ indices) joining neighbouring stations and slices.
/// Slices wrap around, so every station pair contributes `slices` faces.
#[must_use]
pub fn mesh_quads(mesh: &Mesh3D) -> Vec<[usize; 4]> {
    let slices = mesh.slices();
    let index = |station: usize, slice: usize| station * slices + slice % slices + 1;
    let mut faces = Vec::with_capacity((mesh.station_count() - 1) * slices);
    for station in 0..mesh.station_count() - 1 {
        for slice in 0..slices {
            faces.push([
                index(station, slice),
                index(station, slice + 1),
                index(station + 1, slice + 1),
                index(station + 1, slice),
            ]);
        }
    }
    faces
}

/// Write `mesh` as a Wavefront OBJ object named `name`.
pub fn write_obj<W: Write>(out: &mut W, mesh: &Mesh3D, name: &str) -> Result<(), ExportError> {
    if let Some(index) = mesh.points().iter().position(|p| !p.is_finite()) {
        return Err(ExportError::NonFinitePoint { index });
    }

    writeln!(out, "# revolve-engine mesh")?;
    writeln!(out, "o {name}")?;
    for p in mesh.points() {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for [a, b, c, d] in mesh_quads(mesh) {
        writeln!(out, "f {a} {b} {c} {d}")?;
    }
    out.flush()?;
    Ok(())
}

/// OBJ text for `mesh`.
pub fn mesh_to_obj(mesh: &Mesh3D, name: &str) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_obj(&mut buffer, mesh, name)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
