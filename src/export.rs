use std::fmt;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use na::{Point3, Vector3};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::scene::{AreaLight, Coords, MaterialRegistry, Model, Primitive, SceneFile, Triangle};

/// Shortest round-trip decimal, always with a fractional part or exponent.
///
/// Exponents below -4 or from 16 up switch to scientific notation with a
/// signed two-digit exponent (`1e-05`, `1e+16`).
pub struct Real(pub f64);

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_nan() {
            return f.write_str("nan");
        }
        if value.is_infinite() {
            return f.write_str(if value > 0.0 { "inf" } else { "-inf" });
        }
        if value == 0.0 {
            return f.write_str(if value.is_sign_negative() { "-0.0" } else { "0.0" });
        }

        let sci = format!("{:e}", value);
        let exponent = sci
            .split_once('e')
            .and_then(|(mantissa, exp)| exp.parse::<i32>().ok().map(|exp| (mantissa, exp)));

        match exponent {
            Some((mantissa, exp)) if !(-4..16).contains(&exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                write!(f, "{}e{}{:02}", mantissa, sign, exp.abs())
            }
            _ => {
                let plain = value.to_string();
                if plain.contains('.') {
                    f.write_str(&plain)
                } else {
                    write!(f, "{}.0", plain)
                }
            }
        }
    }
}

struct Triple(f64, f64, f64);

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", Real(self.0), Real(self.1), Real(self.2))
    }
}

fn vector(v: &Vector3<f64>) -> Triple {
    Triple(v.x, v.y, v.z)
}

fn point(p: &Point3<f64>) -> Triple {
    Triple(p.x, p.y, p.z)
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.literal {
            Some(text) => f.write_str(text),
            None => vector(&self.value).fmt(f),
        }
    }
}

/// Serializes a [`SceneFile`] as `.scn` text.
pub struct ScnWriter<W: Write> {
    out: W,
}

impl<W: Write> ScnWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_scene(&mut self, scene: &SceneFile) -> io::Result<()> {
        self.write_materials(&scene.materials)?;
        for model in &scene.models {
            writeln!(self.out)?;
            self.write_model(model)?;
        }
        if !scene.lights.is_empty() {
            writeln!(self.out)?;
            self.write_lights(&scene.lights)?;
        }
        Ok(())
    }

    pub fn write_materials(&mut self, materials: &MaterialRegistry) -> io::Result<()> {
        writeln!(self.out, "Begin Material")?;
        writeln!(self.out)?;
        for material in materials.iter() {
            writeln!(self.out, "Material {}", material.name)?;
            writeln!(self.out, "Prop diffuseColor RGB {}", vector(&material.diffuse))?;
            writeln!(self.out)?;
        }
        writeln!(self.out, "End")
    }

    /// Plane records are separated by a blank line, triangles are packed.
    /// Grid triangles are generated as they are written.
    pub fn write_model(&mut self, model: &Model) -> io::Result<()> {
        writeln!(self.out, "Begin Model")?;
        writeln!(self.out, "Model {}", model.name)?;
        writeln!(self.out, "Translation {}", vector(&model.translation))?;
        for (idx, primitive) in model.primitives.iter().enumerate() {
            match primitive {
                Primitive::Plane(plane) => {
                    if idx > 0 {
                        writeln!(self.out)?;
                    }
                    writeln!(self.out, "Plane {} {}", plane.name, plane.material.name())?;
                    writeln!(self.out, "N {}", plane.normal)?;
                    writeln!(self.out, "P {}", plane.point)?;
                    writeln!(self.out, "U {}", plane.u)?;
                    writeln!(self.out, "V {}", plane.v)?;
                }
                Primitive::Triangle(tri) => self.write_triangle(tri)?,
                Primitive::Grid(grid) => {
                    for tri in grid.triangles() {
                        self.write_triangle(&tri)?;
                    }
                }
            }
        }
        writeln!(self.out, "End")
    }

    fn write_triangle(&mut self, tri: &Triangle) -> io::Result<()> {
        writeln!(self.out, "Triangle {} {}", tri.name, tri.material.name())?;
        writeln!(self.out, "N {}", tri.normal)?;
        writeln!(self.out, "V1 {}", point(&tri.vertices[0]))?;
        writeln!(self.out, "V2 {}", point(&tri.vertices[1]))?;
        writeln!(self.out, "V3 {}", point(&tri.vertices[2]))
    }

    pub fn write_lights(&mut self, lights: &[AreaLight]) -> io::Result<()> {
        writeln!(self.out, "Begin Light")?;
        for (idx, light) in lights.iter().enumerate() {
            if idx > 0 {
                writeln!(self.out)?;
            }
            writeln!(self.out, "Area {}", light.name)?;
            writeln!(self.out, "IRV {}", light.irradiance)?;
            writeln!(self.out, "P {}", light.point)?;
            writeln!(self.out, "U {}", light.u)?;
            writeln!(self.out, "V {}", light.v)?;
        }
        writeln!(self.out, "End")
    }
}

/// Writes `scene` to `path`, replacing it only once the whole file is on disk.
pub fn write_scene_file(scene: &SceneFile, path: &Path) -> Result<()> {
    write_atomically(path, |out| ScnWriter::new(out).write_scene(scene))
}

/// Runs `write` against a temporary file next to `path` and renames it over
/// `path` only if `write` and the final flush succeed.
///
/// On any failure the temporary file is removed and an existing `path` is
/// left untouched.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<NamedTempFile>) -> io::Result<()>,
{
    let fail = |source: io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let staged = tempfile::Builder::new()
        .prefix(".scngen-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(fail)?;
    log::debug!("Staging output in {}", staged.path().display());

    let mut out = BufWriter::new(staged);
    write(&mut out).map_err(fail)?;
    let staged = out.into_inner().map_err(|e| fail(e.into_error()))?;
    staged.as_file().sync_all().map_err(fail)?;

    // temp files are created owner-only
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(Permissions::from_mode(0o644))
            .map_err(fail)?;
    }

    staged.persist(path).map_err(|e| fail(e.error))?;
    Ok(())
}
