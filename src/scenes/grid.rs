use na::{Point3, Vector3};

use crate::config::GridConfig;
use crate::scene::{Coords, MaterialRef, Model, Primitive, Triangle};

pub const GRID_MODEL: &str = "BigGrid";

fn up() -> Coords {
    Coords::literal("0 1 0", Vector3::new(0.0, 1.0, 0.0))
}

/// A tessellated ground grid whose triangles are only produced when iterated.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleGrid {
    pub config: GridConfig,
    pub material: MaterialRef,
    /// Id used for the name of the first triangle.
    pub first_id: u64,
}

impl TriangleGrid {
    pub fn len(&self) -> u64 {
        self.config.triangle_count()
    }

    pub fn is_empty(&self) -> bool {
        self.config.resolution == 0
    }

    pub fn triangles(&self) -> GridTriangles {
        tessellate(&self.config, &self.material, self.first_id)
    }
}

/// Builds the `BigGrid` model, naming triangles from `T1`.
pub fn build_grid(config: &GridConfig, material: MaterialRef) -> Model {
    let mut model = Model::new(GRID_MODEL, config.translation());
    let grid = TriangleGrid {
        config: config.clone(),
        material,
        first_id: 1,
    };
    log::debug!("Grid of {} triangles", grid.len());
    if !grid.is_empty() {
        model.add(Primitive::Grid(grid));
    }
    model
}

/// Splits the `size_x` by `size_z` rectangle at height `plane_y` into
/// `resolution^2` cells of two triangles each.
///
/// Cells are visited with `i` (x) in the outer loop and `j` (z) in the inner
/// one. Each cell yields `(c00, c10, c11)` then `(c00, c11, c01)`. Names are
/// `T<id>` starting at `next_id`; once the iterator is drained,
/// [`GridTriangles::next_id`] is the id following the last triangle.
pub fn tessellate(config: &GridConfig, material: &MaterialRef, next_id: u64) -> GridTriangles {
    let n = config.resolution;
    let (dx, dz) = if n == 0 {
        (0.0, 0.0)
    } else {
        (config.size_x / f64::from(n), config.size_z / f64::from(n))
    };

    GridTriangles {
        material: material.clone(),
        n,
        dx,
        dz,
        x0: -config.size_x / 2.0,
        z0: -config.size_z / 2.0,
        y0: config.plane_y,
        i: 0,
        j: 0,
        upper: false,
        next_id,
    }
}

pub struct GridTriangles {
    material: MaterialRef,
    n: u32,
    dx: f64,
    dz: f64,
    x0: f64,
    z0: f64,
    y0: f64,
    i: u32,
    j: u32,
    // second triangle of the current cell
    upper: bool,
    next_id: u64,
}

impl GridTriangles {
    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}

impl Iterator for GridTriangles {
    type Item = Triangle;

    fn next(&mut self) -> Option<Triangle> {
        if self.i >= self.n {
            return None;
        }

        let xa = self.x0 + f64::from(self.i) * self.dx;
        let xb = self.x0 + f64::from(self.i + 1) * self.dx;
        let za = self.z0 + f64::from(self.j) * self.dz;
        let zb = self.z0 + f64::from(self.j + 1) * self.dz;

        let c00 = Point3::new(xa, self.y0, za);
        let c11 = Point3::new(xb, self.y0, zb);
        let vertices = if self.upper {
            [c00, c11, Point3::new(xa, self.y0, zb)]
        } else {
            [c00, Point3::new(xb, self.y0, za), c11]
        };

        if self.upper {
            self.upper = false;
            self.j += 1;
            if self.j == self.n {
                self.j = 0;
                self.i += 1;
            }
        } else {
            self.upper = true;
        }

        let tri = Triangle {
            name: format!("T{}", self.next_id),
            material: self.material.clone(),
            normal: up(),
            vertices,
        };
        self.next_id += 1;
        Some(tri)
    }
}
