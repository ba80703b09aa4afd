use std::collections::BTreeSet;
use std::sync::Arc;

use na::{Point3, Vector3};

use crate::error::{Error, Result};
use crate::scenes::grid::TriangleGrid;

pub type Color = Vector3<f64>;

/// Three components, plus the exact text they are written as when the values
/// were authored by hand rather than computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    pub value: Vector3<f64>,
    pub literal: Option<&'static str>,
}

impl Coords {
    /// `text` must spell the same three numbers as `value`.
    pub fn literal(text: &'static str, value: Vector3<f64>) -> Self {
        Self {
            value,
            literal: Some(text),
        }
    }
}

impl From<Vector3<f64>> for Coords {
    fn from(value: Vector3<f64>) -> Self {
        Self {
            value,
            literal: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse: Color,
}

/// Handle to a material registered in a [`MaterialRegistry`].
///
/// Geometry can only name a material through one of these, so every record
/// written to the scene file refers to a material defined in its Material
/// block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MaterialRef(Arc<str>);

impl MaterialRef {
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Insertion-ordered set of named materials.
#[derive(Debug, Default, Clone)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        MaterialRegistry {
            materials: Vec::new(),
        }
    }

    /// Registers `name`, replacing the color of an existing entry in place.
    pub fn create_material(&mut self, name: &str, diffuse: Color) {
        match self.materials.iter_mut().find(|m| m.name == name) {
            Some(existing) => existing.diffuse = diffuse,
            None => self.materials.push(Material {
                name: name.to_string(),
                diffuse,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Result<MaterialRef> {
        match self.materials.iter().find(|m| m.name == name) {
            Some(material) => Ok(MaterialRef(Arc::from(material.name.as_str()))),
            None => {
                log::error!("Material not found: {}", name);
                Err(Error::UnknownMaterial(name.to_string()))
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.materials.iter().any(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub name: String,
    pub material: MaterialRef,
    pub normal: Coords,
    pub point: Coords,
    pub u: Coords,
    pub v: Coords,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub name: String,
    pub material: MaterialRef,
    pub normal: Coords,
    pub vertices: [Point3<f64>; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Plane(Plane),
    Triangle(Triangle),
    /// Triangles generated on demand while the model is written.
    Grid(TriangleGrid),
}

impl Primitive {
    pub fn material(&self) -> &MaterialRef {
        match self {
            Primitive::Plane(plane) => &plane.material,
            Primitive::Triangle(tri) => &tri.material,
            Primitive::Grid(grid) => &grid.material,
        }
    }

    pub fn triangle_count(&self) -> u64 {
        match self {
            Primitive::Plane(_) => 0,
            Primitive::Triangle(_) => 1,
            Primitive::Grid(grid) => grid.len(),
        }
    }
}

/// Named group of primitives sharing one translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub translation: Vector3<f64>,
    pub primitives: Vec<Primitive>,
}

impl Model {
    pub fn new(name: &str, translation: Vector3<f64>) -> Self {
        Self {
            name: name.to_string(),
            translation,
            primitives: Vec::new(),
        }
    }

    pub fn add(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn triangle_count(&self) -> u64 {
        self.primitives
            .iter()
            .fold(0, |acc: u64, p| acc.saturating_add(p.triangle_count()))
    }
}

/// Rectangular emitter spanned by `u` and `v` from `point`.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaLight {
    pub name: String,
    pub irradiance: Coords,
    pub point: Coords,
    pub u: Coords,
    pub v: Coords,
}

/// Everything that ends up in one `.scn` file, in output order.
#[derive(Debug, Clone)]
pub struct SceneFile {
    pub materials: MaterialRegistry,
    pub models: Vec<Model>,
    pub lights: Vec<AreaLight>,
}

impl SceneFile {
    pub fn triangle_count(&self) -> u64 {
        self.models
            .iter()
            .fold(0, |acc: u64, m| acc.saturating_add(m.triangle_count()))
    }

    pub fn referenced_materials(&self) -> BTreeSet<MaterialRef> {
        self.models
            .iter()
            .flat_map(|m| m.primitives.iter())
            .map(|p| p.material().clone())
            .collect()
    }

    /// Fails if any primitive names a material missing from the Material block.
    pub fn check_materials(&self) -> Result<()> {
        match self
            .referenced_materials()
            .into_iter()
            .find(|m| !self.materials.contains(m.name()))
        {
            Some(missing) => Err(Error::UnknownMaterial(missing.name().to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_keeps_insertion_order() {
        let mut materials = MaterialRegistry::new();
        materials.create_material("White", Color::new(1.0, 1.0, 1.0));
        materials.create_material("Red", Color::new(1.0, 0.0, 0.0));
        materials.create_material("Green", Color::new(0.0, 1.0, 0.0));

        let names: Vec<&str> = materials.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["White", "Red", "Green"]);
    }

    #[test]
    fn redefining_a_material_replaces_its_color() {
        let mut materials = MaterialRegistry::new();
        materials.create_material("White", Color::new(1.0, 1.0, 1.0));
        materials.create_material("White", Color::new(0.5, 0.5, 0.5));

        assert_eq!(materials.len(), 1);
        assert_eq!(materials.iter().next().unwrap().diffuse, Color::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn unknown_material_is_an_error() {
        let materials = MaterialRegistry::new();
        assert_eq!(materials.len(), 0);
        match materials.get("Blue") {
            Err(Error::UnknownMaterial(name)) => assert_eq!(name, "Blue"),
            other => panic!("expected UnknownMaterial, got {:?}", other),
        }
    }

    fn mixed_model(floor: MaterialRef, tri: MaterialRef) -> Model {
        let mut model = Model::new("Mixed", Vector3::zeros());
        model.add(Primitive::Plane(Plane {
            name: "Floor".to_string(),
            material: floor,
            normal: Coords::from(Vector3::<f64>::y()),
            point: Coords::from(Vector3::<f64>::zeros()),
            u: Coords::from(Vector3::<f64>::x()),
            v: Coords::from(Vector3::<f64>::z()),
        }));
        model.add(Primitive::Triangle(Triangle {
            name: "T1".to_string(),
            material: tri,
            normal: Coords::literal("0 1 0", Vector3::y()),
            vertices: [Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 0.0, 1.0)],
        }));
        model
    }

    #[test]
    fn triangle_count_skips_planes() {
        let mut materials = MaterialRegistry::new();
        materials.create_material("White", Color::new(1.0, 1.0, 1.0));
        let white = materials.get("White").unwrap();
        let model = mixed_model(white.clone(), white);

        assert_eq!(model.primitives.len(), 2);
        assert_eq!(model.triangle_count(), 1);

        let scene = SceneFile {
            materials,
            models: vec![model.clone(), model],
            lights: Vec::new(),
        };
        assert_eq!(scene.triangle_count(), 2);
    }

    #[test]
    fn referenced_materials_are_deduplicated() {
        let mut materials = MaterialRegistry::new();
        materials.create_material("White", Color::new(1.0, 1.0, 1.0));
        materials.create_material("Red", Color::new(1.0, 0.0, 0.0));
        let white = materials.get("White").unwrap();
        let red = materials.get("Red").unwrap();

        let scene = SceneFile {
            materials,
            models: vec![
                mixed_model(red.clone(), white.clone()),
                mixed_model(white.clone(), white.clone()),
            ],
            lights: Vec::new(),
        };
        let referenced: Vec<MaterialRef> = scene.referenced_materials().into_iter().collect();
        assert_eq!(referenced, vec![red, white]);
        assert!(scene.check_materials().is_ok());
    }

    #[test]
    fn dangling_material_reference_is_caught() {
        let mut full = MaterialRegistry::new();
        full.create_material("White", Color::new(1.0, 1.0, 1.0));
        full.create_material("Red", Color::new(1.0, 0.0, 0.0));
        let white = full.get("White").unwrap();
        let red = full.get("Red").unwrap();

        let mut partial = MaterialRegistry::new();
        partial.create_material("White", Color::new(1.0, 1.0, 1.0));

        let scene = SceneFile {
            materials: partial,
            models: vec![mixed_model(red, white)],
            lights: Vec::new(),
        };
        match scene.check_materials() {
            Err(Error::UnknownMaterial(name)) => assert_eq!(name, "Red"),
            other => panic!("expected UnknownMaterial, got {:?}", other),
        }
    }
}
