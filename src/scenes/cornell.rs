use na::Vector3;

use super::grid;
use crate::config::GridConfig;
use crate::error::Result;
use crate::scene::{AreaLight, Color, Coords, MaterialRegistry, Model, Plane, Primitive, SceneFile};

pub const WALL_MODEL: &str = "Wall";

pub fn build_materials() -> MaterialRegistry {
    let mut materials = MaterialRegistry::new();

    materials.create_material("White", Color::new(0.725, 0.71, 0.68));
    materials.create_material("Red", Color::new(0.63, 0.065, 0.05));
    materials.create_material("Green", Color::new(0.14, 0.45, 0.091));

    materials
}

fn wall(
    materials: &MaterialRegistry,
    name: &str,
    material: &str,
    [normal, point, u, v]: [Coords; 4],
) -> Result<Primitive> {
    Ok(Primitive::Plane(Plane {
        name: name.to_string(),
        material: materials.get(material)?,
        normal,
        point,
        u,
        v,
    }))
}

/// The open-fronted 556 unit box. Does not depend on the grid.
///
/// Coordinates keep the exact spelling of the reference scene files.
pub fn build_walls(materials: &MaterialRegistry) -> Result<Model> {
    let mut walls = Model::new(WALL_MODEL, Vector3::new(0.0, 0.0, 1028.0));

    let left = wall(
        materials,
        "LeftWall",
        "Red",
        [
            Coords::literal("-1.0 0.0 0.0", Vector3::new(-1.0, 0.0, 0.0)),
            Coords::literal("278.0 278.0 278.0", Vector3::new(278.0, 278.0, 278.0)),
            Coords::literal("0 -556.0 0", Vector3::new(0.0, -556.0, 0.0)),
            Coords::literal("0 0 -556.0", Vector3::new(0.0, 0.0, -556.0)),
        ],
    )?;

    let right = wall(
        materials,
        "RightWall",
        "Green",
        [
            Coords::literal("1.0 0.0 0.0", Vector3::new(1.0, 0.0, 0.0)),
            Coords::literal("-278.0 278.0 278", Vector3::new(-278.0, 278.0, 278.0)),
            Coords::literal("0 -556 0", Vector3::new(0.0, -556.0, 0.0)),
            Coords::literal("0 0 -556.0", Vector3::new(0.0, 0.0, -556.0)),
        ],
    )?;

    let top = wall(
        materials,
        "TopWall",
        "White",
        [
            Coords::literal("0.0 -1.0 0.0", Vector3::new(0.0, -1.0, 0.0)),
            Coords::literal("278.0 278.0 278", Vector3::new(278.0, 278.0, 278.0)),
            Coords::literal("-556 0 0", Vector3::new(-556.0, 0.0, 0.0)),
            Coords::literal("0 0 -556", Vector3::new(0.0, 0.0, -556.0)),
        ],
    )?;

    let bottom = wall(
        materials,
        "BottomWall",
        "White",
        [
            Coords::literal("0.0 1.0 0.0", Vector3::new(0.0, 1.0, 0.0)),
            Coords::literal("278.0 -278.0 278", Vector3::new(278.0, -278.0, 278.0)),
            Coords::literal("-556 0 0", Vector3::new(-556.0, 0.0, 0.0)),
            Coords::literal("0 0 -556", Vector3::new(0.0, 0.0, -556.0)),
        ],
    )?;

    let back = wall(
        materials,
        "BackWall",
        "White",
        [
            Coords::literal("0.0 0.0 -1.0", Vector3::new(0.0, 0.0, -1.0)),
            Coords::literal("278.0 278.0 278", Vector3::new(278.0, 278.0, 278.0)),
            Coords::literal("-556 0 0", Vector3::new(-556.0, 0.0, 0.0)),
            Coords::literal("0 -556 0", Vector3::new(0.0, -556.0, 0.0)),
        ],
    )?;

    walls.add(left);
    walls.add(right);
    walls.add(top);
    walls.add(bottom);
    walls.add(back);

    Ok(walls)
}

pub fn build_light() -> AreaLight {
    AreaLight {
        name: "TopLight".to_string(),
        irradiance: Coords::literal(
            "47.8384 38.5664 31.0808",
            Vector3::new(47.8384, 38.5664, 31.0808),
        ),
        point: Coords::literal("60 275 1088", Vector3::new(60.0, 275.0, 1088.0)),
        u: Coords::literal("-120 0 0", Vector3::new(-120.0, 0.0, 0.0)),
        v: Coords::literal("0 0 -120", Vector3::new(0.0, 0.0, -120.0)),
    }
}

/// Materials, walls, grid and light in file order.
pub fn build_scene(config: &GridConfig) -> Result<SceneFile> {
    let materials = build_materials();
    let walls = build_walls(&materials)?;
    let grid = grid::build_grid(config, materials.get("White")?);

    let scene = SceneFile {
        materials,
        models: vec![walls, grid],
        lights: vec![build_light()],
    };
    scene.check_materials()?;
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal_matches_value(coords: &Coords) -> bool {
        let Some(text) = coords.literal else {
            return true;
        };
        let parsed: Vec<f64> = text
            .split_whitespace()
            .map(|t| t.parse().unwrap())
            .collect();
        parsed == [coords.value.x, coords.value.y, coords.value.z]
    }

    #[test]
    fn three_materials_in_order() {
        let materials = build_materials();
        let names: Vec<&str> = materials.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["White", "Red", "Green"]);
    }

    #[test]
    fn walls_are_bound_to_expected_materials() {
        let walls = build_walls(&build_materials()).unwrap();
        let bound: Vec<(&str, &str)> = walls
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Plane(plane) => Some((plane.name.as_str(), plane.material.name())),
                _ => None,
            })
            .collect();
        assert_eq!(
            bound,
            [
                ("LeftWall", "Red"),
                ("RightWall", "Green"),
                ("TopWall", "White"),
                ("BottomWall", "White"),
                ("BackWall", "White"),
            ]
        );
        assert_eq!(walls.translation, Vector3::new(0.0, 0.0, 1028.0));
    }

    #[test]
    fn walls_ignore_grid_parameters() {
        let small = GridConfig {
            resolution: 1,
            size_x: 2.0,
            size_z: 2.0,
            plane_y: 0.0,
            translation: [5.0, 5.0, 5.0],
        };
        let a = build_scene(&small).unwrap();
        let b = build_scene(&GridConfig::default()).unwrap();
        assert_eq!(a.models[0], b.models[0]);
        assert_eq!(a.lights, b.lights);
    }

    #[test]
    fn every_referenced_material_is_defined() {
        let scene = build_scene(&GridConfig {
            resolution: 3,
            ..GridConfig::default()
        })
        .unwrap();
        let referenced = scene.referenced_materials();
        assert_eq!(referenced.len(), 3);
        for material in referenced {
            assert!(
                scene.materials.iter().any(|m| m.name == material.name()),
                "{} is not defined",
                material.name()
            );
        }
    }

    #[test]
    fn scene_has_walls_then_grid() {
        let config = GridConfig {
            resolution: 4,
            ..GridConfig::default()
        };
        let scene = build_scene(&config).unwrap();

        let names: Vec<&str> = scene.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, [WALL_MODEL, grid::GRID_MODEL]);
        assert_eq!(scene.triangle_count(), 32);
        assert_eq!(scene.lights.len(), 1);

        match &scene.models[1].primitives[..] {
            [Primitive::Grid(grid)] => {
                assert_eq!(grid.material.name(), "White");
                assert!(grid.triangles().all(|t| t.material.name() == "White"));
            }
            other => panic!("expected one grid, got {:?}", other),
        }
    }

    #[test]
    fn hand_written_coordinates_spell_their_values() {
        let walls = build_walls(&build_materials()).unwrap();
        for primitive in &walls.primitives {
            if let Primitive::Plane(plane) = primitive {
                for coords in [&plane.normal, &plane.point, &plane.u, &plane.v] {
                    assert!(coords.literal.is_some(), "{}", plane.name);
                    assert!(literal_matches_value(coords), "{}: {:?}", plane.name, coords);
                }
            }
        }

        let light = build_light();
        for coords in [&light.irradiance, &light.point, &light.u, &light.v] {
            assert!(literal_matches_value(coords), "{:?}", coords);
        }
    }
}
