//! Base polyhedra the geodesic sphere is subdivided from.

use glam::Vec3;
use serde::{Deserialize, Serialize};

const TET_A: f32 = 0.942_809_04; // sqrt(8/9)
const TET_B: f32 = 0.471_404_52; // sqrt(2/9)
const TET_C: f32 = 0.816_496_6; // sqrt(2/3)
const TET_D: f32 = 1.0 / 3.0;

const TETRAHEDRON_VERTICES: [Vec3; 4] = [
    Vec3::new(TET_A, 0.0, -TET_D),
    Vec3::new(-TET_B, TET_C, -TET_D),
    Vec3::new(-TET_B, -TET_C, -TET_D),
    Vec3::new(0.0, 0.0, 1.0),
];

const TETRAHEDRON_TRIANGLES: [[u32; 3]; 4] = [[0, 2, 1], [1, 2, 3], [0, 1, 3], [0, 3, 2]];

const HEX: f32 = 0.577_350_26; // 1/sqrt(3)

const HEXAHEDRON_VERTICES: [Vec3; 8] = [
    Vec3::new(-HEX, -HEX, HEX),
    Vec3::new(HEX, -HEX, HEX),
    Vec3::new(-HEX, HEX, HEX),
    Vec3::new(HEX, HEX, HEX),
    Vec3::new(-HEX, -HEX, -HEX),
    Vec3::new(HEX, -HEX, -HEX),
    Vec3::new(-HEX, HEX, -HEX),
    Vec3::new(HEX, HEX, -HEX),
];

const HEXAHEDRON_TRIANGLES: [[u32; 3]; 12] = [
    [0, 1, 2],
    [2, 1, 3],
    [1, 5, 3],
    [3, 5, 7],
    [5, 4, 6],
    [5, 6, 7],
    [4, 0, 6],
    [6, 0, 2],
    [1, 0, 5],
    [4, 5, 0],
    [2, 3, 6],
    [6, 3, 7],
];

const OCTAHEDRON_VERTICES: [Vec3; 6] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, -1.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
];

const OCTAHEDRON_TRIANGLES: [[u32; 3]; 8] = [
    [2, 0, 5],
    [2, 5, 1],
    [2, 1, 4],
    [2, 4, 0],
    [3, 5, 0],
    [3, 1, 5],
    [3, 4, 1],
    [3, 0, 4],
];

const ICO_LONG: f32 = 0.850_650_8;
const ICO_SHORT: f32 = 0.525_731_1;

const ICOSAHEDRON_VERTICES: [Vec3; 12] = [
    Vec3::new(0.0, ICO_SHORT, -ICO_LONG),
    Vec3::new(ICO_SHORT, ICO_LONG, 0.0),
    Vec3::new(-ICO_SHORT, ICO_LONG, 0.0),
    Vec3::new(0.0, ICO_SHORT, ICO_LONG),
    Vec3::new(ICO_LONG, 0.0, -ICO_SHORT),
    Vec3::new(ICO_LONG, 0.0, ICO_SHORT),
    Vec3::new(-ICO_LONG, 0.0, ICO_SHORT),
    Vec3::new(-ICO_LONG, 0.0, -ICO_SHORT),
    Vec3::new(0.0, -ICO_SHORT, -ICO_LONG),
    Vec3::new(ICO_SHORT, -ICO_LONG, 0.0),
    Vec3::new(-ICO_SHORT, -ICO_LONG, 0.0),
    Vec3::new(0.0, -ICO_SHORT, ICO_LONG),
];

const ICOSAHEDRON_TRIANGLES: [[u32; 3]; 20] = [
    [2, 1, 0],
    [3, 1, 2],
    [0, 1, 4],
    [4, 1, 5],
    [5, 1, 3],
    [5, 3, 11],
    [11, 3, 6],
    [6, 3, 2],
    [6, 2, 7],
    [7, 2, 0],
    [6, 7, 10],
    [6, 10, 11],
    [10, 7, 8],
    [8, 7, 0],
    [8, 0, 4],
    [8, 4, 9],
    [9, 4, 5],
    [9, 5, 11],
    [11, 10, 9],
    [8, 9, 10],
];

/// The platonic solid a geodesic sphere starts from.
///
/// Every table lists unit-sphere vertices and counter-clockwise, outward-facing
/// triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseShape {
    Tetrahedron,
    Hexahedron,
    Octahedron,
    #[default]
    Icosahedron,
}

impl BaseShape {
    /// Returns all four base shapes in table order.
    pub const fn all() -> [BaseShape; 4] {
        [
            BaseShape::Tetrahedron,
            BaseShape::Hexahedron,
            BaseShape::Octahedron,
            BaseShape::Icosahedron,
        ]
    }

    /// Unit-sphere corner positions.
    pub fn vertices(self) -> &'static [Vec3] {
        match self {
            BaseShape::Tetrahedron => &TETRAHEDRON_VERTICES,
            BaseShape::Hexahedron => &HEXAHEDRON_VERTICES,
            BaseShape::Octahedron => &OCTAHEDRON_VERTICES,
            BaseShape::Icosahedron => &ICOSAHEDRON_VERTICES,
        }
    }

    /// Triangles as index triples into [`BaseShape::vertices`].
    pub fn triangles(self) -> &'static [[u32; 3]] {
        match self {
            BaseShape::Tetrahedron => &TETRAHEDRON_TRIANGLES,
            BaseShape::Hexahedron => &HEXAHEDRON_TRIANGLES,
            BaseShape::Octahedron => &OCTAHEDRON_TRIANGLES,
            BaseShape::Icosahedron => &ICOSAHEDRON_TRIANGLES,
        }
    }

    pub fn triangle_count(self) -> usize {
        self.triangles().len()
    }

    /// Returns a short lowercase name (e.g., "icosahedron").
    pub const fn short_name(self) -> &'static str {
        match self {
            BaseShape::Tetrahedron => "tetrahedron",
            BaseShape::Hexahedron => "hexahedron",
            BaseShape::Octahedron => "octahedron",
            BaseShape::Icosahedron => "icosahedron",
        }
    }

    /// Corner positions of one base triangle.
    pub fn triangle_corners(self, triangle: usize) -> [Vec3; 3] {
        let vertices = self.vertices();
        let [a, b, c] = self.triangles()[triangle];
        [vertices[a as usize], vertices[b as usize], vertices[c as usize]]
    }
}

impl std::fmt::Display for BaseShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_counts() {
        assert_eq!(BaseShape::Tetrahedron.triangle_count(), 4);
        assert_eq!(BaseShape::Hexahedron.triangle_count(), 12);
        assert_eq!(BaseShape::Octahedron.triangle_count(), 8);
        assert_eq!(BaseShape::Icosahedron.triangle_count(), 20);
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        for shape in BaseShape::all() {
            for v in shape.vertices() {
                assert!(
                    (v.length() - 1.0).abs() < 1e-5,
                    "{} vertex {:?} has length {}",
                    shape,
                    v,
                    v.length()
                );
            }
        }
    }

    #[test]
    fn test_triangles_face_outward() {
        for shape in BaseShape::all() {
            for i in 0..shape.triangle_count() {
                let [a, b, c] = shape.triangle_corners(i);
                let normal = (b - a).cross(c - a);
                let centroid = (a + b + c) / 3.0;
                assert!(
                    normal.dot(centroid) > 0.0,
                    "{} triangle {} winds inward",
                    shape,
                    i
                );
            }
        }
    }

    #[test]
    fn test_indices_in_range() {
        for shape in BaseShape::all() {
            let count = shape.vertices().len() as u32;
            assert!(shape.triangles().iter().flatten().all(|&i| i < count));
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&BaseShape::Octahedron).unwrap();
        assert_eq!(json, "\"octahedron\"");
        let shape: BaseShape = serde_json::from_str("\"hexahedron\"").unwrap();
        assert_eq!(shape, BaseShape::Hexahedron);
    }
}
