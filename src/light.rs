use serde::{ Deserialize, Serialize };

use crate::color::Color;
use crate::tuple::Tuple4D;

/// A point light.
///
/// A very simple light source. Provides a color and a position where light is
/// produced from.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointLight {
    pub intensity: Color,
    pub position: Tuple4D,
}

impl PointLight {
    /// Creates a point light.
    ///
    /// If `position` isn't a point, it is converted to a point automatically.
    pub fn new(intensity: Color, mut position: Tuple4D) -> PointLight {
        position.w = 1.0;

        PointLight { intensity, position }
    }
}

/// A material record.
///
/// Materials use attributes from the Phong reflection model; ambient, diffuse,
/// specular and shininess. Every field may be left out of a config file and
/// falls back to its default.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub color: Color,

    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            color: Color::white(),

            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,
        }
    }
}

impl Material {
    /// Phong lighting of a fully lit point on this material.
    pub fn lighting(&self, light: &PointLight, point: Tuple4D,
        eyev: Tuple4D, normalv: Tuple4D) -> Color {
        self.shade(light, point, eyev, normalv, false)
    }

    /// Phong lighting of a point that may be in shadow.
    ///
    /// `eyev` and `normalv` are unit vectors. A shadowed point, or the dark
    /// side of a surface, only receives the ambient term.
    pub fn shade(&self, light: &PointLight, point: Tuple4D,
        eyev: Tuple4D, normalv: Tuple4D, in_shadow: bool) -> Color {
        // Surface color filtered by the light's color
        let effective_color = self.color * light.intensity;
        let ambient = effective_color * self.ambient;

        if in_shadow {
            return ambient;
        }

        let lightv = (light.position - point).normalize();
        let light_dot_normal = lightv.dot(&normalv);
        if light_dot_normal < 0.0 {
            return ambient;
        }

        let diffuse = effective_color * self.diffuse * light_dot_normal;

        let reflectv = (-lightv).reflect(&normalv);
        let reflect_dot_eye = reflectv.dot(&eyev);
        let specular = if reflect_dot_eye <= 0.0 {
            Color::black()
        } else {
            let factor = reflect_dot_eye.powf(self.shininess);
            light.intensity * self.specular * factor
        };

        ambient + diffuse + specular
    }
}

#[cfg(test)]
fn light_at(x: f64, y: f64, z: f64) -> PointLight {
    PointLight::new(Color::white(), Tuple4D::point(x, y, z))
}

#[test]
fn point_light_coerces_position() {
    let light = PointLight::new(Color::white(), Tuple4D::vector(1.0, 2.0, 3.0));

    assert!(light.position.is_point());
    assert_eq!(light.intensity, Color::white());
}

#[test]
fn default_material() {
    let m = Material::default();

    assert_eq!(m.color, Color::white());
    assert_eq!(m.ambient, 0.1);
    assert_eq!(m.diffuse, 0.9);
    assert_eq!(m.specular, 0.9);
    assert_eq!(m.shininess, 200.0);
}

#[test]
fn eye_between_light_and_surface() {
    let m = Material::default();
    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);

    let res = m.lighting(&light_at(0.0, 0.0, -10.0), Tuple4D::origin(), eyev, normalv);
    assert_eq!(res, Color::rgb(1.9, 1.9, 1.9));
}

#[test]
fn eye_between_light_and_surface_offset_45() {
    let m = Material::default();
    let half = 2.0f64.sqrt() / 2.0;
    let eyev = Tuple4D::vector(0.0, half, -half);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);

    let res = m.lighting(&light_at(0.0, 0.0, -10.0), Tuple4D::origin(), eyev, normalv);
    assert_eq!(res, Color::rgb(1.0, 1.0, 1.0));
}

#[test]
fn eye_opposite_from_surface_offset_45() {
    let m = Material::default();
    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);

    let res = m.lighting(&light_at(0.0, 10.0, -10.0), Tuple4D::origin(), eyev, normalv);
    assert_eq!(res, Color::rgb(0.73640, 0.73640, 0.73640));
}

#[test]
fn eye_in_path_of_reflection() {
    let m = Material::default();
    let half = 2.0f64.sqrt() / 2.0;
    let eyev = Tuple4D::vector(0.0, -half, -half);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);

    let res = m.lighting(&light_at(0.0, 10.0, -10.0), Tuple4D::origin(), eyev, normalv);
    approx::assert_abs_diff_eq!(res.r, 1.63639, epsilon = 1e-4);
    assert_eq!(res.r, res.g);
    assert_eq!(res.g, res.b);
}

#[test]
fn light_behind_surface() {
    let m = Material::default();
    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);

    let res = m.lighting(&light_at(0.0, 0.0, 10.0), Tuple4D::origin(), eyev, normalv);
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn surface_in_shadow_is_ambient_only() {
    let m = Material::default();
    let eyev = Tuple4D::vector(0.0, 0.0, -1.0);
    let normalv = Tuple4D::vector(0.0, 0.0, -1.0);

    let res = m.shade(&light_at(0.0, 0.0, -10.0), Tuple4D::origin(), eyev, normalv, true);
    assert_eq!(res, Color::rgb(0.1, 0.1, 0.1));
}

#[test]
fn material_fields_default_when_omitted() {
    let m: Material = serde_json::from_str(r#"{ "diffuse": 0.7 }"#).unwrap();

    assert_eq!(m, Material { diffuse: 0.7, ..Default::default() });
}
