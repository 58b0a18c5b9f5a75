use std::fs;
use std::path::Path;

use log::debug;
use serde::{ Deserialize, Serialize };
use thiserror::Error;

use crate::consts::{ DEFAULT_PADDING, DEFAULT_RADIUS };
use crate::color::Color;
use crate::tuple::Tuple4D;
use crate::matrix::Matrix4D;
use crate::light::{ Material, PointLight };
use crate::shape::Shape;
use crate::world::World;

/// Errors from loading a render configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for a `RenderConfig`.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A shape's transform steps compose to a non-invertible matrix.
    #[error("transform of {0} shape is singular")]
    SingularTransform(&'static str),
}

/// One step of a shape's transform.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformStep {
    Translate { x: f64, y: f64, z: f64 },
    Scale { x: f64, y: f64, z: f64 },
    RotateX { radians: f64 },
    RotateY { radians: f64 },
    RotateZ { radians: f64 },
    Shear { xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64 },
}

impl TransformStep {
    pub fn matrix(&self) -> Matrix4D {
        match *self {
            TransformStep::Translate { x, y, z } => Matrix4D::translation(x, y, z),
            TransformStep::Scale { x, y, z } => Matrix4D::scaling(x, y, z),
            TransformStep::RotateX { radians } => Matrix4D::rotation_x(radians),
            TransformStep::RotateY { radians } => Matrix4D::rotation_y(radians),
            TransformStep::RotateZ { radians } => Matrix4D::rotation_z(radians),
            TransformStep::Shear { xy, xz, yx, yz, zx, zy } =>
                Matrix4D::shearing(xy, xz, yx, yz, zx, zy),
        }
    }
}

/// Composes steps so the first listed is applied to the shape first.
pub fn compose(steps: &[TransformStep]) -> Matrix4D {
    steps.iter().fold(Matrix4D::identity(), |acc, step| step.matrix() * acc)
}

/// Placement and surface of a primitive shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Primitive {
    pub transform: Vec<TransformStep>,
    pub material: Material,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupDescription {
    pub transform: Vec<TransformStep>,
    pub children: Vec<ShapeDescription>,
}

/// A shape in a config file, tagged by `"type"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDescription {
    Sphere(Primitive),
    Plane(Primitive),
    Cube(Primitive),
    Group(GroupDescription),
}

impl ShapeDescription {
    fn kind(&self) -> &'static str {
        match self {
            ShapeDescription::Sphere(_) => "sphere",
            ShapeDescription::Plane(_) => "plane",
            ShapeDescription::Cube(_) => "cube",
            ShapeDescription::Group(_) => "group",
        }
    }

    /// Builds the shape, checking every transform before it reaches the
    /// kernel.
    pub fn build(&self) -> Result<Shape, ConfigError> {
        let (mut shape, steps) = match self {
            ShapeDescription::Sphere(p) => (Self::primitive(Shape::sphere(), p), &p.transform),
            ShapeDescription::Plane(p) => (Self::primitive(Shape::plane(), p), &p.transform),
            ShapeDescription::Cube(p) => (Self::primitive(Shape::cube(), p), &p.transform),
            ShapeDescription::Group(g) => {
                let mut group = Shape::group();
                for child in g.children.iter() {
                    group.add_child(child.build()?);
                }
                (group, &g.transform)
            },
        };

        let transform = compose(steps);
        if !transform.is_invertible() {
            return Err(ConfigError::SingularTransform(self.kind()));
        }
        shape.set_transform(transform);

        Ok(shape)
    }

    fn primitive(mut shape: Shape, p: &Primitive) -> Shape {
        shape.set_material(p.material);
        shape
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightDescription {
    pub intensity: Color,
    pub position: [f64; 3],
}

impl From<&LightDescription> for PointLight {
    fn from(l: &LightDescription) -> PointLight {
        let [x, y, z] = l.position;
        PointLight::new(l.intensity, Tuple4D::point(x, y, z))
    }
}

/// Everything the driver needs to render a scene.
///
/// The canvas is a square `2 * (padding + radius)` pixels on a side, centered
/// on the world origin. A missing file or missing fields fall back to a single
/// red sphere of the given radius, lit from the `(-x, -y)` corner in front
/// of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub padding: f64,
    pub radius: f64,
    pub light: LightDescription,
    pub shapes: Vec<ShapeDescription>,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        let inset = DEFAULT_PADDING + DEFAULT_RADIUS;
        let sphere = Primitive {
            transform: vec![TransformStep::Scale {
                x: DEFAULT_RADIUS, y: DEFAULT_RADIUS, z: DEFAULT_RADIUS,
            }],
            material: Material { color: Color::rgb(1.0, 0.2, 0.2), ..Default::default() },
        };

        RenderConfig {
            padding: DEFAULT_PADDING,
            radius: DEFAULT_RADIUS,
            light: LightDescription {
                intensity: Color::white(),
                position: [-inset * 10.0, -inset * 10.0, DEFAULT_RADIUS * 4.0],
            },
            shapes: vec![ShapeDescription::Sphere(sphere)],
        }
    }
}

impl RenderConfig {
    /// Reads a JSON config from `path`.
    pub fn load(path: &Path) -> Result<RenderConfig, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        debug!("loaded config from {}", path.display());

        Ok(config)
    }

    /// Half the canvas side, the offset from world to pixel coordinates.
    pub fn inset(&self) -> f64 {
        self.padding + self.radius
    }

    /// Builds the world described by this config.
    pub fn build_world(&self) -> Result<World, ConfigError> {
        let objects = self.shapes.iter()
            .map(ShapeDescription::build)
            .collect::<Result<Vec<Shape>, ConfigError>>()?;
        debug!("built world with {} top-level objects", objects.len());

        Ok(World { objects, light: (&self.light).into() })
    }
}

#[test]
fn steps_apply_in_listed_order() {
    let steps = [
        TransformStep::RotateX { radians: std::f64::consts::FRAC_PI_2 },
        TransformStep::Scale { x: 5.0, y: 5.0, z: 5.0 },
        TransformStep::Translate { x: 10.0, y: 5.0, z: 7.0 },
    ];

    let p = compose(&steps) * Tuple4D::point(1.0, 0.0, 1.0);
    assert_eq!(p, Tuple4D::point(15.0, 0.0, 7.0));
}

#[test]
fn default_config_is_lit_sphere() {
    let config = RenderConfig::default();
    let world = config.build_world().unwrap();

    assert_eq!(config.inset(), 120.0);
    assert_eq!(world.objects.len(), 1);
    assert_eq!(*world.objects[0].transform(), Matrix4D::scaling(100.0, 100.0, 100.0));
    assert_eq!(world.objects[0].material().color, Color::rgb(1.0, 0.2, 0.2));
    assert_eq!(world.light.position, Tuple4D::point(-1200.0, -1200.0, 400.0));
}

#[test]
fn parse_nested_scene() {
    let json = r#"{
        "padding": 5,
        "radius": 10,
        "light": { "intensity": { "r": 1, "g": 1, "b": 1 }, "position": [0, 0, 50] },
        "shapes": [
            { "type": "plane", "transform": [ { "op": "translate", "x": 0, "y": -10, "z": 0 } ] },
            { "type": "group",
              "transform": [ { "op": "scale", "x": 2, "y": 2, "z": 2 } ],
              "children": [
                  { "type": "sphere", "material": { "color": { "r": 0, "g": 0, "b": 1 } } },
                  { "type": "cube", "transform": [ { "op": "translate", "x": 3, "y": 0, "z": 0 } ] }
              ] }
        ]
    }"#;

    let config: RenderConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.padding, 5.0);

    let world = config.build_world().unwrap();
    let group = &world.objects[1];
    let children = group.children().unwrap();

    assert_eq!(children.len(), 2);
    assert_eq!(children[0].material().color, Color::rgb(0.0, 0.0, 1.0));
    assert_eq!(children[1].world_to_object(Tuple4D::point(6.0, 0.0, 0.0)),
        Tuple4D::origin());
}

#[test]
fn singular_transform_is_reported() {
    let json = r#"{ "shapes": [ { "type": "group", "children": [
        { "type": "cube", "transform": [ { "op": "scale", "x": 1, "y": 0, "z": 1 } ] }
    ] } ] }"#;

    let config: RenderConfig = serde_json::from_str(json).unwrap();
    match config.build_world() {
        Err(ConfigError::SingularTransform(kind)) => assert_eq!(kind, "cube"),
        other => panic!("expected singular transform error, got {:?}", other),
    }
}

#[test]
fn unknown_shape_fails_to_parse() {
    let json = r#"{ "shapes": [ { "type": "torus" } ] }"#;

    assert!(matches!(serde_json::from_str::<RenderConfig>(json)
        .map_err(ConfigError::from), Err(ConfigError::Parse(_))));
}

#[test]
fn missing_file_is_io_error() {
    let err = RenderConfig::load(Path::new("/nonexistent/ray-kernel.json")).unwrap_err();

    assert!(matches!(err, ConfigError::Io(_)));
}
