/// Tolerance for every floating point comparison in the kernel.
///
/// Tuple, matrix and color equality, near-zero denominators (parallel rays,
/// singular matrices) and the shadow-acne nudge all use this value.
pub const EPSILON: f64 = 0.00001;

// Defaults for the single-sphere scene rendered by the driver.
pub const DEFAULT_PADDING: f64 = 20.0;
pub const DEFAULT_RADIUS: f64 = 100.0;
pub const DEFAULT_OUT_FILE: &str = "./out.ppm";
