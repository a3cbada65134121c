use glam::Vec3;

/// Up direction of the drawing surface (planar surfaces only).
pub const SURFACE_UP: Vec3 = Vec3::Y;

/// Spring stiffness per unit of profile elasticity.
pub const SPRING_STIFFNESS_SCALE: f32 = 10.0;

/// Lower bound for mass and other physical denominators.
pub const MIN_DENOMINATOR: f32 = 1e-6;

/// Pointer movement below this is treated as stationary for angle tracking.
pub const MIN_ANGLE_MOVEMENT: f32 = 1e-3;

/// Pressure response output range.
pub const MIN_RESPONSE_PRESSURE: f32 = 0.01;
pub const MAX_RESPONSE_PRESSURE: f32 = 1.0;

/// Tip vertex hardness by position on the tip.
pub const APEX_HARDNESS: f32 = 0.7;
pub const RING_HARDNESS: f32 = 0.8;
pub const BASE_HARDNESS: f32 = 0.9;

/// Exponents of the wear formula.
pub const WEAR_PRESSURE_EXPONENT: f32 = 1.2;
pub const WEAR_HARDNESS_EXPONENT: f32 = -0.8;
pub const WEAR_SCALE: f32 = 0.1;

/// Second moments below this are treated as zero variance.
pub const SHAPE_VARIANCE_EPSILON: f32 = 1e-10;

/// Aspect ratio bounds outside of which a footprint is a line.
pub const LINE_RATIO_MAX: f32 = 2.0;
pub const LINE_RATIO_MIN: f32 = 0.5;

/// Minimum contact count for an oval footprint.
pub const OVAL_MIN_CONTACTS: usize = 4;

/// Friction coefficient output range.
pub const MIN_FRICTION: f32 = 0.3;
pub const MAX_FRICTION: f32 = 1.0;
