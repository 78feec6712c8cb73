//! Render Module
//!
//! Instance buffer layouts and color packing shared by every visual system.

pub mod instances;

pub use instances::{
    BlockInstance, DEBRIS_POINT_SIZE, DebrisInstance, RingInstance, TracerInstance, hsl_to_rgb,
    pack_color, pack_color_f32, pack_hsl, unpack_color,
};
