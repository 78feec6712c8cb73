//! Instance Buffers - GPU-compatible per-instance data for the city renderer
//!
//! The simulation never touches a graphics API directly; instead each visual
//! system maintains a flat array of one of these structs, uploaded verbatim
//! as an instanced vertex buffer. Layouts are tightly packed with explicit
//! padding so the byte stride is stable across compilers.

/// Point sprite size used when drawing debris instances.
pub const DEBRIS_POINT_SIZE: f32 = 0.19;

/// One city block, rendered as an instanced cube.
///
/// Layout (24 bytes):
///   offset 0:  position ([f32; 3]) = 12 bytes
///   offset 12: scale (f32)         = 4 bytes
///   offset 16: color_packed (u32)  = 4 bytes
///   offset 20: _pad (u32)          = 4 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlockInstance {
    /// World position of the block center
    pub position: [f32; 3],
    /// Uniform scale; 0.0 collapses the cube to nothing (destroyed block)
    pub scale: f32,
    /// Packed RGB color as 0x00RRGGBB
    pub color_packed: u32,
    pub _pad: u32,
}

static_assertions::assert_eq_size!(BlockInstance, [u8; 24]);

impl Default for BlockInstance {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            scale: 0.0,
            color_packed: 0,
            _pad: 0,
        }
    }
}

/// One debris particle, rendered as a point sprite.
///
/// Layout (24 bytes):
///   offset 0:  position ([f32; 3]) = 12 bytes
///   offset 12: color ([f32; 3])    = 12 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebrisInstance {
    pub position: [f32; 3],
    /// RGB in 0..1; zeroed when the particle is inactive
    pub color: [f32; 3],
}

static_assertions::assert_eq_size!(DebrisInstance, [u8; 24]);

/// One impact ring, rendered as a camera-facing quad.
///
/// Layout (24 bytes):
///   offset 0:  position ([f32; 3]) = 12 bytes
///   offset 12: scale (f32)         = 4 bytes
///   offset 16: color_packed (u32)  = 4 bytes
///   offset 20: opacity (f32)       = 4 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RingInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub color_packed: u32,
    /// 0.0 hides the ring
    pub opacity: f32,
}

static_assertions::assert_eq_size!(RingInstance, [u8; 24]);

/// One tracer beam, rendered as a line segment.
///
/// Layout (32 bytes):
///   offset 0:  start ([f32; 3]) = 12 bytes
///   offset 12: end ([f32; 3])   = 12 bytes
///   offset 24: opacity (f32)    = 4 bytes
///   offset 28: _pad (u32)       = 4 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TracerInstance {
    pub start: [f32; 3],
    pub end: [f32; 3],
    /// 0.0 hides the tracer
    pub opacity: f32,
    pub _pad: u32,
}

static_assertions::assert_eq_size!(TracerInstance, [u8; 32]);

/// Pack RGB color components into a single u32 value.
/// Format: 0x00RRGGBB
#[inline]
pub fn pack_color(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Unpack a u32 color value into RGB components.
#[inline]
pub fn unpack_color(packed: u32) -> (u8, u8, u8) {
    let r = ((packed >> 16) & 0xFF) as u8;
    let g = ((packed >> 8) & 0xFF) as u8;
    let b = (packed & 0xFF) as u8;
    (r, g, b)
}

/// Pack floating-point RGB (0..1) into 0x00RRGGBB.
#[inline]
pub fn pack_color_f32(r: f32, g: f32, b: f32) -> u32 {
    let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    pack_color(to_byte(r), to_byte(g), to_byte(b))
}

/// Convert HSL to packed RGB. Buildings tint blocks in HSL space.
#[inline]
pub fn pack_hsl(h: f32, s: f32, l: f32) -> u32 {
    let (r, g, b) = hsl_to_rgb(h, s, l);
    pack_color_f32(r, g, b)
}

/// HSL to RGB conversion. Hue wraps into 0..1; saturation and lightness
/// are clamped.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        // Achromatic
        return (l, l, l);
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        hue_channel(p, q, h + 1.0 / 3.0),
        hue_channel(p, q, h),
        hue_channel(p, q, h - 1.0 / 3.0),
    )
}

fn hue_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}
