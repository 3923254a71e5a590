pub(crate) mod composite;
pub(crate) mod compositor;
pub(crate) mod palette;
pub(crate) mod placeholder;
pub(crate) mod raster;

/// Edge length of every pin, in pixels.
pub const PIN_SIZE: u32 = 30;
/// Thickness of the colored ring, in pixels.
pub const RING_WIDTH: u32 = 2;
