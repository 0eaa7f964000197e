/// Arena geometry. Walls are lethal, so spawn placement keeps a margin.
#[derive(Debug, Clone, Copy)]
pub struct WorldTuning {
    /// Arena width in pixels; walls sit at x = 0 and x = width.
    pub width: f32,

    /// Arena height in pixels; walls sit at y = 0 and y = height.
    pub height: f32,

    /// Minimum distance from any wall for freshly spawned players.
    pub spawn_padding: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: 2400.0,
            height: 1400.0,
            spawn_padding: 120.0,
        }
    }
}
