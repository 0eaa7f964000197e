// Small 2-D helpers shared by the simulation systems. No state, no I/O.

/// Euclidean distance between two points.
pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = bx - ax;
    let dy = by - ay;
    (dx * dx + dy * dy).sqrt()
}

/// Scales (x, y) to unit length; zero vectors stay zero.
pub fn normalize(x: f32, y: f32) -> (f32, f32) {
    let len = (x * x + y * y).sqrt();
    if len > 0.0 { (x / len, y / len) } else { (0.0, 0.0) }
}

/// Rescales (vx, vy) so its magnitude does not exceed `max`.
/// Vectors already within the limit are returned unchanged.
pub fn clamp_magnitude(vx: f32, vy: f32, max: f32) -> (f32, f32) {
    let len = (vx * vx + vy * vy).sqrt();
    if len > max && len > 0.0 {
        let scale = max / len;
        (vx * scale, vy * scale)
    } else {
        (vx, vy)
    }
}
