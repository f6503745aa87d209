//! plot/colormap.rs — viridis-style colormap for heatmap cells.

use plotters::style::RGBColor;

// Viridis anchors (matplotlib), interpolated linearly.
const ANCHORS: [(f64, [u8; 3]); 6] = [
    (0.0, [68, 1, 84]),
    (0.2, [59, 82, 139]),
    (0.4, [33, 145, 140]),
    (0.6, [94, 201, 98]),
    (0.8, [186, 222, 40]),
    (1.0, [253, 231, 37]),
];

/// Map a normalized density in [0, 1] to a viridis color. Values outside
/// the range are clamped.
pub fn viridis(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let mut lo = ANCHORS[0];
    let mut hi = ANCHORS[ANCHORS.len() - 1];
    for w in ANCHORS.windows(2) {
        if t >= w[0].0 && t <= w[1].0 {
            lo = w[0];
            hi = w[1];
            break;
        }
    }
    let span = hi.0 - lo.0;
    let f = if span > 0.0 { (t - lo.0) / span } else { 0.0 };
    let channel = |a: u8, b: u8| (a as f64 + f * (b as f64 - a as f64)).round() as u8;
    RGBColor(
        channel(lo.1[0], hi.1[0]),
        channel(lo.1[1], hi.1[1]),
        channel(lo.1[2], hi.1[2]),
    )
}
