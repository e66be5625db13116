/// Control points of the magma colormap, evenly spaced over 0..=1.
const MAGMA: [[u8; 3]; 9] = [
    [0, 0, 4],
    [28, 16, 68],
    [79, 18, 123],
    [129, 37, 129],
    [181, 54, 122],
    [229, 80, 100],
    [251, 135, 97],
    [254, 194, 135],
    [252, 253, 191],
];

/// Map `t` in 0..=1 onto magma. Out-of-range and NaN inputs are clamped.
pub fn magma(t: f32) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let pos = t * (MAGMA.len() - 1) as f32;
    let i = (pos.floor() as usize).min(MAGMA.len() - 2);
    let frac = pos - i as f32;

    let (a, b) = (MAGMA[i], MAGMA[i + 1]);
    let mut out = [0u8; 3];
    for c in 0..3 {
        out[c] = (a[c] as f32 + (b[c] as f32 - a[c] as f32) * frac).round() as u8;
    }
    out
}
