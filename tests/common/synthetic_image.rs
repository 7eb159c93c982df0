/// Generates a constant-intensity image.
pub fn constant_u8(width: usize, height: usize, value: u8) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    vec![value; width * height]
}

/// Generates a vertical step edge: columns left of `split` are `lo`, the
/// rest are `hi`.
pub fn vertical_step_u8(width: usize, height: usize, split: usize, lo: u8, hi: u8) -> Vec<u8> {
    assert!(split <= width, "split column must lie within the image");
    let mut img = vec![lo; width * height];
    for y in 0..height {
        for x in split..width {
            img[y * width + x] = hi;
        }
    }
    img
}

/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard_u8(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(cell > 0, "cell size must be positive");
    let mut img = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let sum = (x / cell) + (y / cell);
            img[y * width + x] = if sum & 1 == 0 { 32u8 } else { 220u8 };
        }
    }
    img
}

/// Generates a bright square of `value` centered at (`cx`, `cy`) on zeros.
pub fn bright_square_u8(
    width: usize,
    height: usize,
    cx: usize,
    cy: usize,
    size: usize,
    value: u8,
) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut img = vec![0u8; width * height];
    let half = size / 2;
    for y in cy.saturating_sub(half)..=(cy + half).min(height - 1) {
        for x in cx.saturating_sub(half)..=(cx + half).min(width - 1) {
            img[y * width + x] = value;
        }
    }
    img
}

/// Deterministic pseudo-random intensities (xorshift32).
pub fn noise_u8(width: usize, height: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.max(1);
    let mut img = Vec::with_capacity(width * height);
    for _ in 0..width * height {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        img.push((state >> 8) as u8);
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "dimensions must be positive")]
    fn bright_square_rejects_empty_rasters() {
        bright_square_u8(0, 0, 0, 0, 1, 255);
    }
}
