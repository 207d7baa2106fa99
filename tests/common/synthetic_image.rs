use harmonics_radius::{Image, ImageData};

/// Deterministic RGB texture: smooth diagonal ramps plus fine hashed noise,
/// so the spectrum carries energy out to the highest frequencies.
pub fn textured_rgb_u8(width: usize, height: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");

    let mut img = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            for c in 0..3usize {
                let ramp = (x * 3 + y * 2 + c * 40) % 160;
                let noise = (x * 73 + y * 151 + c * 29) * 2_654_435_761 % 96;
                img.push((ramp + noise) as u8);
            }
        }
    }
    img
}

/// Single-channel gradient spanning the full 0..=255 range.
pub fn full_range_gray_u8(width: usize, height: usize) -> Vec<u8> {
    assert!(width * height > 1, "need at least two pixels");

    let last = (width * height - 1) as f64;
    (0..width * height)
        .map(|i| (i as f64 / last * 255.0).round() as u8)
        .collect()
}

/// Add a reproducible +/- `amplitude` perturbation, clamped to 8 bits.
pub fn perturb_u8(data: &[u8], amplitude: u8) -> Vec<u8> {
    let span = 2 * amplitude as i32 + 1;
    data.iter()
        .enumerate()
        .map(|(i, &v)| {
            let offset = ((i * 7919 + 13) % span as usize) as i32 - amplitude as i32;
            (v as i32 + offset).clamp(0, 255) as u8
        })
        .collect()
}

pub fn to_image_data(data: &[u8], width: usize, height: usize, channels: usize) -> ImageData {
    ImageData::new(
        data.iter().map(|&v| v as f32).collect(),
        width as u32,
        height as u32,
        channels as u32,
    )
    .expect("synthetic buffer matches its dimensions")
}

pub fn textured_image(size: usize, name: &str) -> Image {
    let data = to_image_data(&textured_rgb_u8(size, size), size, size, 3);
    Image::from_data(data, name, None).expect("valid synthetic image")
}
