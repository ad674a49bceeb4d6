//! Color pipeline for the full-quality decode: camera-to-sRGB matrix
//! derivation, the gamma transfer, and auto-brightness estimation.

/// sRGB to CIE XYZ, D65 white point (IEC 61966-2-1).
const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.412_456_4, 0.357_576_1, 0.180_437_5],
    [0.212_672_9, 0.715_152_2, 0.072_175_0],
    [0.019_333_9, 0.119_192_0, 0.950_304_1],
];

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Linear-light breakpoint of the sRGB transfer curve.
const GAMMA_TOE: f32 = 0.003_130_8;

/// Fraction of samples allowed to clip when auto-brightness is on.
pub(crate) const AUTO_BRIGHT_CLIP: f32 = 0.01;

/// Derive the camera-RGB to sRGB matrix from the container's XYZ-to-camera
/// metadata.
///
/// Builds camera-from-sRGB, normalizes each row so white stays neutral after
/// white balance, and inverts. Missing or singular metadata falls back to
/// identity, leaving white balance as the only color correction.
pub(crate) fn cam_to_srgb_matrix(xyz_to_cam: &[[f32; 3]; 4]) -> [[f32; 3]; 3] {
    let has_metadata = xyz_to_cam.iter().flatten().any(|&v| v != 0.0);
    if !has_metadata {
        return IDENTITY;
    }

    let mut cam_from_srgb = [[0.0f32; 3]; 3];
    for (i, row) in cam_from_srgb.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (k, xyz_row) in SRGB_TO_XYZ.iter().enumerate() {
                sum += xyz_to_cam[i][k] * xyz_row[j];
            }
            *cell = sum;
        }
    }

    for row in &mut cam_from_srgb {
        let sum: f32 = row.iter().sum();
        if sum.abs() < 1e-6 {
            return IDENTITY;
        }
        for v in row.iter_mut() {
            *v /= sum;
        }
    }

    invert_3x3(&cam_from_srgb).unwrap_or(IDENTITY)
}

/// Invert a 3x3 matrix, or `None` when it is singular.
fn invert_3x3(m: &[[f32; 3]; 3]) -> Option<[[f32; 3]; 3]> {
    let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
    if det.abs() < 1e-9 {
        return None;
    }
    let inv_det = 1.0 / det;
    Some([
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
        ],
    ])
}

/// Apply a 3x3 matrix to an RGB triple.
pub(crate) fn apply_matrix(m: &[[f32; 3]; 3], rgb: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2],
        m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2],
        m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2],
    ]
}

/// Encode one linear sample with the configured gamma pair.
///
/// Below the sRGB toe the transfer is linear with the given slope; above it
/// the standard power segment applies.
pub(crate) fn encode_gamma(linear: f32, power: f32, slope: f32) -> f32 {
    let v = linear.clamp(0.0, 1.0);
    if v <= GAMMA_TOE {
        slope * v
    } else {
        1.055 * v.powf(power) - 0.055
    }
}

/// Histogram of linear samples backing the auto-brightness estimate.
pub(crate) struct BrightnessHistogram {
    buckets: [u32; 256],
    total: u64,
}

impl BrightnessHistogram {
    pub(crate) fn new() -> Self {
        Self {
            buckets: [0; 256],
            total: 0,
        }
    }

    pub(crate) fn record(&mut self, linear: f32) {
        let bucket = (linear.clamp(0.0, 1.0) * 255.0) as usize;
        self.buckets[bucket.min(255)] += 1;
        self.total += 1;
    }

    /// Scale factor that saturates roughly `clip` of the recorded samples.
    ///
    /// Walks the histogram from the top until the clip budget is spent; the
    /// reached bucket's upper edge becomes the new white point. Never darkens.
    pub(crate) fn brighten_scale(&self, clip: f32) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        let allowed = (self.total as f64 * f64::from(clip)) as u64;
        let mut clipped = 0u64;
        let mut bucket = 255usize;
        loop {
            clipped += u64::from(self.buckets[bucket]);
            if clipped > allowed || bucket == 0 {
                break;
            }
            bucket -= 1;
        }
        let threshold = (bucket as f32 + 1.0) / 256.0;
        (1.0 / threshold).max(1.0)
    }
}
