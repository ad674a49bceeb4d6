//! Production decode collaborator backed by `rawloader` and `image`.
//!
//! `open_and_unpack` reads the container bytes and decodes the sensor data in
//! one step; both must succeed before a session exists, so a corrupt file
//! fails the whole task up front. Previews come from the largest embedded
//! JPEG in the container, fulls from a half-resolution superpixel debayer of
//! the CFA grid followed by the fixed color pipeline.

use std::fs;
use std::path::Path;

use image::ImageFormat;
use tracing::debug;

use super::color::{apply_matrix, cam_to_srgb_matrix, encode_gamma, BrightnessHistogram};
use super::{DecodeError, DecodeParams, Orientation, PixelBuffer, RawDecoder, RawSession};

/// Smallest embedded JPEG accepted as a preview. Anything below this is a
/// thumbnail icon, not a usable preview.
const MIN_PREVIEW_BYTES: usize = 10_000;

/// JPEG start-of-image marker, three bytes to cut down false positives.
const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// Opens camera raw files and produces per-task decode sessions.
#[derive(Debug, Default)]
pub struct RawfileDecoder;

impl RawfileDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl RawDecoder for RawfileDecoder {
    fn open_and_unpack(&self, path: &Path) -> Result<Box<dyn RawSession>, DecodeError> {
        let container = fs::read(path).map_err(|source| DecodeError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let raw = rawloader::decode_file(path).map_err(|err| DecodeError::Unpack {
            path: path.to_path_buf(),
            message: format!("{:?}", err),
        })?;

        if raw.cpp != 1 {
            return Err(DecodeError::Sensor {
                message: format!("unsupported sample layout ({} components per pixel)", raw.cpp),
            });
        }

        let data = match raw.data {
            rawloader::RawImageData::Integer(values) => values,
            rawloader::RawImageData::Float(values) => values
                .into_iter()
                .map(|v| (v * 65535.0).clamp(0.0, 65535.0) as u16)
                .collect(),
        };

        let orientation = map_orientation(raw.orientation);
        debug!(
            path = %path.display(),
            width = raw.width,
            height = raw.height,
            ?orientation,
            "opened raw source"
        );

        Ok(Box::new(RawfileSession {
            container,
            sensor: SensorData {
                data,
                width: raw.width,
                height: raw.height,
                cfa: raw.cfa,
                blacklevels: raw.blacklevels,
                whitelevels: raw.whitelevels,
                wb_coeffs: raw.wb_coeffs,
                xyz_to_cam: raw.xyz_to_cam,
            },
            orientation,
        }))
    }
}

/// Sensor-side inputs to the full decode, separated from the session so the
/// pipeline can run against synthetic grids.
struct SensorData {
    data: Vec<u16>,
    width: usize,
    height: usize,
    cfa: rawloader::CFA,
    blacklevels: [u16; 4],
    whitelevels: [u16; 4],
    wb_coeffs: [f32; 4],
    xyz_to_cam: [[f32; 3]; 4],
}

/// One opened raw file: the container bytes for the preview scan and the
/// unpacked sensor data for the full decode.
struct RawfileSession {
    container: Vec<u8>,
    sensor: SensorData,
    orientation: Orientation,
}

impl RawSession for RawfileSession {
    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn extract_preview(&mut self) -> Result<PixelBuffer, DecodeError> {
        let jpeg = largest_embedded_jpeg(&self.container, MIN_PREVIEW_BYTES)
            .ok_or(DecodeError::MissingPreview {
                min_bytes: MIN_PREVIEW_BYTES,
            })?;

        // Force 3-channel RGB regardless of what the JPEG stores.
        let decoded = image::load_from_memory_with_format(jpeg, ImageFormat::Jpeg)?;
        let rgb = decoded.to_rgb8();
        let (width, height) = (rgb.width(), rgb.height());
        Ok(PixelBuffer::new(rgb.into_raw(), width, height, 3))
    }

    fn decode_full(&mut self, params: &DecodeParams) -> Result<PixelBuffer, DecodeError> {
        decode_sensor(&self.sensor, params)
    }
}

/// Map rawloader's orientation onto the four flip codes the browser stack
/// renders; flips and transposes it cannot express collapse to upright.
fn map_orientation(orientation: rawloader::Orientation) -> Orientation {
    match orientation {
        rawloader::Orientation::Rotate180 => Orientation::Rotate180,
        rawloader::Orientation::Rotate270 => Orientation::Rotate90Ccw,
        rawloader::Orientation::Rotate90 => Orientation::Rotate90Cw,
        _ => Orientation::None,
    }
}

/// Find the largest SOI..EOI span in the container that clears `min_bytes`.
///
/// Raw containers routinely embed several JPEGs (icon thumbnail, screen-size
/// preview, sometimes full-size); the largest one is the usable preview.
fn largest_embedded_jpeg(container: &[u8], min_bytes: usize) -> Option<&[u8]> {
    let mut best: Option<&[u8]> = None;

    let mut offset = 0;
    while offset + JPEG_SOI.len() <= container.len() {
        let Some(start) = find_marker(container, offset, &JPEG_SOI) else {
            break;
        };
        let Some(end_rel) = find_marker(container, start + JPEG_SOI.len(), &JPEG_EOI) else {
            break;
        };
        let candidate = &container[start..end_rel + JPEG_EOI.len()];
        if candidate.len() >= min_bytes && best.map_or(true, |b| candidate.len() > b.len()) {
            best = Some(candidate);
        }
        offset = start + JPEG_SOI.len();
    }

    best
}

fn find_marker(haystack: &[u8], from: usize, marker: &[u8]) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(marker.len())
        .position(|window| window == marker)
        .map(|pos| from + pos)
}

/// Half-resolution superpixel debayer plus the fixed color pipeline.
///
/// Each 2x2 CFA quad collapses into one RGB pixel (the two greens average),
/// then black/white normalization, camera white balance, the camera-to-sRGB
/// matrix, optional auto-brightness, and the gamma encode produce 8-bit sRGB.
fn decode_sensor(sensor: &SensorData, params: &DecodeParams) -> Result<PixelBuffer, DecodeError> {
    if sensor.width < 2 || sensor.height < 2 {
        return Err(DecodeError::Sensor {
            message: format!("sensor too small: {}x{}", sensor.width, sensor.height),
        });
    }
    if sensor.data.len() < sensor.width * sensor.height {
        return Err(DecodeError::Sensor {
            message: format!(
                "sensor data truncated: {} samples for {}x{}",
                sensor.data.len(),
                sensor.width,
                sensor.height
            ),
        });
    }

    let out_width = sensor.width / 2;
    let out_height = sensor.height / 2;

    let wb = normalized_wb(&sensor.wb_coeffs, params.camera_white_balance);
    let matrix = cam_to_srgb_matrix(&sensor.xyz_to_cam);
    let ranges = channel_ranges(&sensor.blacklevels, &sensor.whitelevels);

    // First pass: linear sRGB floats, with a histogram for auto-brightness.
    let mut linear = vec![0.0f32; out_width * out_height * 3];
    let mut histogram = BrightnessHistogram::new();

    for quad_y in 0..out_height {
        for quad_x in 0..out_width {
            let rgb = quad_rgb(sensor, quad_x, quad_y, &wb, &ranges);
            let srgb = apply_matrix(&matrix, rgb);
            let base = (quad_y * out_width + quad_x) * 3;
            for (slot, value) in linear[base..base + 3].iter_mut().zip(srgb) {
                let value = value.max(0.0);
                *slot = value;
                histogram.record(value);
            }
        }
    }

    let scale = if params.auto_brighten {
        histogram.brighten_scale(super::color::AUTO_BRIGHT_CLIP)
    } else {
        1.0
    };

    let pixels = linear
        .into_iter()
        .map(|v| {
            let encoded = encode_gamma(v * scale, params.gamma_power, params.gamma_slope);
            (encoded * 255.0 + 0.5) as u8
        })
        .collect();

    Ok(PixelBuffer::new(
        pixels,
        out_width as u32,
        out_height as u32,
        3,
    ))
}

/// Average one 2x2 CFA quad into camera RGB, normalized and white balanced.
fn quad_rgb(
    sensor: &SensorData,
    quad_x: usize,
    quad_y: usize,
    wb: &[f32; 4],
    ranges: &[(f32, f32); 4],
) -> [f32; 3] {
    let mut sums = [0.0f32; 3];
    let mut counts = [0u32; 3];

    for dy in 0..2 {
        for dx in 0..2 {
            let row = quad_y * 2 + dy;
            let col = quad_x * 2 + dx;
            let channel = sensor.cfa.color_at(row, col).min(3);
            let (black, range) = ranges[channel];
            let sample = sensor.data[row * sensor.width + col] as f32;
            let value = ((sample - black) / range).max(0.0) * wb[channel];

            // Both greens land in the same output channel.
            let slot = if channel == 3 { 1 } else { channel };
            sums[slot] += value;
            counts[slot] += 1;
        }
    }

    [0usize, 1, 2].map(|c| {
        if counts[c] > 0 {
            sums[c] / counts[c] as f32
        } else {
            0.0
        }
    })
}

/// White balance multipliers normalized so green is 1.0; invalid or missing
/// coefficients become neutral.
fn normalized_wb(coeffs: &[f32; 4], enabled: bool) -> [f32; 4] {
    if !enabled {
        return [1.0; 4];
    }
    let green = coeffs[1];
    if !green.is_finite() || green <= 0.0 {
        return [1.0; 4];
    }
    let mut wb = [0.0f32; 4];
    for (slot, &coeff) in wb.iter_mut().zip(coeffs) {
        *slot = if coeff.is_finite() && coeff > 0.0 {
            coeff / green
        } else {
            1.0
        };
    }
    wb
}

/// Per-channel (black level, usable range) with a guard against degenerate
/// metadata.
fn channel_ranges(blacklevels: &[u16; 4], whitelevels: &[u16; 4]) -> [(f32, f32); 4] {
    let mut ranges = [(0.0f32, 1.0f32); 4];
    for (i, range) in ranges.iter_mut().enumerate() {
        let black = blacklevels[i] as f32;
        let white = whitelevels[i] as f32;
        let span = if white > black { white - black } else { 65535.0 };
        *range = (black, span);
    }
    ranges
}
