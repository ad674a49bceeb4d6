//! Renderable asset model tests.

use rawcache::decode::{Orientation, PixelBuffer};
use rawcache::texture::{software_uploader, ImageAsset, UploadError};

#[test]
fn display_dimensions_follow_the_orientation() {
    let upright = ImageAsset::new((), 6000, 4000, Orientation::None);
    assert_eq!(
        (upright.display_width(), upright.display_height()),
        (6000, 4000)
    );

    let turned = ImageAsset::new((), 6000, 4000, Orientation::Rotate90Cw);
    assert_eq!(
        (turned.display_width(), turned.display_height()),
        (4000, 6000)
    );
    // Pre-rotation dimensions stay available for the texture itself.
    assert_eq!((turned.width(), turned.height()), (6000, 4000));
}

#[test]
fn rotation_degrees_match_render_conventions() {
    assert_eq!(
        ImageAsset::new((), 1, 1, Orientation::None).rotation_degrees(),
        0.0
    );
    assert_eq!(
        ImageAsset::new((), 1, 1, Orientation::Rotate180).rotation_degrees(),
        180.0
    );
    assert_eq!(
        ImageAsset::new((), 1, 1, Orientation::Rotate90Ccw).rotation_degrees(),
        270.0
    );
    assert_eq!(
        ImageAsset::new((), 1, 1, Orientation::Rotate90Cw).rotation_degrees(),
        90.0
    );
}

#[test]
fn software_uploader_accepts_rgb_and_rgba() {
    let mut upload = software_uploader();
    let rgb = PixelBuffer::new(vec![0; 12], 2, 2, 3);
    let rgba = PixelBuffer::new(vec![0; 16], 2, 2, 4);
    assert!(upload(&rgb).is_ok());
    assert!(upload(&rgba).is_ok());
}

#[test]
fn software_uploader_rejects_grayscale() {
    let mut upload = software_uploader();
    let gray = PixelBuffer::new(vec![0; 4], 2, 2, 1);
    assert!(matches!(
        upload(&gray),
        Err(UploadError::UnsupportedChannels(1))
    ));
}
