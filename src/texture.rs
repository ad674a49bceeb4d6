//! Renderable asset model and the upload seam.
//!
//! The cache never talks to a renderer directly. It hands decoded pixels to
//! an [`Uploader`] closure supplied by the caller and wraps whatever handle
//! comes back in an [`ImageAsset`], together with the pre-rotation dimensions
//! and the render-time orientation. A GPU-backed caller captures its device
//! in the closure; headless callers use [`software_uploader`].

use crate::decode::{Orientation, PixelBuffer};

/// Errors from turning decoded pixels into a renderable handle.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Only 3- and 4-channel buffers map to a texture format.
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(u8),

    /// The rendering backend refused the texture.
    #[error("Texture upload rejected: {0}")]
    Rejected(String),
}

/// Converts decoded pixels into a renderable handle.
///
/// Must be invoked only from the owner thread; that is a hard constraint of
/// the rendering collaborator, which is why [`crate::cache::ImageDatabase`]
/// calls it exclusively inside `drain_completed`.
pub type Uploader<T> = Box<dyn FnMut(&PixelBuffer) -> Result<T, UploadError>>;

/// A materialized, renderable asset.
///
/// Width and height are the pre-rotation pixel dimensions; the orientation is
/// applied at render time, so `display_width`/`display_height` are what the
/// layout should reserve on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset<T> {
    handle: T,
    width: u32,
    height: u32,
    orientation: Orientation,
}

impl<T> ImageAsset<T> {
    pub fn new(handle: T, width: u32, height: u32, orientation: Orientation) -> Self {
        Self {
            handle,
            width,
            height,
            orientation,
        }
    }

    /// The renderable handle produced by the upload collaborator.
    pub fn handle(&self) -> &T {
        &self.handle
    }

    /// Pixel width as decoded, before any rotation.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height as decoded, before any rotation.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// On-screen width after the render-time rotation.
    pub fn display_width(&self) -> u32 {
        if self.orientation.swaps_dimensions() {
            self.height
        } else {
            self.width
        }
    }

    /// On-screen height after the render-time rotation.
    pub fn display_height(&self) -> u32 {
        if self.orientation.swaps_dimensions() {
            self.width
        } else {
            self.height
        }
    }

    /// Clockwise rotation in degrees for the render call.
    pub fn rotation_degrees(&self) -> f64 {
        self.orientation.rotation_degrees()
    }
}

/// Reference uploader for headless use: validates the channel count and keeps
/// the pixels themselves as the "handle".
pub fn software_uploader() -> Uploader<PixelBuffer> {
    Box::new(|pixels| {
        if pixels.channels != 3 && pixels.channels != 4 {
            return Err(UploadError::UnsupportedChannels(pixels.channels));
        }
        Ok(pixels.clone())
    })
}
