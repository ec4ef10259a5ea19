//! Texture loading and translucency reporting
//!
//! Textures keep their decoded RGBA pixels on the CPU side; a renderer uploads
//! them and records the upload with [`ImageTexture::mark_resident`].

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use image::GenericImageView;
use thiserror::Error;

use super::resources::{GraphicsResources, ReleaseError, RenderContext, ResidentContexts};

/// Shared handle to a texture. Textures may be shared across actors.
pub type SharedTexture = Rc<RefCell<dyn Texture>>;

/// What an actor needs to know about a texture.
pub trait Texture: GraphicsResources + fmt::Debug {
    /// Whether sampling this texture can produce partially transparent texels.
    fn is_translucent(&self) -> bool;
}

/// An RGBA8 image texture
#[derive(Debug, Clone)]
pub struct ImageTexture {
    /// Tightly packed RGBA pixels, row-major
    rgba: Vec<u8>,
    width: u32,
    height: u32,
    /// Cached result of scanning the alpha channel
    translucent: bool,
    resident: ResidentContexts,
}

impl ImageTexture {
    /// Load a texture from a file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| TextureError::Io(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Load a texture from raw bytes (PNG, JPEG, etc.)
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes cannot be decoded as an image
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TextureError> {
        let img =
            image::load_from_memory(bytes).map_err(|e| TextureError::Decode(e.to_string()))?;
        Self::from_image(&img)
    }

    /// Create a texture from a `DynamicImage`
    ///
    /// # Errors
    ///
    /// Returns an error if the image has no pixels
    pub fn from_image(img: &image::DynamicImage) -> Result<Self, TextureError> {
        let rgba = img.to_rgba8();
        let dimensions = img.dimensions();
        Self::from_rgba(rgba.into_raw(), dimensions)
    }

    /// Create a texture from raw RGBA data
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer length does not match the dimensions
    pub fn from_rgba(rgba: Vec<u8>, dimensions: (u32, u32)) -> Result<Self, TextureError> {
        let (width, height) = dimensions;
        let expected = width as usize * height as usize * 4;
        if expected == 0 || rgba.len() != expected {
            return Err(TextureError::Dimensions {
                width,
                height,
                len: rgba.len(),
            });
        }

        let translucent = rgba.chunks_exact(4).any(|px| px[3] < u8::MAX);

        Ok(Self {
            rgba,
            width,
            height,
            translucent,
            resident: ResidentContexts::new(),
        })
    }

    /// Create a 1x1 white texture (useful as default/placeholder)
    #[must_use]
    pub fn white() -> Self {
        Self::solid_color([255, 255, 255, 255])
    }

    /// Create a 1x1 colored texture
    #[must_use]
    pub fn solid_color(color: [u8; 4]) -> Self {
        Self {
            rgba: color.to_vec(),
            width: 1,
            height: 1,
            translucent: color[3] < u8::MAX,
            resident: ResidentContexts::new(),
        }
    }

    /// Wrap the texture in a shared handle.
    #[must_use]
    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Get texture width
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get texture height
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA pixels
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }

    /// Record that a renderer uploaded this texture into `context`.
    pub fn mark_resident(&mut self, context: RenderContext) {
        self.resident.insert(context);
    }

    /// Check if the texture has uploads in `context`.
    #[must_use]
    pub fn is_resident(&self, context: &RenderContext) -> bool {
        self.resident.contains(context)
    }

    /// Number of release requests this texture has received.
    #[must_use]
    pub fn release_requests(&self) -> u32 {
        self.resident.release_requests()
    }
}

impl Texture for ImageTexture {
    fn is_translucent(&self) -> bool {
        self.translucent
    }
}

impl GraphicsResources for ImageTexture {
    fn release_graphics_resources(&mut self, context: &RenderContext) -> Result<(), ReleaseError> {
        if self.resident.release(context) {
            log::trace!("Released texture in context {}", context.id());
        }
        Ok(())
    }
}

/// Errors that can occur during texture loading
#[derive(Debug, Clone, Error)]
pub enum TextureError {
    /// IO error reading file
    #[error("IO error: {0}")]
    Io(String),
    /// Error decoding image data
    #[error("Decode error: {0}")]
    Decode(String),
    /// Pixel buffer does not match the stated size
    #[error("{len} bytes do not describe a {width}x{height} RGBA image")]
    Dimensions { width: u32, height: u32, len: usize },
}
