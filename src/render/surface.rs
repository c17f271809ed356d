use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::foundation::{
    core::{Background, PixelSize},
    error::{TilemuxError, TilemuxResult},
};

/// An owned RGBA8 pixel buffer (row-major, tightly packed).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Transparent premultiplied buffer of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; byte_len(width, height)],
            premultiplied: true,
        }
    }

    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    /// Reallocate to `size`. Contents are discarded, matching a canvas resize.
    pub fn resize(&mut self, size: PixelSize) {
        self.width = size.width;
        self.height = size.height;
        self.data.clear();
        self.data.resize(byte_len(size.width, size.height), 0);
    }

    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub(crate) fn check_len(&self, what: &str) -> TilemuxResult<()> {
        if self.data.len() != byte_len(self.width, self.height) {
            return Err(TilemuxError::validation(format!(
                "{what} buffer length {} does not match {}x{} rgba8",
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

#[derive(Debug)]
struct OutputSurface {
    id: String,
    client: PixelSize,
    pixels: FrameRGBA,
}

/// A viewport's own visible drawing surface.
///
/// The host UI layer owns the strong handle; the engine only keeps a [`WeakOutputTarget`],
/// so dropping the last `OutputTarget` detaches the surface from the engine.
#[derive(Clone, Debug)]
pub struct OutputTarget(Rc<RefCell<OutputSurface>>);

impl OutputTarget {
    pub fn new(id: impl Into<String>, client_width: u32, client_height: u32) -> Self {
        Self(Rc::new(RefCell::new(OutputSurface {
            id: id.into(),
            client: PixelSize::new(client_width, client_height),
            pixels: FrameRGBA::default(),
        })))
    }

    pub fn id(&self) -> String {
        self.0.borrow().id.clone()
    }

    /// Size of the element as laid out by the host, in CSS-like units.
    pub fn client_size(&self) -> PixelSize {
        self.0.borrow().client
    }

    pub fn set_client_size(&self, width: u32, height: u32) {
        self.0.borrow_mut().client = PixelSize::new(width, height);
    }

    /// Size of the backing pixel buffer.
    pub fn pixel_size(&self) -> PixelSize {
        self.0.borrow().pixels.size()
    }

    pub fn set_pixel_size(&self, size: PixelSize) -> TilemuxResult<()> {
        size.validate_surface()?;
        let mut inner = self.0.borrow_mut();
        if inner.pixels.size() != size {
            inner.pixels.resize(size);
        }
        Ok(())
    }

    pub fn snapshot(&self) -> FrameRGBA {
        self.0.borrow().pixels.clone()
    }

    pub fn fill(&self, rgba: [u8; 4]) {
        self.0.borrow_mut().pixels.fill(rgba);
    }

    /// Fill the whole surface with an opaque background, black when `color` is `None`.
    pub fn fill_background(&self, color: Option<Background>) {
        self.fill(color.unwrap_or_default().to_rgba8());
    }

    pub fn clear(&self) {
        self.0.borrow_mut().pixels.clear();
    }

    pub fn with_pixels_mut<R>(&self, f: impl FnOnce(&mut FrameRGBA) -> R) -> R {
        f(&mut self.0.borrow_mut().pixels)
    }

    pub fn downgrade(&self) -> WeakOutputTarget {
        WeakOutputTarget(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(&self, other: &OutputTarget) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Non-owning reference to an [`OutputTarget`].
#[derive(Clone, Debug, Default)]
pub struct WeakOutputTarget(Weak<RefCell<OutputSurface>>);

impl WeakOutputTarget {
    pub fn upgrade(&self) -> Option<OutputTarget> {
        self.0.upgrade().map(OutputTarget)
    }

    pub fn is_attached(&self) -> bool {
        self.0.strong_count() > 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
