use crate::foundation::core::{PixelSize, Rect, TileRect};

/// Placement of one viewport on the shared offscreen surface.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Tile {
    pub id: String,
    /// Buffer-space pixel rectangle (top-left origin).
    pub rect: TileRect,
    /// Display-space fractions (bottom-left origin) used by the scene renderer.
    pub normalized: Rect,
}

impl Tile {
    /// The tile's span in display-space pixels on a surface of `surface` size.
    pub fn display_rect(&self, surface: PixelSize) -> Rect {
        let (w, h) = (f64::from(surface.width), f64::from(surface.height));
        Rect::new(
            self.normalized.x0 * w,
            self.normalized.y0 * h,
            self.normalized.x1 * w,
            self.normalized.y1 * h,
        )
    }
}

/// Result of packing the GPU-driven viewports.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct TileLayout {
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<Tile>,
}

impl TileLayout {
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, id: &str) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }
}

/// Pack viewports left to right, in the given order, onto one surface.
///
/// The surface is `Σw × max(h)`. Every tile starts at buffer row 0; in display space shorter
/// tiles are bottom-anchored, leaving padding above them.
pub fn pack_tiles<'a, I>(participants: I) -> TileLayout
where
    I: IntoIterator<Item = (&'a str, PixelSize)>,
{
    let mut rects = Vec::new();
    let mut x_offset = 0u32;
    let mut height = 0u32;
    for (id, size) in participants {
        rects.push((id, TileRect::new(x_offset, 0, size.width, size.height)));
        x_offset = x_offset.saturating_add(size.width);
        height = height.max(size.height);
    }

    let surface = PixelSize::new(x_offset, height);
    let tiles = rects
        .into_iter()
        .map(|(id, rect)| Tile {
            id: id.to_string(),
            rect,
            normalized: normalized_rect(rect, surface),
        })
        .collect();

    TileLayout {
        width: surface.width,
        height: surface.height,
        tiles,
    }
}

/// Fractions of `surface` covered by `rect`, in display space.
pub fn normalized_rect(rect: TileRect, surface: PixelSize) -> Rect {
    if surface.is_empty() {
        return Rect::ZERO;
    }
    let (w, h) = (f64::from(surface.width), f64::from(surface.height));
    let sx_start = f64::from(rect.sx) / w;
    let sy_start = (h - f64::from(rect.s_height)) / h;
    let sx_end = sx_start + f64::from(rect.s_width) / w;
    let sy_end = sy_start + f64::from(rect.s_height) / h;
    Rect::new(sx_start, sy_start, sx_end, sy_end)
}

#[cfg(test)]
#[path = "../../tests/unit/engine/tiling.rs"]
mod tests;
