use crate::{
    foundation::{core::TileRect, error::TilemuxResult},
    render::surface::FrameRGBA,
};

/// Copy `rect` of `src` over the whole of `dst`.
///
/// The source rectangle is clipped to `src`. When the clipped rectangle and `dst` have the
/// same size rows are copied directly; otherwise pixels are resampled nearest-neighbour so
/// device-pixel-ratio rounding never leaves part of `dst` stale.
pub fn blit_tile(src: &FrameRGBA, rect: TileRect, dst: &mut FrameRGBA) -> TilemuxResult<()> {
    src.check_len("blit source")?;
    dst.check_len("blit destination")?;

    let x0 = rect.sx.min(src.width);
    let y0 = rect.sy.min(src.height);
    let x1 = rect.sx.saturating_add(rect.s_width).min(src.width);
    let y1 = rect.sy.saturating_add(rect.s_height).min(src.height);
    let (cw, ch) = (x1 - x0, y1 - y0);
    if cw == 0 || ch == 0 || dst.is_empty() {
        return Ok(());
    }

    let src_stride = src.stride();
    let dst_stride = dst.stride();

    if cw == dst.width && ch == dst.height {
        let row_bytes = cw as usize * 4;
        for (row, out) in dst.data.chunks_exact_mut(dst_stride).enumerate() {
            let start = (y0 as usize + row) * src_stride + x0 as usize * 4;
            out[..row_bytes].copy_from_slice(&src.data[start..start + row_bytes]);
        }
        return Ok(());
    }

    let (dw, dh) = (u64::from(dst.width), u64::from(dst.height));
    for (dy, out) in dst.data.chunks_exact_mut(dst_stride).enumerate() {
        let sy = y0 as usize + nearest(dy as u64, dh, u64::from(ch));
        let src_row = &src.data[sy * src_stride..(sy + 1) * src_stride];
        for (dx, px) in out.chunks_exact_mut(4).enumerate() {
            let sx = x0 as usize + nearest(dx as u64, dw, u64::from(cw));
            px.copy_from_slice(&src_row[sx * 4..sx * 4 + 4]);
        }
    }
    Ok(())
}

// Pixel-centre mapping of destination index `d` in `0..dst_len` onto `0..src_len`.
fn nearest(d: u64, dst_len: u64, src_len: u64) -> usize {
    let s = ((2 * d + 1) * src_len) / (2 * dst_len);
    s.min(src_len - 1) as usize
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
