use crate::error::Error;

/// SVG user units are points.
const POINTS_PER_INCH: f32 = 72.0;

/// Rasterise an SVG string to PNG bytes at the given DPI.
///
/// Text uses whatever fonts the system provides; with none installed the
/// chart lines still render and the labels are skipped.
pub fn svg_to_png(svg: &str, dpi: u32) -> crate::Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| Error::Render(e.to_string()))?;

    let scale = dpi as f32 / POINTS_PER_INCH;
    let size = tree.size();
    let (w, h) = pixel_size(size.width(), size.height(), dpi);

    let mut pixmap = tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| Error::Render(format!("cannot allocate a {w}x{h} pixmap")))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    pixmap.encode_png().map_err(|e| Error::Render(e.to_string()))
}

/// Pixel dimensions of a `width_pt` × `height_pt` figure at `dpi`.
pub fn pixel_size(width_pt: f32, height_pt: f32, dpi: u32) -> (u32, u32) {
    let scale = dpi as f32 / POINTS_PER_INCH;
    (
        (width_pt * scale).round() as u32,
        (height_pt * scale).round() as u32,
    )
}
