//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the dimensions an image must be scaled to so it fits a bounding box.
///
/// Returns `None` when the source already fits (both dimensions within the
/// box): images are never upscaled. Otherwise the aspect ratio is preserved and
/// exactly one dimension lands on the box edge; the other is rounded to the
/// nearest pixel and never drops below 1.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `bound` - Maximum bounding box (width, height)
///
/// # Examples
/// ```
/// # use static_gallery::imaging::calculate_fit_dimensions;
/// // 4000x3000 into 960x540 → height-limited
/// assert_eq!(calculate_fit_dimensions((4000, 3000), (960, 540)), Some((720, 540)));
///
/// // already fits → untouched
/// assert_eq!(calculate_fit_dimensions((800, 600), (960, 540)), None);
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), bound: (u32, u32)) -> Option<(u32, u32)> {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bound;

    if src_w <= max_w && src_h <= max_h {
        return None;
    }

    let (src_w, src_h, max_w, max_h) = (src_w as u64, src_h as u64, max_w as u64, max_h as u64);

    // Compare src_w/src_h against max_w/max_h without floating point
    if src_w * max_h > src_h * max_w {
        // Source is wider than the box: width touches the edge
        let h = ((src_h * max_w + src_w / 2) / src_w).clamp(1, max_h);
        Some((max_w as u32, h as u32))
    } else {
        // Source is taller (or same ratio): height touches the edge
        let w = ((src_w * max_h + src_h / 2) / src_h).clamp(1, max_w);
        Some((w as u32, max_h as u32))
    }
}
