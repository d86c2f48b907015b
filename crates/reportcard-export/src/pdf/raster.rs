//! Raster strategy: slice one tall, already-rendered image across pages.

use crate::error::ExportError;
use crate::logo::{RasterImage, decode_image};
use crate::pdf::layout::{Area, DrawOp, PageLayout, ReportLayout};
use crate::styles::DocumentStyles;

/// Pages needed to show an image of `image_height` points through a window
/// of `page_height` points. Never less than one.
pub fn raster_page_count(image_height: f32, page_height: f32) -> usize {
    if image_height <= 0.0 || page_height <= 0.0 {
        return 1;
    }
    // Tolerate float noise when the image is an exact multiple of the page.
    let pages = ((image_height - 0.01) / page_height).ceil();
    (pages as usize).max(1)
}

/// Lay a page-width raster out over as many pages as its height requires.
///
/// The image is scaled to the content width. Every page draws the whole
/// image, shifted up by the height already shown on earlier pages and
/// clipped to the content box.
pub fn layout_raster(
    image_bytes: &[u8],
    title: &str,
    styles: &DocumentStyles,
) -> Result<ReportLayout, ExportError> {
    let image = RasterImage::from_dynamic(&decode_image(image_bytes)?);

    let width = styles.content_width();
    let window = styles.content_height();
    let height = width * image.aspect();
    let page_count = raster_page_count(height, window);

    let clip = Area {
        x: styles.margin(),
        y: styles.margin(),
        width,
        height: window,
    };

    let pages = (0..page_count)
        .map(|k| {
            let top = styles.content_top() + k as f32 * window;
            PageLayout {
                ops: vec![DrawOp::Image {
                    index: 0,
                    area: Area {
                        x: styles.margin(),
                        y: top - height,
                        width,
                        height,
                    },
                    clip: Some(clip),
                }],
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        pixels_wide = image.width,
        pixels_high = image.height,
        pages = page_count,
        "raster paginated"
    );

    Ok(ReportLayout {
        title: title.to_string(),
        page_width: styles.page_width,
        page_height: styles.page_height,
        pages,
        images: vec![image],
    })
}
