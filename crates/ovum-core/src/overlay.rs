//! Bounding-box overlay projection.
//!
//! Detections come back in natural image pixels, but the portal renders
//! frames scaled to fit their container, letterboxed when the aspect
//! ratios differ. This module computes the rendered image rectangle and
//! percentage-based overlay rectangles so boxes stay aligned with the
//! image at any container size. Callers recompute on every container
//! resize and image-source change.

use serde::Serialize;

use crate::records::frame::Detection;

/// Where the scaled image actually sits inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedBox {
    pub width: f64,
    pub height: f64,
    /// Letterbox offset from the container's left edge.
    pub offset_x: f64,
    /// Letterbox offset from the container's top edge.
    pub offset_y: f64,
}

/// A CSS rectangle in percentages of the rendered image box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectPercent {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// One positioned, styled overlay entry ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayBox {
    pub rect: RectPercent,
    /// CSS color for the box border and label background.
    pub color: &'static str,
    /// e.g. `oocyte 97.2%`.
    pub label: String,
}

/// Compute the rendered image rectangle for a contain-fit image.
///
/// The image is scaled by the smaller of the two axis ratios and centered
/// on the remaining axis. Returns `None` while any dimension is zero or
/// negative (image not loaded yet, container collapsed), which suppresses
/// the overlay entirely.
pub fn rendered_image_box(
    natural_width: f64,
    natural_height: f64,
    container_width: f64,
    container_height: f64,
) -> Option<RenderedBox> {
    if natural_width <= 0.0
        || natural_height <= 0.0
        || container_width <= 0.0
        || container_height <= 0.0
    {
        return None;
    }

    let width_ratio = container_width / natural_width;
    let height_ratio = container_height / natural_height;
    let scale = width_ratio.min(height_ratio);

    let width = natural_width * scale;
    let height = natural_height * scale;
    Some(RenderedBox {
        width,
        height,
        offset_x: (container_width - width) / 2.0,
        offset_y: (container_height - height) / 2.0,
    })
}

/// Project one detection box to percentages of the rendered image box.
///
/// Percentages are relative to the rendered image region, not the outer
/// container; the caller positions them inside a wrapper sized to the
/// [`RenderedBox`]. Returns `None` for detections without a box or while
/// the natural dimensions are zero.
pub fn project_bbox(
    detection: &Detection,
    natural_width: f64,
    natural_height: f64,
) -> Option<RectPercent> {
    if natural_width <= 0.0 || natural_height <= 0.0 {
        return None;
    }
    let bbox = detection.bbox.as_ref()?;

    Some(RectPercent {
        left: bbox.x1 / natural_width * 100.0,
        top: bbox.y1 / natural_height * 100.0,
        width: (bbox.x2 - bbox.x1) / natural_width * 100.0,
        height: (bbox.y2 - bbox.y1) / natural_height * 100.0,
    })
}

/// Project a frame's detections into renderable overlay boxes.
///
/// Detections with a missing bbox are skipped. An unloaded image (zero
/// natural dimensions) yields no boxes.
pub fn project_detections(
    detections: &[Detection],
    natural_width: f64,
    natural_height: f64,
) -> Vec<OverlayBox> {
    detections
        .iter()
        .filter_map(|detection| {
            let rect = project_bbox(detection, natural_width, natural_height)?;
            Some(OverlayBox {
                rect,
                color: class_color(&detection.class_name),
                label: detection_label(detection),
            })
        })
        .collect()
}

/// Border color per detection class.
pub fn class_color(class_name: &str) -> &'static str {
    match class_name {
        "oocyte" => "#FF6B9D",
        "cytoplasm" => "#C2185B",
        "polarbody" => "#FFB84D",
        "pb" => "#6B9DFF",
        _ => "#FFFFFF",
    }
}

/// Label text: class name plus confidence to one decimal place.
pub fn detection_label(detection: &Detection) -> String {
    format!(
        "{} {:.1}%",
        detection.class_name,
        detection.confidence * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::frame::BoundingBox;

    fn detection(class_name: &str, confidence: f64, bbox: Option<BoundingBox>) -> Detection {
        Detection {
            class_name: class_name.to_string(),
            confidence,
            bbox,
        }
    }

    #[test]
    fn test_landscape_container_letterboxes_horizontally() {
        // 400x300 image in an 800x400 container: height is the limiting
        // axis, so the image is centered horizontally.
        let rendered = rendered_image_box(400.0, 300.0, 800.0, 400.0).unwrap();
        let scale = 400.0 / 300.0;
        assert!((rendered.width - 400.0 * scale).abs() < 1e-9);
        assert!((rendered.height - 400.0).abs() < 1e-9);
        assert!((rendered.offset_x - (800.0 - 400.0 * scale) / 2.0).abs() < 1e-9);
        assert!(rendered.offset_y.abs() < 1e-9);
    }

    #[test]
    fn test_portrait_container_letterboxes_vertically() {
        let rendered = rendered_image_box(400.0, 300.0, 400.0, 600.0).unwrap();
        assert!((rendered.width - 400.0).abs() < 1e-9);
        assert!((rendered.height - 300.0).abs() < 1e-9);
        assert!(rendered.offset_x.abs() < 1e-9);
        assert!((rendered.offset_y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentages_reproduce_pixel_rect_on_rendered_box() {
        let (natural_w, natural_h) = (400.0, 300.0);
        let rendered = rendered_image_box(natural_w, natural_h, 800.0, 400.0).unwrap();
        let scale = rendered.width / natural_w;

        let d = detection(
            "oocyte",
            0.97,
            Some(BoundingBox {
                x1: 25.0,
                y1: 40.0,
                x2: 150.0,
                y2: 200.0,
            }),
        );
        let rect = project_bbox(&d, natural_w, natural_h).unwrap();

        // Applying the percentages to the rendered box must land on the
        // original pixel rectangle scaled into screen space.
        let left_px = rect.left / 100.0 * rendered.width;
        let top_px = rect.top / 100.0 * rendered.height;
        let width_px = rect.width / 100.0 * rendered.width;
        let height_px = rect.height / 100.0 * rendered.height;

        assert!((left_px - 25.0 * scale).abs() < 1e-6);
        assert!((top_px - 40.0 * scale).abs() < 1e-6);
        assert!((width_px - 125.0 * scale).abs() < 1e-6);
        assert!((height_px - 160.0 * scale).abs() < 1e-6);
    }

    #[test]
    fn test_zero_dimensions_suppress_overlay() {
        assert!(rendered_image_box(0.0, 300.0, 800.0, 400.0).is_none());
        assert!(rendered_image_box(400.0, 300.0, 800.0, 0.0).is_none());

        let d = detection(
            "oocyte",
            0.9,
            Some(BoundingBox {
                x1: 0.0,
                y1: 0.0,
                x2: 10.0,
                y2: 10.0,
            }),
        );
        assert!(project_bbox(&d, 0.0, 300.0).is_none());
        assert!(project_detections(std::slice::from_ref(&d), 0.0, 300.0).is_empty());
    }

    #[test]
    fn test_detections_without_bbox_are_skipped() {
        let detections = vec![
            detection(
                "oocyte",
                0.972,
                Some(BoundingBox {
                    x1: 10.0,
                    y1: 10.0,
                    x2: 20.0,
                    y2: 20.0,
                }),
            ),
            detection("polarbody", 0.5, None),
        ];
        let boxes = project_detections(&detections, 100.0, 100.0);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].color, "#FF6B9D");
        assert_eq!(boxes[0].label, "oocyte 97.2%");
    }

    #[test]
    fn test_class_colors() {
        assert_eq!(class_color("oocyte"), "#FF6B9D");
        assert_eq!(class_color("cytoplasm"), "#C2185B");
        assert_eq!(class_color("polarbody"), "#FFB84D");
        assert_eq!(class_color("pb"), "#6B9DFF");
        assert_eq!(class_color("something-new"), "#FFFFFF");
    }
}
