// Drawing of bounding boxes and emotion labels onto a frame

use crate::error::Result;
use crate::models::{BoundingBox, Frame};
use opencv::core::{Point, Rect, Scalar};
use opencv::imgproc;
use opencv::prelude::*;

/// Rectangle outline color, RGB
const BOX_COLOR: (f64, f64, f64) = (0.0, 255.0, 12.0);
/// Label text color, RGB
const TEXT_COLOR: (f64, f64, f64) = (36.0, 255.0, 12.0);
/// Stroke thickness for both the outline and the text
const THICKNESS: i32 = 2;
/// Hershey simplex font scale for the label
const FONT_SCALE: f64 = 0.9;
/// Vertical gap between the label baseline and the box top edge
const LABEL_OFFSET: i32 = 10;

/// Draws a rectangle outline at `bbox` and the label text 10 px above its
/// top edge, mutating `frame` in place.
///
/// Labels of adjacent boxes may overlap; there is no collision handling.
pub fn annotate(frame: &mut Frame, bbox: &BoundingBox, label: &str) -> Result<()> {
    let mut mat = frame.to_mat()?;

    let rect = Rect::new(
        bbox.x as i32,
        bbox.y as i32,
        bbox.width as i32,
        bbox.height as i32,
    );
    imgproc::rectangle(
        &mut mat,
        rect,
        Scalar::new(BOX_COLOR.0, BOX_COLOR.1, BOX_COLOR.2, 0.0),
        THICKNESS,
        imgproc::LINE_8,
        0,
    )?;

    // A label near the image top renders partially clipped, matching the
    // rectangle's own edge clipping.
    let origin = Point::new(bbox.x as i32, bbox.y as i32 - LABEL_OFFSET);
    imgproc::put_text(
        &mut mat,
        label,
        origin,
        imgproc::FONT_HERSHEY_SIMPLEX,
        FONT_SCALE,
        Scalar::new(TEXT_COLOR.0, TEXT_COLOR.1, TEXT_COLOR.2, 0.0),
        THICKNESS,
        imgproc::LINE_8,
        false,
    )?;

    let data = mat.data_bytes()?;
    frame.data.copy_from_slice(data);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_frame(width: u32, height: u32) -> Frame {
        Frame::new(vec![0u8; (width * height * 3) as usize], width, height)
    }

    fn pixel(frame: &Frame, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y * frame.width + x) * 3) as usize;
        [frame.data[idx], frame.data[idx + 1], frame.data[idx + 2]]
    }

    #[test]
    fn rectangle_outline_is_drawn_in_box_color() {
        let mut frame = black_frame(200, 200);
        let bbox = BoundingBox {
            x: 60,
            y: 60,
            width: 80,
            height: 80,
        };
        annotate(&mut frame, &bbox, "Feliz").unwrap();

        // top-left corner of the outline
        assert_eq!(pixel(&frame, 60, 60), [0, 255, 12]);
        // center of the box stays untouched
        assert_eq!(pixel(&frame, 100, 100), [0, 0, 0]);
    }

    #[test]
    fn label_is_drawn_above_the_box() {
        let mut frame = black_frame(200, 200);
        let bbox = BoundingBox {
            x: 60,
            y: 60,
            width: 80,
            height: 80,
        };
        annotate(&mut frame, &bbox, "Feliz").unwrap();

        // some text pixels land in the band above the box top edge
        let band_changed = (25..50).any(|y| (60..140).any(|x| pixel(&frame, x, y) != [0, 0, 0]));
        assert!(band_changed, "no label pixels above the box");
    }

    #[test]
    fn pixels_far_from_the_box_are_untouched() {
        let mut frame = black_frame(200, 200);
        let bbox = BoundingBox {
            x: 60,
            y: 60,
            width: 40,
            height: 40,
        };
        annotate(&mut frame, &bbox, "Triste").unwrap();

        for &(x, y) in &[(0, 0), (199, 199), (10, 190), (199, 0)] {
            assert_eq!(pixel(&frame, x, y), [0, 0, 0]);
        }
    }

    #[test]
    fn annotation_near_the_top_edge_does_not_fail() {
        let mut frame = black_frame(100, 100);
        let bbox = BoundingBox {
            x: 5,
            y: 3,
            width: 40,
            height: 40,
        };
        // label origin lies above the image; the text is clipped, not an error
        annotate(&mut frame, &bbox, "Sorprendido").unwrap();
        assert_eq!(pixel(&frame, 5, 3), [0, 255, 12]);
    }
}
