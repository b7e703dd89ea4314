use std::f64::consts::{FRAC_PI_2, PI};

use kurbo::Shape as _;

use crate::{
    foundation::core::{BezPath, Point, Rect},
    palette::Shape,
};

const CURVE_TOLERANCE: f64 = 0.1;
const STAR_INNER_RATIO: f64 = 0.4;

/// Outline of `shape` inscribed in the `size`×`size` box centred on `center`.
pub fn shape_path(shape: Shape, center: Point, size: f64) -> BezPath {
    let h = size / 2.0;
    match shape {
        Shape::Circle => kurbo::Circle::new(center, h).to_path(CURVE_TOLERANCE),
        Shape::Square => symbol_box(center, size).to_path(CURVE_TOLERANCE),
        Shape::Triangle => {
            // Equilateral, apex up, full width, vertically centred in the box.
            let tri_h = size * 3f64.sqrt() / 2.0;
            let top = center.y - tri_h / 2.0;
            let bottom = center.y + tri_h / 2.0;
            polygon(&[
                Point::new(center.x, top),
                Point::new(center.x - h, bottom),
                Point::new(center.x + h, bottom),
            ])
        }
        Shape::Star => {
            let pts: Vec<Point> = (0..10)
                .map(|i| {
                    let r = if i % 2 == 0 { h } else { h * STAR_INNER_RATIO };
                    polar(center, r, f64::from(i) * PI / 5.0 - FRAC_PI_2)
                })
                .collect();
            polygon(&pts)
        }
        Shape::Diamond => polygon(&[
            Point::new(center.x, center.y - h),
            Point::new(center.x + h, center.y),
            Point::new(center.x, center.y + h),
            Point::new(center.x - h, center.y),
        ]),
        Shape::Hexagon => {
            // Flat top: first vertex on the positive x axis.
            let pts: Vec<Point> = (0..6)
                .map(|i| polar(center, h, f64::from(i) * PI / 3.0))
                .collect();
            polygon(&pts)
        }
    }
}

pub fn symbol_box(center: Point, size: f64) -> Rect {
    let h = size / 2.0;
    Rect::new(center.x - h, center.y - h, center.x + h, center.y + h)
}

/// Filled region of a `stroke_width` outline centred on `path`.
pub fn outline_path(path: &BezPath, stroke_width: f64) -> BezPath {
    kurbo::stroke(
        path.iter(),
        &kurbo::Stroke::new(stroke_width).with_join(kurbo::Join::Miter),
        &kurbo::StrokeOpts::default(),
        CURVE_TOLERANCE,
    )
}

/// Square frame whose outer edge is `half_extent` from `center`, `thickness` thick, drawn
/// inward. Outer and inner loops wind in opposite directions so either fill rule leaves
/// the hole open.
pub fn border_ring(center: Point, half_extent: f64, thickness: f64) -> BezPath {
    let outer = half_extent;
    let inner = (half_extent - thickness).max(0.0);

    let mut p = BezPath::new();
    p.move_to((center.x - outer, center.y - outer));
    p.line_to((center.x + outer, center.y - outer));
    p.line_to((center.x + outer, center.y + outer));
    p.line_to((center.x - outer, center.y + outer));
    p.close_path();

    if inner > 0.0 {
        p.move_to((center.x - inner, center.y - inner));
        p.line_to((center.x - inner, center.y + inner));
        p.line_to((center.x + inner, center.y + inner));
        p.line_to((center.x + inner, center.y - inner));
        p.close_path();
    }
    p
}

fn polar(center: Point, r: f64, angle: f64) -> Point {
    Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
}

fn polygon(pts: &[Point]) -> BezPath {
    let mut p = BezPath::new();
    let Some((first, rest)) = pts.split_first() else {
        return p;
    };
    p.move_to(*first);
    for pt in rest {
        p.line_to(*pt);
    }
    p.close_path();
    p
}
