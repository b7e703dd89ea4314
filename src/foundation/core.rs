use crate::foundation::error::{SwapError, SwapResult};

pub use kurbo::{BezPath, Point, Rect};

/// Opaque RGB triple.
pub type Rgb8 = [u8; 3];

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> SwapResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    pub fn validate(self) -> SwapResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SwapError::configuration(
                "image width/height must be non-zero",
            ));
        }
        if u16::try_from(self.width).is_err() || u16::try_from(self.height).is_err() {
            return Err(SwapError::configuration(
                "image width/height must fit in 16 bits",
            ));
        }
        Ok(())
    }

    pub fn center(self) -> Point {
        Point::new(f64::from(self.width / 2), f64::from(self.height / 2))
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_rejects_zero_and_oversized_dimensions() {
        assert!(Canvas::new(0, 10).is_err());
        assert!(Canvas::new(10, 0).is_err());
        assert!(Canvas::new(70_000, 10).is_err());
        assert!(Canvas::new(512, 512).is_ok());
    }

    #[test]
    fn center_uses_integer_halves() {
        let c = Canvas {
            width: 513,
            height: 301,
        };
        assert_eq!(c.center(), Point::new(256.0, 150.0));
    }
}
