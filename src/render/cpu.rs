use crate::{
    foundation::core::{BezPath, Point, Rgb8},
    foundation::error::{SwapError, SwapResult},
    palette::SymbolIdentity,
    render::{
        DrawOp, FramePlan, FrameRGBA, RenderSettings,
        geometry::{border_ring, outline_path, shape_path},
    },
};

const OUTLINE_RGB: Rgb8 = [0, 0, 0];

/// Software rasterizer over `vello_cpu`. Stateless between frames, so one instance can be
/// shared across worker threads.
pub struct CpuRasterizer {
    settings: RenderSettings,
    width: u16,
    height: u16,
}

impl CpuRasterizer {
    pub fn new(settings: RenderSettings) -> SwapResult<Self> {
        let width: u16 = settings
            .canvas
            .width
            .try_into()
            .map_err(|_| SwapError::configuration("image width exceeds u16"))?;
        let height: u16 = settings
            .canvas
            .height
            .try_into()
            .map_err(|_| SwapError::configuration("image height exceeds u16"))?;
        Ok(Self {
            settings,
            width,
            height,
        })
    }

    pub fn rasterize(&self, plan: &FramePlan) -> SwapResult<FrameRGBA> {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);

        set_solid_paint(&mut ctx, self.settings.background, 255);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));

        for op in &plan.ops {
            match *op {
                DrawOp::Symbol {
                    identity,
                    center,
                    opacity,
                } => self.draw_symbol(&mut ctx, identity, center, opacity),
                DrawOp::Border { center, opacity } => self.draw_border(&mut ctx, center, opacity),
            }
        }

        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        let data = pixmap.data_as_u8_slice().to_vec();
        if data.len() != self.settings.canvas.pixel_count() * 4 {
            return Err(SwapError::render(
                "rasterized pixmap size mismatch with width*height*4",
            ));
        }
        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data,
            premultiplied: true,
        })
    }

    fn draw_symbol(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        identity: SymbolIdentity,
        center: Point,
        opacity: f32,
    ) {
        if opacity <= 0.0 {
            return;
        }
        let path = shape_path(identity.shape, center, self.settings.symbol_size);

        // Fill and outline share one layer so the outline does not double-blend over the
        // fill edge at partial opacity.
        with_opacity(ctx, opacity, |ctx| {
            set_solid_paint(ctx, identity.rgb(), 255);
            ctx.fill_path(&bezpath_to_cpu(&path));

            if self.settings.outline_width > 0.0 {
                let outline = outline_path(&path, self.settings.outline_width);
                set_solid_paint(ctx, OUTLINE_RGB, 255);
                ctx.fill_path(&bezpath_to_cpu(&outline));
            }
        });
    }

    fn draw_border(&self, ctx: &mut vello_cpu::RenderContext, center: Point, opacity: f32) {
        if opacity <= 0.0 {
            return;
        }
        let border = self.settings.border;
        let ring = border_ring(center, self.settings.border_half_extent(), border.width);
        with_opacity(ctx, opacity, |ctx| {
            set_solid_paint(ctx, border.color, 255);
            ctx.fill_path(&bezpath_to_cpu(&ring));
        });
    }
}

fn with_opacity(
    ctx: &mut vello_cpu::RenderContext,
    opacity: f32,
    f: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    let layered = opacity < 1.0;
    if layered {
        ctx.push_opacity_layer(opacity);
    }
    f(ctx);
    if layered {
        ctx.pop_layer();
    }
}

fn set_solid_paint(ctx: &mut vello_cpu::RenderContext, rgb: Rgb8, a: u8) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(rgb[0], rgb[1], rgb[2], a));
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
