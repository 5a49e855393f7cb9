//! Drawing surface with a geographic projection.
//!
//! A `Canvas` owns a square pixmap and an equirectangular mapping from
//! the render extent (the union box of all tracks, plus a margin) into
//! the plot area. All drawing primitives take geographic coordinates;
//! projection happens in one place.

use tiny_skia::{LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

use track_common::{BoundingBox, GeoPoint, TrackError, TrackResult};

use crate::glyphs::{self, HAlign, VAlign};

/// Square output surface, 8 inches at 300 dpi.
pub const CANVAS_SIZE_PX: u32 = 2400;

/// Fraction of the canvas left as margin on each side.
const MARGIN_FRAC: f32 = 0.05;

/// Substitute span when the extent is degenerate along an axis, so a
/// perfectly straight (or single-position) track still projects.
const FALLBACK_SPAN_DEG: f64 = 0.001;

/// Half-length of a distance-marker tick, in degrees.
pub const TICK_HALF_LENGTH_DEG: f64 = 0.0005;

pub struct Canvas {
    pixmap: Pixmap,
    extent: BoundingBox,
    lon_span: f64,
    lat_span: f64,
    plot_origin: f32,
    plot_size: f32,
}

impl Canvas {
    /// Create a canvas projecting `extent` into the plot area.
    pub fn new(extent: BoundingBox) -> TrackResult<Self> {
        let pixmap =
            Pixmap::new(CANVAS_SIZE_PX, CANVAS_SIZE_PX).ok_or(TrackError::RenderFailed {
                reason: format!("cannot allocate {CANVAS_SIZE_PX}x{CANVAS_SIZE_PX} pixmap"),
            })?;

        let lon_span = extent.width().max(FALLBACK_SPAN_DEG);
        let lat_span = extent.height().max(FALLBACK_SPAN_DEG);
        let margin = CANVAS_SIZE_PX as f32 * MARGIN_FRAC;

        Ok(Self {
            pixmap,
            extent,
            lon_span,
            lat_span,
            plot_origin: margin,
            plot_size: CANVAS_SIZE_PX as f32 - 2.0 * margin,
        })
    }

    /// Project a geographic point into pixel coordinates. North is up,
    /// so latitude inverts against the pixmap's downward y axis.
    pub fn project(&self, p: &GeoPoint) -> (f32, f32) {
        let fx = (p.lon - self.extent.min_lon) / self.lon_span;
        let fy = (p.lat - self.extent.min_lat) / self.lat_span;
        (
            self.plot_origin + fx as f32 * self.plot_size,
            self.plot_origin + (1.0 - fy as f32) * self.plot_size,
        )
    }

    /// Stroke the track polyline through every point in order.
    pub fn draw_polyline(&mut self, points: &[GeoPoint], width_px: f32, color: [u8; 4]) {
        let mut pb = PathBuilder::new();
        for (i, p) in points.iter().enumerate() {
            let (x, y) = self.project(p);
            if i == 0 {
                pb.move_to(x, y);
            } else {
                pb.line_to(x, y);
            }
        }
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: width_px,
            line_cap: LineCap::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Filled circle marker.
    pub fn draw_dot(&mut self, at: &GeoPoint, radius_px: f32, color: [u8; 4]) {
        let (x, y) = self.project(at);
        let mut pb = PathBuilder::new();
        pb.push_circle(x, y, radius_px);
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
        paint.anti_alias = true;
        self.pixmap.fill_path(
            &path,
            &paint,
            tiny_skia::FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    /// X-shaped marker spanning `2 * half_px` on each diagonal.
    pub fn draw_cross(&mut self, at: &GeoPoint, half_px: f32, width_px: f32, color: [u8; 4]) {
        let (x, y) = self.project(at);
        let mut pb = PathBuilder::new();
        pb.move_to(x - half_px, y - half_px);
        pb.line_to(x + half_px, y + half_px);
        pb.move_to(x - half_px, y + half_px);
        pb.line_to(x + half_px, y - half_px);
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: width_px,
            line_cap: LineCap::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Short segment across the track at a distance marker. `perp` is a
    /// unit vector in the lon/lat plane; the tick runs from the marker
    /// position shifted by `-perp` to `+perp`, scaled by the fixed
    /// half-length in degrees.
    pub fn draw_tick(&mut self, at: &GeoPoint, perp: (f64, f64), width_px: f32, color: [u8; 4]) {
        let a = GeoPoint::new(
            at.lat - perp.1 * TICK_HALF_LENGTH_DEG,
            at.lon - perp.0 * TICK_HALF_LENGTH_DEG,
        );
        let b = GeoPoint::new(
            at.lat + perp.1 * TICK_HALF_LENGTH_DEG,
            at.lon + perp.0 * TICK_HALF_LENGTH_DEG,
        );
        let (x1, y1) = self.project(&a);
        let (x2, y2) = self.project(&b);

        let mut pb = PathBuilder::new();
        pb.move_to(x1, y1);
        pb.line_to(x2, y2);
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: width_px,
            line_cap: LineCap::Butt,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Text anchored at a geographic position, with a small pixel
    /// offset so labels clear the marker they annotate.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_label(
        &mut self,
        at: &GeoPoint,
        offset_px: (f32, f32),
        text: &str,
        size_px: f32,
        color: [u8; 4],
        halign: HAlign,
        valign: VAlign,
    ) {
        let (x, y) = self.project(at);
        glyphs::draw_text(
            &mut self.pixmap,
            x + offset_px.0,
            y + offset_px.1,
            text,
            size_px,
            color,
            halign,
            valign,
        );
    }

    /// Faint corner coordinates, written at the raw extent corners so
    /// downstream tooling can recover the geographic frame from the
    /// image alone. Each corner reads "lat;lon" at 15 decimals and is
    /// anchored toward the canvas interior.
    pub fn draw_corner_annotations(&mut self, extent: &BoundingBox, size_px: f32, color: [u8; 4]) {
        let [tl, tr, br, bl] = extent.corners();
        let anchors = [
            (tl, HAlign::Left, VAlign::Top),
            (tr, HAlign::Right, VAlign::Top),
            (br, HAlign::Right, VAlign::Bottom),
            (bl, HAlign::Left, VAlign::Bottom),
        ];
        for (corner, halign, valign) in anchors {
            let text = format!("{:.15};{:.15}", corner.lat, corner.lon);
            self.draw_label(&corner, (0.0, 0.0), &text, size_px, color, halign, valign);
        }
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }
}
