//! Stroked vector glyphs for canvas labels.
//!
//! The renderer ships no font asset, so label text is drawn as short
//! stroked segments per character (seven-segment style digits plus the
//! handful of letters the fixed labels need). Unknown characters are
//! skipped, advancing the pen as if they were drawn.

use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Horizontal anchoring of a text run relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Right,
}

/// Vertical anchoring of a text run relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Bottom,
}

/// Width of a rendered text run in pixels, including inter-character
/// spacing.
pub fn text_width(text: &str, size_px: f32) -> f32 {
    let chars = text.chars().count() as f32;
    if chars == 0.0 {
        return 0.0;
    }
    chars * (char_width(size_px) + char_spacing(size_px)) - char_spacing(size_px)
}

fn char_width(size_px: f32) -> f32 {
    size_px * 0.6
}

fn char_spacing(size_px: f32) -> f32 {
    size_px * 0.1
}

/// Draw a text run anchored at `(x, y)`.
#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    text: &str,
    size_px: f32,
    color: [u8; 4],
    halign: HAlign,
    valign: VAlign,
) {
    let width = text_width(text, size_px);
    let start_x = match halign {
        HAlign::Left => x,
        HAlign::Right => x - width,
    };
    // Glyph segments are centered on the character cell.
    let center_y = match valign {
        VAlign::Top => y + size_px / 2.0,
        VAlign::Bottom => y - size_px / 2.0,
    };

    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: (size_px * 0.09).max(1.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };

    let half_w = char_width(size_px) / 2.0;
    let half_h = size_px / 2.0;
    let advance = char_width(size_px) + char_spacing(size_px);

    for (i, ch) in text.chars().enumerate() {
        let cx = start_x + i as f32 * advance + half_w;
        let mut pb = PathBuilder::new();
        for &((x1, y1), (x2, y2)) in glyph_segments(ch) {
            pb.move_to(cx + x1 * half_w, center_y + y1 * half_h);
            pb.line_to(cx + x2 * half_w, center_y + y2 * half_h);
        }
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }
}

type Seg = ((f32, f32), (f32, f32));

/// Stroke segments for one character, in a cell normalized to
/// `[-1, 1]` on both axes with y growing downward.
pub fn glyph_segments(ch: char) -> &'static [Seg] {
    match ch {
        '0' => &[
            ((-1.0, -1.0), (1.0, -1.0)),
            ((1.0, -1.0), (1.0, 1.0)),
            ((1.0, 1.0), (-1.0, 1.0)),
            ((-1.0, 1.0), (-1.0, -1.0)),
        ],
        '1' => &[((0.0, -1.0), (0.0, 1.0))],
        '2' => &[
            ((-1.0, -1.0), (1.0, -1.0)),
            ((1.0, -1.0), (1.0, 0.0)),
            ((1.0, 0.0), (-1.0, 0.0)),
            ((-1.0, 0.0), (-1.0, 1.0)),
            ((-1.0, 1.0), (1.0, 1.0)),
        ],
        '3' => &[
            ((-1.0, -1.0), (1.0, -1.0)),
            ((1.0, -1.0), (1.0, 1.0)),
            ((1.0, 1.0), (-1.0, 1.0)),
            ((-1.0, 0.0), (1.0, 0.0)),
        ],
        '4' => &[
            ((-1.0, -1.0), (-1.0, 0.0)),
            ((-1.0, 0.0), (1.0, 0.0)),
            ((1.0, -1.0), (1.0, 1.0)),
        ],
        '5' => &[
            ((1.0, -1.0), (-1.0, -1.0)),
            ((-1.0, -1.0), (-1.0, 0.0)),
            ((-1.0, 0.0), (1.0, 0.0)),
            ((1.0, 0.0), (1.0, 1.0)),
            ((1.0, 1.0), (-1.0, 1.0)),
        ],
        '6' => &[
            ((1.0, -1.0), (-1.0, -1.0)),
            ((-1.0, -1.0), (-1.0, 1.0)),
            ((-1.0, 1.0), (1.0, 1.0)),
            ((1.0, 1.0), (1.0, 0.0)),
            ((1.0, 0.0), (-1.0, 0.0)),
        ],
        '7' => &[((-1.0, -1.0), (1.0, -1.0)), ((1.0, -1.0), (0.0, 1.0))],
        '8' => &[
            ((-1.0, -1.0), (1.0, -1.0)),
            ((1.0, -1.0), (1.0, 1.0)),
            ((1.0, 1.0), (-1.0, 1.0)),
            ((-1.0, 1.0), (-1.0, -1.0)),
            ((-1.0, 0.0), (1.0, 0.0)),
        ],
        '9' => &[
            ((1.0, 0.0), (-1.0, 0.0)),
            ((-1.0, 0.0), (-1.0, -1.0)),
            ((-1.0, -1.0), (1.0, -1.0)),
            ((1.0, -1.0), (1.0, 1.0)),
        ],
        '-' => &[((-1.0, 0.0), (1.0, 0.0))],
        '.' => &[((0.0, 0.8), (0.0, 1.0))],
        ';' => &[((0.0, -0.4), (0.0, -0.2)), ((0.1, 0.6), (-0.1, 1.0))],
        // Letters for the fixed labels: "km", "m", "Start", "End".
        'k' => &[
            ((-1.0, -1.0), (-1.0, 1.0)),
            ((-1.0, 0.2), (1.0, -0.6)),
            ((-0.4, 0.0), (1.0, 1.0)),
        ],
        'm' => &[
            ((-1.0, 1.0), (-1.0, -0.2)),
            ((0.0, 1.0), (0.0, -0.2)),
            ((1.0, 1.0), (1.0, -0.2)),
            ((-1.0, -0.2), (1.0, -0.2)),
        ],
        'n' => &[
            ((-1.0, 1.0), (-1.0, -0.2)),
            ((1.0, 1.0), (1.0, -0.2)),
            ((-1.0, -0.2), (1.0, -0.2)),
        ],
        'a' => &[
            ((-1.0, -0.2), (1.0, -0.2)),
            ((1.0, -0.2), (1.0, 1.0)),
            ((1.0, 1.0), (-1.0, 1.0)),
            ((-1.0, 1.0), (-1.0, 0.4)),
            ((-1.0, 0.4), (1.0, 0.4)),
        ],
        'r' => &[((-1.0, 1.0), (-1.0, -0.2)), ((-1.0, 0.0), (1.0, -0.2))],
        't' => &[
            ((0.0, -1.0), (0.0, 1.0)),
            ((0.0, 1.0), (0.6, 1.0)),
            ((-0.8, -0.4), (0.8, -0.4)),
        ],
        'd' => &[
            ((1.0, -1.0), (1.0, 1.0)),
            ((1.0, 1.0), (-1.0, 1.0)),
            ((-1.0, 1.0), (-1.0, -0.2)),
            ((-1.0, -0.2), (1.0, -0.2)),
        ],
        'S' => &[
            ((1.0, -1.0), (-1.0, -1.0)),
            ((-1.0, -1.0), (-1.0, 0.0)),
            ((-1.0, 0.0), (1.0, 0.0)),
            ((1.0, 0.0), (1.0, 1.0)),
            ((1.0, 1.0), (-1.0, 1.0)),
        ],
        'E' => &[
            ((1.0, -1.0), (-1.0, -1.0)),
            ((-1.0, -1.0), (-1.0, 1.0)),
            ((-1.0, 1.0), (1.0, 1.0)),
            ((-1.0, 0.0), (0.6, 0.0)),
        ],
        _ => &[],
    }
}
