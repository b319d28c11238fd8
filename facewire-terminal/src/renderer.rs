/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use facewire_core::{Canvas, Rgb};
use std::io::Write;

/// Character luminosity ramp for ink coverage (emptiest to fullest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Converts rendered canvases into a grid of terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            char_buffer: vec![' '; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.char_buffer = vec![' '; width * height];
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
    }

    /// Sample `canvas` into the character grid. Each cell covers an equal
    /// block of pixels and shows how far their brightness departs from
    /// `background`.
    pub fn render_canvas(&mut self, canvas: &Canvas, background: Rgb) {
        self.clear();
        if self.width == 0 || self.height == 0 {
            return;
        }
        let cell_w = (canvas.width() as usize / self.width).max(1);
        let cell_h = (canvas.height() as usize / self.height).max(1);
        let base = background.luminance();

        for row in 0..self.height {
            for col in 0..self.width {
                let mut contrast = 0.0;
                let mut count = 0;
                for y in row * cell_h..(row + 1) * cell_h {
                    for x in col * cell_w..(col + 1) * cell_w {
                        if let Some(px) = canvas.get_pixel(x as u32, y as u32) {
                            contrast += (px.luminance() - base).abs();
                            count += 1;
                        }
                    }
                }
                if count > 0 {
                    self.char_buffer[row * self.width + col] = ramp_char(contrast / count as f32);
                }
            }
        }
    }

    /// One row of the grid as a string
    pub fn row(&self, y: usize) -> String {
        self.char_buffer[y * self.width..(y + 1) * self.width]
            .iter()
            .collect()
    }

    /// Queue the grid starting at terminal row `top`
    pub fn draw<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(MoveTo(0, top + y as u16))?;
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn ramp_char(coverage: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (coverage.clamp(0.0, 1.0) * last as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(last)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use facewire_core::geometry::{Curve2, ProjectedWireframe};
    use facewire_core::raster::{rasterize, FitPolicy, RenderOptions, RenderStyle};
    use nalgebra::Point2;

    #[test]
    fn test_ramp_ends() {
        assert_eq!(ramp_char(0.0), ' ');
        assert_eq!(ramp_char(1.0), '@');
        assert_eq!(ramp_char(0.5), '+');
        assert_eq!(ramp_char(2.0), '@');
    }

    #[test]
    fn test_blank_canvas_is_blank() {
        let canvas = Canvas::new(20, 10, Rgb::WHITE);
        let mut renderer = AsciiRenderer::new(10, 5);
        renderer.render_canvas(&canvas, Rgb::WHITE);
        for y in 0..5 {
            assert_eq!(renderer.row(y), " ".repeat(10));
        }
    }

    #[test]
    fn test_horizontal_stroke_shows_up() {
        let projected = ProjectedWireframe {
            curves: vec![Curve2 {
                name: "line".into(),
                points: vec![Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0)],
            }],
            eyes: Vec::new(),
        };
        let options = RenderOptions {
            width: 20,
            height: 20,
            line_thickness: 1,
            fit: FitPolicy::Fixed,
            style: RenderStyle::light(),
        };
        let canvas = rasterize(&projected, &options);
        let mut renderer = AsciiRenderer::new(10, 10);
        renderer.render_canvas(&canvas, Rgb::WHITE);

        // the line lands on pixel row 10, which is cell row 5
        assert!(renderer.row(5).chars().all(|c| c != ' '));
        assert_eq!(renderer.row(0), " ".repeat(10));
    }

    #[test]
    fn test_resize_and_draw() {
        let mut renderer = AsciiRenderer::new(4, 2);
        renderer.resize(3, 3);
        assert_eq!((renderer.width(), renderer.height()), (3, 3));

        let mut out = Vec::new();
        renderer.draw(&mut out, 1).unwrap();
        assert!(!out.is_empty());
    }
}
