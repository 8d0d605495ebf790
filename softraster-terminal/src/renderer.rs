/// Half-block presenter: two color-buffer pixels per terminal cell
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use softraster_core::{Color as Rgba, ColorBuffer};
use std::io::Write;

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '▀';

/// Owns the color buffer the frame is rendered into and writes it to a terminal
pub struct HalfBlockRenderer {
    columns: usize,
    rows: usize,
    /// First terminal row used for output
    top: u16,
    color_buffer: ColorBuffer,
}

impl HalfBlockRenderer {
    /// `rows` terminal rows starting at row `top`
    pub fn new(columns: usize, rows: usize, top: u16) -> Self {
        Self {
            columns,
            rows,
            top,
            color_buffer: ColorBuffer::new(columns, rows * 2, Rgba::BLACK),
        }
    }

    pub fn resize(&mut self, columns: usize, rows: usize) {
        self.columns = columns;
        self.rows = rows;
        self.color_buffer.resize(columns, rows * 2, Rgba::BLACK);
    }

    /// Color buffer dimensions in pixels
    pub fn pixel_size(&self) -> (usize, usize) {
        (self.color_buffer.width(), self.color_buffer.height())
    }

    pub fn color_buffer_mut(&mut self) -> &mut ColorBuffer {
        &mut self.color_buffer
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<(Rgba, Rgba)> = None;

        for row in 0..self.rows {
            writer.queue(MoveTo(0, self.top + row as u16))?;

            for column in 0..self.columns {
                let upper = self.color_buffer.get(column, row * 2).unwrap_or_default();
                let lower = self.color_buffer.get(column, row * 2 + 1).unwrap_or_default();

                // Only emit color changes
                if current != Some((upper, lower)) {
                    writer.queue(SetForegroundColor(to_terminal(upper)))?;
                    writer.queue(SetBackgroundColor(to_terminal(lower)))?;
                    current = Some((upper, lower));
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn to_terminal(color: Rgba) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_size_is_double_height() {
        let mut renderer = HalfBlockRenderer::new(80, 23, 1);
        assert_eq!(renderer.pixel_size(), (80, 46));

        renderer.resize(100, 30);
        assert_eq!(renderer.pixel_size(), (100, 60));
    }

    #[test]
    fn test_draw_emits_one_block_per_cell() {
        let mut renderer = HalfBlockRenderer::new(3, 2, 0);
        renderer.color_buffer_mut().set(1, 3, Rgba::RED);

        let mut output = Vec::new();
        renderer.draw(&mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert_eq!(text.matches(HALF_BLOCK).count(), 6);
        // Black everywhere except the bottom pixel of the middle lower cell
        assert!(text.contains("48;2;255;0;0"));
    }
}
