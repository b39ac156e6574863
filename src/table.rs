//! Grid-theme tables: full cell borders, optional shaded header row, wrapped
//! cell text. Tables self-measure while drawing and report their final
//! vertical position back to the cursor, so the same row layout drives both
//! `measure` and `draw`.

use printpdf::{Color, Op};

use crate::fonts::{TextMeasurer, MM_PER_PT};
use crate::render::{black, draw_text, fill_rect, rgb, stroke_rect};

const CELL_PADDING_MM: f32 = 2.0;
const LINE_FACTOR: f32 = 1.3;

fn grid_line_color() -> Color {
    rgb(110, 110, 110)
}

fn head_fill_color() -> Color {
    rgb(230, 230, 230)
}

/// One table with fixed column widths. Cell strings may contain embedded
/// newlines; every cell is additionally word-wrapped to its column.
pub struct GridTable {
    columns: Vec<f32>,
    head: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
    font_size: f32,
    bold_body: bool,
}

struct RowLayout {
    /// Wrapped lines per cell.
    cells: Vec<Vec<String>>,
    height: f32,
}

impl GridTable {
    pub fn new(columns: Vec<f32>, font_size: f32) -> Self {
        Self {
            columns,
            head: None,
            rows: Vec::new(),
            font_size,
            bold_body: false,
        }
    }

    pub fn with_head(mut self, head: Vec<String>) -> Self {
        self.head = Some(head);
        self
    }

    pub fn with_bold_body(mut self) -> Self {
        self.bold_body = true;
        self
    }

    pub fn add_row(mut self, row: Vec<String>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn width(&self) -> f32 {
        self.columns.iter().sum()
    }

    fn line_height(&self) -> f32 {
        self.font_size * MM_PER_PT * LINE_FACTOR
    }

    fn layout_row(&self, measurer: &TextMeasurer, row: &[String], bold: bool) -> RowLayout {
        let line_h = self.line_height();
        let mut cells = Vec::with_capacity(self.columns.len());
        let mut max_lines = 1usize;
        for (i, width) in self.columns.iter().enumerate() {
            let text = row.get(i).map(String::as_str).unwrap_or("");
            let inner = width - 2.0 * CELL_PADDING_MM;
            let lines = measurer.wrap_to_width(text, self.font_size, bold, inner);
            max_lines = max_lines.max(lines.len());
            cells.push(lines);
        }
        RowLayout {
            cells,
            height: max_lines as f32 * line_h + 2.0 * CELL_PADDING_MM,
        }
    }

    fn layout(&self, measurer: &TextMeasurer) -> (Option<RowLayout>, Vec<RowLayout>) {
        let head = self
            .head
            .as_ref()
            .map(|h| self.layout_row(measurer, h, true));
        let rows = self
            .rows
            .iter()
            .map(|r| self.layout_row(measurer, r, self.bold_body))
            .collect();
        (head, rows)
    }

    /// Total height the table will consume when drawn.
    pub fn measure(&self, measurer: &TextMeasurer) -> f32 {
        let (head, rows) = self.layout(measurer);
        head.map(|r| r.height).unwrap_or(0.0) + rows.iter().map(|r| r.height).sum::<f32>()
    }

    /// Draw at (`x_mm`, `y_top_mm`) and return the final bottom Y.
    pub fn draw(
        &self,
        measurer: &TextMeasurer,
        ops: &mut Vec<Op>,
        x_mm: f32,
        y_top_mm: f32,
        page_h_mm: f32,
    ) -> f32 {
        let (head, rows) = self.layout(measurer);
        let mut y = y_top_mm;

        if let Some(layout) = head {
            fill_rect(
                ops,
                x_mm,
                y,
                self.width(),
                layout.height,
                head_fill_color(),
                page_h_mm,
            );
            self.draw_row(ops, &layout, true, x_mm, y, page_h_mm);
            y += layout.height;
        }
        for layout in &rows {
            self.draw_row(ops, layout, self.bold_body, x_mm, y, page_h_mm);
            y += layout.height;
        }
        y
    }

    fn draw_row(
        &self,
        ops: &mut Vec<Op>,
        layout: &RowLayout,
        bold: bool,
        x_mm: f32,
        y_top_mm: f32,
        page_h_mm: f32,
    ) {
        let line_h = self.line_height();
        let mut cell_x = x_mm;
        for (col, width) in self.columns.iter().enumerate() {
            stroke_rect(
                ops,
                cell_x,
                y_top_mm,
                *width,
                layout.height,
                0.2,
                grid_line_color(),
                page_h_mm,
            );
            if let Some(lines) = layout.cells.get(col) {
                let mut baseline = y_top_mm + CELL_PADDING_MM + line_h * 0.75;
                for line in lines {
                    draw_text(
                        ops,
                        line,
                        self.font_size,
                        bold,
                        cell_x + CELL_PADDING_MM,
                        baseline,
                        page_h_mm,
                        black(),
                    );
                    baseline += line_h;
                }
            }
            cell_x += width;
        }
    }
}
