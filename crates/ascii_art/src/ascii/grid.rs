use std::fmt::Write as _;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellGlyph {
    pub ch: char,
    /// Source color of the sampled pixel, untouched by tone adjustment.
    pub rgb: [u8; 3],
}

impl CellGlyph {
    pub fn new(ch: char, rgb: [u8; 3]) -> Self {
        Self { ch, rgb }
    }
}

/// Row-major grid of glyphs, top to bottom and left to right.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphGrid {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<CellGlyph>,
}

impl GlyphGrid {
    pub fn new(width: u32, height: u32, cells: Vec<CellGlyph>) -> Self {
        assert_eq!(width as usize * height as usize, cells.len());
        Self { width, height, cells }
    }

    pub fn cell(&self, column: u32, row: u32) -> Option<&CellGlyph> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(row as usize * self.width as usize + column as usize)
    }

    pub fn color_rows(&self) -> impl Iterator<Item = &[CellGlyph]> + '_ {
        self.cells.chunks(self.width.max(1) as usize)
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.color_rows().map(|row| row.iter().map(|cell| cell.ch).collect::<String>())
    }

    /// Rows joined with `\n`, no trailing newline.
    pub fn to_text(&self) -> String {
        self.rows().collect::<Vec<_>>().join("\n")
    }

    /// One `<div>` per row and one colored `<span>` per cell.
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(self.cells.len() * 48);
        for row in self.color_rows() {
            html.push_str("<div style=\"line-height:1;margin:0;padding:0\">");
            for cell in row {
                let [r, g, b] = cell.rgb;
                let _ = write!(html, "<span style=\"color:rgb({r},{g},{b})\">");
                push_escaped(&mut html, cell.ch);
                html.push_str("</span>");
            }
            html.push_str("</div>");
        }
        html
    }

    /// Rows with 24-bit foreground escapes, reset at the end of every row.
    pub fn to_ansi(&self) -> String {
        let mut rows = Vec::with_capacity(self.height as usize);
        for row in self.color_rows() {
            let mut line = String::with_capacity(row.len() * 20);
            let mut current = None;
            for cell in row {
                if current != Some(cell.rgb) {
                    let [r, g, b] = cell.rgb;
                    let _ = write!(line, "\x1b[38;2;{r};{g};{b}m");
                    current = Some(cell.rgb);
                }
                line.push(cell.ch);
            }
            line.push_str("\x1b[0m");
            rows.push(line);
        }
        rows.join("\n")
    }
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        _ => out.push(ch),
    }
}
