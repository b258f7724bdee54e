/// Column alignment inside a [`Table`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A plain-text table for terminal output
pub struct Table {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with the given headers, all left aligned
    pub fn new(headers: Vec<&str>) -> Self {
        let col_widths = headers.iter().map(|h| h.chars().count()).collect();
        let aligns = vec![Align::Left; headers.len()];
        let headers = headers.iter().map(|h| h.to_string()).collect();
        Table {
            headers,
            aligns,
            rows: Vec::new(),
            col_widths,
        }
    }

    /// Set the alignment of column `index`; out of range is ignored
    pub fn align(mut self, index: usize, align: Align) -> Self {
        if let Some(slot) = self.aligns.get_mut(index) {
            *slot = align;
        }
        self
    }

    /// Add a row; cells beyond the header count are dropped, missing ones are blank
    pub fn add_row(&mut self, row: Vec<String>) {
        let mut cells: Vec<String> = row.into_iter().take(self.headers.len()).collect();
        cells.resize(self.headers.len(), String::new());

        for (width, cell) in self.col_widths.iter_mut().zip(&cells) {
            *width = (*width).max(cell.chars().count());
        }

        self.rows.push(cells);
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.render_row(&self.headers));
        lines.push(self.render_separator());
        for row in &self.rows {
            lines.push(self.render_row(row));
        }
        lines.join("\n")
    }

    fn render_row(&self, row: &[String]) -> String {
        // Trailing blank cells are dropped along with their separators
        let filled = row.iter().rposition(|cell| !cell.is_empty()).map_or(0, |i| i + 1);

        row[..filled]
            .iter()
            .zip(&self.col_widths)
            .zip(&self.aligns)
            .map(|((cell, &width), align)| match align {
                Align::Left => format!("{:<width$}", cell, width = width),
                Align::Right => format!("{:>width$}", cell, width = width),
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}
