//! Terminal UI utilities.
//!
//! A small box-drawn table used by `crun --list-compilers`. Cell widths are
//! measured without ANSI color codes so colored cells line up.

use colored::*;
use console::measure_text_width;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are ignored.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(measure_text_width(cell));
            }
        }
        widths
    }

    pub fn render(&self) -> Vec<String> {
        if self.headers.is_empty() {
            return Vec::new();
        }
        let widths = self.widths();

        let sep = |left: &str, mid: &str, right: &str| -> String {
            let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("  {}{}{}", left, inner.join(mid), right)
        };
        let line = |cells: &[String], bold: bool| -> String {
            let mut s = String::from("  │");
            for (cell, width) in cells.iter().zip(&widths) {
                let pad = width.saturating_sub(measure_text_width(cell));
                let text = if bold {
                    cell.bold().to_string()
                } else {
                    cell.clone()
                };
                s.push_str(&format!(" {}{} │", text, " ".repeat(pad)));
            }
            s
        };

        let mut out = vec![sep("┌", "┬", "┐"), line(&self.headers, true), sep("├", "┼", "┤")];
        out.extend(self.rows.iter().map(|r| line(r, false)));
        out.push(sep("└", "┴", "┘"));
        out
    }

    pub fn print(&self) {
        for l in self.render() {
            println!("{}", l);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_align() {
        let mut table = Table::new(&["Compiler", "Path"]);
        table.add_row(vec!["gcc".into(), "/usr/bin/gcc".into()]);
        table.add_row(vec!["only one cell".into()]);

        let lines = table.render();
        assert_eq!(lines.len(), 5);
        let width = measure_text_width(&lines[0]);
        assert!(lines.iter().all(|l| measure_text_width(l) == width));
        assert!(lines[3].contains("/usr/bin/gcc"));
    }

    #[test]
    fn test_empty_headers_render_nothing() {
        assert!(Table::new(&[]).render().is_empty());
    }
}
