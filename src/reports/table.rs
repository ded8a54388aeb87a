//! A generic left-justified column table.

use std::fmt;

use unicode_width::UnicodeWidthStr;

/// A table of character data driven by a template string.
///
/// The template consists of `*` and other characters: each `*` is a
/// left-justified space-padded field, everything else is copied to the
/// output between fields (`"** * * *"` renders a one-character indicator
/// column glued to the first data column, then space-separated columns).
/// Raw rows bypass column formatting entirely, which is how multi-line
/// script output is interleaved with tabular port rows.
#[derive(Debug, Clone)]
pub struct Table {
    prefix: String,
    padding: Vec<String>,
    widths: Vec<usize>,
    rows: Vec<Row>,
}

#[derive(Debug, Clone)]
enum Row {
    Columns(Vec<String>),
    Raw(String),
}

impl Table {
    pub fn new(template: &str) -> Self {
        let chars: Vec<char> = template.chars().collect();
        let mut j = 0;
        while j < chars.len() && chars[j] != '*' {
            j += 1;
        }
        let prefix: String = chars[..j].iter().collect();

        let mut padding = Vec::new();
        j += 1;
        let mut i = j;
        while j < chars.len() {
            while j < chars.len() && chars[j] != '*' {
                j += 1;
            }
            padding.push(chars[i..j].iter().collect());
            j += 1;
            i = j;
        }

        Self {
            prefix,
            padding,
            widths: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append a row of columns. Trailing absent cells are trimmed so they
    /// do not widen the table.
    pub fn append(&mut self, row: Vec<Option<String>>) {
        let mut row = row;
        while matches!(row.last(), Some(None)) {
            row.pop();
        }

        let cells: Vec<String> = row.into_iter().map(Option::unwrap_or_default).collect();
        for (i, cell) in cells.iter().enumerate() {
            let width = cell.width();
            if i == self.widths.len() {
                self.widths.push(width);
            } else if width > self.widths[i] {
                self.widths[i] = width;
            }
        }
        self.rows.push(Row::Columns(cells));
    }

    /// Append a raw string for a row that is not formatted into columns.
    pub fn append_raw(&mut self, s: impl Into<String>) {
        self.rows.push(Row::Raw(s.into()));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            match row {
                Row::Raw(s) => lines.push(s.clone()),
                Row::Columns(cells) => {
                    let mut line = self.prefix.clone();
                    for (i, cell) in cells.iter().enumerate() {
                        line.push_str(cell);
                        let pad = self.widths[i].saturating_sub(cell.width());
                        line.extend(std::iter::repeat(' ').take(pad));
                        if let Some(padding) = self.padding.get(i) {
                            line.push_str(padding);
                        }
                    }
                    lines.push(line.trim_end().to_string());
                }
            }
        }
        f.write_str(&lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(row: &[&str]) -> Vec<Option<String>> {
        row.iter().map(|s| Some((*s).to_string())).collect()
    }

    #[test]
    fn test_port_table_layout() {
        let mut table = Table::new("** * * *");
        table.append(cells(&[" ", "PORT", "STATE", "SERVICE", "VERSION"]));
        table.append(cells(&["-", "80/tcp", "open", "http"]));
        table.append(cells(&["+", "80/tcp", "closed"]));

        assert_eq!(
            table.to_string(),
            " PORT   STATE  SERVICE VERSION\n\
             -80/tcp open   http\n\
             +80/tcp closed"
        );
    }

    #[test]
    fn test_raw_rows_pass_through() {
        let mut table = Table::new("*");
        table.append_raw("-|_ banner: hello");
        assert_eq!(table.to_string(), "-|_ banner: hello");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_trailing_absent_cells_trimmed() {
        let mut table = Table::new("* *");
        table.append(vec![Some("a".to_string()), None, None]);
        assert_eq!(table.to_string(), "a");
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new("** * * *");
        assert!(table.is_empty());
        assert_eq!(table.to_string(), "");
    }
}
