/// In-memory table read from one delimited file: ordered column names plus
/// rows of text cells. A `None` cell means the value was missing on disk
/// (empty field or one of the literal null tokens).
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Tokens normalized to "missing" at read time.
pub const MISSING_TOKENS: &[&str] = &["", "NULL", "null", "None", "NA"];

impl Batch {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn col(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_col(&self, name: &str) -> bool {
        self.col(name).is_some()
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.col(name)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Append a row, padding or truncating to the column count.
    pub fn push_row(&mut self, mut cells: Vec<Option<String>>) {
        cells.resize(self.columns.len(), None);
        self.rows.push(cells);
    }

    /// Add an empty column if it does not exist yet; returns its index.
    pub fn add_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.col(name) {
            return idx;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(None);
        }
        self.columns.len() - 1
    }

    /// Strip surrounding whitespace from every cell.
    pub fn trim_cells(&mut self) {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                if let Some(v) = cell {
                    let trimmed = v.trim();
                    if trimmed.len() != v.len() {
                        *cell = Some(trimmed.to_string());
                    }
                }
            }
        }
    }

    /// Copy of the batch without the named columns. Column and row order is
    /// preserved.
    pub fn without_columns(&self, drop: &[&str]) -> Batch {
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !drop.contains(&c.as_str()))
            .map(|(i, _)| i)
            .collect();
        let columns = keep.iter().map(|&i| self.columns[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Batch { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Batch {
        let mut b = Batch::new(vec!["a".into(), "b".into()]);
        b.push_row(vec![Some("1".into()), Some(" x ".into())]);
        b.push_row(vec![None, Some("y".into())]);
        b
    }

    #[test]
    fn test_get_and_col() {
        let b = sample();
        assert_eq!(b.get(0, "a"), Some("1"));
        assert_eq!(b.get(1, "a"), None);
        assert_eq!(b.get(0, "missing"), None);
        assert!(b.has_col("b"));
    }

    #[test]
    fn test_push_row_pads_and_truncates() {
        let mut b = Batch::new(vec!["a".into(), "b".into()]);
        b.push_row(vec![Some("only".into())]);
        b.push_row(vec![Some("1".into()), Some("2".into()), Some("3".into())]);
        assert_eq!(b.rows[0].len(), 2);
        assert_eq!(b.rows[1].len(), 2);
        assert_eq!(b.get(0, "b"), None);
        assert_eq!(b.get(1, "b"), Some("2"));
    }

    #[test]
    fn test_add_column_backfills_existing_rows() {
        let mut b = sample();
        let idx = b.add_column("c");
        assert_eq!(idx, 2);
        assert_eq!(b.rows[0].len(), 3);
        assert_eq!(b.get(1, "c"), None);
        // idempotent
        assert_eq!(b.add_column("c"), 2);
        assert_eq!(b.columns.len(), 3);
    }

    #[test]
    fn test_trim_cells() {
        let mut b = sample();
        b.trim_cells();
        assert_eq!(b.get(0, "b"), Some("x"));
    }

    #[test]
    fn test_without_columns_preserves_order() {
        let mut b = sample();
        b.add_column("c");
        let out = b.without_columns(&["b"]);
        assert_eq!(out.columns, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.get(0, "a"), Some("1"));
    }
}
