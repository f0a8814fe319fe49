use crate::error::{Result, ScraperError};

pub type Row = Vec<String>;

/// Header row followed by data rows, every row the width of the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<Row>,
}

impl ResultTable {
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            rows: vec![header.iter().map(|s| s.as_ref().to_string()).collect()],
        }
    }

    pub fn push<I, S>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Row = row.into_iter().map(Into::into).collect();
        let expected = self.width();
        if row.len() != expected {
            return Err(ScraperError::RowArity {
                expected,
                found: row.len(),
            }
            .into());
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn header(&self) -> &Row {
        &self.rows[0]
    }

    /// Data rows, header excluded.
    pub fn records(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Every row, header first.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn width(&self) -> usize {
        self.header().len()
    }

    /// True when there are no data rows, whatever the header says.
    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_share_header_arity() {
        let mut table = ResultTable::new(&["Status", "Count"]);
        table.push(["Final", "3"]).unwrap();
        assert!(table.push(["Draft"]).is_err());
        assert!(table.push(["a", "b", "c"]).is_err());

        assert_eq!(table.rows().len(), 2);
        assert!(table.rows().iter().all(|row| row.len() == table.width()));
    }

    #[test]
    fn test_header_only_is_empty() {
        let mut table = ResultTable::new(&["A", "B"]);
        assert!(table.is_empty());
        assert_eq!(table.header(), &vec!["A", "B"]);

        table.push(["x", "y"]).unwrap();
        assert!(!table.is_empty());
    }
}
