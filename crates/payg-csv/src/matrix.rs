//! Counter × period code matrices
//!
//! Row `i` holds the codes for counter `i`, one column per period in
//! ascending id order. The code layout makes every row and every column
//! strictly increasing without any sorting; [`CodeMatrix::check`] confirms it
//! before a matrix is handed out.

use payg_core::{sequence, Code, CodeDeriver, KeyedHash, Period, SecretKey};

use crate::error::{BatchError, Result};

/// Codes for one key across a set of periods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMatrix {
    periods: Vec<&'static Period>,
    rows: Vec<Vec<Code>>,
}

/// Check that `periods` can be laid out as matrix columns
///
/// Columns must be non-empty, strictly ascending by id, and share one
/// counter range so the matrix stays rectangular.
pub fn check_columns(periods: &[&'static Period]) -> Result<()> {
    let first = periods
        .first()
        .ok_or_else(|| BatchError::Config("no periods selected".to_string()))?;

    for pair in periods.windows(2) {
        if pair[0].id() >= pair[1].id() {
            return Err(BatchError::Config(format!(
                "periods must be in ascending order without duplicates ({} before {})",
                pair[0], pair[1]
            )));
        }
    }
    if let Some(odd) = periods
        .iter()
        .find(|period| period.max_counter() != first.max_counter())
    {
        return Err(BatchError::Config(format!(
            "period ‘{}’ has a different counter range from ‘{}’",
            odd, first
        )));
    }
    Ok(())
}

impl CodeMatrix {
    /// Derive every code of `key` for the given column periods
    pub fn build<H: KeyedHash>(
        deriver: &CodeDeriver<H>,
        key: &SecretKey,
        periods: &[&'static Period],
    ) -> Result<Self> {
        check_columns(periods)?;

        let rows = sequence(periods[0])
            .map(|counter| {
                periods
                    .iter()
                    .map(|period| deriver.derive(key, period, counter))
                    .collect::<payg_core::Result<Vec<Code>>>()
            })
            .collect::<payg_core::Result<Vec<_>>>()?;

        let matrix = Self {
            periods: periods.to_vec(),
            rows,
        };
        matrix.check()?;
        Ok(matrix)
    }

    /// Column periods
    pub fn periods(&self) -> &[&'static Period] {
        &self.periods
    }

    /// Rows, ascending by counter
    pub fn rows(&self) -> &[Vec<Code>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.periods.len()
    }

    /// Verify the matrix is rectangular and strictly increasing along every
    /// row and down every column
    pub fn check(&self) -> Result<()> {
        let width = self.periods.len();

        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != width {
                return Err(BatchError::Matrix(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    width
                )));
            }
            if let Some(j) = (1..width).find(|&j| row[j - 1] >= row[j]) {
                return Err(BatchError::Matrix(format!(
                    "row {} does not increase at column {}",
                    i, j
                )));
            }
            if i > 0 {
                let above = &self.rows[i - 1];
                if let Some(j) = (0..width).find(|&j| above[j] >= row[j]) {
                    return Err(BatchError::Matrix(format!(
                        "column {} does not increase at row {}",
                        j, i
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretKey {
        SecretKey::new(b"matrix test key material that is comfortably over the minimum length".to_vec())
            .unwrap()
    }

    fn periods(names: &[&str]) -> Vec<&'static Period> {
        names.iter().map(|name| Period::resolve(name).unwrap()).collect()
    }

    #[test]
    fn test_build_shape() {
        let matrix =
            CodeMatrix::build(&CodeDeriver::new(), &key(), &periods(&["1d", "5d", "30d"])).unwrap();
        assert_eq!(matrix.row_count(), 256);
        assert_eq!(matrix.column_count(), 3);
        assert!(matrix.rows().iter().all(|row| row.len() == 3));
    }

    #[test]
    fn test_rows_follow_counters_and_columns_follow_periods() {
        let columns = periods(&["5s", "1h", "365d"]);
        let matrix = CodeMatrix::build(&CodeDeriver::new(), &key(), &columns).unwrap();

        for (counter, row) in matrix.rows().iter().enumerate() {
            for (period, code) in columns.iter().zip(row) {
                assert_eq!(usize::from(code.counter()), counter);
                assert_eq!(code.period_id(), period.id());
            }
        }
    }

    #[test]
    fn test_check_rejects_descending_column() {
        let mut matrix =
            CodeMatrix::build(&CodeDeriver::new(), &key(), &periods(&["1d", "2d"])).unwrap();
        matrix.rows.swap(3, 4);
        assert!(matches!(matrix.check(), Err(BatchError::Matrix(_))));
    }

    #[test]
    fn test_check_rejects_ragged_rows() {
        let mut matrix =
            CodeMatrix::build(&CodeDeriver::new(), &key(), &periods(&["1d", "2d"])).unwrap();
        matrix.rows[10].pop();
        assert!(matches!(matrix.check(), Err(BatchError::Matrix(_))));
    }

    #[test]
    fn test_check_rejects_swapped_columns() {
        let mut matrix =
            CodeMatrix::build(&CodeDeriver::new(), &key(), &periods(&["1d", "2d"])).unwrap();
        matrix.rows[0].swap(0, 1);
        assert!(matches!(matrix.check(), Err(BatchError::Matrix(_))));
    }

    #[test]
    fn test_columns_must_ascend() {
        assert!(matches!(
            check_columns(&periods(&["5d", "1d"])),
            Err(BatchError::Config(_))
        ));
        assert!(matches!(
            check_columns(&periods(&["1d", "1d"])),
            Err(BatchError::Config(_))
        ));
        assert!(matches!(check_columns(&[]), Err(BatchError::Config(_))));
    }

    #[test]
    fn test_columns_must_share_counter_range() {
        assert!(matches!(
            check_columns(&periods(&["1d", "infinite"])),
            Err(BatchError::Config(_))
        ));
    }
}
