//! Named-column data container.
//!
//! Purpose
//! -------
//! Carry a 2-D observation array together with the ordered names of its
//! columns, so scalers, priors and models can address features by name
//! (`"phi1"`, `"phi2"`, ...) instead of by position.
//!
//! Key behaviors
//! -------------
//! - [`Data::new`] enforces one unique, non-empty name per column.
//! - [`Data::column`] returns a borrowed view of a single named column.
//! - [`Data::select`] builds a new `Data` with the requested columns in the
//!   requested order.
//!
//! Invariants & assumptions
//! ------------------------
//! - `names.len() == array.ncols()` and names are unique.
//! - Rows are observations; the container never reorders them.
//!
//! Conventions
//! -----------
//! - A `Data` is immutable once built; selection always copies into a new
//!   instance.
use ndarray::{Array2, ArrayView1, Axis};

/// Result alias for data-container operations.
pub type DataResult<T> = Result<T, DataError>;

/// Errors raised while building or addressing a [`Data`] container.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// Number of names differs from the number of columns.
    NamesLengthMismatch { expected: usize, actual: usize },

    /// A column name appears twice.
    DuplicateColumn { name: String },

    /// A column name is empty.
    EmptyColumnName { index: usize },

    /// A requested column does not exist.
    ColumnNotFound { name: String },
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::NamesLengthMismatch { expected, actual } => {
                write!(f, "Data has {expected} columns but {actual} names were given.")
            }
            DataError::DuplicateColumn { name } => {
                write!(f, "Duplicate column name in data: {name}")
            }
            DataError::EmptyColumnName { index } => {
                write!(f, "Column name at index {index} is empty.")
            }
            DataError::ColumnNotFound { name } => write!(f, "No column named '{name}' in data."),
        }
    }
}

/// `Data` — a 2-D `f64` array whose columns carry names.
///
/// Fields
/// ------
/// - `array`: `Array2<f64>` of shape `(n_rows, n_cols)`.
/// - `names`: ordered column names, one per column, unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    array: Array2<f64>,
    names: Vec<String>,
}

impl Data {
    /// Construct a validated [`Data`] container.
    ///
    /// Errors
    /// ------
    /// - `DataError::NamesLengthMismatch` if `names.len() != array.ncols()`.
    /// - `DataError::EmptyColumnName` for an empty name.
    /// - `DataError::DuplicateColumn` for the first repeated name.
    pub fn new<S: Into<String>>(array: Array2<f64>, names: Vec<S>) -> DataResult<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != array.ncols() {
            return Err(DataError::NamesLengthMismatch {
                expected: array.ncols(),
                actual: names.len(),
            });
        }
        for (index, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(DataError::EmptyColumnName { index });
            }
            if names[..index].contains(name) {
                return Err(DataError::DuplicateColumn { name: name.clone() });
            }
        }
        Ok(Data { array, names })
    }

    pub fn array(&self) -> &Array2<f64> {
        &self.array
    }

    pub fn into_array(self) -> Array2<f64> {
        self.array
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn n_rows(&self) -> usize {
        self.array.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.array.ncols()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Position of a named column.
    pub fn index_of(&self, name: &str) -> DataResult<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| DataError::ColumnNotFound { name: name.to_string() })
    }

    /// Borrowed view of a single named column.
    pub fn column(&self, name: &str) -> DataResult<ArrayView1<'_, f64>> {
        let idx = self.index_of(name)?;
        Ok(self.array.column(idx))
    }

    /// New container holding `names` in the given order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> DataResult<Data> {
        let idx = names.iter().map(|n| self.index_of(n.as_ref())).collect::<DataResult<Vec<_>>>()?;
        let array = self.array.select(Axis(1), &idx);
        Data::new(array, names.iter().map(|n| n.as_ref().to_string()).collect::<Vec<String>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Happy-path construction, column access and reordering selection.
    //
    // Given
    // -----
    // - A 2×3 array with columns `phi1, phi2, pmra`.
    //
    // Expect
    // ------
    // - `column("phi2")` returns the middle column.
    // - `select(["pmra", "phi1"])` reorders the columns and their names.
    fn data_column_access_and_select() {
        let data =
            Data::new(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], vec!["phi1", "phi2", "pmra"])
                .unwrap();

        assert_eq!(data.n_rows(), 2);
        assert_eq!(data.column("phi2").unwrap().to_vec(), vec![2.0, 5.0]);

        let sub = data.select(&["pmra", "phi1"]).unwrap();
        assert_eq!(sub.names(), &["pmra".to_string(), "phi1".to_string()]);
        assert_eq!(sub.array(), &array![[3.0, 1.0], [6.0, 4.0]]);
    }

    #[test]
    // Purpose
    // -------
    // Construction rejects mismatched name counts and duplicate names;
    // lookups of absent columns fail with `ColumnNotFound`.
    fn data_rejects_invalid_names() {
        let arr = array![[1.0, 2.0]];

        assert_eq!(
            Data::new(arr.clone(), vec!["a"]).unwrap_err(),
            DataError::NamesLengthMismatch { expected: 2, actual: 1 }
        );
        assert_eq!(
            Data::new(arr.clone(), vec!["a", "a"]).unwrap_err(),
            DataError::DuplicateColumn { name: "a".into() }
        );

        let data = Data::new(arr, vec!["a", "b"]).unwrap();
        assert_eq!(data.column("c").unwrap_err(), DataError::ColumnNotFound { name: "c".into() });
    }
}
