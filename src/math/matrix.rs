use rand::Rng;
use serde::{Serialize, Deserialize};

/// Dense row-major matrix backed by a single contiguous buffer.
///
/// A layer's weights live in one `Matrix` of shape `(size, input_size)`, so
/// row `i` holds every incoming weight of neuron `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixState")]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Fills a `rows × cols` matrix with samples from `U[-bound, bound)`.
    ///
    /// Entries are drawn row by row, so the result depends only on the
    /// generator's state.
    pub fn uniform<R: Rng + ?Sized>(rows: usize, cols: usize, bound: f64, rng: &mut R) -> Matrix {
        let data = (0..rows * cols)
            .map(|_| rng.gen_range(-bound..bound))
            .collect();
        Matrix { rows, cols, data }
    }

    /// Builds a matrix from a row-major buffer. Returns `None` when the
    /// buffer length is not `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Option<Matrix> {
        (rows.checked_mul(cols) == Some(data.len())).then_some(Matrix { rows, cols, data })
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|x| *x = value);
    }

    pub fn same_shape(&self, other: &Matrix) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    /// `self -= scale * other`, element-wise.
    ///
    /// # Panics
    /// Panics if the shapes differ; callers check shapes first.
    pub fn sub_scaled(&mut self, other: &Matrix, scale: f64) {
        assert!(self.same_shape(other), "Matrices are of incorrect sizes");
        for (x, g) in self.data.iter_mut().zip(other.data.iter()) {
            *x -= scale * g;
        }
    }

    /// Rank-one update `self += column ⊗ row`, i.e. `self[i][j] += column[i] * row[j]`.
    pub fn add_outer(&mut self, column: &[f64], row: &[f64]) {
        assert!(column.len() == self.rows && row.len() == self.cols, "Matrices are of incorrect sizes");
        for (i, &c) in column.iter().enumerate() {
            for (x, &r) in self.row_mut(i).iter_mut().zip(row) {
                *x += c * r;
            }
        }
    }
}

/// Wire form of a `Matrix`; the buffer length is checked before it is
/// accepted.
#[derive(Deserialize)]
struct MatrixState {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl TryFrom<MatrixState> for Matrix {
    type Error = String;

    fn try_from(state: MatrixState) -> Result<Self, Self::Error> {
        let (rows, cols, len) = (state.rows, state.cols, state.data.len());
        Matrix::from_vec(rows, cols, state.data)
            .ok_or_else(|| format!("matrix buffer has {len} entries, shape {rows}x{cols} needs {}", rows as u128 * cols as u128))
    }
}
