//! Writing decoded arrays to disk and summarizing them.

use std::path::Path;

use ndarray::{ArrayBase, Data, Dimension};
use ndarray_npy::WriteNpyExt;

use crate::error::Result;

/// Write `array` as a NumPy `.npy` file.
///
/// Column-major arrays are stored with `fortran_order: True`, so no data is
/// reordered on the way out.
pub fn write_npy<S, D>(path: impl AsRef<Path>, array: &ArrayBase<S, D>) -> Result<()>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    array.write_npy(std::io::BufWriter::new(file))?;
    log::info!("Wrote {:?} array to {:?}", array.shape(), path);
    Ok(())
}

/// Basic statistics of a decoded array.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Array extents
    pub shape: Vec<usize>,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
}

impl Summary {
    /// Compute statistics over every element of `array`.
    pub fn of<S, D>(array: &ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let (min, max) = array
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        Self {
            shape: array.shape().to_vec(),
            min,
            max,
            mean: array.mean().unwrap_or(f64::NAN),
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "shape={:?} min={} max={} mean={:.3}",
            self.shape, self.min, self.max, self.mean
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3, ShapeBuilder, array};
    use ndarray_npy::read_npy;

    #[test]
    fn test_summary() {
        let a = array![[1.0, 2.0], [3.0, 6.0]];
        let s = Summary::of(&a);
        assert_eq!(s.shape, vec![2, 2]);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 6.0);
        assert_eq!(s.mean, 3.0);
        assert_eq!(s.to_string(), "shape=[2, 2] min=1 max=6 mean=3.000");
    }

    #[test]
    fn test_write_fortran_cube_reads_back_equal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cube.npy");
        let cube =
            Array3::from_shape_vec((2, 3, 2).f(), (0..12).map(f64::from).collect()).unwrap();

        write_npy(&path, &cube).unwrap();
        let back: Array3<f64> = read_npy(&path).unwrap();
        assert_eq!(back, cube);
    }

    #[test]
    fn test_write_band_slice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("band.npy");
        let slice = Array2::from_shape_vec((2, 2).f(), vec![1.0, 2.0, 3.0, 4.0]).unwrap();

        write_npy(&path, &slice).unwrap();
        let back: Array2<f64> = read_npy(&path).unwrap();
        assert_eq!(back[[1, 0]], 2.0);
        assert_eq!(back[[0, 1]], 3.0);
    }
}
