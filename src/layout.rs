//! Subplot Grid Layout
//!
//! Maps a subplot count onto a rectangular grid of axes slots.

/// Compute the (rows, cols) grid for `n` subplots.
///
/// Starts from the floor of the square root in both dimensions and, when
/// that square is too small, grows the column count before the row count,
/// so layouts come out wider than they are tall. Total and deterministic:
/// the result always satisfies `rows * cols >= n`, and perfect squares get
/// an exact square.
pub fn grid_dims(n: usize) -> (usize, usize) {
    if n <= 1 {
        return (1, 1);
    }
    let side = (n as f64).sqrt().floor() as usize;
    let (rows, cols) = (side, side);
    if rows * cols >= n {
        (rows, cols)
    } else if rows * (cols + 1) >= n {
        (rows, cols + 1)
    } else if (rows + 1) * cols >= n {
        (rows + 1, cols)
    } else {
        // Growing both dimensions always fits.
        (rows + 1, cols + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_plot_is_one_cell() {
        assert_eq!(grid_dims(1), (1, 1));
    }

    #[test]
    fn test_perfect_squares() {
        for side in 1..=31 {
            assert_eq!(grid_dims(side * side), (side, side));
        }
    }

    #[test]
    fn test_small_counts() {
        assert_eq!(grid_dims(2), (1, 2));
        assert_eq!(grid_dims(3), (2, 2));
        assert_eq!(grid_dims(5), (2, 3));
        assert_eq!(grid_dims(7), (3, 3));
        assert_eq!(grid_dims(12), (3, 4));
    }

    #[test]
    fn test_capacity_and_column_bias() {
        for n in 1..=1000 {
            let (rows, cols) = grid_dims(n);
            assert!(rows * cols >= n, "grid {}x{} too small for {}", rows, cols, n);
            assert!(cols >= rows, "grid {}x{} taller than wide for {}", rows, cols, n);
        }
    }
}
