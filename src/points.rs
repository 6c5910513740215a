//! Point-List Parsing
//!
//! Converts the token run between `!!StartPts` and `!!EndPts` into plot
//! data: either a 1D series of (x, y) pairs, or a dimensioned 2D value grid
//! for image plots. Series parsing is lossy (bad points are skipped with a
//! diagnostic); image parsing is strict, because a partially filled grid
//! has no sensible rendering.

use log::warn;
use thiserror::Error;

use crate::protocol::{self, ProtocolError, Token};

/// Errors from reconstructing a 2D value grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImageError {
    /// The sub-frame did not begin with a `!!Dimension<w,h>` token.
    #[error("image block must begin with a dimension token")]
    MissingDimension,

    /// `!!StartPts` did not follow the dimension token.
    #[error("no point list follows the dimension token")]
    MissingPointList,

    /// The point list ran out before width * height values were read.
    #[error("image data ended after {got} of {expected} values")]
    Truncated { expected: usize, got: usize },

    /// Something other than a `!!Value<...>` token sat in the value run.
    #[error("expected a value token, found {0:?}")]
    UnexpectedToken(String),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Two equal-length coordinate sequences, in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSeries {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl PointSeries {
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// A width x height grid of values in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGrid {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl ImageGrid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// One row of cells.
    pub fn row(&self, y: usize) -> &[f64] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }
}

/// Parse every `!!Pt<x,y>` token in `lines` into a series.
///
/// Tokens that are tagged as points but fail to parse are skipped with a
/// diagnostic, silently shortening the series; everything not tagged as a
/// point is ignored. Order is preserved.
pub fn parse_points(lines: &[String]) -> PointSeries {
    let mut series = PointSeries::default();
    for line in lines {
        if !line.starts_with(protocol::POINT_TAG) {
            continue;
        }
        match Token::parse(line) {
            Ok(Token::Point { x, y }) => {
                series.xs.push(x);
                series.ys.push(y);
            }
            Ok(_) => {}
            Err(e) => warn!("skipping point: {}", e),
        }
    }
    series
}

/// Reconstruct a 2D grid from a dimensioned sub-frame.
///
/// `lines` must begin with `!!Dimension<w,h>` followed by `!!StartPts`;
/// the next `w * h` tokens must all be `!!Value<...>`, filling the grid in
/// row-major order. Anything short of that is an error the caller must
/// treat as fatal for the frame. Surplus tokens past the grid are ignored.
pub fn parse_image(lines: &[String]) -> Result<ImageGrid, ImageError> {
    let first = lines.first().ok_or(ImageError::MissingDimension)?;
    let (width, height) = match Token::parse(first) {
        Ok(Token::Dimension { width, height }) => (width, height),
        Ok(_) => return Err(ImageError::MissingDimension),
        Err(e) => return Err(e.into()),
    };

    match lines.get(1) {
        Some(line) if line == protocol::START_POINTS => {}
        _ => return Err(ImageError::MissingPointList),
    }

    let expected = width * height;
    let mut cells = Vec::with_capacity(expected);
    for i in 0..expected {
        let line = lines
            .get(2 + i)
            .ok_or(ImageError::Truncated { expected, got: i })?;
        match Token::parse(line)? {
            Token::Value(v) => cells.push(v),
            Token::EndPoints => return Err(ImageError::Truncated { expected, got: i }),
            _ => return Err(ImageError::UnexpectedToken(line.clone())),
        }
    }

    Ok(ImageGrid { width, height, cells })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_points_round_trip() {
        let pairs = [(0.0, 1.0), (2.5, -3.5), (1e6, 1e-6), (-0.0, 42.0)];
        let tokens: Vec<String> = std::iter::once("!!StartPts".to_string())
            .chain(pairs.iter().map(|(x, y)| format!("!!Pt<{},{}>", x, y)))
            .chain(std::iter::once("!!EndPts".to_string()))
            .collect();

        let series = parse_points(&tokens);
        assert_eq!(series.len(), pairs.len());
        for (i, (x, y)) in pairs.iter().enumerate() {
            assert_eq!(series.xs[i], *x);
            assert_eq!(series.ys[i], *y);
        }
    }

    #[test]
    fn test_malformed_points_are_skipped() {
        let tokens = lines(&[
            "!!StartPts",
            "!!Pt<1,2>",
            "!!Pt<oops>",
            "!!Pt<3,4>",
            "!!EndPts",
        ]);
        let series = parse_points(&tokens);
        assert_eq!(series.xs, vec![1.0, 3.0]);
        assert_eq!(series.ys, vec![2.0, 4.0]);
    }

    #[test]
    fn test_non_point_tokens_are_ignored() {
        let tokens = lines(&["!!StartPts", "stray text", "!!Value<9>", "!!EndPts"]);
        assert!(parse_points(&tokens).is_empty());
    }

    #[test]
    fn test_image_row_major_fill() {
        let tokens = lines(&[
            "!!Dimension<3,2>",
            "!!StartPts",
            "!!Value<0>",
            "!!Value<1>",
            "!!Value<2>",
            "!!Value<3>",
            "!!Value<4>",
            "!!Value<5>",
            "!!EndPts",
        ]);
        let grid = parse_image(&tokens).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.row(0), &[0.0, 1.0, 2.0]);
        assert_eq!(grid.row(1), &[3.0, 4.0, 5.0]);
        assert_eq!(grid.get(2, 1), Some(5.0));
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    fn test_image_too_few_values() {
        let tokens = lines(&[
            "!!Dimension<3,2>",
            "!!StartPts",
            "!!Value<0>",
            "!!Value<1>",
            "!!Value<2>",
            "!!Value<3>",
            "!!Value<4>",
            "!!EndPts",
        ]);
        assert_eq!(
            parse_image(&tokens),
            Err(ImageError::Truncated { expected: 6, got: 5 })
        );
    }

    #[test]
    fn test_image_requires_dimension_header() {
        let tokens = lines(&["!!StartPts", "!!Value<1>", "!!EndPts"]);
        assert_eq!(parse_image(&tokens), Err(ImageError::MissingDimension));
    }

    #[test]
    fn test_image_requires_point_list_marker() {
        let tokens = lines(&["!!Dimension<1,1>", "!!Value<1>", "!!EndPts"]);
        assert_eq!(parse_image(&tokens), Err(ImageError::MissingPointList));
    }

    #[test]
    fn test_image_malformed_dimension_is_a_protocol_error() {
        let tokens = lines(&["!!Dimension<1>", "!!StartPts", "!!EndPts"]);
        assert!(matches!(parse_image(&tokens), Err(ImageError::Protocol(_))));
    }
}
