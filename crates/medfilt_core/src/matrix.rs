//! Matrix text-format I/O.
//!
//! Format: first line `"<height> <width>"`, then `height` rows of `width`
//! space-separated integers. Parsing is whitespace-tolerant across line
//! breaks, matching the scanf-style readers that produce these files.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use ndarray::{Array2, ArrayView2};

use crate::error::{Error, Result};

/// Parse a matrix from its text representation.
pub fn parse_matrix(text: &str) -> Result<Array2<i32>> {
    let mut tokens = text.lines().enumerate().flat_map(|(index, line)| {
        line.split_ascii_whitespace()
            .map(move |token| (index + 1, token))
    });

    let height = next_dimension(&mut tokens, "height")?;
    let width = next_dimension(&mut tokens, "width")?;

    let total = height.checked_mul(width).ok_or_else(|| Error::Parse {
        line: 1,
        reason: format!("matrix dimensions {height}x{width} overflow"),
    })?;
    // Reserve modestly: an adversarial header must fail at the first
    // missing cell, not inside the allocator.
    let mut cells = Vec::with_capacity(total.min(1 << 20));
    let mut last_line = 1;
    while cells.len() < total {
        let Some((line, token)) = tokens.next() else {
            return Err(Error::Parse {
                line: last_line,
                reason: format!("matrix ended after {} of {} cells", cells.len(), total),
            });
        };
        last_line = line;
        let value = token.parse::<i32>().map_err(|_| Error::Parse {
            line,
            reason: format!("expected integer cell, got `{token}`"),
        })?;
        cells.push(value);
    }

    Array2::from_shape_vec((height, width), cells).map_err(|e| Error::Parse {
        line: 1,
        reason: e.to_string(),
    })
}

fn next_dimension<'a>(
    tokens: &mut impl Iterator<Item = (usize, &'a str)>,
    which: &str,
) -> Result<usize> {
    let (line, token) = tokens.next().ok_or_else(|| Error::Parse {
        line: 1,
        reason: format!("missing {which} in header"),
    })?;
    let value = token.parse::<usize>().map_err(|_| Error::Parse {
        line,
        reason: format!("invalid {which} `{token}`"),
    })?;
    if value == 0 {
        return Err(Error::Parse {
            line,
            reason: format!("{which} must be positive"),
        });
    }
    Ok(value)
}

/// Serialize a matrix to its text representation.
pub fn format_matrix(matrix: ArrayView2<i32>) -> String {
    let (height, width) = matrix.dim();
    // Rough guess: sign + four digits + separator per cell.
    let mut out = String::with_capacity(height * width * 6 + 16);
    let _ = writeln!(out, "{height} {width}");
    for row in matrix.rows() {
        for (col, value) in row.iter().enumerate() {
            if col > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{value}");
        }
        out.push('\n');
    }
    out
}

/// Load a matrix from a text file.
pub fn read_matrix(path: impl AsRef<Path>) -> Result<Array2<i32>> {
    let text = fs::read_to_string(path)?;
    parse_matrix(&text)
}

/// Write a matrix to a text file.
pub fn write_matrix(path: impl AsRef<Path>, matrix: ArrayView2<i32>) -> Result<()> {
    fs::write(path, format_matrix(matrix))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_parse_simple_matrix() {
        let m = parse_matrix("2 3\n1 2 3\n4 5 6\n").unwrap();
        assert_eq!(m, array![[1, 2, 3], [4, 5, 6]]);
    }

    #[test]
    fn test_parse_is_whitespace_tolerant() {
        // Cells may span lines and use arbitrary spacing, like fscanf input.
        let m = parse_matrix("2 2\n  1\t2 3\n\n4").unwrap();
        assert_eq!(m, array![[1, 2], [3, 4]]);
    }

    #[test]
    fn test_round_trip_with_negative_values() {
        let m = array![[-1, 0, 2147483647], [-2147483648, 7, -30]];
        let text = format_matrix(m.view());
        assert_eq!(parse_matrix(&text).unwrap(), m);
    }

    #[test]
    fn test_format_layout() {
        let text = format_matrix(array![[1, -2], [30, 4]].view());
        assert_eq!(text, "2 2\n1 -2\n30 4\n");
    }

    #[test]
    fn test_missing_header_is_a_parse_error() {
        assert!(matches!(parse_matrix(""), Err(Error::Parse { line: 1, .. })));
        assert!(matches!(parse_matrix("3"), Err(Error::Parse { line: 1, .. })));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            parse_matrix("0 3\n"),
            Err(Error::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_matrix("3 0\n"),
            Err(Error::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_short_data_reports_last_line() {
        let err = parse_matrix("2 2\n1 2\n3\n").unwrap_err();
        match err {
            Error::Parse { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("3 of 4"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_junk_token_reports_its_line() {
        let err = parse_matrix("2 2\n1 2\nx 4\n").unwrap_err();
        match err {
            Error::Parse { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains('x'));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_overflowing_dimensions_are_a_parse_error() {
        let text = format!("{} 2\n1 2\n", usize::MAX);
        match parse_matrix(&text).unwrap_err() {
            Error::Parse { line, reason } => {
                assert_eq!(line, 1);
                assert!(reason.contains("overflow"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_huge_header_with_short_data_fails_without_allocating() {
        // A valid but absurd header must not reserve the claimed size; the
        // parse fails at the first missing cell instead.
        let err = parse_matrix("1000000000 1000000000\n1 2 3\n").unwrap_err();
        match err {
            Error::Parse { reason, .. } => assert!(reason.contains("3 of")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extra_trailing_tokens_ignored() {
        // fscanf readers stop after height*width cells; so do we.
        let m = parse_matrix("1 2\n8 9 10 11\n").unwrap();
        assert_eq!(m, array![[8, 9]]);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = std::env::temp_dir().join("medfilt_matrix_io_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("matrix.txt");

        let m = array![[3, -1, 4], [1, -5, 9]];
        write_matrix(&path, m.view()).unwrap();
        assert_eq!(read_matrix(&path).unwrap(), m);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_matrix("/nonexistent/medfilt/matrix.txt");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
