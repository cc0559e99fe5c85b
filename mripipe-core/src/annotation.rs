// mripipe-core/src/annotation.rs

use crate::error::PipelineError;
use crate::rasterizer::Point;
use std::fs;
use std::path::Path;

/// Reads a contour file and returns its polygon.
///
/// See [`parse_annotation_str`] for the accepted format.
///
/// # Errors
///
/// Returns `PipelineError::Io` if the file cannot be read and
/// `PipelineError::AnnotationParse` if any line is malformed.
pub fn parse_annotation_file(path: &Path) -> Result<Vec<Point>, PipelineError> {
    let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    parse_annotation_str(path, &text)
}

/// Parses contour text: one `x y` pair of floats per line, whitespace separated.
///
/// A single bad line fails the whole file; no partial polygon is returned.
/// `path` is only used to build error messages.
pub fn parse_annotation_str(path: &Path, text: &str) -> Result<Vec<Point>, PipelineError> {
    let mut polygon = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let malformed = |reason: String| PipelineError::AnnotationParse {
            path: path.to_path_buf(),
            line: line_no + 1,
            reason,
        };

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != 2 {
            return Err(malformed(format!(
                "expected 2 values, found {}",
                tokens.len()
            )));
        }

        let mut coords = [0.0f64; 2];
        for (slot, token) in coords.iter_mut().zip(&tokens) {
            let value: f64 = token
                .parse()
                .map_err(|_| malformed(format!("'{}' is not a number", token)))?;
            if !value.is_finite() {
                return Err(malformed(format!("'{}' is not a finite number", token)));
            }
            *slot = value;
        }
        polygon.push(Point::new(coords[0], coords[1]));
    }
    Ok(polygon)
}

#[cfg(test)]
#[path = "annotation_test.rs"]
mod tests;
