//! Error types for triangulation, Voronoi construction and map generation

use std::fmt;

/// Errors that can occur while building geometry or generating a map
#[derive(Debug, Clone, PartialEq)]
pub enum VoronoiError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// A site could not be located inside any face of the triangulation
    PointLocation {
        /// Index of the site in the input slice
        index: usize,
    },
    /// Input geometry is degenerate (collinear, coincident, non-simple)
    DegenerateGeometry(String),
    /// A required property of the generated map could not be established
    MalformedInput(String),
    /// Face handle does not refer to a live face
    FaceNotFound(usize),
    /// Requested tile ID does not exist
    TileNotFound(usize),
}

impl fmt::Display for VoronoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoronoiError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            VoronoiError::PointLocation { index } => {
                write!(f, "no face contains site {}", index)
            }
            VoronoiError::DegenerateGeometry(msg) => write!(f, "degenerate geometry: {}", msg),
            VoronoiError::MalformedInput(msg) => write!(f, "malformed input: {}", msg),
            VoronoiError::FaceNotFound(id) => write!(f, "face not found: {}", id),
            VoronoiError::TileNotFound(id) => write!(f, "tile not found: {}", id),
        }
    }
}

impl std::error::Error for VoronoiError {}

/// Result type alias for kernel and map operations
pub type Result<T> = std::result::Result<T, VoronoiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            VoronoiError::PointLocation { index: 7 }.to_string(),
            "no face contains site 7"
        );
        assert_eq!(
            VoronoiError::MalformedInput("malformed point set".into()).to_string(),
            "malformed input: malformed point set"
        );
        assert_eq!(VoronoiError::TileNotFound(3).to_string(), "tile not found: 3");
    }
}
