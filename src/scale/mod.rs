//! Scale derivation: value → position, size and colour mappings.
//!
//! Every scale is plain data built fresh from the current aggregation; none
//! holds a handle to a drawing surface.

pub mod band;
pub mod colour;
pub mod linear;
pub mod ordinal;
pub mod sequential;

pub use band::BandScale;
pub use colour::ColorSpace;
pub use linear::LinearScale;
pub use ordinal::OrdinalScale;
pub use sequential::{Interpolator, LegendStop, SequentialColorScale};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    #[error("cannot build a {scale} scale over an empty domain")]
    EmptyDomain { scale: &'static str },

    #[error("palette has no colours")]
    EmptyPalette,

    #[error("unknown palette '{0}'")]
    UnknownPalette(String),

    #[error("invalid colour '{value}': {message}")]
    InvalidColor { value: String, message: String },
}
