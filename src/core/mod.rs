pub mod checker;
pub mod encoding;
pub mod entities;
pub mod figure;
pub mod pdf;

pub use crate::domain::model::{CheckOutcome, CheckReport, FileReport, Marker, ParsedDocument, Rect};
pub use crate::domain::ports::{ArtifactSink, DocumentSource};
pub use crate::utils::error::Result;
