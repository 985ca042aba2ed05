//! Metro DI graph metadata reports

pub mod extractor;
pub mod model;
pub mod source;

pub use extractor::{extract, extract_from_json, map_binding_kind, module_from_origin};
pub use model::MetroGraphMetadata;
pub use source::MetroGraphSource;
