//! Compile-time DI binding graphs

pub mod extractor;
pub mod model;
pub mod source;

pub use extractor::{extract, map_binding_kind};
pub use model::{
    BindingDescriptor, BindingGraph, BindingGraphSnapshot, ComponentDescriptor, ComponentPath,
    DependencyEdgeDescriptor, MissingBindingDescriptor, RequestSource,
};
pub use source::BindingGraphSource;
