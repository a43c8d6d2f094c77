//! Workflow graph handling: from a raw submitted graph to stage parameters.
//!
//! - `widgets` -- typed, never-failing accessor over loosely typed widget values
//! - `translator` -- graph parsing, node classification, spec and stage request building
//! - `catalog` -- the static node catalog served by `ListNodes`

pub mod catalog;
pub mod translator;
pub mod widgets;
