//! Job orchestration: registry, node tracking, stage dispatch and the
//! service facade that ties them together.

pub mod dispatcher;
pub mod driver;
pub mod node_state;
pub mod registry;
pub mod service;
