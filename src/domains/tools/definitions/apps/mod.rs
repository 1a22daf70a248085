//! App tools.

pub mod create;

pub use create::{CreateAppParams, CreateAppTool};
