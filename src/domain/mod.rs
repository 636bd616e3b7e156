//! Domain layer modules
//!
//! - `store`: Template record repositories
//! - `template`: Placeholder engine, validation and template service

pub mod store;
pub mod template;
