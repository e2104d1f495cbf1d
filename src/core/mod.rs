//! Core module containing the resource model and its supporting types

pub mod descriptor;
pub mod entity;
pub mod error;
pub mod field;
pub mod link;
pub mod query;

pub use descriptor::{MediaTypeSource, TypeDescriptor};
pub use entity::{Model, Resource};
pub use error::{ClientError, ConfigError, EntityError, LinkError, QueryError, Result};
pub use field::FieldValue;
pub use link::{Link, LinkContext, Links};
pub use query::{Finder, Params};
