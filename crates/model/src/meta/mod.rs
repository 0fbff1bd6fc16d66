//! Property navigation over argument values.
//!
//! Arguments come in three shapes, each with its own adapter: records with a
//! fixed field table, map-like dynamic bags and indexed sequences. Paths such
//! as `user.roles[0].name` are split into segments and walked one step at a
//! time; no language reflection is involved.

pub mod access;
pub mod path;

pub use access::{
    PropertyAccess, get_path, get_path_in, has_property, property_type, read_property, set_path,
    value_type_at, value_type_in,
};
pub use path::{PathSegment, PropertyPath};
