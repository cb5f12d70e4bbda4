//! Entity models: one file per table.
//!
//! Row structs derive `FromRow` and `Serialize`; `Create*` DTOs derive
//! `Deserialize`. Computed values (remaining capacity, availability) are
//! never stored on rows — they live in `studiobook_core` as pure
//! functions.

pub mod booking;
pub mod class_option;
pub mod lesson;
pub mod plan;
pub mod subscription;
pub mod tenant;
pub mod user;
