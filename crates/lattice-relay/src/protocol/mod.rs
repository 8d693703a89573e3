//! Wire format types for the API protocols on both sides of the relay
//!
//! Pure serde structs matching the respective JSON formats. These types are
//! only used for serialization/deserialization at the boundary and are not
//! used internally.

pub mod anthropic;
pub mod openai;
