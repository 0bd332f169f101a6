//! Types shared between the catalog client core and its front ends.

pub mod domain;
pub mod error;
pub mod protocol;
