//! Integration tests for ycompose
//!
//! These tests load real library files from temporary directories and
//! compose templates through the public `Composer` API.

pub mod compose_aliases;
pub mod compose_end_to_end;
pub mod compose_passthrough;
pub mod helpers;
