#[path = "../common/mod.rs"]
mod common;

mod ggh_tests;
mod reduction_tests;
mod serialization_tests;
mod session_tests;
