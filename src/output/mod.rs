// Output generation module

pub mod json;

pub use json::*;
