#![allow(dead_code)]

pub mod builders;
pub mod strategies;

pub use builders::*;
