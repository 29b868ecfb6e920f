#![allow(dead_code)]

pub mod backend;
pub mod fixtures;
pub mod properties;
