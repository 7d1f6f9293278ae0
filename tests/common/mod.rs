#![allow(dead_code)]

pub mod remote_db;
pub mod utils;
