#![allow(dead_code)]

pub mod dropkit_env;
pub mod recorder;
