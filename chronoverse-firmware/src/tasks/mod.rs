//! Embassy async tasks

pub mod refresh;
