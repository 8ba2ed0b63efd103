pub mod args;
pub mod data;
pub mod model;
pub mod utils;
