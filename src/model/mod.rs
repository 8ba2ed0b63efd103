pub mod config;
pub mod constants;
pub mod decay;
pub mod division;
pub mod error;
pub mod identity;
pub mod ranking;
pub mod rating_engine;
pub mod rating_model;
pub mod rating_tracker;
pub mod rating_utils;
pub mod structures;
