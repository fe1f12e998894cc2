pub mod classifier;
pub mod client;

pub use classifier::Classifier;
pub use client::{HeliusClient, TimeWindow};
