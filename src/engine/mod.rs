pub mod pipeline;
pub mod probe;
pub mod tags;
