pub mod sample;
pub mod sampler;
