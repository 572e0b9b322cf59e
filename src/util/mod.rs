pub mod ids;
pub mod sequence;
