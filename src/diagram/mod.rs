/// Architecture diagram rendering.
pub mod graph;
pub mod render;
pub mod stack;
