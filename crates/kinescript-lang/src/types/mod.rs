pub mod color;
pub mod draw;
pub mod shape;
pub mod vec2;
