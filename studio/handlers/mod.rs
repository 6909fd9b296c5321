pub mod screen;
pub mod upload;
