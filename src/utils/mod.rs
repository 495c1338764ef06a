pub mod duration;
pub mod files;
pub mod grep;
pub mod text;
