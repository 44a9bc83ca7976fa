pub mod input;
pub mod inputmap;
