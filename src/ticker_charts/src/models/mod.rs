pub mod bar;
pub mod payload;
pub mod symbol;
