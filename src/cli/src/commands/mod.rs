pub mod check;
pub mod matrix;
pub mod operations;
pub mod roles;
