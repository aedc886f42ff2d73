pub mod container;
pub mod views;
