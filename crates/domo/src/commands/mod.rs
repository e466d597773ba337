pub mod detail;
pub mod devices;
pub mod theme;
