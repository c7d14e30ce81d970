pub mod chart;
pub mod home;
pub mod stock;
