pub mod proxy;
pub mod views;
