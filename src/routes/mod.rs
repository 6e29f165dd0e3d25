pub mod banners;
pub mod health;
pub mod metrics;
pub mod uploads;
