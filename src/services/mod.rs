pub mod banners;
pub mod metrics;
