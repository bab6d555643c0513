pub mod handlers;
pub mod models;
mod normalize;
mod service;

pub use service::{Providers, WeatherService};
