pub mod weatherapi;

pub use weatherapi::WeatherApiClient;
