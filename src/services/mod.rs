pub mod forecast_api;
