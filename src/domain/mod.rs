pub mod actor;
pub mod ids;
pub mod models;
pub mod ports;
pub mod services;
pub mod use_cases;
pub mod value_objects;
