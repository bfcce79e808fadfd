pub mod ai;
pub mod crypto;
pub mod email;
pub mod factory;
pub mod repositories;
