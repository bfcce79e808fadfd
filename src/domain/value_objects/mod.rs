pub mod email;
pub mod review_response;

pub use email::{Email, InvalidEmailError};
pub use review_response::{ReviewResponse, ReviewResponseError};
