//! Request and response types for the API.

mod requests;
mod responses;

pub use requests::*;
pub use responses::*;
