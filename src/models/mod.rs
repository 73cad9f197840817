pub mod status;

pub use status::StatusResponse;
