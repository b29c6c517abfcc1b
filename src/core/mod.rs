pub mod error;
pub mod model;
pub mod remote;
pub mod sync;
