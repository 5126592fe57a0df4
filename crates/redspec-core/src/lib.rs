pub mod error;
pub mod consts;
pub mod frame;
pub mod spectrum;
pub mod reduce;
pub mod calibrate;
pub mod detect;
pub mod biosig;
pub mod pipeline;

pub use error::{RedspecError, Result};
