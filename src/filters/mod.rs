//! Stream filter decoding for embedded image data
//!
//! This module implements strategies for the PDF stream filters that can wrap
//! image samples. DCTDecode is not a filter here: JPEG data is handed to the
//! image codec as a whole.

mod filter;
mod flate;
mod ascii_hex;
mod predictor;
mod factory;

pub use filter::StreamFilter;
pub use flate::FlateFilter;
pub use ascii_hex::AsciiHexFilter;
pub use predictor::{Predictor, PredictorParams};
pub use factory::FilterFactory;
