//! Handler for FlateDecode compressed data

use std::io::Read;
use flate2::read::ZlibDecoder;
use log::debug;
use lopdf::Dictionary;

use crate::errors::{PanelError, PanelResult};
use super::filter::StreamFilter;
use super::predictor::PredictorParams;

/// Zlib/deflate filter with optional PNG or TIFF predictor
pub struct FlateFilter;

impl StreamFilter for FlateFilter {
    fn decode(&self, data: &[u8], params: Option<&Dictionary>) -> PanelResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut inflated = Vec::new();
        if let Err(e) = decoder.read_to_end(&mut inflated) {
            // Scanners sometimes truncate the stream; keep what inflated cleanly
            if inflated.is_empty() {
                return Err(PanelError::IoError(e));
            }
            debug!("FlateDecode stopped early after {} bytes: {}", inflated.len(), e);
        }

        let predictor = PredictorParams::from_dict(params);
        predictor.apply(inflated)
    }

    fn name(&self) -> &'static str {
        "FlateDecode"
    }
}
