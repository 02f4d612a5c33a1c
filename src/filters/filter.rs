//! Stream filter trait definition

use lopdf::Dictionary;
use crate::errors::PanelResult;

/// Strategy trait for decoding one stage of a stream's filter chain
pub trait StreamFilter: Send + Sync {
    /// Decode the data, honoring the stage's `/DecodeParms` if any
    fn decode(&self, data: &[u8], params: Option<&Dictionary>) -> PanelResult<Vec<u8>>;

    /// Get the PDF name of this filter
    fn name(&self) -> &'static str;
}
