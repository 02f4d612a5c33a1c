//! PNG and TIFF predictors applied after FlateDecode

use lopdf::filters::png;
use lopdf::{Dictionary, Object};
use crate::errors::{PanelError, PanelResult};

/// Predictor family selected by `/Predictor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predictor {
    None,
    Tiff,
    Png,
}

/// Decode parameters relevant to prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictorParams {
    pub predictor: Predictor,
    pub colors: usize,
    pub bits_per_component: usize,
    pub columns: usize,
}

impl Default for PredictorParams {
    fn default() -> Self {
        PredictorParams {
            predictor: Predictor::None,
            colors: 1,
            bits_per_component: 8,
            columns: 1,
        }
    }
}

impl PredictorParams {
    /// Read predictor settings from a `/DecodeParms` dictionary
    pub fn from_dict(params: Option<&Dictionary>) -> Self {
        let mut result = PredictorParams::default();
        let Some(dict) = params else {
            return result;
        };

        let int = |key: &[u8]| match dict.get(key) {
            Ok(Object::Integer(i)) if *i > 0 => Some(*i as usize),
            _ => None,
        };

        result.predictor = match int(b"Predictor") {
            Some(2) => Predictor::Tiff,
            Some(p) if p >= 10 => Predictor::Png,
            _ => Predictor::None,
        };
        result.colors = int(b"Colors").unwrap_or(1);
        result.bits_per_component = int(b"BitsPerComponent").unwrap_or(8);
        result.columns = int(b"Columns").unwrap_or(1);
        result
    }

    /// Bytes per complete pixel, at least one
    fn pixel_bytes(&self) -> usize {
        ((self.colors * self.bits_per_component + 7) / 8).max(1)
    }

    /// Bytes per row of samples, excluding any PNG filter-type byte
    fn row_bytes(&self) -> usize {
        (self.colors * self.bits_per_component * self.columns + 7) / 8
    }

    /// Undo the prediction on inflated data
    pub fn apply(&self, data: Vec<u8>) -> PanelResult<Vec<u8>> {
        match self.predictor {
            Predictor::None => Ok(data),
            Predictor::Png => self.undo_png(&data),
            Predictor::Tiff => self.undo_tiff(data),
        }
    }

    fn undo_png(&self, data: &[u8]) -> PanelResult<Vec<u8>> {
        let row_bytes = self.row_bytes();
        let bpp = self.pixel_bytes();
        let stride = row_bytes + 1;

        if row_bytes % bpp != 0 {
            return Err(PanelError::UnsupportedFilter(format!(
                "PNG predictor with {}-bit pixels over {} columns", self.colors * self.bits_per_component, self.columns)));
        }

        // A trailing partial row is dropped rather than failing the whole image
        let whole_rows = data.len() / stride * stride;
        png::decode_frame(&data[..whole_rows], bpp, row_bytes / bpp)
            .map_err(|e| PanelError::PdfError(format!("PNG predictor: {}", e)))
    }

    fn undo_tiff(&self, mut data: Vec<u8>) -> PanelResult<Vec<u8>> {
        if self.bits_per_component != 8 {
            return Err(PanelError::UnsupportedFilter(format!(
                "TIFF predictor with {} bits per component", self.bits_per_component)));
        }

        let row_bytes = self.row_bytes();
        let colors = self.colors;
        for row in data.chunks_mut(row_bytes) {
            for i in colors..row.len() {
                row[i] = row[i].wrapping_add(row[i - colors]);
            }
        }
        Ok(data)
    }
}
