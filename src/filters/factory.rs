//! Factory for creating stream filters

use lopdf::{Dictionary, Object, Stream};
use crate::errors::{PanelError, PanelResult};
use super::filter::StreamFilter;
use super::flate::FlateFilter;
use super::ascii_hex::AsciiHexFilter;

/// Factory for creating stream filters
pub struct FilterFactory;

impl FilterFactory {
    /// Create a filter for a PDF filter name, including the inline abbreviations
    pub fn create_filter(name: &[u8]) -> PanelResult<Box<dyn StreamFilter>> {
        match name {
            b"FlateDecode" | b"Fl" => Ok(Box::new(FlateFilter)),
            b"ASCIIHexDecode" | b"AHx" => Ok(Box::new(AsciiHexFilter)),
            _ => Err(PanelError::UnsupportedFilter(String::from_utf8_lossy(name).into_owned())),
        }
    }

    /// Filter names of a stream in application order, with their decode parameters
    ///
    /// `/Filter` may be a single name or an array; `/DecodeParms` mirrors it.
    pub fn chain(stream: &Stream) -> Vec<(Vec<u8>, Option<Dictionary>)> {
        let names: Vec<Vec<u8>> = match stream.dict.get(b"Filter") {
            Ok(Object::Name(n)) => vec![n.clone()],
            Ok(Object::Array(items)) => items.iter()
                .filter_map(|item| match item {
                    Object::Name(n) => Some(n.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        let params: Vec<Option<Dictionary>> = match stream.dict.get(b"DecodeParms") {
            Ok(Object::Dictionary(d)) => vec![Some(d.clone())],
            Ok(Object::Array(items)) => items.iter()
                .map(|item| match item {
                    Object::Dictionary(d) => Some(d.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        names.into_iter()
            .enumerate()
            .map(|(i, name)| (name, params.get(i).cloned().flatten()))
            .collect()
    }
}
