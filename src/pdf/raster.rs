//! Embedded raster images and their conversion to RGB
//!
//! An image XObject is described by its dictionary (dimensions, color space,
//! bits per component, filter chain) and its raw stream bytes. Decoding is
//! deferred until the region is actually extracted, so detection only ever
//! touches dictionaries.

use std::borrow::Cow;
use byteorder::{BigEndian, ByteOrder};
use image::{ImageFormat, Rgb, RgbImage};
use log::debug;
use lopdf::{Dictionary, Object, ObjectId, Stream};

use crate::errors::{PanelError, PanelResult};
use crate::filters::FilterFactory;
use crate::geometry::BoundingBox;
use super::document::{name, number, PdfDocument};

/// Color model of an embedded raster, normalized from its PDF color space
#[derive(Debug, Clone, PartialEq)]
pub enum ColorModel {
    Gray,
    Rgb,
    Cmyk,
    /// Palette image over a device base space
    Indexed {
        base: Box<ColorModel>,
        hival: usize,
        palette: Vec<u8>,
    },
    /// Anything we cannot convert to RGB, with a description
    Unsupported(String),
}

impl ColorModel {
    /// Samples per pixel in the raw data
    pub fn components(&self) -> usize {
        match self {
            ColorModel::Gray => 1,
            ColorModel::Rgb => 3,
            ColorModel::Cmyk => 4,
            ColorModel::Indexed { .. } => 1,
            ColorModel::Unsupported(_) => 0,
        }
    }

    /// Resolve a `/ColorSpace` value
    pub fn from_object(doc: &PdfDocument, object: &Object) -> ColorModel {
        let Some(object) = doc.resolve(object) else {
            return ColorModel::Unsupported("dangling color space reference".to_string());
        };

        match object {
            Object::Name(n) => Self::from_family(n),
            Object::Array(items) => {
                let family = items.first().and_then(|o| doc.resolve(o)).and_then(name).unwrap_or_default();
                match family {
                    b"ICCBased" => Self::from_icc(doc, items.get(1)),
                    b"CalGray" => ColorModel::Gray,
                    b"CalRGB" => ColorModel::Rgb,
                    b"Indexed" | b"I" => Self::from_indexed(doc, items),
                    other if items.len() == 1 => Self::from_family(other),
                    other => ColorModel::Unsupported(String::from_utf8_lossy(other).into_owned()),
                }
            }
            other => ColorModel::Unsupported(format!("{:?}", other)),
        }
    }

    fn from_family(family: &[u8]) -> ColorModel {
        match family {
            b"DeviceGray" | b"G" | b"CalGray" => ColorModel::Gray,
            b"DeviceRGB" | b"RGB" | b"CalRGB" => ColorModel::Rgb,
            b"DeviceCMYK" | b"CMYK" => ColorModel::Cmyk,
            other => ColorModel::Unsupported(String::from_utf8_lossy(other).into_owned()),
        }
    }

    fn from_icc(doc: &PdfDocument, profile: Option<&Object>) -> ColorModel {
        let Some(dict) = profile.and_then(|p| doc.resolve_dict(p)) else {
            return ColorModel::Unsupported("ICCBased without profile".to_string());
        };

        match dict.get(b"N").ok().and_then(|n| doc.resolve(n)).and_then(number) {
            Some(n) if n == 1.0 => ColorModel::Gray,
            Some(n) if n == 3.0 => ColorModel::Rgb,
            Some(n) if n == 4.0 => ColorModel::Cmyk,
            _ => match dict.get(b"Alternate") {
                Ok(alternate) => Self::from_object(doc, alternate),
                Err(_) => ColorModel::Unsupported("ICCBased with unknown component count".to_string()),
            },
        }
    }

    fn from_indexed(doc: &PdfDocument, items: &[Object]) -> ColorModel {
        let [_, base, hival, lookup] = items else {
            return ColorModel::Unsupported("malformed Indexed color space".to_string());
        };

        let base = Self::from_object(doc, base);
        if !matches!(base, ColorModel::Gray | ColorModel::Rgb | ColorModel::Cmyk) {
            return ColorModel::Unsupported(format!("Indexed over {:?}", base));
        }

        let Some(hival) = doc.resolve(hival).and_then(number) else {
            return ColorModel::Unsupported("Indexed without hival".to_string());
        };

        let palette = match doc.resolve(lookup) {
            Some(Object::String(bytes, _)) => bytes.clone(),
            Some(Object::Stream(stream)) => stream.decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
            _ => return ColorModel::Unsupported("Indexed without lookup table".to_string()),
        };

        ColorModel::Indexed {
            base: Box::new(base),
            hival: hival.max(0.0) as usize,
            palette,
        }
    }
}

/// One stage of a filter chain
#[derive(Debug, Clone)]
pub struct FilterSpec {
    pub name: Vec<u8>,
    pub params: Option<Dictionary>,
}

impl FilterSpec {
    fn is_jpeg(&self) -> bool {
        self.name == b"DCTDecode" || self.name == b"DCT"
    }
}

/// An image XObject as found on a page
#[derive(Debug, Clone)]
pub struct EmbeddedRaster {
    pub object_id: ObjectId,
    pub width: u32,
    pub height: u32,
    pub bits_per_component: u32,
    pub color: ColorModel,
    pub image_mask: bool,
    /// `/Decode` ranges, one pair per component
    pub decode: Option<Vec<f64>>,
    pub filters: Vec<FilterSpec>,
    /// Raw (still filtered) stream bytes
    pub data: Vec<u8>,
    /// Placed extent in top-left page coordinates, when known
    pub placement: Option<BoundingBox>,
}

impl EmbeddedRaster {
    /// Read an image XObject's dictionary and data
    pub fn from_stream(doc: &PdfDocument, object_id: ObjectId, stream: &Stream,
                       placement: Option<BoundingBox>) -> PanelResult<Self> {
        let dict = &stream.dict;
        let dimension = |key: &[u8]| -> PanelResult<u32> {
            dict.get(key).ok()
                .and_then(|o| doc.resolve(o))
                .and_then(number)
                .filter(|v| *v >= 1.0)
                .map(|v| v as u32)
                .ok_or_else(|| PanelError::PdfError(format!(
                    "Image {:?} has no valid /{}", object_id, String::from_utf8_lossy(key))))
        };

        let width = dimension(b"Width")?;
        let height = dimension(b"Height")?;

        let image_mask = matches!(dict.get(b"ImageMask").ok().and_then(|o| doc.resolve(o)),
                                  Some(Object::Boolean(true)));

        let bits_per_component = dict.get(b"BitsPerComponent").ok()
            .and_then(|o| doc.resolve(o))
            .and_then(number)
            .map(|v| v as u32)
            .unwrap_or(if image_mask { 1 } else { 8 });

        let color = match dict.get(b"ColorSpace") {
            Ok(cs) => ColorModel::from_object(doc, cs),
            Err(_) => ColorModel::Unsupported("no color space".to_string()),
        };

        let decode = match dict.get(b"Decode").ok().and_then(|o| doc.resolve(o)) {
            Some(Object::Array(items)) => items.iter().map(number).collect(),
            _ => None,
        };

        let filters = FilterFactory::chain(stream).into_iter()
            .map(|(name, params)| FilterSpec { name, params })
            .collect();

        Ok(EmbeddedRaster {
            object_id,
            width,
            height,
            bits_per_component,
            color,
            image_mask,
            decode,
            filters,
            data: stream.content.clone(),
            placement,
        })
    }

    /// Decode the full raster and normalize it to 8-bit RGB
    pub fn decode_rgb(&self) -> PanelResult<RgbImage> {
        if self.image_mask {
            return Err(PanelError::UnsupportedColorModel("stencil image mask".to_string()));
        }

        let (stages, jpeg) = match self.filters.split_last() {
            Some((last, rest)) if last.is_jpeg() => (rest, true),
            _ => (self.filters.as_slice(), false),
        };

        let mut data: Cow<[u8]> = Cow::Borrowed(&self.data);
        for stage in stages {
            let filter = FilterFactory::create_filter(&stage.name)?;
            data = Cow::Owned(filter.decode(&data, stage.params.as_ref())?);
        }

        if jpeg {
            debug!("Decoding {:?} as JPEG", self.object_id);
            let image = image::load_from_memory_with_format(&data, ImageFormat::Jpeg)?;
            return Ok(image.to_rgb8());
        }

        self.unpack(&data)
    }

    /// Unpack raw samples into an RGB image
    fn unpack(&self, data: &[u8]) -> PanelResult<RgbImage> {
        let components = self.color.components();
        if components == 0 {
            let description = match &self.color {
                ColorModel::Unsupported(d) => d.clone(),
                other => format!("{:?}", other),
            };
            return Err(PanelError::UnsupportedColorModel(description));
        }

        let bpc = self.bits_per_component as usize;
        if !matches!(bpc, 1 | 2 | 4 | 8 | 16) {
            return Err(PanelError::UnsupportedColorModel(format!("{} bits per component", bpc)));
        }

        let width = self.width as usize;
        let height = self.height as usize;
        let (row_bytes, needed) = width.checked_mul(components * bpc)
            .map(|bits| bits.div_ceil(8))
            .and_then(|row| row.checked_mul(height).map(|total| (row, total)))
            .ok_or_else(|| PanelError::PdfError(format!(
                "Image dimensions {}x{} overflow", self.width, self.height)))?;
        if data.len() < needed {
            return Err(PanelError::PdfError(format!(
                "Image data truncated: {} of {} bytes", data.len(), needed)));
        }

        let max_value = ((1u32 << bpc) - 1) as f64;
        let mut image = RgbImage::new(self.width, self.height);
        let mut samples = vec![0u32; components];

        for (y, row) in data.chunks(row_bytes).take(height).enumerate() {
            for x in 0..width {
                for (c, sample) in samples.iter_mut().enumerate() {
                    *sample = read_sample(row, x * components + c, bpc);
                }

                let pixel = match &self.color {
                    ColorModel::Indexed { base, hival, palette } => {
                        palette_color(base, palette, (samples[0] as usize).min(*hival))
                    }
                    color => {
                        let mut scaled = [0u8; 4];
                        for (c, raw) in samples.iter().enumerate() {
                            scaled[c] = self.scale(*raw, c, max_value, bpc);
                        }
                        device_color(color, &scaled)
                    }
                };

                image.put_pixel(x as u32, y as u32, pixel);
            }
        }

        Ok(image)
    }

    /// Map a raw sample to 0..=255, honoring `/Decode`
    fn scale(&self, raw: u32, component: usize, max_value: f64, bpc: usize) -> u8 {
        match self.decode.as_deref() {
            Some(ranges) if ranges.len() >= 2 * (component + 1) => {
                let dmin = ranges[2 * component];
                let dmax = ranges[2 * component + 1];
                let value = dmin + raw as f64 * (dmax - dmin) / max_value;
                (value * 255.0).round().clamp(0.0, 255.0) as u8
            }
            _ if bpc == 16 => (raw >> 8) as u8,
            _ if bpc == 8 => raw as u8,
            _ => (raw as f64 * 255.0 / max_value).round() as u8,
        }
    }
}

/// Read the `index`-th sample of a row
fn read_sample(row: &[u8], index: usize, bpc: usize) -> u32 {
    match bpc {
        8 => row[index] as u32,
        16 => BigEndian::read_u16(&row[2 * index..2 * index + 2]) as u32,
        _ => {
            let bit = index * bpc;
            let byte = row[bit / 8];
            let shift = 8 - bpc - (bit % 8);
            ((byte >> shift) & ((1u8 << bpc) - 1)) as u32
        }
    }
}

fn device_color(color: &ColorModel, samples: &[u8; 4]) -> Rgb<u8> {
    match color {
        ColorModel::Gray => Rgb([samples[0], samples[0], samples[0]]),
        ColorModel::Cmyk => cmyk_to_rgb(samples[0], samples[1], samples[2], samples[3]),
        _ => Rgb([samples[0], samples[1], samples[2]]),
    }
}

fn palette_color(base: &ColorModel, palette: &[u8], index: usize) -> Rgb<u8> {
    let n = base.components();
    let mut entry = [0u8; 4];
    for (c, value) in entry.iter_mut().enumerate().take(n) {
        *value = palette.get(index * n + c).copied().unwrap_or(0);
    }
    device_color(base, &entry)
}

/// Naive CMYK to RGB conversion
pub fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> Rgb<u8> {
    let channel = |v: u8| ((255 - v as u32) * (255 - k as u32) / 255) as u8;
    Rgb([channel(c), channel(m), channel(y)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Document;
    use std::path::PathBuf;

    fn raster(width: u32, height: u32, bpc: u32, color: ColorModel, data: Vec<u8>) -> EmbeddedRaster {
        EmbeddedRaster {
            object_id: (1, 0),
            width,
            height,
            bits_per_component: bpc,
            color,
            image_mask: false,
            decode: None,
            filters: Vec::new(),
            data,
            placement: None,
        }
    }

    #[test]
    fn unpacks_rgb() {
        let img = raster(2, 1, 8, ColorModel::Rgb, vec![255, 0, 0, 0, 0, 255]).decode_rgb().unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([0, 0, 255]));
    }

    #[test]
    fn unpacks_one_bit_gray_with_row_padding() {
        // 3 pixels per row, padded to a byte: 101xxxxx, 010xxxxx
        let img = raster(3, 2, 1, ColorModel::Gray, vec![0b1010_0000, 0b0100_0000]).decode_rgb().unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(1, 1), &Rgb([255, 255, 255]));
    }

    #[test]
    fn decode_array_inverts_gray() {
        let mut r = raster(1, 1, 8, ColorModel::Gray, vec![0]);
        r.decode = Some(vec![1.0, 0.0]);
        assert_eq!(r.decode_rgb().unwrap().get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn sixteen_bit_keeps_high_byte() {
        let img = raster(1, 1, 16, ColorModel::Gray, vec![0x80, 0xFF]).decode_rgb().unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([0x80, 0x80, 0x80]));
    }

    #[test]
    fn converts_cmyk() {
        let img = raster(1, 1, 8, ColorModel::Cmyk, vec![0, 255, 255, 0]).decode_rgb().unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn looks_up_palette() {
        let color = ColorModel::Indexed {
            base: Box::new(ColorModel::Rgb),
            hival: 1,
            palette: vec![10, 20, 30, 40, 50, 60],
        };
        let img = raster(2, 1, 8, color, vec![1, 0]).decode_rgb().unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([40, 50, 60]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn rejects_unsupported_models() {
        let r = raster(1, 1, 8, ColorModel::Unsupported("Lab".to_string()), vec![0, 0, 0]);
        assert!(matches!(r.decode_rgb(), Err(PanelError::UnsupportedColorModel(_))));

        let mut mask = raster(1, 1, 1, ColorModel::Gray, vec![0]);
        mask.image_mask = true;
        assert!(matches!(mask.decode_rgb(), Err(PanelError::UnsupportedColorModel(_))));
    }

    #[test]
    fn truncated_data_is_error() {
        let r = raster(4, 4, 8, ColorModel::Rgb, vec![0; 10]);
        assert!(matches!(r.decode_rgb(), Err(PanelError::PdfError(_))));
    }

    #[test]
    fn oversized_dimensions_are_error() {
        let r = raster(u32::MAX, u32::MAX, 16, ColorModel::Cmyk, vec![0; 16]);
        assert!(matches!(r.decode_rgb(), Err(PanelError::PdfError(msg)) if msg.contains("overflow")));
    }

    #[test]
    fn resolves_color_spaces() {
        let doc = PdfDocument::from_document(PathBuf::from("mem.pdf"), Document::with_version("1.5"));
        assert_eq!(ColorModel::from_object(&doc, &Object::Name(b"DeviceCMYK".to_vec())), ColorModel::Cmyk);

        let cal = Object::Array(vec![Object::Name(b"CalRGB".to_vec()), Object::Dictionary(Dictionary::new())]);
        assert_eq!(ColorModel::from_object(&doc, &cal), ColorModel::Rgb);

        let indexed = Object::Array(vec![
            Object::Name(b"Indexed".to_vec()),
            Object::Name(b"DeviceGray".to_vec()),
            Object::Integer(1),
            Object::String(vec![0, 255], lopdf::StringFormat::Hexadecimal),
        ]);
        assert!(matches!(ColorModel::from_object(&doc, &indexed), ColorModel::Indexed { hival: 1, .. }));

        let separation = Object::Array(vec![Object::Name(b"Separation".to_vec()), Object::Name(b"Spot".to_vec())]);
        assert!(matches!(ColorModel::from_object(&doc, &separation), ColorModel::Unsupported(_)));
    }
}
