//! PDF document access
//!
//! Thin wrapper over `lopdf` exposing the page-level lookups the extractor
//! needs: page ordering, media boxes with inheritance, resource dictionaries
//! and reference resolution.

use std::path::{Path, PathBuf};
use log::{debug, info};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::errors::{PanelError, PanelResult};
use crate::geometry::BoundingBox;

/// Maximum depth when following `/Parent` links for inherited attributes
const MAX_INHERITANCE_DEPTH: usize = 32;

/// US Letter, used when a page tree carries no MediaBox at all
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Loaded PDF document with pages in reading order
pub struct PdfDocument {
    path: PathBuf,
    doc: Document,
    page_ids: Vec<ObjectId>,
}

impl PdfDocument {
    /// Load a PDF from disk
    pub fn load<P: AsRef<Path>>(path: P) -> PanelResult<Self> {
        let path = path.as_ref();
        info!("Loading PDF {}", path.display());
        let doc = Document::load(path)?;
        Ok(Self::from_document(path.to_path_buf(), doc))
    }

    /// Wrap an already parsed document
    pub fn from_document(path: PathBuf, doc: Document) -> Self {
        // get_pages is keyed by 1-based page number, so values come out ordered
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        debug!("Document has {} pages", page_ids.len());
        PdfDocument { path, doc, page_ids }
    }

    /// Path the document was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.doc
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Object id of a page by 0-based index
    pub fn page_id(&self, index: usize) -> PanelResult<ObjectId> {
        self.page_ids.get(index).copied().ok_or(PanelError::PageOutOfRange(index))
    }

    /// Follow a reference, or return the object itself
    pub fn resolve<'a>(&'a self, object: &'a Object) -> Option<&'a Object> {
        match object {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    /// Resolve an object expected to be a dictionary
    pub fn resolve_dict<'a>(&'a self, object: &'a Object) -> Option<&'a Dictionary> {
        match self.resolve(object)? {
            Object::Dictionary(dict) => Some(dict),
            Object::Stream(stream) => Some(&stream.dict),
            _ => None,
        }
    }

    /// Look up a key on the page or the nearest ancestor that defines it
    fn inherited<'a>(&'a self, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
        let mut current = self.doc.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(value) = current.get(key) {
                return Some(value);
            }
            let parent = current.get(b"Parent").ok()?;
            current = self.resolve_dict(parent)?;
        }
        None
    }

    /// Resource dictionary of a page (possibly inherited)
    pub fn page_resources(&self, page_id: ObjectId) -> Option<&Dictionary> {
        let resources = self.inherited(page_id, b"Resources")?;
        self.resolve_dict(resources)
    }

    /// Media box in PDF user space (bottom-left origin)
    pub fn media_box(&self, page_id: ObjectId) -> BoundingBox {
        let values: Option<Vec<f64>> = self.inherited(page_id, b"MediaBox")
            .and_then(|obj| self.resolve(obj))
            .and_then(|obj| match obj {
                Object::Array(items) => items.iter()
                    .map(|item| self.resolve(item).and_then(number))
                    .collect(),
                _ => None,
            });

        let [x0, y0, x1, y1] = match values.as_deref() {
            Some([a, b, c, d]) => [*a, *b, *c, *d],
            _ => {
                debug!("Page {:?} has no usable MediaBox, assuming Letter", page_id);
                DEFAULT_MEDIA_BOX
            }
        };

        BoundingBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    /// Text shown on a page by 0-based index, one line per text object
    pub fn page_text(&self, index: usize) -> PanelResult<String> {
        self.page_id(index)?;
        Ok(self.doc.extract_text(&[(index + 1) as u32])?)
    }

    /// Decoded content stream of a page
    pub fn page_content(&self, page_id: ObjectId) -> PanelResult<Vec<u8>> {
        Ok(self.doc.get_page_content(page_id)?)
    }
}

/// Numeric value of a PDF object
pub fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// Name bytes of a PDF object
pub fn name(object: &Object) -> Option<&[u8]> {
    match object {
        Object::Name(n) => Some(n.as_slice()),
        _ => None,
    }
}

/// Convert a box from PDF user space into top-left page coordinates
pub fn to_page_space(bbox: &BoundingBox, media_box: &BoundingBox) -> BoundingBox {
    BoundingBox::new(
        bbox.min_x - media_box.min_x,
        media_box.max_y - bbox.max_y,
        bbox.max_x - media_box.min_x,
        media_box.max_y - bbox.min_y,
    )
}
