//! Content stream interpretation for image placement
//!
//! Walks a page's content stream tracking the current transformation matrix
//! through `q`, `Q` and `cm`, descending into form XObjects, and records where
//! each image XObject is painted. Images referenced by the page's resources
//! but never painted are still listed, without a placement.

use std::collections::HashMap;
use log::{debug, warn};
use lopdf::content::Content;
use lopdf::{Dictionary, Object, ObjectId, Stream};

use crate::errors::PanelResult;
use crate::geometry::{BoundingBox, Matrix};
use super::document::{name, number, PdfDocument};

/// Nesting limit for form XObjects
const MAX_FORM_DEPTH: usize = 8;

/// An image XObject used by a page
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Object id of the image stream
    pub object_id: ObjectId,
    /// Placement in PDF user space, when the image is painted by the page
    pub placement: Option<BoundingBox>,
}

/// Collects image XObjects and their placements for one page
pub struct ImageCollector<'a> {
    doc: &'a PdfDocument,
    order: Vec<ObjectId>,
    placements: HashMap<ObjectId, BoundingBox>,
}

impl<'a> ImageCollector<'a> {
    pub fn new(doc: &'a PdfDocument) -> Self {
        ImageCollector {
            doc,
            order: Vec::new(),
            placements: HashMap::new(),
        }
    }

    /// List the images of a page in resource order with their placements
    pub fn collect(mut self, page_id: ObjectId) -> PanelResult<Vec<PageImage>> {
        let doc = self.doc;
        let resources = doc.page_resources(page_id);

        if let Some(resources) = resources {
            self.enumerate(resources, 0);
        }

        let content = doc.page_content(page_id)?;
        self.walk(&content, resources, Matrix::identity(), 0);

        debug!("Page {:?}: {} images, {} placed", page_id, self.order.len(), self.placements.len());

        let placements = self.placements;
        Ok(self.order.into_iter()
            .map(|object_id| PageImage {
                object_id,
                placement: placements.get(&object_id).copied(),
            })
            .collect())
    }

    /// Record every image reachable from a resource dictionary
    fn enumerate(&mut self, resources: &Dictionary, depth: usize) {
        for (id, stream) in self.xobjects(resources) {
            match subtype(stream) {
                Some(b"Image") => {
                    if !self.order.contains(&id) {
                        self.order.push(id);
                    }
                }
                Some(b"Form") if depth < MAX_FORM_DEPTH => {
                    if let Some(form_resources) = self.form_resources(stream) {
                        self.enumerate(form_resources, depth + 1);
                    }
                }
                _ => {}
            }
        }
    }

    /// XObject streams declared in a resource dictionary
    fn xobjects(&self, resources: &Dictionary) -> Vec<(ObjectId, &'a Stream)> {
        let doc = self.doc;
        let Some(xobjects) = resources.get(b"XObject").ok()
            .and_then(|obj| doc.resolve_dict(obj)) else {
            return Vec::new();
        };

        xobjects.iter()
            .filter_map(|(_, obj)| match obj {
                Object::Reference(id) => match doc.inner().get_object(*id) {
                    Ok(Object::Stream(stream)) => Some((*id, stream)),
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }

    fn form_resources(&self, form: &'a Stream) -> Option<&'a Dictionary> {
        let doc = self.doc;
        form.dict.get(b"Resources").ok().and_then(|obj| doc.resolve_dict(obj))
    }

    /// Interpret a content stream, recording image placements
    fn walk(&mut self, content: &[u8], resources: Option<&Dictionary>, base: Matrix, depth: usize) {
        let content = match Content::decode(content) {
            Ok(c) => c,
            Err(e) => {
                warn!("Could not decode content stream: {}", e);
                return;
            }
        };

        let mut ctm = base;
        let mut stack: Vec<Matrix> = Vec::new();

        for op in &content.operations {
            match op.operator.as_str() {
                "q" => stack.push(ctm),
                "Q" => {
                    if let Some(saved) = stack.pop() {
                        ctm = saved;
                    }
                }
                "cm" => {
                    let values: Option<Vec<f64>> = op.operands.iter().map(number).collect();
                    match values.as_deref().and_then(Matrix::from_slice) {
                        Some(m) => ctm = m.then(&ctm),
                        None => debug!("Ignoring malformed cm operands: {:?}", op.operands),
                    }
                }
                "Do" => {
                    let Some(xobject_name) = op.operands.first().and_then(name) else {
                        continue;
                    };
                    if let Some(resources) = resources {
                        self.paint(xobject_name, resources, ctm, depth);
                    }
                }
                _ => {}
            }
        }
    }

    /// Handle a `Do` operator
    fn paint(&mut self, xobject_name: &[u8], resources: &Dictionary, ctm: Matrix, depth: usize) {
        let doc = self.doc;
        let target = resources.get(b"XObject").ok()
            .and_then(|obj| doc.resolve_dict(obj))
            .and_then(|dict| dict.get(xobject_name).ok());

        let Some(Object::Reference(id)) = target else {
            debug!("XObject {} not found in resources", String::from_utf8_lossy(xobject_name));
            return;
        };
        let id = *id;

        let Ok(Object::Stream(stream)) = doc.inner().get_object(id) else {
            return;
        };

        match subtype(stream) {
            Some(b"Image") => {
                self.placements.entry(id).or_insert_with(|| ctm.unit_square_bounds());
                if !self.order.contains(&id) {
                    self.order.push(id);
                }
            }
            Some(b"Form") => {
                if depth >= MAX_FORM_DEPTH {
                    warn!("Form XObject nesting exceeds {}, skipping", MAX_FORM_DEPTH);
                    return;
                }
                let form_matrix = stream.dict.get(b"Matrix").ok()
                    .and_then(|obj| match doc.resolve(obj) {
                        Some(Object::Array(items)) => {
                            let values: Option<Vec<f64>> = items.iter().map(number).collect();
                            values.as_deref().and_then(Matrix::from_slice)
                        }
                        _ => None,
                    })
                    .unwrap_or_default();

                let form_content = stream.decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone());
                let form_resources = self.form_resources(stream).or(Some(resources));

                self.walk(&form_content, form_resources, form_matrix.then(&ctm), depth + 1);
            }
            _ => {}
        }
    }
}

fn subtype(stream: &Stream) -> Option<&[u8]> {
    stream.dict.get(b"Subtype").ok().and_then(name)
}
