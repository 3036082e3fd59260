//! Thin facade over the PDF engine.
//!
//! Everything that touches `lopdf` directly lives here: opening source
//! documents from bytes, building the merged output document, outline
//! reading and writing ([`outline`]), and the page-level queries the
//! trim pass needs.
//!
//! The merge strategy is renumber-and-extend: each time pages are taken
//! from a source, a copy of the source document is renumbered above the
//! output's current maximum object id and its objects are merged into
//! the output wholesale. Only the requested pages are wired into the
//! output page tree; everything else becomes unreachable and is pruned
//! at serialization time.

pub mod outline;

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

use crate::error::{PdfWeaveError, Result};

/// Page attributes a page may inherit from its ancestors in the source
/// page tree. Pulled down onto the page dictionary on import, because
/// the output flattens the tree.
const INHERITABLE_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// A source PDF opened from bytes.
///
/// An encrypted source still opens (so it can be reported as encrypted
/// rather than unreadable) but exposes no pages.
#[derive(Debug)]
pub struct SourceDocument {
    doc: Document,
    pages: Vec<ObjectId>,
    encrypted: bool,
}

impl SourceDocument {
    /// Open a document from raw bytes.
    ///
    /// Returns [`PdfWeaveError::UnreadableDocument`] when the bytes do
    /// not parse as a PDF. Encryption is not an error here: a document
    /// that loads but carries an `Encrypt` dictionary, or that fails to
    /// load *because* of encryption, yields a handle with
    /// [`is_encrypted`](Self::is_encrypted) set.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        match Document::load_mem(bytes) {
            Ok(doc) => {
                let encrypted = doc.is_encrypted();
                let pages = if encrypted {
                    Vec::new()
                } else {
                    doc.get_pages().into_values().collect()
                };
                Ok(Self {
                    doc,
                    pages,
                    encrypted,
                })
            }
            Err(e) => {
                let message = e.to_string();
                let lowered = message.to_lowercase();
                if lowered.contains("encrypt")
                    || lowered.contains("decrypt")
                    || lowered.contains("password")
                {
                    Ok(Self {
                        doc: Document::with_version("1.5"),
                        pages: Vec::new(),
                        encrypted: true,
                    })
                } else {
                    Err(PdfWeaveError::unreadable_document(message))
                }
            }
        }
    }

    /// Whether the source is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Number of pages, in reading order. Zero for encrypted sources.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The document outline flattened to `(level, title, page)` entries.
    pub fn outline(&self) -> Vec<outline::OutlineEntry> {
        if self.encrypted {
            return Vec::new();
        }
        outline::read_outline(&self.doc)
    }

    /// Whether the document carries any outline entries.
    pub fn has_outline(&self) -> bool {
        !self.outline().is_empty()
    }
}

/// Incrementally assembled output document.
///
/// Pages are appended with [`append_pages`](Self::append_pages) in
/// output order; [`finish`](Self::finish) wires up the page tree,
/// catalog, and trailer.
pub struct OutputBuilder {
    doc: Document,
    page_ids: Vec<ObjectId>,
}

impl OutputBuilder {
    /// Start an empty output document.
    pub fn new() -> Self {
        Self {
            doc: Document::with_version("1.5"),
            page_ids: Vec::new(),
        }
    }

    /// Pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append pages from `source` by 0-based index, in the given order.
    ///
    /// Indices may repeat; every occurrence yields a distinct output
    /// page (content streams and resources stay shared). Indices must be
    /// in bounds; the orchestrator guarantees this via range expansion.
    pub fn append_pages(&mut self, source: &SourceDocument, indices: &[usize]) -> Result<()> {
        if indices.is_empty() {
            return Ok(());
        }

        let mut imported = source.doc.clone();
        imported.renumber_objects_with(self.doc.max_id + 1);
        let imported_pages: Vec<ObjectId> = imported.get_pages().into_values().collect();

        // Resolve inherited attributes while the source page tree is
        // still intact; the tree itself is not carried over.
        let mut prepared = Vec::with_capacity(indices.len());
        for &index in indices {
            let page_id = *imported_pages.get(index).ok_or_else(|| {
                PdfWeaveError::engine_failure(format!("page index {index} out of bounds"))
            })?;
            prepared.push(prepare_page_dict(&imported, page_id)?);
        }

        let imported_max = imported.max_id;
        self.doc.objects.extend(imported.objects);
        self.doc.max_id = imported_max;

        for dict in prepared {
            let id = self.doc.new_object_id();
            self.doc.objects.insert(id, Object::Dictionary(dict));
            self.page_ids.push(id);
        }

        Ok(())
    }

    /// Build the page tree, catalog, and trailer, and hand back the
    /// finished document.
    pub fn finish(mut self) -> Result<Document> {
        let pages_id = self.doc.new_object_id();

        for &page_id in &self.page_ids {
            match self.doc.get_object_mut(page_id) {
                Ok(Object::Dictionary(dict)) => {
                    dict.set("Type", Object::Name(b"Page".to_vec()));
                    dict.set("Parent", Object::Reference(pages_id));
                }
                _ => {
                    return Err(PdfWeaveError::engine_failure(
                        "output page object is not a dictionary",
                    ));
                }
            }
        }

        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.new_object_id();
        let catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        self.doc.objects.insert(catalog_id, Object::Dictionary(catalog));
        self.doc.trailer.set("Root", catalog_id);

        Ok(self.doc)
    }
}

impl Default for OutputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Clone a page dictionary for the output, with inherited attributes
/// materialized and the old Parent dropped.
fn prepare_page_dict(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut dict = doc
        .get_dictionary(page_id)
        .map_err(|e| PdfWeaveError::engine_failure(format!("bad page object: {e}")))?
        .clone();

    for key in INHERITABLE_PAGE_KEYS {
        if !dict.has(key)
            && let Some(value) = find_inherited(doc, page_id, key)
        {
            dict.set(key, value);
        }
    }

    dict.remove(b"Parent");
    Ok(dict)
}

/// Walk the Parent chain looking for an inheritable attribute.
fn find_inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = parent_of(doc, page_id);
    // Depth cap guards against cyclic Parent chains in broken files.
    for _ in 0..64 {
        let id = current?;
        let dict = doc.get_dictionary(id).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        current = parent_of(doc, id);
    }
    None
}

fn parent_of(doc: &Document, id: ObjectId) -> Option<ObjectId> {
    doc.get_dictionary(id)
        .ok()?
        .get(b"Parent")
        .ok()?
        .as_reference()
        .ok()
}

/// Extract the text of one page (1-based page number).
pub fn page_text(doc: &Document, page_number: u32) -> lopdf::Result<String> {
    doc.extract_text(&[page_number])
}

/// Whether a page's resources contain at least one image XObject.
pub fn page_has_images(doc: &Document, page_id: ObjectId) -> bool {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return false;
    };
    let Some(resources) = resolve_dict(doc, page.get(b"Resources").ok()) else {
        return false;
    };
    let Some(xobjects) = resolve_dict(doc, resources.get(b"XObject").ok()) else {
        return false;
    };

    xobjects.iter().any(|(_, value)| {
        let dict = match value {
            Object::Stream(stream) => &stream.dict,
            Object::Dictionary(dict) => dict,
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(Object::Stream(stream)) => &stream.dict,
                Ok(Object::Dictionary(dict)) => dict,
                _ => return false,
            },
            _ => return false,
        };
        matches!(dict.get(b"Subtype"), Ok(Object::Name(name)) if name == b"Image")
    })
}

/// Compress, prune unreachable objects, renumber, and write out.
pub fn serialize(mut doc: Document) -> Result<Vec<u8>> {
    doc.compress();
    doc.prune_objects();
    doc.renumber_objects();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| PdfWeaveError::engine_failure(format!("failed to serialize output: {e}")))?;
    Ok(bytes)
}

fn resolve_dict<'a>(doc: &'a Document, object: Option<&'a Object>) -> Option<&'a Dictionary> {
    match object? {
        Object::Dictionary(dict) => Some(dict),
        Object::Reference(id) => match doc.get_object(*id).ok()? {
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        },
        _ => None,
    }
}
