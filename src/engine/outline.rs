//! Outline (bookmark) reading and writing.
//!
//! Reading flattens a document's outline tree into a list of
//! [`OutlineEntry`] values in display order, resolving destinations
//! through direct arrays, GoTo actions, and named destinations. Writing
//! goes the other way: a flat list of [`Bookmark`] values, ordered and
//! leveled, becomes a linked outline tree installed in the catalog.
//!
//! The flat list is the canonical form throughout the crate; the tree
//! only exists inside the PDF.

use std::collections::HashSet;

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};

use crate::error::{PdfWeaveError, Result};

/// One outline entry as read from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Nesting depth, 1 for top-level entries.
    pub level: usize,
    /// Display title.
    pub title: String,
    /// 1-based target page, if the destination resolved to a page.
    pub page: Option<usize>,
}

/// One bookmark to install in an output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    /// Nesting depth, 1 for top-level entries.
    pub level: usize,
    /// Display title.
    pub title: String,
    /// 1-based target page in the output.
    pub page: usize,
}

/// Read a document's outline as a flat list in display order.
///
/// Missing or malformed outline structure yields an empty list rather
/// than an error; entries whose destination cannot be resolved keep
/// their title with `page: None`.
pub fn read_outline(doc: &Document) -> Vec<OutlineEntry> {
    let Ok(catalog) = doc.catalog() else {
        return Vec::new();
    };
    let Ok(Object::Reference(outlines_ref)) = catalog.get(b"Outlines") else {
        return Vec::new();
    };
    let Ok(outlines) = doc.get_dictionary(*outlines_ref) else {
        return Vec::new();
    };
    let Ok(Object::Reference(first_ref)) = outlines.get(b"First") else {
        return Vec::new();
    };

    let page_map = build_page_map(doc);
    let mut entries = Vec::new();
    let mut visited = HashSet::new();
    collect_outline_items(doc, *first_ref, &page_map, 1, &mut visited, &mut entries);
    entries
}

fn collect_outline_items(
    doc: &Document,
    first_id: ObjectId,
    page_map: &[(ObjectId, u32)],
    level: usize,
    visited: &mut HashSet<ObjectId>,
    entries: &mut Vec<OutlineEntry>,
) {
    let mut current_id = Some(first_id);

    while let Some(id) = current_id {
        // Sibling and child links can form cycles in broken files.
        if !visited.insert(id) {
            break;
        }
        let Ok(dict) = doc.get_dictionary(id) else {
            break;
        };

        let title = match dict.get(b"Title") {
            Ok(Object::String(bytes, _)) => decode_pdf_string(bytes),
            _ => "Untitled".to_string(),
        };
        let page = destination_page(doc, dict, page_map).map(|p| p as usize);

        entries.push(OutlineEntry { level, title, page });

        if let Ok(Object::Reference(child_ref)) = dict.get(b"First") {
            collect_outline_items(doc, *child_ref, page_map, level + 1, visited, entries);
        }

        current_id = match dict.get(b"Next") {
            Ok(Object::Reference(r)) => Some(*r),
            _ => None,
        };
    }
}

fn destination_page(doc: &Document, dict: &Dictionary, page_map: &[(ObjectId, u32)]) -> Option<u32> {
    if let Ok(dest) = dict.get(b"Dest") {
        return resolve_destination(doc, dest, page_map);
    }

    // GoTo actions, as a reference or inline.
    let action = match dict.get(b"A") {
        Ok(Object::Reference(action_ref)) => doc.get_dictionary(*action_ref).ok(),
        Ok(Object::Dictionary(action)) => Some(action),
        _ => None,
    };
    if let Some(action) = action
        && let Ok(Object::Name(kind)) = action.get(b"S")
        && kind == b"GoTo"
        && let Ok(dest) = action.get(b"D")
    {
        return resolve_destination(doc, dest, page_map);
    }

    None
}

fn resolve_destination(doc: &Document, dest: &Object, page_map: &[(ObjectId, u32)]) -> Option<u32> {
    match dest {
        Object::String(name, _) | Object::Name(name) => {
            resolve_named_destination(doc, name, page_map)
        }
        Object::Array(arr) => page_from_dest_array(arr, page_map),
        Object::Reference(r) => resolve_destination(doc, doc.get_object(*r).ok()?, page_map),
        _ => None,
    }
}

fn resolve_named_destination(
    doc: &Document,
    name: &[u8],
    page_map: &[(ObjectId, u32)],
) -> Option<u32> {
    let catalog = doc.catalog().ok()?;

    if let Ok(Object::Reference(names_ref)) = catalog.get(b"Names")
        && let Ok(names_dict) = doc.get_dictionary(*names_ref)
        && let Ok(Object::Reference(dests_ref)) = names_dict.get(b"Dests")
        && let Some(page) = search_name_tree(doc, *dests_ref, name, page_map)
    {
        return Some(page);
    }

    // Older-style Dests dictionary in the catalog.
    if let Ok(Object::Reference(dests_ref)) = catalog.get(b"Dests")
        && let Ok(dests_dict) = doc.get_dictionary(*dests_ref)
        && let Ok(dest) = dests_dict.get(name)
    {
        return resolve_destination(doc, dest, page_map);
    }

    None
}

fn search_name_tree(
    doc: &Document,
    node_id: ObjectId,
    name: &[u8],
    page_map: &[(ObjectId, u32)],
) -> Option<u32> {
    let dict = doc.get_dictionary(node_id).ok()?;

    if let Ok(Object::Array(names)) = dict.get(b"Names") {
        for pair in names.chunks(2) {
            if let [Object::String(key, _), dest] = pair
                && key == name
            {
                return resolve_destination(doc, dest, page_map);
            }
        }
    }

    if let Ok(Object::Array(kids)) = dict.get(b"Kids") {
        for kid in kids {
            if let Object::Reference(kid_ref) = kid
                && let Some(page) = search_name_tree(doc, *kid_ref, name, page_map)
            {
                return Some(page);
            }
        }
    }

    None
}

fn page_from_dest_array(arr: &[Object], page_map: &[(ObjectId, u32)]) -> Option<u32> {
    // [page_ref /XYZ left top zoom] and friends; only the page matters.
    if let Some(Object::Reference(page_ref)) = arr.first() {
        return page_map
            .iter()
            .find(|(id, _)| id == page_ref)
            .map(|(_, page)| *page);
    }
    None
}

fn build_page_map(doc: &Document) -> Vec<(ObjectId, u32)> {
    doc.get_pages()
        .into_iter()
        .map(|(num, id)| (id, num))
        .collect()
}

fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        // PDFDocEncoding treated as Latin-1, which covers the common
        // cases.
        bytes.iter().map(|&b| b as char).collect()
    }
}

fn encode_pdf_string(s: &str) -> Object {
    if s.is_ascii() {
        Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in s.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

/// Install a flat bookmark list as the document outline.
///
/// Hierarchy comes from the levels: each bookmark becomes a child of
/// the nearest preceding bookmark with a smaller level, or a top-level
/// entry when there is none. Level gaps are tolerated. A target page
/// past the end of the document is anchored to the last page.
///
/// An empty list, or a document without pages, leaves the catalog
/// untouched.
pub fn install_outline(doc: &mut Document, bookmarks: &[Bookmark]) -> Result<()> {
    if bookmarks.is_empty() {
        return Ok(());
    }
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    if pages.is_empty() {
        return Ok(());
    }

    let outline_root_id = doc.new_object_id();
    let item_ids: Vec<ObjectId> = bookmarks.iter().map(|_| doc.new_object_id()).collect();

    // Parent of each entry: nearest preceding entry with a smaller
    // level.
    let mut parents: Vec<Option<usize>> = Vec::with_capacity(bookmarks.len());
    let mut stack: Vec<usize> = Vec::new();
    for (i, bookmark) in bookmarks.iter().enumerate() {
        while let Some(&top) = stack.last() {
            if bookmarks[top].level >= bookmark.level {
                stack.pop();
            } else {
                break;
            }
        }
        parents.push(stack.last().copied());
        stack.push(i);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); bookmarks.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (i, parent) in parents.iter().enumerate() {
        match parent {
            Some(p) => children[*p].push(i),
            None => roots.push(i),
        }
    }

    for (i, bookmark) in bookmarks.iter().enumerate() {
        let page_index = bookmark.page.saturating_sub(1).min(pages.len() - 1);
        let dest = vec![
            Object::Reference(pages[page_index]),
            Object::Name(b"XYZ".to_vec()),
            Object::Null,
            Object::Null,
            Object::Null,
        ];

        let mut item = Dictionary::new();
        item.set("Title", encode_pdf_string(&bookmark.title));
        item.set(
            "Parent",
            Object::Reference(parents[i].map_or(outline_root_id, |p| item_ids[p])),
        );
        item.set("Dest", Object::Array(dest));

        let siblings = parents[i].map_or(&roots, |p| &children[p]);
        let position = siblings.iter().position(|&s| s == i).unwrap_or(0);
        if position > 0 {
            item.set("Prev", Object::Reference(item_ids[siblings[position - 1]]));
        }
        if position + 1 < siblings.len() {
            item.set("Next", Object::Reference(item_ids[siblings[position + 1]]));
        }
        if let (Some(&first), Some(&last)) = (children[i].first(), children[i].last()) {
            item.set("First", Object::Reference(item_ids[first]));
            item.set("Last", Object::Reference(item_ids[last]));
            item.set("Count", Object::Integer(descendant_count(&children, i) as i64));
        }

        doc.objects.insert(item_ids[i], Object::Dictionary(item));
    }

    let mut outline_dict = Dictionary::new();
    outline_dict.set("Type", Object::Name(b"Outlines".to_vec()));
    outline_dict.set("Count", Object::Integer(bookmarks.len() as i64));
    if let (Some(&first), Some(&last)) = (roots.first(), roots.last()) {
        outline_dict.set("First", Object::Reference(item_ids[first]));
        outline_dict.set("Last", Object::Reference(item_ids[last]));
    }
    doc.objects
        .insert(outline_root_id, Object::Dictionary(outline_dict));

    let catalog = doc
        .catalog_mut()
        .map_err(|e| PdfWeaveError::engine_failure(format!("failed to get catalog: {e}")))?;
    catalog.set("Outlines", Object::Reference(outline_root_id));

    Ok(())
}

fn descendant_count(children: &[Vec<usize>], index: usize) -> usize {
    children[index]
        .iter()
        .map(|&child| 1 + descendant_count(children, child))
        .sum()
}
