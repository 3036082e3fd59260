//! Integration tests for pdfweave.
//!
//! These tests exercise the full merge flow over synthetic PDF
//! documents built in memory, so no binary fixtures are needed.

use lopdf::{Document, Object, Stream, dictionary};
use pdfweave::engine::outline::{Bookmark, install_outline, read_outline};

/// PDF standard padding bytes for the standard security handler.
const PAD_BYTES: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01,
    0x08, 0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53,
    0x69, 0x7A,
];

/// Build a document whose pages are text pages (`Some(text)`) or blank
/// pages (`None`).
pub fn build_document(pages: &[Option<&str>]) -> Document {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.new_object_id();
    doc.objects.insert(
        font_id,
        Object::Dictionary(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        }),
    );

    let mut page_ids = Vec::new();
    for spec in pages {
        let content = match spec {
            Some(text) => format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET").into_bytes(),
            None => b"q Q".to_vec(),
        };
        let content_id = doc.new_object_id();
        doc.objects
            .insert(content_id, Object::Stream(Stream::new(dictionary! {}, content)));

        let page_id = doc.new_object_id();
        let page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        };
        doc.objects.insert(page_id, Object::Dictionary(page));
        page_ids.push(page_id);
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|&id| id.into()).collect::<Vec<Object>>(),
        "Count" => pages.len() as i64,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.new_object_id();
    doc.objects.insert(
        catalog_id,
        Object::Dictionary(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        }),
    );
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Serialize a document to bytes.
pub fn to_bytes(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("failed to save document");
    bytes
}

/// Build a PDF with one text page per entry.
pub fn text_pdf(texts: &[&str]) -> Vec<u8> {
    let pages: Vec<Option<&str>> = texts.iter().map(|t| Some(*t)).collect();
    to_bytes(build_document(&pages))
}

/// Build a PDF from text/blank page specs.
pub fn pdf_from_pages(pages: &[Option<&str>]) -> Vec<u8> {
    to_bytes(build_document(pages))
}

/// Build a PDF with text pages and an outline.
///
/// Bookmarks are `(level, title, 1-based page)` in display order.
pub fn pdf_with_outline(texts: &[&str], bookmarks: &[(usize, &str, usize)]) -> Vec<u8> {
    let pages: Vec<Option<&str>> = texts.iter().map(|t| Some(*t)).collect();
    let mut doc = build_document(&pages);

    let entries: Vec<Bookmark> = bookmarks
        .iter()
        .map(|&(level, title, page)| Bookmark {
            level,
            title: title.to_string(),
            page,
        })
        .collect();
    install_outline(&mut doc, &entries).expect("failed to install outline");

    to_bytes(doc)
}

/// Simple RC4 for test encryption.
fn rc4_transform(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut s: Vec<u8> = (0..=255).collect();
    let mut j: usize = 0;
    for i in 0..256 {
        j = (j + s[i] as usize + key[i % key.len()] as usize) & 0xFF;
        s.swap(i, j);
    }
    let mut out = Vec::with_capacity(data.len());
    let mut i: usize = 0;
    j = 0;
    for &byte in data {
        i = (i + 1) & 0xFF;
        j = (j + s[i] as usize) & 0xFF;
        s.swap(i, j);
        out.push(byte ^ s[(s[i] as usize + s[j] as usize) & 0xFF]);
    }
    out
}

/// Build an RC4-encrypted single-page PDF protected by `user_password`.
pub fn encrypted_pdf(user_password: &[u8]) -> Vec<u8> {
    use lopdf::StringFormat;

    let file_id = b"weavetestfileid1";
    let permissions: i32 = -4;

    let mut padded_pw = Vec::with_capacity(32);
    let pw_len = user_password.len().min(32);
    padded_pw.extend_from_slice(&user_password[..pw_len]);
    padded_pw.extend_from_slice(&PAD_BYTES[..32 - pw_len]);

    let o_key_digest = md5::compute(&padded_pw);
    let o_key = &o_key_digest[..5];
    let o_value = rc4_transform(o_key, &padded_pw);

    let mut key_input = Vec::with_capacity(128);
    key_input.extend_from_slice(&padded_pw);
    key_input.extend_from_slice(&o_value);
    key_input.extend_from_slice(&(permissions as u32).to_le_bytes());
    key_input.extend_from_slice(file_id);
    let key_digest = md5::compute(&key_input);
    let enc_key = key_digest[..5].to_vec();

    let u_value = rc4_transform(&enc_key, &PAD_BYTES);

    let mut doc = build_document(&[Some("Top secret")]);

    // Encrypt strings and streams with per-object keys.
    for (&obj_id, obj) in doc.objects.iter_mut() {
        let mut obj_key_input = Vec::with_capacity(10);
        obj_key_input.extend_from_slice(&enc_key);
        obj_key_input.extend_from_slice(&obj_id.0.to_le_bytes()[..3]);
        obj_key_input.extend_from_slice(&obj_id.1.to_le_bytes()[..2]);
        let obj_key_digest = md5::compute(&obj_key_input);
        let obj_key_len = (enc_key.len() + 5).min(16);
        let obj_key = &obj_key_digest[..obj_key_len];

        match obj {
            Object::Stream(stream) => {
                let encrypted = rc4_transform(obj_key, &stream.content);
                stream.set_content(encrypted);
            }
            Object::String(content, _) => {
                *content = rc4_transform(obj_key, content);
            }
            _ => {}
        }
    }

    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1_i64,
        "R" => 2_i64,
        "Length" => 40_i64,
        "O" => Object::String(o_value, StringFormat::Literal),
        "U" => Object::String(u_value, StringFormat::Literal),
        "P" => permissions as i64,
    });
    doc.trailer.set("Encrypt", Object::Reference(encrypt_id));
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(file_id.to_vec(), StringFormat::Literal),
            Object::String(file_id.to_vec(), StringFormat::Literal),
        ]),
    );

    to_bytes(doc)
}

/// Number of pages in a serialized document.
pub fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes)
        .expect("failed to reload document")
        .get_pages()
        .len()
}

/// Text of one page (1-based) of a serialized document.
pub fn page_text(bytes: &[u8], page_number: u32) -> String {
    let doc = Document::load_mem(bytes).expect("failed to reload document");
    doc.extract_text(&[page_number])
        .expect("failed to extract text")
        .trim()
        .to_string()
}

/// Outline of a serialized document as `(level, title, page)` tuples.
pub fn outline_of(bytes: &[u8]) -> Vec<(usize, String, Option<usize>)> {
    let doc = Document::load_mem(bytes).expect("failed to reload document");
    read_outline(&doc)
        .into_iter()
        .map(|entry| (entry.level, entry.title, entry.page))
        .collect()
}
