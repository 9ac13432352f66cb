//! Workbook and template fixtures
//!
//! Builds real `.xlsx` and `.docx` files for tests: workbooks through the
//! umya-spreadsheet writer, templates as hand-assembled OOXML packages so
//! tests can control run boundaries precisely.

use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

const DOCUMENT_CLOSE: &str = "</w:body></w:document>";

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Write a `.docx` with one single-run paragraph per entry
pub fn write_docx(path: &Path, paragraphs: &[&str]) {
    let mut body = String::new();
    for text in paragraphs {
        body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
        body.push_str(&xml_escape(text));
        body.push_str("</w:t></w:r></w:p>");
    }
    write_docx_package(path, &body);
}

/// Write a `.docx` with a single paragraph whose text is split into one
/// run per piece, with alternating formatting so adjacent runs differ in
/// style (tokens crossing a piece boundary cross a formatting boundary).
pub fn write_docx_split(path: &Path, pieces: &[&str]) {
    let mut body = String::from("<w:p>");
    for (i, piece) in pieces.iter().enumerate() {
        body.push_str("<w:r>");
        if i % 2 == 0 {
            body.push_str("<w:rPr><w:b/></w:rPr>");
        } else {
            body.push_str("<w:rPr><w:i/></w:rPr>");
        }
        body.push_str("<w:t xml:space=\"preserve\">");
        body.push_str(&xml_escape(piece));
        body.push_str("</w:t></w:r>");
    }
    body.push_str("</w:p>");
    write_docx_package(path, &body);
}

fn write_docx_package(path: &Path, body: &str) {
    let file = std::fs::File::create(path).expect("Failed to create docx fixture");
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let document = format!("{}{}{}", DOCUMENT_OPEN, body, DOCUMENT_CLOSE);
    let parts: [(&str, &str); 3] = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", RELS),
        ("word/document.xml", document.as_str()),
    ];
    for (name, contents) in parts {
        writer.start_file(name, options).expect("Failed to start zip entry");
        writer
            .write_all(contents.as_bytes())
            .expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish docx fixture");
}

/// Write an `.xlsx` workbook with one sheet: `header` as row 1 and one
/// sheet row per entry of `rows`
pub fn write_workbook(path: &Path, sheet: &str, header: &[&str], rows: &[&[&str]]) {
    let mut book = umya_spreadsheet::new_file();
    book.get_sheet_mut(&0)
        .expect("default sheet missing")
        .set_name(sheet);
    let ws = book
        .get_sheet_by_name_mut(sheet)
        .expect("renamed sheet missing");

    for (col, name) in header.iter().enumerate() {
        ws.get_cell_mut((col as u32 + 1, 1)).set_value(*name);
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                ws.get_cell_mut((col as u32 + 1, row_idx as u32 + 2))
                    .set_value(*value);
            }
        }
    }

    umya_spreadsheet::writer::xlsx::write(&book, path).expect("Failed to write workbook fixture");
}
