//! Event-based parser for `word/document.xml`
//!
//! The reader tracks byte positions so that unmodeled elements can be
//! sliced out of the source verbatim and carried through serialization
//! untouched. Only `w:p`, `w:r`, `w:t` and the table skeleton are lifted
//! into the model.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::docx::model::{
    Block, Document, ParaChild, Paragraph, Run, RunContent, RowItem, Table, TableCell, TableItem,
    TableRow,
};
use crate::error::{DocmergeError, Result};

impl Document {
    /// Parse `word/document.xml` text into the body model
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut pos = 0usize;

        loop {
            let (_, event, _) = next_event(&mut reader, &mut pos)?;
            match event {
                Event::Start(e) if e.local_name().as_ref() == b"body" => {
                    let preamble = xml[..pos].to_string();
                    let (blocks, body_end) =
                        parse_blocks(&mut reader, xml, &mut pos, b"body")?;
                    let postamble = xml[body_end..].to_string();
                    return Ok(Document {
                        preamble,
                        blocks,
                        postamble,
                    });
                }
                Event::Eof => {
                    return Err(DocmergeError::TemplateFormat(
                        "document has no <w:body> element".to_string(),
                    ))
                }
                _ => {}
            }
        }
    }
}

fn malformed(detail: impl std::fmt::Display) -> DocmergeError {
    DocmergeError::TemplateFormat(format!("invalid document XML: {}", detail))
}

fn next_event<'a>(
    reader: &mut Reader<&'a [u8]>,
    pos: &mut usize,
) -> Result<(usize, Event<'a>, usize)> {
    let start = *pos;
    let event = reader.read_event().map_err(malformed)?;
    let end = reader.buffer_position();
    *pos = end;
    Ok((start, event, end))
}

/// Skip to the matching end tag and return the whole element as raw XML
fn capture_element<'a>(
    reader: &mut Reader<&'a [u8]>,
    xml: &'a str,
    pos: &mut usize,
    start: usize,
    element: &BytesStart<'_>,
) -> Result<String> {
    let end_tag = element.to_end().into_owned();
    reader.read_to_end(end_tag.name()).map_err(malformed)?;
    *pos = reader.buffer_position();
    Ok(xml[start..*pos].to_string())
}

/// Parse a block sequence up to the closing tag named `end_local`.
///
/// Returns the blocks and the byte offset where the closing tag starts.
fn parse_blocks<'a>(
    reader: &mut Reader<&'a [u8]>,
    xml: &'a str,
    pos: &mut usize,
    end_local: &[u8],
) -> Result<(Vec<Block>, usize)> {
    let mut blocks = Vec::new();
    loop {
        let (start, event, _) = next_event(reader, pos)?;
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => blocks.push(Block::Paragraph(parse_paragraph(reader, xml, pos)?)),
                b"tbl" => blocks.push(Block::Table(parse_table(reader, xml, pos)?)),
                _ => blocks.push(Block::Raw(capture_element(reader, xml, pos, start, &e)?)),
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => blocks.push(Block::Paragraph(Paragraph {
                    props: None,
                    children: Vec::new(),
                })),
                _ => blocks.push(Block::Raw(xml[start..*pos].to_string())),
            },
            Event::End(e) if e.local_name().as_ref() == end_local => {
                return Ok((blocks, start))
            }
            Event::End(e) => {
                return Err(malformed(format!(
                    "unexpected </{}>",
                    String::from_utf8_lossy(e.name().as_ref())
                )))
            }
            Event::Eof => return Err(malformed("unexpected end of input")),
            _ => {}
        }
    }
}

fn parse_paragraph<'a>(
    reader: &mut Reader<&'a [u8]>,
    xml: &'a str,
    pos: &mut usize,
) -> Result<Paragraph> {
    let mut props = None;
    let mut children = Vec::new();
    loop {
        let (start, event, _) = next_event(reader, pos)?;
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"pPr" => props = Some(capture_element(reader, xml, pos, start, &e)?),
                b"r" => children.push(ParaChild::Run(parse_run(reader, xml, pos)?)),
                _ => children.push(ParaChild::Raw(capture_element(reader, xml, pos, start, &e)?)),
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"pPr" => props = Some(xml[start..*pos].to_string()),
                b"r" => children.push(ParaChild::Run(Run {
                    props: None,
                    content: Vec::new(),
                })),
                _ => children.push(ParaChild::Raw(xml[start..*pos].to_string())),
            },
            Event::End(e) if e.local_name().as_ref() == b"p" => {
                return Ok(Paragraph { props, children })
            }
            Event::End(_) => return Err(malformed("mismatched element inside <w:p>")),
            Event::Eof => return Err(malformed("unterminated <w:p>")),
            _ => {}
        }
    }
}

fn parse_run<'a>(
    reader: &mut Reader<&'a [u8]>,
    xml: &'a str,
    pos: &mut usize,
) -> Result<Run> {
    let mut props = None;
    let mut content = Vec::new();
    loop {
        let (start, event, _) = next_event(reader, pos)?;
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"rPr" => props = Some(capture_element(reader, xml, pos, start, &e)?),
                b"t" => content.push(RunContent::Text(read_text(reader, pos, b"t")?)),
                _ => content.push(RunContent::Raw(capture_element(reader, xml, pos, start, &e)?)),
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"rPr" => props = Some(xml[start..*pos].to_string()),
                b"t" => content.push(RunContent::Text(String::new())),
                _ => content.push(RunContent::Raw(xml[start..*pos].to_string())),
            },
            Event::End(e) if e.local_name().as_ref() == b"r" => {
                return Ok(Run { props, content })
            }
            Event::End(_) => return Err(malformed("mismatched element inside <w:r>")),
            Event::Eof => return Err(malformed("unterminated <w:r>")),
            _ => {}
        }
    }
}

/// Collect text content up to the closing tag named `end_local`
fn read_text(
    reader: &mut Reader<&[u8]>,
    pos: &mut usize,
    end_local: &[u8],
) -> Result<String> {
    let mut text = String::new();
    loop {
        let (_, event, _) = next_event(reader, pos)?;
        match event {
            Event::Text(t) => text.push_str(&t.unescape().map_err(malformed)?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::End(e) if e.local_name().as_ref() == end_local => return Ok(text),
            Event::Eof => return Err(malformed("unterminated text element")),
            _ => {}
        }
    }
}

fn parse_table<'a>(
    reader: &mut Reader<&'a [u8]>,
    xml: &'a str,
    pos: &mut usize,
) -> Result<Table> {
    let mut items = Vec::new();
    loop {
        let (start, event, _) = next_event(reader, pos)?;
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tr" => items.push(TableItem::Row(parse_table_row(reader, xml, pos)?)),
                _ => items.push(TableItem::Raw(capture_element(reader, xml, pos, start, &e)?)),
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tr" => items.push(TableItem::Row(TableRow { items: Vec::new() })),
                _ => items.push(TableItem::Raw(xml[start..*pos].to_string())),
            },
            Event::End(e) if e.local_name().as_ref() == b"tbl" => {
                return Ok(Table { items })
            }
            Event::End(_) => return Err(malformed("mismatched element inside <w:tbl>")),
            Event::Eof => return Err(malformed("unterminated <w:tbl>")),
            _ => {}
        }
    }
}

fn parse_table_row<'a>(
    reader: &mut Reader<&'a [u8]>,
    xml: &'a str,
    pos: &mut usize,
) -> Result<TableRow> {
    let mut items = Vec::new();
    loop {
        let (start, event, _) = next_event(reader, pos)?;
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tc" => {
                    let (blocks, _) = parse_blocks(reader, xml, pos, b"tc")?;
                    items.push(RowItem::Cell(TableCell { blocks }));
                }
                _ => items.push(RowItem::Raw(capture_element(reader, xml, pos, start, &e)?)),
            },
            Event::Empty(_) => items.push(RowItem::Raw(xml[start..*pos].to_string())),
            Event::End(e) if e.local_name().as_ref() == b"tr" => {
                return Ok(TableRow { items })
            }
            Event::End(_) => return Err(malformed("mismatched element inside <w:tr>")),
            Event::Eof => return Err(malformed("unterminated <w:tr>")),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;
    const FOOTER: &str = r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr></w:body></w:document>"#;

    fn doc(body: &str) -> Document {
        Document::parse(&format!("{}{}{}", HEADER, body, FOOTER)).unwrap()
    }

    #[test]
    fn test_parse_single_run_paragraph() {
        let document = doc("<w:p><w:r><w:t>Hello</w:t></w:r></w:p>");
        let paragraphs = document.paragraphs();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text(), "Hello");
    }

    #[test]
    fn test_parse_preserves_run_properties() {
        let document = doc(
            "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>bold</w:t></w:r>\
             <w:r><w:t> plain</w:t></w:r></w:p>",
        );
        let paragraphs = document.paragraphs();
        match &paragraphs[0].children[0] {
            ParaChild::Run(run) => {
                assert_eq!(run.props.as_deref(), Some("<w:rPr><w:b/></w:rPr>"));
                assert_eq!(run.text(), "bold");
            }
            other => panic!("expected run, got {:?}", other),
        }
        assert_eq!(paragraphs[0].text(), "bold plain");
    }

    #[test]
    fn test_parse_table_cells() {
        let document = doc(
            "<w:tbl><w:tblPr/><w:tr><w:tc><w:tcPr/>\
             <w:p><w:r><w:t>cell text</w:t></w:r></w:p>\
             </w:tc></w:tr></w:tbl>",
        );
        let paragraphs = document.paragraphs();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text(), "cell text");
    }

    #[test]
    fn test_parse_unescapes_text() {
        let document = doc("<w:p><w:r><w:t>a &amp; b &lt;c&gt;</w:t></w:r></w:p>");
        assert_eq!(document.paragraphs()[0].text(), "a & b <c>");
    }

    #[test]
    fn test_roundtrip_keeps_unmodeled_xml() {
        let body = "<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr>\
                    <w:r><w:t>x</w:t></w:r></w:p>\
                    <w:bookmarkStart w:id=\"0\" w:name=\"top\"/>";
        let document = doc(body);
        let xml = document.to_xml();
        assert!(xml.contains("<w:jc w:val=\"center\"/>"));
        assert!(xml.contains("<w:bookmarkStart w:id=\"0\" w:name=\"top\"/>"));
        assert!(xml.contains("<w:sectPr>"));
        // Reparse of serialized output yields the same text
        let again = Document::parse(&xml).unwrap();
        assert_eq!(again.paragraphs()[0].text(), "x");
    }

    #[test]
    fn test_serialized_text_is_escaped() {
        let mut document = doc("<w:p><w:r><w:t>x</w:t></w:r></w:p>");
        *document.paragraphs_mut()[0]
            .text_piece_mut(0, 0)
            .unwrap() = "a < b & c".to_string();
        let xml = document.to_xml();
        assert!(xml.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_missing_body_is_rejected() {
        let err = Document::parse("<?xml version=\"1.0\"?><nope/>").unwrap_err();
        assert!(matches!(err, DocmergeError::TemplateFormat(_)));
    }
}
