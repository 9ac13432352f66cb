//! Document body model
//!
//! Paragraphs hold ordered runs; a run carries its formatting properties
//! as a raw `w:rPr` slice and its text as fragments. Table cells nest
//! block sequences, so paragraph iteration recurses through them.

use quick_xml::escape::escape;

/// Parsed `word/document.xml`
#[derive(Debug, Clone)]
pub struct Document {
    /// Raw XML up to and including the `<w:body>` start tag
    pub(crate) preamble: String,
    pub blocks: Vec<Block>,
    /// Raw XML from `</w:body>` to the end of the part
    pub(crate) postamble: String,
}

#[derive(Debug, Clone)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    Raw(String),
}

#[derive(Debug, Clone)]
pub struct Paragraph {
    /// Raw `w:pPr` element, emitted verbatim
    pub props: Option<String>,
    pub children: Vec<ParaChild>,
}

#[derive(Debug, Clone)]
pub enum ParaChild {
    Run(Run),
    Raw(String),
}

#[derive(Debug, Clone)]
pub struct Run {
    /// Raw `w:rPr` element, emitted verbatim
    pub props: Option<String>,
    pub content: Vec<RunContent>,
}

#[derive(Debug, Clone)]
pub enum RunContent {
    /// One `w:t` text fragment
    Text(String),
    /// Non-text run content (breaks, tabs, drawings), emitted verbatim
    Raw(String),
}

#[derive(Debug, Clone)]
pub struct Table {
    pub items: Vec<TableItem>,
}

#[derive(Debug, Clone)]
pub enum TableItem {
    Row(TableRow),
    Raw(String),
}

#[derive(Debug, Clone)]
pub struct TableRow {
    pub items: Vec<RowItem>,
}

#[derive(Debug, Clone)]
pub enum RowItem {
    Cell(TableCell),
    Raw(String),
}

#[derive(Debug, Clone)]
pub struct TableCell {
    pub blocks: Vec<Block>,
}

impl Run {
    /// Concatenated text of the run's fragments
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                RunContent::Text(t) => Some(t.as_str()),
                RunContent::Raw(_) => None,
            })
            .collect()
    }
}

impl Paragraph {
    /// Concatenated text of the paragraph's runs
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                ParaChild::Run(r) => Some(r.text()),
                ParaChild::Raw(_) => None,
            })
            .collect()
    }

    /// Mutable access to one text fragment, addressed by child and
    /// fragment index
    pub fn text_piece_mut(&mut self, run: usize, piece: usize) -> Option<&mut String> {
        match self.children.get_mut(run)? {
            ParaChild::Run(r) => match r.content.get_mut(piece)? {
                RunContent::Text(t) => Some(t),
                RunContent::Raw(_) => None,
            },
            ParaChild::Raw(_) => None,
        }
    }
}

impl Document {
    /// All paragraphs in document order, including table cells
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        let mut out = Vec::new();
        collect_paragraphs(&self.blocks, &mut out);
        out
    }

    pub fn paragraphs_mut(&mut self) -> Vec<&mut Paragraph> {
        let mut out = Vec::new();
        collect_paragraphs_mut(&mut self.blocks, &mut out);
        out
    }

    /// Serialize the model back to `word/document.xml` text
    pub fn to_xml(&self) -> String {
        let mut out =
            String::with_capacity(self.preamble.len() + self.postamble.len() + 1024);
        out.push_str(&self.preamble);
        for block in &self.blocks {
            write_block(&mut out, block);
        }
        out.push_str(&self.postamble);
        out
    }
}

fn collect_paragraphs<'a>(blocks: &'a [Block], out: &mut Vec<&'a Paragraph>) {
    for block in blocks {
        match block {
            Block::Paragraph(p) => out.push(p),
            Block::Table(table) => {
                for item in &table.items {
                    if let TableItem::Row(row) = item {
                        for row_item in &row.items {
                            if let RowItem::Cell(cell) = row_item {
                                collect_paragraphs(&cell.blocks, out);
                            }
                        }
                    }
                }
            }
            Block::Raw(_) => {}
        }
    }
}

fn collect_paragraphs_mut<'a>(blocks: &'a mut [Block], out: &mut Vec<&'a mut Paragraph>) {
    for block in blocks {
        match block {
            Block::Paragraph(p) => out.push(p),
            Block::Table(table) => {
                for item in &mut table.items {
                    if let TableItem::Row(row) = item {
                        for row_item in &mut row.items {
                            if let RowItem::Cell(cell) = row_item {
                                collect_paragraphs_mut(&mut cell.blocks, out);
                            }
                        }
                    }
                }
            }
            Block::Raw(_) => {}
        }
    }
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Paragraph(p) => write_paragraph(out, p),
        Block::Table(t) => write_table(out, t),
        Block::Raw(raw) => out.push_str(raw),
    }
}

fn write_paragraph(out: &mut String, paragraph: &Paragraph) {
    out.push_str("<w:p>");
    if let Some(props) = &paragraph.props {
        out.push_str(props);
    }
    for child in &paragraph.children {
        match child {
            ParaChild::Run(run) => write_run(out, run),
            ParaChild::Raw(raw) => out.push_str(raw),
        }
    }
    out.push_str("</w:p>");
}

fn write_run(out: &mut String, run: &Run) {
    out.push_str("<w:r>");
    if let Some(props) = &run.props {
        out.push_str(props);
    }
    for content in &run.content {
        match content {
            RunContent::Text(text) => {
                out.push_str("<w:t xml:space=\"preserve\">");
                out.push_str(&escape(text));
                out.push_str("</w:t>");
            }
            RunContent::Raw(raw) => out.push_str(raw),
        }
    }
    out.push_str("</w:r>");
}

fn write_table(out: &mut String, table: &Table) {
    out.push_str("<w:tbl>");
    for item in &table.items {
        match item {
            TableItem::Row(row) => {
                out.push_str("<w:tr>");
                for row_item in &row.items {
                    match row_item {
                        RowItem::Cell(cell) => {
                            out.push_str("<w:tc>");
                            for block in &cell.blocks {
                                write_block(out, block);
                            }
                            out.push_str("</w:tc>");
                        }
                        RowItem::Raw(raw) => out.push_str(raw),
                    }
                }
                out.push_str("</w:tr>");
            }
            TableItem::Raw(raw) => out.push_str(raw),
        }
    }
    out.push_str("</w:tbl>");
}
