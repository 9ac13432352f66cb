//! Word package handling
//!
//! A `.docx` file is a zip container; the text lives in
//! `word/document.xml`. [`Package`] opens the container and carries every
//! part through verbatim, [`Document`] models the body as paragraphs of
//! formatted runs so substitution can preserve run formatting. Anything
//! the model does not understand is kept as a raw XML slice and written
//! back unchanged.

mod model;
mod package;
mod parse;

pub use model::{
    Block, Document, ParaChild, Paragraph, Run, RunContent, RowItem, Table, TableCell, TableItem,
    TableRow,
};
pub use package::Package;
