//! Substitution over the document model

use std::collections::{BTreeSet, HashSet};

use crate::config::Mapping;
use crate::docx::{Document, ParaChild, Paragraph, RunContent};
use crate::merge::report::MergeReport;
use crate::merge::scan::{scan_tokens, TokenSpan};
use crate::sheet::Row;

/// One text fragment's place in the paragraph's flat text view
#[derive(Debug, Clone, Copy)]
struct Fragment {
    /// Index into `paragraph.children`
    run: usize,
    /// Index into the run's content
    piece: usize,
    /// Byte offset of this fragment in the flat view
    start: usize,
    len: usize,
}

impl Fragment {
    fn end(&self) -> usize {
        self.start + self.len
    }
}

/// First pass: flatten a paragraph's text and record fragment offsets
fn fragments(paragraph: &Paragraph) -> (String, Vec<Fragment>) {
    let mut flat = String::new();
    let mut frags = Vec::new();
    for (run_idx, child) in paragraph.children.iter().enumerate() {
        if let ParaChild::Run(run) = child {
            for (piece_idx, content) in run.content.iter().enumerate() {
                if let RunContent::Text(text) = content {
                    frags.push(Fragment {
                        run: run_idx,
                        piece: piece_idx,
                        start: flat.len(),
                        len: text.len(),
                    });
                    flat.push_str(text);
                }
            }
        }
    }
    (flat, frags)
}

/// Token names actually present in a template document
pub fn placeholders(document: &Document) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for paragraph in document.paragraphs() {
        let (flat, _) = fragments(paragraph);
        for token in scan_tokens(&flat) {
            names.insert(flat[token.name_start..token.name_end].to_string());
        }
    }
    names
}

/// Substitute every recognized token in `document` with `row`'s values.
///
/// Tokens without a mapping entry are left untouched and reported;
/// columns missing from the row substitute the empty string. Every
/// occurrence of a token substitutes identically within this pass.
pub fn resolve_document(document: &mut Document, row: &Row, mapping: &Mapping) -> MergeReport {
    let mut report = MergeReport::default();
    for paragraph in document.paragraphs_mut() {
        resolve_paragraph(paragraph, row, mapping, &mut report);
    }
    report
}

fn resolve_paragraph(
    paragraph: &mut Paragraph,
    row: &Row,
    mapping: &Mapping,
    report: &mut MergeReport,
) {
    let (flat, frags) = fragments(paragraph);
    let tokens = scan_tokens(&flat);
    if tokens.is_empty() {
        return;
    }

    let mut consumed: HashSet<(usize, usize)> = HashSet::new();

    // Right to left, so earlier spans keep their flat-view offsets
    for token in tokens.iter().rev() {
        let name = &flat[token.name_start..token.name_end];
        let Some(column) = mapping.get(name) else {
            report.unknown.insert(name.to_string());
            continue;
        };
        report.referenced.insert(name.to_string());
        let value = row.value_string(column);
        substitute(paragraph, &frags, token, &value, &mut consumed);
    }

    prune_consumed(paragraph, &consumed);
}

/// Second pass: map one token span back onto its owning fragments.
///
/// The first overlapped fragment receives the replacement (keeping its
/// formatting); fragments fully covered by the token are emptied and
/// marked consumed; a trailing fragment keeps its text after the token.
fn substitute(
    paragraph: &mut Paragraph,
    frags: &[Fragment],
    token: &TokenSpan,
    value: &str,
    consumed: &mut HashSet<(usize, usize)>,
) {
    let overlapped: Vec<&Fragment> = frags
        .iter()
        .filter(|f| f.start < token.end && f.end() > token.start)
        .collect();

    for (i, frag) in overlapped.iter().enumerate() {
        let Some(text) = paragraph.text_piece_mut(frag.run, frag.piece) else {
            continue;
        };
        let local_start = token.start.saturating_sub(frag.start);
        let local_end = token.end.min(frag.end()) - frag.start;
        if i == 0 {
            let mut rebuilt =
                String::with_capacity(text.len() - (local_end - local_start) + value.len());
            rebuilt.push_str(&text[..local_start]);
            rebuilt.push_str(value);
            rebuilt.push_str(&text[local_end..]);
            *text = rebuilt;
        } else {
            *text = text[local_end..].to_string();
            if text.is_empty() {
                consumed.insert((frag.run, frag.piece));
            }
        }
    }
}

/// Drop fragments the substitution consumed, then runs left without
/// content. Runs that were empty in the template are not touched.
fn prune_consumed(paragraph: &mut Paragraph, consumed: &HashSet<(usize, usize)>) {
    if consumed.is_empty() {
        return;
    }

    let mut emptied_runs: HashSet<usize> = HashSet::new();
    for (run_idx, child) in paragraph.children.iter_mut().enumerate() {
        let ParaChild::Run(run) = child else { continue };
        if !consumed.iter().any(|(r, _)| *r == run_idx) {
            continue;
        }
        let old = std::mem::take(&mut run.content);
        run.content = old
            .into_iter()
            .enumerate()
            .filter(|(piece_idx, content)| {
                let is_consumed_empty = consumed.contains(&(run_idx, *piece_idx))
                    && matches!(content, RunContent::Text(t) if t.is_empty());
                !is_consumed_empty
            })
            .map(|(_, content)| content)
            .collect();
        if run.content.is_empty() {
            emptied_runs.insert(run_idx);
        }
    }

    if emptied_runs.is_empty() {
        return;
    }
    let mut idx = 0usize;
    paragraph.children.retain(|_| {
        let keep = !emptied_runs.contains(&idx);
        idx += 1;
        keep
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::Run;
    use crate::sheet::CellValue;
    use indexmap::IndexMap;

    fn run(props: Option<&str>, text: &str) -> ParaChild {
        ParaChild::Run(Run {
            props: props.map(|s| s.to_string()),
            content: vec![RunContent::Text(text.to_string())],
        })
    }

    fn para(children: Vec<ParaChild>) -> Paragraph {
        Paragraph {
            props: None,
            children,
        }
    }

    fn mapping(pairs: &[(&str, &str)]) -> Mapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn row(values: &[(&str, CellValue)]) -> Row {
        let mut map = IndexMap::new();
        for (k, v) in values {
            map.insert(k.to_string(), v.clone());
        }
        Row::from_values(1, map)
    }

    fn resolve(
        paragraph: &mut Paragraph,
        row: &Row,
        mapping: &Mapping,
    ) -> MergeReport {
        let mut report = MergeReport::default();
        resolve_paragraph(paragraph, row, mapping, &mut report);
        report
    }

    #[test]
    fn test_substitutes_token_in_single_run() {
        let mut p = para(vec![run(None, "Dear «PI», welcome")]);
        let report = resolve(
            &mut p,
            &row(&[("PI Name", CellValue::Text("Smith".into()))]),
            &mapping(&[("PI", "PI Name")]),
        );

        assert_eq!(p.text(), "Dear Smith, welcome");
        assert!(report.unknown.is_empty());
        assert!(report.referenced.contains("PI"));
    }

    #[test]
    fn test_substitutes_token_split_across_two_runs() {
        // Delimiter in one run, rest of the token in a differently-styled run
        let mut p = para(vec![
            run(Some("<w:rPr><w:b/></w:rPr>"), "«P"),
            run(Some("<w:rPr><w:i/></w:rPr>"), "I»"),
        ]);
        let report = resolve(
            &mut p,
            &row(&[("PI Name", CellValue::Text("Smith".into()))]),
            &mapping(&[("PI", "PI Name")]),
        );

        // Exactly one fragment remains, with the first run's formatting
        assert_eq!(p.children.len(), 1);
        match &p.children[0] {
            ParaChild::Run(r) => {
                assert_eq!(r.props.as_deref(), Some("<w:rPr><w:b/></w:rPr>"));
                assert_eq!(r.text(), "Smith");
            }
            other => panic!("expected run, got {:?}", other),
        }
        assert!(report.unknown.is_empty());
    }

    #[test]
    fn test_substitutes_token_split_across_three_runs() {
        let mut p = para(vec![run(None, "«"), run(None, "PI"), run(None, "»")]);
        resolve(
            &mut p,
            &row(&[("PI Name", CellValue::Text("Smith".into()))]),
            &mapping(&[("PI", "PI Name")]),
        );

        assert_eq!(p.text(), "Smith");
        assert_eq!(p.children.len(), 1);
    }

    #[test]
    fn test_split_token_keeps_surrounding_text() {
        let mut p = para(vec![run(None, "Hello «P"), run(None, "I» world")]);
        resolve(
            &mut p,
            &row(&[("PI Name", CellValue::Text("Smith".into()))]),
            &mapping(&[("PI", "PI Name")]),
        );

        assert_eq!(p.text(), "Hello Smith world");
        // Trailing run kept: it still carries " world"
        assert_eq!(p.children.len(), 2);
    }

    #[test]
    fn test_every_occurrence_substitutes_identically() {
        let mut p = para(vec![run(None, "«PI» and «PI» and «PI»")]);
        resolve(
            &mut p,
            &row(&[("PI Name", CellValue::Text("Smith".into()))]),
            &mapping(&[("PI", "PI Name")]),
        );
        assert_eq!(p.text(), "Smith and Smith and Smith");
    }

    #[test]
    fn test_unknown_token_left_untouched_and_reported() {
        let mut p = para(vec![run(None, "«PI» meets «Mystery»")]);
        let report = resolve(
            &mut p,
            &row(&[("PI Name", CellValue::Text("Smith".into()))]),
            &mapping(&[("PI", "PI Name")]),
        );

        assert_eq!(p.text(), "Smith meets «Mystery»");
        assert_eq!(
            report.unknown.iter().collect::<Vec<_>>(),
            vec!["Mystery"]
        );
    }

    #[test]
    fn test_missing_column_substitutes_empty() {
        let mut p = para(vec![run(None, "[«Gone»]")]);
        let report = resolve(
            &mut p,
            &row(&[]),
            &mapping(&[("Gone", "Absent Column")]),
        );

        assert_eq!(p.text(), "[]");
        assert!(report.unknown.is_empty());
        assert!(report.referenced.contains("Gone"));
    }

    #[test]
    fn test_empty_cell_substitutes_empty() {
        let mut p = para(vec![run(None, "x«A»y")]);
        resolve(
            &mut p,
            &row(&[("A", CellValue::Empty)]),
            &mapping(&[("A", "A")]),
        );
        assert_eq!(p.text(), "xy");
    }

    #[test]
    fn test_numeric_value_renders_without_artifacts() {
        let mut p = para(vec![run(None, "Count: «N»")]);
        resolve(
            &mut p,
            &row(&[("Count", CellValue::Number(1024.0))]),
            &mapping(&[("N", "Count")]),
        );
        assert_eq!(p.text(), "Count: 1024");
    }

    #[test]
    fn test_report_tracks_unused_mappings() {
        let mut p = para(vec![run(None, "only «Used» here")]);
        let map = mapping(&[("Used", "U"), ("Never", "N"), ("AlsoNever", "A")]);
        let report = resolve(&mut p, &row(&[("U", CellValue::Text("v".into()))]), &map);

        assert_eq!(report.unused(&map), vec!["Never", "AlsoNever"]);
        assert!(report.has_warnings(&map));
    }

    #[test]
    fn test_two_tokens_in_one_fragment() {
        let mut p = para(vec![run(None, "«A»-«B»")]);
        resolve(
            &mut p,
            &row(&[
                ("A", CellValue::Text("first".into())),
                ("B", CellValue::Text("second".into())),
            ]),
            &mapping(&[("A", "A"), ("B", "B")]),
        );
        assert_eq!(p.text(), "first-second");
    }

    #[test]
    fn test_placeholders_lists_template_tokens() {
        use crate::docx::{Block, Document};
        let document = Document {
            preamble: String::new(),
            blocks: vec![
                Block::Paragraph(para(vec![run(None, "«PI» and «Abstract»")])),
                Block::Paragraph(para(vec![run(None, "«P"), run(None, "I» again")])),
            ],
            postamble: String::new(),
        };
        let names = placeholders(&document);
        assert_eq!(
            names.iter().collect::<Vec<_>>(),
            vec!["Abstract", "PI"]
        );
    }
}
