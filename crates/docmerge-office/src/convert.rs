use std::path::{Path, PathBuf};
use std::process::Command;

use crate::info::OfficeInfo;
use docmerge_core::{DocmergeError, Result};

fn conversion_err(input: &Path, reason: String) -> DocmergeError {
    DocmergeError::Conversion {
        input: input.to_path_buf(),
        reason,
    }
}

/// Convert one document to PDF in `out_dir`, returning the PDF path.
///
/// Runs `soffice --headless --convert-to pdf --outdir <out_dir> <input>`
/// synchronously and verifies the output file exists. There is no
/// timeout; a hung converter blocks the pipeline.
pub fn convert_to_pdf(office: &OfficeInfo, input: &Path, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;

    let output = Command::new(&office.path)
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(out_dir)
        .arg(input)
        .output()
        .map_err(|e| conversion_err(input, format!("failed to run soffice: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(conversion_err(
            input,
            format!("soffice failed ({}): {}", output.status, stderr.trim()),
        ));
    }

    let stem = input
        .file_stem()
        .ok_or_else(|| conversion_err(input, "input has no file name".to_string()))?;
    let pdf_path = out_dir.join(stem).with_extension("pdf");
    if !pdf_path.is_file() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(conversion_err(
            input,
            format!(
                "PDF was not created. stdout: {} stderr: {}",
                stdout.trim(),
                stderr.trim()
            ),
        ));
    }

    Ok(pdf_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::OfficeSource;
    use docmerge_testkit::{failing_soffice, fake_soffice, temp_dir_in_workspace};

    fn office(path: PathBuf) -> OfficeInfo {
        OfficeInfo {
            source: OfficeSource::EnvOverride,
            path,
        }
    }

    #[test]
    fn test_convert_creates_pdf_next_to_outdir() {
        let temp = temp_dir_in_workspace();
        let script = fake_soffice(temp.path());
        let input = temp.path().join("letter.docx");
        std::fs::write(&input, "stub").unwrap();
        let out_dir = temp.path().join("pdf");

        let pdf = convert_to_pdf(&office(script), &input, &out_dir).unwrap();
        assert_eq!(pdf, out_dir.join("letter.pdf"));
        assert!(pdf.is_file());
    }

    #[test]
    fn test_convert_reports_nonzero_exit() {
        let temp = temp_dir_in_workspace();
        let script = failing_soffice(temp.path());
        let input = temp.path().join("letter.docx");
        std::fs::write(&input, "stub").unwrap();

        let err = convert_to_pdf(&office(script), &input, &temp.path().join("pdf")).unwrap_err();
        match err {
            DocmergeError::Conversion { reason, .. } => {
                assert!(reason.contains("conversion failed"), "reason: {}", reason)
            }
            other => panic!("expected conversion error, got {}", other),
        }
    }

    #[test]
    fn test_convert_reports_missing_binary() {
        let temp = temp_dir_in_workspace();
        let input = temp.path().join("letter.docx");
        std::fs::write(&input, "stub").unwrap();

        let err = convert_to_pdf(
            &office(PathBuf::from("/nonexistent/soffice")),
            &input,
            &temp.path().join("pdf"),
        )
        .unwrap_err();
        assert!(matches!(err, DocmergeError::Conversion { .. }));
    }
}
