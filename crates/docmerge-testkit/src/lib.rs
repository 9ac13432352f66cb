//! Test utilities for docmerge
//!
//! This crate provides shared testing utilities used across the docmerge
//! workspace: workspace-scoped temp directories, isolated converter
//! environments, fake `soffice` scripts, and workbook/template fixtures.

pub mod fixtures;

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Environment variable consulted first during converter resolution
pub const SOFFICE_ENV: &str = "DOCMERGE_SOFFICE";

/// Static mutex to serialize tests that modify environment variables
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Creates a temporary directory within `.tmp/` at the workspace root.
///
/// Centralizes test temporary files in a single gitignored location. The
/// directory cleans up automatically on drop.
pub fn temp_dir_in_workspace() -> TempDir {
    let workspace_root = std::env::current_dir().expect("Failed to get current directory");

    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base).expect("Failed to create .tmp directory");

    TempDir::new_in(&tmp_base).expect("Failed to create temporary directory in .tmp/")
}

/// Run a test with a controlled converter environment.
///
/// Sets `DOCMERGE_SOFFICE` to `soffice` (or removes it for `None`), runs
/// the closure, and restores the original value. A mutex serializes
/// access so parallel tests cannot observe each other's environment.
///
/// Resolution treats a set-but-missing override as "not found" without
/// falling back, so `Some(&missing_path)` makes converter absence
/// deterministic regardless of what the host has installed.
pub fn with_isolated_office_env<F, R>(soffice: Option<&Path>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_LOCK.lock().unwrap();

    let original = std::env::var(SOFFICE_ENV).ok();

    // SAFETY: ENV_LOCK guarantees no other test mutates the environment
    // concurrently.
    unsafe {
        match soffice {
            Some(path) => std::env::set_var(SOFFICE_ENV, path),
            None => std::env::remove_var(SOFFICE_ENV),
        }
    }

    let result = f();

    // SAFETY: ENV_LOCK is still held.
    unsafe {
        match original {
            Some(value) => std::env::set_var(SOFFICE_ENV, value),
            None => std::env::remove_var(SOFFICE_ENV),
        }
    }

    result
}

/// Write a fake `soffice` script that mimics
/// `soffice --headless --convert-to pdf --outdir <dir> <input>` by
/// creating `<dir>/<stem>.pdf`. Returns the script path.
pub fn fake_soffice(dir: &Path) -> PathBuf {
    let script = r#"#!/bin/sh
outdir=""
input=""
while [ "$#" -gt 0 ]; do
  case "$1" in
    --headless) shift ;;
    --convert-to) shift 2 ;;
    --outdir) outdir="$2"; shift 2 ;;
    *) input="$1"; shift ;;
  esac
done
base=$(basename "$input")
stem="${base%.*}"
mkdir -p "$outdir"
printf 'fake pdf content' > "$outdir/$stem.pdf"
"#;
    write_script(dir, "soffice", script)
}

/// Write a fake `soffice` that exits non-zero without producing output
pub fn failing_soffice(dir: &Path) -> PathBuf {
    let script = "#!/bin/sh\necho 'conversion failed' >&2\nexit 1\n";
    write_script(dir, "soffice-failing", script)
}

fn write_script(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write script");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&path)
            .expect("Failed to get metadata")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("Failed to set permissions");
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_in_workspace_creates_in_tmp() {
        let temp = temp_dir_in_workspace();
        let path = temp.path();

        assert!(
            path.to_string_lossy().contains(".tmp"),
            "Path should contain .tmp, got: {}",
            path.display()
        );
        assert!(path.is_dir());
    }

    #[test]
    fn test_with_isolated_office_env_sets_and_restores() {
        let original = std::env::var(SOFFICE_ENV).ok();

        let fake = PathBuf::from("/fake/soffice");
        with_isolated_office_env(Some(&fake), || {
            assert_eq!(
                std::env::var(SOFFICE_ENV).unwrap(),
                fake.to_string_lossy()
            );
        });

        with_isolated_office_env(None, || {
            assert!(std::env::var(SOFFICE_ENV).is_err());
        });

        assert_eq!(std::env::var(SOFFICE_ENV).ok(), original);
    }

    #[test]
    fn test_fake_soffice_creates_pdf() {
        use std::process::Command;

        let temp = temp_dir_in_workspace();
        let script = fake_soffice(temp.path());
        let out_dir = temp.path().join("pdf");
        let input = temp.path().join("letter.docx");
        std::fs::write(&input, "stub").unwrap();

        let status = Command::new(&script)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(&out_dir)
            .arg(&input)
            .status()
            .unwrap();

        assert!(status.success());
        assert!(out_dir.join("letter.pdf").is_file());
    }

    #[test]
    fn test_failing_soffice_exits_nonzero() {
        use std::process::Command;

        let temp = temp_dir_in_workspace();
        let script = failing_soffice(temp.path());
        let status = Command::new(&script).status().unwrap();
        assert!(!status.success());
    }
}
