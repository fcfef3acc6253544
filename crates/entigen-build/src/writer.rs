use crate::emit::GeneratedFile;
use entigen_schema::{err, error::ErrorTree};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

/// Subdirectory owned by the generator under the caller-supplied root.
pub const GENERATED_DIR: &str = "generated";

/// Host line ending, applied at the final write step only; everything
/// upstream uses `\n`.
pub const LINE_ENDING: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Resolve the generated-output directory under the output root. A root
/// that already points at the generated directory is used as-is.
#[must_use]
pub fn generated_dir(output_root: &Path) -> PathBuf {
    if output_root.ends_with(GENERATED_DIR) {
        output_root.to_path_buf()
    } else {
        output_root.join(GENERATED_DIR)
    }
}

/// Remove previously generated files, creating the directory if absent.
/// Individual delete failures are logged and skipped (best-effort cleanup);
/// only an unusable directory is fatal.
pub fn clean_dir(output_root: &Path) -> io::Result<PathBuf> {
    let dir = generated_dir(output_root);

    if dir.exists() {
        for entry in fs::read_dir(&dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable directory entry: {e}");
                    continue;
                }
            };

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "rs")
                && let Err(e) = fs::remove_file(&path)
            {
                warn!("could not delete {}: {e}", path.display());
            }
        }
    } else {
        fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

/// Write every file record, translating newlines to the host convention.
/// A failed write is fatal for that file only; all remaining writes are
/// still attempted and the failures come back as one batch.
pub fn write_files(dir: &Path, files: &[GeneratedFile]) -> (Vec<String>, ErrorTree) {
    let mut written = Vec::with_capacity(files.len());
    let mut errs = ErrorTree::new();

    for file in files {
        let path = dir.join(format!("{}.rs", file.name));
        let contents = if LINE_ENDING == "\n" {
            file.contents.clone()
        } else {
            file.contents.replace('\n', LINE_ENDING)
        };

        match fs::write(&path, contents) {
            Ok(()) => {
                debug!("wrote {}", path.display());
                written.push(file.name.clone());
            }
            Err(e) => err!(errs, "could not write {}: {e}", path.display()),
        }
    }

    (written, errs)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, contents: &str) -> GeneratedFile {
        GeneratedFile {
            name: name.to_string(),
            contents: contents.to_string(),
        }
    }

    #[test]
    fn missing_directory_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = clean_dir(tmp.path()).unwrap();

        assert!(dir.is_dir());
        assert!(dir.ends_with(GENERATED_DIR));
    }

    #[test]
    fn stale_generated_files_are_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join(GENERATED_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stale_accessors.rs"), "old").unwrap();
        fs::write(dir.join("notes.txt"), "keep").unwrap();

        clean_dir(tmp.path()).unwrap();

        assert!(!dir.join("stale_accessors.rs").exists());
        assert!(dir.join("notes.txt").exists());
    }

    #[test]
    fn writes_every_record_and_reports_names() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = clean_dir(tmp.path()).unwrap();

        let (written, errs) = write_files(
            &dir,
            &[record("component_ids", "pub const A: usize = 0;"), record("a_accessors", "")],
        );

        assert!(errs.is_empty());
        assert_eq!(written, vec!["component_ids".to_string(), "a_accessors".to_string()]);
        assert!(dir.join("component_ids.rs").is_file());
    }

    #[test]
    fn root_already_named_generated_is_not_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join(GENERATED_DIR);
        fs::create_dir_all(&root).unwrap();

        assert_eq!(generated_dir(&root), root);
    }
}
