//! Input discovery, path rebasing and the output sink.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::builder::BuildError;
use crate::record::FileRecord;

const GLOB_CHARS: &[char] = &['*', '?', '[', ']', '{', '}'];

/// The literal directory prefix of an input pattern.
///
/// A directory is its own base. Otherwise the base is made of the pattern's
/// components up to the first one containing a glob metacharacter, and a
/// plain file path yields its parent directory.
pub fn pattern_base(pattern: &str) -> PathBuf {
    let path = Path::new(pattern);
    if path.is_dir() {
        return normalize(path);
    }

    let mut base = PathBuf::new();
    let mut literal = true;

    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::Normal(part) if part.to_string_lossy().contains(GLOB_CHARS) => {
                literal = false;
                break;
            }
            _ => base.push(component),
        }
    }

    if literal {
        base.pop();
    }

    base
}

/// Drop `.` components so `./docs/a.md` and `docs/a.md` compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| *component != Component::CurDir)
        .collect()
}

/// Read every file named by the input patterns.
///
/// Each pattern is a file, a directory (walked recursively) or a glob.
/// Files matched by more than one pattern are read once.
pub fn read_inputs(patterns: &[String]) -> Result<Vec<FileRecord>, BuildError> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for pattern in patterns {
        let base = pattern_base(pattern);
        let mut files = Vec::new();

        let path = Path::new(pattern);
        if path.is_file() || path.is_dir() {
            collect_files(path, &mut files);
        } else {
            let entries = glob::glob(pattern)
                .map_err(|e| BuildError::PatternError(format!("{}: {}", pattern, e)))?;

            for entry in entries {
                let entry = entry.map_err(|e| BuildError::ReadError(e.to_string()))?;
                collect_files(&entry, &mut files);
            }
        }

        if files.is_empty() {
            tracing::warn!("No files match {}", pattern);
            continue;
        }

        for file in files.iter().map(|file| normalize(file)) {
            if !seen.insert(file.clone()) {
                continue;
            }

            let contents = fs::read(&file)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", file.display(), e)))?;

            tracing::debug!("Read {}", file.display());
            records.push(FileRecord::new(file, base.clone(), contents));
        }
    }

    Ok(records)
}

fn collect_files(path: &Path, files: &mut Vec<PathBuf>) {
    if path.is_file() {
        files.push(path.to_path_buf());
        return;
    }

    let mut entries: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();

    entries.sort();
    files.extend(entries);
}

/// Keep only image records.
pub fn images(records: &[FileRecord]) -> Vec<FileRecord> {
    records
        .iter()
        .filter(|record| record.kind().is_image())
        .cloned()
        .collect()
}

/// Strip the literal directory prefix of the matching input pattern from
/// each record's path and base.
///
/// When several patterns match, the longest prefix is used.
pub fn rebase(records: Vec<FileRecord>, patterns: &[String]) -> Vec<FileRecord> {
    let bases: Vec<PathBuf> = patterns
        .iter()
        .map(|p| pattern_base(p))
        .filter(|base| !base.as_os_str().is_empty())
        .collect();

    records
        .into_iter()
        .map(|mut record| {
            let prefix = bases
                .iter()
                .filter(|base| record.path.starts_with(base))
                .max_by_key(|base| base.components().count());

            if let Some(prefix) = prefix {
                let path = record.path.strip_prefix(prefix).map(Path::to_path_buf);
                let base = record.base.strip_prefix(prefix).map(Path::to_path_buf);

                if let Ok(path) = path {
                    record.path = path;
                }
                record.base = base.unwrap_or_default();
            }

            record
        })
        .collect()
}

/// Write records under the output directory, creating directories as needed.
pub fn write_records(records: &[FileRecord], out_dir: &Path) -> Result<usize, BuildError> {
    for record in records {
        let dest = record.output_path(out_dir);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| BuildError::WriteError(format!("{}: {}", parent.display(), e)))?;
        }

        fs::write(&dest, &record.contents)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", dest.display(), e)))?;

        tracing::debug!("Wrote {}", dest.display());
    }

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn patterns(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pattern_bases() {
        assert_eq!(pattern_base("examples/**"), PathBuf::from("examples"));
        assert_eq!(pattern_base("docs/*.md"), PathBuf::from("docs"));
        assert_eq!(pattern_base("docs/pages/index.md"), PathBuf::from("docs/pages"));
        assert_eq!(pattern_base("*.md"), PathBuf::new());
        assert_eq!(pattern_base("a/b[0-9]/c.md"), PathBuf::from("a"));
        assert_eq!(pattern_base("./examples/**"), PathBuf::from("examples"));
        assert_eq!(pattern_base("./docs/./pages/index.md"), PathBuf::from("docs/pages"));
    }

    #[test]
    fn rebases_on_dot_prefixed_patterns() {
        let records = vec![FileRecord::new(
            "examples/nested/example.pdf",
            "examples",
            "pdf",
        )];

        let rebased = rebase(records, &patterns(&["./examples/**"]));

        assert_eq!(rebased[0].path, PathBuf::from("nested/example.pdf"));
    }

    #[test]
    fn reads_dot_prefixed_patterns_without_dot_components() {
        let temp = tempfile::tempdir_in(".").unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir_all(docs.join("partials")).unwrap();
        fs::write(docs.join("index.md"), "# Index").unwrap();
        fs::write(docs.join("partials/intro.md"), "# Intro").unwrap();

        let glob = format!("{}/**/*.md", docs.display());
        assert!(glob.starts_with("./"));

        let records = read_inputs(&[glob, docs.display().to_string()]).unwrap();

        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(!record.path.starts_with("."));
            assert!(record.path.starts_with(&record.base));
        }
        assert!(records.iter().any(|r| r.matches("partials/intro")));
    }

    #[test]
    fn rebases_on_pattern_prefix() {
        let records = vec![FileRecord::new(
            "examples/nested/example.pdf",
            "examples",
            "pdf",
        )];

        let rebased = rebase(records, &patterns(&["examples/**"]));

        assert_eq!(rebased[0].path, PathBuf::from("nested/example.pdf"));
        assert_eq!(rebased[0].base, PathBuf::new());
    }

    #[test]
    fn rebases_on_longest_prefix() {
        let records = vec![FileRecord::new("docs/api/index.md", "docs/api", "")];

        let rebased = rebase(records, &patterns(&["docs/**", "docs/api/*.md"]));

        assert_eq!(rebased[0].path, PathBuf::from("index.md"));
    }

    #[test]
    fn leaves_unmatched_records_alone() {
        let records = vec![FileRecord::new("other/page.md", "other", "")];

        let rebased = rebase(records, &patterns(&["docs/**"]));

        assert_eq!(rebased[0].path, PathBuf::from("other/page.md"));
    }

    #[test]
    fn filters_images() {
        let records = vec![
            FileRecord::new("logo.png", "", ""),
            FileRecord::new("Palette.svg", "", ""),
            FileRecord::new("photo.jpeg", "", ""),
            FileRecord::new("index.md", "", ""),
            FileRecord::new("example.pdf", "", ""),
        ];

        let kept: Vec<PathBuf> = images(&records).into_iter().map(|r| r.path).collect();

        assert_eq!(
            kept,
            vec![
                PathBuf::from("logo.png"),
                PathBuf::from("Palette.svg"),
                PathBuf::from("photo.jpeg"),
            ]
        );
    }

    #[test]
    fn reads_directories_globs_and_files() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        fs::create_dir_all(docs.join("nested")).unwrap();
        fs::write(docs.join("index.md"), "# Index").unwrap();
        fs::write(docs.join("nested/page.md"), "# Page").unwrap();
        fs::write(docs.join("nested/logo.png"), [0u8, 1]).unwrap();

        let dir = docs.display().to_string();
        let glob = format!("{}/**/*.md", dir);
        let file = docs.join("index.md").display().to_string();

        let records = read_inputs(&[dir.clone()]).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.base == docs));

        let records = read_inputs(&[glob, file]).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.base == docs));
    }

    #[test]
    fn unmatched_patterns_are_skipped() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("missing/*.md").display().to_string();

        let records = read_inputs(&[missing]).unwrap();

        assert!(records.is_empty());
    }

    #[test]
    fn invalid_patterns_are_errors() {
        let result = read_inputs(&patterns(&["docs/[.md"]));

        assert!(matches!(result, Err(BuildError::PatternError(_))));
    }

    #[test]
    fn writes_records() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("out");
        let records = vec![
            FileRecord::new("index.html", "", "<p>Hi</p>"),
            FileRecord::new("nested/logo.png", "", vec![1u8, 2, 3]),
        ];

        let written = write_records(&records, &out).unwrap();

        assert_eq!(written, 2);
        assert_eq!(fs::read_to_string(out.join("index.html")).unwrap(), "<p>Hi</p>");
        assert_eq!(fs::read(out.join("nested/logo.png")).unwrap(), vec![1u8, 2, 3]);
    }
}
