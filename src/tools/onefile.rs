//! Combine the files of a repository into one Markdown document for LLM prompts.

use crate::core::error::PxError;
use crate::utils::files::{is_text_file, normal_path};
use ignore::WalkBuilder;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::collections::BTreeSet;
use std::env;
use std::ffi::OsString;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

pub const TLDR: &str = "\
# Combine all files in a repo
px onefile

# With spec to include only certain files
px onefile -s .includefiles

spec example: only *.rs except tests/*
---
*.rs
!tests/*
---

spec example: all files except tests/
---
/*
!tests/
---
";

#[derive(Debug, Clone)]
pub struct OneFileOptions {
    /// Repository root; listed paths are relative to it
    pub root: PathBuf,
    /// Gitignore-syntax file naming the files to include
    pub spec: Option<PathBuf>,
    pub output: PathBuf,
}

#[derive(Debug)]
pub struct OneFileReport {
    pub output: PathBuf,
    pub files: Vec<String>,
}

pub fn combine_files(options: &OneFileOptions) -> Result<OneFileReport, PxError> {
    let root = &options.root;
    let output = normal_path(&options.output)?;
    let output_dir_ok = output.parent().is_some_and(Path::is_dir);
    if !output_dir_ok {
        return Err(PxError::Input(format!(
            "parent directory of output {} does not exist",
            options.output.display()
        )));
    }

    let listed = list_repo_files(root)?;
    debug!(count = listed.len(), "listed repository files");

    let included: Vec<String> = match &options.spec {
        Some(spec_path) => {
            let spec = load_include_spec(root, spec_path)?;
            listed
                .into_iter()
                .filter(|f| spec.matched_path_or_any_parents(f, false).is_ignore())
                .collect()
        }
        None => listed,
    };

    let files: Vec<String> = included
        .into_iter()
        .filter(|f| {
            let full = root.join(f);
            is_text_file(&full) && normal_path(&full).map_or(true, |p| p != output)
        })
        .collect();

    let document = render_document(root, &files)?;
    fs::write(&output, document)?;
    info!(output = %output.display(), files = files.len(), "one file generated");

    Ok(OneFileReport { output, files })
}

/// Tracked files via `git ls-files` inside a git checkout, otherwise every
/// file under `root`. Paths are relative, `/`-separated and sorted.
pub fn list_repo_files(root: &Path) -> Result<Vec<String>, PxError> {
    list_repo_files_with_path(root, env::var_os("PATH"))
}

fn list_repo_files_with_path(root: &Path, search_path: Option<OsString>) -> Result<Vec<String>, PxError> {
    if root.join(".git").is_dir() {
        let git = which::which_in("git", search_path, root)
            .map_err(|_| PxError::MissingTool("git".to_string()))?;
        return git_ls_files(&git, root);
    }

    let mut files = BTreeSet::new();
    for entry in WalkBuilder::new(root).standard_filters(false).build() {
        let entry = entry?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            let parts: Vec<_> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            files.insert(parts.join("/"));
        }
    }
    Ok(files.into_iter().collect())
}

/// NUL-separated output with quoting off, so non-ASCII names come back verbatim
fn git_ls_files(git: &Path, root: &Path) -> Result<Vec<String>, PxError> {
    let output = Command::new(git)
        .args(["-c", "core.quotepath=off", "ls-files", "-z"])
        .current_dir(root)
        .output()?;
    if !output.status.success() {
        return Err(PxError::Execution(format!(
            "git ls-files failed with return code: {}, stderr: {}",
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let files: BTreeSet<String> = String::from_utf8_lossy(&output.stdout)
        .split('\0')
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    debug!(root = %root.display(), count = files.len(), "listed tracked files");
    Ok(files.into_iter().collect())
}

fn load_include_spec(root: &Path, spec_path: &Path) -> Result<Gitignore, PxError> {
    if !spec_path.is_file() {
        return Err(PxError::Input(format!(
            "spec file {} does not exist",
            spec_path.display()
        )));
    }
    let text = fs::read_to_string(spec_path)?;
    let mut builder = GitignoreBuilder::new(root);
    for line in text.lines() {
        builder.add_line(None, line)?;
    }
    Ok(builder.build()?)
}

fn render_document(root: &Path, files: &[String]) -> Result<String, PxError> {
    let mut out = String::new();
    let _ = write!(out, "files:\n```\n{}\n```\n\n", files.join("\n"));

    for file in files {
        let content = fs::read_to_string(root.join(file))?;
        // A longer fence keeps embedded code blocks intact
        let fence = if content.contains("```") { "````" } else { "```" };
        let _ = write!(out, "file: `{}`\n{}\n{}\n{}\n\n", file, fence, content, fence);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::executor::bash_in;

    fn repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("tests")).unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}\n").unwrap();
        fs::write(root.join("tests/it.rs"), "#[test]\nfn t() {}\n").unwrap();
        fs::write(root.join("README.md"), "# Demo\n```sh\ncargo run\n```\n").unwrap();
        fs::write(root.join("logo.png"), [0x89, b'P', b'N', b'G', 0, 1, 2]).unwrap();
        dir
    }

    #[test]
    fn combines_all_text_files_without_spec() {
        let dir = repo();
        let out_dir = tempfile::tempdir().unwrap();
        let options = OneFileOptions {
            root: dir.path().to_path_buf(),
            spec: None,
            output: out_dir.path().join("a.md"),
        };

        let report = combine_files(&options).unwrap();
        assert_eq!(report.files, vec!["README.md", "src/main.rs", "tests/it.rs"]);

        let doc = fs::read_to_string(out_dir.path().join("a.md")).unwrap();
        assert!(doc.starts_with("files:\n```\nREADME.md\nsrc/main.rs\ntests/it.rs\n```\n\n"));
        assert!(doc.contains("file: `src/main.rs`\n```\nfn main() {}\n\n```\n\n"));
        // README embeds a fence, so it gets four backticks
        assert!(doc.contains("file: `README.md`\n````\n# Demo\n"));
        assert!(!doc.contains("logo.png"));
    }

    #[test]
    fn spec_selects_included_files() {
        let dir = repo();
        let spec = dir.path().join(".includefiles");
        fs::write(&spec, "*.rs\n!tests/*\n").unwrap();
        let options = OneFileOptions {
            root: dir.path().to_path_buf(),
            spec: Some(spec),
            output: dir.path().join("a.md"),
        };

        let report = combine_files(&options).unwrap();
        assert_eq!(report.files, vec!["src/main.rs"]);
    }

    #[test]
    fn spec_directory_negation() {
        let dir = repo();
        let spec = dir.path().join(".includefiles");
        fs::write(&spec, "/*\n!tests/\n").unwrap();
        let options = OneFileOptions {
            root: dir.path().to_path_buf(),
            spec: Some(spec.clone()),
            output: dir.path().join("a.md"),
        };

        let report = combine_files(&options).unwrap();
        assert_eq!(report.files, vec![".includefiles", "README.md", "src/main.rs"]);
    }

    #[test]
    fn previous_output_is_not_swallowed() {
        let dir = repo();
        let options = OneFileOptions {
            root: dir.path().to_path_buf(),
            spec: None,
            output: dir.path().join("a.md"),
        };
        combine_files(&options).unwrap();
        let second = combine_files(&options).unwrap();
        assert!(!second.files.contains(&"a.md".to_string()));
    }

    #[test]
    fn missing_spec_and_bad_output_dir_are_errors() {
        let dir = repo();
        let missing_spec = OneFileOptions {
            root: dir.path().to_path_buf(),
            spec: Some(dir.path().join("nope")),
            output: dir.path().join("a.md"),
        };
        assert!(matches!(combine_files(&missing_spec), Err(PxError::Input(_))));

        let bad_output = OneFileOptions {
            root: dir.path().to_path_buf(),
            spec: None,
            output: dir.path().join("no/such/dir/a.md"),
        };
        assert!(matches!(combine_files(&bad_output), Err(PxError::Input(_))));
    }

    #[cfg(unix)]
    #[test]
    fn uses_git_ls_files_in_a_checkout() {
        if which::which("git").is_err() {
            return;
        }
        let dir = repo();
        fs::write(dir.path().join(".gitignore"), "tests/\n").unwrap();
        fs::write(dir.path().join("naïve.rs"), "// accents\n").unwrap();
        let init = bash_in("git init -q && git add -A", Some(dir.path())).unwrap();
        assert!(init.success(), "{}", init.stderr);

        let files = list_repo_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![".gitignore", "README.md", "logo.png", "naïve.rs", "src/main.rs"]
        );
    }

    #[test]
    fn checkout_without_git_on_path_is_missing_tool() {
        let dir = repo();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let empty_path = tempfile::tempdir().unwrap();

        let err = list_repo_files_with_path(dir.path(), Some(empty_path.path().into())).unwrap_err();
        assert!(matches!(err, PxError::MissingTool(ref tool) if tool == "git"), "{err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn failed_ls_files_reports_stderr() {
        if which::which("git").is_err() {
            return;
        }
        let dir = repo();
        let init = bash_in("git init -q && git add -A", Some(dir.path())).unwrap();
        assert!(init.success(), "{}", init.stderr);
        fs::write(dir.path().join(".git/index"), "not an index").unwrap();

        let err = list_repo_files(dir.path()).unwrap_err();
        match err {
            PxError::Execution(message) => {
                assert!(message.starts_with("git ls-files failed with return code: 128"), "{message}");
                assert!(message.contains("index"), "{message}");
            }
            other => panic!("expected an execution error, got {other:?}"),
        }
    }
}
