//! Local issue cache: reading the key → issue map and replacing it from the export command.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::NamedTempFile;

use crate::api::IssueMap;

#[derive(Debug, thiserror::Error)]
pub enum CacheUnavailable {
    #[error("issue cache {0} does not exist")]
    Missing(PathBuf),
    #[error("failed to read issue cache {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("issue cache {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("no export command configured")]
    NotConfigured,
    #[error("failed to run export command `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("export command `{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("export command produced invalid issue JSON: {0}")]
    InvalidOutput(#[source] serde_json::Error),
    #[error("failed to write issue cache {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub fn read_issues(path: &Path) -> Result<IssueMap, CacheUnavailable> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CacheUnavailable::Missing(path.to_path_buf())
        } else {
            CacheUnavailable::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_issues(content.as_bytes()).map_err(|source| CacheUnavailable::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse an issue map. Entries without their own `key` take it from the map key.
fn parse_issues(content: &[u8]) -> serde_json::Result<IssueMap> {
    let mut issues: IssueMap = serde_json::from_slice(content)?;
    for (key, issue) in issues.iter_mut() {
        if issue.key.is_empty() {
            issue.key.clone_from(key);
        }
    }
    Ok(issues)
}

/// Read the cache, treating an unusable cache as empty so the menu still renders.
pub fn read_issues_or_empty(path: &Path) -> IssueMap {
    match read_issues(path) {
        Ok(issues) => issues,
        Err(e) => {
            tracing::warn!(error = %e, "issue cache unavailable, summaries will be blank");
            IssueMap::new()
        }
    }
}

/// Run the export command and replace the cache with its output.
/// Returns the number of issues written. On any failure the old cache is left alone.
pub fn refresh(command: &[String], path: &Path) -> Result<usize, RefreshError> {
    let (program, args) = command.split_first().ok_or(RefreshError::NotConfigured)?;

    tracing::info!(%program, "running issue export");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| RefreshError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(RefreshError::Failed {
            program: program.clone(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let issues = parse_issues(&output.stdout).map_err(RefreshError::InvalidOutput)?;

    replace_file(path, &output.stdout).map_err(|source| RefreshError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(count = issues.len(), path = %path.display(), "issue cache replaced");
    Ok(issues.len())
}

type AtomicWriter = fn(&Path, &Path, &[u8]) -> io::Result<()>;

/// Replace `path` with `content` via a temp file + rename in the same directory.
/// Falls back to writing in place when the temp file cannot be created or renamed.
pub fn replace_file(path: &Path, content: &[u8]) -> io::Result<()> {
    replace_file_with(path, content, atomic_write)
}

fn replace_file_with(path: &Path, content: &[u8], write: AtomicWriter) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;

    match write(dir, path, content) {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "atomic replace failed, overwriting in place"
            );
            fs::write(path, content)
        }
    }
}

fn atomic_write(dir: &Path, path: &Path, content: &[u8]) -> io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
