/*!
 * Directory traversal and entry production
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;
use indicatif::ProgressBar;
use walkdir::WalkDir;

use crate::config::Config;
use crate::content::read_content;
use crate::error::Result;
use crate::types::{ContentPolicy, Entry, EntryKind};
use crate::utils::{depth_of, normalize_rel};

/// A node handed from the traversal backend to the entry builder.
struct RawNode {
    path: PathBuf,
    is_dir: bool,
    is_symlink: bool,
}

/// A traversal failure, tied to a node when the backend knows which one.
struct RawError {
    path: Option<PathBuf>,
    message: String,
}

type RawItem = std::result::Result<RawNode, RawError>;

/// Walker over a directory tree.
///
/// Produces a lazy, depth-first, pre-order sequence of [`Entry`] values.
/// The root's own entry is not emitted; the sequence starts with its
/// depth-1 children. Sibling order is pinned by file-name sort so
/// repeated runs over an unmodified tree emit identical sequences.
///
/// Per-node failures become error entries in the same sequence; only a
/// root that cannot be resolved aborts the walk.
pub struct Scanner {
    /// Scanner configuration
    config: Config,
    /// Progress bar ticked once per file
    progress: Arc<ProgressBar>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        Self { config, progress }
    }

    /// Start a traversal, returning the lazy entry sequence.
    ///
    /// The root is canonicalized first so depth and ignore calculations
    /// are independent of the caller's working directory.
    pub fn entries(&self) -> Result<EntryIter> {
        let root = fs::canonicalize(&self.config.target_dir)?;
        let inner = self.build_backend(&root);

        Ok(EntryIter {
            root,
            policy: self.config.content_policy(),
            max_size: self.config.max_size,
            progress: Arc::clone(&self.progress),
            inner,
        })
    }

    /// Materialize the full entry list.
    pub fn scan(&self) -> Result<Vec<Entry>> {
        Ok(self.entries()?.collect())
    }

    /// Build the raw traversal iterator.
    ///
    /// Plain walks go through `walkdir`; when .gitignore rules should
    /// additionally prune the tree, the `ignore` crate's walker is used.
    /// Both prune ignored directories before descending into them.
    fn build_backend(&self, root: &Path) -> Box<dyn Iterator<Item = RawItem>> {
        let patterns = self.config.ignore_patterns.clone();
        let prune_root = root.to_path_buf();
        let output_file = self
            .config
            .output_file
            .clone()
            .map(|p| fs::canonicalize(&p).unwrap_or(p));
        let prune = move |path: &Path| {
            // never dump the output file into itself
            if let Some(out) = &output_file {
                if path.ends_with(out.as_path()) {
                    return true;
                }
            }
            should_prune(&prune_root, &patterns, path)
        };

        if self.config.respect_gitignore {
            let mut builder = WalkBuilder::new(root);
            builder
                .hidden(false)
                .parents(false)
                .ignore(false)
                .git_global(false)
                .git_exclude(false)
                .git_ignore(true)
                .require_git(false)
                .follow_links(false)
                .sort_by_file_name(|a, b| a.cmp(b))
                .filter_entry(move |e| !prune(e.path()));

            if self.config.max_depth >= 0 {
                builder.max_depth(Some(self.config.max_depth as usize));
            }
            if let Some(path) = &self.config.gitignore_path {
                builder.add_custom_ignore_filename(path);
            }

            Box::new(builder.build().filter_map(|item| match item {
                Ok(entry) => {
                    if entry.depth() == 0 {
                        return None;
                    }
                    let is_dir = entry.file_type().map_or(false, |ft| ft.is_dir());
                    let is_symlink = entry.path_is_symlink();
                    Some(Ok(RawNode {
                        path: entry.into_path(),
                        is_dir,
                        is_symlink,
                    }))
                }
                Err(err) => Some(Err(RawError {
                    path: None,
                    message: err.to_string(),
                })),
            }))
        } else {
            let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
            if self.config.max_depth >= 0 {
                walker = walker.max_depth(self.config.max_depth as usize);
            }

            Box::new(
                walker
                    .into_iter()
                    .filter_entry(move |e| !prune(e.path()))
                    .map(|item| match item {
                        Ok(entry) => {
                            let is_dir = entry.file_type().is_dir();
                            let is_symlink = entry.path_is_symlink();
                            Ok(RawNode {
                                path: entry.into_path(),
                                is_dir,
                                is_symlink,
                            })
                        }
                        Err(err) => Err(RawError {
                            path: err.path().map(Path::to_path_buf),
                            message: err
                                .io_error()
                                .map(|e| e.to_string())
                                .unwrap_or_else(|| err.to_string()),
                        }),
                    }),
            )
        }
    }
}

/// Substring ignore matching against the normalized root-relative path.
///
/// Containment is intentional: pattern "log" also prunes "catalogue/".
/// An empty pattern matches every path.
fn should_prune(root: &Path, patterns: &[String], path: &Path) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let rel = match path.strip_prefix(root) {
        Ok(rel) => normalize_rel(rel),
        Err(_) => normalize_rel(path),
    };
    patterns.iter().any(|p| rel.contains(p.as_str()))
}

/// Lazy entry sequence produced by [`Scanner::entries`].
///
/// Each pulled item visits exactly one filesystem node; no entry is
/// retained after it is handed to the consumer.
pub struct EntryIter {
    root: PathBuf,
    policy: ContentPolicy,
    max_size: u64,
    progress: Arc<ProgressBar>,
    inner: Box<dyn Iterator<Item = RawItem>>,
}

impl EntryIter {
    fn rel_of(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => normalize_rel(rel),
            Err(_) => path.to_string_lossy().into_owned(),
        }
    }

    fn build_entry(&mut self, node: RawNode) -> Entry {
        let rel = self.rel_of(&node.path);
        let depth = depth_of(&rel);

        let kind = if node.is_dir {
            EntryKind::Dir
        } else if node.is_symlink {
            EntryKind::Symlink
        } else {
            EntryKind::File
        };

        // lstat so symlinks report their own metadata
        let size = match fs::symlink_metadata(&node.path) {
            Ok(meta) => {
                if node.is_dir {
                    0
                } else {
                    meta.len()
                }
            }
            Err(err) => {
                let mut entry = Entry::new(rel, kind, 0, depth);
                entry.error = Some(err.to_string());
                return entry;
            }
        };

        let mut entry = Entry::new(rel, kind, size, depth);

        if kind == EntryKind::File {
            self.progress.inc(1);
            if size > 0 && size <= self.max_size {
                match read_content(&node.path, self.policy) {
                    Ok(content) => entry.content = content,
                    Err(err) => entry.error = Some(err.to_string()),
                }
            }
        }

        entry
    }

    fn build_error(&self, err: RawError) -> Entry {
        let (path, depth) = match err.path {
            Some(p) => {
                let rel = self.rel_of(&p);
                let depth = depth_of(&rel);
                (rel, depth)
            }
            None => (String::new(), 0),
        };
        Entry::from_error(path, depth, err.message)
    }
}

impl Iterator for EntryIter {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        match self.inner.next()? {
            Ok(node) => Some(self.build_entry(node)),
            Err(err) => Some(self.build_error(err)),
        }
    }
}
