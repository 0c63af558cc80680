//! File-tree specification and the writer that materializes it.
//!
//! A [`FileNode`] tree is assembled bottom-up in memory, then handed to
//! [`TreeWriter::write`] exactly once. Each node's `target_dir` is relative
//! to its parent.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error};

use crate::constants::FILE_MODE;
use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;
use crate::templates::DEFAULT_PACKAGE;

/// What a file node writes.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Written verbatim
    Literal(String),
    /// Rendered from a named template; without a name the node renders a
    /// package stub named after its directory
    Template {
        name: Option<String>,
        data: serde_json::Value,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileNode {
    pub target_dir: PathBuf,
    pub is_dir: bool,
    pub content: Content,
    pub file_name: String,
    /// Omit this node only; a skipped directory is not created but its
    /// children are still visited
    pub skip: bool,
    /// Omit this node and all descendants
    pub skip_all: bool,
    /// Omit the file if the destination already exists
    pub skip_if_exist: bool,
    pub children: Vec<FileNode>,
}

impl FileNode {
    pub fn dir<P: Into<PathBuf>>(target_dir: P) -> Self {
        Self {
            target_dir: target_dir.into(),
            is_dir: true,
            content: Content::Literal(String::new()),
            file_name: String::new(),
            skip: false,
            skip_all: false,
            skip_if_exist: false,
            children: Vec::new(),
        }
    }

    fn file<S: Into<String>>(file_name: S, content: Content) -> Self {
        Self {
            target_dir: PathBuf::new(),
            is_dir: false,
            content,
            file_name: file_name.into(),
            skip: false,
            skip_all: false,
            skip_if_exist: false,
            children: Vec::new(),
        }
    }

    pub fn literal<S: Into<String>, C: Into<String>>(file_name: S, source: C) -> Self {
        Self::file(file_name, Content::Literal(source.into()))
    }

    pub fn template<S: Into<String>, N: Into<String>>(
        file_name: S,
        template: N,
        data: serde_json::Value,
    ) -> Self {
        Self::file(
            file_name,
            Content::Template {
                name: Some(template.into()),
                data,
            },
        )
    }

    /// Package stub whose package name comes from the containing directory.
    pub fn package_stub<S: Into<String>>(file_name: S) -> Self {
        Self::file(
            file_name,
            Content::Template {
                name: None,
                data: serde_json::Value::Null,
            },
        )
    }

    pub fn with_children(mut self, children: Vec<FileNode>) -> Self {
        self.children = children;
        self
    }

    pub fn child(mut self, node: FileNode) -> Self {
        self.children.push(node);
        self
    }

    /// Adds the node only when `include` holds; excluded nodes never reach
    /// the tree.
    pub fn child_if(self, include: bool, node: impl FnOnce() -> FileNode) -> Self {
        if include {
            self.child(node())
        } else {
            self
        }
    }

    pub fn skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    pub fn skip_all(mut self, skip_all: bool) -> Self {
        self.skip_all = skip_all;
        self
    }

    pub fn skip_if_exist(mut self) -> Self {
        self.skip_if_exist = true;
        self
    }

    /// Depth-first search by relative path, mostly useful for inspecting a
    /// composed tree before it is written.
    pub fn find<P: AsRef<Path>>(&self, path: P) -> Option<&FileNode> {
        fn walk<'a>(node: &'a FileNode, base: &Path, wanted: &Path) -> Option<&'a FileNode> {
            let dir = base.join(&node.target_dir);
            let own = if node.is_dir { dir.clone() } else { dir.join(&node.file_name) };
            if own == wanted {
                return Some(node);
            }
            node.children.iter().find_map(|child| walk(child, &dir, wanted))
        }
        walk(self, Path::new(""), path.as_ref())
    }

    /// Produces the bytes of a file node.
    ///
    /// # Arguments
    /// * `renderer` - Engine used for template content
    /// * `dir` - Resolved directory the file is written into
    pub fn render(&self, renderer: &dyn TemplateRenderer, dir: &Path) -> Result<String> {
        match &self.content {
            Content::Literal(source) => Ok(source.clone()),
            Content::Template { name: Some(name), data } => renderer.render_named(name, data),
            Content::Template { name: None, .. } => {
                let data = serde_json::json!({ "package_name": default_package_name(dir) });
                renderer.render_named(DEFAULT_PACKAGE, &data)
            }
        }
    }
}

/// Package name derived from the last segment of a directory path.
/// Trailing separators are ignored; a path without separators is returned
/// whole.
pub fn default_package_name<P: AsRef<Path>>(dir: P) -> String {
    let dir = dir.as_ref().to_string_lossy();
    let dir = dir.trim_end_matches('/');
    dir.rsplit('/').next().unwrap_or(dir).to_string()
}

/// Outcome of one writer pass.
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    /// Render failures; each one aborted only its own file
    pub failed: Vec<Error>,
}

impl WriteReport {
    pub fn absorb(&mut self, other: WriteReport) {
        self.written.extend(other.written);
        self.skipped.extend(other.skipped);
        self.failed.extend(other.failed);
    }
}

/// Materializes [`FileNode`] trees on the filesystem.
pub struct TreeWriter<'a> {
    renderer: &'a dyn TemplateRenderer,
}

impl<'a> TreeWriter<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer) -> Self {
        Self { renderer }
    }

    /// Writes `node` below `destination_root`.
    ///
    /// # Returns
    /// * `Result<WriteReport>` - Written, kept and failed files of the pass
    ///
    /// # Errors
    /// * `Error::IoError` on any filesystem failure; already written files
    ///   are left in place
    pub fn write(&self, node: &FileNode, destination_root: &Path) -> Result<WriteReport> {
        let mut report = WriteReport::default();
        self.write_node(node, destination_root, &mut report)?;
        Ok(report)
    }

    fn write_node(&self, node: &FileNode, parent: &Path, report: &mut WriteReport) -> Result<()> {
        if node.skip_all {
            debug!("Skipping subtree {}", parent.join(&node.target_dir).display());
            return Ok(());
        }

        let dir = parent.join(&node.target_dir);
        if node.is_dir {
            if node.skip {
                debug!("Keeping existing directory {}", dir.display());
            } else {
                fs::create_dir_all(&dir)?;
            }
            for child in &node.children {
                self.write_node(child, &dir, report)?;
            }
            return Ok(());
        }

        let target = dir.join(&node.file_name);
        if node.skip || (node.skip_if_exist && target.exists()) {
            debug!("Skipping file {}", target.display());
            report.skipped.push(target);
            return Ok(());
        }

        let content = match node.render(self.renderer, &dir) {
            Ok(content) => content,
            Err(err) => {
                let err = Error::RenderError {
                    path: target.display().to_string(),
                    reason: err.to_string(),
                };
                error!("{err}");
                report.failed.push(err);
                return Ok(());
            }
        };

        println!("creating {}...", target.display());
        write_file(&target, &content)?;
        report.written.push(target);
        Ok(())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(FILE_MODE))?;
    }
    #[cfg(not(unix))]
    let _ = FILE_MODE;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_package_name() {
        assert_eq!(
            default_package_name("out/svc/internal/modules/billing/usecase"),
            "usecase"
        );
        assert_eq!(default_package_name("out/svc/pkg/shared/"), "shared");
        assert_eq!(default_package_name("domain"), "domain");
        assert_eq!(default_package_name(""), "");
    }

    #[test]
    fn test_child_if_is_structural() {
        let tree = FileNode::dir("delivery")
            .child_if(true, || FileNode::dir("resthandler"))
            .child_if(false, || FileNode::dir("grpchandler"));
        assert_eq!(tree.children.len(), 1);
        assert!(tree.find("delivery/resthandler").is_some());
        assert!(tree.find("delivery/grpchandler").is_none());
    }

    #[test]
    fn test_find_file_node() {
        let tree = FileNode::dir("svc").child(
            FileNode::dir("internal").child(FileNode::literal("service.go", "package service")),
        );
        let node = tree.find("svc/internal/service.go").unwrap();
        assert_eq!(node.content, Content::Literal("package service".to_string()));
    }
}
