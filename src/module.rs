//! Mutable module tree and its flattening into output files.
//!
//! A `Module` owns its dependencies exclusively. Builders assemble a tree
//! bottom-up, callers relocate whole subtrees with [`Module::unshift`], and
//! [`Module::flatten`] resolves the tree into a flat file list. Flattening
//! freezes the subtree: any later mutation fails with
//! [`CodegenError::ModuleFrozen`].

use crate::error::CodegenError;
use std::cell::Cell;
use std::collections::BTreeMap;

/// Comment prepended to every emitted source file.
pub const GENERATED_HEADER: &str = "// this file was automatically generated, do not edit\n";

/// One output artifact: a path relative to the output root, and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub path: String,
    pub content: String,
}

/// What a module emits at its own path.
#[derive(Debug, Clone)]
pub enum ModuleContent {
    /// Text supplied by a builder, emitted verbatim (plus header).
    Supplied(String),
    /// Content computed at flatten time: one `export *` line per
    /// path-bearing child.
    ReExports,
    /// Computed re-export lines followed by supplied text.
    Mixed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleState {
    Building,
    Flattened,
}

/// A node of the module tree.
#[derive(Debug)]
pub struct Module {
    export_name: String,
    path: Option<String>,
    content: ModuleContent,
    deps: Vec<Module>,
    state: Cell<ModuleState>,
}

impl Module {
    /// A module with builder-supplied content at a fixed path.
    pub fn content(export_name: impl Into<String>, path: impl Into<String>, text: String) -> Self {
        Self::new(export_name, Some(path.into()), ModuleContent::Supplied(text))
    }

    /// A module whose content is re-export lines over its children.
    ///
    /// A pathless re-export module emits no file of its own; its children
    /// surface in the nearest path-bearing ancestor.
    pub fn re_export(export_name: impl Into<String>, path: Option<String>) -> Self {
        Self::new(export_name, path, ModuleContent::ReExports)
    }

    /// A module emitting re-export lines followed by its own text.
    pub fn mixed(export_name: impl Into<String>, path: impl Into<String>, text: String) -> Self {
        Self::new(export_name, Some(path.into()), ModuleContent::Mixed(text))
    }

    fn new(export_name: impl Into<String>, path: Option<String>, content: ModuleContent) -> Self {
        Self {
            export_name: export_name.into(),
            path,
            content,
            deps: Vec::new(),
            state: Cell::new(ModuleState::Building),
        }
    }

    pub fn export_name(&self) -> &str {
        &self.export_name
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Append a dependency. Fails once this module has been flattened.
    pub fn push_dep(&mut self, child: Module) -> Result<(), CodegenError> {
        if self.state.get() == ModuleState::Flattened {
            return Err(self.frozen("push_dep"));
        }
        self.deps.push(child);
        Ok(())
    }

    /// Prepend `prefix` (one or more `/`-separated segments) to this
    /// module's path and every descendant's path.
    ///
    /// The check runs over the whole subtree before any path changes, so a
    /// frozen descendant never leaves the tree half-moved.
    pub fn unshift(&mut self, prefix: &str) -> Result<(), CodegenError> {
        self.ensure_unfrozen("unshift")?;
        self.apply_prefix(prefix);
        Ok(())
    }

    fn ensure_unfrozen(&self, operation: &'static str) -> Result<(), CodegenError> {
        if self.state.get() == ModuleState::Flattened {
            return Err(self.frozen(operation));
        }
        for dep in &self.deps {
            dep.ensure_unfrozen(operation)?;
        }
        Ok(())
    }

    fn apply_prefix(&mut self, prefix: &str) {
        if let Some(path) = &self.path {
            self.path = Some(format!("{prefix}/{path}"));
        }
        for dep in &mut self.deps {
            dep.apply_prefix(prefix);
        }
    }

    fn frozen(&self, operation: &'static str) -> CodegenError {
        CodegenError::ModuleFrozen {
            module: self.export_name.clone(),
            operation,
        }
    }

    /// Resolve the tree into its output files.
    ///
    /// Depth-first in push order, each module before its dependencies.
    /// Freezes the subtree on success; calling again yields byte-identical
    /// output. Two modules resolving to the same path must carry the same
    /// content; the duplicate is emitted once.
    pub fn flatten(&self) -> Result<Vec<File>, CodegenError> {
        let mut files = Vec::new();
        let mut seen: BTreeMap<String, String> = BTreeMap::new();
        self.collect(&mut files, &mut seen)?;
        self.freeze();
        Ok(files)
    }

    fn collect(
        &self,
        files: &mut Vec<File>,
        seen: &mut BTreeMap<String, String>,
    ) -> Result<(), CodegenError> {
        if let Some(path) = &self.path {
            let body = match &self.content {
                ModuleContent::Supplied(text) => text.clone(),
                ModuleContent::ReExports => self.export_lines(&dir_of(path)).concat(),
                ModuleContent::Mixed(text) => {
                    let lines = self.export_lines(&dir_of(path)).concat();
                    if lines.is_empty() {
                        text.clone()
                    } else {
                        format!("{lines}\n{text}")
                    }
                }
            };
            let content = format!("{GENERATED_HEADER}{body}");
            match seen.get(path) {
                Some(existing) if *existing != content => {
                    return Err(CodegenError::PathCollision { path: path.clone() });
                }
                Some(_) => {}
                None => {
                    seen.insert(path.clone(), content.clone());
                    files.push(File {
                        path: path.clone(),
                        content,
                    });
                }
            }
        }
        for dep in &self.deps {
            dep.collect(files, seen)?;
        }
        Ok(())
    }

    /// One `export *` line per path-bearing child, relative to `from_dir`.
    /// Pathless children contribute their own children instead.
    fn export_lines(&self, from_dir: &str) -> Vec<String> {
        let mut lines = Vec::new();
        for dep in &self.deps {
            match &dep.path {
                Some(path) => {
                    let target = relative_import(from_dir, path);
                    lines.push(format!("export * from \"{target}\";\n"));
                }
                None => lines.extend(dep.export_lines(from_dir)),
            }
        }
        lines
    }

    fn freeze(&self) {
        self.state.set(ModuleState::Flattened);
        for dep in &self.deps {
            dep.freeze();
        }
    }
}

/// The directory part of a path, empty for top-level files.
fn dir_of(path: &str) -> String {
    match path.rfind('/') {
        Some(i) => path[..i].to_string(),
        None => String::new(),
    }
}

/// A TypeScript import specifier for `to_path` relative to `from_dir`,
/// with the `.ts` extension stripped.
fn relative_import(from_dir: &str, to_path: &str) -> String {
    let target = to_path.strip_suffix(".ts").unwrap_or(to_path);
    let from: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let to: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let ups = from.len() - common;
    let mut out = String::new();
    if ups == 0 {
        out.push_str("./");
    } else {
        for _ in 0..ups {
            out.push_str("../");
        }
    }
    out.push_str(&to[common..].join("/"));
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn leaf(name: &str, path: &str) -> Module {
        Module::content(name, path, format!("export type {name} = string;\n"))
    }

    #[test]
    fn test_flatten_emits_self_before_deps_in_push_order() {
        let mut root = Module::re_export("root", Some("index.ts".to_string()));
        root.push_dep(leaf("B", "b.ts")).unwrap();
        root.push_dep(leaf("A", "a.ts")).unwrap();
        let files = root.flatten().unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["index.ts", "b.ts", "a.ts"]);
    }

    #[test]
    fn test_re_export_content_points_at_children() {
        let mut root = Module::re_export("root", Some("index.ts".to_string()));
        root.push_dep(leaf("Configuration", "configuration/configuration.ts"))
            .unwrap();
        let files = root.flatten().unwrap();
        assert_eq!(
            files[0].content,
            format!("{GENERATED_HEADER}export * from \"./configuration/configuration\";\n")
        );
    }

    #[test]
    fn test_unshift_prefixes_whole_subtree() {
        let mut child = Module::re_export("states", Some("index.ts".to_string()));
        child.push_dep(leaf("Foo", "foo.ts")).unwrap();
        let mut root = Module::re_export("root", Some("index.ts".to_string()));
        child.unshift("states").unwrap();
        root.push_dep(child).unwrap();
        root.unshift("bot").unwrap();
        let files = root.flatten().unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["bot/index.ts", "bot/states/index.ts", "bot/states/foo.ts"]
        );
    }

    #[test]
    fn test_relative_import_escapes_directories() {
        assert_eq!(relative_import("", "configuration/index.ts"), "./configuration/index");
        assert_eq!(relative_import("bot/states", "bot/states/foo.ts"), "./foo");
        assert_eq!(relative_import("bot/states", "bot/events/foo.ts"), "../events/foo");
        assert_eq!(relative_import("a/b", "c.ts"), "../../c");
    }

    #[test]
    fn test_mixed_module_places_re_exports_first() {
        let mut root = Module::mixed(
            "root",
            "index.ts",
            "export type Events = {};\n".to_string(),
        );
        root.push_dep(leaf("Created", "created.ts")).unwrap();
        let files = root.flatten().unwrap();
        assert_eq!(
            files[0].content,
            format!("{GENERATED_HEADER}export * from \"./created\";\n\nexport type Events = {{}};\n")
        );
    }

    #[test]
    fn test_pathless_re_export_surfaces_grandchildren() {
        let mut group = Module::re_export("group", None);
        group.push_dep(leaf("Foo", "foo.ts")).unwrap();
        let mut root = Module::re_export("root", Some("index.ts".to_string()));
        root.push_dep(group).unwrap();
        let files = root.flatten().unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].content.contains("export * from \"./foo\";"));
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let mut root = Module::re_export("root", Some("index.ts".to_string()));
        root.push_dep(leaf("Foo", "foo.ts")).unwrap();
        let first = root.flatten().unwrap();
        let second = root.flatten().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mutation_after_flatten_fails() {
        let mut root = Module::re_export("root", Some("index.ts".to_string()));
        root.flatten().unwrap();
        let err = root.unshift("bot").unwrap_err();
        assert!(matches!(err, CodegenError::ModuleFrozen { operation: "unshift", .. }));
        let err = root.push_dep(leaf("Foo", "foo.ts")).unwrap_err();
        assert!(matches!(err, CodegenError::ModuleFrozen { operation: "push_dep", .. }));
    }

    #[test]
    fn test_distinct_content_at_same_path_collides() {
        let mut root = Module::re_export("root", None);
        root.push_dep(Module::content("A", "dup.ts", "export type A = 1;\n".to_string()))
            .unwrap();
        root.push_dep(Module::content("B", "dup.ts", "export type B = 2;\n".to_string()))
            .unwrap();
        let err = root.flatten().unwrap_err();
        let CodegenError::PathCollision { path } = err else {
            panic!("expected a path collision");
        };
        assert_eq!(path, "dup.ts");
    }

    #[test]
    fn test_identical_content_at_same_path_is_emitted_once() {
        let mut root = Module::re_export("root", None);
        root.push_dep(leaf("A", "dup.ts")).unwrap();
        root.push_dep(leaf("A", "dup.ts")).unwrap();
        let files = root.flatten().unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_last_applied_prefix_is_outermost() {
        let mut module = leaf("Foo", "foo.ts");
        module.unshift("inner").unwrap();
        module.unshift("outer").unwrap();
        assert_eq!(module.path(), Some("outer/inner/foo.ts"));
    }
}
