//! Recursive traversal of a container into a display tree.

use super::node::{join_path, DisplayNode, NodeKind};
use crate::error::Result;

/// Kind of object stored at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A group holding other objects.
    Group,
    /// A dataset (anything that is not a group).
    Dataset,
}

/// Read-only view of a hierarchical container, addressed by path.
pub trait Container {
    /// Names of the direct children of the group at `path`.
    fn member_names(&self, path: &str) -> Result<Vec<String>>;

    /// Classify the object at `path`.
    fn object_kind(&self, path: &str) -> Result<ObjectKind>;

    /// Attribute names of the object at `path`, in the container's native order.
    fn attr_names(&self, path: &str) -> Result<Vec<String>>;
}

/// Build the display tree for the group at `root_path`.
///
/// The returned node stands for `root_path` itself and is labelled `root_label`.
/// Children are sorted case-insensitively; attribute nodes trail the structural
/// children at every level. Any read error aborts the whole walk.
pub fn populate<C: Container + ?Sized>(
    container: &C,
    root_path: &str,
    root_label: &str,
) -> Result<DisplayNode> {
    let mut root = DisplayNode::new(root_label, root_path, NodeKind::Group);
    populate_group(container, root_path, &mut root)?;
    append_attributes(container, root_path, &mut root)?;

    tracing::debug!(
        root = root_path,
        nodes = root.descendant_count(),
        "populated display tree"
    );
    Ok(root)
}

fn populate_group<C: Container + ?Sized>(
    container: &C,
    path: &str,
    parent: &mut DisplayNode,
) -> Result<()> {
    let mut names = container.member_names(path)?;
    names.sort_by_key(|name| name.to_lowercase());

    for name in names {
        let child_path = join_path(path, &name);
        let mut item = match container.object_kind(&child_path)? {
            ObjectKind::Group => {
                let mut group = DisplayNode::new(name, child_path.clone(), NodeKind::Group);
                populate_group(container, &child_path, &mut group)?;
                group
            },
            ObjectKind::Dataset => DisplayNode::new(name, child_path.clone(), NodeKind::Dataset),
        };

        append_attributes(container, &child_path, &mut item)?;
        parent.add_child(item);
    }

    Ok(())
}

fn append_attributes<C: Container + ?Sized>(
    container: &C,
    path: &str,
    item: &mut DisplayNode,
) -> Result<()> {
    for attr in container.attr_names(path)? {
        item.add_child(DisplayNode::new(attr, path, NodeKind::Attribute));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::H5LensError;
    use std::collections::BTreeMap;

    /// In-memory container used to exercise the walker.
    #[derive(Debug, Default)]
    pub(crate) struct MemoryContainer {
        groups: BTreeMap<String, Vec<String>>,
        datasets: Vec<String>,
        attrs: BTreeMap<String, Vec<String>>,
        pub(crate) fail_on: Option<String>,
    }

    impl MemoryContainer {
        pub(crate) fn new() -> Self {
            let mut container = Self::default();
            container.groups.insert("/".to_string(), Vec::new());
            container
        }

        fn register(&mut self, parent: &str, name: &str) -> String {
            self.groups
                .get_mut(parent)
                .expect("parent group exists")
                .push(name.to_string());
            join_path(parent, name)
        }

        pub(crate) fn group(&mut self, parent: &str, name: &str) -> String {
            let path = self.register(parent, name);
            self.groups.insert(path.clone(), Vec::new());
            path
        }

        pub(crate) fn dataset(&mut self, parent: &str, name: &str) -> String {
            let path = self.register(parent, name);
            self.datasets.push(path.clone());
            path
        }

        pub(crate) fn attr(&mut self, path: &str, name: &str) {
            self.attrs
                .entry(path.to_string())
                .or_default()
                .push(name.to_string());
        }

        fn check(&self, path: &str) -> Result<()> {
            match &self.fail_on {
                Some(bad) if bad == path => Err(H5LensError::node_not_found(path)),
                _ => Ok(()),
            }
        }
    }

    impl Container for MemoryContainer {
        fn member_names(&self, path: &str) -> Result<Vec<String>> {
            self.check(path)?;
            self.groups
                .get(path)
                .cloned()
                .ok_or_else(|| H5LensError::node_not_found(path))
        }

        fn object_kind(&self, path: &str) -> Result<ObjectKind> {
            self.check(path)?;
            if self.groups.contains_key(path) {
                Ok(ObjectKind::Group)
            } else if self.datasets.iter().any(|d| d == path) {
                Ok(ObjectKind::Dataset)
            } else {
                Err(H5LensError::node_not_found(path))
            }
        }

        fn attr_names(&self, path: &str) -> Result<Vec<String>> {
            Ok(self.attrs.get(path).cloned().unwrap_or_default())
        }
    }

    fn sample() -> MemoryContainer {
        let mut c = MemoryContainer::new();
        let beta = c.group("/", "beta");
        c.dataset(&beta, "Zeta");
        c.dataset(&beta, "alpha");
        let inner = c.group(&beta, "Inner");
        c.dataset(&inner, "x");
        c.attr(&inner, "created");
        c.dataset("/", "Alpha");
        let gamma = c.dataset("/", "gamma");
        c.attr(&gamma, "units");
        c.attr(&gamma, "long_name");
        c.attr(&beta, "description");
        c.attr("/", "title");
        c
    }

    fn collect_paths(node: &DisplayNode, out: &mut Vec<String>) {
        out.push(node.key());
        for child in &node.children {
            collect_paths(child, out);
        }
    }

    #[test]
    fn root_children_sorted_case_insensitively() {
        let tree = populate(&sample(), "/", "sample.h5").unwrap();
        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "gamma", "title"]);
        assert!(tree.children[3].is_attribute());
    }

    #[test]
    fn attributes_trail_structural_children() {
        let tree = populate(&sample(), "/", "sample.h5").unwrap();
        let beta = &tree.children[1];
        let names: Vec<&str> = beta.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "Inner", "Zeta", "description"]);

        fn check(node: &DisplayNode) {
            let first_attr = node.children.iter().position(|c| c.is_attribute());
            if let Some(pos) = first_attr {
                assert!(node.children[pos..].iter().all(|c| c.is_attribute()));
            }
            node.children.iter().for_each(check);
        }
        check(&tree);
    }

    #[test]
    fn attribute_order_follows_container() {
        let tree = populate(&sample(), "/", "sample.h5").unwrap();
        let gamma = &tree.children[2];
        let names: Vec<&str> = gamma.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["units", "long_name"]);
        assert!(gamma.children.iter().all(|c| c.path == "/gamma"));
    }

    #[test]
    fn paths_have_single_separators() {
        let tree = populate(&sample(), "/", "sample.h5").unwrap();
        let mut paths = Vec::new();
        collect_paths(&tree, &mut paths);
        assert!(paths.iter().all(|p| !p.contains("//")));
        assert!(paths.contains(&"/beta/Inner/x".to_string()));
        assert_eq!(tree.children[0].path, "/Alpha");
    }

    #[test]
    fn every_object_and_attribute_appears_once() {
        let tree = populate(&sample(), "/", "sample.h5").unwrap();
        let mut keys = Vec::new();
        collect_paths(&tree, &mut keys);
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
        // root, 3 under root, 3 under beta, 1 under Inner, 5 attributes
        assert_eq!(total, 1 + 3 + 3 + 1 + 5);
    }

    #[test]
    fn walking_twice_is_deterministic() {
        let container = sample();
        let first = populate(&container, "/", "sample.h5").unwrap();
        let second = populate(&container, "/", "sample.h5").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn walk_can_start_below_root() {
        let tree = populate(&sample(), "/beta", "beta").unwrap();
        assert_eq!(tree.path, "/beta");
        assert_eq!(tree.children[1].children[0].path, "/beta/Inner/x");
    }

    #[test]
    fn read_error_aborts_population() {
        let mut container = sample();
        container.fail_on = Some("/beta/Inner".to_string());
        assert!(populate(&container, "/", "sample.h5").is_err());
    }
}
