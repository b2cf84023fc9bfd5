//! Display node types and structures.

/// Kind of entry in the HDF5 hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Group node (including the root group).
    Group,
    /// Dataset node.
    Dataset,
    /// Attribute attached to a group or dataset.
    Attribute,
}

impl NodeKind {
    /// Icon shown next to the label.
    pub fn icon(self) -> &'static str {
        match self {
            NodeKind::Group => "📂",
            NodeKind::Dataset => "📄",
            NodeKind::Attribute => "🏷️",
        }
    }
}

/// A node in the display tree mirroring the container structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNode {
    /// Label (the child's name, or the attribute's name).
    pub name: String,
    /// Full path of the object. For attributes this is the owning object's path.
    pub path: String,
    /// Kind of node.
    pub kind: NodeKind,
    /// Structural children first, then attributes.
    pub children: Vec<DisplayNode>,
}

impl DisplayNode {
    /// Create a new node without children.
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            children: Vec::new(),
        }
    }

    /// Check if this node is a group.
    pub fn is_group(&self) -> bool {
        self.kind == NodeKind::Group
    }

    /// Check if this node is a dataset.
    pub fn is_dataset(&self) -> bool {
        self.kind == NodeKind::Dataset
    }

    /// Attribute nodes are metadata, not navigable children.
    pub fn is_attribute(&self) -> bool {
        self.kind == NodeKind::Attribute
    }

    /// Whether the node can be expanded in the tree view.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Add a child node.
    pub fn add_child(&mut self, child: DisplayNode) {
        self.children.push(child);
    }

    /// Unique key of this node inside a tree.
    ///
    /// Attributes share their owner's path, so the attribute name is appended
    /// after a `@` marker.
    pub fn key(&self) -> String {
        if self.is_attribute() {
            format!("{}@{}", self.path, self.name)
        } else {
            self.path.clone()
        }
    }

    /// Path shown to the user, e.g. `/group/data` or `/group/data/units`.
    pub fn display_path(&self) -> String {
        if self.is_attribute() {
            join_path(&self.path, &self.name)
        } else {
            self.path.clone()
        }
    }

    /// Get display name with icon and child count for groups.
    pub fn display_name(&self) -> String {
        let structural = self.children.iter().filter(|c| !c.is_attribute()).count();
        let suffix = match self.kind {
            NodeKind::Group => format!(" ({})", structural),
            NodeKind::Dataset | NodeKind::Attribute => String::new(),
        };

        format!("{} {}{}", self.kind.icon(), self.name, suffix)
    }

    /// Total number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }
}

/// Join a parent path and a child name with exactly one separator.
pub fn join_path(parent: &str, child: &str) -> String {
    if parent.ends_with('/') {
        format!("{}{}", parent, child)
    } else {
        format!("{}/{}", parent, child)
    }
}
