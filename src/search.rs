//! Search over the display tree.
//!
//! A query is one of three forms:
//!
//! - `name`: nodes whose name contains `name`
//! - `/a/b`: nodes whose full path starts with `/a/b`, attributes included
//! - `@units`: attributes whose name contains `units`
//!
//! All matching ignores case. The root node never matches.

use crate::data::DisplayNode;

/// A parsed search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Substring of a node name.
    Name(String),
    /// Prefix of a full path.
    Path(String),
    /// Substring of an attribute name.
    Attribute(String),
}

impl SearchQuery {
    /// Parse typed text; the needle is lowercased.
    pub fn parse(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.starts_with('/') {
            SearchQuery::Path(lower)
        } else if let Some(name) = lower.strip_prefix('@') {
            SearchQuery::Attribute(name.to_string())
        } else {
            SearchQuery::Name(lower)
        }
    }

    /// Whether `node` matches.
    pub fn matches(&self, node: &DisplayNode) -> bool {
        match self {
            SearchQuery::Name(needle) => node.name.to_lowercase().contains(needle),
            SearchQuery::Path(prefix) => node.display_path().to_lowercase().starts_with(prefix),
            SearchQuery::Attribute(needle) => {
                node.is_attribute() && node.name.to_lowercase().contains(needle)
            },
        }
    }
}

/// Search state.
#[derive(Debug, Default)]
pub struct SearchState {
    is_active: bool,
    buffer: String,
    query: String,
    /// Keys of matching nodes in pre-order.
    matches: Vec<String>,
    current_match: usize,
}

impl SearchState {
    /// Create a new search state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the query is being typed.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Start typing a query.
    pub fn start(&mut self) {
        self.is_active = true;
        self.buffer.clear();
    }

    /// Type a character.
    pub fn input(&mut self, c: char) {
        self.buffer.push(c);
    }

    /// Delete the last typed character.
    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Submit the typed query; an empty buffer keeps the previous query.
    pub fn submit(&mut self) {
        if !self.buffer.is_empty() {
            self.query = std::mem::take(&mut self.buffer);
        }
        self.is_active = false;
    }

    /// Stop typing and forget matches.
    pub fn cancel(&mut self) {
        self.is_active = false;
        self.buffer.clear();
        self.matches.clear();
        self.current_match = 0;
    }

    /// Collect the keys of all nodes below `root` matching the query.
    pub fn perform_search(&mut self, root: &DisplayNode) {
        self.matches.clear();
        self.current_match = 0;

        if self.query.is_empty() {
            return;
        }

        let query = SearchQuery::parse(&self.query);
        let mut stack: Vec<&DisplayNode> = root.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if query.matches(node) {
                self.matches.push(node.key());
            }
            stack.extend(node.children.iter().rev());
        }
        tracing::debug!(query = ?query, matches = self.matches.len(), "search");
    }

    /// Key of the current match.
    pub fn current_match_key(&self) -> Option<&str> {
        self.matches.get(self.current_match).map(String::as_str)
    }

    /// Move to the next match, wrapping around.
    pub fn next_match(&mut self) {
        if !self.matches.is_empty() {
            self.current_match = (self.current_match + 1) % self.matches.len();
        }
    }

    /// Move to the previous match, wrapping around.
    pub fn prev_match(&mut self) {
        if !self.matches.is_empty() {
            self.current_match = self
                .current_match
                .checked_sub(1)
                .unwrap_or(self.matches.len() - 1);
        }
    }

    /// Text typed so far.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Last submitted query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Number of matches.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Index of the current match.
    pub fn current_match_index(&self) -> usize {
        self.current_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NodeKind;

    fn tree() -> DisplayNode {
        let mut root = DisplayNode::new("f.h5", "/", NodeKind::Group);
        let mut obs = DisplayNode::new("obs", "/obs", NodeKind::Group);
        let mut temp = DisplayNode::new("Temperature", "/obs/Temperature", NodeKind::Dataset);
        temp.add_child(DisplayNode::new("units", "/obs/Temperature", NodeKind::Attribute));
        obs.add_child(temp);
        root.add_child(obs);
        root.add_child(DisplayNode::new("pressure", "/pressure", NodeKind::Dataset));
        root.add_child(DisplayNode::new("units_note", "/", NodeKind::Attribute));
        root
    }

    fn search(query: &str) -> SearchState {
        let mut search = SearchState::new();
        search.start();
        query.chars().for_each(|c| search.input(c));
        search.submit();
        search.perform_search(&tree());
        search
    }

    #[test]
    fn queries_are_parsed_by_prefix() {
        assert_eq!(SearchQuery::parse("Temp"), SearchQuery::Name("temp".into()));
        assert_eq!(SearchQuery::parse("/Obs"), SearchQuery::Path("/obs".into()));
        assert_eq!(SearchQuery::parse("@Units"), SearchQuery::Attribute("units".into()));
    }

    #[test]
    fn names_match_case_insensitively() {
        let search = search("temp");
        assert_eq!(search.match_count(), 1);
        assert_eq!(search.current_match_key(), Some("/obs/Temperature"));
    }

    #[test]
    fn path_prefix_selects_a_subtree() {
        let mut search = search("/obs");
        assert_eq!(search.match_count(), 3);
        assert_eq!(search.current_match_key(), Some("/obs"));
        search.next_match();
        search.next_match();
        assert_eq!(search.current_match_key(), Some("/obs/Temperature@units"));
    }

    #[test]
    fn attribute_queries_skip_other_nodes() {
        let search = search("@units");
        assert_eq!(search.match_count(), 2);
        assert_eq!(search.current_match_key(), Some("/obs/Temperature@units"));
    }

    #[test]
    fn root_never_matches() {
        let search = search("/");
        assert_eq!(search.match_count(), 5);
        assert_ne!(search.current_match_key(), Some("/"));
    }

    #[test]
    fn previous_wraps_around() {
        // Temperature, units, pressure, units_note
        let mut search = search("u");
        assert_eq!(search.match_count(), 4);
        search.prev_match();
        assert_eq!(search.current_match_index(), 3);
    }
}
