use std::collections::HashMap;

use super::RuleId;

#[derive(Debug, PartialEq)]
pub enum TrieLookupResult {
    None,
    Prefix,
    Exact(Vec<RuleId>),
    ExactAndPrefix(Vec<RuleId>),
}

struct Node {
    children: HashMap<u8, Node>,
    rules: Vec<RuleId>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            rules: Vec::new(),
        }
    }
}

/// Byte trie over rule patterns. A node holds every rule whose pattern (or
/// case variant) ends there; context decides between them at match time.
pub struct RuleTrie {
    root: Node,
    depth: usize,
}

impl RuleTrie {
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            depth: 0,
        }
    }

    pub fn insert(&mut self, pattern: &[u8], id: RuleId) {
        let mut node = &mut self.root;
        for &b in pattern {
            node = node.children.entry(b).or_insert_with(Node::new);
        }
        if !node.rules.contains(&id) {
            node.rules.push(id);
        }
        self.depth = self.depth.max(pattern.len());
    }

    /// Length of the longest inserted pattern.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn lookup(&self, pattern: &str) -> TrieLookupResult {
        let mut node = &self.root;
        for &b in pattern.as_bytes() {
            match node.children.get(&b) {
                Some(child) => node = child,
                None => return TrieLookupResult::None,
            }
        }
        let has_children = !node.children.is_empty();
        match (node.rules.is_empty(), has_children) {
            (true, false) => TrieLookupResult::None,
            (true, true) => TrieLookupResult::Prefix,
            (false, false) => TrieLookupResult::Exact(node.rules.clone()),
            (false, true) => TrieLookupResult::ExactAndPrefix(node.rules.clone()),
        }
    }

    /// Every pattern that is a prefix of `input`, shortest first, as
    /// `(pattern length, rule ids)`. The walk stops at the trie depth.
    pub fn prefixes<'a>(&'a self, input: &[u8]) -> Vec<(usize, &'a [RuleId])> {
        let mut found = Vec::new();
        let mut node = &self.root;
        for (i, b) in input.iter().enumerate() {
            match node.children.get(b) {
                Some(child) => node = child,
                None => break,
            }
            if !node.rules.is_empty() {
                found.push((i + 1, node.rules.as_slice()));
            }
        }
        found
    }
}

impl Default for RuleTrie {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RuleTrie {
        let mut trie = RuleTrie::new();
        trie.insert(b"a", 0);
        trie.insert(b"aa", 1);
        trie.insert(b"aee", 2);
        trie.insert(b"dh", 3);
        trie
    }

    #[test]
    fn test_exact() {
        assert_eq!(sample().lookup("dh"), TrieLookupResult::Exact(vec![3]));
    }

    #[test]
    fn test_exact_and_prefix() {
        assert_eq!(
            sample().lookup("a"),
            TrieLookupResult::ExactAndPrefix(vec![0])
        );
    }

    #[test]
    fn test_prefix_only() {
        assert_eq!(sample().lookup("d"), TrieLookupResult::Prefix);
        assert_eq!(sample().lookup("ae"), TrieLookupResult::Prefix);
    }

    #[test]
    fn test_none_for_unknown() {
        assert_eq!(sample().lookup("xyz"), TrieLookupResult::None);
    }

    #[test]
    fn test_prefixes_shortest_first() {
        let trie = sample();
        let found: Vec<usize> = trie.prefixes(b"aeek").iter().map(|(len, _)| *len).collect();
        assert_eq!(found, vec![1, 3]);
        let found: Vec<usize> = trie.prefixes(b"aab").iter().map(|(len, _)| *len).collect();
        assert_eq!(found, vec![1, 2]);
    }

    #[test]
    fn test_prefixes_empty_input() {
        assert!(sample().prefixes(b"").is_empty());
        assert!(sample().prefixes(b"q").is_empty());
    }

    #[test]
    fn test_depth() {
        assert_eq!(sample().depth(), 3);
        assert_eq!(RuleTrie::new().depth(), 0);
    }

    #[test]
    fn test_shared_node_keeps_all_rules() {
        let mut trie = RuleTrie::new();
        trie.insert(b"aa", 4);
        trie.insert(b"aa", 5);
        trie.insert(b"aa", 5);
        assert_eq!(trie.lookup("aa"), TrieLookupResult::Exact(vec![4, 5]));
    }
}
