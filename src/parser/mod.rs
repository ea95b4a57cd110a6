//! Tree-sitter based parser for executable submission languages.

pub mod queries;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tree_sitter::{Language as TsLanguage, Node, Parser as TsParser, Tree};

use crate::core::{Error, Language, Result};

/// Path label used in parse errors for in-memory submissions.
const SUBMISSION_PATH: &str = "<submission>";

/// Thread-safe parser pool.
pub struct Parser {
    /// Cached parsers per language.
    parsers: Mutex<HashMap<Language, TsParser>>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self {
            parsers: Mutex::new(HashMap::new()),
        }
    }

    /// Parse content with an explicit language.
    ///
    /// Returns the tree even when it contains syntax errors; use
    /// [`ParseResult::check_syntax`] to reject those.
    pub fn parse(&self, content: &str, lang: Language) -> Result<ParseResult> {
        let ts_lang = get_tree_sitter_language(lang).ok_or_else(|| Error::Parse {
            path: SUBMISSION_PATH.into(),
            message: format!("no grammar available for {lang}"),
        })?;

        let tree = {
            let mut parsers = self.parsers.lock();
            let parser = match parsers.entry(lang) {
                std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
                std::collections::hash_map::Entry::Vacant(entry) => {
                    let mut p = TsParser::new();
                    p.set_language(&ts_lang).map_err(|e| Error::Parse {
                        path: SUBMISSION_PATH.into(),
                        message: format!("incompatible grammar: {e}"),
                    })?;
                    entry.insert(p)
                }
            };

            parser.parse(content, None).ok_or_else(|| Error::Parse {
                path: SUBMISSION_PATH.into(),
                message: "Failed to parse submission".to_string(),
            })?
        };

        Ok(ParseResult {
            tree: Arc::new(tree),
            source: content.as_bytes().to_vec(),
            language: lang,
        })
    }

    /// Parse and reject trees containing syntax errors.
    pub fn parse_strict(&self, content: &str, lang: Language) -> Result<ParseResult> {
        let result = self.parse(content, lang)?;
        result.check_syntax()?;
        Ok(result)
    }
}

/// Result of parsing a submission.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The parsed syntax tree.
    pub tree: Arc<Tree>,
    /// Original source content.
    pub source: Vec<u8>,
    /// Declared language.
    pub language: Language,
}

impl ParseResult {
    /// Get the root node of the tree.
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Get text for a node.
    pub fn node_text(&self, node: &Node<'_>) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }

    /// Fail with the position of the first syntax error, if any.
    ///
    /// Python 2 statements the grammar still recognizes count as errors.
    pub fn check_syntax(&self) -> Result<()> {
        let root = self.root_node();
        if !root.has_error() {
            let legacy = queries::legacy_node_types(self.language);
            return match find_first_kind(root, legacy) {
                Some(node) => Err(Error::Parse {
                    path: SUBMISSION_PATH.into(),
                    message: format!(
                        "invalid syntax at line {}, column {}: Python 2 {}",
                        node.start_position().row + 1,
                        node.start_position().column + 1,
                        node.kind()
                    ),
                }),
                None => Ok(()),
            };
        }
        let message = match find_first_error(root) {
            Some(node) if node.is_missing() => format!(
                "missing {} at line {}",
                node.kind(),
                node.start_position().row + 1
            ),
            Some(node) => format!(
                "invalid syntax at line {}, column {}",
                node.start_position().row + 1,
                node.start_position().column + 1
            ),
            None => "invalid syntax".to_string(),
        };
        Err(Error::Parse {
            path: SUBMISSION_PATH.into(),
            message,
        })
    }
}

/// Depth-first search for the first ERROR or MISSING node.
fn find_first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find_map(find_first_error);
    found
}

/// Depth-first search for the first node whose kind is in `kinds`.
fn find_first_kind<'a>(node: Node<'a>, kinds: &[&str]) -> Option<Node<'a>> {
    if kinds.is_empty() {
        return None;
    }
    if kinds.contains(&node.kind()) && !is_chevron_print(node) {
        return Some(node);
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find_map(|child| find_first_kind(child, kinds));
    found
}

/// `print >> f, x` is still a valid (tuple) expression in Python 3.
fn is_chevron_print(node: Node<'_>) -> bool {
    if node.kind() != "print_statement" {
        return false;
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| child.kind() == "chevron");
    found
}

/// Get tree-sitter language for a Language enum value.
///
/// Only executable languages carry a grammar.
pub fn get_tree_sitter_language(lang: Language) -> Option<TsLanguage> {
    match lang {
        Language::Python => Some(tree_sitter_python::LANGUAGE.into()),
        Language::Java | Language::Cpp | Language::C | Language::JavaScript => None,
    }
}

/// A function extracted from the AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionNode {
    /// Function name.
    pub name: String,
    /// Start line (1-indexed).
    pub start_line: u32,
    /// End line (1-indexed).
    pub end_line: u32,
}

impl FunctionNode {
    /// Lines spanned past the first, i.e. `end_line - start_line`.
    pub fn span(&self) -> u32 {
        self.end_line.saturating_sub(self.start_line)
    }
}

/// Extract every function definition, nested ones included.
pub fn extract_functions(result: &ParseResult) -> Vec<FunctionNode> {
    let mut functions = Vec::new();
    let function_types = queries::function_node_types(result.language);

    fn visit(
        node: Node<'_>,
        source: &[u8],
        function_types: &[&str],
        functions: &mut Vec<FunctionNode>,
    ) {
        if function_types.contains(&node.kind()) {
            let name = node
                .child_by_field_name("name")
                .and_then(|n| n.utf8_text(source).ok())
                .unwrap_or("<anonymous>")
                .to_string();
            functions.push(FunctionNode {
                name,
                start_line: node.start_position().row as u32 + 1,
                end_line: node.end_position().row as u32 + 1,
            });
        }

        for child in node.children(&mut node.walk()) {
            visit(child, source, function_types, functions);
        }
    }

    visit(
        result.root_node(),
        &result.source,
        function_types,
        &mut functions,
    );

    functions
}
