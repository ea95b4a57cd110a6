//! Declared submission languages.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Error;

/// Languages a submission may be tagged with.
///
/// Only Python is parsed and executed; the others are accepted as a tag and
/// scored by the text heuristics alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    Java,
    Cpp,
    C,
    JavaScript,
}

impl Language {
    /// Detect language from file path based on extension.
    pub fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        Self::from_extension(extension)
    }

    /// Get language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" | "pyi" => Some(Self::Python),
            "java" => Some(Self::Java),
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => Some(Self::Cpp),
            "c" | "h" => Some(Self::C),
            "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            _ => None,
        }
    }

    /// Get the display name for the language.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Java => "Java",
            Self::Cpp => "C++",
            Self::C => "C",
            Self::JavaScript => "JavaScript",
        }
    }

    /// Whether submissions in this language are parsed and run against tests.
    pub fn is_executable(&self) -> bool {
        matches!(self, Self::Python)
    }

    /// Count comment-only lines.
    ///
    /// Lines inside a C-style block comment count as comments; a leading `*`
    /// outside one is code (`*ptr = 3;`).
    pub fn count_comment_lines<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> usize {
        let mut in_block = false;
        lines
            .into_iter()
            .filter(|line| self.is_comment_line(line.trim(), &mut in_block))
            .count()
    }

    /// Check if a trimmed line is a comment-only line, tracking block state.
    fn is_comment_line(&self, line: &str, in_block: &mut bool) -> bool {
        match self {
            Self::Python => line.starts_with('#'),
            Self::Java | Self::Cpp | Self::C | Self::JavaScript => {
                if *in_block {
                    *in_block = !line.contains("*/");
                    true
                } else if line.starts_with("//") {
                    true
                } else if let Some(rest) = line.strip_prefix("/*") {
                    *in_block = !rest.contains("*/");
                    true
                } else {
                    false
                }
            }
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "java" => Ok(Self::Java),
            "cpp" | "c++" => Ok(Self::Cpp),
            "c" => Ok(Self::C),
            "javascript" | "js" => Ok(Self::JavaScript),
            _ => Err(Error::InvalidArgument(format!(
                "Unknown language: {s}. Use 'python', 'java', 'cpp', 'c' or 'javascript'"
            ))),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language() {
        assert_eq!(
            Language::detect(Path::new("solution.py")),
            Some(Language::Python)
        );
        assert_eq!(
            Language::detect(Path::new("Main.java")),
            Some(Language::Java)
        );
        assert_eq!(Language::detect(Path::new("a.cpp")), Some(Language::Cpp));
        assert_eq!(Language::detect(Path::new("a.c")), Some(Language::C));
        assert_eq!(
            Language::detect(Path::new("index.js")),
            Some(Language::JavaScript)
        );
        assert_eq!(Language::detect(Path::new("README.md")), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("PYTHON".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("cpp".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("javascript".parse::<Language>().unwrap(), Language::JavaScript);
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn test_serde_tags() {
        let json = serde_json::to_string(&Language::JavaScript).unwrap();
        assert_eq!(json, "\"javascript\"");
        let lang: Language = serde_json::from_str("\"cpp\"").unwrap();
        assert_eq!(lang, Language::Cpp);
    }

    #[test]
    fn test_only_python_is_executable() {
        assert!(Language::Python.is_executable());
        assert!(!Language::Java.is_executable());
        assert!(!Language::JavaScript.is_executable());
    }

    #[test]
    fn test_comment_lines() {
        assert_eq!(Language::Python.count_comment_lines(["# note"]), 1);
        assert_eq!(Language::Python.count_comment_lines(["// note"]), 0);
        assert_eq!(Language::Java.count_comment_lines(["// note"]), 1);
        assert_eq!(Language::C.count_comment_lines(["/* block */"]), 1);
        assert_eq!(Language::Cpp.count_comment_lines(["int x = 1;"]), 0);
    }

    #[test]
    fn test_block_comment_continuation_lines() {
        let lines = ["/**", " * Adds two numbers.", " */", "int add(int a, int b);"];
        assert_eq!(Language::Java.count_comment_lines(lines), 3);
    }

    #[test]
    fn test_dereference_is_not_a_comment() {
        let lines = ["*ptr = 3;", "/* set */ ", "*ptr += 1;"];
        assert_eq!(Language::C.count_comment_lines(lines), 1);
    }
}
