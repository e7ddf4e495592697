//! Source-language detection for code elements.
//!
//! Detection is a collaborator: anything implementing `LanguageDetector`
//! returns a free-form label, and `CodeLanguage::from_label` maps that label
//! through the fixed set of languages a code element may carry. Labels
//! outside the set are rejected, never defaulted.

use crate::error::EditError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages a code element can be highlighted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
    C,
    JavaScript,
    Python,
}

impl CodeLanguage {
    pub const ALL: [CodeLanguage; 3] = [CodeLanguage::C, CodeLanguage::JavaScript, CodeLanguage::Python];

    /// Map a detector label onto the supported set.
    pub fn from_label(label: &str) -> Result<Self, EditError> {
        match label {
            "C" => Ok(CodeLanguage::C),
            "JavaScript" => Ok(CodeLanguage::JavaScript),
            "Python" => Ok(CodeLanguage::Python),
            other => Err(EditError::UnsupportedLanguage(other.to_string())),
        }
    }

    /// Detector label for this language.
    pub fn label(self) -> &'static str {
        match self {
            CodeLanguage::C => "C",
            CodeLanguage::JavaScript => "JavaScript",
            CodeLanguage::Python => "Python",
        }
    }

    /// Stored / highlighter name.
    pub fn as_str(self) -> &'static str {
        match self {
            CodeLanguage::C => "c",
            CodeLanguage::JavaScript => "javascript",
            CodeLanguage::Python => "python",
        }
    }
}

impl fmt::Display for CodeLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guess the language of a piece of source text.
pub trait LanguageDetector {
    /// Returns a language label such as `"C"`, `"JavaScript"`, `"Python"`,
    /// or `"Unknown"`.
    fn detect(&self, source: &str) -> String;
}

impl<F> LanguageDetector for F
where
    F: Fn(&str) -> String,
{
    fn detect(&self, source: &str) -> String {
        self(source)
    }
}

/// Label returned when no rule matches.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Pattern-scoring detector. Each language has a set of weighted markers;
/// the highest-scoring language wins, ties going to the earlier entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicDetector;

struct Rule {
    label: &'static str,
    markers: &'static [(Marker, u32)],
}

#[derive(Clone, Copy)]
enum Marker {
    /// Substring anywhere in the source.
    Contains(&'static str),
    /// A trimmed line starting with the prefix.
    LineStart(&'static str),
    /// A trimmed, non-empty line ending with the suffix.
    LineEnd(&'static str),
}

const RULES: &[Rule] = &[
    Rule {
        label: "C++",
        markers: &[
            (Marker::Contains("std::"), 3),
            (Marker::Contains("cout <<"), 3),
            (Marker::Contains("#include <iostream>"), 4),
            (Marker::Contains("template<"), 2),
            (Marker::Contains("namespace "), 2),
        ],
    },
    Rule {
        label: "Java",
        markers: &[
            (Marker::Contains("System.out.print"), 4),
            (Marker::Contains("public static void main"), 4),
            (Marker::LineStart("public class "), 3),
            (Marker::LineStart("import java."), 4),
        ],
    },
    Rule {
        label: "C",
        markers: &[
            (Marker::LineStart("#include"), 3),
            (Marker::LineStart("#define "), 2),
            (Marker::Contains("printf("), 3),
            (Marker::Contains("int main("), 3),
            (Marker::Contains("malloc("), 2),
            (Marker::Contains("char *"), 1),
            (Marker::Contains("->"), 1),
        ],
    },
    Rule {
        label: "JavaScript",
        markers: &[
            (Marker::Contains("console.log("), 4),
            (Marker::Contains("=>"), 2),
            (Marker::Contains("==="), 2),
            (Marker::LineStart("function "), 3),
            (Marker::LineStart("const "), 2),
            (Marker::LineStart("let "), 2),
            (Marker::LineStart("var "), 2),
            (Marker::Contains("document."), 2),
            (Marker::Contains("require("), 2),
            (Marker::Contains("undefined"), 1),
        ],
    },
    Rule {
        label: "Python",
        markers: &[
            (Marker::LineStart("def "), 4),
            (Marker::LineStart("elif "), 3),
            (Marker::LineStart("from "), 2),
            (Marker::LineStart("import "), 1),
            (Marker::LineStart("print("), 2),
            (Marker::Contains("self."), 2),
            (Marker::Contains("None"), 1),
            (Marker::LineEnd(":"), 1),
        ],
    },
];

impl HeuristicDetector {
    fn score(rule: &Rule, source: &str) -> u32 {
        rule.markers
            .iter()
            .filter(|(marker, _)| match marker {
                Marker::Contains(s) => source.contains(s),
                Marker::LineStart(p) => source.lines().any(|l| l.trim_start().starts_with(p)),
                Marker::LineEnd(s) => source.lines().any(|l| {
                    let t = l.trim_end();
                    !t.is_empty() && t.ends_with(s)
                }),
            })
            .map(|(_, weight)| weight)
            .sum()
    }
}

impl LanguageDetector for HeuristicDetector {
    fn detect(&self, source: &str) -> String {
        let mut best: Option<(&str, u32)> = None;
        for rule in RULES {
            let score = Self::score(rule, source);
            if score > 0 && best.is_none_or(|(_, s)| score > s) {
                best = Some((rule.label, score));
            }
        }
        let label = best.map_or(UNKNOWN_LABEL, |(label, _)| label);
        log::trace!("detected language {label} for {} bytes", source.len());
        label.to_string()
    }
}

/// Detect and map in one step.
pub fn resolve_language(
    detector: &impl LanguageDetector,
    source: &str,
) -> Result<CodeLanguage, EditError> {
    CodeLanguage::from_label(&detector.detect(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(src: &str) -> String {
        HeuristicDetector.detect(src)
    }

    #[test]
    fn detects_whitelisted_languages() {
        assert_eq!(
            detect("#include <stdio.h>\nint main(void) {\n  printf(\"hi\");\n}"),
            "C"
        );
        assert_eq!(detect("const x = 1;\nconsole.log(x === 1);"), "JavaScript");
        assert_eq!(detect("def greet(name):\n    print(name)\n"), "Python");
    }

    #[test]
    fn detects_languages_outside_the_whitelist() {
        assert_eq!(
            detect("#include <iostream>\nint main() { std::cout << 1; }"),
            "C++"
        );
        assert_eq!(detect("hello there"), UNKNOWN_LABEL);
    }

    #[test]
    fn whitelist_rejects_other_labels() {
        assert_eq!(CodeLanguage::from_label("Python"), Ok(CodeLanguage::Python));
        assert_eq!(
            CodeLanguage::from_label("Ruby"),
            Err(EditError::UnsupportedLanguage("Ruby".into()))
        );
        assert!(resolve_language(&HeuristicDetector, "just words").is_err());
    }

    #[test]
    fn closures_are_detectors() {
        let always_c = |_: &str| "C".to_string();
        assert_eq!(resolve_language(&always_c, "anything"), Ok(CodeLanguage::C));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&CodeLanguage::JavaScript).unwrap(),
            "\"javascript\""
        );
    }
}
