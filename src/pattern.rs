//! Lists of topic name patterns.

use std::fmt;

use regex::Regex;

/// A single regular expression, with its source text.
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles a pattern.
    pub fn new(source: &str) -> Result<Pattern, regex::Error> {
        Ok(Pattern {
            source: source.to_string(),
            regex: Regex::new(source)?,
        })
    }

    /// The pattern as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the pattern matches anywhere in `s`.
    pub fn matches(&self, s: &str) -> bool {
        self.regex.is_match(s)
    }
}

/// A comma-separated list of regular expressions, such as `topic.blacklist`.
#[derive(Clone, Debug)]
pub struct PatternList {
    patterns: Vec<Pattern>,
}

impl PatternList {
    /// Parses a comma-separated list. Empty elements are ignored; the first
    /// invalid expression fails the whole list.
    pub fn parse(list: &str) -> Result<PatternList, regex::Error> {
        let patterns = list
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Pattern::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PatternList { patterns })
    }

    /// Returns `true` if any pattern matches `s`.
    pub fn matches(&self, s: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(s))
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if the list holds no pattern.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterates over the patterns.
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }
}

impl PartialEq for PatternList {
    fn eq(&self, other: &PatternList) -> bool {
        self.patterns
            .iter()
            .map(Pattern::as_str)
            .eq(other.patterns.iter().map(Pattern::as_str))
    }
}

impl fmt::Display for PatternList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sources: Vec<&str> = self.patterns.iter().map(Pattern::as_str).collect();
        f.write_str(&sources.join(","))
    }
}
