//! Matching strategies.
//!
//! A [`Matcher`] decides which registry key an event name registers under
//! and which pattern keys an emitted name matches. Literal keys are always
//! matched by the emitter itself.
//!
//! - [`Exact`] - every name is a literal
//! - [`Express`] - `:name`, `*` and `**` patterns plus raw regexes

use regex::Regex;
use reverb_core::{EventData, EventKey, EventMatch, PatternError};
use std::collections::HashMap;

/// Strategy deciding registry keys and pattern matches.
pub trait Matcher: Clone + Send + Sync + 'static {
    /// Register `name`, returning the key its listeners are stored under.
    fn compile(&mut self, name: &str) -> Result<EventKey, PatternError>;

    /// The key `name` registers under, without registering it.
    fn key_of(&self, name: &str) -> EventKey;

    /// Every registered pattern matching the emitted `event`.
    fn find(&self, event: &str) -> Vec<EventMatch>;

    /// Drop whatever was compiled for `key`.
    fn forget(&mut self, key: &EventKey);

    /// Copy everything compiled by `other` into this matcher.
    fn merge(&mut self, other: &Self);
}

/// Matches event names literally.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exact;

impl Matcher for Exact {
    fn compile(&mut self, name: &str) -> Result<EventKey, PatternError> {
        Ok(self.key_of(name))
    }

    fn key_of(&self, name: &str) -> EventKey {
        EventKey::literal(name)
    }

    fn find(&self, _event: &str) -> Vec<EventMatch> {
        Vec::new()
    }

    fn forget(&mut self, _key: &EventKey) {}

    fn merge(&mut self, _other: &Self) {}
}

#[derive(Debug, Clone)]
struct Expression {
    pattern: String,
    regex: Regex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Named(String),
    Splat,
    Star,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Tokens of a pattern, left to right.
fn tokens(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ':' if chars.peek().copied().is_some_and(is_name_char) => {
                let mut name = String::new();
                while let Some(c) = chars.next_if(|c| is_name_char(*c)) {
                    name.push(c);
                }
                tokens.push(Token::Named(name));
            }
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                tokens.push(Token::Splat);
            }
            '*' => tokens.push(Token::Star),
            _ => {}
        }
    }
    tokens
}

/// A run of stars: pairs match anything, a lone star one segment.
fn push_stars(fragment: &mut String, run: usize, segment: &str) {
    for _ in 0..run / 2 {
        fragment.push_str("(.*)");
    }
    if run % 2 == 1 {
        fragment.push_str(segment);
    }
}

/// Matches `:name`, `*` and `**` patterns compiled to regular expressions.
///
/// `:name` and `*` match one segment (`[^SEP]+`), `**` matches anything.
/// Text around the tokens is copied into the expression as is.
#[derive(Debug, Clone)]
pub struct Express {
    separator: char,
    expressions: HashMap<String, Expression>,
}

impl Default for Express {
    fn default() -> Self {
        Self::new('/')
    }
}

impl Express {
    /// Create a matcher splitting segments on `separator`.
    pub fn new(separator: char) -> Self {
        Self {
            separator,
            expressions: HashMap::new(),
        }
    }

    /// The segment separator.
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Convert a pattern into a regular expression fragment.
    ///
    /// The result equals the input when the pattern has no tokens.
    pub fn fragment(&self, pattern: &str) -> String {
        // named tokens become stars first, so `:a*` reads as `**`
        let mut stars = String::with_capacity(pattern.len());
        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            if c == ':' && chars.peek().copied().is_some_and(is_name_char) {
                while chars.next_if(|c| is_name_char(*c)).is_some() {}
                stars.push('*');
            } else {
                stars.push(c);
            }
        }

        let segment = format!("([^{}]+)", regex::escape(&self.separator.to_string()));
        let mut fragment = String::with_capacity(stars.len());
        let mut run = 0usize;
        for c in stars.chars() {
            if c == '*' {
                run += 1;
            } else {
                push_stars(&mut fragment, run, &segment);
                run = 0;
                fragment.push(c);
            }
        }
        push_stars(&mut fragment, run, &segment);
        fragment
    }

    /// Register a ready expression; `pattern` names its captures.
    ///
    /// An empty `pattern` keeps every capture positional.
    pub fn insert(&mut self, expression: &str, pattern: &str) -> Result<EventKey, PatternError> {
        let regex = Regex::new(expression).map_err(|e| PatternError::InvalidExpression {
            expression: expression.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.insert_regex_with(regex, pattern))
    }

    /// Register a compiled regex. Its captures stay positional.
    pub fn insert_regex(&mut self, regex: Regex) -> EventKey {
        self.insert_regex_with(regex, "")
    }

    fn insert_regex_with(&mut self, regex: Regex, pattern: &str) -> EventKey {
        let source = regex.as_str().to_string();
        self.expressions.insert(
            source.clone(),
            Expression {
                pattern: pattern.to_string(),
                regex,
            },
        );
        EventKey::Pattern(source)
    }

    /// Registered expressions as `(source, pattern)` pairs.
    pub fn expressions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.expressions
            .iter()
            .map(|(source, e)| (source.as_str(), e.pattern.as_str()))
    }

    /// The pattern registered for an expression source.
    pub fn pattern_of(&self, source: &str) -> Option<&str> {
        self.expressions.get(source).map(|e| e.pattern.as_str())
    }

    /// Number of registered expressions.
    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    /// Returns true if no expression is registered.
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    fn capture(&self, event: &str, source: &str, expression: &Expression) -> Option<EventMatch> {
        let captures = expression.regex.captures(event)?;
        let values: Vec<String> = captures
            .iter()
            .skip(1)
            .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect();
        let key = EventKey::Pattern(source.to_string());

        if expression.pattern.is_empty() {
            return Some(EventMatch {
                event: event.to_string(),
                pattern: source.to_string(),
                key,
                data: EventData {
                    args: values,
                    params: HashMap::new(),
                },
            });
        }

        let tokens = tokens(&expression.pattern);
        let mut data = EventData::default();
        for (i, value) in values.into_iter().enumerate() {
            match tokens.get(i) {
                Some(Token::Named(name)) => {
                    data.params.insert(name.clone(), value);
                }
                _ if value.contains(self.separator) => {
                    data.args
                        .extend(value.split(self.separator).map(str::to_string));
                }
                _ => data.args.push(value),
            }
        }

        Some(EventMatch {
            event: event.to_string(),
            pattern: expression.pattern.clone(),
            key,
            data,
        })
    }
}

impl Matcher for Express {
    fn compile(&mut self, name: &str) -> Result<EventKey, PatternError> {
        match self.key_of(name) {
            EventKey::Pattern(expression) => self.insert(&expression, name),
            literal => Ok(literal),
        }
    }

    fn key_of(&self, name: &str) -> EventKey {
        let fragment = self.fragment(name);
        if fragment == name {
            EventKey::literal(name)
        } else {
            EventKey::pattern(format!("^{fragment}$"))
        }
    }

    fn find(&self, event: &str) -> Vec<EventMatch> {
        let found: Vec<EventMatch> = self
            .expressions
            .iter()
            .filter_map(|(source, expression)| self.capture(event, source, expression))
            .collect();
        tracing::trace!(event, matches = found.len(), "expressions matched");
        found
    }

    fn forget(&mut self, key: &EventKey) {
        if let EventKey::Pattern(source) = key {
            self.expressions.remove(source);
        }
    }

    fn merge(&mut self, other: &Self) {
        for (source, expression) in &other.expressions {
            self.expressions.insert(source.clone(), expression.clone());
        }
    }
}
