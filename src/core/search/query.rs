//! Query text normalization.
//!
//! User input is trimmed and length-checked before it reaches the
//! query builder. For the embedded index the text is additionally
//! escaped so that catalog identifiers such as `M-1032` or `4:12`
//! are searched literally instead of being parsed as query syntax.

use crate::core::error::{Result, VitrineError};
use once_cell::sync::Lazy;
use regex::Regex;

// Compiled once; the pattern is a literal
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize raw query text.
///
/// Returns `None` when nothing but whitespace was typed, which selects the
/// match-all fallback.
///
/// # Examples
///
/// ```
/// use vitrine::core::search::normalize_query;
///
/// assert_eq!(normalize_query("  ", 500).unwrap(), None);
/// assert_eq!(
///     normalize_query(" bronze   bead ", 500).unwrap(),
///     Some("bronze bead".to_string())
/// );
/// assert!(normalize_query("a very long query", 5).is_err());
/// ```
pub fn normalize_query(raw: &str, max_len: usize) -> Result<Option<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let collapsed = WHITESPACE.replace_all(trimmed, " ");
    let len = collapsed.chars().count();
    if len > max_len {
        return Err(VitrineError::InvalidQuery(format!(
            "Query is {len} characters long (max {max_len})"
        )));
    }

    Ok(Some(collapsed.into_owned()))
}

/// Words the embedded parser reads as boolean operators
const OPERATORS: [&str; 4] = ["AND", "OR", "NOT", "IN"];

/// Escape query text for the embedded index's parser.
///
/// Balanced double quotes are kept so phrase searches still work;
/// an unbalanced quote is dropped. Every other syntax character is
/// escaped and range comparators are removed.
///
/// `AND`/`OR` stay operators only between two terms and `NOT` only
/// before one. Operator words in any other position are dropped, or
/// searched as plain words when nothing else was typed. `IN` is always
/// a plain word.
pub fn escape_query(text: &str) -> String {
    let keep_quotes = text.matches('"').count() % 2 == 0;
    let text = text.replace(['<', '>', '='], " ");

    // (escaped token, bare operator word outside a phrase)
    let mut tokens: Vec<(String, bool)> = Vec::new();
    let mut in_phrase = false;
    for raw in text.split_whitespace() {
        let operator = !in_phrase && OPERATORS.contains(&raw);
        let mut token = String::with_capacity(raw.len() * 2);
        for ch in raw.chars() {
            match ch {
                '"' if keep_quotes => {
                    in_phrase = !in_phrase;
                    token.push('"');
                }
                '"' => {}
                ':' | '{' | '}' | '[' | ']' | '(' | ')' | '@' | '\\' | '+' | '-' | '!' | '^'
                | '~' | '*' | '`' => {
                    token.push('\\');
                    token.push(ch);
                }
                _ => token.push(ch),
            }
        }
        if !token.is_empty() {
            tokens.push((token, operator));
        }
    }

    if tokens.iter().all(|(_, operator)| *operator) {
        let words: Vec<String> = tokens.iter().map(|(t, _)| t.to_lowercase()).collect();
        return words.join(" ");
    }

    let is_term = |i: usize| tokens.get(i).is_some_and(|(_, operator)| !operator);
    let mut result: Vec<String> = Vec::with_capacity(tokens.len());
    let mut after_term = false;
    for (i, (token, operator)) in tokens.iter().enumerate() {
        if !operator {
            result.push(token.clone());
            after_term = true;
            continue;
        }

        let keep = match token.as_str() {
            "AND" | "OR" => after_term && is_term(i + 1),
            "NOT" => is_term(i + 1),
            _ => false,
        };
        if keep {
            result.push(token.clone());
            after_term = false;
        } else if token == "IN" {
            result.push(token.to_lowercase());
            after_term = true;
        }
    }

    result.join(" ")
}

/// Whether the whole text is one quoted phrase
pub fn is_quoted(text: &str) -> bool {
    text.len() > 1 && text.starts_with('"') && text.ends_with('"')
}

/// Lowercased words of the query, without quotes or punctuation
pub fn query_terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}
