//! Balanced-delimiter extraction of test declaration blocks.
//!
//! The extractor scans a source buffer line by line for declaration starts
//! (a recognized keyword immediately followed by `(`), then switches to a
//! character-level scan that tracks brace depth while ignoring braces inside
//! string and template literals. A block is emitted the moment the depth
//! returns to zero after the body opened.
//!
//! This is deliberately not a parser for the host language: no AST, no syntax
//! validation. Malformed input degrades to a smaller result set.

use serde::{Deserialize, Serialize};

use crate::model::TestBlock;

/// Options controlling which declaration keywords open a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Leading keywords that introduce a test declaration when immediately
    /// followed by an opening parenthesis (e.g. `test(` or `it(`).
    pub keywords: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { keywords: vec!["test".to_string(), "it".to_string()] }
    }
}

/// Diagnostic for a declaration whose body never closed before end of buffer.
///
/// The affected span is dropped, not emitted; drivers can use this to warn
/// instead of losing the declaration silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnterminatedDeclaration {
    /// 1-based line number of the declaration start.
    pub line: usize,
    /// Byte offset of the start of the declaration line.
    pub offset: usize,
}

/// Result of one extraction pass over a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Extraction {
    /// Emitted blocks, ordered by ascending `start_offset`.
    pub blocks: Vec<TestBlock>,
    /// Set when the last declaration opened a body that never closed.
    pub unterminated: Option<UnterminatedDeclaration>,
}

/// Extract all test declaration blocks from `text` using default options.
pub fn extract_blocks(text: &str) -> Vec<TestBlock> {
    extract(text, &ExtractOptions::default()).blocks
}

/// Extract all test declaration blocks from `text`.
///
/// Blocks are whole-line spans: from the start of the declaration line
/// through the end of the line containing the balancing `}`. Scanning is
/// strictly forward; nested declarations inside a body are absorbed into the
/// outer block.
pub fn extract(text: &str, options: &ExtractOptions) -> Extraction {
    let mut blocks = Vec::new();
    let mut unterminated = None;

    let mut pos = 0; // byte offset of the current line start
    let mut line_no = 1;
    while pos < text.len() {
        let line_end = text[pos..].find('\n').map(|n| pos + n).unwrap_or(text.len());
        let line = &text[pos..line_end];

        if !is_declaration_start(line, &options.keywords) {
            line_no += 1;
            pos = next_line_start(text, line_end);
            continue;
        }

        match scan_block(&text[pos..]) {
            ScanOutcome::Closed(end) => {
                let close = pos + end.close_offset;
                // The span runs to the end of the closing line.
                let span_end = text[close..].find('\n').map(|n| close + n).unwrap_or(text.len());
                blocks.push(TestBlock {
                    start_offset: pos,
                    end_offset: span_end - 1,
                    start_line: line_no,
                    end_line: line_no + end.newlines,
                    text: text[pos..span_end].to_string(),
                });
                line_no += end.newlines + 1;
                pos = next_line_start(text, span_end);
            }
            ScanOutcome::NoBody => {
                // The declaration line never opened a body; not a block.
                line_no += 1;
                pos = next_line_start(text, line_end);
            }
            ScanOutcome::Unterminated => {
                // The scan consumed the rest of the buffer without closing;
                // abandon this declaration and stop.
                unterminated = Some(UnterminatedDeclaration { line: line_no, offset: pos });
                break;
            }
        }
    }

    Extraction { blocks, unterminated }
}

/// Return the human-readable name of a declaration: the first single-line
/// string literal argument, if any (e.g. `test("should return 401", ...)`).
pub fn declaration_name(block_text: &str) -> Option<String> {
    let first_line = block_text.lines().next()?;
    let after_paren = &first_line[first_line.find('(')? + 1..];
    let (idx, quote) =
        after_paren.char_indices().find(|&(_, c)| matches!(c, '"' | '\'' | '`'))?;
    let body = &after_paren[idx + quote.len_utf8()..];
    let mut prev = None;
    for (i, ch) in body.char_indices() {
        if ch == quote && prev != Some('\\') {
            return Some(body[..i].to_string());
        }
        prev = Some(ch);
    }
    None
}

/// Whether a line opens a test declaration: leading whitespace, then a
/// recognized keyword immediately followed by `(`.
fn is_declaration_start(line: &str, keywords: &[String]) -> bool {
    let trimmed = line.trim_start();
    keywords
        .iter()
        .any(|kw| trimmed.strip_prefix(kw.as_str()).is_some_and(|rest| rest.starts_with('(')))
}

fn next_line_start(text: &str, line_end: usize) -> usize {
    if line_end < text.len() {
        line_end + 1
    } else {
        text.len()
    }
}

/// Where a block's balancing `}` was found, relative to the scan start.
struct BlockEnd {
    close_offset: usize,
    /// Newlines crossed before the closing brace; equals end_line - start_line.
    newlines: usize,
}

enum ScanOutcome {
    /// The body opened and its balancing `}` was found.
    Closed(BlockEnd),
    /// The declaration line ended without ever opening a brace.
    NoBody,
    /// The body opened but never closed before end of buffer.
    Unterminated,
}

/// Character-level scan from the start of a declaration line until brace
/// depth returns to zero.
///
/// States: outside-literal, or inside-literal(quote). A literal is entered at
/// an unescaped `"`, `'` or backtick and exited at the next unescaped
/// occurrence of the same quote; a quote immediately preceded by a backslash
/// never toggles. Literal state persists across newlines so template
/// literals spanning lines keep their braces non-structural. Braces count
/// only outside literals.
fn scan_block(text: &str) -> ScanOutcome {
    let mut depth: i32 = 0;
    let mut opened = false;
    let mut literal: Option<char> = None;
    let mut prev: Option<char> = None;
    let mut newlines = 0;

    for (idx, ch) in text.char_indices() {
        match literal {
            Some(quote) => {
                if ch == quote && prev != Some('\\') {
                    literal = None;
                }
            }
            None => match ch {
                '"' | '\'' | '`' => {
                    if prev != Some('\\') {
                        literal = Some(ch);
                    }
                }
                '{' => {
                    depth += 1;
                    opened = true;
                }
                '}' => {
                    depth -= 1;
                    if opened && depth == 0 {
                        return ScanOutcome::Closed(BlockEnd { close_offset: idx, newlines });
                    }
                }
                _ => {}
            },
        }
        if ch == '\n' {
            // A declaration whose first line never opens a body is not a
            // block; the caller resumes on the next line.
            if !opened {
                return ScanOutcome::NoBody;
            }
            newlines += 1;
        }
        prev = Some(ch);
    }

    if opened {
        ScanOutcome::Unterminated
    } else {
        ScanOutcome::NoBody
    }
}
