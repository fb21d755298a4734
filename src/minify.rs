//! Lexical minification for embedded CSS and JavaScript.
//!
//! Two independent text passes, neither of them a real lexer:
//!
//! - [`strip_comments`] drops `/* ... */` block comments (plus any newlines
//!   directly after them) and `// ...` line comments up to and including
//!   their newline. It does **not** know about string literals, so a `//`
//!   inside a string is treated as a comment start. This is a known
//!   limitation and part of the observable behavior.
//! - [`collapse_whitespace`] is string-aware: it tracks `"`, `'` and `` ` ``
//!   delimited strings and leaves their contents alone, while collapsing
//!   whitespace runs everywhere else.
//!
//! CSS gets comment stripping plus removal of every tab and newline;
//! JavaScript gets comment stripping plus whitespace collapsing.
//!
//! Comments are stripped before tabs and newlines are dropped, so a CSS
//! comment delimiter split by a tab or newline (`/\n*`) survives one pass and
//! is only removed by a second one. CSS minification is therefore not
//! idempotent on such input.

/// Remove block and line comments.
///
/// A block comment swallows every newline immediately following it. A line
/// comment needs a terminating newline; one running to end of input is kept,
/// as is an unterminated block comment.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if let Some(after) = skip_comment(rest) {
            rest = after;
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// If `text` starts with a complete comment, return what follows it.
fn skip_comment(text: &str) -> Option<&str> {
    if let Some(body) = text.strip_prefix("/*") {
        let end = body.find("*/")?;
        return Some(body[end + 2..].trim_start_matches('\n'));
    }
    let body = text.strip_prefix("//")?;
    let end = body.find('\n')?;
    Some(&body[end + 1..])
}

/// Collapse whitespace runs outside string literals.
///
/// A space or tab directly after a space, tab or newline is dropped, and so is
/// a newline directly after a newline. "After" refers to the last character
/// kept, which makes the pass idempotent. Inside a string every character is
/// kept; a string ends at the next occurrence of its opening quote, with no
/// backslash-escape handling.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut open_quote: Option<char> = None;
    let mut last: Option<char> = None;

    for c in text.chars() {
        if matches!(c, '"' | '\'' | '`') {
            match open_quote {
                Some(q) if q == c => open_quote = None,
                None => open_quote = Some(c),
                Some(_) => {}
            }
        }

        let redundant_space =
            matches!(c, ' ' | '\t') && matches!(last, Some(' ' | '\t' | '\n'));
        let redundant_newline = c == '\n' && last == Some('\n');

        if open_quote.is_some() || !(redundant_space || redundant_newline) {
            out.push(c);
            last = Some(c);
        }
    }

    out
}

/// Minify stylesheet text: strip comments, then drop every tab and newline.
pub fn minify_css(text: &str) -> String {
    strip_comments(text)
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n'))
        .collect()
}

/// Minify script text: strip comments, then collapse whitespace.
pub fn minify_js(text: &str) -> String {
    collapse_whitespace(&strip_comments(text))
}
