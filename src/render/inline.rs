//! Text escaping and inline markup.

use super::options::RenderOptions;

/// Render a raw text run.
///
/// Steps, in order: smart quotes, escaping, special strings, hard breaks.
pub fn plain_text(raw: &str, options: &RenderOptions) -> String {
    let mut text = if options.with_smart_quotes {
        smart_quotes(raw)
    } else {
        raw.to_string()
    };

    text = escape_text(&text);

    if options.with_special_strings {
        text = special_strings(&text);
    }
    if options.preserve_breaks {
        text = preserve_breaks(&text);
    }

    text
}

/// Escape wiki-significant characters in one pass.
///
/// - `` ` ``, `*`, `_`, `\` - always escaped
/// - `#` - escaped after a newline; a run-initial `#` is left to the
///   paragraph, which knows whether it starts a line
/// - `!` - escaped before `[` (image syntax)
fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 8);
    let mut prev: Option<char> = None;
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        let escape = match c {
            '`' | '*' | '_' | '\\' => true,
            '#' => prev == Some('\n'),
            '!' => chars.peek() == Some(&'['),
            _ => false,
        };
        if escape {
            result.push('\\');
        }
        result.push(c);
        prev = Some(c);
    }

    result
}

/// Replace straight quotes with typographic ones.
fn smart_quotes(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len());

    for (i, &c) in chars.iter().enumerate() {
        let opening = i == 0 || {
            let p = chars[i - 1];
            p.is_whitespace() || matches!(p, '(' | '[' | '{' | '-' | '/' | '\u{2014}')
        };
        match c {
            '"' if opening => result.push('\u{201C}'),
            '"' => result.push('\u{201D}'),
            '\'' if opening => result.push('\u{2018}'),
            '\'' => result.push('\u{2019}'),
            _ => result.push(c),
        }
    }

    result
}

fn special_strings(s: &str) -> String {
    s.replace("---", "&mdash;")
        .replace("--", "&ndash;")
        .replace("...", "&hellip;")
}

/// Turn every line ending into a two-space hard break.
fn preserve_breaks(s: &str) -> String {
    let mut lines = s.split('\n').peekable();
    let mut result = String::with_capacity(s.len());
    while let Some(line) = lines.next() {
        if lines.peek().is_some() {
            result.push_str(line.trim_end_matches([' ', '\t']));
            result.push_str("  \n");
        } else {
            result.push_str(line);
        }
    }
    result
}

pub fn bold(contents: &str) -> String {
    format!("'''{}'''", contents)
}

pub fn italic(contents: &str) -> String {
    format!("''{}''", contents)
}

/// Render code or verbatim text.
///
/// Values containing a backtick fall back to a `<code>` tag, padded when the
/// backtick sits at an edge.
pub fn code(value: &str) -> String {
    if !value.contains('`') {
        format!("`{}`", value)
    } else if value.starts_with('`') || value.ends_with('`') {
        format!("<code> {} </code>", value)
    } else {
        format!("<code>{}</code>", value)
    }
}

pub fn line_break() -> String {
    "<br />".to_string()
}

pub fn horizontal_rule() -> String {
    "----".to_string()
}
