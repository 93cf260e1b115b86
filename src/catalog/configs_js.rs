//! Reads the upstream `configs.js` server table.
//!
//! The file is a single `module.exports = { ... }` object literal. It is turned
//! into JSON textually instead of being evaluated.

const PLACEHOLDERS: &[(&str, &str)] = &[
    ("noSupportedVersion", "null"),
    ("module.exports = ", ""),
    ("module.exports=", ""),
    ("'", "\""),
    (";", ""),
];

/// Converts the object literal in `source` into a JSON document.
pub fn to_json(source: &str) -> String {
    let mut lines = Vec::new();

    for raw in source.lines() {
        let line = strip_comment(raw).trim();

        if line.is_empty() || line.starts_with("const ") {
            continue;
        }

        lines.push(line);
    }

    let mut content = lines.join("\n");

    for (from, to) in PLACEHOLDERS {
        content = content.replace(from, to);
    }

    quote_keys(&content)
}

fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    let mut previous = None;

    for (index, c) in line.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(open), _) if c == open => quote = None,
            (None, '/') if previous == Some('/') => return &line[..index - 1],
            _ => (),
        }

        previous = Some(c);
    }

    line
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '-'
}

/// Quotes every bare object key and drops trailing commas.
fn quote_keys(content: &str) -> String {
    let chars = content.chars().collect::<Vec<_>>();
    let next_token = |from: usize| chars[from..].iter().find(|c| !c.is_whitespace()).copied();

    let mut out = String::with_capacity(content.len());
    let mut quote = None;
    let mut expect_key = true;
    let mut index = 0;

    while index < chars.len() {
        let c = chars[index];

        if let Some(open) = quote {
            out.push(c);

            if c == '\\' {
                if let Some(escaped) = chars.get(index + 1) {
                    out.push(*escaped);
                    index += 1;
                }
            } else if c == open {
                quote = None;
            }

            index += 1;
            continue;
        }

        match c {
            '"' => {
                quote = Some(c);
                expect_key = false;
                out.push(c);
            }
            ',' if matches!(next_token(index + 1), Some('}' | ']')) => (),
            '{' | ',' => {
                expect_key = true;
                out.push(c);
            }
            c if c.is_whitespace() => out.push(c),
            c if expect_key && is_key_char(c) => {
                let end = chars[index..]
                    .iter()
                    .position(|x| !is_key_char(*x))
                    .map_or(chars.len(), |x| index + x);

                let word = chars[index..end].iter().collect::<String>();

                if next_token(end) == Some(':') {
                    out.push_str(&format!("\"{}\"", word));
                } else {
                    out.push_str(&word);
                }

                expect_key = false;
                index = end;
                continue;
            }
            _ => {
                expect_key = false;
                out.push(c);
            }
        }

        index += 1;
    }

    out
}
