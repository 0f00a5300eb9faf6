//! JavaScript scanning for MDX ESM blocks and expressions.
//!
//! markdown-rs only recognizes `import`/`export` blocks, and only tracks
//! braces inside expressions correctly, when it is given parse callbacks.
//! The scanner here is enough for that: it skips strings, template literals
//! and comments, and checks bracket balance. It also reads the local names
//! bound by `import` declarations, across lines.

use markdown::{MdxExpressionKind, MdxSignal};

const SIGNAL_SOURCE: &str = "rhinotabs";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Str(String),
    Punct(char),
}

/// How a scanned chunk of JavaScript ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Balance {
    Closed,
    /// Unclosed bracket, string or comment; more text may follow.
    Open,
    /// Closing bracket with no matching opener, at a byte offset.
    Stray(usize, char),
}

/// A name bound by an `import` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// Local binding name.
    pub local: String,
    /// Module specifier.
    pub source: String,
}

/// `mdx_esm_parse` callback for markdown-rs.
pub fn esm_signal(value: &str) -> MdxSignal {
    signal(value, "import/export")
}

/// `mdx_expression_parse` callback for markdown-rs.
pub fn expression_signal(value: &str, _kind: &MdxExpressionKind) -> MdxSignal {
    signal(value, "expression")
}

fn signal(value: &str, what: &str) -> MdxSignal {
    match lex(value).1 {
        Balance::Closed => MdxSignal::Ok,
        Balance::Open => MdxSignal::Eof(
            format!("Unexpected end of file in {what}"),
            Box::new(SIGNAL_SOURCE.to_string()),
            Box::new("unexpected-eof".to_string()),
        ),
        Balance::Stray(offset, c) => MdxSignal::Error(
            format!("Unexpected closing `{c}` in {what}"),
            offset,
            Box::new(SIGNAL_SOURCE.to_string()),
            Box::new("unexpected-closing-bracket".to_string()),
        ),
    }
}

/// Every binding introduced by `import` declarations in `esm`.
///
/// Side-effect imports bind nothing. Dynamic `import()` and `import.meta`
/// are ignored.
pub fn import_bindings(esm: &str) -> Vec<ImportBinding> {
    let (tokens, _) = lex(esm);
    let mut bindings = Vec::new();
    let mut idx = 0;
    while idx < tokens.len() {
        if is_import_start(&tokens, idx) {
            idx = read_import(&tokens, idx + 1, &mut bindings);
        } else {
            idx += 1;
        }
    }
    bindings
}

fn is_import_start(tokens: &[Token<'_>], idx: usize) -> bool {
    matches!(tokens[idx], Token::Ident("import"))
        && (idx == 0 || !matches!(tokens[idx - 1], Token::Punct('.')))
        && !matches!(tokens.get(idx + 1), Some(Token::Punct('(' | '.')))
}

fn read_import(tokens: &[Token<'_>], mut idx: usize, bindings: &mut Vec<ImportBinding>) -> usize {
    let mut locals: Vec<String> = Vec::new();
    let mut in_braces = false;

    while let Some(token) = tokens.get(idx) {
        match token {
            // Specifier: either after `from` or a bare side-effect import.
            Token::Str(source) if !in_braces => {
                bindings.extend(locals.drain(..).map(|local| ImportBinding {
                    local,
                    source: source.clone(),
                }));
                return idx + 1;
            }
            Token::Ident("from") if !in_braces => {}
            Token::Punct('{') => in_braces = true,
            Token::Punct('}') => in_braces = false,
            Token::Punct(';') => return idx + 1,
            Token::Punct('*') => {
                if let (Some(Token::Ident("as")), Some(Token::Ident(local))) =
                    (tokens.get(idx + 1), tokens.get(idx + 2))
                {
                    locals.push((*local).to_string());
                    idx += 2;
                }
            }
            Token::Ident(_) | Token::Str(_) => {
                if matches!(tokens.get(idx + 1), Some(Token::Ident("as"))) {
                    if let Some(Token::Ident(local)) = tokens.get(idx + 2) {
                        locals.push((*local).to_string());
                    }
                    idx += 2;
                } else if let Token::Ident(name) = token {
                    locals.push((*name).to_string());
                }
            }
            Token::Punct(_) => {}
        }
        idx += 1;
    }
    idx
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_alphanumeric()
}

fn closing_pair(c: char) -> char {
    match c {
        ')' => '(',
        ']' => '[',
        _ => '{',
    }
}

fn lex(source: &str) -> (Vec<Token<'_>>, Balance) {
    let mut tokens = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                while chars.next_if(|&(_, next)| next != '\n').is_some() {}
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut closed = false;
                while let Some((_, next)) = chars.next() {
                    if next == '*' && chars.next_if(|&(_, after)| after == '/').is_some() {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return (tokens, Balance::Open);
                }
            }
            '\'' | '"' => {
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, next)) = chars.next() {
                    match next {
                        '\\' => {
                            if let Some((_, escaped)) = chars.next() {
                                value.push(escaped);
                            }
                        }
                        '\n' => break,
                        quote if quote == c => {
                            closed = true;
                            break;
                        }
                        other => value.push(other),
                    }
                }
                if !closed {
                    return (tokens, Balance::Open);
                }
                tokens.push(Token::Str(value));
            }
            '`' => {
                if !skip_template(&mut chars) {
                    return (tokens, Balance::Open);
                }
                tokens.push(Token::Punct('`'));
            }
            '(' | '[' | '{' => {
                stack.push(c);
                tokens.push(Token::Punct(c));
            }
            ')' | ']' | '}' => {
                if stack.pop() != Some(closing_pair(c)) {
                    return (tokens, Balance::Stray(idx, c));
                }
                tokens.push(Token::Punct(c));
            }
            c if is_ident_start(c) => {
                let mut end = idx + c.len_utf8();
                while let Some((next_idx, next)) = chars.next_if(|&(_, next)| is_ident_continue(next))
                {
                    end = next_idx + next.len_utf8();
                }
                tokens.push(Token::Ident(&source[idx..end]));
            }
            other => tokens.push(Token::Punct(other)),
        }
    }

    let balance = if stack.is_empty() {
        Balance::Closed
    } else {
        Balance::Open
    };
    (tokens, balance)
}

/// Skip a template literal body after its opening backtick. Brace depth inside
/// `${}` is counted without looking into nested strings.
fn skip_template(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> bool {
    let mut depth = 0usize;
    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '`' if depth == 0 => return true,
            '$' if depth == 0 && chars.next_if(|&(_, next)| next == '{').is_some() => depth = 1,
            '{' if depth > 0 => depth += 1,
            '}' if depth > 0 => depth -= 1,
            _ => {}
        }
    }
    false
}
