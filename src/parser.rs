//! TOML parser.
//!
//! Consumes the token stream and builds the document tree. The parser owns
//! the root table and a cursor (a path of keys) naming the table that bare
//! `key = value` statements currently write into; `[header]` and
//! `[[header]]` statements move the cursor.
//!
//! Bookkeeping beyond the tree itself is needed because TOML's table rules
//! are stateful: a table explicitly opened with a header may not be opened
//! again, an inline table is frozen once its statement ends, and a
//! `[[header]]` may only append to an array it created. Three path sets
//! track this; paths record array indices as their own segment so repeated
//! `[[header]]` elements stay distinct.
//!
//! The first error aborts the parse. Nothing is recovered or accumulated.

use crate::lexer::{Mode, Token, TokenKind, Tokenizer};
use crate::{Error, ParseOptions, Result, TomlTable, TomlValue};
use std::collections::HashSet;

/// One step of an absolute path into the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PathSeg {
    Key(String),
    Index(usize),
}

fn path_display(path: &[PathSeg]) -> String {
    let mut out = String::new();
    for seg in path {
        match seg {
            PathSeg::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSeg::Index(i) => {
                out.push_str(&format!("[{i}]"));
            }
        }
    }
    out
}

fn corrupted() -> Error {
    Error::custom("corrupted parser state")
}

/// Walks an absolute path to a node. Paths come from the parser's own
/// bookkeeping, so a miss means corrupted state, not bad input.
fn resolve_mut<'t>(root: &'t mut TomlValue, path: &[PathSeg]) -> Option<&'t mut TomlValue> {
    let mut cursor = root;
    for seg in path {
        cursor = match seg {
            PathSeg::Key(key) => cursor.as_table_mut()?.get_mut(key)?,
            PathSeg::Index(i) => cursor.as_array_mut()?.get_mut(*i)?,
        };
    }
    Some(cursor)
}

/// Descends the prefix of a header path (all but the last key), creating
/// missing tables and stepping into the last element of any
/// array-of-tables along the way.
fn descend_header<'t>(
    root: &'t mut TomlValue,
    assigned: &HashSet<Vec<PathSeg>>,
    arrays_of_tables: &HashSet<Vec<PathSeg>>,
    keys: &[String],
    line: usize,
    col: usize,
) -> Result<(Vec<PathSeg>, &'t mut TomlTable)> {
    let mut abs: Vec<PathSeg> = Vec::new();
    let mut cursor = root;
    for key in &keys[..keys.len() - 1] {
        let table = match cursor {
            TomlValue::Table(table) => table,
            _ => return Err(corrupted()),
        };
        abs.push(PathSeg::Key(key.clone()));
        if !table.contains_key(key) {
            table.insert(key.clone(), TomlValue::Table(TomlTable::new()));
        }
        let next = table.get_mut(key).ok_or_else(corrupted)?;
        cursor = match next {
            TomlValue::Table(_) => {
                if assigned.contains(&abs) {
                    return Err(Error::semantic(
                        line,
                        col,
                        path_display(&abs),
                        "cannot extend a table defined as an inline value",
                    ));
                }
                next
            }
            TomlValue::Array(elements) => {
                if !arrays_of_tables.contains(&abs) {
                    return Err(Error::semantic(
                        line,
                        col,
                        path_display(&abs),
                        "header path passes through a static array",
                    ));
                }
                let index = elements.len() - 1;
                abs.push(PathSeg::Index(index));
                elements.get_mut(index).ok_or_else(corrupted)?
            }
            _ => {
                return Err(Error::semantic(
                    line,
                    col,
                    path_display(&abs),
                    "header path passes through a non-table value",
                ))
            }
        };
    }
    match cursor {
        TomlValue::Table(table) => Ok((abs, table)),
        _ => Err(corrupted()),
    }
}

/// Inserts a dotted key inside an inline table, where the global
/// bookkeeping sets do not apply; the whole inline value freezes at once.
fn insert_dotted_local(
    table: &mut TomlTable,
    keys: &[String],
    value: TomlValue,
    line: usize,
    col: usize,
) -> Result<()> {
    let (last, prefix) = keys.split_last().ok_or_else(corrupted)?;
    let mut seen: Vec<&str> = Vec::new();
    let mut cursor = table;
    for key in prefix {
        seen.push(key);
        if !cursor.contains_key(key) {
            cursor.insert(key.clone(), TomlValue::Table(TomlTable::new()));
        }
        cursor = match cursor.get_mut(key) {
            Some(TomlValue::Table(table)) => table,
            Some(_) => {
                return Err(Error::semantic(
                    line,
                    col,
                    seen.join("."),
                    "dotted key passes through a non-table value",
                ))
            }
            None => return Err(corrupted()),
        };
    }
    seen.push(last);
    if !cursor.insert(last.clone(), value) {
        return Err(Error::semantic(line, col, seen.join("."), "duplicate key"));
    }
    Ok(())
}

/// The recursive-descent parser. Single use: [`Parser::parse`] consumes it.
pub struct Parser<'a> {
    tokens: Tokenizer<'a>,
    options: ParseOptions,
    root: TomlValue,
    current: Vec<PathSeg>,
    /// Tables defined by an explicit `[header]` (each may appear once).
    explicit: HashSet<Vec<PathSeg>>,
    /// Keys given a value by a statement; inline containers under them are
    /// frozen against later extension.
    assigned: HashSet<Vec<PathSeg>>,
    /// Arrays created by `[[header]]`, the only ones headers may append to.
    arrays_of_tables: HashSet<Vec<PathSeg>>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, options: ParseOptions) -> Self {
        Parser {
            tokens: Tokenizer::new(input),
            options,
            root: TomlValue::Table(TomlTable::new()),
            current: Vec::new(),
            explicit: HashSet::new(),
            assigned: HashSet::new(),
            arrays_of_tables: HashSet::new(),
        }
    }

    /// Parses the whole input into the root table.
    pub fn parse(mut self) -> Result<TomlTable> {
        loop {
            let token = self.tokens.next_token(Mode::Key)?;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Newline => continue,
                TokenKind::LeftBracket => self.table_header(token)?,
                TokenKind::DoubleLeftBracket => self.array_of_tables_header(token)?,
                TokenKind::Key(_) | TokenKind::String { .. } => self.key_value(token)?,
                other => {
                    return Err(Error::syntax(
                        token.line,
                        token.col,
                        format!("expected a key or table header, found {}", other.describe()),
                    ))
                }
            }
        }
        match self.root {
            TomlValue::Table(table) => Ok(table),
            _ => Err(corrupted()),
        }
    }

    fn key_text(&self, token: &Token) -> Result<String> {
        match &token.kind {
            TokenKind::Key(key) => Ok(key.clone()),
            TokenKind::String {
                value,
                multiline: false,
                ..
            } => Ok(value.clone()),
            TokenKind::String { multiline: true, .. } => Err(Error::syntax(
                token.line,
                token.col,
                "multi-line strings cannot be used as keys",
            )),
            other => Err(Error::syntax(
                token.line,
                token.col,
                format!("expected a key, found {}", other.describe()),
            )),
        }
    }

    fn expect_line_end(&mut self) -> Result<()> {
        let token = self.tokens.next_token(Mode::Key)?;
        match token.kind {
            TokenKind::Newline | TokenKind::Eof => Ok(()),
            other => Err(Error::syntax(
                token.line,
                token.col,
                format!("expected end of line, found {}", other.describe()),
            )),
        }
    }

    /// `key = value`, with dotted keys descending relative to the current
    /// table.
    fn key_value(&mut self, first: Token) -> Result<()> {
        let (line, col) = (first.line, first.col);
        let mut keys = vec![self.key_text(&first)?];
        loop {
            let token = self.tokens.next_token(Mode::Key)?;
            match token.kind {
                TokenKind::Dot => {
                    let key = self.tokens.next_token(Mode::Key)?;
                    keys.push(self.key_text(&key)?);
                }
                TokenKind::Equals => break,
                other => {
                    return Err(Error::syntax(
                        token.line,
                        token.col,
                        format!("expected `.` or `=` after key, found {}", other.describe()),
                    ))
                }
            }
        }
        let value = self.parse_value()?;
        self.expect_line_end()?;
        self.insert_key_value(&keys, value, line, col)
    }

    fn insert_key_value(
        &mut self,
        keys: &[String],
        value: TomlValue,
        line: usize,
        col: usize,
    ) -> Result<()> {
        let (last, prefix) = keys.split_last().ok_or_else(corrupted)?;
        let mut abs = self.current.clone();
        let mut cursor = resolve_mut(&mut self.root, &self.current).ok_or_else(corrupted)?;
        for key in prefix {
            let table = match cursor {
                TomlValue::Table(table) => table,
                _ => {
                    return Err(Error::semantic(
                        line,
                        col,
                        path_display(&abs),
                        "dotted key passes through a non-table value",
                    ))
                }
            };
            abs.push(PathSeg::Key(key.clone()));
            match table.get(key) {
                Some(TomlValue::Table(_)) => {
                    if self.assigned.contains(&abs) {
                        return Err(Error::semantic(
                            line,
                            col,
                            path_display(&abs),
                            "cannot extend a table defined as an inline value",
                        ));
                    }
                }
                Some(_) => {
                    return Err(Error::semantic(
                        line,
                        col,
                        path_display(&abs),
                        "dotted key passes through a non-table value",
                    ))
                }
                None => {
                    table.insert(key.clone(), TomlValue::Table(TomlTable::new()));
                }
            }
            cursor = table.get_mut(key).ok_or_else(corrupted)?;
        }
        let table = match cursor {
            TomlValue::Table(table) => table,
            _ => {
                return Err(Error::semantic(
                    line,
                    col,
                    path_display(&abs),
                    "dotted key passes through a non-table value",
                ))
            }
        };
        abs.push(PathSeg::Key(last.clone()));
        if !table.insert(last.clone(), value) {
            return Err(Error::semantic(
                line,
                col,
                path_display(&abs),
                "duplicate key",
            ));
        }
        self.assigned.insert(abs);
        Ok(())
    }

    /// `[a.b.c]`: moves the cursor, creating tables along the way.
    fn table_header(&mut self, open: Token) -> Result<()> {
        let (line, col) = (open.line, open.col);
        let keys = self.header_keys(TokenKind::RightBracket)?;
        self.expect_line_end()?;

        let (mut abs, table) = descend_header(
            &mut self.root,
            &self.assigned,
            &self.arrays_of_tables,
            &keys,
            line,
            col,
        )?;
        let last = keys.last().ok_or_else(corrupted)?;
        abs.push(PathSeg::Key(last.clone()));
        match table.get(last) {
            None => {
                table.insert(last.clone(), TomlValue::Table(TomlTable::new()));
            }
            Some(TomlValue::Table(_)) => {
                if self.assigned.contains(&abs) {
                    return Err(Error::semantic(
                        line,
                        col,
                        path_display(&abs),
                        "cannot reopen a table defined as an inline value",
                    ));
                }
                if self.explicit.contains(&abs) {
                    return Err(Error::semantic(
                        line,
                        col,
                        path_display(&abs),
                        "table defined more than once",
                    ));
                }
            }
            Some(TomlValue::Array(_)) => {
                return Err(Error::semantic(
                    line,
                    col,
                    path_display(&abs),
                    "already defined as an array; use `[[...]]` to append",
                ))
            }
            Some(_) => {
                return Err(Error::semantic(
                    line,
                    col,
                    path_display(&abs),
                    "already defined as a non-table value",
                ))
            }
        }
        self.explicit.insert(abs.clone());
        self.current = abs;
        Ok(())
    }

    /// `[[a.b.c]]`: appends a fresh table to the named array and moves the
    /// cursor into it.
    fn array_of_tables_header(&mut self, open: Token) -> Result<()> {
        let (line, col) = (open.line, open.col);
        let keys = self.header_keys(TokenKind::DoubleRightBracket)?;
        self.expect_line_end()?;

        let (mut abs, table) = descend_header(
            &mut self.root,
            &self.assigned,
            &self.arrays_of_tables,
            &keys,
            line,
            col,
        )?;
        let last = keys.last().ok_or_else(corrupted)?;
        abs.push(PathSeg::Key(last.clone()));
        if table.contains_key(last) {
            if !self.arrays_of_tables.contains(&abs) {
                return Err(Error::semantic(
                    line,
                    col,
                    path_display(&abs),
                    "cannot append: not an array of tables",
                ));
            }
            let elements = table
                .get_mut(last)
                .and_then(TomlValue::as_array_mut)
                .ok_or_else(corrupted)?;
            elements.push(TomlValue::Table(TomlTable::new()));
            abs.push(PathSeg::Index(elements.len() - 1));
        } else {
            self.arrays_of_tables.insert(abs.clone());
            table.insert(
                last.clone(),
                TomlValue::Array(vec![TomlValue::Table(TomlTable::new())]),
            );
            abs.push(PathSeg::Index(0));
        }
        self.current = abs;
        Ok(())
    }

    /// Dotted keys of a header, up to and including the closing bracket.
    fn header_keys(&mut self, closing: TokenKind) -> Result<Vec<String>> {
        let first = self.tokens.next_token(Mode::Key)?;
        let mut keys = vec![self.key_text(&first)?];
        loop {
            let token = self.tokens.next_token(Mode::Key)?;
            if token.kind == closing {
                return Ok(keys);
            }
            match token.kind {
                TokenKind::Dot => {
                    let key = self.tokens.next_token(Mode::Key)?;
                    keys.push(self.key_text(&key)?);
                }
                other => {
                    return Err(Error::syntax(
                        token.line,
                        token.col,
                        format!(
                            "expected `.` or {} in table header, found {}",
                            closing.describe(),
                            other.describe()
                        ),
                    ))
                }
            }
        }
    }

    fn parse_value(&mut self) -> Result<TomlValue> {
        let token = self.tokens.next_token(Mode::Value)?;
        self.value_from_token(token)
    }

    /// Value dispatch is purely on the token kind.
    fn value_from_token(&mut self, token: Token) -> Result<TomlValue> {
        match token.kind {
            TokenKind::Integer(n) => Ok(TomlValue::Integer(n)),
            TokenKind::Float(f) => Ok(TomlValue::Float(f)),
            TokenKind::Boolean(b) => Ok(TomlValue::Boolean(b)),
            TokenKind::DateTime(dt) => Ok(TomlValue::DateTime(dt)),
            TokenKind::String { value, .. } => Ok(TomlValue::String(value)),
            TokenKind::LeftBracket => self.parse_inline_array(token),
            TokenKind::LeftBrace => self.parse_inline_table(token),
            other => Err(Error::syntax(
                token.line,
                token.col,
                format!("expected a value, found {}", other.describe()),
            )),
        }
    }

    /// `[ v, v, ... ]`. Newlines and comments are allowed inside; a
    /// trailing comma is allowed.
    fn parse_inline_array(&mut self, open: Token) -> Result<TomlValue> {
        let mut values = Vec::new();
        let mut expect_value = true;
        loop {
            let token = self.tokens.next_token(Mode::Value)?;
            match token.kind {
                TokenKind::Newline => continue,
                TokenKind::Eof => {
                    return Err(Error::syntax(
                        open.line,
                        open.col,
                        "unterminated array (opened here)",
                    ))
                }
                TokenKind::RightBracket => break,
                TokenKind::Comma => {
                    if expect_value {
                        return Err(Error::syntax(
                            token.line,
                            token.col,
                            "expected a value before `,`",
                        ));
                    }
                    expect_value = true;
                }
                _ if expect_value => {
                    values.push(self.value_from_token(token)?);
                    expect_value = false;
                }
                other => {
                    return Err(Error::syntax(
                        token.line,
                        token.col,
                        format!("expected `,` or `]`, found {}", other.describe()),
                    ))
                }
            }
        }
        if self.options.strict_arrays {
            let mut kinds = values.iter().map(TomlValue::kind);
            if let Some(first) = kinds.next() {
                if kinds.any(|kind| kind != first) {
                    return Err(Error::semantic(
                        open.line,
                        open.col,
                        path_display(&self.current),
                        "array elements must all be of the same type",
                    ));
                }
            }
        }
        Ok(TomlValue::Array(values))
    }

    /// `{ k = v, ... }`. Single line, no trailing comma; the produced table
    /// is frozen once the enclosing statement ends.
    fn parse_inline_table(&mut self, open: Token) -> Result<TomlValue> {
        let mut table = TomlTable::new();
        let mut first = true;
        loop {
            let token = self.tokens.next_token(Mode::Key)?;
            match token.kind {
                TokenKind::RightBrace if first => break,
                TokenKind::Newline => {
                    return Err(Error::syntax(
                        token.line,
                        token.col,
                        "newlines are not allowed inside inline tables",
                    ))
                }
                TokenKind::Eof => {
                    return Err(Error::syntax(
                        open.line,
                        open.col,
                        "unterminated inline table (opened here)",
                    ))
                }
                _ => {
                    let (line, col) = (token.line, token.col);
                    let mut keys = vec![self.key_text(&token)?];
                    loop {
                        let token = self.tokens.next_token(Mode::Key)?;
                        match token.kind {
                            TokenKind::Dot => {
                                let key = self.tokens.next_token(Mode::Key)?;
                                keys.push(self.key_text(&key)?);
                            }
                            TokenKind::Equals => break,
                            other => {
                                return Err(Error::syntax(
                                    token.line,
                                    token.col,
                                    format!(
                                        "expected `.` or `=` after key, found {}",
                                        other.describe()
                                    ),
                                ))
                            }
                        }
                    }
                    let value = self.parse_value()?;
                    insert_dotted_local(&mut table, &keys, value, line, col)?;

                    let sep = self.tokens.next_token(Mode::Key)?;
                    match sep.kind {
                        TokenKind::Comma => {
                            first = false;
                        }
                        TokenKind::RightBrace => break,
                        TokenKind::Newline => {
                            return Err(Error::syntax(
                                sep.line,
                                sep.col,
                                "newlines are not allowed inside inline tables",
                            ))
                        }
                        TokenKind::Eof => {
                            return Err(Error::syntax(
                                open.line,
                                open.col,
                                "unterminated inline table (opened here)",
                            ))
                        }
                        other => {
                            return Err(Error::syntax(
                                sep.line,
                                sep.col,
                                format!("expected `,` or `}}`, found {}", other.describe()),
                            ))
                        }
                    }
                }
            }
        }
        Ok(TomlValue::Table(table))
    }
}
