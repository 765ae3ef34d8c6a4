//! Connection Template Model
//!
//! A libpq-style `key=value` connection string, parsed into fields so the
//! database name can be swapped without touching any other byte of the
//! template.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

use super::identifier::Identifier;
use crate::shared::errors::TemplateError;

lazy_static! {
    /// Matches `postgres://`, `postgresql://` and any other URI scheme
    static ref URI_SCHEME_REGEX: Regex =
        Regex::new(r"^\s*[A-Za-z][A-Za-z0-9+.\-]*://").expect("valid regex");
}

/// Keys the connector knows how to apply
pub const SUPPORTED_KEYS: &[&str] = &[
    "host",
    "hostaddr",
    "port",
    "user",
    "password",
    "dbname",
    "sslmode",
    "sslrootcert",
    "sslcert",
    "sslkey",
    "application_name",
];

/// Values accepted for `sslmode`
pub const SSL_MODES: &[&str] = &[
    "disable",
    "allow",
    "prefer",
    "require",
    "verify-ca",
    "verify-full",
];

const DATABASE_KEY: &str = "dbname";
const PASSWORD_KEY: &str = "password";
const REDACTED: &str = "***";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Field {
    key: String,
    value: String,
    // Byte range of the raw value token, quotes included
    span: Range<usize>,
}

/// A validated key=value connection template
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionTemplate {
    raw: String,
    fields: Vec<Field>,
    database_field: usize,
}

impl ConnectionTemplate {
    /// Parse a template whose `dbname` must name the administrative database
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` for URI-form templates, malformed syntax,
    /// unknown keys, invalid `port`/`sslmode` values, or when `dbname` is
    /// missing, repeated, or not `admin_database`.
    pub fn parse(raw: &str, admin_database: &str) -> Result<Self, TemplateError> {
        if URI_SCHEME_REGEX.is_match(raw) {
            return Err(TemplateError::UriForm);
        }

        let fields = tokenize(raw)?;
        validate_fields(&fields)?;

        let mut database_fields = fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.key == DATABASE_KEY);
        let (database_field, database) = database_fields
            .next()
            .ok_or(TemplateError::MissingDatabase)?;
        if database_fields.next().is_some() {
            return Err(TemplateError::DuplicateDatabase);
        }
        if database.value != admin_database {
            return Err(TemplateError::UnexpectedDatabase {
                expected: admin_database.to_string(),
                found: database.value.clone(),
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            fields,
            database_field,
        })
    }

    /// Same template, pointed at another database
    #[must_use]
    pub fn for_database(&self, database: &Identifier) -> Self {
        let old = &self.fields[self.database_field];
        let encoded = encode_value(database.as_str());

        let mut raw = String::with_capacity(self.raw.len() + encoded.len());
        raw.push_str(&self.raw[..old.span.start]);
        raw.push_str(&encoded);
        raw.push_str(&self.raw[old.span.end..]);

        let old_end = old.span.end;
        let new_end = old.span.start + encoded.len();
        let fields = self
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                if index == self.database_field {
                    Field {
                        key: field.key.clone(),
                        value: database.as_str().to_string(),
                        span: field.span.start..new_end,
                    }
                } else if field.span.start >= old_end {
                    Field {
                        key: field.key.clone(),
                        value: field.value.clone(),
                        span: (field.span.start - old_end + new_end)
                            ..(field.span.end - old_end + new_end),
                    }
                } else {
                    field.clone()
                }
            })
            .collect();

        Self {
            raw,
            fields,
            database_field: self.database_field,
        }
    }

    /// Database this template connects to
    #[must_use]
    pub fn database(&self) -> &str {
        &self.fields[self.database_field].value
    }

    /// Value of `key`; the last occurrence wins, as in libpq
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|field| field.key == key)
            .map(|field| field.value.as_str())
    }

    /// Parsed `(key, value)` pairs in template order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.fields
            .iter()
            .map(|field| (field.key.as_str(), field.value.as_str()))
    }

    /// The full connection string, password included
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The connection string with every password value masked
    #[must_use]
    pub fn redacted(&self) -> String {
        let mut out = String::with_capacity(self.raw.len());
        let mut cursor = 0;
        for field in self.fields.iter().filter(|f| f.key == PASSWORD_KEY) {
            out.push_str(&self.raw[cursor..field.span.start]);
            out.push_str(REDACTED);
            cursor = field.span.end;
        }
        out.push_str(&self.raw[cursor..]);
        out
    }
}

impl std::fmt::Debug for ConnectionTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ConnectionTemplate")
            .field(&self.redacted())
            .finish()
    }
}

impl std::fmt::Display for ConnectionTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.redacted())
    }
}

fn malformed(position: usize, reason: &str) -> TemplateError {
    TemplateError::Malformed {
        position,
        reason: reason.to_string(),
    }
}

/// Split libpq conninfo text into fields
fn tokenize(raw: &str) -> Result<Vec<Field>, TemplateError> {
    let bytes = raw.as_bytes();
    let mut fields = Vec::new();
    let mut pos = 0;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos == bytes.len() {
            break;
        }

        let key_start = pos;
        while pos < bytes.len() && bytes[pos] != b'=' && !bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos == key_start {
            return Err(malformed(pos, "expected a key before \"=\""));
        }
        let key = raw[key_start..pos].to_string();

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos == bytes.len() || bytes[pos] != b'=' {
            return Err(malformed(pos, &format!("missing \"=\" after \"{key}\"")));
        }
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let value_start = pos;
        let mut value = Vec::new();
        if bytes.get(pos) == Some(&b'\'') {
            pos += 1;
            loop {
                match bytes.get(pos) {
                    None => return Err(malformed(value_start, "unterminated quoted value")),
                    Some(b'\'') => {
                        pos += 1;
                        break;
                    }
                    Some(b'\\') => {
                        let escaped = bytes
                            .get(pos + 1)
                            .ok_or_else(|| malformed(pos, "unterminated quoted value"))?;
                        value.push(*escaped);
                        pos += 2;
                    }
                    Some(byte) => {
                        value.push(*byte);
                        pos += 1;
                    }
                }
            }
        } else {
            while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
                if bytes[pos] == b'\\' {
                    pos += 1;
                    if pos == bytes.len() {
                        break;
                    }
                }
                value.push(bytes[pos]);
                pos += 1;
            }
        }

        let value = String::from_utf8(value)
            .map_err(|_| malformed(value_start, "value is not valid UTF-8"))?;
        fields.push(Field {
            key,
            value,
            span: value_start..pos,
        });
    }

    Ok(fields)
}

fn validate_fields(fields: &[Field]) -> Result<(), TemplateError> {
    for field in fields {
        if !SUPPORTED_KEYS.contains(&field.key.as_str()) {
            return Err(TemplateError::UnsupportedKey(field.key.clone()));
        }
        match field.key.as_str() {
            "port" if field.value.parse::<u16>().is_err() => {
                return Err(TemplateError::InvalidPort(field.value.clone()));
            }
            "sslmode" if !SSL_MODES.contains(&field.value.as_str()) => {
                return Err(TemplateError::InvalidSslMode(field.value.clone()));
            }
            _ => {}
        }
    }

    // sqlx has a single host setting; libpq's split between the dialled
    // address and the TLS name cannot be kept
    let sets = |key: &str| fields.iter().any(|field| field.key == key);
    if sets("host") && sets("hostaddr") {
        return Err(TemplateError::ConflictingHost);
    }
    Ok(())
}

/// Render a value so that `tokenize` reads it back unchanged
fn encode_value(value: &str) -> String {
    let needs_quoting = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_ascii_whitespace() || c == '\'' || c == '\\');
    if !needs_quoting {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}
