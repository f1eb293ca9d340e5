//! Country address formats and location title rendering.

use super::types::{Address, AddressField};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Address formatter errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Invalid country code: '{0}'")]
    InvalidCountryCode(String),
}

/// A country-specific layout: a template with `%field` placeholders, one
/// output line per template line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressFormat {
    pub country_code: String,
    pub template: String,
    /// Fields the template references, in order of first appearance.
    pub used_fields: Vec<AddressField>,
}

impl AddressFormat {
    pub fn new(country_code: &str, template: &str) -> Self {
        Self {
            country_code: country_code.to_string(),
            template: template.to_string(),
            used_fields: used_fields(template),
        }
    }
}

/// Source of address formats, plus title rendering on top of it.
pub trait AddressFormatter {
    fn format_template_for(&self, country_code: &str) -> Result<AddressFormat, FormatError>;

    /// Render a single-line title for `address` using its country's format.
    fn title_for(&self, address: &Address) -> Result<String, FormatError> {
        let format = self.format_template_for(&address.country_code)?;
        Ok(render_title(&format, address))
    }
}

// ─── Built-in formats ───────────────────────────────────────────

struct BuiltinFormat {
    countries: &'static [&'static str],
    template: &'static str,
}

const BUILTIN_FORMATS: &[BuiltinFormat] = &[
    BuiltinFormat {
        countries: &["US"],
        template: "%addressLine1\n%addressLine2\n%addressLine3\n%locality, %administrativeArea %postalCode",
    },
    BuiltinFormat {
        countries: &["CA", "AU"],
        template: "%addressLine1\n%addressLine2\n%addressLine3\n%locality %administrativeArea %postalCode",
    },
    BuiltinFormat {
        countries: &["GB"],
        template: "%addressLine1\n%addressLine2\n%addressLine3\n%locality\n%postalCode",
    },
    BuiltinFormat {
        countries: &["DE", "FR", "SE", "NO", "DK", "NL", "AT", "CH", "ES", "BE"],
        template: "%addressLine1\n%addressLine2\n%addressLine3\n%postalCode %locality",
    },
    BuiltinFormat {
        countries: &["IT"],
        template: "%addressLine1\n%addressLine2\n%addressLine3\n%postalCode %locality %administrativeArea",
    },
    BuiltinFormat {
        countries: &["MX"],
        template: "%addressLine1\n%addressLine2\n%addressLine3\n%postalCode %locality, %administrativeArea",
    },
    BuiltinFormat {
        countries: &["BR"],
        template: "%addressLine1\n%addressLine2\n%addressLine3\n%locality-%administrativeArea\n%postalCode",
    },
];

/// Used for countries without a dedicated format.
const DEFAULT_TEMPLATE: &str = "%addressLine1\n%addressLine2\n%addressLine3\n%locality";

/// In-process format repository covering common countries.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFormats;

impl AddressFormatter for BuiltinFormats {
    fn format_template_for(&self, country_code: &str) -> Result<AddressFormat, FormatError> {
        if country_code.len() != 2 || !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FormatError::InvalidCountryCode(country_code.to_string()));
        }
        let code = country_code.to_ascii_uppercase();
        let template = BUILTIN_FORMATS
            .iter()
            .find(|f| f.countries.contains(&code.as_str()))
            .map(|f| f.template)
            .unwrap_or(DEFAULT_TEMPLATE);
        Ok(AddressFormat::new(&code, template))
    }
}

// ─── Rendering ──────────────────────────────────────────────────

enum Token<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

/// Split a template into literal text and `%name` placeholder tokens.
fn tokenize(template: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = template;
    while let Some(pos) = rest.find('%') {
        tokens.push(Token::Text(&rest[..pos]));
        let after = &rest[pos + 1..];
        let len = after
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(after.len());
        tokens.push(Token::Placeholder(&after[..len]));
        rest = &after[len..];
    }
    tokens.push(Token::Text(rest));
    tokens
}

fn used_fields(template: &str) -> Vec<AddressField> {
    let mut fields = Vec::new();
    for token in tokenize(template) {
        if let Token::Placeholder(name) = token {
            if let Some(field) = AddressField::from_placeholder(name) {
                if !fields.contains(&field) {
                    fields.push(field);
                }
            }
        }
    }
    fields
}

/// Value substituted for placeholder `name`: empty unless the format uses
/// the field, markup stripped, inner newlines folded into ", ".
fn placeholder_value(format: &AddressFormat, address: &Address, name: &str) -> String {
    let Some(field) = AddressField::from_placeholder(name).filter(|f| format.used_fields.contains(f)) else {
        return String::new();
    };
    MARKUP
        .replace_all(address.get(field), "")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render one template line. Template text after a value is kept only when
/// another value (or the end of the line) follows it directly, so separators
/// next to empty fields disappear. `None` if every value on the line is empty.
fn render_line(format: &AddressFormat, address: &Address, line: &str) -> Option<String> {
    let mut out = String::new();
    let mut pending: Option<&str> = None;
    let mut seen_placeholder = false;
    let mut last_filled = false;
    let mut any_filled = false;

    for token in tokenize(line) {
        match token {
            Token::Text(text) if !seen_placeholder => out.push_str(text),
            Token::Text(text) if last_filled => pending = Some(text),
            Token::Text(_) => {}
            Token::Placeholder(name) => {
                seen_placeholder = true;
                let value = placeholder_value(format, address, name);
                if value.is_empty() {
                    last_filled = false;
                    continue;
                }
                if let Some(sep) = pending.take() {
                    out.push_str(sep);
                }
                out.push_str(&value);
                last_filled = true;
                any_filled = true;
            }
        }
    }
    if last_filled {
        if let Some(trailing) = pending {
            out.push_str(trailing);
        }
    }

    let out = out.trim();
    (any_filled && !out.is_empty()).then(|| out.to_string())
}

/// Render `address` through `format` into a one-line title.
///
/// Only fields listed in `used_fields` are substituted; any other placeholder
/// renders empty. Values keep their text apart from markup and surrounding
/// whitespace. Lines without a value are dropped, the rest joined with ", ".
pub fn render_title(format: &AddressFormat, address: &Address) -> String {
    format
        .template
        .lines()
        .filter_map(|line| render_line(format, address, line))
        .collect::<Vec<_>>()
        .join(", ")
}
