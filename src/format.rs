//! Number rendering driven by host format strings.

use crate::parser::{parse_format, DigitPattern, FormatPattern, NumberSpec, Section};
use serde::Serialize;

/// Format applied to a measure column that declares none.
pub const DEFAULT_FORMAT: &str = "#,0.##";

/// A compiled format string. Serializes as its source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "String")]
pub struct ValueFormatter {
    source: String,
    pattern: FormatPattern,
}

impl ValueFormatter {
    /// Compile a format string, failing on unparseable input.
    pub fn parse(source: &str) -> crate::Result<Self> {
        let pattern = parse_format(source).map_err(crate::ChartError::Format)?;
        Ok(Self { source: source.to_string(), pattern })
    }

    /// Compile a format string, degrading to `General` on unparseable input.
    pub fn new(source: &str) -> Self {
        Self::parse(source).unwrap_or_else(|err| {
            tracing::warn!(%err, "falling back to general number format");
            Self { source: source.to_string(), pattern: FormatPattern::general() }
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        match (&self.pattern.negative, value < 0.0) {
            (Some(negative), true) => render_section(negative, -value),
            (None, true) => {
                let section = &self.pattern.positive;
                let number = render_number(section, -value);
                // A value that rounds to zero loses its sign
                let signed = number.chars().any(|c| c.is_ascii_digit() && c != '0');
                with_affixes(section, &number, signed)
            }
            _ => render_section(&self.pattern.positive, value),
        }
    }

    /// Render an optional value; missing values show as `-`.
    pub fn format_opt(&self, value: Option<f64>) -> String {
        value.map_or_else(|| "-".to_string(), |v| self.format(v))
    }
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT)
    }
}

impl From<ValueFormatter> for String {
    fn from(formatter: ValueFormatter) -> Self {
        formatter.source
    }
}

fn render_section(section: &Section, value: f64) -> String {
    with_affixes(section, &render_number(section, value), false)
}

/// The numeric part of a section, without its literal prefix and suffix.
fn render_number(section: &Section, value: f64) -> String {
    let value = if section.percent { value * 100.0 } else { value };
    match &section.number {
        NumberSpec::General => value.to_string(),
        NumberSpec::Digits(digits) => render_digits(digits, value),
        NumberSpec::Literal => String::new(),
    }
}

fn with_affixes(section: &Section, number: &str, signed: bool) -> String {
    let sign = if signed { "-" } else { "" };
    format!("{}{}{}{}", sign, section.prefix, number, section.suffix)
}

/// Round half away from zero to `digits` decimals.
fn round_half_away(value: f64, digits: usize) -> f64 {
    let scale = 10f64.powi(digits.min(15) as i32);
    let scaled = (value * scale).round() / scale;
    if scaled.is_finite() {
        scaled
    } else {
        value
    }
}

fn render_digits(pattern: &DigitPattern, value: f64) -> String {
    let value = round_half_away(value, pattern.max_fraction_digits);
    let fixed = format!("{:.*}", pattern.max_fraction_digits, value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut frac = frac_part.to_string();
    while frac.len() > pattern.min_fraction_digits && frac.ends_with('0') {
        frac.pop();
    }

    let mut int = int_part.trim_start_matches('0').to_string();
    while int.len() < pattern.min_integer_digits {
        int.insert(0, '0');
    }
    if pattern.grouping {
        int = group_thousands(&int);
    }

    if frac.is_empty() {
        int
    } else {
        format!("{}.{}", int, frac)
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
