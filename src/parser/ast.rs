// Abstract Syntax Tree for value-format strings

/// A parsed format string: a positive section and an optional negative one.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatPattern {
    pub positive: Section,
    /// When present, negative values are rendered through this section
    /// using their absolute value (e.g. `0;(0)`).
    pub negative: Option<Section>,
}

impl FormatPattern {
    pub fn general() -> Self {
        Self {
            positive: Section {
                prefix: String::new(),
                number: NumberSpec::General,
                suffix: String::new(),
                percent: false,
            },
            negative: None,
        }
    }
}

/// One `;`-separated section of a format string
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub prefix: String,
    pub number: NumberSpec,
    pub suffix: String,
    /// A `%` anywhere in the section scales the value by 100.
    pub percent: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumberSpec {
    /// Shortest round-trip representation
    General,
    Digits(DigitPattern),
    /// Section made of literals only
    Literal,
}

/// Digit placeholders of a section (`#,0.00` and friends)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigitPattern {
    /// Count of `0` placeholders before the decimal point
    pub min_integer_digits: usize,
    /// Thousands separator requested
    pub grouping: bool,
    /// Count of `0` placeholders after the decimal point
    pub min_fraction_digits: usize,
    /// Count of `0` and `#` placeholders after the decimal point
    pub max_fraction_digits: usize,
}
