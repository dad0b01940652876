// Token-level helpers shared by the format grammar

use nom::{
    branch::alt,
    bytes::complete::take_till,
    character::complete::{anychar, char, none_of},
    combinator::map,
    sequence::{delimited, preceded},
    IResult,
};

/// Characters with meaning inside a number pattern or between sections
pub const RESERVED: &str = "#0,.;\"\\%";

/// A literal run inside a format section
#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    Text(String),
    Percent,
}

/// `"quoted text"`
pub fn quoted_literal(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
        str::to_string,
    )(input)
}

/// `\x` escapes a single character
pub fn escaped_char(input: &str) -> IResult<&str, String> {
    map(preceded(char('\\'), anychar), String::from)(input)
}

/// Any piece of literal text or a percent marker
pub fn piece(input: &str) -> IResult<&str, Piece> {
    alt((
        map(char('%'), |_| Piece::Percent),
        map(quoted_literal, Piece::Text),
        map(escaped_char, Piece::Text),
        map(none_of(RESERVED), |c| Piece::Text(c.to_string())),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_literal() {
        assert_eq!(quoted_literal("\"kg\" rest"), Ok((" rest", "kg".to_string())));
    }

    #[test]
    fn test_piece_variants() {
        assert_eq!(piece("%"), Ok(("", Piece::Percent)));
        assert_eq!(piece("\\#"), Ok(("", Piece::Text("#".into()))));
        assert_eq!(piece("$0"), Ok(("0", Piece::Text("$".into()))));
        assert!(piece("0").is_err());
    }
}
