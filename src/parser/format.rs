// Grammar for value-format strings
//
// format  := section (';' section)?
// section := "General" | piece* number? piece*
// number  := [#0,]* ('.' [#0]*)?

use super::ast::{DigitPattern, FormatPattern, NumberSpec, Section};
use super::lexer::{piece, Piece};
use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while},
    character::complete::char,
    combinator::{all_consuming, map, opt, peek},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{preceded, terminated},
    IResult,
};

/// Parse a complete format string
pub fn parse_format(input: &str) -> Result<FormatPattern, String> {
    all_consuming(format_pattern)(input)
        .map(|(_, pattern)| pattern)
        .map_err(|e| format!("invalid format string '{}': {:?}", input, e))
}

fn format_pattern(input: &str) -> IResult<&str, FormatPattern> {
    let (input, positive) = section(input)?;
    let (input, negative) = opt(preceded(char(';'), section))(input)?;
    Ok((input, FormatPattern { positive, negative }))
}

fn section(input: &str) -> IResult<&str, Section> {
    alt((general_section, digit_section))(input)
}

fn general_section(input: &str) -> IResult<&str, Section> {
    map(
        terminated(tag_no_case("general"), peek(section_end)),
        |_| Section {
            prefix: String::new(),
            number: NumberSpec::General,
            suffix: String::new(),
            percent: false,
        },
    )(input)
}

fn section_end(input: &str) -> IResult<&str, ()> {
    if input.is_empty() || input.starts_with(';') {
        Ok((input, ()))
    } else {
        Err(nom::Err::Error(Error::new(input, ErrorKind::Eof)))
    }
}

fn digit_section(input: &str) -> IResult<&str, Section> {
    let (input, before) = many0(piece)(input)?;
    let (input, digits) = opt(digit_pattern)(input)?;
    let (input, after) = many0(piece)(input)?;

    let percent = before.iter().chain(after.iter()).any(|p| *p == Piece::Percent);
    let number = digits.map_or(NumberSpec::Literal, NumberSpec::Digits);

    Ok((
        input,
        Section {
            prefix: join_text(&before),
            number,
            suffix: join_text(&after),
            percent,
        },
    ))
}

fn join_text(pieces: &[Piece]) -> String {
    pieces
        .iter()
        .map(|p| match p {
            Piece::Text(t) => t.as_str(),
            Piece::Percent => "%",
        })
        .collect()
}

fn digit_pattern(input: &str) -> IResult<&str, DigitPattern> {
    let (rest, int) = take_while(|c: char| c == '#' || c == '0' || c == ',')(input)?;
    let (rest, frac) = opt(preceded(char('.'), take_while(|c: char| c == '#' || c == '0')))(rest)?;

    if int.is_empty() && frac.is_none() {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::Digit)));
    }

    let frac = frac.unwrap_or("");
    Ok((
        rest,
        DigitPattern {
            min_integer_digits: int.chars().filter(|c| *c == '0').count(),
            grouping: int.contains(','),
            min_fraction_digits: frac.chars().filter(|c| *c == '0').count(),
            max_fraction_digits: frac.len(),
        },
    ))
}
