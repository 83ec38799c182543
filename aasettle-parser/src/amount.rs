use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{char, digit1},
    combinator::{all_consuming, opt, recognize},
};

/// A token that reads as a money amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountToken<'a> {
    /// Plain decimal literal with currency marks stripped, e.g. `-12.5`.
    pub literal: &'a str,
    /// Whether the token carried `¥`/`元`-style marks.
    pub marked: bool,
}

fn currency_prefix(input: &str) -> IResult<&str, &str> {
    alt((tag("¥"), tag("￥"))).parse(input)
}

fn currency_suffix(input: &str) -> IResult<&str, &str> {
    alt((
        tag("元"),
        tag("块"),
        tag_no_case("rmb"),
        tag_no_case("cny"),
    ))
    .parse(input)
}

fn decimal_literal(input: &str) -> IResult<&str, &str> {
    recognize((opt(char('-')), digit1, opt((char('.'), digit1)))).parse(input)
}

fn amount(input: &str) -> IResult<&str, AmountToken<'_>> {
    (
        opt(currency_prefix),
        opt(char('+')),
        decimal_literal,
        opt(currency_suffix),
    )
        .map(|(prefix, _, literal, suffix)| AmountToken {
            literal,
            marked: prefix.is_some() || suffix.is_some(),
        })
        .parse(input)
}

/// Recognizes a whole token as an amount; partial matches such as `2人` do not count.
pub fn amount_token(token: &str) -> Option<AmountToken<'_>> {
    all_consuming(amount)
        .parse(token)
        .ok()
        .map(|(_, amount)| amount)
}
