//! Recursive descent parser for filter expressions.

use chrono::NaiveDate;
use strsim::levenshtein;

use super::ast::{
    AmountMatch, DateBound, DateMatch, EntryType, FieldKey, FieldMatch, Filter, TextMatch,
};
use super::compose::fallback;
use super::error::{FilterError, FilterResult};
use super::lexer::{FilterToken, Lexer, PositionedToken};

/// Maximum Levenshtein distance to suggest a known field for an unknown key.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Parser for ledger filter expressions.
///
/// # Grammar
///
/// ```text
/// expression ::= or_expr
/// or_expr    ::= and_expr ("OR" and_expr)*
/// and_expr   ::= unary_expr ("AND"? unary_expr)*
/// unary_expr ::= "NOT" unary_expr | primary
/// primary    ::= "(" expression ")" | field ":" value | word | quoted
/// value      ::= operand | operand ".." operand
/// operand    ::= word | quoted
/// ```
///
/// Two words with no operator between them are ANDed. Keywords are matched
/// case-insensitively.
///
/// # Operator Precedence (highest to lowest)
///
/// 1. `NOT` - unary
/// 2. `AND` - binary, left-associative
/// 3. `OR` - binary, left-associative
///
/// # Modes
///
/// [`FilterParser::parse`] is lenient: it always produces a filter, skipping
/// dangling operators and stray parentheses, and falling back to free text
/// when nothing else works. [`FilterParser::parse_strict`] rejects those
/// inputs and additionally refuses AND and OR mixed at one level without
/// parentheses, so stored expressions never depend on precedence rules.
///
/// # Example
///
/// ```
/// use ledger_filter::filter::{Filter, FilterError, FilterParser};
///
/// let filter = FilterParser::parse_strict("cat:Food OR tag:groceries").unwrap();
/// assert!(matches!(filter, Filter::Or(_, _)));
///
/// let err = FilterParser::parse_strict("cat:Food OR cat:Transport AND amt:>50").unwrap_err();
/// assert!(matches!(err, FilterError::GroupingRequired { .. }));
///
/// // Lenient parsing never fails.
/// let parsed = FilterParser::parse("cat:Food AND (");
/// assert_eq!(parsed.filter.to_string(), "cat:Food");
/// ```
pub struct FilterParser<'a> {
    input: &'a str,
    tokens: Vec<PositionedToken>,
    position: usize,
    mode: Mode,
    /// Number of currently open parentheses.
    depth: usize,
    diagnostics: Vec<FilterError>,
}

/// Outcome of a lenient parse: always a usable filter, plus anything worth
/// telling the user about.
#[derive(Debug, Clone, PartialEq)]
pub struct LenientParse {
    /// The parsed (or degraded) filter.
    pub filter: Filter,
    /// Problems found while parsing. Empty for a clean parse.
    pub diagnostics: Vec<FilterError>,
}

impl LenientParse {
    /// Returns true if the input parsed without any diagnostics.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Lenient,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    And,
    Or,
}

/// Parse tree that still remembers explicit parentheses and source spans.
///
/// Grouping validation runs on this tree; it is lowered to a [`Filter`]
/// afterwards.
#[derive(Debug)]
enum Syntax {
    Binary {
        op: Operator,
        left: Box<Syntax>,
        right: Box<Syntax>,
    },
    Not {
        inner: Box<Syntax>,
        start: usize,
    },
    Group {
        inner: Box<Syntax>,
        start: usize,
        end: usize,
    },
    Leaf {
        filter: Filter,
        start: usize,
        end: usize,
    },
}

impl Syntax {
    fn start(&self) -> usize {
        match self {
            Syntax::Binary { left, .. } => left.start(),
            Syntax::Not { start, .. } | Syntax::Group { start, .. } | Syntax::Leaf { start, .. } => {
                *start
            }
        }
    }

    fn end(&self) -> usize {
        match self {
            Syntax::Binary { right, .. } => right.end(),
            Syntax::Not { inner, .. } => inner.end(),
            Syntax::Group { end, .. } | Syntax::Leaf { end, .. } => *end,
        }
    }

    /// The binary operator at the root, if any. Parenthesized nodes have none.
    fn operator(&self) -> Option<Operator> {
        match self {
            Syntax::Binary { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Collects the operands of an ungrouped chain of `op`.
    ///
    /// For `a OR b OR c AND d` and `Operator::Or` this yields `a`, `b` and
    /// `c AND d`.
    fn chain_operands<'s>(&'s self, op: Operator, out: &mut Vec<&'s Syntax>) {
        match self {
            Syntax::Binary {
                op: node_op,
                left,
                right,
            } if *node_op == op => {
                left.chain_operands(op, out);
                right.chain_operands(op, out);
            }
            _ => out.push(self),
        }
    }

    fn lower(self) -> Filter {
        match self {
            Syntax::Binary { op, left, right } => match op {
                Operator::And => Filter::and(left.lower(), right.lower()),
                Operator::Or => Filter::or(left.lower(), right.lower()),
            },
            Syntax::Not { inner, .. } => Filter::negate(inner.lower()),
            Syntax::Group { inner, .. } => inner.lower(),
            Syntax::Leaf { filter, .. } => filter,
        }
    }
}

/// Combines two optional operands. Lenient parsing yields `None` for pieces
/// that contributed nothing (a dangling operator, an empty group).
fn join(op: Operator, left: Option<Syntax>, right: Option<Syntax>) -> Option<Syntax> {
    match (left, right) {
        (Some(left), Some(right)) => Some(Syntax::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

impl<'a> FilterParser<'a> {
    fn new(input: &'a str, mode: Mode) -> Self {
        Self {
            input,
            tokens: Lexer::new(input).tokenize(),
            position: 0,
            mode,
            depth: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Parses a filter expression leniently.
    ///
    /// Never fails. Operators with nothing to operate on are ignored, a
    /// missing `)` is assumed at the end of input, stray `)` are skipped, and
    /// an empty expression yields a filter that matches everything. If the
    /// input still cannot be parsed (an inverted range), the whole text is
    /// treated as free text and the error is reported in
    /// [`LenientParse::diagnostics`].
    pub fn parse(input: &'a str) -> LenientParse {
        let mut parser = Self::new(input, Mode::Lenient);
        match parser.parse_lenient() {
            Ok(filter) => LenientParse {
                filter,
                diagnostics: parser.diagnostics,
            },
            Err(err) => {
                tracing::debug!(input, error = %err, "lenient parse degraded to free text");
                let mut diagnostics = parser.diagnostics;
                diagnostics.push(err);
                LenientParse {
                    filter: fallback(input),
                    diagnostics,
                }
            }
        }
    }

    /// Parses a filter expression strictly.
    ///
    /// Use this for anything that is stored: the result prints back to text
    /// that reparses to the same filter.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::EmptyExpression` if the input has no tokens.
    ///
    /// Returns `FilterError::GroupingRequired` if AND and OR are mixed at the
    /// same level without parentheses.
    ///
    /// Returns `FilterError::MalformedRange` if a range has its bounds
    /// reversed.
    ///
    /// Returns `FilterError::UnterminatedGroup` if parentheses do not balance.
    ///
    /// Returns `FilterError::UnexpectedToken` or
    /// `FilterError::UnexpectedEndOfInput` for a misplaced or missing operand.
    pub fn parse_strict(input: &'a str) -> FilterResult<Filter> {
        let mut parser = Self::new(input, Mode::Strict);
        let result = parser.parse_checked();
        if let Err(err) = &result {
            tracing::debug!(input, error = %err, "strict parse rejected expression");
        }
        result
    }

    fn parse_lenient(&mut self) -> FilterResult<Filter> {
        let mut result = None;
        loop {
            let part = self.parse_or_expr()?;
            result = join(Operator::And, result, part);
            // Whatever stopped the expression (a stray ')') is skipped.
            if self.advance().is_none() {
                break;
            }
        }
        Ok(result.map(Syntax::lower).unwrap_or_else(|| Filter::free_text("")))
    }

    fn parse_checked(&mut self) -> FilterResult<Filter> {
        if self.tokens.is_empty() {
            return Err(FilterError::EmptyExpression);
        }

        let syntax = self
            .parse_or_expr()?
            .ok_or(FilterError::UnexpectedEndOfInput)?;

        // Check that we consumed all tokens
        if let Some(remaining) = self.tokens.get(self.position) {
            return Err(match remaining.token {
                FilterToken::CloseParen => FilterError::UnterminatedGroup {
                    position: remaining.position,
                },
                ref other => FilterError::unexpected_token(other.describe()),
            });
        }

        self.check_grouping(&syntax)?;
        Ok(syntax.lower())
    }

    /// Rejects any ungrouped run of one operator that contains the other.
    fn check_grouping(&self, node: &Syntax) -> FilterResult<()> {
        match node {
            Syntax::Binary { op, .. } => {
                let mut operands = Vec::new();
                node.chain_operands(*op, &mut operands);
                if operands.iter().any(|operand| operand.operator().is_some()) {
                    let fragment = self.input[node.start()..node.end()].trim();
                    return Err(FilterError::grouping_required(fragment));
                }
                operands
                    .into_iter()
                    .try_for_each(|operand| self.check_grouping(operand))
            }
            Syntax::Not { inner, .. } | Syntax::Group { inner, .. } => self.check_grouping(inner),
            Syntax::Leaf { .. } => Ok(()),
        }
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&FilterToken> {
        self.tokens.get(self.position).map(|pt| &pt.token)
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> Option<PositionedToken> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Checks if the current token matches the expected token type.
    fn check(&self, expected: &FilterToken) -> bool {
        self.peek() == Some(expected)
    }

    /// Returns the current token if it starts exactly at `offset`.
    fn adjacent(&self, offset: usize) -> Option<&PositionedToken> {
        self.tokens
            .get(self.position)
            .filter(|pt| pt.position == offset)
    }

    /// Returns true if the current token can begin an operand, which makes it
    /// an implicit AND.
    fn starts_operand(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                FilterToken::Word(_)
                    | FilterToken::Quoted(_)
                    | FilterToken::OpenParen
                    | FilterToken::Not
                    | FilterToken::Colon
                    | FilterToken::RangeDots
            )
        )
    }

    /// Parses OR expressions: `and_expr ("OR" and_expr)*`
    fn parse_or_expr(&mut self) -> FilterResult<Option<Syntax>> {
        let mut left = self.parse_and_expr()?;

        while self.check(&FilterToken::Or) {
            self.advance(); // consume OR
            let right = self.parse_and_expr()?;
            left = join(Operator::Or, left, right);
        }

        Ok(left)
    }

    /// Parses AND expressions: `unary_expr ("AND"? unary_expr)*`
    fn parse_and_expr(&mut self) -> FilterResult<Option<Syntax>> {
        let mut left = self.parse_unary_expr()?;

        loop {
            if self.check(&FilterToken::And) {
                self.advance(); // consume AND
            } else if !self.starts_operand() {
                break;
            }
            let right = self.parse_unary_expr()?;
            left = join(Operator::And, left, right);
        }

        Ok(left)
    }

    /// Parses unary expressions: `"NOT" unary_expr | primary`
    fn parse_unary_expr(&mut self) -> FilterResult<Option<Syntax>> {
        if self.check(&FilterToken::Not) {
            let not = self.advance().ok_or(FilterError::UnexpectedEndOfInput)?;
            let inner = self.parse_unary_expr()?;
            return Ok(inner.map(|inner| Syntax::Not {
                inner: Box::new(inner),
                start: not.position,
            }));
        }

        self.parse_primary()
    }

    /// Parses primary expressions: group, field predicate or free text.
    fn parse_primary(&mut self) -> FilterResult<Option<Syntax>> {
        let Some(current) = self.tokens.get(self.position).cloned() else {
            return match self.mode {
                Mode::Lenient => Ok(None),
                Mode::Strict => Err(FilterError::UnexpectedEndOfInput),
            };
        };

        match current.token {
            FilterToken::OpenParen => self.parse_group(),

            FilterToken::Word(word) => {
                let token = self.advance().ok_or(FilterError::UnexpectedEndOfInput)?;
                if matches!(self.adjacent(token.end).map(|pt| &pt.token), Some(FilterToken::Colon)) {
                    return self.parse_field(word, token.position).map(Some);
                }
                Ok(Some(Syntax::Leaf {
                    filter: Filter::free_text(word),
                    start: token.position,
                    end: token.end,
                }))
            }

            FilterToken::Quoted(text) => {
                let token = self.advance().ok_or(FilterError::UnexpectedEndOfInput)?;
                Ok(Some(Syntax::Leaf {
                    filter: Filter::free_text(text),
                    start: token.position,
                    end: token.end,
                }))
            }

            // A lone ':' or '..' is just text
            FilterToken::Colon | FilterToken::RangeDots => {
                let token = self.advance().ok_or(FilterError::UnexpectedEndOfInput)?;
                Ok(Some(Syntax::Leaf {
                    filter: Filter::free_text(token.token.describe()),
                    start: token.position,
                    end: token.end,
                }))
            }

            FilterToken::CloseParen => match self.mode {
                Mode::Lenient => Ok(None),
                Mode::Strict if self.depth == 0 => Err(FilterError::UnterminatedGroup {
                    position: current.position,
                }),
                Mode::Strict => Err(FilterError::unexpected_token(")")),
            },

            FilterToken::And | FilterToken::Or | FilterToken::Not => match self.mode {
                Mode::Lenient => Ok(None),
                Mode::Strict => Err(FilterError::unexpected_token(current.token.describe())),
            },
        }
    }

    /// Parses `"(" expression ")"`.
    fn parse_group(&mut self) -> FilterResult<Option<Syntax>> {
        let open = self.advance().ok_or(FilterError::UnexpectedEndOfInput)?;

        self.depth += 1;
        let inner = self.parse_or_expr();
        self.depth -= 1;
        let inner = inner?;

        let end = if self.check(&FilterToken::CloseParen) {
            self.advance().map(|close| close.end).unwrap_or(self.input.len())
        } else {
            match self.mode {
                // Closed implicitly at end of input.
                Mode::Lenient => self.input.len(),
                Mode::Strict => {
                    return Err(FilterError::UnterminatedGroup {
                        position: open.position,
                    })
                }
            }
        };

        Ok(inner.map(|inner| Syntax::Group {
            inner: Box::new(inner),
            start: open.position,
            end,
        }))
    }

    /// Parses the value of a `key:value` clause. The current token is the
    /// colon directly after `key`.
    fn parse_field(&mut self, key: String, start: usize) -> FilterResult<Syntax> {
        let colon = self.advance().ok_or(FilterError::UnexpectedEndOfInput)?;

        // The value is every token glued to the colon with no whitespace.
        let mut pieces = Vec::new();
        let mut end = colon.end;
        while let Some(pt) = self.adjacent(end) {
            if !matches!(
                pt.token,
                FilterToken::Word(_) | FilterToken::Quoted(_) | FilterToken::RangeDots
            ) {
                break;
            }
            end = pt.end;
            pieces.push(pt.token.clone());
            self.position += 1;
        }

        let value = FieldValue::new(pieces);
        let raw = format!("{key}:{}", value.raw);

        let filter = match FieldKey::from_name(&key) {
            Some(field) => match build_field_match(field, &value)? {
                Some(matcher) => Filter::Field(matcher),
                None => {
                    tracing::trace!(clause = %raw, "invalid field value, treating as text");
                    Filter::free_text(raw)
                }
            },
            None => {
                self.diagnostics
                    .push(FilterError::unknown_field(&key, suggest_field(&key)));
                Filter::free_text(raw)
            }
        };

        Ok(Syntax::Leaf { filter, start, end })
    }
}

/// The value part of a `key:value` clause, split on `..`.
struct FieldValue {
    /// The value as written, quotes removed.
    raw: String,
    /// Operands between `..` separators.
    operands: Vec<String>,
}

impl FieldValue {
    fn new(pieces: Vec<FilterToken>) -> Self {
        let mut raw = String::new();
        let mut operands = vec![String::new()];
        for piece in pieces {
            match piece {
                FilterToken::RangeDots => {
                    raw.push_str("..");
                    operands.push(String::new());
                }
                FilterToken::Word(text) | FilterToken::Quoted(text) => {
                    raw.push_str(&text);
                    if let Some(last) = operands.last_mut() {
                        last.push_str(&text);
                    }
                }
                _ => {}
            }
        }
        Self { raw, operands }
    }

    /// The single operand, if the value is not a range.
    fn single(&self) -> Option<&str> {
        match self.operands.as_slice() {
            [only] if !only.is_empty() => Some(only),
            _ => None,
        }
    }

    /// The two bounds, if the value is a well-formed `lo..hi` range.
    fn range(&self) -> Option<(&str, &str)> {
        match self.operands.as_slice() {
            [lo, hi] if !lo.is_empty() && !hi.is_empty() => Some((lo, hi)),
            _ => None,
        }
    }
}

/// Resolves a field value into a matcher.
///
/// Returns `Ok(None)` when the value is not valid for the field, in which case
/// the clause is treated as free text. Reversed ranges are a hard error.
fn build_field_match(field: FieldKey, value: &FieldValue) -> FilterResult<Option<FieldMatch>> {
    // A text field needs something to look for.
    let text = || (!value.raw.is_empty()).then(|| TextMatch::new(value.raw.as_str()));
    let matcher = match field {
        FieldKey::Description => text().map(FieldMatch::Description),
        FieldKey::Category => text().map(FieldMatch::Category),
        FieldKey::Account => text().map(FieldMatch::Account),
        FieldKey::Note => text().map(FieldMatch::Note),
        FieldKey::Tag => text().map(FieldMatch::Tag),
        FieldKey::Type => value
            .single()
            .and_then(EntryType::from_name)
            .map(FieldMatch::Type),
        FieldKey::Amount => build_amount_match(value)?.map(FieldMatch::Amount),
        FieldKey::Date => build_date_match(value)?.map(FieldMatch::Date),
    };
    Ok(matcher)
}

fn build_amount_match(value: &FieldValue) -> FilterResult<Option<AmountMatch>> {
    if let Some((lo, hi)) = value.range() {
        let (Some(lo), Some(hi)) = (parse_amount(lo), parse_amount(hi)) else {
            return Ok(None);
        };
        if lo > hi {
            return Err(FilterError::malformed_range(value.raw.as_str()));
        }
        return Ok(Some(AmountMatch::Between(lo, hi)));
    }

    let Some(single) = value.single() else {
        return Ok(None);
    };
    let matcher = if let Some(rest) = single.strip_prefix('<') {
        parse_amount(rest).map(AmountMatch::LessThan)
    } else if let Some(rest) = single.strip_prefix('>') {
        parse_amount(rest).map(AmountMatch::GreaterThan)
    } else {
        parse_amount(single).map(AmountMatch::Exact)
    };
    Ok(matcher)
}

fn build_date_match(value: &FieldValue) -> FilterResult<Option<DateMatch>> {
    if let Some((lo, hi)) = value.range() {
        let (Some(lo), Some(hi)) = (parse_date_bound(lo), parse_date_bound(hi)) else {
            return Ok(None);
        };
        return DateMatch::between(lo, hi)
            .map(Some)
            .ok_or_else(|| FilterError::malformed_range(value.raw.as_str()));
    }

    Ok(value.single().and_then(parse_date_bound).map(DateMatch::on))
}

/// Parses a signed amount, tolerating a currency sign and thousands separators.
fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

/// Parses `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
fn parse_date_bound(text: &str) -> Option<DateBound> {
    let bytes = text.as_bytes();
    let digits_at = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);

    match bytes.len() {
        4 if digits_at(0..4) => text.parse::<i32>().ok().map(DateBound::Year),
        7 if digits_at(0..4) && bytes[4] == b'-' && digits_at(5..7) => {
            let year = text[..4].parse::<i32>().ok()?;
            let month = text[5..7]
                .parse::<u32>()
                .ok()
                .filter(|m| (1..=12).contains(m))?;
            Some(DateBound::Month { year, month })
        }
        10 if digits_at(0..4)
            && bytes[4] == b'-'
            && digits_at(5..7)
            && bytes[7] == b'-'
            && digits_at(8..10) =>
        {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(DateBound::Day)
        }
        _ => None,
    }
}

/// Finds the closest known field key for a misspelled one.
fn suggest_field(key: &str) -> Option<String> {
    let key_lower = key.to_lowercase();

    let (best_match, best_distance) = FieldKey::ALL
        .iter()
        .flat_map(|field| field.aliases().iter())
        .map(|alias| (*alias, levenshtein(&key_lower, alias)))
        .min_by_key(|(_, d)| *d)?;

    if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match.to_string())
    } else {
        None
    }
}
