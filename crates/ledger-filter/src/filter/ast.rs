//! Abstract Syntax Tree (AST) for filter expressions.

use chrono::{Datelike, NaiveDate};

/// Represents a parsed filter expression.
///
/// The `Filter` enum is the AST for ledger filter expressions. Trees are
/// immutable once built; combinators such as [`Filter::and`] always return a
/// new tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Logical AND of two filters.
    And(Box<Filter>, Box<Filter>),

    /// Logical OR of two filters.
    Or(Box<Filter>, Box<Filter>),

    /// Logical NOT of a filter.
    Not(Box<Filter>),

    /// A `field:value` predicate.
    Field(FieldMatch),

    /// An unscoped term searched in description, category and date.
    FreeText(TextMatch),
}

impl Filter {
    /// Creates an AND filter from two filters.
    ///
    /// # Example
    ///
    /// ```
    /// use ledger_filter::filter::{Filter, TextMatch};
    ///
    /// let filter = Filter::and(
    ///     Filter::FreeText(TextMatch::new("coffee")),
    ///     Filter::FreeText(TextMatch::new("shop")),
    /// );
    /// assert!(matches!(filter, Filter::And(_, _)));
    /// ```
    pub fn and(left: Filter, right: Filter) -> Self {
        Filter::And(Box::new(left), Box::new(right))
    }

    /// Creates an OR filter from two filters.
    pub fn or(left: Filter, right: Filter) -> Self {
        Filter::Or(Box::new(left), Box::new(right))
    }

    /// Creates a NOT filter from another filter.
    pub fn negate(inner: Filter) -> Self {
        Filter::Not(Box::new(inner))
    }

    /// Creates a free-text filter.
    pub fn free_text(term: impl Into<String>) -> Self {
        Filter::FreeText(TextMatch::new(term))
    }

    /// Returns true if any `field:value` predicate appears in the tree.
    pub fn has_field_predicate(&self) -> bool {
        match self {
            Filter::And(left, right) | Filter::Or(left, right) => {
                left.has_field_predicate() || right.has_field_predicate()
            }
            Filter::Not(inner) => inner.has_field_predicate(),
            Filter::Field(_) => true,
            Filter::FreeText(_) => false,
        }
    }
}

/// A case-insensitive substring needle.
///
/// Keeps the text as written (for printing) alongside its folded form (for
/// matching), so nothing is re-derived per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    text: String,
    folded: String,
}

impl TextMatch {
    /// Creates a needle from the given text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let folded = text.to_lowercase();
        Self { text, folded }
    }

    /// The needle as written.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true if `haystack` contains the needle, ignoring case.
    pub fn is_match(&self, haystack: &str) -> bool {
        if self.folded.is_empty() {
            return true;
        }
        haystack.to_lowercase().contains(&self.folded)
    }
}

/// A predicate on one record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldMatch {
    /// `desc:` - description contains text.
    Description(TextMatch),

    /// `cat:` - category name contains text.
    Category(TextMatch),

    /// `acc:` - account name contains text.
    Account(TextMatch),

    /// `note:` - notes contain text.
    Note(TextMatch),

    /// `tag:` - any tag contains text.
    Tag(TextMatch),

    /// `type:` - debit or credit.
    Type(EntryType),

    /// `amt:` - numeric comparison on the signed amount.
    Amount(AmountMatch),

    /// `date:` - day, month, year or range.
    Date(DateMatch),
}

impl FieldMatch {
    /// The canonical key this predicate prints with.
    pub fn key(&self) -> FieldKey {
        match self {
            FieldMatch::Description(_) => FieldKey::Description,
            FieldMatch::Category(_) => FieldKey::Category,
            FieldMatch::Account(_) => FieldKey::Account,
            FieldMatch::Note(_) => FieldKey::Note,
            FieldMatch::Tag(_) => FieldKey::Tag,
            FieldMatch::Type(_) => FieldKey::Type,
            FieldMatch::Amount(_) => FieldKey::Amount,
            FieldMatch::Date(_) => FieldKey::Date,
        }
    }
}

/// The field keys understood in `key:value` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Description,
    Category,
    Account,
    Note,
    Tag,
    Type,
    Amount,
    Date,
}

impl FieldKey {
    /// Every key, in canonical order.
    pub const ALL: [FieldKey; 8] = [
        FieldKey::Description,
        FieldKey::Category,
        FieldKey::Account,
        FieldKey::Note,
        FieldKey::Tag,
        FieldKey::Type,
        FieldKey::Amount,
        FieldKey::Date,
    ];

    /// Looks up a key by name or alias, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "desc" | "description" => Some(FieldKey::Description),
            "cat" | "category" => Some(FieldKey::Category),
            "acc" | "account" => Some(FieldKey::Account),
            "note" | "notes" => Some(FieldKey::Note),
            "tag" | "tags" | "label" | "labels" => Some(FieldKey::Tag),
            "type" => Some(FieldKey::Type),
            "amt" | "amount" => Some(FieldKey::Amount),
            "date" => Some(FieldKey::Date),
            _ => None,
        }
    }

    /// The canonical (printed) name.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::Description => "desc",
            FieldKey::Category => "cat",
            FieldKey::Account => "acc",
            FieldKey::Note => "note",
            FieldKey::Tag => "tag",
            FieldKey::Type => "type",
            FieldKey::Amount => "amt",
            FieldKey::Date => "date",
        }
    }

    /// Every accepted spelling of this key.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            FieldKey::Description => &["desc", "description"],
            FieldKey::Category => &["cat", "category"],
            FieldKey::Account => &["acc", "account"],
            FieldKey::Note => &["note", "notes"],
            FieldKey::Tag => &["tag", "tags", "label", "labels"],
            FieldKey::Type => &["type"],
            FieldKey::Amount => &["amt", "amount"],
            FieldKey::Date => &["date"],
        }
    }
}

/// Debit or credit, derived from the sign of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// Money out (amount < 0).
    Debit,
    /// Money in (amount >= 0).
    Credit,
}

impl EntryType {
    /// Parses `debit` or `credit`, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "debit" => Some(EntryType::Debit),
            "credit" => Some(EntryType::Credit),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Debit => "debit",
            EntryType::Credit => "credit",
        }
    }
}

/// A numeric test on the signed amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountMatch {
    /// Equal within half a cent.
    Exact(f64),
    /// Strictly less than.
    LessThan(f64),
    /// Strictly greater than.
    GreaterThan(f64),
    /// Inclusive range, `lo <= amount <= hi`.
    Between(f64, f64),
}

/// One end of a date predicate, at day, month or year precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
}

impl DateBound {
    /// The earliest ISO day covered by this bound.
    pub fn first_day(&self) -> String {
        match self {
            DateBound::Day(date) => date.format("%Y-%m-%d").to_string(),
            DateBound::Month { year, month } => format!("{year:04}-{month:02}-01"),
            DateBound::Year(year) => format!("{year:04}-01-01"),
        }
    }

    /// The latest ISO day covered by this bound.
    ///
    /// Months end on `-31` regardless of length; the key is only ever used as
    /// an inclusive lexicographic upper bound.
    pub fn last_day(&self) -> String {
        match self {
            DateBound::Day(date) => date.format("%Y-%m-%d").to_string(),
            DateBound::Month { year, month } => format!("{year:04}-{month:02}-31"),
            DateBound::Year(year) => format!("{year:04}-12-31"),
        }
    }
}

impl std::fmt::Display for DateBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateBound::Day(date) => write!(f, "{:04}-{:02}-{:02}", date.year(), date.month(), date.day()),
            DateBound::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            DateBound::Year(year) => write!(f, "{year:04}"),
        }
    }
}

/// A date predicate: a single bound or an inclusive range of bounds.
///
/// The lexicographic comparison keys are computed once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    start: DateBound,
    end: Option<DateBound>,
    lower: String,
    upper: String,
}

impl DateMatch {
    /// Matches every day covered by `bound`.
    pub fn on(bound: DateBound) -> Self {
        Self {
            lower: bound.first_day(),
            upper: bound.last_day(),
            start: bound,
            end: None,
        }
    }

    /// Matches every day from the start of `start` to the end of `end`.
    ///
    /// Returns `None` if the range is empty (`start` begins after `end`
    /// finishes).
    pub fn between(start: DateBound, end: DateBound) -> Option<Self> {
        let lower = start.first_day();
        let upper = end.last_day();
        if lower > upper {
            return None;
        }
        Some(Self {
            start,
            end: Some(end),
            lower,
            upper,
        })
    }

    pub fn start(&self) -> DateBound {
        self.start
    }

    pub fn end(&self) -> Option<DateBound> {
        self.end
    }

    /// Returns true if the ISO date falls inside this predicate.
    pub fn contains(&self, date: &str) -> bool {
        let day = date.get(..10).unwrap_or(date);
        self.lower.as_str() <= day && day <= self.upper.as_str()
    }
}
