//! Single-value format classification.
//!
//! Classification runs through an ordered table of detectors, one per
//! [`FormatCategory`]; the first detector that recognizes the value wins.
//! Each detector also produces a category-specific sub-format tag, a
//! structured record that renders to a fixed-order `|`-delimited string at
//! the reporting boundary.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    // scheme://host[/path] or bare host.tld
    Regex::new(
        r"(?i)^(?:https?://)?(?:www\.)?[a-zA-Z0-9][a-zA-Z0-9\-]*(?:\.[a-zA-Z0-9\-]+)*\.[a-zA-Z]{2,}(?:/[\w\-.~%!*'();:@&=+$,/?#]*)?$",
    )
    .unwrap()
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    // optional country code, area code, 7-digit main number, optional extension
    Regex::new(
        r"(?i)^(?:\+?\d{1,3})?[-.\s(]*\d{3}[-.\s)]*\d{3}[-.\s]?\d{4}(?:\s*(?:\#|x|ext\.?)\s*\d+)?$",
    )
    .unwrap()
});

/// Significant-digit bounds for the phone heuristic. Stands in for a full
/// phone-number library; anything outside this range is not a dialable
/// number regardless of punctuation.
const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

/// Semantic format category of a single value.
///
/// Declaration order is the classification priority order: more specific
/// categories are tested first, and ties between categories during column
/// profiling break toward the earlier variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FormatCategory {
    /// One of a fixed set of boolean literals (true/false, yes/no, ...).
    Boolean,
    /// local@domain address.
    Email,
    /// Web address, with or without scheme.
    Url,
    /// Dialable phone number.
    Phone,
    /// Calendar date, optionally with a time suffix.
    Date,
    /// Whole number, optionally with thousands separators.
    Integer,
    /// Decimal or exponential number.
    Float,
    /// Fallback for anything else.
    Text,
}

impl FormatCategory {
    /// All categories in priority order.
    pub const ALL: [FormatCategory; 8] = [
        FormatCategory::Boolean,
        FormatCategory::Email,
        FormatCategory::Url,
        FormatCategory::Phone,
        FormatCategory::Date,
        FormatCategory::Integer,
        FormatCategory::Float,
        FormatCategory::Text,
    ];

    /// Short name for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatCategory::Boolean => "boolean",
            FormatCategory::Email => "email",
            FormatCategory::Url => "url",
            FormatCategory::Phone => "phone",
            FormatCategory::Date => "date",
            FormatCategory::Integer => "integer",
            FormatCategory::Float => "float",
            FormatCategory::Text => "string",
        }
    }
}

impl fmt::Display for FormatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which boolean literal family a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanStyle {
    TrueFalse,
    YesNo,
    OneZero,
    YN,
    TF,
}

impl BooleanStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanStyle::TrueFalse => "true_false",
            BooleanStyle::YesNo => "yes_no",
            BooleanStyle::OneZero => "1_0",
            BooleanStyle::YN => "y_n",
            BooleanStyle::TF => "t_f",
        }
    }
}

/// Letter-case family of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStyle {
    Lower,
    Upper,
    Mixed,
}

impl CaseStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStyle::Lower => "lower",
            CaseStyle::Upper => "upper",
            CaseStyle::Mixed => "mixed",
        }
    }

    fn of(value: &str) -> Self {
        let letters: Vec<char> = value.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.iter().all(|c| c.is_lowercase()) {
            CaseStyle::Lower
        } else if letters.iter().all(|c| c.is_uppercase()) {
            CaseStyle::Upper
        } else {
            CaseStyle::Mixed
        }
    }
}

/// Sub-format tag for email addresses: case family plus domain structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailTag {
    pub case: CaseStyle,
    pub domain_dots: usize,
}

/// URL scheme, when one is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlScheme {
    Http,
    Https,
}

impl UrlScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlScheme::Http => "http",
            UrlScheme::Https => "https",
        }
    }
}

/// Sub-format tag for URLs: three independent flags composed in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UrlTag {
    pub scheme: Option<UrlScheme>,
    pub www: bool,
    pub path: bool,
}

/// How a phone number expresses its country code, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountryCodeStyle {
    /// Leading `+`.
    Plus,
    /// Leading international `00` prefix.
    IntlPrefix,
    /// No country code.
    Domestic,
}

impl CountryCodeStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountryCodeStyle::Plus => "country_code",
            CountryCodeStyle::IntlPrefix => "intl_prefix",
            CountryCodeStyle::Domestic => "domestic",
        }
    }
}

/// Sub-format tag for phone numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneTag {
    pub country: CountryCodeStyle,
    pub parens: bool,
    pub dash: bool,
    pub dot: bool,
    pub space: bool,
    pub extension: bool,
}

/// Order of the date fields in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFieldOrder {
    Ymd,
    Mdy,
    Dmy,
}

impl DateFieldOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFieldOrder::Ymd => "ymd",
            DateFieldOrder::Mdy => "mdy",
            DateFieldOrder::Dmy => "dmy",
        }
    }
}

/// Separator character of a date layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSeparator {
    Dash,
    Slash,
}

impl DateSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateSeparator::Dash => "dash",
            DateSeparator::Slash => "slash",
        }
    }
}

/// Sub-format tag for dates: field order, separator, time presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateTag {
    pub order: DateFieldOrder,
    pub separator: DateSeparator,
    pub time: bool,
}

/// Thousands-separator style of an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitGrouping {
    Plain,
    Comma,
    Period,
    Space,
}

impl DigitGrouping {
    pub fn as_str(&self) -> &'static str {
        match self {
            DigitGrouping::Plain => "plain",
            DigitGrouping::Comma => "comma_grouped",
            DigitGrouping::Period => "period_grouped",
            DigitGrouping::Space => "space_grouped",
        }
    }
}

/// Sub-format tag for integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntegerTag {
    pub grouping: DigitGrouping,
}

/// Decimal-separator convention of a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalSeparator {
    Period,
    Comma,
    /// No fractional part (exponential notation only).
    None,
}

impl DecimalSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecimalSeparator::Period => "period_decimal",
            DecimalSeparator::Comma => "comma_decimal",
            DecimalSeparator::None => "no_decimal",
        }
    }
}

/// Sub-format tag for floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FloatTag {
    pub decimal: DecimalSeparator,
    pub scientific: bool,
}

/// A category-specific sub-format descriptor.
///
/// The structured fields are the source of truth; [`fmt::Display`] renders
/// the delimited string form for reports. Composition order within each
/// variant is fixed, so identical inputs always render identical tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "fields", rename_all = "snake_case")]
pub enum FormatTag {
    Boolean(BooleanStyle),
    Email(EmailTag),
    Url(UrlTag),
    Phone(PhoneTag),
    Date(DateTag),
    Integer(IntegerTag),
    Float(FloatTag),
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatTag::Boolean(style) => f.write_str(style.as_str()),
            FormatTag::Email(tag) => {
                write!(f, "{}|dots:{}", tag.case.as_str(), tag.domain_dots)
            }
            FormatTag::Url(tag) => {
                match tag.scheme {
                    Some(scheme) => write!(f, "scheme:{}", scheme.as_str())?,
                    None => f.write_str("no_scheme")?,
                }
                f.write_str(if tag.www { "|www" } else { "|no_www" })?;
                f.write_str(if tag.path { "|has_path" } else { "|no_path" })
            }
            FormatTag::Phone(tag) => {
                f.write_str(tag.country.as_str())?;
                f.write_str(if tag.parens { "|area_parens" } else { "|no_parens" })?;
                let mut seps = Vec::new();
                if tag.dash {
                    seps.push("dash");
                }
                if tag.dot {
                    seps.push("dot");
                }
                if tag.space {
                    seps.push("space");
                }
                if seps.is_empty() {
                    f.write_str("|sep:none")?;
                } else {
                    write!(f, "|sep:{}", seps.join("_"))?;
                }
                f.write_str(if tag.extension { "|has_ext" } else { "|no_ext" })
            }
            FormatTag::Date(tag) => {
                write!(f, "{}|{}", tag.order.as_str(), tag.separator.as_str())?;
                f.write_str(if tag.time { "|has_time" } else { "|date_only" })
            }
            FormatTag::Integer(tag) => f.write_str(tag.grouping.as_str()),
            FormatTag::Float(tag) => {
                f.write_str(tag.decimal.as_str())?;
                f.write_str(if tag.scientific { "|scientific" } else { "|standard" })
            }
        }
    }
}

/// Result of classifying a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Classification {
    /// Empty or whitespace-only input. Excluded from format fractions but
    /// counted by population statistics.
    Empty,
    /// A present value with its category and optional sub-format tag.
    Value {
        category: FormatCategory,
        tag: Option<FormatTag>,
    },
}

impl Classification {
    /// The category, if the value was present.
    pub fn category(&self) -> Option<FormatCategory> {
        match self {
            Classification::Empty => None,
            Classification::Value { category, .. } => Some(*category),
        }
    }

    /// The sub-format tag, if any.
    pub fn tag(&self) -> Option<FormatTag> {
        match self {
            Classification::Empty => None,
            Classification::Value { tag, .. } => *tag,
        }
    }

    /// Whether the input was empty/whitespace-only.
    pub fn is_empty(&self) -> bool {
        matches!(self, Classification::Empty)
    }
}

/// A detector recognizes one category and builds its tag.
type Detector = fn(&str) -> Option<FormatTag>;

/// The classification chain: categories in priority order, each paired
/// with its detector. Adding a category means appending an entry.
const DETECTORS: &[(FormatCategory, Detector)] = &[
    (FormatCategory::Boolean, detect_boolean),
    (FormatCategory::Email, detect_email),
    (FormatCategory::Url, detect_url),
    (FormatCategory::Phone, detect_phone),
    (FormatCategory::Date, detect_date),
    (FormatCategory::Integer, detect_integer),
    (FormatCategory::Float, detect_float),
];

/// Classify a single value into a format category and sub-format tag.
///
/// Pure function of its input: no locale, no external state. Unclassifiable
/// values fall back to [`FormatCategory::Text`] with no tag.
pub fn classify(value: &str) -> Classification {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Classification::Empty;
    }

    for (category, detect) in DETECTORS {
        if let Some(tag) = detect(trimmed) {
            return Classification::Value {
                category: *category,
                tag: Some(tag),
            };
        }
    }

    Classification::Value {
        category: FormatCategory::Text,
        tag: None,
    }
}

fn detect_boolean(value: &str) -> Option<FormatTag> {
    let style = match value.to_ascii_lowercase().as_str() {
        "true" | "false" => BooleanStyle::TrueFalse,
        "yes" | "no" => BooleanStyle::YesNo,
        "1" | "0" => BooleanStyle::OneZero,
        "y" | "n" => BooleanStyle::YN,
        "t" | "f" => BooleanStyle::TF,
        _ => return None,
    };
    Some(FormatTag::Boolean(style))
}

fn detect_email(value: &str) -> Option<FormatTag> {
    if !EMAIL_RE.is_match(value) {
        return None;
    }
    let domain_dots = value
        .split_once('@')
        .map(|(_, domain)| domain.matches('.').count())
        .unwrap_or(0);
    Some(FormatTag::Email(EmailTag {
        case: CaseStyle::of(value),
        domain_dots,
    }))
}

fn detect_url(value: &str) -> Option<FormatTag> {
    if !URL_RE.is_match(value) {
        return None;
    }

    let lower = value.to_ascii_lowercase();
    let (scheme, rest) = if let Some(rest) = lower.strip_prefix("https://") {
        (Some(UrlScheme::Https), rest)
    } else if let Some(rest) = lower.strip_prefix("http://") {
        (Some(UrlScheme::Http), rest)
    } else {
        (None, lower.as_str())
    };

    let www = rest.starts_with("www.");
    // A trailing bare slash is not a path.
    let path = rest
        .split_once('/')
        .map(|(_, tail)| !tail.is_empty())
        .unwrap_or(false);

    Some(FormatTag::Url(UrlTag { scheme, www, path }))
}

fn detect_phone(value: &str) -> Option<FormatTag> {
    if !PHONE_RE.is_match(value) {
        return None;
    }

    // Heuristic validation in place of a phone-number library: the
    // punctuation already matched, so gate on significant digit count.
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) {
        return None;
    }

    let country = if value.starts_with('+') {
        CountryCodeStyle::Plus
    } else if value.starts_with("00") {
        CountryCodeStyle::IntlPrefix
    } else {
        CountryCodeStyle::Domestic
    };

    let lower = value.to_ascii_lowercase();
    Some(FormatTag::Phone(PhoneTag {
        country,
        parens: value.contains('(') && value.contains(')'),
        dash: value.contains('-'),
        dot: value.contains('.'),
        space: value.contains(' '),
        extension: lower.contains('x') || lower.contains('#') || lower.contains("ext"),
    }))
}

/// Known date layouts, tried in order. First full parse wins, so the
/// US interpretation of an ambiguous `01/05/2024` is deterministic.
struct DateLayout {
    format: &'static str,
    order: DateFieldOrder,
    separator: DateSeparator,
    time: bool,
}

const fn layout(
    format: &'static str,
    order: DateFieldOrder,
    separator: DateSeparator,
    time: bool,
) -> DateLayout {
    DateLayout {
        format,
        order,
        separator,
        time,
    }
}

const DATE_LAYOUTS: &[DateLayout] = &[
    // ISO-like
    layout("%Y-%m-%d", DateFieldOrder::Ymd, DateSeparator::Dash, false),
    layout("%Y-%m-%d %H:%M:%S", DateFieldOrder::Ymd, DateSeparator::Dash, true),
    layout("%Y-%m-%dT%H:%M:%S", DateFieldOrder::Ymd, DateSeparator::Dash, true),
    layout("%Y-%m-%d %H:%M", DateFieldOrder::Ymd, DateSeparator::Dash, true),
    layout("%Y/%m/%d", DateFieldOrder::Ymd, DateSeparator::Slash, false),
    layout("%Y/%m/%d %H:%M:%S", DateFieldOrder::Ymd, DateSeparator::Slash, true),
    layout("%Y/%m/%d %H:%M", DateFieldOrder::Ymd, DateSeparator::Slash, true),
    // US
    layout("%m/%d/%Y", DateFieldOrder::Mdy, DateSeparator::Slash, false),
    layout("%m/%d/%Y %H:%M:%S", DateFieldOrder::Mdy, DateSeparator::Slash, true),
    layout("%m/%d/%Y %H:%M", DateFieldOrder::Mdy, DateSeparator::Slash, true),
    layout("%m-%d-%Y", DateFieldOrder::Mdy, DateSeparator::Dash, false),
    layout("%m-%d-%Y %H:%M:%S", DateFieldOrder::Mdy, DateSeparator::Dash, true),
    layout("%m-%d-%Y %H:%M", DateFieldOrder::Mdy, DateSeparator::Dash, true),
    // European
    layout("%d/%m/%Y", DateFieldOrder::Dmy, DateSeparator::Slash, false),
    layout("%d/%m/%Y %H:%M:%S", DateFieldOrder::Dmy, DateSeparator::Slash, true),
    layout("%d/%m/%Y %H:%M", DateFieldOrder::Dmy, DateSeparator::Slash, true),
    layout("%d-%m-%Y", DateFieldOrder::Dmy, DateSeparator::Dash, false),
    layout("%d-%m-%Y %H:%M:%S", DateFieldOrder::Dmy, DateSeparator::Dash, true),
    layout("%d-%m-%Y %H:%M", DateFieldOrder::Dmy, DateSeparator::Dash, true),
];

fn detect_date(value: &str) -> Option<FormatTag> {
    for layout in DATE_LAYOUTS {
        let parsed = if layout.time {
            NaiveDateTime::parse_from_str(value, layout.format).is_ok()
        } else {
            NaiveDate::parse_from_str(value, layout.format).is_ok()
        };
        if parsed {
            return Some(FormatTag::Date(DateTag {
                order: layout.order,
                separator: layout.separator,
                time: layout.time,
            }));
        }
    }
    None
}

fn detect_integer(value: &str) -> Option<FormatTag> {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    if digits.is_empty() {
        return None;
    }

    if digits.bytes().all(|b| b.is_ascii_digit()) {
        return Some(FormatTag::Integer(IntegerTag {
            grouping: DigitGrouping::Plain,
        }));
    }

    for (sep, grouping) in [
        (',', DigitGrouping::Comma),
        ('.', DigitGrouping::Period),
        (' ', DigitGrouping::Space),
    ] {
        if is_grouped_digits(digits, sep) {
            return Some(FormatTag::Integer(IntegerTag { grouping }));
        }
    }

    None
}

/// Whole-number grouping check: `1,234,567` style, groups of exactly three
/// after a 1-3 digit lead group.
fn is_grouped_digits(value: &str, sep: char) -> bool {
    let parts: Vec<&str> = value.split(sep).collect();
    if parts.len() < 2 {
        return false;
    }
    let lead = parts[0];
    if lead.is_empty() || lead.len() > 3 || !lead.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    parts[1..]
        .iter()
        .all(|p| p.len() == 3 && p.bytes().all(|b| b.is_ascii_digit()))
}

fn detect_float(value: &str) -> Option<FormatTag> {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    if unsigned.is_empty() {
        return None;
    }

    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (unsigned, None),
    };

    if let Some(exp) = exponent {
        let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if exp.is_empty() || !exp.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    let decimal = decimal_convention(mantissa)?;
    // A bare run of digits without an exponent is integer territory.
    if exponent.is_none() && decimal == DecimalSeparator::None {
        return None;
    }

    Some(FormatTag::Float(FloatTag {
        decimal,
        scientific: exponent.is_some(),
    }))
}

/// Determine the decimal-separator convention of a numeric mantissa, or
/// `None` if it is not a well-formed number.
fn decimal_convention(mantissa: &str) -> Option<DecimalSeparator> {
    if mantissa.is_empty() {
        return None;
    }

    let dots = mantissa.matches('.').count();
    let commas = mantissa.matches(',').count();

    match (dots, commas) {
        (0, 0) => mantissa
            .bytes()
            .all(|b| b.is_ascii_digit())
            .then_some(DecimalSeparator::None),
        (1, 0) => split_decimal(mantissa, '.').then_some(DecimalSeparator::Period),
        (0, 1) => split_decimal(mantissa, ',').then_some(DecimalSeparator::Comma),
        // Mixed separators: the last one is the decimal point, the rest
        // must be valid thousands grouping (e.g. 1,234.56 or 1.234,56).
        _ => {
            let (decimal_sep, group_sep) = match (mantissa.rfind('.'), mantissa.rfind(',')) {
                (Some(d), Some(c)) if d > c => ('.', ','),
                (Some(_), Some(_)) => (',', '.'),
                _ => return None,
            };
            let (int_part, frac_part) = mantissa.rsplit_once(decimal_sep)?;
            let valid = is_grouped_digits(int_part, group_sep)
                && !frac_part.is_empty()
                && frac_part.bytes().all(|b| b.is_ascii_digit())
                && !frac_part.contains(group_sep);
            if !valid {
                return None;
            }
            Some(if decimal_sep == '.' {
                DecimalSeparator::Period
            } else {
                DecimalSeparator::Comma
            })
        }
    }
}

/// Digits-dot-digits check where one side may be empty (`.5`, `5.`).
fn split_decimal(mantissa: &str, sep: char) -> bool {
    let Some((int_part, frac_part)) = mantissa.split_once(sep) else {
        return false;
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return false;
    }
    int_part.bytes().all(|b| b.is_ascii_digit()) && frac_part.bytes().all(|b| b.is_ascii_digit())
}
