//! Per-value format classification and per-column profiling.

mod column;
mod value;

pub use column::{
    ColumnProfile, ColumnProfiler, FormatObservation, DEFAULT_DOMINANT_FRACTION_THRESHOLD,
};
pub use value::{
    classify, BooleanStyle, CaseStyle, Classification, CountryCodeStyle, DateFieldOrder,
    DateSeparator, DateTag, DecimalSeparator, DigitGrouping, EmailTag, FloatTag, FormatCategory,
    FormatTag, IntegerTag, PhoneTag, UrlScheme, UrlTag,
};
