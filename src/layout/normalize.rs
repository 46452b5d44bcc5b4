use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ir::DateLike;

static MONTH_NAME_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<month>[A-Za-z]+)\.?,?\s+(?P<year>\d{4})$").unwrap());
static YEAR_SLASH_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<year>\d{4})[/.](?P<month>\d{1,2})$").unwrap());
static YEAR_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<year>\d{4})$").unwrap());

/// Years accepted from record data. Anything outside is treated as malformed.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Calendar month with day precision discarded.
///
/// Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub year: i32,
    pub month: u32,
}

impl Anchor {
    /// Returns `None` unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn now() -> Self {
        let today = Local::now();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn from_date(date: impl Datelike) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Whether the year lies in `MIN_YEAR..=MAX_YEAR`.
    pub fn is_calendar(&self) -> bool {
        (MIN_YEAR..=MAX_YEAR).contains(&self.year)
    }

    fn month_index(self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    // Saturates at the `i32` year bounds instead of wrapping.
    fn from_month_index(index: i64) -> Self {
        let year = index.div_euclid(12);
        match i32::try_from(year) {
            Ok(year) => Self {
                year,
                month: index.rem_euclid(12) as u32 + 1,
            },
            Err(_) if year < 0 => Self {
                year: i32::MIN,
                month: 1,
            },
            Err(_) => Self {
                year: i32::MAX,
                month: 12,
            },
        }
    }

    pub fn add_months(self, months: i64) -> Self {
        Self::from_month_index(self.month_index() + months)
    }

    /// Whole months from `self` to `later`; negative when `later` is earlier.
    pub fn months_until(self, later: Anchor) -> i64 {
        months_between(self, later)
    }

    /// Short axis label such as `Mar 2024`.
    pub fn label(self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(date) => date.format("%b %Y").to_string(),
            None => format!("{:04}-{:02}", self.year, self.month),
        }
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for Anchor {
    type Err = String;

    /// Strict `YYYY-MM` parsing, used for explicit "now" overrides.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (year, month) = value
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got '{value}'"))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in '{value}'"))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in '{value}'"))?;
        let anchor =
            Anchor::new(year, month).ok_or_else(|| format!("month out of range in '{value}'"))?;
        if !anchor.is_calendar() {
            return Err(format!("year out of range in '{value}'"));
        }
        Ok(anchor)
    }
}

/// `(b.year - a.year) * 12 + (b.month - a.month)`, in exact integers.
pub fn months_between(a: Anchor, b: Anchor) -> i64 {
    (b.year as i64 - a.year as i64) * 12 + (b.month as i64 - a.month as i64)
}

/// Canonicalises any date encoding to an [`Anchor`].
///
/// Total: malformed or absent input yields `now` and emits a warning so bad
/// upstream data stays visible without blanking the timeline. Years outside
/// `MIN_YEAR..=MAX_YEAR` count as malformed.
pub fn normalize(input: Option<&DateLike>, now: Anchor) -> Anchor {
    let Some(input) = input else {
        tracing::warn!(fallback = %now, "missing date, using current month");
        return now;
    };
    match input {
        DateLike::Parts(parts) => match normalize_parts(parts).filter(Anchor::is_calendar) {
            Some(anchor) => anchor,
            None => {
                tracing::warn!(input = ?parts, fallback = %now, "unusable date parts, using current month");
                now
            }
        },
        DateLike::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                tracing::warn!(fallback = %now, "empty date, using current month");
                return now;
            }
            let parsed = normalize_dashed(text).or_else(|| parse_generic(text));
            match parsed.filter(Anchor::is_calendar) {
                Some(anchor) => anchor,
                None => {
                    tracing::warn!(input = text, fallback = %now, "unparseable date, using current month");
                    now
                }
            }
        }
    }
}

/// [`normalize`] against the wall clock.
pub fn normalize_now(input: Option<&DateLike>) -> Anchor {
    normalize(input, Anchor::now())
}

fn normalize_parts(parts: &[i64]) -> Option<Anchor> {
    if parts.len() < 3 {
        return None;
    }
    let year = i32::try_from(parts[0]).ok()?;
    let month = u32::try_from(parts[1]).ok()?;
    Anchor::new(year, month)
}

fn normalize_dashed(text: &str) -> Option<Anchor> {
    if !text.contains('-') {
        return None;
    }
    let mut parts = text.split('-');
    let year: i32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    Anchor::new(year, month)
}

fn parse_generic(text: &str) -> Option<Anchor> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(Anchor::from_date(parsed));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
        return Some(Anchor::from_date(parsed));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Anchor::from_date(parsed));
        }
    }
    for format in ["%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"] {
        if let Ok(parsed) = NaiveDate::parse_from_str(text, format) {
            return Some(Anchor::from_date(parsed));
        }
    }
    if let Some(caps) = YEAR_SLASH_MONTH_RE.captures(text) {
        let year = caps["year"].parse().ok()?;
        let month = caps["month"].parse().ok()?;
        return Anchor::new(year, month);
    }
    if let Some(caps) = MONTH_NAME_YEAR_RE.captures(text) {
        let name = caps["month"].to_ascii_lowercase();
        let index = MONTH_NAMES
            .iter()
            .position(|prefix| name.len() >= 3 && name.starts_with(prefix))?;
        let year = caps["year"].parse().ok()?;
        return Anchor::new(year, index as u32 + 1);
    }
    if let Some(caps) = YEAR_ONLY_RE.captures(text) {
        return Anchor::new(caps["year"].parse().ok()?, 1);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn anchor(year: i32, month: u32) -> Anchor {
        Anchor::new(year, month).unwrap()
    }

    const NOW: Anchor = Anchor {
        year: 2026,
        month: 10,
    };

    #[test]
    fn equivalent_encodings_share_an_anchor() {
        let expected = anchor(2024, 3);
        for input in [
            DateLike::text("2024-03"),
            DateLike::text("2024-03-15"),
            DateLike::text("2024-03-15T08:30:00Z"),
            DateLike::ymd(2024, 3, 1),
        ] {
            assert_eq!(normalize(Some(&input), NOW), expected, "{input:?}");
        }
    }

    #[test]
    fn missing_and_empty_fall_back_to_now() {
        assert_eq!(normalize(None, NOW), NOW);
        assert_eq!(normalize(Some(&DateLike::text("")), NOW), NOW);
        assert_eq!(normalize(Some(&DateLike::text("   ")), NOW), NOW);
    }

    #[test]
    fn malformed_input_falls_back_to_now() {
        for input in [
            DateLike::text("not a date"),
            DateLike::text("2024-13"),
            DateLike::text("yyyy-mm"),
            DateLike::Parts(vec![2024]),
            DateLike::Parts(vec![2024, 3]),
            DateLike::Parts(vec![2024, 0, 1]),
            DateLike::Parts(vec![i64::MAX, 3, 1]),
            DateLike::Parts(vec![1_700_000_000, 1, 1]),
            DateLike::Parts(vec![i32::MAX as i64, 12, 1]),
            DateLike::Parts(vec![0, 6, 1]),
            DateLike::text("99999-01"),
            DateLike::text("1700000000-01-01"),
        ] {
            assert_eq!(normalize(Some(&input), NOW), NOW, "{input:?}");
        }
    }

    #[test]
    fn generic_formats_are_accepted() {
        let cases = [
            ("2023/07/04", anchor(2023, 7)),
            ("2023/7", anchor(2023, 7)),
            ("March 2021", anchor(2021, 3)),
            ("Sept. 2019", anchor(2019, 9)),
            ("Feb 14, 2020", anchor(2020, 2)),
            ("2018", anchor(2018, 1)),
        ];
        for (text, expected) in cases {
            assert_eq!(normalize(Some(&DateLike::text(text)), NOW), expected, "{text}");
        }
    }

    #[test]
    fn month_arithmetic_is_exact() {
        assert_eq!(months_between(anchor(2022, 9), anchor(2026, 2)), 41);
        assert_eq!(months_between(anchor(2026, 2), anchor(2022, 9)), -41);
        assert_eq!(anchor(2024, 1).add_months(-1), anchor(2023, 12));
        assert_eq!(anchor(2024, 12).add_months(1), anchor(2025, 1));
        assert_eq!(anchor(2024, 5).add_months(-29), anchor(2021, 12));
    }

    #[test]
    fn month_index_saturates_at_year_bounds() {
        let last = Anchor {
            year: i32::MAX,
            month: 12,
        };
        assert_eq!(last.add_months(1).year, i32::MAX);
        let first = Anchor {
            year: i32::MIN,
            month: 1,
        };
        assert_eq!(first.add_months(-1).year, i32::MIN);
    }

    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn warnings_during(f: impl FnOnce()) -> usize {
        let counter = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        tracing::subscriber::with_default(subscriber, f);
        counter.0.load(Ordering::SeqCst)
    }

    #[test]
    fn fallback_emits_a_warning() {
        assert_eq!(warnings_during(|| assert_eq!(normalize(None, NOW), NOW)), 1);
        assert_eq!(
            warnings_during(|| {
                normalize(Some(&DateLike::text("sometime")), NOW);
                normalize(Some(&DateLike::Parts(vec![1_700_000_000, 1, 1])), NOW);
            }),
            2
        );
        assert_eq!(
            warnings_during(|| {
                normalize(Some(&DateLike::text("2024-03")), NOW);
                normalize(Some(&DateLike::ymd(2024, 3, 1)), NOW);
            }),
            0
        );
    }

    #[test]
    fn strict_override_parsing() {
        assert_eq!("2026-10".parse::<Anchor>(), Ok(NOW));
        assert!("2026".parse::<Anchor>().is_err());
        assert!("2026-00".parse::<Anchor>().is_err());
        assert!("1700000000-01".parse::<Anchor>().is_err());
        assert_eq!(anchor(2024, 3).label(), "Mar 2024");
    }

    proptest! {
        #[test]
        fn prop_normalize_is_total(text in ".{0,24}", parts in prop::collection::vec(any::<i64>(), 0..5)) {
            let from_text = normalize(Some(&DateLike::Text(text)), NOW);
            prop_assert!((1..=12).contains(&from_text.month));
            prop_assert!(from_text.is_calendar());
            let from_parts = normalize(Some(&DateLike::Parts(parts)), NOW);
            prop_assert!((1..=12).contains(&from_parts.month));
            prop_assert!(from_parts.is_calendar());
        }

        #[test]
        fn prop_encodings_agree(year in 1900i64..2100, month in 1i64..=12, day in 1i64..=28) {
            let expected = Anchor::new(year as i32, month as u32).unwrap();
            let short = DateLike::Text(format!("{year:04}-{month:02}"));
            let full = DateLike::Text(format!("{year:04}-{month:02}-{day:02}"));
            let parts = DateLike::ymd(year, month, day);
            prop_assert_eq!(normalize(Some(&short), NOW), expected);
            prop_assert_eq!(normalize(Some(&full), NOW), expected);
            prop_assert_eq!(normalize(Some(&parts), NOW), expected);
        }
    }
}
