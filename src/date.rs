use std::cmp::Ordering;

use once_cell::sync::Lazy;
use time::OffsetDateTime;

use crate::locales::FluentLoader;

static KOREAN: Lazy<FluentLoader> = Lazy::new(FluentLoader::korean);

/// A record carrying a publishing date.
pub trait Dated {
    fn date(&self) -> OffsetDateTime;
}

/// Format `date` as a Korean long-form date, such as `2024년 1월 15일`.
pub fn format_date(date: OffsetDateTime) -> String {
    KOREAN.format_date(date)
}

/// Order two records newest first.
///
/// Returns [`Ordering::Less`] if `a` is more recent than `b`, so it can be passed
/// straight to [`slice::sort_by`]. Identical timestamps compare equal and keep
/// their relative order under a stable sort.
pub fn sort_by_date<A: Dated, B: Dated>(a: &A, b: &B) -> Ordering {
    b.date().cmp(&a.date())
}
