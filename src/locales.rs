use std::{fs, path::Path};

use anyhow::{anyhow, Result};
use fluent::{bundle::FluentBundle, FluentArgs, FluentResource};
use intl_memoizer::concurrent::IntlLangMemoizer;
use time::OffsetDateTime;
use unic_langid::LanguageIdentifier;

use crate::error::BlogError;

static FLUENT_KO_KR: &str = include_str!("../locales/ko-KR.ftl");
static FLUENT_EN_US: &str = include_str!("../locales/en-US.ftl");

/// The locale used when a site doesn't declare one.
pub static DEFAULT_LOCALE: &str = "ko-KR";

fn builtin_resource(locale: &str) -> Option<&'static str> {
    match locale {
        "ko-KR" | "ko" => Some(FLUENT_KO_KR),
        "en-US" | "en" => Some(FLUENT_EN_US),
        _ => None,
    }
}

/// Fluent locale loader to localize dates.
///
/// A site can override or add a locale by shipping `locales/<locale>.ftl`
/// with a `long-date` message taking `$year`, `$month` and `$day`.
pub struct FluentLoader {
    locale: String,
    bundle: FluentBundle<FluentResource, IntlLangMemoizer>,
}

impl std::fmt::Debug for FluentLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FluentLoader")
            .field("locale", &self.locale)
            .finish()
    }
}

impl FluentLoader {
    pub fn new(source: &Path, locale: &str) -> Result<Self> {
        let custom_ftl = source.join("locales").join(format!("{locale}.ftl"));
        if custom_ftl.exists() {
            return Self::with_resource(locale, fs::read_to_string(custom_ftl)?);
        }

        match builtin_resource(locale) {
            Some(ftl) => Self::with_resource(locale, ftl.to_owned()),
            None => {
                tracing::warn!(
                    "No translations for locale `{}`, fallback to `{}`",
                    locale,
                    DEFAULT_LOCALE
                );
                Self::with_resource(DEFAULT_LOCALE, FLUENT_KO_KR.to_owned())
            }
        }
    }

    /// The builtin Korean loader.
    pub fn korean() -> Self {
        Self::with_resource(DEFAULT_LOCALE, FLUENT_KO_KR.to_owned())
            .expect("Invalid builtin Korean locale.")
    }

    fn with_resource(locale: &str, ftl: String) -> Result<Self> {
        let langid = locale
            .parse::<LanguageIdentifier>()
            .map_err(|_| BlogError::InvalidLocale(locale.to_owned()))?;
        let resource = FluentResource::try_new(ftl)
            .map_err(|(_, errors)| anyhow!("Invalid fluent file for `{locale}`: {errors:?}"))?;

        let mut bundle = FluentBundle::new_concurrent(vec![langid]);
        // No unicode isolation marks around placeables, they leak into the XML and terminal.
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Conflicting fluent messages for `{locale}`: {errors:?}"))?;

        Ok(FluentLoader {
            locale: locale.to_owned(),
            bundle,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Render `date` as a long-form date of this locale, in the date's own offset.
    pub fn format_date(&self, date: OffsetDateTime) -> String {
        let mut args = FluentArgs::new();
        args.set("year", date.year());
        args.set("month", u8::from(date.month()));
        args.set("day", date.day());

        self.format("long-date", &args).unwrap_or_else(|| {
            format!(
                "{}-{:02}-{:02}",
                date.year(),
                u8::from(date.month()),
                date.day()
            )
        })
    }

    fn format(&self, key: &str, args: &FluentArgs) -> Option<String> {
        let pattern = self.bundle.get_message(key)?.value()?;
        let mut errors = vec![];
        let text = self.bundle.format_pattern(pattern, Some(args), &mut errors);
        if !errors.is_empty() {
            tracing::warn!("Failed to format `{}` for `{}`: {:?}", key, self.locale, errors);
        }
        Some(text.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use test_case::test_case;
    use time::macros::datetime;

    use super::FluentLoader;

    #[test_case("ko-KR", "2024년 1월 15일"; "korean")]
    #[test_case("en-US", "January 15, 2024"; "english")]
    #[test_case("fr-FR", "2024년 1월 15일"; "unknown locale falls back to korean")]
    fn test_format_builtin_locales(locale: &str, expected: &str) {
        let dir = tempfile::tempdir().unwrap();
        let loader = FluentLoader::new(dir.path(), locale).unwrap();
        assert_eq!(expected, loader.format_date(datetime!(2024-01-15 0:00 UTC)));
    }

    #[test]
    fn test_custom_locale_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("locales")).unwrap();
        fs::write(
            dir.path().join("locales/ja-JP.ftl"),
            "long-date = { $year }年{ $month }月{ $day }日\n",
        )
        .unwrap();

        let loader = FluentLoader::new(dir.path(), "ja-JP").unwrap();
        assert_eq!("ja-JP", loader.locale());
        assert_eq!("2023年12月3日", loader.format_date(datetime!(2023-12-03 0:00 UTC)));
    }

    #[test]
    fn test_missing_message_falls_back_to_iso() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("locales")).unwrap();
        fs::write(dir.path().join("locales/ko-KR.ftl"), "title = Blog\n").unwrap();

        let loader = FluentLoader::new(dir.path(), "ko-KR").unwrap();
        assert_eq!("2024-03-07", loader.format_date(datetime!(2024-03-07 0:00 UTC)));
    }

    #[test]
    fn test_invalid_locale() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("locales")).unwrap();
        fs::write(dir.path().join("locales/not a locale!.ftl"), "").unwrap();
        assert!(FluentLoader::new(dir.path(), "not a locale!").is_err());
    }
}
