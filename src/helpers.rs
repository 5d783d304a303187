use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
};

/// Parse a point in time from `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_datetime(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    OffsetDateTime::parse(value, &Rfc3339).ok().or_else(|| {
        Date::parse(value, format_description!("[year]-[month]-[day]"))
            .ok()
            .map(|date| date.midnight().assume_utc())
    })
}

/// Resolve a root-relative `link` against the absolute `site` url.
pub fn absolute_url(site: &str, link: &str) -> String {
    format!(
        "{}/{}",
        site.trim_end_matches('/'),
        link.trim_start_matches('/')
    )
}

/// Convert a path segment or title into a URL-safe slug.
///
/// Letters are lowercased, whitespace and underscores collapse into a single `-`,
/// other punctuation is dropped. Non-ASCII letters (Hangul included) are kept.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if (ch.is_whitespace() || ch == '-' || ch == '_') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_owned()
}

/// A serde module to serialize and deserialize [`time::OffsetDateTime`] type.
pub mod serde_datetime {
    use serde::{de, Serialize, Serializer};
    use time::{format_description::well_known::Rfc3339, OffsetDateTime};

    pub fn serialize<S: Serializer>(
        datetime: &OffsetDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        datetime
            .format(&Rfc3339)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(d: D) -> Result<OffsetDateTime, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        d.deserialize_any(DateTimeVisitor)
    }

    struct DateTimeVisitor;

    impl<'de> de::Visitor<'de> for DateTimeVisitor {
        type Value = OffsetDateTime;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a date value like YYYY-MM-DD or an RFC 3339 timestamp")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            super::parse_datetime(v)
                .ok_or_else(|| E::custom(format!("The date value `{}` is invalid", v)))
        }
    }
}

/// Deserialize any YAML/TOML scalar (string, number or bool) as a `String`.
///
/// Front matter such as `title: 1984` is a valid title, not an integer.
pub mod serde_scalar {
    use serde::de;

    pub fn deserialize<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        d.deserialize_any(ScalarVisitor)
    }

    struct ScalarVisitor;

    impl<'de> de::Visitor<'de> for ScalarVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }
    }
}
