use serde::Deserialize;

use crate::locales::DEFAULT_LOCALE;

#[derive(Debug, Clone, Deserialize)]
pub struct Site {
    /// The absolute url of this site, feed links are resolved against it.
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// The locale to format dates.
    /// Default to 'ko-KR'.
    #[serde(default = "Site::default_locale")]
    pub locale: String,
    /// The language declared in the feed.
    /// Default to 'ko-kr'.
    #[serde(default = "Site::default_language")]
    pub language: String,
}

impl Site {
    fn default_locale() -> String {
        DEFAULT_LOCALE.to_owned()
    }

    fn default_language() -> String {
        "ko-kr".to_owned()
    }
}
