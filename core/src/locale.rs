//! Locale selection from the first URL path segment.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Ar,
}

/// Text direction of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ar];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    pub fn dir(&self) -> Direction {
        match self {
            Locale::En => Direction::Ltr,
            Locale::Ar => Direction::Rtl,
        }
    }

    /// The other supported locale.
    pub fn toggle(&self) -> Locale {
        match self {
            Locale::En => Locale::Ar,
            Locale::Ar => Locale::En,
        }
    }

    /// Name of the locale in its own script, for the language switcher.
    pub fn native_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Ar => "العربية",
        }
    }

    /// Locale named by the first segment of `path`. `None` means the page
    /// does not exist.
    pub fn from_path(path: &str) -> Option<Locale> {
        path.trim_start_matches('/')
            .split(['/', '?', '#'])
            .next()
            .and_then(|segment| segment.parse().ok())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "ar" => Ok(Locale::Ar),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// Rewrite `path` so its first segment names `target`, keeping the rest.
pub fn switch_locale_path(path: &str, target: Locale) -> String {
    let rest = path.strip_prefix('/').unwrap_or(path);
    match rest.split_once('/') {
        Some((_, tail)) => format!("/{}/{tail}", target.code()),
        None => format!("/{}", target.code()),
    }
}

/// One entry in the language switcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageOption {
    pub locale: Locale,
    pub label: &'static str,
    pub href: String,
    pub current: bool,
}

/// Switcher entries for every supported locale, each linking to `path`
/// rendered in that locale.
pub fn language_options(path: &str) -> Vec<LanguageOption> {
    let current = Locale::from_path(path).unwrap_or_default();
    Locale::ALL
        .iter()
        .map(|&locale| LanguageOption {
            locale,
            label: locale.native_name(),
            href: switch_locale_path(path, locale),
            current: locale == current,
        })
        .collect()
}
