use serde::Serialize;

/// Page language selected by the first path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Ar,
}

impl Locale {
    pub const DEFAULT: Locale = Locale::En;

    /// `None` for anything other than `en` / `ar`.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "en" => Some(Locale::En),
            "ar" => Some(Locale::Ar),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    pub fn dir(self) -> &'static str {
        match self {
            Locale::En => "ltr",
            Locale::Ar => "rtl",
        }
    }

    pub fn is_arabic(self) -> bool {
        self == Locale::Ar
    }

    /// The other language, for the header switcher.
    pub fn alternate(self) -> Self {
        match self {
            Locale::En => Locale::Ar,
            Locale::Ar => Locale::En,
        }
    }

    pub fn pick<'a>(self, en: &'a str, ar: &'a str) -> &'a str {
        match self {
            Locale::En => en,
            Locale::Ar => ar,
        }
    }
}
