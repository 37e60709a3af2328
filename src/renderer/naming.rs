use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt::Debug;

/// Decides how table, column and alias names are written. The renderers
/// apply no escaping of their own.
pub trait NameEscaper: Debug {
    fn escape<'n>(&self, name: &'n str) -> Cow<'n, str>;
}

/// Writes names as they are.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEscape;

impl NameEscaper for NoEscape {
    fn escape<'n>(&self, name: &'n str) -> Cow<'n, str> {
        Cow::Borrowed(name)
    }
}

/// Quotes names colliding with a keyword of the target database.
///
/// ```rust
/// # use sqlweave::renderer::{KeywordEscaper, NameEscaper};
/// let escaper = KeywordEscaper::new(["user", "order"]);
///
/// assert_eq!("\"User\"", escaper.escape("User"));
/// assert_eq!("name", escaper.escape("name"));
///
/// let escaper = escaper.with_quotes("`", "`");
/// assert_eq!("`order`", escaper.escape("order"));
/// ```
#[derive(Debug, Clone)]
pub struct KeywordEscaper {
    keywords: HashSet<String>,
    open: String,
    close: String,
}

impl KeywordEscaper {
    /// Keywords are matched ignoring case. Names are quoted with `"`.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        KeywordEscaper {
            keywords: keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().to_lowercase())
                .collect(),
            open: String::from("\""),
            close: String::from("\""),
        }
    }

    pub fn with_quotes(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.open = open.into();
        self.close = close.into();
        self
    }
}

impl NameEscaper for KeywordEscaper {
    fn escape<'n>(&self, name: &'n str) -> Cow<'n, str> {
        if self.keywords.contains(&name.to_lowercase()) {
            Cow::Owned(format!("{}{}{}", self.open, name, self.close))
        } else {
            Cow::Borrowed(name)
        }
    }
}
