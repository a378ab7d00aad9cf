//! Validation of page titles and of the request paths carrying them.
//! This is the only input sanitization there is: since titles are
//! restricted to ASCII alphanumerics, a title can be used directly as
//! a file name.

use std::fmt::{Display, self};

use kstring::KString;
use lazy_static::lazy_static;
use regex_lite::Regex;

lazy_static! {
    static ref VALID_PATH: Regex =
        Regex::new("^/(view|edit|save)/([A-Za-z0-9]+)$").expect("valid regex");
    static ref VALID_TITLE: Regex =
        Regex::new("^[A-Za-z0-9]+$").expect("valid regex");
}

/// What a request wants to do with a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Save,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Edit => "edit",
            Action::Save => "save",
        }
    }

    pub fn maybe_from(s: &str) -> Option<Self> {
        match s {
            "view" => Some(Action::View),
            "edit" => Some(Action::Edit),
            "save" => Some(Action::Save),
            _ => None
        }
    }

    /// The path under which this action is reached for `title`,
    /// e.g. `/edit/Foo`.
    pub fn path_for(self, title: &Title) -> String {
        format!("/{}/{}", self.as_str(), title)
    }
}

/// A page title that has passed validation. There is no way to get
/// one without going through `Title::new` or `parse_page_path`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Title(KString);

impl Title {
    pub fn new(s: &str) -> Option<Self> {
        if VALID_TITLE.is_match(s) {
            Some(Title(KString::from_ref(s)))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_kstring(&self) -> &KString {
        &self.0
    }

    /// The name of the file holding this page's content.
    pub fn filename(&self) -> String {
        format!("{}.txt", self.0)
    }
}

impl Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Match a full request path (without query string) like
/// `/view/FrontPage`. Returns `None` for anything else, including
/// trailing slashes, extra segments and non-alphanumeric titles.
pub fn parse_page_path(path: &str) -> Option<(Action, Title)> {
    let caps = VALID_PATH.captures(path)?;
    let action = Action::maybe_from(caps.get(1)?.as_str())?;
    let title = Title(KString::from_ref(caps.get(2)?.as_str()));
    Some((action, title))
}
