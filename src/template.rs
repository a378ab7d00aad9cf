//! The two page views, parsed once from template files at startup.
//!
//! A template is HTML with `{{Title}}` and `{{Body}}` placeholders
//! (spaces inside the braces and a leading dot, as in `{{ .Body }}`,
//! are accepted). Substituted values are HTML-escaped. Page bodies
//! are shown as UTF-8, with invalid bytes replaced by U+FFFD, so that
//! every stored page can be viewed and edited.

use std::fmt::{Display, self};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::page::Page;
use crate::webutils::html_escape_into;


#[derive(thiserror::Error, Debug)]
pub enum TemplateError {
    #[error("template: can't read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("template: {name}: unclosed action starting at byte {offset}")]
    Unclosed {
        name: String,
        offset: usize,
    },
    #[error("template: {name}: unknown field {field:?} at byte {offset}")]
    UnknownField {
        name: String,
        field: String,
        offset: usize,
    },
    #[error("template: {name}: executing: {source}")]
    Execute {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Field(Field),
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    parts: Vec<Part>,
}

impl Template {
    /// `name` is only used for error messages.
    pub fn parse(name: &str, source: &str) -> Result<Self, TemplateError> {
        let mut parts = Vec::new();
        let mut rest = source;
        let mut offset = 0;
        while let Some(start) = rest.find("{{") {
            if start > 0 {
                parts.push(Part::Literal(rest[..start].to_string()));
            }
            let action_offset = offset + start;
            let inner_start = start + 2;
            let len = rest[inner_start..].find("}}").ok_or_else(
                || TemplateError::Unclosed {
                    name: name.into(),
                    offset: action_offset
                })?;
            let inner = rest[inner_start..inner_start + len].trim();
            let fieldname = inner.strip_prefix('.').unwrap_or(inner);
            let field = match fieldname {
                "Title" => Field::Title,
                "Body" => Field::Body,
                _ => return Err(TemplateError::UnknownField {
                    name: name.into(),
                    field: inner.into(),
                    offset: action_offset
                })
            };
            parts.push(Part::Field(field));
            let end = inner_start + len + 2;
            rest = &rest[end..];
            offset += end;
        }
        if !rest.is_empty() {
            parts.push(Part::Literal(rest.to_string()));
        }
        Ok(Template { parts })
    }

    fn execute(&self, out: &mut dyn Write, page: &Page) -> std::io::Result<()> {
        let mut escaped = String::new();
        for part in &self.parts {
            match part {
                Part::Literal(s) => out.write_all(s.as_bytes())?,
                Part::Field(field) => {
                    escaped.clear();
                    match field {
                        Field::Title => html_escape_into(&mut escaped, page.title.as_str()),
                        Field::Body => html_escape_into(
                            &mut escaped, &String::from_utf8_lossy(&page.body)),
                    }
                    out.write_all(escaped.as_bytes())?;
                }
            }
        }
        Ok(())
    }
}


/// Which of the two views to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    View,
    Edit,
}

impl View {
    pub fn filename(self) -> &'static str {
        match self {
            View::View => "view.html",
            View::Edit => "edit.html",
        }
    }
}

impl Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.filename())
    }
}


/// Both views; immutable once loaded, share it via `Arc`.
#[derive(Debug)]
pub struct Templates {
    view: Template,
    edit: Template,
}

impl Templates {
    pub fn from_sources(view: &str, edit: &str) -> Result<Self, TemplateError> {
        Ok(Templates {
            view: Template::parse(View::View.filename(), view)?,
            edit: Template::parse(View::Edit.filename(), edit)?,
        })
    }

    /// Load `view.html` and `edit.html` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        let read = |view: View| {
            let path = dir.join(view.filename());
            std::fs::read_to_string(&path).map_err(
                |source| TemplateError::Read { path, source })
        };
        Self::from_sources(&read(View::View)?, &read(View::Edit)?)
    }

    pub fn get(&self, view: View) -> &Template {
        match view {
            View::View => &self.view,
            View::Edit => &self.edit,
        }
    }

    /// Render `page` with `view` into `out`; fails only if writing to
    /// `out` fails.
    pub fn render_to(&self, view: View, page: &Page, out: &mut dyn Write)
                     -> Result<(), TemplateError>
    {
        self.get(view).execute(out, page).map_err(
            |source| TemplateError::Execute { name: view.filename(), source })
    }

    /// The HTML for `page`, as bytes.
    pub fn render(&self, view: View, page: &Page) -> Result<Vec<u8>, TemplateError> {
        let mut out = Vec::new();
        self.render_to(view, page, &mut out)?;
        Ok(out)
    }
}
