//! Page templates.
//!
//! Templates are compiled into the binary and loaded once at startup. Every
//! template is HTML auto-escaped regardless of its name.

use std::fmt::Write as _;

use axum::response::Html;
use minijinja::value::Value;
use minijinja::{AutoEscape, Environment, Error, Output, State, escape_formatter};
use serde::Serialize;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

/// The views the route handlers can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum View {
    #[strum(serialize = "home")]
    Home,
    #[strum(serialize = "task-form")]
    TaskForm,
    #[strum(serialize = "task-details")]
    TaskDetails,
    #[strum(serialize = "not-found")]
    NotFound,
}

impl View {
    pub fn name(self) -> &'static str {
        self.into()
    }

    fn source(self) -> &'static str {
        match self {
            View::Home => include_str!("../templates/home.html"),
            View::TaskForm => include_str!("../templates/task-form.html"),
            View::TaskDetails => include_str!("../templates/task-details.html"),
            View::NotFound => include_str!("../templates/not-found.html"),
        }
    }
}

const LAYOUT: &str = "layout";

#[derive(Debug)]
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    /// Compile the layout and every [`View`].
    pub fn load() -> Result<Self, Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_formatter(html_formatter);
        env.add_template(LAYOUT, include_str!("../templates/layout.html"))?;
        for view in View::iter() {
            env.add_template(view.name(), view.source())?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, view: View, ctx: S) -> Result<Html<String>, Error> {
        let template = self.env.get_template(view.name())?;
        Ok(Html(template.render(ctx)?))
    }
}

/// Like minijinja's default formatter, but leaves `/` unescaped so messages
/// such as "task/s" and paths read naturally in the page source.
fn html_formatter(out: &mut Output<'_>, state: &State<'_, '_>, value: &Value) -> Result<(), Error> {
    match value.as_str() {
        Some(text) if matches!(state.auto_escape(), AutoEscape::Html) && !value.is_safe() => {
            for c in text.chars() {
                match c {
                    '&' => out.write_str("&amp;"),
                    '<' => out.write_str("&lt;"),
                    '>' => out.write_str("&gt;"),
                    '"' => out.write_str("&quot;"),
                    '\'' => out.write_str("&#x27;"),
                    other => out.write_char(other),
                }?;
            }
            Ok(())
        }
        _ => escape_formatter(out, state, value),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use minijinja::context;

    #[test]
    fn every_view_compiles() {
        let views = Views::load().unwrap();
        for view in View::iter() {
            assert!(views.env.get_template(view.name()).is_ok(), "{view:?}");
        }
    }

    #[test]
    fn not_found_escapes_markup_but_keeps_slashes() {
        let views = Views::load().unwrap();
        let Html(page) = views
            .render(View::NotFound, context! { message => "<b>task/s</b>" })
            .unwrap();
        assert!(page.contains("&lt;b&gt;task/s&lt;/b&gt;"));
        assert!(!page.contains("<b>"));
    }
}
