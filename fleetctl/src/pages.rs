//! HTML page rendering.
//!
//! Templates are compiled into the binary and rendered with minijinja. Every template name ends
//! in `.html`, so values are HTML-escaped on output.

use crate::errors::Error;
use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("machines/index.html", include_str!("../templates/machines/index.html")),
    ("machines/create.html", include_str!("../templates/machines/create.html")),
    ("machine_groups/index.html", include_str!("../templates/machine_groups/index.html")),
    ("machine_groups/edit.html", include_str!("../templates/machine_groups/edit.html")),
];

#[derive(Debug)]
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, context: &S) -> Result<Html<String>, Error> {
        let html = self.env.get_template(name)?.render(context)?;
        Ok(Html(html))
    }
}
