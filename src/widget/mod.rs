use std::fmt::Debug;

use include_dir::{include_dir, Dir};
use lazy_static::lazy_static;
use serde::Serialize;
use tera::Tera;

pub use departures::*;
pub use editor::*;

use crate::constants::VERSION;

mod departures;
mod editor;
mod ser;

pub trait Widget
where
    Self: Serialize + Sized + Debug,
{
    /// Must be a file name ending in `.j2`, located in `src/res/widgets/`.
    const FILE: &'static str;

    /// Markup ID for this widget. Defaults to its file name.
    ///
    /// The host replaces previously rendered markup that carries the
    /// same ID, so choosing the same ID for multiple widgets allows
    /// replacing one widget with another.
    const ID: &'static str = Self::FILE;

    /// Render the template file with this context, extended by
    /// - `widget_id`: scopes the markup and its style rules
    /// - `version`: the controller version
    fn render(&self) -> String {
        log::debug!("render widget context: {:?}", &self);

        let mut tera_context =
            tera::Context::from_serialize(self).expect("failed to create widget context!");
        Self::extend_ctxt(&mut tera_context);

        TEMPLATES
            .render(Self::FILE, &tera_context)
            .expect("failed to render widget!")
    }

    /// Render an empty widget that can replace previously sent markup
    /// of this type.
    fn hidden() -> String {
        let mut tera_context = tera::Context::new();
        Self::extend_ctxt(&mut tera_context);
        TEMPLATES
            .render("empty.j2", &tera_context)
            .expect("failed to render widget!")
    }

    fn extend_ctxt(ctxt: &mut tera::Context) {
        ctxt.insert("widget_id", Self::ID);
        ctxt.insert("version", VERSION);
    }
}

lazy_static! {
    static ref TEMPLATES: Tera = collect_templates().unwrap();
}

fn collect_templates() -> tera::Result<Tera> {
    // Include all widget templates at compile-time:
    static TEMPLATE_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/src/res/widgets");

    let mut tera = Tera::default();

    for file in TEMPLATE_DIR.files() {
        let file_name = file
            .path()
            .to_str()
            .expect("failed to read template");
        tera.add_raw_template(
            file_name,
            file.contents_utf8().expect("failed to read template"),
        )?;
    }

    Ok(tera)
}
