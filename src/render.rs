//! Template rendering module
//!
//! Two templates, `view.html` and `edit.html`, are read from disk once at
//! startup into a minijinja environment and never reloaded. The `.html`
//! template names keep minijinja's default auto-escaping active, so page
//! bodies come out as literal text, never as markup.

use minijinja::{context, Environment};
use std::io;
use std::path::Path;

use crate::store::Page;

/// Template names, keyed by the handler that renders them.
pub const VIEW_TEMPLATE: &str = "view.html";
pub const EDIT_TEMPLATE: &str = "edit.html";

const DEFAULT_VIEW: &str = "\
<h1>{{ title }}</h1>
<p>[<a href=\"/edit/{{ title }}\">edit</a>]</p>
<div>{{ body }}</div>
";

const DEFAULT_EDIT: &str = "\
<h1>Editing {{ title }}</h1>
<form action=\"/save/{{ title }}\" method=\"POST\">
<div><textarea name=\"body\" rows=\"20\" cols=\"80\">{{ body }}</textarea></div>
<div><input type=\"submit\" value=\"Save\"></div>
</form>
";

/// Write the default template bodies next to the server if absent
///
/// Existing files are left alone so the operator can edit them; they only
/// need to exist before the first render.
pub fn write_default_templates(dir: &Path) -> io::Result<()> {
    for (name, source) in [(VIEW_TEMPLATE, DEFAULT_VIEW), (EDIT_TEMPLATE, DEFAULT_EDIT)] {
        let path = dir.join(name);
        if !path.exists() {
            std::fs::write(&path, source)?;
        }
    }
    Ok(())
}

/// The compiled template set.
///
/// Built once during startup and shared read-only across request tasks.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Load both templates from the template directory
    pub fn load(dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let mut env = Environment::new();
        for name in [VIEW_TEMPLATE, EDIT_TEMPLATE] {
            let source = std::fs::read_to_string(dir.join(name))?;
            env.add_template_owned(name.to_owned(), source)?;
        }
        Ok(Self { env })
    }

    /// Render a page through the named template
    pub fn render(&self, name: &str, page: &Page) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(name)?;
        template.render(context! {
            title => page.title,
            body => String::from_utf8_lossy(&page.body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_templates(dir: &Path) -> Templates {
        write_default_templates(dir).unwrap();
        Templates::load(dir).unwrap()
    }

    #[test]
    fn test_bootstrap_creates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        write_default_templates(dir.path()).unwrap();

        assert!(dir.path().join("view.html").exists());
        assert!(dir.path().join("edit.html").exists());
    }

    #[test]
    fn test_bootstrap_keeps_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let custom = "<p>{{ title }}</p>";
        std::fs::write(dir.path().join("view.html"), custom).unwrap();

        write_default_templates(dir.path()).unwrap();

        let kept = std::fs::read_to_string(dir.path().join("view.html")).unwrap();
        assert_eq!(kept, custom);
    }

    #[test]
    fn test_view_renders_title_body_and_edit_link() {
        let dir = tempfile::tempdir().unwrap();
        let templates = loaded_templates(dir.path());

        let page = Page::new("TestPage", b"hello=world".to_vec());
        let html = templates.render(VIEW_TEMPLATE, &page).unwrap();

        assert!(html.contains("<h1>TestPage</h1>"));
        assert!(html.contains("hello=world"));
        assert!(html.contains("/edit/TestPage"));
    }

    #[test]
    fn test_edit_renders_form_posting_to_save() {
        let dir = tempfile::tempdir().unwrap();
        let templates = loaded_templates(dir.path());

        let page = Page::blank("TestPage");
        let html = templates.render(EDIT_TEMPLATE, &page).unwrap();

        assert!(html.contains("action=\"/save/TestPage\""));
        assert!(html.contains("<textarea name=\"body\""));
    }

    #[test]
    fn test_body_markup_is_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let templates = loaded_templates(dir.path());

        let page = Page::new("P", b"<script>alert(1)</script>".to_vec());
        let html = templates.render(VIEW_TEMPLATE, &page).unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_unknown_template_name_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let templates = loaded_templates(dir.path());

        assert!(templates.render("missing.html", &Page::blank("P")).is_err());
    }
}
