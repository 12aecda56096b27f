//! Dashboard HTML templates, compiled into the binary.

use tera::Tera;

const TEMPLATES: [(&str, &str); 6] = [
    ("layout.html", include_str!("../../templates/layout.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("registry.html", include_str!("../../templates/registry.html")),
    ("service.html", include_str!("../../templates/service.html")),
    ("client.html", include_str!("../../templates/client.html")),
    ("terminal.html", include_str!("../../templates/terminal.html")),
];

/// Parse every page. `.html` names are autoescaped.
pub fn load() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)?;
    Ok(tera)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::Context;

    #[test]
    fn test_templates_parse() {
        let tera = load().unwrap();
        let names: Vec<&str> = tera.get_template_names().collect();
        assert_eq!(names.len(), TEMPLATES.len());
    }

    #[test]
    fn test_index_escapes_names() {
        let tera = load().unwrap();
        let mut context = Context::new();
        context.insert("server_name", "go.micro.web");
        context.insert("namespace", "go.micro.web");
        context.insert("services", &vec!["<script>"]);

        let html = tera.render("index.html", &context).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<li><a href=\"/<script>/\">"));
    }
}
