// File: src/document.rs
// Purpose: Full-page HTML document shell and whitespace minification

use maud::{html, PreEscaped, DOCTYPE};
use once_cell::sync::Lazy;
use regex::Regex;

const BASE_CSS: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', 'Oxygen',
        'Ubuntu', 'Cantarell', 'Fira Sans', 'Droid Sans', 'Helvetica Neue',
        sans-serif;
    -webkit-font-smoothing: antialiased;
    -moz-osx-font-smoothing: grayscale;
}
"#;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static BETWEEN_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s+<").unwrap());

/// Renders the HTML5 shell around pre-rendered body markup.
///
/// `body_html` goes inside `<div id="app">`; each entry of `scripts` is
/// inserted verbatim after it.
pub fn render_document(title: &str, static_prefix: &str, body_html: &str, scripts: &[String]) -> String {
    let icon = format!("{}Logo.svg", static_prefix);
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="icon" type="image/svg+xml" href=(icon);
                style { (PreEscaped(BASE_CSS)) }
            }
            body {
                div id="app" { (PreEscaped(body_html)) }
                @for script in scripts {
                    (PreEscaped(script))
                }
            }
        }
    };
    markup.into_string()
}

/// Collapses whitespace runs to one space, then drops whitespace between tags
pub fn minify_html(html: &str) -> String {
    let collapsed = WHITESPACE.replace_all(html, " ");
    BETWEEN_TAGS.replace_all(&collapsed, "><").into_owned()
}
