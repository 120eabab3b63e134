// File: src/vdom/tags.rs
// Purpose: Constructor helpers for common HTML and SVG tags

use crate::vdom::node::{Element, Node};

pub fn create_element(tag: &str) -> Element {
    Element::new(tag)
}

/// Escaped text literal
pub fn text(content: impl Into<String>) -> Node {
    Node::Text(content.into())
}

/// Groups children under a plain `div`
pub fn fragment<I, N>(children: I) -> Element
where
    I: IntoIterator<Item = N>,
    N: Into<Node>,
{
    div().children(children)
}

macro_rules! tags {
    ($($name:ident => $tag:literal),* $(,)?) => {
        $(
            pub fn $name() -> Element {
                Element::new($tag)
            }
        )*
    };
}

tags! {
    div => "div",
    h1 => "h1",
    h2 => "h2",
    h3 => "h3",
    h4 => "h4",
    h5 => "h5",
    h6 => "h6",
    p => "p",
    button => "button",
    textarea => "textarea",
    select => "select",
    option => "option",
    label => "label",
    form => "form",
    span => "span",
    ul => "ul",
    ol => "ol",
    li => "li",
    a => "a",
    section => "section",
    article => "article",
    header => "header",
    footer => "footer",
    nav => "nav",
    main_el => "main",
    aside => "aside",
    table => "table",
    thead => "thead",
    tbody => "tbody",
    tr => "tr",
    th => "th",
    td => "td",
    code => "code",
    pre => "pre",
    strong => "strong",
    em => "em",
    blockquote => "blockquote",
    canvas => "canvas",
    video => "video",
    audio => "audio",
}

// Void elements
tags! {
    input_field => "input",
    img => "img",
    br => "br",
    hr => "hr",
    meta => "meta",
    link => "link",
}

// SVG
tags! {
    path => "path",
    circle => "circle",
    rect => "rect",
    line => "line",
    polygon => "polygon",
    ellipse => "ellipse",
    g => "g",
}

/// SVG container with the SVG namespace preset
pub fn svg() -> Element {
    Element::new("svg").attr("xmlns", "http://www.w3.org/2000/svg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_has_namespace() {
        let html = svg().attr("viewBox", "0 0 24 24").child(circle().attr("r", 4)).to_html();
        assert_eq!(
            html,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle r="4"></circle></svg>"#
        );
    }

    #[test]
    fn test_svg_namespace_can_be_overridden() {
        let html = svg().attr("xmlns", "urn:custom").to_html();
        assert_eq!(html, r#"<svg xmlns="urn:custom"></svg>"#);
    }

    #[test]
    fn test_fragment_wraps_in_div() {
        let html = fragment([text("a"), text("b")]).to_html();
        assert_eq!(html, "<div>ab</div>");
    }

    #[test]
    fn test_main_el_renders_main() {
        assert_eq!(main_el().to_html(), "<main></main>");
    }
}
