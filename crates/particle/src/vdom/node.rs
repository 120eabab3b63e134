// File: src/vdom/node.rs
// Purpose: Virtual element tree and its HTML serializer

use crate::escape::escape_html;
use crate::script::EventHandler;
use crate::value::AttrValue;
use crate::vdom::props::{PropValue, Props, Style};

/// Tags rendered as `<tag ... />` that never carry children
pub const SELF_CLOSING_TAGS: [&str; 6] = ["img", "br", "hr", "input", "meta", "link"];

pub fn is_self_closing(tag: &str) -> bool {
    SELF_CLOSING_TAGS.contains(&tag)
}

/// A node in the virtual tree: an element or an escaped text literal
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_html(out),
            Node::Text(text) => out.push_str(&escape_html(text)),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl From<&String> for Node {
    fn from(text: &String) -> Self {
        Node::Text(text.clone())
    }
}

impl From<i32> for Node {
    fn from(n: i32) -> Self {
        Node::Text(n.to_string())
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Text(n.to_string())
    }
}

impl From<usize> for Node {
    fn from(n: usize) -> Self {
        Node::Text(n.to_string())
    }
}

/// One tag with its props and ordered children.
///
/// Built with chained setters; every setter consumes and returns the element.
///
/// ```
/// use particle::vdom::{button, div, text};
/// use particle::script::on_click;
///
/// let html = div()
///     .id("counter")
///     .class("card")
///     .child(text("0"))
///     .child(button().on("click", on_click(|s| s.increment_counter("counter"))).text("+"))
///     .to_html();
/// assert!(html.starts_with(r#"<div id="counter" class="card">0<button onclick="#));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    props: Props,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    pub fn is_self_closing(&self) -> bool {
        is_self_closing(&self.tag)
    }

    /// The framework-internal `key` prop, if set
    pub fn key(&self) -> Option<String> {
        match self.props.get("key") {
            Some(PropValue::Attribute(value)) => value.render(),
            _ => None,
        }
    }

    /// Sets a prop by name, classifying it once.
    ///
    /// `class`/`className` become class props, `style` becomes an inline
    /// style, `on_<event>` becomes a raw-code event handler, anything else
    /// is a plain attribute.
    pub fn attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        let value = value.into();
        let classified = match (name, value) {
            ("class" | "className", value) => value.render().map(PropValue::Class),
            ("style", value) => value.render().map(|s| PropValue::Style(Style::Inline(s))),
            (event, value) if event.starts_with("on_") => value
                .render()
                .map(|code| PropValue::Event(EventHandler::Code(code))),
            (_, value) => Some(PropValue::Attribute(value)),
        };
        match classified {
            Some(prop) => self.props.set(name, prop),
            None => {
                self.props.remove(name);
            }
        }
        self
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id.into())
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.props.set("class", PropValue::Class(class.into()));
        self
    }

    /// Secondary class list, appended after `class` when both are present
    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.props.set("className", PropValue::Class(class.into()));
        self
    }

    pub fn style(mut self, style: impl Into<Style>) -> Self {
        self.props.set("style", PropValue::Style(style.into()));
        self
    }

    /// Attaches a handler for `event` (`"click"`, `"submit"`, ...)
    pub fn on(mut self, event: &str, handler: impl Into<EventHandler>) -> Self {
        self.props.set(format!("on_{}", event), PropValue::Event(handler.into()));
        self
    }

    pub fn with_key(self, key: impl Into<AttrValue>) -> Self {
        self.attr("key", key)
    }

    pub fn with_ref(self, name: impl Into<String>) -> Self {
        self.attr("ref", name.into())
    }

    pub fn prop(mut self, name: impl Into<String>, value: PropValue) -> Self {
        self.props.set(name, value);
        self
    }

    /// Appends a child. Self-closing tags drop children.
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        if self.is_self_closing() {
            tracing::warn!(tag = %self.tag, "ignoring child of self-closing element");
            return self;
        }
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        for node in nodes {
            self = self.child(node);
        }
        self
    }

    /// Appends an escaped text child
    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(Node::Text(content.into()))
    }

    pub fn into_node(self) -> Node {
        Node::Element(self)
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let attrs = self.props.render_attrs();

        if self.is_self_closing() {
            out.push('<');
            out.push_str(&self.tag);
            out.push_str(&attrs);
            out.push_str(" />");
            return;
        }

        out.push('<');
        out.push_str(&self.tag);
        out.push_str(&attrs);
        out.push('>');
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Script;
    use crate::vdom::props::StyleMap;
    use crate::vdom::tags::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_node_is_escaped() {
        assert_eq!(text("<b>&</b>").to_html(), "&lt;b&gt;&amp;&lt;/b&gt;");
    }

    #[test]
    fn test_nested_elements() {
        let html = ul()
            .class("list")
            .child(li().text("one"))
            .child(li().text("two"))
            .to_html();
        assert_eq!(html, r#"<ul class="list"><li>one</li><li>two</li></ul>"#);
    }

    #[test]
    fn test_self_closing_tags() {
        assert_eq!(br().to_html(), "<br />");
        assert_eq!(
            img().attr("src", "/a.png").attr("alt", "A").to_html(),
            r#"<img src="/a.png" alt="A" />"#
        );
    }

    #[test]
    fn test_children_builder_and_getter() {
        let list = ul().children([li().text("a"), li().text("b")]);
        assert_eq!(list.child_nodes().len(), 2);
        assert_eq!(list.child_nodes()[0].to_html(), "<li>a</li>");
        assert_eq!(list.to_html(), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_self_closing_ignores_children() {
        let el = input_field().attr("type", "text").text("nope");
        assert!(el.child_nodes().is_empty());
        assert_eq!(el.to_html(), r#"<input type="text" />"#);
    }

    #[test]
    fn test_all_self_closing_tags_have_no_closing_tag() {
        for tag in SELF_CLOSING_TAGS {
            let html = create_element(tag).child(span().text("x")).to_html();
            assert_eq!(html, format!("<{} />", tag));
            assert!(!html.contains("</"));
        }
    }

    #[test]
    fn test_class_and_class_name_merge() {
        let html = div().class("a").class_name("b").to_html();
        assert_eq!(html, r#"<div class="a b"></div>"#);
    }

    #[test]
    fn test_class_name_alone_renders_as_class() {
        let html = div().id("x").class_name("b").to_html();
        assert_eq!(html, r#"<div id="x" class="b"></div>"#);
    }

    #[test]
    fn test_class_name_before_class_keeps_class_position() {
        let html = div().class_name("b").id("x").class("a").to_html();
        assert_eq!(html, r#"<div id="x" class="a b"></div>"#);
    }

    #[test]
    fn test_style_map() {
        let html = div()
            .style(StyleMap::new().set("background_color", "red").set("margin_top", "4px"))
            .to_html();
        assert_eq!(
            html,
            r#"<div style="background-color: red; margin-top: 4px"></div>"#
        );
    }

    #[test]
    fn test_underscore_attributes_become_dashes() {
        let html = div().attr("data_user_id", 7).attr("aria_label", "x").to_html();
        assert_eq!(html, r#"<div data-user-id="7" aria-label="x"></div>"#);
    }

    #[test]
    fn test_key_and_ref_are_not_rendered() {
        let el = li().with_key("row-1").with_ref("item").text("a");
        assert_eq!(el.key(), Some("row-1".to_string()));
        assert_eq!(el.to_html(), "<li>a</li>");
    }

    #[test]
    fn test_none_attribute_is_omitted() {
        let required: Option<&str> = None;
        let html = input_field().attr("name", "email").attr("required", required).to_html();
        assert_eq!(html, r#"<input name="email" />"#);
    }

    #[test]
    fn test_none_removes_existing_attribute() {
        let html = input_field().attr("required", "required").attr("required", None::<&str>).to_html();
        assert_eq!(html, "<input />");
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let html = div().attr("title", r#"a "quoted" <tag> & more"#).to_html();
        assert_eq!(
            html,
            r#"<div title="a &quot;quoted&quot; &lt;tag&gt; &amp; more"></div>"#
        );
    }

    #[test]
    fn test_event_handlers_render_after_attributes() {
        let html = button()
            .on("click", Script::new().navigate("/about"))
            .attr("type", "button")
            .text("Go")
            .to_html();
        assert_eq!(
            html,
            r#"<button type="button" onclick="window.location.hash = &#x27;/about&#x27;;">Go</button>"#
        );
    }

    #[test]
    fn test_raw_event_string_passes_through() {
        let html = button().attr("on_click", "doThing()").to_html();
        assert_eq!(html, r#"<button onclick="doThing()"></button>"#);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let build = || {
            div()
                .class("x")
                .style(StyleMap::new().set("color", "red"))
                .on("click", Script::new().toggle_class("x", "on"))
                .child(p().text("hi"))
        };
        let el = build();
        assert_eq!(el.to_html(), el.to_html());
        assert_eq!(el.to_html(), build().to_html());
    }

    #[test]
    fn test_number_children_are_stringified() {
        assert_eq!(span().child(42).to_html(), "<span>42</span>");
    }
}
