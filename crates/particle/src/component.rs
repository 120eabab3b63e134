// File: src/component.rs
// Purpose: Renderable units used as the page root and as client routes

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::vdom::Node;

/// Anything that renders to a node tree.
///
/// Closures returning an element (or anything convertible to a [`Node`])
/// are components:
///
/// ```
/// use particle::component::Component;
/// use particle::vdom::h1;
///
/// let home = || h1().text("Home");
/// assert_eq!(home.render().to_html(), "<h1>Home</h1>");
/// ```
pub trait Component: Send + Sync {
    fn render(&self) -> Node;

    fn render_html(&self) -> String {
        self.render().to_html()
    }
}

impl<F, R> Component for F
where
    F: Fn() -> R + Send + Sync,
    R: Into<Node>,
{
    fn render(&self) -> Node {
        self().into()
    }
}

/// Shared component handle
pub type SharedComponent = Arc<dyn Component>;

/// Props for components parameterised at call time
pub type ComponentProps = Map<String, Value>;

/// Wrap `component` so props the caller leaves out fall back to `defaults`.
/// Caller props win.
pub fn with_props<F, R>(defaults: ComponentProps, component: F) -> impl Fn(ComponentProps) -> R
where
    F: Fn(ComponentProps) -> R,
{
    move |props| {
        let mut merged = defaults.clone();
        merged.extend(props);
        component(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vdom::{div, p, span, Element};
    use serde_json::json;

    struct Greeting {
        name: String,
    }

    impl Component for Greeting {
        fn render(&self) -> Node {
            p().text(format!("Hello, {}", self.name)).into()
        }
    }

    #[test]
    fn test_struct_component() {
        let greeting = Greeting { name: "<Ada>".into() };
        assert_eq!(greeting.render_html(), "<p>Hello, &lt;Ada&gt;</p>");
    }

    #[test]
    fn test_closure_component_as_shared() {
        let shared: SharedComponent = Arc::new(|| -> Element { div().id("root") });
        assert_eq!(shared.render_html(), r#"<div id="root"></div>"#);
    }

    #[test]
    fn test_with_props_merges_defaults() {
        let badge = with_props(
            json!({"color": "gray", "label": "new"}).as_object().unwrap().clone(),
            |props: ComponentProps| {
                span()
                    .class(props["color"].as_str().unwrap_or_default())
                    .text(props["label"].as_str().unwrap_or_default())
            },
        );
        let html = badge(json!({"color": "red"}).as_object().unwrap().clone()).to_html();
        assert_eq!(html, r#"<span class="red">new</span>"#);
    }

    #[test]
    fn test_text_component() {
        let plain = || "just text";
        assert_eq!(plain.render_html(), "just text");
    }
}
