// File: src/vdom/props.rs
// Purpose: Typed element props (attributes, event handlers, styles, classes)

use crate::script::EventHandler;
use crate::value::AttrValue;

/// One prop on an element, classified when the prop is set
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// Plain HTML attribute
    Attribute(AttrValue),
    /// `on_<event>` handler, compiled to a JS statement string on render
    Event(EventHandler),
    /// `style`, either a literal declaration string or a property map
    Style(Style),
    /// `class` or `className`
    Class(String),
}

/// Inline style value
#[derive(Debug, Clone, PartialEq)]
pub enum Style {
    Inline(String),
    Map(StyleMap),
}

impl Style {
    pub fn render(&self) -> String {
        match self {
            Style::Inline(s) => s.clone(),
            Style::Map(map) => map.render(),
        }
    }
}

/// Ordered CSS property map with snake_case keys.
///
/// Keys are converted to dashed CSS names when rendered:
/// `background_color` → `background-color`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, replacing an existing value in place
    pub fn set(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `key-with-dashes: value` pairs joined by `; `
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}: {}", k.replace('_', "-"), v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl From<StyleMap> for Style {
    fn from(map: StyleMap) -> Self {
        Style::Map(map)
    }
}

impl From<&str> for Style {
    fn from(s: &str) -> Self {
        Style::Inline(s.to_string())
    }
}

impl From<String> for Style {
    fn from(s: String) -> Self {
        Style::Inline(s)
    }
}

/// Insertion-ordered prop collection.
///
/// Setting an existing key replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: PropValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the attribute string, including its leading space when
    /// non-empty.
    ///
    /// Plain attributes, styles and classes keep their insertion order; event
    /// handlers follow them in their own insertion order. `key` and `ref` are
    /// framework-internal and never rendered.
    pub(crate) fn render_attrs(&self) -> String {
        let class_name = match self.get("className") {
            Some(PropValue::Class(c)) => Some(c.as_str()),
            _ => None,
        };
        let has_class = matches!(self.get("class"), Some(PropValue::Class(_)));

        let mut attrs: Vec<(String, String)> = Vec::new();
        let mut events: Vec<(String, String)> = Vec::new();

        for (key, value) in self.iter() {
            if key == "key" || key == "ref" {
                continue;
            }
            match value {
                PropValue::Event(handler) => {
                    let event = key.strip_prefix("on_").unwrap_or(key);
                    events.push((format!("on{}", event.replace('_', "-")), handler.to_js()));
                }
                PropValue::Style(style) => attrs.push(("style".to_string(), style.render())),
                PropValue::Class(class) if key == "className" => {
                    if !has_class {
                        attrs.push(("class".to_string(), class.clone()));
                    }
                }
                PropValue::Class(class) => {
                    let merged = match class_name {
                        Some(extra) => format!("{} {}", class, extra),
                        None => class.clone(),
                    };
                    attrs.push(("class".to_string(), merged));
                }
                PropValue::Attribute(attr) => {
                    if let Some(text) = attr.render() {
                        attrs.push((key.replace('_', "-"), text));
                    }
                }
            }
        }

        attrs
            .into_iter()
            .chain(events)
            .map(|(name, value)| format!(" {}=\"{}\"", name, crate::escape::escape_attr(&value)))
            .collect()
    }
}

/// Joins non-empty class names with single spaces
pub fn merge_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> String {
    classes
        .into_iter()
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn conditional_class<'a>(condition: bool, when_true: &'a str, when_false: &'a str) -> &'a str {
    if condition {
        when_true
    } else {
        when_false
    }
}

/// Merges style maps left to right; later values win, first position is kept
pub fn merge_styles<'a>(styles: impl IntoIterator<Item = &'a StyleMap>) -> StyleMap {
    let mut merged = StyleMap::new();
    for style in styles {
        for (k, v) in &style.entries {
            merged.insert(k.clone(), v);
        }
    }
    merged
}
