// File: src/script.rs
// Purpose: Declarative event handlers compiled to client-side JS statements

use crate::escape::escape_js;

/// A JS expression used as a value inside a statement
#[derive(Debug, Clone, PartialEq)]
pub enum JsExpr {
    /// String literal; quoted and escaped on compile
    Literal(String),
    /// Current `.value` of the input with this id
    InputValue(String),
    /// Trusted raw expression
    Raw(String),
}

impl JsExpr {
    fn compile(&self) -> String {
        match self {
            JsExpr::Literal(s) => format!("'{}'", escape_js(s)),
            JsExpr::InputValue(id) => format!("{}.value", by_id(id)),
            JsExpr::Raw(code) => code.clone(),
        }
    }
}

impl From<&str> for JsExpr {
    fn from(s: &str) -> Self {
        JsExpr::Literal(s.to_string())
    }
}

impl From<String> for JsExpr {
    fn from(s: String) -> Self {
        JsExpr::Literal(s)
    }
}

/// One declarative UI operation
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Alert(String),
    Log(Vec<String>),
    SetText { id: String, text: String },
    ToggleClass { id: String, class: String },
    AddClass { id: String, class: String },
    RemoveClass { id: String, class: String },
    SetStyle { id: String, property: String, value: String },
    Navigate(String),
    PreventDefault,
    StopPropagation,
    IncrementCounter(String),
    DecrementCounter(String),
    ToggleVisibility(String),
    AppendItem { list_id: String, item: JsExpr },
    ClearInput(String),
    Custom(String),
}

fn by_id(id: &str) -> String {
    format!("document.getElementById('{}')", escape_js(id))
}

impl Statement {
    fn compile(&self) -> String {
        match self {
            Statement::Alert(message) => format!("alert('{}')", escape_js(message)),
            Statement::Log(args) => {
                let args: Vec<String> = args.iter().map(|a| format!("'{}'", escape_js(a))).collect();
                format!("console.log({})", args.join(", "))
            }
            Statement::SetText { id, text } => {
                format!("{}.textContent = '{}'", by_id(id), escape_js(text))
            }
            Statement::ToggleClass { id, class } => {
                format!("{}.classList.toggle('{}')", by_id(id), escape_js(class))
            }
            Statement::AddClass { id, class } => {
                format!("{}.classList.add('{}')", by_id(id), escape_js(class))
            }
            Statement::RemoveClass { id, class } => {
                format!("{}.classList.remove('{}')", by_id(id), escape_js(class))
            }
            Statement::SetStyle { id, property, value } => format!(
                "{}.style['{}'] = '{}'",
                by_id(id),
                escape_js(property),
                escape_js(value)
            ),
            Statement::Navigate(path) => format!("window.location.hash = '{}'", escape_js(path)),
            Statement::PreventDefault => "event.preventDefault()".to_string(),
            Statement::StopPropagation => "event.stopPropagation()".to_string(),
            Statement::IncrementCounter(id) => format!(
                "{{ let el = {}; el.textContent = (parseInt(el.textContent) || 0) + 1; }}",
                by_id(id)
            ),
            Statement::DecrementCounter(id) => format!(
                "{{ let el = {}; el.textContent = (parseInt(el.textContent) || 0) - 1; }}",
                by_id(id)
            ),
            Statement::ToggleVisibility(id) => format!(
                "{{ let el = {}; el.style.display = el.style.display === 'none' ? 'block' : 'none'; }}",
                by_id(id)
            ),
            Statement::AppendItem { list_id, item } => format!(
                "{{ let list = {}; let li = document.createElement('li'); li.textContent = {}; list.appendChild(li); }}",
                by_id(list_id),
                item.compile()
            ),
            Statement::ClearInput(id) => format!("{}.value = ''", by_id(id)),
            Statement::Custom(code) => code.clone(),
        }
    }
}

/// Compiles statements, in order, into one `; `-joined JS string.
///
/// An empty list compiles to an empty string.
pub fn compile(statements: &[Statement]) -> String {
    if statements.is_empty() {
        return String::new();
    }
    let body: Vec<String> = statements.iter().map(Statement::compile).collect();
    format!("{};", body.join("; "))
}

/// Fluent builder collecting [`Statement`]s in call order
///
/// ```
/// use particle::script::Script;
///
/// let js = Script::new()
///     .prevent_default()
///     .append_item("todos", Script::value_of("new-todo"))
///     .clear_input("new-todo")
///     .to_js();
/// assert!(js.starts_with("event.preventDefault(); { let list = "));
/// assert!(js.ends_with("document.getElementById('new-todo').value = '';"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    statements: Vec<Statement>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// A script that starts with `event.preventDefault()`
    pub fn prevented() -> Self {
        Self::new().prevent_default()
    }

    /// Expression reading an input's current value
    pub fn value_of(input_id: impl Into<String>) -> JsExpr {
        JsExpr::InputValue(input_id.into())
    }

    pub fn push(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    pub fn alert(self, message: impl Into<String>) -> Self {
        self.push(Statement::Alert(message.into()))
    }

    pub fn log<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Statement::Log(args.into_iter().map(Into::into).collect()))
    }

    pub fn set_text(self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.push(Statement::SetText { id: id.into(), text: text.into() })
    }

    pub fn toggle_class(self, id: impl Into<String>, class: impl Into<String>) -> Self {
        self.push(Statement::ToggleClass { id: id.into(), class: class.into() })
    }

    pub fn add_class(self, id: impl Into<String>, class: impl Into<String>) -> Self {
        self.push(Statement::AddClass { id: id.into(), class: class.into() })
    }

    pub fn remove_class(self, id: impl Into<String>, class: impl Into<String>) -> Self {
        self.push(Statement::RemoveClass { id: id.into(), class: class.into() })
    }

    pub fn set_style(
        self,
        id: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.push(Statement::SetStyle {
            id: id.into(),
            property: property.into(),
            value: value.into(),
        })
    }

    /// Client-side navigation through the hash router
    pub fn navigate(self, path: impl Into<String>) -> Self {
        self.push(Statement::Navigate(path.into()))
    }

    pub fn prevent_default(self) -> Self {
        self.push(Statement::PreventDefault)
    }

    pub fn stop_propagation(self) -> Self {
        self.push(Statement::StopPropagation)
    }

    pub fn increment_counter(self, id: impl Into<String>) -> Self {
        self.push(Statement::IncrementCounter(id.into()))
    }

    pub fn decrement_counter(self, id: impl Into<String>) -> Self {
        self.push(Statement::DecrementCounter(id.into()))
    }

    pub fn toggle_visibility(self, id: impl Into<String>) -> Self {
        self.push(Statement::ToggleVisibility(id.into()))
    }

    /// Appends an `<li>` to the list. Plain strings are inserted as escaped
    /// literals; use [`Script::value_of`] to insert an input's value.
    pub fn append_item(self, list_id: impl Into<String>, item: impl Into<JsExpr>) -> Self {
        self.push(Statement::AppendItem { list_id: list_id.into(), item: item.into() })
    }

    pub fn clear_input(self, id: impl Into<String>) -> Self {
        self.push(Statement::ClearInput(id.into()))
    }

    /// Trusted raw JS, inserted verbatim
    pub fn custom(self, code: impl Into<String>) -> Self {
        self.push(Statement::Custom(code.into()))
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn to_js(&self) -> String {
        compile(&self.statements)
    }
}

/// Value of an `on_<event>` prop
#[derive(Debug, Clone, PartialEq)]
pub enum EventHandler {
    Script(Script),
    /// Already-compiled JS, passed through untouched
    Code(String),
}

impl EventHandler {
    pub fn to_js(&self) -> String {
        match self {
            EventHandler::Script(script) => script.to_js(),
            EventHandler::Code(code) => code.clone(),
        }
    }
}

impl From<Script> for EventHandler {
    fn from(script: Script) -> Self {
        EventHandler::Script(script)
    }
}

impl From<&str> for EventHandler {
    fn from(code: &str) -> Self {
        EventHandler::Code(code.to_string())
    }
}

impl From<String> for EventHandler {
    fn from(code: String) -> Self {
        EventHandler::Code(code)
    }
}

pub fn on_click(build: impl FnOnce(Script) -> Script) -> EventHandler {
    build(Script::new()).into()
}

pub fn on_click_prevent(build: impl FnOnce(Script) -> Script) -> EventHandler {
    build(Script::prevented()).into()
}

pub fn on_submit_prevent(build: impl FnOnce(Script) -> Script) -> EventHandler {
    build(Script::prevented()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_statements_compose_in_order() {
        let js = Script::new()
            .set_text("title", "Hello")
            .add_class("title", "big")
            .navigate("/home")
            .to_js();
        assert_eq!(
            js,
            "document.getElementById('title').textContent = 'Hello'; \
             document.getElementById('title').classList.add('big'); \
             window.location.hash = '/home';"
        );
    }

    #[test]
    fn test_empty_script_compiles_to_empty_string() {
        assert_eq!(Script::new().to_js(), "");
    }

    #[test]
    fn test_single_quote_in_value_is_escaped() {
        let js = Script::new().append_item("todos", "Buy Bob's milk").to_js();
        assert!(js.contains(r"li.textContent = 'Buy Bob\'s milk';"));
        assert!(!js.contains("Bob's"));
    }

    #[test]
    fn test_quote_in_element_id_is_escaped() {
        let js = Script::new().clear_input("it's").to_js();
        assert_eq!(js, r"document.getElementById('it\'s').value = '';");
    }

    #[test]
    fn test_append_input_value() {
        let js = Script::new().append_item("list", Script::value_of("entry")).to_js();
        assert_eq!(
            js,
            "{ let list = document.getElementById('list'); let li = document.createElement('li'); \
             li.textContent = document.getElementById('entry').value; list.appendChild(li); };"
        );
    }

    #[test]
    fn test_counters_are_block_scoped() {
        let js = Script::new().increment_counter("a").decrement_counter("b").to_js();
        assert_eq!(js.matches("{ let el").count(), 2);
        assert!(js.contains("+ 1; }"));
        assert!(js.contains("- 1; }"));
    }

    #[test]
    fn test_prevented_handlers() {
        let submit = on_submit_prevent(|s| s.clear_input("q"));
        assert_eq!(
            submit.to_js(),
            "event.preventDefault(); document.getElementById('q').value = '';"
        );
        let click = on_click_prevent(|s| s.stop_propagation());
        assert_eq!(click.to_js(), "event.preventDefault(); event.stopPropagation();");
    }

    #[test]
    fn test_custom_code_is_verbatim() {
        let js = on_click(|s| s.custom("window.count++").alert("done")).to_js();
        assert_eq!(js, "window.count++; alert('done');");
    }

    #[test]
    fn test_log_quotes_every_argument() {
        let js = Script::new().log(["a", "b'c"]).to_js();
        assert_eq!(js, r"console.log('a', 'b\'c');");
    }

    #[test]
    fn test_code_handler_passes_through() {
        let handler: EventHandler = "go()".into();
        assert_eq!(handler.to_js(), "go()");
    }

    #[test]
    fn test_set_style_and_visibility() {
        let js = Script::new()
            .set_style("box", "backgroundColor", "red")
            .toggle_visibility("box")
            .to_js();
        assert!(js.starts_with("document.getElementById('box').style['backgroundColor'] = 'red'; { let el"));
    }

    #[test]
    fn test_statement_list_is_inspectable() {
        let script = Script::prevented().toggle_class("menu", "open");
        assert_eq!(
            script.statements(),
            &[
                Statement::PreventDefault,
                Statement::ToggleClass { id: "menu".into(), class: "open".into() },
            ]
        );
    }
}
