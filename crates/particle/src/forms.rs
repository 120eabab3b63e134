// File: src/forms.rs
// Purpose: Field validators and a generated form component

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::component::Component;
use crate::script::on_submit_prevent;
use crate::vdom::{br, button, form, input_field, label, Element};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s\-\+\(\)]+").unwrap());
static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s]+").unwrap());

/// Single-value checks. Patterns match from the start of the value.
pub struct FormValidator;

impl FormValidator {
    /// Non-empty after trimming
    pub fn required(value: &str) -> bool {
        !value.trim().is_empty()
    }

    pub fn email(value: &str) -> bool {
        EMAIL.is_match(value)
    }

    /// Length in characters
    pub fn min_length(value: &str, length: usize) -> bool {
        value.chars().count() >= length
    }

    pub fn max_length(value: &str, length: usize) -> bool {
        value.chars().count() <= length
    }

    pub fn pattern(value: &str, pattern: &Regex) -> bool {
        pattern.find(value).is_some_and(|m| m.start() == 0)
    }

    pub fn phone(value: &str) -> bool {
        PHONE.is_match(value)
    }

    pub fn url(value: &str) -> bool {
        URL.is_match(value)
    }
}

#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    Email,
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
    Phone,
    Url,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Email => "email",
            Rule::MinLength(_) => "min_length",
            Rule::MaxLength(_) => "max_length",
            Rule::Pattern(_) => "pattern",
            Rule::Phone => "phone",
            Rule::Url => "url",
        }
    }

    pub fn check(&self, value: &str) -> bool {
        match self {
            Rule::Required => FormValidator::required(value),
            Rule::Email => FormValidator::email(value),
            Rule::MinLength(n) => FormValidator::min_length(value, *n),
            Rule::MaxLength(n) => FormValidator::max_length(value, *n),
            Rule::Pattern(re) => FormValidator::pattern(value, re),
            Rule::Phone => FormValidator::phone(value),
            Rule::Url => FormValidator::url(value),
        }
    }

    fn message(&self, field: &str) -> String {
        match self {
            Rule::Required => format!("{} is required", field),
            Rule::Email => format!("{} must be a valid email address", field),
            Rule::MinLength(n) => format!("{} must be at least {} characters", field, n),
            Rule::MaxLength(n) => format!("{} must be at most {} characters", field, n),
            Rule::Pattern(_) => format!("{} has an invalid format", field),
            Rule::Phone => format!("{} must be a valid phone number", field),
            Rule::Url => format!("{} must be a valid URL", field),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub rule: &'static str,
    pub message: String,
}

/// One form field: markup attributes plus validation rules
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub id: Option<String>,
    pub field_type: String,
    pub label: Option<String>,
    pub required: bool,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            field_type: "text".to_string(),
            label: None,
            required: false,
            rules: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn field_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = field_type.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn element_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    pub fn label_text(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Errors for `value`. An empty optional field skips its other rules.
    pub fn validate(&self, value: &str) -> Vec<ValidationError> {
        if !FormValidator::required(value) {
            return if self.required {
                vec![self.error(&Rule::Required)]
            } else {
                Vec::new()
            };
        }
        self.rules
            .iter()
            .filter(|rule| !rule.check(value))
            .map(|rule| self.error(rule))
            .collect()
    }

    fn error(&self, rule: &Rule) -> ValidationError {
        ValidationError {
            field: self.name.clone(),
            rule: rule.name(),
            message: rule.message(self.label_text()),
        }
    }

    fn render(&self) -> [Element; 3] {
        let id = self.element_id();
        [
            label().attr("for", id).text(self.label_text()),
            input_field()
                .attr("type", self.field_type.as_str())
                .attr("id", id)
                .attr("name", self.name.as_str())
                .attr("required", self.required.then_some("required")),
            br(),
        ]
    }
}

/// Validate submitted `values` (e.g. a JSON body) against `fields`.
/// Strings are checked as-is, numbers and booleans by their JSON text, and
/// missing or null values as empty.
pub fn validate_form(fields: &[FieldSpec], values: &Map<String, Value>) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = fields
        .iter()
        .flat_map(|field| {
            let value = match values.get(&field.name) {
                Some(Value::String(s)) => s.clone(),
                None | Some(Value::Null) => String::new(),
                Some(other) => other.to_string(),
            };
            field.validate(&value)
        })
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A form with a label, input and line break per field and a submit button.
/// `on_submit` is raw JS run after the default submit is prevented.
pub fn form_component(fields: Vec<FieldSpec>, on_submit: impl Into<String>) -> impl Component + Clone {
    let on_submit = on_submit.into();
    move || {
        let code = on_submit.clone();
        form()
            .on("submit", on_submit_prevent(move |s| s.custom(code)))
            .children(fields.iter().flat_map(FieldSpec::render))
            .child(button().attr("type", "submit").text("Submit"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("ada.lovelace+x@mail.example.org", true)]
    #[case("ada@", false)]
    #[case("not an email", false)]
    fn test_email(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(FormValidator::email(value), expected);
    }

    #[test]
    fn test_simple_validators() {
        assert!(FormValidator::required(" x "));
        assert!(!FormValidator::required("   "));
        assert!(FormValidator::min_length("héllo", 5));
        assert!(!FormValidator::max_length("héllo", 4));
        assert!(FormValidator::phone("+1 (555) 010-2000"));
        assert!(!FormValidator::phone("call me"));
        assert!(FormValidator::url("https://example.com/a"));
        assert!(!FormValidator::url("ftp://example.com"));
    }

    #[test]
    fn test_pattern_matches_from_start() {
        let digits = Regex::new(r"\d+").unwrap();
        assert!(FormValidator::pattern("42abc", &digits));
        assert!(!FormValidator::pattern("abc42", &digits));
    }

    #[test]
    fn test_validate_form() {
        let fields = vec![
            FieldSpec::new("email").required().rule(Rule::Email),
            FieldSpec::new("name").label("Full name").rule(Rule::MinLength(2)),
            FieldSpec::new("site").rule(Rule::Url),
        ];

        let ok = json!({"email": "a@b.io", "name": "Al"});
        assert_eq!(validate_form(&fields, ok.as_object().unwrap()), Ok(()));

        let bad = json!({"name": "A", "site": "nope"});
        let errors = validate_form(&fields, bad.as_object().unwrap()).unwrap_err();
        let summary: Vec<(&str, &str)> = errors.iter().map(|e| (e.field.as_str(), e.rule)).collect();
        assert_eq!(summary, vec![("email", "required"), ("name", "min_length"), ("site", "url")]);
        assert_eq!(errors[1].message, "Full name must be at least 2 characters");
    }

    #[test]
    fn test_form_component_markup() {
        let contact = form_component(
            vec![
                FieldSpec::new("email").field_type("email").label("Email").required(),
                FieldSpec::new("note").id("note-input"),
            ],
            "sendContact(event)",
        );
        let html = contact.render_html();

        assert!(html.starts_with("<form onsubmit=\"event.preventDefault(); sendContact(event)"));
        assert!(html.contains(
            r#"<label for="email">Email</label><input type="email" id="email" name="email" required="required" /><br />"#
        ));
        assert!(html.contains(r#"<label for="note-input">note</label><input type="text" id="note-input" name="note" /><br />"#));
        assert!(html.ends_with(r#"<button type="submit">Submit</button></form>"#));
    }
}
