// File: src/demo.rs
// Purpose: Demo application wiring pages, API routes and middleware together

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use particle::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::{Arc, RwLock};
use tracing::info;
use uuid::Uuid;

/// API prefixes that require a live session
pub const PROTECTED_PREFIXES: [&str; 1] = ["/api/admin"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct NewTodo {
    title: String,
}

/// In-memory todo list behind the `/api/todos` routes
#[derive(Debug, Clone, Default)]
pub struct TodoStore {
    items: Arc<RwLock<Vec<Todo>>>,
}

impl TodoStore {
    pub fn list(&self) -> Vec<Todo> {
        self.items.read().map(|items| items.clone()).unwrap_or_default()
    }

    pub fn add(&self, title: impl Into<String>) -> Todo {
        let todo = Todo {
            id: Uuid::new_v4(),
            title: title.into(),
            done: false,
            created_at: Utc::now(),
        };
        let mut items = self.items.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        items.push(todo.clone());
        todo
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        let mut items = self.items.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = items.len();
        items.retain(|todo| &todo.id != id);
        items.len() != before
    }
}

// ===== Pages =====

fn layout(content: Element) -> Element {
    div().class("container").children([
        nav().class("nav").children([
            a().attr("href", "#/").text("Home"),
            a().attr("href", "#/about").text("About"),
            a().attr("href", "#/users/1").text("User 1"),
            a().attr("href", "#/contact").text("Contact"),
        ]),
        main_el().child(content),
    ])
}

fn home_page() -> Element {
    layout(div().children([
        h1().text("Particle"),
        p().text("Server-rendered components with a hash router."),
        section().class("counter").children([
            span().id("count").text("0"),
            button()
                .id("dec")
                .on("click", on_click(|s| s.decrement_counter("count")))
                .text("-"),
            button()
                .id("inc")
                .on("click", on_click(|s| s.increment_counter("count")))
                .text("+"),
        ]),
        form()
            .id("todo-form")
            .on(
                "submit",
                on_submit_prevent(|s| {
                    s.append_item("todos", Script::value_of("todo-input"))
                        .clear_input("todo-input")
                }),
            )
            .children([
                input_field()
                    .id("todo-input")
                    .attr("type", "text")
                    .attr("placeholder", "What needs doing?"),
                button().attr("type", "submit").text("Add"),
            ]),
        ul().id("todos"),
    ]))
}

fn about_page() -> Element {
    layout(div().children([
        h1().text("About"),
        p().id("about-text").text("Particle renders a virtual element tree to HTML."),
        button()
            .on("click", on_click(|s| s.toggle_visibility("about-text")))
            .text("Toggle"),
    ]))
}

fn user_page() -> Element {
    layout(div().children([
        h1().text("User profile"),
        p().id("user-id").text("Loading..."),
        button()
            .on(
                "click",
                on_click(|s| s.custom("document.getElementById('user-id').textContent = window.routeParams.id")),
            )
            .text("Show id"),
    ]))
}

/// Fields of the contact form, shared by the page and `/api/contact`
pub fn contact_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("name").label("Name").required().rule(Rule::MinLength(2)),
        FieldSpec::new("email").field_type("email").label("Email").required().rule(Rule::Email),
        FieldSpec::new("phone").field_type("tel").label("Phone").rule(Rule::Phone),
        FieldSpec::new("message").label("Message").rule(Rule::MaxLength(500)),
    ]
}

const CONTACT_SUBMIT_JS: &str = "fetch('/api/contact', { method: 'POST', headers: { 'Content-Type': 'application/json' }, \
body: JSON.stringify(Object.fromEntries(new FormData(event.target))) })";

fn contact_page() -> Element {
    let contact_form = form_component(contact_fields(), CONTACT_SUBMIT_JS);
    layout(div().children([
        h1().text("Contact").into_node(),
        contact_form.render(),
    ]))
}

fn not_found_page() -> Element {
    layout(div().children([
        h1().text("Not found"),
        a().attr("href", "#/").text("Back home"),
    ]))
}

pub fn client_router(config: &Config) -> ClientRouter {
    let mut router = ClientRouter::new();
    router
        .add_route("/", home_page)
        .add_route("/about", about_page)
        .add_route("/users/:id", user_page)
        .add_route("/contact", contact_page)
        .set_not_found(not_found_page)
        .set_transition_duration(config.routing.transition_ms);
    router
}

// ===== API =====

fn upload_summary(req: &Request) -> Vec<Value> {
    let mut names: Vec<&String> = req.files.keys().collect();
    names.sort();
    names
        .into_iter()
        .filter_map(|name| match &req.files[name] {
            FormField::File(file) => Some(json!({
                "field": name,
                "filename": file.filename,
                "size": file.size,
            })),
            FormField::Text(_) => None,
        })
        .collect()
}

/// Demo-wide counters kept in a [`Store`]
pub fn stats_store() -> Store {
    let mut initial = Map::new();
    initial.insert("contacts".to_string(), json!(0));
    let store = Store::new(initial);
    store.add_reducer("contact_received", |state, _action| {
        let mut next = state.clone();
        let count = next.get("contacts").and_then(Value::as_u64).unwrap_or(0);
        next.insert("contacts".to_string(), json!(count + 1));
        next
    });
    store
}

fn register_api(app: &App, todos: TodoStore, stats: Store) {
    let max_age = app.config().session.max_age();

    app.add_api_route("/api/health", Method::GET, |req| {
        Ok(JsonEnvelope::success(
            Some(json!({"status": "ok", "sessions": req.sessions().len()})),
            None,
        )
        .into())
    });

    app.add_api_route("/api/login", Method::POST, move |req| {
        let username = match req.json_field("username").and_then(Value::as_str) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Ok(error_response(StatusCode::BAD_REQUEST, "username is required").into()),
        };
        let mut data = Map::new();
        data.insert("user".to_string(), Value::String(username.clone()));

        let mut res = Response::new();
        req.start_session(data, max_age, &mut res);
        res.json(JsonEnvelope::success(Some(json!({"user": username})), Some("Logged in")));
        info!(user = %username, "session started");
        Ok(res.into())
    });

    app.add_api_route("/api/logout", Method::POST, |req| {
        let mut res = Response::new();
        let ended = req.end_session(&mut res);
        res.json(JsonEnvelope::success(Some(json!({"ended": ended})), Some("Logged out")));
        Ok(res.into())
    });

    app.add_api_route("/api/admin/stats", Method::GET, |req| {
        let user = req
            .session
            .as_ref()
            .and_then(|data| data.get("user"))
            .cloned()
            .unwrap_or(Value::Null);
        Ok(JsonEnvelope::success(
            Some(json!({"user": user, "active_sessions": req.sessions().len()})),
            None,
        )
        .into())
    });

    app.add_api_route("/api/upload", Method::POST, |req| {
        let files = upload_summary(req);
        if files.is_empty() {
            return Ok(error_response(StatusCode::BAD_REQUEST, "No files uploaded").into());
        }
        Ok(JsonEnvelope::success(Some(json!({"files": files})), Some("Upload received")).into())
    });

    app.add_api_route("/api/users/:id", Method::GET, |req| {
        let id = req.param("id").unwrap_or_default();
        Ok(JsonEnvelope::success(Some(json!({"id": id, "name": format!("User {}", id)})), None).into())
    });

    app.add_api_route("/api/contact", Method::POST, move |req| {
        let values = req.json_body.as_object().cloned().unwrap_or_default();
        if let Err(errors) = validate_form(&contact_fields(), &values) {
            let mut res = Response::new();
            res.set_status(StatusCode::UNPROCESSABLE_ENTITY).json(JsonEnvelope::error(
                "Validation failed",
                StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                Some(serde_json::to_value(&errors)?),
            ));
            return Ok(res.into());
        }
        stats.dispatch(Action::new("contact_received").with_payload(values.get("email").cloned().unwrap_or(Value::Null)));
        let total = stats.get_state().get("contacts").cloned().unwrap_or(Value::Null);
        Ok(JsonEnvelope::success(Some(json!({"received": total})), Some("Message sent")).into())
    });

    let store = todos.clone();
    app.add_api_route("/api/todos", Method::GET, move |_req| {
        Ok(JsonEnvelope::success(Some(serde_json::to_value(store.list())?), None).into())
    });

    let store = todos.clone();
    app.add_api_route("/api/todos", Method::POST, move |req| {
        let new: NewTodo = match req.json() {
            Ok(new) => new,
            Err(err) => {
                return Ok(error_response(StatusCode::BAD_REQUEST, format!("Invalid todo: {}", err)).into());
            }
        };
        let todo = store.add(new.title);
        let mut res = Response::new();
        res.set_status(StatusCode::CREATED);
        res.json(JsonEnvelope::success(Some(serde_json::to_value(&todo)?), Some("Todo created")));
        Ok(res.into())
    });

    let store = todos;
    app.add_api_route("/api/todos/:id", Method::DELETE, move |req| {
        let id = req.param("id").and_then(|raw| Uuid::parse_str(raw).ok());
        match id {
            Some(id) if store.remove(&id) => Ok(JsonEnvelope::success(None, Some("Todo deleted")).into()),
            _ => Ok(error_response(StatusCode::NOT_FOUND, "Todo not found").into()),
        }
    });
}

/// Demo app: four pages, the JSON API and auth on `/api/admin`
pub fn build_app(config: Config) -> App {
    let router = client_router(&config);
    let app = App::with_config(home_page, config);
    app.use_auth(PROTECTED_PREFIXES);
    app.use_router(router);
    register_api(&app, TodoStore::default(), stats_store());
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_todo_store() {
        let store = TodoStore::default();
        let todo = store.add("write docs");
        assert_eq!(store.list(), vec![todo.clone()]);
        assert!(store.remove(&todo.id));
        assert!(!store.remove(&todo.id));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_home_page_handlers() {
        let html = home_page().to_html();
        assert!(html.contains(r#"<ul id="todos"></ul>"#));
        assert!(html.contains("onsubmit=\"event.preventDefault();"));
        assert!(html.contains(r#"id="todo-input""#));
    }

    #[test]
    fn test_router_pages() {
        let router = client_router(&Config::default());
        assert_eq!(router.patterns(), vec!["/", "/about", "/users/:id", "/contact"]);
        assert!(router.render_path("/contact").contains(r#"name="email" required="required""#));
        assert!(router.render_path("/missing").contains("Not found"));
    }
}
