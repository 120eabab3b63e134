// File: src/routing/client.rs
// Purpose: Hash-based client router with pre-rendered pages and fade transitions

use particle_router::{Params, RouteTable};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::component::{Component, SharedComponent};

/// Navigation guard stored with a route. Receives the matched params.
pub type Guard = Arc<dyn Fn(&Params) -> bool + Send + Sync>;

const DEFAULT_NOT_FOUND_HTML: &str = "<h1>404 - Page Not Found</h1>";

/// Page routes rendered once at server-render time and embedded, together
/// with a matcher, into an inline client script.
///
/// Guards are recorded per route and can be queried with
/// [`ClientRouter::guard_for`]; the generated script does not call them.
#[derive(Clone)]
pub struct ClientRouter {
    routes: RouteTable<SharedComponent>,
    guards: HashMap<String, Guard>,
    not_found: Option<SharedComponent>,
    transition_ms: u64,
}

impl Default for ClientRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClientRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRouter")
            .field("routes", &self.patterns())
            .field("transition_ms", &self.transition_ms)
            .finish()
    }
}

impl ClientRouter {
    pub fn new() -> Self {
        Self {
            routes: RouteTable::new(),
            guards: HashMap::new(),
            not_found: None,
            transition_ms: 200,
        }
    }

    pub fn add_route(&mut self, path: &str, component: impl Component + 'static) -> &mut Self {
        self.routes.insert(path, Arc::new(component) as SharedComponent);
        self
    }

    pub fn add_guarded_route<G>(
        &mut self,
        path: &str,
        component: impl Component + 'static,
        guard: G,
    ) -> &mut Self
    where
        G: Fn(&Params) -> bool + Send + Sync + 'static,
    {
        self.add_route(path, component);
        self.guards.insert(path.to_string(), Arc::new(guard));
        self
    }

    pub fn set_not_found(&mut self, component: impl Component + 'static) -> &mut Self {
        self.not_found = Some(Arc::new(component));
        self
    }

    pub fn set_transition_duration(&mut self, duration_ms: u64) -> &mut Self {
        self.transition_ms = duration_ms;
        self
    }

    pub fn transition_duration(&self) -> u64 {
        self.transition_ms
    }

    pub fn patterns(&self) -> Vec<&str> {
        self.routes.iter().map(|(pattern, _)| pattern).collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Matched pattern and params for `path`, using the same rules as the
    /// generated client matcher
    pub fn resolve(&self, path: &str) -> Option<(String, Params)> {
        self.routes
            .match_path(path)
            .map(|m| (m.pattern.to_string(), m.params))
    }

    pub fn guard_for(&self, pattern: &str) -> Option<&Guard> {
        self.guards.get(pattern)
    }

    pub fn has_guard(&self, pattern: &str) -> bool {
        self.guards.contains_key(pattern)
    }

    /// HTML of the page `path` resolves to, or the not-found page
    pub fn render_path(&self, path: &str) -> String {
        match self.routes.match_path(path) {
            Some(m) => m.value.render_html(),
            None => self.not_found_html(),
        }
    }

    pub fn not_found_html(&self) -> String {
        self.not_found
            .as_ref()
            .map(|component| component.render_html())
            .unwrap_or_default()
    }

    /// `pattern → pre-rendered HTML`, in registration order
    pub fn render_routes(&self) -> Map<String, Value> {
        self.routes
            .iter()
            .map(|(pattern, component)| (pattern.to_string(), Value::String(component.render_html())))
            .collect()
    }

    /// Inline `<script>` with the route table, the not-found page, the
    /// transition duration and the hash listeners
    pub fn render_script(&self) -> String {
        let routes_json = script_json(&Value::Object(self.render_routes()));
        let not_found_json = script_json(&Value::String(self.not_found_html()));
        let fallback_json = script_json(&Value::String(DEFAULT_NOT_FOUND_HTML.to_string()));

        format!(
            r#"<script>
const routesMap = {routes};
const notFoundHTML = {not_found};
const transitionDuration = {duration};

function matchRoute(path) {{
    if (Object.prototype.hasOwnProperty.call(routesMap, path)) return {{ route: path, params: {{}} }};
    for (const pattern of Object.keys(routesMap)) {{
        if (!pattern.includes(':')) continue;
        const patternParts = pattern.split('/');
        const pathParts = path.split('/');
        if (patternParts.length !== pathParts.length) continue;
        const params = {{}};
        let match = true;
        for (let i = 0; i < patternParts.length; i++) {{
            if (patternParts[i].startsWith(':')) {{
                params[patternParts[i].substring(1)] = decodeURIComponent(pathParts[i]);
            }} else if (patternParts[i] !== pathParts[i]) {{
                match = false;
                break;
            }}
        }}
        if (match) return {{ route: pattern, params }};
    }}
    return {{ route: null, params: {{}} }};
}}

async function renderRoute() {{
    const hash = window.location.hash.slice(1) || '/';
    const app = document.getElementById('app');
    const {{ route, params }} = matchRoute(hash);
    window.routeParams = params;
    app.style.opacity = '1';
    app.style.transition = `opacity ${{transitionDuration}}ms`;
    app.style.opacity = '0';
    await new Promise(resolve => setTimeout(resolve, transitionDuration));
    if (route !== null) {{
        app.innerHTML = routesMap[route];
    }} else {{
        app.innerHTML = notFoundHTML || {fallback};
    }}
    app.style.opacity = '1';
}}

window.addEventListener('hashchange', renderRoute);
window.addEventListener('load', renderRoute);
</script>"#,
            routes = routes_json,
            not_found = not_found_json,
            duration = self.transition_ms,
            fallback = fallback_json,
        )
    }
}

/// JSON safe to embed inside a `<script>` element
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}
