use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::AppState;
use crate::client_ip::ClientIp;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

async fn index(State(state): State<AppState>, client_ip: ClientIp) -> Html<String> {
    tracing::info!("Index page accessed by IP: {client_ip}");
    Html(render_index(&state.config.turnstile_site_key))
}

fn render_index(site_key: &str) -> String {
    INDEX_TEMPLATE.replace("{{ site_key }}", &escape_attr(site_key))
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
