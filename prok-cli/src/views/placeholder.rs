use client::Route;

/// Text for views that exist in navigation but have no content yet.
pub fn render_placeholder(route: Route) -> String {
    format!("{}\n\nComing soon.\n", route.title())
}
