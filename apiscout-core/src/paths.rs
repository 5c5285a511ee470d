// Built-in catalog of API-indicative paths

pub const DEFAULT_PATHS: &[&str] = &[
    "/",
    "/api",
    "/api/v1",
    "/api/v2",
    "/api/v3",
    "/v1",
    "/v2",
    "/v3",
    "/rest",
    "/rest/v1",
    "/graphql",
    "/api/graphql",
    "/swagger",
    "/api/swagger",
    "/swagger.json",
    "/api/swagger.json",
    "/openapi.json",
    "/api-docs",
    "/docs",
    "/api/docs",
    "/redoc",
    "/api/redoc",
    "/health",
    "/api/health",
    "/status",
    "/api/status",
    "/version",
    "/api/version",
    "/users",
    "/api/users",
    "/auth",
    "/api/auth",
    "/login",
    "/api/login",
];

pub fn default_paths() -> Vec<String> {
    DEFAULT_PATHS.iter().map(|p| p.to_string()).collect()
}

/// Trims the entry and prefixes `/` when missing. Blank entries yield `None`.
pub fn normalize_path(entry: &str) -> Option<String> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }
    if entry.starts_with('/') {
        Some(entry.to_string())
    } else {
        Some(format!("/{}", entry))
    }
}

/// Normalizes custom paths, falling back to the default catalog when none survive.
pub fn resolve_paths(custom: &[String]) -> Vec<String> {
    let paths: Vec<String> = custom.iter().filter_map(|p| normalize_path(p)).collect();
    if paths.is_empty() {
        default_paths()
    } else {
        paths
    }
}
