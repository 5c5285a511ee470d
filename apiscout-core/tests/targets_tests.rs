// Tests for target and path provisioning helpers

use apiscout_core::paths::{DEFAULT_PATHS, default_paths, normalize_path, resolve_paths};
use apiscout_core::targets::{clean_origin, estimated_minutes, parse_entries};

// ============================================================================
// Origin Cleaning Tests
// ============================================================================

#[test]
fn test_clean_origin_bare_host() {
    assert_eq!(clean_origin("api.example.com"), Some("api.example.com".to_string()));
}

#[test]
fn test_clean_origin_strips_scheme_and_path() {
    assert_eq!(
        clean_origin("https://api.example.com/v1/users?x=1"),
        Some("api.example.com".to_string())
    );
    assert_eq!(
        clean_origin("http://example.com/"),
        Some("example.com".to_string())
    );
}

#[test]
fn test_clean_origin_keeps_port() {
    assert_eq!(
        clean_origin("example.com:8443/admin"),
        Some("example.com:8443".to_string())
    );
    assert_eq!(
        clean_origin("http://127.0.0.1:8080"),
        Some("127.0.0.1:8080".to_string())
    );
}

#[test]
fn test_clean_origin_keeps_explicit_default_port() {
    assert_eq!(
        clean_origin("example.com:80"),
        Some("example.com:80".to_string())
    );
    assert_eq!(
        clean_origin("https://example.com:443/login"),
        Some("example.com:443".to_string())
    );
    assert_eq!(
        clean_origin("http://user@example.com:8080/"),
        Some("example.com:8080".to_string())
    );
    assert_eq!(clean_origin("http://[::1]:80/"), Some("[::1]:80".to_string()));
    assert_eq!(clean_origin("http://[::1]/"), Some("[::1]".to_string()));
}

#[test]
fn test_clean_origin_whitespace_and_case() {
    assert_eq!(clean_origin("  Example.COM  "), Some("example.com".to_string()));
}

#[test]
fn test_clean_origin_rejects_blank_and_garbage() {
    assert_eq!(clean_origin(""), None);
    assert_eq!(clean_origin("   "), None);
    assert_eq!(clean_origin("not a host!!"), None);
}

// ============================================================================
// Entry Parsing Tests
// ============================================================================

#[test]
fn test_parse_entries_skips_comments_and_blanks() {
    let content = "# scope for program X\napi.example.com\n\n   \n  www.example.com  \n#old.example.com\n";
    assert_eq!(
        parse_entries(content),
        vec!["api.example.com".to_string(), "www.example.com".to_string()]
    );
}

#[test]
fn test_parse_entries_empty() {
    assert!(parse_entries("").is_empty());
    assert!(parse_entries("# only comments\n\n").is_empty());
}

// ============================================================================
// Path Tests
// ============================================================================

#[test]
fn test_default_catalog() {
    let paths = default_paths();
    assert_eq!(paths.len(), 34);
    assert_eq!(paths.len(), DEFAULT_PATHS.len());
    assert_eq!(paths[0], "/");
    assert!(paths.iter().all(|p| p.starts_with('/')));
    for expected in ["/api", "/graphql", "/swagger.json", "/openapi.json", "/redoc", "/api/login"] {
        assert!(paths.iter().any(|p| p == expected), "missing {expected}");
    }
}

#[test]
fn test_normalize_path() {
    assert_eq!(normalize_path("api/v1"), Some("/api/v1".to_string()));
    assert_eq!(normalize_path("/graphql"), Some("/graphql".to_string()));
    assert_eq!(normalize_path("  admin "), Some("/admin".to_string()));
    assert_eq!(normalize_path("   "), None);
}

#[test]
fn test_resolve_paths_custom() {
    let custom = vec!["internal".to_string(), "/v4".to_string()];
    assert_eq!(resolve_paths(&custom), vec!["/internal", "/v4"]);
}

#[test]
fn test_resolve_paths_falls_back_to_defaults() {
    assert_eq!(resolve_paths(&[]).len(), 34);
    assert_eq!(resolve_paths(&["  ".to_string()]).len(), 34);
}

// ============================================================================
// Estimate Tests
// ============================================================================

#[test]
fn test_estimated_minutes() {
    assert_eq!(estimated_minutes(600, 1.0, 5), 2.0);
    assert_eq!(estimated_minutes(100, 0.0, 5), 0.0);
    assert_eq!(estimated_minutes(100, 1.0, 0), 0.0);
}
