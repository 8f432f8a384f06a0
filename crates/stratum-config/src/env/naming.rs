//! Environment variable naming.

/// Effective variable name for a binding, optionally scoped by a map key.
///
/// `env_var_name("grpc_port", Some("main"))` is `MAIN_GRPC_PORT`. Keys are
/// used as-is apart from uppercasing.
pub fn env_var_name(base: &str, prefix: Option<&str>) -> String {
    let base = base.to_uppercase();
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}_{base}", prefix.to_uppercase()),
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_names_are_uppercased() {
        assert_eq!(env_var_name("log_level", None), "LOG_LEVEL");
        assert_eq!(env_var_name("env", None), "ENV");
    }

    #[test]
    fn empty_prefix_is_ignored() {
        assert_eq!(env_var_name("host", Some("")), "HOST");
    }

    #[test]
    fn map_keys_prefix_the_name() {
        assert_eq!(env_var_name("grpc_port", Some("main")), "MAIN_GRPC_PORT");
        assert_eq!(
            env_var_name("grpc_client_address", Some("service1")),
            "SERVICE1_GRPC_CLIENT_ADDRESS"
        );
    }

    #[test]
    fn keys_are_not_normalised() {
        assert_eq!(env_var_name("http_port", Some("api-v2")), "API-V2_HTTP_PORT");
    }
}
