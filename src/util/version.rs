pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");

pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{}", APP_VERSION)
    }
}

/// User agent sent with every API request.
pub fn user_agent() -> String {
    format!("pull-list-manager/{}", version_label().trim_start_matches('v'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_carries_version_without_prefix() {
        let agent = user_agent();
        assert!(agent.starts_with("pull-list-manager/"));
        assert!(!agent.contains("/v"));
    }
}
