/// Build stamp embedded by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
}

pub fn current() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("SMART_BUDGET_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("SMART_BUDGET_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("SMART_BUDGET_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("SMART_BUDGET_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("SMART_BUDGET_BUILD_PROFILE").unwrap_or("unknown"),
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn version_matches_the_package() {
        assert_eq!(super::current().version, env!("CARGO_PKG_VERSION"));
    }
}
