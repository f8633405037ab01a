// Version and build information

/// Metadata stamped into the binary by build.rs
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_date: &'static str,
    pub git_hash: &'static str,
    pub git_clean: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
}

/// Snapshot of the metadata this binary was compiled with.
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown"),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        git_clean: option_env!("GIT_CLEAN").unwrap_or("unknown"),
        target: option_env!("BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("BUILD_PROFILE").unwrap_or("unknown"),
    }
}

impl BuildInfo {
    pub fn format_display(&self) -> String {
        format!("servmon v{}", self.version)
    }

    pub fn format_build_info(&self) -> String {
        format!(
            "Build: {}\nTarget: {}\nProfile: {}\nGit: {}\nClean: {}",
            self.build_date, self.target, self.profile, self.git_hash, self.git_clean
        )
    }
}
