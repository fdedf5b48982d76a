//! Header names and values shared by outbound requests and inbound IPN calls.

/// Public API key.
pub const API_KEY: &str = "API-Key";

/// Nonce included in the signature.
pub const API_NONCE: &str = "API-Nonce";

/// Hex HMAC-SHA256 signature.
pub const API_SIGN: &str = "API-Sign";

/// Free-text platform description.
pub const API_PLATFORM: &str = "API-Platform";

/// SDK version.
pub const API_PLUGIN: &str = "API-Plugin";

/// Version reported in `API-Plugin`.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `API-Platform` value, e.g. `linux x86_64 6.8.0-45-generic - Rust`.
///
/// The OS release is included when the platform exposes it.
pub fn default_platform() -> String {
    platform_string(os_version().as_deref())
}

fn platform_string(os_version: Option<&str>) -> String {
    match os_version {
        Some(version) => format!(
            "{} {} {} - Rust",
            std::env::consts::OS,
            std::env::consts::ARCH,
            version
        ),
        None => format!("{} {} - Rust", std::env::consts::OS, std::env::consts::ARCH),
    }
}

#[cfg(target_os = "linux")]
fn os_version() -> Option<String> {
    std::fs::read_to_string("/proc/sys/kernel/osrelease")
        .ok()
        .map(|release| release.trim().to_string())
        .filter(|release| !release.is_empty())
}

#[cfg(not(target_os = "linux"))]
fn os_version() -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_platform_names_os_and_arch() {
        let platform = default_platform();
        assert!(platform.starts_with(std::env::consts::OS));
        assert!(platform.contains(std::env::consts::ARCH));
        assert!(platform.ends_with(" - Rust"));
    }

    #[test]
    fn platform_string_includes_os_release() {
        let platform = platform_string(Some("6.8.0-45-generic"));
        assert_eq!(
            platform,
            format!(
                "{} {} 6.8.0-45-generic - Rust",
                std::env::consts::OS,
                std::env::consts::ARCH
            )
        );
    }

    #[test]
    fn platform_string_without_release() {
        assert_eq!(
            platform_string(None),
            format!("{} {} - Rust", std::env::consts::OS, std::env::consts::ARCH)
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_default_platform_reports_kernel_release() {
        if let Some(release) = os_version() {
            assert!(default_platform().contains(&release));
        }
    }

    #[test]
    fn sdk_version_is_semver() {
        assert_eq!(SDK_VERSION.split('.').count(), 3);
    }
}
