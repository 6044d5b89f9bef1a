use anyhow::Context;
use relay_core::LaunchConfiguration;

/// Resolve the launch configuration from the process environment.
///
/// Called once from `main`; an error here stops the process before the
/// runtime accepts any event.
pub fn load_from_env() -> anyhow::Result<LaunchConfiguration> {
    LaunchConfiguration::from_lookup(|name| std::env::var(name).ok())
        .context("launch configuration must be provided through the environment")
}
