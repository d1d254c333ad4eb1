//! Configuration validation functions.

use super::Config;

/// Validate the loaded configuration.
pub fn validate_config(config: &Config) -> anyhow::Result<()> {
    config.api.validate()?;
    config.events.validate()?;

    if let Some(client_id) = &config.viewer.client_id {
        if client_id.trim().is_empty() {
            anyhow::bail!("viewer.client_id must not be blank when set");
        }
    }

    if config.viewer.force_turn && config.viewer.nat_traversal_disabled {
        eprintln!(
            "WARNING: viewer.force_turn has no effect while viewer.nat_traversal_disabled=true"
        );
    }

    Ok(())
}
