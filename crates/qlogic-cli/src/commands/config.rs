//! Config command implementation.

use anyhow::Result;

use super::common::{OverrideArgs, resolve_config};

/// Print the effective configuration as YAML.
pub fn execute(variant: Option<&str>, config: Option<&str>, overrides: &OverrideArgs) -> Result<()> {
    let config = resolve_config(variant, config, overrides)?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
