use std::path::PathBuf;

use crate::commands::{CmdMessage, CmdResult};
use crate::config::AdminConfig;
use crate::error::Result;

/// The effective configuration and the files it was read from.
pub fn show(config: &AdminConfig, sources: Vec<PathBuf>) -> Result<CmdResult> {
    let mut result = CmdResult::default()
        .with_config(config.clone())
        .with_paths(sources);
    if config.services.disable_services {
        result.add_message(CmdMessage::warning("Background services are disabled"));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_returns_config_and_sources() {
        let res = show(&AdminConfig::default(), vec![PathBuf::from("/x/adminkit.toml")]).unwrap();
        assert_eq!(res.config, Some(AdminConfig::default()));
        assert_eq!(res.paths.len(), 1);
        assert!(res.messages.is_empty());
    }

    #[test]
    fn disabled_services_warn() {
        let mut config = AdminConfig::default();
        config.services.disable_services = true;
        let res = show(&config, Vec::new()).unwrap();
        assert_eq!(res.messages.len(), 1);
    }
}
