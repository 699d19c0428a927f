//! Privileged maintenance actions.
//!
//! The dashboard can trigger two scripts shipped alongside it: refreshing
//! the per-region CIDR lists and re-applying the firewall from them. Both
//! run through `sudo`; the scripts themselves live outside this repo.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::command::{self, CommandOutput};

/// A maintenance script the operator can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Refresh the region CIDR lists.
    UpdateCidrs,
    /// Apply the firewall rules built from the CIDR lists.
    ApplyFirewall,
}

impl Action {
    /// All actions, in the order they are shown.
    pub const ALL: [Action; 2] = [Action::UpdateCidrs, Action::ApplyFirewall];

    /// File name of the script inside the scripts directory.
    pub fn script_name(&self) -> &'static str {
        match self {
            Action::UpdateCidrs => "update_region_cidrs.sh",
            Action::ApplyFirewall => "apply_firewall.sh",
        }
    }

    /// HTTP path that triggers this action.
    pub fn route(&self) -> &'static str {
        match self {
            Action::UpdateCidrs => "/action/update-cidrs",
            Action::ApplyFirewall => "/action/apply",
        }
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            Action::UpdateCidrs => "Update CIDRs",
            Action::ApplyFirewall => "Apply Firewall",
        }
    }

    /// Look up the action served at `path`.
    pub fn from_route(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.route() == path)
    }

    /// Full path of the script.
    pub fn script_path(&self, scripts_dir: &Path) -> PathBuf {
        scripts_dir.join(self.script_name())
    }

    /// Run the script via `sudo` and return its combined output.
    pub async fn run(&self, scripts_dir: &Path, timeout: Duration) -> CommandOutput {
        let script = self.script_path(scripts_dir).to_string_lossy().into_owned();

        info!("Running maintenance action {:?}: {}", self, script);
        let result = command::run("sudo", &[script.as_str()], timeout).await;

        if result.success() {
            info!("{:?} finished", self);
        } else {
            warn!("{:?} exited with {}", self, result.code);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_route() {
        assert_eq!(
            Action::from_route("/action/update-cidrs"),
            Some(Action::UpdateCidrs)
        );
        assert_eq!(Action::from_route("/action/apply"), Some(Action::ApplyFirewall));
        assert_eq!(Action::from_route("/action/reboot"), None);
    }

    #[test]
    fn test_script_path() {
        let dir = Path::new("/opt/khajubridge/scripts");
        assert_eq!(
            Action::UpdateCidrs.script_path(dir),
            PathBuf::from("/opt/khajubridge/scripts/update_region_cidrs.sh")
        );
        assert_eq!(
            Action::ApplyFirewall.script_path(dir),
            PathBuf::from("/opt/khajubridge/scripts/apply_firewall.sh")
        );
    }

    #[test]
    fn test_routes_are_unique() {
        assert_ne!(Action::UpdateCidrs.route(), Action::ApplyFirewall.route());
        for action in Action::ALL {
            assert_eq!(Action::from_route(action.route()), Some(action));
        }
    }
}
