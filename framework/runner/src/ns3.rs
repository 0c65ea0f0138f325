use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};

/// Environment variable to override the path to the ns-3 wrapper script used
/// to launch simulations.
pub const NS3_PATH_ENV: &str = "NS3_SWEEP_PATH";

/// Locate the ns-3 wrapper.
///
/// If [`NS3_PATH_ENV`] is set, its value is used and must exist. Otherwise
/// the conventional `./ns3` of an ns-3 build tree is tried, falling back to
/// an `ns3` found on the user's `PATH`.
pub fn ns3_path() -> anyhow::Result<PathBuf> {
    match env::var(NS3_PATH_ENV).ok().as_deref() {
        Some("") => {
            bail!("'{NS3_PATH_ENV}' set to empty string");
        }
        Some(path) => {
            let ns3 = PathBuf::from(path);
            if !ns3.exists() {
                bail!(
                    "Path to ns-3 wrapper overridden with '{NS3_PATH_ENV}={path}' but that path doesn't exist",
                    path = ns3.display()
                );
            }
            Ok(ns3)
        }
        None => {
            let local = PathBuf::from("./ns3");
            if local.exists() {
                return Ok(local);
            }
            which::which("ns3").with_context(|| {
                format!(
                    "No ./ns3 in the working directory and no ns3 on PATH. Run from an ns-3 build tree or set '{NS3_PATH_ENV}'."
                )
            })
        }
    }
}
