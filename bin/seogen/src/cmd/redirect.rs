//! Redirect command - shows where a page view would be sent

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use seogen_core::{RedirectDecision, Redirector};

use super::load_config;

/// Run the redirect command.
///
/// Prints `stay` for crawlers, otherwise the target URL.
pub fn run(config_path: &Path, pathname: &str, user_agent: Option<&str>) -> Result<()> {
    let decision = decide(config_path, pathname, user_agent)?;
    tracing::info!(pathname, ?user_agent, ?decision, "Resolved redirect");

    match decision {
        RedirectDecision::Stay => println!("stay"),
        RedirectDecision::Redirect(url) => println!("{url}"),
    }

    Ok(())
}

fn decide(config_path: &Path, pathname: &str, user_agent: Option<&str>) -> Result<RedirectDecision> {
    let config = load_config(config_path)?;
    let redirector =
        Redirector::new(&config.redirect).wrap_err("Failed to compile redirect rules")?;
    Ok(redirector.resolve(user_agent, pathname))
}
