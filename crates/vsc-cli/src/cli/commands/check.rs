//! `vsc check <url>` – run the blacklist gate against a URL.

use anyhow::Result;
use std::path::Path;
use vsc_core::config::Settings;

use super::effective_settings;

pub fn run_check(path: &Path, url: &str) -> Result<()> {
    let settings = effective_settings(path)?;
    println!("{}", check_report(&settings, url));
    Ok(())
}

pub(crate) fn check_report(settings: &Settings, url: &str) -> String {
    match settings.blocked_sites.matching(url) {
        Some(pattern) => format!("blocked by '{pattern}'"),
        None => "allowed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsc_core::blacklist::Blacklist;

    #[test]
    fn report_names_the_matching_pattern() {
        let settings = Settings {
            blocked_sites: Blacklist::parse("example.org, vine.com"),
            ..Settings::default()
        };
        assert_eq!(
            check_report(&settings, "https://vine.com/v/1"),
            "blocked by 'vine.com'"
        );
        assert_eq!(check_report(&settings, "https://youtube.com/"), "allowed");
    }
}
