use clap::ValueEnum;

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            ConfigFormat::Toml => "toml",
        }
    }
}

/// Parse a `PATH=FILE` overlay argument
pub(crate) fn parse_overlay(raw: &str) -> Result<(String, std::path::PathBuf), String> {
    let (path, file) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=FILE, got {raw:?}"))?;
    if path.trim().is_empty() || file.trim().is_empty() {
        return Err(format!("expected PATH=FILE, got {raw:?}"));
    }
    Ok((path.trim().to_string(), file.trim().into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overlay() {
        assert_eq!(
            parse_overlay("styles.css=/tmp/new.css"),
            Ok(("styles.css".to_string(), "/tmp/new.css".into()))
        );
        assert!(parse_overlay("styles.css").is_err());
        assert!(parse_overlay("=x").is_err());
        assert_eq!(ConfigFormat::Toml.as_str(), "toml");
    }
}
