use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoachLocConfig {
    pub source_lang: Option<String>,
    pub target_lang: Option<String>,
    pub scan: Option<ScanCfg>,
    pub extract: Option<ExtractCfg>,
    pub merge: Option<MergeCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanCfg {
    /// Language for the optional CSV `lang` column.
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractCfg {
    pub legacy_ids: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergeCfg {
    pub target_lang: Option<String>,
    pub legacy_ids: Option<bool>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Other(String),
}

/// Load configuration, first match wins per field.
/// Search order: CWD/coachloc.toml, then <config dir>/coachloc/coachloc.toml.
/// Unreadable or unparsable layers are skipped.
pub fn load_config() -> Result<CoachLocConfig, ConfigError> {
    let mut merged = CoachLocConfig::default();
    if let Ok(p) = std::env::current_dir() {
        merged = merge_layer(merged, &p.join("coachloc.toml"));
    }
    if let Some(base) = dirs::config_dir() {
        merged = merge_layer(merged, &base.join("coachloc").join("coachloc.toml"));
    }
    Ok(merged)
}

fn merge_layer(acc: CoachLocConfig, path: &std::path::Path) -> CoachLocConfig {
    if let Ok(s) = std::fs::read_to_string(path) {
        if let Ok(cfg) = toml::from_str::<CoachLocConfig>(&s) {
            return merge(acc, cfg);
        }
    }
    acc
}

fn merge(mut a: CoachLocConfig, b: CoachLocConfig) -> CoachLocConfig {
    if a.source_lang.is_none() {
        a.source_lang = b.source_lang;
    }
    if a.target_lang.is_none() {
        a.target_lang = b.target_lang;
    }
    a.scan = merge_opt(a.scan, b.scan, merge_scan);
    a.extract = merge_opt(a.extract, b.extract, merge_extract);
    a.merge = merge_opt(a.merge, b.merge, merge_merge);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_scan(mut a: ScanCfg, b: ScanCfg) -> ScanCfg {
    if a.lang.is_none() {
        a.lang = b.lang;
    }
    a
}

fn merge_extract(mut a: ExtractCfg, b: ExtractCfg) -> ExtractCfg {
    if a.legacy_ids.is_none() {
        a.legacy_ids = b.legacy_ids;
    }
    a
}

fn merge_merge(mut a: MergeCfg, b: MergeCfg) -> MergeCfg {
    if a.target_lang.is_none() {
        a.target_lang = b.target_lang;
    }
    if a.legacy_ids.is_none() {
        a.legacy_ids = b.legacy_ids;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let cfg: CoachLocConfig = toml::from_str(
            r#"
source_lang = "en"
target_lang = "de"

[merge]
legacy_ids = true
"#,
        )
        .unwrap();
        assert_eq!(cfg.source_lang.as_deref(), Some("en"));
        assert_eq!(cfg.merge.as_ref().unwrap().legacy_ids, Some(true));
        assert!(cfg.scan.is_none());
    }

    #[test]
    fn earlier_layer_wins_per_field() {
        let a: CoachLocConfig = toml::from_str(r#"target_lang = "de""#).unwrap();
        let b: CoachLocConfig = toml::from_str(
            r#"
source_lang = "fr"
target_lang = "it"

[merge]
target_lang = "it"
"#,
        )
        .unwrap();
        let merged = merge(a, b);
        assert_eq!(merged.target_lang.as_deref(), Some("de"));
        assert_eq!(merged.source_lang.as_deref(), Some("fr"));
        assert_eq!(
            merged.merge.as_ref().unwrap().target_lang.as_deref(),
            Some("it")
        );
    }
}
