use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// One digest category: messages whose subject contains `marker` are
/// filtered against `keywords`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Category {
    pub marker: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub client_secret_path: Option<String>,
    pub token_path: Option<String>,
    pub output_dir: Option<String>,
    pub processed_label_id: String,
    pub redirect_uri: Option<String>,
    pub categories: Vec<Category>,
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("arxiv_filter"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        // create a template config for users to edit
        let sample = Config {
            client_secret_path: None,
            token_path: None,
            output_dir: Some("abstracts_filtered".to_string()),
            processed_label_id: "Label_7139621076713114511".to_string(),
            redirect_uri: Some("http://127.0.0.1:8080/callback".to_string()),
            categories: vec![
                Category {
                    marker: "astro-ph daily".to_string(),
                    keywords: vec!["AGB".to_string(), "nucleosynthesis".to_string()],
                },
                Category {
                    marker: "math daily".to_string(),
                    keywords: vec!["explicit".to_string(), "patankar".to_string()],
                },
            ],
        };
        let tom = toml::to_string_pretty(&sample)?;
        fs::write(&path, tom)?;
        return Err(anyhow::anyhow!(
            "Created template config at {} — edit it and run again",
            path.display()
        ));
    }
    let s = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&s)?;
    Ok(cfg)
}

pub fn resolve_client_secret_path(cfg: &Config) -> Result<PathBuf> {
    if let Some(p) = &cfg.client_secret_path {
        Ok(PathBuf::from(p))
    } else {
        Ok(config_dir()?.join("credentials.json"))
    }
}

pub fn resolve_token_path(cfg: &Config) -> Result<PathBuf> {
    if let Some(p) = &cfg.token_path {
        Ok(PathBuf::from(p))
    } else {
        Ok(config_dir()?.join("token.json"))
    }
}

pub fn resolve_output_dir(cfg: &Config) -> PathBuf {
    PathBuf::from(cfg.output_dir.as_deref().unwrap_or("abstracts_filtered"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_table_round_trips_through_toml() {
        let toml_src = r#"
            output_dir = "out"
            processed_label_id = "Label_1"

            [[categories]]
            marker = "astro-ph daily"
            keywords = ["AGB", "nucleosynthesis"]

            [[categories]]
            marker = "math daily"
            keywords = ["explicit", "patankar"]
        "#;
        let cfg: Config = toml::from_str(toml_src).unwrap();

        assert_eq!(cfg.categories.len(), 2);
        assert_eq!(cfg.categories[0].marker, "astro-ph daily");
        assert_eq!(cfg.categories[1].keywords, vec!["explicit", "patankar"]);
        assert_eq!(resolve_output_dir(&cfg), PathBuf::from("out"));
    }

    #[test]
    fn output_dir_defaults_when_unset() {
        let cfg: Config = toml::from_str(
            r#"
            processed_label_id = "Label_1"
            categories = []
        "#,
        )
        .unwrap();
        assert_eq!(resolve_output_dir(&cfg), PathBuf::from("abstracts_filtered"));
    }
}
