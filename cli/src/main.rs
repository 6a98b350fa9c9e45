mod cli;
mod http;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use prefpop_core::{ApiConfig, Session};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::http::ResasClient;

#[derive(Parser)]
#[command(name = "prefpop")]
#[command(about = "都道府県別の総人口推移を RESAS API から取得して表示します", long_about = None)]
struct CliArgs {
    /// RESAS API key
    #[arg(long, env = "RESAS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Base URL of the API
    #[arg(long, env = "RESAS_BASE_URL")]
    base_url: Option<String>,
    /// Settings file (YAML with base_url / api_key)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Prefectures to check on startup (code or name, comma separated)
    #[arg(long = "check", value_delimiter = ',')]
    initial: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = resolve_api_config(&args)?;
    if !config.has_api_key() {
        warn!("API キーが設定されていません。RESAS_API_KEY か --api-key で指定してください");
    }

    let client = ResasClient::new(config)?;
    let mut session = Session::new();
    session.apply_catalog(client.fetch_prefectures().await);

    cli::run(&client, &mut session, &args.initial).await
}

fn resolve_api_config(args: &CliArgs) -> Result<ApiConfig> {
    let mut config = match resolve_config_path(args.config.as_deref())? {
        Some(path) => load_config_file(&path)?,
        None => ApiConfig::default(),
    };
    if let Some(api_key) = &args.api_key {
        config.api_key = api_key.clone();
    }
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    Ok(config)
}

fn load_config_file(path: &Path) -> Result<ApiConfig> {
    let file = File::open(path)
        .with_context(|| format!("設定ファイルを開けません: {}", path.display()))?;
    serde_yaml::from_reader(BufReader::new(file))
        .with_context(|| format!("設定ファイルの解析に失敗しました: {}", path.display()))
}

fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("設定ファイルが見つかりません: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    let cwd = std::env::current_dir().context("カレントディレクトリの取得に失敗しました")?;
    let candidates = [
        cwd.join("config").join("prefpop.yaml"),
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("config")
            .join("prefpop.yaml"),
    ];

    Ok(candidates.into_iter().find(|path| path.exists()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn args(config: Option<PathBuf>) -> CliArgs {
        CliArgs {
            api_key: None,
            base_url: None,
            config,
            initial: Vec::new(),
        }
    }

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("prefpop.yaml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn flag_overrides_file_key_and_keeps_file_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "base_url: http://file\napi_key: filekey\n");
        let args = CliArgs {
            api_key: Some("flag".to_string()),
            ..args(Some(path))
        };

        let config = resolve_api_config(&args).unwrap();
        assert_eq!(config.api_key, "flag");
        assert_eq!(config.base_url, "http://file");
    }

    #[test]
    fn base_url_flag_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "base_url: http://file\napi_key: filekey\n");
        let args = CliArgs {
            base_url: Some("http://flag".to_string()),
            ..args(Some(path))
        };

        let config = resolve_api_config(&args).unwrap();
        assert_eq!(config.base_url, "http://flag");
        assert_eq!(config.api_key, "filekey");
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "api_key: filekey\n");

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.base_url, prefpop_core::DEFAULT_BASE_URL);
        assert_eq!(config.api_key, "filekey");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "base_url: [unterminated\n");
        assert!(load_config_file(&path).is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");
        let err = resolve_api_config(&args(Some(missing))).expect_err("missing file must fail");
        assert!(err.to_string().contains("absent.yaml"));
    }
}
