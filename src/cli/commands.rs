//! CLI command implementations

use std::io::{self, Write};
use std::path::Path;

use tracing::info;

use crate::config::CatalogConfig;
use crate::query::{FilterSpec, RawParameters};
use crate::rest_api::{list_records, ApiServer, Catalog, RequestContext};

use super::args::{Cli, Command};
use super::errors::CliResult;

/// Parse arguments, install logging and run the chosen command
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    crate::observability::init_tracing(cli.log_format)?;
    run_command(cli.command).await
}

/// Run the appropriate command based on CLI args
pub async fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port).await,
        Command::Query {
            config,
            collection,
            query: raw,
        } => query(&config, &collection, &raw).await,
        Command::Check { config } => check(&config).await,
    }
}

/// Load the catalog and serve it until interrupted
pub async fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = CatalogConfig::load(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    let catalog = Catalog::from_config(&config)?;
    info!(collections = catalog.len(), "catalog ready");

    ApiServer::new(catalog, config.server).start().await?;
    Ok(())
}

/// Run one list query and print the envelope as JSON
pub async fn query(config_path: &Path, collection: &str, raw: &str) -> CliResult<()> {
    let config = CatalogConfig::load(config_path)?;
    let catalog = Catalog::from_config(&config)?;
    let collection = catalog.get(collection)?;

    let params = RawParameters::parse(raw);
    let envelope = list_records(collection.as_ref(), &params, &RequestContext::new()).await?;

    write_json(&serde_json::to_string_pretty(&envelope)?)
}

/// Validate configuration and data, printing one line per collection
pub async fn check(config_path: &Path) -> CliResult<()> {
    let config = CatalogConfig::load(config_path)?;
    let catalog = Catalog::from_config(&config)?;

    let mut stdout = io::stdout();
    for name in catalog.names() {
        let collection = catalog.get(name)?;
        let records = collection
            .count_documents(&FilterSpec::all())
            .await
            .map_err(crate::rest_api::ApiError::from)?;
        writeln!(stdout, "{}: {} records", name, records)?;
    }
    stdout.flush()?;

    Ok(())
}

fn write_json(json_str: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", json_str)?;
    stdout.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fixture(dir: &Path) -> std::path::PathBuf {
        fs::write(
            dir.join("slimes.json"),
            r#"[{"id": "pink", "diet": "all"}, {"id": "tabby", "diet": "meat"}]"#,
        )
        .unwrap();
        let config = dir.join("slimedex.json");
        fs::write(
            &config,
            r#"{"collections": {"slimes": {"data_path": "slimes.json", "fields": {"diet": "string"}}}}"#,
        )
        .unwrap();
        config
    }

    #[tokio::test]
    async fn test_check_and_query_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixture(dir.path());

        check(&config).await.unwrap();
        query(&config, "slimes", "diet=meat").await.unwrap();
    }

    #[tokio::test]
    async fn test_query_rejects_unknown_collection() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixture(dir.path());

        let err = query(&config, "gordos", "").await.unwrap_err();
        assert_eq!(err.code(), "SLIMEDEX_CLI_QUERY_ERROR");
    }

    #[tokio::test]
    async fn test_query_rejects_unknown_field() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixture(dir.path());

        let err = query(&config, "slimes", "color=pink").await.unwrap_err();
        assert!(err.to_string().contains("color"));
    }
}
