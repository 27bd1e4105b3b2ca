use crate::args::Cli;
use bqbot_cli::Result;
use bqbot_link::{AuthProvider, BigQueryClient};

/// Build the client and probe the service once.
///
/// A failure here is fatal for the run; the caller prints the remediation
/// hint and exits non-zero.
pub async fn connect(cli: &Cli, project_id: &str) -> Result<BigQueryClient> {
    let mut builder = BigQueryClient::builder()
        .project_id(project_id)
        .auth(AuthProvider::from_env());

    if let Some(url) = &cli.api_url {
        builder = builder.base_url(url);
    }

    let client = builder.build()?;
    client.ping().await?;
    Ok(client)
}
