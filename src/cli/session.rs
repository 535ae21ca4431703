use std::sync::Arc;

use crate::client::{HttpConfig, HttpTransport};
use crate::config::{AppConfig, ClientSettings};
use crate::core::{Result, SubmissionCoordinator};

use super::Cli;

pub fn resolve_settings(cli: &Cli, config: AppConfig) -> Result<ClientSettings> {
    ClientSettings::resolve(config, cli.overrides())
}

pub fn create_coordinator(settings: &ClientSettings) -> Result<SubmissionCoordinator> {
    let http_config = HttpConfig::new().with_timeout(settings.timeout);
    let transport = HttpTransport::with_config(settings.endpoint.clone(), http_config)?;

    tracing::debug!(
        endpoint = %settings.endpoint,
        timeout_secs = settings.timeout.as_secs(),
        "Created HTTP transport"
    );

    Ok(SubmissionCoordinator::new(Arc::new(transport)).with_user_id(settings.user_id.clone()))
}
