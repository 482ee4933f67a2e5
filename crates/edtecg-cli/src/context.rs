//! Client construction from command-line options.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;

use edtecg_core::ApiUrl;
use edtecg_http::{Client, ClientConfig, GuardDecision};
use edtecg_store::FileStore;

use crate::cli::GlobalArgs;

const CREDENTIALS_FILE: &str = "credentials.json";

/// Everything a command needs to talk to the API.
#[derive(Debug)]
pub struct AppContext {
    pub client: Client,
    pub api_url: ApiUrl,
    pub store_path: PathBuf,
}

impl AppContext {
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let api_url = ApiUrl::new(&args.api_url).context("Invalid API URL")?;
        let store_path = match &args.store {
            Some(path) => path.clone(),
            None => default_store_path()?,
        };

        let config = ClientConfig::new(api_url.clone())
            .with_timeout(Duration::from_millis(args.timeout_ms))
            .with_user_agent(concat!("edtecg-cli/", env!("EDTECG_VERSION")));
        let store = Arc::new(FileStore::new(&store_path));
        let client = Client::new(config, store).context("Failed to create HTTP client")?;

        tracing::debug!(api_url = %api_url, store = %store_path.display(), "Client ready");

        Ok(Self {
            client,
            api_url,
            store_path,
        })
    }

    /// Fail unless the view `route` may be shown.
    pub fn require_login(&self, route: &str) -> Result<()> {
        match self.client.guard().check(route) {
            GuardDecision::Allow => Ok(()),
            GuardDecision::Redirect(_) => {
                bail!("Not logged in. Run 'edtecg auth login' first.")
            }
        }
    }
}

/// Credential file in the per-user data directory.
fn default_store_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "edtecg").context("Could not determine data directory")?;
    Ok(dirs.data_dir().join(CREDENTIALS_FILE))
}

/// Returns true if `err` ended the stored session.
pub fn requires_login(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<edtecg_core::Error>())
        .any(edtecg_core::Error::requires_login)
}
