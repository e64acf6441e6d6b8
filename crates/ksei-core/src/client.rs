//! High-level client combining the transport and the credential manager.

use std::sync::Arc;

use serde_json::Value;

use crate::api::{endpoints, ApiClient, PortfolioCategory};
use crate::auth::{CredentialManager, Identity};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::fetch::{self, FetchResults, FetchTask};
use crate::store::CredentialStore;

/// Authenticated client for one AKSes account.
pub struct KseiClient {
    api: ApiClient,
    credentials: CredentialManager,
}

impl KseiClient {
    pub fn new(config: &ClientConfig, identity: Identity) -> Result<Self> {
        let api = ApiClient::new(config)?;
        let credentials = CredentialManager::new(identity, api.clone());
        Ok(Self { api, credentials })
    }

    /// Persist tokens in `store` so later runs can skip the login.
    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = self.credentials.with_store(store);
        self
    }

    pub fn credentials(&self) -> &CredentialManager {
        &self.credentials
    }

    /// GET any data endpoint, logging in first if the token is stale.
    pub async fn get(&self, path: &str) -> Result<Value> {
        let credential = self.credentials.ensure_valid_credential().await?;
        Ok(self.api.get_json(path, credential.token()).await?)
    }

    pub async fn get_portfolio_summary(&self) -> Result<Value> {
        self.get(endpoints::PORTFOLIO_SUMMARY).await
    }

    pub async fn get_portfolio(&self, category: PortfolioCategory) -> Result<Value> {
        self.get(category.path()).await
    }

    pub async fn get_cash_balances(&self) -> Result<Value> {
        self.get_portfolio(PortfolioCategory::Cash).await
    }

    pub async fn get_equity_balances(&self) -> Result<Value> {
        self.get_portfolio(PortfolioCategory::Equity).await
    }

    pub async fn get_mutual_fund_balances(&self) -> Result<Value> {
        self.get_portfolio(PortfolioCategory::MutualFund).await
    }

    pub async fn get_bond_balances(&self) -> Result<Value> {
        self.get_portfolio(PortfolioCategory::Bond).await
    }

    pub async fn get_other_balances(&self) -> Result<Value> {
        self.get_portfolio(PortfolioCategory::Other).await
    }

    pub async fn get_global_identity(&self) -> Result<Value> {
        self.get(endpoints::GLOBAL_IDENTITY).await
    }

    /// Fetch several endpoints concurrently; see [`fetch::fetch_all`].
    pub async fn fetch_all(&self, tasks: &[FetchTask]) -> Result<FetchResults> {
        fetch::fetch_all(&self.api, &self.credentials, tasks).await
    }

    /// Fetch all five balance categories concurrently.
    pub async fn get_all_portfolios(&self) -> Result<FetchResults> {
        self.fetch_all(&FetchTask::portfolios()).await
    }
}
