//! Fixed endpoint paths of the AKSes service.
//!
//! These are part of the contract with the remote portal and are relative
//! to the configured base URL.

/// Challenge endpoint: turns the locally hashed password into a login hash.
pub const GENERATE_HASHED_PASSWORD: &str = "/activation/generated";

pub const LOGIN: &str = "/login";

pub const PORTFOLIO_SUMMARY: &str = "/myportofolio/summary";

pub const GLOBAL_IDENTITY: &str = "/myaccount/global-identity/";

/// Balance categories exposed under `/myportofolio/summary-detail/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortfolioCategory {
    Cash,
    Equity,
    MutualFund,
    Bond,
    Other,
}

impl PortfolioCategory {
    pub const ALL: [PortfolioCategory; 5] = [
        PortfolioCategory::Cash,
        PortfolioCategory::Equity,
        PortfolioCategory::MutualFund,
        PortfolioCategory::Bond,
        PortfolioCategory::Other,
    ];

    /// Key used in fetch results and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            PortfolioCategory::Cash => "cash",
            PortfolioCategory::Equity => "equity",
            PortfolioCategory::MutualFund => "mutual_fund",
            PortfolioCategory::Bond => "bond",
            PortfolioCategory::Other => "other",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            PortfolioCategory::Cash => "/myportofolio/summary-detail/kas",
            PortfolioCategory::Equity => "/myportofolio/summary-detail/ekuitas",
            PortfolioCategory::MutualFund => "/myportofolio/summary-detail/reksadana",
            PortfolioCategory::Bond => "/myportofolio/summary-detail/obligasi",
            PortfolioCategory::Other => "/myportofolio/summary-detail/lainnya",
        }
    }
}
