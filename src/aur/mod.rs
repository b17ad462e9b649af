// src/aur/mod.rs

//! AUR RPC client
//!
//! Wraps the `/rpc/?v=5` interface with retry support. Only the lookups
//! the resolution core needs are implemented: batched `type=info` requests
//! and `type=search&by=provides` for provider discovery.

use crate::error::{Error, Result};
use crate::package::SourcePackage;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum retry attempts for failed requests
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds
const RETRY_DELAY_MS: u64 = 1000;

/// Packages per info request; the AUR rejects overlong query strings
const INFO_CHUNK: usize = 100;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    results: Vec<RpcPackage>,
}

/// One package document as the RPC serialises it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RpcPackage {
    name: String,
    package_base: String,
    version: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    maintainer: Option<String>,
    #[serde(default)]
    num_votes: u64,
    #[serde(default)]
    popularity: f64,
    #[serde(default)]
    out_of_date: Option<i64>,
    #[serde(default)]
    depends: Vec<String>,
    #[serde(default)]
    make_depends: Vec<String>,
    #[serde(default)]
    check_depends: Vec<String>,
    #[serde(default)]
    provides: Vec<String>,
    #[serde(default)]
    conflicts: Vec<String>,
}

impl From<RpcPackage> for SourcePackage {
    fn from(pkg: RpcPackage) -> Self {
        SourcePackage {
            name: pkg.name,
            package_base: pkg.package_base,
            version: pkg.version,
            description: pkg.description,
            depends: pkg.depends,
            make_depends: pkg.make_depends,
            check_depends: pkg.check_depends,
            provides: pkg.provides,
            conflicts: pkg.conflicts,
            maintainer: pkg.maintainer,
            votes: pkg.num_votes,
            popularity: pkg.popularity,
            out_of_date: pkg.out_of_date,
        }
    }
}

/// Client for the user-contributed source index
pub struct AurClient {
    client: Client,
    rpc_url: String,
}

impl AurClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            client,
            rpc_url: format!("{}/rpc/", base_url.trim_end_matches('/')),
        })
    }

    /// Fetch full package documents for the given names
    ///
    /// Names the AUR does not know are simply absent from the result.
    pub fn info<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<SourcePackage>> {
        let mut packages = Vec::new();

        for chunk in names.chunks(INFO_CHUNK) {
            let mut params: Vec<(&str, &str)> = vec![("v", "5"), ("type", "info")];
            for name in chunk {
                params.push(("arg[]", name.as_ref()));
            }

            let response = self.get_with_retry(&params)?;
            packages.extend(response.results.into_iter().map(SourcePackage::from));
        }

        debug!("AUR info returned {} of {} packages", packages.len(), names.len());
        Ok(packages)
    }

    /// Names of packages that provide the given virtual name
    pub fn providers_for(&self, name: &str) -> Result<Vec<String>> {
        let params = [
            ("v", "5"),
            ("type", "search"),
            ("by", "provides"),
            ("arg", name),
        ];

        let response = self.get_with_retry(&params)?;
        Ok(response.results.into_iter().map(|pkg| pkg.name).collect())
    }

    fn get_with_retry(&self, params: &[(&str, &str)]) -> Result<RpcResponse> {
        for attempt in 1..=MAX_RETRIES {
            match self
                .client
                .get(self.rpc_url.as_str())
                .query(params)
                .send()
                .and_then(|resp| resp.error_for_status())
            {
                Ok(resp) => {
                    let body: RpcResponse = resp.json()?;
                    return check_response(body);
                }
                Err(err) => {
                    warn!(
                        "AUR request failed (attempt {}/{}): {}",
                        attempt, MAX_RETRIES, err
                    );
                    if attempt == MAX_RETRIES {
                        return Err(err.into());
                    }
                    std::thread::sleep(Duration::from_millis(RETRY_DELAY_MS * attempt as u64));
                }
            }
        }

        unreachable!("retry loop always returns")
    }
}

fn check_response(body: RpcResponse) -> Result<RpcResponse> {
    if body.kind == "error" {
        return Err(Error::AurResponse(
            body.error.unwrap_or_else(|| "unspecified error".to_string()),
        ));
    }
    Ok(body)
}
