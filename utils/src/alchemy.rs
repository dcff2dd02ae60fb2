use std::{future::Future, time::Duration};

use alloy::primitives::Address;
use serde::Deserialize;

use crate::{config::Config, Reqwest};

/// Upper bound on followed `pageKey`s. Collections top out far below this.
const MAX_PAGES: usize = 1_000;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct OwnersPage {
    owner_addresses: Vec<String>,
    page_key: Option<String>,
}

/// Calls `fetch_page` with the previous page's key until a page comes back
/// without one. Owners are concatenated in page order. An empty `pageKey`
/// counts as the last page.
async fn collect_pages<F, Fut>(mut fetch_page: F) -> crate::Result<Vec<String>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = crate::Result<OwnersPage>>,
{
    let mut owners = Vec::new();
    let mut page_key: Option<String> = None;

    for pages in 1..=MAX_PAGES {
        let page = fetch_page(page_key.clone()).await?;

        log::debug!(
            "Owners page {pages} with {} addresses (more: {})",
            page.owner_addresses.len(),
            page.page_key.is_some()
        );

        owners.extend(page.owner_addresses);
        match page.page_key.filter(|key| !key.is_empty()) {
            Some(next) if page_key.as_deref() != Some(next.as_str()) => page_key = Some(next),
            Some(_) => {
                return Err(crate::Error::AlchemyPagination {
                    reason: "pageKey did not advance",
                    pages,
                })
            }
            None => return Ok(owners),
        }
    }

    Err(crate::Error::AlchemyPagination {
        reason: "too many owner pages",
        pages: MAX_PAGES,
    })
}

pub struct Alchemy {
    api_key: String,
    network: String,
    timeout: Duration,
}

impl Alchemy {
    pub fn new(config: &Config) -> crate::Result<Self> {
        Ok(Self {
            api_key: config.alchemy_api_key()?.to_string(),
            network: config.alchemy_network.clone(),
            timeout: config.fetch_timeout(),
        })
    }

    fn nft_url(&self, method: &str) -> String {
        format!(
            "https://{}.g.alchemy.com/nft/v2/{}/{method}",
            self.network, self.api_key
        )
    }

    async fn owners_page(
        &self,
        contract: &str,
        block: &str,
        page_key: Option<String>,
    ) -> crate::Result<OwnersPage> {
        let mut query = vec![("contractAddress", contract), ("block", block)];
        if let Some(key) = page_key.as_deref() {
            query.push(("pageKey", key));
        }

        Reqwest::get(self.nft_url("getOwnersForCollection"))?
            .query(&query)
            .timeout(self.timeout)
            .redact(&self.api_key)
            .receive_json::<OwnersPage>()
            .await
    }

    // docs: https://docs.alchemy.com/reference/getownersforcollection
    /// Owners of `contract` as of `block`, in the order Alchemy returns them.
    /// Follows `pageKey` until the last page.
    pub async fn get_owners_for_collection(
        &self,
        contract: Address,
        block: u64,
    ) -> crate::Result<Vec<String>> {
        let contract = contract.to_string();
        let block = block.to_string();

        collect_pages(|page_key| self.owners_page(&contract, &block, page_key)).await
    }
}
