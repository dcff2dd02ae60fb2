//! Scripted collaborators for pipeline tests.
//!
//! `MockOracle` answers per address with a balance, an error or silence, after
//! an optional delay, and keeps a log of calls so tests can check batching,
//! concurrency and settle order. Pair with `#[tokio::test(start_paused = true)]`
//! so delays cost no wall-clock time.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use alloy::primitives::{utils::parse_ether, U256};
use epochval_common::Height;
use epochval_utils::serde::SerdeResponseParse;
use tokio::time::Instant;

use crate::collaborators::{BalanceOracle, OwnershipSnapshotSource, TimestampResolver};

pub fn eth(ether: &str) -> U256 {
    parse_ether(ether).unwrap()
}

pub fn addresses(list: &[&str]) -> Vec<String> {
    list.iter().map(|a| a.to_string()).collect()
}

/// `n` distinct well-formed addresses.
pub fn numbered_addresses(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("0x{i:040x}")).collect()
}

#[derive(Debug, Clone)]
enum Reply {
    Balance(U256),
    Error(String),
    Hang,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub address: String,
    pub height: Height,
    pub started_at: Instant,
}

#[derive(Debug, Default)]
struct CallLog {
    calls: Vec<Call>,
    completed: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MockOracle {
    replies: HashMap<String, Reply>,
    delays: HashMap<String, Duration>,
    default_reply: Option<Reply>,
    default_delay: Option<Duration>,
    log: Mutex<CallLog>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockOracle {
    pub fn with_balance(mut self, address: &str, balance: U256) -> Self {
        self.replies
            .insert(address.to_string(), Reply::Balance(balance));
        self
    }

    pub fn with_error(mut self, address: &str, message: &str) -> Self {
        self.replies
            .insert(address.to_string(), Reply::Error(message.to_string()));
        self
    }

    /// The lookup for `address` never answers.
    pub fn with_hang(mut self, address: &str) -> Self {
        self.replies.insert(address.to_string(), Reply::Hang);
        self
    }

    pub fn with_delay(mut self, address: &str, delay: Duration) -> Self {
        self.delays.insert(address.to_string(), delay);
        self
    }

    pub fn with_default_balance(mut self, balance: U256) -> Self {
        self.default_reply = Some(Reply::Balance(balance));
        self
    }

    pub fn with_default_error(mut self, message: &str) -> Self {
        self.default_reply = Some(Reply::Error(message.to_string()));
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().unwrap().calls.clone()
    }

    pub fn heights(&self) -> Vec<Height> {
        self.calls().into_iter().map(|c| c.height).collect()
    }

    /// Addresses in the order their lookups settled.
    pub fn completion_order(&self) -> Vec<String> {
        self.log.lock().unwrap().completed.clone()
    }

    /// Call start times grouped into runs of identical instants, i.e. one
    /// entry per batch as `(started_at, number_of_calls)`.
    pub fn call_waves(&self) -> Vec<(Instant, usize)> {
        let mut waves: Vec<(Instant, usize)> = Vec::new();
        for call in self.calls() {
            match waves.last_mut() {
                Some((at, count)) if *at == call.started_at => *count += 1,
                _ => waves.push((call.started_at, 1)),
            }
        }
        waves
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(oracle: &'a MockOracle) -> Self {
        let now = oracle.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        oracle.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(&oracle.in_flight)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl BalanceOracle for MockOracle {
    async fn balance_at(&self, address: &str, height: Height) -> epochval_utils::Result<U256> {
        self.log.lock().unwrap().calls.push(Call {
            address: address.to_string(),
            height,
            started_at: Instant::now(),
        });
        let _guard = InFlightGuard::enter(self);

        let delay = self.delays.get(address).copied().or(self.default_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .replies
            .get(address)
            .cloned()
            .or_else(|| self.default_reply.clone())
            .unwrap_or_else(|| Reply::Error(format!("no scripted balance for {address}")));

        let result = match reply {
            Reply::Balance(balance) => Ok(balance),
            Reply::Error(message) => Err(epochval_utils::Error::Rpc(message)),
            Reply::Hang => std::future::pending().await,
        };

        self.log.lock().unwrap().completed.push(address.to_string());
        result
    }
}

#[derive(Debug)]
pub struct MockResolver {
    reply: Result<Height, String>,
    requests: Mutex<Vec<u64>>,
}

impl MockResolver {
    pub fn height(height: Height) -> Self {
        Self {
            reply: Ok(height),
            requests: Mutex::default(),
        }
    }

    pub fn failing(result: &str) -> Self {
        Self {
            reply: Err(result.to_string()),
            requests: Mutex::default(),
        }
    }

    pub fn requests(&self) -> Vec<u64> {
        self.requests.lock().unwrap().clone()
    }
}

impl TimestampResolver for MockResolver {
    async fn resolve(&self, epoch_seconds: u64) -> epochval_utils::Result<Height> {
        self.requests.lock().unwrap().push(epoch_seconds);
        self.reply
            .clone()
            .map_err(|result| epochval_utils::Error::EtherscanStatus {
                status: "0".to_string(),
                message: "NOTOK".to_string(),
                result,
            })
    }
}

#[derive(Debug, Clone)]
pub enum SnapshotReply {
    Owners(Vec<String>),
    /// Body that does not parse as an owners page.
    Malformed,
    Unreachable,
    /// Later pages failed after earlier ones succeeded.
    PaginationStalled,
    /// Never answers.
    Hang,
}

#[derive(Debug)]
pub struct MockSnapshot {
    reply: SnapshotReply,
    heights: Mutex<Vec<Height>>,
}

impl MockSnapshot {
    pub fn new(reply: SnapshotReply) -> Self {
        Self {
            reply,
            heights: Mutex::default(),
        }
    }

    pub fn owners(list: &[&str]) -> Self {
        Self::new(SnapshotReply::Owners(addresses(list)))
    }

    pub fn heights(&self) -> Vec<Height> {
        self.heights.lock().unwrap().clone()
    }
}

impl OwnershipSnapshotSource for MockSnapshot {
    async fn snapshot(&self, height: Height) -> epochval_utils::Result<Vec<String>> {
        self.heights.lock().unwrap().push(height);
        match &self.reply {
            SnapshotReply::Owners(owners) => Ok(owners.clone()),
            SnapshotReply::Malformed => Err("<html>rate limited</html>"
                .serde_parse_custom::<Vec<String>>()
                .unwrap_err()
                .into()),
            SnapshotReply::Unreachable => Err(epochval_utils::Error::Internet(
                "https://eth-mainnet.g.alchemy.com/".parse().unwrap(),
            )),
            SnapshotReply::PaginationStalled => Err(epochval_utils::Error::AlchemyPagination {
                reason: "pageKey did not advance",
                pages: 4,
            }),
            SnapshotReply::Hang => std::future::pending().await,
        }
    }
}
