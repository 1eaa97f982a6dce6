//! 测试辅助模块
//!
//! 提供 mock 实现：内存 Secret 存储、内存 DNS API、固定结果的 zone finder、本地 UDP 权威服务器。

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfig, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_resolver::proto::rr::rdata::{CNAME, SOA};
use hickory_resolver::proto::rr::{Name, RData, Record};
use hickory_resolver::proto::xfer::Protocol;
use hickory_resolver::TokioResolver;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use transip_webhook_provider::{
    ClientConfiguration, DnsEntry, DnsEntryRepository, Domain, ProviderError,
};

use crate::error::{CoreError, CoreResult};
use crate::traits::{DnsClientFactory, SecretData, SecretStore, ZoneFinder};

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {:?}", res.as_ref().err());
        let Ok(val) = res else {
            return;
        };
        val
    }};
}
pub(crate) use require_ok;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ===== MockSecretStore =====

pub struct MockSecretStore {
    secrets: Mutex<HashMap<(String, String), SecretData>>,
    lookups: AtomicUsize,
}

impl MockSecretStore {
    pub fn new() -> Self {
        Self {
            secrets: Mutex::new(HashMap::new()),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, namespace: &str, name: &str, data: &[(&str, &[u8])]) {
        let data = data
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.to_vec()))
            .collect();
        lock(&self.secrets).insert((namespace.to_string(), name.to_string()), data);
    }

    /// 调用 `get_secret` 的次数
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for MockSecretStore {
    async fn get_secret(&self, namespace: &str, name: &str) -> CoreResult<Option<SecretData>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.secrets)
            .get(&(namespace.to_string(), name.to_string()))
            .cloned())
    }
}

// ===== FakeDnsApi =====

/// In-memory TransIP account. Counts mutating calls.
pub struct FakeDnsApi {
    domains: Mutex<HashMap<String, Vec<DnsEntry>>>,
    add_calls: AtomicUsize,
    remove_calls: AtomicUsize,
    fail_mutations: AtomicBool,
}

impl FakeDnsApi {
    pub fn with_domain(domain: &str) -> Self {
        let mut domains = HashMap::new();
        domains.insert(domain.to_string(), Vec::new());
        Self {
            domains: Mutex::new(domains),
            add_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
            fail_mutations: AtomicBool::new(false),
        }
    }

    /// 直接写入一条记录（不计入调用次数）
    pub fn seed(&self, domain: &str, entry: DnsEntry) {
        lock(&self.domains)
            .entry(domain.to_string())
            .or_default()
            .push(entry);
    }

    pub fn entries(&self, domain: &str) -> Vec<DnsEntry> {
        lock(&self.domains).get(domain).cloned().unwrap_or_default()
    }

    /// 之后所有 add/remove 返回网络错误
    pub fn fail_mutations(&self) {
        self.fail_mutations.store(true, Ordering::SeqCst);
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    pub fn remove_calls(&self) -> usize {
        self.remove_calls.load(Ordering::SeqCst)
    }

    fn domain_not_found(domain: &str) -> ProviderError {
        ProviderError::DomainNotFound {
            provider: "fake".to_string(),
            domain: domain.to_string(),
            raw_message: None,
        }
    }

    fn check_mutations(&self) -> transip_webhook_provider::Result<()> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ProviderError::NetworkError {
                provider: "fake".to_string(),
                detail: "connection reset".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DnsEntryRepository for FakeDnsApi {
    fn id(&self) -> &'static str {
        "fake"
    }

    async fn test_connection(&self) -> transip_webhook_provider::Result<()> {
        Ok(())
    }

    async fn get_domain(&self, domain_name: &str) -> transip_webhook_provider::Result<Domain> {
        if !lock(&self.domains).contains_key(domain_name) {
            return Err(Self::domain_not_found(domain_name));
        }
        Ok(Domain {
            name: domain_name.to_string(),
            is_dns_only: false,
            is_transfer_locked: false,
            registration_date: None,
            renewal_date: None,
        })
    }

    async fn list_entries(
        &self,
        domain_name: &str,
    ) -> transip_webhook_provider::Result<Vec<DnsEntry>> {
        lock(&self.domains)
            .get(domain_name)
            .cloned()
            .ok_or_else(|| Self::domain_not_found(domain_name))
    }

    async fn add_entry(
        &self,
        domain_name: &str,
        entry: &DnsEntry,
    ) -> transip_webhook_provider::Result<()> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.check_mutations()?;
        lock(&self.domains)
            .get_mut(domain_name)
            .ok_or_else(|| Self::domain_not_found(domain_name))?
            .push(entry.clone());
        Ok(())
    }

    async fn remove_entry(
        &self,
        domain_name: &str,
        entry: &DnsEntry,
    ) -> transip_webhook_provider::Result<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        self.check_mutations()?;
        let mut domains = lock(&self.domains);
        let entries = domains
            .get_mut(domain_name)
            .ok_or_else(|| Self::domain_not_found(domain_name))?;
        let Some(idx) = entries.iter().position(|e| e == entry) else {
            return Err(ProviderError::RecordNotFound {
                provider: "fake".to_string(),
                record_name: entry.name.clone(),
                raw_message: None,
            });
        };
        entries.remove(idx);
        Ok(())
    }
}

// ===== MockClientFactory =====

/// Hands out the same [`FakeDnsApi`] for every session and records the configurations.
pub struct MockClientFactory {
    api: Arc<FakeDnsApi>,
    configs: Mutex<Vec<ClientConfiguration>>,
}

impl MockClientFactory {
    pub fn new(api: Arc<FakeDnsApi>) -> Self {
        Self {
            api,
            configs: Mutex::new(Vec::new()),
        }
    }

    pub fn configs(&self) -> Vec<ClientConfiguration> {
        lock(&self.configs).clone()
    }
}

#[async_trait]
impl DnsClientFactory for MockClientFactory {
    async fn connect(
        &self,
        config: ClientConfiguration,
    ) -> CoreResult<Arc<dyn DnsEntryRepository>> {
        lock(&self.configs).push(config);
        Ok(self.api.clone())
    }
}

// ===== MockZoneFinder =====

pub struct MockZoneFinder {
    zone: Option<String>,
}

impl MockZoneFinder {
    pub fn with_zone(zone: &str) -> Self {
        Self {
            zone: Some(zone.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { zone: None }
    }
}

#[async_trait]
impl ZoneFinder for MockZoneFinder {
    async fn find_zone_by_fqdn(&self, fqdn: &str) -> CoreResult<String> {
        self.zone
            .clone()
            .ok_or_else(|| CoreError::ZoneNotFound(fqdn.to_string()))
    }
}

// ===== FakeNameServer =====

/// How [`FakeNameServer`] answers an SOA query for one name. Unlisted names get NXDOMAIN.
#[derive(Clone)]
pub enum FakeAnswer {
    /// SOA owned by the queried name (zone apex).
    Apex,
    /// SOA owned by another name, placed in the answer section.
    SoaOf(&'static str),
    /// CNAME to `target`, followed by an SOA owned by `target`.
    Cname(&'static str),
    ServFail,
}

/// Authoritative-looking DNS server on a random localhost UDP port.
pub struct FakeNameServer {
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl FakeNameServer {
    pub async fn start(answers: &[(&str, FakeAnswer)]) -> std::io::Result<Self> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let answers: HashMap<Name, FakeAnswer> = answers
            .iter()
            .filter_map(|(name, answer)| Some((Name::from_ascii(name).ok()?, answer.clone())))
            .collect();

        let task = tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                    break;
                };
                let Ok(request) = Message::from_vec(&buf[..len]) else {
                    continue;
                };
                if let Ok(bytes) = Self::respond(&request, &answers).to_vec() {
                    let _ = socket.send_to(&bytes, peer).await;
                }
            }
        });

        Ok(Self { addr, task })
    }

    /// Resolver that only talks to this server, without retries.
    pub fn resolver(&self) -> TokioResolver {
        let mut config = ResolverConfig::new();
        config.add_name_server(NameServerConfig::new(self.addr, Protocol::Udp));
        let mut options = ResolverOpts::default();
        options.timeout = Duration::from_secs(1);
        options.attempts = 1;
        TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(options)
            .build()
    }

    fn respond(request: &Message, answers: &HashMap<Name, FakeAnswer>) -> Message {
        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(request.recursion_desired())
            .set_recursion_available(true);

        let Some(query) = request.queries().first() else {
            response.set_response_code(ResponseCode::FormErr);
            return response;
        };
        response.add_query(query.clone());

        match answers.get(query.name()) {
            Some(FakeAnswer::Apex) => {
                response.add_answer(soa_record(query.name().clone()));
            }
            Some(FakeAnswer::SoaOf(owner)) => {
                if let Ok(owner) = Name::from_ascii(owner) {
                    response.add_answer(soa_record(owner));
                }
            }
            Some(FakeAnswer::Cname(target)) => {
                if let Ok(target) = Name::from_ascii(target) {
                    response.add_answer(Record::from_rdata(
                        query.name().clone(),
                        300,
                        RData::CNAME(CNAME(target.clone())),
                    ));
                    response.add_answer(soa_record(target));
                }
            }
            Some(FakeAnswer::ServFail) => {
                response.set_response_code(ResponseCode::ServFail);
            }
            None => {
                response
                    .set_response_code(ResponseCode::NXDomain)
                    .add_name_server(soa_record(Name::root()));
            }
        }
        response
    }
}

impl Drop for FakeNameServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn soa_record(owner: Name) -> Record {
    let soa = SOA::new(
        Name::from_ascii("ns1.example.net.").unwrap_or_else(|_| Name::root()),
        Name::from_ascii("hostmaster.example.net.").unwrap_or_else(|_| Name::root()),
        2_024_010_101,
        7200,
        3600,
        1_209_600,
        300,
    );
    Record::from_rdata(owner, 300, RData::SOA(soa))
}
