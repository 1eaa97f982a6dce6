//! 共享测试工具和辅助函数

#![allow(dead_code)]

use transip_webhook_provider::{ApiMode, ClientConfiguration, TransipClient};
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 测试用 RSA 私钥 (PKCS#8)
pub const TEST_KEY: &str = include_str!("../fixtures/test_key_pkcs8.pem");
/// Token returned by the mocked `/auth` endpoint.
pub const TEST_TOKEN: &str = "eyJ0eXAiOiJKV1QiLCJhbGciOiJSUzI1NiJ9.test";
pub const TEST_ACCOUNT: &str = "acme";

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Mounts a signed `/auth` endpoint and an authorized `/api-test` endpoint.
pub async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth"))
        .and(header_exists("Signature"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({ "token": TEST_TOKEN })),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api-test"))
        .and(header("Authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ping": "pong" })))
        .mount(server)
        .await;
}

/// Connects a client to the mock server.
pub async fn connect(
    server: &MockServer,
    mode: ApiMode,
) -> transip_webhook_provider::Result<TransipClient> {
    TransipClient::builder(ClientConfiguration::new(TEST_ACCOUNT, TEST_KEY).with_mode(mode))
        .base_url(server.uri())
        .connect()
        .await
}
