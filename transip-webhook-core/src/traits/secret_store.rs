//! Secret 存储抽象 Trait

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::CoreResult;

/// Secret 内容：key -> 原始字节
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Secret 存储 Trait
///
/// 平台实现:
/// - Kubernetes: [`KubeSecretStore`](crate::adapters::KubeSecretStore)
/// - 测试: in-memory mock
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// 读取一个 Secret
    ///
    /// # Arguments
    /// * `namespace` - 命名空间
    /// * `name` - Secret 名称
    ///
    /// # Returns
    /// * `Ok(Some(data))` - Secret 存在
    /// * `Ok(None)` - Secret 不存在
    async fn get_secret(&self, namespace: &str, name: &str) -> CoreResult<Option<SecretData>>;
}
