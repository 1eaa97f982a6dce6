//! ACME challenge request as sent by the certificate controller

use serde::{Deserialize, Serialize};

/// What the controller asks the solver to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeAction {
    Present,
    CleanUp,
}

/// A single DNS-01 challenge, in the controller's wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Unique id of this request.
    #[serde(default)]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ChallengeAction>,
    /// Challenge type, always `dns-01` here.
    #[serde(rename = "type", default)]
    pub challenge_type: String,
    /// Name being validated, e.g. `example.com`.
    #[serde(default)]
    pub dns_name: String,
    /// Token to publish in the TXT record.
    pub key: String,
    /// Namespace of the issuer; secrets without an explicit namespace are read from here.
    #[serde(default)]
    pub resource_namespace: String,
    /// Name of the TXT record, e.g. `_acme-challenge.example.com.`
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,
    /// Zone the controller resolved for `resolved_fqdn`, e.g. `example.com.`
    pub resolved_zone: String,
    #[serde(default)]
    pub allow_ambient_credentials: bool,
    /// Solver configuration from the issuer, decoded by [`crate::config::load_config`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::require_ok;

    #[test]
    fn parses_controller_wire_form() {
        let body = r#"{
            "uid": "0b3b1f5c",
            "action": "Present",
            "type": "dns-01",
            "dnsName": "example.com",
            "key": "LHDhK3oGRvkiefQnx7OOczTY5Tic_xZ6HcMOc_gmtoM",
            "resourceNamespace": "cert-manager",
            "resolvedFQDN": "_acme-challenge.example.com.",
            "resolvedZone": "example.com.",
            "allowAmbientCredentials": false,
            "config": { "accountName": "acme" }
        }"#;
        let req: Result<ChallengeRequest, _> = serde_json::from_str(body);
        let req = require_ok!(req);
        assert_eq!(req.action, Some(ChallengeAction::Present));
        assert_eq!(req.challenge_type, "dns-01");
        assert_eq!(req.resolved_fqdn, "_acme-challenge.example.com.");
        assert_eq!(req.resolved_zone, "example.com.");
        assert_eq!(req.resource_namespace, "cert-manager");
        assert!(req.config.is_some());
    }

    #[test]
    fn config_is_optional() {
        let body = r#"{"key":"k","resolvedFQDN":"_acme-challenge.example.com.","resolvedZone":"example.com."}"#;
        let req: Result<ChallengeRequest, _> = serde_json::from_str(body);
        assert!(matches!(req, Ok(r) if r.config.is_none() && r.action.is_none()));
    }
}
