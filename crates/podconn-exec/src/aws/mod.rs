//! Credential issuer backed by `aws eks get-token`.
use async_trait::async_trait;
use serde::Deserialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::debug;

use podconn_core::{CredentialError, CredentialIssuer, IssuedToken};

use crate::{CommandSpec, ExecError, run_captured};

/// Issues EKS cluster tokens through the AWS CLI.
#[derive(Debug, Clone)]
pub struct EksTokenIssuer {
    program: String,
    cluster: String,
}

impl EksTokenIssuer {
    pub fn new(cluster: impl Into<String>) -> Self {
        Self {
            program: "aws".to_string(),
            cluster: cluster.into(),
        }
    }

    /// Use a different `aws` executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self) -> CommandSpec {
        CommandSpec::new(&self.program).args([
            "eks",
            "get-token",
            "--cluster-name",
            self.cluster.as_str(),
            "--output",
            "json",
        ])
    }
}

#[async_trait]
impl CredentialIssuer for EksTokenIssuer {
    fn name(&self) -> &'static str {
        "aws-eks"
    }

    async fn issue(&self) -> Result<IssuedToken, CredentialError> {
        debug!(cluster = %self.cluster, "requesting eks token");
        let stdout = run_captured(&self.command())
            .await
            .map_err(|e| CredentialError::Issuer(e.to_string()))?;
        parse_token_response(&stdout).map_err(|e| CredentialError::Issuer(e.to_string()))
    }
}

/// Accepted issuer answers: a flat `{token, expiry}` object or a
/// Kubernetes `ExecCredential` document.
#[derive(Deserialize)]
#[serde(untagged)]
enum TokenResponse {
    Flat {
        token: String,
        #[serde(default)]
        expiry: Option<i64>,
    },
    ExecCredential {
        status: ExecCredentialStatus,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecCredentialStatus {
    token: String,
    #[serde(default)]
    expiration_timestamp: Option<String>,
}

/// Parse the JSON printed by the issuer.
pub fn parse_token_response(raw: &str) -> Result<IssuedToken, ExecError> {
    let resp: TokenResponse = serde_json::from_str(raw)
        .map_err(|e| ExecError::InvalidOutput(format!("unexpected token response: {e}")))?;

    let (token, expiry_unix) = match resp {
        TokenResponse::Flat { token, expiry } => (token, expiry),
        TokenResponse::ExecCredential { status } => {
            let expiry = status
                .expiration_timestamp
                .as_deref()
                .and_then(|ts| OffsetDateTime::parse(ts, &Rfc3339).ok())
                .map(OffsetDateTime::unix_timestamp);
            (status.token, expiry)
        }
    };
    if token.trim().is_empty() {
        return Err(ExecError::InvalidOutput("issuer returned an empty token".into()));
    }
    Ok(IssuedToken::new(token, expiry_unix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_response() {
        let t = parse_token_response(r#"{"token": "abc", "expiry": 1700000300}"#).unwrap();
        assert_eq!(t.token, "abc");
        assert_eq!(t.expiry_unix, Some(1_700_000_300));
    }

    #[test]
    fn parses_exec_credential() {
        let raw = r#"{
            "kind": "ExecCredential",
            "apiVersion": "client.authentication.k8s.io/v1beta1",
            "spec": {},
            "status": {
                "expirationTimestamp": "2024-05-01T12:14:00Z",
                "token": "k8s-aws-v1.aHR0cHM6Ly9zdHM"
            }
        }"#;
        let t = parse_token_response(raw).unwrap();

        assert_eq!(t.token, "k8s-aws-v1.aHR0cHM6Ly9zdHM");
        assert_eq!(t.expiry_unix, Some(1_714_565_640));
    }

    #[test]
    fn unparseable_expiry_is_ignored() {
        let raw = r#"{"status": {"token": "abc", "expirationTimestamp": "soon"}}"#;
        let t = parse_token_response(raw).unwrap();
        assert_eq!(t.token, "abc");
        assert_eq!(t.expiry_unix, None);
    }

    #[test]
    fn rejects_garbage_and_empty_token() {
        for raw in ["", "not json", r#"{"foo": 1}"#, r#"{"token": "  "}"#] {
            assert!(parse_token_response(raw).is_err(), "expected error for {raw:?}");
        }
    }

    #[test]
    fn command_line() {
        let issuer = EksTokenIssuer::new("fpms-prod");
        let cmd = issuer.command();
        assert_eq!(cmd.program(), "aws");
        assert_eq!(
            cmd.arg_list(),
            ["eks", "get-token", "--cluster-name", "fpms-prod", "--output", "json"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn issue_runs_program_and_parses_stdout() {
        // `sh -c <script> eks get-token ...`: the trailing args land in $0.. and are ignored
        let issuer = EksTokenIssuer::new("c").with_program("sh");
        let mut cmd = issuer.command();
        cmd.args.insert(0, r#"echo '{"token":"abc","expiry":1}'"#.into());
        cmd.args.insert(0, "-c".into());

        let out = run_captured(&cmd).await.unwrap();
        let t = parse_token_response(&out).unwrap();
        assert_eq!(t.token, "abc");
    }
}
