/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

use crate::provider::{CredentialsError, ProvideCredentials};
use crate::Credentials;
use std::collections::HashMap;
use std::env::VarError;

/// Source of environment variables. Tests substitute a fixed map for the process environment.
#[derive(Debug, Clone)]
enum Env {
    Real,
    Fake(HashMap<String, String>),
}

impl Env {
    fn get(&self, key: &str) -> Result<String, VarError> {
        match self {
            Env::Real => std::env::var(key),
            Env::Fake(map) => map.get(key).cloned().ok_or(VarError::NotPresent),
        }
    }
}

/// Load Credentials from Environment Variables
///
/// `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` are required, `AWS_SECRET_KEY` is accepted
/// in place of the latter and `AWS_SESSION_TOKEN` is optional. Variables are read on every call,
/// nothing is cached.
#[derive(Debug, Clone)]
pub struct EnvironmentVariableCredentialsProvider {
    env: Env,
}

impl EnvironmentVariableCredentialsProvider {
    pub fn new() -> Self {
        EnvironmentVariableCredentialsProvider { env: Env::Real }
    }

    /// Create a provider that reads from `vars` instead of the process environment
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        EnvironmentVariableCredentialsProvider {
            env: Env::Fake(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl Default for EnvironmentVariableCredentialsProvider {
    fn default() -> Self {
        Self::new()
    }
}

const ENV_PROVIDER: &str = "EnvironmentVariable";

impl ProvideCredentials for EnvironmentVariableCredentialsProvider {
    fn provide_credentials(&self) -> Result<Credentials, CredentialsError> {
        let access_key = self
            .env
            .get("AWS_ACCESS_KEY_ID")
            .map_err(to_cred_error)?;
        let secret_key = self
            .env
            .get("AWS_SECRET_ACCESS_KEY")
            .or_else(|_| self.env.get("AWS_SECRET_KEY"))
            .map_err(to_cred_error)?;
        let session_token = self.env.get("AWS_SESSION_TOKEN").ok();
        Ok(Credentials::new(
            access_key,
            secret_key,
            session_token,
            None,
            ENV_PROVIDER,
        ))
    }
}

fn to_cred_error(err: VarError) -> CredentialsError {
    match err {
        VarError::NotPresent => CredentialsError::CredentialsNotLoaded,
        e @ VarError::NotUnicode(_) => CredentialsError::Unhandled(Box::new(e)),
    }
}

#[cfg(test)]
mod test {
    use super::EnvironmentVariableCredentialsProvider;
    use crate::provider::{CredentialsError, ProvideCredentials};

    #[test]
    fn valid_no_token() {
        let provider = EnvironmentVariableCredentialsProvider::from_vars(vec![
            ("AWS_ACCESS_KEY_ID", "access"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
        ]);
        let creds = provider.provide_credentials().expect("valid credentials");
        assert_eq!(creds.session_token(), None);
        assert_eq!(creds.access_key_id(), "access");
        assert_eq!(creds.secret_access_key(), "secret");
        assert_eq!(creds.provider_name(), "EnvironmentVariable");
    }

    #[test]
    fn valid_with_token_and_alternate_secret() {
        let provider = EnvironmentVariableCredentialsProvider::from_vars(vec![
            ("AWS_ACCESS_KEY_ID", "access"),
            ("AWS_SECRET_KEY", "secret"),
            ("AWS_SESSION_TOKEN", "token"),
        ]);
        let creds = provider.provide_credentials().expect("valid credentials");
        assert_eq!(creds.secret_access_key(), "secret");
        assert_eq!(creds.session_token(), Some("token"));
    }

    #[test]
    fn missing() {
        let provider = EnvironmentVariableCredentialsProvider::from_vars(Vec::<(&str, &str)>::new());
        assert!(matches!(
            provider.provide_credentials(),
            Err(CredentialsError::CredentialsNotLoaded)
        ));
    }
}
