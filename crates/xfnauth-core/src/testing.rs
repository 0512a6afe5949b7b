//! Test doubles shared by the unit tests in this crate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{TimeDelta, Utc};
use xfnauth_types::credentials::Credentials;
use xfnauth_types::error::StsError;

use crate::sts::{AssumeRoleRequest, StsClient, WebIdentityRequest};

/// Records every STS call and answers with credentials derived from the
/// requested role ARN. Clones share their call log.
#[derive(Clone, Default)]
pub struct MockSts {
    pub assume_role_calls: Arc<Mutex<Vec<AssumeRoleRequest>>>,
    pub web_identity_calls: Arc<Mutex<Vec<WebIdentityRequest>>>,
    pub total: Arc<AtomicUsize>,
    pub fail_with: Option<String>,
}

impl MockSts {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn assumed_roles(&self) -> Vec<String> {
        self.assume_role_calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.role_arn.clone())
            .collect()
    }

    fn answer(&self, role_arn: &str) -> Result<Credentials, StsError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(StsError::Service(message.clone())),
            None => Ok(Credentials::new(
                format!("ASIA-{role_arn}"),
                "sts-secret",
                "sts-token",
                Some(Utc::now() + TimeDelta::hours(1)),
                "Sts",
            )),
        }
    }
}

impl StsClient for MockSts {
    async fn assume_role(&self, request: &AssumeRoleRequest) -> Result<Credentials, StsError> {
        self.assume_role_calls.lock().unwrap().push(request.clone());
        self.answer(&request.role_arn)
    }

    async fn assume_role_with_web_identity(
        &self,
        request: &WebIdentityRequest,
    ) -> Result<Credentials, StsError> {
        self.web_identity_calls.lock().unwrap().push(request.clone());
        self.answer(&request.role_arn)
    }
}
