//! Synchronous pre-write moderation gate
//!
//! Fail-closed: only an explicit acceptance from the policy checker lets a
//! comment through. Transport errors, timeouts and unexpected statuses all
//! reject.

use crate::clients::{ClientError, PolicyApi};
use crate::metrics::record_policy_decision;
use actix_middleware::CorrelationContext;
use resilience::with_timeout;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The checker found banned content
    Violation,
    /// The checker could not give an answer in time
    CheckerUnavailable,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Violation => write!(f, "Inappropriate content"),
            RejectReason::CheckerUnavailable => {
                write!(f, "Comment could not be verified, try again later")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Accept,
    Reject(RejectReason),
}

pub struct ModerationGate {
    policy: Arc<dyn PolicyApi>,
    timeout: Duration,
}

impl ModerationGate {
    pub fn new(policy: Arc<dyn PolicyApi>, timeout: Duration) -> Self {
        Self { policy, timeout }
    }

    pub async fn check_policy(&self, text: &str, ctx: &CorrelationContext) -> PolicyDecision {
        let decision = match with_timeout(self.timeout, self.policy.censor(text, ctx)).await {
            Ok(Ok(())) => PolicyDecision::Accept,
            Ok(Err(ClientError::Status(status))) if (400..500).contains(&status) => {
                info!(
                    request_id = %ctx.request_id(),
                    status,
                    "Policy checker rejected comment"
                );
                PolicyDecision::Reject(RejectReason::Violation)
            }
            Ok(Err(err)) => {
                warn!(
                    request_id = %ctx.request_id(),
                    error = %err,
                    "Policy checker failed, rejecting comment"
                );
                PolicyDecision::Reject(RejectReason::CheckerUnavailable)
            }
            Err(elapsed) => {
                warn!(
                    request_id = %ctx.request_id(),
                    error = %elapsed,
                    "Policy checker timed out, rejecting comment"
                );
                PolicyDecision::Reject(RejectReason::CheckerUnavailable)
            }
        };

        record_policy_decision(match decision {
            PolicyDecision::Accept => "accept",
            PolicyDecision::Reject(RejectReason::Violation) => "violation",
            PolicyDecision::Reject(RejectReason::CheckerUnavailable) => "unavailable",
        });
        decision
    }
}
