//! Scripted oracle for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{
    Corner, GenerationRequest, JudgmentRequest, Oracle, OracleError, Verdict,
};

/// Scripted [`Oracle`] implementation for tests.
///
/// Queued replies are consumed in order; once a queue runs dry the mock
/// falls back to canned successes (or, for [`MockOracle::failing`],
/// permanent failures). This keeps long scenario tests from having to
/// script every single call.
pub struct MockOracle {
    generations: Mutex<VecDeque<Result<String, OracleError>>>,
    verdicts: Mutex<VecDeque<Result<Verdict, OracleError>>>,
    fail_by_default: bool,
}

impl MockOracle {
    /// A mock whose unscripted calls succeed with canned content.
    pub fn new() -> Self {
        Self {
            generations: Mutex::new(VecDeque::new()),
            verdicts: Mutex::new(VecDeque::new()),
            fail_by_default: false,
        }
    }

    /// A mock whose unscripted calls all fail, simulating a dead oracle.
    pub fn failing() -> Self {
        Self {
            generations: Mutex::new(VecDeque::new()),
            verdicts: Mutex::new(VecDeque::new()),
            fail_by_default: true,
        }
    }

    /// Queue the next generation reply.
    pub fn push_generation(&self, reply: Result<String, OracleError>) {
        self.generations
            .lock()
            .expect("mock lock poisoned")
            .push_back(reply);
    }

    /// Queue the next judgment reply.
    pub fn push_verdict(&self, reply: Result<Verdict, OracleError>) {
        self.verdicts
            .lock()
            .expect("mock lock poisoned")
            .push_back(reply);
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Oracle for MockOracle {
    async fn generate(&self, request: GenerationRequest) -> Result<String, OracleError> {
        if let Some(reply) = self
            .generations
            .lock()
            .expect("mock lock poisoned")
            .pop_front()
        {
            return reply;
        }
        if self.fail_by_default {
            return Err(OracleError::Unavailable("mock oracle is down".to_string()));
        }
        Ok(format!("canned output for {}", request.battle_kind))
    }

    async fn judge(&self, _request: JudgmentRequest) -> Result<Verdict, OracleError> {
        if let Some(reply) = self
            .verdicts
            .lock()
            .expect("mock lock poisoned")
            .pop_front()
        {
            return reply;
        }
        if self.fail_by_default {
            return Err(OracleError::Unavailable("mock oracle is down".to_string()));
        }
        Ok(Verdict {
            winner: Corner::A,
            reason: "scripted win".to_string(),
        })
    }
}
