use crate::domain::ports::{Processor, ProcessorOperation, ProcessorRequest, RawReply};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
enum Scripted {
    Reply(RawReply),
    Unreachable(String),
}

#[derive(Debug, Default)]
struct StubState {
    replies: HashMap<ProcessorOperation, VecDeque<Scripted>>,
    requests: Vec<ProcessorRequest>,
}

/// A scripted, in-process processor.
///
/// Replies are queued per operation and handed out in order; the last one
/// queued keeps being returned, so a single script line answers any number
/// of calls. Every dispatched request is recorded for inspection. Clones
/// share the same script and recording, which lets a test keep a handle after
/// boxing the stub into a gateway.
#[derive(Debug, Default, Clone)]
pub struct StubProcessor {
    state: Arc<Mutex<StubState>>,
}

impl StubProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, operation: ProcessorOperation, scripted: Scripted) {
        self.state()
            .replies
            .entry(operation)
            .or_default()
            .push_back(scripted);
    }

    /// Queues a reply for `operation`.
    pub fn reply_with(&self, operation: ProcessorOperation, reply: RawReply) {
        self.push(operation, Scripted::Reply(reply));
    }

    /// Queues a transport failure for `operation`.
    pub fn fail_with(&self, operation: ProcessorOperation, reason: impl Into<String>) {
        self.push(operation, Scripted::Unreachable(reason.into()));
    }

    /// Requests dispatched so far, oldest first.
    pub fn requests(&self) -> Vec<ProcessorRequest> {
        self.state().requests.clone()
    }
}

#[async_trait]
impl Processor for StubProcessor {
    async fn dispatch(&self, request: ProcessorRequest) -> Result<RawReply> {
        let mut state = self.state();
        let operation = request.operation;
        state.requests.push(request);

        let queue = state.replies.get_mut(&operation);
        let scripted = match queue {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match scripted {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Unreachable(reason)) => Err(GatewayError::integration(reason)),
            None => Err(GatewayError::integration(format!(
                "no scripted reply for {}",
                operation.path()
            ))),
        }
    }
}
