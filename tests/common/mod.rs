//! Common test utilities and helpers for integration tests
//! Provides a scripted transport, recording collaborators, and response-tree builders

#![allow(dead_code)]

use async_trait::async_trait;
use g2_groups::error::{GroupError, Result};
use g2_groups::models::{GroupEvent, UpsertKind, WebMessageInfo};
use g2_groups::node::BinaryNode;
use g2_groups::services::{EventSink, GroupService, MessageStore, Transport};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ME: &str = "15550000000@s.whatsapp.net";

/// Ordered record of everything the collaborators saw, shared between them
#[derive(Clone, Default)]
pub struct Timeline(Arc<Mutex<Vec<String>>>);

impl Timeline {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

type Responder = Box<dyn Fn(&BinaryNode) -> Result<BinaryNode> + Send + Sync>;

/// Transport answering each request through a closure
pub struct ScriptedTransport {
    responder: Responder,
    delay: Mutex<Option<Box<dyn Fn(&BinaryNode) -> Duration + Send + Sync>>>,
    pub requests: Mutex<Vec<BinaryNode>>,
    pub cleaned: Mutex<Vec<String>>,
    timeline: Timeline,
}

impl ScriptedTransport {
    pub fn new<F>(timeline: Timeline, responder: F) -> Self
    where
        F: Fn(&BinaryNode) -> Result<BinaryNode> + Send + Sync + 'static,
    {
        ScriptedTransport {
            responder: Box::new(responder),
            delay: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            cleaned: Mutex::new(Vec::new()),
            timeline,
        }
    }

    /// Answer every request with the same tree
    pub fn fixed(timeline: Timeline, response: BinaryNode) -> Self {
        Self::new(timeline, move |_| Ok(response.clone()))
    }

    /// Fail every request with a transport error
    pub fn failing(timeline: Timeline) -> Self {
        Self::new(timeline, |_| Err(GroupError::Transport("connection closed".to_string())))
    }

    pub fn set_delay<F>(&self, delay: F)
    where
        F: Fn(&BinaryNode) -> Duration + Send + Sync + 'static,
    {
        *self.delay.lock().unwrap() = Some(Box::new(delay));
    }

    pub fn requests(&self) -> Vec<BinaryNode> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Tag of the single content node of an `iq`
pub fn body_tag(request: &BinaryNode) -> String {
    request
        .children()
        .first()
        .map(|c| c.tag.clone())
        .unwrap_or_default()
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn query(&self, request: BinaryNode) -> Result<BinaryNode> {
        let tag = body_tag(&request);
        self.timeline.push(format!("query:{}", tag));
        self.requests.lock().unwrap().push(request.clone());

        let delay = self.delay.lock().unwrap().as_ref().map(|d| d(&request));
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = (self.responder)(&request);
        self.timeline.push(format!("response:{}", tag));
        response
    }

    async fn clean_dirty_bits(&self, kind: &str) -> Result<()> {
        self.timeline.push(format!("clean:{}", kind));
        self.cleaned.lock().unwrap().push(kind.to_string());
        Ok(())
    }
}

/// Keeps every published event
pub struct RecordingSink {
    pub events: Mutex<Vec<GroupEvent>>,
    timeline: Timeline,
}

impl RecordingSink {
    pub fn new(timeline: Timeline) -> Self {
        RecordingSink {
            events: Mutex::new(Vec::new()),
            timeline,
        }
    }

    pub fn events(&self) -> Vec<GroupEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: GroupEvent) {
        self.timeline.push(format!("event:{}", event.name()));
        self.events.lock().unwrap().push(event);
    }
}

/// In-memory message store
pub struct MemoryStore {
    pub messages: Mutex<Vec<(WebMessageInfo, UpsertKind)>>,
    timeline: Timeline,
}

impl MemoryStore {
    pub fn new(timeline: Timeline) -> Self {
        MemoryStore {
            messages: Mutex::new(Vec::new()),
            timeline,
        }
    }

    pub fn messages(&self) -> Vec<(WebMessageInfo, UpsertKind)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn upsert_message(&self, message: WebMessageInfo, kind: UpsertKind) -> Result<()> {
        self.timeline.push(format!("upsert:{}", message.key.remote_jid));
        self.messages.lock().unwrap().push((message, kind));
        Ok(())
    }
}

/// Service wired to recording collaborators
pub struct TestContext {
    pub service: Arc<GroupService>,
    pub transport: Arc<ScriptedTransport>,
    pub sink: Arc<RecordingSink>,
    pub store: Arc<MemoryStore>,
    pub timeline: Timeline,
}

impl TestContext {
    pub fn with_transport(build: impl FnOnce(Timeline) -> ScriptedTransport) -> Self {
        let timeline = Timeline::default();
        let transport = Arc::new(build(timeline.clone()));
        let sink = Arc::new(RecordingSink::new(timeline.clone()));
        let store = Arc::new(MemoryStore::new(timeline.clone()));
        let service = Arc::new(GroupService::new(
            transport.clone(),
            sink.clone(),
            store.clone(),
            ME,
        ));

        TestContext {
            service,
            transport,
            sink,
            store,
            timeline,
        }
    }

    pub fn responding(response: BinaryNode) -> Self {
        Self::with_transport(|timeline| ScriptedTransport::fixed(timeline, response))
    }
}

/// Helper for building `<group>` response nodes
pub struct GroupNodeBuilder {
    node: BinaryNode,
    children: Vec<BinaryNode>,
}

impl GroupNodeBuilder {
    pub fn new(id: &str) -> Self {
        GroupNodeBuilder {
            node: BinaryNode::new("group").with_attr("id", id),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.node = self.node.with_attr(name, value);
        self
    }

    pub fn subject(self, subject: &str) -> Self {
        self.attr("subject", subject)
    }

    pub fn participant(mut self, jid: &str, role: Option<&str>) -> Self {
        let mut node = BinaryNode::new("participant").with_attr("jid", jid);
        if let Some(role) = role {
            node = node.with_attr("type", role);
        }
        self.children.push(node);
        self
    }

    pub fn description(mut self, id: &str, body: &str) -> Self {
        self.children.push(
            BinaryNode::new("description")
                .with_attr("id", id)
                .with_attr("t", "1700000000")
                .with_children(vec![BinaryNode::new("body").with_bytes(body.as_bytes().to_vec())]),
        );
        self
    }

    pub fn flag(mut self, tag: &str) -> Self {
        self.children.push(BinaryNode::new(tag));
        self
    }

    pub fn build(self) -> BinaryNode {
        self.node.with_children(self.children)
    }
}

/// Wrap nodes in an `iq type=result`
pub fn result_iq(children: Vec<BinaryNode>) -> BinaryNode {
    BinaryNode::new("iq")
        .with_attr("type", "result")
        .with_children(children)
}
