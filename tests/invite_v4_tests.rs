/// Integration tests for accepting invites received as messages
mod common;

use async_trait::async_trait;
use common::{result_iq, MemoryStore, RecordingSink, ScriptedTransport, TestContext, Timeline, ME};
use futures::future::join_all;
use g2_groups::error::Result;
use g2_groups::models::{
    GroupEvent, GroupInviteMessage, MessageKey, MessageStubType, UpsertKind, WebMessageInfo,
};
use g2_groups::services::{GroupService, MessageStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const INVITER: &str = "15559990000@s.whatsapp.net";

fn invite(group: &str) -> GroupInviteMessage {
    GroupInviteMessage {
        group_jid: group.to_string(),
        invite_code: "Kx9Yz".to_string(),
        invite_expiration: 1_900_000_000,
        group_name: Some("Book club".to_string()),
        caption: None,
    }
}

fn invite_key() -> MessageKey {
    MessageKey {
        remote_jid: INVITER.to_string(),
        id: Some("3EB0AAAABBBBCCCCDDDD".to_string()),
        from_me: Some(false),
        participant: None,
    }
}

fn accepting_transport(timeline: Timeline) -> ScriptedTransport {
    ScriptedTransport::new(timeline, |request| {
        let group = request.attr("to").unwrap_or_default().to_string();
        Ok(result_iq(vec![]).with_attr("from", group))
    })
}

#[tokio::test]
async fn test_full_key_expires_invite_and_records_join() {
    let ctx = TestContext::with_transport(accepting_transport);

    let joined = ctx
        .service
        .group_accept_invite_v4(invite_key(), invite("777@g.us"))
        .await
        .unwrap();
    assert_eq!(joined.as_deref(), Some("777@g.us"));

    let request = &ctx.transport.requests()[0];
    assert_eq!(request.attr("to"), Some("777@g.us"));
    let accept = &request.children()[0];
    assert_eq!(accept.tag, "accept");
    assert_eq!(accept.attr("code"), Some("Kx9Yz"));
    assert_eq!(accept.attr("expiration"), Some("1900000000"));
    assert_eq!(accept.attr("admin"), Some(INVITER));

    let events = ctx.sink.events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        GroupEvent::MessagesUpdate(updates) => {
            assert_eq!(updates.len(), 1);
            assert_eq!(updates[0].key, invite_key());
            assert!(updates[0].group_invite_message.is_expired());
            assert_eq!(updates[0].group_invite_message.group_name.as_deref(), Some("Book club"));
        }
        other => panic!("unexpected event: {:?}", other),
    }

    let messages = ctx.store.messages();
    assert_eq!(messages.len(), 1);
    let (message, kind) = &messages[0];
    assert_eq!(*kind, UpsertKind::Notify);
    assert_eq!(message.key.remote_jid, "777@g.us");
    assert_eq!(message.key.from_me, Some(false));
    assert_eq!(message.key.participant.as_deref(), Some(INVITER));
    assert!(message.key.id.as_deref().is_some_and(|id| id.starts_with("3EB0")));
    assert_eq!(message.message_stub_type, Some(MessageStubType::GroupParticipantAdd));
    assert_eq!(message.message_stub_parameters, vec![ME.to_string()]);
    assert_eq!(message.participant.as_deref(), Some(INVITER));
    assert!(message.message_timestamp > 0);

    // the invite card is expired before the join is recorded
    assert_eq!(
        ctx.timeline.entries(),
        vec![
            "query:accept",
            "response:accept",
            "event:messages.update",
            "upsert:777@g.us"
        ]
    );
}

#[tokio::test]
async fn test_bare_jid_key_skips_expiry_event() {
    let ctx = TestContext::with_transport(accepting_transport);

    ctx.service
        .group_accept_invite_v4(INVITER, invite("777@g.us"))
        .await
        .unwrap();

    assert!(ctx.sink.events().is_empty());
    let messages = ctx.store.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0.participant.as_deref(), Some(INVITER));
    assert_eq!(
        ctx.transport.requests()[0].children()[0].attr("admin"),
        Some(INVITER)
    );
}

#[tokio::test]
async fn test_concurrent_accepts_run_in_call_order() {
    let ctx = TestContext::with_transport(accepting_transport);
    // the first acceptance answers slowly; the second must still wait for it
    ctx.transport.set_delay(|request| {
        if request.attr("to") == Some("111@g.us") {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(0)
        }
    });

    let (first, second) = tokio::join!(
        ctx.service.group_accept_invite_v4(invite_key(), invite("111@g.us")),
        ctx.service.group_accept_invite_v4(invite_key(), invite("222@g.us")),
    );
    assert_eq!(first.unwrap().as_deref(), Some("111@g.us"));
    assert_eq!(second.unwrap().as_deref(), Some("222@g.us"));

    assert_eq!(
        ctx.timeline.entries(),
        vec![
            "query:accept",
            "response:accept",
            "event:messages.update",
            "upsert:111@g.us",
            "query:accept",
            "response:accept",
            "event:messages.update",
            "upsert:222@g.us"
        ]
    );

    let groups: Vec<String> = ctx
        .store
        .messages()
        .into_iter()
        .map(|(message, _)| message.key.remote_jid)
        .collect();
    assert_eq!(groups, vec!["111@g.us", "222@g.us"]);
}

#[tokio::test]
async fn test_failed_accept_has_no_side_effects_and_queue_survives() {
    let ctx = TestContext::with_transport(|timeline| {
        ScriptedTransport::new(timeline, |request| {
            if request.attr("to") == Some("404@g.us") {
                Err(g2_groups::GroupError::Transport("item-not-found".to_string()))
            } else {
                Ok(result_iq(vec![]))
            }
        })
    });

    let failed = ctx
        .service
        .group_accept_invite_v4(invite_key(), invite("404@g.us"))
        .await;
    assert!(failed.is_err());
    assert!(ctx.sink.events().is_empty());
    assert!(ctx.store.messages().is_empty());

    // no `from` on the answer: the call succeeds with no group jid
    let joined = ctx
        .service
        .group_accept_invite_v4(invite_key(), invite("555@g.us"))
        .await
        .unwrap();
    assert!(joined.is_none());
    assert_eq!(ctx.store.messages().len(), 1);
}

#[tokio::test]
async fn test_many_concurrent_accepts_keep_call_order() {
    let ctx = TestContext::with_transport(accepting_transport);
    // earlier groups answer more slowly than later ones
    ctx.transport.set_delay(|request| {
        let group: u64 = request
            .attr("to")
            .and_then(|to| to.trim_end_matches("@g.us").parse().ok())
            .unwrap_or(0);
        Duration::from_millis(50 - group * 10)
    });

    let groups: Vec<String> = (1..=5).map(|i| format!("{}@g.us", i)).collect();
    let results = join_all(
        groups
            .iter()
            .map(|group| ctx.service.group_accept_invite_v4(INVITER, invite(group))),
    )
    .await;
    assert!(results.iter().all(|r| r.is_ok()));

    let recorded: Vec<String> = ctx
        .store
        .messages()
        .into_iter()
        .map(|(message, _)| message.key.remote_jid)
        .collect();
    assert_eq!(recorded, groups);
}

/// Store that panics on its first write and records normally afterwards
struct CrashOnceStore {
    crashed: AtomicBool,
    inner: MemoryStore,
}

#[async_trait]
impl MessageStore for CrashOnceStore {
    async fn upsert_message(&self, message: WebMessageInfo, kind: UpsertKind) -> Result<()> {
        if !self.crashed.swap(true, Ordering::SeqCst) {
            panic!("store crashed while recording {}", message.key.remote_jid);
        }
        self.inner.upsert_message(message, kind).await
    }
}

#[tokio::test]
async fn test_accepts_continue_after_a_panicking_store() {
    let timeline = Timeline::default();
    let store = Arc::new(CrashOnceStore {
        crashed: AtomicBool::new(false),
        inner: MemoryStore::new(timeline.clone()),
    });
    let service = Arc::new(GroupService::new(
        Arc::new(accepting_transport(timeline.clone())),
        Arc::new(RecordingSink::new(timeline.clone())),
        store.clone(),
        ME,
    ));

    let crashed = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .group_accept_invite_v4(invite_key(), invite("111@g.us"))
                .await
        })
    };
    assert!(crashed.await.unwrap_err().is_panic());

    let joined = service
        .group_accept_invite_v4(invite_key(), invite("222@g.us"))
        .await
        .unwrap();
    assert_eq!(joined.as_deref(), Some("222@g.us"));
    assert_eq!(store.inner.messages().len(), 1);
}

#[test]
fn test_accepts_work_across_runtimes() {
    let ctx = TestContext::with_transport(accepting_transport);

    let first = tokio::runtime::Runtime::new().unwrap();
    let joined = first
        .block_on(ctx.service.group_accept_invite_v4(INVITER, invite("111@g.us")))
        .unwrap();
    assert_eq!(joined.as_deref(), Some("111@g.us"));
    drop(first);

    let second = tokio::runtime::Runtime::new().unwrap();
    let joined = second
        .block_on(ctx.service.group_accept_invite_v4(INVITER, invite("222@g.us")))
        .unwrap();
    assert_eq!(joined.as_deref(), Some("222@g.us"));
    assert_eq!(ctx.store.messages().len(), 2);
}
