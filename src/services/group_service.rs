/// Group service: one request/response round trip per public operation.
/// Builds the stanza, sends it through the transport, and maps the response.
///
/// Calls are independent and may run concurrently. The exception is
/// `group_accept_invite_v4`, whose side effects go through a FIFO queue so that
/// two acceptances never interleave their events and system messages.

use crate::error::Result;
use crate::jid::GROUPS_BROADCAST;
use crate::models::{
    generate_message_id, unix_timestamp_seconds, ApprovalAction, GroupEvent, GroupInviteMessage,
    GroupMetadata, GroupSetting, JoinApprovalMode, MemberAddMode, MessageKey, MessageStubType,
    MessageUpdate, ParticipantAction, ParticipantResult, RequestParticipant, UpsertKind,
    WebMessageInfo,
};
use crate::node::BinaryNode;
use crate::protocol::{
    builder, extract_group_metadata, extract_group_node, map_participant_results,
    map_request_results, DescriptionUpdate,
};
use crate::services::{EventSink, InviteAcceptQueue, MessageStore, Transport};
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Collaborators shared with queued jobs
struct GroupContext {
    transport: Arc<dyn Transport>,
    events: Arc<dyn EventSink>,
    store: Arc<dyn MessageStore>,
    /// Our own jid
    me: String,
}

impl GroupContext {
    async fn query(&self, request: BinaryNode) -> Result<BinaryNode> {
        debug!(
            "-> iq type={} to={} [{}]",
            request.attr("type").unwrap_or("?"),
            request.attr("to").unwrap_or("?"),
            request.children().first().map(|c| c.tag.as_str()).unwrap_or("")
        );
        self.transport.query(request).await
    }

    async fn accept_invite_v4(
        &self,
        key: MessageKey,
        invite: GroupInviteMessage,
    ) -> Result<Option<String>> {
        let request = builder::accept_invite_v4(
            &invite.group_jid,
            &invite.invite_code,
            invite.invite_expiration,
            &key.remote_jid,
        );
        let response = self.query(request).await?;

        // with a full key we can expire the invite card in the timeline
        if key.id.is_some() {
            self.events.publish(GroupEvent::MessagesUpdate(vec![MessageUpdate {
                key: key.clone(),
                group_invite_message: invite.expired(),
            }]));
        }

        let system_message = WebMessageInfo {
            key: MessageKey {
                remote_jid: invite.group_jid.clone(),
                id: Some(generate_message_id()),
                from_me: Some(false),
                participant: Some(key.remote_jid.clone()),
            },
            message_stub_type: Some(MessageStubType::GroupParticipantAdd),
            message_stub_parameters: vec![self.me.clone()],
            participant: Some(key.remote_jid.clone()),
            message_timestamp: unix_timestamp_seconds(),
        };
        self.store.upsert_message(system_message, UpsertKind::Notify).await?;

        info!("Joined {} via invite from {}", invite.group_jid, key.remote_jid);
        Ok(response.attr("from").map(str::to_string))
    }
}

pub struct GroupService {
    ctx: Arc<GroupContext>,
    invite_queue: InviteAcceptQueue,
}

impl GroupService {
    pub fn new(
        transport: Arc<dyn Transport>,
        events: Arc<dyn EventSink>,
        store: Arc<dyn MessageStore>,
        me: impl Into<String>,
    ) -> Self {
        GroupService {
            ctx: Arc::new(GroupContext {
                transport,
                events,
                store,
                me: me.into(),
            }),
            invite_queue: InviteAcceptQueue::new(),
        }
    }

    /// Our own jid, as given at construction
    pub fn me(&self) -> &str {
        &self.ctx.me
    }

    /// Fetch full metadata of one group
    pub async fn group_metadata(&self, jid: &str) -> Result<GroupMetadata> {
        let result = self.ctx.query(builder::metadata_query(jid)).await?;
        extract_group_metadata(&result)
    }

    /// Fetch every group we participate in, keyed by group jid.
    /// Publishes `groups.update` with all of them.
    pub async fn group_fetch_all_participating(&self) -> Result<HashMap<String, GroupMetadata>> {
        let result = self.ctx.query(builder::fetch_all_participating()).await?;

        let mut data = HashMap::new();
        if let Some(groups) = result.child("groups") {
            for group in groups.children_by_tag("group") {
                let meta = extract_group_node(group)?;
                data.insert(meta.id.clone(), meta);
            }
        }

        debug!("Fetched {} participating groups", data.len());
        self.ctx
            .events
            .publish(GroupEvent::GroupsUpdate(data.values().cloned().collect()));
        Ok(data)
    }

    pub async fn group_create<S: AsRef<str>>(
        &self,
        subject: &str,
        participants: &[S],
    ) -> Result<GroupMetadata> {
        let key = generate_message_id();
        let result = self
            .ctx
            .query(builder::create(subject, participants, &key))
            .await?;
        extract_group_metadata(&result)
    }

    pub async fn group_leave(&self, id: &str) -> Result<()> {
        self.ctx.query(builder::leave(id)).await?;
        Ok(())
    }

    pub async fn group_update_subject(&self, jid: &str, subject: &str) -> Result<()> {
        self.ctx.query(builder::update_subject(jid, subject)).await?;
        Ok(())
    }

    /// Pending join requests, as the raw attributes of each request node
    pub async fn group_request_participants_list(
        &self,
        jid: &str,
    ) -> Result<Vec<BTreeMap<String, String>>> {
        let result = self.ctx.query(builder::request_participants_list(jid)).await?;

        let requests: Vec<BTreeMap<String, String>> = result
            .child("membership_approval_requests")
            .map(|node| {
                node.children_by_tag("membership_approval_request")
                    .map(|r| r.attrs.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(requests)
    }

    pub async fn group_request_participants_update<S: AsRef<str>>(
        &self,
        jid: &str,
        participants: &[S],
        action: ApprovalAction,
    ) -> Result<Vec<RequestParticipant>> {
        let result = self
            .ctx
            .query(builder::request_participants_update(jid, participants, action))
            .await?;
        Ok(map_request_results(&result, action.into()))
    }

    /// Add, remove, promote or demote members. Failures are reported per participant.
    pub async fn group_participants_update<S: AsRef<str>>(
        &self,
        jid: &str,
        participants: &[S],
        action: ParticipantAction,
    ) -> Result<Vec<ParticipantResult>> {
        let result = self
            .ctx
            .query(builder::participants_update(jid, participants, action))
            .await?;
        Ok(map_participant_results(&result, action.into()))
    }

    /// Set the description, or delete it with `None` or an empty string.
    /// Reads the current metadata first to chain the new description to the old one.
    pub async fn group_update_description(&self, jid: &str, description: Option<&str>) -> Result<()> {
        let metadata = self.group_metadata(jid).await?;
        let update = DescriptionUpdate::from_text(description, generate_message_id);

        self.ctx
            .query(builder::update_description(jid, &update, metadata.desc_id.as_deref()))
            .await?;
        Ok(())
    }

    pub async fn group_invite_code(&self, jid: &str) -> Result<Option<String>> {
        let result = self.ctx.query(builder::invite_code(jid)).await?;
        Ok(invite_code_of(&result))
    }

    /// Invalidate the current invite link; returns the new code
    pub async fn group_revoke_invite(&self, jid: &str) -> Result<Option<String>> {
        let result = self.ctx.query(builder::revoke_invite(jid)).await?;
        Ok(invite_code_of(&result))
    }

    /// Join through an invite code; returns the joined group's jid
    pub async fn group_accept_invite(&self, code: &str) -> Result<Option<String>> {
        let result = self.ctx.query(builder::accept_invite(code)).await?;
        Ok(result
            .child("group")
            .and_then(|g| g.attr("jid"))
            .map(str::to_string))
    }

    /// Revoke a v4 invite sent to `invited_jid`
    pub async fn group_revoke_invite_v4(&self, group_jid: &str, invited_jid: &str) -> Result<bool> {
        self.ctx
            .query(builder::revoke_invite_v4(group_jid, invited_jid))
            .await?;
        Ok(true)
    }

    /// Accept an invite received as a message.
    ///
    /// `key` is either the inviter's jid or the full key of the invite
    /// message; with a full key the invite message is marked expired. A
    /// participant-add system message is recorded either way. Concurrent calls
    /// are executed one after another in call order.
    pub async fn group_accept_invite_v4(
        &self,
        key: impl Into<MessageKey>,
        invite: GroupInviteMessage,
    ) -> Result<Option<String>> {
        let ctx = self.ctx.clone();
        let key = key.into();
        self.invite_queue
            .run(async move { ctx.accept_invite_v4(key, invite).await })
            .await
    }

    /// Metadata of the group behind an invite code, without joining
    pub async fn group_get_invite_info(&self, code: &str) -> Result<GroupMetadata> {
        let result = self.ctx.query(builder::get_invite_info(code)).await?;
        extract_group_metadata(&result)
    }

    /// Set the disappearing-messages timer in seconds; `0` turns it off
    pub async fn group_toggle_ephemeral(&self, jid: &str, expiration: u32) -> Result<()> {
        self.ctx
            .query(builder::toggle_ephemeral(jid, expiration))
            .await?;
        Ok(())
    }

    pub async fn group_setting_update(&self, jid: &str, setting: GroupSetting) -> Result<()> {
        self.ctx.query(builder::setting_update(jid, setting)).await?;
        Ok(())
    }

    pub async fn group_member_add_mode(&self, jid: &str, mode: MemberAddMode) -> Result<()> {
        self.ctx.query(builder::member_add_mode(jid, mode)).await?;
        Ok(())
    }

    pub async fn group_join_approval_mode(&self, jid: &str, mode: JoinApprovalMode) -> Result<()> {
        self.ctx.query(builder::join_approval_mode(jid, mode)).await?;
        Ok(())
    }

    /// Acknowledge a dirty domain through the transport
    pub async fn clean_dirty_bits(&self, kind: &str) -> Result<()> {
        debug!("-> clean dirty bits type={} to={}", kind, GROUPS_BROADCAST);
        self.ctx.transport.clean_dirty_bits(kind).await
    }
}

fn invite_code_of(result: &BinaryNode) -> Option<String> {
    result
        .child("invite")
        .and_then(|i| i.attr("code"))
        .map(str::to_string)
}
