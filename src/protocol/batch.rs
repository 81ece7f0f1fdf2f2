//! Per-participant results of batch mutations.
//!
//! A batch never fails as a whole because one participant failed: each
//! `<participant>` in the response becomes one record whose status is the
//! node's `error` attribute, or `"200"` without one.

use crate::models::{ApprovalAction, ParticipantAction, ParticipantResult, RequestParticipant, STATUS_OK};
use crate::node::BinaryNode;

/// The batch operations whose responses list participants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAction {
    Participants(ParticipantAction),
    Requests(ApprovalAction),
}

impl BatchAction {
    /// Tags leading from the response root to the participant container
    pub fn response_path(&self) -> Vec<&'static str> {
        match self {
            BatchAction::Participants(action) => vec![action.tag()],
            BatchAction::Requests(action) => vec!["membership_requests_action", action.tag()],
        }
    }

    /// The container node, if the server sent one
    pub fn locate<'a>(&self, response: &'a BinaryNode) -> Option<&'a BinaryNode> {
        self.response_path()
            .into_iter()
            .try_fold(response, |node, tag| node.child(tag))
    }
}

impl From<ParticipantAction> for BatchAction {
    fn from(action: ParticipantAction) -> Self {
        BatchAction::Participants(action)
    }
}

impl From<ApprovalAction> for BatchAction {
    fn from(action: ApprovalAction) -> Self {
        BatchAction::Requests(action)
    }
}

fn status_of(node: &BinaryNode) -> String {
    node.attr("error").unwrap_or(STATUS_OK).to_string()
}

fn affected<'a>(response: &'a BinaryNode, action: BatchAction) -> impl Iterator<Item = &'a BinaryNode> {
    action
        .locate(response)
        .into_iter()
        .flat_map(|container| container.children_by_tag("participant"))
}

pub fn map_participant_results(response: &BinaryNode, action: BatchAction) -> Vec<ParticipantResult> {
    affected(response, action)
        .map(|p| ParticipantResult {
            status: status_of(p),
            jid: p.attr("jid").unwrap_or_default().to_string(),
            content: p.clone(),
        })
        .collect()
}

pub fn map_request_results(response: &BinaryNode, action: BatchAction) -> Vec<RequestParticipant> {
    affected(response, action)
        .map(|p| RequestParticipant {
            status: status_of(p),
            jid: p.attr("jid").unwrap_or_default().to_string(),
        })
        .collect()
}
