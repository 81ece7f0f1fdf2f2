//! Identifier helpers: `user[_agent][:device]@server`.

/// Group server domain
pub const G_US: &str = "g.us";
/// Regular user server domain
pub const S_WHATSAPP_NET: &str = "s.whatsapp.net";
/// Legacy user domain, normalized to [`S_WHATSAPP_NET`]
pub const C_US: &str = "c.us";
/// Address used for group-wide queries (create, leave, invites, fetch-all)
pub const GROUPS_BROADCAST: &str = "@g.us";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedJid {
    pub user: String,
    pub server: String,
    pub agent: Option<u32>,
    pub device: Option<u32>,
}

/// Build a jid from its parts
pub fn jid_encode(user: &str, server: &str, device: Option<u32>, agent: Option<u32>) -> String {
    let mut out = String::from(user);
    if let Some(agent) = agent {
        out.push_str(&format!("_{}", agent));
    }
    if let Some(device) = device {
        out.push_str(&format!(":{}", device));
    }
    out.push('@');
    out.push_str(server);
    out
}

/// Split a jid into its parts; `None` when there is no `@`
pub fn jid_decode(jid: &str) -> Option<DecodedJid> {
    let (combined, server) = jid.split_once('@')?;
    let (user_agent, device) = match combined.split_once(':') {
        Some((ua, device)) => (ua, device.parse().ok()),
        None => (combined, None),
    };
    let (user, agent) = match user_agent.split_once('_') {
        Some((user, agent)) => (user, agent.parse().ok()),
        None => (user_agent, None),
    };

    Some(DecodedJid {
        user: user.to_string(),
        server: server.to_string(),
        agent,
        device,
    })
}

/// Strip agent and device, and map the legacy user domain onto the current one
pub fn jid_normalized_user(jid: &str) -> Option<String> {
    let decoded = jid_decode(jid)?;
    let server = if decoded.server == C_US {
        S_WHATSAPP_NET
    } else {
        decoded.server.as_str()
    };
    Some(jid_encode(&decoded.user, server, None, None))
}

/// Qualify a bare group id with the group domain; ids that already carry one are kept
pub fn group_jid(id: &str) -> String {
    if id.contains('@') {
        id.to_string()
    } else {
        jid_encode(id, G_US, None, None)
    }
}
