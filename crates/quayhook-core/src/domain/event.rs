use serde::{
    Deserialize,
    Serialize,
};

/// Build notification as posted by the registry's webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuayPayload {
    pub repository: String,
    pub namespace: String,
    pub name: String,
    pub docker_url: String,
    pub homepage: String,
    pub visibility: String,
    pub build_id: String,
    pub docker_tags: Vec<String>,
    pub trigger_kind: String,
    pub trigger_id: String,
    pub trigger_metadata: TriggerMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerMetadata {
    pub default_branch: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub commit: String,
    pub commit_info: CommitInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitInfo {
    pub url: String,
    pub message: String,
    pub date: String,
    pub author: GitUser,
    pub committer: GitUser,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GitUser {
    pub username: String,
    pub url: String,
    pub avatar_url: String,
}

/// The subset of a build notification the dispatcher works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingEvent {
    pub repository: String,
    pub reference: String,
    pub commit: Option<String>,
    pub author: Option<String>,
    pub build_id: Option<String>,
    pub docker_tags: Vec<String>,
}

impl IncomingEvent {
    pub fn new(repository: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            reference: reference.into(),
            commit: None,
            author: None,
            build_id: None,
            docker_tags: Vec::new(),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl From<QuayPayload> for IncomingEvent {
    fn from(payload: QuayPayload) -> Self {
        let metadata = payload.trigger_metadata;
        Self {
            repository: payload.repository,
            reference: metadata.reference,
            commit: non_empty(metadata.commit),
            author: non_empty(metadata.commit_info.author.username),
            build_id: non_empty(payload.build_id),
            docker_tags: payload.docker_tags,
        }
    }
}
