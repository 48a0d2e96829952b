use std::fmt;

use uuid::Uuid;

use crate::Error;

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct ContentId(pub Uuid);

macro_rules! content_id {
    ($name:ident, $kind:ident) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
            serde::Deserialize,
            serde::Serialize,
        )]
        pub struct $name(pub Uuid);

        impl From<$name> for ContentRef {
            fn from(id: $name) -> ContentRef {
                ContentRef {
                    kind: ContentKind::$kind,
                    id: ContentId(id.0),
                }
            }
        }
    };
}

content_id!(UpdateId, Update);
content_id!(PhotoId, Photo);
content_id!(OutfitId, Outfit);
content_id!(MessageId, Message);

/// Kinds of content that can receive comments
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Update,
    Photo,
    Outfit,
    Message,
}

impl ContentKind {
    /// Name of the query parameter and body field identifying content of this kind
    pub fn key(&self) -> &'static str {
        match self {
            ContentKind::Update => "updateId",
            ContentKind::Photo => "photoId",
            ContentKind::Outfit => "outfitId",
            ContentKind::Message => "messageId",
        }
    }
}

/// Reference to exactly one content item
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct ContentRef {
    pub kind: ContentKind,
    pub id: ContentId,
}

impl ContentRef {
    pub fn new(kind: ContentKind, id: Uuid) -> ContentRef {
        ContentRef {
            kind,
            id: ContentId(id),
        }
    }

    pub fn to_keys(&self) -> ContentKeys {
        let mut keys = ContentKeys::default();
        let slot = match self.kind {
            ContentKind::Update => &mut keys.update_id,
            ContentKind::Photo => &mut keys.photo_id,
            ContentKind::Outfit => &mut keys.outfit_id,
            ContentKind::Message => &mut keys.message_id,
        };
        *slot = Some(self.id.0);
        keys
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind.key(), self.id.0)
    }
}

/// Wire encoding of a `ContentRef`: one optional field per content kind, as
/// used both in query strings and in comment bodies
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentKeys {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outfit_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<Uuid>,
}

impl TryFrom<ContentKeys> for ContentRef {
    type Error = Error;

    fn try_from(keys: ContentKeys) -> Result<ContentRef, Error> {
        let set = [
            (ContentKind::Update, keys.update_id),
            (ContentKind::Photo, keys.photo_id),
            (ContentKind::Outfit, keys.outfit_id),
            (ContentKind::Message, keys.message_id),
        ]
        .into_iter()
        .filter_map(|(kind, id)| id.map(|id| ContentRef::new(kind, id)))
        .collect::<Vec<_>>();
        match set.as_slice() {
            [target] => Ok(*target),
            _ => Err(Error::InvalidTarget),
        }
    }
}
