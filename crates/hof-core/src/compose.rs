//! Assembles an announcement document from a source message.

use chrono::{DateTime, Utc};

use crate::{
    classify::{chunk, has_image_extension, is_image_reference},
    domain::{
        AnnouncementDocument, AnnouncementField, GuildId, MessageOrigin, SourceAttachment,
        SourceEmbed, SourceMessage, UserId,
    },
    ports::ChatClient,
};

pub const ANNOUNCEMENT_TITLE: &str = "Hall of Fame Entry";

/// Shown when the author has no avatar.
pub const FALLBACK_THUMBNAIL: &str = "https://cdn.discordapp.com/attachments/301734382022950932/1025582339339862046/Discord_-_Erics_Icon.png";

/// Display color the platform reports for members without a colored role.
pub const NO_COLOR: u32 = 0x000000;

const MISSING_EMBED_DESCRIPTION: &str = "Error copying Haiku";

/// Canonical link to a message.
pub fn message_link(origin: MessageOrigin) -> String {
    format!(
        "https://discord.com/channels/{}/{}/{}",
        origin.guild_id, origin.channel_id, origin.message_id
    )
}

fn mention(user: UserId) -> String {
    format!("<@{user}>")
}

fn timestamp_tag(at: DateTime<Utc>) -> String {
    format!("<t:{}>", at.timestamp())
}

fn is_image_attachment(attachment: &SourceAttachment) -> bool {
    attachment
        .content_type
        .as_deref()
        .map_or(false, |t| t.starts_with("image/"))
        || has_image_extension(&attachment.url)
}

/// Builds announcement documents. Optional enhancements (display color,
/// embed copy) degrade gracefully; the mandatory skeleton never fails.
pub struct AnnouncementComposer<'a> {
    client: &'a dyn ChatClient,
    field_limit: usize,
}

impl<'a> AnnouncementComposer<'a> {
    pub fn new(client: &'a dyn ChatClient, field_limit: usize) -> Self {
        Self {
            client,
            field_limit,
        }
    }

    pub async fn compose(
        &self,
        message: &SourceMessage,
        origin: MessageOrigin,
        commentary: Option<&str>,
    ) -> AnnouncementDocument {
        let mut doc = AnnouncementDocument {
            thumbnail: message
                .avatar_url
                .clone()
                .unwrap_or_else(|| FALLBACK_THUMBNAIL.to_string()),
            title: ANNOUNCEMENT_TITLE.to_string(),
            source_link: message_link(origin),
            fields: vec![
                AnnouncementField::inline("Posted by", mention(message.author_id)),
                AnnouncementField::inline(
                    "Originally posted at",
                    timestamp_tag(message.created_at),
                ),
            ],
            ..Default::default()
        };

        doc.accent_color = self
            .resolve_accent_color(origin.guild_id, message.author_id)
            .await;

        if let Some(embed) = message.embeds.first() {
            copy_embed(&mut doc, embed);
        }

        self.place_body(&mut doc, &message.content);

        // Last qualifying attachment wins.
        for attachment in &message.attachments {
            if is_image_attachment(attachment) {
                doc.image = Some(attachment.url.clone());
            }
        }

        if let Some(text) = commentary {
            doc.description = Some(text.to_string());
        }

        doc
    }

    async fn resolve_accent_color(&self, guild: GuildId, user: UserId) -> Option<u32> {
        match self.client.member_display_color(guild, user).await {
            Ok(color) => color.filter(|c| *c != NO_COLOR),
            Err(e) => {
                tracing::warn!(%guild, %user, error = %e, "could not resolve display color");
                None
            }
        }
    }

    fn place_body(&self, doc: &mut AnnouncementDocument, body: &str) {
        if body.len() > self.field_limit {
            for (i, piece) in chunk(body, self.field_limit).into_iter().enumerate() {
                doc.fields
                    .push(AnnouncementField::block(format!("Message (Part {})", i + 1), piece));
            }
        } else if is_image_reference(body) {
            doc.image = Some(body.to_string());
        } else if !body.is_empty() {
            doc.fields.push(AnnouncementField::block("Message", body));
        }
    }
}

/// Carry over the first embedded block of the source message: an image
/// embed becomes the document image, anything else a text field.
fn copy_embed(doc: &mut AnnouncementDocument, embed: &SourceEmbed) {
    if let Some(url) = embed.url.as_deref() {
        if !url.is_empty() && is_image_reference(url) {
            doc.image = Some(url.to_string());
            return;
        }
    }

    let value = match embed.description.as_deref() {
        Some(desc) => {
            let mut v = desc.to_string();
            if let Some(footer) = embed.footer_text.as_deref() {
                v.push_str("\n\n");
                v.push_str(&footer.replacen('-', "\\-", 1));
            }
            v
        }
        None => MISSING_EMBED_DESCRIPTION.to_string(),
    };
    doc.fields
        .push(AnnouncementField::block("Original Embed", value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChannelId, MessageId, MessageRef};
    use crate::{Error, Result};
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct FakeClient {
        color: Result<Option<u32>>,
    }

    impl FakeClient {
        fn with_color(color: Option<u32>) -> Self {
            Self { color: Ok(color) }
        }

        fn failing_color() -> Self {
            Self {
                color: Err(Error::CollaboratorFetch("member not found".to_string())),
            }
        }
    }

    #[async_trait]
    impl ChatClient for FakeClient {
        async fn fetch_message(
            &self,
            _channel: ChannelId,
            _message: MessageId,
        ) -> Result<SourceMessage> {
            Err(Error::CollaboratorFetch("not used".to_string()))
        }

        async fn member_display_color(
            &self,
            _guild: GuildId,
            _user: UserId,
        ) -> Result<Option<u32>> {
            match &self.color {
                Ok(c) => Ok(*c),
                Err(_) => Err(Error::CollaboratorFetch("member not found".to_string())),
            }
        }

        async fn publish(
            &self,
            _channel: ChannelId,
            _document: &AnnouncementDocument,
        ) -> Result<()> {
            Ok(())
        }

        async fn find_pinned(
            &self,
            _channel: ChannelId,
            _message: MessageId,
        ) -> Result<Option<MessageRef>> {
            Ok(None)
        }

        async fn unpin(&self, _pin: MessageRef) -> Result<()> {
            Ok(())
        }
    }

    fn origin() -> MessageOrigin {
        MessageOrigin {
            guild_id: GuildId(10),
            channel_id: ChannelId(20),
            message_id: MessageId(30),
        }
    }

    fn source(content: &str) -> SourceMessage {
        SourceMessage {
            author_id: UserId(77),
            avatar_url: Some("https://cdn.test/avatar.png".to_string()),
            created_at: chrono::Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap(),
            content: content.to_string(),
            embeds: vec![],
            attachments: vec![],
        }
    }

    fn field_names(doc: &AnnouncementDocument) -> Vec<&str> {
        doc.fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[tokio::test]
    async fn plain_body_with_commentary() {
        let client = FakeClient::with_color(None);
        let composer = AnnouncementComposer::new(&client, 2000);

        let doc = composer
            .compose(&source("hello world"), origin(), Some("nice one"))
            .await;

        assert_eq!(doc.title, "Hall of Fame Entry");
        assert_eq!(doc.source_link, "https://discord.com/channels/10/20/30");
        assert_eq!(
            field_names(&doc),
            vec!["Posted by", "Originally posted at", "Message"]
        );
        assert_eq!(doc.fields[0].value, "<@77>");
        assert!(doc.fields[0].inline);
        assert!(doc.fields[1].inline);
        assert_eq!(doc.fields[2].value, "hello world");
        assert_eq!(doc.description.as_deref(), Some("nice one"));
        assert!(doc.image.is_none());
    }

    #[tokio::test]
    async fn missing_avatar_uses_fallback_thumbnail() {
        let client = FakeClient::with_color(None);
        let composer = AnnouncementComposer::new(&client, 2000);

        let mut msg = source("hi");
        msg.avatar_url = None;
        let doc = composer.compose(&msg, origin(), None).await;

        assert_eq!(doc.thumbnail, FALLBACK_THUMBNAIL);
        assert!(doc.description.is_none());
    }

    #[tokio::test]
    async fn sentinel_color_leaves_accent_unset() {
        let client = FakeClient::with_color(Some(NO_COLOR));
        let composer = AnnouncementComposer::new(&client, 2000);

        let doc = composer.compose(&source("hi"), origin(), None).await;
        assert!(doc.accent_color.is_none());
    }

    #[tokio::test]
    async fn color_lookup_failure_is_swallowed() {
        let client = FakeClient::failing_color();
        let composer = AnnouncementComposer::new(&client, 2000);

        let doc = composer.compose(&source("hi"), origin(), None).await;
        assert!(doc.accent_color.is_none());
        assert_eq!(
            field_names(&doc),
            vec!["Posted by", "Originally posted at", "Message"]
        );
    }

    #[tokio::test]
    async fn resolved_color_is_kept() {
        let client = FakeClient::with_color(Some(0xAA33FF));
        let composer = AnnouncementComposer::new(&client, 2000);

        let doc = composer.compose(&source("hi"), origin(), None).await;
        assert_eq!(doc.accent_color, Some(0xAA33FF));
    }

    #[tokio::test]
    async fn image_embed_sets_image_without_text_field() {
        let client = FakeClient::with_color(None);
        let composer = AnnouncementComposer::new(&client, 2000);

        let mut msg = source("");
        msg.embeds.push(SourceEmbed {
            url: Some("https://x.test/a.png".to_string()),
            description: Some("ignored".to_string()),
            footer_text: None,
        });
        let doc = composer.compose(&msg, origin(), None).await;

        assert_eq!(doc.image.as_deref(), Some("https://x.test/a.png"));
        assert!(!field_names(&doc).contains(&"Original Embed"));
    }

    #[tokio::test]
    async fn text_embed_copies_description_and_escaped_footer() {
        let client = FakeClient::with_color(None);
        let composer = AnnouncementComposer::new(&client, 2000);

        let mut msg = source("");
        msg.embeds.push(SourceEmbed {
            url: None,
            description: Some("a haiku".to_string()),
            footer_text: Some("- anonymous - 2023".to_string()),
        });
        let doc = composer.compose(&msg, origin(), None).await;

        let embed_field = doc
            .fields
            .iter()
            .find(|f| f.name == "Original Embed")
            .unwrap();
        assert_eq!(embed_field.value, "a haiku\n\n\\- anonymous - 2023");
        assert!(!embed_field.inline);
    }

    #[tokio::test]
    async fn embed_without_description_gets_placeholder() {
        let client = FakeClient::with_color(None);
        let composer = AnnouncementComposer::new(&client, 2000);

        let mut msg = source("");
        msg.embeds.push(SourceEmbed {
            url: Some("https://x.test/article".to_string()),
            description: None,
            footer_text: Some("footer".to_string()),
        });
        let doc = composer.compose(&msg, origin(), None).await;

        let embed_field = doc
            .fields
            .iter()
            .find(|f| f.name == "Original Embed")
            .unwrap();
        assert_eq!(embed_field.value, "Error copying Haiku");
    }

    #[tokio::test]
    async fn only_first_embed_is_considered() {
        let client = FakeClient::with_color(None);
        let composer = AnnouncementComposer::new(&client, 2000);

        let mut msg = source("");
        msg.embeds.push(SourceEmbed {
            url: None,
            description: Some("first".to_string()),
            footer_text: None,
        });
        msg.embeds.push(SourceEmbed {
            url: Some("https://x.test/b.png".to_string()),
            description: None,
            footer_text: None,
        });
        let doc = composer.compose(&msg, origin(), None).await;

        assert!(doc.image.is_none());
        let copies: Vec<_> = doc
            .fields
            .iter()
            .filter(|f| f.name == "Original Embed")
            .collect();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].value, "first");
    }

    #[tokio::test]
    async fn long_body_splits_into_part_fields() {
        let client = FakeClient::with_color(None);
        let composer = AnnouncementComposer::new(&client, 40);

        let body = (0..12)
            .map(|i| format!("line number {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let doc = composer.compose(&source(&body), origin(), None).await;

        let parts: Vec<_> = doc
            .fields
            .iter()
            .filter(|f| f.name.starts_with("Message (Part "))
            .collect();
        assert!(parts.len() > 1);
        for (i, part) in parts.iter().enumerate() {
            assert_eq!(part.name, format!("Message (Part {})", i + 1));
            assert!(part.value.len() < 40);
        }
        let rejoined = parts
            .iter()
            .map(|p| p.value.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(rejoined, body);
    }

    #[tokio::test]
    async fn image_body_becomes_document_image() {
        let client = FakeClient::with_color(None);
        let composer = AnnouncementComposer::new(&client, 2000);

        let doc = composer
            .compose(&source("https://x.test/pic.jpeg"), origin(), None)
            .await;

        assert_eq!(doc.image.as_deref(), Some("https://x.test/pic.jpeg"));
        assert_eq!(field_names(&doc), vec!["Posted by", "Originally posted at"]);
    }

    #[tokio::test]
    async fn empty_body_adds_no_message_field() {
        let client = FakeClient::with_color(None);
        let composer = AnnouncementComposer::new(&client, 2000);

        let doc = composer.compose(&source(""), origin(), None).await;
        assert_eq!(field_names(&doc), vec!["Posted by", "Originally posted at"]);
    }

    #[tokio::test]
    async fn last_image_attachment_wins() {
        let client = FakeClient::with_color(None);
        let composer = AnnouncementComposer::new(&client, 2000);

        let mut msg = source("caption");
        msg.attachments = vec![
            SourceAttachment {
                content_type: Some("image/png".to_string()),
                url: "https://cdn.test/one".to_string(),
            },
            SourceAttachment {
                content_type: Some("text/plain".to_string()),
                url: "https://cdn.test/notes.txt".to_string(),
            },
            SourceAttachment {
                content_type: None,
                url: "https://cdn.test/two.gif".to_string(),
            },
        ];
        let doc = composer.compose(&msg, origin(), None).await;

        assert_eq!(doc.image.as_deref(), Some("https://cdn.test/two.gif"));
        assert!(field_names(&doc).contains(&"Message"));
    }

    #[tokio::test]
    async fn attachment_image_overrides_embed_image() {
        let client = FakeClient::with_color(None);
        let composer = AnnouncementComposer::new(&client, 2000);

        let mut msg = source("");
        msg.embeds.push(SourceEmbed {
            url: Some("https://x.test/a.png".to_string()),
            description: None,
            footer_text: None,
        });
        msg.attachments.push(SourceAttachment {
            content_type: Some("image/jpeg".to_string()),
            url: "https://cdn.test/photo.jpg".to_string(),
        });
        let doc = composer.compose(&msg, origin(), None).await;

        assert_eq!(doc.image.as_deref(), Some("https://cdn.test/photo.jpg"));
    }
}
