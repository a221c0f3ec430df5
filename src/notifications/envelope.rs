//! Per-platform message envelopes in the shape of the FCM HTTP v1 `Message`
//! resource (minus the target token, which the gateway adds at send time).

use serde::Serialize;
use std::collections::BTreeMap;

use super::models::Message;
use crate::db::enums::PlatformVariant;

pub const HIGH_PRIORITY_CHANNEL: &str = "high_priority_channel";
pub const DEFAULT_SOUND: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub data: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationBlock>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationBlock {
    pub title: String,
    pub body: String,
}

/// Platform-specific block. Serialized as a `webpush` or `android` key next to
/// `data` and `notification`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformConfig {
    Webpush(WebpushConfig),
    Android(AndroidConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebpushConfig {
    pub fcm_options: WebpushFcmOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebpushFcmOptions {
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AndroidConfig {
    pub priority: AndroidPriority,
    pub notification: AndroidNotification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AndroidPriority {
    Normal,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidNotification {
    pub sound: String,
    pub visibility: Visibility,
    pub channel_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    Private,
    Public,
    Secret,
}

/// Builds the envelope for one endpoint. Pure: identical inputs give identical output.
pub fn build(message: &Message, variant: &PlatformVariant, target_url: &str) -> Envelope {
    let mut data = BTreeMap::from([
        ("title".to_string(), message.title.clone()),
        ("body".to_string(), message.body.clone()),
        ("url".to_string(), target_url.to_string()),
        ("linkUrl".to_string(), target_url.to_string()),
    ]);

    let (notification, platform) = match variant {
        PlatformVariant::Web => {
            data.insert("click_action".to_string(), target_url.to_string());
            (
                Some(notification_block(message)),
                Some(PlatformConfig::Webpush(WebpushConfig {
                    fcm_options: WebpushFcmOptions {
                        link: target_url.to_string(),
                    },
                })),
            )
        }
        PlatformVariant::Android => (
            Some(notification_block(message)),
            Some(PlatformConfig::Android(AndroidConfig {
                priority: AndroidPriority::High,
                notification: AndroidNotification {
                    sound: DEFAULT_SOUND.to_string(),
                    visibility: Visibility::Public,
                    channel_id: HIGH_PRIORITY_CHANNEL.to_string(),
                },
            })),
        ),
        PlatformVariant::Other(_) => (None, None),
    };

    Envelope {
        data,
        notification,
        platform,
    }
}

fn notification_block(message: &Message) -> NotificationBlock {
    NotificationBlock {
        title: message.title.clone(),
        body: message.body.clone(),
    }
}
