use serde::Deserialize;

/// Event name sent by Polka when a user pays for Chirpy Red.
pub const USER_UPGRADED: &str = "user.upgraded";

/// Payment provider events the service reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    /// A user bought a Chirpy Red membership
    UserUpgraded { user_id: String },

    /// Any event this service does not handle
    Ignored(String),
}

/// Raw webhook payload as delivered by Polka.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentWebhook {
    pub event: String,
    #[serde(default)]
    pub data: PaymentWebhookData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentWebhookData {
    #[serde(default)]
    pub user_id: String,
}

impl From<PaymentWebhook> for PaymentEvent {
    fn from(webhook: PaymentWebhook) -> Self {
        if webhook.event == USER_UPGRADED {
            PaymentEvent::UserUpgraded {
                user_id: webhook.data.user_id,
            }
        } else {
            PaymentEvent::Ignored(webhook.event)
        }
    }
}
