use anyhow::Context as _;

use crate::domain::repository::Mailer;

/// Mailer that posts JSON to an HTTP mail relay. A missing relay URL is
/// the "mail not configured" state, reported through `is_configured` so
/// the registration flow can apply its fallback policy.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: Option<String>, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            from,
        }
    }
}

impl Mailer for HttpMailer {
    fn is_configured(&self) -> bool {
        self.api_url.is_some()
    }

    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<()> {
        let url = self.api_url.as_deref().context("mail relay not configured")?;
        let body = serde_json::json!({
            "from": self.from,
            "to": to,
            "subject": "Your Halalan verification code",
            "text": format!(
                "Your one-time code is {code}. It expires in 5 minutes. \
                 If you did not request this, you can ignore this email."
            ),
        });
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .context("send mail relay request")?;
        if !response.status().is_success() {
            anyhow::bail!("mail relay returned {}", response.status());
        }
        Ok(())
    }
}
