use axum::async_trait;
use tracing::info;

use crate::config::SmtpConfig;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<()>;
}

/// Development transport: writes the message to the log instead of handing
/// it to a relay. A real SMTP client plugs in behind the same trait.
#[derive(Clone)]
pub struct LogMailer {
    smtp: SmtpConfig,
}

impl LogMailer {
    pub fn new(smtp: SmtpConfig) -> Self {
        Self { smtp }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<()> {
        info!(
            %to,
            from = %self.smtp.from,
            relay = format!("{}:{}", self.smtp.host, self.smtp.port),
            "password reset code: {code} (valid for 10 minutes)"
        );
        Ok(())
    }
}
