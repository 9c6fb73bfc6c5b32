//! Outbound notification mail. SMTP when configured, a log-only transport
//! otherwise (development and tests).

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::Config;
use crate::error::OrreryError;

pub enum Mailer {
    Smtp {
        transport: AsyncSmtpTransport<Tokio1Executor>,
        from: Mailbox,
    },
    LogOnly,
}

impl Mailer {
    /// Build from config: SMTP when `smtp_host` is set, log-only otherwise.
    pub fn from_config(cfg: &Config) -> Result<Self, OrreryError> {
        let Some(host) = cfg.smtp_host.as_deref() else {
            return Ok(Self::LogOnly);
        };

        let from = cfg
            .mail_from
            .as_deref()
            .ok_or_else(|| {
                OrreryError::Config("ORRERY_MAIL_FROM must be set when SMTP is configured".to_string())
            })?
            .parse::<Mailbox>()
            .map_err(|e| OrreryError::Config(format!("invalid ORRERY_MAIL_FROM: {e}")))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| OrreryError::Config(format!("invalid SMTP relay '{host}': {e}")))?;
        if let Some(port) = cfg.smtp_port {
            builder = builder.port(port);
        }
        if let (Some(username), Some(password)) =
            (cfg.smtp_username.clone(), cfg.smtp_password.clone())
        {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self::Smtp {
            transport: builder.build(),
            from,
        })
    }

    pub fn log_only() -> Self {
        Self::LogOnly
    }

    /// Send the password-recovery mail carrying the single-use reset token.
    /// Blocks until the transport accepts or rejects the message.
    pub async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), OrreryError> {
        match self {
            Self::Smtp { transport, from } => {
                let to_mailbox = to
                    .parse::<Mailbox>()
                    .map_err(|e| OrreryError::Validation(format!("invalid email address: {e}")))?;
                let email = Message::builder()
                    .from(from.clone())
                    .to(to_mailbox)
                    .subject("Planetary API password reset")
                    .header(ContentType::TEXT_PLAIN)
                    .body(reset_body(to, token))
                    .map_err(|e| OrreryError::MailTransport(e.to_string()))?;
                transport
                    .send(email)
                    .await
                    .map_err(|e| OrreryError::MailTransport(e.to_string()))?;
                info!(to = %to, "password reset mail dispatched");
                Ok(())
            }
            Self::LogOnly => {
                info!(to = %to, "SMTP not configured; reset token logged instead of mailed");
                Ok(())
            }
        }
    }
}

fn reset_body(email: &str, token: &str) -> String {
    format!(
        "A password reset was requested for {email}.\n\n\
         Reset token (valid once, for a limited time):\n\n    {token}\n\n\
         Submit it with a new password to POST /reset_password.\n\
         If you did not request this, ignore this message.\n"
    )
}
