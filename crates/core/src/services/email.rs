//! Email service: outgoing mail over SMTP.

use lettre::{
    message::MultiPart, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use tanvan_common::{AppError, AppResult};

/// SMTP mailer configuration.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP relay port.
    pub smtp_port: u16,
    /// SMTP username.
    pub username: Option<String>,
    /// SMTP password.
    pub password: Option<String>,
    /// From address.
    pub from_address: String,
    /// From display name.
    pub from_name: String,
    /// Site name used in templates.
    pub site_name: String,
    /// Public site URL used in templates.
    pub site_url: String,
}

/// Email service.
///
/// When no mailer is configured every send is logged and dropped; the rest
/// of the application does not need to care.
#[derive(Clone)]
pub struct EmailService {
    config: Option<MailerConfig>,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl EmailService {
    /// Create a new email service.
    pub fn new(config: Option<MailerConfig>) -> AppResult<Self> {
        let transport = match &config {
            Some(cfg) => Some(build_transport(cfg)?),
            None => None,
        };

        Ok(Self { config, transport })
    }

    /// Create a disabled email service (logs and drops every message).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            config: None,
            transport: None,
        }
    }

    /// Check if outgoing mail is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Send the password-reset message for an account.
    ///
    /// Fire-and-forget from the caller's perspective: there is no delivery
    /// receipt, only a send error to log.
    pub async fn send_password_reset(
        &self,
        to: &str,
        username: &str,
        reset_url: &str,
    ) -> AppResult<()> {
        let (Some(config), Some(transport)) = (&self.config, &self.transport) else {
            tracing::info!(to = %to, "Mail not configured; dropping password reset email");
            return Ok(());
        };

        let subject = format!("Reset your password on {}", config.site_name);
        let text = format!(
            "Dear {username},\n\n\
            You requested a password reset for your account on {}.\n\n\
            Click the following link to reset your password:\n{reset_url}\n\n\
            If you didn't request this, you can safely ignore this email.",
            config.site_name
        );
        let html = wrap_html(
            &format!(
                "<p>Dear {username},</p>\
                <p>You requested a password reset for your account on {}.</p>\
                <p><a href=\"{reset_url}\">Reset your password</a></p>\
                <p><small>If you didn't request this, you can safely ignore this email.</small></p>",
                config.site_name
            ),
            config,
        );

        let message = Message::builder()
            .from(
                format!("{} <{}>", config.from_name, config.from_address)
                    .parse()
                    .map_err(|e| AppError::Mail(format!("Invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::Mail(format!("Invalid recipient address: {e}")))?)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(text, html))
            .map_err(|e| AppError::Mail(format!("Failed to build message: {e}")))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Mail(format!("SMTP send failed: {e}")))?;

        tracing::debug!(to = %to, "Sent password reset email");
        Ok(())
    }
}

fn build_transport(config: &MailerConfig) -> AppResult<AsyncSmtpTransport<Tokio1Executor>> {
    let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        .map_err(|e| AppError::Mail(format!("Invalid SMTP relay: {e}")))?
        .port(config.smtp_port);

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
    }

    Ok(builder.build())
}

/// Wrap HTML content in a basic email template.
fn wrap_html(content: &str, config: &MailerConfig) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }}
        a {{ color: #007bff; }}
    </style>
</head>
<body>
    {}
    <hr style="margin-top: 40px; border: none; border-top: 1px solid #e9ecef;">
    <p style="font-size: 12px; color: #6c757d;">
        This email was sent from <a href="{}">{}</a>.
    </p>
</body>
</html>"#,
        content, config.site_url, config.site_name
    )
}
