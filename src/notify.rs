//! Outbound setup mail. Glue only: the provisioning core never calls
//! this; the `send-mail` command feeds it rows whose credentials and DNS
//! records earlier passes produced.

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::sheet::Row;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("message build failed: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("smtp failure: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

pub struct SetupNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    cc: Option<Mailbox>,
    console_url: String,
}

impl SetupNotifier {
    pub fn from_config(config: &MailConfig) -> Result<Self, NotifyError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_relay)?;
        if let (Some(username), Some(password)) =
            (config.smtp_username.clone(), config.smtp_password.clone())
        {
            builder = builder.credentials(Credentials::new(username, password));
        }

        let from: Mailbox =
            format!("{} <{}>", config.sender_name, config.from_address).parse()?;
        let cc = config
            .cc_address
            .as_deref()
            .map(str::parse::<Mailbox>)
            .transpose()?;

        Ok(Self {
            mailer: builder.build(),
            from,
            cc,
            console_url: config.console_url.clone(),
        })
    }

    /// Send the setup mail for one row. Returns false when the row lacks
    /// the fields a mail needs (recipient or domain), which is a skip,
    /// not a failure.
    pub async fn send_for_row(&self, row: &Row) -> Result<bool, NotifyError> {
        let to = row.get("contactEmail");
        let domain = row.get("customerDomain");
        if to.is_empty() {
            warn!(row = row.index, "contactEmail missing, mail skipped");
            return Ok(false);
        }
        if domain.is_empty() {
            warn!(row = row.index, "customerDomain missing, mail skipped");
            return Ok(false);
        }

        let html = self.build_body(row);
        let plain = plain_text_fallback(&html);

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(format!("Setup instructions for {domain} activation"));
        if let Some(cc) = &self.cc {
            builder = builder.cc(cc.clone());
        }
        let message = builder.multipart(MultiPart::alternative_plain_html(plain, html))?;

        self.mailer.send(message).await?;
        info!(row = row.index, domain, to, "setup mail sent");
        Ok(true)
    }

    fn build_body(&self, row: &Row) -> String {
        let id = row.get("primaryEmail");
        let password = row.get("password");
        let host = row.get("host");
        let value = row.get("value");
        let console = &self.console_url;

        format!(
            r#"<div style="font-family:Roboto,Arial,sans-serif; font-size:14px; line-height:1.6;">
Hello,<br><br>
Here are the activation steps for your new workspace.<br><br>

<b>1. Administrator account</b><br>
ID: <b>{id}</b><br>
Temporary password: <b>{password}</b><br>
Admin console: <a href="{console}">{console}</a><br>
Please change the temporary password once setup is complete.<br><br>

<b>2. DNS records required for activation</b><br>
<b>Step 1: Domain ownership (CNAME)</b><br>
Type: CNAME<br>
Host: <b>{host}</b><br>
TTL: 3600s (1hr)<br>
Value: <b>{value}</b><br><br>

<b>Step 2: Mail routing (MX)</b><br>
Type: MX, Host: @ (or blank), TTL: 3600s, Priority: 1<br>
Value: <b>smtp.google.com</b><br>
Note: after changing MX records, mail may be delivered to both servers
for up to 48 hours. A Friday afternoon change keeps the impact low.<br><br>

<b>Step 3: Spam protection (SPF)</b><br>
Type: TXT, Host: @ (or blank), TTL: 3600s<br>
Value: <b>v=spf1 include:_spf.google.com ~all</b><br><br>

<b>3. Adding users</b><br>
Once the required records resolve, users can be added from the admin
console's user management page.<br><br>

We recommend designating at least two super administrators for business
continuity. Reply to this mail if you need further assistance.<br><br>

Best regards,<br>
Customer Support
</div>"#
        )
    }
}

/// Rough plain-text rendering of the HTML body for the multipart
/// fallback: line breaks preserved, remaining tags stripped.
fn plain_text_fallback(html: &str) -> String {
    static BREAKS: OnceLock<Option<Regex>> = OnceLock::new();
    static TAGS: OnceLock<Option<Regex>> = OnceLock::new();

    let mut text = html.to_string();
    if let Some(breaks) = BREAKS.get_or_init(|| Regex::new(r"(?i)<br\s*/?>|</div>").ok()) {
        text = breaks.replace_all(&text, "\n").into_owned();
    }
    if let Some(tags) = TAGS.get_or_init(|| Regex::new(r"<[^>]+>").ok()) {
        text = tags.replace_all(&text, "").into_owned();
    }
    text.trim().to_string()
}
