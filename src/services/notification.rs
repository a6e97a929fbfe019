//! Notification service implementation
//!
//! Outbound email is a best-effort side channel: the registration engine and
//! the schedulers call into the `Notifier` trait and log failures without
//! rolling anything back. `SmtpNotifier` is the production implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;
use uuid::Uuid;

use crate::config::SmtpConfig;
use crate::utils::errors::Result;

/// Outbound notification contract.
///
/// One method per notification kind the system emits. Implementations are
/// synchronous from the caller's point of view (await the send, report
/// success/failure); callers never block correctness on the outcome.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn registration_confirmation(
        &self,
        to: &str,
        name: &str,
        event_title: &str,
        event_date: DateTime<Utc>,
        registration_id: Uuid,
    ) -> Result<()>;

    async fn waitlist_notice(
        &self,
        to: &str,
        name: &str,
        event_title: &str,
        position: i64,
    ) -> Result<()>;

    async fn waitlist_promotion(
        &self,
        to: &str,
        name: &str,
        event_title: &str,
        event_date: DateTime<Utc>,
        registration_id: Uuid,
    ) -> Result<()>;

    async fn cancellation_confirmation(&self, to: &str, name: &str, event_title: &str)
        -> Result<()>;

    /// H-1 reminder. The online join link is revealed only here.
    #[allow(clippy::too_many_arguments)]
    async fn event_reminder(
        &self,
        to: &str,
        name: &str,
        event_title: &str,
        event_date: DateTime<Utc>,
        location: Option<&str>,
        join_link: Option<&str>,
        registration_id: Uuid,
    ) -> Result<()>;

    async fn whitelist_approved(&self, to: &str, name: &str, organization: &str) -> Result<()>;

    async fn whitelist_rejected(&self, to: &str, name: &str, reason: &str) -> Result<()>;
}

/// SMTP-backed notifier
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from: format!("{} <{}>", config.from_name, config.username),
        })
    }

    async fn send(&self, to: &str, subject: &str, html_body: String) -> Result<()> {
        let message = Message::builder()
            .from(self.from.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body)?;

        self.transport.send(message).await?;
        debug!(to = %to, subject = %subject, "Notification email sent");
        Ok(())
    }
}

fn format_event_date(date: DateTime<Utc>) -> String {
    date.format("%d %B %Y, %H:%M UTC").to_string()
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn registration_confirmation(
        &self,
        to: &str,
        name: &str,
        event_title: &str,
        event_date: DateTime<Utc>,
        registration_id: Uuid,
    ) -> Result<()> {
        let subject = format!("Konfirmasi Pendaftaran: {event_title}");
        let body = format!(
            "<h2>Halo {name},</h2>\
             <p>Pendaftaran kamu untuk <strong>{event_title}</strong> sudah dikonfirmasi.</p>\
             <p>Jadwal: {}</p>\
             <p>ID Registrasi: {registration_id}</p>",
            format_event_date(event_date)
        );
        self.send(to, &subject, body).await
    }

    async fn waitlist_notice(
        &self,
        to: &str,
        name: &str,
        event_title: &str,
        position: i64,
    ) -> Result<()> {
        let subject = format!("Waiting List: {event_title}");
        let body = format!(
            "<h2>Halo {name},</h2>\
             <p>Event <strong>{event_title}</strong> sudah penuh. Kamu masuk waiting list \
             pada posisi <strong>{position}</strong>.</p>\
             <p>Kami akan mengabari jika ada slot yang tersedia.</p>"
        );
        self.send(to, &subject, body).await
    }

    async fn waitlist_promotion(
        &self,
        to: &str,
        name: &str,
        event_title: &str,
        event_date: DateTime<Utc>,
        registration_id: Uuid,
    ) -> Result<()> {
        let subject = format!("Promosi dari Waiting List: {event_title}");
        let body = format!(
            "<h2>Halo {name},</h2>\
             <p>Kabar baik! Slot untuk <strong>{event_title}</strong> sudah tersedia dan \
             pendaftaran kamu sekarang terkonfirmasi.</p>\
             <p>Jadwal: {}</p>\
             <p>ID Registrasi: {registration_id}</p>",
            format_event_date(event_date)
        );
        self.send(to, &subject, body).await
    }

    async fn cancellation_confirmation(
        &self,
        to: &str,
        name: &str,
        event_title: &str,
    ) -> Result<()> {
        let subject = format!("Pembatalan Pendaftaran: {event_title}");
        let body = format!(
            "<h2>Halo {name},</h2>\
             <p>Pendaftaran kamu untuk <strong>{event_title}</strong> sudah dibatalkan.</p>"
        );
        self.send(to, &subject, body).await
    }

    async fn event_reminder(
        &self,
        to: &str,
        name: &str,
        event_title: &str,
        event_date: DateTime<Utc>,
        location: Option<&str>,
        join_link: Option<&str>,
        registration_id: Uuid,
    ) -> Result<()> {
        let subject = format!("[Reminder] Event Besok: {event_title}");
        let mut body = format!(
            "<h2>Halo {name},</h2>\
             <p><strong>{event_title}</strong> dimulai besok, {}.</p>",
            format_event_date(event_date)
        );
        if let Some(location) = location {
            body.push_str(&format!("<p>Lokasi: {location}</p>"));
        }
        if let Some(join_link) = join_link {
            body.push_str(&format!("<p>Link: <a href=\"{join_link}\">{join_link}</a></p>"));
        }
        body.push_str(&format!("<p>ID Registrasi: {registration_id}</p>"));
        self.send(to, &subject, body).await
    }

    async fn whitelist_approved(&self, to: &str, name: &str, organization: &str) -> Result<()> {
        let subject = "Pengajuan Organisasi Disetujui";
        let body = format!(
            "<h2>Halo {name},</h2>\
             <p>Pengajuan organisasi <strong>{organization}</strong> sudah disetujui. \
             Kamu sekarang bisa membuat dan mempublikasikan event.</p>"
        );
        self.send(to, subject, body).await
    }

    async fn whitelist_rejected(&self, to: &str, name: &str, reason: &str) -> Result<()> {
        let subject = "Pengajuan Organisasi Ditolak";
        let body = format!(
            "<h2>Halo {name},</h2>\
             <p>Maaf, pengajuan organisasi kamu ditolak.</p>\
             <p>Alasan: {reason}</p>"
        );
        self.send(to, subject, body).await
    }
}
