// src/notify.rs
//
// Рассылка резервной копии после каждой успешной записи. Задумана как
// fire-and-forget: ошибка отправки пишется в лог и никогда не влияет
// на результат самой записи.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{debug, warn};

use crate::config::SmtpConfig;

/// Уведомление о изменении данных. Ядро зависит от этой абстракции,
/// а не от SMTP напрямую.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Отправляет актуальную резервную копию базы.
    async fn notify_backup(&self) -> anyhow::Result<()>;
}

/// Почтовый вариант: письмо с файлом базы во вложении.
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    to: String,
    db_path: PathBuf,
}

impl SmtpNotifier {
    pub fn new(smtp: &SmtpConfig, db_path: PathBuf) -> anyhow::Result<Self> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
            .context("неверный адрес SMTP-сервера")?
            .port(smtp.port)
            .credentials(Credentials::new(smtp.user.clone(), smtp.password.clone()))
            .build();
        Ok(Self {
            mailer,
            from: smtp.user.clone(),
            to: smtp.to.clone(),
            db_path,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify_backup(&self) -> anyhow::Result<()> {
        let bytes = tokio::fs::read(&self.db_path)
            .await
            .context("не удалось прочитать файл базы")?;

        let attachment = Attachment::new("krasunit_phonebook.db".to_string()).body(
            bytes,
            ContentType::parse("application/octet-stream")?,
        );
        let email = Message::builder()
            .from(self.from.parse()?)
            .to(self.to.parse()?)
            .subject("Резервная копия справочника «КрасЮнит»")
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(
                        "Автоматическая резервная копия после изменения справочника.".to_string(),
                    ))
                    .singlepart(attachment),
            )?;

        self.mailer.send(email).await.context("SMTP-отправка не удалась")?;
        debug!("резервная копия отправлена на {}", self.to);
        Ok(())
    }
}

/// Запускает отправку в фоне. Если notifier не настроен, молча пропускаем.
pub fn spawn_backup(notifier: Option<std::sync::Arc<dyn Notifier>>) {
    let Some(notifier) = notifier else {
        return;
    };
    tokio::spawn(async move {
        if let Err(e) = notifier.notify_backup().await {
            // Не фатально: запись уже состоялась
            warn!("не удалось отправить резервную копию: {e:#}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingNotifier {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify_backup(&self) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("smtp down");
            }
            Ok(())
        }
    }

    async fn wait_for_call(notifier: &CountingNotifier) {
        for _ in 0..100 {
            if notifier.calls.load(Ordering::SeqCst) > 0 {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn spawn_backup_invokes_notifier() {
        let notifier = Arc::new(CountingNotifier {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        spawn_backup(Some(notifier.clone()));
        wait_for_call(&notifier).await;
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_is_swallowed() {
        let notifier = Arc::new(CountingNotifier {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        // Ошибка уходит в лог, паники/проброса нет
        spawn_backup(Some(notifier.clone()));
        wait_for_call(&notifier).await;
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_notifier_is_a_noop() {
        spawn_backup(None);
    }
}
