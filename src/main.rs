use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};

use krasunit_phonebook::config::Config;
use krasunit_phonebook::db::ContactRepo;
use krasunit_phonebook::notify::{Notifier, SmtpNotifier};
use krasunit_phonebook::web::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::from_env()?;
    info!("база: {}", config.db_path.display());

    let repo = ContactRepo::open(&config.db_path)
        .await
        .context("не удалось открыть базу данных")?;

    let notifier: Option<Arc<dyn Notifier>> = match &config.smtp {
        Some(smtp) => match SmtpNotifier::new(smtp, config.db_path.clone()) {
            Ok(n) => {
                info!("отправка бэкапов включена, адресат {}", smtp.to);
                Some(Arc::new(n))
            }
            Err(e) => {
                warn!("SMTP не настроился ({e:#}), отправка бэкапов отключена");
                None
            }
        },
        None => None,
    };

    let state = AppState {
        repo,
        config: Arc::new(config),
        notifier,
    };
    web::serve(state).await
}
