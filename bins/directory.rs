use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

use service::admin::ADMIN_SITE;

fn main() -> std::process::ExitCode {
    dotenv().ok();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = "directory", event = "config_invalid", error = %e, "failed to load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(&cfg.logging.format);
    info!(service = "directory", event = "logger_init", format = %cfg.logging.format, "tracing subscriber initialized");

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "directory",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "directory", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(service = "directory", event = "start", %service_id, pid, version, "directory bootstrap starting");

    rt.block_on(async move {
        let db = match service::runtime::bootstrap(&cfg.database).await {
            Ok(db) => db,
            Err(e) => {
                error!(service = "directory", event = "bootstrap_failed", error = %e, "database bootstrap failed");
                return std::process::ExitCode::FAILURE;
            }
        };

        match ADMIN_SITE.summary(&db).await {
            Ok(summary) => {
                for entry in &summary {
                    info!(service = "directory", event = "admin_entity", key = entry.key, label = entry.label, count = entry.count);
                }
                info!(service = "directory", event = "stop", %service_id, pid, entities = summary.len(), "directory ready");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "directory", event = "summary_failed", code = e.code(), error = %e, "admin summary failed");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
