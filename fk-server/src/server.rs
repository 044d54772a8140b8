use actix_cors::Cors;
use actix_web::{
    http::header,
    middleware::Logger,
    web,
    web::{resource, scope, Data},
    App, HttpServer,
};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::correlator::Correlator;
use crate::error::ServerError;
use crate::handlers;
use crate::mail::{LogMailer, Mailer, RelayMailer};
use crate::middleware::metrics::collect_metrics;
use crate::opts::ServerOpts;
use crate::store::{MemoryStore, SqliteStore, SubmissionStore};

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

/// Maximum size of a request body, submissions included.
const MAX_BODY_SIZE: usize = 64 * 1024;

lazy_static! {
    pub(crate) static ref FORMKEY_REQUESTS: IntCounterVec = register_int_counter_vec!(
        "formkey_requests",
        "Number of FormKey API requests by route and status.",
        &["path", "status"]
    )
    .expect("could not initialize metrics");
    pub(crate) static ref FORMKEY_NOTIFICATIONS: IntCounterVec = register_int_counter_vec!(
        "formkey_notifications",
        "Number of submissions that carried an email token, by outcome.",
        &["outcome"]
    )
    .expect("could not initialize metrics");
}

/// Registers all routes. Expects a [`Correlator`] in the app data.
pub(crate) fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(resource("/metrics").route(web::get().to(handlers::metrics)))
        .service(resource("/health").route(web::get().to(handlers::health)))
        .service(
            scope("/v1")
                .wrap_fn(collect_metrics)
                .app_data(web::JsonConfig::default().limit(MAX_BODY_SIZE))
                .app_data(web::FormConfig::default().limit(MAX_BODY_SIZE))
                .service(resource("/keys").route(web::post().to(handlers::keys)))
                .service(resource("/forms/{form_key}").route(web::post().to(handlers::submit)))
                .service(resource("/submissions").route(web::post().to(handlers::submissions)))
                .service(resource("/tokens").route(web::post().to(handlers::tokens))),
        );
}

#[actix_rt::main]
pub async fn exec(server_opts: ServerOpts) -> Result<(), ServerError> {
    let ServerOpts {
        host,
        port,
        server_key_path,
        token_key_path,
        database_url,
        mail_relay,
        mail_relay_token,
        mail_timeout,
        token_max_age,
    } = server_opts;

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let mail_timeout = Duration::from_secs(mail_timeout);
    let config = Config::load(&server_key_path, &token_key_path, token_max_age)?
        .with_mail_timeout(mail_timeout);

    let store: Arc<dyn SubmissionStore> = match &database_url {
        Some(url) => {
            let store = SqliteStore::connect(url).await.map_err(|e| {
                log::error!("{e:?}");
                e
            })?;
            log::info!("Connected to SQLite database");
            Arc::new(store)
        }
        None => {
            log::warn!("No database URL provided, submissions are kept in memory only");
            Arc::new(MemoryStore::default())
        }
    };

    let mailer: Arc<dyn Mailer> = match mail_relay {
        Some(url) => {
            log::info!("Sending mail through relay at {url}");
            Arc::new(RelayMailer::new(url, mail_relay_token, mail_timeout)?)
        }
        None => {
            log::warn!("No mail relay provided, mail is logged instead of sent");
            Arc::new(LogMailer)
        }
    };

    let correlator = Data::new(Correlator::new(config, store, mailer));

    HttpServer::new(move || {
        App::new()
            .wrap(
                Logger::new("request=%{PATH}xi, status=%s, response_time=%D ms")
                    .custom_request_replace("PATH", |req| {
                        req.match_pattern().unwrap_or_else(|| "-".to_string())
                    }),
            )
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST"])
                    .allowed_header(header::CONTENT_TYPE)
                    .max_age(86400),
            )
            .app_data(Data::clone(&correlator))
            .configure(routes)
    })
    .bind(format!("{host}:{port}"))?
    .shutdown_timeout(1)
    .run()
    .await?;

    Ok(())
}
