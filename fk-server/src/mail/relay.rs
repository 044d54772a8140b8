use std::time::Duration;

use super::{Mail, Mailer};
use crate::error::ServerError;

/// Mail transport that hands messages to an HTTP mail relay.
///
/// The relay receives each message as a JSON object `{to, subject, body}`. Any non-success
/// status, and any request that does not complete within the timeout, is a delivery failure.
#[derive(Clone)]
pub struct RelayMailer {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl std::fmt::Debug for RelayMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayMailer")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "..."))
            .finish()
    }
}

impl RelayMailer {
    pub fn new(url: String, token: Option<String>, timeout: Duration) -> Result<Self, ServerError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| ServerError::Setup(format!("could not build mail relay client: {e}")))?;

        Ok(Self { client, url, token })
    }
}

#[async_trait::async_trait(?Send)]
impl Mailer for RelayMailer {
    async fn send(&self, mail: &Mail) -> Result<(), crate::Error> {
        let mut req = self.client.post(&self.url).json(mail);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| {
            log::error!("failed to reach mail relay {}: {e}", self.url);
            crate::Error::Mail
        })?;

        if !resp.status().is_success() {
            log::error!("mail relay {} replied {}", self.url, resp.status());
            return Err(crate::Error::Mail);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_debug_hides_token() {
        let mailer = RelayMailer::new(
            "http://relay".to_string(),
            Some("sekrit".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();
        let debug = format!("{mailer:?}");

        assert!(debug.contains("http://relay"));
        assert!(!debug.contains("sekrit"));
    }

    #[actix_web::test]
    async fn test_relay_unreachable() {
        // Nothing listens on the discard port.
        let mailer =
            RelayMailer::new("http://127.0.0.1:9/mail".to_string(), None, Duration::from_secs(5))
                .unwrap();
        let mail = Mail {
            to: "a@b.com".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };

        assert!(matches!(mailer.send(&mail).await, Err(crate::Error::Mail)));
    }

    #[actix_web::test]
    async fn test_relay_delivers() {
        let received: Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>> = Default::default();
        let sink = received.clone();

        let server = HttpServer::new(move || {
            let sink = sink.clone();
            App::new().route(
                "/mail",
                web::post().to(move |req: HttpRequest, body: web::Json<serde_json::Value>| {
                    let sink = sink.clone();
                    async move {
                        let auth = req
                            .headers()
                            .get("authorization")
                            .and_then(|h| h.to_str().ok())
                            .map(str::to_string);
                        sink.lock().unwrap().push((auth, body.into_inner()));
                        HttpResponse::Ok().finish()
                    }
                }),
            )
        })
        .workers(1)
        .bind("127.0.0.1:0")
        .unwrap();

        let addr = server.addrs()[0];
        let handle = server.run();
        let srv = handle.handle();
        actix_rt::spawn(handle);

        let mailer = RelayMailer::new(
            format!("http://{addr}/mail"),
            Some("t0ken".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        let mail = Mail {
            to: "a@b.com".to_string(),
            subject: "subject".to_string(),
            body: "body".to_string(),
        };

        mailer.send(&mail).await.unwrap();
        srv.stop(true).await;

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0.as_deref(), Some("Bearer t0ken"));
        assert_eq!(
            received[0].1,
            serde_json::json!({ "to": "a@b.com", "subject": "subject", "body": "body" })
        );
    }

    #[actix_web::test]
    async fn test_relay_times_out() {
        // Connections complete in the backlog, but nothing is ever read or answered.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let mailer = RelayMailer::new(
            format!("http://{addr}/mail"),
            None,
            Duration::from_millis(200),
        )
        .unwrap();
        let mail = Mail {
            to: "a@b.com".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };

        let res = actix_rt::time::timeout(Duration::from_secs(5), mailer.send(&mail)).await;
        assert!(matches!(res, Ok(Err(crate::Error::Mail))));

        drop(listener);
    }
}
