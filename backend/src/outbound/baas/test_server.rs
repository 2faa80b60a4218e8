//! Local stand-in for the BaaS REST API, used by adapter tests.
//!
//! Every request is recorded and answered with an empty body and the status
//! chosen by the test's responder.

use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use reqwest::Url;

use super::client::{BaasClient, BaasConfig};
use crate::domain::Secret;

pub(super) const SERVICE_KEY: &str = "service-key";

/// One request seen by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RecordedCall {
    pub(super) method: String,
    pub(super) path: String,
    pub(super) query: String,
    pub(super) authorization: Option<String>,
}

type Responder = Arc<dyn Fn(&HttpRequest) -> StatusCode + Send + Sync>;

pub(super) struct StubBaas {
    base_url: Url,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    handle: ServerHandle,
}

impl StubBaas {
    /// Start the stub on an ephemeral port. Must run inside an actix system.
    pub(super) fn spawn(respond: impl Fn(&HttpRequest) -> StatusCode + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        let addr = listener.local_addr().expect("stub address");
        let calls = Arc::new(Mutex::new(Vec::new()));
        let respond: Responder = Arc::new(respond);
        let recorded = Arc::clone(&calls);

        let server = HttpServer::new(move || {
            let recorded = Arc::clone(&recorded);
            let respond = Arc::clone(&respond);
            App::new().default_service(web::to(move |req: HttpRequest| {
                let recorded = Arc::clone(&recorded);
                let respond = Arc::clone(&respond);
                async move {
                    recorded.lock().expect("calls lock").push(RecordedCall {
                        method: req.method().to_string(),
                        path: req.path().to_owned(),
                        query: req.query_string().to_owned(),
                        authorization: req
                            .headers()
                            .get(AUTHORIZATION)
                            .and_then(|value| value.to_str().ok())
                            .map(str::to_owned),
                    });
                    HttpResponse::build(respond(&req)).finish()
                }
            }))
        })
        .disable_signals()
        .workers(1)
        .listen(listener)
        .expect("listen on stub socket")
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);
        Self {
            base_url: Url::parse(&format!("http://{addr}/")).expect("stub url"),
            calls,
            handle,
        }
    }

    /// Client pointed at the stub.
    pub(super) fn client(&self) -> Arc<BaasClient> {
        Arc::new(
            BaasClient::new(BaasConfig {
                base_url: self.base_url.clone(),
                anon_key: Secret::new("anon-key"),
                service_key: Secret::new(SERVICE_KEY),
                timeout: Duration::from_secs(5),
            })
            .expect("stub client"),
        )
    }

    /// Requests received so far, in arrival order.
    pub(super) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(super) async fn stop(self) {
        self.handle.stop(true).await;
    }
}
