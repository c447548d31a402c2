//! Gateway stub and fixtures shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use storefront_core::{AuthPayload, Price, Product};

use crate::error::GatewayError;
use crate::gateway::Gateway;

type Gate = Option<oneshot::Receiver<()>>;

/// Scripted gateway. Each call pops the next scripted answer; an empty
/// script answers with `Unavailable`.
#[derive(Default)]
pub struct StubGateway {
    auth: Mutex<VecDeque<(Result<AuthPayload, GatewayError>, Gate)>>,
    catalog: Mutex<VecDeque<(Result<Vec<Product>, GatewayError>, Gate)>>,
    auth_calls: AtomicUsize,
    catalog_calls: AtomicUsize,
}

impl StubGateway {
    pub fn new() -> Self {
        StubGateway::default()
    }

    pub fn push_auth(&self, answer: Result<AuthPayload, GatewayError>) {
        self.auth.lock().unwrap().push_back((answer, None));
    }

    pub fn push_catalog(&self, answer: Result<Vec<Product>, GatewayError>) {
        self.catalog.lock().unwrap().push_back((answer, None));
    }

    /// Scripts an auth answer that is held back until the returned sender fires.
    pub fn push_gated_auth(&self, answer: Result<AuthPayload, GatewayError>) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.auth.lock().unwrap().push_back((answer, Some(gate)));
        release
    }

    /// Scripts a catalog answer that is held back until the returned sender fires.
    pub fn push_gated_catalog(&self, answer: Result<Vec<Product>, GatewayError>) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.catalog.lock().unwrap().push_back((answer, Some(gate)));
        release
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Gateway for StubGateway {
    async fn authenticate(&self, _username: &str, _password: &str) -> Result<AuthPayload, GatewayError> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.auth.lock().unwrap().pop_front();
        match next {
            Some((answer, gate)) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                answer
            }
            None => Err(GatewayError::Unavailable("no scripted answer".into())),
        }
    }

    async fn list_catalog(&self) -> Result<Vec<Product>, GatewayError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.catalog.lock().unwrap().pop_front();
        match next {
            Some((answer, gate)) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                answer
            }
            None => Err(GatewayError::Unavailable("no scripted answer".into())),
        }
    }
}

pub fn auth_payload(token: &str) -> AuthPayload {
    AuthPayload {
        access_token: token.to_string(),
        id: 1,
        username: "emilys".to_string(),
        email: "emily.johnson@x.dummyjson.com".to_string(),
        first_name: "Emily".to_string(),
        last_name: "Johnson".to_string(),
        image: "https://dummyjson.com/icon/emilys/128".to_string(),
    }
}

pub fn product(id: i64, title: &str, category: &str, cents: i64) -> Product {
    Product::new(id, title, category, Price::from_cents(cents).unwrap())
}

/// The two-product catalog used across the scenario tests.
pub fn shirt_and_mug() -> Vec<Product> {
    vec![
        product(1, "Shirt", "clothing", 1999),
        product(2, "Mug", "home", 999),
    ]
}
