#![allow(dead_code)]

use solar_client::controller::transport::{Connector, Transport};
use solar_client::prelude::*;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub fn common_setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One frame (or event) the fake server produces.
#[derive(Debug, Clone)]
pub enum Inbound {
    Text(String),
    Closed,
    Error(String),
}

impl Inbound {
    pub fn json(value: Value) -> Self {
        Self::Text(value.to_string())
    }
}

/// What happens on one connection attempt.
#[derive(Debug, Clone)]
pub enum Script {
    Refuse,
    /// Never completes the socket open.
    Hang,
    /// Open, then replay these frames in order. Once they run out `recv`
    /// blocks forever.
    Frames(Vec<Inbound>),
}

/// Counters shared between a connector, its transports and the test.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    attempts: Arc<Mutex<u32>>,
    closes: Arc<Mutex<u32>>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn attempts(&self) -> u32 {
        *self.attempts.lock().unwrap()
    }

    pub fn closes(&self) -> u32 {
        *self.closes.lock().unwrap()
    }

    pub fn sent(&self) -> Vec<Value> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|text| serde_json::from_str(text).unwrap())
            .collect()
    }

    pub fn sent_actions(&self) -> Vec<String> {
        self.sent()
            .iter()
            .map(|command| command["Action"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

pub struct MockConnector {
    scripts: Mutex<VecDeque<Script>>,
    recorder: Recorder,
}

impl MockConnector {
    pub fn new(scripts: Vec<Script>) -> (Self, Recorder) {
        let recorder = Recorder::default();
        let connector = Self {
            scripts: Mutex::new(scripts.into()),
            recorder: recorder.clone(),
        };
        (connector, recorder)
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, ClientError> {
        *self.recorder.attempts.lock().unwrap() += 1;

        let script = self.scripts.lock().unwrap().pop_front();
        match script {
            None | Some(Script::Refuse) => {
                Err(ClientError::Transport(format!("connection to {} refused", url)))
            }
            Some(Script::Hang) => futures::future::pending().await,
            Some(Script::Frames(frames)) => Ok(Box::new(MockTransport {
                frames: frames.into(),
                recorder: self.recorder.clone(),
            })),
        }
    }
}

pub struct MockTransport {
    frames: VecDeque<Inbound>,
    recorder: Recorder,
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, text: String) -> Result<(), ClientError> {
        self.recorder.sent.lock().unwrap().push(text);
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<String>, ClientError> {
        match self.frames.pop_front() {
            Some(Inbound::Text(text)) => Ok(Some(text)),
            Some(Inbound::Closed) => Ok(None),
            Some(Inbound::Error(err)) => Err(ClientError::Transport(err)),
            None => futures::future::pending().await,
        }
    }

    async fn close(&mut self) -> Result<(), ClientError> {
        *self.recorder.closes.lock().unwrap() += 1;
        Ok(())
    }
}

pub struct Factory;

impl Factory {
    pub fn mac() -> String {
        "AA:BB:CC:DD:EE:FF".to_string()
    }

    pub fn config() -> Config {
        Config {
            url: "ws://127.0.0.1:9/".to_string(),
            mac: Self::mac(),
            connect_timeout: 0.05,
            command_timeout: 0.05,
            retry_delay: 0.0,
            max_attempts: 3,
            ..Config::default()
        }
    }

    pub fn session(scripts: Vec<Script>) -> (Session, Recorder) {
        let config = Self::config();
        let (connector, recorder) = MockConnector::new(scripts);
        let session = Session::new(config.url(), config.mac(), Box::new(connector))
            .unwrap()
            .with_timeouts(config.timeouts());
        (session, recorder)
    }

    /// A session that has already completed its handshake.
    pub async fn connected_session(frames: Vec<Inbound>) -> (Session, Recorder) {
        let (mut session, recorder) = Self::session(vec![Self::connection(frames)]);
        let config = Self::config();
        assert!(session.connect(config.connect_timeout(), 1).await);
        (session, recorder)
    }

    pub fn coordinator(scripts: Vec<Script>) -> (Coordinator, Recorder, Channels) {
        let (session, recorder) = Self::session(scripts);
        let channels = Channels::new();
        let coordinator = Coordinator::new(session, channels.clone());
        (coordinator, recorder, channels)
    }

    /// One connection that answers the handshake, then replays `frames`.
    pub fn connection(frames: Vec<Inbound>) -> Script {
        let mut all = vec![Self::handshake()];
        all.extend(frames);
        Script::Frames(all)
    }

    pub fn handshake() -> Inbound {
        Inbound::json(json!({"code": 200, "client_id": "c0ffee"}))
    }

    pub fn property(property_id: i64, unikey: &str, value: Value) -> Value {
        json!({"property_id": property_id, "unikey": unikey, "value": value})
    }

    pub fn info(properties: Vec<Value>) -> Inbound {
        Inbound::json(json!({"code": 200, "data": properties}))
    }

    pub fn reply(code: i64) -> Inbound {
        Inbound::json(json!({"code": code}))
    }
}
