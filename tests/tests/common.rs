#![allow(dead_code)]

use std::any::Any;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracing::Level;

use rondo_core::command::{Command, Envelope};
use rondo_core::data::{CredentialValidator, DataSource, Row, SelectParams};
use rondo_core::error::DataError;
use rondo_core::render::RenderContext;
use rondo_core::tree::{Bubble, Component, Tree};
use rondo_core::TokenAuthority;
use rondo_proto::{DecodeError, NodePath, ScalarValue};

#[ctor::ctor]
fn init_tracing() { tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init(); }

/// Issue a token for the node at `path` the way the rendering layer
/// would: through a RenderContext so it registers with the authority.
#[allow(unused)]
pub fn issue(tree: &Tree, authority: &dyn TokenAuthority, path: &[u32], argument: &str) -> String {
    let ctx = RenderContext::new(tree.id(), authority);
    ctx.postback_token(&NodePath::new(path.to_vec()), argument).to_string()
}

/// In-memory data source keyed by the `id` column. Flipping `offline`
/// makes every operation fail, for exercising error paths.
pub struct MemorySource {
    rows: Mutex<Vec<Row>>,
    offline: Mutex<bool>,
}

#[allow(unused)]
impl MemorySource {
    pub fn new(rows: Vec<Row>) -> Arc<Self> {
        Arc::new(Self { rows: Mutex::new(rows), offline: Mutex::new(false) })
    }

    pub fn set_offline(&self, offline: bool) { *self.offline.lock().unwrap() = offline; }

    fn check_online(&self) -> Result<(), DataError> {
        if *self.offline.lock().unwrap() {
            Err(DataError::Other(anyhow::anyhow!("source offline")))
        } else {
            Ok(())
        }
    }

    /// `count` people rows: id (i64), name, age.
    pub fn with_people(count: usize) -> Arc<Self> {
        let rows = (0..count)
            .map(|i| {
                let mut row = BTreeMap::new();
                row.insert("id".to_owned(), ScalarValue::I64(i as i64));
                row.insert("name".to_owned(), ScalarValue::String(format!("person-{:03}", i)));
                row.insert("age".to_owned(), ScalarValue::I64(20 + (i as i64 * 7) % 50));
                row
            })
            .collect();
        Self::new(rows)
    }

    pub fn row_count(&self) -> usize { self.rows.lock().unwrap().len() }

    pub fn get(&self, key: &ScalarValue) -> Option<Row> {
        self.rows.lock().unwrap().iter().find(|r| r.get("id") == Some(key)).cloned()
    }
}

fn compare_values(a: &ScalarValue, b: &ScalarValue) -> Ordering {
    match (a.as_i64(), b.as_i64()) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

impl DataSource for MemorySource {
    fn select(&self, params: &SelectParams) -> Result<Vec<Row>, DataError> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap().clone();
        if let Some(sort) = &params.sort {
            if !rows.is_empty() && !rows[0].contains_key(sort) {
                return Err(DataError::UnknownColumn(sort.clone()));
            }
            rows.sort_by(|a, b| match (a.get(sort), b.get(sort)) {
                (Some(a), Some(b)) => compare_values(a, b),
                _ => Ordering::Equal,
            });
        }
        let start = params.page * params.page_size;
        Ok(rows.into_iter().skip(start).take(params.page_size).collect())
    }

    fn total_rows(&self) -> Result<usize, DataError> {
        self.check_online()?;
        Ok(self.rows.lock().unwrap().len())
    }

    fn update(&self, key: &ScalarValue, values: &Row) -> Result<usize, DataError> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| r.get("id") == Some(key)) {
            Some(row) => {
                *row = values.clone();
                Ok(1)
            }
            None => Err(DataError::RowNotFound),
        }
    }

    fn delete(&self, key: &ScalarValue) -> Result<usize, DataError> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.get("id") != Some(key));
        if rows.len() == before {
            Err(DataError::RowNotFound)
        } else {
            Ok(before - rows.len())
        }
    }
}

/// Accepts one fixed user/password pair.
pub struct MemoryCredentials {
    pub user: &'static str,
    pub password: &'static str,
}

impl CredentialValidator for MemoryCredentials {
    fn validate(&self, user: &str, password: &str) -> bool { user == self.user && password == self.password }
}

/// Observable component that logs every handle/bubble call, for
/// bubbling-order assertions.
pub struct Recorder {
    pub label: &'static str,
    pub log: Arc<Mutex<Vec<String>>>,
    pub stop: bool,
    pub children: Vec<Box<dyn Component>>,
}

#[allow(unused)]
impl Recorder {
    pub fn new(label: &'static str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self { label, log, stop: false, children: Vec::new() }
    }

    pub fn stopping(label: &'static str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self { label, log, stop: true, children: Vec::new() }
    }

    pub fn with_child(mut self, child: Recorder) -> Self {
        self.children.push(Box::new(child));
        self
    }
}

impl Component for Recorder {
    fn kind(&self) -> &'static str { "recorder" }

    fn children(&self) -> &[Box<dyn Component>] { &self.children }

    fn children_mut(&mut self) -> &mut [Box<dyn Component>] { &mut self.children }

    fn handle_argument(&mut self, argument: &str) -> Result<Option<Envelope>, DecodeError> {
        self.log.lock().unwrap().push(format!("handle:{}", self.label));
        if argument.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Envelope::new(Command::ItemClicked, argument)))
        }
    }

    fn on_bubble(&mut self, envelope: Envelope) -> Bubble {
        self.log.lock().unwrap().push(format!("bubble:{}", self.label));
        if self.stop {
            Bubble::Handled
        } else {
            Bubble::Forward(envelope)
        }
    }

    fn as_any(&self) -> &dyn Any { self }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}
