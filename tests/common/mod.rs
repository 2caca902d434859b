#![allow(dead_code)]

use genesis_cli::api::GraphQl;
use genesis_cli::config::{AllergenTables, ApiSettings, FileSettings, Options, Settings};
use genesis_cli::error::RequestFailure;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub type Responder = Box<dyn Fn(&str, &Value) -> Result<Value, RequestFailure>>;

/// Records every request and answers from a closure.
pub struct FakeApi {
    calls: RefCell<Vec<(String, Value)>>,
    respond: Responder,
}

impl FakeApi {
    pub fn new(respond: impl Fn(&str, &Value) -> Result<Value, RequestFailure> + 'static) -> Self {
        FakeApi {
            calls: RefCell::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, document: &str) -> usize {
        self.calls.borrow().iter().filter(|(d, _)| d == document).count()
    }

    /// Variables of every call made with `document`, in order.
    pub fn variables_for(&self, document: &str) -> Vec<Value> {
        self.calls
            .borrow()
            .iter()
            .filter(|(d, _)| d == document)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

impl GraphQl for FakeApi {
    fn execute(&self, document: &str, variables: Value) -> Result<Value, RequestFailure> {
        let outcome = (self.respond)(document, &variables);
        self.calls.borrow_mut().push((document.to_string(), variables));
        outcome
    }
}

pub fn server_error() -> RequestFailure {
    RequestFailure::Status {
        status: 500,
        body: "internal error".into(),
    }
}

/// Search response with the given result list.
pub fn search_response(foods: Value) -> Value {
    let total = foods.as_array().map(|a| a.len()).unwrap_or(0);
    json!({"data": {"foods": {"search": {
        "foodSearchResults": foods,
        "totalCount": total,
        "pageInfo": {"hasNextPage": false}
    }}}})
}

pub fn settings_in(dir: &Path) -> Settings {
    Settings {
        api: ApiSettings {
            endpoint: "http://localhost/graphql".into(),
            api_key: "test-key".into(),
        },
        files: FileSettings {
            output_file: dir.join("output.json"),
            output_csv: dir.join("output.csv"),
            input_csv: dir.join("input.csv"),
            recipe_analysis_csv: dir.join("recipe_analysis.csv"),
            ingredients_csv: dir.join("ingredients.csv"),
            recipe_items_csv: dir.join("recipe_items.csv"),
        },
        options: Options::default(),
        allergens: AllergenTables::default(),
    }
}

/// Shared in-memory log sink for asserting on log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with logs captured into the returned buffer.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, buffer.contents())
}
