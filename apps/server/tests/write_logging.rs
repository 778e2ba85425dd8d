//! Item writes are logged exactly once per request.

mod helpers;

use std::io;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use serde_json::json;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use helpers::{test_app, AxumTestRequest};
use pantry_core::Item;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter(Arc::clone(&self.0))
    }
}

impl io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn count(&self, message: &str) -> usize {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8_lossy(&bytes).matches(message).count()
    }
}

#[tokio::test(flavor = "current_thread")]
async fn test_each_write_is_logged_once() {
    let sink = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = test_app().await;
    let cola: Item = AxumTestRequest::post("/api/items")
        .json(&json!({"name": "Cola"}))
        .send(&app)
        .await
        .json();
    let coke: Item = AxumTestRequest::post("/api/items")
        .json(&json!({"name": "Coke"}))
        .send(&app)
        .await
        .json();

    let associated = AxumTestRequest::post("/api/barcode/associate")
        .json(&json!({"barcode": "c1", "item_id": coke.id}))
        .send(&app)
        .await;
    assert_eq!(associated.status, StatusCode::OK);

    let merged = AxumTestRequest::post("/api/items/merge")
        .json(&json!({"target_id": cola.id, "source_ids": [coke.id]}))
        .send(&app)
        .await;
    assert_eq!(merged.status, StatusCode::OK);

    let deleted = AxumTestRequest::delete(&format!("/api/items/{}", cola.id))
        .send(&app)
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    assert_eq!(sink.count("Item created"), 2);
    assert_eq!(sink.count("Barcode associated"), 1);
    assert_eq!(sink.count("Items merged"), 1);
    assert_eq!(sink.count("Item deleted"), 1);
}
