//! [`NoteStore`] for a remote `notes` router.
//!
//! Speaks the tRPC HTTP shape: queries are `GET {endpoint}/notes.get` with a
//! JSON `input` query parameter, mutations are `POST {endpoint}/notes.save`
//! with a JSON body, and both answer `{"result":{"data":...}}`. The server
//! reports failures by returning no data.

use super::NoteStore;
use crate::error::{Error, Result};
use crate::model::{Note, SaveNote};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Remote note store.
#[derive(Debug, Clone)]
pub struct HttpNoteStore {
    client: reqwest::Client,
    endpoint: String,
    default_id: Option<String>,
}

impl HttpNoteStore {
    /// Store for the router mounted at `endpoint` (e.g. `http://host/api/trpc`).
    ///
    /// With no `default_id`, `get(None)` leaves the choice of note to the server.
    pub fn new(endpoint: impl Into<String>, default_id: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint, default_id)
    }

    pub fn with_client(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        default_id: Option<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            default_id,
        }
    }

    #[must_use]
    pub fn default_id(&self) -> Option<&str> {
        self.default_id.as_deref()
    }

    fn procedure_url(&self, procedure: &str) -> String {
        format!("{}/{procedure}", self.endpoint.trim_end_matches('/'))
    }

    async fn read_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<Option<T>> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Remote {
                status: status.as_u16(),
                message,
            });
        }
        let envelope: ResponseEnvelope<T> = response.json().await?;
        Ok(envelope.result.data)
    }
}

#[derive(Debug, Serialize)]
struct GetInput<'a> {
    id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope<T> {
    result: ResponseResult<T>,
}

#[derive(Debug, Deserialize)]
struct ResponseResult<T> {
    data: Option<T>,
}

/// Note as the remote router serializes it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteNote {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<RemoteNote> for Note {
    fn from(remote: RemoteNote) -> Self {
        let created_at = remote.created_at.map_or(0, |t| t.timestamp_millis());
        Self {
            id: remote.id,
            title: remote.title.unwrap_or_default(),
            text: remote.text.unwrap_or_default(),
            body: remote.body.unwrap_or_default(),
            author: remote.author.unwrap_or_default(),
            created_at,
            updated_at: remote.updated_at.map_or(created_at, |t| t.timestamp_millis()),
        }
    }
}

impl NoteStore for HttpNoteStore {
    async fn get(&self, id: Option<&str>) -> Result<Note> {
        let id = id.or(self.default_id.as_deref());
        let mut request = self.client.get(self.procedure_url("notes.get"));
        if let Some(id) = id {
            let input = serde_json::to_string(&GetInput { id })?;
            request = request.query(&[("input", input)]);
        }

        debug!(id = ?id, "Fetching note from remote store");
        let response = request.send().await?;
        Self::read_data::<RemoteNote>(response)
            .await?
            .map(Note::from)
            .ok_or_else(|| Error::NoteNotFound {
                id: id.unwrap_or("(server default)").to_string(),
            })
    }

    async fn save(&self, input: SaveNote) -> Result<Note> {
        debug!(id = ?input.id, "Saving note to remote store");
        let response = self
            .client
            .post(self.procedure_url("notes.save"))
            .json(&input)
            .send()
            .await?;
        Self::read_data::<RemoteNote>(response)
            .await?
            .map(Note::from)
            .ok_or_else(|| Error::Remote {
                status: 200,
                message: "save returned no record".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const NOTE_ENVELOPE: &str =
        r#"{"result":{"data":{"id":"home","title":"todo","text":"todo\n\nmilk\to","body":"milk\to","author":"ana"}}}"#;

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head
            .lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        body.len() >= length
    }

    /// Answer one request with `status` and `body`; the handle yields the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request_complete(&request) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{addr}/api/trpc"), handle)
    }

    fn save_input(body: &str) -> SaveNote {
        SaveNote {
            id: Some("home".into()),
            text: None,
            title: Some("todo".into()),
            body: Some(body.into()),
            author: "ana".into(),
        }
    }

    #[tokio::test]
    async fn test_get_sends_id_as_input() {
        let (endpoint, server) = serve_once("200 OK", NOTE_ENVELOPE).await;
        let store = HttpNoteStore::new(endpoint, Some("home".into()));

        let note = store.get(None).await.unwrap();
        assert_eq!(note.body, "milk\to");

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /api/trpc/notes.get?input="));
        assert!(request_line.contains("home"));
    }

    #[tokio::test]
    async fn test_get_without_id_leaves_choice_to_server() {
        let (endpoint, server) = serve_once("200 OK", NOTE_ENVELOPE).await;
        let store = HttpNoteStore::new(endpoint, None);

        store.get(None).await.unwrap();
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/trpc/notes.get HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_get_without_data_is_not_found() {
        let (endpoint, _server) = serve_once("200 OK", r#"{"result":{}}"#).await;
        let store = HttpNoteStore::new(endpoint, Some("work".into()));

        let err = store.get(None).await.unwrap_err();
        assert!(matches!(err, Error::NoteNotFound { ref id } if id == "work"));
    }

    #[tokio::test]
    async fn test_save_posts_json_body() {
        let (endpoint, server) = serve_once("200 OK", NOTE_ENVELOPE).await;
        let store = HttpNoteStore::new(endpoint, None);

        let saved = store.save(save_input("milk\to")).await.unwrap();
        assert_eq!(saved.id, "home");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/trpc/notes.save HTTP/1.1"));
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        let sent: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent["body"], "milk\to");
        assert_eq!(sent["author"], "ana");
    }

    #[tokio::test]
    async fn test_error_status_maps_to_remote_error() {
        let (endpoint, _server) = serve_once("500 Internal Server Error", "boom").await;
        let store = HttpNoteStore::new(endpoint, None);

        let err = store.save(save_input("")).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Remote { status: 500, ref message } if message == "boom"
        ));
    }

    #[tokio::test]
    async fn test_save_without_data_is_remote_error() {
        let (endpoint, _server) = serve_once("200 OK", r#"{"result":{}}"#).await;
        let store = HttpNoteStore::new(endpoint, None);

        let err = store.save(save_input("")).await.unwrap_err();
        assert!(matches!(err, Error::Remote { status: 200, .. }));
    }

    #[test]
    fn test_procedure_url() {
        let store = HttpNoteStore::new("http://localhost:3000/api/trpc/", None);
        assert_eq!(
            store.procedure_url("notes.get"),
            "http://localhost:3000/api/trpc/notes.get"
        );
    }

    #[test]
    fn test_envelope_with_note() {
        let json = r#"{"result":{"data":{
            "id":"home","title":"= Groceries","text":"= Groceries\n\nmilk\to",
            "body":"milk\to","author":"ana",
            "createdAt":"2024-01-02T03:04:05.000Z","updatedAt":"2024-01-02T03:04:06.000Z"
        }}}"#;
        let envelope: ResponseEnvelope<RemoteNote> = serde_json::from_str(json).unwrap();
        let note = Note::from(envelope.result.data.unwrap());
        assert_eq!(note.display_title(), "Groceries");
        assert_eq!(note.body, "milk\to");
        assert_eq!(note.updated_at - note.created_at, 1000);
    }

    #[test]
    fn test_envelope_without_data() {
        let envelope: ResponseEnvelope<RemoteNote> =
            serde_json::from_str(r#"{"result":{}}"#).unwrap();
        assert!(envelope.result.data.is_none());
    }

    #[test]
    fn test_null_body_reads_as_empty() {
        let json = r#"{"id":"home","title":"t","text":null,"body":null,"author":"ana"}"#;
        let note = Note::from(serde_json::from_str::<RemoteNote>(json).unwrap());
        assert_eq!(note.body, "");
        assert_eq!(note.created_at, 0);
    }

    #[test]
    fn test_save_input_omits_absent_fields() {
        let input = SaveNote {
            id: Some("home".into()),
            text: None,
            title: None,
            body: Some("milk\to".into()),
            author: "ana".into(),
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": "home", "body": "milk\to", "author": "ana"})
        );
    }
}
