use assert_cmd::Command;
use assert_cmd::assert::Assert;
use assert_fs::TempDir;
use assert_fs::prelude::PathCopy;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn setup_working_dir(dir_name: &str) -> TempDir {
    let file_path = PathBuf::from(format!(
        "{}/tests/test-cases/{}",
        env!("CARGO_MANIFEST_DIR"),
        dir_name
    ));

    let temp = TempDir::new().unwrap();
    temp.copy_from(file_path, &["*", "**/*"]).unwrap();

    temp
}

pub struct AssistTestHelper<'a> {
    pub work_dir: TempDir,
    name: &'a str,
    counter: AtomicUsize,
}

impl<'a> AssistTestHelper<'a> {
    pub fn new(name: &'a str, test_dir: &'a str) -> Self {
        Self {
            work_dir: setup_working_dir(test_dir),
            name,
            counter: AtomicUsize::new(0),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("tibco-assist").unwrap();
        cmd.current_dir(self.work_dir.path())
            .env(
                "TIBCO_ASSIST_RUN_ID",
                format!(
                    "{}-{}",
                    self.name,
                    self.counter.fetch_add(1, Ordering::Relaxed)
                ),
            )
            .env("TIBCO_ASSIST_OUTPUT_PROGRESS", "plain")
            .env("NO_COLOR", "1")
            .env_remove("TIBCO_ASSIST_MODEL")
            .env_remove("TIBCO_ASSIST_BASE_URL")
            .env_remove("TIBCO_ASSIST_CONFIG_DIR");
        cmd
    }

    /// Run with no credential available from the environment.
    pub fn run_command(&self, args: &[&str]) -> Assert {
        self.command().env_remove("GROQ_API_KEY").args(args).assert()
    }

    /// Run with a placeholder credential. Requests go to `base_url`.
    pub fn run_with_key(&self, base_url: &str, args: &[&str]) -> Assert {
        self.command()
            .env("GROQ_API_KEY", "gsk_test_key")
            .env("TIBCO_ASSIST_BASE_URL", base_url)
            .args(args)
            .assert()
    }

    pub fn run_with_stdin(&self, base_url: &str, stdin: &str, args: &[&str]) -> Assert {
        self.command()
            .env("GROQ_API_KEY", "gsk_test_key")
            .env("TIBCO_ASSIST_BASE_URL", base_url)
            .write_stdin(stdin)
            .args(args)
            .assert()
    }

    pub fn clean_work_dir(self) {
        self.work_dir.close().unwrap();
    }
}

/// A request as the completion endpoint received it.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

/// Local stand-in for the completion service. Every request is answered
/// with the same assistant message.
pub struct StubCompletionServer {
    port: u16,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl StubCompletionServer {
    pub fn answering(content: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let received = Arc::new(Mutex::new(Vec::new()));

        let response_body = serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
        .to_string();

        let log = received.clone();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                // Record before answering, the client may exit as soon as it has a reply.
                if let Some(request) = read_request(&stream) {
                    log.lock().unwrap().push(request);
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    response_body.len(),
                    response_body
                );
                stream.write_all(response.as_bytes()).ok();
                stream.flush().ok();
            }
        });

        Self { port, received }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/v1", self.port)
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }
}

fn read_request(stream: &TcpStream) -> Option<ReceivedRequest> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let path = request_line.split_whitespace().nth(1)?.to_string();

    let mut content_length = 0;
    let mut authorization = None;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().ok()?,
                "authorization" => authorization = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).ok()?;

    Some(ReceivedRequest {
        path,
        authorization,
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    })
}
