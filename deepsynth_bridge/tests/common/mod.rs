use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// One-shot stand-in for the messages endpoint. Answers a single request
/// and keeps its JSON body for inspection.
pub struct FakeApi {
    pub url: String,
    handle: JoinHandle<String>,
}

impl FakeApi {
    /// Replies 200 with an assistant message holding `text`.
    pub fn reply(text: &str) -> Self {
        let body = serde_json::json!({
            "id": "msg_bridge",
            "type": "message",
            "role": "assistant",
            "content": [ { "type": "text", "text": text } ],
            "stop_reason": "end_turn"
        });
        Self::status(200, &body.to_string())
    }

    pub fn status(code: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake api");
        let url = format!("http://{}/v1/messages", listener.local_addr().expect("addr"));
        let body = body.to_string();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream);
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("read header");
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((k, v)) = line.split_once(':') {
                    if k.eq_ignore_ascii_case("content-length") {
                        content_length = v.trim().parse().unwrap_or(0);
                    }
                }
            }
            let mut request = vec![0u8; content_length];
            reader.read_exact(&mut request).expect("read body");

            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {code} Fake\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            )
            .expect("write reply");
            let _ = stream.flush();
            String::from_utf8_lossy(&request).into_owned()
        });

        Self { url, handle }
    }

    /// Waits for the request and returns the user message it carried.
    pub fn user_content(self) -> String {
        let body = self.handle.join().expect("fake api thread");
        let json: serde_json::Value = serde_json::from_str(&body).expect("json body");
        json["messages"][0]["content"]
            .as_str()
            .expect("content")
            .to_string()
    }

    pub fn finish(self) {
        let _ = self.handle.join();
    }
}
