#![allow(dead_code)]
// Minimal scripted HTTP/1.1 stub for exercising the fetch pipeline against
// localhost instead of the real stats site.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub struct StubServer {
    pub base_url: String,
    pub hits: Arc<AtomicUsize>,
}

impl StubServer {
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub fn html_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\ncontent-type: text/html\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

pub fn status_response(code: u16, reason: &str) -> String {
    format!("HTTP/1.1 {code} {reason}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
}

async fn read_request_head(sock: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        match sock.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                head.extend_from_slice(&buf[..n]);
                if head.windows(4).any(|w| w == b"\r\n\r\n") || head.len() > 8192 {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&head).into_owned()
}

/// Serve one canned response per connection, in script order; the last
/// response repeats once the script runs out.
pub async fn spawn_scripted(responses: Vec<String>) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                break;
            };
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let resp = responses
                .get(n)
                .unwrap_or_else(|| responses.last().expect("script must not be empty"))
                .clone();
            tokio::spawn(async move {
                let _ = read_request_head(&mut sock).await;
                let _ = sock.write_all(resp.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });
    StubServer {
        base_url: format!("http://{addr}"),
        hits,
    }
}

/// Route by request path: the first (fragment, response) pair whose fragment
/// appears in the request head wins; anything else gets a 404.
pub async fn spawn_router(routes: Vec<(String, String)>) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    tokio::spawn(async move {
        let routes = Arc::new(routes);
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            let routes = routes.clone();
            tokio::spawn(async move {
                let head = read_request_head(&mut sock).await;
                let resp = routes
                    .iter()
                    .find(|(fragment, _)| head.contains(fragment.as_str()))
                    .map(|(_, resp)| resp.clone())
                    .unwrap_or_else(|| status_response(404, "Not Found"));
                let _ = sock.write_all(resp.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });
    StubServer {
        base_url: format!("http://{addr}"),
        hits,
    }
}

/// A season page with one stats table in the given kind's shape.
pub fn season_page(kind: &str, rows: &[(&str, u32, f64)]) -> String {
    let (metric, header) = match kind {
        "per_game" => (
            "PTS",
            "<tr><th>Rk</th><th>Player</th><th>Pos</th><th>Age</th><th>Tm</th><th>G</th><th>GS</th><th>MP</th><th>PTS</th></tr>",
        ),
        _ => (
            "PER",
            "<tr><th>Rk</th><th>Player</th><th>Pos</th><th>Age</th><th>Tm</th><th>G</th><th>MP</th><th>PER</th></tr>",
        ),
    };
    let mut body = String::from("<html><body><table><thead>");
    body.push_str(header);
    body.push_str("</thead><tbody>");
    for (i, (player, games, value)) in rows.iter().enumerate() {
        let cells = if metric == "PTS" {
            format!(
                "<tr><th>{rk}</th><td>{player}</td><td>PG</td><td>27</td><td>BOS</td><td>{games}</td><td>{games}</td><td>32.0</td><td>{value}</td></tr>",
                rk = i + 1
            )
        } else {
            format!(
                "<tr><th>{rk}</th><td>{player}</td><td>PG</td><td>27</td><td>BOS</td><td>{games}</td><td>2200</td><td>{value}</td></tr>",
                rk = i + 1
            )
        };
        body.push_str(&cells);
    }
    body.push_str("</tbody></table></body></html>");
    body
}
