//! Single-shot HTTP server for exercising the fetcher without the real archive.

use reqwest::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Client that never routes through a proxy picked up from the environment.
pub(crate) fn local_client() -> Result<Client, reqwest::Error> {
    Client::builder().no_proxy().build()
}

/// Accepts one connection, answers it with `status_line` and a JSON `body`, and
/// resolves to the raw request text it received.
pub(crate) async fn serve_once(
    status_line: &'static str,
    body: &'static str,
) -> std::io::Result<(String, JoinHandle<String>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&request).into_owned()
    });

    Ok((format!("http://{addr}/v1/archive"), handle))
}
