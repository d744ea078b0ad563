use std::future::Future;

use reqwest::Client;

use crate::{warn_time, Config, Error, Result};

/// Anything that can turn a URL into page HTML.
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// `reqwest` backed fetcher with a per-request timeout and a small retry budget.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    // Client uses Arc so we can clone cheaply
    client: Client,
    retries: u32,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(client, config.fetch_retries))
    }

    pub fn with_client(client: Client, retries: u32) -> Self {
        Self { client, retries }
    }

    async fn request_page_html(&self, url: &str) -> reqwest::Result<String> {
        let res = self.client.get(url).send().await?.error_for_status()?;
        res.text().await
    }
}

impl Fetch for HttpFetcher {
    /// Requests a page and returns a `Result<String>` containing the HTML.
    async fn fetch(&self, url: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.request_page_html(url).await {
                Ok(html) => return Ok(html),
                Err(err) if attempt < self.retries => {
                    attempt += 1;
                    warn_time!("RETRY", "{url} ({attempt}/{}): {err}", self.retries);
                }
                Err(source) => {
                    return Err(Error::Fetch {
                        url: url.to_string(),
                        source,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    use super::*;

    /// Answers one connection per status, in order. Resolves to the number of
    /// requests served.
    async fn serve(statuses: &'static [&'static str]) -> (String, JoinHandle<usize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/disc/1/", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let mut served = 0;
            for status in statuses {
                let (mut sock, _) = listener.accept().await.unwrap();
                let mut req = Vec::new();
                let mut buf = [0u8; 1024];
                while !req.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = sock.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    req.extend_from_slice(&buf[..n]);
                }
                let body = format!("<html>{status}</html>");
                let res = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                sock.write_all(res.as_bytes()).await.unwrap();
                sock.shutdown().await.unwrap();
                served += 1;
            }
            served
        });
        (url, handle)
    }

    fn fetcher() -> HttpFetcher {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .unwrap();
        HttpFetcher::with_client(client, Config::default().fetch_retries)
    }

    #[tokio::test]
    async fn server_error_is_retried_once() {
        let (url, server) = serve(&["500 Internal Server Error", "200 OK"]).await;

        let html = fetcher().fetch(&url).await.unwrap();

        assert_eq!(html, "<html>200 OK</html>");
        assert_eq!(server.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn second_failure_gives_up_with_url() {
        let (url, server) = serve(&["500 Internal Server Error", "503 Service Unavailable"]).await;

        let res = fetcher().fetch(&url).await;

        assert!(matches!(res, Err(Error::Fetch { url: ref failed, .. }) if *failed == url));
        assert_eq!(server.await.unwrap(), 2);
    }
}
