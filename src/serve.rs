use std::{convert::Infallible, net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Result;
use hyper::{
    header::{HeaderValue, CONTENT_TYPE},
    service::{make_service_fn, service_fn},
    Body, Method, Request, Response, Server, StatusCode,
};

use crate::{
    build::locate_root,
    entity::Blog,
    feed::{self, FeedContext},
    FEED_FILE,
};

/// The shared state of the feed server.
#[derive(Debug)]
struct FeedService {
    root: PathBuf,
    blog: Blog,
}

pub async fn run_serve(source: String, port: u16) -> Result<()> {
    let (root, blog) = locate_root(&source)?;
    let service = Arc::new(FeedService { root, blog });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("listening on http://{}/{}", addr, FEED_FILE);

    let make_service = make_service_fn(move |_conn| {
        let service = Arc::clone(&service);
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let service = Arc::clone(&service);
                async move { Ok::<_, Infallible>(service.handle(req).await) }
            }))
        }
    });

    Server::bind(&addr)
        .serve(make_service)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

impl FeedService {
    async fn handle(&self, req: Request<Body>) -> Response<Body> {
        let feed_path = format!("/{FEED_FILE}");
        match (req.method(), req.uri().path()) {
            (&Method::GET, path) if path == feed_path => {
                // The feed is built per request, every post change shows up on reload.
                let context = FeedContext {
                    site: self.blog.site.url.clone(),
                };
                match feed::get(&context, &self.root, &self.blog).await {
                    Ok(xml) => response(StatusCode::OK, "application/xml; charset=utf-8", xml),
                    Err(err) => {
                        tracing::error!("Failed to build the feed: {:?}", &err);
                        response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "text/plain; charset=utf-8",
                            format!("{err:#}"),
                        )
                    }
                }
            }
            _ => response(
                StatusCode::NOT_FOUND,
                "text/plain; charset=utf-8",
                "404 Not Found".to_owned(),
            ),
        }
    }
}

fn response(status: StatusCode, content_type: &'static str, body: String) -> Response<Body> {
    let mut resp = Response::new(Body::from(body));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use hyper::{body, Body, Method, Request, StatusCode};

    use super::FeedService;
    use crate::{build::locate_root, BLOG_FILE};

    fn service(dir: &Path) -> FeedService {
        fs::write(
            dir.join(BLOG_FILE),
            "[site]\nurl = \"https://pinkaru.dev\"\ntitle = \"Blog\"\n",
        )
        .unwrap();
        let (root, blog) = locate_root(dir).unwrap();
        FeedService { root, blog }
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_feed_reflects_new_posts() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let resp = service.handle(request(Method::GET, "/rss.xml")).await;
        assert_eq!(StatusCode::OK, resp.status());
        assert_eq!(
            "application/xml; charset=utf-8",
            resp.headers()["content-type"].to_str().unwrap()
        );
        let xml = body::to_bytes(resp.into_body()).await.unwrap();
        assert!(!String::from_utf8_lossy(&xml).contains("<item>"));

        let posts_dir = dir.path().join("content/blog");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(
            posts_dir.join("new.md"),
            "---\ntitle: New\ndate: 2024-01-01\ndescription: D\n---\n",
        )
        .unwrap();

        let resp = service.handle(request(Method::GET, "/rss.xml")).await;
        let xml = body::to_bytes(resp.into_body()).await.unwrap();
        assert!(String::from_utf8_lossy(&xml).contains("https://pinkaru.dev/blog/new/"));
    }

    #[tokio::test]
    async fn test_broken_post_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());
        let posts_dir = dir.path().join("content/blog");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(posts_dir.join("broken.md"), "no front matter").unwrap();

        let resp = service.handle(request(Method::GET, "/rss.xml")).await;
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, resp.status());
    }

    #[tokio::test]
    async fn test_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(dir.path());

        let resp = service.handle(request(Method::GET, "/index.html")).await;
        assert_eq!(StatusCode::NOT_FOUND, resp.status());
        let resp = service.handle(request(Method::POST, "/rss.xml")).await;
        assert_eq!(StatusCode::NOT_FOUND, resp.status());
    }
}
