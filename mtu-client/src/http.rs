use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};

use crate::{
    api::{self, Comment, CommentId, ContentRef, EditComment, NewComment, PhotoId, VoteStatus},
    Api, ClientConfig, Error,
};

/// `Api` implementation talking to the site over HTTP
#[derive(Clone, Debug)]
pub struct HttpApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpApi {
    pub fn new(config: ClientConfig) -> HttpApi {
        HttpApi {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, self.config.url(path));
        match self.config.token {
            Some(tok) => req.bearer_auth(tok.0),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, Error> {
        let resp = req.send().await.context("sending request to server")?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .with_context(|| format!("reading body of {status} error response"))?;
        let err = match api::Error::parse(&body) {
            Ok(err) => err,
            Err(e) => {
                tracing::warn!(?status, err=?e, "server returned an unparseable error");
                api::Error::Unknown(String::new())
            }
        };
        Err(Error::Api(err))
    }

    async fn fetch<R>(&self, req: RequestBuilder) -> Result<R, Error>
    where
        R: for<'de> serde::Deserialize<'de>,
    {
        Ok(self
            .send(req)
            .await?
            .json()
            .await
            .context("parsing data from server")?)
    }
}

#[async_trait]
impl Api for HttpApi {
    async fn fetch_comments(&self, target: &ContentRef) -> Result<Vec<Comment>, Error> {
        let req = self
            .request(Method::GET, "comments")
            .query(&[(target.kind.key(), target.id.0.to_string())]);
        self.fetch(req).await
    }

    async fn post_comment(&self, comment: &NewComment) -> Result<Comment, Error> {
        let req = self.request(Method::POST, "comments").json(comment);
        self.fetch(req).await
    }

    async fn edit_comment(&self, id: CommentId, edit: &EditComment) -> Result<Comment, Error> {
        let req = self
            .request(Method::PUT, &format!("comments/{}", id.0))
            .json(edit);
        self.fetch(req).await
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), Error> {
        let req = self.request(Method::DELETE, &format!("comments/{}", id.0));
        self.send(req).await?;
        Ok(())
    }

    async fn vote(&self, photo: PhotoId) -> Result<VoteStatus, Error> {
        let req = self.request(Method::POST, &format!("photos/{}/vote", photo.0));
        self.fetch(req).await
    }

    async fn unvote(&self, photo: PhotoId) -> Result<VoteStatus, Error> {
        let req = self.request(Method::DELETE, &format!("photos/{}/vote", photo.0));
        self.fetch(req).await
    }
}
