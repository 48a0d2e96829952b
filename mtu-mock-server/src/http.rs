use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{self, request},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use mtu_client::api::{
    AuthToken, Comment, CommentId, ContentKeys, ContentRef, EditComment, Error as ApiError,
    NewComment, PhotoId, Uuid, VoteStatus,
};
use tower_http::trace::TraceLayer;

use crate::SharedServer;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let Error::Api(err) = self;
        tracing::info!("returning error to client: {err}");
        (
            err.status_code(),
            [(http::header::CONTENT_TYPE, "application/json")],
            err.contents(),
        )
            .into_response()
    }
}

/// Bearer token of the request, if any. A malformed header is rejected
/// rather than treated as anonymous.
pub struct MaybeAuth(pub Option<AuthToken>);

#[async_trait]
impl<S: Sync> FromRequestParts<S> for MaybeAuth {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, _state: &S) -> Result<MaybeAuth, Error> {
        let Some(auth) = req.headers.get(http::header::AUTHORIZATION) else {
            return Ok(MaybeAuth(None));
        };
        let auth = auth.to_str().map_err(|_| ApiError::Unauthorized)?;
        let mut auth = auth.split(' ');
        if !auth
            .next()
            .ok_or(ApiError::Unauthorized)?
            .eq_ignore_ascii_case("bearer")
        {
            return Err(ApiError::Unauthorized.into());
        }
        let token = auth.next().ok_or(ApiError::Unauthorized)?;
        if auth.next().is_some() {
            return Err(ApiError::Unauthorized.into());
        }
        let token = Uuid::try_from(token).map_err(|_| ApiError::Unauthorized)?;
        Ok(MaybeAuth(Some(AuthToken(token))))
    }
}

pub fn router(server: SharedServer) -> Router {
    Router::new()
        .route("/api/comments", get(fetch_comments).post(post_comment))
        .route("/api/comments/:id", put(edit_comment).delete(delete_comment))
        .route("/api/photos/:id/vote", post(vote).delete(unvote))
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

/// Serves `server` on an ephemeral loopback port, returning its address
pub fn serve(server: SharedServer) -> anyhow::Result<SocketAddr> {
    let builder = axum::Server::try_bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
        .context("binding mock server")?;
    let srv = builder.serve(router(server).into_make_service());
    let addr = srv.local_addr();
    tokio::spawn(async move {
        if let Err(err) = srv.await {
            tracing::error!(?err, "mock server stopped");
        }
    });
    tracing::info!(%addr, "mock server listening");
    Ok(addr)
}

async fn fetch_comments(
    State(server): State<SharedServer>,
    Query(keys): Query<ContentKeys>,
) -> Result<Json<Vec<Comment>>, Error> {
    let target = ContentRef::try_from(keys)?;
    Ok(Json(server.lock().await.fetch_comments(&target)?))
}

async fn post_comment(
    MaybeAuth(tok): MaybeAuth,
    State(server): State<SharedServer>,
    Json(c): Json<NewComment>,
) -> Result<Json<Comment>, Error> {
    Ok(Json(server.lock().await.post_comment(tok, c)?))
}

async fn edit_comment(
    MaybeAuth(tok): MaybeAuth,
    State(server): State<SharedServer>,
    Path(id): Path<Uuid>,
    Json(e): Json<EditComment>,
) -> Result<Json<Comment>, Error> {
    Ok(Json(
        server.lock().await.edit_comment(tok, CommentId(id), e)?,
    ))
}

async fn delete_comment(
    MaybeAuth(tok): MaybeAuth,
    State(server): State<SharedServer>,
    Path(id): Path<Uuid>,
) -> Result<(), Error> {
    Ok(server.lock().await.delete_comment(tok, CommentId(id))?)
}

async fn vote(
    MaybeAuth(tok): MaybeAuth,
    State(server): State<SharedServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<VoteStatus>, Error> {
    Ok(Json(server.lock().await.vote(tok, PhotoId(id))?))
}

async fn unvote(
    MaybeAuth(tok): MaybeAuth,
    State(server): State<SharedServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<VoteStatus>, Error> {
    Ok(Json(server.lock().await.unvote(tok, PhotoId(id))?))
}
