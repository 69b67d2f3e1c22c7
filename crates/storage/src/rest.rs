//! HTTP implementation of the table client and the auth collaborator,
//! available on browser targets.

use std::pin::pin;

use futures_util::future::{Either, select};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use serde_json::{Value, json};

use motus_domain::{
    CreateError, DeleteError, InvitationToken, PasswordChangeOutcome, Profile, ReadError,
    SessionRepository, StorageError,
};

use crate::client::{Client, Filter, OrderBy, Table};
use crate::rows;

#[derive(Clone, Copy, Default)]
pub struct RestClient;

impl RestClient {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn table_url(table: Table, filter: Option<&Filter>, order: Option<&OrderBy>) -> String {
    let mut url = format!("api/db/{}", table.as_ref());
    let mut params = vec![];
    if let Some(filter) = filter {
        params.push(format!("{}=eq.{}", filter.column, filter.value));
    }
    if let Some(order) = order {
        params.push(format!(
            "order={}.{}",
            order.column,
            if order.descending { "desc" } else { "asc" }
        ));
    }
    if !params.is_empty() {
        url.push('?');
        url.push_str(&params.join("&"));
    }
    url
}

impl Client for RestClient {
    async fn select(
        &self,
        table: Table,
        filter: Option<Filter>,
        order: Option<OrderBy>,
    ) -> Result<Vec<Value>, StorageError> {
        fetch(
            Request::get(&table_url(table, filter.as_ref(), order.as_ref()))
                .build()
                .unwrap(),
        )
        .await
    }

    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<Vec<Value>, StorageError> {
        fetch(
            Request::post(&table_url(table, None, None))
                .json(&rows)
                .expect("serialization failed"),
        )
        .await
    }

    async fn update(
        &self,
        table: Table,
        patch: Value,
        filter: Filter,
    ) -> Result<(), StorageError> {
        fetch_no_content(
            Request::patch(&table_url(table, Some(&filter), None))
                .json(&patch)
                .expect("serialization failed"),
            (),
        )
        .await
    }

    async fn delete(&self, table: Table, filter: Filter) -> Result<(), StorageError> {
        fetch_no_content(
            Request::delete(&table_url(table, Some(&filter), None))
                .build()
                .unwrap(),
            (),
        )
        .await
    }
}

#[derive(Clone, Copy, Default)]
pub struct RestAuth;

impl RestAuth {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

const PASSWORD_CHANGE_TIMEOUT_MILLIS: u32 = 10_000;

impl SessionRepository for RestAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Profile, ReadError> {
        let row: rows::ProfileRow = fetch(
            Request::post("api/session")
                .json(&json!({ "email": email, "password": password }))
                .expect("serialization failed"),
        )
        .await?;
        Profile::try_from(row).map_err(|err| ReadError::Other(err.into()))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        token: Option<&InvitationToken>,
    ) -> Result<Profile, CreateError> {
        let row: rows::ProfileRow = fetch(
            Request::post("api/signup")
                .json(&json!({
                    "email": email,
                    "password": password,
                    "invitation_token": token.map(|token| token.as_ref().as_str()),
                }))
                .expect("serialization failed"),
        )
        .await?;
        Profile::try_from(row).map_err(|err| CreateError::Other(err.into()))
    }

    async fn sign_out(&self) -> Result<(), DeleteError> {
        Ok(fetch_no_content(Request::delete("api/session").build().unwrap(), ()).await?)
    }

    async fn current_session(&self) -> Result<Option<Profile>, ReadError> {
        match fetch::<rows::ProfileRow>(Request::get("api/session").build().unwrap()).await {
            Ok(row) => Ok(Some(
                Profile::try_from(row).map_err(|err| ReadError::Other(err.into()))?,
            )),
            Err(StorageError::NoSession) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// The backend call is raced against a fixed timeout. On timeout the
    /// change may or may not have been applied, which is reported as
    /// `Indeterminate` rather than collapsed into success or failure.
    async fn change_password(&self, new_password: &str) -> PasswordChangeOutcome {
        let request = pin!(fetch_no_content(
            Request::put("api/password")
                .json(&json!({ "password": new_password }))
                .expect("serialization failed"),
            (),
        ));
        let timeout = pin!(TimeoutFuture::new(PASSWORD_CHANGE_TIMEOUT_MILLIS));
        match select(request, timeout).await {
            Either::Left((Ok(()), _)) => PasswordChangeOutcome::Success,
            Either::Left((Err(err), _)) => PasswordChangeOutcome::Failure(err.to_string()),
            Either::Right(((), _)) => PasswordChangeOutcome::Indeterminate,
        }
    }
}

async fn fetch<T>(request: Request) -> Result<T, StorageError>
where
    T: 'static + for<'de> serde::Deserialize<'de>,
{
    match request.send().await {
        Ok(response) => {
            if response.ok() {
                response
                    .json::<T>()
                    .await
                    .map_err(|err| StorageError::Other(err.into()))
            } else {
                Err(status_error(&response))
            }
        }
        Err(_) => Err(StorageError::NoConnection),
    }
}

async fn fetch_no_content<T>(request: Request, result: T) -> Result<T, StorageError> {
    match request.send().await {
        Ok(response) => {
            if response.ok() {
                Ok(result)
            } else {
                Err(status_error(&response))
            }
        }
        Err(_) => Err(StorageError::NoConnection),
    }
}

fn status_error(response: &Response) -> StorageError {
    if response.status() == 401 {
        StorageError::NoSession
    } else {
        StorageError::Rejected(format!(
            "{} {}",
            response.status(),
            response.status_text()
        ))
    }
}
