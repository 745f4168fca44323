//! HTTP implementation of [`TransactionApi`].
//!
//! Every failure, whatever its cause, ends up as an [`ApiError`] carrying a
//! message fit for display.

use std::time::Duration;

use api_types::{
    ErrorResponse,
    scheduled::{
        ScheduledListQuery, ScheduledTransactionCancelled, ScheduledTransactionNew,
        ScheduledTransactionView,
    },
    transaction::{
        FeeRequest as WireFeeRequest, FeeResponse, MoneyRequestNew, TransactionListQuery,
        TransactionNew, TransactionView,
    },
    wallet::WalletView,
};
use async_trait::async_trait;
use engine::{
    ApiError, CancelledScheduledTransaction, FeeRequest, Money, NewMoneyRequest,
    NewScheduledTransaction, NewTransaction, ScheduledQuery, ScheduledTransaction,
    ScheduledTransactionPatch, Transaction, TransactionApi, TransactionQuery, Wallet,
};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Input(format!("invalid base_url: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Input(format!("invalid base_url: {base_url}")));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::new(format!("invalid base_url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
    ) -> std::result::Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        tracing::debug!("{method} {url}");
        let builder = self.http.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn execute(&self, builder: RequestBuilder) -> std::result::Result<Response, ApiError> {
        let res = builder.send().await.map_err(|err| {
            tracing::debug!("request failed: {err}");
            ApiError::new(format!("server unreachable: {err}"))
        })?;
        if res.status().is_success() {
            return Ok(res);
        }
        Err(error_from(res).await)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> std::result::Result<T, ApiError> {
        let res = self.execute(builder).await?;
        res.json::<T>()
            .await
            .map_err(|err| ApiError::new(format!("invalid response: {err}")))
    }
}

async fn error_from(res: Response) -> ApiError {
    let status = res.status();
    let message = res
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(ErrorResponse::into_message)
        .unwrap_or_else(|| format!("{}: unknown error", status.as_u16()));
    tracing::debug!("request rejected with {status}: {message}");
    ApiError::new(message)
}

fn idempotency_key() -> Option<String> {
    Some(Uuid::new_v4().to_string())
}

#[async_trait]
impl TransactionApi for HttpApi {
    async fn get_transactions(
        &self,
        query: &TransactionQuery,
    ) -> std::result::Result<Vec<Transaction>, ApiError> {
        let builder = self
            .request(Method::GET, &["transactions"])?
            .query(&TransactionListQuery::from(query));
        let views: Vec<TransactionView> = self.fetch(builder).await?;
        Ok(engine::transactions_from_wire(views)?)
    }

    async fn get_pending_transactions(&self) -> std::result::Result<Vec<Transaction>, ApiError> {
        let builder = self.request(Method::GET, &["transactions", "pending"])?;
        let views: Vec<TransactionView> = self.fetch(builder).await?;
        Ok(engine::transactions_from_wire(views)?)
    }

    async fn get_transaction_details(&self, id: &str) -> std::result::Result<Transaction, ApiError> {
        let builder = self.request(Method::GET, &["transactions", id])?;
        let view: TransactionView = self.fetch(builder).await?;
        Ok(Transaction::try_from(view)?)
    }

    async fn create_transaction(
        &self,
        request: &NewTransaction,
    ) -> std::result::Result<Transaction, ApiError> {
        let mut payload = TransactionNew::from(request);
        payload.idempotency_key = idempotency_key();
        let builder = self
            .request(Method::POST, &["transactions"])?
            .json(&payload);
        let view: TransactionView = self.fetch(builder).await?;
        Ok(Transaction::try_from(view)?)
    }

    async fn calculate_transaction_fee(
        &self,
        request: FeeRequest,
    ) -> std::result::Result<Money, ApiError> {
        let builder = self
            .request(Method::POST, &["transactions", "fee"])?
            .json(&WireFeeRequest::from(request));
        let quote: FeeResponse = self.fetch(builder).await?;
        Ok(Money::from_major_f64(quote.fee, request.currency)?)
    }

    async fn create_money_request(
        &self,
        request: &NewMoneyRequest,
    ) -> std::result::Result<(), ApiError> {
        let builder = self
            .request(Method::POST, &["transactions", "request"])?
            .json(&MoneyRequestNew::from(request));
        self.execute(builder).await?;
        Ok(())
    }

    async fn get_scheduled_transactions(
        &self,
        query: &ScheduledQuery,
    ) -> std::result::Result<Vec<ScheduledTransaction>, ApiError> {
        let builder = self
            .request(Method::GET, &["scheduled-transactions"])?
            .query(&ScheduledListQuery::from(query));
        let views: Vec<ScheduledTransactionView> = self.fetch(builder).await?;
        Ok(engine::scheduled_from_wire(views)?)
    }

    async fn get_scheduled_transaction_details(
        &self,
        id: &str,
    ) -> std::result::Result<ScheduledTransaction, ApiError> {
        let builder = self.request(Method::GET, &["scheduled-transactions", id])?;
        let view: ScheduledTransactionView = self.fetch(builder).await?;
        Ok(ScheduledTransaction::try_from(view)?)
    }

    async fn create_scheduled_transaction(
        &self,
        request: &NewScheduledTransaction,
    ) -> std::result::Result<ScheduledTransaction, ApiError> {
        let mut payload = ScheduledTransactionNew::from(request);
        payload.idempotency_key = idempotency_key();
        let builder = self
            .request(Method::POST, &["scheduled-transactions"])?
            .json(&payload);
        let view: ScheduledTransactionView = self.fetch(builder).await?;
        Ok(ScheduledTransaction::try_from(view)?)
    }

    async fn update_scheduled_transaction(
        &self,
        id: &str,
        patch: &ScheduledTransactionPatch,
    ) -> std::result::Result<ScheduledTransaction, ApiError> {
        let builder = self
            .request(Method::PUT, &["scheduled-transactions", id])?
            .json(&patch.to_wire());
        let view: ScheduledTransactionView = self.fetch(builder).await?;
        Ok(ScheduledTransaction::try_from(view)?)
    }

    async fn cancel_scheduled_transaction(
        &self,
        id: &str,
    ) -> std::result::Result<CancelledScheduledTransaction, ApiError> {
        let builder = self.request(Method::POST, &["scheduled-transactions", id, "cancel"])?;
        let cancelled: ScheduledTransactionCancelled = self.fetch(builder).await?;
        Ok(CancelledScheduledTransaction { id: cancelled.id })
    }

    async fn get_wallets(&self) -> std::result::Result<Vec<Wallet>, ApiError> {
        let builder = self.request(Method::GET, &["wallets"])?;
        let views: Vec<WalletView> = self.fetch(builder).await?;
        views
            .into_iter()
            .map(|view| Wallet::try_from(view).map_err(ApiError::from))
            .collect()
    }
}
