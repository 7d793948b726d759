//! Usage status and the purchase/verification handshake.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::api::UsageApi;
use crate::error::ApiError;
use crate::models::{ProductInfo, SignedTransaction, SubscriptionStatus, SubscriptionTier};

pub const SUBSCRIPTION_PRODUCT_ID: &str = "com.georgelabs.thedump.subscription.monthly";

const ALREADY_SUBSCRIBED: &str = "You already have an active subscription.";
const STATUS_UNAVAILABLE: &str = "Could not verify subscription status. Please try again.";
const ALREADY_LINKED: &str = "This purchase is already linked to another account.";
const PENDING_APPROVAL: &str =
    "Your purchase is pending approval. You'll get access once it's confirmed.";
const NOTHING_TO_RESTORE: &str = "No active subscription found to restore.";

/// Failures reported by the platform store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Subscription product not available")]
    ProductNotFound,

    #[error("Purchase was cancelled")]
    UserCancelled,

    #[error("Purchase is pending approval")]
    Pending,

    #[error("Unexpected product: {0}")]
    UnexpectedProduct(String),

    #[error("Transaction verification failed: {0}")]
    Verification(String),

    #[error("An unknown error occurred")]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Purchased(SignedTransaction),
    Cancelled,
    Pending,
}

/// Platform in-app purchase store.
#[async_trait]
pub trait PurchasePlatform: Send + Sync {
    async fn load_product(&self, product_id: &str) -> Result<Option<ProductInfo>, StoreError>;

    async fn purchase(&self, product_id: &str) -> Result<PurchaseOutcome, StoreError>;

    /// Most recent valid entitlement for the product, if any.
    async fn current_entitlement(
        &self,
        product_id: &str,
    ) -> Result<Option<SignedTransaction>, StoreError>;

    /// Marks a transaction as delivered. Only called after the server verified it.
    async fn finish(&self, transaction: &SignedTransaction) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionSnapshot {
    pub status: Option<SubscriptionStatus>,
    pub product: Option<ProductInfo>,
    pub is_loading: bool,
    pub is_purchasing: bool,
    pub error: Option<String>,
}

impl SubscriptionSnapshot {
    pub fn tier(&self) -> SubscriptionTier {
        self.status
            .as_ref()
            .map_or(SubscriptionTier::Free, |status| status.tier)
    }

    pub fn is_blocked(&self) -> bool {
        self.status.as_ref().is_some_and(|status| status.is_blocked)
    }

    pub fn can_upgrade(&self) -> bool {
        self.tier().can_upgrade()
    }

    pub fn usage_percentage(&self) -> f64 {
        self.status.as_ref().map_or(0.0, |status| status.usage_pct)
    }

    pub fn formatted_price(&self) -> String {
        self.product
            .as_ref()
            .map_or_else(|| "—".to_string(), |product| product.display_price.clone())
    }

    pub fn formatted_reset_date(&self) -> Option<String> {
        self.status
            .as_ref()
            .and_then(SubscriptionStatus::formatted_reset_date)
    }

    pub fn formatted_trial_end(&self) -> Option<String> {
        self.status
            .as_ref()
            .and_then(SubscriptionStatus::formatted_trial_end)
    }
}

enum PurchaseFailure {
    Store(StoreError),
    Api(ApiError),
}

impl PurchaseFailure {
    /// User-facing message, or `None` when the failure should stay silent.
    fn message(&self) -> Option<String> {
        match self {
            Self::Store(StoreError::UserCancelled) => None,
            Self::Store(StoreError::Pending) => Some(PENDING_APPROVAL.to_string()),
            Self::Store(error) => Some(error.to_string()),
            Self::Api(error) if error.is_conflict() => Some(ALREADY_LINKED.to_string()),
            Self::Api(error) => Some(error.to_string()),
        }
    }
}

pub struct SubscriptionState {
    api: Arc<dyn UsageApi>,
    platform: Arc<dyn PurchasePlatform>,
    product_id: String,
    state: watch::Sender<SubscriptionSnapshot>,
}

impl std::fmt::Debug for SubscriptionState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SubscriptionState")
            .field("product_id", &self.product_id)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl SubscriptionState {
    pub fn new(api: Arc<dyn UsageApi>, platform: Arc<dyn PurchasePlatform>) -> Self {
        Self::with_product_id(api, platform, SUBSCRIPTION_PRODUCT_ID)
    }

    pub fn with_product_id(
        api: Arc<dyn UsageApi>,
        platform: Arc<dyn PurchasePlatform>,
        product_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            platform,
            product_id: product_id.into(),
            state: watch::Sender::new(SubscriptionSnapshot::default()),
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn subscribe(&self) -> watch::Receiver<SubscriptionSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SubscriptionSnapshot {
        self.state.borrow().clone()
    }

    /// Fetches usage from the server and product metadata from the store.
    pub async fn load_status(&self) {
        let started = self.state.send_if_modified(|state| {
            if state.is_loading {
                return false;
            }
            state.is_loading = true;
            state.error = None;
            true
        });
        if !started {
            return;
        }

        let status = self.api.fetch_usage_status().await;
        let product = match self.platform.load_product(&self.product_id).await {
            Ok(product) => {
                if product.is_none() {
                    tracing::debug!("No product found for id {}", self.product_id);
                }
                Some(product)
            }
            Err(error) => {
                tracing::warn!("Failed to load products: {}", error);
                None
            }
        };

        self.state.send_modify(|state| {
            match status {
                Ok(status) => state.status = Some(status),
                Err(error) => {
                    tracing::warn!("Failed to load usage status: {}", error);
                    state.error = Some(error.to_string());
                }
            }
            if let Some(product) = product {
                state.product = product;
            }
            state.is_loading = false;
        });
    }

    /// Buys the subscription. Returns `true` once the server verified it.
    ///
    /// The server tier is re-checked first so a stale local view cannot lead
    /// to a second charge. Cancelling in the store sheet is not an error.
    pub async fn purchase(&self) -> bool {
        if !self.begin_purchase() {
            return false;
        }

        let result = match self.api.fetch_usage_status().await {
            Ok(status) => {
                let active = status.tier.has_active_subscription();
                self.state.send_modify(|state| state.status = Some(status));
                if active {
                    Err(Some(ALREADY_SUBSCRIBED.to_string()))
                } else {
                    self.buy_and_verify()
                        .await
                        .map_err(|failure| failure.message())
                }
            }
            Err(error) => {
                tracing::debug!("Tier check before purchase failed: {}", error);
                Err(Some(STATUS_UNAVAILABLE.to_string()))
            }
        };

        self.end_purchase(result)
    }

    /// Re-verifies the latest platform entitlement with the server.
    pub async fn restore(&self) -> bool {
        if !self.begin_purchase() {
            return false;
        }

        let entitlement = match self.platform.current_entitlement(&self.product_id).await {
            Ok(entitlement) => entitlement,
            Err(error) => {
                tracing::warn!("Failed to read entitlements: {}", error);
                None
            }
        };

        let result = match entitlement {
            Some(transaction) if transaction.product_id == self.product_id => self
                .verify_and_finish(&transaction)
                .await
                .map_err(|failure| failure.message()),
            _ => Err(Some(NOTHING_TO_RESTORE.to_string())),
        };

        self.end_purchase(result)
    }

    /// Reacts to a renewal or revocation pushed by the platform.
    pub async fn handle_transaction_update(&self, transaction: SignedTransaction) {
        tracing::debug!(
            "Transaction update: {} revoked={}",
            transaction.product_id,
            transaction.revoked
        );
        if !transaction.revoked {
            if let Err(error) = self.api.verify_purchase(&transaction.jws).await {
                tracing::warn!("Background verification failed: {}", error);
            }
            if let Err(error) = self.platform.finish(&transaction).await {
                tracing::warn!("Failed to finish transaction: {}", error);
            }
        }
        self.refresh_status_quietly().await;
    }

    /// Feeds platform transaction updates into this state until the sender closes.
    pub fn spawn_transaction_listener(
        self: &Arc<Self>,
        mut updates: mpsc::Receiver<SignedTransaction>,
    ) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(transaction) = updates.recv().await {
                this.handle_transaction_update(transaction).await;
            }
            tracing::debug!("Transaction update feed closed");
        })
    }

    async fn buy_and_verify(&self) -> Result<bool, PurchaseFailure> {
        let transaction = match self.platform.purchase(&self.product_id).await {
            Ok(PurchaseOutcome::Purchased(transaction)) => transaction,
            Ok(PurchaseOutcome::Cancelled) => {
                return Err(PurchaseFailure::Store(StoreError::UserCancelled));
            }
            Ok(PurchaseOutcome::Pending) => return Err(PurchaseFailure::Store(StoreError::Pending)),
            Err(error) => return Err(PurchaseFailure::Store(error)),
        };
        if transaction.product_id != self.product_id {
            return Err(PurchaseFailure::Store(StoreError::UnexpectedProduct(
                transaction.product_id,
            )));
        }
        self.verify_and_finish(&transaction).await
    }

    async fn verify_and_finish(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<bool, PurchaseFailure> {
        let response = self
            .api
            .verify_purchase(&transaction.jws)
            .await
            .map_err(PurchaseFailure::Api)?;
        if !response.success {
            tracing::warn!("Server did not accept transaction {}", transaction.transaction_id);
            return Ok(false);
        }

        tracing::info!(
            "Purchase verified, tier is now {}",
            response.subscription_tier
        );
        if let Err(error) = self.platform.finish(transaction).await {
            tracing::warn!("Failed to finish transaction: {}", error);
        }
        self.refresh_status_quietly().await;
        Ok(true)
    }

    /// Refreshes usage, keeping the previous status on failure.
    async fn refresh_status_quietly(&self) {
        match self.api.fetch_usage_status().await {
            Ok(status) => self.state.send_modify(|state| state.status = Some(status)),
            Err(error) => tracing::debug!("Status refresh failed: {}", error),
        }
    }

    fn begin_purchase(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_purchasing {
                return false;
            }
            state.is_purchasing = true;
            state.error = None;
            true
        })
    }

    fn end_purchase(&self, result: Result<bool, Option<String>>) -> bool {
        let (completed, error) = match result {
            Ok(completed) => (completed, None),
            Err(message) => (false, message),
        };
        self.state.send_modify(|state| {
            state.is_purchasing = false;
            state.error = error;
        });
        completed
    }
}
