use async_trait::async_trait;

use super::{DumpClient, UsageApi, USAGE_STATUS_PATH, VERIFY_PURCHASE_PATH};
use crate::error::{ApiError, Result};
use crate::models::{SubscriptionStatus, VerifyPurchaseRequest, VerifyPurchaseResponse};

#[async_trait]
impl UsageApi for DumpClient {
    async fn fetch_usage_status(&self) -> Result<SubscriptionStatus> {
        self.transport().get(USAGE_STATUS_PATH, &[]).await
    }

    async fn verify_purchase(&self, signed_transaction: &str) -> Result<VerifyPurchaseResponse> {
        let signed_transaction = signed_transaction.trim();
        if signed_transaction.is_empty() {
            return Err(ApiError::bad_request("Signed transaction is required"));
        }
        self.transport()
            .post(
                VERIFY_PURCHASE_PATH,
                &VerifyPurchaseRequest { signed_transaction },
            )
            .await
    }
}
